//! Mesh assembly and the end-to-end relief pipeline.

use log::{debug, info, warn};

use crate::algo::Progress;
use crate::error::{ReliefError, Result};
use crate::mesh::{Heightmap, Mesh, Section, Side, Triangle};

use super::base::{base_triangles, BASE_TRIANGLES};
use super::surface::{surface_triangle_count, surface_triangles};
use super::walls::{wall_strips, WallEdge};
use super::{Closure, ReliefMesh, ReliefOptions};

/// Concatenates triangle batches into a [`Mesh`].
///
/// Batches keep their insertion order and are recorded as sections. When
/// validation is on, every batch must match its expected size and the final
/// total must match [`MeshAssembler::with_expected_total`] if one was given.
/// Violations surface as [`ReliefError::InternalInconsistency`].
#[derive(Debug)]
pub struct MeshAssembler {
    triangles: Vec<Triangle>,
    sections: Vec<(Section, std::ops::Range<usize>)>,
    expected_total: Option<usize>,
    validate: bool,
}

impl MeshAssembler {
    /// Create an assembler that validates batch sizes.
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            sections: Vec::new(),
            expected_total: None,
            validate: true,
        }
    }

    /// Pre-size the output and check the final count against `total`.
    pub fn with_expected_total(mut self, total: usize) -> Self {
        self.triangles.reserve(total);
        self.expected_total = Some(total);
        self
    }

    /// Set whether batch sizes are checked.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Append a batch under `section`.
    ///
    /// A batch expected to be empty is skipped and leaves no section behind.
    pub fn push(&mut self, section: Section, batch: Vec<Triangle>, expected: usize) -> Result<()> {
        if self.validate {
            if self.sections.iter().any(|(s, _)| *s == section) {
                return Err(ReliefError::InternalInconsistency(format!(
                    "{:?} batch added twice",
                    section
                )));
            }
            if expected > 0 && batch.is_empty() {
                return Err(ReliefError::InternalInconsistency(format!(
                    "{:?} batch is empty, expected {} triangles",
                    section, expected
                )));
            }
            if batch.len() != expected {
                return Err(ReliefError::InternalInconsistency(format!(
                    "{:?} batch has {} triangles, expected {}",
                    section,
                    batch.len(),
                    expected
                )));
            }
        }

        if batch.is_empty() {
            return Ok(());
        }

        let start = self.triangles.len();
        self.triangles.extend(batch);
        self.sections.push((section, start..self.triangles.len()));
        Ok(())
    }

    /// Number of triangles collected so far.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Finish assembly.
    pub fn finish(self) -> Result<Mesh> {
        if self.validate {
            if let Some(total) = self.expected_total {
                if self.triangles.len() != total {
                    return Err(ReliefError::InternalInconsistency(format!(
                        "assembled {} triangles, expected {}",
                        self.triangles.len(),
                        total
                    )));
                }
            }
        }
        Ok(Mesh::from_parts(self.triangles, self.sections))
    }
}

impl Default for MeshAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a relief mesh from a heightmap.
///
/// Produces the surface, then (when `options.base_height > 0`) the base
/// plate and four walls, and assembles them in that order with the walls
/// grouped top, bottom, left, right. With a zero base height the returned
/// mesh is the surface alone and [`ReliefMesh::closure`] is
/// [`Closure::OpenShell`].
///
/// # Errors
///
/// [`ReliefError::InvalidParameter`] for out-of-range options, and
/// [`ReliefError::InternalInconsistency`] if a stage produced the wrong
/// number of triangles. No partial mesh is returned on failure.
pub fn build_relief(heightmap: &Heightmap, options: &ReliefOptions) -> Result<ReliefMesh> {
    build_relief_with_progress(heightmap, options, &Progress::none())
}

/// Builds a relief mesh with progress reporting.
///
/// See [`build_relief`] for details.
pub fn build_relief_with_progress(
    heightmap: &Heightmap,
    options: &ReliefOptions,
    progress: &Progress,
) -> Result<ReliefMesh> {
    options.validate()?;

    const STEPS: usize = 3;
    let (w, h) = (heightmap.width(), heightmap.height());
    let closure = if options.has_base() {
        Closure::Watertight
    } else {
        Closure::OpenShell
    };

    let surface_count = surface_triangle_count(heightmap);
    let edges = WallEdge::all(heightmap);
    let (base_count, wall_counts) = match closure {
        Closure::Watertight => (BASE_TRIANGLES, edges.map(|e| 2 * e.segments())),
        Closure::OpenShell => (0, [0; 4]),
    };
    let total = surface_count + base_count + wall_counts.iter().sum::<usize>();

    debug!(
        "Building relief: {}x{} grid, height_scale={}, base_height={}, {} triangles",
        w, h, options.height_scale, options.base_height, total
    );

    progress.report(0, STEPS, "Meshing surface");
    let build_walls = || match closure {
        Closure::Watertight => wall_strips(
            heightmap,
            options.height_scale,
            options.base_z(),
            options.parallel,
        ),
        Closure::OpenShell => Vec::new(),
    };
    let (surface, walls) = if options.parallel {
        rayon::join(
            || surface_triangles(heightmap, options.height_scale, true),
            build_walls,
        )
    } else {
        (
            surface_triangles(heightmap, options.height_scale, false),
            build_walls(),
        )
    };
    let base = base_triangles(w, h, options.base_height);
    progress.report(1, STEPS, "Assembling");

    let mut assembler = MeshAssembler::new()
        .with_validation(options.validate)
        .with_expected_total(total);
    assembler.push(Section::Surface, surface, surface_count)?;
    assembler.push(Section::Base, base, base_count)?;

    let mut walls = walls.into_iter();
    for (side, expected) in Side::ALL.into_iter().zip(wall_counts) {
        let strip = match walls.next() {
            Some((s, strip)) if s == side => strip,
            Some((s, _)) => {
                return Err(ReliefError::InternalInconsistency(format!(
                    "wall strip for {:?} arrived in place of {:?}",
                    s, side
                )))
            }
            None => Vec::new(),
        };
        assembler.push(Section::Wall(side), strip, expected)?;
    }

    progress.report(2, STEPS, "Finishing");
    let mesh = assembler.finish()?;
    progress.report(STEPS, STEPS, "Done");

    match closure {
        Closure::Watertight => info!("Relief assembled: {} triangles", mesh.num_triangles()),
        Closure::OpenShell => warn!(
            "Relief assembled without a base: {} surface triangles form an open shell, not a closed solid",
            mesh.num_triangles()
        ),
    }

    Ok(ReliefMesh { mesh, closure })
}
