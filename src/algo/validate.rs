//! Mesh validation for fabrication.
//!
//! Checks that a triangle soup encloses a volume and that its facets face
//! outward:
//!
//! - [`open_edges`]: directed edges with no opposite partner
//! - [`inverted_triangles`]: facets whose normal points toward an interior point
//! - [`signed_volume`]: enclosed volume by the divergence theorem
//! - [`MeshReport`]: all of the above for one mesh
//!
//! The base plate of a relief is two large triangles while the walls meet it
//! in many unit segments, so plain edge matching would report every wall
//! bottom as open. [`open_edges`] therefore splits unmatched edges at any
//! unmatched vertex lying on them before matching a second time.
//!
//! # Example
//!
//! ```
//! use relief::prelude::*;
//! use relief::algo::relief::{build_relief, ReliefOptions};
//! use relief::algo::validate::MeshReport;
//!
//! let map = Heightmap::flat(4, 4, 0.5).unwrap();
//! let relief = build_relief(&map, &ReliefOptions::default()).unwrap();
//!
//! let report = MeshReport::new(&relief.mesh);
//! assert!(report.is_closed());
//! assert!((report.volume - 9.0 * 7.0).abs() < 1e-9);
//! ```

use std::collections::HashMap;
use std::fmt;

use nalgebra::Point3;

use crate::mesh::{point_key, Heightmap, Mesh, Triangle};

use super::relief::ReliefOptions;

/// A directed edge between two corners.
pub type Edge = (Point3<f64>, Point3<f64>);

type Key = [u64; 3];

/// Relative tolerance for the collinearity test in [`open_edges`].
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Enclosed volume of a closed, outward-facing triangle soup.
///
/// Open meshes give a value that depends on the origin.
pub fn signed_volume(triangles: &[Triangle]) -> f64 {
    let origin = Point3::origin();
    triangles.iter().map(|t| t.signed_volume_from(&origin)).sum()
}

/// A point strictly inside the solid built from `heightmap` with `options`.
///
/// Centered on the footprint, halfway between the base plate and the lowest
/// surface vertex. For an open shell it sits one unit below the surface.
///
/// Only reliefs that are star-shaped around this point can be checked with
/// [`inverted_triangles`]. A steep surface facet whose plane passes below the
/// point is reported even though it faces outward, so this is a sanity check
/// for gentle reliefs and not an orientation proof.
pub fn interior_reference(heightmap: &Heightmap, options: &ReliefOptions) -> Point3<f64> {
    let lowest = heightmap.min_value() * options.height_scale;
    let z = if options.has_base() {
        0.5 * (lowest + options.base_z())
    } else {
        lowest - 1.0
    };
    Point3::new(
        (heightmap.width() - 1) as f64 * 0.5,
        (heightmap.height() - 1) as f64 * 0.5,
        z,
    )
}

/// Indices of triangles facing toward `reference`.
///
/// For a star-shaped solid around `reference` this is empty exactly when
/// every normal points outward.
pub fn inverted_triangles(triangles: &[Triangle], reference: &Point3<f64>) -> Vec<usize> {
    triangles
        .iter()
        .enumerate()
        .filter(|(_, t)| t.signed_volume_from(reference) < 0.0)
        .map(|(i, _)| i)
        .collect()
}

/// Directed edges that are not cancelled by an oppositely directed edge.
///
/// Empty for a closed, consistently oriented surface, including one with
/// T-junctions along straight edges.
pub fn open_edges(triangles: &[Triangle]) -> Vec<Edge> {
    let edges = triangles.iter().flat_map(|t| {
        let [a, b, c] = t.vertices;
        [(a, b), (b, c), (c, a)]
    });
    let unmatched = cancel(edges);
    if unmatched.is_empty() {
        return unmatched;
    }

    // Candidate T-junction vertices are the endpoints of unmatched edges.
    let mut seen: HashMap<Key, Point3<f64>> = HashMap::new();
    for (a, b) in &unmatched {
        seen.entry(point_key(a)).or_insert(*a);
        seen.entry(point_key(b)).or_insert(*b);
    }
    let junctions: Vec<Point3<f64>> = seen.into_values().collect();

    let split = unmatched
        .iter()
        .flat_map(|edge| split_edge(edge, &junctions));
    cancel(split)
}

/// Net directed multiplicity per undirected edge; non-zero entries survive.
fn cancel(edges: impl IntoIterator<Item = Edge>) -> Vec<Edge> {
    let mut net: HashMap<(Key, Key), (i64, Edge)> = HashMap::new();
    let mut order: Vec<(Key, Key)> = Vec::new();

    for (a, b) in edges {
        let (ka, kb) = (point_key(&a), point_key(&b));
        if ka == kb {
            continue;
        }
        let (key, sign, canonical) = if ka < kb {
            ((ka, kb), 1, (a, b))
        } else {
            ((kb, ka), -1, (b, a))
        };
        net.entry(key)
            .or_insert_with(|| {
                order.push(key);
                (0, canonical)
            })
            .0 += sign;
    }

    let mut open = Vec::new();
    for key in order {
        let (count, (a, b)) = net[&key];
        let edge = if count > 0 { (a, b) } else { (b, a) };
        for _ in 0..count.unsigned_abs() {
            open.push(edge);
        }
    }
    open
}

/// Split `edge` at every junction strictly inside it, keeping direction.
fn split_edge(edge: &Edge, junctions: &[Point3<f64>]) -> Vec<Edge> {
    let (a, b) = *edge;
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return Vec::new();
    }

    let mut inner: Vec<(f64, Point3<f64>)> = junctions
        .iter()
        .filter_map(|p| {
            let v = p - a;
            let t = v.dot(&d) / len2;
            let off_line = v.cross(&d).norm_squared();
            let inside = t > COLLINEAR_EPSILON && t < 1.0 - COLLINEAR_EPSILON;
            (inside && off_line <= (COLLINEAR_EPSILON * len2).powi(2)).then_some((t, *p))
        })
        .collect();
    inner.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut pieces = Vec::with_capacity(inner.len() + 1);
    let mut from = a;
    for (_, p) in inner {
        pieces.push((from, p));
        from = p;
    }
    pieces.push((from, b));
    pieces
}

/// Summary of a mesh's fitness for fabrication.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    /// Number of triangles.
    pub triangles: usize,
    /// Axis-aligned bounds, if the mesh is non-empty.
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
    /// Total facet area.
    pub surface_area: f64,
    /// Signed enclosed volume (meaningful only when closed).
    pub volume: f64,
    /// Number of unmatched directed edges.
    pub open_edges: usize,
    /// Number of zero-area facets.
    pub degenerate: usize,
}

impl MeshReport {
    /// Analyze `mesh`.
    pub fn new(mesh: &Mesh) -> Self {
        let triangles = mesh.triangles();
        Self {
            triangles: triangles.len(),
            bounds: mesh.bounding_box(),
            surface_area: mesh.surface_area(),
            volume: signed_volume(triangles),
            open_edges: open_edges(triangles).len(),
            degenerate: triangles.iter().filter(|t| t.area() == 0.0).count(),
        }
    }

    /// True when every edge is matched and the mesh is non-empty.
    pub fn is_closed(&self) -> bool {
        self.triangles > 0 && self.open_edges == 0
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Triangles: {}", self.triangles)?;
        if let Some((min, max)) = self.bounds {
            writeln!(
                f,
                "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
            let diag = max - min;
            writeln!(f, "Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z)?;
        }
        writeln!(f, "Surface area: {:.6}", self.surface_area)?;
        if self.degenerate > 0 {
            writeln!(f, "Degenerate facets: {}", self.degenerate)?;
        }
        if self.is_closed() {
            writeln!(f, "Topology: Closed")?;
            write!(f, "Volume: {:.6}", self.volume)
        } else {
            write!(f, "Topology: Open ({} open edges)", self.open_edges)
        }
    }
}
