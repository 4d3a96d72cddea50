//! Side walls between the surface outline and the base plate.
//!
//! All four sides run through one routine driven by a [`WallEdge`]
//! descriptor. A side is a line of grid vertices (fixed row or column)
//! walked in increasing order. Every unit segment becomes a quad between
//! the two surface vertices and the two base vertices below them, split
//! into two triangles.
//!
//! For a segment with surface corners `ta`, `tb` and base corners `ba`,
//! `bb`, the forward order `[ta, ba, bb], [ta, bb, tb]` faces `-y` on a row
//! and `+x` on a column. The mirrored order `[ta, bb, ba], [ta, tb, bb]`
//! faces the other way. Which one a side uses follows from its outward
//! direction, so the top row and left column (low sides) and the bottom row
//! and right column (high sides) end up with mirrored windings.

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::Result;
use crate::mesh::{Heightmap, Side, Triangle};

use super::ReliefOptions;

/// Grid axis a wall runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Along increasing column index (a fixed row).
    X,
    /// Along increasing row index (a fixed column).
    Y,
}

/// Sign of a direction along a grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward decreasing index.
    Negative,
    /// Toward increasing index.
    Positive,
}

/// Describes one side of the footprint for wall construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallEdge {
    /// Which side this is.
    pub side: Side,
    /// Axis the wall runs along.
    pub axis: Axis,
    /// Row (for [`Axis::X`]) or column (for [`Axis::Y`]) the wall sits on.
    pub fixed: usize,
    /// Number of grid vertices along the wall.
    pub length: usize,
    /// Direction the wall faces, along the axis perpendicular to `axis`.
    pub outward: Direction,
}

impl WallEdge {
    /// Descriptor for `side` of `heightmap`'s footprint.
    pub fn new(side: Side, heightmap: &Heightmap) -> Self {
        let (width, height) = (heightmap.width(), heightmap.height());
        let (axis, fixed, length, outward) = match side {
            Side::Top => (Axis::X, 0, width, Direction::Negative),
            Side::Bottom => (Axis::X, height - 1, width, Direction::Positive),
            Side::Left => (Axis::Y, 0, height, Direction::Negative),
            Side::Right => (Axis::Y, width - 1, height, Direction::Positive),
        };
        Self {
            side,
            axis,
            fixed,
            length,
            outward,
        }
    }

    /// All four descriptors in assembly order.
    pub fn all(heightmap: &Heightmap) -> [WallEdge; 4] {
        Side::ALL.map(|side| WallEdge::new(side, heightmap))
    }

    /// Number of unit segments along the wall; 0 for fewer than 2 vertices.
    #[inline]
    pub fn segments(&self) -> usize {
        self.length.saturating_sub(1)
    }

    /// Grid coordinate `(x, y)` of the `t`-th vertex along the wall.
    #[inline]
    pub fn cell(&self, t: usize) -> (usize, usize) {
        match self.axis {
            Axis::X => (t, self.fixed),
            Axis::Y => (self.fixed, t),
        }
    }

    /// Whether this side needs the mirrored vertex order.
    #[inline]
    pub fn mirrored(&self) -> bool {
        let forward = match self.axis {
            Axis::X => Direction::Negative,
            Axis::Y => Direction::Positive,
        };
        self.outward != forward
    }

    /// Build this side's strip, two triangles per segment in walking order.
    pub fn strip(&self, heightmap: &Heightmap, height_scale: f64, base_z: f64) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(2 * self.segments());
        let mirrored = self.mirrored();

        for t in 0..self.segments() {
            let (xa, ya) = self.cell(t);
            let (xb, yb) = self.cell(t + 1);

            let ta = heightmap.vertex(xa, ya, height_scale);
            let tb = heightmap.vertex(xb, yb, height_scale);
            let ba = Point3::new(ta.x, ta.y, base_z);
            let bb = Point3::new(tb.x, tb.y, base_z);

            if mirrored {
                triangles.push(Triangle::new(ta, bb, ba));
                triangles.push(Triangle::new(ta, tb, bb));
            } else {
                triangles.push(Triangle::new(ta, ba, bb));
                triangles.push(Triangle::new(ta, bb, tb));
            }
        }

        triangles
    }
}

/// Number of wall triangles for `heightmap`, `2 (2 (W - 1) + 2 (H - 1))`.
#[inline]
pub fn wall_triangle_count(heightmap: &Heightmap) -> usize {
    2 * heightmap.perimeter_segments()
}

/// Builds the four side walls, concatenated in the order top, bottom, left,
/// right.
///
/// Returns no triangles when `options.base_height` is 0.
///
/// # Example
///
/// ```
/// use relief::mesh::Heightmap;
/// use relief::algo::relief::{stitch_walls, ReliefOptions};
///
/// let map = Heightmap::flat(3, 3, 0.0).unwrap();
/// let walls = stitch_walls(&map, &ReliefOptions::default()).unwrap();
/// assert_eq!(walls.len(), 16);
/// ```
pub fn stitch_walls(heightmap: &Heightmap, options: &ReliefOptions) -> Result<Vec<Triangle>> {
    options.validate()?;
    if !options.has_base() {
        return Ok(Vec::new());
    }
    Ok(wall_strips(heightmap, options.height_scale, options.base_z(), options.parallel)
        .into_iter()
        .flat_map(|(_, strip)| strip)
        .collect())
}

pub(super) fn wall_strips(
    heightmap: &Heightmap,
    height_scale: f64,
    base_z: f64,
    parallel: bool,
) -> Vec<(Side, Vec<Triangle>)> {
    let edges = WallEdge::all(heightmap);
    let build = |edge: &WallEdge| (edge.side, edge.strip(heightmap, height_scale, base_z));

    if parallel {
        edges.par_iter().map(build).collect()
    } else {
        edges.iter().map(build).collect()
    }
}
