//! Triangle soup representation.
//!
//! Every [`Triangle`] owns its three corner positions; nothing is shared by
//! index. A [`Mesh`] is the ordered list of triangles together with the
//! named [`Section`]s it was assembled from.

use std::collections::HashMap;
use std::ops::Range;

use nalgebra::{Point3, Vector3};

/// One of the four sides of the heightmap footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Row `y = 0`.
    Top,
    /// Row `y = H - 1`.
    Bottom,
    /// Column `x = 0`.
    Left,
    /// Column `x = W - 1`.
    Right,
}

impl Side {
    /// All sides in assembly order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

/// A contiguous run of triangles produced by one assembly stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Top relief surface.
    Surface,
    /// Flat base plate.
    Base,
    /// Side wall along one edge of the footprint.
    Wall(Side),
}

/// A single facet with counter-clockwise winding seen from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner positions in winding order.
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    /// Create a triangle from three corners.
    #[inline]
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unnormalized normal `(v1 - v0) x (v2 - v0)`.
    #[inline]
    pub fn cross(&self) -> Vector3<f64> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Unit normal, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vector3<f64> {
        self.cross().try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// Triangle area.
    pub fn area(&self) -> f64 {
        0.5 * self.cross().norm()
    }

    /// Signed volume of the tetrahedron spanned by this triangle and `apex`.
    ///
    /// Positive when `apex` lies on the inner side of the facet.
    pub fn signed_volume_from(&self, apex: &Point3<f64>) -> f64 {
        let [a, b, c] = &self.vertices;
        (a - apex).dot(&(b - apex).cross(&(c - apex))) / 6.0
    }
}

/// An ordered triangle soup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    sections: Vec<(Section, Range<usize>)>,
}

impl Mesh {
    /// Wrap an existing triangle list without section information.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            sections: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        triangles: Vec<Triangle>,
        sections: Vec<(Section, Range<usize>)>,
    ) -> Self {
        Self {
            triangles,
            sections,
        }
    }

    /// All triangles in insertion order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Sections in assembly order with their triangle ranges.
    pub fn sections(&self) -> &[(Section, Range<usize>)] {
        &self.sections
    }

    /// Triangles belonging to `section`, or an empty slice if it is absent.
    pub fn section(&self, section: Section) -> &[Triangle] {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map_or(&[][..], |(_, range)| &self.triangles[range.clone()])
    }

    /// Consume the mesh, returning the bare triangle list.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Sum of triangle areas.
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Weld bit-identical corners into an indexed vertex/face list.
    ///
    /// Face order and winding are preserved, so expanding the result back to
    /// a soup reproduces the mesh exactly.
    pub fn to_indexed(&self) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();
        let mut vertices = Vec::new();
        let mut faces = Vec::with_capacity(self.triangles.len());

        for tri in &self.triangles {
            let mut face = [0usize; 3];
            for (slot, p) in face.iter_mut().zip(tri.vertices.iter()) {
                *slot = *lookup.entry(point_key(p)).or_insert_with(|| {
                    vertices.push(*p);
                    vertices.len() - 1
                });
            }
            faces.push(face);
        }

        (vertices, faces)
    }
}

/// Exact hash key for a point; `-0.0` and `0.0` map to the same key.
#[inline]
pub(crate) fn point_key(p: &Point3<f64>) -> [u64; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Mesh {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, 0.0);
        Mesh::from_triangles(vec![Triangle::new(a, b, d), Triangle::new(b, c, d)])
    }

    #[test]
    fn test_triangle_normal_and_area() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(t.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert!((t.area() - 0.5).abs() < 1e-12);
        assert!(t.signed_volume_from(&Point3::new(0.0, 0.0, -1.0)) > 0.0);
        assert!(t.signed_volume_from(&Point3::new(0.0, 0.0, 1.0)) < 0.0);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Triangle::new(p, p, p).normal(), Vector3::zeros());
    }

    #[test]
    fn test_bounding_box_and_area() {
        let mesh = unit_square();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);
        assert!(Mesh::default().bounding_box().is_none());
    }

    #[test]
    fn test_to_indexed_welds_shared_corners() {
        let mesh = unit_square();
        let (vertices, faces) = mesh.to_indexed();
        assert_eq!(vertices.len(), 4);
        assert_eq!(faces, vec![[0, 1, 2], [1, 3, 2]]);

        // Expanding back reproduces the soup.
        for (tri, face) in mesh.triangles().iter().zip(&faces) {
            for k in 0..3 {
                assert_eq!(tri.vertices[k], vertices[face[k]]);
            }
        }
    }

    #[test]
    fn test_signed_zero_welds() {
        assert_eq!(
            point_key(&Point3::new(-0.0, 0.0, 1.0)),
            point_key(&Point3::new(0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn test_missing_section_is_empty() {
        assert!(unit_square().section(Section::Base).is_empty());
    }
}
