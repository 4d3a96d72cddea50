//! Top relief surface.

use rayon::prelude::*;

use crate::error::Result;
use crate::mesh::{Heightmap, Triangle};

use super::ReliefOptions;

/// Number of surface triangles for `heightmap`, `2 (W - 1)(H - 1)`.
#[inline]
pub fn surface_triangle_count(heightmap: &Heightmap) -> usize {
    heightmap.num_quads() * 2
}

/// Triangulates the top surface of a heightmap.
///
/// Each quad with top-left corner `(x, y)` is split along the diagonal from
/// `(x, y)` to `(x + 1, y + 1)` into
///
/// - `(x, y), (x + 1, y), (x, y + 1)`
/// - `(x + 1, y), (x + 1, y + 1), (x, y + 1)`
///
/// Quads are emitted row by row, so triangle `2 (y (W - 1) + x)` is the first
/// triangle of quad `(x, y)`. Both triangles wind counter-clockwise seen from
/// `+z`.
///
/// # Example
///
/// ```
/// use relief::mesh::Heightmap;
/// use relief::algo::relief::{mesh_surface, ReliefOptions};
///
/// let map = Heightmap::flat(4, 3, 0.5).unwrap();
/// let surface = mesh_surface(&map, &ReliefOptions::default()).unwrap();
/// assert_eq!(surface.len(), 3 * 2 * 2);
/// ```
pub fn mesh_surface(heightmap: &Heightmap, options: &ReliefOptions) -> Result<Vec<Triangle>> {
    options.validate()?;
    Ok(surface_triangles(
        heightmap,
        options.height_scale,
        options.parallel,
    ))
}

pub(super) fn surface_triangles(
    heightmap: &Heightmap,
    height_scale: f64,
    parallel: bool,
) -> Vec<Triangle> {
    let row_len = 2 * (heightmap.width() - 1);
    let origin = heightmap.vertex(0, 0, height_scale);
    let mut triangles = vec![Triangle::new(origin, origin, origin); surface_triangle_count(heightmap)];

    // Each row of quads owns a disjoint slice of the output.
    if parallel {
        triangles
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill_row(heightmap, height_scale, y, row));
    } else {
        triangles
            .chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill_row(heightmap, height_scale, y, row));
    }

    triangles
}

fn fill_row(heightmap: &Heightmap, height_scale: f64, y: usize, row: &mut [Triangle]) {
    for x in 0..heightmap.width() - 1 {
        let p00 = heightmap.vertex(x, y, height_scale);
        let p10 = heightmap.vertex(x + 1, y, height_scale);
        let p01 = heightmap.vertex(x, y + 1, height_scale);
        let p11 = heightmap.vertex(x + 1, y + 1, height_scale);

        row[2 * x] = Triangle::new(p00, p10, p01);
        row[2 * x + 1] = Triangle::new(p10, p11, p01);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn ramp(width: usize, height: usize) -> Heightmap {
        let span = (width + height - 2) as f64;
        Heightmap::from_fn(width, height, |x, y| (x + y) as f64 / span).unwrap()
    }

    #[test]
    fn test_triangle_count() {
        for (w, h) in [(2, 2), (3, 3), (5, 2), (2, 7), (16, 9)] {
            let map = Heightmap::flat(w, h, 0.0).unwrap();
            let tris = surface_triangles(&map, 1.0, false);
            assert_eq!(tris.len(), (w - 1) * (h - 1) * 2, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_vertices_inside_footprint() {
        let map = ramp(6, 4);
        for tri in surface_triangles(&map, 3.0, false) {
            for v in &tri.vertices {
                assert!(v.x >= 0.0 && v.x <= 5.0);
                assert!(v.y >= 0.0 && v.y <= 3.0);
            }
        }
    }

    #[test]
    fn test_quad_split_and_order() {
        let map = Heightmap::from_rows(&[vec![0.0, 0.1, 0.2], vec![0.3, 0.4, 0.5]]).unwrap();
        let tris = surface_triangles(&map, 10.0, false);

        // Second quad of the first row, corner (1, 0).
        let a = &tris[2];
        let b = &tris[3];
        assert_eq!(a.vertices[0], Point3::new(1.0, 0.0, 0.1 * 10.0));
        assert_eq!(a.vertices[1], Point3::new(2.0, 0.0, 0.2 * 10.0));
        assert_eq!(a.vertices[2], Point3::new(1.0, 1.0, 0.4 * 10.0));
        assert_eq!(b.vertices[0], Point3::new(2.0, 0.0, 0.2 * 10.0));
        assert_eq!(b.vertices[1], Point3::new(2.0, 1.0, 0.5 * 10.0));
        assert_eq!(b.vertices[2], Point3::new(1.0, 1.0, 0.4 * 10.0));
    }

    #[test]
    fn test_normals_face_up() {
        let map = ramp(5, 5);
        for tri in surface_triangles(&map, 2.0, false) {
            assert!(tri.cross().z > 0.0, "surface triangle faces down: {:?}", tri);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let map = Heightmap::from_fn(33, 17, |x, y| ((x * 7 + y * 13) % 11) as f64 / 10.0).unwrap();
        let seq = surface_triangles(&map, 4.0, false);
        let par = surface_triangles(&map, 4.0, true);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let map = Heightmap::flat(3, 3, 0.0).unwrap();
        let options = ReliefOptions::default().with_height_scale(0.0);
        assert!(mesh_surface(&map, &options).is_err());
    }
}
