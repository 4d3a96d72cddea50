//! Flat base plate under the relief.

use nalgebra::Point3;

use crate::error::{ReliefError, Result};
use crate::mesh::Triangle;

/// Number of triangles in a base plate.
pub const BASE_TRIANGLES: usize = 2;

/// Builds the rectangle `[0, W - 1] x [0, H - 1]` at `z = -base_height`.
///
/// Both triangles face `-z`. Returns no triangles when `base_height` is 0,
/// which leaves the relief open.
///
/// # Example
///
/// ```
/// use relief::algo::relief::build_base_plate;
///
/// let base = build_base_plate(3, 3, 2.0).unwrap();
/// assert_eq!(base.len(), 2);
/// assert!(base.iter().all(|t| t.vertices.iter().all(|v| v.z == -2.0)));
/// ```
pub fn build_base_plate(width: usize, height: usize, base_height: f64) -> Result<Vec<Triangle>> {
    if width < 2 || height < 2 {
        return Err(ReliefError::InvalidHeightmap(format!(
            "base plate needs a footprint of at least 2x2, got {}x{}",
            width, height
        )));
    }
    if !base_height.is_finite() || base_height < 0.0 {
        return Err(ReliefError::invalid_param(
            "base_height",
            base_height,
            "must be a finite value of at least 0",
        ));
    }
    Ok(base_triangles(width, height, base_height))
}

pub(super) fn base_triangles(width: usize, height: usize, base_height: f64) -> Vec<Triangle> {
    if base_height <= 0.0 {
        return Vec::new();
    }

    let z = -base_height;
    let x1 = (width - 1) as f64;
    let y1 = (height - 1) as f64;

    let p00 = Point3::new(0.0, 0.0, z);
    let p01 = Point3::new(0.0, y1, z);
    let p11 = Point3::new(x1, y1, z);
    let p10 = Point3::new(x1, 0.0, z);

    vec![Triangle::new(p00, p01, p11), Triangle::new(p00, p11, p10)]
}
