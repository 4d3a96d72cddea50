//! Height field input model.
//!
//! A [`Heightmap`] is a dense, immutable `W x H` grid of normalized
//! elevations. Construction validates the grid once; everything downstream
//! reads it without further checks.

use nalgebra::Point3;

use crate::error::{ReliefError, Result};

/// A dense grid of elevations in `[0, 1]`, stored row-major.
///
/// Column `x` and row `y` map to the vertex `(x, y, h * height_scale)`.
///
/// # Example
///
/// ```
/// use relief::mesh::Heightmap;
///
/// let map = Heightmap::new(3, 2, vec![0.0, 0.5, 1.0, 0.25, 0.5, 0.75]).unwrap();
/// assert_eq!(map.width(), 3);
/// assert_eq!(map.height(), 2);
/// assert_eq!(map.get(2, 1), 0.75);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Heightmap {
    /// Create a heightmap from row-major values.
    ///
    /// Fails with [`ReliefError::InvalidHeightmap`] if either dimension is
    /// below 2 or the value count does not match, and with
    /// [`ReliefError::InvalidElevation`] for any value that is not a finite
    /// number in `[0, 1]`.
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ReliefError::InvalidHeightmap("grid is empty".to_string()));
        }
        if width < 2 || height < 2 {
            return Err(ReliefError::InvalidHeightmap(format!(
                "grid is {}x{}, need at least 2x2 to form a triangle",
                width, height
            )));
        }
        let expected = cell_count(width, height)?;
        if values.len() != expected {
            return Err(ReliefError::InvalidHeightmap(format!(
                "expected {} values for a {}x{} grid, got {}",
                expected,
                width,
                height,
                values.len()
            )));
        }

        if let Some(i) = values
            .iter()
            .position(|v| !v.is_finite() || !(0.0..=1.0).contains(v))
        {
            return Err(ReliefError::InvalidElevation {
                x: i % width,
                y: i / width,
                value: values[i],
            });
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Create a heightmap from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(y) = rows.iter().position(|r| r.len() != width) {
            return Err(ReliefError::InvalidHeightmap(format!(
                "row {} has {} values, expected {}",
                y,
                rows[y].len(),
                width
            )));
        }
        Self::new(width, height, rows.concat())
    }

    /// Create a heightmap by sampling `f(x, y)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut values = Vec::with_capacity(cell_count(width, height)?);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self::new(width, height, values)
    }

    /// Create a heightmap with every cell at the same elevation.
    pub fn flat(width: usize, height: usize, value: f64) -> Result<Self> {
        Self::new(width, height, vec![value; cell_count(width, height)?])
    }

    /// Number of columns (W).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (H).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Normalized elevation at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        self.values[y * self.width + x]
    }

    /// Row-major view of all elevations.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Surface vertex of cell `(x, y)` after scaling the elevation.
    ///
    /// Every stage that touches the top surface goes through this method, so
    /// shared boundary vertices are bit-identical between surface and walls.
    #[inline]
    pub fn vertex(&self, x: usize, y: usize, height_scale: f64) -> Point3<f64> {
        Point3::new(x as f64, y as f64, self.get(x, y) * height_scale)
    }

    /// Smallest elevation in the grid.
    pub fn min_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest elevation in the grid.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of quads in the grid, `(W - 1) * (H - 1)`.
    #[inline]
    pub fn num_quads(&self) -> usize {
        (self.width - 1) * (self.height - 1)
    }

    /// Number of unit segments around the outer boundary, `2(W - 1) + 2(H - 1)`.
    #[inline]
    pub fn perimeter_segments(&self) -> usize {
        2 * (self.width - 1) + 2 * (self.height - 1)
    }
}

/// `width * height`, or an error when the product does not fit in `usize`.
fn cell_count(width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or_else(|| {
        ReliefError::InvalidHeightmap(format!("{}x{} grid is too large", width, height))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let map = Heightmap::new(2, 2, vec![0.0, 0.25, 0.5, 1.0]).unwrap();
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(1, 0), 0.25);
        assert_eq!(map.get(0, 1), 0.5);
        assert_eq!(map.get(1, 1), 1.0);
        assert_eq!(map.num_quads(), 1);
        assert_eq!(map.perimeter_segments(), 4);
    }

    #[test]
    fn test_degenerate_dimensions_rejected() {
        for (w, h) in [(1, 5), (5, 1), (1, 1)] {
            let err = Heightmap::flat(w, h, 0.0).unwrap_err();
            assert!(err.is_invalid_heightmap(), "{}x{} should be rejected", w, h);
        }
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = Heightmap::new(0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidHeightmap(_)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Heightmap::new(3, 3, vec![0.0; 8]).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidHeightmap(_)));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let width = usize::MAX / 2 + 2;
        let err = Heightmap::new(width, 2, vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidHeightmap(_)));

        let err = Heightmap::flat(width, 2, 0.0).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidHeightmap(_)));

        let err = Heightmap::from_fn(width, 2, |_, _| 0.0).unwrap_err();
        assert!(matches!(err, ReliefError::InvalidHeightmap(_)));
    }

    #[test]
    fn test_non_finite_rejected_with_location() {
        let mut values = vec![0.5; 12];
        values[7] = f64::NAN;
        match Heightmap::new(4, 3, values).unwrap_err() {
            ReliefError::InvalidElevation { x, y, .. } => {
                assert_eq!((x, y), (3, 1));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Heightmap::flat(2, 2, f64::INFINITY).unwrap_err();
        assert!(err.is_invalid_heightmap());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Heightmap::flat(2, 2, 1.5).is_err());
        assert!(Heightmap::flat(2, 2, -0.1).is_err());
    }

    #[test]
    fn test_from_rows() {
        let map = Heightmap::from_rows(&[vec![0.0, 0.1, 0.2], vec![0.3, 0.4, 0.5]]).unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 2);
        assert_eq!(map.get(1, 1), 0.4);

        let ragged = Heightmap::from_rows(&[vec![0.0, 0.1], vec![0.3]]);
        assert!(ragged.is_err());
    }

    #[test]
    fn test_from_fn_and_extrema() {
        let map = Heightmap::from_fn(4, 4, |x, y| (x + y) as f64 / 6.0).unwrap();
        assert_eq!(map.min_value(), 0.0);
        assert_eq!(map.max_value(), 1.0);
    }

    #[test]
    fn test_vertex_scaling() {
        let map = Heightmap::flat(3, 3, 0.5).unwrap();
        let v = map.vertex(2, 1, 10.0);
        assert_eq!(v, Point3::new(2.0, 1.0, 5.0));
    }
}
