//! Height field to solid conversion.
//!
//! Turns a [`Heightmap`] into a closed triangle soup built from three kinds
//! of facets:
//!
//! 1. **Surface**: two triangles per grid quad, normals toward `+z`
//! 2. **Base plate**: one rectangle at `z = -base_height`, normals toward `-z`
//! 3. **Walls**: one strip per footprint side joining the surface outline to
//!    the base outline, normals pointing away from the footprint
//!
//! With `base_height == 0` only the surface is produced and the result is
//! flagged as an open shell.
//!
//! # Example
//!
//! ```
//! use relief::prelude::*;
//! use relief::algo::relief::{build_relief, ReliefOptions};
//!
//! let map = Heightmap::flat(3, 3, 0.0).unwrap();
//! let options = ReliefOptions::default()
//!     .with_height_scale(10.0)
//!     .with_base_height(2.0);
//!
//! let relief = build_relief(&map, &options).unwrap();
//! assert_eq!(relief.mesh.num_triangles(), 26);
//! assert!(relief.is_watertight());
//! ```

mod assemble;
mod base;
mod surface;
mod walls;

pub use assemble::{build_relief, build_relief_with_progress, MeshAssembler};
pub use base::{build_base_plate, BASE_TRIANGLES};
pub use surface::{mesh_surface, surface_triangle_count};
pub use walls::{stitch_walls, wall_triangle_count, Axis, Direction, WallEdge};

use crate::error::{ReliefError, Result};
use crate::mesh::Mesh;

/// Options for relief construction.
#[derive(Debug, Clone)]
pub struct ReliefOptions {
    /// Multiplier from normalized elevation to z units (must be > 0).
    pub height_scale: f64,

    /// Depth of the base plate below `z = 0` (must be >= 0).
    /// Zero disables the base plate and walls.
    pub base_height: f64,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,

    /// Whether to check batch sizes during assembly (default: true).
    pub validate: bool,
}

impl Default for ReliefOptions {
    fn default() -> Self {
        Self {
            height_scale: 10.0,
            base_height: 2.0,
            parallel: true,
            validate: true,
        }
    }
}

impl ReliefOptions {
    /// Set the elevation multiplier.
    pub fn with_height_scale(mut self, height_scale: f64) -> Self {
        self.height_scale = height_scale;
        self
    }

    /// Set the base plate depth.
    pub fn with_base_height(mut self, base_height: f64) -> Self {
        self.base_height = base_height;
        self
    }

    /// Produce the top surface only.
    pub fn open_shell(mut self) -> Self {
        self.base_height = 0.0;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set whether assembly checks batch sizes.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Whether these options produce a base plate and walls.
    #[inline]
    pub fn has_base(&self) -> bool {
        self.base_height > 0.0
    }

    /// z coordinate shared by the base plate and wall bottoms.
    #[inline]
    pub fn base_z(&self) -> f64 {
        -self.base_height
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.height_scale.is_finite() || self.height_scale <= 0.0 {
            return Err(ReliefError::invalid_param(
                "height_scale",
                self.height_scale,
                "must be a finite value greater than 0",
            ));
        }
        if !self.base_height.is_finite() || self.base_height < 0.0 {
            return Err(ReliefError::invalid_param(
                "base_height",
                self.base_height,
                "must be a finite value of at least 0",
            ));
        }
        Ok(())
    }
}

/// Whether a relief encloses a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    /// Surface, base plate, and walls form a closed solid.
    Watertight,
    /// Top surface only; fabrication tools expecting a solid will reject it.
    OpenShell,
}

/// Result of [`build_relief`].
#[derive(Debug, Clone)]
pub struct ReliefMesh {
    /// The assembled triangle soup.
    pub mesh: Mesh,
    /// Whether the mesh is closed.
    pub closure: Closure,
}

impl ReliefMesh {
    /// True when the mesh is a closed solid.
    #[inline]
    pub fn is_watertight(&self) -> bool {
        self.closure == Closure::Watertight
    }

    /// Discard the closure flag.
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = ReliefOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.has_base());
        assert_eq!(options.base_z(), -2.0);
    }

    #[test]
    fn test_height_scale_must_be_positive() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ReliefOptions::default()
                .with_height_scale(bad)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ReliefError::InvalidParameter {
                    name: "height_scale",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_base_height_must_not_be_negative() {
        assert!(ReliefOptions::default().open_shell().validate().is_ok());
        for bad in [-0.5, f64::NAN] {
            let err = ReliefOptions::default()
                .with_base_height(bad)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ReliefError::InvalidParameter {
                    name: "base_height",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_open_shell_has_no_base() {
        let options = ReliefOptions::default().open_shell();
        assert!(!options.has_base());
    }
}
