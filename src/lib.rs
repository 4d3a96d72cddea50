//! # Relief
//!
//! Turn grayscale height fields into closed, printable relief solids.
//!
//! Relief takes a `W x H` grid of elevations (typically the brightness of an
//! image) and builds a triangle mesh made of a relief surface, a flat base
//! plate, and side walls joining the two, ready for STL export and 3D
//! printing of tactile graphics.
//!
//! ## Features
//!
//! - **Validated input**: [`mesh::Heightmap`] rejects degenerate or non-finite grids
//! - **Outward winding**: every facet faces away from the solid
//! - **Parallel meshing**: rows and wall strips are built with rayon
//! - **Fabrication checks**: closure, orientation, and volume in [`algo::validate`]
//! - **File formats**: image input via `image`, STL and OBJ output
//!
//! ## Quick Start
//!
//! ```no_run
//! use relief::prelude::*;
//! use relief::io::image::{load_heightmap, AcquireOptions};
//!
//! let map = load_heightmap("photo.jpg", &AcquireOptions::default().with_size(500, 500)).unwrap();
//!
//! let options = ReliefOptions::default()
//!     .with_height_scale(10.0)
//!     .with_base_height(2.0);
//! let relief = build_relief(&map, &options).unwrap();
//!
//! relief::io::save(&relief.mesh, "photo.stl").unwrap();
//! ```
//!
//! ## Building From a Grid
//!
//! ```
//! use relief::prelude::*;
//!
//! let map = Heightmap::from_rows(&[
//!     vec![0.0, 0.5, 0.0],
//!     vec![0.5, 1.0, 0.5],
//!     vec![0.0, 0.5, 0.0],
//! ])
//! .unwrap();
//!
//! let relief = build_relief(&map, &ReliefOptions::default()).unwrap();
//! assert!(relief.is_watertight());
//!
//! // Surface first, then the base plate, then walls side by side.
//! assert_eq!(relief.mesh.section(Section::Surface).len(), 8);
//! assert_eq!(relief.mesh.section(Section::Base).len(), 2);
//! assert_eq!(relief.mesh.section(Section::Wall(Side::Left)).len(), 4);
//! ```
//!
//! ## Open Shells
//!
//! A zero base height skips the base and walls. The result is only the top
//! surface and is flagged as such:
//!
//! ```
//! use relief::prelude::*;
//!
//! let map = Heightmap::flat(3, 3, 0.0).unwrap();
//! let relief = build_relief(&map, &ReliefOptions::default().open_shell()).unwrap();
//! assert_eq!(relief.mesh.num_triangles(), 8);
//! assert_eq!(relief.closure, Closure::OpenShell);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use relief::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::relief::{build_relief, Closure, ReliefMesh, ReliefOptions};
    pub use crate::error::{ReliefError, Result};
    pub use crate::mesh::{Heightmap, Mesh, Section, Side, Triangle};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
