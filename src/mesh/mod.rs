//! Core data structures.
//!
//! This module provides the height field input model and the triangle soup
//! that the relief pipeline produces.
//!
//! # Overview
//!
//! - [`Heightmap`] - validated `W x H` grid of elevations in `[0, 1]`
//! - [`Triangle`] - three corner positions with outward winding
//! - [`Mesh`] - ordered triangle soup, split into [`Section`]s
//!
//! Triangles do not share vertices by index. Use [`Mesh::to_indexed`] when a
//! welded vertex/face list is needed, e.g. for OBJ export.
//!
//! ```
//! use relief::mesh::{Heightmap, Mesh, Triangle};
//! use nalgebra::Point3;
//!
//! let map = Heightmap::flat(4, 3, 0.0).unwrap();
//! assert_eq!(map.num_quads(), 6);
//!
//! let tri = Triangle::new(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! );
//! let mesh = Mesh::from_triangles(vec![tri]);
//! assert_eq!(mesh.num_triangles(), 1);
//! ```

mod heightmap;
mod soup;

pub use heightmap::Heightmap;
pub(crate) use soup::point_key;
pub use soup::{Mesh, Section, Side, Triangle};
