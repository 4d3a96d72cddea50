//! File I/O.
//!
//! This module reads height fields from images and writes meshes to disk.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | STL | `.stl` | ✓ | ✓ | Binary on save, binary or ASCII on load |
//! | Wavefront OBJ | `.obj` | ✗ | ✓ | Welded vertices |
//!
//! Images are decoded with the `image` crate; see [`image`] for the
//! heightmap acquisition steps.
//!
//! # Usage
//!
//! ```no_run
//! use relief::prelude::*;
//! use relief::algo::relief::{build_relief, ReliefOptions};
//! use relief::io::{self, image::AcquireOptions};
//!
//! let options = AcquireOptions::default().with_size(500, 500).with_blur(2.0);
//! let map = io::image::load_heightmap("photo.jpg", &options).unwrap();
//!
//! let relief = build_relief(&map, &ReliefOptions::default()).unwrap();
//! io::save(&relief.mesh, "out/photo.stl").unwrap();
//! ```

pub mod image;
pub mod obj;
pub mod stl;

use std::fs;
use std::path::Path;

use crate::error::{ReliefError, Result};
use crate::mesh::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| ReliefError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Create the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            log::debug!("Created output directory: {}", dir.display());
        }
    }
    Ok(())
}

/// Load a mesh from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// let mesh = relief::io::load("model.stl").unwrap();
/// println!("{} triangles", mesh.num_triangles());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Stl => stl::load(path),
        Format::Obj => Err(ReliefError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ loading is not supported".to_string(),
        }),
    }
}

/// Save a mesh to a file with automatic format detection.
///
/// Missing parent directories are created.
///
/// # Example
///
/// ```no_run
/// use relief::mesh::Mesh;
///
/// let mesh = Mesh::default();
/// relief::io::save(&mesh, "out/model.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Stl => stl::save(mesh, path),
        Format::Obj => obj::save(mesh, path),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b.STL"), Some(Format::Stl));
        assert_eq!(Format::from_path("mesh.obj"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.ply"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = save(&Mesh::default(), "mesh.xyz").unwrap_err();
        assert!(matches!(err, ReliefError::UnsupportedFormat { extension } if extension == "xyz"));
    }

    #[test]
    fn test_obj_load_rejected() {
        assert!(matches!(
            load("mesh.obj").unwrap_err(),
            ReliefError::LoadError { .. }
        ));
    }

    #[test]
    fn test_parent_dirs_created() {
        let path = test_util::temp_path("nested/deeper/file.stl");
        let _ = fs::remove_dir_all(path.parent().unwrap());
        ensure_parent_dir(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }
}
