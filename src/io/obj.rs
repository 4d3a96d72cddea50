//! Wavefront OBJ export.
//!
//! OBJ is indexed, so corners are welded with [`Mesh::to_indexed`] before
//! writing. Face order and winding match the triangle soup.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ReliefError, Result};
use crate::mesh::Mesh;

use super::ensure_parent_dir;

/// Save a mesh to an OBJ file.
///
/// Missing parent directories are created.
///
/// # Example
///
/// ```no_run
/// use relief::io::obj;
/// use relief::mesh::Mesh;
///
/// obj::save(&Mesh::default(), "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write(mesh, &mut writer).map_err(|e| ReliefError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("OBJ saved to: {}", path.display());
    Ok(())
}

/// Write OBJ text for `mesh` to `writer`.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    let (vertices, faces) = mesh.to_indexed();

    writeln!(writer, "# relief")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::relief::{build_relief, ReliefOptions};
    use crate::io::test_util::temp_path;
    use crate::mesh::Heightmap;

    #[test]
    fn test_closed_relief_welds_to_shared_vertices() {
        let map = Heightmap::flat(3, 3, 0.0).unwrap();
        let mesh = build_relief(&map, &ReliefOptions::default())
            .unwrap()
            .into_mesh();

        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // 9 surface vertices + 8 base outline vertices.
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 17);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 26);
        assert!(text.contains("f 1 2 3"));
    }

    #[test]
    fn test_save_creates_file() {
        let map = Heightmap::flat(2, 2, 0.5).unwrap();
        let mesh = build_relief(&map, &ReliefOptions::default())
            .unwrap()
            .into_mesh();
        let path = temp_path("obj/out/relief.obj");
        save(&mesh, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# relief"));
    }
}
