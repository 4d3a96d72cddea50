//! STL (stereolithography) format support.
//!
//! STL stores an unindexed list of facets, which is exactly a triangle soup,
//! so meshes are written facet by facet in their assembled order. Binary
//! output goes through `stl_io`; ASCII output is written directly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{ReliefError, Result};
use crate::mesh::{Mesh, Triangle};

use super::ensure_parent_dir;

/// Load a triangle soup from an STL file.
///
/// Automatically detects binary vs ASCII format. Facets keep their file
/// order and winding.
///
/// # Example
///
/// ```no_run
/// use relief::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| ReliefError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let point = |i: usize| {
        let v = &stl.vertices[i];
        Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)
    };

    let triangles = stl
        .faces
        .iter()
        .map(|f| Triangle::new(point(f.vertices[0]), point(f.vertices[1]), point(f.vertices[2])))
        .collect();

    Ok(Mesh::from_triangles(triangles))
}

fn facet(tri: &Triangle) -> ([f32; 3], [[f32; 3]; 3]) {
    // Adding 0.0 folds -0.0 into 0.0.
    let n = tri.normal().map(|c| c + 0.0);
    let [a, b, c] = &tri.vertices;
    let p = |v: &Point3<f64>| [v.x as f32, v.y as f32, v.z as f32];
    ([n.x as f32, n.y as f32, n.z as f32], [p(a), p(b), p(c)])
}

/// Save a mesh to a binary STL file.
///
/// Missing parent directories are created.
///
/// # Example
///
/// ```no_run
/// use relief::io::stl;
/// use relief::mesh::Mesh;
///
/// let mesh = Mesh::default();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .iter()
        .map(|t| {
            let (n, [a, b, c]) = facet(t);
            stl_io::Triangle {
                normal: stl_io::Normal::new(n),
                vertices: [
                    stl_io::Vertex::new(a),
                    stl_io::Vertex::new(b),
                    stl_io::Vertex::new(c),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| ReliefError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("STL saved to: {} ({} facets)", path.display(), triangles.len());
    Ok(())
}

/// Save a mesh to an ASCII STL file.
///
/// Missing parent directories are created.
pub fn save_ascii<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_ascii(mesh, "relief", &mut writer).map_err(|e| ReliefError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("ASCII STL saved to: {}", path.display());
    Ok(())
}

/// Write ASCII STL for `mesh` to `writer`.
pub fn write_ascii<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "solid {}", name)?;
    for tri in mesh.triangles() {
        let (n, corners) = facet(tri);
        writeln!(writer, "  facet normal {} {} {}", n[0], n[1], n[2])?;
        writeln!(writer, "    outer loop")?;
        for v in corners {
            writeln!(writer, "      vertex {} {} {}", v[0], v[1], v[2])?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", name)?;
    writer.flush()
}
