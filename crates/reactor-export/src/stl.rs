use std::fmt::Write as _;

use reactor_assembly::Assembly;
use reactor_kernel::{Kernel, RenderMesh};
use reactor_shapes::KernelBundle;
use tracing::debug;

use crate::errors::ExportError;
use crate::output::{body_file_name, ExportedFile};

/// STL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

fn facet_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
}

fn triangles(mesh: &RenderMesh) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
    mesh.indices
        .chunks_exact(3)
        .map(|t| [mesh.vertex(t[0]), mesh.vertex(t[1]), mesh.vertex(t[2])])
}

/// Encode a triangle mesh as STL. Facet normals are recomputed from the
/// winding.
pub fn mesh_to_stl(mesh: &RenderMesh, name: &str, format: StlFormat) -> Vec<u8> {
    match format {
        StlFormat::Binary => {
            let count = mesh.triangle_count();
            let mut out = Vec::with_capacity(84 + 50 * count);
            let mut header = [0u8; 80];
            let label = name.as_bytes();
            let n = label.len().min(80);
            header[..n].copy_from_slice(&label[..n]);
            out.extend_from_slice(&header);
            out.extend_from_slice(&(count as u32).to_le_bytes());
            for [a, b, c] in triangles(mesh) {
                for v in [facet_normal(a, b, c), a, b, c] {
                    for x in v {
                        out.extend_from_slice(&x.to_le_bytes());
                    }
                }
                out.extend_from_slice(&0u16.to_le_bytes());
            }
            out
        }
        StlFormat::Ascii => {
            let mut text = String::new();
            let _ = writeln!(text, "solid {}", name);
            for [a, b, c] in triangles(mesh) {
                let n = facet_normal(a, b, c);
                let _ = writeln!(text, "  facet normal {:e} {:e} {:e}", n[0], n[1], n[2]);
                let _ = writeln!(text, "    outer loop");
                for v in [a, b, c] {
                    let _ = writeln!(text, "      vertex {:e} {:e} {:e}", v[0], v[1], v[2]);
                }
                let _ = writeln!(text, "    endloop");
                let _ = writeln!(text, "  endfacet");
            }
            let _ = writeln!(text, "endsolid {}", name);
            text.into_bytes()
        }
    }
}

/// Tessellate every body and encode it as one STL file per body.
pub fn export_stl(
    assembly: &Assembly,
    kb: &mut dyn KernelBundle,
    tolerance: f64,
    format: StlFormat,
) -> Result<Vec<ExportedFile>, ExportError> {
    if assembly.is_empty() {
        return Err(ExportError::NoBodies);
    }
    let mut files = Vec::with_capacity(assembly.len());
    for (index, body) in assembly.bodies().iter().enumerate() {
        let mesh = kb
            .tessellate(&body.solid, tolerance)
            .map_err(|source| ExportError::TessellationFailed {
                body: body.name.clone(),
                source,
            })?;
        debug!(name = %body.name, triangles = mesh.triangle_count(), "stl");
        files.push(ExportedFile {
            file_name: body_file_name(index, &body.name, "stl"),
            contents: mesh_to_stl(&mesh, &body.name, format),
        });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RenderMesh {
        RenderMesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn binary_layout() {
        let bytes = mesh_to_stl(&triangle(), "plasma", StlFormat::Binary);
        assert_eq!(bytes.len(), 84 + 50);
        assert_eq!(&bytes[..6], b"plasma");
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn ascii_layout() {
        let text = String::from_utf8(mesh_to_stl(&triangle(), "layer_1", StlFormat::Ascii)).unwrap();
        assert!(text.starts_with("solid layer_1\n"));
        assert!(text.trim_end().ends_with("endsolid layer_1"));
        assert_eq!(text.matches("vertex").count(), 3);
    }

    #[test]
    fn degenerate_facets_get_a_zero_normal() {
        assert_eq!(facet_normal([0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]), [0.0; 3]);
    }
}
