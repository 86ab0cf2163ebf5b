//! Tessellation of truck solids and mesh-based measurements.

use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

use crate::types::*;
use crate::types::BoundingBox;

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a RenderMesh, face by face.
pub fn tessellate_solid(solid: &TruckSolid, tolerance: f64) -> RenderMesh {
    let meshed_solid = solid.triangulation(tolerance);
    let mut out = RenderMesh::default();

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(face_mesh) = maybe_mesh else {
                continue;
            };
            // If face is inverted, the mesh needs inversion too
            let face_mesh = if !face.orientation() {
                let mut m = face_mesh;
                m.invert();
                m
            } else {
                face_mesh
            };
            append_mesh(&mut out, &face_mesh);
        }
    }
    out
}

/// Append every polygon of `mesh` to `out` as triangles.
fn append_mesh(out: &mut RenderMesh, mesh: &PolygonMesh) {
    let base = (out.vertices.len() / 3) as u32;
    let positions = mesh.positions();
    let normals = mesh.normals();
    for pos in positions {
        out.vertices
            .extend_from_slice(&[pos[0] as f32, pos[1] as f32, pos[2] as f32]);
    }
    if normals.len() == positions.len() {
        for n in normals {
            out.normals
                .extend_from_slice(&[n[0] as f32, n[1] as f32, n[2] as f32]);
        }
    } else {
        for _ in positions {
            out.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }
    for tri in triangles(mesh) {
        out.indices
            .extend(tri.iter().map(|&i| i as u32 + base));
    }
}

/// Triangles of a polygon mesh as position indices, fan-splitting quads and
/// larger polygons.
fn triangles(mesh: &PolygonMesh) -> Vec<[usize; 3]> {
    let mut out: Vec<[usize; 3]> = mesh
        .tri_faces()
        .iter()
        .map(|t| [t[0].pos, t[1].pos, t[2].pos])
        .collect();
    for q in mesh.quad_faces() {
        out.push([q[0].pos, q[1].pos, q[2].pos]);
        out.push([q[0].pos, q[2].pos, q[3].pos]);
    }
    for poly in mesh.other_faces() {
        for k in 1..poly.len().saturating_sub(1) {
            out.push([poly[0].pos, poly[k].pos, poly[k + 1].pos]);
        }
    }
    out
}

/// Volume, area and bounds measured on a faceted solid.
#[derive(Debug, Clone, Copy)]
pub struct MeshProperties {
    pub volume: f64,
    pub area: f64,
    pub bounds: BoundingBox,
}

/// Measure a solid on its tessellation at `tolerance`.
pub fn measure_solid(solid: &TruckSolid, tolerance: f64) -> MeshProperties {
    let mesh = solid.triangulation(tolerance).to_polygon();
    let positions = mesh.positions();
    let mut volume = 0.0;
    let mut area = 0.0;
    let mut bounds = BoundingBox::empty();
    for p in positions {
        bounds.include([p[0], p[1], p[2]]);
    }
    for [i, j, k] in triangles(&mesh) {
        let (a, b, c) = (positions[i], positions[j], positions[k]);
        let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let cross = [
            ab[1] * ac[2] - ab[2] * ac[1],
            ab[2] * ac[0] - ab[0] * ac[2],
            ab[0] * ac[1] - ab[1] * ac[0],
        ];
        area += 0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
        volume += (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0]))
            / 6.0;
    }
    MeshProperties {
        volume: volume.abs(),
        area,
        bounds,
    }
}

/// Faceting tolerance proportional to the size of the solid's vertex cloud.
pub fn query_tolerance(solid: &TruckSolid) -> f64 {
    let mut bounds = BoundingBox::empty();
    for shell in solid.boundaries().iter() {
        for v in shell.vertex_iter() {
            let p = v.point();
            bounds.include([p[0], p[1], p[2]]);
        }
    }
    let size = bounds.size();
    let diagonal = (size[0] * size[0] + size[1] * size[1] + size[2] * size[2]).sqrt();
    (diagonal * 2e-3).max(1e-3)
}
