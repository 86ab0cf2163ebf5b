//! MockKernel: deterministic CSG double implementing Kernel and KernelIntrospect.
//!
//! Solids are kept as a constructive-solid-geometry tree over exact planar
//! profiles. Point membership is exact; volumes are estimated by midpoint
//! sampling on a fixed grid over each solid's bounding box, so identical
//! geometry always yields identical volumes and a subtraction never grows
//! a sampled volume.

use std::collections::HashMap;
use std::f64::consts::TAU;

use nalgebra::{Isometry3, Point3, Unit, UnitQuaternion, Vector3};
use tracing::debug;

use crate::outline;
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

/// Default sampling resolution per bounding-box axis for volume queries.
pub const DEFAULT_RESOLUTION: usize = 32;

const GEOM_EPS: f64 = 1e-9;

/// One recorded kernel call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOp {
    MakeFace { plane: Workplane },
    Revolve { angle: f64 },
    Extrude { distance: f64, symmetric: bool },
    Rotate { angle: f64 },
    Translate { offset: [f64; 3] },
    Union,
    Subtract,
    Intersect,
    Compound { count: usize },
    Tessellate,
}

#[derive(Debug, Clone)]
struct MockFace {
    plane: Workplane,
    polygon: Vec<[f64; 2]>,
}

/// A face swept about an axis. The profile is held in `(radius, height)`
/// coordinates of the axis frame.
#[derive(Debug, Clone)]
struct Revolution {
    profile: Vec<[f64; 2]>,
    origin: Vector3<f64>,
    axis: Vector3<f64>,
    radial: Vector3<f64>,
    binormal: Vector3<f64>,
    angle: f64,
}

impl Revolution {
    fn full_turn(&self) -> bool {
        self.angle >= TAU - GEOM_EPS
    }

    fn contains(&self, p: &Vector3<f64>) -> bool {
        let rel = p - self.origin;
        let h = rel.dot(&self.axis);
        let x = rel.dot(&self.radial);
        let y = rel.dot(&self.binormal);
        if !self.full_turn() {
            let phi = y.atan2(x).rem_euclid(TAU);
            if phi > self.angle {
                return false;
            }
        }
        let rho = (x * x + y * y).sqrt();
        outline::point_in_polygon([rho, h], &self.profile)
    }

    fn world(&self, rho: f64, h: f64, phi: f64) -> [f64; 3] {
        let p = self.origin + self.axis * h + (self.radial * phi.cos() + self.binormal * phi.sin()) * rho;
        [p.x, p.y, p.z]
    }

    fn bounding_box(&self) -> BoundingBox {
        let steps = ((self.angle.min(TAU) / TAU) * 360.0).ceil().max(1.0) as usize;
        let mut bb = BoundingBox::empty();
        for &[rho, h] in &self.profile {
            for k in 0..=steps {
                let phi = self.angle.min(TAU) * k as f64 / steps as f64;
                bb.include(self.world(rho, h, phi));
            }
        }
        pad(bb)
    }

    fn surface_area(&self) -> f64 {
        let n = self.profile.len();
        let sweep = self.angle.min(TAU);
        let lateral: f64 = (0..n)
            .map(|i| {
                let (a, b) = (self.profile[i], self.profile[(i + 1) % n]);
                let len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
                len * 0.5 * (a[0] + b[0]) * sweep
            })
            .sum();
        let caps = if self.full_turn() {
            0.0
        } else {
            2.0 * outline::polygon_area(&self.profile).abs()
        };
        lateral + caps
    }
}

/// A face swept along a direction between two offsets.
#[derive(Debug, Clone)]
struct Prism {
    plane: Workplane,
    polygon: Vec<[f64; 2]>,
    direction: Vector3<f64>,
    start: f64,
    end: f64,
}

impl Prism {
    fn normal_component(&self) -> f64 {
        let n = self.plane.normal();
        self.direction.dot(&Vector3::new(n[0], n[1], n[2]))
    }

    fn contains(&self, p: &Vector3<f64>) -> bool {
        let n = self.plane.normal();
        let t = p.dot(&Vector3::new(n[0], n[1], n[2])) / self.normal_component();
        if t < self.start || t > self.end {
            return false;
        }
        let q = p - self.direction * t;
        let uv = self.plane.to_local([q.x, q.y, q.z]);
        outline::point_in_polygon(uv, &self.polygon)
    }

    fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for uv in &self.polygon {
            let base = self.plane.to_world(*uv);
            for t in [self.start, self.end] {
                bb.include([
                    base[0] + self.direction.x * t,
                    base[1] + self.direction.y * t,
                    base[2] + self.direction.z * t,
                ]);
            }
        }
        pad(bb)
    }
}

#[derive(Debug, Clone)]
enum MockNode {
    Revolved(Revolution),
    Extruded(Prism),
    Transformed {
        child: u64,
        to_world: Isometry3<f64>,
    },
    Union(Vec<u64>),
    Subtract(u64, u64),
    Intersect(u64, u64),
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    resolution: usize,
    nodes: HashMap<u64, MockNode>,
    faces: HashMap<u64, MockFace>,
    log: Vec<MockOp>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::with_resolution(DEFAULT_RESOLUTION)
    }

    /// Kernel whose volume queries sample `resolution` cells per axis.
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            resolution: resolution.max(2),
            nodes: HashMap::new(),
            faces: HashMap::new(),
            log: Vec::new(),
        }
    }

    /// Every kernel call issued so far.
    pub fn operation_log(&self) -> &[MockOp] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn store(&mut self, node: MockNode) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(h.id(), node);
        h
    }

    fn node(&self, handle: &KernelSolidHandle) -> Result<&MockNode, KernelError> {
        self.nodes
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(handle.id()),
            })
    }

    fn face(&self, face: KernelId) -> Result<&MockFace, KernelError> {
        self.faces
            .get(&face.0)
            .ok_or(KernelError::EntityNotFound { id: face })
    }

    /// Exact membership test of a world-space point.
    pub fn contains_point(
        &self,
        solid: &KernelSolidHandle,
        point: [f64; 3],
    ) -> Result<bool, KernelError> {
        self.node(solid)?;
        Ok(self.node_contains(solid.id(), &Vector3::new(point[0], point[1], point[2])))
    }

    fn node_contains(&self, id: u64, p: &Vector3<f64>) -> bool {
        match self.nodes.get(&id) {
            None => false,
            Some(MockNode::Revolved(rev)) => rev.contains(p),
            Some(MockNode::Extruded(prism)) => prism.contains(p),
            Some(MockNode::Transformed { child, to_world }) => {
                let local = to_world.inverse_transform_point(&Point3::from(*p));
                self.node_contains(*child, &local.coords)
            }
            Some(MockNode::Union(children)) => children.iter().any(|c| self.node_contains(*c, p)),
            Some(MockNode::Subtract(a, b)) => self.node_contains(*a, p) && !self.node_contains(*b, p),
            Some(MockNode::Intersect(a, b)) => self.node_contains(*a, p) && self.node_contains(*b, p),
        }
    }

    fn node_bounds(&self, id: u64) -> BoundingBox {
        match self.nodes.get(&id) {
            None => BoundingBox::empty(),
            Some(MockNode::Revolved(rev)) => rev.bounding_box(),
            Some(MockNode::Extruded(prism)) => prism.bounding_box(),
            Some(MockNode::Transformed { child, to_world }) => {
                let inner = self.node_bounds(*child);
                if inner.is_empty() {
                    return inner;
                }
                let mut bb = BoundingBox::empty();
                for c in inner.corners() {
                    let p = to_world.transform_point(&Point3::new(c[0], c[1], c[2]));
                    bb.include([p.x, p.y, p.z]);
                }
                bb
            }
            Some(MockNode::Union(children)) => children
                .iter()
                .map(|c| self.node_bounds(*c))
                .filter(|bb| !bb.is_empty())
                .fold(BoundingBox::empty(), |acc, bb| acc.union(&bb)),
            Some(MockNode::Subtract(a, _)) => self.node_bounds(*a),
            Some(MockNode::Intersect(a, b)) => {
                self.node_bounds(*a).intersection(&self.node_bounds(*b))
            }
        }
    }

    fn sampled_volume(&self, id: u64) -> f64 {
        let bb = self.node_bounds(id);
        if bb.is_empty() {
            return 0.0;
        }
        let n = self.resolution;
        let size = bb.size();
        let cell = [size[0] / n as f64, size[1] / n as f64, size[2] / n as f64];
        let mut hits = 0usize;
        for i in 0..n {
            let x = bb.min[0] + (i as f64 + 0.5) * cell[0];
            for j in 0..n {
                let y = bb.min[1] + (j as f64 + 0.5) * cell[1];
                for k in 0..n {
                    let z = bb.min[2] + (k as f64 + 0.5) * cell[2];
                    if self.node_contains(id, &Vector3::new(x, y, z)) {
                        hits += 1;
                    }
                }
            }
        }
        hits as f64 * cell[0] * cell[1] * cell[2]
    }

    fn transformed(
        &mut self,
        solid: &KernelSolidHandle,
        to_world: Isometry3<f64>,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.node(solid)?;
        Ok(self.store(MockNode::Transformed {
            child: solid.id(),
            to_world,
        }))
    }

    /// Bounding-box mesh: 12 triangles.
    fn tessellate_box(bb: &BoundingBox) -> RenderMesh {
        let corners = bb.corners();
        let quads: [([usize; 4], [f32; 3]); 6] = [
            ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([3, 7, 6, 2], [0.0, 1.0, 0.0]),
            ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
            ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
        ];
        let mut mesh = RenderMesh::default();
        for (quad, normal) in quads {
            let base = (mesh.vertices.len() / 3) as u32;
            for &c in &quad {
                let p = corners[c];
                mesh.vertices
                    .extend_from_slice(&[p[0] as f32, p[1] as f32, p[2] as f32]);
                mesh.normals.extend_from_slice(&normal);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn pad(mut bb: BoundingBox) -> BoundingBox {
    if bb.min[0] > bb.max[0] {
        return bb;
    }
    let margin = 1e-9 * bb.largest_dimension().max(1.0);
    for i in 0..3 {
        bb.min[i] -= margin;
        bb.max[i] += margin;
    }
    bb
}

fn unit(v: [f64; 3], what: &str) -> Result<Vector3<f64>, KernelError> {
    let v = Vector3::new(v[0], v[1], v[2]);
    if v.norm() < 1e-12 {
        return Err(KernelError::Other {
            message: format!("{} has zero length", what),
        });
    }
    Ok(v.normalize())
}

impl Kernel for MockKernel {
    fn make_face(
        &mut self,
        plane: Workplane,
        segments: &[WireSegment],
    ) -> Result<KernelId, KernelError> {
        let polygon = outline::flatten(segments)?;
        if outline::polygon_area(&polygon).abs() < GEOM_EPS {
            return Err(KernelError::InvalidProfile {
                reason: "wire encloses no area".to_string(),
            });
        }
        let id = self.alloc_id();
        self.faces.insert(id.0, MockFace { plane, polygon });
        self.log.push(MockOp::MakeFace { plane });
        Ok(id)
    }

    fn revolve_face(
        &mut self,
        face: KernelId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let mock_face = self.face(face)?.clone();
        let mut axis = unit(axis_direction, "revolve axis")?;
        let origin = Vector3::new(axis_origin[0], axis_origin[1], axis_origin[2]);
        let n = mock_face.plane.normal();
        let normal = Vector3::new(n[0], n[1], n[2]);
        if axis.dot(&normal).abs() > GEOM_EPS || origin.dot(&normal).abs() > GEOM_EPS {
            return Err(KernelError::NotSupported {
                operation: "revolve about an axis outside the face plane".to_string(),
            });
        }
        let mut sweep = angle;
        if sweep < 0.0 {
            axis = -axis;
            sweep = -sweep;
        }

        let world: Vec<Vector3<f64>> = mock_face
            .polygon
            .iter()
            .map(|uv| {
                let w = mock_face.plane.to_world(*uv);
                Vector3::new(w[0], w[1], w[2]) - origin
            })
            .collect();
        let mut radial = axis.cross(&normal);
        let min_r = world.iter().map(|p| p.dot(&radial)).fold(f64::INFINITY, f64::min);
        let max_r = world.iter().map(|p| p.dot(&radial)).fold(f64::NEG_INFINITY, f64::max);
        if min_r < -GEOM_EPS && max_r > GEOM_EPS {
            return Err(KernelError::InvalidProfile {
                reason: "profile crosses the revolve axis".to_string(),
            });
        }
        if max_r <= GEOM_EPS {
            radial = -radial;
        }
        let binormal = axis.cross(&radial);
        let profile = world
            .iter()
            .map(|p| [p.dot(&radial).max(0.0), p.dot(&axis)])
            .collect();

        self.log.push(MockOp::Revolve { angle });
        debug!(face = face.0, angle, "mock revolve");
        Ok(self.store(MockNode::Revolved(Revolution {
            profile,
            origin,
            axis,
            radial,
            binormal,
            angle: sweep,
        })))
    }

    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: [f64; 3],
        distance: f64,
        symmetric: bool,
    ) -> Result<KernelSolidHandle, KernelError> {
        let mock_face = self.face(face)?.clone();
        let direction = unit(direction, "extrude direction")?;
        let prism = Prism {
            plane: mock_face.plane,
            polygon: mock_face.polygon,
            direction,
            start: if symmetric { -distance / 2.0 } else { 0.0 },
            end: if symmetric { distance / 2.0 } else { distance },
        };
        if prism.normal_component().abs() < GEOM_EPS {
            return Err(KernelError::InvalidProfile {
                reason: "extrude direction lies in the face plane".to_string(),
            });
        }
        let prism = if prism.start > prism.end {
            Prism {
                start: prism.end,
                end: prism.start,
                ..prism
            }
        } else {
            prism
        };
        self.log.push(MockOp::Extrude {
            distance,
            symmetric,
        });
        Ok(self.store(MockNode::Extruded(prism)))
    }

    fn rotate_solid(
        &mut self,
        solid: &KernelSolidHandle,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let axis = Unit::new_normalize(unit(axis_direction, "rotation axis")?);
        let rotation = UnitQuaternion::from_axis_angle(&axis, angle);
        let pivot = Point3::new(axis_origin[0], axis_origin[1], axis_origin[2]);
        self.log.push(MockOp::Rotate { angle });
        self.transformed(solid, Isometry3::rotation_wrt_point(rotation, pivot))
    }

    fn translate_solid(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        self.log.push(MockOp::Translate { offset });
        self.transformed(solid, Isometry3::translation(offset[0], offset[1], offset[2]))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.node(a)?;
        self.node(b)?;
        self.log.push(MockOp::Union);
        Ok(self.store(MockNode::Union(vec![a.id(), b.id()])))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.node(a)?;
        self.node(b)?;
        self.log.push(MockOp::Subtract);
        Ok(self.store(MockNode::Subtract(a.id(), b.id())))
    }

    fn boolean_intersect(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.node(a)?;
        self.node(b)?;
        self.log.push(MockOp::Intersect);
        Ok(self.store(MockNode::Intersect(a.id(), b.id())))
    }

    fn make_compound(
        &mut self,
        solids: &[KernelSolidHandle],
    ) -> Result<KernelSolidHandle, KernelError> {
        for s in solids {
            self.node(s)?;
        }
        self.log.push(MockOp::Compound {
            count: solids.len(),
        });
        Ok(self.store(MockNode::Union(solids.iter().map(|s| s.id()).collect())))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        _tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        self.node(solid)?;
        let bb = self.node_bounds(solid.id());
        if bb.is_empty() {
            return Err(KernelError::TessellationFailed {
                reason: "solid is empty".to_string(),
            });
        }
        self.log.push(MockOp::Tessellate);
        Ok(Self::tessellate_box(&bb))
    }

    fn export_step(
        &mut self,
        _solid: &KernelSolidHandle,
        _name: &str,
    ) -> Result<String, KernelError> {
        Err(KernelError::NotSupported {
            operation: "export_step".to_string(),
        })
    }
}

impl KernelIntrospect for MockKernel {
    fn contains_solid(&self, solid: &KernelSolidHandle) -> bool {
        self.nodes.contains_key(&solid.id())
    }

    fn volume(&self, solid: &KernelSolidHandle) -> Result<f64, KernelError> {
        self.node(solid)?;
        Ok(self.sampled_volume(solid.id()))
    }

    fn surface_area(&self, solid: &KernelSolidHandle) -> Result<f64, KernelError> {
        match self.node(solid)? {
            MockNode::Revolved(rev) => Ok(rev.surface_area()),
            MockNode::Extruded(prism) if (prism.normal_component().abs() - 1.0).abs() < GEOM_EPS => {
                let depth = prism.end - prism.start;
                Ok(outline::polygon_perimeter(&prism.polygon) * depth
                    + 2.0 * outline::polygon_area(&prism.polygon).abs())
            }
            MockNode::Transformed { child, .. } => self.surface_area(&KernelSolidHandle(*child)),
            _ => Err(KernelError::NotSupported {
                operation: "surface_area of a boolean result".to_string(),
            }),
        }
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Result<BoundingBox, KernelError> {
        self.node(solid)?;
        Ok(self.node_bounds(solid.id()))
    }

    fn face_count(&self, _solid: &KernelSolidHandle) -> Result<usize, KernelError> {
        Err(KernelError::NotSupported {
            operation: "face_count".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn rectangle(u0: f64, v0: f64, u1: f64, v1: f64) -> Vec<WireSegment> {
        vec![WireSegment::Polyline(vec![
            [u0, v0],
            [u1, v0],
            [u1, v1],
            [u0, v1],
            [u0, v0],
        ])]
    }

    fn annulus(kernel: &mut MockKernel, r0: f64, r1: f64, h: f64, angle: f64) -> KernelSolidHandle {
        let face = kernel
            .make_face(Workplane::XZ, &rectangle(r0, -h / 2.0, r1, h / 2.0))
            .unwrap();
        kernel
            .revolve_face(face, [0.0; 3], [0.0, 0.0, 1.0], angle)
            .unwrap()
    }

    #[test]
    fn test_revolved_annulus_volume() {
        let mut kernel = MockKernel::with_resolution(48);
        let solid = annulus(&mut kernel, 1.0, 2.0, 2.0, 2.0 * PI);
        let exact = PI * (4.0 - 1.0) * 2.0;
        assert_relative_eq!(kernel.volume(&solid).unwrap(), exact, max_relative = 0.03);
    }

    #[test]
    fn test_half_revolution_occupies_positive_y() {
        let mut kernel = MockKernel::new();
        let solid = annulus(&mut kernel, 1.0, 2.0, 2.0, PI);
        assert!(kernel.contains_point(&solid, [0.0, 1.5, 0.0]).unwrap());
        assert!(!kernel.contains_point(&solid, [0.0, -1.5, 0.0]).unwrap());
        let bb = kernel.bounding_box(&solid).unwrap();
        assert!(bb.min[1] > -1e-6);
        assert_relative_eq!(bb.max[1], 2.0, max_relative = 1e-6);
    }

    #[test]
    fn test_subtraction_never_grows_volume() {
        let mut kernel = MockKernel::new();
        let outer = annulus(&mut kernel, 0.5, 3.0, 2.0, 2.0 * PI);
        let cutter = annulus(&mut kernel, 0.0, 1.5, 4.0, 2.0 * PI);
        let cut = kernel.boolean_subtract(&outer, &cutter).unwrap();
        assert!(kernel.volume(&cut).unwrap() < kernel.volume(&outer).unwrap());

        let overlap = kernel.boolean_intersect(&cut, &cutter).unwrap();
        assert_eq!(kernel.volume(&overlap).unwrap(), 0.0);
    }

    #[test]
    fn test_rotated_copy_and_union() {
        let mut kernel = MockKernel::new();
        let half = annulus(&mut kernel, 1.0, 2.0, 2.0, PI);
        let other = kernel
            .rotate_solid(&half, [0.0; 3], [0.0, 0.0, 1.0], PI)
            .unwrap();
        assert!(kernel.contains_point(&other, [0.0, -1.5, 0.0]).unwrap());
        let full = kernel.boolean_union(&half, &other).unwrap();
        assert!(kernel.contains_point(&full, [1.5, 0.0, 0.0]).unwrap());
        assert!(kernel.contains_point(&full, [-1.5, 0.1, 0.0]).unwrap());
        assert_eq!(
            &kernel.operation_log()[kernel.operation_log().len() - 2..],
            &[MockOp::Rotate { angle: PI }, MockOp::Union]
        );
    }

    #[test]
    fn test_symmetric_extrusion_straddles_plane() {
        let mut kernel = MockKernel::new();
        let face = kernel
            .make_face(Workplane::XZ, &rectangle(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        let solid = kernel
            .extrude_face(face, Workplane::XZ.normal(), 4.0, true)
            .unwrap();
        let bb = kernel.bounding_box(&solid).unwrap();
        assert_relative_eq!(bb.min[1], -2.0, max_relative = 1e-6);
        assert_relative_eq!(bb.max[1], 2.0, max_relative = 1e-6);
        assert_relative_eq!(kernel.surface_area(&solid).unwrap(), 4.0 * 4.0 + 2.0);
    }

    #[test]
    fn test_translate_moves_bounds() {
        let mut kernel = MockKernel::new();
        let solid = annulus(&mut kernel, 1.0, 2.0, 2.0, 2.0 * PI);
        let moved = kernel.translate_solid(&solid, [0.0, 0.0, 10.0]).unwrap();
        let bb = kernel.bounding_box(&moved).unwrap();
        assert_relative_eq!(bb.min[2], 9.0, max_relative = 1e-6);
    }

    #[test]
    fn test_profile_crossing_axis_is_rejected() {
        let mut kernel = MockKernel::new();
        let face = kernel
            .make_face(Workplane::XZ, &rectangle(-1.0, 0.0, 1.0, 1.0))
            .unwrap();
        let err = kernel
            .revolve_face(face, [0.0; 3], [0.0, 0.0, 1.0], PI)
            .unwrap_err();
        assert!(matches!(err, KernelError::InvalidProfile { .. }));
    }

    #[test]
    fn test_unknown_handle_is_reported() {
        let kernel = MockKernel::new();
        let ghost = KernelSolidHandle(99);
        assert!(!kernel.contains_solid(&ghost));
        assert!(matches!(
            kernel.volume(&ghost),
            Err(KernelError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn test_box_tessellation() {
        let mut kernel = MockKernel::new();
        let solid = annulus(&mut kernel, 1.0, 2.0, 2.0, 2.0 * PI);
        let mesh = kernel.tessellate(&solid, 0.1).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices.len(), mesh.normals.len());
    }

    #[test]
    fn test_identical_geometry_gives_identical_volume() {
        let mut a = MockKernel::new();
        let mut b = MockKernel::new();
        let sa = annulus(&mut a, 1.0, 2.5, 3.0, PI / 3.0);
        let sb = annulus(&mut b, 1.0, 2.5, 3.0, PI / 3.0);
        assert_eq!(a.volume(&sa).unwrap(), b.volume(&sb).unwrap());
    }
}
