//! TruckKernel: the B-rep kernel backed by truck.

use std::collections::HashMap;
use std::f64::consts::TAU;

use tracing::{debug, warn};
use truck_modeling::builder;
use truck_modeling::topology::{Face, Solid};
use truck_modeling::{InnerSpace, Point3, Rad, Vector3};
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;

/// Tolerance handed to truck-shapeops for every boolean.
const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Real geometry kernel backed by the truck BREP library.
///
/// Each handle maps to one or more solids: unions of overlapping solids are
/// fused, compounds keep their members apart.
pub struct TruckKernel {
    next_handle: u64,
    next_id: u64,
    bodies: HashMap<u64, Vec<Solid>>,
    faces: HashMap<u64, Face>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            next_id: 1,
            bodies: HashMap::new(),
            faces: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn store_body(&mut self, solids: Vec<Solid>) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.bodies.insert(handle.id(), solids);
        handle
    }

    pub(crate) fn get_body(&self, handle: &KernelSolidHandle) -> Result<&Vec<Solid>, KernelError> {
        self.bodies
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(handle.id()),
            })
    }

    pub(crate) fn get_face(&self, face: KernelId) -> Result<&Face, KernelError> {
        self.faces
            .get(&face.0)
            .ok_or(KernelError::EntityNotFound { id: face })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn vector(v: [f64; 3], what: &str) -> Result<Vector3, KernelError> {
    let v = Vector3::new(v[0], v[1], v[2]);
    if v.magnitude() < 1e-12 {
        return Err(KernelError::Other {
            message: format!("{} has zero length", what),
        });
    }
    Ok(v.normalize())
}

fn subtract_one(a: &Solid, b: &Solid) -> Result<Solid, KernelError> {
    // Subtraction = A ∩ ¬B. not() mutates in place.
    let mut negated = b.clone();
    negated.not();
    truck_shapeops::and(a, &negated, BOOLEAN_TOLERANCE).ok_or_else(|| KernelError::BooleanFailed {
        reason: "truck and() returned None for subtraction".to_string(),
    })
}

impl Kernel for TruckKernel {
    fn make_face(
        &mut self,
        plane: Workplane,
        segments: &[WireSegment],
    ) -> Result<KernelId, KernelError> {
        let face = primitives::build_face(plane, segments)?;
        let id = self.alloc_id();
        self.faces.insert(id.0, face);
        Ok(id)
    }

    fn revolve_face(
        &mut self,
        face: KernelId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let truck_face = self.get_face(face)?.clone();
        let origin = Point3::new(axis_origin[0], axis_origin[1], axis_origin[2]);
        let axis = vector(axis_direction, "revolve axis")?;
        let solid = builder::rsweep(&truck_face, origin, axis, Rad(angle));
        debug!(face = face.0, angle, "revolved face");
        Ok(self.store_body(vec![solid]))
    }

    fn revolve_full(
        &mut self,
        face: KernelId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        // rsweep closes the sweep on itself for a whole turn
        self.revolve_face(face, axis_origin, axis_direction, TAU)
    }

    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: [f64; 3],
        distance: f64,
        symmetric: bool,
    ) -> Result<KernelSolidHandle, KernelError> {
        let truck_face = self.get_face(face)?.clone();
        let dir = vector(direction, "extrude direction")?;
        let start = if symmetric {
            builder::translated(&truck_face, dir * (-distance / 2.0))
        } else {
            truck_face
        };
        let solid = builder::tsweep(&start, dir * distance);
        Ok(self.store_body(vec![solid]))
    }

    fn rotate_solid(
        &mut self,
        solid: &KernelSolidHandle,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let origin = Point3::new(axis_origin[0], axis_origin[1], axis_origin[2]);
        let axis = vector(axis_direction, "rotation axis")?;
        let rotated = self
            .get_body(solid)?
            .iter()
            .map(|s| builder::rotated(s, origin, axis, Rad(angle)))
            .collect();
        Ok(self.store_body(rotated))
    }

    fn translate_solid(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let v = Vector3::new(offset[0], offset[1], offset[2]);
        let moved = self
            .get_body(solid)?
            .iter()
            .map(|s| builder::translated(s, v))
            .collect();
        Ok(self.store_body(moved))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let body_a = self.get_body(a)?.clone();
        let body_b = self.get_body(b)?.clone();

        let result = match (body_a.as_slice(), body_b.as_slice()) {
            ([solid_a], [solid_b]) => {
                let fused = truck_shapeops::or(solid_a, solid_b, BOOLEAN_TOLERANCE).ok_or_else(
                    || KernelError::BooleanFailed {
                        reason: "truck or() returned None".to_string(),
                    },
                )?;
                vec![fused]
            }
            _ => body_a.into_iter().chain(body_b).collect(),
        };
        Ok(self.store_body(result))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let body_a = self.get_body(a)?.clone();
        let body_b = self.get_body(b)?.clone();

        let mut result = Vec::with_capacity(body_a.len());
        for solid in &body_a {
            let mut current = solid.clone();
            for cutter in &body_b {
                current = subtract_one(&current, cutter)?;
            }
            result.push(current);
        }
        Ok(self.store_body(result))
    }

    fn boolean_intersect(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let body_a = self.get_body(a)?.clone();
        let body_b = self.get_body(b)?.clone();

        let mut result = Vec::new();
        for solid_a in &body_a {
            for solid_b in &body_b {
                match truck_shapeops::and(solid_a, solid_b, BOOLEAN_TOLERANCE) {
                    Some(common) => result.push(common),
                    None => warn!("truck and() returned None; treating pair as disjoint"),
                }
            }
        }
        Ok(self.store_body(result))
    }

    fn make_compound(
        &mut self,
        solids: &[KernelSolidHandle],
    ) -> Result<KernelSolidHandle, KernelError> {
        let mut members = Vec::new();
        for handle in solids {
            members.extend(self.get_body(handle)?.iter().cloned());
        }
        Ok(self.store_body(members))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let body = self.get_body(solid)?;
        let mut mesh = RenderMesh::default();
        for s in body {
            let part = tessellation::tessellate_solid(s, tolerance);
            let base = (mesh.vertices.len() / 3) as u32;
            mesh.vertices.extend(part.vertices);
            mesh.normals.extend(part.normals);
            mesh.indices.extend(part.indices.into_iter().map(|i| i + base));
        }
        if mesh.indices.is_empty() {
            return Err(KernelError::TessellationFailed {
                reason: "no triangles produced".to_string(),
            });
        }
        Ok(mesh)
    }

    fn export_step(
        &mut self,
        solid: &KernelSolidHandle,
        name: &str,
    ) -> Result<String, KernelError> {
        let body = self.get_body(solid)?;
        let [single] = body.as_slice() else {
            return Err(KernelError::NotSupported {
                operation: format!("STEP export of {} with {} solids", name, body.len()),
            });
        };
        let compressed = single.compress();
        let display = CompleteStepDisplay::new(
            StepModel::from(&compressed),
            StepHeaderDescriptor::default(),
        );
        debug!(name, "exported STEP");
        Ok(display.to_string())
    }
}
