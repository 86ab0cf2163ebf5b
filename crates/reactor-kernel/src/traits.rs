use std::f64::consts::PI;

use crate::types::*;

/// Core geometry kernel trait. Provides every construction and boolean
/// operation the shape layer needs.
/// Implemented by TruckKernel and by the MockKernel test double.
pub trait Kernel {
    /// Build a closed planar face from wire segments on an axis-aligned
    /// workplane through the origin. The wire is closed with a straight edge
    /// when the final point differs from the first. Faces are not consumed by
    /// later sweeps and may be swept more than once.
    fn make_face(
        &mut self,
        plane: Workplane,
        segments: &[WireSegment],
    ) -> Result<KernelId, KernelError>;

    /// Revolve a planar face around an axis by `angle` radians.
    fn revolve_face(
        &mut self,
        face: KernelId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Revolve a planar face a full turn into a closed solid with no seam
    /// faces. The default builds two half revolutions and fuses them.
    fn revolve_full(
        &mut self,
        face: KernelId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let half = self.revolve_face(face, axis_origin, axis_direction, PI)?;
        let other = self.rotate_solid(&half, axis_origin, axis_direction, PI)?;
        self.boolean_union(&half, &other)
    }

    /// Extrude a planar face along `direction` by `distance`. A symmetric
    /// extrusion spans `distance / 2` on each side of the face.
    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: [f64; 3],
        distance: f64,
        symmetric: bool,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Rigid rotation of a copy of `solid` by `angle` radians.
    fn rotate_solid(
        &mut self,
        solid: &KernelSolidHandle,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Translated copy of `solid`.
    fn translate_solid(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean intersection of two solids.
    fn boolean_intersect(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Group solids into one compound without fusing them.
    fn make_compound(
        &mut self,
        solids: &[KernelSolidHandle],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;

    /// Serialize a solid as an ISO 10303-21 (STEP) document.
    fn export_step(&mut self, solid: &KernelSolidHandle, name: &str)
        -> Result<String, KernelError>;
}

/// Read-only geometric queries on kernel solids.
pub trait KernelIntrospect {
    /// Whether the handle names a live solid of this kernel session.
    fn contains_solid(&self, solid: &KernelSolidHandle) -> bool;

    /// Enclosed volume.
    fn volume(&self, solid: &KernelSolidHandle) -> Result<f64, KernelError>;

    /// Total boundary area.
    fn surface_area(&self, solid: &KernelSolidHandle) -> Result<f64, KernelError>;

    /// Axis-aligned bounds.
    fn bounding_box(&self, solid: &KernelSolidHandle) -> Result<BoundingBox, KernelError>;

    /// Number of boundary faces.
    fn face_count(&self, solid: &KernelSolidHandle) -> Result<usize, KernelError>;
}
