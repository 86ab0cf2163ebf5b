//! Shape Envelope: a closed 2D profile turned into a solid.
//!
//! The solid is built on first request and cached under a hash of every
//! geometry-affecting attribute. Setters clear the cache; name and colour
//! do not take part in the hash.
//!
//! Cached handles belong to the kernel session that built them. An envelope
//! is meant to be used with one kernel; a cached solid the kernel does not
//! hold is rebuilt instead of returned.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use reactor_kernel::{
    BoundingBox, Kernel, KernelId, KernelIntrospect, KernelSolidHandle, WireSegment,
};
use reactor_types::{Color, ConnectionKind, ProfilePoint, Workplane};
use tracing::debug;

use crate::boolean::{apply_boolean, fold_boolean, BooleanKind};
use crate::kernel_ext::KernelBundle;
use crate::points::build_segments;
use crate::types::{Diagnostics, GeometryWarning, ShapeError};

const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];

/// How the closed profile becomes a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solidify {
    /// Revolve about the workplane's v axis by `angle` degrees in (0, 360].
    Revolve { angle: f64 },
    /// Extrude along the workplane normal.
    Extrude { distance: f64, symmetric: bool },
}

#[derive(Debug, Clone)]
struct Cached {
    key: u64,
    solid: KernelSolidHandle,
}

#[derive(Debug, Clone)]
pub struct ShapeEnvelope {
    name: String,
    color: Color,
    points: Vec<ProfilePoint>,
    connection: ConnectionKind,
    workplane: Workplane,
    solidify: Solidify,
    seam_free: bool,
    azimuth_placement: Vec<f64>,
    azimuth_axis: Option<[f64; 3]>,
    cut: Vec<KernelSolidHandle>,
    intersect: Vec<KernelSolidHandle>,
    union: Vec<KernelSolidHandle>,
    translation: Option<[f64; 3]>,
    diagnostics: Diagnostics,
    wire_cache: Option<(u64, KernelId)>,
    solid_cache: Option<Cached>,
}

impl ShapeEnvelope {
    /// Envelope revolved a full turn on the `XZ` plane with straight
    /// connections for bare points.
    pub fn new(name: impl Into<String>, points: Vec<ProfilePoint>) -> Self {
        Self {
            name: name.into(),
            color: Color::default(),
            points,
            connection: ConnectionKind::Straight,
            workplane: Workplane::XZ,
            solidify: Solidify::Revolve { angle: 360.0 },
            seam_free: false,
            azimuth_placement: vec![0.0],
            azimuth_axis: None,
            cut: Vec::new(),
            intersect: Vec::new(),
            union: Vec::new(),
            translation: None,
            diagnostics: Diagnostics::default(),
            wire_cache: None,
            solid_cache: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_connection(mut self, connection: ConnectionKind) -> Self {
        self.connection = connection;
        self
    }

    pub fn with_workplane(mut self, workplane: Workplane) -> Self {
        self.workplane = workplane;
        self
    }

    pub fn revolved(mut self, angle: f64) -> Self {
        self.solidify = Solidify::Revolve { angle };
        self
    }

    pub fn extruded(mut self, distance: f64, symmetric: bool) -> Self {
        self.solidify = Solidify::Extrude {
            distance,
            symmetric,
        };
        self
    }

    /// Build full turns from two half revolutions so no seam face remains.
    pub fn seam_free(mut self, seam_free: bool) -> Self {
        self.seam_free = seam_free;
        self
    }

    pub fn with_azimuth_placement(mut self, angles: Vec<f64>) -> Self {
        self.azimuth_placement = angles;
        self
    }

    pub fn with_azimuth_axis(mut self, axis: [f64; 3]) -> Self {
        self.azimuth_axis = Some(axis);
        self
    }

    pub fn with_cut(mut self, cut: Vec<KernelSolidHandle>) -> Self {
        self.cut = cut;
        self
    }

    pub fn with_intersect(mut self, intersect: Vec<KernelSolidHandle>) -> Self {
        self.intersect = intersect;
        self
    }

    pub fn with_union(mut self, union: Vec<KernelSolidHandle>) -> Self {
        self.union = union;
        self
    }

    pub fn with_translation(mut self, offset: [f64; 3]) -> Self {
        self.translation = Some(offset);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn workplane(&self) -> Workplane {
        self.workplane
    }

    pub fn solidify(&self) -> Solidify {
        self.solidify
    }

    pub fn cut_shapes(&self) -> &[KernelSolidHandle] {
        &self.cut
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Whether a solid for the current parameters is cached.
    pub fn is_cached(&self) -> bool {
        matches!(&self.solid_cache, Some(c) if c.key == self.geometry_key())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_points(&mut self, points: Vec<ProfilePoint>) {
        self.points = points;
        self.invalidate();
    }

    pub fn set_rotation_angle(&mut self, angle: f64) {
        self.solidify = Solidify::Revolve { angle };
        self.invalidate();
    }

    pub fn set_workplane(&mut self, workplane: Workplane) {
        self.workplane = workplane;
        self.invalidate();
    }

    pub fn set_azimuth_placement(&mut self, angles: Vec<f64>) {
        self.azimuth_placement = angles;
        self.invalidate();
    }

    pub fn set_cut(&mut self, cut: Vec<KernelSolidHandle>) {
        self.cut = cut;
        self.invalidate();
    }

    pub fn add_cut(&mut self, cutter: KernelSolidHandle) {
        self.cut.push(cutter);
        self.invalidate();
    }

    pub fn set_intersect(&mut self, intersect: Vec<KernelSolidHandle>) {
        self.intersect = intersect;
        self.invalidate();
    }

    pub fn set_union(&mut self, union: Vec<KernelSolidHandle>) {
        self.union = union;
        self.invalidate();
    }

    pub fn set_translation(&mut self, offset: Option<[f64; 3]>) {
        self.translation = offset;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.wire_cache = None;
        self.solid_cache = None;
    }

    fn profile_key(&self) -> u64 {
        let mut h = DefaultHasher::new();
        for p in &self.points {
            p.x.to_bits().hash(&mut h);
            p.y.to_bits().hash(&mut h);
            p.connection.hash(&mut h);
        }
        self.connection.hash(&mut h);
        self.workplane.hash(&mut h);
        h.finish()
    }

    /// Hash over every attribute that affects the solid.
    pub fn geometry_key(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.profile_key().hash(&mut h);
        match self.solidify {
            Solidify::Revolve { angle } => {
                0u8.hash(&mut h);
                angle.to_bits().hash(&mut h);
            }
            Solidify::Extrude {
                distance,
                symmetric,
            } => {
                1u8.hash(&mut h);
                distance.to_bits().hash(&mut h);
                symmetric.hash(&mut h);
            }
        }
        self.seam_free.hash(&mut h);
        for a in &self.azimuth_placement {
            a.to_bits().hash(&mut h);
        }
        self.azimuth_axis
            .map(|axis| axis.map(f64::to_bits))
            .hash(&mut h);
        for (tag, list) in [(0u8, &self.cut), (1, &self.intersect), (2, &self.union)] {
            tag.hash(&mut h);
            list.hash(&mut h);
        }
        self.translation
            .map(|t| t.map(f64::to_bits))
            .hash(&mut h);
        h.finish()
    }

    /// Wire segments of the closed profile.
    pub fn segments(&self) -> Result<Vec<WireSegment>, ShapeError> {
        build_segments(&self.name, &self.points, self.connection)
    }

    /// The closed planar wire (as a kernel face) before solidification.
    pub fn wire(&mut self, kb: &mut dyn KernelBundle) -> Result<KernelId, ShapeError> {
        let key = self.profile_key();
        if let Some((cached_key, face)) = self.wire_cache {
            if cached_key == key {
                return Ok(face);
            }
        }
        let segments = self.segments()?;
        let face = kb.make_face(self.workplane, &segments)?;
        self.wire_cache = Some((key, face));
        Ok(face)
    }

    /// The solid, built on first request and cached until a geometry
    /// attribute changes.
    pub fn solid(&mut self, kb: &mut dyn KernelBundle) -> Result<KernelSolidHandle, ShapeError> {
        let key = self.geometry_key();
        let foreign = self
            .solid_cache
            .as_ref()
            .is_some_and(|c| !kb.contains_solid(&c.solid));
        if foreign {
            self.solid_cache = None;
            self.wire_cache = None;
        }
        if let Some(cached) = &self.solid_cache {
            if cached.key == key {
                return Ok(cached.solid.clone());
            }
        }

        self.diagnostics
            .warnings
            .retain(|w| !matches!(w, GeometryWarning::AzimuthalOverlap { .. }));
        let face = self.wire(kb)?;
        let mut solid = self.sweep(kb, face)?;
        solid = self.place_azimuthally(kb, solid)?;
        solid = fold_boolean(kb, &solid, &self.cut, BooleanKind::Subtract)?;
        solid = fold_boolean(kb, &solid, &self.intersect, BooleanKind::Intersect)?;
        solid = fold_boolean(kb, &solid, &self.union, BooleanKind::Union)?;
        if let Some(offset) = self.translation {
            solid = kb.translate_solid(&solid, offset)?;
        }

        debug!(name = %self.name, solid = solid.raw(), "built envelope solid");
        self.solid_cache = Some(Cached {
            key,
            solid: solid.clone(),
        });
        Ok(solid)
    }

    fn sweep(
        &self,
        kb: &mut dyn KernelBundle,
        face: KernelId,
    ) -> Result<KernelSolidHandle, ShapeError> {
        let axis = self.workplane.revolve_axis();
        match self.solidify {
            Solidify::Revolve { angle } => {
                if !(angle > 0.0 && angle <= 360.0) {
                    return Err(ShapeError::InvalidParameter {
                        shape: self.name.clone(),
                        reason: format!("rotation angle {} is outside (0, 360]", angle),
                    });
                }
                if self.seam_free && angle >= 360.0 {
                    Ok(kb.revolve_full(face, ORIGIN, axis)?)
                } else {
                    Ok(kb.revolve_face(face, ORIGIN, axis, angle.to_radians())?)
                }
            }
            Solidify::Extrude {
                distance,
                symmetric,
            } => {
                if !(distance.is_finite() && distance != 0.0) {
                    return Err(ShapeError::InvalidParameter {
                        shape: self.name.clone(),
                        reason: format!("extrusion distance {} must be non-zero", distance),
                    });
                }
                Ok(kb.extrude_face(face, self.workplane.normal(), distance, symmetric)?)
            }
        }
    }

    fn place_azimuthally(
        &mut self,
        kb: &mut dyn KernelBundle,
        solid: KernelSolidHandle,
    ) -> Result<KernelSolidHandle, ShapeError> {
        let angles = self.azimuth_placement.clone();
        if angles.is_empty() || angles == [0.0] {
            return Ok(solid);
        }
        self.check_azimuthal_overlap(&angles);
        let axis = self.azimuth_axis.unwrap_or(self.workplane.revolve_axis());
        let mut placed: Option<KernelSolidHandle> = None;
        for angle in angles {
            let copy = if angle == 0.0 {
                solid.clone()
            } else {
                kb.rotate_solid(&solid, ORIGIN, axis, angle.to_radians())?
            };
            placed = Some(match placed {
                None => copy,
                Some(acc) => apply_boolean(kb, &acc, &copy, BooleanKind::Union)?,
            });
        }
        Ok(placed.unwrap_or(solid))
    }

    fn check_azimuthal_overlap(&mut self, angles: &[f64]) {
        let mut sorted: Vec<f64> = angles.iter().map(|a| a.rem_euclid(360.0)).collect();
        sorted.sort_by(f64::total_cmp);
        let min_gap = sorted
            .windows(2)
            .map(|w| w[1] - w[0])
            .chain(sorted.first().zip(sorted.last()).map(|(f, l)| f + 360.0 - l))
            .fold(f64::INFINITY, f64::min);
        let extent = match self.solidify {
            Solidify::Revolve { angle } => angle,
            Solidify::Extrude { .. } => 0.0,
        };
        if min_gap < 1e-9 || (sorted.len() > 1 && extent > min_gap + 1e-9) {
            self.diagnostics.warn(GeometryWarning::AzimuthalOverlap {
                shape: self.name.clone(),
                angles: angles.to_vec(),
            });
        }
    }

    pub fn volume(&mut self, kb: &mut dyn KernelBundle) -> Result<f64, ShapeError> {
        let solid = self.solid(kb)?;
        Ok(kb.volume(&solid)?)
    }

    pub fn area(&mut self, kb: &mut dyn KernelBundle) -> Result<f64, ShapeError> {
        let solid = self.solid(kb)?;
        Ok(kb.surface_area(&solid)?)
    }

    pub fn bounding_box(&mut self, kb: &mut dyn KernelBundle) -> Result<BoundingBox, ShapeError> {
        let solid = self.solid(kb)?;
        Ok(kb.bounding_box(&solid)?)
    }

    pub fn largest_dimension(&mut self, kb: &mut dyn KernelBundle) -> Result<f64, ShapeError> {
        Ok(self.bounding_box(kb)?.largest_dimension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use approx::assert_relative_eq;
    use reactor_kernel::{MockKernel, MockOp};

    fn rectangle(r0: f64, r1: f64, h: f64) -> Vec<ProfilePoint> {
        vec![
            ProfilePoint::bare(r0, -h / 2.0),
            ProfilePoint::bare(r1, -h / 2.0),
            ProfilePoint::bare(r1, h / 2.0),
            ProfilePoint::bare(r0, h / 2.0),
        ]
    }

    #[test]
    fn solid_is_cached_until_a_setter_runs() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("ring", rectangle(1.0, 2.0, 2.0)).revolved(90.0);
        let first = env.solid(&mut kb).unwrap();
        let again = env.solid(&mut kb).unwrap();
        assert_eq!(first, again);
        assert!(env.is_cached());

        env.set_rotation_angle(180.0);
        assert!(!env.is_cached());
        let rebuilt = env.solid(&mut kb).unwrap();
        assert_ne!(first, rebuilt);
    }

    #[test]
    fn name_and_color_do_not_invalidate() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("ring", rectangle(1.0, 2.0, 2.0));
        let key = env.geometry_key();
        env.solid(&mut kb).unwrap();
        env.set_name("renamed");
        env.set_color(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(env.geometry_key(), key);
        assert!(env.is_cached());
    }

    #[test]
    fn seam_free_full_turn_uses_two_halves() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("torus", rectangle(3.0, 4.0, 1.0))
            .with_connection(ConnectionKind::Straight)
            .revolved(360.0)
            .seam_free(true);
        env.solid(&mut kb).unwrap();
        let log = kb.operation_log();
        assert!(log.contains(&MockOp::Revolve { angle: PI }));
        assert!(log.contains(&MockOp::Rotate { angle: PI }));
        assert!(log.contains(&MockOp::Union));
        assert!(!log
            .iter()
            .any(|op| matches!(op, MockOp::Revolve { angle } if *angle > PI)));
    }

    #[test]
    fn cut_intersect_union_run_in_order() {
        let mut kb = MockKernel::new();
        let mut tool = ShapeEnvelope::new("tool", rectangle(0.0, 1.5, 4.0));
        let tool = tool.solid(&mut kb).unwrap();
        kb.clear_log();
        let mut env = ShapeEnvelope::new("body", rectangle(1.0, 3.0, 2.0))
            .with_cut(vec![tool.clone()])
            .with_intersect(vec![tool.clone()])
            .with_union(vec![tool]);
        env.solid(&mut kb).unwrap();
        let booleans: Vec<_> = kb
            .operation_log()
            .iter()
            .filter(|op| matches!(op, MockOp::Union | MockOp::Subtract | MockOp::Intersect))
            .cloned()
            .collect();
        assert_eq!(
            booleans,
            vec![MockOp::Subtract, MockOp::Intersect, MockOp::Union]
        );
    }

    #[test]
    fn cut_reduces_volume() {
        let mut kb = MockKernel::new();
        let mut whole = ShapeEnvelope::new("body", rectangle(1.0, 3.0, 2.0));
        let mut tool = ShapeEnvelope::new("tool", rectangle(0.0, 2.0, 4.0));
        let tool = tool.solid(&mut kb).unwrap();
        let full = whole.volume(&mut kb).unwrap();
        whole.add_cut(tool);
        let cut = whole.volume(&mut kb).unwrap();
        assert!(cut < full);
    }

    #[test]
    fn azimuthal_copies_are_unioned() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("coil", rectangle(5.0, 6.0, 1.0))
            .extruded(1.0, true)
            .with_azimuth_placement(vec![0.0, 90.0, 180.0, 270.0]);
        let solid = env.solid(&mut kb).unwrap();
        assert!(kb.contains_point(&solid, [0.0, 5.5, 0.0]).unwrap());
        assert!(kb.contains_point(&solid, [-5.5, 0.0, 0.0]).unwrap());
        assert!(env.diagnostics().is_empty());
    }

    #[test]
    fn overlapping_azimuthal_copies_warn() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("wide", rectangle(5.0, 6.0, 1.0))
            .revolved(120.0)
            .with_azimuth_placement(vec![0.0, 90.0]);
        env.solid(&mut kb).unwrap();
        assert_eq!(env.diagnostics().warnings.len(), 1);
    }

    #[test]
    fn rebuilding_does_not_repeat_overlap_warnings() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("wide", rectangle(5.0, 6.0, 1.0))
            .revolved(120.0)
            .with_azimuth_placement(vec![0.0, 90.0]);
        env.solid(&mut kb).unwrap();
        env.set_translation(Some([0.0, 0.0, 1.0]));
        env.solid(&mut kb).unwrap();
        assert_eq!(env.diagnostics().warnings.len(), 1);

        env.set_azimuth_placement(vec![0.0, 180.0]);
        env.solid(&mut kb).unwrap();
        assert!(env.diagnostics().is_empty());
    }

    #[test]
    fn solid_from_another_kernel_is_rebuilt() {
        let mut first = MockKernel::new();
        let mut env = ShapeEnvelope::new("ring", rectangle(1.0, 2.0, 2.0)).revolved(90.0);
        env.solid(&mut first).unwrap();

        let mut second = MockKernel::new();
        let rebuilt = env.solid(&mut second).unwrap();
        assert!(second.contains_solid(&rebuilt));
        assert!(second.volume(&rebuilt).unwrap() > 0.0);
    }

    #[test]
    fn invalid_rotation_angle_is_rejected() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("bad", rectangle(1.0, 2.0, 1.0)).revolved(400.0);
        assert!(matches!(
            env.solid(&mut kb),
            Err(ShapeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn queries_measure_the_solid() {
        let mut kb = MockKernel::with_resolution(48);
        let mut env = ShapeEnvelope::new("ring", rectangle(1.0, 2.0, 2.0)).revolved(360.0);
        let exact = PI * 3.0 * 2.0;
        assert_relative_eq!(env.volume(&mut kb).unwrap(), exact, max_relative = 0.03);
        assert_relative_eq!(env.largest_dimension(&mut kb).unwrap(), 4.0, max_relative = 1e-6);
        let area = env.area(&mut kb).unwrap();
        assert_relative_eq!(area, 2.0 * PI * (1.0 + 2.0) * 2.0 + 2.0 * PI * 3.0, max_relative = 1e-9);
        let handle = env.solid(&mut kb).unwrap();
        assert!(kb.contains_solid(&handle));
    }

    #[test]
    fn translation_moves_the_solid() {
        let mut kb = MockKernel::new();
        let mut env = ShapeEnvelope::new("ring", rectangle(1.0, 2.0, 2.0))
            .with_translation([0.0, 0.0, 5.0]);
        let bb = env.bounding_box(&mut kb).unwrap();
        assert_relative_eq!(bb.min[2], 4.0, max_relative = 1e-6);
    }
}
