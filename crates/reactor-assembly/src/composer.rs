//! The four reactor composers.
//!
//! Each walks a validated radial build and emits named bodies in a fixed
//! order. The tokamak form wraps every outboard layer around the plasma as a
//! full poloidal band; the spherical form keeps the blankets on the outboard
//! side and trims them against the inboard column.

use reactor_components::{
    blanket_from_plasma, center_column_shield_cylinder, divertor_envelope, plasma_simplified,
    BlanketParams, PlasmaShape, ReferencePoint, ThicknessSpec,
};
use reactor_kernel::{Kernel, KernelIntrospect, KernelSolidHandle};
use reactor_shapes::{
    apply_boolean, fold_boolean, BooleanKind, GeometryWarning, KernelBundle, ShapeEnvelope,
};
use reactor_types::{BuildEntry, Color, LayerKind};
use tracing::{debug, info, instrument, warn};

use crate::arithmetic::{
    count_cylinder_layers, plasma_index, sum_before_after_plasma, sum_up_to_gap_before_plasma,
    synthesize_vertical_build, total_thickness, PlasmaGeometry,
};
use crate::assembly::{Assembly, AssemblyBody, BodyRole};
use crate::error::AssemblyError;
use crate::options::{ExtraShapes, RadialBuildSpec, ReactorOptions};
use crate::validate::{validate_plasma_vertical_build, DivertorBuild, StructureError};

const BLANKET_COLOR: Color = Color::rgb(0.5, 0.5, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Tokamak,
    Spherical,
}

/// Validated builds and the scalars derived from them.
#[derive(Debug)]
struct Layout {
    radial: Vec<BuildEntry>,
    vertical: Vec<BuildEntry>,
    divertors: Vec<DivertorBuild>,
    radial_plasma: usize,
    vertical_plasma: usize,
    geometry: PlasmaGeometry,
    elongation: f64,
    /// Total vertical extent.
    height: f64,
    /// From the bottom of the vertical build to the plasma centre.
    below_plasma: f64,
}

impl Layout {
    fn new(radial: &RadialBuildSpec, vertical: &[BuildEntry]) -> Result<Self, AssemblyError> {
        let (radial, divertors) = radial.split()?;
        validate_plasma_vertical_build(vertical)?;

        let radial_plasma = plasma_index(&radial)?;
        let vertical_plasma = plasma_index(vertical)?;
        let needed = radial.len() - radial_plasma - 1;
        let available = vertical_plasma.min(vertical.len() - vertical_plasma - 1);
        if available < needed {
            return Err(StructureError::VerticalTooShort { needed, available }.into());
        }

        let geometry = PlasmaGeometry::from_radial(&radial)?;
        let elongation = geometry.elongation(vertical)?;
        let (below_plasma, _) = sum_before_after_plasma(vertical)?;
        Ok(Self {
            height: total_thickness(vertical),
            vertical: vertical.to_vec(),
            radial,
            divertors,
            radial_plasma,
            vertical_plasma,
            geometry,
            elongation,
            below_plasma,
        })
    }

    fn plasma_shape(&self, options: &ReactorOptions) -> PlasmaShape {
        PlasmaShape::new(
            self.geometry.major_radius,
            self.geometry.minor_radius,
            self.elongation,
            options.triangularity,
        )
        .with_vertical_displacement(options.vertical_displacement)
    }

    /// Vertical thicknesses `depth` entries below and above the plasma.
    fn vertical_pair(&self, depth: usize) -> (f64, f64) {
        (
            self.vertical[self.vertical_plasma - depth].thickness,
            self.vertical[self.vertical_plasma + depth].thickness,
        )
    }

    /// Radial entries after the plasma, with their distance from it.
    fn outboard(&self) -> impl Iterator<Item = (usize, BuildEntry)> + '_ {
        self.radial[self.radial_plasma + 1..]
            .iter()
            .enumerate()
            .map(|(i, e)| (i + 1, *e))
    }
}

/// Tokamak from explicit radial and vertical builds.
#[instrument(skip_all, fields(form = "tokamak"))]
pub fn tokamak(
    kb: &mut dyn KernelBundle,
    radial: &RadialBuildSpec,
    vertical: &[BuildEntry],
    options: &ReactorOptions,
    extra: &ExtraShapes,
) -> Result<Assembly, AssemblyError> {
    compose(kb, Form::Tokamak, radial, vertical, options, extra)
}

/// Tokamak whose vertical build is mirrored from the radial one, using
/// `options.elongation` for the plasma height.
#[instrument(skip_all, fields(form = "tokamak_from_plasma"))]
pub fn tokamak_from_plasma(
    kb: &mut dyn KernelBundle,
    radial: &RadialBuildSpec,
    options: &ReactorOptions,
    extra: &ExtraShapes,
) -> Result<Assembly, AssemblyError> {
    let vertical = vertical_from_plasma(radial, options)?;
    compose(kb, Form::Tokamak, radial, &vertical, options, extra)
}

/// Spherical tokamak from explicit radial and vertical builds.
#[instrument(skip_all, fields(form = "spherical_tokamak"))]
pub fn spherical_tokamak(
    kb: &mut dyn KernelBundle,
    radial: &RadialBuildSpec,
    vertical: &[BuildEntry],
    options: &ReactorOptions,
    extra: &ExtraShapes,
) -> Result<Assembly, AssemblyError> {
    compose(kb, Form::Spherical, radial, vertical, options, extra)
}

/// Spherical tokamak whose vertical build is mirrored from the radial one.
#[instrument(skip_all, fields(form = "spherical_tokamak_from_plasma"))]
pub fn spherical_tokamak_from_plasma(
    kb: &mut dyn KernelBundle,
    radial: &RadialBuildSpec,
    options: &ReactorOptions,
    extra: &ExtraShapes,
) -> Result<Assembly, AssemblyError> {
    let vertical = vertical_from_plasma(radial, options)?;
    compose(kb, Form::Spherical, radial, &vertical, options, extra)
}

fn vertical_from_plasma(
    radial: &RadialBuildSpec,
    options: &ReactorOptions,
) -> Result<Vec<BuildEntry>, AssemblyError> {
    options.validate_elongation()?;
    let (plasma_build, _) = radial.split()?;
    let vertical = synthesize_vertical_build(&plasma_build, options.elongation)?;
    debug!(entries = vertical.len(), elongation = options.elongation, "vertical build");
    Ok(vertical)
}

fn compose(
    kb: &mut dyn KernelBundle,
    form: Form,
    radial: &RadialBuildSpec,
    vertical: &[BuildEntry],
    options: &ReactorOptions,
    extra: &ExtraShapes,
) -> Result<Assembly, AssemblyError> {
    options.validate()?;
    check_extra_shapes(kb.as_introspect(), extra)?;
    let layout = Layout::new(radial, vertical)?;
    let plasma_shape = layout.plasma_shape(options);
    plasma_shape.validate()?;
    info!(
        ?form,
        major_radius = layout.geometry.major_radius,
        minor_radius = layout.geometry.minor_radius,
        elongation = layout.elongation,
        height = layout.height,
        divertors = layout.divertors.len(),
        "composing reactor"
    );

    let mut warnings = Vec::new();
    let (cylinders, mut blankets) = match form {
        Form::Tokamak => (
            tokamak_cylinders(kb, &layout, options, &mut warnings)?,
            tokamak_blankets(kb, &layout, options, &plasma_shape, &mut warnings)?,
        ),
        Form::Spherical => (
            spherical_cylinders(kb, &layout, options, &mut warnings)?,
            spherical_blankets(kb, &layout, options, &plasma_shape, &mut warnings)?,
        ),
    };
    let divertors = substitute_divertors(kb, &layout, options, &mut blankets, &mut warnings)?;

    let mut plasma_env = plasma_simplified(&plasma_shape, options.plasma_points, options.rotation_angle)?;
    let plasma = emit(kb, &mut plasma_env, BodyRole::Plasma, &mut warnings)?;

    let mut bodies = Vec::new();
    for (i, cutter) in extra.cut.iter().enumerate() {
        bodies.push(AssemblyBody {
            name: format!("extra_cut_shape_{}", i + 1),
            color: Color::default(),
            solid: cutter.clone(),
            role: BodyRole::ExtraCutShape,
        });
    }

    let reactor: Vec<KernelSolidHandle> = cylinders
        .iter()
        .chain(&blankets)
        .map(|b| b.solid.clone())
        .collect();
    if reactor.is_empty() {
        for i in 0..extra.intersect.len() {
            let warning = GeometryWarning::EmptyIntersectMask {
                shape: format!("extra_intersect_shapes_{}", i + 1),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    } else if !extra.intersect.is_empty() {
        let compound = kb.make_compound(&reactor)?;
        for (i, mask) in extra.intersect.iter().enumerate() {
            let masked = apply_boolean(kb, mask, &compound, BooleanKind::Intersect)?;
            bodies.push(AssemblyBody {
                name: format!("extra_intersect_shapes_{}", i + 1),
                color: Color::default(),
                solid: masked,
                role: BodyRole::ExtraIntersect,
            });
        }
    }

    let mut structure: Vec<AssemblyBody> = cylinders
        .into_iter()
        .chain(blankets)
        .chain(divertors)
        .collect();
    let tools: Vec<KernelSolidHandle> = extra.cut.iter().chain(&extra.intersect).cloned().collect();
    if !tools.is_empty() {
        for body in &mut structure {
            body.solid = fold_boolean(kb, &body.solid, &tools, BooleanKind::Subtract)?;
            debug!(name = %body.name, tools = tools.len(), "applied extra shapes");
        }
    }

    bodies.extend(structure);
    bodies.push(plasma);
    info!(bodies = bodies.len(), warnings = warnings.len(), "reactor composed");
    Ok(Assembly::new(bodies, warnings))
}

fn check_extra_shapes(
    kernel: &dyn KernelIntrospect,
    extra: &ExtraShapes,
) -> Result<(), AssemblyError> {
    for (list, shapes) in [
        ("extra_cut_shapes", &extra.cut),
        ("extra_intersect_shapes", &extra.intersect),
    ] {
        if let Some(index) = shapes.iter().position(|s| !kernel.contains_solid(s)) {
            return Err(AssemblyError::InvalidCutShape { list, index });
        }
    }
    Ok(())
}

/// Build an envelope's solid and wrap it as a body.
fn emit(
    kb: &mut dyn KernelBundle,
    envelope: &mut ShapeEnvelope,
    role: BodyRole,
    warnings: &mut Vec<GeometryWarning>,
) -> Result<AssemblyBody, AssemblyError> {
    let solid = envelope.solid(kb)?;
    warnings.extend(envelope.diagnostics().warnings.iter().cloned());
    debug!(name = envelope.name(), ?role, solid = solid.raw(), "body");
    Ok(AssemblyBody {
        name: envelope.name().to_string(),
        color: envelope.color(),
        solid,
        role,
    })
}

/// Midplane-centred cylinders for the inboard layers without an outboard
/// partner.
fn tokamak_cylinders(
    kb: &mut dyn KernelBundle,
    layout: &Layout,
    options: &ReactorOptions,
    warnings: &mut Vec<GeometryWarning>,
) -> Result<Vec<AssemblyBody>, AssemblyError> {
    let limit = count_cylinder_layers(&layout.radial);
    let mut radius = 0.0;
    let mut count = 0;
    let mut cylinders = Vec::with_capacity(limit);
    for entry in &layout.radial[..layout.radial_plasma] {
        if !entry.is(LayerKind::Solid) {
            radius += entry.thickness;
            continue;
        }
        count += 1;
        if count > limit {
            break;
        }
        let mut env = center_column_shield_cylinder(
            format!("layer_{}", count),
            layout.height,
            radius,
            entry.thickness,
            ReferencePoint::Center(0.0),
            options.rotation_angle,
        )?;
        cylinders.push(emit(kb, &mut env, BodyRole::InboardCylinder, warnings)?);
        radius += entry.thickness;
    }
    Ok(cylinders)
}

/// One cylinder per inboard solid up to the gap in front of the plasma,
/// standing on the bottom of the vertical build.
fn spherical_cylinders(
    kb: &mut dyn KernelBundle,
    layout: &Layout,
    options: &ReactorOptions,
    warnings: &mut Vec<GeometryWarning>,
) -> Result<Vec<AssemblyBody>, AssemblyError> {
    let inboard = &layout.radial[..layout.radial_plasma.saturating_sub(1)];
    let mut radius = 0.0;
    let mut cylinders = Vec::new();
    for entry in inboard {
        if !entry.is(LayerKind::Solid) {
            radius += entry.thickness;
            continue;
        }
        let mut env = center_column_shield_cylinder(
            format!("layer_{}", cylinders.len() + 1),
            layout.height,
            radius,
            entry.thickness,
            ReferencePoint::Lower(-layout.below_plasma),
            options.rotation_angle,
        )?;
        cylinders.push(emit(kb, &mut env, BodyRole::InboardCylinder, warnings)?);
        radius += entry.thickness;
    }
    Ok(cylinders)
}

fn blanket_params(
    layout: &Layout,
    options: &ReactorOptions,
    plasma: &PlasmaShape,
    depth: usize,
    thickness: [f64; 3],
    offset: [f64; 3],
    angles: (f64, f64),
) -> BlanketParams {
    let mut params = BlanketParams::new(
        plasma.clone(),
        ThicknessSpec::Linear(thickness.to_vec()),
        angles.0,
        angles.1,
    );
    params.name = format!("layer_{}", layout.radial_plasma + depth);
    params.color = BLANKET_COLOR;
    params.offset_from_plasma = ThicknessSpec::Linear(offset.to_vec());
    params.num_points = options.blanket_points;
    params.allow_overlapping_shape = options.allow_overlapping_shape;
    params.rotation_angle = options.rotation_angle;
    params
}

/// Full poloidal bands: an outboard half swept over the top and an inboard
/// half swept under, unioned. The inboard half pairs with the radial entry
/// the same distance in front of the plasma, and is left out when the build
/// runs out on that side.
fn tokamak_blankets(
    kb: &mut dyn KernelBundle,
    layout: &Layout,
    options: &ReactorOptions,
    plasma: &PlasmaShape,
    warnings: &mut Vec<GeometryWarning>,
) -> Result<Vec<AssemblyBody>, AssemblyError> {
    let (mut outer_sum, mut inner_sum, mut lower_sum, mut upper_sum) = (0.0, 0.0, 0.0, 0.0);
    let mut blankets = Vec::new();
    for (depth, outer) in layout.outboard() {
        let inner = layout
            .radial_plasma
            .checked_sub(depth)
            .map(|i| layout.radial[i].thickness);
        let (lower, upper) = layout.vertical_pair(depth);

        if outer.is(LayerKind::Solid) {
            let outer_params = blanket_params(
                layout,
                options,
                plasma,
                depth,
                [upper, outer.thickness, lower],
                [upper_sum, outer_sum, lower_sum],
                (90.0, -90.0),
            );
            let mut band = blanket_from_plasma(&outer_params)?;
            if let Some(inner) = inner {
                let inner_params = blanket_params(
                    layout,
                    options,
                    plasma,
                    depth,
                    [lower, inner, upper],
                    [lower_sum, inner_sum, upper_sum],
                    (-90.0, -270.0),
                );
                let mut inner_half = blanket_from_plasma(&inner_params)?;
                let inner_solid = inner_half.solid(kb)?;
                warnings.extend(inner_half.diagnostics().warnings.iter().cloned());
                band = band.with_union(vec![inner_solid]);
            }
            blankets.push(emit(kb, &mut band, BodyRole::OutboardBlanket, warnings)?);
        }

        outer_sum += outer.thickness;
        inner_sum += inner.unwrap_or(0.0);
        lower_sum += lower;
        upper_sum += upper;
    }
    Ok(blankets)
}

/// Outboard half-blankets closed along the machine axis, then trimmed by a
/// tall cylinder as wide as the inboard column.
fn spherical_blankets(
    kb: &mut dyn KernelBundle,
    layout: &Layout,
    options: &ReactorOptions,
    plasma: &PlasmaShape,
    warnings: &mut Vec<GeometryWarning>,
) -> Result<Vec<AssemblyBody>, AssemblyError> {
    let column_radius = sum_up_to_gap_before_plasma(&layout.radial)?;
    let column = if column_radius > 0.0 {
        let mut cutter = center_column_shield_cylinder(
            "blanket_cutting_cylinder",
            2.0 * layout.height,
            0.0,
            column_radius,
            ReferencePoint::Center(0.0),
            360.0,
        )?;
        Some(cutter.solid(kb)?)
    } else {
        None
    };

    let (mut radial_sum, mut lower_sum, mut upper_sum) = (0.0, 0.0, 0.0);
    let mut blankets = Vec::new();
    for (depth, entry) in layout.outboard() {
        let (lower, upper) = layout.vertical_pair(depth);
        if entry.is(LayerKind::Solid) {
            let mut params = blanket_params(
                layout,
                options,
                plasma,
                depth,
                [lower, entry.thickness, upper],
                [lower_sum, radial_sum, upper_sum],
                (-90.0, 90.0),
            );
            params.connect_to_center = true;
            let mut env = blanket_from_plasma(&params)?;
            if let Some(column) = &column {
                env = env.with_cut(vec![column.clone()]);
            }
            blankets.push(emit(kb, &mut env, BodyRole::OutboardBlanket, warnings)?);
        }
        radial_sum += entry.thickness;
        lower_sum += lower;
        upper_sum += upper;
    }
    Ok(blankets)
}

/// Emit a divertor body per divertor build, notching every blanket whose
/// bounds reach it.
fn substitute_divertors(
    kb: &mut dyn KernelBundle,
    layout: &Layout,
    options: &ReactorOptions,
    blankets: &mut [AssemblyBody],
    warnings: &mut Vec<GeometryWarning>,
) -> Result<Vec<AssemblyBody>, AssemblyError> {
    let mut divertors = Vec::with_capacity(layout.divertors.len());
    for divertor in &layout.divertors {
        let mut env = divertor_envelope(
            divertor.role,
            divertor.gap,
            divertor.thickness,
            layout.height,
            options.rotation_angle,
        )?;
        let body = emit(kb, &mut env, BodyRole::Divertor, warnings)?;
        let bounds = kb.bounding_box(&body.solid)?;
        for blanket in blankets.iter_mut() {
            if kb.bounding_box(&blanket.solid)?.overlaps(&bounds) {
                blanket.solid = apply_boolean(kb, &blanket.solid, &body.solid, BooleanKind::Subtract)?;
                debug!(blanket = %blanket.name, divertor = %body.name, "divertor notch");
            }
        }
        divertors.push(body);
    }
    Ok(divertors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reactor_kernel::MockKernel;
    use reactor_types::DivertorRole;

    fn s1() -> Vec<BuildEntry> {
        vec![
            BuildEntry::gap(10.0),
            BuildEntry::solid(50.0),
            BuildEntry::solid(15.0),
            BuildEntry::gap(50.0),
            BuildEntry::plasma(300.0),
            BuildEntry::gap(60.0),
            BuildEntry::solid(15.0),
            BuildEntry::solid(60.0),
            BuildEntry::solid(10.0),
            BuildEntry::gap(10.0),
        ]
    }

    #[test]
    fn spherical_s1_body_order_and_names() {
        let mut kb = MockKernel::new();
        let assembly = spherical_tokamak_from_plasma(
            &mut kb,
            &s1().into(),
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap();
        assert_eq!(
            assembly.names(),
            vec!["layer_1", "layer_2", "layer_6", "layer_7", "layer_8", "plasma"]
        );
        assert_eq!(assembly.with_role(BodyRole::InboardCylinder).count(), 2);
        assert_eq!(assembly.with_role(BodyRole::OutboardBlanket).count(), 3);
        assert!(assembly.warnings().is_empty());
    }

    #[test]
    fn spherical_cylinders_stand_on_the_build_floor() {
        let mut kb = MockKernel::new();
        let assembly = spherical_tokamak_from_plasma(
            &mut kb,
            &s1().into(),
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap();
        let cylinder = assembly.find("layer_1").unwrap();
        let bb = kb.bounding_box(&cylinder.solid).unwrap();
        // vertical build: 155 below the plasma, 600 plasma, 155 above
        assert_relative_eq!(bb.min[2], -455.0, max_relative = 1e-6);
        assert_relative_eq!(bb.max[2], 455.0, max_relative = 1e-6);
        assert_relative_eq!(bb.max[0], 60.0, max_relative = 1e-6);
    }

    #[test]
    fn tokamak_s1_unions_bands_without_cylinders() {
        let mut kb = MockKernel::new();
        let assembly = tokamak_from_plasma(
            &mut kb,
            &s1().into(),
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap();
        assert_eq!(assembly.with_role(BodyRole::InboardCylinder).count(), 0);
        assert_eq!(assembly.with_role(BodyRole::OutboardBlanket).count(), 3);
        assert_eq!(assembly.bodies().last().unwrap().name, "plasma");
        let unions = kb
            .operation_log()
            .iter()
            .filter(|op| matches!(op, reactor_kernel::MockOp::Union))
            .count();
        assert!(unions >= 3);
    }

    #[test]
    fn divertors_follow_blankets() {
        let mut kb = MockKernel::new();
        let radial = RadialBuildSpec::from(s1())
            .with_divertor(DivertorBuild {
                role: DivertorRole::Lower,
                gap: 300.0,
                thickness: 50.0,
            })
            .with_divertor(DivertorBuild {
                role: DivertorRole::Upper,
                gap: 300.0,
                thickness: 50.0,
            });
        let assembly = spherical_tokamak_from_plasma(
            &mut kb,
            &radial,
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap();
        let names = assembly.names();
        assert_eq!(names.len(), 8);
        assert_eq!(&names[5..], &["lower_divertor", "upper_divertor", "plasma"]);
    }

    #[test]
    fn invalid_cut_shape_abandons_composition() {
        let mut kb = MockKernel::new();
        let mut other = MockKernel::new();
        let mut foreign = reactor_components::cutting_wedge(10.0, 10.0, 90.0).unwrap();
        // handles from another session are unknown here
        let stale = foreign.solid(&mut other).unwrap();
        let extra = ExtraShapes::none().with_cut(stale);
        let err = spherical_tokamak_from_plasma(
            &mut kb,
            &s1().into(),
            &ReactorOptions::default(),
            &extra,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);
        assert!(kb.operation_log().is_empty());
    }

    #[test]
    fn short_vertical_build_is_a_structure_error() {
        let mut kb = MockKernel::new();
        let vertical = vec![
            BuildEntry::gap(10.0),
            BuildEntry::plasma(500.0),
            BuildEntry::gap(10.0),
        ];
        let err = spherical_tokamak(
            &mut kb,
            &s1().into(),
            &vertical,
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Structure(StructureError::VerticalTooShort {
                needed: 5,
                available: 1
            })
        ));
    }
}
