//! Poloidal field coils and their casings.

use reactor_shapes::{KernelBundle, ShapeEnvelope};
use reactor_types::{Color, ProfilePoint};

use crate::error::{require_finite, require_positive, require_rotation_angle, ComponentError};

fn rectangle(center: [f64; 2], width: f64, height: f64) -> Vec<ProfilePoint> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        ProfilePoint::straight(center[0] + hw, center[1] + hh),
        ProfilePoint::straight(center[0] + hw, center[1] - hh),
        ProfilePoint::straight(center[0] - hw, center[1] - hh),
        ProfilePoint::straight(center[0] - hw, center[1] + hh),
    ]
}

fn check_center(component: &'static str, center: [f64; 2], half_width: f64) -> Result<(), ComponentError> {
    require_finite(component, "center x", center[0])?;
    require_finite(component, "center z", center[1])?;
    if center[0] - half_width < 0.0 {
        return Err(ComponentError::InvalidParameter {
            component,
            reason: format!(
                "coil crosses the machine axis (inner radius {})",
                center[0] - half_width
            ),
        });
    }
    Ok(())
}

/// Rectangular poloidal field coil centred on `center` `(r, z)`.
pub fn poloidal_field_coil(
    height: f64,
    width: f64,
    center: [f64; 2],
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    const COMPONENT: &str = "poloidal_field_coil";
    require_positive(COMPONENT, "height", height)?;
    require_positive(COMPONENT, "width", width)?;
    require_rotation_angle(COMPONENT, rotation_angle)?;
    check_center(COMPONENT, center, width / 2.0)?;
    Ok(ShapeEnvelope::new(COMPONENT, rectangle(center, width, height))
        .with_color(Color::rgb(0.0, 0.333, 0.0))
        .revolved(rotation_angle))
}

/// Constant-thickness casing around a rectangular poloidal field coil.
///
/// The coil itself is built immediately and subtracted from the casing.
pub fn poloidal_field_coil_case(
    kb: &mut dyn KernelBundle,
    coil_height: f64,
    coil_width: f64,
    casing_thickness: f64,
    center: [f64; 2],
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    const COMPONENT: &str = "poloidal_field_coil_case";
    require_positive(COMPONENT, "coil_height", coil_height)?;
    require_positive(COMPONENT, "coil_width", coil_width)?;
    require_positive(COMPONENT, "casing_thickness", casing_thickness)?;
    require_rotation_angle(COMPONENT, rotation_angle)?;
    check_center(COMPONENT, center, coil_width / 2.0 + casing_thickness)?;

    let mut coil = ShapeEnvelope::new(COMPONENT, rectangle(center, coil_width, coil_height))
        .revolved(rotation_angle);
    let coil = coil.solid(kb)?;
    let outer = rectangle(
        center,
        coil_width + 2.0 * casing_thickness,
        coil_height + 2.0 * casing_thickness,
    );
    Ok(ShapeEnvelope::new(COMPONENT, outer)
        .with_color(Color::rgb(1.0, 1.0, 0.498))
        .revolved(rotation_angle)
        .with_cut(vec![coil]))
}
