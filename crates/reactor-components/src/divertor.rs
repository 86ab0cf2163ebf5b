use reactor_shapes::ShapeEnvelope;
use reactor_types::{Color, DivertorRole, ProfilePoint};

use crate::error::{require_positive, require_rotation_angle, ComponentError};

const COMPONENT: &str = "divertor";

/// Annular divertor region between radii `gap` and `gap + thickness`,
/// reaching from the midplane to `height` above or below it.
pub fn divertor_envelope(
    role: DivertorRole,
    gap: f64,
    thickness: f64,
    height: f64,
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    require_positive(COMPONENT, "gap", gap)?;
    require_positive(COMPONENT, "thickness", thickness)?;
    require_positive(COMPONENT, "height", height)?;
    require_rotation_angle(COMPONENT, rotation_angle)?;

    let z = role.z_sign() * height;
    let points = vec![
        ProfilePoint::straight(gap, z),
        ProfilePoint::straight(gap, 0.0),
        ProfilePoint::straight(gap + thickness, 0.0),
        ProfilePoint::straight(gap + thickness, z),
    ];
    Ok(ShapeEnvelope::new(role.name(), points)
        .with_color(Color::rgb(0.5, 0.5, 0.5))
        .revolved(rotation_angle))
}
