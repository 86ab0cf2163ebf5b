use reactor_shapes::ShapeEnvelope;
use reactor_types::{Color, ProfilePoint};

use crate::error::{require_positive, require_rotation_angle, ComponentError};

const COMPONENT: &str = "cutting_wedge";

/// Solid sector `rotation_angle` degrees wide, for trimming full-turn
/// shapes down to a sector model.
pub fn cutting_wedge(
    height: f64,
    radius: f64,
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    require_positive(COMPONENT, "height", height)?;
    require_positive(COMPONENT, "radius", radius)?;
    require_rotation_angle(COMPONENT, rotation_angle)?;
    let points = vec![
        ProfilePoint::straight(0.0, height / 2.0),
        ProfilePoint::straight(radius, height / 2.0),
        ProfilePoint::straight(radius, -height / 2.0),
        ProfilePoint::straight(0.0, -height / 2.0),
    ];
    Ok(ShapeEnvelope::new(COMPONENT, points)
        .with_color(Color::rgb(0.0, 0.333, 0.0))
        .revolved(rotation_angle))
}
