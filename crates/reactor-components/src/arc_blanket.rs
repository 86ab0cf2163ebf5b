use reactor_shapes::ShapeEnvelope;
use reactor_types::{Color, ProfilePoint};

use crate::error::{require_finite, require_positive, require_rotation_angle, ComponentError};

const COMPONENT: &str = "blanket_constant_thickness_arc_h";

/// Blanket bounded by two three-point arcs a constant horizontal
/// `thickness` apart.
pub fn blanket_constant_thickness_arc_h(
    inner_mid_point: [f64; 2],
    inner_upper_point: [f64; 2],
    inner_lower_point: [f64; 2],
    thickness: f64,
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    for p in [inner_mid_point, inner_upper_point, inner_lower_point] {
        require_finite(COMPONENT, "point x", p[0])?;
        require_finite(COMPONENT, "point z", p[1])?;
    }
    require_positive(COMPONENT, "thickness", thickness)?;
    require_rotation_angle(COMPONENT, rotation_angle)?;
    if inner_upper_point[1] <= inner_lower_point[1] {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: "inner_upper_point must lie above inner_lower_point".to_string(),
        });
    }

    let t = thickness;
    let points = vec![
        ProfilePoint::circle(inner_upper_point[0], inner_upper_point[1]),
        ProfilePoint::circle(inner_mid_point[0], inner_mid_point[1]),
        ProfilePoint::straight(inner_lower_point[0], inner_lower_point[1]),
        ProfilePoint::circle(inner_lower_point[0] + t, inner_lower_point[1]),
        ProfilePoint::circle(inner_mid_point[0] + t, inner_mid_point[1]),
        ProfilePoint::straight(inner_upper_point[0] + t, inner_upper_point[1]),
    ];
    Ok(ShapeEnvelope::new(COMPONENT, points)
        .with_color(Color::rgb(0.0, 0.333, 0.0))
        .revolved(rotation_angle))
}
