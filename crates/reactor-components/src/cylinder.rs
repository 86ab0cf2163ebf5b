//! Cylindrical centre-column shield.

use reactor_shapes::ShapeEnvelope;
use reactor_types::{Color, ProfilePoint};
use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_positive, require_rotation_angle, ComponentError};

const COMPONENT: &str = "center_column_shield_cylinder";

/// Vertical placement of a cylinder: the z of its centre or of its base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "z", rename_all = "snake_case")]
pub enum ReferencePoint {
    Center(f64),
    Lower(f64),
}

impl ReferencePoint {
    /// Parse a `("center" | "lower", z)` pair.
    pub fn parse(tag: &str, z: f64) -> Result<Self, ComponentError> {
        require_finite(COMPONENT, "reference point z", z)?;
        match tag {
            "center" => Ok(ReferencePoint::Center(z)),
            "lower" => Ok(ReferencePoint::Lower(z)),
            other => Err(ComponentError::InvalidParameter {
                component: COMPONENT,
                reason: format!(
                    "reference point must be \"center\" or \"lower\", got \"{}\"",
                    other
                ),
            }),
        }
    }

    /// Height of the centre of a body `height` tall.
    pub fn center_height(self, height: f64) -> f64 {
        match self {
            ReferencePoint::Center(z) => z,
            ReferencePoint::Lower(z) => z + 0.5 * height,
        }
    }

    fn z(self) -> f64 {
        match self {
            ReferencePoint::Center(z) | ReferencePoint::Lower(z) => z,
        }
    }
}

impl Default for ReferencePoint {
    fn default() -> Self {
        ReferencePoint::Center(0.0)
    }
}

/// Hollow cylinder of constant thickness revolved about the machine axis.
pub fn center_column_shield_cylinder(
    name: impl Into<String>,
    height: f64,
    inner_radius: f64,
    thickness: f64,
    reference: ReferencePoint,
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    require_positive(COMPONENT, "height", height)?;
    require_positive(COMPONENT, "thickness", thickness)?;
    require_finite(COMPONENT, "inner_radius", inner_radius)?;
    require_finite(COMPONENT, "reference point z", reference.z())?;
    require_rotation_angle(COMPONENT, rotation_angle)?;
    if inner_radius < 0.0 {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: format!("inner_radius must not be negative, got {}", inner_radius),
        });
    }

    let outer_radius = inner_radius + thickness;
    let center = reference.center_height(height);
    let (top, bottom) = (center + height / 2.0, center - height / 2.0);
    let points = vec![
        ProfilePoint::straight(inner_radius, top),
        ProfilePoint::straight(outer_radius, top),
        ProfilePoint::straight(outer_radius, bottom),
        ProfilePoint::straight(inner_radius, bottom),
    ];
    Ok(ShapeEnvelope::new(name, points)
        .with_color(Color::rgb(0.0, 0.333, 0.0))
        .revolved(rotation_angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reactor_kernel::MockKernel;

    #[test]
    fn lower_reference_lifts_the_centre() {
        assert_relative_eq!(ReferencePoint::Lower(-100.0).center_height(300.0), 50.0);
        assert_relative_eq!(ReferencePoint::Center(7.0).center_height(300.0), 7.0);
    }

    #[test]
    fn unknown_reference_tag_is_a_value_error() {
        assert!(matches!(
            ReferencePoint::parse("upper", 0.0),
            Err(ComponentError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ReferencePoint::parse("center", f64::NAN),
            Err(ComponentError::InvalidType { .. })
        ));
        assert_eq!(
            ReferencePoint::parse("lower", 3.0).unwrap(),
            ReferencePoint::Lower(3.0)
        );
    }

    #[test]
    fn cylinder_spans_its_height() {
        let mut kb = MockKernel::new();
        let mut env = center_column_shield_cylinder(
            "layer_1",
            200.0,
            10.0,
            50.0,
            ReferencePoint::Lower(-50.0),
            360.0,
        )
        .unwrap();
        let bb = env.bounding_box(&mut kb).unwrap();
        assert_relative_eq!(bb.min[2], -50.0, max_relative = 1e-6);
        assert_relative_eq!(bb.max[2], 150.0, max_relative = 1e-6);
        assert_relative_eq!(bb.max[0], 60.0, max_relative = 1e-6);
        assert_eq!(env.name(), "layer_1");
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        let build = |h, r, t, a| {
            center_column_shield_cylinder("c", h, r, t, ReferencePoint::default(), a)
        };
        assert!(build(0.0, 1.0, 1.0, 90.0).is_err());
        assert!(build(1.0, -1.0, 1.0, 90.0).is_err());
        assert!(build(1.0, 1.0, -1.0, 90.0).is_err());
        assert!(build(1.0, 1.0, 1.0, 361.0).is_err());
    }
}
