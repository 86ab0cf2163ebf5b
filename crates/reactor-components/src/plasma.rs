//! Plasma cross-section and the simplified plasma torus.

use std::f64::consts::TAU;

use reactor_shapes::ShapeEnvelope;
use reactor_types::{Color, ProfilePoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require_finite, require_positive, require_rotation_angle, ComponentError};

pub const PLASMA_COLOR: Color = Color::rgb(0.333, 0.0, 0.0);

const COMPONENT: &str = "plasma";

/// Shaping parameters of a plasma cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlasmaShape {
    pub major_radius: f64,
    pub minor_radius: f64,
    pub elongation: f64,
    pub triangularity: f64,
    #[serde(default)]
    pub vertical_displacement: f64,
}

impl PlasmaShape {
    pub fn new(major_radius: f64, minor_radius: f64, elongation: f64, triangularity: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
            elongation,
            triangularity,
            vertical_displacement: 0.0,
        }
    }

    pub fn with_vertical_displacement(mut self, dz: f64) -> Self {
        self.vertical_displacement = dz;
        self
    }

    pub fn validate(&self) -> Result<(), ComponentError> {
        require_positive(COMPONENT, "major_radius", self.major_radius)?;
        require_positive(COMPONENT, "minor_radius", self.minor_radius)?;
        require_finite(COMPONENT, "elongation", self.elongation)?;
        require_finite(COMPONENT, "triangularity", self.triangularity)?;
        require_finite(COMPONENT, "vertical_displacement", self.vertical_displacement)?;
        if self.minor_radius > self.major_radius {
            return Err(ComponentError::InvalidParameter {
                component: COMPONENT,
                reason: format!(
                    "minor_radius {} exceeds major_radius {}",
                    self.minor_radius, self.major_radius
                ),
            });
        }
        if self.elongation <= 0.0 || self.elongation > 10.0 {
            return Err(ComponentError::InvalidParameter {
                component: COMPONENT,
                reason: format!("elongation must be in (0, 10], got {}", self.elongation),
            });
        }
        if !(-1.0..=1.0).contains(&self.triangularity) {
            return Err(ComponentError::InvalidParameter {
                component: COMPONENT,
                reason: format!(
                    "triangularity must be in [-1, 1], got {}",
                    self.triangularity
                ),
            });
        }
        Ok(())
    }

    /// Surface point `(R, Z)` at poloidal angle `theta` degrees, measured
    /// anticlockwise from the outboard equator.
    pub fn point(&self, theta: f64) -> [f64; 2] {
        let t = theta.to_radians();
        [
            self.major_radius + self.minor_radius * (t + self.triangularity * t.sin()).cos(),
            self.elongation * self.minor_radius * t.sin() + self.vertical_displacement,
        ]
    }

    /// Outward unit normal at `theta` degrees, from the analytic tangent.
    pub fn normal(&self, theta: f64) -> [f64; 2] {
        let t = theta.to_radians();
        let (a, d, k) = (self.minor_radius, self.triangularity, self.elongation);
        let dr = -a * (t + d * t.sin()).sin() * (1.0 + d * t.cos());
        let dz = k * a * t.cos();
        let (nx, ny) = (dz, -dr);
        let norm = (nx * nx + ny * ny).sqrt();
        if norm < f64::EPSILON {
            return [t.cos(), t.sin()];
        }
        [nx / norm, ny / norm]
    }

    /// Point at signed normal distance `offset` from the surface.
    pub fn offset_point(&self, theta: f64, offset: f64) -> [f64; 2] {
        let p = self.point(theta);
        let n = self.normal(theta);
        [p[0] + offset * n[0], p[1] + offset * n[1]]
    }

    /// Inner and outer equatorial radii.
    pub fn equatorial_points(&self) -> (f64, f64) {
        (
            self.major_radius - self.minor_radius,
            self.major_radius + self.minor_radius,
        )
    }
}

/// Double-null plasma torus from four shaping parameters.
///
/// Full-turn plasmas are built from two half revolutions so the solid has no
/// seam face.
pub fn plasma_simplified(
    shape: &PlasmaShape,
    num_points: usize,
    rotation_angle: f64,
) -> Result<ShapeEnvelope, ComponentError> {
    shape.validate()?;
    require_rotation_angle(COMPONENT, rotation_angle)?;
    if num_points < 3 {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: format!("num_points must be at least 3, got {}", num_points),
        });
    }

    let points: Vec<ProfilePoint> = (0..num_points)
        .map(|i| {
            let theta = TAU * i as f64 / num_points as f64;
            let [r, z] = shape.point(theta.to_degrees());
            ProfilePoint::spline(r, z)
        })
        .collect();
    debug!(
        major_radius = shape.major_radius,
        minor_radius = shape.minor_radius,
        elongation = shape.elongation,
        num_points,
        "plasma profile"
    );

    Ok(ShapeEnvelope::new("plasma", points)
        .with_color(PLASMA_COLOR)
        .revolved(rotation_angle)
        .seam_free(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn iter_like() -> PlasmaShape {
        PlasmaShape::new(450.0, 150.0, 2.0, 0.55)
    }

    #[test]
    fn equator_and_top_points() {
        let shape = iter_like();
        let [r, z] = shape.point(0.0);
        assert_relative_eq!(r, 600.0);
        assert_relative_eq!(z, 0.0);
        let [r, z] = shape.point(90.0);
        assert_relative_eq!(r, 450.0 - 150.0 * 0.55f64.sin(), max_relative = 1e-12);
        assert_relative_eq!(z, 300.0, max_relative = 1e-12);
    }

    #[test]
    fn normal_points_outward() {
        let shape = iter_like();
        let n = shape.normal(0.0);
        assert_relative_eq!(n[0], 1.0, max_relative = 1e-12);
        assert!(n[1].abs() < 1e-12);
        let n = shape.normal(180.0);
        assert!(n[0] < -0.99);
        for theta in [10.0, 75.0, 130.0, 250.0, 300.0] {
            let n = shape.normal(theta);
            assert_relative_eq!(n[0].hypot(n[1]), 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn safe_bands_are_enforced() {
        let mut shape = iter_like();
        shape.triangularity = 1.5;
        assert!(matches!(
            shape.validate(),
            Err(ComponentError::InvalidParameter { .. })
        ));
        let mut shape = iter_like();
        shape.elongation = 0.0;
        assert!(shape.validate().is_err());
        let mut shape = iter_like();
        shape.major_radius = f64::NAN;
        assert!(matches!(
            shape.validate(),
            Err(ComponentError::InvalidType { .. })
        ));
    }

    #[test]
    fn plasma_envelope_carries_all_points() {
        let env = plasma_simplified(&iter_like(), 50, 180.0).unwrap();
        assert_eq!(env.points().len(), 50);
        assert_eq!(env.name(), "plasma");
        assert_eq!(env.color(), PLASMA_COLOR);
        assert!(plasma_simplified(&iter_like(), 2, 180.0).is_err());
        assert!(plasma_simplified(&iter_like(), 50, 0.0).is_err());
    }
}
