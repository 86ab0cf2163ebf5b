//! Blankets that follow the plasma contour at a normal offset.

use reactor_shapes::{Diagnostics, GeometryWarning, ShapeEnvelope};
use reactor_types::{Color, ConnectionKind, ProfilePoint};
use tracing::debug;

use crate::error::{require_finite, require_rotation_angle, ComponentError};
use crate::plasma::{PlasmaShape, PLASMA_COLOR};
use crate::thickness::ThicknessSpec;

const COMPONENT: &str = "blanket_from_plasma";

/// Parameters of a plasma-offset blanket.
#[derive(Debug, Clone)]
pub struct BlanketParams {
    pub name: String,
    pub color: Color,
    pub plasma: PlasmaShape,
    pub thickness: ThicknessSpec,
    pub offset_from_plasma: ThicknessSpec,
    /// Degrees, anticlockwise from the outboard equator.
    pub start_angle: f64,
    pub stop_angle: f64,
    pub num_points: usize,
    /// Close the profile along the machine axis.
    pub connect_to_center: bool,
    /// Drop negative-radius points silently.
    pub allow_overlapping_shape: bool,
    pub rotation_angle: f64,
}

impl BlanketParams {
    pub fn new(
        plasma: PlasmaShape,
        thickness: impl Into<ThicknessSpec>,
        start_angle: f64,
        stop_angle: f64,
    ) -> Self {
        Self {
            name: COMPONENT.to_string(),
            color: PLASMA_COLOR,
            plasma,
            thickness: thickness.into(),
            offset_from_plasma: ThicknessSpec::Constant(0.0),
            start_angle,
            stop_angle,
            num_points: 50,
            connect_to_center: false,
            allow_overlapping_shape: false,
            rotation_angle: 90.0,
        }
    }

    pub fn validate(&self) -> Result<(), ComponentError> {
        self.plasma.validate()?;
        self.thickness.validate(COMPONENT)?;
        self.offset_from_plasma.validate(COMPONENT)?;
        require_finite(COMPONENT, "start_angle", self.start_angle)?;
        require_finite(COMPONENT, "stop_angle", self.stop_angle)?;
        require_rotation_angle(COMPONENT, self.rotation_angle)?;
        if self.num_points < 2 {
            return Err(ComponentError::InvalidParameter {
                component: COMPONENT,
                reason: format!("num_points must be at least 2, got {}", self.num_points),
            });
        }
        if self.start_angle == self.stop_angle {
            return Err(ComponentError::InvalidParameter {
                component: COMPONENT,
                reason: "start_angle and stop_angle coincide".to_string(),
            });
        }
        Ok(())
    }

    fn thetas(&self) -> Vec<f64> {
        let n = self.num_points;
        (0..n)
            .map(|i| self.start_angle + (self.stop_angle - self.start_angle) * i as f64 / (n - 1) as f64)
            .collect()
    }
}

/// Offset points along `thetas`, dropping any at or behind the axis.
fn offset_curve(
    plasma: &PlasmaShape,
    thetas: impl Iterator<Item = f64>,
    offset: impl Fn(f64) -> f64,
    dropped: &mut usize,
) -> Vec<ProfilePoint> {
    let mut points: Vec<ProfilePoint> = Vec::new();
    for theta in thetas {
        let [r, z] = plasma.offset_point(theta, offset(theta));
        if r > 0.0 {
            points.push(ProfilePoint::spline(r, z));
        } else {
            *dropped += 1;
        }
    }
    if let Some(last) = points.last_mut() {
        last.connection = Some(ConnectionKind::Straight);
    }
    points
}

fn cap_to_axis(points: Vec<ProfilePoint>) -> Vec<ProfilePoint> {
    let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) else {
        return points;
    };
    let mut capped = Vec::with_capacity(points.len() + 2);
    capped.push(ProfilePoint::straight(0.0, first.y));
    capped.extend(points);
    capped.push(ProfilePoint::straight(0.0, last.y));
    capped
}

/// The closed profile of a plasma-offset blanket: the inner offset curve
/// swept `start -> stop`, then the outer curve swept back.
pub fn blanket_points(params: &BlanketParams) -> Result<(Vec<ProfilePoint>, Diagnostics), ComponentError> {
    params.validate()?;
    let thetas = params.thetas();
    let (start, stop) = (params.start_angle, params.stop_angle);
    let inner_offset = |theta: f64| params.offset_from_plasma.evaluate(theta, start, stop);
    let outer_offset =
        |theta: f64| inner_offset(theta) + params.thickness.evaluate(theta, start, stop);

    let mut dropped = 0;
    let mut inner = offset_curve(&params.plasma, thetas.iter().copied(), inner_offset, &mut dropped);
    let mut outer = offset_curve(
        &params.plasma,
        thetas.iter().rev().copied(),
        outer_offset,
        &mut dropped,
    );
    if inner.is_empty() || outer.is_empty() {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: "every offset point lies at negative radius".to_string(),
        });
    }
    if params.connect_to_center {
        inner = cap_to_axis(inner);
        outer = cap_to_axis(outer);
    }

    let mut diagnostics = Diagnostics::default();
    if dropped > 0 {
        if params.allow_overlapping_shape {
            debug!(shape = %params.name, dropped, "negative-radius points dropped");
        } else {
            diagnostics.warn(GeometryWarning::NegativeRadiusDropped {
                shape: params.name.clone(),
                dropped,
            });
        }
    }
    inner.extend(outer);
    Ok((inner, diagnostics))
}

/// Blanket volume following the plasma at a (possibly varying) offset and
/// thickness.
pub fn blanket_from_plasma(params: &BlanketParams) -> Result<ShapeEnvelope, ComponentError> {
    let (points, diagnostics) = blanket_points(params)?;
    debug!(
        name = %params.name,
        points = points.len(),
        start = params.start_angle,
        stop = params.stop_angle,
        "blanket profile"
    );
    Ok(ShapeEnvelope::new(params.name.clone(), points)
        .with_color(params.color)
        .revolved(params.rotation_angle)
        .with_diagnostics(diagnostics))
}
