//! Dished heads and the vessels built from them.

use std::f64::consts::FRAC_PI_2;

use reactor_shapes::ShapeEnvelope;
use reactor_types::{Color, ProfilePoint};
use serde::{Deserialize, Serialize};

use crate::cylinder::{center_column_shield_cylinder, ReferencePoint};
use crate::error::{require_finite, require_positive, require_rotation_angle, ComponentError};

const DOME: &str = "constant_thickness_dome";

/// Which way a dome curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomeSide {
    Upper,
    Lower,
}

impl DomeSide {
    pub fn parse(tag: &str) -> Result<Self, ComponentError> {
        match tag {
            "upper" => Ok(DomeSide::Upper),
            "lower" => Ok(DomeSide::Lower),
            other => Err(ComponentError::InvalidParameter {
                component: DOME,
                reason: format!("side must be \"upper\" or \"lower\", got \"{}\"", other),
            }),
        }
    }
}

/// A spherical cap of constant thickness whose inner surface passes
/// through a horizontal chord.
#[derive(Debug, Clone, PartialEq)]
pub struct DomeParams {
    pub name: String,
    pub thickness: f64,
    pub chord_center_height: f64,
    pub chord_width: f64,
    /// Distance from the chord to the inner surface on the axis.
    pub chord_height: f64,
    pub side: DomeSide,
    pub rotation_angle: f64,
}

impl Default for DomeParams {
    fn default() -> Self {
        Self {
            name: DOME.to_string(),
            thickness: 10.0,
            chord_center_height: 0.0,
            chord_width: 100.0,
            chord_height: 20.0,
            side: DomeSide::Upper,
            rotation_angle: 90.0,
        }
    }
}

impl DomeParams {
    pub fn validate(&self) -> Result<(), ComponentError> {
        require_positive(DOME, "chord_width", self.chord_width)?;
        require_positive(DOME, "chord_height", self.chord_height)?;
        require_positive(DOME, "thickness", self.thickness)?;
        require_finite(DOME, "chord_center_height", self.chord_center_height)?;
        require_rotation_angle(DOME, self.rotation_angle)?;
        if 2.0 * self.chord_height >= self.chord_width {
            return Err(ComponentError::InvalidParameter {
                component: DOME,
                reason: format!(
                    "chord_width {} must exceed twice the chord_height {}",
                    self.chord_width, self.chord_height
                ),
            });
        }
        Ok(())
    }

    /// Radius of the inner sphere.
    pub fn sphere_radius(&self) -> f64 {
        (self.chord_width.powi(2) + 4.0 * self.chord_height.powi(2)) / (8.0 * self.chord_height)
    }
}

/// Dome profile for an upper cap with its chord at z = 0.
///
/// The cap is the spherical shell above the chord plane, trimmed at radius
/// `chord_width / 2 + thickness`.
fn upper_cap_profile(p: &DomeParams) -> Vec<[f64; 2]> {
    let r = p.sphere_radius();
    let t = p.thickness;
    let half = p.chord_width / 2.0;
    // sphere centre below the chord
    let cz = p.chord_height - r;
    let rim = half + t;
    let rim_z = cz + ((r + t).powi(2) - rim.powi(2)).sqrt();

    let on = |radius: f64, angle: f64| [radius * angle.cos(), cz + radius * angle.sin()];
    let outer_end = (rim_z - cz).atan2(rim);
    let inner_start = (-cz).atan2(half);

    vec![
        [0.0, cz + r + t],
        on(r + t, (FRAC_PI_2 + outer_end) / 2.0),
        [rim, rim_z],
        [rim, 0.0],
        [half, 0.0],
        on(r, (FRAC_PI_2 + inner_start) / 2.0),
        [0.0, cz + r],
    ]
}

/// Spherical dished head of constant thickness, built from two three-point
/// arcs.
pub fn constant_thickness_dome(params: &DomeParams) -> Result<ShapeEnvelope, ComponentError> {
    params.validate()?;
    let sign = match params.side {
        DomeSide::Upper => 1.0,
        DomeSide::Lower => -1.0,
    };
    let profile = upper_cap_profile(params);
    let place = |i: usize| {
        let [x, z] = profile[i];
        (x, params.chord_center_height + sign * z)
    };
    let circle = |i: usize| {
        let (x, z) = place(i);
        ProfilePoint::circle(x, z)
    };
    let straight = |i: usize| {
        let (x, z) = place(i);
        ProfilePoint::straight(x, z)
    };
    let points = vec![
        circle(0),
        circle(1),
        straight(2),
        straight(3),
        circle(4),
        circle(5),
        straight(6),
    ];
    Ok(ShapeEnvelope::new(params.name.clone(), points)
        .with_color(Color::rgb(0.0, 0.333, 0.0))
        .revolved(params.rotation_angle))
}

/// A cylinder capped with dished heads.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselParams {
    pub name: String,
    /// Outer radius of the cylindrical section.
    pub radius: f64,
    pub reference: ReferencePoint,
    /// Lower and upper dish heights.
    pub dish_height: (f64, f64),
    pub cylinder_height: f64,
    pub thickness: f64,
    pub rotation_angle: f64,
}

impl Default for VesselParams {
    fn default() -> Self {
        Self {
            name: "dished_vessel".to_string(),
            radius: 300.0,
            reference: ReferencePoint::Center(0.0),
            dish_height: (20.0, 50.0),
            cylinder_height: 400.0,
            thickness: 15.0,
            rotation_angle: 90.0,
        }
    }
}

impl VesselParams {
    fn validate(&self, component: &'static str) -> Result<(), ComponentError> {
        require_positive(component, "radius", self.radius)?;
        require_positive(component, "thickness", self.thickness)?;
        require_positive(component, "cylinder_height", self.cylinder_height)?;
        if self.thickness >= self.radius {
            return Err(ComponentError::InvalidParameter {
                component,
                reason: format!(
                    "thickness {} must be smaller than radius {}",
                    self.thickness, self.radius
                ),
            });
        }
        Ok(())
    }

    /// Centre of the cylinder and the lower/upper chord heights.
    fn heights(&self) -> (f64, f64, f64) {
        let half = 0.5 * self.cylinder_height;
        let center = match self.reference {
            ReferencePoint::Center(z) => z,
            ReferencePoint::Lower(z) => z + self.thickness + self.dish_height.0 + half,
        };
        (center, center - half, center + half)
    }

    fn cylinder(&self, center: f64) -> Result<ShapeEnvelope, ComponentError> {
        center_column_shield_cylinder(
            self.name.clone(),
            self.cylinder_height,
            self.radius - self.thickness,
            self.thickness,
            ReferencePoint::Center(center),
            self.rotation_angle,
        )
    }

    fn dome(&self, side: DomeSide, chord_center_height: f64, chord_height: f64) -> Result<ShapeEnvelope, ComponentError> {
        constant_thickness_dome(&DomeParams {
            name: self.name.clone(),
            thickness: self.thickness,
            chord_center_height,
            chord_width: 2.0 * (self.radius - self.thickness),
            chord_height,
            side,
            rotation_angle: self.rotation_angle,
        })
    }
}

/// A cylinder with a single dished head; returns `[dome, cylinder]`, both
/// carrying the vessel name.
pub fn u_shaped_dome(params: &VesselParams, side: DomeSide) -> Result<Vec<ShapeEnvelope>, ComponentError> {
    params.validate("u_shaped_dome")?;
    let (center, lower, upper) = params.heights();
    let dome = match side {
        DomeSide::Upper => params.dome(DomeSide::Upper, upper, params.dish_height.1)?,
        DomeSide::Lower => params.dome(DomeSide::Lower, lower, params.dish_height.0)?,
    };
    Ok(vec![dome, params.cylinder(center)?])
}

/// Vessel of a lower head, a cylinder and an upper head, returned in that
/// order under one name. The parts are not fused.
pub fn dished_vacuum_vessel(params: &VesselParams) -> Result<Vec<ShapeEnvelope>, ComponentError> {
    params.validate("dished_vacuum_vessel")?;
    let (center, lower, upper) = params.heights();
    Ok(vec![
        params.dome(DomeSide::Lower, lower, params.dish_height.0)?,
        params.cylinder(center)?,
        params.dome(DomeSide::Upper, upper, params.dish_height.1)?,
    ])
}
