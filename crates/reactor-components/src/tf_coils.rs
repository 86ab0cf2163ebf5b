//! Toroidal field coils: rectangular and Princeton-D.

use std::f64::consts::FRAC_PI_2;

use reactor_shapes::{KernelBundle, ShapeEnvelope};
use reactor_types::{Color, ProfilePoint};
use tracing::debug;

use crate::error::{require_finite, require_positive, require_rotation_angle, ComponentError};
use crate::wedge::cutting_wedge;

const TF_COLOR: Color = Color::rgb(0.0, 0.0, 1.0);

/// `count` angles evenly spaced around a full turn, starting at zero.
pub fn evenly_spaced_angles(count: usize) -> Vec<f64> {
    (0..count).map(|i| 360.0 * i as f64 / count as f64).collect()
}

fn check_angles(component: &'static str, angles: &[f64]) -> Result<(), ComponentError> {
    if angles.is_empty() {
        return Err(ComponentError::InvalidParameter {
            component,
            reason: "at least one azimuthal placement angle is required".to_string(),
        });
    }
    for a in angles {
        require_finite(component, "azimuthal placement angle", *a)?;
    }
    Ok(())
}

/// Rectangular toroidal field coil.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleCoilParams {
    pub name: String,
    /// `(x, z)` of the inner upper corner.
    pub horizontal_start_point: [f64; 2],
    /// `(x, z)` of the middle of the outboard vertical section.
    pub vertical_mid_point: [f64; 2],
    pub thickness: f64,
    /// Toroidal extent, centred on the profile plane.
    pub distance: f64,
    pub with_inner_leg: bool,
    pub azimuthal_placement_angles: Vec<f64>,
    pub vertical_displacement: f64,
}

impl Default for RectangleCoilParams {
    fn default() -> Self {
        Self {
            name: "toroidal_field_coil".to_string(),
            horizontal_start_point: [20.0, 200.0],
            vertical_mid_point: [350.0, 0.0],
            thickness: 30.0,
            distance: 20.0,
            with_inner_leg: true,
            azimuthal_placement_angles: vec![0.0, 90.0, 180.0],
            vertical_displacement: 0.0,
        }
    }
}

/// Rectangular coils extruded symmetrically about the `XZ` plane and
/// copied to each placement angle. The inner leg, when requested, is built
/// immediately and unioned in.
pub fn toroidal_field_coil_rectangle(
    kb: &mut dyn KernelBundle,
    params: &RectangleCoilParams,
) -> Result<ShapeEnvelope, ComponentError> {
    const COMPONENT: &str = "toroidal_field_coil_rectangle";
    let [hx, hz] = params.horizontal_start_point;
    let [vx, vz] = params.vertical_mid_point;
    for v in [hx, hz, vx, vz, params.vertical_displacement] {
        require_finite(COMPONENT, "coordinate", v)?;
    }
    require_positive(COMPONENT, "thickness", params.thickness)?;
    require_positive(COMPONENT, "distance", params.distance)?;
    check_angles(COMPONENT, &params.azimuthal_placement_angles)?;
    if hx >= vx {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: "horizontal_start_point x must be smaller than vertical_mid_point x"
                .to_string(),
        });
    }
    if vz >= hz {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: "vertical_mid_point z must be below horizontal_start_point z".to_string(),
        });
    }
    if hx < 0.0 {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: format!("coil crosses the machine axis at x = {}", hx),
        });
    }

    let t = params.thickness;
    let dz = params.vertical_displacement;
    let corners = [
        [hx, hz],
        [hx + t, hz],
        [vx, hz],
        [vx, -hz],
        [hx + t, -hz],
        [hx, -hz],
        [hx, -(hz + t)],
        [vx + t, -(hz + t)],
        [vx + t, hz + t],
        [hx, hz + t],
    ];
    let points: Vec<ProfilePoint> = corners
        .iter()
        .map(|[x, z]| ProfilePoint::straight(*x, z + dz))
        .collect();

    let mut coil = ShapeEnvelope::new(params.name.clone(), points)
        .with_color(TF_COLOR)
        .extruded(params.distance, true)
        .with_azimuth_placement(params.azimuthal_placement_angles.clone());

    if params.with_inner_leg {
        let leg_points = [0, 1, 4, 5]
            .iter()
            .map(|&i| ProfilePoint::straight(corners[i][0], corners[i][1] + dz))
            .collect();
        let mut leg = ShapeEnvelope::new(params.name.clone(), leg_points)
            .extruded(params.distance, true)
            .with_azimuth_placement(params.azimuthal_placement_angles.clone());
        coil = coil.with_union(vec![leg.solid(kb)?]);
    }
    Ok(coil)
}

/// Princeton-D toroidal field coil.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincetonDParams {
    pub name: String,
    /// Inboard radius of the coil.
    pub r1: f64,
    /// Outboard radius of the coil's inner edge.
    pub r2: f64,
    pub thickness: f64,
    pub distance: f64,
    pub with_inner_leg: bool,
    pub azimuthal_placement_angles: Vec<f64>,
    pub vertical_displacement: f64,
    /// Sector kept, in degrees; below 360 the coils are trimmed by a wedge.
    pub rotation_angle: f64,
    /// Samples per quarter of the D.
    pub points_per_quarter: usize,
}

impl Default for PrincetonDParams {
    fn default() -> Self {
        Self {
            name: "toroidal_field_coil".to_string(),
            r1: 100.0,
            r2: 300.0,
            thickness: 30.0,
            distance: 20.0,
            with_inner_leg: true,
            azimuthal_placement_angles: vec![0.0],
            vertical_displacement: 0.0,
            rotation_angle: 360.0,
            points_per_quarter: 12,
        }
    }
}

const RK4_SUBSTEPS: usize = 8;

/// Inner edge of a constant-tension D between radii `r1` and `r2`.
///
/// With `phi` the tangent angle, the curve satisfies
/// `dR/dphi = -k R cos(phi)`, `dz/dphi = -k R sin(phi)`, `k = ln(r2/r1) / 2`,
/// so `R = sqrt(r1 r2) exp(-k sin(phi))`. `z` is integrated with RK4 from
/// the outboard midplane (`phi = -pi/2`, `z = 0`) over the top to the
/// inboard leg (`phi = pi/2`). Returns the upper half as `(phi, R, z)`
/// ordered from the inboard leg to the outboard midplane.
pub fn princeton_d_upper_half(r1: f64, r2: f64, points_per_quarter: usize) -> Vec<(f64, f64, f64)> {
    let k = 0.5 * (r2 / r1).ln();
    let r0 = (r1 * r2).sqrt();
    let radius = |phi: f64| r0 * (-k * phi.sin()).exp();
    let dz = |phi: f64| -k * radius(phi) * phi.sin();

    let samples = 2 * points_per_quarter.max(1);
    let step = std::f64::consts::PI / samples as f64;
    let h = step / RK4_SUBSTEPS as f64;

    let mut phi = -FRAC_PI_2;
    let mut z = 0.0;
    let mut curve = vec![(phi, radius(phi), z)];
    for _ in 0..samples {
        for _ in 0..RK4_SUBSTEPS {
            let k1 = dz(phi);
            // the slope depends on phi only, so k2 and k3 coincide
            let k2 = dz(phi + h / 2.0);
            let k3 = k2;
            let k4 = dz(phi + h);
            z += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
            phi += h;
        }
        curve.push((phi, radius(phi), z));
    }
    curve.reverse();
    curve
}

/// Princeton-D coils: the D curve offset outward by `thickness`, extruded
/// symmetrically, copied to each placement angle, optionally joined by a
/// straight inner leg and trimmed to `rotation_angle`.
pub fn toroidal_field_coil_princeton_d(
    kb: &mut dyn KernelBundle,
    params: &PrincetonDParams,
) -> Result<ShapeEnvelope, ComponentError> {
    const COMPONENT: &str = "toroidal_field_coil_princeton_d";
    require_positive(COMPONENT, "r1", params.r1)?;
    require_positive(COMPONENT, "r2", params.r2)?;
    require_positive(COMPONENT, "thickness", params.thickness)?;
    require_positive(COMPONENT, "distance", params.distance)?;
    require_finite(COMPONENT, "vertical_displacement", params.vertical_displacement)?;
    require_rotation_angle(COMPONENT, params.rotation_angle)?;
    check_angles(COMPONENT, &params.azimuthal_placement_angles)?;
    let inner_r1 = params.r1 + params.thickness;
    if params.r2 <= inner_r1 {
        return Err(ComponentError::InvalidParameter {
            component: COMPONENT,
            reason: format!(
                "r2 {} must exceed r1 + thickness {}",
                params.r2, inner_r1
            ),
        });
    }

    let t = params.thickness;
    let dz = params.vertical_displacement;
    let upper = princeton_d_upper_half(inner_r1, params.r2, params.points_per_quarter);

    // (point, outward normal) from the top of the inner leg round to its foot
    let mut edge: Vec<([f64; 2], [f64; 2])> = upper
        .iter()
        .map(|&(phi, r, z)| ([r, z], [-phi.sin(), phi.cos()]))
        .collect();
    edge.extend(
        upper
            .iter()
            .rev()
            .skip(1)
            .map(|&(phi, r, z)| ([r, -z], [-phi.sin(), -phi.cos()])),
    );

    let mut inner: Vec<ProfilePoint> = edge
        .iter()
        .map(|([r, z], _)| ProfilePoint::spline(*r, z + dz))
        .collect();
    let mut outer: Vec<ProfilePoint> = edge
        .iter()
        .rev()
        .map(|([r, z], [nx, nz])| ProfilePoint::spline(r + t * nx, z + t * nz + dz))
        .collect();
    for run in [&mut inner, &mut outer] {
        if let Some(last) = run.last_mut() {
            *last = ProfilePoint::straight(last.x, last.y);
        }
    }
    let leg_top = upper[0].2;
    inner.extend(outer);

    let z_extent = upper.iter().map(|p| p.2.abs()).fold(0.0, f64::max) + t;
    debug!(
        r1 = params.r1,
        r2 = params.r2,
        z_extent,
        points = inner.len(),
        "princeton-d profile"
    );

    let angles = params.azimuthal_placement_angles.clone();
    let trim = if params.rotation_angle < 360.0 {
        let radius = 2.1 * (params.r2 + t + params.distance);
        let height = 2.2 * (z_extent + dz.abs());
        let mut wedge = cutting_wedge(height, radius, params.rotation_angle)?;
        Some(wedge.solid(kb)?)
    } else {
        None
    };

    let mut coil = ShapeEnvelope::new(params.name.clone(), inner)
        .with_color(TF_COLOR)
        .extruded(params.distance, true)
        .with_azimuth_placement(angles.clone());
    if let Some(wedge) = &trim {
        coil = coil.with_intersect(vec![wedge.clone()]);
    }

    if params.with_inner_leg {
        let leg_points = vec![
            ProfilePoint::straight(inner_r1, leg_top + dz),
            ProfilePoint::straight(inner_r1, -leg_top + dz),
            ProfilePoint::straight(params.r1, -leg_top + dz),
            ProfilePoint::straight(params.r1, leg_top + dz),
        ];
        let mut leg = ShapeEnvelope::new(params.name.clone(), leg_points)
            .extruded(params.distance, true)
            .with_azimuth_placement(angles);
        if let Some(wedge) = trim {
            leg = leg.with_intersect(vec![wedge]);
        }
        coil = coil.with_union(vec![leg.solid(kb)?]);
    }
    Ok(coil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use reactor_kernel::{KernelIntrospect, MockKernel};

    #[test]
    fn d_curve_meets_both_radii() {
        let curve = princeton_d_upper_half(100.0, 300.0, 16);
        let (_, r_in, z_in) = curve[0];
        let (_, r_out, z_out) = curve[curve.len() - 1];
        assert_relative_eq!(r_in, 100.0, max_relative = 1e-9);
        assert_relative_eq!(r_out, 300.0, max_relative = 1e-9);
        assert_eq!(z_out, 0.0);
        assert!(z_in > 0.0);
        // highest point sits at the geometric mean radius
        let top = curve
            .iter()
            .cloned()
            .fold((0.0, 0.0, f64::MIN), |a, b| if b.2 > a.2 { b } else { a });
        assert_relative_eq!(top.1, (100.0f64 * 300.0).sqrt(), max_relative = 0.05);
    }

    #[test]
    fn evenly_spaced_angles_cover_a_turn() {
        assert_eq!(evenly_spaced_angles(4), vec![0.0, 90.0, 180.0, 270.0]);
        assert!(evenly_spaced_angles(0).is_empty());
    }

    #[test]
    fn rectangle_coil_rejects_inverted_points() {
        let mut kb = MockKernel::new();
        let params = RectangleCoilParams {
            horizontal_start_point: [400.0, 200.0],
            ..RectangleCoilParams::default()
        };
        assert!(matches!(
            toroidal_field_coil_rectangle(&mut kb, &params),
            Err(ComponentError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rectangle_coils_are_placed_azimuthally() {
        let mut kb = MockKernel::new();
        let params = RectangleCoilParams::default();
        let mut coil = toroidal_field_coil_rectangle(&mut kb, &params).unwrap();
        let solid = coil.solid(&mut kb).unwrap();
        // outboard leg of the 0 and 90 degree copies
        assert!(kb.contains_point(&solid, [365.0, 0.0, 0.0]).unwrap());
        assert!(kb.contains_point(&solid, [0.0, 365.0, 0.0]).unwrap());
        assert!(!kb.contains_point(&solid, [0.0, -365.0, 0.0]).unwrap());
        // inner leg
        assert!(kb.contains_point(&solid, [35.0, 0.0, 0.0]).unwrap());
    }

    #[test]
    fn princeton_d_sector_is_trimmed() {
        let mut kb = MockKernel::new();
        let params = PrincetonDParams {
            azimuthal_placement_angles: evenly_spaced_angles(4),
            rotation_angle: 180.0,
            ..PrincetonDParams::default()
        };
        let mut coil = toroidal_field_coil_princeton_d(&mut kb, &params).unwrap();
        let solid = coil.solid(&mut kb).unwrap();
        // the 90 degree copy survives, the 270 degree copy is trimmed away
        assert!(kb.contains_point(&solid, [0.0, 315.0, 0.0]).unwrap());
        assert!(!kb.contains_point(&solid, [0.0, -315.0, 0.0]).unwrap());
        assert!(kb.volume(&solid).unwrap() > 0.0);
    }

    #[test]
    fn princeton_d_requires_room_for_the_thickness() {
        let mut kb = MockKernel::new();
        let params = PrincetonDParams {
            r1: 100.0,
            r2: 120.0,
            thickness: 30.0,
            ..PrincetonDParams::default()
        };
        assert!(toroidal_field_coil_princeton_d(&mut kb, &params).is_err());
    }
}
