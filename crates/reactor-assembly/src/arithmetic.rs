//! Numeric reductions over plasma builds.
//!
//! Every function here assumes the build has passed
//! [`validate_plasma_radial_build`](crate::validate_plasma_radial_build);
//! the only failure they report themselves is a missing plasma entry.

use reactor_types::{BuildEntry, LayerKind};
use serde::{Deserialize, Serialize};

use crate::validate::StructureError;

/// Position of the plasma entry.
pub fn plasma_index(build: &[BuildEntry]) -> Result<usize, StructureError> {
    build
        .iter()
        .position(|e| e.is(LayerKind::Plasma))
        .ok_or(StructureError::PlasmaCount { count: 0 })
}

/// Thickness of the plasma entry: its radial or vertical extent.
pub fn plasma_value(build: &[BuildEntry]) -> Result<f64, StructureError> {
    Ok(build[plasma_index(build)?].thickness)
}

pub fn total_thickness(build: &[BuildEntry]) -> f64 {
    build.iter().map(|e| e.thickness).sum()
}

/// Sum of everything before the plasma: the inner equatorial radius.
pub fn sum_up_to_plasma(build: &[BuildEntry]) -> Result<f64, StructureError> {
    Ok(total_thickness(&build[..plasma_index(build)?]))
}

/// Sum of everything before the gap in front of the plasma: the outer
/// radius of the inboard column.
pub fn sum_up_to_gap_before_plasma(build: &[BuildEntry]) -> Result<f64, StructureError> {
    let index = plasma_index(build)?;
    Ok(total_thickness(&build[..index.saturating_sub(1)]))
}

pub fn sum_after_plasma(build: &[BuildEntry]) -> Result<f64, StructureError> {
    Ok(total_thickness(&build[plasma_index(build)? + 1..]))
}

/// Distances from the bottom of a vertical build to the plasma centre, and
/// from the plasma centre to the top.
pub fn sum_before_after_plasma(vertical: &[BuildEntry]) -> Result<(f64, f64), StructureError> {
    let half = plasma_value(vertical)? / 2.0;
    Ok((
        sum_up_to_plasma(vertical)? + half,
        sum_after_plasma(vertical)? + half,
    ))
}

/// Inboard solid layers that have no outboard partner and so become
/// free-standing cylinders.
pub fn count_cylinder_layers(radial: &[BuildEntry]) -> usize {
    let mut before = 0usize;
    let mut after = 0usize;
    let mut seen_plasma = false;
    for entry in radial {
        match entry.kind() {
            Some(LayerKind::Plasma) => seen_plasma = true,
            Some(LayerKind::Solid) if seen_plasma => after += 1,
            Some(LayerKind::Solid) => before += 1,
            _ => {}
        }
    }
    before.saturating_sub(after)
}

/// Plasma size and position implied by a radial build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlasmaGeometry {
    pub inner_equatorial_point: f64,
    pub outer_equatorial_point: f64,
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl PlasmaGeometry {
    pub fn from_radial(radial: &[BuildEntry]) -> Result<Self, StructureError> {
        let inner = sum_up_to_plasma(radial)?;
        let outer = inner + plasma_value(radial)?;
        let major_radius = (inner + outer) / 2.0;
        Ok(Self {
            inner_equatorial_point: inner,
            outer_equatorial_point: outer,
            major_radius,
            minor_radius: major_radius - inner,
        })
    }

    /// Elongation implied by the plasma height of a vertical build.
    pub fn elongation(&self, vertical: &[BuildEntry]) -> Result<f64, StructureError> {
        Ok(plasma_value(vertical)? / 2.0 / self.minor_radius)
    }

    pub fn plasma_height(&self, elongation: f64) -> f64 {
        2.0 * self.minor_radius * elongation
    }
}

/// Vertical build mirrored from the outboard half of a radial build, with a
/// plasma entry `2 * minor_radius * elongation` tall in the middle.
pub fn synthesize_vertical_build(
    radial: &[BuildEntry],
    elongation: f64,
) -> Result<Vec<BuildEntry>, StructureError> {
    let index = plasma_index(radial)?;
    let geometry = PlasmaGeometry::from_radial(radial)?;
    let outboard = &radial[index + 1..];

    let mut vertical = Vec::with_capacity(2 * outboard.len() + 1);
    vertical.extend(outboard.iter().rev().copied());
    vertical.push(BuildEntry::plasma(geometry.plasma_height(elongation)));
    vertical.extend(outboard.iter().copied());
    Ok(vertical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

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
    fn s1_radii() {
        let geometry = PlasmaGeometry::from_radial(&s1()).unwrap();
        assert_relative_eq!(geometry.inner_equatorial_point, 125.0);
        assert_relative_eq!(geometry.outer_equatorial_point, 425.0);
        assert_relative_eq!(geometry.major_radius, 275.0);
        assert_relative_eq!(geometry.minor_radius, 150.0);
    }

    #[test]
    fn s1_sums() {
        let build = s1();
        assert_eq!(plasma_index(&build).unwrap(), 4);
        assert_eq!(plasma_value(&build).unwrap(), 300.0);
        assert_eq!(sum_up_to_plasma(&build).unwrap(), 125.0);
        assert_eq!(sum_up_to_gap_before_plasma(&build).unwrap(), 75.0);
        assert_eq!(sum_after_plasma(&build).unwrap(), 155.0);
        assert_eq!(total_thickness(&build), 580.0);
    }

    #[test]
    fn cylinder_layers_clamp_at_zero() {
        assert_eq!(count_cylinder_layers(&s1()), 0);
        let build = vec![
            BuildEntry::solid(10.0),
            BuildEntry::solid(10.0),
            BuildEntry::solid(10.0),
            BuildEntry::gap(10.0),
            BuildEntry::plasma(100.0),
            BuildEntry::gap(10.0),
            BuildEntry::solid(10.0),
        ];
        assert_eq!(count_cylinder_layers(&build), 2);
    }

    #[test]
    fn synthesized_vertical_build_mirrors_outboard_half() {
        let vertical = synthesize_vertical_build(&s1(), 2.0).unwrap();
        let thicknesses: Vec<f64> = vertical.iter().map(|e| e.thickness).collect();
        assert_eq!(
            thicknesses,
            vec![10.0, 10.0, 60.0, 15.0, 60.0, 600.0, 60.0, 15.0, 60.0, 10.0, 10.0]
        );
        assert_eq!(plasma_index(&vertical).unwrap(), 5);
        assert!(vertical[4].is(LayerKind::Gap));
        assert!(vertical[6].is(LayerKind::Gap));

        let geometry = PlasmaGeometry::from_radial(&s1()).unwrap();
        assert_relative_eq!(geometry.elongation(&vertical).unwrap(), 2.0);
    }

    #[test]
    fn before_after_include_half_plasma() {
        let vertical = synthesize_vertical_build(&s1(), 2.0).unwrap();
        let (below, above) = sum_before_after_plasma(&vertical).unwrap();
        assert_relative_eq!(below, 155.0 + 300.0);
        assert_relative_eq!(above, 155.0 + 300.0);
        assert_relative_eq!(below + above, total_thickness(&vertical));
    }

    #[test]
    fn missing_plasma_is_reported() {
        let build = vec![BuildEntry::gap(1.0)];
        assert_eq!(
            plasma_index(&build),
            Err(StructureError::PlasmaCount { count: 0 })
        );
    }
}
