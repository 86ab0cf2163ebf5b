use proptest::prelude::*;
use reactor_assembly::*;
use reactor_types::{BuildEntry, LayerKind};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_thickness() -> impl Strategy<Value = f64> {
    0.5f64..500.0
}

fn arb_layer() -> impl Strategy<Value = BuildEntry> {
    (prop::bool::ANY, arb_thickness()).prop_map(|(solid, t)| {
        if solid {
            BuildEntry::solid(t)
        } else {
            BuildEntry::gap(t)
        }
    })
}

/// Valid plasma builds: arbitrary layers, a gap, the plasma, a gap, more
/// layers.
fn arb_plasma_build() -> impl Strategy<Value = Vec<BuildEntry>> {
    (
        prop::collection::vec(arb_layer(), 0..6),
        arb_thickness(),
        arb_thickness(),
        arb_thickness(),
        prop::collection::vec(arb_layer(), 0..6),
    )
        .prop_map(|(before, gap_in, plasma, gap_out, after)| {
            let mut build = before;
            build.push(BuildEntry::gap(gap_in));
            build.push(BuildEntry::plasma(plasma));
            build.push(BuildEntry::gap(gap_out));
            build.extend(after);
            build
        })
}

fn arb_kind() -> impl Strategy<Value = LayerKind> {
    prop_oneof![
        Just(LayerKind::Gap),
        Just(LayerKind::Solid),
        Just(LayerKind::Plasma)
    ]
}

fn arb_any_build() -> impl Strategy<Value = Vec<BuildEntry>> {
    prop::collection::vec(
        (arb_kind(), -10.0f64..100.0).prop_map(|(k, t)| BuildEntry::new(k, t)),
        0..8,
    )
}

/// The structural rules, restated directly.
fn is_well_formed(build: &[BuildEntry]) -> bool {
    let plasma: Vec<usize> = build
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is(LayerKind::Plasma))
        .map(|(i, _)| i)
        .collect();
    if plasma.len() != 1 || build.iter().any(|e| e.thickness <= 0.0) {
        return false;
    }
    let p = plasma[0];
    p > 0
        && p + 1 < build.len()
        && build[p - 1].is(LayerKind::Gap)
        && build[p + 1].is(LayerKind::Gap)
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn generated_plasma_builds_validate(build in arb_plasma_build()) {
        prop_assert!(validate_plasma_radial_build(&build).is_ok());
    }

    #[test]
    fn validator_agrees_with_the_rules(build in arb_any_build()) {
        prop_assert_eq!(
            validate_plasma_radial_build(&build).is_ok(),
            is_well_formed(&build)
        );
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sums_partition_the_build(build in arb_plasma_build()) {
        let total = total_thickness(&build);
        let parts = sum_up_to_plasma(&build).unwrap()
            + plasma_value(&build).unwrap()
            + sum_after_plasma(&build).unwrap();
        prop_assert!((parts - total).abs() <= 1e-9 * total.max(1.0));
    }

    #[test]
    fn radii_bracket_the_plasma(build in arb_plasma_build()) {
        let geometry = PlasmaGeometry::from_radial(&build).unwrap();
        let inner = sum_up_to_plasma(&build).unwrap();
        let width = plasma_value(&build).unwrap();
        let tol = 1e-9 * (inner + width).max(1.0);
        prop_assert!((geometry.major_radius - geometry.minor_radius - inner).abs() <= tol);
        prop_assert!((geometry.major_radius + geometry.minor_radius - inner - width).abs() <= tol);
    }

    #[test]
    fn synthesized_vertical_build_is_valid(
        build in arb_plasma_build(),
        elongation in 0.5f64..4.0,
    ) {
        let vertical = synthesize_vertical_build(&build, elongation).unwrap();
        prop_assert!(validate_plasma_vertical_build(&vertical).is_ok());
        let geometry = PlasmaGeometry::from_radial(&build).unwrap();
        let recovered = geometry.elongation(&vertical).unwrap();
        prop_assert!((recovered - elongation).abs() <= 1e-9 * elongation);
        let (below, above) = sum_before_after_plasma(&vertical).unwrap();
        prop_assert!((below - above).abs() <= 1e-9 * below.max(1.0));
    }

    #[test]
    fn cylinder_layers_never_exceed_inboard_solids(build in arb_plasma_build()) {
        let index = plasma_index(&build).unwrap();
        let inboard = build[..index].iter().filter(|e| e.is(LayerKind::Solid)).count();
        prop_assert!(count_cylinder_layers(&build) <= inboard);
    }
}
