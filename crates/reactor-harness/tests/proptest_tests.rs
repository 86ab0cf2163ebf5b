use proptest::prelude::*;
use reactor_assembly::{
    spherical_tokamak_from_plasma, sum_up_to_gap_before_plasma, BodyRole, ExtraShapes,
    ReactorOptions,
};
use reactor_harness::oracle::*;
use reactor_kernel::MockKernel;
use reactor_types::BuildEntry;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Symmetric builds: `k` solids either side of the plasma, each side closed
/// off by gaps.
fn arb_symmetric_build() -> impl Strategy<Value = (usize, Vec<BuildEntry>)> {
    (1usize..4)
        .prop_flat_map(|k| {
            (
                Just(k),
                5.0f64..30.0,
                prop::collection::vec(5.0f64..50.0, k),
                10.0f64..60.0,
                150.0f64..400.0,
                10.0f64..60.0,
                prop::collection::vec(5.0f64..50.0, k),
            )
        })
        .prop_map(|(k, floor, inboard, gap_in, plasma, gap_out, outboard)| {
            let mut build = vec![BuildEntry::gap(floor)];
            build.extend(inboard.into_iter().map(BuildEntry::solid));
            build.push(BuildEntry::gap(gap_in));
            build.push(BuildEntry::plasma(plasma));
            build.push(BuildEntry::gap(gap_out));
            build.extend(outboard.into_iter().map(BuildEntry::solid));
            build.push(BuildEntry::gap(10.0));
            (k, build)
        })
}

// ---------------------------------------------------------------------------
// Composition properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn symmetric_build_gives_two_k_plus_one_bodies((k, build) in arb_symmetric_build()) {
        let mut kb = MockKernel::new();
        let assembly = spherical_tokamak_from_plasma(
            &mut kb,
            &build.into(),
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap();
        prop_assert_eq!(assembly.len(), 2 * k + 1);
        prop_assert_eq!(assembly.with_role(BodyRole::InboardCylinder).count(), k);
        prop_assert_eq!(assembly.with_role(BodyRole::OutboardBlanket).count(), k);
        for verdict in run_structure_checks(&assembly) {
            prop_assert!(verdict.passed, "{}: {}", verdict.oracle_name, verdict.detail);
        }
    }

    #[test]
    fn blankets_never_enter_the_column((_, build) in arb_symmetric_build()) {
        let column = sum_up_to_gap_before_plasma(&build).unwrap();
        let mut kb = MockKernel::new();
        let assembly = spherical_tokamak_from_plasma(
            &mut kb,
            &build.into(),
            &ReactorOptions::default(),
            &ExtraShapes::none(),
        )
        .unwrap();
        let verdict = check_blankets_clear_column(&mut kb, &assembly, column, 1e4, 1e-6);
        prop_assert!(verdict.passed, "{}", verdict.detail);
    }
}
