//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics,
//! so a test can collect every failure in one pass.

use reactor_assembly::{Assembly, BodyRole};
use reactor_components::{center_column_shield_cylinder, PlasmaShape, ReferencePoint};
use reactor_kernel::{KernelIntrospect, KernelSolidHandle};
use reactor_shapes::{apply_boolean, BooleanKind, KernelBundle};
use reactor_types::DivertorRole;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

// ── Structure Oracles ───────────────────────────────────────────────────────

pub fn check_body_count(assembly: &Assembly, expected: usize) -> OracleVerdict {
    let n = assembly.len();
    let detail = format!("{} bodies, expected {}: {:?}", n, expected, assembly.names());
    if n == expected {
        OracleVerdict::pass_val("body_count", detail, n as f64)
    } else {
        OracleVerdict::fail_val("body_count", detail, n as f64)
    }
}

/// Every body has a non-empty name and a colour with 3 or 4 channels in
/// [0, 1].
pub fn check_names_and_colors(assembly: &Assembly) -> OracleVerdict {
    let bad: Vec<String> = assembly
        .bodies()
        .iter()
        .enumerate()
        .filter(|(_, b)| b.name.is_empty() || !b.color.is_valid())
        .map(|(i, b)| format!("#{} '{}' {:?}", i, b.name, b.color.channels()))
        .collect();
    if bad.is_empty() {
        OracleVerdict::pass(
            "names_and_colors",
            format!("{} bodies named and coloured", assembly.len()),
        )
    } else {
        OracleVerdict::fail("names_and_colors", format!("invalid: {}", bad.join(", ")))
    }
}

fn role_rank(role: BodyRole) -> u8 {
    match role {
        BodyRole::ExtraCutShape => 0,
        BodyRole::ExtraIntersect => 1,
        BodyRole::InboardCylinder => 2,
        BodyRole::OutboardBlanket => 3,
        BodyRole::Divertor => 4,
        BodyRole::Plasma => 5,
    }
}

/// Bodies appear grouped by role in emission order, with the plasma last.
pub fn check_emission_order(assembly: &Assembly) -> OracleVerdict {
    let ranks: Vec<u8> = assembly.bodies().iter().map(|b| role_rank(b.role)).collect();
    let ordered = ranks.windows(2).all(|w| w[0] <= w[1]);
    let plasma_last = assembly
        .bodies()
        .last()
        .is_some_and(|b| b.role == BodyRole::Plasma && b.name == "plasma");
    let detail = format!("{:?}", assembly.names());
    if ordered && plasma_last {
        OracleVerdict::pass("emission_order", detail)
    } else {
        OracleVerdict::fail("emission_order", detail)
    }
}

// ── Geometry Oracles ────────────────────────────────────────────────────────

/// No blanket reaches into the inboard column: each blanket intersected with
/// a reference cylinder of `column_radius` has volume at most `tolerance`.
pub fn check_blankets_clear_column(
    kb: &mut dyn KernelBundle,
    assembly: &Assembly,
    column_radius: f64,
    height: f64,
    tolerance: f64,
) -> OracleVerdict {
    const NAME: &str = "blankets_clear_column";
    let reference = center_column_shield_cylinder(
        "reference_column",
        height,
        0.0,
        column_radius,
        ReferencePoint::Center(0.0),
        360.0,
    )
    .map_err(|e| e.to_string())
    .and_then(|mut env| env.solid(kb).map_err(|e| e.to_string()));
    let reference = match reference {
        Ok(solid) => solid,
        Err(e) => return OracleVerdict::fail(NAME, format!("reference cylinder: {}", e)),
    };

    let mut worst: f64 = 0.0;
    let blankets: Vec<(String, KernelSolidHandle)> = assembly
        .with_role(BodyRole::OutboardBlanket)
        .map(|b| (b.name.clone(), b.solid.clone()))
        .collect();
    for (name, solid) in &blankets {
        let overlap = apply_boolean(kb, solid, &reference, BooleanKind::Intersect)
            .map_err(|e| e.to_string())
            .and_then(|s| kb.volume(&s).map_err(|e| e.to_string()));
        match overlap {
            Ok(v) => worst = worst.max(v),
            Err(e) => return OracleVerdict::fail(NAME, format!("{}: {}", name, e)),
        }
    }
    let detail = format!(
        "{} blankets, largest overlap {:.6} (tolerance {})",
        blankets.len(),
        worst,
        tolerance
    );
    if worst <= tolerance {
        OracleVerdict::pass_val(NAME, detail, worst)
    } else {
        OracleVerdict::fail_val(NAME, detail, worst)
    }
}

/// A divertor body with positive volume exists for every role listed.
pub fn check_divertors_present(
    introspect: &dyn KernelIntrospect,
    assembly: &Assembly,
    roles: &[DivertorRole],
) -> OracleVerdict {
    const NAME: &str = "divertors_present";
    for role in roles {
        let Some(body) = assembly.find(role.name()) else {
            return OracleVerdict::fail(NAME, format!("no body named {}", role.name()));
        };
        match introspect.volume(&body.solid) {
            Ok(v) if v > 0.0 => {}
            Ok(v) => return OracleVerdict::fail_val(NAME, format!("{} is empty", role.name()), v),
            Err(e) => return OracleVerdict::fail(NAME, format!("{}: {}", role.name(), e)),
        }
    }
    OracleVerdict::pass(NAME, format!("{} divertor(s) present", roles.len()))
}

/// The plasma body is non-empty and lies inside the annulus
/// `R0 - a <= R <= R0 + a`, `|z - dz| <= kappa * a`: checked on the body's
/// bounds and on `samples` points of the analytic boundary.
pub fn check_plasma_contained(
    introspect: &dyn KernelIntrospect,
    assembly: &Assembly,
    shape: &PlasmaShape,
    samples: usize,
) -> OracleVerdict {
    const NAME: &str = "plasma_contained";
    let Some(plasma) = assembly.find("plasma") else {
        return OracleVerdict::fail(NAME, "no plasma body".to_string());
    };
    let (r0, a, kappa, dz) = (
        shape.major_radius,
        shape.minor_radius,
        shape.elongation,
        shape.vertical_displacement,
    );
    // spline flattening may overshoot the analytic boundary slightly
    let tol = 1e-3 * a.max(1.0);

    let volume = match introspect.volume(&plasma.solid) {
        Ok(v) => v,
        Err(e) => return OracleVerdict::fail(NAME, e.to_string()),
    };
    if volume <= 0.0 {
        return OracleVerdict::fail_val(NAME, "plasma is empty".to_string(), volume);
    }

    let bb = match introspect.bounding_box(&plasma.solid) {
        Ok(bb) => bb,
        Err(e) => return OracleVerdict::fail(NAME, e.to_string()),
    };
    let reach = bb.min[0]
        .abs()
        .max(bb.max[0].abs())
        .max(bb.min[1].abs())
        .max(bb.max[1].abs());
    if reach > r0 + a + tol || bb.min[2] < dz - kappa * a - tol || bb.max[2] > dz + kappa * a + tol {
        return OracleVerdict::fail_val(
            NAME,
            format!("bounds {:?} -> {:?} leave the torus", bb.min, bb.max),
            volume,
        );
    }

    for i in 0..samples {
        let theta = 360.0 * i as f64 / samples as f64;
        let [r, z] = shape.point(theta);
        if r < r0 - a - tol || r > r0 + a + tol || (z - dz).abs() > kappa * a + tol {
            return OracleVerdict::fail(
                NAME,
                format!("boundary point ({:.3}, {:.3}) at {} deg outside", r, z, theta),
            );
        }
    }
    OracleVerdict::pass_val(
        NAME,
        format!("volume {:.3}, {} boundary samples inside", volume, samples),
        volume,
    )
}

/// Every structural body of `cut` is no larger than its namesake in
/// `reference`, at least one is strictly smaller, and the total loss does
/// not exceed `cutter_volume` by more than `tolerance`.
pub fn check_cut_monotonic(
    introspect: &dyn KernelIntrospect,
    reference: &Assembly,
    cut: &Assembly,
    cutter_volume: f64,
    tolerance: f64,
) -> OracleVerdict {
    const NAME: &str = "cut_monotonic";
    let mut shrunk = 0;
    let mut loss = 0.0;
    for body in reference.bodies().iter().filter(|b| b.role.is_structure()) {
        let Some(after) = cut.find(&body.name) else {
            return OracleVerdict::fail(NAME, format!("'{}' missing after cut", body.name));
        };
        let volumes = introspect
            .volume(&body.solid)
            .and_then(|v0| introspect.volume(&after.solid).map(|v1| (v0, v1)));
        let (v0, v1) = match volumes {
            Ok(pair) => pair,
            Err(e) => return OracleVerdict::fail(NAME, e.to_string()),
        };
        if v1 > v0 + 1e-9 * v0.max(1.0) {
            return OracleVerdict::fail_val(
                NAME,
                format!("'{}' grew from {:.3} to {:.3}", body.name, v0, v1),
                v1 - v0,
            );
        }
        if v1 < v0 {
            shrunk += 1;
        }
        loss += v0 - v1;
    }
    let detail = format!(
        "{} bodies shrank, total loss {:.3}, cutter volume {:.3}",
        shrunk, loss, cutter_volume
    );
    if shrunk > 0 && loss <= cutter_volume + tolerance {
        OracleVerdict::pass_val(NAME, detail, loss)
    } else {
        OracleVerdict::fail_val(NAME, detail, loss)
    }
}

/// Boundary face count of a solid, for seam checks on kernels that report
/// topology.
pub fn check_face_count(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: usize,
) -> OracleVerdict {
    match introspect.face_count(solid) {
        Ok(n) if n == expected => {
            OracleVerdict::pass_val("face_count", format!("{} faces", n), n as f64)
        }
        Ok(n) => OracleVerdict::fail_val(
            "face_count",
            format!("{} faces, expected {}", n, expected),
            n as f64,
        ),
        Err(e) => OracleVerdict::fail("face_count", e.to_string()),
    }
}

/// Structural checks that need no geometry: naming, colour and order.
pub fn run_structure_checks(assembly: &Assembly) -> Vec<OracleVerdict> {
    vec![
        check_names_and_colors(assembly),
        check_emission_order(assembly),
    ]
}
