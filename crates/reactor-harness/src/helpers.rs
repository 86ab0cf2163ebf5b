//! Helper functions: error type, canonical builds and cutter bodies.

use reactor_assembly::{
    spherical_tokamak_from_plasma, Assembly, AssemblyBody, AssemblyError, DivertorBuild,
    ExtraShapes, RadialBuildSpec, ReactorOptions,
};
use reactor_components::ComponentError;
use reactor_kernel::{KernelError, KernelSolidHandle};
use reactor_shapes::{KernelBundle, ShapeEnvelope, ShapeError};
use reactor_types::{BuildEntry, DivertorRole, ProfilePoint, Workplane};

use crate::oracle::OracleVerdict;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("component error: {0}")]
    Component(#[from] ComponentError),

    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("body not found: {name}")]
    BodyNotFound { name: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

// ── Canonical builds ────────────────────────────────────────────────────────

/// Minimal spherical tokamak: two inboard solids, three outboard.
pub fn s1_radial_build() -> Vec<BuildEntry> {
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

/// The minimal build plus a lower and an upper divertor.
pub fn s2_radial_spec() -> RadialBuildSpec {
    RadialBuildSpec::from(s1_radial_build())
        .with_divertor(DivertorBuild {
            role: DivertorRole::Lower,
            gap: 50.0,
            thickness: 50.0,
        })
        .with_divertor(DivertorBuild {
            role: DivertorRole::Upper,
            gap: 50.0,
            thickness: 50.0,
        })
}

/// The minimal build composed as a spherical tokamak with default options.
pub fn s1_assembly(kb: &mut dyn KernelBundle, extra: &ExtraShapes) -> Result<Assembly, HarnessError> {
    Ok(spherical_tokamak_from_plasma(
        kb,
        &s1_radial_build().into(),
        &ReactorOptions::default(),
        extra,
    )?)
}

// ── Cutters ─────────────────────────────────────────────────────────────────

/// Axis-aligned box between `min` and `max`.
pub fn box_cutter(
    kb: &mut dyn KernelBundle,
    min: [f64; 3],
    max: [f64; 3],
) -> Result<KernelSolidHandle, HarnessError> {
    let points = vec![
        ProfilePoint::straight(min[0], min[1]),
        ProfilePoint::straight(max[0], min[1]),
        ProfilePoint::straight(max[0], max[1]),
        ProfilePoint::straight(min[0], max[1]),
    ];
    let mut envelope = ShapeEnvelope::new("box_cutter", points)
        .with_workplane(Workplane::XY)
        .extruded(max[2] - min[2], false)
        .with_translation([0.0, 0.0, min[2]]);
    Ok(envelope.solid(kb)?)
}

/// Rectangular equatorial port through the outboard blankets of the
/// minimal build.
pub fn port_cutter(kb: &mut dyn KernelBundle) -> Result<KernelSolidHandle, HarnessError> {
    box_cutter(kb, [350.0, 50.0, -100.0], [700.0, 250.0, 100.0])
}

// ── Lookup ──────────────────────────────────────────────────────────────────

pub fn body<'a>(assembly: &'a Assembly, name: &str) -> Result<&'a AssemblyBody, HarnessError> {
    assembly.find(name).ok_or_else(|| HarnessError::BodyNotFound {
        name: name.to_string(),
    })
}

/// Turn the first failing verdict into an error.
pub fn require_all(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
    match verdicts.iter().find(|v| !v.passed) {
        Some(v) => Err(HarnessError::OracleFailure {
            oracle: v.oracle_name.clone(),
            detail: v.detail.clone(),
        }),
        None => Ok(()),
    }
}
