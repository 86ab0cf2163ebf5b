use reactor_types::{BuildEntry, DivertorRole, LayerKind, LayerTag};
use serde::{Deserialize, Serialize};

/// A build that breaks one of the structural rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructureError {
    #[error("build is empty")]
    Empty,

    #[error("entry {index} has a non-numeric thickness {thickness}")]
    NonNumericThickness { index: usize, thickness: f64 },

    #[error("entry {index} has non-positive thickness {thickness}")]
    NonPositiveThickness { index: usize, thickness: f64 },

    #[error("entry {index} is a {role:?} divertor inside a plasma build")]
    MisplacedDivertor { index: usize, role: DivertorRole },

    #[error("expected exactly one plasma entry, found {count}")]
    PlasmaCount { count: usize },

    #[error("plasma entry at index {index} is the first or last entry")]
    PlasmaAtEdge { index: usize },

    #[error("entry {index} next to the plasma must be a gap")]
    PlasmaNotBracketed { index: usize },

    #[error("divertor build must have 2 entries, found {len}")]
    DivertorLength { len: usize },

    #[error("divertor build must start with a gap")]
    DivertorMissingGap,

    #[error("second divertor entry must be lower_divertor or upper_divertor")]
    DivertorMissingRole,

    #[error("vertical build has {available} entries on one side of the plasma, {needed} needed")]
    VerticalTooShort { needed: usize, available: usize },
}

/// A validated `[(gap, g), (role, t)]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivertorBuild {
    pub role: DivertorRole,
    /// Radial distance from the machine axis to the divertor.
    pub gap: f64,
    pub thickness: f64,
}

impl DivertorBuild {
    pub fn entries(&self) -> [BuildEntry; 2] {
        [
            BuildEntry::gap(self.gap),
            BuildEntry::divertor(self.role, self.thickness),
        ]
    }
}

fn check_thicknesses(build: &[BuildEntry]) -> Result<(), StructureError> {
    for (index, entry) in build.iter().enumerate() {
        if !entry.thickness.is_finite() {
            return Err(StructureError::NonNumericThickness {
                index,
                thickness: entry.thickness,
            });
        }
        if entry.thickness <= 0.0 {
            return Err(StructureError::NonPositiveThickness {
                index,
                thickness: entry.thickness,
            });
        }
    }
    Ok(())
}

/// Check that `build` is a plasma build: positive thicknesses, exactly one
/// plasma entry, not at either end, with a gap on each side.
pub fn validate_plasma_radial_build(build: &[BuildEntry]) -> Result<(), StructureError> {
    if build.is_empty() {
        return Err(StructureError::Empty);
    }
    check_thicknesses(build)?;
    if let Some((index, role)) = build.iter().enumerate().find_map(|(i, e)| match e.tag {
        LayerTag::Divertor(role) => Some((i, role)),
        LayerTag::Kind(_) => None,
    }) {
        return Err(StructureError::MisplacedDivertor { index, role });
    }

    let plasma: Vec<usize> = build
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is(LayerKind::Plasma))
        .map(|(i, _)| i)
        .collect();
    let &[index] = plasma.as_slice() else {
        return Err(StructureError::PlasmaCount {
            count: plasma.len(),
        });
    };
    if index == 0 || index == build.len() - 1 {
        return Err(StructureError::PlasmaAtEdge { index });
    }
    for neighbour in [index - 1, index + 1] {
        if !build[neighbour].is(LayerKind::Gap) {
            return Err(StructureError::PlasmaNotBracketed { index: neighbour });
        }
    }
    Ok(())
}

/// Vertical builds follow the same rules as radial ones.
pub fn validate_plasma_vertical_build(build: &[BuildEntry]) -> Result<(), StructureError> {
    validate_plasma_radial_build(build)
}

/// Check a `[(gap, g), (role, t)]` divertor build and return its parts.
pub fn validate_divertor_radial_build(
    build: &[BuildEntry],
) -> Result<DivertorBuild, StructureError> {
    let [first, second] = build else {
        return Err(StructureError::DivertorLength { len: build.len() });
    };
    check_thicknesses(build)?;
    if !first.is(LayerKind::Gap) {
        return Err(StructureError::DivertorMissingGap);
    }
    let LayerTag::Divertor(role) = second.tag else {
        return Err(StructureError::DivertorMissingRole);
    };
    Ok(DivertorBuild {
        role,
        gap: first.thickness,
        thickness: second.thickness,
    })
}
