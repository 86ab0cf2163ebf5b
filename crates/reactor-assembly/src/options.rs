use reactor_kernel::KernelSolidHandle;
use reactor_types::BuildEntry;
use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;
use crate::validate::{
    validate_divertor_radial_build, validate_plasma_radial_build, DivertorBuild, StructureError,
};

/// Shaping and discretisation options shared by the four composers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorOptions {
    pub triangularity: f64,
    /// Degrees, in (0, 360].
    pub rotation_angle: f64,
    /// Only read by the `_from_plasma` composers.
    pub elongation: f64,
    pub vertical_displacement: f64,
    pub plasma_points: usize,
    pub blanket_points: usize,
    /// Keep negative-radius blanket points off the warning channel.
    pub allow_overlapping_shape: bool,
}

impl Default for ReactorOptions {
    fn default() -> Self {
        Self {
            triangularity: 0.55,
            rotation_angle: 180.0,
            elongation: 2.0,
            vertical_displacement: 0.0,
            plasma_points: 50,
            blanket_points: 50,
            allow_overlapping_shape: false,
        }
    }
}

impl ReactorOptions {
    pub fn validate(&self) -> Result<(), AssemblyError> {
        let invalid = |parameter: &'static str, reason: String| AssemblyError::InvalidParameter {
            parameter,
            reason,
        };
        if !self.triangularity.is_finite() || !(-1.0..=1.0).contains(&self.triangularity) {
            return Err(invalid(
                "triangularity",
                format!("must be in [-1, 1], got {}", self.triangularity),
            ));
        }
        if !self.rotation_angle.is_finite()
            || self.rotation_angle <= 0.0
            || self.rotation_angle > 360.0
        {
            return Err(invalid(
                "rotation_angle",
                format!("must be in (0, 360], got {}", self.rotation_angle),
            ));
        }
        if !self.vertical_displacement.is_finite() {
            return Err(invalid(
                "vertical_displacement",
                format!("must be finite, got {}", self.vertical_displacement),
            ));
        }
        if self.plasma_points < 3 {
            return Err(invalid(
                "plasma_points",
                format!("at least 3 needed, got {}", self.plasma_points),
            ));
        }
        if self.blanket_points < 3 {
            return Err(invalid(
                "blanket_points",
                format!("at least 3 needed, got {}", self.blanket_points),
            ));
        }
        Ok(())
    }

    /// Elongation check for the composers that synthesise a vertical build.
    pub(crate) fn validate_elongation(&self) -> Result<(), AssemblyError> {
        if !self.elongation.is_finite() || self.elongation <= 0.0 || self.elongation > 10.0 {
            return Err(AssemblyError::InvalidParameter {
                parameter: "elongation",
                reason: format!("must be in (0, 10], got {}", self.elongation),
            });
        }
        Ok(())
    }
}

/// Kernel bodies supplied by the caller. Never serialized: handles only
/// mean something inside the kernel session that issued them.
#[derive(Debug, Clone, Default)]
pub struct ExtraShapes {
    /// Subtracted from every reactor body.
    pub cut: Vec<KernelSolidHandle>,
    /// Each yields a masked body of the reactor, and is then subtracted
    /// from the reactor bodies.
    pub intersect: Vec<KernelSolidHandle>,
}

impl ExtraShapes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cut(mut self, cutter: KernelSolidHandle) -> Self {
        self.cut.push(cutter);
        self
    }

    pub fn with_intersect(mut self, mask: KernelSolidHandle) -> Self {
        self.intersect.push(mask);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cut.is_empty() && self.intersect.is_empty()
    }
}

/// Either a plasma build on its own, or a plasma build followed by any
/// number of divertor builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RadialBuildSpec {
    Single(Vec<BuildEntry>),
    Combined(Vec<Vec<BuildEntry>>),
}

impl RadialBuildSpec {
    /// Split into the plasma build and validated divertor builds.
    pub fn split(&self) -> Result<(Vec<BuildEntry>, Vec<DivertorBuild>), StructureError> {
        let (plasma, divertors) = match self {
            RadialBuildSpec::Single(build) => (build.clone(), Vec::new()),
            RadialBuildSpec::Combined(builds) => {
                let (first, rest) = builds.split_first().ok_or(StructureError::Empty)?;
                let divertors = rest
                    .iter()
                    .map(|b| validate_divertor_radial_build(b))
                    .collect::<Result<Vec<_>, _>>()?;
                (first.clone(), divertors)
            }
        };
        validate_plasma_radial_build(&plasma)?;
        Ok((plasma, divertors))
    }

    /// The plasma build, unvalidated.
    pub fn plasma_build(&self) -> &[BuildEntry] {
        match self {
            RadialBuildSpec::Single(build) => build,
            RadialBuildSpec::Combined(builds) => builds.first().map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn with_divertor(self, divertor: DivertorBuild) -> Self {
        let mut builds = match self {
            RadialBuildSpec::Single(build) => vec![build],
            RadialBuildSpec::Combined(builds) => builds,
        };
        builds.push(divertor.entries().to_vec());
        RadialBuildSpec::Combined(builds)
    }
}

impl From<Vec<BuildEntry>> for RadialBuildSpec {
    fn from(build: Vec<BuildEntry>) -> Self {
        RadialBuildSpec::Single(build)
    }
}
