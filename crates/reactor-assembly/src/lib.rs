//! Reactor assembly: build validation, build arithmetic and the four
//! top-level composers that turn builds into named bodies.

pub mod arithmetic;
pub mod assembly;
pub mod composer;
pub mod config;
pub mod error;
pub mod options;
pub mod validate;

pub use arithmetic::{
    count_cylinder_layers, plasma_index, plasma_value, sum_after_plasma, sum_before_after_plasma,
    sum_up_to_gap_before_plasma, sum_up_to_plasma, synthesize_vertical_build, total_thickness,
    PlasmaGeometry,
};
pub use assembly::{Assembly, AssemblyBody, BodyRole};
pub use composer::{spherical_tokamak, spherical_tokamak_from_plasma, tokamak, tokamak_from_plasma};
pub use config::{ConfigError, ReactorConfig, ReactorForm};
pub use error::{AssemblyError, ErrorKind};
pub use options::{ExtraShapes, RadialBuildSpec, ReactorOptions};
pub use validate::{
    validate_divertor_radial_build, validate_plasma_radial_build, validate_plasma_vertical_build,
    DivertorBuild, StructureError,
};
