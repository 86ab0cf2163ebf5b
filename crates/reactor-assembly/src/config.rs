//! JSON description of a reactor: which composer to run, its builds and
//! its options.

use reactor_shapes::KernelBundle;
use reactor_types::BuildEntry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembly::Assembly;
use crate::composer::{spherical_tokamak, spherical_tokamak_from_plasma, tokamak, tokamak_from_plasma};
use crate::error::AssemblyError;
use crate::options::{ExtraShapes, RadialBuildSpec, ReactorOptions};

/// Errors reading or running a reactor description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse reactor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("form {form:?} needs a vertical_build")]
    MissingVerticalBuild { form: ReactorForm },

    #[error("form {form:?} derives its vertical build and does not accept one")]
    UnexpectedVerticalBuild { form: ReactorForm },

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Which composer a config runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactorForm {
    Tokamak,
    TokamakFromPlasma,
    SphericalTokamak,
    SphericalTokamakFromPlasma,
}

impl ReactorForm {
    pub fn needs_vertical_build(self) -> bool {
        matches!(self, ReactorForm::Tokamak | ReactorForm::SphericalTokamak)
    }
}

/// A reactor description, e.g.
///
/// ```json
/// {
///   "form": "spherical_tokamak_from_plasma",
///   "radial_build": [["gap", 10], ["solid", 50], ["gap", 50],
///                    ["plasma", 300], ["gap", 60], ["solid", 15]],
///   "options": { "elongation": 2.0, "rotation_angle": 180 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorConfig {
    pub form: ReactorForm,
    pub radial_build: RadialBuildSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_build: Option<Vec<BuildEntry>>,
    #[serde(default)]
    pub options: ReactorOptions,
}

impl ReactorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ReactorConfig = serde_json::from_str(json)?;
        config.check_form()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_form(&self) -> Result<(), ConfigError> {
        match (self.form.needs_vertical_build(), self.vertical_build.is_some()) {
            (true, false) => Err(ConfigError::MissingVerticalBuild { form: self.form }),
            (false, true) => Err(ConfigError::UnexpectedVerticalBuild { form: self.form }),
            _ => Ok(()),
        }
    }

    /// Run the composer named by `form`.
    pub fn build(
        &self,
        kb: &mut dyn KernelBundle,
        extra: &ExtraShapes,
    ) -> Result<Assembly, ConfigError> {
        self.check_form()?;
        info!(form = ?self.form, "building reactor from config");
        let vertical = self.vertical_build.as_deref().unwrap_or(&[]);
        let assembly = match self.form {
            ReactorForm::Tokamak => tokamak(kb, &self.radial_build, vertical, &self.options, extra)?,
            ReactorForm::TokamakFromPlasma => {
                tokamak_from_plasma(kb, &self.radial_build, &self.options, extra)?
            }
            ReactorForm::SphericalTokamak => {
                spherical_tokamak(kb, &self.radial_build, vertical, &self.options, extra)?
            }
            ReactorForm::SphericalTokamakFromPlasma => {
                spherical_tokamak_from_plasma(kb, &self.radial_build, &self.options, extra)?
            }
        };
        Ok(assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactor_kernel::MockKernel;

    const S1: &str = r#"{
        "form": "spherical_tokamak_from_plasma",
        "radial_build": [["gap", 10], ["solid", 50], ["solid", 15], ["gap", 50],
                         ["plasma", 300], ["gap", 60], ["solid", 15], ["solid", 60],
                         ["solid", 10], ["gap", 10]]
    }"#;

    #[test]
    fn parses_and_builds_s1() {
        let config = ReactorConfig::from_json_str(S1).unwrap();
        assert_eq!(config.form, ReactorForm::SphericalTokamakFromPlasma);
        assert_eq!(config.options, ReactorOptions::default());
        let mut kb = MockKernel::new();
        let assembly = config.build(&mut kb, &ExtraShapes::none()).unwrap();
        assert_eq!(assembly.len(), 6);
    }

    #[test]
    fn explicit_forms_need_a_vertical_build() {
        let json = S1.replace("spherical_tokamak_from_plasma", "tokamak");
        assert!(matches!(
            ReactorConfig::from_json_str(&json),
            Err(ConfigError::MissingVerticalBuild {
                form: ReactorForm::Tokamak
            })
        ));
    }

    #[test]
    fn unknown_form_is_a_parse_error() {
        let json = S1.replace("spherical_tokamak_from_plasma", "stellarator");
        assert!(matches!(
            ReactorConfig::from_json_str(&json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn config_survives_a_json_round_trip() {
        let config = ReactorConfig::from_json_str(S1).unwrap();
        let json = config.to_json_string().unwrap();
        assert_eq!(ReactorConfig::from_json_str(&json).unwrap(), config);
    }
}
