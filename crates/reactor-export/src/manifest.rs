use chrono::{DateTime, Utc};
use reactor_assembly::{Assembly, BodyRole};
use reactor_kernel::KernelIntrospect;
use reactor_types::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ExportError;
use crate::output::ExportedFile;

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// One body as listed in a manifest. `index` matches the numeric prefix of
/// the body's exported file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestBody {
    pub index: usize,
    pub name: String,
    pub role: BodyRole,
    pub color: Color,
    pub volume: f64,
}

/// Summary of an exported assembly, for material assignment downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format: String,
    pub version: u32,
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub bodies: Vec<ManifestBody>,
    pub warnings: Vec<String>,
}

impl Manifest {
    /// Describe `assembly`, measuring each body with `kernel`.
    pub fn from_assembly(
        assembly: &Assembly,
        kernel: &dyn KernelIntrospect,
    ) -> Result<Self, ExportError> {
        let bodies = assembly
            .bodies()
            .iter()
            .enumerate()
            .map(|(index, body)| {
                let volume =
                    kernel
                        .volume(&body.solid)
                        .map_err(|source| ExportError::MeasureFailed {
                            body: body.name.clone(),
                            source,
                        })?;
                Ok(ManifestBody {
                    index,
                    name: body.name.clone(),
                    role: body.role,
                    color: body.color,
                    volume,
                })
            })
            .collect::<Result<Vec<_>, ExportError>>()?;
        Ok(Self {
            format: "reactor-assembly".to_string(),
            version: MANIFEST_VERSION,
            id: Uuid::new_v4(),
            created: Utc::now(),
            bodies,
            warnings: assembly.warnings().iter().map(|w| w.to_string()).collect(),
        })
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::ManifestFailed(e.to_string()))
    }
}

/// The manifest as a `manifest.json` file.
pub fn export_manifest(
    assembly: &Assembly,
    kernel: &dyn KernelIntrospect,
) -> Result<ExportedFile, ExportError> {
    if assembly.is_empty() {
        return Err(ExportError::NoBodies);
    }
    let manifest = Manifest::from_assembly(assembly, kernel)?;
    Ok(ExportedFile {
        file_name: "manifest.json".to_string(),
        contents: manifest.to_json()?.into_bytes(),
    })
}
