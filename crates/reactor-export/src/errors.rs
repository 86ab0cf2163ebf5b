use reactor_kernel::KernelError;

/// Errors while exporting an assembly.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("assembly has no bodies to export")]
    NoBodies,

    #[error("tessellation of '{body}' failed: {source}")]
    TessellationFailed { body: String, source: KernelError },

    #[error("STEP export of '{body}' failed: {source}")]
    StepExportFailed { body: String, source: KernelError },

    #[error("volume query for '{body}' failed: {source}")]
    MeasureFailed { body: String, source: KernelError },

    #[error("manifest serialization failed: {0}")]
    ManifestFailed(String),

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}
