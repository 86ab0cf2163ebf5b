use reactor_assembly::Assembly;
use reactor_kernel::Kernel;
use reactor_shapes::KernelBundle;
use tracing::debug;

use crate::errors::ExportError;
use crate::output::{body_file_name, ExportedFile};

/// One STEP document per body, written by the kernel.
pub fn export_step(
    assembly: &Assembly,
    kb: &mut dyn KernelBundle,
) -> Result<Vec<ExportedFile>, ExportError> {
    if assembly.is_empty() {
        return Err(ExportError::NoBodies);
    }
    let mut files = Vec::with_capacity(assembly.len());
    for (index, body) in assembly.bodies().iter().enumerate() {
        let file_name = body_file_name(index, &body.name, "step");
        let document = kb
            .export_step(&body.solid, &file_name)
            .map_err(|source| ExportError::StepExportFailed {
                body: body.name.clone(),
                source,
            })?;
        debug!(name = %body.name, bytes = document.len(), "step");
        files.push(ExportedFile {
            file_name,
            contents: document.into_bytes(),
        });
    }
    Ok(files)
}
