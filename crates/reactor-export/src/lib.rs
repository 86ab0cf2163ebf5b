//! File output for reactor assemblies. Reads an assembly and the kernel
//! that built it; never changes either.

pub mod errors;
pub mod manifest;
pub mod output;
pub mod step;
pub mod stl;

pub use errors::ExportError;
pub use manifest::{export_manifest, Manifest, ManifestBody, MANIFEST_VERSION};
pub use output::{body_file_name, write_outputs, ExportedFile};
pub use step::export_step;
pub use stl::{export_stl, mesh_to_stl, StlFormat};
