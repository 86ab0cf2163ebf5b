pub mod boolean;
pub mod envelope;
pub mod kernel_ext;
pub mod points;
pub mod types;

pub use boolean::{apply_boolean, fold_boolean, union_all, BooleanKind};
pub use envelope::{ShapeEnvelope, Solidify};
pub use kernel_ext::KernelBundle;
pub use points::build_segments;
pub use types::*;
