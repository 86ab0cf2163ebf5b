pub mod color;
pub mod layer;
pub mod profile;

pub use color::*;
pub use layer::*;
pub use profile::*;
