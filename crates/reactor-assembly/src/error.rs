use reactor_components::ComponentError;
use reactor_kernel::KernelError;
use reactor_shapes::ShapeError;

use crate::validate::StructureError;

/// Broad failure category, independent of which layer raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A build breaks a structural rule.
    Structure,
    /// An input has the wrong category, e.g. a handle that is not a solid.
    Type,
    /// A well-formed value outside the supported range.
    Value,
    /// Failure inside the geometry kernel.
    Kernel,
}

/// Errors from reactor composition.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssemblyError {
    #[error("invalid build: {0}")]
    Structure(#[from] StructureError),

    #[error("{list}[{index}] is not a solid of this kernel session")]
    InvalidCutShape { list: &'static str, index: usize },

    #[error("invalid {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}

impl AssemblyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssemblyError::Structure(_) => ErrorKind::Structure,
            AssemblyError::InvalidCutShape { .. } => ErrorKind::Type,
            AssemblyError::InvalidParameter { .. } => ErrorKind::Value,
            AssemblyError::Component(e) => match e {
                ComponentError::Shape(shape) => shape_kind(shape),
                ComponentError::InvalidParameter { .. } => ErrorKind::Value,
                ComponentError::InvalidType { .. } => ErrorKind::Type,
            },
            AssemblyError::Shape(e) => shape_kind(e),
            AssemblyError::Kernel(_) => ErrorKind::Kernel,
        }
    }
}

fn shape_kind(e: &ShapeError) -> ErrorKind {
    match e {
        ShapeError::Kernel(_) => ErrorKind::Kernel,
        ShapeError::InvalidPoints { .. } => ErrorKind::Type,
        ShapeError::InvalidParameter { .. } => ErrorKind::Value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_the_source_layer() {
        let structure: AssemblyError = StructureError::Empty.into();
        assert_eq!(structure.kind(), ErrorKind::Structure);

        let cut = AssemblyError::InvalidCutShape {
            list: "extra_cut_shapes",
            index: 0,
        };
        assert_eq!(cut.kind(), ErrorKind::Type);
        assert_eq!(
            cut.to_string(),
            "extra_cut_shapes[0] is not a solid of this kernel session"
        );

        let value: AssemblyError = ComponentError::InvalidParameter {
            component: "plasma",
            reason: "too elongated".into(),
        }
        .into();
        assert_eq!(value.kind(), ErrorKind::Value);

        let kernel: AssemblyError = ShapeError::from(KernelError::BooleanFailed {
            reason: "empty".into(),
        })
        .into();
        assert_eq!(kernel.kind(), ErrorKind::Kernel);
    }
}
