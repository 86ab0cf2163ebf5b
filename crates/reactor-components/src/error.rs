use reactor_kernel::KernelError;
use reactor_shapes::ShapeError;

/// Errors from component builders.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ComponentError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Numerically valid value outside the supported range.
    #[error("{component}: {reason}")]
    InvalidParameter {
        component: &'static str,
        reason: String,
    },

    /// Value of the wrong category, e.g. a non-finite number.
    #[error("{component}: {reason}")]
    InvalidType {
        component: &'static str,
        reason: String,
    },
}

impl From<KernelError> for ComponentError {
    fn from(e: KernelError) -> Self {
        ComponentError::Shape(e.into())
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(
    component: &'static str,
    what: &str,
    value: f64,
) -> Result<(), ComponentError> {
    require_finite(component, what, value)?;
    if value <= 0.0 {
        return Err(ComponentError::InvalidParameter {
            component,
            reason: format!("{} must be positive, got {}", what, value),
        });
    }
    Ok(())
}

pub(crate) fn require_finite(
    component: &'static str,
    what: &str,
    value: f64,
) -> Result<(), ComponentError> {
    if !value.is_finite() {
        return Err(ComponentError::InvalidType {
            component,
            reason: format!("{} must be a finite number, got {}", what, value),
        });
    }
    Ok(())
}

/// Revolution angles live in (0, 360].
pub(crate) fn require_rotation_angle(
    component: &'static str,
    angle: f64,
) -> Result<(), ComponentError> {
    require_finite(component, "rotation_angle", angle)?;
    if angle <= 0.0 || angle > 360.0 {
        return Err(ComponentError::InvalidParameter {
            component,
            reason: format!("rotation_angle must be in (0, 360], got {}", angle),
        });
    }
    Ok(())
}
