use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Non-fatal geometry findings. Logged and collected, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryWarning {
    /// Offset points that fell on the far side of the machine axis.
    NegativeRadiusDropped { shape: String, dropped: usize },
    /// A point removed for another reason.
    PointDropped { shape: String, reason: String },
    /// Azimuthal copies of a body overlap each other.
    AzimuthalOverlap { shape: String, angles: Vec<f64> },
    /// An intersect mask had no structure to intersect with.
    EmptyIntersectMask { shape: String },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::NegativeRadiusDropped { shape, dropped } => write!(
                f,
                "{}: dropped {} offset point(s) with negative radius",
                shape, dropped
            ),
            GeometryWarning::PointDropped { shape, reason } => {
                write!(f, "{}: point dropped ({})", shape, reason)
            }
            GeometryWarning::AzimuthalOverlap { shape, angles } => write!(
                f,
                "{}: azimuthal copies at {:?} degrees overlap",
                shape, angles
            ),
            GeometryWarning::EmptyIntersectMask { shape } => write!(
                f,
                "{}: no cylinders or blankets to intersect, body not emitted",
                shape
            ),
        }
    }
}

/// Non-fatal diagnostics gathered while building shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub warnings: Vec<GeometryWarning>,
}

impl Diagnostics {
    /// Record a warning and emit it on the log.
    pub fn warn(&mut self, warning: GeometryWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Errors from shape construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShapeError {
    #[error("kernel error: {0}")]
    Kernel(#[from] reactor_kernel::KernelError),

    /// Malformed point sequence.
    #[error("invalid points for '{shape}': {reason}")]
    InvalidPoints { shape: String, reason: String },

    /// Numerically valid value outside the supported range.
    #[error("invalid parameter for '{shape}': {reason}")]
    InvalidParameter { shape: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_accumulate_in_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.warn(GeometryWarning::NegativeRadiusDropped {
            shape: "layer_1".into(),
            dropped: 3,
        });
        diagnostics.warn(GeometryWarning::PointDropped {
            shape: "layer_1".into(),
            reason: "duplicate".into(),
        });
        assert_eq!(diagnostics.warnings.len(), 2);
        assert_eq!(
            diagnostics.warnings[0].to_string(),
            "layer_1: dropped 3 offset point(s) with negative radius"
        );
    }
}
