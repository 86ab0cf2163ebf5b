//! Thickness and offset profiles as functions of poloidal angle.

use std::fmt;
use std::sync::Arc;

use crate::error::ComponentError;

/// A scalar that may vary with poloidal angle (degrees).
#[derive(Clone)]
pub enum ThicknessSpec {
    Constant(f64),
    /// Values evenly spaced over the builder's angle range, linearly
    /// interpolated between.
    Linear(Vec<f64>),
    /// Explicit `(angle, value)` samples, linearly interpolated and held
    /// constant beyond the outermost samples.
    Sampled { angles: Vec<f64>, values: Vec<f64> },
    Callable(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl ThicknessSpec {
    pub fn callable(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        ThicknessSpec::Callable(Arc::new(f))
    }

    pub fn validate(&self, component: &'static str) -> Result<(), ComponentError> {
        let invalid_type = |reason: String| ComponentError::InvalidType { component, reason };
        match self {
            ThicknessSpec::Constant(v) => {
                if !v.is_finite() {
                    return Err(invalid_type(format!("thickness {} is not finite", v)));
                }
            }
            ThicknessSpec::Linear(values) => {
                if values.is_empty() {
                    return Err(invalid_type("thickness list is empty".to_string()));
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(invalid_type("thickness list has a non-finite value".to_string()));
                }
            }
            ThicknessSpec::Sampled { angles, values } => {
                if angles.len() != values.len() {
                    return Err(ComponentError::InvalidParameter {
                        component,
                        reason: format!(
                            "{} angles given for {} values",
                            angles.len(),
                            values.len()
                        ),
                    });
                }
                if angles.is_empty() {
                    return Err(invalid_type("thickness samples are empty".to_string()));
                }
                if angles.iter().chain(values).any(|v| !v.is_finite()) {
                    return Err(invalid_type("thickness samples are not finite".to_string()));
                }
            }
            ThicknessSpec::Callable(_) => {}
        }
        Ok(())
    }

    /// Value at `theta` degrees for a builder sweeping `start..=stop`.
    pub fn evaluate(&self, theta: f64, start: f64, stop: f64) -> f64 {
        match self {
            ThicknessSpec::Constant(v) => *v,
            ThicknessSpec::Linear(values) => {
                let n = values.len();
                if n == 1 {
                    return values[0];
                }
                let angles: Vec<f64> = (0..n)
                    .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
                    .collect();
                interpolate(&angles, values, theta)
            }
            ThicknessSpec::Sampled { angles, values } => interpolate(angles, values, theta),
            ThicknessSpec::Callable(f) => f(theta),
        }
    }
}

impl From<f64> for ThicknessSpec {
    fn from(v: f64) -> Self {
        ThicknessSpec::Constant(v)
    }
}

impl From<Vec<f64>> for ThicknessSpec {
    fn from(values: Vec<f64>) -> Self {
        ThicknessSpec::Linear(values)
    }
}

impl fmt::Debug for ThicknessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThicknessSpec::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            ThicknessSpec::Linear(v) => f.debug_tuple("Linear").field(v).finish(),
            ThicknessSpec::Sampled { angles, values } => f
                .debug_struct("Sampled")
                .field("angles", angles)
                .field("values", values)
                .finish(),
            ThicknessSpec::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

fn interpolate(angles: &[f64], values: &[f64], theta: f64) -> f64 {
    let mut samples: Vec<(f64, f64)> = angles.iter().copied().zip(values.iter().copied()).collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return 0.0,
    };
    if theta <= first.0 {
        return first.1;
    }
    if theta >= last.0 {
        return last.1;
    }
    for w in samples.windows(2) {
        let ((a0, v0), (a1, v1)) = (w[0], w[1]);
        if theta <= a1 {
            if a1 - a0 <= f64::EPSILON {
                return v1;
            }
            return v0 + (v1 - v0) * (theta - a0) / (a1 - a0);
        }
    }
    last.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_spans_the_angle_range() {
        let spec = ThicknessSpec::Linear(vec![10.0, 20.0, 40.0]);
        assert_relative_eq!(spec.evaluate(-90.0, -90.0, 90.0), 10.0);
        assert_relative_eq!(spec.evaluate(0.0, -90.0, 90.0), 20.0);
        assert_relative_eq!(spec.evaluate(45.0, -90.0, 90.0), 30.0);
        assert_relative_eq!(spec.evaluate(90.0, -90.0, 90.0), 40.0);
    }

    #[test]
    fn linear_handles_a_descending_range() {
        let spec = ThicknessSpec::Linear(vec![5.0, 15.0]);
        assert_relative_eq!(spec.evaluate(90.0, 90.0, -90.0), 5.0);
        assert_relative_eq!(spec.evaluate(-90.0, 90.0, -90.0), 15.0);
        assert_relative_eq!(spec.evaluate(0.0, 90.0, -90.0), 10.0);
    }

    #[test]
    fn sampled_clamps_outside_the_samples() {
        let spec = ThicknessSpec::Sampled {
            angles: vec![0.0, 10.0],
            values: vec![1.0, 3.0],
        };
        assert_relative_eq!(spec.evaluate(-5.0, 0.0, 0.0), 1.0);
        assert_relative_eq!(spec.evaluate(5.0, 0.0, 0.0), 2.0);
        assert_relative_eq!(spec.evaluate(50.0, 0.0, 0.0), 3.0);
    }

    #[test]
    fn callable_is_evaluated_directly() {
        let spec = ThicknessSpec::callable(|theta| theta / 10.0);
        assert_relative_eq!(spec.evaluate(30.0, 0.0, 90.0), 3.0);
        assert_eq!(format!("{:?}", spec), "Callable(..)");
    }

    #[test]
    fn mismatched_samples_are_rejected() {
        let spec = ThicknessSpec::Sampled {
            angles: vec![0.0, 1.0],
            values: vec![1.0],
        };
        assert!(matches!(
            spec.validate("blanket"),
            Err(ComponentError::InvalidParameter { .. })
        ));
        assert!(ThicknessSpec::Constant(f64::NAN).validate("blanket").is_err());
    }
}
