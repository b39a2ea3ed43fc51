//! Target functions being approximated
//!
//! A [`Target`] supplies the ground truth every polynomial is fitted against and
//! judged by. [`Logistic`] is the one this crate exists for.
use crate::{
    error::{Error, Result},
    value::Value,
};

/// A scalar function to approximate with a polynomial.
///
/// Implementations must be deterministic and must return finite values over any
/// domain they are used with.
pub trait Target<T: Value = f64>: Send + Sync {
    /// Short name used in logs, reports and artifact headers.
    fn name(&self) -> &str;

    /// Evaluates the function at `x`.
    fn y(&self, x: T) -> T;

    /// Evaluates the function at `x`, rejecting non-finite results.
    ///
    /// # Errors
    /// Returns [`Error::NumericOverflow`] if the result is infinite or NaN.
    fn try_y(&self, x: T) -> Result<T> {
        let y = self.y(x);
        if y.is_finite_value() {
            Ok(y)
        } else {
            Err(Error::NumericOverflow(format!(
                "{}({x}) = {y}",
                self.name()
            )))
        }
    }
}

/// The logistic sigmoid `f(x) = 1 / (1 + e^-x)`.
///
/// Evaluated in a form that never exponentiates a positive number:
///
/// ```text
/// x ≥ 0:  1 / (1 + e^-x)
/// x < 0:  e^x / (1 + e^x)
/// ```
///
/// so the result stays finite and inside `[0, 1]` for every finite `x`, including
/// magnitudes where `e^|x|` overflows.
///
/// # Example
/// ```
/// # use sigfit::target::{Logistic, Target};
/// assert_eq!(Logistic.y(0.0), 0.5);
/// assert!((Logistic.y(-1.0f64) - 0.268_941_42).abs() < 1e-8);
/// assert_eq!(Logistic.y(-1000.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Logistic;

impl<T: Value> Target<T> for Logistic {
    fn name(&self) -> &str {
        "sigmoid"
    }

    fn y(&self, x: T) -> T {
        if x.is_sign_negative() {
            let z = x.exp();
            z / (T::one() + z)
        } else {
            T::one() / (T::one() + (-x).exp())
        }
    }
}
