//! Human-readable equations for logs and reports
//!
//! ```text
//! y(x) = 0.0057x³ + 0.0732x² + 0.3299x + 0.5316
//! ```
//!
//! Highest power first, [`EQUATION_DECIMALS`] decimals per coefficient, with scientific
//! notation outside `[1e-3, 1e3)`. These strings are rounded for reading. Exact values are
//! in [`crate::export`] artifacts and the coefficient lines of [`crate::report`].
use std::fmt::Write;

use crate::value::Value;

pub mod unicode;

/// Decimal places shown for each coefficient of an equation.
pub const EQUATION_DECIMALS: usize = 4;

/// How a basis names its terms when a polynomial is printed.
pub trait PolynomialDisplay<T: Value> {
    /// The basis function of the given rank without its coefficient, such as `x²` or `T₂(xₛ)`.
    ///
    /// Empty for the constant term.
    fn term_label(&self, rank: usize) -> String;

    /// An input substitution printed before the equation, for bases over a rescaled `x`.
    fn scaling_formula(&self) -> Option<String> {
        None
    }

    /// Writes `y(x) = …` for the given coefficients, `coefficients[k]` weighting the rank `k`
    /// basis function. Vanishing terms are skipped and an all-zero polynomial prints as `0`.
    ///
    /// # Errors
    /// Returns an error if writing to `out` fails.
    fn write_equation<W: Write>(&self, out: &mut W, coefficients: &[T]) -> std::fmt::Result {
        if let Some(scaling) = self.scaling_formula() {
            write!(out, "{scaling}, ")?;
        }
        out.write_str("y(x) = ")?;

        let mut empty = true;
        for (rank, &c) in coefficients.iter().enumerate().rev() {
            let Some(magnitude) = coefficient_text(c, rank) else {
                continue;
            };

            let label = self.term_label(rank);
            let glue = if magnitude.is_empty() || label.is_empty() || label.starts_with('x') {
                ""
            } else {
                "·"
            };

            match (empty, c < T::zero()) {
                (true, true) => out.write_char('-')?,
                (true, false) => {}
                (false, true) => out.write_str(" - ")?,
                (false, false) => out.write_str(" + ")?,
            }
            write!(out, "{magnitude}{glue}{label}")?;
            empty = false;
        }

        if empty {
            out.write_char('0')?;
        }
        Ok(())
    }
}

/// Unsigned coefficient text for an equation term.
///
/// `None` when the coefficient is within epsilon of zero. A unit coefficient on a
/// non-constant term is left implicit and gives an empty string.
///
/// # Example
/// ```
/// # use sigfit::display::coefficient_text;
/// assert_eq!(coefficient_text(-0.07323628, 2), Some("0.0732".to_string()));
/// assert_eq!(coefficient_text(1.0, 3), Some(String::new()));
/// assert_eq!(coefficient_text(2e-5, 1), Some("2.0000e-5".to_string()));
/// assert_eq!(coefficient_text(0.0, 0), None);
/// ```
pub fn coefficient_text<T: Value>(c: T, rank: usize) -> Option<String> {
    let magnitude = Value::abs(c);
    if magnitude <= T::epsilon() {
        return None;
    }
    if rank != 0 && Value::abs(magnitude - T::one()) <= T::epsilon() {
        return Some(String::new());
    }

    let fixed = T::try_cast(1e-3).ok().zip(T::try_cast(1e3).ok()).map(|(lo, hi)| lo..hi);
    Some(unicode::float(magnitude, fixed, EQUATION_DECIMALS))
}

/// `base` raised to `rank`: empty, `x`, `x²`, `x³` and so on.
#[must_use]
pub fn power_label(base: &str, rank: usize) -> String {
    match rank {
        0 => String::new(),
        1 => base.to_string(),
        _ => format!("{base}{}", unicode::superscript(&rank.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Powers;
    impl PolynomialDisplay<f64> for Powers {
        fn term_label(&self, rank: usize) -> String {
            power_label("x", rank)
        }
    }

    struct Labeled;
    impl PolynomialDisplay<f64> for Labeled {
        fn term_label(&self, rank: usize) -> String {
            if rank == 0 {
                String::new()
            } else {
                format!("P{}", unicode::subscript(&rank.to_string()))
            }
        }

        fn scaling_formula(&self) -> Option<String> {
            Some("t = x / 2".to_string())
        }
    }

    fn equation<D: PolynomialDisplay<f64>>(d: &D, coefficients: &[f64]) -> String {
        let mut out = String::new();
        d.write_equation(&mut out, coefficients).unwrap();
        out
    }

    #[test]
    fn test_equation_orders_and_signs() {
        assert_eq!(equation(&Powers, &[2.0, -3.0, 0.0, 4.0]), "y(x) = 4.0000x³ - 3.0000x + 2.0000");
        assert_eq!(equation(&Powers, &[1.0, -1.0]), "y(x) = -x + 1.0000");
        assert_eq!(equation(&Powers, &[0.0, 1e-20]), "y(x) = 0");
        assert_eq!(equation(&Powers, &[]), "y(x) = 0");
    }

    #[test]
    fn test_credit_cubic() {
        let c = [0.531_636_42, 0.329_914_45, 0.073_236_28, 0.005_682_78];
        assert_eq!(equation(&Powers, &c), "y(x) = 0.0057x³ + 0.0732x² + 0.3299x + 0.5316");
    }

    #[test]
    fn test_labels_and_scaling() {
        assert_eq!(
            equation(&Labeled, &[0.5, 0.0, -2.0]),
            "t = x / 2, y(x) = -2.0000·P₂ + 0.5000"
        );
    }

    #[test]
    fn test_power_label() {
        assert_eq!(power_label("x", 0), "");
        assert_eq!(power_label("x", 1), "x");
        assert_eq!(power_label("x", 12), "x¹²");
    }
}
