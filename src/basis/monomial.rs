use std::borrow::Cow;

use nalgebra::MatrixViewMut;

use crate::{
    basis::{Basis, IntoMonomialBasis},
    display::{self, PolynomialDisplay},
    error::Result,
    value::{IntClampedCast, Value},
    Polynomial,
};

/// Standard (non-normalized) monomial basis for polynomials.
///
/// The monomial basis represents polynomials using the familiar powers of `x`:
///
/// ```text
/// 1, x, x², …, xⁿ
/// ```
///
/// This is the representation an arithmetic-circuit evaluator consumes: it only needs
/// additions and multiplications by plaintext constants. It is **not normalized**, so
/// high degrees over wide domains are poorly conditioned; the degrees used for circuit
/// evaluation are low enough that this does not matter.
///
/// # Evaluation order
/// [`Basis::evaluate`] uses Horner's scheme, highest power first:
///
/// ```text
/// y = (((cₙ·x + cₙ₋₁)·x + …)·x + c₀
/// ```
///
/// Each step costs one multiplication by `x`, so a degree `n` polynomial needs a
/// multiplicative depth of `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonomialBasis<T: Value = f64>(pub std::marker::PhantomData<T>);
impl<T: Value> MonomialBasis<T> {
    /// Creates a new monomial basis.
    #[must_use]
    pub const fn default() -> Self {
        Self(std::marker::PhantomData)
    }
}
impl<T: Value> Basis<T> for MonomialBasis<T> {
    fn from_range(_x_range: std::ops::RangeInclusive<T>) -> Self {
        Self::default()
    }

    #[inline(always)]
    fn normalize_x(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn denormalize_x(&self, x: T) -> T {
        x
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        mut row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        for j in start_index..row.ncols() {
            row[j] = self.solve_function(j, x);
        }
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: T) -> T {
        match j {
            0 => T::one(),
            1 => x,
            _ => Value::powi(x, j.clamped_cast()),
        }
    }

    #[inline(always)]
    fn evaluate(&self, x: T, coefficients: &[T]) -> T {
        coefficients
            .iter()
            .rev()
            .fold(T::zero(), |acc, &coef| acc * x + coef)
    }
}
impl<T: Value> IntoMonomialBasis<T> for MonomialBasis<T> {
    fn as_monomial(&self, _: &mut [T]) -> Result<()> {
        // Already in monomial form
        Ok(())
    }
}
impl<T: Value> PolynomialDisplay<T> for MonomialBasis<T> {
    fn term_label(&self, rank: usize) -> String {
        display::power_label("x", rank)
    }
}

/// A monomial polynomial of the form `y = a_n * x^n + ... + a_1 * x + a_0`.
///
/// # Type Parameters
/// - `'a`: Lifetime of borrowed coefficients (if used).
/// - `T`: Numeric type (default `f64`).
pub type MonomialPolynomial<'a, T = f64> = Polynomial<'a, MonomialBasis<T>, T>;

impl<'a, T: Value> MonomialPolynomial<'a, T> {
    /// Creates a new borrowed monomial polynomial from a slice of coefficients.
    ///
    /// # Example
    /// ```
    /// # use sigfit::MonomialPolynomial;
    /// let poly = MonomialPolynomial::borrowed(&[1.0, 2.0, 3.0]); // 1 + 2x + 3x^2
    /// assert_eq!(poly.y(2.0), 17.0);
    /// ```
    #[must_use]
    pub fn borrowed(coefficients: &'a [T]) -> Self {
        let degree = coefficients.len().saturating_sub(1);
        // Safety: Monomials expect k+1 coefficients
        unsafe {
            Self::from_raw(
                MonomialBasis::default(),
                Cow::Borrowed(coefficients),
                degree,
            )
        }
    }

    /// Creates a new owned monomial polynomial from a vector of coefficients.
    ///
    /// # Example
    /// ```
    /// # use sigfit::MonomialPolynomial;
    /// let poly = MonomialPolynomial::owned(vec![1.0, 2.0, 3.0]); // 1 + 2x + 3x^2
    /// ```
    #[must_use]
    pub fn owned(coefficients: Vec<T>) -> Self {
        let degree = coefficients.len().saturating_sub(1);
        // Safety: Monomials expect k+1 coefficients
        unsafe { Self::from_raw(MonomialBasis::default(), Cow::Owned(coefficients), degree) }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;

    #[test]
    fn test_monomial_functions() {
        let basis = MonomialBasis::<f64>::default();
        assert_eq!(basis.solve_function(0, 2.0), 1.0);
        assert_eq!(basis.solve_function(1, 2.0), 2.0);
        assert_eq!(basis.solve_function(3, 2.0), 8.0);
        assert_eq!(basis.normalize_x(-3.0), -3.0);
        assert_eq!(basis.k(3), 4);
        assert_eq!(basis.degree(0), None);
    }

    #[test]
    fn test_monomial_matrix_row() {
        let basis = MonomialBasis::<f64>::default();
        let mut m = DMatrix::<f64>::zeros(1, 4);
        basis.fill_matrix_row(0, -2.0, m.row_mut(0));
        assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, -2.0, 4.0, -8.0]);
    }

    #[test]
    fn test_horner_matches_power_sum() {
        let basis = MonomialBasis::<f64>::default();
        let coefs = [0.5, 0.25, 0.0, -0.03125];
        for x in [-3.0, -2.5, -1.0, 0.0, 1.5] {
            let power_sum: f64 = coefs
                .iter()
                .enumerate()
                .map(|(j, c)| c * basis.solve_function(j, x))
                .sum();
            crate::assert_close!(basis.evaluate(x, &coefs), power_sum, 1e-12);
        }
    }

    #[test]
    fn test_horner_order() {
        // ((c3*x + c2)*x + c1)*x + c0
        let basis = MonomialBasis::<f64>::default();
        let coefs = [1.0, 2.0, 3.0, 4.0];
        let x = 0.1;
        let expected = ((4.0 * x + 3.0) * x + 2.0) * x + 1.0;
        assert_eq!(basis.evaluate(x, &coefs), expected);
        assert_eq!(basis.evaluate(x, &[]), 0.0);
    }

    #[test]
    fn test_display() {
        let poly = MonomialPolynomial::borrowed(&[1.0, 0.0, -0.5]);
        assert_eq!(poly.to_string(), "y(x) = -0.5000x² + 1.0000");
    }
}
