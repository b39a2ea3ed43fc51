use std::borrow::Cow;

use crate::{
    basis::{Basis, IntoMonomialBasis},
    display::PolynomialDisplay,
    error::Result,
    statistics,
    value::{CoordExt, Value},
    MonomialPolynomial,
};

/// Represents a polynomial function in a given basis.
///
/// Unlike [`crate::CurveFit`], this struct is **not tied to any dataset or matrix**, making it a canonical function that
/// can be evaluated for **any x-value**.
///
/// # Type Parameters
/// - `'a`: Lifetime for borrowed basis or coefficients, if used.
/// - `B`: The polynomial basis (e.g., [`crate::basis::MonomialBasis`], [`crate::basis::ChebyshevBasis`]).
/// - `T`: Numeric type for the coefficients, default is `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<'a, B, T: Value = f64>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    degree: usize,
    basis: B,
    coefficients: Cow<'a, [T]>,
}
impl<'a, B, T: Value> Polynomial<'a, B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    /// Creates a [`Polynomial`] from a given basis, coefficients, and degree.
    ///
    /// # Safety
    /// This constructor does not check that the degree matches the number of
    /// coefficients expected by the basis.
    ///
    /// The length of coefficients must be equal to `Basis::k(degree)`
    pub unsafe fn from_raw(basis: B, coefficients: Cow<'a, [T]>, degree: usize) -> Self {
        Self {
            degree,
            basis,
            coefficients,
        }
    }

    /// Creates a new polynomial from a basis and coefficients, inferring the degree.
    ///
    /// # Errors
    /// Returns an error if the number of coefficients does not correspond to a valid degree for the given basis.
    pub fn from_basis(basis: B, coefficients: impl Into<Cow<'a, [T]>>) -> Result<Self> {
        let coefficients = coefficients.into();
        let degree = basis.degree(coefficients.len()).ok_or(
            crate::error::Error::InvalidNumberOfParameters(coefficients.len()),
        )?;
        Ok(unsafe { Self::from_raw(basis, coefficients, degree) })
    }

    /// Decomposes the polynomial into its basis, coefficients, and degree.
    pub fn into_inner(self) -> (B, Cow<'a, [T]>, usize) {
        (self.basis, self.coefficients, self.degree)
    }

    /// Returns a reference to the polynomial's basis.
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// Converts the polynomial into an owned version.
    pub fn into_owned(self) -> Polynomial<'static, B, T> {
        Polynomial {
            degree: self.degree,
            basis: self.basis,
            coefficients: Cow::Owned(self.coefficients.into_owned()),
        }
    }

    /// Returns a reference to the polynomial’s coefficients.
    ///
    /// The index of each coefficient is the index of its basis function.
    ///
    /// For example in a monomial expression `y(x) = 2x^2 - 3x + 1`;
    /// coefficients = [1.0, -3.0, 2.0]
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Returns the degree of the polynomial.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluates the polynomial at a given x-value.
    ///
    /// `x` is normalized by the basis, then the coefficients are combined in the
    /// evaluation order of that basis; see [`Basis::evaluate`].
    ///
    /// # Example
    /// ```
    /// # use sigfit::MonomialPolynomial;
    /// let poly = MonomialPolynomial::borrowed(&[1.0, 2.0, 3.0]); // Represents 1 + 2x + 3x^2
    /// let y = poly.y(2.0); // evaluates 1 + 2*2 + 3*2^2 = 17.0
    /// assert_eq!(y, 17.0);
    /// ```
    pub fn y(&self, x: T) -> T {
        let x = self.basis.normalize_x(x);
        self.basis.evaluate(x, &self.coefficients)
    }

    /// Calculates the R-squared value for the model compared to provided data.
    ///
    /// See [`statistics::r_squared`] for more details.
    pub fn r_squared(&self, data: &[(T, T)]) -> T {
        let y_fit = data.x_iter().map(|x| self.y(x));
        statistics::r_squared(data.y_iter(), y_fit)
    }

    /// Largest absolute difference between the polynomial and the provided data.
    ///
    /// See [`statistics::max_absolute_error`] for more details.
    pub fn max_absolute_error(&self, data: &[(T, T)]) -> T {
        let y_fit = data.x_iter().map(|x| self.y(x));
        statistics::max_absolute_error(data.y_iter(), y_fit)
    }

    /// Converts this polynomial into the monomial basis over the raw `x`.
    ///
    /// # Errors
    /// Returns an error if the basis cannot convert its coefficients.
    ///
    /// # Example
    /// ```rust
    /// # use sigfit::basis::ChebyshevBasis;
    /// let poly = ChebyshevBasis::new_polynomial((-3.0, -1.0), &[0.1f64, 0.2, 0.3]).unwrap();
    /// let mono = poly.as_monomial().unwrap();
    /// assert!((mono.y(-2.5) - poly.y(-2.5)).abs() < 1e-12);
    /// ```
    pub fn as_monomial(&self) -> Result<MonomialPolynomial<'static, T>>
    where
        B: IntoMonomialBasis<T>,
    {
        let mut coefficients = self.coefficients().to_vec();
        self.basis().as_monomial(&mut coefficients)?;
        Ok(MonomialPolynomial::owned(coefficients))
    }

    /// Returns a human-readable string of the polynomial equation.
    ///
    /// # Example
    /// ```
    /// # use sigfit::MonomialPolynomial;
    /// let poly = MonomialPolynomial::borrowed(&[1.0, 2.0, 3.0]); // 1 + 2x + 3x^2
    /// assert_eq!(poly.equation(), "y(x) = 3.0000x² + 2.0000x + 1.0000");
    /// ```
    #[must_use]
    pub fn equation(&self) -> String {
        self.to_string()
    }
}

impl<B, T: Value> std::fmt::Display for Polynomial<'_, B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.basis.write_equation(f, self.coefficients())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::{assert_close, basis::ChebyshevBasis, MonomialBasis};

    use super::*;

    #[test]
    fn test_y() {
        let poly = MonomialPolynomial::borrowed(&[8.0, 7.0, 6.0]);
        assert_eq!(poly.y(0.0), 8.0);
        assert_eq!(poly.y(1.0), 21.0);
        assert_eq!(poly.y(2.0), 46.0);
        assert_eq!(poly.degree(), 2);
    }

    #[test]
    fn test_from_basis_rejects_empty() {
        let empty: &[f64] = &[];
        assert!(Polynomial::from_basis(MonomialBasis::default(), empty).is_err());
    }

    #[test]
    fn test_owned_and_inner() {
        let coefs = vec![1.0, 2.0];
        let poly = MonomialPolynomial::borrowed(&coefs).into_owned();
        let (_, c, degree) = poly.into_inner();
        assert_eq!(c.as_ref(), &[1.0, 2.0]);
        assert_eq!(degree, 1);
    }

    #[test]
    fn test_errors_against_data() {
        let poly = MonomialPolynomial::borrowed(&[0.0, 1.0]);
        let data = vec![(0.0, 0.0), (1.0, 1.5), (2.0, 2.0)];
        assert_eq!(poly.max_absolute_error(&data), 0.5);

        let exact = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        assert_eq!(poly.r_squared(&exact), 1.0);
    }

    #[test]
    fn test_as_monomial() {
        let poly = ChebyshevBasis::new_polynomial((-3.0, -1.0), &[0.5, -0.25, 0.125]).unwrap();
        let mono = poly.as_monomial().unwrap();
        assert_eq!(mono.degree(), 2);
        for x in [-3.0, -2.2, -1.7, -1.0] {
            assert_close!(mono.y(x), poly.y(x), 1e-12);
        }
    }

    #[test]
    fn test_display() {
        let poly = MonomialPolynomial::borrowed(&[1.0, -3.0, 2.0]);
        assert_eq!(poly.equation(), "y(x) = 2.0000x² - 3.0000x + 1.0000");
        assert_eq!(poly.to_string(), poly.equation());
    }
}
