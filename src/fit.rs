use std::borrow::Cow;

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    basis::{Basis, IntoMonomialBasis},
    display::PolynomialDisplay,
    error::{Error, Result},
    statistics,
    value::{CoordExt, Value},
    MonomialPolynomial, Polynomial,
};

/// Normalized Chebyshev polynomial curve
///
/// Uses the Chebyshev polynomials, which are orthogonal polynomials defined on the interval \[-1, 1\].
/// Better conditioned than [`MonomialFit`]; convert with [`CurveFit::as_monomial`] for export.
pub type ChebyshevFit<'data, T = f64> = CurveFit<'data, crate::basis::ChebyshevBasis<T>, T>;

/// Non-normalized monomial polynomial curve
///
/// Uses the standard monomial functions: 1, x, x^2, ..., x^n
///
/// Its coefficients are directly the ones an arithmetic circuit evaluates.
pub type MonomialFit<'data, T = f64> = CurveFit<'data, crate::basis::MonomialBasis<T>, T>;

/// Iteration cap for the SVD. Convergence for the handful of columns fitted here takes a few
/// dozen sweeps; a NaN that slips through never converges.
const SVD_MAX_ITERATIONS: usize = 10_000;

/// Represents a polynomial curve fit for a set of data points.
///
/// A `CurveFit` computes the least-squares polynomial of a chosen degree that
/// minimizes the sum of squared residuals over the data.
///
/// # Type Parameters
/// - `'data`: Lifetime of the input data reference.
/// - `B`: Basis type for the polynomial (e.g., [`crate::basis::MonomialBasis`]).
/// - `T`: Numeric type (default `f64`).
///
/// # Example
/// ```
/// # use sigfit::MonomialFit;
/// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
/// let fit = MonomialFit::new(data, 2).unwrap();
/// println!("Coefficients: {:?}", fit.coefficients());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit<'data, B, T: Value = f64>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    data: Cow<'data, [(T, T)]>,
    function: Polynomial<'static, B, T>,
}
impl<'data, T: Value, B> CurveFit<'data, B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    /// Turns a dataset into a basis (design) matrix and y-values vector.
    fn create_matrix(data: &[(T, T)], basis: &B, k: usize) -> (DMatrix<T>, DVector<T>) {
        let mut bigx = DMatrix::zeros(data.len(), k);
        let b = DVector::from_iterator(data.len(), data.iter().map(|&(_, y)| y));

        for (row, (x, _)) in bigx.row_iter_mut().zip(data.iter()) {
            let x = basis.normalize_x(*x);
            basis.fill_matrix_row(0, x, row);
        }

        (bigx, b)
    }

    /// Solves the least-squares system `X·c ≈ b` through the SVD of `X`.
    ///
    /// Decomposing the design matrix itself, instead of `XᵀX`, keeps the condition
    /// number from being squared.
    fn solve_matrix(bigx: DMatrix<T>, b: &DVector<T>) -> Result<Vec<T>> {
        let (n, k) = bigx.shape();

        // Powers of a wide domain overflow before the solver sees them
        if bigx.iter().any(|v| !v.is_finite_value()) {
            return Err(Error::Algebra("non-finite entry in design matrix"));
        }

        let convergence = T::epsilon() * T::try_cast(5)?;
        let decomp = SVD::try_new_unordered(bigx, true, true, convergence, SVD_MAX_ITERATIONS)
            .ok_or(Error::Algebra("SVD did not converge"))?;
        if decomp.singular_values.iter().any(|s| !s.is_finite_value()) {
            return Err(Error::Algebra("non-finite singular value"));
        }

        // ~= machine_epsilon * max(size) * max_singular
        let sigma_max = decomp.singular_values.max();
        let epsilon = T::epsilon() * T::try_cast(n.max(k))? * sigma_max;

        let rank = decomp.rank(epsilon);
        if rank < k {
            return Err(Error::SingularMatrix { n, k, rank });
        }

        // Solve for X in `SVD * X = b`
        let big_x = decomp.solve(b, epsilon).map_err(Error::Algebra)?;
        let coefficients: Vec<_> = big_x.data.into();

        // Make sure the coefficients are valid
        if coefficients.iter().any(|c| !c.is_finite_value()) {
            return Err(Error::Algebra("non-finite coefficients"));
        }

        Ok(coefficients)
    }

    /// Creates a new polynomial curve fit for the given data and degree.
    ///
    /// # Errors
    /// Returns an [`Error`] in the following cases:
    /// - `Error::NoData`: `data` is empty.
    /// - `Error::DegreeTooHigh`: `degree` is not below the number of distinct x values.
    /// - `Error::SingularMatrix`: the design matrix is numerically rank deficient.
    /// - `Error::Algebra`: the linear system could not be solved.
    /// - `Error::CastFailed`: a numeric value could not be cast to the target type.
    ///
    /// # Behavior
    /// - Builds the basis matrix, filling each row using [`Basis::fill_matrix_row`].
    /// - Solves `X·c ≈ y` in the least-squares sense.
    ///
    /// The result is deterministic: the same data and degree always produce the same coefficients.
    ///
    /// # Example
    /// ```
    /// # use sigfit::ChebyshevFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = ChebyshevFit::new(data, 2).unwrap();
    /// println!("Coefficients: {:?}", fit.coefficients());
    /// ```
    pub fn new(data: impl Into<Cow<'data, [(T, T)]>>, degree: usize) -> Result<Self> {
        let data: Cow<_> = data.into();

        let x_range = data.x_range().ok_or(Error::NoData)?;
        let distinct = data.distinct_x();
        if degree >= distinct {
            return Err(Error::DegreeTooHigh {
                degree,
                n: distinct,
            });
        }

        let basis = B::from_range(x_range);
        let k = basis.k(degree);

        let (m, b) = Self::create_matrix(&data, &basis, k);
        let coefs = Self::solve_matrix(m, &b)?;

        // Safety: The coefs were generated by the basis
        let function = unsafe { Polynomial::from_raw(basis, coefs.into(), degree) };
        Ok(Self { data, function })
    }

    /// Largest absolute residual over the source data.
    ///
    /// See [`statistics::max_absolute_error`].
    pub fn max_absolute_error(&self) -> T {
        let y_fit = self.data.x_iter().map(|x| self.function.y(x));
        statistics::max_absolute_error(self.data.y_iter(), y_fit)
    }

    /// Calculates the R-squared value for the model compared to its source data.
    ///
    /// See [`statistics::r_squared`].
    pub fn r_squared(&self) -> T {
        self.function.r_squared(&self.data)
    }

    /// Returns the degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.function.degree()
    }

    /// Returns a reference to the polynomial’s coefficients, in the order of the basis functions.
    pub fn coefficients(&self) -> &[T] {
        self.function.coefficients()
    }

    /// Returns a pure polynomial representation of the curve fit, dropping the data.
    pub fn into_polynomial(self) -> Polynomial<'static, B, T> {
        self.function
    }

    /// Converts the curve fit into a monomial polynomial.
    ///
    /// # Errors
    /// Returns an error if the current basis cannot be converted to monomial form.
    ///
    /// # Example
    /// ```
    /// # use sigfit::ChebyshevFit;
    /// let data = &[(0.0f64, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = ChebyshevFit::new(data, 2).unwrap();
    /// let mono_poly = fit.as_monomial().unwrap();
    /// assert!((mono_poly.y(1.5) - 4.75).abs() < 1e-9);
    /// ```
    pub fn as_monomial(&self) -> Result<MonomialPolynomial<'static, T>>
    where
        B: IntoMonomialBasis<T>,
    {
        self.function.as_monomial()
    }

    /// Returns a human-readable string of the polynomial equation.
    pub fn equation(&self) -> String {
        self.function.equation()
    }
}

impl<T: Value, B> std::fmt::Display for CurveFit<'_, B, T>
where
    B: Basis<T>,
    B: PolynomialDisplay<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.function)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::{assert_all_close, assert_close, error::ErrorKind};

    use super::*;

    fn quadratic() -> Vec<(f64, f64)> {
        (0..20)
            .map(|i| {
                let x = f64::from(i) / 4.0 - 3.0;
                (x, 2.0 * x * x - 3.0 * x + 1.0)
            })
            .collect()
    }

    #[test]
    fn test_recovers_exact_polynomial() {
        let data = quadratic();
        let fit = MonomialFit::new(&data, 2).unwrap();
        assert_all_close!(fit.coefficients(), &[1.0, -3.0, 2.0], 1e-9);
        assert!(fit.max_absolute_error() < 1e-9);
        assert_close!(fit.r_squared(), 1.0, 1e-12);
    }

    #[test]
    fn test_chebyshev_agrees_with_monomial() {
        let data = quadratic();
        let mono = MonomialFit::new(&data, 2).unwrap();
        let cheb = ChebyshevFit::new(&data, 2).unwrap();
        let converted = cheb.as_monomial().unwrap();
        assert_all_close!(converted.coefficients(), mono.coefficients(), 1e-9);
    }

    #[test]
    fn test_degree_zero_is_mean() {
        let data = vec![(0.0, 1.0), (1.0, 2.0), (2.0, 6.0)];
        let fit = MonomialFit::new(&data, 0).unwrap();
        assert_close!(fit.coefficients()[0], 3.0, 1e-12);
        assert_eq!(fit.max_absolute_error(), 3.0);
    }

    #[test]
    fn test_coefficient_count() {
        let data = quadratic();
        for degree in 0..6 {
            let fit = MonomialFit::new(&data, degree).unwrap();
            assert_eq!(fit.coefficients().len(), degree + 1);
            assert_eq!(fit.degree(), degree);
        }
    }

    #[test]
    fn test_deterministic() {
        let data = quadratic();
        let a = MonomialFit::new(&data, 4).unwrap();
        let b = MonomialFit::new(&data, 4).unwrap();
        assert_eq!(a.coefficients(), b.coefficients());
    }

    #[test]
    fn test_errors() {
        let empty: Vec<(f64, f64)> = vec![];
        assert!(matches!(MonomialFit::new(&empty, 1), Err(Error::NoData)));

        let data = vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)];
        let err = MonomialFit::new(&data, 3).unwrap_err();
        assert!(matches!(err, Error::DegreeTooHigh { degree: 3, n: 3 }));
        assert_eq!(err.kind(), ErrorKind::FitDivergence);

        // Duplicated x values do not add information
        let dup = vec![(0.0, 1.0), (0.0, 2.0), (1.0, 3.0), (1.0, 3.5)];
        assert!(matches!(
            MonomialFit::new(&dup, 2),
            Err(Error::DegreeTooHigh { degree: 2, n: 2 })
        ));
    }

    #[test]
    fn test_display() {
        let data = vec![(0.0, 1.0), (1.0, 3.0)];
        let fit = MonomialFit::new(&data, 1).unwrap();
        assert_eq!(fit.to_string(), "y(x) = 2.0000x + 1.0000");
        assert_eq!(fit.equation(), fit.to_string());
    }

    #[test]
    fn test_overflowing_powers_diverge() {
        // x² overflows to inf on [0, 1e200]
        let data: Vec<(f64, f64)> = (0..10).map(|i| (1e200 * f64::from(i) / 9.0, 0.5)).collect();
        for degree in 2..=3 {
            let err = MonomialFit::new(&data, degree).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FitDivergence, "degree {degree}: {err}");
        }

        let err = MonomialFit::new(&data, 2).unwrap_err();
        assert!(matches!(err, Error::Algebra("non-finite entry in design matrix")));
    }
}
