//! Fitted polynomial models
//!
//! A [`PolynomialModel`] is the output of fitting one degree: ascending monomial
//! coefficients over the raw input `x`, plus the domain they are valid on.
//!
//! Two fitting methods are available, selected by [`FitMethod`]:
//! - [`FitMethod::LeastSquares`]: minimizes `Σ (yᵢ - p(xᵢ))²` over the sample grid by a
//!   closed-form solve of the Vandermonde system. Deterministic and non-iterative.
//! - [`FitMethod::ChebyshevInterpolation`]: interpolates the target at the Chebyshev nodes
//!   of the domain, then converts to monomial form.
//!
//! Either way the model is evaluated with Horner's scheme, highest power first. That is the
//! order exported artifacts document, so a downstream evaluator reproduces the same rounding.
use crate::{
    basis::{Basis, ChebyshevBasis, IntoMonomialBasis, MonomialBasis},
    domain::{Domain, SampleSet},
    error::{Error, Result},
    target::Target,
    value::Value,
    MonomialFit, MonomialPolynomial,
};

/// Strategy used to compute a model's coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// Closed-form linear least squares over the sample grid.
    #[default]
    LeastSquares,

    /// Interpolation at the Chebyshev nodes of the first kind.
    ChebyshevInterpolation,
}
impl std::fmt::Display for FitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMethod::LeastSquares => write!(f, "least-squares"),
            FitMethod::ChebyshevInterpolation => write!(f, "chebyshev-interpolation"),
        }
    }
}

/// A fitted polynomial `p(x) = Σ cₖ·xᵏ` over a [`Domain`].
///
/// Invariant: `coefficients().len() == degree() + 1`, and every coefficient is finite.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PolynomialModel<T: Value = f64> {
    domain: Domain<T>,
    method: FitMethod,
    degree: usize,
    coefficients: Vec<T>,
}
impl<T: Value> PolynomialModel<T> {
    /// Builds a model from ascending monomial coefficients.
    ///
    /// # Errors
    /// - [`Error::InvalidNumberOfParameters`] if `coefficients` is empty.
    /// - [`Error::NumericOverflow`] if any coefficient is not finite.
    pub fn from_coefficients(
        domain: Domain<T>,
        method: FitMethod,
        coefficients: Vec<T>,
    ) -> Result<Self> {
        let degree = MonomialBasis::<T>::default()
            .degree(coefficients.len())
            .ok_or(Error::InvalidNumberOfParameters(0))?;

        if let Some((k, c)) = coefficients
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite_value())
        {
            return Err(Error::NumericOverflow(format!(
                "coefficient c{k} = {c} for degree {degree}"
            )));
        }

        Ok(Self {
            domain,
            method,
            degree,
            coefficients,
        })
    }

    /// Least-squares fit of the given degree over the sample grid.
    ///
    /// # Errors
    /// Returns a [`crate::error::ErrorKind::FitDivergence`] error if `degree` is not below the
    /// number of samples or the design matrix is numerically rank deficient.
    ///
    /// # Example
    /// ```
    /// # use sigfit::{domain::{Domain, SampleSet}, model::PolynomialModel, target::Logistic};
    /// let domain = Domain::new(-3.0, -1.0).unwrap();
    /// let samples = SampleSet::new(domain, 1000, &Logistic).unwrap();
    /// let model = PolynomialModel::fit(&samples, 3).unwrap();
    /// assert_eq!(model.coefficients().len(), 4);
    /// ```
    pub fn fit(samples: &SampleSet<T>, degree: usize) -> Result<Self> {
        let fit = MonomialFit::<T>::new(samples.points(), degree)?;
        let (_, coefficients, _) = fit.into_polynomial().into_inner();
        Self::from_coefficients(
            *samples.domain(),
            FitMethod::LeastSquares,
            coefficients.into_owned(),
        )
    }

    /// Chebyshev-node interpolant of the given degree, converted to monomial form.
    ///
    /// The samples are only used for their domain and to bound the degree the same way
    /// a least-squares fit would.
    ///
    /// # Errors
    /// - [`Error::DegreeTooHigh`] if `degree` is not below the number of samples.
    /// - [`Error::NumericOverflow`] if the target or the conversion produces a non-finite value.
    pub fn interpolate<F: Target<T> + ?Sized>(
        target: &F,
        samples: &SampleSet<T>,
        degree: usize,
    ) -> Result<Self> {
        if degree >= samples.len() {
            return Err(Error::DegreeTooHigh {
                degree,
                n: samples.len(),
            });
        }

        let domain = *samples.domain();
        let basis = ChebyshevBasis::new(domain.lower(), domain.upper());
        let mut coefficients = basis.interpolate(target, degree)?;
        basis.as_monomial(&mut coefficients)?;
        Self::from_coefficients(domain, FitMethod::ChebyshevInterpolation, coefficients)
    }

    /// Fits one degree with the chosen method.
    ///
    /// # Errors
    /// See [`PolynomialModel::fit`] and [`PolynomialModel::interpolate`].
    pub fn fit_with<F: Target<T> + ?Sized>(
        method: FitMethod,
        target: &F,
        samples: &SampleSet<T>,
        degree: usize,
    ) -> Result<Self> {
        match method {
            FitMethod::LeastSquares => Self::fit(samples, degree),
            FitMethod::ChebyshevInterpolation => Self::interpolate(target, samples, degree),
        }
    }

    /// Highest power of `x` in the model.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Ascending monomial coefficients; index `k` is the weight of `xᵏ`.
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Domain the model was fitted on.
    pub fn domain(&self) -> &Domain<T> {
        &self.domain
    }

    /// Method that produced the coefficients.
    pub fn method(&self) -> FitMethod {
        self.method
    }

    /// Multiplicative depth needed to evaluate the model with Horner's scheme.
    ///
    /// Each Horner step multiplies the accumulator by `x` once, so the depth equals the degree.
    pub fn circuit_depth(&self) -> usize {
        self.degree
    }

    /// Evaluates the model at `x` with Horner's scheme.
    ///
    /// # Example
    /// ```
    /// # use sigfit::{domain::Domain, model::{FitMethod, PolynomialModel}};
    /// let domain = Domain::new(-1.0, 1.0).unwrap();
    /// let model = PolynomialModel::from_coefficients(domain, FitMethod::LeastSquares, vec![1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(model.y(2.0), 17.0);
    /// ```
    pub fn y(&self, x: T) -> T {
        MonomialBasis::<T>::default().evaluate(x, &self.coefficients)
    }

    /// Borrows the model as a [`MonomialPolynomial`].
    pub fn as_polynomial(&self) -> MonomialPolynomial<'_, T> {
        MonomialPolynomial::borrowed(&self.coefficients)
    }
}
impl<T: Value> std::fmt::Display for PolynomialModel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_polynomial())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::{
        assert_all_close, assert_close, assert_error_below, error::ErrorKind, statistics,
        target::Logistic,
    };

    use super::*;

    fn credit_samples(n: usize) -> SampleSet {
        let domain = Domain::new(-3.0, -1.0).unwrap();
        SampleSet::new(domain, n, &Logistic).unwrap()
    }

    #[test]
    fn test_coefficient_count() {
        let samples = credit_samples(1000);
        for degree in [0, 1, 3, 5, 7] {
            for method in [FitMethod::LeastSquares, FitMethod::ChebyshevInterpolation] {
                let model = PolynomialModel::fit_with(method, &Logistic, &samples, degree).unwrap();
                assert_eq!(model.coefficients().len(), degree + 1);
                assert_eq!(model.degree(), degree);
                assert_eq!(model.circuit_depth(), degree);
                assert_eq!(model.method(), method);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = PolynomialModel::fit(&credit_samples(1000), 5).unwrap();
        let b = PolynomialModel::fit(&credit_samples(1000), 5).unwrap();
        assert_all_close!(a.coefficients(), b.coefficients(), 1e-12);
    }

    #[test]
    fn test_cubic_endpoints() {
        let samples = credit_samples(1000);
        let model = PolynomialModel::fit(&samples, 3).unwrap();

        assert_close!(Logistic.y(-3.0), 0.047_425_9, 1e-7);
        assert_close!(Logistic.y(-1.0), 0.268_941_4, 1e-7);
        assert!((model.y(-3.0) - Logistic.y(-3.0)).abs() < 0.01);
        assert!((model.y(-1.0) - Logistic.y(-1.0)).abs() < 0.01);
        assert_error_below!(model, samples, 4e-4);

        // Close to the published cubic for this domain
        assert_all_close!(
            model.coefficients(),
            &[0.531_636_42, 0.329_914_45, 0.073_236_28, 0.005_682_78],
            1e-4
        );
    }

    #[test]
    fn test_degree_zero_is_mean() {
        let samples = credit_samples(2);
        let model = PolynomialModel::fit(&samples, 0).unwrap();
        let expected = (Logistic.y(-3.0) + Logistic.y(-1.0)) / 2.0;
        assert_close!(model.coefficients()[0], expected, 1e-12);

        // Degree 0 on a dense grid is the grid mean, and its error is not small
        let samples = credit_samples(1000);
        let model = PolynomialModel::fit(&samples, 0).unwrap();
        let mean = statistics::mean(samples.y().into_iter());
        assert_close!(model.coefficients()[0], mean, 1e-12);
        assert!(model.as_polynomial().max_absolute_error(samples.points()) > 0.1);
    }

    #[test]
    fn test_degree_too_high() {
        let samples = credit_samples(5);
        for method in [FitMethod::LeastSquares, FitMethod::ChebyshevInterpolation] {
            let err = PolynomialModel::fit_with(method, &Logistic, &samples, 5).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FitDivergence);
            assert!(PolynomialModel::fit_with(method, &Logistic, &samples, 3).is_ok());
        }
    }

    #[test]
    fn test_interpolation_is_accurate() {
        let samples = credit_samples(1000);
        let ls = PolynomialModel::fit(&samples, 5).unwrap();
        let cheb = PolynomialModel::interpolate(&Logistic, &samples, 5).unwrap();

        let ls_err = ls.as_polynomial().max_absolute_error(samples.points());
        let cheb_err = cheb.as_polynomial().max_absolute_error(samples.points());
        assert!(cheb_err < 1e-5, "{cheb_err}");
        assert!(ls_err < 1e-5, "{ls_err}");
        assert_error_below!(cheb, samples, 1e-5);

        let cheb7 = PolynomialModel::interpolate(&Logistic, &samples, 7).unwrap();
        assert_error_below!(cheb7, samples, 1e-6);
    }

    #[test]
    fn test_interpolation_names_failing_target() {
        struct Pole;
        impl Target<f64> for Pole {
            fn name(&self) -> &str {
                "pole"
            }
            fn y(&self, x: f64) -> f64 {
                1.0 / (x + 2.0).max(0.0)
            }
        }

        // The grid comes from a finite target; the nodes are evaluated on `Pole`.
        // The first node left of -2 is -2 + cos(5π/8)
        let samples = credit_samples(1000);
        let err = PolynomialModel::interpolate(&Pole, &samples, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericOverflow);
        assert!(err.to_string().contains("pole(-2.38"), "{err}");
    }

    #[test]
    fn test_from_coefficients_rejects_bad_input() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        assert!(PolynomialModel::<f64>::from_coefficients(domain, FitMethod::LeastSquares, vec![])
            .is_err());

        let err =
            PolynomialModel::from_coefficients(domain, FitMethod::LeastSquares, vec![1.0, f64::NAN])
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericOverflow);
    }

    #[test]
    fn test_display_and_serde() {
        let domain = Domain::new(-3.0, -1.0).unwrap();
        let model =
            PolynomialModel::from_coefficients(domain, FitMethod::ChebyshevInterpolation, vec![0.5, 0.25])
                .unwrap();
        assert_eq!(model.to_string(), "y(x) = 0.2500x + 0.5000");
        assert_eq!(FitMethod::ChebyshevInterpolation.to_string(), "chebyshev-interpolation");

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["method"], "chebyshev-interpolation");
        assert_eq!(json["degree"], 1);
        assert_eq!(json["coefficients"][1], 0.25);
        assert_eq!(json["domain"]["lower"], -3.0);
    }
}
