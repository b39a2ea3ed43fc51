//! Error analysis of fitted models against ground truth
//!
//! [`ErrorAnalyzer`] measures a [`PolynomialModel`] two ways:
//! - at a short list of canonical test points, for human-readable spot checks
//! - over the whole [`SampleSet`], for the figures the approximation is judged by
//!
//! The domain-wide maximum is taken over the grid **and** the test points, so it always
//! dominates every individual test-point error even when a test point falls between
//! grid points. Mean and RMS are over the grid only.
use crate::{
    domain::SampleSet,
    error::{Error, Result},
    model::PolynomialModel,
    statistics,
    target::Target,
    value::Value,
};

/// Error of a model at one canonical test point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TestPointError<T: Value = f64> {
    /// Input value.
    pub x: T,

    /// Target value `f(x)`.
    pub expected: T,

    /// Model value `p(x)`.
    pub approx: T,

    /// `|expected - approx|`.
    pub abs_error: T,

    /// `abs_error / expected × 100`, absent when `expected` is zero.
    pub rel_error_pct: Option<T>,
}

/// Pointwise and aggregate error figures for one model.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorReport<T: Value = f64> {
    /// One entry per canonical test point, in configuration order.
    pub per_test_point: Vec<TestPointError<T>>,

    /// Largest absolute error over the grid and the test points.
    pub domain_max_error: T,

    /// Mean absolute error over the grid.
    pub domain_mean_error: T,

    /// Root mean squared error over the grid.
    pub domain_rms_error: T,

    /// Reference magnitude the percent-of-range figures divide by.
    pub range_reference: Option<T>,
}
impl<T: Value> ErrorReport<T> {
    /// Largest error among the test points, if there are any.
    pub fn test_max_error(&self) -> Option<T> {
        self.per_test_point
            .iter()
            .map(|p| p.abs_error)
            .reduce(nalgebra::RealField::max)
    }

    /// Average error over the test points, if there are any.
    pub fn test_mean_error(&self) -> Option<T> {
        if self.per_test_point.is_empty() {
            return None;
        }
        Some(statistics::mean(self.per_test_point.iter().map(|p| p.abs_error)))
    }

    /// Expresses an error as a percentage of the range reference.
    pub fn percent_of_range(&self, error: T) -> Option<T> {
        let reference = self.range_reference?;
        Some(error / reference * T::try_cast(100).ok()?)
    }
}

/// Measures models against a target function.
///
/// Holds no state between calls; analyzing the same model twice gives the same report.
#[derive(Debug, Clone)]
pub struct ErrorAnalyzer<'a, T: Value, F: Target<T> + ?Sized> {
    target: &'a F,
    test_points: Vec<T>,
    range_reference: Option<T>,
}
impl<'a, T: Value, F: Target<T> + ?Sized> ErrorAnalyzer<'a, T, F> {
    /// Creates an analyzer for `target` with the given canonical test points.
    pub fn new(target: &'a F, test_points: impl Into<Vec<T>>) -> Self {
        Self {
            target,
            test_points: test_points.into(),
            range_reference: None,
        }
    }

    /// Overrides the percent-of-range reference.
    ///
    /// By default it is `|f(upper) - f(lower)|` for the model's domain.
    #[must_use]
    pub fn with_range_reference(mut self, reference: Option<T>) -> Self {
        self.range_reference = reference;
        self
    }

    /// The canonical test points.
    pub fn test_points(&self) -> &[T] {
        &self.test_points
    }

    fn range_reference(&self, samples: &SampleSet<T>) -> Result<Option<T>> {
        if let Some(reference) = self.range_reference {
            return Ok(Some(reference));
        }

        let domain = samples.domain();
        let span = Value::abs(self.target.try_y(domain.upper())? - self.target.try_y(domain.lower())?);
        Ok(if span.is_zero() { None } else { Some(span) })
    }

    /// Computes the error report of `model` over `samples`.
    ///
    /// # Errors
    /// Returns [`Error::NumericOverflow`] if the target or the model produces a non-finite value.
    ///
    /// # Example
    /// ```
    /// # use sigfit::{analysis::ErrorAnalyzer, domain::{Domain, SampleSet}, model::PolynomialModel, target::Logistic};
    /// let domain = Domain::new(-3.0, -1.0).unwrap();
    /// let samples = SampleSet::new(domain, 1000, &Logistic).unwrap();
    /// let model = PolynomialModel::fit(&samples, 3).unwrap();
    ///
    /// let analyzer = ErrorAnalyzer::new(&Logistic, vec![-3.0, -2.0, -1.0]);
    /// let report = analyzer.analyze(&model, &samples).unwrap();
    /// assert!(report.domain_max_error < 1e-3);
    /// ```
    pub fn analyze(&self, model: &PolynomialModel<T>, samples: &SampleSet<T>) -> Result<ErrorReport<T>> {
        let per_test_point = self
            .test_points
            .iter()
            .map(|&x| self.test_point(model, x))
            .collect::<Result<Vec<_>>>()?;

        let y_fit = samples
            .points()
            .iter()
            .map(|&(x, _)| checked_y(model, x))
            .collect::<Result<Vec<_>>>()?;
        let y = samples.y();

        let grid = statistics::residuals(y.into_iter(), y_fit.into_iter()).ok_or(Error::NoData)?;
        let domain_max_error = per_test_point
            .iter()
            .map(|p| p.abs_error)
            .fold(grid.max, nalgebra::RealField::max);

        Ok(ErrorReport {
            per_test_point,
            domain_max_error,
            domain_mean_error: grid.mean,
            domain_rms_error: grid.rms,
            range_reference: self.range_reference(samples)?,
        })
    }

    fn test_point(&self, model: &PolynomialModel<T>, x: T) -> Result<TestPointError<T>> {
        let expected = self.target.try_y(x)?;
        let approx = checked_y(model, x)?;
        let abs_error = Value::abs(expected - approx);
        let rel_error_pct = if expected.is_zero() {
            None
        } else {
            Some(abs_error / Value::abs(expected) * T::try_cast(100)?)
        };

        Ok(TestPointError {
            x,
            expected,
            approx,
            abs_error,
            rel_error_pct,
        })
    }
}

fn checked_y<T: Value>(model: &PolynomialModel<T>, x: T) -> Result<T> {
    let y = model.y(x);
    if y.is_finite_value() {
        Ok(y)
    } else {
        Err(Error::NumericOverflow(format!(
            "degree {} model evaluated at {x} gave {y}",
            model.degree()
        )))
    }
}
