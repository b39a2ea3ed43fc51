//! Run configuration
//!
//! An [`ApproxConfig`] describes one batch: the domain, the sample grid, the degrees to
//! fit, and the canonical test points. It is plain data; [`ApproxConfig::validate`] turns
//! it into a checked [`Domain`] or a [`crate::error::ErrorKind::DomainViolation`].
//!
//! Configurations are usually read from TOML:
//!
//! ```toml
//! lower = -3.0
//! upper = -1.0
//! samples = 1000
//! degrees = [3, 5, 7]
//! test-points = [-3.0, -2.5, -2.0, -1.5, -1.0]
//! method = "least-squares"
//! ```
use serde::de::DeserializeOwned;

use crate::{
    domain::Domain,
    error::{Error, Result},
    model::FitMethod,
    value::Value,
};

/// Parameters of one approximation batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    rename_all = "kebab-case",
    deny_unknown_fields,
    bound(deserialize = "T: serde::de::DeserializeOwned")
)]
pub struct ApproxConfig<T: Value = f64> {
    /// Lower bound of the domain.
    pub lower: T,

    /// Upper bound of the domain.
    pub upper: T,

    /// Number of evenly spaced grid points, at least 2.
    pub samples: usize,

    /// Degrees to fit. Reported in ascending order, duplicates dropped.
    pub degrees: Vec<usize>,

    /// Canonical test points, each inside the domain.
    #[serde(default)]
    pub test_points: Vec<T>,

    /// Magnitude error percentages are expressed against.
    ///
    /// Defaults to `|f(upper) - f(lower)|` when absent.
    #[serde(default)]
    pub range_reference: Option<T>,

    /// How coefficients are computed.
    #[serde(default)]
    pub method: FitMethod,
}

impl ApproxConfig<f64> {
    /// The credit-scoring configuration: `[-3, -1]`, 1000 samples, degrees 3, 5 and 7,
    /// and five evenly spaced test points.
    ///
    /// On this domain the logistic function spans roughly `0.047` to `0.269`.
    #[must_use]
    pub fn credit_scoring() -> Self {
        Self {
            lower: -3.0,
            upper: -1.0,
            samples: 1000,
            degrees: vec![3, 5, 7],
            test_points: vec![-3.0, -2.5, -2.0, -1.5, -1.0],
            range_reference: None,
            method: FitMethod::LeastSquares,
        }
    }
}
impl Default for ApproxConfig<f64> {
    fn default() -> Self {
        Self::credit_scoring()
    }
}

impl<T: Value + DeserializeOwned> ApproxConfig<T> {
    /// Parses a configuration from TOML.
    ///
    /// The result still needs [`ApproxConfig::validate`].
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the text is not a valid configuration document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl<T: Value> ApproxConfig<T> {
    /// Checks every field and returns the domain.
    ///
    /// # Errors
    /// Returns [`Error::DomainViolation`] if:
    /// - a bound is not finite, `lower >= upper`, or the span overflows
    /// - `samples < 2`
    /// - `degrees` is empty
    /// - a test point is not finite or lies outside the domain
    /// - the range reference is not finite and positive
    ///
    /// # Example
    /// ```
    /// # use sigfit::config::ApproxConfig;
    /// let mut config = ApproxConfig::credit_scoring();
    /// assert!(config.validate().is_ok());
    ///
    /// config.samples = 1;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<Domain<T>> {
        let domain = Domain::new(self.lower, self.upper)?;

        if self.samples < 2 {
            return Err(Error::DomainViolation(format!(
                "at least 2 samples are required, got {}",
                self.samples
            )));
        }

        if self.degrees.is_empty() {
            return Err(Error::DomainViolation("no degrees requested".to_string()));
        }

        if let Some(x) = self
            .test_points
            .iter()
            .find(|&&x| !x.is_finite_value() || !domain.contains(x))
        {
            return Err(Error::DomainViolation(format!(
                "test point {x} is outside the domain {domain}"
            )));
        }

        if let Some(reference) = self.range_reference {
            if !reference.is_finite_value() || reference <= T::zero() {
                return Err(Error::DomainViolation(format!(
                    "range reference must be finite and positive, got {reference}"
                )));
            }
        }

        Ok(domain)
    }

    /// Requested degrees in ascending order without duplicates.
    pub fn sorted_degrees(&self) -> Vec<usize> {
        let mut degrees = self.degrees.clone();
        degrees.sort_unstable();
        degrees.dedup();
        degrees
    }
}
