//! Error types for sigmoid approximation
//!
//! This module defines the failures encountered when validating a configuration,
//! fitting a polynomial for one degree, or rendering a report, along with a
//! convenient `Result` alias.
//!
//! Every [`Error`] maps onto one [`ErrorKind`], which decides how far a failure travels:
//! - [`ErrorKind::DomainViolation`] aborts the whole run. Besides bad configuration this
//!   covers output failures (rendering and serialization), which say nothing about the fit.
//! - [`ErrorKind::FitDivergence`] is recorded against a single degree; the batch continues.
//! - [`ErrorKind::NumericOverflow`] marks a non-finite value escaping an evaluation.

/// Errors that can occur while building or analysing a polynomial approximation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration describes an unusable domain, sample count, or degree list.
    #[error("Invalid configuration: {0}")]
    DomainViolation(String),

    /// Cannot perform curve fitting because there is no data.
    #[error("No data available for fitting")]
    NoData,

    /// The specified basis cannot have the given number of coefficients.
    #[error("Specified basis cannot have exactly {0} coefficients")]
    InvalidNumberOfParameters(usize),

    /// The requested polynomial degree is too high for the dataset.
    ///
    /// The degree must be less than the number of distinct sample points.
    #[error("Polynomial degree `{degree}` is too high for {n} distinct sample points")]
    DegreeTooHigh {
        /// Requested degree
        degree: usize,
        /// Number of distinct x values available
        n: usize,
    },

    /// The design matrix is numerically rank deficient.
    ///
    /// Usually, degree is too high, or the x values are too clustered.
    #[error(
        "Design matrix is rank deficient; the data may be insufficient or collinear. [n: {n}, k: {k}, rank: {rank}]"
    )]
    SingularMatrix {
        /// Number of data points
        n: usize,
        /// Number of basis functions
        k: usize,
        /// Numerical rank of the design matrix
        rank: usize,
    },

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// An evaluation produced a non-finite value.
    #[error("Non-finite value produced: {0}")]
    NumericOverflow(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// An exporter failed to render an artifact.
    #[error("Exporter `{format}` failed to render degree {degree}")]
    Render {
        /// Name of the exporter
        format: String,
        /// Degree being exported
        degree: usize,
    },

    /// The structured report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Classifies this error into the propagation taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DomainViolation(_)
            | Error::Config(_)
            | Error::Render { .. }
            | Error::Serialize(_) => ErrorKind::DomainViolation,

            Error::NoData
            | Error::InvalidNumberOfParameters(_)
            | Error::DegreeTooHigh { .. }
            | Error::SingularMatrix { .. }
            | Error::Algebra(_)
            | Error::CastFailed => ErrorKind::FitDivergence,

            Error::NumericOverflow(_) => ErrorKind::NumericOverflow,
        }
    }

    /// Returns true if this error only affects the degree being fitted.
    #[must_use]
    pub fn is_per_degree(&self) -> bool {
        self.kind() != ErrorKind::DomainViolation
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid configuration; fatal for the whole run.
    DomainViolation,

    /// The least-squares solve for one degree is singular or ill-conditioned.
    FitDivergence,

    /// A non-finite value escaped an evaluation.
    NumericOverflow,
}
impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DomainViolation => write!(f, "DomainViolation"),
            ErrorKind::FitDivergence => write!(f, "FitDivergence"),
            ErrorKind::NumericOverflow => write!(f, "NumericOverflow"),
        }
    }
}

/// Result type for sigmoid approximation
pub type Result<T> = std::result::Result<T, Error>;
