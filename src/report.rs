//! Batch driver and report rendering
//!
//! [`run`] takes a validated [`ApproxConfig`] and a [`Target`], samples the domain once,
//! then fits, analyzes and exports every requested degree independently. The result is a
//! plain [`ApproximationReport`] value; nothing is printed here.
//!
//! A failed degree does not stop the batch. It is recorded as a [`DegreeRecord::Failed`]
//! entry with its [`ErrorKind`] and reason, and the remaining degrees carry on. Only a
//! configuration error aborts the run.
//!
//! # Text contract
//! [`ApproximationReport`] implements `Display` as a line-oriented format, version 1.
//! Downstream log parsers rely on these tokens:
//! - `# sigfit report v1` on the first line
//! - `[degree D]` opening each degree section, in ascending degree order
//! - coefficient lines `index, value`, ascending power, under `coefficients:`
//! - summary lines beginning `Max Error:`, `Mean Error:` and `RMS Error:`
//!
//! ```text
//! # sigfit report v1
//! target: sigmoid
//! domain: [-3, -1]
//! samples: 1000
//! method: least-squares
//!
//! [degree 3]
//! status: ok
//! depth: 3
//! coefficients:
//! 0, 5.3163642e-1
//! 1, 3.2991445e-1
//! 2, 7.3236280e-2
//! 3, 5.6827800e-3
//! test points:
//! x -3: expected 4.74259e-2 approx 4.76742e-2 error 2.48331e-4 (0.5236%)
//! ...
//! Peak Test Error: 2.48331e-4 (0.1121% of range)
//! Avg Test Error: 1.02817e-4 (0.0464% of range)
//! Max Error: 3.34050e-4 (0.1508% of range)
//! Mean Error: 7.09312e-5 (0.0320% of range)
//! RMS Error: 8.55216e-5 (0.0386% of range)
//! equation: y(x) = 0.0057x³ + 0.0732x² + 0.3299x + 0.5316
//!
//! [degree 5]
//! status: FitDivergence
//! reason: Polynomial degree `5` is too high for 5 distinct sample points
//! ```
//!
//! The `(… of range)` suffix is omitted when there is no range reference. For anything
//! machine-read beyond these tokens, prefer [`ApproximationReport::to_json`].
use std::fmt::{self, Display};

use tracing::{debug, info, instrument, warn};

use crate::{
    analysis::{ErrorAnalyzer, ErrorReport},
    config::ApproxConfig,
    display::unicode,
    domain::{Domain, SampleSet},
    error::{ErrorKind, Result},
    export::{format_coefficient, ExportArtifact, Exporter},
    model::{FitMethod, PolynomialModel},
    target::Target,
    value::Value,
};

/// Version of the text format written by [`ApproximationReport`]'s `Display`.
pub const TEXT_CONTRACT_VERSION: u32 = 1;

/// Significant digits used for error figures in the text format.
const ERROR_DIGITS: usize = 6;

/// A degree that was fitted and analyzed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FittedDegree<T: Value = f64> {
    /// Requested degree.
    pub degree: usize,

    /// Multiplicative depth of a Horner evaluation.
    pub depth: usize,

    /// The fitted model.
    pub model: PolynomialModel<T>,

    /// Its error figures.
    pub errors: ErrorReport<T>,

    /// One artifact per configured exporter.
    pub artifacts: Vec<ExportArtifact>,
}

/// A degree that could not be fitted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FailedDegree {
    /// Requested degree.
    pub degree: usize,

    /// Classification of the failure.
    pub kind: ErrorKind,

    /// Human-readable reason.
    pub reason: String,
}

/// Outcome for one requested degree.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DegreeRecord<T: Value = f64> {
    /// The degree was fitted.
    Fitted(FittedDegree<T>),

    /// The degree failed; no coefficients exist for it.
    Failed(FailedDegree),
}
impl<T: Value> DegreeRecord<T> {
    /// The requested degree.
    pub fn degree(&self) -> usize {
        match self {
            DegreeRecord::Fitted(f) => f.degree,
            DegreeRecord::Failed(f) => f.degree,
        }
    }

    /// The fitted entry, if the degree succeeded.
    pub fn fitted(&self) -> Option<&FittedDegree<T>> {
        match self {
            DegreeRecord::Fitted(f) => Some(f),
            DegreeRecord::Failed(_) => None,
        }
    }

    /// The failure entry, if the degree failed.
    pub fn failed(&self) -> Option<&FailedDegree> {
        match self {
            DegreeRecord::Fitted(_) => None,
            DegreeRecord::Failed(f) => Some(f),
        }
    }
}

/// Structured result of one batch, one record per requested degree in ascending order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ApproximationReport<T: Value = f64> {
    /// Name of the approximated function.
    pub target: String,

    /// Domain every degree was fitted on.
    pub domain: Domain<T>,

    /// Number of grid samples.
    pub samples: usize,

    /// Fitting method used for every degree.
    pub method: FitMethod,

    /// Canonical test points, in configuration order.
    pub test_points: Vec<T>,

    /// Per-degree outcomes.
    pub degrees: Vec<DegreeRecord<T>>,
}
impl<T: Value> ApproximationReport<T> {
    /// Looks up the record of one degree.
    pub fn record(&self, degree: usize) -> Option<&DegreeRecord<T>> {
        self.degrees.iter().find(|r| r.degree() == degree)
    }

    /// The successfully fitted degrees.
    pub fn fitted(&self) -> impl Iterator<Item = &FittedDegree<T>> {
        self.degrees.iter().filter_map(DegreeRecord::fitted)
    }

    /// The failed degrees.
    pub fn failures(&self) -> impl Iterator<Item = &FailedDegree> {
        self.degrees.iter().filter_map(DegreeRecord::failed)
    }
}
impl<T: Value + serde::Serialize> ApproximationReport<T> {
    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs one approximation batch.
///
/// Degrees are fitted in ascending order with duplicates dropped. With the `parallel`
/// feature they are fitted concurrently, but the report order is the same.
///
/// # Errors
/// Returns a [`ErrorKind::DomainViolation`] error if the configuration is invalid, or
/// [`ErrorKind::NumericOverflow`] if the target cannot be sampled over the domain.
/// Failures of individual degrees are recorded in the report instead.
///
/// # Example
/// ```
/// # use sigfit::{config::ApproxConfig, report, target::Logistic};
/// let config = ApproxConfig::credit_scoring();
/// let report = report::run(&config, &Logistic, &[]).unwrap();
///
/// assert_eq!(report.degrees.len(), 3);
/// assert!(report.to_string().contains("Max Error:"));
/// ```
#[instrument(skip_all, fields(samples = config.samples, method = %config.method))]
pub fn run<T: Value, F: Target<T> + ?Sized>(
    config: &ApproxConfig<T>,
    target: &F,
    exporters: &[Box<dyn Exporter<T>>],
) -> Result<ApproximationReport<T>> {
    let domain = config.validate()?;
    let samples = SampleSet::new(domain, config.samples, target)?;
    let analyzer = ErrorAnalyzer::new(target, config.test_points.clone())
        .with_range_reference(config.range_reference);
    let degrees = config.sorted_degrees();

    let job = |&degree: &usize| fit_degree(config.method, target, &samples, &analyzer, exporters, degree);

    #[cfg(not(feature = "parallel"))]
    let records = degrees.iter().map(job).collect::<Result<Vec<_>>>()?;

    #[cfg(feature = "parallel")]
    let records = {
        use rayon::prelude::*;
        // Indexed collect keeps ascending degree order
        degrees.par_iter().map(job).collect::<Result<Vec<_>>>()?
    };

    let failed = records.iter().filter(|r| r.failed().is_some()).count();
    info!(
        target_fn = target.name(),
        %domain,
        degrees = records.len(),
        failed,
        "approximation batch complete"
    );

    Ok(ApproximationReport {
        target: target.name().to_string(),
        domain,
        samples: samples.len(),
        method: config.method,
        test_points: config.test_points.clone(),
        degrees: records,
    })
}

fn fit_degree<T: Value, F: Target<T> + ?Sized>(
    method: FitMethod,
    target: &F,
    samples: &SampleSet<T>,
    analyzer: &ErrorAnalyzer<'_, T, F>,
    exporters: &[Box<dyn Exporter<T>>],
    degree: usize,
) -> Result<DegreeRecord<T>> {
    debug!(degree, "fitting");

    let outcome = PolynomialModel::fit_with(method, target, samples, degree).and_then(|model| {
        let errors = analyzer.analyze(&model, samples)?;
        let artifacts = exporters
            .iter()
            .map(|e| e.export(target.name(), &model))
            .collect::<Result<Vec<_>>>()?;
        Ok((model, errors, artifacts))
    });

    match outcome {
        Ok((model, errors, artifacts)) => {
            debug!(degree, max_error = %errors.domain_max_error, "fitted");
            Ok(DegreeRecord::Fitted(FittedDegree {
                degree,
                depth: model.circuit_depth(),
                model,
                errors,
                artifacts,
            }))
        }

        Err(e) if e.is_per_degree() => {
            warn!(degree, kind = %e.kind(), "{e}");
            Ok(DegreeRecord::Failed(FailedDegree {
                degree,
                kind: e.kind(),
                reason: e.to_string(),
            }))
        }

        Err(e) => Err(e),
    }
}

fn error_figure<T: Value>(e: T) -> String {
    unicode::significant(e, ERROR_DIGITS)
}

fn write_summary<T: Value>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: T,
    errors: &ErrorReport<T>,
) -> fmt::Result {
    write!(f, "{label}: {}", error_figure(value))?;
    if let Some(pct) = errors.percent_of_range(value) {
        write!(f, " ({pct:.4}% of range)")?;
    }
    writeln!(f)
}

impl<T: Value> Display for FittedDegree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[degree {}]", self.degree)?;
        writeln!(f, "status: ok")?;
        writeln!(f, "depth: {}", self.depth)?;

        writeln!(f, "coefficients:")?;
        for (k, &c) in self.model.coefficients().iter().enumerate() {
            writeln!(f, "{k}, {}", format_coefficient(c))?;
        }

        let errors = &self.errors;
        if !errors.per_test_point.is_empty() {
            writeln!(f, "test points:")?;
            for p in &errors.per_test_point {
                write!(
                    f,
                    "x {}: expected {} approx {} error {}",
                    p.x,
                    error_figure(p.expected),
                    error_figure(p.approx),
                    error_figure(p.abs_error)
                )?;
                match p.rel_error_pct {
                    Some(rel) => writeln!(f, " ({rel:.4}%)")?,
                    None => writeln!(f)?,
                }
            }
        }
        if let Some(peak) = errors.test_max_error() {
            write_summary(f, "Peak Test Error", peak, errors)?;
        }
        if let Some(avg) = errors.test_mean_error() {
            write_summary(f, "Avg Test Error", avg, errors)?;
        }

        write_summary(f, "Max Error", errors.domain_max_error, errors)?;
        write_summary(f, "Mean Error", errors.domain_mean_error, errors)?;
        write_summary(f, "RMS Error", errors.domain_rms_error, errors)?;
        writeln!(f, "equation: {}", self.model)
    }
}

impl Display for FailedDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[degree {}]", self.degree)?;
        writeln!(f, "status: {}", self.kind)?;
        writeln!(f, "reason: {}", self.reason)
    }
}

impl<T: Value> Display for ApproximationReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# sigfit report v{TEXT_CONTRACT_VERSION}")?;
        writeln!(f, "target: {}", self.target)?;
        writeln!(f, "domain: {}", self.domain)?;
        writeln!(f, "samples: {}", self.samples)?;
        writeln!(f, "method: {}", self.method)?;

        for record in &self.degrees {
            writeln!(f)?;
            match record {
                DegreeRecord::Fitted(r) => write!(f, "{r}")?,
                DegreeRecord::Failed(r) => write!(f, "{r}")?,
            }
        }
        Ok(())
    }
}
