use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use sigfit::{
    config::ApproxConfig,
    export::{self, Exporter},
    model::FitMethod,
    report::{self, ApproximationReport},
    target::Logistic,
};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Versioned line format for log parsers
    Text,
    /// Structured report
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    LeastSquares,
    ChebyshevInterpolation,
}
impl From<Method> for FitMethod {
    fn from(value: Method) -> Self {
        match value {
            Method::LeastSquares => FitMethod::LeastSquares,
            Method::ChebyshevInterpolation => FitMethod::ChebyshevInterpolation,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Fits low-degree polynomials to the logistic sigmoid", long_about = None)]
struct Args {
    /// TOML configuration file. Without one, the credit-scoring preset is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the domain lower bound
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// Override the domain upper bound
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// Override the number of grid samples
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Override the degrees to fit, comma separated
    #[arg(short, long, value_delimiter = ',')]
    degrees: Option<Vec<usize>>,

    /// Override the fitting method
    #[arg(short, long, value_enum)]
    method: Option<Method>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Coefficient exporters to run for each degree: go, rust, c
    #[arg(short, long, value_delimiter = ',')]
    export: Vec<String>,

    /// Write export artifacts into this directory instead of after the text report
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log filter, such as `info` or `sigfit=debug`. Falls back to RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<ApproxConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ApproxConfig::<f64>::from_toml_str(&text).with_context(|| format!("in {}", path.display()))?
        }
        None => ApproxConfig::credit_scoring(),
    };

    if let Some(lower) = args.lower {
        config.lower = lower;
    }
    if let Some(upper) = args.upper {
        config.upper = upper;
    }
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(degrees) = &args.degrees {
        config.degrees.clone_from(degrees);
    }
    if let Some(method) = args.method {
        config.method = method.into();
    }

    Ok(config)
}

fn exporters(names: &[String]) -> Result<Vec<Box<dyn Exporter>>> {
    names
        .iter()
        .map(|name| match export::by_name(name) {
            Some(exporter) => Ok(exporter),
            None => bail!("unknown exporter `{name}`, expected one of: go, rust, c"),
        })
        .collect()
}

fn write_artifacts(report: &ApproximationReport, dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for fitted in report.fitted() {
        for artifact in &fitted.artifacts {
            let extension = match artifact.format.as_str() {
                "rust" => "rs",
                other => other,
            };
            let path = dir.join(format!("{}_degree_{}.{extension}", report.target, artifact.degree));
            std::fs::write(&path, &artifact.text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), "wrote artifact");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = load_config(&args)?;
    let exporters = exporters(&args.export)?;
    let report = report::run(&config, &Logistic, &exporters)?;

    let mut rendered = match args.format {
        Format::Text => report.to_string(),
        Format::Json => report.to_json()?,
    };

    match (&args.export_dir, args.format) {
        (Some(dir), _) => write_artifacts(&report, dir)?,
        (None, Format::Text) => {
            for artifact in report.fitted().flat_map(|f| &f.artifacts) {
                rendered.push('\n');
                rendered.push_str(&artifact.text);
            }
        }
        (None, Format::Json) => {}
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
