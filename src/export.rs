//! Coefficient export for downstream circuit evaluators
//!
//! An [`Exporter`] renders a [`PolynomialModel`] as a snippet of source code that an
//! encrypted-arithmetic runtime can paste in verbatim:
//! - coefficients are listed in ascending power order, one per line
//! - every coefficient is written with [`COEFFICIENT_DIGITS`] significant digits
//! - every line is annotated with the power it multiplies
//! - a header states the degree, the domain, and the Horner evaluation order
//!
//! [`GoExporter`] produces a `case` arm of a degree switch, [`RustExporter`] a `const`
//! array, and [`CExporter`] a `static const double` array. Other formats plug in by
//! implementing [`Exporter`].
use std::fmt::Write;

use crate::{
    display::unicode,
    error::{Error, Result},
    model::PolynomialModel,
    value::Value,
};

/// Significant digits written for every exported coefficient.
pub const COEFFICIENT_DIGITS: usize = 8;

/// Formats one coefficient the way every exporter writes it.
///
/// # Example
/// ```
/// # use sigfit::export::format_coefficient;
/// assert_eq!(format_coefficient(0.531_636_42), "5.3163642e-1");
/// ```
pub fn format_coefficient<T: Value>(c: T) -> String {
    unicode::significant(c, COEFFICIENT_DIGITS)
}

/// Horner evaluation order for a polynomial of the given degree.
///
/// # Example
/// ```
/// # use sigfit::export::horner_order;
/// assert_eq!(horner_order(3), "((c3*x + c2)*x + c1)*x + c0");
/// assert_eq!(horner_order(0), "c0");
/// ```
pub fn horner_order(degree: usize) -> String {
    let mut expr = format!("c{degree}");
    for k in (0..degree).rev() {
        expr = if k > 0 {
            format!("({expr}*x + c{k})")
        } else {
            format!("{expr}*x + c{k}")
        };
    }
    expr
}

/// Rendered source text for one degree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExportArtifact {
    /// Name of the exporter that produced the text.
    pub format: String,

    /// Degree of the exported model.
    pub degree: usize,

    /// The source snippet.
    pub text: String,
}
impl ExportArtifact {
    /// Reads the coefficients back out of the snippet, in ascending power order.
    ///
    /// Only annotated coefficient lines are considered; everything else is ignored.
    ///
    /// # Errors
    /// Returns [`Error::CastFailed`] if an annotated line does not hold a float literal.
    pub fn parse_coefficients<T: Value>(&self) -> Result<Vec<T>> {
        self.text
            .lines()
            .filter_map(|line| {
                let (literal, annotation) = line.split_once(',')?;
                annotation.trim_start().starts_with("// c").then_some(literal.trim())
            })
            .map(|literal| {
                let value: f64 = literal.parse().map_err(|_| Error::CastFailed)?;
                T::try_cast(value)
            })
            .collect()
    }
}

/// Renders a model as source code for some downstream language.
pub trait Exporter<T: Value = f64>: Send + Sync {
    /// Short format name, such as `go`.
    fn name(&self) -> &str;

    /// Writes the snippet for `model`. `target` is the name of the approximated function.
    ///
    /// # Errors
    /// Returns an error if writing to `out` fails.
    fn render(&self, target: &str, model: &PolynomialModel<T>, out: &mut String) -> std::fmt::Result;

    /// Produces the artifact for `model`.
    ///
    /// # Errors
    /// Returns [`Error::Render`] if rendering fails.
    fn export(&self, target: &str, model: &PolynomialModel<T>) -> Result<ExportArtifact> {
        let mut text = String::new();
        self.render(target, model, &mut text).map_err(|_| Error::Render {
            format: self.name().to_string(),
            degree: model.degree(),
        })?;

        Ok(ExportArtifact {
            format: self.name().to_string(),
            degree: model.degree(),
            text,
        })
    }
}

/// Looks up a built-in exporter by name: `go`, `rust` or `c`.
pub fn by_name<T: Value>(name: &str) -> Option<Box<dyn Exporter<T>>> {
    match name.to_ascii_lowercase().as_str() {
        "go" => Some(Box::new(GoExporter)),
        "rust" | "rs" => Some(Box::new(RustExporter)),
        "c" => Some(Box::new(CExporter)),
        _ => None,
    }
}

fn write_header<T: Value>(
    out: &mut String,
    comment: &str,
    target: &str,
    model: &PolynomialModel<T>,
) -> std::fmt::Result {
    writeln!(
        out,
        "{comment} {target} approximation, degree {} over {} ({})",
        model.degree(),
        model.domain(),
        model.method()
    )?;
    writeln!(out, "{comment} Evaluate with Horner's scheme: {}", horner_order(model.degree()))
}

fn write_coefficients<T: Value>(out: &mut String, indent: &str, model: &PolynomialModel<T>) -> std::fmt::Result {
    for (k, &c) in model.coefficients().iter().enumerate() {
        writeln!(out, "{indent}{}, // c{k}: x^{k} term", format_coefficient(c))?;
    }
    Ok(())
}

fn identifier(target: &str, degree: usize, upper: bool) -> String {
    let base: String = target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let name = format!("{base}_degree_{degree}");
    if upper {
        name.to_ascii_uppercase()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Go `case` arm assigning a `[]float64` literal, for a switch over the degree.
///
/// ```text
/// // sigmoid approximation, degree 1 over [-3, -1] (least-squares)
/// // Evaluate with Horner's scheme: c1*x + c0
/// case 1:
///     coeffs = []float64{
///         2.5580540e-1, // c0: x^0 term
///         1.1017640e-1, // c1: x^1 term
///     }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GoExporter;
impl<T: Value> Exporter<T> for GoExporter {
    fn name(&self) -> &str {
        "go"
    }

    fn render(&self, target: &str, model: &PolynomialModel<T>, out: &mut String) -> std::fmt::Result {
        write_header(out, "//", target, model)?;
        writeln!(out, "case {}:", model.degree())?;
        writeln!(out, "\tcoeffs = []float64{{")?;
        write_coefficients(out, "\t\t", model)?;
        writeln!(out, "\t}}")
    }
}

/// Rust `pub const` array named after the target and degree.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustExporter;
impl<T: Value> Exporter<T> for RustExporter {
    fn name(&self) -> &str {
        "rust"
    }

    fn render(&self, target: &str, model: &PolynomialModel<T>, out: &mut String) -> std::fmt::Result {
        write_header(out, "//", target, model)?;
        writeln!(
            out,
            "pub const {}: [f64; {}] = [",
            identifier(target, model.degree(), true),
            model.coefficients().len()
        )?;
        write_coefficients(out, "    ", model)?;
        writeln!(out, "];")
    }
}

/// C99 `static const double` array named after the target and degree.
#[derive(Debug, Clone, Copy, Default)]
pub struct CExporter;
impl<T: Value> Exporter<T> for CExporter {
    fn name(&self) -> &str {
        "c"
    }

    fn render(&self, target: &str, model: &PolynomialModel<T>, out: &mut String) -> std::fmt::Result {
        write_header(out, "//", target, model)?;
        writeln!(
            out,
            "static const double {}[{}] = {{",
            identifier(target, model.degree(), false),
            model.coefficients().len()
        )?;
        write_coefficients(out, "    ", model)?;
        writeln!(out, "}};")
    }
}
