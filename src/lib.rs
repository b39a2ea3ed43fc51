//! # Sigfit
//! ## Polynomial stand-ins for the logistic sigmoid
//!
//! Circuits over encrypted data can add and multiply, and that is all. A model that needs
//! `1 / (1 + e^-x)` has to make do with a polynomial instead, and every multiplication that
//! polynomial costs is paid for in circuit depth.
//!
//! This crate finds those polynomials. For a bounded input domain it:
//! - samples the sigmoid on an evenly spaced grid ([`domain`])
//! - fits a polynomial of each requested degree by closed-form least squares ([`model`])
//! - measures the approximation at canonical test points and across the whole domain ([`analysis`])
//! - writes the coefficients out as source code for the circuit evaluator ([`export`])
//!
//! ```rust
//! use sigfit::{config::ApproxConfig, report, target::Logistic};
//!
//! // [-3, -1], 1000 samples, degrees 3, 5 and 7
//! let config = ApproxConfig::credit_scoring();
//! let report = report::run(&config, &Logistic, &[]).unwrap();
//!
//! for fitted in report.fitted() {
//!     println!("degree {}: max error {:e}", fitted.degree, fitted.errors.domain_max_error);
//! }
//!
//! // Stable text format for log parsers
//! println!("{report}");
//! ```
//!
//! # Core Concepts
//! - A [`target::Target`] is the function being approximated. [`target::Logistic`] is evaluated
//!   in a form that cannot overflow.
//! - A [`model::PolynomialModel`] is one fitted degree: ascending monomial coefficients in the raw input `x`.
//!     - It is only meaningful inside the [`domain::Domain`] it was fitted on.
//!     - It is always evaluated with Horner's scheme, and exported artifacts document the same order.
//!     - Its multiplicative depth is its degree.
//! - A [`CurveFit`] is the least-squares machinery behind a model. It works in any [`basis::Basis`]:
//!     - [`MonomialFit`] solves directly for `y = Σ cₖxᵏ`.
//!     - [`ChebyshevFit`] normalizes the input first and is better conditioned at high degree.
//! - An [`analysis::ErrorReport`] is what a model is judged by. Its domain-wide maximum always
//!   dominates the error at any single test point.
//! - Failures are classified by [`error::ErrorKind`]. A bad configuration stops a run; a degree
//!   that cannot be fitted is recorded in the report and the other degrees carry on.
//!
//! # Features
//! - `cli` *(default)*: the `sigfit` binary.
//! - `parallel`: fit degrees concurrently with `rayon`. Report order is unchanged.
//!
//! # Testing utilities
//!
//! Assertion macros for numerical tests live in [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]


pub mod basis;
pub mod display;
pub mod error;
pub mod statistics;
pub mod value;

pub mod analysis;
pub mod config;
pub mod domain;
pub mod export;
pub mod model;
pub mod report;
pub mod target;

mod fit;
mod polynomial;

pub use basis::{ChebyshevBasis, MonomialBasis, MonomialPolynomial};
pub use fit::*;
pub use polynomial::Polynomial;

pub use nalgebra;
