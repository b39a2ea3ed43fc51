//! Polynomial basis functions for curve fitting
//!
//! This module defines the [`Basis`] trait, which abstracts polynomial basis functions
//! for use in curve fitting and evaluation.
//!
//! Also contains [`IntoMonomialBasis`], for bases which can be converted to monomial form.
//!
//! # Provided Bases
//! - [`MonomialBasis`]: The standard monomial basis, i.e., 1, x, x², … xⁿ. This is the form
//!   consumed by arithmetic-circuit evaluators, and the form every exported model uses.
//! - [`ChebyshevBasis`]: Chebyshev polynomials of the first kind, normalized onto [-1, 1].
//!   Used to build interpolants at Chebyshev nodes before converting them to monomial form.
//!
//! # Evaluation order
//! Each basis fixes the order in which [`Basis::evaluate`] combines coefficients, so that
//! every consumer of a polynomial reproduces the same rounding:
//! - Monomial: Horner's scheme, highest power first.
//! - Chebyshev: Clenshaw's recurrence.

use nalgebra::MatrixViewMut;

use crate::{error::Result, value::Value};

pub(crate) mod monomial;
pub use monomial::{MonomialBasis, MonomialPolynomial};

pub(crate) mod chebyshev;
pub use chebyshev::ChebyshevBasis;

/// A trait representing a polynomial basis.
///
/// Assumes a Vandermonde structure for the basis functions.
///
/// A polynomial basis defines the set of functions used to represent a polynomial.
/// This trait abstracts over any such basis so that polynomials can be expressed,
/// fitted, and evaluated generically through [`crate::Polynomial`] and [`crate::CurveFit`].
///
/// # Type Parameters
/// - `T`: The numeric type used for coefficients and evaluation (e.g., `f64`).
pub trait Basis<T: Value>: Sized + Clone + std::fmt::Debug + Send + Sync {
    /// Create a new basis from the given data range
    ///
    /// Initializes any needed metadata for normalization
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self;

    /// Returns the number of basis functions needed for a polynomial of a given degree.
    #[inline(always)]
    fn k(&self, degree: usize) -> usize {
        degree + 1
    }

    /// Returns the polynomial degree corresponding to a given number of basis functions.
    ///
    /// Returns `None` if the number of functions does not correspond to a valid degree.
    #[inline(always)]
    fn degree(&self, k: usize) -> Option<usize> {
        k.checked_sub(1)
    }

    /// Populates a row of a Vandermonde matrix with this basis evaluated at `x`.
    ///
    /// All basis functions are written into `row` starting at column `start_index`.
    ///
    /// `x` will be normalized by the caller using the `normalize_x` method.
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        row: MatrixViewMut<T, R, C, RS, CS>,
    );

    /// Normalizes the input value `x` for this basis.
    fn normalize_x(&self, x: T) -> T;

    /// Denormalizes the input value `x` for this basis.
    fn denormalize_x(&self, x: T) -> T;

    /// Evaluates the jth function of this basis at a given (normalized) point.
    ///
    /// Formally, the basis provides functions φ₀, φ₁, …, φₙ, and solves `φⱼ(x)`
    fn solve_function(&self, j: usize, x: T) -> T;

    /// Evaluates `Σ cⱼ·φⱼ(x)` at a given (normalized) point.
    ///
    /// The default is an explicit sum in ascending order. Bases with a cheaper or
    /// better-conditioned recurrence override this, and the override *is* the
    /// documented evaluation order for that basis.
    fn evaluate(&self, x: T, coefficients: &[T]) -> T {
        let mut y = T::zero();
        for (j, &coef) in coefficients.iter().enumerate() {
            y += coef * self.solve_function(j, x);
        }
        y
    }
}

/// A trait for converting polynomial representations into monomial form.
///
/// # Behavior
/// - The given `coefficients` slice is mutated in place to represent the same
///   polynomial expressed in the monomial basis over the raw (denormalized) `x`.
/// - Implementations must overwrite the entire slice.
///
/// # Errors
/// Returns an error if the conversion is not supported for the given coefficients.
pub trait IntoMonomialBasis<T: Value>: Basis<T> {
    /// Converts this polynomial representation into monomial form.
    ///
    /// # Errors
    /// Returns an error if the coefficients cannot be converted.
    fn as_monomial(&self, coefficients: &mut [T]) -> Result<()>;
}
