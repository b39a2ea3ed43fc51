//! Error metrics and the affine map used by normalized bases
//!
//! The analyzer judges a model by three figures over the sample grid, all computed from the
//! residuals `|y - y_fit|` in a single pass by [`residuals`]:
//! - the maximum (uniform norm), the figure an approximation is ultimately judged by
//! - the mean
//! - the root mean square
//!
//! ```rust
//! use sigfit::statistics::residuals;
//!
//! let y = [1.0, 2.0, 3.0];
//! let y_fit = [1.1, 1.9, 3.05];
//!
//! let summary = residuals(y.into_iter(), y_fit.into_iter()).unwrap();
//! assert!(summary.mean <= summary.rms && summary.rms <= summary.max);
//! ```
use crate::value::Value;

/// Aggregate absolute residuals of one model over a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualSummary<T: Value> {
    /// Largest `|y - y_fit|`. NaN if any residual is NaN.
    pub max: T,

    /// Mean of `|y - y_fit|`.
    pub mean: T,

    /// `√(Σ (y - y_fit)² / N)`.
    pub rms: T,

    /// Number of points summarized.
    pub count: usize,
}

/// Summarizes the residuals between `y` and `y_fit` in one pass.
///
/// Returns `None` if there are no pairs.
pub fn residuals<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> Option<ResidualSummary<T>> {
    let mut max = T::zero();
    let mut abs_total = T::zero();
    let mut sq_total = T::zero();
    let mut count = 0usize;

    for (y, y_fit) in y.zip(y_fit) {
        let e = Value::abs(y - y_fit);
        max = worse(max, e);
        abs_total += e;
        sq_total += e * e;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = T::from_positive_int(count);
    Some(ResidualSummary {
        max,
        mean: abs_total / n,
        rms: (sq_total / n).sqrt(),
        count,
    })
}

/// Largest absolute residual, zero for empty input.
///
/// NaN is sticky: once a residual is NaN the result is NaN.
///
/// # Example
/// ```
/// # use sigfit::statistics::max_absolute_error;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.5, 3.0];
/// assert_eq!(max_absolute_error(y.into_iter(), y_fit.into_iter()), 0.5);
/// ```
pub fn max_absolute_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    y.zip(y_fit)
        .map(|(y, y_fit)| Value::abs(y - y_fit))
        .fold(T::zero(), worse)
}

fn worse<T: Value>(current: T, e: T) -> T {
    use num_traits::float::FloatCore;
    if FloatCore::is_nan(current) {
        current
    } else if FloatCore::is_nan(e) || e > current {
        e
    } else {
        current
    }
}

/// Arithmetic mean. NaN for empty input.
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let (sum, count) = data.fold((T::zero(), 0usize), |(sum, count), v| (sum + v, count + 1));
    sum / T::from_positive_int(count)
}

/// Coefficient of determination, `1 - SSE / SST`.
///
/// NaN if `y` is constant.
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let pairs: Vec<(T, T)> = y.zip(y_fit).collect();
    let y_mean = mean(pairs.iter().map(|&(y, _)| y));

    let (sse, sst) = pairs.iter().fold((T::zero(), T::zero()), |(sse, sst), &(y, y_fit)| {
        (sse + Value::powi(y - y_fit, 2), sst + Value::powi(y - y_mean, 2))
    });
    T::one() - sse / sst
}

/// Affine map of a source interval onto a destination interval.
///
/// Chebyshev bases use it to carry a domain such as `[-3, -1]` onto `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainNormalizer<T: Value> {
    src: (T, T),
    dst: (T, T),
}
impl<T: Value> DomainNormalizer<T> {
    /// Maps `src` onto `dst`.
    pub fn new(src: (T, T), dst: (T, T)) -> Self {
        Self { src, dst }
    }

    /// Maps an inclusive range onto `dst`.
    pub fn from_range(src: std::ops::RangeInclusive<T>, dst: (T, T)) -> Self {
        Self::new(src.into_inner(), dst)
    }

    /// `(alpha, beta)` with `normalize(x) = alpha·x + beta`.
    fn affine(&self) -> (T, T) {
        let alpha = (self.dst.1 - self.dst.0) / (self.src.1 - self.src.0);
        (alpha, self.dst.0 - alpha * self.src.0)
    }

    /// Source to destination, clamped to the destination interval.
    pub fn normalize(&self, x: T) -> T {
        let (alpha, beta) = self.affine();
        nalgebra::RealField::clamp(alpha * x + beta, self.dst.0, self.dst.1)
    }

    /// Destination to source, clamped to the source interval.
    pub fn denormalize(&self, t: T) -> T {
        let (alpha, beta) = self.affine();
        nalgebra::RealField::clamp((t - beta) / alpha, self.src.0, self.src.1)
    }

    /// Rewrites ascending coefficients over the normalized variable as coefficients over
    /// the source variable: returns `q` with `q(x) = p(alpha·x + beta)`.
    #[must_use]
    pub fn denormalize_coefs(&self, coefs: &[T]) -> Vec<T> {
        let (alpha, beta) = self.affine();

        // Horner over polynomials: q <- q·(alpha·x + beta) + c
        let mut q: Vec<T> = Vec::with_capacity(coefs.len());
        for &c in coefs.iter().rev() {
            q.push(T::zero());
            for j in (1..q.len()).rev() {
                q[j] = q[j] * beta + q[j - 1] * alpha;
            }
            q[0] = q[0] * beta + c;
        }
        q
    }
}
impl<T: Value> std::fmt::Display for DomainNormalizer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T[ {}..{} -> {}..{} ]", self.src.0, self.src.1, self.dst.0, self.dst.1)
    }
}
