//! Approximation domains and the sample grids built over them
//!
//! - [`Domain`]: a validated closed interval `[lower, upper]`.
//! - [`SampleSet`]: the evenly spaced grid over a domain, paired with target values.
//!   It is built once per run and shared read-only by every degree.
use crate::{
    error::{Error, Result},
    target::Target,
    value::{CoordExt, Value},
};

/// Closed input interval over which an approximation is fitted and its error guaranteed.
///
/// Invariant: both bounds and the span are finite, and `lower < upper`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Domain<T: Value = f64> {
    lower: T,
    upper: T,
}
impl<T: Value> Domain<T> {
    /// Creates a new domain.
    ///
    /// # Errors
    /// Returns [`Error::DomainViolation`] if either bound is not finite, `lower >= upper`,
    /// or `upper - lower` overflows.
    ///
    /// # Example
    /// ```
    /// # use sigfit::domain::Domain;
    /// assert!(Domain::new(-3.0, -1.0).is_ok());
    /// assert!(Domain::new(1.0, 1.0).is_err());
    /// ```
    pub fn new(lower: T, upper: T) -> Result<Self> {
        if !lower.is_finite_value() || !upper.is_finite_value() {
            return Err(Error::DomainViolation(format!(
                "domain bounds must be finite, got [{lower}, {upper}]"
            )));
        }
        if lower >= upper {
            return Err(Error::DomainViolation(format!(
                "domain lower bound {lower} must be below upper bound {upper}"
            )));
        }
        if !(upper - lower).is_finite_value() {
            return Err(Error::DomainViolation(format!(
                "domain [{lower}, {upper}] is too wide to sample"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound of the domain.
    pub fn lower(&self) -> T {
        self.lower
    }

    /// Upper bound of the domain.
    pub fn upper(&self) -> T {
        self.upper
    }

    /// Width of the domain, `upper - lower`.
    pub fn span(&self) -> T {
        self.upper - self.lower
    }

    /// Returns true if `x` lies within the closed interval.
    pub fn contains(&self, x: T) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// Produces `n` evenly spaced values from `lower` to `upper` inclusive.
    ///
    /// The step is `(upper - lower) / (n - 1)`. Each value is computed from its index
    /// rather than by accumulation, and the last value is exactly `upper`.
    ///
    /// # Errors
    /// Returns [`Error::DomainViolation`] if `n < 2`.
    ///
    /// # Example
    /// ```
    /// # use sigfit::domain::Domain;
    /// let d = Domain::new(-3.0, -1.0).unwrap();
    /// assert_eq!(d.linspace(5).unwrap(), vec![-3.0, -2.5, -2.0, -1.5, -1.0]);
    /// ```
    pub fn linspace(&self, n: usize) -> Result<Vec<T>> {
        if n < 2 {
            return Err(Error::DomainViolation(format!(
                "at least 2 samples are required, got {n}"
            )));
        }

        let last = n - 1;
        let step = self.span() / T::try_cast(last)?;
        let mut xs = Vec::with_capacity(n);
        for i in 0..last {
            xs.push(self.lower + T::try_cast(i)? * step);
        }
        xs.push(self.upper);
        Ok(xs)
    }
}
impl<T: Value> std::fmt::Display for Domain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Immutable grid of `(x, f(x))` pairs over a [`Domain`].
///
/// `x` values are strictly increasing, evenly spaced, and start and end exactly on the
/// domain bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet<T: Value = f64> {
    domain: Domain<T>,
    points: Vec<(T, T)>,
}
impl<T: Value> SampleSet<T> {
    /// Samples `target` at `n` evenly spaced points over `domain`.
    ///
    /// # Errors
    /// - [`Error::DomainViolation`] if `n < 2`.
    /// - [`Error::NumericOverflow`] if the target produces a non-finite value.
    ///
    /// # Example
    /// ```
    /// # use sigfit::{domain::{Domain, SampleSet}, target::Logistic};
    /// let domain = Domain::new(-3.0, -1.0).unwrap();
    /// let samples = SampleSet::new(domain, 1000, &Logistic).unwrap();
    /// assert_eq!(samples.len(), 1000);
    /// ```
    pub fn new<F: Target<T> + ?Sized>(domain: Domain<T>, n: usize, target: &F) -> Result<Self> {
        let points = domain
            .linspace(n)?
            .into_iter()
            .map(|x| Ok((x, target.try_y(x)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { domain, points })
    }

    /// The domain this grid covers.
    pub fn domain(&self) -> &Domain<T> {
        &self.domain
    }

    /// The `(x, y)` pairs, in ascending `x`.
    pub fn points(&self) -> &[(T, T)] {
        &self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a sample set holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The sampled `x` values.
    pub fn x(&self) -> Vec<T> {
        self.points.x()
    }

    /// The sampled target values.
    pub fn y(&self) -> Vec<T> {
        self.points.y()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::{assert_close, error::ErrorKind, target::Logistic};

    use super::*;

    #[test]
    fn test_domain_validation() {
        assert!(Domain::new(-3.0, -1.0).is_ok());
        for (lower, upper) in [
            (1.0, 1.0),
            (2.0, 1.0),
            (f64::NAN, 1.0),
            (0.0, f64::INFINITY),
            (-1e308, 1e308),
            (f64::MIN, f64::MAX / 2.0),
        ] {
            let err = Domain::new(lower, upper).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DomainViolation, "[{lower}, {upper}]");
        }

        // Wide but representable
        let domain = Domain::new(-1e307, 1e307).unwrap();
        assert_eq!(domain.linspace(3).unwrap(), vec![-1e307, 0.0, 1e307]);
    }

    #[test]
    fn test_linspace() {
        let domain = Domain::new(-3.0, -1.0).unwrap();
        let xs = domain.linspace(1000).unwrap();
        assert_eq!(xs.len(), 1000);
        assert_eq!(xs[0], -3.0);
        assert_eq!(xs[999], -1.0);

        let step = 2.0 / 999.0;
        for w in xs.windows(2) {
            assert!(w[1] > w[0]);
            assert_close!(w[1] - w[0], step, 1e-12);
        }
    }

    #[test]
    fn test_linspace_too_few() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        for n in [0, 1] {
            let err = domain.linspace(n).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DomainViolation);
        }
    }

    #[test]
    fn test_two_samples_are_endpoints() {
        let domain = Domain::new(-3.0, -1.0).unwrap();
        let samples = SampleSet::new(domain, 2, &Logistic).unwrap();
        assert_eq!(samples.x(), vec![-3.0, -1.0]);
        assert_eq!(samples.y(), vec![Logistic.y(-3.0), Logistic.y(-1.0)]);
        assert!(!samples.is_empty());
    }

    #[test]
    fn test_sample_values() {
        let domain = Domain::new(-3.0, -1.0).unwrap();
        let samples = SampleSet::new(domain, 1000, &Logistic).unwrap();
        let y = samples.y();
        assert_close!(y[0], 0.047_425_9, 1e-7);
        assert_close!(y[999], 0.268_941_4, 1e-7);
        assert_eq!(samples.domain(), &domain);
    }

    #[test]
    fn test_domain_helpers() {
        let domain = Domain::new(-3.0, -1.0).unwrap();
        assert_eq!(domain.span(), 2.0);
        assert!(domain.contains(-3.0) && domain.contains(-1.0));
        assert!(!domain.contains(-0.5));
        assert_eq!(domain.to_string(), "[-3, -1]");
    }
}
