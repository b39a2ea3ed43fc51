use nalgebra::MatrixViewMut;

use crate::{
    basis::{Basis, IntoMonomialBasis},
    display::{unicode, PolynomialDisplay},
    error::Result,
    statistics::DomainNormalizer,
    target::Target,
    value::Value,
};

/// Normalized Chebyshev basis for polynomial curves.
///
/// This basis uses the Chebyshev polynomials of the first kind, which form an
/// orthogonal family of polynomials on the interval [-1, 1].
///
/// Inputs are normalized so that the evaluation domain [`x_min`, `x_max`]
/// is mapped onto [-1, 1].
///
/// # When to use
/// - To build a near-minimax approximation without a least-squares solve, by
///   interpolating at the Chebyshev nodes ([`ChebyshevBasis::interpolate`]).
/// - As an intermediate form: circuit evaluators want monomials, so the result is
///   usually converted with [`IntoMonomialBasis::as_monomial`].
#[derive(Debug, Clone)]
pub struct ChebyshevBasis<T: Value = f64> {
    normalizer: DomainNormalizer<T>,
}
impl<T: Value> ChebyshevBasis<T> {
    /// Creates a new Chebyshev basis that normalizes inputs from the given range to [-1, 1].
    pub fn new(x_min: T, x_max: T) -> Self {
        let normalizer = DomainNormalizer::new((x_min, x_max), (-T::one(), T::one()));
        Self { normalizer }
    }

    /// Creates a new Chebyshev polynomial with the given coefficients over the specified x-range.
    ///
    /// # Errors
    /// Returns an error if the coefficient slice is empty.
    ///
    /// # Example
    /// ```rust
    /// use sigfit::basis::ChebyshevBasis;
    /// let chebyshev_poly = ChebyshevBasis::new_polynomial((-1.0, 1.0), &[1.0, 0.0, -0.5]).unwrap();
    /// ```
    pub fn new_polynomial(
        x_range: (T, T),
        coefficients: &[T],
    ) -> Result<crate::Polynomial<'_, Self, T>> {
        let basis = Self::new(x_range.0, x_range.1);
        crate::Polynomial::<Self, T>::from_basis(basis, coefficients)
    }

    /// Returns the `degree + 1` Chebyshev nodes of the first kind, mapped onto the domain.
    ///
    /// ```text
    /// tₖ = cos(π(k + ½) / (d + 1)),  k = 0..d
    /// ```
    ///
    /// Nodes are returned in the order of `k`, which is descending in `x`.
    pub fn nodes(&self, degree: usize) -> Vec<T> {
        normalized_nodes(degree)
            .into_iter()
            .map(|t| self.denormalize_x(t))
            .collect()
    }

    /// Computes the Chebyshev coefficients of the degree `degree` polynomial that
    /// interpolates `target` at the Chebyshev nodes of this domain.
    ///
    /// ```text
    /// cⱼ = 2/(d+1) · Σₖ f(xₖ)·Tⱼ(tₖ),  with c₀ halved
    /// ```
    ///
    /// The interpolant matches `target` exactly at every node and its error is within a
    /// small factor of the best uniform approximation of that degree.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NumericOverflow`] if `target` is not finite at a node.
    pub fn interpolate<F: Target<T> + ?Sized>(&self, target: &F, degree: usize) -> Result<Vec<T>> {
        let t = normalized_nodes(degree);
        let f = self
            .nodes(degree)
            .into_iter()
            .map(|x| target.try_y(x))
            .collect::<Result<Vec<T>>>()?;

        let scale = T::two() / T::from_positive_int(degree + 1);
        let mut coefficients = Vec::with_capacity(degree + 1);
        for j in 0..=degree {
            let mut sum = T::zero();
            for (&tk, &fk) in t.iter().zip(&f) {
                sum += fk * self.solve_function(j, tk);
            }
            coefficients.push(sum * scale);
        }

        if let Some(c0) = coefficients.first_mut() {
            *c0 /= T::two();
        }
        Ok(coefficients)
    }
}

fn normalized_nodes<T: Value>(degree: usize) -> Vec<T> {
    let n = T::from_positive_int(degree + 1);
    let half = T::one() / T::two();
    (0..=degree)
        .map(|k| (T::pi() * (T::from_positive_int(k) + half) / n).cos())
        .collect()
}

impl<T: Value> Basis<T> for ChebyshevBasis<T> {
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self {
        let normalizer = DomainNormalizer::from_range(x_range, (-T::one(), T::one()));
        Self { normalizer }
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        mut row: MatrixViewMut<'_, T, R, C, RS, CS>,
    ) {
        for j in start_index..row.ncols() {
            row[j] = match j {
                0 => T::one(),
                1 => x,
                _ => T::two() * x * row[j - 1] - row[j - 2],
            }
        }
    }

    #[inline(always)]
    fn normalize_x(&self, x: T) -> T {
        self.normalizer.normalize(x)
    }

    #[inline(always)]
    fn denormalize_x(&self, x: T) -> T {
        self.normalizer.denormalize(x)
    }

    #[inline(always)]
    fn solve_function(&self, j: usize, x: T) -> T {
        match j {
            0 => T::one(), // T0(x) = 1
            1 => x,        // T1(x) = x
            _ => {
                // Tn(x) = 2x*T_{n-1}(x) - T_{n-2}(x)
                let mut t0 = T::one();
                let mut t1 = x;
                let mut t = T::zero();

                for _ in 2..=j {
                    t = T::two() * x * t1 - t0;
                    t0 = t1;
                    t1 = t;
                }

                t
            }
        }
    }

    /// Clenshaw's recurrence, highest coefficient first.
    fn evaluate(&self, x: T, coefficients: &[T]) -> T {
        let Some((&c0, rest)) = coefficients.split_first() else {
            return T::zero();
        };

        let mut b1 = T::zero();
        let mut b2 = T::zero();
        for &c in rest.iter().rev() {
            let b0 = c + T::two() * x * b1 - b2;
            b2 = b1;
            b1 = b0;
        }

        c0 + x * b1 - b2
    }
}

impl<T: Value> IntoMonomialBasis<T> for ChebyshevBasis<T> {
    fn as_monomial(&self, coefficients: &mut [T]) -> Result<()> {
        let Some(n) = coefficients.len().checked_sub(1) else {
            return Ok(());
        };

        //
        // Phase 1 - Chebyshev -> Monomial in x'
        //

        let mut monomial_prime = vec![T::zero(); n + 1];
        let mut tkm1 = vec![T::one()]; //T0 = 1
        let mut tk = vec![T::zero(), T::one()]; // T1 = x

        monomial_prime[0] = coefficients[0];
        if n >= 1 {
            monomial_prime[1] = coefficients[1];
        }

        for (k, &c) in coefficients.iter().enumerate().skip(2) {
            // Tk+1 = 2x*Tk - T_{k-1}
            let mut tk1 = vec![T::zero(); k + 1];

            // 2x * Tk
            for (i, &coef) in tk.iter().enumerate() {
                if coef != T::zero() {
                    tk1[i + 1] += coef * T::two();
                }
            }

            // subtract T_{k-1}
            for (i, &coef) in tkm1.iter().enumerate() {
                tk1[i] -= coef;
            }

            for (i, &coef) in tk1.iter().enumerate() {
                monomial_prime[i] += c * coef;
            }

            tkm1 = tk;
            tk = tk1;
        }

        //
        // Phase 2 - Un-normalize over x
        let monomial = self.normalizer.denormalize_coefs(&monomial_prime);

        // Phase 3 - Write back to coefficients
        coefficients.copy_from_slice(&monomial);
        Ok(())
    }
}

impl<T: Value> PolynomialDisplay<T> for ChebyshevBasis<T> {
    fn term_label(&self, rank: usize) -> String {
        match rank {
            0 => String::new(),
            _ => format!("T{}(xₛ)", unicode::subscript(&rank.to_string())),
        }
    }

    fn scaling_formula(&self) -> Option<String> {
        Some(format!("xₛ = {}", self.normalizer))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::{assert_close, error::Error, target::Logistic, MonomialBasis};

    use super::*;

    #[test]
    fn test_chebyshev_functions() {
        let basis = ChebyshevBasis::new(-3.0, -1.0);
        assert_eq!(basis.normalize_x(-2.0), 0.0);
        assert_eq!(basis.denormalize_x(1.0), -1.0);

        for (x, expected) in [
            (0.0, [1.0, 0.0, -1.0, 0.0]),
            (1.0, [1.0, 1.0, 1.0, 1.0]),
            (-1.0, [1.0, -1.0, 1.0, -1.0]),
        ] {
            for (j, e) in expected.iter().enumerate() {
                assert_close!(basis.solve_function(j, x), *e, f64::EPSILON);
            }
        }

        let mut m = nalgebra::DMatrix::<f64>::zeros(1, 4);
        basis.fill_matrix_row(0, 0.5, m.row_mut(0));
        for j in 0..4 {
            assert_close!(m[(0, j)], basis.solve_function(j, 0.5), 1e-15);
        }
    }

    #[test]
    fn test_clenshaw_matches_sum() {
        let basis = ChebyshevBasis::new(-1.0, 1.0);
        let coefs = [0.3, -1.2, 0.7, 0.05, -0.4];
        for x in [-1.0, -0.3, 0.0, 0.8, 1.0] {
            let sum: f64 = coefs
                .iter()
                .enumerate()
                .map(|(j, c)| c * basis.solve_function(j, x))
                .sum();
            assert_close!(basis.evaluate(x, &coefs), sum, 1e-12);
        }
        assert_eq!(basis.evaluate(0.5, &[]), 0.0);
    }

    #[test]
    fn test_nodes() {
        let basis = ChebyshevBasis::new(-3.0, -1.0);
        let nodes = basis.nodes(3);
        assert_eq!(nodes.len(), 4);
        for x in &nodes {
            assert!((-3.0..=-1.0).contains(x));
        }
        // Symmetric about the midpoint
        assert_close!(nodes[0] + nodes[3], -4.0, 1e-12);
        assert_close!(nodes[1] + nodes[2], -4.0, 1e-12);
        assert!(nodes[0] > nodes[3]);
    }

    #[test]
    fn test_interpolate_hits_nodes() {
        let basis = ChebyshevBasis::new(-3.0, -1.0);
        let target = Logistic;
        let degree = 5;
        let coefs = basis.interpolate(&target, degree).unwrap();
        assert_eq!(coefs.len(), degree + 1);

        for x in basis.nodes(degree) {
            let y = basis.evaluate(basis.normalize_x(x), &coefs);
            assert_close!(y, target.y(x), 1e-12);
        }
    }

    #[test]
    fn test_interpolate_reproduces_polynomial() {
        // A cubic is reproduced exactly by a degree 3 interpolant
        struct Cubic;
        impl Target<f64> for Cubic {
            fn name(&self) -> &str {
                "cubic"
            }
            fn y(&self, x: f64) -> f64 {
                1.0 - 2.0 * x + 0.5 * x * x * x
            }
        }

        let basis = ChebyshevBasis::new(-3.0, -1.0);
        let mut coefs = basis.interpolate(&Cubic, 3).unwrap();
        basis.as_monomial(&mut coefs).unwrap();
        assert_close!(coefs[0], 1.0, 1e-9);
        assert_close!(coefs[1], -2.0, 1e-9);
        assert_close!(coefs[2], 0.0, 1e-9);
        assert_close!(coefs[3], 0.5, 1e-9);
    }

    #[test]
    fn test_as_monomial_matches() {
        let basis = ChebyshevBasis::new(0.0, 10.0);
        let cheb = [3.0, 2.0, 1.5, 3.0];
        let mut mono = cheb;
        basis.as_monomial(&mut mono).unwrap();

        let monomial = MonomialBasis::<f64>::default();
        for x in [0.0, 2.5, 5.0, 7.5, 10.0] {
            let expected = basis.evaluate(basis.normalize_x(x), &cheb);
            assert_close!(monomial.evaluate(x, &mono), expected, 1e-9);
        }

        let mut empty: [f64; 0] = [];
        basis.as_monomial(&mut empty).unwrap();
    }

    #[test]
    fn test_display() {
        let poly = ChebyshevBasis::new_polynomial((-1.0, 1.0), &[1.0, 0.0, -0.5]).unwrap();
        let s = poly.to_string();
        assert!(s.starts_with("xₛ = T[ -1..1 -> -1..1 ], y(x) = "));
        assert!(s.contains("T₂(xₛ)"));
    }

    #[test]
    fn test_interpolate_rejects_non_finite_target() {
        struct Pole;
        impl Target<f64> for Pole {
            fn name(&self) -> &str {
                "pole"
            }
            fn y(&self, x: f64) -> f64 {
                1.0 / (x + 2.0).max(0.0)
            }
        }

        // Half the nodes of [-3, -1] lie left of the pole at -2
        let basis = ChebyshevBasis::new(-3.0, -1.0);
        let err = basis.interpolate(&Pole, 3).unwrap_err();
        assert!(matches!(&err, Error::NumericOverflow(reason) if reason.starts_with("pole(")));
    }
}
