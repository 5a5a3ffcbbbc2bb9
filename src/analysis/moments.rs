//! moments.rs
//! Moments from characteristic functions: `E[X^n] = (-i)^n · φ^{(n)}(0)`.
//!
//! Derivatives are taken with the n-th central difference
//! `Σ_k (-1)^k C(n,k) φ((n/2 - k)·h) / h^n`, which costs exactly `n + 1`
//! evaluations of the marginal CHF.

use crate::compose::Operand;
use crate::error::ChfError;
use crate::network::{format_scalar, Network, Resolved};
use num_complex::Complex64;

/// A real-valued statistic together with the part of the complex estimate
/// that was discarded to produce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    /// Magnitude of the imaginary part of the underlying complex estimate.
    pub imaginary_residual: f64,
    /// `false` when the residual exceeded the configured tolerance.
    pub well_conditioned: bool,
}

/// `(-i)^n` for integer orders.
pub fn neg_i_pow(order: u32) -> Complex64 {
    match order % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, -1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, 1.0),
    }
}

/// n-th derivative of `f` at the origin by central differences with step `h`.
pub fn central_difference<F>(f: F, order: u32, h: f64) -> Result<Complex64, ChfError>
where
    F: Fn(f64) -> Result<Complex64, ChfError>,
{
    if !(h.is_finite() && h > 0.0) {
        return Err(ChfError::InvalidConfig(format!("finite-difference step must be positive, got {}", h)));
    }
    let n = order as i32;
    let mut sum = Complex64::new(0.0, 0.0);
    let mut binom = 1.0_f64;
    for k in 0..=n {
        let x = (0.5 * n as f64 - k as f64) * h;
        let term = f(x)? * binom;
        if k % 2 == 0 { sum += term } else { sum -= term }
        binom = binom * (n - k) as f64 / (k + 1) as f64;
    }
    Ok(sum / h.powi(n))
}

/// Rounding noise of `m2 - m1²` when both come from central differences with
/// step `h` on a CHF bounded by 1: `ε/h²` from the second difference, `ε/h`
/// from the first, amplified by `m1`, plus the final subtraction.
fn rounding_floor(m1: Complex64, m2: Complex64, h: f64) -> f64 {
    8.0 * f64::EPSILON * (4.0 / (h * h) + 2.0 * m1.norm() / h + m2.norm())
}

impl Network {
    /// `E[X^order]` estimated with finite-difference step `tolerance`.
    ///
    /// For a scalar operand `a` this is exactly `a^order`.
    pub fn moment(&self, x: impl Into<Operand>, order: u32, tolerance: f64) -> Result<Complex64, ChfError> {
        match self.resolve(x.into())? {
            Resolved::Scalar(a) => Ok(a.powu(order)),
            Resolved::Variable(id) => {
                let marginal = self.marginal_chf(self.handle(id))?;
                let derivative = central_difference(|t| marginal.at_real(t), order, tolerance)?;
                Ok(neg_i_pow(order) * derivative)
            }
        }
    }

    pub fn expectation_estimate(&self, x: impl Into<Operand>) -> Result<Estimate, ChfError> {
        let m1 = self.moment(x, 1, self.config().step)?;
        Ok(self.to_estimate(m1.re, m1.im.abs()))
    }

    /// `E(X)`: the real part of the first moment. Scalars are returned unchanged.
    pub fn expectation(&self, x: impl Into<Operand>) -> Result<f64, ChfError> {
        let x = x.into();
        let estimate = self.expectation_estimate(x)?;
        self.report(x, "expectation", &estimate);
        Ok(estimate.value)
    }

    pub fn variance_estimate(&self, x: impl Into<Operand>) -> Result<Estimate, ChfError> {
        Ok(self.variance_with_floor(x.into())?.0)
    }

    /// `V(X) = |E[X²] − E[X]²|`. Zero for scalars.
    pub fn variance(&self, x: impl Into<Operand>) -> Result<f64, ChfError> {
        let x = x.into();
        let estimate = self.variance_estimate(x)?;
        self.report(x, "variance", &estimate);
        Ok(estimate.value)
    }

    /// Fails with `DegenerateDistribution` when the variance is zero, which
    /// includes estimates that do not rise above finite-difference rounding.
    pub fn std_dev(&self, x: impl Into<Operand>) -> Result<f64, ChfError> {
        let x = x.into();
        let (estimate, floor) = self.variance_with_floor(x)?;
        self.report(x, "variance", &estimate);
        if estimate.value <= floor {
            return Err(ChfError::DegenerateDistribution { node_name: self.describe(x)? });
        }
        Ok(estimate.value.sqrt())
    }

    /// The variance estimate and the rounding noise it cannot be told apart from.
    fn variance_with_floor(&self, x: Operand) -> Result<(Estimate, f64), ChfError> {
        if let Resolved::Scalar(_) = self.resolve(x)? {
            return Ok((self.to_estimate(0.0, 0.0), 0.0));
        }
        let step = self.config().step;
        let m1 = self.moment(x, 1, step)?;
        let m2 = self.moment(x, 2, step)?;
        let central = m2 - m1 * m1;
        let estimate = self.to_estimate(central.norm(), central.im.abs());
        Ok((estimate, rounding_floor(m1, m2, step)))
    }

    fn to_estimate(&self, value: f64, imaginary_residual: f64) -> Estimate {
        Estimate {
            value,
            imaginary_residual,
            well_conditioned: imaginary_residual <= self.config().residual_tolerance,
        }
    }

    fn report(&self, x: Operand, statistic: &str, estimate: &Estimate) {
        if !estimate.well_conditioned {
            tracing::warn!(
                node = %self.describe(x).unwrap_or_default(),
                statistic,
                residual = estimate.imaginary_residual,
                tolerance = self.config().residual_tolerance,
                "estimate has a non-negligible imaginary residual"
            );
        }
    }

    pub(crate) fn describe(&self, x: Operand) -> Result<String, ChfError> {
        Ok(match self.resolve(x)? {
            Resolved::Scalar(a) => format_scalar(a),
            resolved => self.operand_name(resolved),
        })
    }
}
