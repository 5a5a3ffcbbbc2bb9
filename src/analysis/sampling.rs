//! Inputs for numerical Fourier inversion done outside the crate: marginal CHF
//! samples on a grid, and a Chebyshev window to place that grid.
use crate::error::ChfError;
use crate::network::Network;
use crate::store::Crv;
use num_complex::Complex64;
use rayon::prelude::*;

/// An interval `[start, start + span]` holding at least `1 - tol` of the mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingWindow {
    pub start: f64,
    pub span: f64,
}

impl SamplingWindow {
    pub fn end(&self) -> f64 { self.start + self.span }
}

impl Network {
    /// Evaluates the marginal CHF of `rv` at every `t`, in parallel.
    ///
    /// All points are evaluated against one snapshot of the joint.
    pub fn marginal_samples(&self, rv: Crv, ts: &[f64]) -> Result<Vec<Complex64>, ChfError> {
        let marginal = self.marginal_chf(rv)?;
        ts.par_iter().map(|&t| marginal.at_real(t)).collect()
    }

    /// Chebyshev bound: `k = tol^{-1/2}`, window `μ ± kσ/2`.
    ///
    /// Requires a non-zero variance.
    pub fn sampling_window(&self, rv: Crv, tol: f64) -> Result<SamplingWindow, ChfError> {
        if !(tol.is_finite() && tol > 0.0) {
            return Err(ChfError::InvalidConfig(format!("window tolerance must be positive, got {}", tol)));
        }
        let k = tol.powf(-0.5);
        let mu = self.expectation(rv)?;
        let sigma = self.std_dev(rv)?;
        Ok(SamplingWindow { start: mu - k * sigma / 2.0, span: k * sigma })
    }
}
