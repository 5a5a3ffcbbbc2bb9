//! Primitive distributions.
//!
//! Each constructor registers an independent variable: its characteristic
//! function multiplies into the joint without touching existing coordinates.
//!
//! | Distribution | Parameters | CHF |
//! |---|---|---|
//! | [`normal_chf`] | μ, σ² | exp(iμt − σ²t²/2) |
//! | [`uniform_chf`] | a, b | (e^{ibt} − e^{iat}) / (it(b−a)) |

use crate::chf::BaseChf;
use crate::error::ChfError;
use crate::network::Network;
use crate::store::Crv;
use num_complex::Complex64;

pub fn normal_chf(mu: f64, sigmasq: f64) -> Result<BaseChf, ChfError> {
    if !(mu.is_finite() && sigmasq.is_finite()) || sigmasq < 0.0 {
        return Err(ChfError::InvalidParameters(format!(
            "normal needs finite mu and sigmasq >= 0, got mu={}, sigmasq={}",
            mu, sigmasq
        )));
    }
    let name = format!("N({},{})", mu, sigmasq);
    Ok(BaseChf::new(name, move |t: Complex64| {
        (-0.5 * sigmasq * t * t + Complex64::i() * mu * t).exp()
    }))
}

/// Uniform on `[a, b]`.
///
/// Written as `e^{iat}·(sin w + 2i·sin²(w/2)) / w` with `w = (b−a)t`, which
/// avoids the cancellation in `e^{ibt} − e^{iat}` near the origin.
pub fn uniform_chf(a: f64, b: f64) -> Result<BaseChf, ChfError> {
    if !(a.is_finite() && b.is_finite()) || a >= b {
        return Err(ChfError::InvalidParameters(format!("uniform needs finite a < b, got a={}, b={}", a, b)));
    }
    let name = format!("U({},{})", a, b);
    let width = b - a;
    Ok(BaseChf::new(name, move |t: Complex64| {
        let phase = (Complex64::i() * a * t).exp();
        let w = t * width;
        if w.norm() == 0.0 {
            return phase;
        }
        let half = (w * 0.5).sin();
        phase * (w.sin() + Complex64::i() * 2.0 * half * half) / w
    }))
}

impl Network {
    /// Registers an independent variable defined by an arbitrary CHF.
    /// `chf(0)` must be 1.
    pub fn distribution<F>(&mut self, name: impl Into<String>, chf: F) -> Crv
    where
        F: Fn(Complex64) -> Complex64 + Send + Sync + 'static,
    {
        self.register_primitive(BaseChf::new(name, chf))
    }

    pub fn normal(&mut self, mu: f64, sigmasq: f64) -> Result<Crv, ChfError> {
        Ok(self.register_primitive(normal_chf(mu, sigmasq)?))
    }

    pub fn uniform(&mut self, a: f64, b: f64) -> Result<Crv, ChfError> {
        Ok(self.register_primitive(uniform_chf(a, b)?))
    }
}
