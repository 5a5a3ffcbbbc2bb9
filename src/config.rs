//! Numerical settings for moment estimation.
use crate::error::ChfError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Finite-difference step used to differentiate marginal CHFs at the origin.
    pub step: f64,
    /// Largest imaginary residual accepted on a real-valued estimate before it
    /// is reported as ill-conditioned.
    pub residual_tolerance: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { step: 1e-3, residual_tolerance: 1e-3 }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), ChfError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ChfError::InvalidConfig(format!("step must be positive and finite, got {}", self.step)));
        }
        if !(self.residual_tolerance.is_finite() && self.residual_tolerance >= 0.0) {
            return Err(ChfError::InvalidConfig(format!(
                "residual_tolerance must be non-negative and finite, got {}",
                self.residual_tolerance
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ChfError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ChfError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
