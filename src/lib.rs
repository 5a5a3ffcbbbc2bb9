//! Dependent continuous random variables through joint characteristic functions.
//!
//! A [`Network`] holds a set of random variables and one joint characteristic
//! function for all of them. Arithmetic on members (`+`, `-`, scalar `*` and
//! `/`) registers a new member and rewrites the joint by a change of
//! variables, so dependence between operands is kept exactly:
//!
//! ```
//! use curv_core::Network;
//!
//! let mut net = Network::default();
//! let a = net.normal(1.0, 2.0).unwrap();
//! let b = net.uniform(-5.0, 4.0).unwrap();
//! let scaled = net.mul(2.0, b).unwrap();
//! let shifted = net.add(4.0, a).unwrap();
//! let c = net.sub(shifted, scaled).unwrap();
//!
//! assert!((net.expectation(c).unwrap() - 6.0).abs() < 1e-3);
//! assert!((net.variance(c).unwrap() - 29.0).abs() < 1e-2);
//! ```
//!
//! Statistics are recovered by slicing the joint along one axis and
//! differentiating at the origin. Densities are never built.

pub mod analysis;
pub mod chf;
pub mod compose;
pub mod config;
pub mod distributions;
pub mod error;
pub mod network;
pub mod store;

pub use analysis::{Estimate, NetworkSnapshot, SamplingWindow};
pub use chf::{BaseChf, JointChf};
pub use compose::{Operand, Operation};
pub use config::EstimatorConfig;
pub use error::ChfError;
pub use network::{MarginalChf, Network};
pub use store::{Crv, NetworkId, NodeId, VariableKind};

pub use num_complex::Complex64;
