//! Error type shared by every fallible operation in the crate.
use crate::store::NetworkId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChfError {
    #[error("Operand belongs to network {found:?}, expected network {expected:?}")]
    NetworkMismatch { expected: NetworkId, found: NetworkId },
    #[error("Node index {index} is outside the network ({count} nodes)")]
    UnknownNode { index: usize, count: usize },
    #[error("Unsupported operation '{lhs} {op} {rhs}': not a linear change of variables")]
    Unsupported { op: &'static str, lhs: String, rhs: String },
    #[error("Operation '{op}' needs at least one random variable operand")]
    NoRandomOperand { op: &'static str },
    #[error("Scalar {value} in '{op}' is not finite")]
    NonFiniteScalar { op: &'static str, value: String },
    #[error("Division by zero while scaling '{node_name}'")]
    DivisionByZero { node_name: String },
    #[error("Joint CHF expects {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Variance of '{node_name}' is zero: improper distribution")]
    DegenerateDistribution { node_name: String },
    #[error("Cycle detected: {0}")]
    CycleDetected(String),
    #[error("Invalid distribution parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid estimator config: {0}")]
    InvalidConfig(String),
}
