//! Node identity and DAG storage for a network.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{Crv, NetworkId, NodeId, NodeMetadata, Operation, VariableKind};
