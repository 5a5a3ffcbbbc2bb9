use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// Identity of a `Network` instance. Handles carry it so that operands from
/// two different networks are caught before any rewrite happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetworkId(pub u64);

impl NetworkId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Continuous,
    /// Reserved: no discrete constructors exist yet.
    Discrete,
}

/// Arithmetic that derives a node from its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Display name. Not unique and never used as an identifier.
    pub name: String,
    pub kind: VariableKind,
    /// Outermost operation of a derived node; `None` for primitives.
    /// Negation is recorded as `Subtract`.
    pub operation: Option<Operation>,
}

impl NodeMetadata {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: VariableKind::Continuous, operation: None }
    }

    pub fn derived(name: impl Into<String>, operation: Operation) -> Self {
        Self { operation: Some(operation), ..Self::continuous(name) }
    }
}

/// Handle to a continuous random variable.
///
/// The handle holds no distribution state. Its CHF, moments and parents are
/// always resolved through the owning `Network`, so a handle stays valid
/// while the network keeps growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Crv {
    pub(crate) network: NetworkId,
    pub(crate) id: NodeId,
}

impl Crv {
    pub fn network(&self) -> NetworkId { self.network }
    pub fn id(&self) -> NodeId { self.id }
    /// Slot of this variable in the joint CHF argument vector.
    pub fn index(&self) -> usize { self.id.index() }
}
