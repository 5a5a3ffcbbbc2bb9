//! The composition engine: arithmetic on random variables as joint-CHF rewrites.
pub mod operand;
pub mod rules;

pub use operand::Operand;
pub use crate::store::Operation;
