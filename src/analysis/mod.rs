//! Read-side analysis of a network: ordering, statistics and exported views.
pub mod moments;
pub mod sampling;
pub mod snapshot;
pub mod topology;

pub use moments::Estimate;
pub use sampling::SamplingWindow;
pub use snapshot::{NetworkSnapshot, NodeSnapshot};
