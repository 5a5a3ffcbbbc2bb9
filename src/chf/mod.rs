//! Characteristic-function representation: primitive CHFs and the composed joint.
pub mod base;
pub mod joint;

pub use base::BaseChf;
pub use joint::{Fold, Folds, JointChf, Layer};
