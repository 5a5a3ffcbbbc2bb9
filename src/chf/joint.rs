//! joint.rs
//! The joint characteristic function of a network as an owned chain of layers.
//!
//! Every registered node adds exactly one layer on top of the previous joint.
//! A layer consumes the last coordinate of the argument vector (the coordinate
//! of the node it introduced) and either multiplies in an independent CHF or
//! folds that coordinate into the coordinates of its operands:
//!
//! ```text
//! φ_new(t_0, .., t_{n-1}, t_Z) = e^{i·t_Z·b} · φ_old(t_0 + c_0·t_Z, .., t_{n-1})
//! ```
//!
//! which is `CHF_{aX+b}(t) = e^{ibt}·CHF_X(at)` applied per coordinate.
//! Layers are shared through `Arc`, so extending a joint is O(1) and older
//! versions remain valid for argument vectors of their own length.

use super::base::BaseChf;
use crate::error::ChfError;
use crate::store::NodeId;
use num_complex::Complex64;
use smallvec::SmallVec;
use std::sync::Arc;

/// `t_target += coefficient · t_new`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fold {
    pub target: NodeId,
    pub coefficient: Complex64,
}

impl Fold {
    pub fn new(target: NodeId, coefficient: Complex64) -> Self {
        Self { target, coefficient }
    }
}

/// Binary rules fold into two operands; unary rules into one.
pub type Folds = SmallVec<[Fold; 2]>;

#[derive(Debug, Clone)]
pub enum Layer {
    /// The joint of an empty network: the constant 1.
    Empty,
    /// An independent variable: `chf(t_new) · φ_old(rest)`.
    Primitive { child: Arc<Layer>, base: BaseChf },
    /// A linear combination of existing variables.
    Folded { child: Arc<Layer>, folds: Folds },
    /// A linear combination plus a constant offset, contributing `e^{i·t_new·offset}`.
    Shifted { child: Arc<Layer>, folds: Folds, offset: Complex64 },
}

#[derive(Debug, Clone)]
pub struct JointChf {
    arity: usize,
    root: Arc<Layer>,
}

impl Default for JointChf {
    fn default() -> Self { Self::empty() }
}

impl JointChf {
    pub fn empty() -> Self {
        Self { arity: 0, root: Arc::new(Layer::Empty) }
    }

    /// Number of arguments this joint accepts.
    pub fn arity(&self) -> usize { self.arity }

    /// The most recently added layer.
    pub fn top(&self) -> &Layer { &self.root }

    pub fn with_primitive(&self, base: BaseChf) -> Self {
        Self {
            arity: self.arity + 1,
            root: Arc::new(Layer::Primitive { child: Arc::clone(&self.root), base }),
        }
    }

    /// Extends the joint with a node defined as `Σ c_k·X_k + offset`.
    pub fn with_fold(&self, folds: Folds, offset: Option<Complex64>) -> Self {
        debug_assert!(folds.iter().all(|f| f.target.index() < self.arity));
        let child = Arc::clone(&self.root);
        let layer = match offset {
            Some(offset) => Layer::Shifted { child, folds, offset },
            None => Layer::Folded { child, folds },
        };
        Self { arity: self.arity + 1, root: Arc::new(layer) }
    }

    /// Evaluates the joint at `args`, which must hold exactly `arity` values
    /// in node-index order.
    pub fn evaluate(&self, args: &[Complex64]) -> Result<Complex64, ChfError> {
        if args.len() != self.arity {
            return Err(ChfError::ArityMismatch { expected: self.arity, actual: args.len() });
        }

        let mut coords = args.to_vec();
        let mut value = Complex64::new(1.0, 0.0);
        let mut layer = self.root.as_ref();

        // Walk the chain iteratively; deep networks must not exhaust the stack.
        loop {
            let next = match layer {
                Layer::Empty => return Ok(value),
                Layer::Primitive { child, base } => {
                    let t = pop_coordinate(&mut coords, self.arity)?;
                    value *= base.eval(t);
                    child
                }
                Layer::Folded { child, folds } => {
                    let t = pop_coordinate(&mut coords, self.arity)?;
                    apply_folds(&mut coords, folds, t);
                    child
                }
                Layer::Shifted { child, folds, offset } => {
                    let t = pop_coordinate(&mut coords, self.arity)?;
                    apply_folds(&mut coords, folds, t);
                    value *= (Complex64::i() * t * *offset).exp();
                    child
                }
            };
            layer = next.as_ref();
        }
    }
}

impl Layer {
    fn into_child(self) -> Option<Arc<Layer>> {
        match self {
            Layer::Empty => None,
            Layer::Primitive { child, .. }
            | Layer::Folded { child, .. }
            | Layer::Shifted { child, .. } => Some(child),
        }
    }
}

impl Drop for JointChf {
    // Unlinks uniquely owned layers one at a time so dropping a long chain
    // does not recurse once per layer.
    fn drop(&mut self) {
        let mut next = Some(std::mem::replace(&mut self.root, Arc::new(Layer::Empty)));
        while let Some(layer) = next {
            next = match Arc::try_unwrap(layer) {
                Ok(owned) => owned.into_child(),
                Err(_) => None,
            };
        }
    }
}

#[inline]
fn pop_coordinate(coords: &mut Vec<Complex64>, arity: usize) -> Result<Complex64, ChfError> {
    coords.pop().ok_or(ChfError::ArityMismatch { expected: arity, actual: 0 })
}

#[inline]
fn apply_folds(coords: &mut [Complex64], folds: &[Fold], t: Complex64) {
    for fold in folds {
        coords[fold.target.index()] += fold.coefficient * t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn c(re: f64) -> Complex64 { Complex64::new(re, 0.0) }

    fn gaussian(mu: f64, var: f64) -> BaseChf {
        BaseChf::new("N", move |t: Complex64| {
            (-0.5 * var * t * t + Complex64::i() * mu * t).exp()
        })
    }

    #[test]
    fn test_empty_joint_is_one() {
        let joint = JointChf::empty();
        assert_eq!(joint.arity(), 0);
        assert_eq!(joint.evaluate(&[]).unwrap(), c(1.0));
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let joint = JointChf::empty().with_primitive(gaussian(0.0, 1.0));
        let err = joint.evaluate(&[c(0.0), c(0.0)]).unwrap_err();
        assert_eq!(err, ChfError::ArityMismatch { expected: 1, actual: 2 });
    }

    #[test]
    fn test_primitives_multiply_independently() {
        let g1 = gaussian(1.0, 2.0);
        let g2 = gaussian(-3.0, 0.5);
        let joint = JointChf::empty().with_primitive(g1.clone()).with_primitive(g2.clone());

        let (t0, t1) = (c(0.3), c(-0.7));
        let expected = g1.eval(t0) * g2.eval(t1);
        let got = joint.evaluate(&[t0, t1]).unwrap();
        assert!((got - expected).norm() < 1e-12);
    }

    #[test]
    fn test_shift_layer_applies_phase_and_fold() {
        // Z = X + 4
        let g = gaussian(1.0, 2.0);
        let joint = JointChf::empty()
            .with_primitive(g.clone())
            .with_fold(smallvec![Fold::new(NodeId(0), c(1.0))], Some(c(4.0)));
        assert!(matches!(joint.top(), Layer::Shifted { .. }));

        let t = c(0.25);
        let expected = (Complex64::i() * t * 4.0).exp() * g.eval(t);
        let got = joint.evaluate(&[c(0.0), t]).unwrap();
        assert!((got - expected).norm() < 1e-12);
    }

    #[test]
    fn test_older_version_stays_valid() {
        let v1 = JointChf::empty().with_primitive(gaussian(0.0, 1.0));
        let v2 = v1.with_fold(smallvec![Fold::new(NodeId(0), c(2.0))], None);
        assert_eq!(v1.arity(), 1);
        assert_eq!(v2.arity(), 2);
        assert!(v1.evaluate(&[c(0.1)]).is_ok());
        assert!(v2.evaluate(&[c(0.1), c(0.2)]).is_ok());
    }

    #[test]
    fn test_deep_chain_evaluates_without_recursion() {
        let mut joint = JointChf::empty().with_primitive(gaussian(0.0, 1.0));
        for k in 0..20_000 {
            joint = joint.with_fold(smallvec![Fold::new(NodeId::new(k), c(1.0))], None);
        }
        let zeros = vec![c(0.0); joint.arity()];
        assert!((joint.evaluate(&zeros).unwrap() - c(1.0)).norm() < 1e-12);
    }
}
