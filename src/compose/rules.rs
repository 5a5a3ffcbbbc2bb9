//! rules.rs
//! Arithmetic rewrite rules. Each rule registers one new node `Z` and wraps the
//! joint CHF with the coordinate fold that expresses `Z` through its operands.
//!
//! | Rule      | Folds                          | Offset |
//! |-----------|--------------------------------|--------|
//! | `X + a`   | `t_X += t_Z`                   | `a`    |
//! | `X + Y`   | `t_X += t_Z`, `t_Y += t_Z`     |        |
//! | `X - a`   | `t_X += t_Z`                   | `-a`   |
//! | `a - X`   | `t_X -= t_Z`                   | `a`    |
//! | `X - Y`   | `t_X += t_Z`, `t_Y -= t_Z`     |        |
//! | `-X`      | `t_X -= t_Z`                   |        |
//! | `a * X`   | `t_X += a·t_Z`                 |        |
//! | `X / a`   | `t_X += t_Z / a`               |        |
//!
//! Products and quotients of two random variables are not linear in the joint
//! CHF arguments and are rejected.

use super::operand::Operand;
use crate::chf::{Fold, Folds};
use crate::error::ChfError;
use crate::network::{format_scalar, Network, Resolved};
use crate::store::{Crv, NodeId, NodeMetadata, Operation};
use num_complex::Complex64;
use smallvec::{smallvec, SmallVec};

const ONE: Complex64 = Complex64::new(1.0, 0.0);
const MINUS_ONE: Complex64 = Complex64::new(-1.0, 0.0);

impl Network {
    pub fn add(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Crv, ChfError> {
        self.apply(Operation::Add, lhs.into(), rhs.into())
    }

    pub fn sub(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Crv, ChfError> {
        self.apply(Operation::Subtract, lhs.into(), rhs.into())
    }

    /// Scalar multiplication. Fails with `Unsupported` for two random variables.
    pub fn mul(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Crv, ChfError> {
        self.apply(Operation::Multiply, lhs.into(), rhs.into())
    }

    /// Division by a non-zero scalar. Any random divisor is `Unsupported`.
    pub fn div(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Crv, ChfError> {
        self.apply(Operation::Divide, lhs.into(), rhs.into())
    }

    pub fn neg(&mut self, x: Crv) -> Result<Crv, ChfError> {
        let id = self.check_member(x)?;
        let name = format!("-{}", self.grouped_name(Resolved::Variable(id), Operation::Subtract, true));
        Ok(self.derive(name, Operation::Subtract, &[id], smallvec![Fold::new(id, MINUS_ONE)], None))
    }

    /// Resolves both operands, then builds the new node. Every check runs
    /// before the network is touched.
    pub fn apply(&mut self, op: Operation, lhs: Operand, rhs: Operand) -> Result<Crv, ChfError> {
        use Operation::*;
        use Resolved::{Scalar, Variable};

        let l = self.resolve(lhs)?;
        let r = self.resolve(rhs)?;
        for operand in [l, r] {
            if let Scalar(a) = operand {
                if !a.is_finite() {
                    return Err(ChfError::NonFiniteScalar { op: op.symbol(), value: format_scalar(a) });
                }
            }
        }

        let (parents, folds, offset): (SmallVec<[NodeId; 2]>, Folds, Option<Complex64>) = match (op, l, r) {
            (_, Scalar(_), Scalar(_)) => {
                return Err(ChfError::NoRandomOperand { op: op.symbol() });
            }
            (Add, Variable(x), Variable(y)) => {
                (smallvec![x, y], smallvec![Fold::new(x, ONE), Fold::new(y, ONE)], None)
            }
            (Add, Variable(x), Scalar(a)) | (Add, Scalar(a), Variable(x)) => {
                (smallvec![x], smallvec![Fold::new(x, ONE)], Some(a))
            }
            (Subtract, Variable(x), Variable(y)) => {
                (smallvec![x, y], smallvec![Fold::new(x, ONE), Fold::new(y, MINUS_ONE)], None)
            }
            (Subtract, Variable(x), Scalar(a)) => (smallvec![x], smallvec![Fold::new(x, ONE)], Some(-a)),
            (Subtract, Scalar(a), Variable(x)) => (smallvec![x], smallvec![Fold::new(x, MINUS_ONE)], Some(a)),
            (Multiply, Variable(x), Scalar(a)) | (Multiply, Scalar(a), Variable(x)) => {
                (smallvec![x], smallvec![Fold::new(x, a)], None)
            }
            (Divide, Variable(x), Scalar(a)) => {
                if a.norm() == 0.0 {
                    return Err(ChfError::DivisionByZero { node_name: self.operand_name(l) });
                }
                let inv = a.inv();
                if !inv.is_finite() {
                    return Err(ChfError::NonFiniteScalar { op: op.symbol(), value: format_scalar(inv) });
                }
                (smallvec![x], smallvec![Fold::new(x, inv)], None)
            }
            (Multiply | Divide, _, _) => {
                return Err(ChfError::Unsupported {
                    op: op.symbol(),
                    lhs: self.operand_name(l),
                    rhs: self.operand_name(r),
                });
            }
        };

        let name = format!("{}{}{}", self.grouped_name(l, op, false), op.symbol(), self.grouped_name(r, op, true));
        Ok(self.derive(name, op, &parents, folds, offset))
    }

    /// Operand name, parenthesized when it is a sum or difference that would
    /// otherwise bind to the wrong side of `op`.
    fn grouped_name(&self, operand: Resolved, op: Operation, rhs: bool) -> String {
        let name = self.operand_name(operand);
        let loose = match operand {
            Resolved::Variable(id) => matches!(
                self.registry.meta[id.index()].operation,
                Some(Operation::Add | Operation::Subtract)
            ),
            Resolved::Scalar(_) => false,
        };
        let needs_group = match op {
            Operation::Add => false,
            Operation::Subtract => rhs,
            Operation::Multiply | Operation::Divide => true,
        };
        if loose && needs_group { format!("({})", name) } else { name }
    }

    fn derive(
        &mut self,
        name: String,
        op: Operation,
        parents: &[NodeId],
        folds: Folds,
        offset: Option<Complex64>,
    ) -> Crv {
        let joint = self.joint.with_fold(folds, offset);
        self.commit(NodeMetadata::derived(name, op), parents, joint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chf::{BaseChf, Layer};
    use rstest::rstest;

    fn point_mass(net: &mut Network, at: f64) -> Crv {
        net.register_primitive(BaseChf::new(format!("{}", at), move |t: Complex64| {
            (Complex64::i() * t * at).exp()
        }))
    }

    /// The marginal of a point mass at `v` is `e^{i·t·v}`.
    fn assert_point_mass(net: &Network, rv: Crv, v: f64) {
        let marginal = net.marginal_chf(rv).unwrap();
        for &t in &[-1.3, -0.2, 0.0, 0.4, 2.5] {
            let got = marginal.at_real(t).unwrap();
            let expected = (Complex64::i() * t * v).exp();
            assert!((got - expected).norm() < 1e-12, "t={} got={} expected={}", t, got, expected);
        }
    }

    #[rstest]
    #[case(Operation::Add, 3.0, 5.0, 8.0)]
    #[case(Operation::Subtract, 3.0, 5.0, -2.0)]
    #[case(Operation::Subtract, 5.0, 3.0, 2.0)]
    fn test_variable_pairs_combine_values(#[case] op: Operation, #[case] x: f64, #[case] y: f64, #[case] z: f64) {
        let mut net = Network::new();
        let xv = point_mass(&mut net, x);
        let yv = point_mass(&mut net, y);
        let zv = net.apply(op, xv.into(), yv.into()).unwrap();
        assert_point_mass(&net, zv, z);
        assert_eq!(net.parents(zv).unwrap(), vec![xv, yv]);
    }

    #[rstest]
    #[case(Operation::Add, 2.0, 4.0, 6.0)]
    #[case(Operation::Subtract, 2.0, 4.0, -2.0)]
    #[case(Operation::Multiply, 2.0, -3.0, -6.0)]
    #[case(Operation::Divide, 2.0, 4.0, 0.5)]
    fn test_variable_with_scalar(#[case] op: Operation, #[case] x: f64, #[case] a: f64, #[case] z: f64) {
        let mut net = Network::new();
        let xv = point_mass(&mut net, x);
        let zv = net.apply(op, xv.into(), a.into()).unwrap();
        assert_point_mass(&net, zv, z);
        assert_eq!(net.parents(zv).unwrap(), vec![xv]);
    }

    #[rstest]
    #[case(Operation::Add, 4.0, 2.0, 6.0)]
    #[case(Operation::Subtract, 4.0, 2.0, 2.0)]
    #[case(Operation::Multiply, -3.0, 2.0, -6.0)]
    fn test_scalar_with_variable(#[case] op: Operation, #[case] a: f64, #[case] x: f64, #[case] z: f64) {
        let mut net = Network::new();
        let xv = point_mass(&mut net, x);
        let zv = net.apply(op, a.into(), xv.into()).unwrap();
        assert_point_mass(&net, zv, z);
        assert_eq!(net.node_count(), 2);
    }

    #[test]
    fn test_negation_folds_with_minus_one() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.5);
        let z = net.neg(x).unwrap();
        assert_point_mass(&net, z, -1.5);
        assert_eq!(net.name(z).unwrap(), "-1.5");
        match net.current_joint_chf().top() {
            Layer::Folded { folds, .. } => {
                assert_eq!(folds.as_slice(), &[Fold::new(x.id(), MINUS_ONE)]);
            }
            other => panic!("expected a folded layer, got {:?}", other),
        }
    }

    #[test]
    fn test_constant_shift_uses_shifted_layer() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 0.0);
        net.add(x, 4.0).unwrap();
        assert!(matches!(net.current_joint_chf().top(), Layer::Shifted { .. }));
    }

    #[test]
    fn test_self_sum_records_single_edge() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.25);
        let z = net.add(x, x).unwrap();
        assert_point_mass(&net, z, 2.5);
        assert_eq!(net.parents(z).unwrap(), vec![x]);
        assert_eq!(net.children(x).unwrap(), vec![z]);
    }

    #[test]
    fn test_dependent_difference_of_itself_is_zero() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 7.0);
        let y = net.add(x, 1.0).unwrap();
        let z = net.sub(y, x).unwrap();
        assert_point_mass(&net, z, 1.0);
    }

    #[test]
    fn test_names_follow_operands() {
        let mut net = Network::new();
        let a = point_mass(&mut net, 1.0);
        let b = net.mul(2.0, a).unwrap();
        let c = net.add(4, b).unwrap();
        let d = net.div(c, 2.0).unwrap();
        assert_eq!(net.name(b).unwrap(), "2*1");
        assert_eq!(net.name(c).unwrap(), "4+2*1");
        assert_eq!(net.name(d).unwrap(), "(4+2*1)/2");
    }

    #[test]
    fn test_names_group_sums_under_tighter_operators() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.0);
        let y = point_mass(&mut net, 2.0);
        let sum = net.add(x, y).unwrap();
        let diff = net.sub(x, y).unwrap();

        let cases = [
            (net.add(sum, diff).unwrap(), "1+2+1-2"),
            (net.sub(diff, sum).unwrap(), "1-2-(1+2)"),
            (net.mul(3.0, sum).unwrap(), "3*(1+2)"),
            (net.div(diff, 4.0).unwrap(), "(1-2)/4"),
            (net.neg(sum).unwrap(), "-(1+2)"),
        ];
        for (rv, expected) in cases {
            assert_eq!(net.name(rv).unwrap(), expected);
        }

        let negated = net.neg(x).unwrap();
        let scaled = net.mul(negated, 2.0).unwrap();
        assert_eq!(net.name(scaled).unwrap(), "(-1)*2");
        assert_eq!(net.metadata(sum).unwrap().operation, Some(Operation::Add));
        assert_eq!(net.metadata(x).unwrap().operation, None);
    }

    #[rstest]
    #[case(Operation::Add, f64::NAN)]
    #[case(Operation::Subtract, f64::NEG_INFINITY)]
    #[case(Operation::Multiply, f64::INFINITY)]
    #[case(Operation::Divide, f64::NAN)]
    #[case(Operation::Divide, 1e-310)]
    fn test_non_finite_scalars_are_rejected(#[case] op: Operation, #[case] a: f64) {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.0);
        let version = net.version();

        let err = net.apply(op, x.into(), a.into()).unwrap_err();
        assert!(matches!(err, ChfError::NonFiniteScalar { .. }), "got {:?}", err);
        assert_eq!(net.version(), version);
        assert_eq!(net.node_count(), 1);
        let value = net.current_joint_chf().evaluate(&[Complex64::new(0.0, 0.0)]).unwrap();
        assert_eq!(value, ONE);
    }

    #[rstest]
    #[case(Operation::Multiply, true)]
    #[case(Operation::Divide, true)]
    #[case(Operation::Divide, false)]
    fn test_nonlinear_operations_are_rejected(#[case] op: Operation, #[case] random_lhs: bool) {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.0);
        let y = point_mass(&mut net, 2.0);
        let lhs: Operand = if random_lhs { x.into() } else { 3.0.into() };
        let version = net.version();

        let err = net.apply(op, lhs, y.into()).unwrap_err();
        assert!(matches!(err, ChfError::Unsupported { .. }), "got {:?}", err);
        assert_eq!(net.version(), version);
        assert_eq!(net.node_count(), 2);
    }

    #[test]
    fn test_cross_network_operands_are_rejected() {
        let mut left = Network::new();
        let mut right = Network::new();
        let x = point_mass(&mut left, 1.0);
        let y = point_mass(&mut right, 2.0);

        let err = left.add(x, y).unwrap_err();
        assert_eq!(err, ChfError::NetworkMismatch { expected: left.id(), found: right.id() });
        assert_eq!(left.node_count(), 1);
        assert_eq!(right.node_count(), 1);
    }

    #[test]
    fn test_division_by_zero_and_scalar_pairs() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.0);
        assert!(matches!(net.div(x, 0.0), Err(ChfError::DivisionByZero { .. })));
        assert_eq!(net.add(1.0, 2.0).unwrap_err(), ChfError::NoRandomOperand { op: "+" });
        assert_eq!(net.node_count(), 1);
    }

    #[test]
    fn test_complex_scale_keeps_normalization() {
        let mut net = Network::new();
        let x = point_mass(&mut net, 1.0);
        net.mul(Complex64::new(0.5, 2.0), x).unwrap();
        let zeros = vec![Complex64::new(0.0, 0.0); net.node_count()];
        let value = net.current_joint_chf().evaluate(&zeros).unwrap();
        assert!((value - ONE).norm() < 1e-12);
    }
}
