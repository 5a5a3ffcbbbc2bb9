//! network.rs
//! The container that owns node identity, the dependency DAG and the joint CHF.
//!
//! Registration and joint replacement happen together inside `commit`, behind
//! `&mut self`. Outside callers can therefore never observe a network whose
//! node count and joint arity disagree.

use crate::analysis::topology;
use crate::chf::{BaseChf, JointChf};
use crate::compose::Operand;
use crate::config::EstimatorConfig;
use crate::error::ChfError;
use crate::store::{Crv, NetworkId, NodeId, NodeMetadata, Registry};
use num_complex::Complex64;

/// A set of possibly dependent random variables sharing one joint CHF.
///
/// `Network::default()` is the usual entry point for a single experiment;
/// independent experiments use independent networks.
#[derive(Debug)]
pub struct Network {
    id: NetworkId,
    pub(crate) registry: Registry,
    pub(crate) joint: JointChf,
    version: u64,
    config: EstimatorConfig,
}

impl Default for Network {
    fn default() -> Self { Self::new() }
}

/// A clone is a separate network with its own id. Handles never cross between
/// the copies; use `members()` on the clone to address its nodes.
impl Clone for Network {
    fn clone(&self) -> Self {
        Self {
            id: NetworkId::fresh(),
            registry: self.registry.clone(),
            joint: self.joint.clone(),
            version: self.version,
            config: self.config,
        }
    }
}

/// An operand after it has been checked against a network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolved {
    Scalar(Complex64),
    Variable(NodeId),
}

impl Network {
    pub fn new() -> Self {
        Self {
            id: NetworkId::fresh(),
            registry: Registry::new(),
            joint: JointChf::empty(),
            version: 0,
            config: EstimatorConfig::default(),
        }
    }

    pub fn with_config(config: EstimatorConfig) -> Result<Self, ChfError> {
        config.validate()?;
        Ok(Self { config, ..Self::new() })
    }

    pub fn id(&self) -> NetworkId { self.id }
    pub fn config(&self) -> &EstimatorConfig { &self.config }
    pub fn node_count(&self) -> usize { self.registry.count() }

    /// Incremented on every joint replacement.
    pub fn version(&self) -> u64 { self.version }

    pub fn members(&self) -> Vec<Crv> {
        (0..self.registry.count()).map(|i| self.handle(NodeId::new(i))).collect()
    }

    /// Side-effect-free snapshot of the current joint. Cloning shares the layers.
    pub fn current_joint_chf(&self) -> JointChf { self.joint.clone() }

    pub fn metadata(&self, rv: Crv) -> Result<&NodeMetadata, ChfError> {
        let id = self.check_member(rv)?;
        Ok(&self.registry.meta[id.index()])
    }

    pub fn name(&self, rv: Crv) -> Result<&str, ChfError> {
        Ok(&self.metadata(rv)?.name)
    }

    pub fn parents(&self, rv: Crv) -> Result<Vec<Crv>, ChfError> {
        let id = self.check_member(rv)?;
        Ok(self.registry.get_parents(id).iter().map(|&p| self.handle(p)).collect())
    }

    pub fn children(&self, rv: Crv) -> Result<Vec<Crv>, ChfError> {
        let id = self.check_member(rv)?;
        Ok(self.registry.get_children(id).into_iter().map(|c| self.handle(c)).collect())
    }

    /// Members ordered so that every parent precedes its children.
    pub fn topological_order(&self) -> Result<Vec<Crv>, ChfError> {
        let order = topology::sort(&self.registry)?;
        Ok(order.into_iter().map(|id| self.handle(id)).collect())
    }

    /// Marginal CHF of `rv`, sliced from the joint as it stands now.
    pub fn marginal_chf(&self, rv: Crv) -> Result<MarginalChf, ChfError> {
        let id = self.check_member(rv)?;
        Ok(MarginalChf { joint: self.current_joint_chf(), index: id.index() })
    }

    /// Registers an independent variable with characteristic function `base`.
    pub fn register_primitive(&mut self, base: BaseChf) -> Crv {
        let meta = NodeMetadata::continuous(base.name());
        let joint = self.joint.with_primitive(base);
        self.commit(meta, &[], joint)
    }

    // --- Internal ---

    pub(crate) fn handle(&self, id: NodeId) -> Crv {
        Crv { network: self.id, id }
    }

    pub(crate) fn check_member(&self, rv: Crv) -> Result<NodeId, ChfError> {
        if rv.network != self.id {
            return Err(ChfError::NetworkMismatch { expected: self.id, found: rv.network });
        }
        if rv.id.index() >= self.registry.count() {
            return Err(ChfError::UnknownNode { index: rv.id.index(), count: self.registry.count() });
        }
        Ok(rv.id)
    }

    pub(crate) fn resolve(&self, operand: Operand) -> Result<Resolved, ChfError> {
        match operand {
            Operand::Scalar(a) => Ok(Resolved::Scalar(a)),
            Operand::Variable(rv) => self.check_member(rv).map(Resolved::Variable),
        }
    }

    pub(crate) fn operand_name(&self, operand: Resolved) -> String {
        match operand {
            Resolved::Scalar(a) => format_scalar(a),
            Resolved::Variable(id) => self.registry.meta[id.index()].name.clone(),
        }
    }

    /// Registers a node and installs the joint that accounts for it, as one step.
    ///
    /// `joint` must have been built from the current joint, so its arity is
    /// exactly one more than the node count before the call.
    pub(crate) fn commit(&mut self, meta: NodeMetadata, parents: &[NodeId], joint: JointChf) -> Crv {
        debug_assert_eq!(joint.arity(), self.registry.count() + 1);

        let mut unique: Vec<NodeId> = Vec::with_capacity(parents.len());
        for &p in parents {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }

        let id = self.registry.add_node(&unique, meta);
        self.joint = joint;
        self.version += 1;

        tracing::debug!(
            network = self.id.0,
            index = id.index(),
            name = %self.registry.meta[id.index()].name,
            parents = ?unique,
            depth = self.joint.arity(),
            "registered random variable"
        );
        self.handle(id)
    }
}

/// The CHF of one member, obtained by zeroing every other coordinate of the joint.
#[derive(Debug, Clone)]
pub struct MarginalChf {
    joint: JointChf,
    index: usize,
}

impl MarginalChf {
    pub fn at(&self, t: Complex64) -> Result<Complex64, ChfError> {
        let mut args = vec![Complex64::new(0.0, 0.0); self.joint.arity()];
        args[self.index] = t;
        self.joint.evaluate(&args)
    }

    pub fn at_real(&self, t: f64) -> Result<Complex64, ChfError> {
        self.at(Complex64::new(t, 0.0))
    }
}

pub(crate) fn format_scalar(a: Complex64) -> String {
    if a.im == 0.0 {
        format!("{}", a.re)
    } else {
        format!("({})", a)
    }
}
