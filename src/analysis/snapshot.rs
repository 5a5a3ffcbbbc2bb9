//! Read-only views of a network's DAG for layout and rendering tools.
//! The joint CHF is never part of a snapshot.
use crate::error::ChfError;
use crate::network::Network;
use crate::store::{NetworkId, NodeId, Operation, VariableKind};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub index: usize,
    pub name: String,
    pub kind: VariableKind,
    pub operation: Option<Operation>,
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub network: NetworkId,
    pub version: u64,
    pub nodes: Vec<NodeSnapshot>,
    /// Node indices, parents first.
    pub topological_order: Vec<usize>,
}

impl NetworkSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Network {
    pub fn snapshot(&self) -> Result<NetworkSnapshot, ChfError> {
        let registry = &self.registry;
        let nodes = (0..registry.count())
            .map(|i| {
                let id = NodeId::new(i);
                let meta = &registry.meta[i];
                NodeSnapshot {
                    index: i,
                    name: meta.name.clone(),
                    kind: meta.kind,
                    operation: meta.operation,
                    parents: registry.get_parents(id).iter().map(NodeId::index).collect(),
                    children: registry.get_children(id).iter().map(NodeId::index).collect(),
                }
            })
            .collect();

        let topological_order = self.topological_order()?.iter().map(|rv| rv.index()).collect();

        Ok(NetworkSnapshot { network: self.id(), version: self.version(), nodes, topological_order })
    }

    /// The DAG as a petgraph graph. Node weights are display names and
    /// `NodeIndex::new(i)` corresponds to member `i`.
    pub fn dag_graph(&self) -> DiGraph<String, ()> {
        let registry = &self.registry;
        let mut graph = DiGraph::with_capacity(registry.count(), registry.edge_count());
        for meta in &registry.meta {
            graph.add_node(meta.name.clone());
        }
        for i in 0..registry.count() {
            for &parent in registry.get_parents(NodeId::new(i)) {
                graph.add_edge(NodeIndex::new(parent.index()), NodeIndex::new(i), ());
            }
        }
        graph
    }
}
