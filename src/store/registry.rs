use super::types::*;

/// Columnar node storage for a network.
///
/// Parents are stored CSR-style (`parents_flat` sliced by `parents_ranges`).
/// Children are kept as per-node singly linked lists threaded through
/// `child_targets`/`next_child`, so appending an edge never moves data.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub meta: Vec<NodeMetadata>,

    // Topology (CSR + Adjacency)
    pub parents_flat: Vec<NodeId>,
    pub parents_ranges: Vec<(u32, u32)>, // (start, count)

    // Downstream traversal helpers
    pub first_child: Vec<u32>,
    pub child_targets: Vec<NodeId>,
    pub next_child: Vec<u32>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.meta.len() }

    /// Appends a node and its parent→child edges. Parents must already exist.
    pub fn add_node(&mut self, parents: &[NodeId], meta: NodeMetadata) -> NodeId {
        let id = NodeId::new(self.meta.len());

        // 1. Register Parents
        let start = self.parents_flat.len() as u32;
        let count = parents.len() as u32;
        self.parents_flat.extend_from_slice(parents);
        self.parents_ranges.push((start, count));

        // 2. Register Children
        for &parent in parents {
            let p_idx = parent.index();
            let head = self.first_child[p_idx];
            let new_edge = self.child_targets.len() as u32;
            self.child_targets.push(id);
            self.next_child.push(head);
            self.first_child[p_idx] = new_edge;
        }

        // 3. Metadata
        self.meta.push(meta);
        self.first_child.push(u32::MAX);

        id
    }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.parents_ranges[id.index()];
        &self.parents_flat[start as usize..(start + count) as usize]
    }

    /// Children of `id` in edge-creation order.
    pub fn get_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut edge_idx = self.first_child[id.index()];
        while edge_idx != u32::MAX {
            children.push(self.child_targets[edge_idx as usize]);
            edge_idx = self.next_child[edge_idx as usize];
        }
        // The list is threaded newest-first.
        children.reverse();
        children
    }

    pub fn edge_count(&self) -> usize { self.child_targets.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> NodeMetadata { NodeMetadata::continuous(name) }

    #[test]
    fn test_indices_are_dense_and_ordered() {
        let mut reg = Registry::new();
        for k in 0..5 {
            let id = reg.add_node(&[], meta("X"));
            assert_eq!(id.index(), k);
            assert_eq!(reg.count(), k + 1);
        }
    }

    #[test]
    fn test_children_follow_creation_order() {
        let mut reg = Registry::new();
        let a = reg.add_node(&[], meta("A"));
        let b = reg.add_node(&[a], meta("B"));
        let c = reg.add_node(&[b, a], meta("C"));

        assert_eq!(reg.get_children(a), vec![b, c]);
        assert_eq!(reg.get_children(b), vec![c]);
        assert!(reg.get_children(c).is_empty());
        assert_eq!(reg.get_parents(c), &[b, a]);
        assert_eq!(reg.edge_count(), 3);
    }
}
