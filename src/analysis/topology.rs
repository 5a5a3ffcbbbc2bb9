use crate::error::ChfError;
use crate::store::{NodeId, Registry};

/// Performs a Topological Sort using Depth-First Search (DFS).
///
/// Returns a list of NodeIds where every parent appears before the nodes
/// derived from it. Roots are visited in index order and parents in the
/// order they were given at creation, so the result is deterministic.
///
/// The walk keeps its own stack: networks built from long operation chains
/// would overflow a recursive visit.
pub fn sort(registry: &Registry) -> Result<Vec<NodeId>, ChfError> {
    let count = registry.count();
    let mut order = Vec::with_capacity(count);
    let mut state = vec![VisitState::None; count];
    // (node, next parent to visit)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for i in 0..count {
        if state[i] != VisitState::None {
            continue;
        }
        state[i] = VisitState::Visiting;
        stack.push((NodeId::new(i), 0));

        while let Some((node, cursor)) = stack.pop() {
            let parents = registry.get_parents(node);
            if let Some(&parent) = parents.get(cursor) {
                stack.push((node, cursor + 1));
                match state[parent.index()] {
                    VisitState::Visited => {}
                    VisitState::Visiting => {
                        return Err(ChfError::CycleDetected(format!(
                            "node {} depends on node {} which is still being visited",
                            node.index(),
                            parent.index()
                        )));
                    }
                    VisitState::None => {
                        state[parent.index()] = VisitState::Visiting;
                        stack.push((parent, 0));
                    }
                }
            } else {
                // All parents emitted: post-order position.
                state[node.index()] = VisitState::Visited;
                order.push(node);
            }
        }
    }

    Ok(order)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}
