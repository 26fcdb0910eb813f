//! Lexical topological ranking.
//!
//! Every node without incoming edges (an apex) starts a depth-first walk at
//! rank 0; each hop adds one, and a node keeps the highest rank any walk
//! gives it. Sorting by rank with a stable sort keeps the original order
//! among equally ranked nodes, which is what makes the result "lexical".

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::CycleError;
use crate::graph::{Edge, Graph, NodeId};

/// Ranks the nodes in `order` and stably sorts them by rank.
///
/// `order` is only reordered on success.
pub fn rank_and_sort(graph: &Graph, order: &mut [NodeId]) -> Result<(), CycleError> {
    if order.is_empty() {
        return Ok(());
    }

    let mut walk = RankWalk {
        graph,
        ranks: FxHashMap::default(),
        finished: FxHashSet::default(),
        path: FxHashSet::default(),
    };

    let mut apexes = 0usize;
    for &n in order.iter() {
        if graph.node(n).is_some_and(|node| node.in_degree() == 0) {
            apexes += 1;
            walk.visit(n, n, 0)?;
        }
    }
    if apexes == 0 {
        return Err(CycleError::NoApex);
    }
    if let Some(&lost) = order.iter().find(|n| !walk.ranks.contains_key(n)) {
        return Err(CycleError::Unreachable {
            node: walk.id(lost),
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(nodes = order.len(), apexes, "ranked nodes");

    order.sort_by_key(|n| walk.ranks.get(n).copied().unwrap_or_default());
    Ok(())
}

struct RankWalk<'g> {
    graph: &'g Graph,
    ranks: FxHashMap<NodeId, usize>,
    /// Nodes whose whole subtree has been walked without finding a cycle
    finished: FxHashSet<NodeId>,
    /// Nodes on the active depth-first path
    path: FxHashSet<NodeId>,
}

impl RankWalk<'_> {
    fn visit(&mut self, apex: NodeId, n: NodeId, rank: usize) -> Result<(), CycleError> {
        if self.path.contains(&n) {
            return Err(CycleError::Revisited {
                node: self.id(n),
                apex: self.id(apex),
            });
        }

        let best = self.ranks.entry(n).or_default();
        // A finished subtree walked at an equal or higher rank cannot raise
        // any rank below it.
        if *best >= rank && self.finished.contains(&n) {
            return Ok(());
        }
        *best = (*best).max(rank);

        let graph = self.graph;
        let Some(node) = graph.node(n) else {
            return Ok(());
        };
        self.path.insert(n);
        for e in node.edges_from() {
            if let Some(to) = graph.edge(e).and_then(Edge::to) {
                self.visit(apex, to, rank + 1)?;
            }
        }
        self.path.remove(&n);
        self.finished.insert(n);
        Ok(())
    }

    fn id(&self, n: NodeId) -> String {
        self.graph
            .node(n)
            .map(|node| node.id().to_string())
            .unwrap_or_default()
    }
}
