//! Shared helpers for unit tests: logger setup, seeded random instances and
//! brute-force reference answers for small inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{Graph, GraphKind, Weight};

/// Installs `env_logger` once so `RUST_LOG=debug cargo test` shows algorithm traces
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random graph on `0..n`; each ordered (directed) or unordered pair gets an
/// edge with probability `p` and a weight drawn from `low..=high`
pub(crate) fn random_graph<R: Rng>(
    rng: &mut R,
    kind: GraphKind,
    n: usize,
    p: f64,
    low: Weight,
    high: Weight,
) -> Graph<usize> {
    let mut graph = Graph::with_vertex_count(kind, n);
    for u in 0..n {
        let start = if kind == GraphKind::Directed { 0 } else { u + 1 };
        for v in start..n {
            if u != v && rng.gen_bool(p) {
                let weight = rng.gen_range(low..=high);
                graph
                    .add_edge(&u, &v, weight)
                    .expect("generated edges are unique and in range");
            }
        }
    }
    graph
}

/// Minimum weight over every simple path from `source` to `target`, by exhaustive DFS
pub(crate) fn brute_force_distance(graph: &Graph<usize>, source: NodeId, target: NodeId) -> Option<Weight> {
    fn walk(
        graph: &Graph<usize>,
        node: NodeId,
        target: NodeId,
        cost: Weight,
        on_path: &mut Vec<bool>,
        best: &mut Option<Weight>,
    ) {
        if node == target {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        on_path[node.0] = true;
        for (next, weight) in graph.neighbors(node) {
            if !on_path[next.0] {
                walk(graph, next, target, cost + weight, on_path, best);
            }
        }
        on_path[node.0] = false;
    }

    let mut best = None;
    let mut on_path = vec![false; graph.node_count()];
    walk(graph, source, target, 0, &mut on_path, &mut best);
    best
}
