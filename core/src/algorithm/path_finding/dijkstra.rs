//! Dijkstra's algorithm for graphs with non-negative weights
//!
//! Binary min-heap keyed by tentative distance with lazy deletion: a popped
//! entry whose distance exceeds the recorded best is stale and skipped. Each
//! vertex is settled at most once.
//!
//! Among several shortest paths the one materialized is the first found in
//! relaxation order (neighbors are scanned in edge insertion order and only
//! strict improvements replace a predecessor). This is implementation-defined
//! but reproducible for a fixed input order.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};
use rayon::prelude::*;

use super::{Distance, SearchStatistics, ShortestPaths};
use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmError, NodeId};
use crate::data_structures::graph::{Graph, VertexLabel, Weight};

/// Priority queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DijkstraEntry {
    distance: Weight,
    node: NodeId,
}

impl Ord for DijkstraEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for DijkstraEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra shortest-path engine
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl Dijkstra {
    pub fn new() -> Self {
        Self
    }

    /// Distances and paths from `source` to every vertex
    ///
    /// Fails with `NegativeWeightRejected` before any work if an edge weight is negative.
    pub fn run<V: VertexLabel>(&self, graph: &Graph<V>, source: &V) -> Result<ShortestPaths<V>, AlgorithmError> {
        let start = graph.require_node(source)?;
        if let Some(edge) = graph.edges().iter().find(|edge| edge.weight < 0) {
            return Err(AlgorithmError::NegativeWeightRejected {
                from: format!("{:?}", graph.label(edge.source)),
                to: format!("{:?}", graph.label(edge.target)),
                weight: edge.weight,
            });
        }

        let n = graph.node_count();
        debug!("dijkstra: {} vertices, {} edges, source {:?}", n, graph.edge_count(), source);

        let mut distances = vec![Distance::Infinite; n];
        let mut parents: Vec<Option<NodeId>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut statistics = SearchStatistics::default();
        let mut heap = BinaryHeap::new();

        distances[start.0] = Distance::Finite(0);
        heap.push(DijkstraEntry { distance: 0, node: start });

        while let Some(DijkstraEntry { distance, node }) = heap.pop() {
            if settled[node.0] || Distance::Finite(distance) > distances[node.0] {
                statistics.stale_entries += 1;
                continue;
            }
            settled[node.0] = true;
            statistics.settled += 1;
            trace!("dijkstra: settled {} at distance {}", node, distance);

            for (next, weight) in graph.neighbors(node) {
                if settled[next.0] {
                    continue;
                }
                let candidate = distance.saturating_add(weight);
                if Distance::Finite(candidate) < distances[next.0] {
                    distances[next.0] = Distance::Finite(candidate);
                    parents[next.0] = Some(node);
                    statistics.relaxations += 1;
                    heap.push(DijkstraEntry { distance: candidate, node: next });
                }
            }
        }

        debug!(
            "dijkstra: settled {} of {} vertices with {} relaxations",
            statistics.settled, n, statistics.relaxations
        );
        Ok(ShortestPaths::materialize(graph, start, &distances, &parents, statistics))
    }

    /// Single-destination query; `Ok(None)` means `target` is unreachable
    pub fn shortest_path<V: VertexLabel>(
        &self,
        graph: &Graph<V>,
        source: &V,
        target: &V,
    ) -> Result<Option<(Weight, Vec<V>)>, AlgorithmError> {
        graph.require_node(target)?;
        Ok(self.run(graph, source)?.to_target(target))
    }

    /// Independent runs from several sources, executed in parallel
    ///
    /// Results come back in the order of `sources`; the first failure wins.
    pub fn run_many<V>(&self, graph: &Graph<V>, sources: &[V]) -> Result<Vec<ShortestPaths<V>>, AlgorithmError>
    where
        V: VertexLabel + Send + Sync,
    {
        sources
            .par_iter()
            .map(|source| self.run(graph, source))
            .collect()
    }
}

/// Runs [`Dijkstra`] from `source`
pub fn dijkstra<V: VertexLabel>(graph: &Graph<V>, source: &V) -> Result<ShortestPaths<V>, AlgorithmError> {
    Dijkstra::new().run(graph, source)
}

impl Algorithm for Dijkstra {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn category(&self) -> &'static str {
        "shortest_path"
    }

    fn description(&self) -> String {
        "Single-source shortest paths on graphs with non-negative edge weights, \
         settling vertices in order of distance with a binary heap."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::uniform("O((V + E) log V)", "O(V + E)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::GraphKind;
    use crate::testing::{brute_force_distance, init_logging, random_graph, seeded_rng};

    fn triangle() -> Graph<&'static str> {
        Graph::from_edges(
            GraphKind::Undirected,
            ["A", "B", "C"],
            [("A", "B", 1), ("B", "C", 2), ("A", "C", 4)],
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_example() {
        init_logging();
        let result = dijkstra(&triangle(), &"A").unwrap();

        assert_eq!(result.distance(&"C"), Some(Distance::Finite(3)));
        assert_eq!(result.path(&"C").unwrap(), &["A", "B", "C"]);
        assert_eq!(result.distance(&"A"), Some(Distance::Finite(0)));
        assert_eq!(result.path(&"A").unwrap(), &["A"]);
        assert_eq!(result.statistics().settled, 3);
    }

    #[test]
    fn test_unreachable_vertex() {
        let graph = Graph::from_edges(GraphKind::Directed, [1, 2, 3], [(1, 2, 5)]).unwrap();
        let result = dijkstra(&graph, &1).unwrap();

        assert_eq!(result.distance(&3), Some(Distance::Infinite));
        assert!(result.path(&3).unwrap().is_empty());
        assert_eq!(Dijkstra::new().shortest_path(&graph, &1, &3).unwrap(), None);
        assert_eq!(Dijkstra::new().shortest_path(&graph, &1, &2).unwrap(), Some((5, vec![1, 2])));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let graph = Graph::from_edges(GraphKind::Directed, ['a', 'b'], [('a', 'b', -1)]).unwrap();
        assert!(matches!(
            dijkstra(&graph, &'a'),
            Err(AlgorithmError::NegativeWeightRejected { weight: -1, .. })
        ));
    }

    #[test]
    fn test_unknown_source() {
        assert!(matches!(dijkstra(&triangle(), &"Z"), Err(AlgorithmError::UnknownVertex(_))));
    }

    #[test]
    fn test_tie_break_keeps_first_discovered_path() {
        let graph = Graph::from_edges(
            GraphKind::Directed,
            ["S", "A", "B", "T"],
            [("S", "A", 1), ("S", "B", 1), ("A", "T", 1), ("B", "T", 1)],
        )
        .unwrap();

        for _ in 0..5 {
            let result = dijkstra(&graph, &"S").unwrap();
            assert_eq!(result.path(&"T").unwrap(), &["S", "A", "T"]);
        }
    }

    #[test]
    fn test_matches_exhaustive_enumeration() {
        let mut rng = seeded_rng(7);
        for round in 0..40 {
            let kind = if round % 2 == 0 { GraphKind::Directed } else { GraphKind::Undirected };
            let graph = random_graph(&mut rng, kind, 6, 0.45, 0, 12);
            let result = dijkstra(&graph, &0).unwrap();

            for target in graph.node_ids() {
                let expected = brute_force_distance(&graph, NodeId(0), target);
                let entry = result.get(graph.label(target)).unwrap();
                assert_eq!(entry.distance.finite(), expected, "round {} target {}", round, target);

                // The materialized path must realize the reported distance
                if let Some(d) = expected {
                    let cost: Weight = entry
                        .path
                        .windows(2)
                        .map(|w| graph.edge_weight(NodeId(w[0]), NodeId(w[1])).unwrap())
                        .sum();
                    assert_eq!(cost, d);
                }
            }
        }
    }

    #[test]
    fn test_run_many_in_parallel() {
        let graph = triangle();
        let results = Dijkstra::new().run_many(&graph, &["A", "B", "C"]).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[1].source(), &"B");
        assert_eq!(results[2].distance(&"A"), Some(Distance::Finite(3)));

        let failure = Dijkstra::new().run_many(&graph, &["A", "nowhere"]);
        assert!(failure.is_err());
    }

    #[test]
    fn test_algorithm_metadata() {
        let mut engine = Dijkstra::new();
        assert_eq!(engine.name(), "Dijkstra");
        assert_eq!(engine.category(), "shortest_path");
        assert!(engine.parameters().is_empty());
        assert!(engine.set_parameter("heuristic", "manhattan").is_err());
    }
}
