//! Minimum Spanning Tree Algorithm Implementation
//!
//! Kruskal's algorithm over a disjoint-set forest. Edges are visited in
//! ascending weight with ties kept in input order (stable sort), and an edge
//! is accepted exactly when its endpoints lie in different components.
//!
//! # Theoretical Foundation
//!
//! - **Cycle Property**: for any cycle, a maximum-weight edge on it belongs to
//!   no minimum spanning tree, so rejecting cycle-closing edges is safe
//! - **Cut Property**: the lightest edge crossing a cut is safe to accept
//!
//! A disconnected input produces a minimum spanning forest, one tree per
//! connected component, rather than an error.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmError};
use crate::data_structures::graph::{Graph, VertexLabel, Weight};
use crate::data_structures::union_find::UnionFind;

/// Accepted tree edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MstEdge<V> {
    pub source: V,
    pub target: V,
    pub weight: Weight,
}

/// Performance and behavior statistics for Kruskal runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MstStatistics {
    pub edges_examined: usize,
    pub union_operations: usize,
    /// Edges skipped because they would close a cycle
    pub rejected_edges: usize,
}

/// Minimum spanning forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningForest<V> {
    /// Accepted edges in acceptance order
    pub edges: Vec<MstEdge<V>>,
    pub total_weight: Weight,
    /// Number of trees in the forest
    pub components: usize,
    pub statistics: MstStatistics,
}

impl<V> SpanningForest<V> {
    /// Whether the forest is a single tree (the empty graph counts as spanned)
    pub fn is_spanning_tree(&self) -> bool {
        self.components <= 1
    }
}

/// Kruskal's minimum spanning tree algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Kruskal;

impl Kruskal {
    pub fn new() -> Self {
        Self
    }

    /// Minimum spanning forest over an explicit vertex and edge list
    ///
    /// Edges are treated as undirected. Parallel edges and self-loops are
    /// allowed; self-loops are always rejected.
    pub fn run<V: VertexLabel>(
        &self,
        vertices: &[V],
        edges: &[(V, V, Weight)],
    ) -> Result<SpanningForest<V>, AlgorithmError> {
        let mut index: HashMap<&V, usize> = HashMap::with_capacity(vertices.len());
        for (i, vertex) in vertices.iter().enumerate() {
            if index.insert(vertex, i).is_some() {
                return Err(AlgorithmError::DuplicateVertex(format!("{:?}", vertex)));
            }
        }

        let indexed = edges
            .iter()
            .map(|(u, v, w)| match (index.get(u), index.get(v)) {
                (Some(&a), Some(&b)) => Ok((a, b, *w)),
                _ => Err(AlgorithmError::InvalidEdge {
                    from: format!("{:?}", u),
                    to: format!("{:?}", v),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(spanning_forest(vertices, &indexed))
    }

    /// Minimum spanning forest of a graph, ignoring edge direction
    pub fn run_graph<V: VertexLabel>(&self, graph: &Graph<V>) -> SpanningForest<V> {
        let indexed: Vec<(usize, usize, Weight)> = graph
            .edges()
            .iter()
            .map(|edge| (edge.source.0, edge.target.0, edge.weight))
            .collect();
        spanning_forest(graph.labels(), &indexed)
    }
}

fn spanning_forest<V: VertexLabel>(labels: &[V], edges: &[(usize, usize, Weight)]) -> SpanningForest<V> {
    let n = labels.len();
    debug!("kruskal: {} vertices, {} edges", n, edges.len());

    // sort_by_key is stable, so equal weights keep input order
    let mut order: Vec<usize> = (0..edges.len()).collect();
    order.sort_by_key(|&i| edges[i].2);

    let mut forest = UnionFind::new(n);
    let mut accepted = Vec::with_capacity(n.saturating_sub(1));
    let mut statistics = MstStatistics::default();
    let mut total_weight: Weight = 0;

    for i in order {
        if accepted.len() + 1 >= n.max(1) {
            break;
        }
        let (u, v, weight) = edges[i];
        statistics.edges_examined += 1;

        if forest.union(u, v) {
            statistics.union_operations += 1;
            total_weight += weight;
            trace!("kruskal: accepted {:?} - {:?} ({})", labels[u], labels[v], weight);
            accepted.push(MstEdge {
                source: labels[u].clone(),
                target: labels[v].clone(),
                weight,
            });
        } else {
            statistics.rejected_edges += 1;
        }
    }

    debug!(
        "kruskal: {} edges accepted, total weight {}, {} components",
        accepted.len(),
        total_weight,
        forest.components()
    );
    SpanningForest {
        edges: accepted,
        total_weight,
        components: forest.components(),
        statistics,
    }
}

/// Runs [`Kruskal::run`]
pub fn kruskal<V: VertexLabel>(vertices: &[V], edges: &[(V, V, Weight)]) -> Result<SpanningForest<V>, AlgorithmError> {
    Kruskal::new().run(vertices, edges)
}

impl Algorithm for Kruskal {
    fn name(&self) -> &'static str {
        "Kruskal"
    }

    fn category(&self) -> &'static str {
        "minimum_spanning_tree"
    }

    fn description(&self) -> String {
        "Minimum spanning forest by accepting edges in ascending weight order \
         whenever they join two different components."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::uniform("O(E log E)", "O(V + E)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::traits::NodeId;
    use crate::data_structures::graph::GraphKind;
    use crate::testing::{init_logging, random_graph, seeded_rng};

    /// Lightest acyclic edge subset of size `n - 1` connecting all vertices
    fn brute_force_mst_weight(n: usize, edges: &[(usize, usize, Weight)]) -> Option<Weight> {
        let mut best: Option<Weight> = None;
        for mask in 0u32..(1 << edges.len()) {
            if mask.count_ones() as usize != n - 1 {
                continue;
            }
            let mut sets = UnionFind::new(n);
            let mut weight = 0;
            let mut acyclic = true;
            for (i, &(u, v, w)) in edges.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    acyclic &= sets.union(u, v);
                    weight += w;
                }
            }
            if acyclic && sets.components() == 1 {
                best = Some(best.map_or(weight, |b| b.min(weight)));
            }
        }
        best
    }

    #[test]
    fn test_simple_tree() {
        init_logging();
        let forest = kruskal(
            &["a", "b", "c", "d"],
            &[("a", "b", 1), ("b", "c", 4), ("a", "c", 3), ("c", "d", 2), ("b", "d", 5)],
        )
        .unwrap();

        assert_eq!(forest.total_weight, 6);
        assert!(forest.is_spanning_tree());
        let picked: Vec<(&str, &str)> = forest.edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(picked, vec![("a", "b"), ("c", "d"), ("a", "c")]);
        // Stops once three edges are accepted
        assert_eq!(forest.statistics.edges_examined, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let forest = kruskal(&[0, 1, 2], &[(0, 1, 1), (1, 2, 1), (0, 2, 1)]).unwrap();
        assert_eq!(forest.edges[0].target, 1);
        assert_eq!(forest.edges[1], MstEdge { source: 1, target: 2, weight: 1 });
    }

    #[test]
    fn test_disconnected_graph_yields_forest() {
        let forest = kruskal(&[1, 2, 3, 4, 5], &[(1, 2, 7), (3, 4, 2), (4, 3, 1), (5, 5, 0)]).unwrap();

        assert_eq!(forest.components, 3);
        assert!(!forest.is_spanning_tree());
        assert_eq!(forest.total_weight, 8);
        assert_eq!(forest.statistics.rejected_edges, 2);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(kruskal(&['x', 'x'], &[]), Err(AlgorithmError::DuplicateVertex(_))));
        assert!(matches!(
            kruskal(&['x', 'y'], &[('x', 'z', 1)]),
            Err(AlgorithmError::InvalidEdge { .. })
        ));

        let empty: SpanningForest<u8> = kruskal(&[], &[]).unwrap();
        assert!(empty.edges.is_empty());
        assert!(empty.is_spanning_tree());
    }

    #[test]
    fn test_minimal_against_brute_force() {
        let mut rng = seeded_rng(31);
        for _ in 0..25 {
            let n = 5;
            let mut graph = random_graph(&mut rng, GraphKind::Undirected, n, 0.5, -3, 9);
            for u in 0..n - 1 {
                if graph.edge_weight(NodeId(u), NodeId(u + 1)).is_none() {
                    graph.add_edge(&u, &(u + 1), 10).unwrap();
                }
            }
            let forest = Kruskal::new().run_graph(&graph);
            let edges: Vec<(usize, usize, Weight)> = graph
                .edges()
                .iter()
                .map(|e| (e.source.0, e.target.0, e.weight))
                .collect();

            assert!(forest.is_spanning_tree());
            assert_eq!(forest.edges.len(), n - 1);
            assert_eq!(Some(forest.total_weight), brute_force_mst_weight(n, &edges));

            let mut check = UnionFind::new(n);
            for edge in &forest.edges {
                assert!(check.union(edge.source, edge.target));
            }
        }
    }

    #[test]
    fn test_random_forests_span_each_component() {
        let mut rng = seeded_rng(5);
        for _ in 0..25 {
            let graph = random_graph(&mut rng, GraphKind::Undirected, 8, 0.15, 0, 20);
            let forest = Kruskal::new().run_graph(&graph);

            let mut components = UnionFind::new(graph.node_count());
            for edge in graph.edges() {
                components.union(edge.source.0, edge.target.0);
            }
            assert_eq!(forest.components, components.components());
            assert_eq!(forest.edges.len(), graph.node_count() - forest.components);
        }
    }
}
