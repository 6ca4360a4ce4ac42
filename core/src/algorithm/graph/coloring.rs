//! Welsh-Powell greedy vertex coloring
//!
//! Vertices are processed by descending degree, ties in insertion order, and
//! each takes the smallest color not already held by an adjacent vertex. The
//! color count is an upper bound on the chromatic number (at most max degree
//! plus one), not the exact value.
//!
//! Adjacency ignores direction. Self-loops are ignored since no proper coloring
//! could satisfy them.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, NodeId};
use crate::data_structures::graph::{Graph, VertexLabel};

/// Vertex coloring with colors numbered from zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring<V> {
    /// Every vertex with its color, in graph order
    pub colors: Vec<(V, usize)>,
    /// Number of distinct colors used
    pub color_count: usize,
    /// Order in which vertices were colored
    pub order: Vec<V>,
}

impl<V: VertexLabel> Coloring<V> {
    pub fn color_of(&self, vertex: &V) -> Option<usize> {
        self.colors
            .iter()
            .find(|(v, _)| v == vertex)
            .map(|&(_, color)| color)
    }

    /// Vertices grouped by color class
    pub fn classes(&self) -> Vec<Vec<V>> {
        let mut classes = vec![Vec::new(); self.color_count];
        for (vertex, color) in &self.colors {
            classes[*color].push(vertex.clone());
        }
        classes
    }
}

/// Welsh-Powell coloring engine
#[derive(Debug, Clone, Copy, Default)]
pub struct WelshPowell;

impl WelshPowell {
    pub fn new() -> Self {
        Self
    }

    pub fn run<V: VertexLabel>(&self, graph: &Graph<V>) -> Coloring<V> {
        let n = graph.node_count();
        debug!("welsh-powell: {} vertices, {} edges", n, graph.edge_count());

        // Stable sort keeps insertion order among equal degrees
        let mut order: Vec<NodeId> = graph.node_ids().collect();
        order.sort_by_key(|&node| std::cmp::Reverse(graph.degree(node)));

        let mut assigned: Vec<Option<usize>> = vec![None; n];
        let mut color_count = 0;
        // Scratch marks for colors taken by neighbours of the current vertex
        let mut taken = vec![false; n + 1];

        for &node in &order {
            for neighbour in graph.incident(node) {
                if let Some(color) = assigned[neighbour.0] {
                    taken[color] = true;
                }
            }
            let color = (0..=color_count).find(|&c| !taken[c]).unwrap_or(color_count);
            for neighbour in graph.incident(node) {
                if let Some(c) = assigned[neighbour.0] {
                    taken[c] = false;
                }
            }

            assigned[node.0] = Some(color);
            color_count = color_count.max(color + 1);
            trace!("welsh-powell: {:?} -> color {}", graph.label(node), color);
        }

        let colors = graph
            .node_ids()
            .map(|node| (graph.label(node).clone(), assigned[node.0].unwrap_or(0)))
            .collect();

        debug!("welsh-powell: {} colors", color_count);
        Coloring {
            colors,
            color_count,
            order: graph.label_path(&order),
        }
    }
}

/// Runs [`WelshPowell`]
pub fn welsh_powell<V: VertexLabel>(graph: &Graph<V>) -> Coloring<V> {
    WelshPowell::new().run(graph)
}

impl Algorithm for WelshPowell {
    fn name(&self) -> &'static str {
        "Welsh-Powell"
    }

    fn category(&self) -> &'static str {
        "graph_coloring"
    }

    fn description(&self) -> String {
        "Greedy vertex coloring in descending degree order; an upper bound on the chromatic number."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::uniform("O(V log V + E)", "O(V)")
    }
}
