//! Bellman-Ford algorithm for single-source shortest paths.
//!
//! Handles negative edge weights and detects negative cycles reachable from
//! the source. Edges are relaxed in insertion order; an undirected edge is
//! relaxed `u -> v` then `v -> u`, so any negative undirected edge is itself a
//! negative cycle.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{Distance, SearchStatistics, ShortestPaths};
use crate::algorithm::traits::{
    validated_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter, NodeId,
};
use crate::data_structures::graph::{Graph, VertexLabel, Weight};

/// Bellman-Ford shortest-path engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BellmanFord {
    /// Stop relaxing once a full pass changes nothing
    early_termination: bool,
}

impl Default for BellmanFord {
    fn default() -> Self {
        Self { early_termination: true }
    }
}

impl BellmanFord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_early_termination(mut self, enabled: bool) -> Self {
        self.early_termination = enabled;
        self
    }

    /// Distances and paths from `source`, or `NegativeCycleDetected`
    pub fn run<V: VertexLabel>(&self, graph: &Graph<V>, source: &V) -> Result<ShortestPaths<V>, AlgorithmError> {
        let start = graph.require_node(source)?;
        let n = graph.node_count();
        debug!("bellman-ford: {} vertices, {} edges, source {:?}", n, graph.edge_count(), source);

        let mut distances = vec![Distance::Infinite; n];
        let mut parents: Vec<Option<NodeId>> = vec![None; n];
        let mut statistics = SearchStatistics::default();
        distances[start.0] = Distance::Finite(0);

        // Relax edges V-1 times
        for pass in 0..n.saturating_sub(1) {
            let mut updated = false;
            for (u, v, weight) in graph.arcs() {
                if let Some(candidate) = relaxed(distances[u.0], weight) {
                    if Distance::Finite(candidate) < distances[v.0] {
                        distances[v.0] = Distance::Finite(candidate);
                        parents[v.0] = Some(u);
                        statistics.relaxations += 1;
                        updated = true;
                    }
                }
            }
            statistics.passes += 1;
            trace!("bellman-ford: pass {} updated={}", pass + 1, updated);

            // Early termination if no updates
            if !updated && self.early_termination {
                break;
            }
        }

        // One more pass: any further improvement means a reachable negative cycle
        for (u, v, weight) in graph.arcs() {
            if let Some(candidate) = relaxed(distances[u.0], weight) {
                if Distance::Finite(candidate) < distances[v.0] {
                    debug!("bellman-ford: negative cycle through {:?}", graph.label(v));
                    return Err(AlgorithmError::NegativeCycleDetected);
                }
            }
        }

        statistics.settled = distances.iter().filter(|d| d.is_finite()).count();
        debug!(
            "bellman-ford: {} reachable vertices after {} passes",
            statistics.settled, statistics.passes
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
}

#[inline]
fn relaxed(from: Distance, weight: Weight) -> Option<Weight> {
    from.finite().map(|d| d.saturating_add(weight))
}

/// Runs [`BellmanFord`] with default settings from `source`
pub fn bellman_ford<V: VertexLabel>(graph: &Graph<V>, source: &V) -> Result<ShortestPaths<V>, AlgorithmError> {
    BellmanFord::new().run(graph, source)
}

impl Algorithm for BellmanFord {
    fn name(&self) -> &'static str {
        "Bellman-Ford"
    }

    fn category(&self) -> &'static str {
        "shortest_path"
    }

    fn description(&self) -> String {
        "Single-source shortest paths with arbitrary edge weights. Relaxes every edge up to V-1 times \
         and reports a negative cycle reachable from the source instead of distances."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V * E)".to_string(),
            space_complexity: "O(V)".to_string(),
            best_case: "O(E)".to_string(),
            average_case: "O(V * E)".to_string(),
            worst_case: "O(V * E)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::boolean("early_termination", self.early_termination)]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        validated_parameter(&*self, name, value)?;
        // Only one parameter is declared
        self.early_termination = value == "true";
        Ok(())
    }
}
