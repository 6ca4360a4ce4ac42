//! Single-source shortest path algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bellman_ford;
pub mod dijkstra;

pub use self::bellman_ford::{bellman_ford, BellmanFord};
pub use self::dijkstra::{dijkstra, Dijkstra};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{Graph, VertexLabel, Weight};

/// Tentative or final distance; `Infinite` marks an unreachable vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distance {
    Finite(Weight),
    Infinite,
}

impl Distance {
    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    pub fn finite(self) -> Option<Weight> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Infinite => None,
        }
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Distance::Finite(a), Distance::Finite(b)) => a.cmp(b),
            (Distance::Finite(_), Distance::Infinite) => Ordering::Less,
            (Distance::Infinite, Distance::Finite(_)) => Ordering::Greater,
            (Distance::Infinite, Distance::Infinite) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Distance and materialized path to one vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry<V> {
    pub vertex: V,
    pub distance: Distance,
    /// Source-to-vertex path; empty when unreachable
    pub path: Vec<V>,
}

/// Work counters collected during a shortest-path run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub settled: usize,
    pub relaxations: usize,
    pub stale_entries: usize,
    pub passes: usize,
}

/// Result of a single-source run: one entry per vertex, in graph order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPaths<V> {
    source: V,
    entries: Vec<PathEntry<V>>,
    statistics: SearchStatistics,
}

impl<V: VertexLabel> ShortestPaths<V> {
    /// Builds the result from per-node distances and predecessor links
    pub(crate) fn materialize(
        graph: &Graph<V>,
        source: NodeId,
        distances: &[Distance],
        parents: &[Option<NodeId>],
        statistics: SearchStatistics,
    ) -> Self {
        let entries = graph
            .node_ids()
            .map(|node| {
                let distance = distances[node.0];
                let path = if distance.is_finite() {
                    graph.label_path(&trace_back(source, node, parents))
                } else {
                    Vec::new()
                };
                PathEntry {
                    vertex: graph.label(node).clone(),
                    distance,
                    path,
                }
            })
            .collect();

        Self {
            source: graph.label(source).clone(),
            entries,
            statistics,
        }
    }

    pub fn source(&self) -> &V {
        &self.source
    }

    pub fn get(&self, vertex: &V) -> Option<&PathEntry<V>> {
        self.entries.iter().find(|entry| &entry.vertex == vertex)
    }

    pub fn distance(&self, vertex: &V) -> Option<Distance> {
        self.get(vertex).map(|entry| entry.distance)
    }

    pub fn path(&self, vertex: &V) -> Option<&[V]> {
        self.get(vertex).map(|entry| entry.path.as_slice())
    }

    /// Distance and path to `target`, `None` when it is unreachable or unknown
    pub fn to_target(&self, target: &V) -> Option<(Weight, Vec<V>)> {
        let entry = self.get(target)?;
        entry.distance.finite().map(|d| (d, entry.path.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathEntry<V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

/// Follows predecessor links from `node` back to `source`
fn trace_back(source: NodeId, node: NodeId, parents: &[Option<NodeId>]) -> Vec<NodeId> {
    let mut path = vec![node];
    let mut current = node;
    // Bounded by the node count so a corrupt parent chain cannot spin forever
    while current != source && path.len() <= parents.len() {
        match parents[current.0] {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
