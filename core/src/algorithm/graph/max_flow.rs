//! Maximum Flow / Minimum Cut Implementation
//!
//! This module implements the Edmonds-Karp specialization of Ford-Fulkerson:
//! augmenting paths are found by breadth-first search over the residual
//! network, so each augmentation uses a shortest path in edge count and the
//! number of augmentations is bounded by O(V * E).
//!
//! The network is a square capacity matrix over vertices `0..n`. The algorithm
//! works on a private flow matrix holding skew-symmetric net flow
//! (`flow[u][v] == -flow[v][u]`) and never touches the capacities. The
//! minimum cut is read off the terminal residual network.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmError};
use crate::data_structures::graph::{Graph, GraphKind, VertexLabel};

/// Flow capacity type
pub type Capacity = i64;

/// Net flow value type
pub type Flow = i64;

/// Square matrix of non-negative edge capacities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityMatrix {
    cells: Vec<Vec<Capacity>>,
}

impl CapacityMatrix {
    /// Wraps `rows` after checking it is square with non-negative entries
    pub fn new(rows: Vec<Vec<Capacity>>) -> Result<Self, AlgorithmError> {
        let n = rows.len();
        for (u, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AlgorithmError::InvalidNetwork(format!(
                    "capacity matrix must be square: row {} has {} entries, expected {}",
                    u,
                    row.len(),
                    n
                )));
            }
            if let Some(v) = row.iter().position(|&c| c < 0) {
                return Err(AlgorithmError::InvalidNetwork(format!(
                    "negative capacity {} on edge {} -> {}",
                    row[v], u, v
                )));
            }
        }
        Ok(Self { cells: rows })
    }

    /// An `n` by `n` network without edges
    pub fn zeros(n: usize) -> Self {
        Self {
            cells: vec![vec![0; n]; n],
        }
    }

    /// Builds a network from graph weights; undirected edges carry capacity both ways
    pub fn from_graph<V: VertexLabel>(graph: &Graph<V>) -> Result<Self, AlgorithmError> {
        let mut matrix = Self::zeros(graph.node_count());
        for edge in graph.edges() {
            let (u, v) = (edge.source.0, edge.target.0);
            matrix.set(u, v, edge.weight)?;
            if graph.kind() == GraphKind::Undirected {
                matrix.set(v, u, edge.weight)?;
            }
        }
        Ok(matrix)
    }

    pub fn set(&mut self, u: usize, v: usize, capacity: Capacity) -> Result<(), AlgorithmError> {
        let n = self.len();
        if u >= n || v >= n {
            return Err(AlgorithmError::InvalidNetwork(format!(
                "edge {} -> {} outside a network of {} vertices",
                u, v, n
            )));
        }
        if capacity < 0 {
            return Err(AlgorithmError::InvalidNetwork(format!(
                "negative capacity {} on edge {} -> {}",
                capacity, u, v
            )));
        }
        self.cells[u][v] = capacity;
        Ok(())
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Capacity {
        self.cells[u][v]
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Capacity>] {
        &self.cells
    }
}

/// Net flow on every ordered vertex pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMatrix {
    cells: Vec<Vec<Flow>>,
}

impl FlowMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            cells: vec![vec![0; n]; n],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Flow>>) -> Self {
        Self { cells: rows }
    }

    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Flow {
        self.cells[u][v]
    }

    /// Net flow leaving `u`
    pub fn net_outflow(&self, u: usize) -> Flow {
        self.cells[u].iter().sum()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Flow>] {
        &self.cells
    }

    fn push(&mut self, u: usize, v: usize, amount: Flow) {
        self.cells[u][v] += amount;
        self.cells[v][u] -= amount;
    }
}

/// One augmentation: the source-to-sink path and the flow pushed along it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentingPath {
    /// Path vertices
    pub path: Vec<usize>,
    /// Bottleneck residual capacity along the path
    pub flow: Flow,
}

/// Maximum flow result with detailed flow information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Maximum flow value
    pub max_flow: Flow,
    /// Terminal net flow
    pub flow: FlowMatrix,
    /// Augmenting paths in the order they were applied
    pub augmenting_paths: Vec<AugmentingPath>,
}

/// Source side of a minimum cut and the edges leaving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// Vertices reachable from the source in the residual network, ascending
    pub source_side: Vec<usize>,
    /// Original edges from the source side to the sink side
    pub cut_edges: Vec<(usize, usize)>,
    /// Summed capacity of `cut_edges`
    pub capacity: Capacity,
}

impl MinCut {
    pub fn contains(&self, vertex: usize) -> bool {
        self.source_side.binary_search(&vertex).is_ok()
    }
}

/// Edmonds-Karp maximum flow solver
#[derive(Debug, Clone, Copy, Default)]
pub struct EdmondsKarp;

impl EdmondsKarp {
    pub fn new() -> Self {
        Self
    }

    /// Maximum flow from `source` to `sink`
    ///
    /// Precondition: integer capacities whose total leaving the source fits in
    /// an `i64`; otherwise `UnboundedFlow` is reported.
    pub fn max_flow(
        &self,
        capacity: &CapacityMatrix,
        source: usize,
        sink: usize,
    ) -> Result<MaxFlowResult, AlgorithmError> {
        let n = capacity.len();
        validate_terminal(n, source, "source")?;
        validate_terminal(n, sink, "sink")?;
        if source == sink {
            return Err(AlgorithmError::InvalidNetwork(
                "source and sink must be distinct".to_string(),
            ));
        }
        capacity.rows()[source]
            .iter()
            .try_fold(0 as Capacity, |total, &c| total.checked_add(c))
            .ok_or(AlgorithmError::UnboundedFlow)?;

        debug!("edmonds-karp: {} vertices, source {}, sink {}", n, source, sink);

        let mut flow = FlowMatrix::zeros(n);
        let mut augmenting_paths = Vec::new();
        let mut max_flow: Flow = 0;

        while let Some((bottleneck, parents)) = augmenting_path(capacity, &flow, source, sink) {
            let mut path = vec![sink];
            let mut v = sink;
            while v != source {
                // Every vertex on the BFS path except the source has a parent
                let u = match parents[v] {
                    Some(u) => u,
                    None => break,
                };
                flow.push(u, v, bottleneck);
                path.push(u);
                v = u;
            }
            path.reverse();

            max_flow += bottleneck;
            trace!("edmonds-karp: augmented {} along {:?}", bottleneck, path);
            augmenting_paths.push(AugmentingPath { path, flow: bottleneck });
        }

        debug!(
            "edmonds-karp: max flow {} after {} augmentations",
            max_flow,
            augmenting_paths.len()
        );
        Ok(MaxFlowResult {
            max_flow,
            flow,
            augmenting_paths,
        })
    }

    /// Minimum cut read from a terminal flow
    ///
    /// `flow` must be the matrix returned by [`EdmondsKarp::max_flow`] for the
    /// same network; any other flow gives a meaningless cut.
    pub fn min_cut(
        &self,
        capacity: &CapacityMatrix,
        flow: &FlowMatrix,
        source: usize,
    ) -> Result<MinCut, AlgorithmError> {
        let n = capacity.len();
        validate_terminal(n, source, "source")?;
        if flow.len() != n {
            return Err(AlgorithmError::InvalidNetwork(format!(
                "flow matrix has {} vertices, capacity matrix has {}",
                flow.len(),
                n
            )));
        }

        let mut reachable = vec![false; n];
        let mut queue = VecDeque::from([source]);
        reachable[source] = true;
        while let Some(u) = queue.pop_front() {
            for v in 0..n {
                if !reachable[v] && residual(capacity, flow, u, v) > 0 {
                    reachable[v] = true;
                    queue.push_back(v);
                }
            }
        }

        let source_side: Vec<usize> = (0..n).filter(|&v| reachable[v]).collect();
        let cut_edges: Vec<(usize, usize)> = source_side
            .iter()
            .flat_map(|&u| (0..n).map(move |v| (u, v)))
            .filter(|&(u, v)| !reachable[v] && capacity.get(u, v) > 0)
            .collect();
        let cut_capacity = cut_edges.iter().map(|&(u, v)| capacity.get(u, v)).sum();

        Ok(MinCut {
            source_side,
            cut_edges,
            capacity: cut_capacity,
        })
    }
}

fn validate_terminal(n: usize, vertex: usize, role: &str) -> Result<(), AlgorithmError> {
    if vertex < n {
        Ok(())
    } else {
        Err(AlgorithmError::InvalidNetwork(format!(
            "{} {} outside a network of {} vertices",
            role, vertex, n
        )))
    }
}

/// Residual capacity of `u -> v`
///
/// With flow running `v -> u` this is `c[u][v] + c[v][u]`, which may exceed
/// `i64`; it saturates, and any augmentation stays bounded by the source row.
#[inline]
fn residual(capacity: &CapacityMatrix, flow: &FlowMatrix, u: usize, v: usize) -> Flow {
    capacity.get(u, v).saturating_sub(flow.get(u, v))
}

/// Breadth-first search for a source-to-sink path of positive residual capacity,
/// scanning candidate vertices in index order
fn augmenting_path(
    capacity: &CapacityMatrix,
    flow: &FlowMatrix,
    source: usize,
    sink: usize,
) -> Option<(Flow, Vec<Option<usize>>)> {
    let n = capacity.len();
    let mut parents: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::from([(source, Flow::MAX)]);
    visited[source] = true;

    while let Some((u, bottleneck)) = queue.pop_front() {
        for v in 0..n {
            if visited[v] {
                continue;
            }
            let remaining = residual(capacity, flow, u, v);
            if remaining > 0 {
                visited[v] = true;
                parents[v] = Some(u);
                let narrowed = bottleneck.min(remaining);
                if v == sink {
                    return Some((narrowed, parents));
                }
                queue.push_back((v, narrowed));
            }
        }
    }
    None
}

/// Runs [`EdmondsKarp::max_flow`]
pub fn max_flow(capacity: &CapacityMatrix, source: usize, sink: usize) -> Result<MaxFlowResult, AlgorithmError> {
    EdmondsKarp::new().max_flow(capacity, source, sink)
}

/// Runs [`EdmondsKarp::min_cut`]
pub fn min_cut(capacity: &CapacityMatrix, flow: &FlowMatrix, source: usize) -> Result<MinCut, AlgorithmError> {
    EdmondsKarp::new().min_cut(capacity, flow, source)
}

impl Algorithm for EdmondsKarp {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        "Maximum flow by repeated breadth-first augmentation over the residual network, \
         with minimum cut extraction from the terminal residual graph."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        // Matrix BFS costs O(V^2) per augmentation
        AlgorithmComplexity::uniform("O(V^3 * E)", "O(V^2)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{init_logging, seeded_rng};
    use rand::Rng;

    fn network(n: usize, edges: &[(usize, usize, Capacity)]) -> CapacityMatrix {
        let mut matrix = CapacityMatrix::zeros(n);
        for &(u, v, c) in edges {
            matrix.set(u, v, c).unwrap();
        }
        matrix
    }

    #[test]
    fn test_three_vertex_example() {
        init_logging();
        // S=0, A=1, T=2
        let capacity = network(3, &[(0, 1, 3), (1, 2, 2), (0, 2, 1)]);
        let result = max_flow(&capacity, 0, 2).unwrap();

        assert_eq!(result.max_flow, 3);
        assert_eq!(result.flow.get(0, 2), 1);
        assert_eq!(result.flow.get(1, 2), 2);
        assert_eq!(result.augmenting_paths[0], AugmentingPath { path: vec![0, 2], flow: 1 });

        let cut = min_cut(&capacity, &result.flow, 0).unwrap();
        assert_eq!(cut.source_side, vec![0, 1]);
        assert_eq!(cut.cut_edges, vec![(0, 2), (1, 2)]);
        assert_eq!(cut.capacity, 3);
        assert!(cut.contains(1));
        assert!(!cut.contains(2));
    }

    #[test]
    fn test_textbook_network() {
        let capacity = network(
            6,
            &[
                (0, 1, 16),
                (0, 2, 13),
                (2, 1, 4),
                (1, 3, 12),
                (3, 2, 9),
                (2, 4, 14),
                (4, 3, 7),
                (3, 5, 20),
                (4, 5, 4),
            ],
        );
        let result = max_flow(&capacity, 0, 5).unwrap();
        assert_eq!(result.max_flow, 23);

        let cut = min_cut(&capacity, &result.flow, 0).unwrap();
        assert_eq!(cut.capacity, 23);
        assert_eq!(cut.source_side, vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_flow_respects_capacity_and_conservation() {
        let mut rng = seeded_rng(11);
        for _ in 0..30 {
            let n = rng.gen_range(2..8);
            let mut capacity = CapacityMatrix::zeros(n);
            for u in 0..n {
                for v in 0..n {
                    if u != v && rng.gen_bool(0.4) {
                        capacity.set(u, v, rng.gen_range(1..=10)).unwrap();
                    }
                }
            }
            let result = max_flow(&capacity, 0, n - 1).unwrap();

            for u in 0..n {
                for v in 0..n {
                    assert_eq!(result.flow.get(u, v), -result.flow.get(v, u));
                    assert!(result.flow.get(u, v) <= capacity.get(u, v));
                }
                if u != 0 && u != n - 1 {
                    assert_eq!(result.flow.net_outflow(u), 0);
                }
            }
            assert_eq!(result.flow.net_outflow(0), result.max_flow);
            let pushed: Flow = result.augmenting_paths.iter().map(|p| p.flow).sum();
            assert_eq!(pushed, result.max_flow);

            // Max-flow / min-cut duality
            let cut = min_cut(&capacity, &result.flow, 0).unwrap();
            assert_eq!(cut.capacity, result.max_flow);
            assert!(cut.contains(0));
            assert!(!cut.contains(n - 1));
        }
    }

    #[test]
    fn test_disconnected_sink_has_zero_flow() {
        let capacity = network(4, &[(0, 1, 5), (2, 3, 5)]);
        let result = max_flow(&capacity, 0, 3).unwrap();

        assert_eq!(result.max_flow, 0);
        assert!(result.augmenting_paths.is_empty());
        let cut = min_cut(&capacity, &result.flow, 0).unwrap();
        assert_eq!(cut.source_side, vec![0, 1]);
        assert_eq!(cut.capacity, 0);
    }

    #[test]
    fn test_invalid_networks() {
        assert!(matches!(
            CapacityMatrix::new(vec![vec![0, 1], vec![0]]),
            Err(AlgorithmError::InvalidNetwork(_))
        ));
        assert!(matches!(
            CapacityMatrix::new(vec![vec![0, -1], vec![0, 0]]),
            Err(AlgorithmError::InvalidNetwork(_))
        ));

        let capacity = CapacityMatrix::new(vec![vec![0, 1], vec![0, 0]]).unwrap();
        assert!(matches!(max_flow(&capacity, 0, 0), Err(AlgorithmError::InvalidNetwork(_))));
        assert!(matches!(max_flow(&capacity, 0, 2), Err(AlgorithmError::InvalidNetwork(_))));
        assert!(matches!(
            min_cut(&capacity, &FlowMatrix::zeros(3), 0),
            Err(AlgorithmError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn test_overflowing_capacity_reported_unbounded() {
        let capacity = network(3, &[(0, 1, Capacity::MAX), (0, 2, 1)]);
        assert_eq!(max_flow(&capacity, 0, 2).unwrap_err(), AlgorithmError::UnboundedFlow);
    }

    #[test]
    fn test_antiparallel_maximal_capacities() {
        let capacity = network(
            4,
            &[(0, 1, 5), (0, 2, 1), (1, 2, Capacity::MAX), (2, 1, Capacity::MAX), (2, 3, 5)],
        );
        let result = max_flow(&capacity, 0, 3).unwrap();
        assert_eq!(result.max_flow, 5);
        assert_eq!(result.flow.net_outflow(0), 5);
        assert_eq!(result.flow.get(2, 3), 5);

        let cut = min_cut(&capacity, &result.flow, 0).unwrap();
        assert_eq!(cut.source_side, vec![0, 1, 2]);
        assert_eq!(cut.cut_edges, vec![(2, 3)]);
        assert_eq!(cut.capacity, 5);
    }

    #[test]
    fn test_min_cut_from_supplied_flow() {
        let capacity = network(3, &[(0, 1, 3), (1, 2, 2), (0, 2, 1)]);
        let flow = FlowMatrix::from_rows(vec![vec![0, 2, 1], vec![-2, 0, 2], vec![-1, -2, 0]]);
        assert_eq!(flow.net_outflow(0), 3);

        let cut = min_cut(&capacity, &flow, 0).unwrap();
        assert_eq!(cut.source_side, vec![0, 1]);
        assert_eq!(cut.capacity, 3);

        // A zero flow leaves every positive edge in the residual graph
        let idle = min_cut(&capacity, &FlowMatrix::from_rows(vec![vec![0; 3]; 3]), 0).unwrap();
        assert_eq!(idle.source_side, vec![0, 1, 2]);
        assert!(idle.cut_edges.is_empty());
    }

    #[test]
    fn test_from_graph() {
        let graph = Graph::from_edges(
            GraphKind::Undirected,
            ["s", "m", "t"],
            [("s", "m", 4), ("m", "t", 3)],
        )
        .unwrap();
        let capacity = CapacityMatrix::from_graph(&graph).unwrap();

        assert_eq!(capacity.get(1, 0), 4);
        assert_eq!(max_flow(&capacity, 0, 2).unwrap().max_flow, 3);

        let negative = Graph::from_edges(GraphKind::Directed, [0, 1], [(0, 1, -2)]).unwrap();
        assert!(CapacityMatrix::from_graph(&negative).is_err());
    }

    #[test]
    fn test_solver_metadata() {
        let solver = EdmondsKarp::new();
        assert_eq!(solver.name(), "Edmonds-Karp");
        assert_eq!(solver.category(), "max_flow");
        assert_eq!(solver.id().as_str(), "Edmonds-Karp");
    }
}
