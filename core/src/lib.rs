//! CHRONOS-OR: classic operations-research algorithms for teaching
//!
//! Every algorithm is a pure function over caller-owned inputs that returns
//! an immutable, serializable result:
//!
//! - [`algorithm::path_finding`]: Dijkstra and Bellman-Ford shortest paths
//! - [`algorithm::graph`]: Edmonds-Karp maximum flow and minimum cut,
//!   Kruskal spanning forests, Welsh-Powell coloring
//! - [`algorithm::transportation`]: northwest-corner and least-cost plans,
//!   stepping-stone optimization
//! - [`algorithm::scheduling`]: critical path method
//!
//! Engines implement [`Algorithm`] for metadata and string-typed parameters.
//! The crate logs through the `log` facade and installs no logger.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::algorithm::traits::{Algorithm, AlgorithmError, NodeId};
pub use crate::data_structures::graph::{Graph, GraphKind, Weight};

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AlgorithmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{critical_path, dijkstra, max_flow, CapacityMatrix, Task};

    #[test]
    fn test_results_serialize() {
        let graph = Graph::from_edges(
            GraphKind::Undirected,
            ["A", "B", "C"],
            [("A", "B", 1), ("B", "C", 2), ("A", "C", 4)],
        )
        .unwrap();
        let paths = dijkstra(&graph, &"A").unwrap();
        let json = serde_json::to_value(&paths).unwrap();
        assert_eq!(json["source"], "A");
        assert_eq!(json["entries"][2]["distance"]["Finite"], 3);

        let capacity = CapacityMatrix::new(vec![vec![0, 3, 1], vec![0, 0, 2], vec![0, 0, 0]]).unwrap();
        let flow = max_flow(&capacity, 0, 2).unwrap();
        assert_eq!(serde_json::to_value(&flow).unwrap()["max_flow"], 3);

        let schedule = critical_path(&[Task::new(1, 3, &[]), Task::new(2, 2, &[1])]).unwrap();
        let text = serde_json::to_string(&schedule).unwrap();
        assert!(text.contains("\"project_duration\":5"));
        assert!(text.contains("{\"Task\":2}"));
    }

    #[test]
    fn test_errors_display() {
        let error: Result<()> = Err(AlgorithmError::UnbalancedProblem { supply: 4, demand: 6 });
        assert_eq!(
            error.unwrap_err().to_string(),
            "Unbalanced transportation problem: total supply 4 != total demand 6"
        );
    }
}
