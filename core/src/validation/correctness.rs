//! Correctness Verification for Algorithm Results
//!
//! Certificate checkers that confirm a result satisfies the defining
//! properties of its problem, independently of how it was computed:
//!
//! - shortest paths: no edge can still be relaxed, paths realize distances
//! - flows: capacity, skew symmetry and conservation hold, and a cut of equal
//!   capacity proves maximality
//! - spanning forests: acyclic, one tree per component
//! - colorings: adjacent vertices differ
//! - transportation plans: row and column sums match exactly
//! - schedules: precedence respected, slack consistent
//!
//! Each checker reports the first violation it finds.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::graph::coloring::Coloring;
use crate::algorithm::graph::max_flow::{CapacityMatrix, MaxFlowResult, MinCut};
use crate::algorithm::graph::mst::SpanningForest;
use crate::algorithm::path_finding::{Distance, ShortestPaths};
use crate::algorithm::scheduling::critical_path::{Schedule, ScheduleNode, Task};
use crate::algorithm::traits::NodeId;
use crate::algorithm::transportation::problem::{Allocation, TransportationProblem};
use crate::data_structures::graph::{Graph, VertexLabel, Weight};
use crate::data_structures::union_find::UnionFind;

/// Verification domain categories for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationDomain {
    ShortestPath,
    MaxFlow,
    SpanningTree,
    Coloring,
    Transportation,
    Scheduling,
}

/// Verification error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("{domain:?} invariant violation: {detail}")]
    InvariantViolation { domain: VerificationDomain, detail: String },

    #[error("{domain:?} result does not match its input: {detail}")]
    ShapeMismatch { domain: VerificationDomain, detail: String },
}

fn violation(domain: VerificationDomain, detail: String) -> VerificationError {
    debug!("verification: {:?} failed: {}", domain, detail);
    VerificationError::InvariantViolation { domain, detail }
}

fn mismatch(domain: VerificationDomain, detail: String) -> VerificationError {
    VerificationError::ShapeMismatch { domain, detail }
}

/// Checks Bellman's optimality conditions and that every path realizes its distance
pub fn verify_shortest_paths<V: VertexLabel>(
    graph: &Graph<V>,
    result: &ShortestPaths<V>,
) -> Result<(), VerificationError> {
    let domain = VerificationDomain::ShortestPath;
    if result.len() != graph.node_count() {
        return Err(mismatch(
            domain,
            format!("{} entries for {} vertices", result.len(), graph.node_count()),
        ));
    }
    let distance_of = |node: NodeId| result.distance(graph.label(node)).unwrap_or(Distance::Infinite);

    if distance_of(graph.require_node(result.source()).map_err(|e| mismatch(domain, e.to_string()))?)
        != Distance::Finite(0)
    {
        return Err(violation(domain, "source distance is not zero".to_string()));
    }

    for (u, v, weight) in graph.arcs() {
        if let Distance::Finite(du) = distance_of(u) {
            if Distance::Finite(du.saturating_add(weight)) < distance_of(v) {
                return Err(violation(
                    domain,
                    format!("edge {:?} -> {:?} can still be relaxed", graph.label(u), graph.label(v)),
                ));
            }
        }
    }

    for entry in result.iter() {
        let Distance::Finite(expected) = entry.distance else {
            if !entry.path.is_empty() {
                return Err(violation(domain, format!("unreachable {:?} has a path", entry.vertex)));
            }
            continue;
        };
        let nodes: Option<Vec<NodeId>> = entry.path.iter().map(|label| graph.node_id(label)).collect();
        let nodes = nodes.ok_or_else(|| mismatch(domain, format!("path to {:?} leaves the graph", entry.vertex)))?;
        let cost: Option<Weight> = nodes
            .windows(2)
            .map(|pair| graph.edge_weight(pair[0], pair[1]))
            .sum();
        if nodes.first().map(|&n| graph.label(n)) != Some(result.source())
            || nodes.last().map(|&n| graph.label(n)) != Some(&entry.vertex)
            || cost != Some(expected)
        {
            return Err(violation(
                domain,
                format!("path to {:?} does not realize distance {}", entry.vertex, expected),
            ));
        }
    }
    Ok(())
}

/// Checks the flow is feasible and carries `max_flow` units from source to sink
pub fn verify_flow(
    capacity: &CapacityMatrix,
    result: &MaxFlowResult,
    source: usize,
    sink: usize,
) -> Result<(), VerificationError> {
    let domain = VerificationDomain::MaxFlow;
    let n = capacity.len();
    if result.flow.len() != n || source >= n || sink >= n {
        return Err(mismatch(domain, format!("flow does not fit a network of {} vertices", n)));
    }
    let flow = &result.flow;

    for u in 0..n {
        for v in 0..n {
            if flow.get(u, v) != -flow.get(v, u) {
                return Err(violation(domain, format!("flow on {} -> {} is not skew symmetric", u, v)));
            }
            if flow.get(u, v) > capacity.get(u, v) {
                return Err(violation(domain, format!("flow on {} -> {} exceeds capacity", u, v)));
            }
        }
        if u != source && u != sink && flow.net_outflow(u) != 0 {
            return Err(violation(domain, format!("flow is not conserved at {}", u)));
        }
    }
    if flow.net_outflow(source) != result.max_flow {
        return Err(violation(
            domain,
            format!(
                "source emits {} units, result claims {}",
                flow.net_outflow(source),
                result.max_flow
            ),
        ));
    }
    Ok(())
}

/// Checks the cut separates the terminals and that its capacity equals the flow value
pub fn verify_min_cut(
    capacity: &CapacityMatrix,
    cut: &MinCut,
    flow_value: i64,
    source: usize,
    sink: usize,
) -> Result<(), VerificationError> {
    let domain = VerificationDomain::MaxFlow;
    if !cut.contains(source) || cut.contains(sink) {
        return Err(violation(domain, "cut does not separate source from sink".to_string()));
    }
    let crossing: i64 = cut
        .source_side
        .iter()
        .flat_map(|&u| (0..capacity.len()).map(move |v| (u, v)))
        .filter(|&(_, v)| !cut.contains(v))
        .map(|(u, v)| capacity.get(u, v))
        .sum();
    if crossing != cut.capacity || crossing != flow_value {
        return Err(violation(
            domain,
            format!(
                "cut capacity {} (claimed {}) differs from flow value {}",
                crossing, cut.capacity, flow_value
            ),
        ));
    }
    Ok(())
}

/// Checks the forest is acyclic, uses graph edges and has one tree per component
pub fn verify_spanning_forest<V: VertexLabel>(
    graph: &Graph<V>,
    forest: &SpanningForest<V>,
) -> Result<(), VerificationError> {
    let domain = VerificationDomain::SpanningTree;
    let mut trees = UnionFind::new(graph.node_count());
    let mut total: Weight = 0;

    for edge in &forest.edges {
        let (u, v) = match (graph.node_id(&edge.source), graph.node_id(&edge.target)) {
            (Some(u), Some(v)) => (u, v),
            _ => return Err(mismatch(domain, format!("edge {:?} - {:?} leaves the graph", edge.source, edge.target))),
        };
        let present = graph.edges().iter().any(|e| {
            e.weight == edge.weight && ((e.source, e.target) == (u, v) || (e.source, e.target) == (v, u))
        });
        if !present {
            return Err(mismatch(
                domain,
                format!("edge {:?} - {:?} is not a graph edge", edge.source, edge.target),
            ));
        }
        if !trees.union(u.0, v.0) {
            return Err(violation(
                domain,
                format!("edge {:?} - {:?} closes a cycle", edge.source, edge.target),
            ));
        }
        total += edge.weight;
    }

    let mut components = UnionFind::new(graph.node_count());
    for edge in graph.edges() {
        components.union(edge.source.0, edge.target.0);
    }
    if trees.components() != components.components() || forest.components != components.components() {
        return Err(violation(
            domain,
            format!(
                "forest has {} trees, graph has {} components",
                trees.components(),
                components.components()
            ),
        ));
    }
    if total != forest.total_weight {
        return Err(violation(
            domain,
            format!("edge weights sum to {}, result claims {}", total, forest.total_weight),
        ));
    }
    Ok(())
}

/// Checks every vertex is colored within range and no edge joins equal colors
pub fn verify_coloring<V: VertexLabel>(graph: &Graph<V>, coloring: &Coloring<V>) -> Result<(), VerificationError> {
    let domain = VerificationDomain::Coloring;
    let mut colors = Vec::with_capacity(graph.node_count());
    for node in graph.node_ids() {
        match coloring.color_of(graph.label(node)) {
            Some(color) if color < coloring.color_count => colors.push(color),
            Some(color) => {
                return Err(violation(
                    domain,
                    format!("color {} outside 0..{}", color, coloring.color_count),
                ))
            }
            None => return Err(mismatch(domain, format!("{:?} is uncolored", graph.label(node)))),
        }
    }

    for edge in graph.edges() {
        if edge.source != edge.target && colors[edge.source.0] == colors[edge.target.0] {
            return Err(violation(
                domain,
                format!(
                    "adjacent {:?} and {:?} share color {}",
                    graph.label(edge.source),
                    graph.label(edge.target),
                    colors[edge.source.0]
                ),
            ));
        }
    }
    Ok(())
}

/// Checks shape, non-negativity, exact row and column sums and the reported cost
pub fn verify_allocation(problem: &TransportationProblem, allocation: &Allocation) -> Result<(), VerificationError> {
    let domain = VerificationDomain::Transportation;
    if allocation.cells.len() != problem.rows() || allocation.cells.iter().any(|row| row.len() != problem.cols()) {
        return Err(mismatch(
            domain,
            format!("allocation is not {}x{}", problem.rows(), problem.cols()),
        ));
    }
    if allocation.cells.iter().flatten().any(|&q| q < 0) {
        return Err(violation(domain, "negative shipment".to_string()));
    }
    if let Some(i) = (0..problem.rows()).find(|&i| allocation.row_sum(i) != problem.supply()[i]) {
        return Err(violation(
            domain,
            format!("row {} ships {} of {}", i, allocation.row_sum(i), problem.supply()[i]),
        ));
    }
    if let Some(j) = (0..problem.cols()).find(|&j| allocation.column_sum(j) != problem.demand()[j]) {
        return Err(violation(
            domain,
            format!("column {} receives {} of {}", j, allocation.column_sum(j), problem.demand()[j]),
        ));
    }
    if problem.cost_of(&allocation.cells) != allocation.total_cost {
        return Err(violation(domain, "reported total cost is wrong".to_string()));
    }
    Ok(())
}

/// Checks precedence, date ordering and slack bookkeeping of a schedule
pub fn verify_schedule(tasks: &[Task], schedule: &Schedule) -> Result<(), VerificationError> {
    let domain = VerificationDomain::Scheduling;
    if schedule.entries.len() != tasks.len() + 2 {
        return Err(mismatch(
            domain,
            format!("{} entries for {} tasks", schedule.entries.len(), tasks.len()),
        ));
    }

    for entry in &schedule.entries {
        if entry.earliest_start > entry.latest_start || entry.latest_start - entry.earliest_start != entry.slack {
            return Err(violation(domain, format!("inconsistent dates for {:?}", entry.node)));
        }
        if entry.latest_finish() > schedule.project_duration {
            return Err(violation(domain, format!("{:?} finishes after the project", entry.node)));
        }
    }

    for task in tasks {
        let entry = schedule
            .task(task.id)
            .ok_or_else(|| mismatch(domain, format!("task {} is missing", task.id)))?;
        for dependency in &task.predecessors {
            let before = schedule
                .task(*dependency)
                .ok_or_else(|| mismatch(domain, format!("task {} is missing", dependency)))?;
            if before.earliest_finish() > entry.earliest_start {
                return Err(violation(
                    domain,
                    format!("task {} starts before {} finishes", task.id, dependency),
                ));
            }
        }
    }

    let end = schedule
        .entry(ScheduleNode::End)
        .ok_or_else(|| mismatch(domain, "schedule has no end node".to_string()))?;
    if end.earliest_start != schedule.project_duration {
        return Err(violation(domain, "project duration differs from the end date".to_string()));
    }
    Ok(())
}
