//! Stepping-stone improvement of a basic feasible transportation solution
//!
//! The basis is kept explicitly as a spanning tree over row and column nodes
//! (`rows + cols - 1` cells). Each iteration computes dual potentials with
//! `u[0] = 0` and `cost = u + v` on basic cells, prices every non-basic cell by
//! its opportunity cost `cost - (u + v)` and pivots in the most negative one.
//! The closed loop of the entering cell is its unique path through the basis
//! tree, so loop search is deterministic and always succeeds on a valid basis.
//!
//! A feasible start that is not basic (its positive cells contain a cycle) is
//! first reduced: units move around each such cycle in the direction that does
//! not raise cost until one of its cells empties. Degenerate allocations (fewer
//! positive cells than a basis needs) are then completed with zero cells in
//! row-major order, skipping any cell that would close a cycle.

use std::collections::VecDeque;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::problem::{Allocation, Cost, Quantity, TransportationProblem};
use crate::algorithm::traits::{
    validated_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter,
};
use crate::data_structures::union_find::UnionFind;

pub(crate) const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// One basis exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pivot {
    pub entering: (usize, usize),
    pub leaving: (usize, usize),
    /// Units moved around the loop
    pub shift: Quantity,
    /// Opportunity cost of the entering cell before the pivot
    pub opportunity_cost: Cost,
}

/// Optimal allocation with the certificate that proves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppingStoneResult {
    pub allocation: Allocation,
    pub iterations: usize,
    pub row_potentials: Vec<Cost>,
    pub column_potentials: Vec<Cost>,
    /// Final basic cells in row-major order
    pub basis: Vec<(usize, usize)>,
    pub pivots: Vec<Pivot>,
}

/// Stepping-stone (MODI) optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppingStone {
    max_iterations: usize,
}

impl Default for SteppingStone {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SteppingStone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Improves `initial` until no non-basic cell has a negative opportunity cost
    ///
    /// `initial` must meet every row and column sum exactly.
    pub fn run(
        &self,
        problem: &TransportationProblem,
        initial: &Allocation,
    ) -> Result<SteppingStoneResult, AlgorithmError> {
        if initial.cells.iter().any(|row| row.len() != problem.cols()) || !initial.is_feasible(problem) {
            return Err(AlgorithmError::InvalidTable(
                "initial allocation does not meet supply and demand".to_string(),
            ));
        }
        if initial.cells.iter().flatten().any(|&q| q < 0) {
            return Err(AlgorithmError::InvalidTable("negative allocation".to_string()));
        }

        debug!(
            "stepping stone: {}x{} table, initial cost {}",
            problem.rows(),
            problem.cols(),
            problem.cost_of(&initial.cells)
        );

        let mut cells = initial.cells.clone();
        let cancelled = cancel_cycles(problem, &mut cells);
        if cancelled > 0 {
            warn!(
                "stepping stone: starting allocation is not basic, cancelled {} cycles",
                cancelled
            );
        }
        let mut basis = Basis::complete(&cells)?;
        let mut pivots = Vec::new();

        loop {
            let (row_potentials, column_potentials) = basis.potentials(problem);

            let mut entering: Option<((usize, usize), Cost)> = None;
            for i in 0..problem.rows() {
                for j in 0..problem.cols() {
                    if basis.contains(i, j) {
                        continue;
                    }
                    let opportunity = problem.cost(i, j) - row_potentials[i] - column_potentials[j];
                    if opportunity < 0 && entering.map_or(true, |(_, best)| opportunity < best) {
                        entering = Some(((i, j), opportunity));
                    }
                }
            }

            let Some(((ei, ej), opportunity_cost)) = entering else {
                let total_cost = problem.cost_of(&cells);
                debug!(
                    "stepping stone: optimal after {} iterations, cost {}",
                    pivots.len(),
                    total_cost
                );
                return Ok(SteppingStoneResult {
                    allocation: Allocation { cells, total_cost },
                    iterations: pivots.len(),
                    row_potentials,
                    column_potentials,
                    basis: basis.cells(),
                    pivots,
                });
            };

            let iterations = pivots.len();
            if iterations >= self.max_iterations {
                warn!("stepping stone: iteration cap {} reached", self.max_iterations);
                return Err(AlgorithmError::NoImprovingCycle { iterations });
            }

            let cycle = basis
                .closed_loop(ei, ej)
                .ok_or(AlgorithmError::NoImprovingCycle { iterations })?;

            // Odd loop positions lose units; the first minimiser leaves
            let (leaving, shift) = cycle
                .iter()
                .skip(1)
                .step_by(2)
                .map(|&(i, j)| ((i, j), cells[i][j]))
                .fold(None, |best: Option<((usize, usize), Quantity)>, candidate| match best {
                    Some(current) if current.1 <= candidate.1 => Some(current),
                    _ => Some(candidate),
                })
                .ok_or(AlgorithmError::NoImprovingCycle { iterations })?;

            for (position, &(i, j)) in cycle.iter().enumerate() {
                if position % 2 == 0 {
                    cells[i][j] += shift;
                } else {
                    cells[i][j] -= shift;
                }
            }
            basis.exchange(leaving, (ei, ej));

            trace!(
                "stepping stone: ({}, {}) enters at {}, {:?} leaves, shift {}",
                ei,
                ej,
                opportunity_cost,
                leaving,
                shift
            );
            pivots.push(Pivot {
                entering: (ei, ej),
                leaving,
                shift,
                opportunity_cost,
            });
        }
    }
}

/// Spanning-tree basis over `rows` row nodes followed by `cols` column nodes
#[derive(Debug, Clone)]
struct Basis {
    members: Vec<Vec<bool>>,
    rows: usize,
    cols: usize,
}

impl Basis {
    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            members: vec![vec![false; cols]; rows],
            rows,
            cols,
        }
    }

    /// Positive cells plus enough zero cells to span every row and column
    fn complete(cells: &[Vec<Quantity>]) -> Result<Self, AlgorithmError> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        let mut members = vec![vec![false; cols]; rows];
        let mut forest = UnionFind::new(rows + cols);
        let mut size = 0;

        for i in 0..rows {
            for j in 0..cols {
                if cells[i][j] > 0 {
                    if !forest.union(i, rows + j) {
                        return Err(AlgorithmError::InvalidTable(
                            "positive cells of the allocation form a cycle, not a basic solution".to_string(),
                        ));
                    }
                    members[i][j] = true;
                    size += 1;
                }
            }
        }

        let required = rows + cols - 1;
        if size < required {
            warn!(
                "stepping stone: degenerate allocation, completing basis with {} zero cells",
                required - size
            );
            'scan: for i in 0..rows {
                for j in 0..cols {
                    if size == required {
                        break 'scan;
                    }
                    if !members[i][j] && forest.union(i, rows + j) {
                        members[i][j] = true;
                        size += 1;
                    }
                }
            }
        }

        Ok(Self { members, rows, cols })
    }

    #[inline]
    fn contains(&self, row: usize, col: usize) -> bool {
        self.members[row][col]
    }

    fn exchange(&mut self, leaving: (usize, usize), entering: (usize, usize)) {
        self.members[leaving.0][leaving.1] = false;
        self.members[entering.0][entering.1] = true;
    }

    fn cells(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .flat_map(|i| (0..self.cols).map(move |j| (i, j)))
            .filter(|&(i, j)| self.members[i][j])
            .collect()
    }

    /// Tree neighbours of a node, in index order
    fn adjacent(&self, node: usize) -> Vec<usize> {
        if node < self.rows {
            (0..self.cols)
                .filter(|&j| self.members[node][j])
                .map(|j| self.rows + j)
                .collect()
        } else {
            let j = node - self.rows;
            (0..self.rows).filter(|&i| self.members[i][j]).collect()
        }
    }

    /// Dual potentials solved outward from `u[0] = 0`
    fn potentials(&self, problem: &TransportationProblem) -> (Vec<Cost>, Vec<Cost>) {
        let mut potential: Vec<Option<Cost>> = vec![None; self.rows + self.cols];
        potential[0] = Some(0);
        let mut queue = VecDeque::from([0]);

        while let Some(node) = queue.pop_front() {
            let known = potential[node].unwrap_or(0);
            for next in self.adjacent(node) {
                if potential[next].is_some() {
                    continue;
                }
                let (i, j) = if node < self.rows {
                    (node, next - self.rows)
                } else {
                    (next, node - self.rows)
                };
                potential[next] = Some(problem.cost(i, j) - known);
                queue.push_back(next);
            }
        }

        let values: Vec<Cost> = potential.into_iter().map(|p| p.unwrap_or(0)).collect();
        let (rows, cols) = values.split_at(self.rows);
        (rows.to_vec(), cols.to_vec())
    }

    /// Entering cell followed by the basic cells of its loop, alternating
    /// column and row moves
    fn closed_loop(&self, row: usize, col: usize) -> Option<Vec<(usize, usize)>> {
        let start = row;
        let goal = self.rows + col;
        let mut parent: Vec<Option<usize>> = vec![None; self.rows + self.cols];
        let mut visited = vec![false; self.rows + self.cols];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            if node == goal {
                break;
            }
            for next in self.adjacent(node) {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some(node);
                    queue.push_back(next);
                }
            }
        }
        if !visited[goal] {
            return None;
        }

        // Walk back from the column node, emitting one basic cell per tree edge
        let mut cycle = vec![(row, col)];
        let mut node = goal;
        while let Some(previous) = parent[node] {
            let cell = if node < self.rows {
                (node, previous - self.rows)
            } else {
                (previous, node - self.rows)
            };
            cycle.push(cell);
            node = previous;
        }
        (cycle.len() >= 4).then_some(cycle)
    }
}

/// Removes every cycle among the positive cells, returning how many were cancelled
///
/// Row and column sums are preserved and the cost never rises. Each cancellation
/// empties at least one cell, so the loop ends after at most `rows * cols` rounds.
fn cancel_cycles(problem: &TransportationProblem, cells: &mut [Vec<Quantity>]) -> usize {
    let rows = cells.len();
    let cols = problem.cols();
    let mut cancelled = 0;

    loop {
        let mut forest = Basis::empty(rows, cols);
        let mut components = UnionFind::new(rows + cols);
        let mut closing = None;
        'scan: for i in 0..rows {
            for j in 0..cols {
                if cells[i][j] > 0 {
                    if !components.union(i, rows + j) {
                        closing = Some((i, j));
                        break 'scan;
                    }
                    forest.members[i][j] = true;
                }
            }
        }

        let Some((i, j)) = closing else {
            return cancelled;
        };
        // `closing` joins two nodes the forest already connects
        let Some(cycle) = forest.closed_loop(i, j) else {
            return cancelled;
        };

        let gain: Cost = cycle
            .iter()
            .enumerate()
            .map(|(position, &(a, b))| {
                if position % 2 == 0 {
                    problem.cost(a, b)
                } else {
                    -problem.cost(a, b)
                }
            })
            .sum();
        // Shifting onto even positions changes cost by `gain` per unit
        let losing = if gain <= 0 { 1 } else { 0 };
        let shift = cycle
            .iter()
            .skip(losing)
            .step_by(2)
            .map(|&(a, b)| cells[a][b])
            .min()
            .unwrap_or(0);

        for (position, &(a, b)) in cycle.iter().enumerate() {
            if position % 2 == losing {
                cells[a][b] -= shift;
            } else {
                cells[a][b] += shift;
            }
        }
        trace!("stepping stone: cancelled cycle {:?} by shifting {}", cycle, shift);
        cancelled += 1;
    }
}

/// Runs [`SteppingStone`] with the default iteration cap
pub fn stepping_stone(
    problem: &TransportationProblem,
    initial: &Allocation,
) -> Result<SteppingStoneResult, AlgorithmError> {
    SteppingStone::new().run(problem, initial)
}

impl Algorithm for SteppingStone {
    fn name(&self) -> &'static str {
        "Stepping Stone"
    }

    fn category(&self) -> &'static str {
        "transportation"
    }

    fn description(&self) -> String {
        "Improves a basic feasible transportation plan by pivoting along closed loops \
         until every opportunity cost is non-negative."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(k * m * n)".to_string(),
            space_complexity: "O(m * n)".to_string(),
            best_case: "O(m * n)".to_string(),
            average_case: "O(k * m * n)".to_string(),
            worst_case: "O(max_iterations * m * n)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::integer(
            "max_iterations",
            self.max_iterations,
            Some(1.0),
            None,
        )]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        validated_parameter(&*self, name, value)?;
        self.max_iterations = parse_iterations(name, value)?;
        Ok(())
    }
}

pub(crate) fn parse_iterations(name: &str, value: &str) -> Result<usize, AlgorithmError> {
    value.parse().map_err(|_| AlgorithmError::InvalidParameter {
        name: name.to_string(),
        reason: format!("expected a positive integer, got '{}'", value),
    })
}
