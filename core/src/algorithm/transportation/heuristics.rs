//! Initial basic feasible solutions for balanced transportation problems
//!
//! Both heuristics work on private copies of supply and demand and saturate one
//! cell at a time, exhausting a row or a column with every allocation.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::problem::{Allocation, Quantity, TransportationProblem};

/// Heuristic used to build the starting allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitialMethod {
    NorthwestCorner,
    LeastCost,
    /// Run both and keep the cheaper; northwest corner only when strictly cheaper
    #[default]
    Best,
}

impl InitialMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            InitialMethod::NorthwestCorner => "northwest",
            InitialMethod::LeastCost => "least_cost",
            InitialMethod::Best => "best",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "northwest" => Some(InitialMethod::NorthwestCorner),
            "least_cost" => Some(InitialMethod::LeastCost),
            "best" => Some(InitialMethod::Best),
            _ => None,
        }
    }

    /// Builds the starting allocation, reporting the heuristic actually used
    pub fn allocate(self, problem: &TransportationProblem) -> (InitialMethod, Allocation) {
        match self {
            InitialMethod::NorthwestCorner => (self, northwest_corner(problem)),
            InitialMethod::LeastCost => (self, least_cost(problem)),
            InitialMethod::Best => {
                let northwest = northwest_corner(problem);
                let cheapest = least_cost(problem);
                debug!(
                    "transportation: northwest corner {} vs least cost {}",
                    northwest.total_cost, cheapest.total_cost
                );
                if northwest.total_cost < cheapest.total_cost {
                    (InitialMethod::NorthwestCorner, northwest)
                } else {
                    (InitialMethod::LeastCost, cheapest)
                }
            }
        }
    }
}

/// Northwest-corner rule: walk the table from the top-left cell, moving down
/// when the row's supply runs out first and right otherwise
pub fn northwest_corner(problem: &TransportationProblem) -> Allocation {
    let (rows, cols) = (problem.rows(), problem.cols());
    let mut supply = problem.supply().to_vec();
    let mut demand = problem.demand().to_vec();
    let mut cells = vec![vec![0; cols]; rows];

    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        let shipped = supply[i].min(demand[j]);
        cells[i][j] = shipped;
        supply[i] -= shipped;
        demand[j] -= shipped;
        trace!("northwest corner: ({}, {}) <- {}", i, j, shipped);
        if supply[i] == 0 && demand[j] > 0 {
            i += 1;
        } else {
            j += 1;
        }
    }

    finish(problem, cells, "northwest corner")
}

/// Least-cost rule: repeatedly saturate the cheapest cell whose row and column
/// both still have units left, first in row-major order on ties
pub fn least_cost(problem: &TransportationProblem) -> Allocation {
    let (rows, cols) = (problem.rows(), problem.cols());
    let mut supply = problem.supply().to_vec();
    let mut demand = problem.demand().to_vec();
    let mut cells = vec![vec![0; cols]; rows];

    loop {
        let mut cheapest: Option<(usize, usize)> = None;
        for i in (0..rows).filter(|&i| supply[i] > 0) {
            for j in (0..cols).filter(|&j| demand[j] > 0) {
                let better = match cheapest {
                    Some((bi, bj)) => problem.cost(i, j) < problem.cost(bi, bj),
                    None => true,
                };
                if better {
                    cheapest = Some((i, j));
                }
            }
        }
        let Some((i, j)) = cheapest else { break };

        let shipped: Quantity = supply[i].min(demand[j]);
        cells[i][j] = shipped;
        supply[i] -= shipped;
        demand[j] -= shipped;
        trace!("least cost: ({}, {}) <- {} at {}", i, j, shipped, problem.cost(i, j));
    }

    finish(problem, cells, "least cost")
}

fn finish(problem: &TransportationProblem, cells: Vec<Vec<Quantity>>, method: &str) -> Allocation {
    let total_cost = problem.cost_of(&cells);
    debug!(
        "{}: {}x{} table, total cost {}",
        method,
        problem.rows(),
        problem.cols(),
        total_cost
    );
    Allocation { cells, total_cost }
}
