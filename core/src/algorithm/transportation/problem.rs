//! Transportation table and allocation types

use log::warn;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::AlgorithmError;

/// Units shipped, supplied or demanded
pub type Quantity = i64;

/// Per-unit shipping cost
pub type Cost = i64;

/// What to do when total supply and total demand differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BalancePolicy {
    /// Fail with `UnbalancedProblem`
    #[default]
    Reject,
    /// Append a zero-cost dummy row or column absorbing the difference
    AddDummy,
}

impl BalancePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            BalancePolicy::Reject => "reject",
            BalancePolicy::AddDummy => "dummy",
        }
    }
}

/// Dummy line appended by [`BalancePolicy::AddDummy`], with its index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DummyLine {
    /// Dummy supplier absorbing excess demand
    Row(usize),
    /// Dummy consumer absorbing excess supply
    Column(usize),
}

/// Balanced transportation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportationProblem {
    supply: Vec<Quantity>,
    demand: Vec<Quantity>,
    cost: Vec<Vec<Cost>>,
    dummy: Option<DummyLine>,
}

impl TransportationProblem {
    /// Validates and wraps a balanced table
    pub fn new(supply: Vec<Quantity>, demand: Vec<Quantity>, cost: Vec<Vec<Cost>>) -> Result<Self, AlgorithmError> {
        Self::with_policy(supply, demand, cost, BalancePolicy::Reject)
    }

    pub fn with_policy(
        mut supply: Vec<Quantity>,
        mut demand: Vec<Quantity>,
        mut cost: Vec<Vec<Cost>>,
        policy: BalancePolicy,
    ) -> Result<Self, AlgorithmError> {
        if supply.is_empty() || demand.is_empty() {
            return Err(AlgorithmError::InvalidTable(
                "supply and demand must both be non-empty".to_string(),
            ));
        }
        if cost.len() != supply.len() {
            return Err(AlgorithmError::InvalidTable(format!(
                "cost table has {} rows for {} suppliers",
                cost.len(),
                supply.len()
            )));
        }
        if let Some(i) = cost.iter().position(|row| row.len() != demand.len()) {
            return Err(AlgorithmError::InvalidTable(format!(
                "cost row {} has {} entries for {} consumers",
                i,
                cost[i].len(),
                demand.len()
            )));
        }
        if let Some(i) = supply.iter().position(|&s| s < 0) {
            return Err(AlgorithmError::InvalidTable(format!("negative supply {} at row {}", supply[i], i)));
        }
        if let Some(j) = demand.iter().position(|&d| d < 0) {
            return Err(AlgorithmError::InvalidTable(format!(
                "negative demand {} at column {}",
                demand[j], j
            )));
        }

        let total_supply = checked_total(&supply, "supply")?;
        let total_demand = checked_total(&demand, "demand")?;

        let mut dummy = None;
        if total_supply != total_demand {
            match policy {
                BalancePolicy::Reject => {
                    return Err(AlgorithmError::UnbalancedProblem {
                        supply: total_supply,
                        demand: total_demand,
                    })
                }
                BalancePolicy::AddDummy if total_supply > total_demand => {
                    warn!(
                        "transportation: adding dummy column for {} units of excess supply",
                        total_supply - total_demand
                    );
                    demand.push(total_supply - total_demand);
                    for row in &mut cost {
                        row.push(0);
                    }
                    dummy = Some(DummyLine::Column(demand.len() - 1));
                }
                BalancePolicy::AddDummy => {
                    warn!(
                        "transportation: adding dummy row for {} units of excess demand",
                        total_demand - total_supply
                    );
                    supply.push(total_demand - total_supply);
                    cost.push(vec![0; demand.len()]);
                    dummy = Some(DummyLine::Row(supply.len() - 1));
                }
            }
        }

        Ok(Self {
            supply,
            demand,
            cost,
            dummy,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.supply.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.demand.len()
    }

    pub fn supply(&self) -> &[Quantity] {
        &self.supply
    }

    pub fn demand(&self) -> &[Quantity] {
        &self.demand
    }

    #[inline]
    pub fn cost(&self, row: usize, col: usize) -> Cost {
        self.cost[row][col]
    }

    pub fn costs(&self) -> &[Vec<Cost>] {
        &self.cost
    }

    /// Total supply, equal to total demand
    pub fn total_supply(&self) -> Quantity {
        self.supply.iter().sum()
    }

    pub fn dummy(&self) -> Option<DummyLine> {
        self.dummy
    }

    /// Total cost of shipping `cells` under this table
    pub fn cost_of(&self, cells: &[Vec<Quantity>]) -> Cost {
        cells
            .iter()
            .zip(&self.cost)
            .flat_map(|(row, costs)| row.iter().zip(costs).map(|(&q, &c)| q * c))
            .sum()
    }

    /// Wraps `cells` as an allocation after checking shape and non-negativity
    pub fn allocation(&self, cells: Vec<Vec<Quantity>>) -> Result<Allocation, AlgorithmError> {
        if cells.len() != self.rows() || cells.iter().any(|row| row.len() != self.cols()) {
            return Err(AlgorithmError::InvalidTable(format!(
                "allocation shape does not match the {}x{} table",
                self.rows(),
                self.cols()
            )));
        }
        if cells.iter().flatten().any(|&q| q < 0) {
            return Err(AlgorithmError::InvalidTable("negative allocation".to_string()));
        }
        let total_cost = self.cost_of(&cells);
        Ok(Allocation { cells, total_cost })
    }
}

fn checked_total(values: &[Quantity], what: &str) -> Result<Quantity, AlgorithmError> {
    values
        .iter()
        .try_fold(0 as Quantity, |total, &q| total.checked_add(q))
        .ok_or_else(|| AlgorithmError::InvalidTable(format!("total {} overflows", what)))
}

/// Shipment plan over a transportation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub cells: Vec<Vec<Quantity>>,
    pub total_cost: Cost,
}

impl Allocation {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Quantity {
        self.cells[row][col]
    }

    pub fn row_sum(&self, row: usize) -> Quantity {
        self.cells[row].iter().sum()
    }

    pub fn column_sum(&self, col: usize) -> Quantity {
        self.cells.iter().map(|row| row[col]).sum()
    }

    /// Cells with a positive shipment, in row-major order
    pub fn occupied(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &q)| q > 0)
                    .map(move |(j, _)| (i, j))
            })
            .collect()
    }

    /// Whether every row and column sum matches the table exactly
    pub fn is_feasible(&self, problem: &TransportationProblem) -> bool {
        self.cells.len() == problem.rows()
            && (0..problem.rows()).all(|i| self.row_sum(i) == problem.supply()[i])
            && (0..problem.cols()).all(|j| self.column_sum(j) == problem.demand()[j])
    }
}
