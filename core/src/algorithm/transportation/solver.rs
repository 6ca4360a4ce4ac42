//! End-to-end transportation workflow: balance, pick a starting plan, optimize

use log::debug;
use serde::{Deserialize, Serialize};

use super::heuristics::InitialMethod;
use super::problem::{Allocation, BalancePolicy, Cost, DummyLine, Quantity, TransportationProblem};
use super::stepping_stone::{parse_iterations, Pivot, SteppingStone, DEFAULT_MAX_ITERATIONS};
use crate::algorithm::traits::{
    validated_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter,
};

/// Starting plan, optimized plan and how one became the other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportationSolution {
    /// Heuristic whose allocation seeded the optimization
    pub method: InitialMethod,
    pub initial: Allocation,
    pub optimized: Allocation,
    pub iterations: usize,
    pub pivots: Vec<Pivot>,
    /// Dummy line added to balance the table, if any
    pub dummy: Option<DummyLine>,
}

impl TransportationSolution {
    /// Cost saved by the optimization pass
    pub fn improvement(&self) -> Cost {
        self.initial.total_cost - self.optimized.total_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportationSolver {
    initial_method: InitialMethod,
    balance_policy: BalancePolicy,
    max_iterations: usize,
}

impl Default for TransportationSolver {
    fn default() -> Self {
        Self {
            initial_method: InitialMethod::Best,
            balance_policy: BalancePolicy::Reject,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl TransportationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_method(mut self, method: InitialMethod) -> Self {
        self.initial_method = method;
        self
    }

    pub fn with_balance_policy(mut self, policy: BalancePolicy) -> Self {
        self.balance_policy = policy;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builds the table under the configured balance policy and solves it
    pub fn solve(
        &self,
        supply: Vec<Quantity>,
        demand: Vec<Quantity>,
        cost: Vec<Vec<Cost>>,
    ) -> Result<TransportationSolution, AlgorithmError> {
        let problem = TransportationProblem::with_policy(supply, demand, cost, self.balance_policy)?;
        self.solve_problem(&problem)
    }

    pub fn solve_problem(&self, problem: &TransportationProblem) -> Result<TransportationSolution, AlgorithmError> {
        let (method, initial) = self.initial_method.allocate(problem);
        debug!(
            "transportation: starting from {} with cost {}",
            method.as_str(),
            initial.total_cost
        );

        let result = SteppingStone::new()
            .with_max_iterations(self.max_iterations)
            .run(problem, &initial)?;

        Ok(TransportationSolution {
            method,
            initial,
            optimized: result.allocation,
            iterations: result.iterations,
            pivots: result.pivots,
            dummy: problem.dummy(),
        })
    }
}

/// Solves a balanced table with the default configuration
pub fn solve(
    supply: Vec<Quantity>,
    demand: Vec<Quantity>,
    cost: Vec<Vec<Cost>>,
) -> Result<TransportationSolution, AlgorithmError> {
    TransportationSolver::new().solve(supply, demand, cost)
}

const INITIAL_METHODS: [&str; 3] = ["northwest", "least_cost", "best"];
const BALANCE_POLICIES: [&str; 2] = ["reject", "dummy"];

impl Algorithm for TransportationSolver {
    fn name(&self) -> &'static str {
        "Transportation Solver"
    }

    fn category(&self) -> &'static str {
        "transportation"
    }

    fn description(&self) -> String {
        "Builds an initial plan with the northwest-corner or least-cost rule and \
         optimizes it with the stepping-stone method."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::uniform("O((m + n) * m * n + k * m * n)", "O(m * n)")
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter::choice("initial_method", self.initial_method.as_str(), &INITIAL_METHODS),
            AlgorithmParameter::choice("balance_policy", self.balance_policy.as_str(), &BALANCE_POLICIES),
            AlgorithmParameter::integer("max_iterations", self.max_iterations, Some(1.0), None),
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        let param = validated_parameter(&*self, name, value)?;
        match param.name.as_str() {
            "initial_method" => {
                if let Some(method) = InitialMethod::parse(value) {
                    self.initial_method = method;
                }
            }
            "balance_policy" => {
                self.balance_policy = if value == "dummy" {
                    BalancePolicy::AddDummy
                } else {
                    BalancePolicy::Reject
                };
            }
            _ => self.max_iterations = parse_iterations(name, value)?,
        }
        Ok(())
    }
}
