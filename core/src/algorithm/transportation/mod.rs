//! Transportation problem: initial heuristics and stepping-stone optimization
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod heuristics;
pub mod problem;
pub mod solver;
pub mod stepping_stone;

pub use self::heuristics::{least_cost, northwest_corner, InitialMethod};
pub use self::problem::{Allocation, BalancePolicy, Cost, DummyLine, Quantity, TransportationProblem};
pub use self::solver::{solve, TransportationSolution, TransportationSolver};
pub use self::stepping_stone::{stepping_stone, Pivot, SteppingStone, SteppingStoneResult};
