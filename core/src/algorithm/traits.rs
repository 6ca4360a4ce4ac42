//! Core algorithm trait definitions for the CHRONOS operations-research toolkit
//!
//! This module establishes the shared vocabulary of every engine in the crate:
//! the dense node identifier, the typed parameter system used to configure
//! engines from string input, the complexity descriptor, and the error
//! taxonomy returned by all algorithms.
//!
//! # Key Design Principles
//! - Engines are plain values, `Send + Sync`, holding configuration only
//! - Every call returns a fresh result value; no state survives a call
//! - Parameters are validated into typed fields at the boundary
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub constraints: Option<ParameterConstraints>,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterType {
    Integer,
    Boolean,
    Enum(Vec<String>),
}

/// Parameter constraints for validating algorithm parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AlgorithmParameter {
    pub fn integer(name: &str, value: usize, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            value_type: ParameterType::Integer,
            constraints: Some(ParameterConstraints { min, max }),
        }
    }

    pub fn boolean(name: &str, value: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            value_type: ParameterType::Boolean,
            constraints: None,
        }
    }

    pub fn choice(name: &str, value: &str, allowed: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            value_type: ParameterType::Enum(allowed.iter().map(|s| s.to_string()).collect()),
            constraints: None,
        }
    }

    /// Checks a candidate value against the declared type and constraints
    pub fn validate(&self, value: &str) -> Result<(), AlgorithmError> {
        let invalid = |reason: String| AlgorithmError::InvalidParameter {
            name: self.name.clone(),
            reason,
        };

        match &self.value_type {
            ParameterType::Integer => {
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| invalid(format!("expected a non-negative integer, got '{}'", value)))?;
                if let Some(constraints) = &self.constraints {
                    if let Some(min) = constraints.min {
                        if (parsed as f64) < min {
                            return Err(invalid(format!("{} is below the minimum {}", parsed, min)));
                        }
                    }
                    if let Some(max) = constraints.max {
                        if (parsed as f64) > max {
                            return Err(invalid(format!("{} exceeds the maximum {}", parsed, max)));
                        }
                    }
                }
                Ok(())
            }
            ParameterType::Boolean => match value {
                "true" | "false" => Ok(()),
                _ => Err(invalid(format!("invalid boolean value '{}', use 'true' or 'false'", value))),
            },
            ParameterType::Enum(allowed) => {
                if allowed.iter().any(|option| option == value) {
                    Ok(())
                } else {
                    Err(invalid(format!(
                        "invalid option '{}', valid options: {}",
                        value,
                        allowed.join(", ")
                    )))
                }
            }
        }
    }
}

/// Comprehensive error types for algorithm operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown vertex: {0}")]
    UnknownVertex(String),

    #[error("Invalid edge {from} -> {to}: edge references an unknown vertex")]
    InvalidEdge { from: String, to: String },

    #[error("Duplicate vertex: {0}")]
    DuplicateVertex(String),

    #[error("Duplicate edge {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("Negative weight {weight} on edge {from} -> {to} rejected")]
    NegativeWeightRejected { from: String, to: String, weight: i64 },

    #[error("Negative cycle reachable from the source detected")]
    NegativeCycleDetected,

    #[error("Invalid flow network: {0}")]
    InvalidNetwork(String),

    #[error("Flow is unbounded: total capacity leaving the source overflows")]
    UnboundedFlow,

    #[error("Invalid transportation table: {0}")]
    InvalidTable(String),

    #[error("Unbalanced transportation problem: total supply {supply} != total demand {demand}")]
    UnbalancedProblem { supply: i64, demand: i64 },

    #[error("No improving cycle found after {iterations} stepping-stone iterations")]
    NoImprovingCycle { iterations: usize },

    #[error("Cyclic dependency among tasks {0:?}")]
    CyclicDependency(Vec<u32>),

    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: u32, dependency: u32 },

    #[error("Duplicate task id: {0}")]
    DuplicateTask(u32),
}

impl AlgorithmError {
    pub(crate) fn unknown_parameter(name: &str, valid: &[&str]) -> Self {
        let reason = if valid.is_empty() {
            "this algorithm takes no parameters".to_string()
        } else {
            format!("unknown parameter, valid parameters: {}", valid.join(", "))
        };
        AlgorithmError::InvalidParameter {
            name: name.to_string(),
            reason,
        }
    }
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
    pub best_case: String,
    pub average_case: String,
    pub worst_case: String,
}

impl AlgorithmComplexity {
    pub(crate) fn uniform(time: &str, space: &str) -> Self {
        Self {
            time_complexity: time.to_string(),
            space_complexity: space.to_string(),
            best_case: time.to_string(),
            average_case: time.to_string(),
            worst_case: time.to_string(),
        }
    }
}

/// Main algorithm trait
///
/// # Invariants
/// - Thread-safe execution
/// - State isolation between runs
/// - Deterministic behavior for given inputs
pub trait Algorithm: Debug + Send + Sync {
    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new(self.name())
    }

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., shortest_path, max_flow)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter> {
        Vec::new()
    }

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, _value: &str) -> Result<(), AlgorithmError> {
        Err(AlgorithmError::unknown_parameter(name, &[]))
    }

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|param| param.name == name)
            .map(|param| param.value)
    }
}

/// Looks up the declared parameter and validates `value` against it
pub(crate) fn validated_parameter<A: Algorithm + ?Sized>(
    algorithm: &A,
    name: &str,
    value: &str,
) -> Result<AlgorithmParameter, AlgorithmError> {
    let params = algorithm.parameters();
    let param = params.iter().find(|param| param.name == name).cloned();
    match param {
        Some(param) => {
            param.validate(value)?;
            Ok(param)
        }
        None => {
            let valid: Vec<&str> = params.iter().map(|param| param.name.as_str()).collect();
            Err(AlgorithmError::unknown_parameter(name, &valid))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_id_uniqueness() {
        let id1 = AlgorithmId::new("kruskal");
        let id2 = AlgorithmId::new("dijkstra");
        let id3 = AlgorithmId::new("kruskal");

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(id1.as_str(), "kruskal");
    }

    #[test]
    fn test_node_id_type_safety() {
        let node1 = NodeId(42);
        let node2 = NodeId(42);
        let node3 = NodeId(43);

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
        assert_eq!(node1.as_usize(), 42);
        assert_eq!(node3.to_string(), "#43");
    }

    #[test]
    fn test_parameter_constraints() {
        let param = AlgorithmParameter::integer("max_iterations", 1000, Some(1.0), Some(10_000.0));

        assert!(param.validate("1").is_ok());
        assert!(param.validate("10000").is_ok());
        assert!(param.validate("0").is_err());
        assert!(param.validate("10001").is_err());
        assert!(param.validate("-3").is_err());
        assert!(param.validate("many").is_err());
    }

    #[test]
    fn test_boolean_and_choice_parameters() {
        let flag = AlgorithmParameter::boolean("early_termination", true);
        assert!(flag.validate("false").is_ok());
        assert!(flag.validate("maybe").is_err());

        let choice = AlgorithmParameter::choice("balance_policy", "reject", &["reject", "dummy"]);
        assert!(choice.validate("dummy").is_ok());
        match choice.validate("scale") {
            Err(AlgorithmError::InvalidParameter { name, reason }) => {
                assert_eq!(name, "balance_policy");
                assert!(reason.contains("reject, dummy"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_error_messages() {
        let err = AlgorithmError::UnbalancedProblem { supply: 10, demand: 12 };
        assert_eq!(
            err.to_string(),
            "Unbalanced transportation problem: total supply 10 != total demand 12"
        );
        assert_eq!(
            AlgorithmError::NoImprovingCycle { iterations: 3 }.to_string(),
            "No improving cycle found after 3 stepping-stone iterations"
        );
    }
}
