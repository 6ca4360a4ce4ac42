//! Result verification
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod correctness;

pub use self::correctness::{
    verify_allocation, verify_coloring, verify_flow, verify_min_cut, verify_schedule, verify_shortest_paths,
    verify_spanning_forest, VerificationDomain, VerificationError,
};
