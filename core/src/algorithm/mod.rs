//! CHRONOS-OR Algorithm Framework
//! Shortest paths, network flow, spanning trees, coloring, transportation and scheduling
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod path_finding;
pub mod graph;
pub mod transportation;
pub mod scheduling;

pub use self::traits::*;
pub use self::path_finding::*;
pub use self::graph::*;
pub use self::transportation::*;
pub use self::scheduling::*;
