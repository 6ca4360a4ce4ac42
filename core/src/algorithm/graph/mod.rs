//! Network flow, spanning tree and coloring algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod coloring;
pub mod max_flow;
pub mod mst;

pub use self::coloring::{welsh_powell, Coloring, WelshPowell};
pub use self::max_flow::{
    max_flow, min_cut, AugmentingPath, Capacity, CapacityMatrix, EdmondsKarp, Flow, FlowMatrix, MaxFlowResult,
    MinCut,
};
pub use self::mst::{kruskal, Kruskal, MstEdge, SpanningForest};
