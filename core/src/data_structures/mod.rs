//! Graph and disjoint-set structures shared by the algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;
pub mod union_find;

pub use self::graph::{Edge, Graph, GraphKind, VertexLabel, Weight};
pub use self::union_find::UnionFind;
