//! Weighted graph data structure shared by the graph algorithms
//!
//! This module implements an arena graph: vertices are stored once in
//! insertion order and addressed by dense [`NodeId`]s, edges live in a single
//! insertion-ordered list, and adjacency lists hold edge indices. Neighbor
//! iteration and weight lookup never allocate, and every traversal order is
//! fixed by the order in which the caller built the graph.
//!
//! Directed and undirected graphs are two modes of the same structure. An
//! undirected edge is stored once with one weight and is visible from both
//! endpoints.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId};

/// Edge weight. Signed so that Bellman-Ford can accept negative arcs.
pub type Weight = i64;

/// Bound satisfied by anything usable as a vertex label
pub trait VertexLabel: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> VertexLabel for T {}

/// Construction-time orientation of a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    Directed,
    Undirected,
}

/// Stored edge, in caller insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: Weight,
}

/// Adjacency entry: the vertex on the other side and the edge that leads there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Adjacent {
    node: NodeId,
    edge: usize,
}

/// Arena graph with index-based adjacency
#[derive(Debug, Clone)]
pub struct Graph<V> {
    kind: GraphKind,
    vertices: Vec<V>,
    index: HashMap<V, NodeId>,
    edges: Vec<Edge>,
    /// Out-arcs; for undirected graphs, every incident edge
    outgoing: Vec<Vec<Adjacent>>,
    /// In-arcs of a directed graph (unused when undirected)
    incoming: Vec<Vec<Adjacent>>,
    lookup: HashMap<(NodeId, NodeId), usize>,
}

impl<V: VertexLabel> Graph<V> {
    /// Creates an empty graph of the given kind
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(GraphKind::Directed)
    }

    pub fn undirected() -> Self {
        Self::new(GraphKind::Undirected)
    }

    /// Creates a graph holding the given vertices and no edges
    pub fn with_vertices<I>(kind: GraphKind, vertices: I) -> Result<Self, AlgorithmError>
    where
        I: IntoIterator<Item = V>,
    {
        let mut graph = Self::new(kind);
        for vertex in vertices {
            graph.add_vertex(vertex)?;
        }
        Ok(graph)
    }

    /// Creates a graph from a vertex list and an edge list
    ///
    /// Fails with `InvalidEdge` when an edge mentions a vertex missing from
    /// `vertices`, and with `DuplicateEdge` when an edge is repeated.
    pub fn from_edges<I, E>(kind: GraphKind, vertices: I, edges: E) -> Result<Self, AlgorithmError>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, Weight)>,
    {
        let mut graph = Self::with_vertices(kind, vertices)?;
        for (source, target, weight) in edges {
            graph.add_edge(&source, &target, weight)?;
        }
        Ok(graph)
    }

    /// Adds a vertex and returns its dense identifier
    pub fn add_vertex(&mut self, vertex: V) -> Result<NodeId, AlgorithmError> {
        if self.index.contains_key(&vertex) {
            return Err(AlgorithmError::DuplicateVertex(format!("{:?}", vertex)));
        }
        let id = NodeId(self.vertices.len());
        self.index.insert(vertex.clone(), id);
        self.vertices.push(vertex);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        Ok(id)
    }

    /// Adds an edge; a second edge between the same endpoints is rejected
    pub fn add_edge(&mut self, source: &V, target: &V, weight: Weight) -> Result<usize, AlgorithmError> {
        let (u, v) = self.resolve_edge(source, target)?;
        if self.lookup.contains_key(&self.key(u, v)) {
            return Err(AlgorithmError::DuplicateEdge {
                from: format!("{:?}", source),
                to: format!("{:?}", target),
            });
        }
        Ok(self.insert_edge(u, v, weight))
    }

    /// Adds an edge, or replaces the weight of an existing one (last write wins)
    ///
    /// A replaced edge keeps its original position in edge order.
    pub fn upsert_edge(&mut self, source: &V, target: &V, weight: Weight) -> Result<usize, AlgorithmError> {
        let (u, v) = self.resolve_edge(source, target)?;
        let key = self.key(u, v);
        match self.lookup.get(&key).copied() {
            Some(edge) => {
                self.edges[edge].weight = weight;
                Ok(edge)
            }
            None => Ok(self.insert_edge(u, v, weight)),
        }
    }

    fn resolve_edge(&self, source: &V, target: &V) -> Result<(NodeId, NodeId), AlgorithmError> {
        match (self.node_id(source), self.node_id(target)) {
            (Some(u), Some(v)) => Ok((u, v)),
            _ => Err(AlgorithmError::InvalidEdge {
                from: format!("{:?}", source),
                to: format!("{:?}", target),
            }),
        }
    }

    fn key(&self, u: NodeId, v: NodeId) -> (NodeId, NodeId) {
        match self.kind {
            GraphKind::Directed => (u, v),
            GraphKind::Undirected => (u.min(v), u.max(v)),
        }
    }

    fn insert_edge(&mut self, u: NodeId, v: NodeId, weight: Weight) -> usize {
        let edge = self.edges.len();
        let key = self.key(u, v);
        self.edges.push(Edge { source: u, target: v, weight });
        self.lookup.insert(key, edge);

        self.outgoing[u.0].push(Adjacent { node: v, edge });
        match self.kind {
            GraphKind::Directed => self.incoming[v.0].push(Adjacent { node: u, edge }),
            GraphKind::Undirected if u != v => self.outgoing[v.0].push(Adjacent { node: u, edge }),
            GraphKind::Undirected => {}
        }
        edge
    }

    #[inline]
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.kind == GraphKind::Directed
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_id(&self, vertex: &V) -> Option<NodeId> {
        self.index.get(vertex).copied()
    }

    /// Like [`Graph::node_id`], failing with `UnknownVertex`
    pub fn require_node(&self, vertex: &V) -> Result<NodeId, AlgorithmError> {
        self.node_id(vertex)
            .ok_or_else(|| AlgorithmError::UnknownVertex(format!("{:?}", vertex)))
    }

    /// Label of a vertex. Panics on an identifier not issued by this graph.
    #[inline]
    pub fn label(&self, id: NodeId) -> &V {
        &self.vertices[id.0]
    }

    pub fn labels(&self) -> &[V] {
        &self.vertices
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.vertices.len()).map(NodeId)
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Out-neighbors with the connecting weight, in edge insertion order
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        self.outgoing[id.0]
            .iter()
            .map(move |adj| (adj.node, self.edges[adj.edge].weight))
    }

    /// Every vertex sharing an edge with `id`, regardless of direction
    pub fn incident(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[id.0]
            .iter()
            .chain(self.incoming[id.0].iter())
            .map(|adj| adj.node)
    }

    /// Number of edge endpoints at `id` (in-degree plus out-degree when directed)
    pub fn degree(&self, id: NodeId) -> usize {
        self.outgoing[id.0].len() + self.incoming[id.0].len()
    }

    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Option<Weight> {
        self.lookup
            .get(&self.key(source, target))
            .map(|&edge| self.edges[edge].weight)
    }

    /// Traversable arcs in edge order; an undirected edge yields `u -> v` then `v -> u`
    pub fn arcs(&self) -> impl Iterator<Item = (NodeId, NodeId, Weight)> + '_ {
        let undirected = self.kind == GraphKind::Undirected;
        self.edges.iter().flat_map(move |edge| {
            let forward = Some((edge.source, edge.target, edge.weight));
            let backward = (undirected && edge.source != edge.target)
                .then_some((edge.target, edge.source, edge.weight));
            forward.into_iter().chain(backward)
        })
    }

    /// Maps a sequence of identifiers back to labels
    pub fn label_path(&self, path: &[NodeId]) -> Vec<V> {
        path.iter().map(|&id| self.label(id).clone()).collect()
    }
}

impl Graph<usize> {
    /// Creates a graph whose vertices are labelled `0..count`
    pub fn with_vertex_count(kind: GraphKind, count: usize) -> Self {
        let mut graph = Self::new(kind);
        for vertex in 0..count {
            graph.vertices.push(vertex);
            graph.index.insert(vertex, NodeId(vertex));
            graph.outgoing.push(Vec::new());
            graph.incoming.push(Vec::new());
        }
        graph
    }
}
