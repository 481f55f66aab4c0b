mod crossings;
mod layers;
mod ordering;
mod positions;

use crate::{LayoutEngine, NodeSizes, Point, Vec2};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

use crossings::{count_crossings, minimize_crossings};
use layers::assign_layers;
use ordering::order_layers;
use positions::assign_coordinates;

/// Errors that can occur during layered layout computation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayeredLayoutError<N>
where
    N: fmt::Debug,
{
    /// The graph contains a cycle at the given node
    #[error("graph contains a cycle at node {0:?}")]
    GraphHasCycle(N),
}

/// How nodes are distributed over layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ranking {
    /// A node sits one layer below its deepest predecessor, sources are on
    /// layer 0
    #[default]
    LongestPath,
    /// Longest path, then nodes are pulled down next to their closest
    /// successor to shorten edges. Sources may leave layer 0.
    Compact,
}

/// Configuration for the layered (Sugiyama-style) DAG layout
///
/// Layers run top to bottom, nodes of a layer are laid out left to right.
#[derive(Debug, Clone)]
pub struct LayeredLayout {
    /// Horizontal spacing between nodes of a layer and vertical spacing
    /// between layers
    pub margin: Vec2,

    /// Layer assignment strategy
    pub ranking: Ranking,

    /// Number of down/up barycenter sweeps used to order layers
    pub ordering_sweeps: usize,

    /// Maximum iterations for crossing minimization
    pub max_crossing_iterations: usize,

    /// Maximum iterations for horizontal position optimization. Zero keeps
    /// every node on its sequential slot.
    pub max_position_iterations: usize,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            margin: Vec2::new(20.0, 20.0),
            ranking: Ranking::default(),
            ordering_sweeps: 4,
            max_crossing_iterations: 10,
            max_position_iterations: 0,
        }
    }
}

impl LayeredLayout {
    /// Create a new layered layout with the given margin
    pub fn new(margin: Vec2) -> Self {
        Self {
            margin,
            ..Default::default()
        }
    }
}

/// Layer structure that can be cached and reused
#[derive(Debug, Clone)]
pub struct Layers<N>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    /// Internal graph representation for efficient edge lookups
    pub(crate) graph: DiGraphMap<N, ()>,

    /// Nodes organized into topological layers, in left to right order
    pub nodes: Vec<Vec<N>>,

    /// Number of edge crossings between adjacent layers (quality metric)
    pub crossings: usize,

    ranks: HashMap<N, usize>,
}

impl<N> Layers<N>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    /// Layer index of a node, `None` if the node is not part of the graph
    pub fn rank(&self, node: N) -> Option<usize> {
        self.ranks.get(&node).copied()
    }

    /// Layer index of every node
    pub fn ranks(&self) -> &HashMap<N, usize> {
        &self.ranks
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl LayeredLayout {
    /// Compute layer structure (expensive, cache this)
    ///
    /// This phase assigns nodes to layers and orders every layer to reduce
    /// edge crossings. It only depends on the graph structure, not on node
    /// sizes. Ties are broken by the order in which the graph yields its node
    /// identifiers, so the same graph always produces the same layers.
    ///
    /// # Errors
    /// Returns an error if the graph contains cycles
    pub fn compute_layers<G>(
        &self,
        graph: G,
    ) -> Result<Layers<G::NodeId>, LayeredLayoutError<G::NodeId>>
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash + fmt::Debug,
    {
        // Fresh copy per call, node insertion order is the tie-break for
        // every later phase
        let mut internal_graph = DiGraphMap::new();
        for node in graph.node_identifiers() {
            internal_graph.add_node(node);
        }
        for node in graph.node_identifiers() {
            for succ in graph.neighbors_directed(node, Direction::Outgoing) {
                internal_graph.add_edge(node, succ, ());
            }
        }

        let layers = assign_layers(&internal_graph, self.ranking)?;
        let layers = order_layers(&internal_graph, layers, self.ordering_sweeps);
        let layers = minimize_crossings(&internal_graph, layers, self.max_crossing_iterations);
        let crossings = count_crossings(&internal_graph, &layers);
        let ranks = layers
            .iter()
            .enumerate()
            .flat_map(|(rank, layer)| layer.iter().map(move |&node| (node, rank)))
            .collect();

        Ok(Layers {
            graph: internal_graph,
            nodes: layers,
            crossings,
            ranks,
        })
    }

    /// Compute positions from cached layers (cheap, rerun when sizes change)
    ///
    /// This phase assigns coordinates to nodes based on their layer structure
    /// and current sizes. It can be called repeatedly as node sizes change.
    pub fn compute_positions<N, S>(&self, layers: &Layers<N>, sizes: &S) -> HashMap<N, Point>
    where
        N: Copy + Ord + Hash + fmt::Debug,
        S: NodeSizes<N>,
    {
        assign_coordinates(
            &layers.nodes,
            &layers.graph,
            sizes,
            self.margin,
            self.max_position_iterations,
        )
    }
}

// Implement LayoutEngine for any graph with the required capabilities
impl<G> LayoutEngine<G> for LayeredLayout
where
    G: IntoNodeIdentifiers + IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash + fmt::Debug,
{
    type NodeId = G::NodeId;
    type Error = LayeredLayoutError<G::NodeId>;

    fn layout<S>(&self, graph: G, sizes: &S) -> Result<HashMap<Self::NodeId, Point>, Self::Error>
    where
        S: NodeSizes<Self::NodeId>,
    {
        let layers = self.compute_layers(graph)?;
        Ok(self.compute_positions(&layers, sizes))
    }
}
