use crate::{NodeSizes, Point};
use std::collections::HashMap;
use std::hash::Hash;

/// A layout engine that can compute positions for graph nodes
///
/// This trait is generic over the graph type `G` so that engines can state
/// their own graph requirements: the layered layout works on any directed
/// graph exposing petgraph's visitor traits.
pub trait LayoutEngine<G> {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash;

    /// The error type returned when the layout cannot be computed
    type Error;

    /// Compute node positions for the given graph
    ///
    /// # Errors
    /// Returns an error if the layout computation fails (e.g., graph contains
    /// cycles for DAG layouts, or other layout-specific constraints are violated)
    fn layout<S>(&self, graph: G, sizes: &S) -> Result<HashMap<Self::NodeId, Point>, Self::Error>
    where
        S: NodeSizes<Self::NodeId>;
}
