use super::{LayeredLayoutError, Ranking};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Assign layers to nodes based on topological order
///
/// Forward pass: each node goes one layer below its deepest predecessor, so
/// every source (and every isolated node) lands on layer 0. With
/// [`Ranking::Compact`] a backward pass then moves nodes down next to their
/// closest successor.
///
/// Nodes inside a layer keep the graph's node insertion order.
pub(crate) fn assign_layers<N>(
    graph: &DiGraphMap<N, ()>,
    ranking: Ranking,
) -> Result<Vec<Vec<N>>, LayeredLayoutError<N>>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    // Iterative, a cycle is reported instead of recursing forever
    let topo_order = toposort(graph, None)
        .map_err(|cycle| LayeredLayoutError::GraphHasCycle(cycle.node_id()))?;

    let mut layer_map: HashMap<N, usize> = HashMap::with_capacity(topo_order.len());

    for &node in &topo_order {
        let layer = graph
            .neighbors_directed(node, Direction::Incoming)
            .filter_map(|pred| layer_map.get(&pred))
            .map(|layer| layer + 1)
            .max()
            .unwrap_or(0);
        layer_map.insert(node, layer);
    }

    if ranking == Ranking::Compact {
        for &node in topo_order.iter().rev() {
            let layer = layer_map[&node];
            let min_succ_layer = graph
                .neighbors_directed(node, Direction::Outgoing)
                .filter_map(|succ| layer_map.get(&succ).copied())
                .min();

            if let Some(min_succ_layer) = min_succ_layer {
                if min_succ_layer > layer + 1 {
                    layer_map.insert(node, min_succ_layer - 1);
                }
            }
        }
    }

    let layer_count = layer_map.values().max().map_or(0, |max| max + 1);
    let mut layers = vec![Vec::new(); layer_count];
    for node in graph.nodes() {
        layers[layer_map[&node]].push(node);
    }

    Ok(layers)
}
