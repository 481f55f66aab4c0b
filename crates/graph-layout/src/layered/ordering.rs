use super::crossings::count_crossings;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::HashMap;
use std::hash::Hash;

/// Order every layer with the barycenter heuristic
///
/// Each sweep goes down (nodes keyed on their predecessors) and then up
/// (nodes keyed on their successors). A node's key is the mean centred slot
/// of its neighbours, whatever layer they are on, so long edges still pull.
/// Nodes without neighbours in the sweep direction keep their current slot.
/// Sorting is stable: equal keys keep the previous order.
///
/// The ordering with the fewest crossings seen is returned, the initial one
/// included.
pub(crate) fn order_layers<N>(
    graph: &DiGraphMap<N, ()>,
    mut layers: Vec<Vec<N>>,
    sweeps: usize,
) -> Vec<Vec<N>>
where
    N: Copy + Ord + Hash,
{
    let mut best_crossings = count_crossings(graph, &layers);
    let mut best = layers.clone();
    let mut slots = centred_slots(&layers);

    for _ in 0..sweeps {
        if best_crossings == 0 {
            break;
        }

        for layer_index in 1..layers.len() {
            reorder_layer(
                graph,
                &mut layers[layer_index],
                &mut slots,
                Direction::Incoming,
            );
        }
        for layer_index in (0..layers.len().saturating_sub(1)).rev() {
            reorder_layer(
                graph,
                &mut layers[layer_index],
                &mut slots,
                Direction::Outgoing,
            );
        }

        let crossings = count_crossings(graph, &layers);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
        }
    }

    best
}

fn reorder_layer<N>(
    graph: &DiGraphMap<N, ()>,
    layer: &mut [N],
    slots: &mut HashMap<N, f32>,
    direction: Direction,
) where
    N: Copy + Ord + Hash,
{
    let keys: HashMap<N, f32> = layer
        .iter()
        .map(|&node| {
            let key = barycenter(graph, node, slots, direction).unwrap_or(slots[&node]);
            (node, key)
        })
        .collect();

    layer.sort_by(|a, b| keys[a].total_cmp(&keys[b]));

    for (index, &node) in layer.iter().enumerate() {
        slots.insert(node, centred_slot(index, layer.len()));
    }
}

/// Mean slot of the neighbours in the given direction
fn barycenter<N>(
    graph: &DiGraphMap<N, ()>,
    node: N,
    slots: &HashMap<N, f32>,
    direction: Direction,
) -> Option<f32>
where
    N: Copy + Ord + Hash,
{
    let mut sum = 0.0;
    let mut count = 0;

    for neighbor in graph.neighbors_directed(node, direction) {
        if let Some(slot) = slots.get(&neighbor) {
            sum += slot;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f32)
}

fn centred_slots<N>(layers: &[Vec<N>]) -> HashMap<N, f32>
where
    N: Copy + Ord + Hash,
{
    layers
        .iter()
        .flat_map(|layer| {
            layer
                .iter()
                .enumerate()
                .map(|(index, &node)| (node, centred_slot(index, layer.len())))
        })
        .collect()
}

/// Slot index relative to the middle of the layer, layers are centred when
/// coordinates are assigned
fn centred_slot(index: usize, len: usize) -> f32 {
    index as f32 - (len as f32 - 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_children_follow_their_parents() {
        // Initial layer 1 order crosses both edges
        let mut graph = DiGraphMap::<u32, ()>::new();
        for node in [1, 2, 4, 3] {
            graph.add_node(node);
        }
        graph.add_edge(1, 3, ());
        graph.add_edge(2, 4, ());

        let layers = vec![vec![1, 2], vec![4, 3]];
        assert_eq!(count_crossings(&graph, &layers), 1);

        let ordered = order_layers(&graph, layers, 4);
        assert_eq!(count_crossings(&graph, &ordered), 0);
        assert_eq!(ordered[1], vec![3, 4]);
    }

    #[test]
    fn test_no_sweep_keeps_order() {
        let graph = DiGraphMap::<u32, ()>::from_edges([(1, 4), (2, 3)]);
        let layers = vec![vec![1, 2], vec![3, 4]];
        let ordered = order_layers(&graph, layers.clone(), 0);
        assert_eq!(ordered, layers);
    }

    #[test]
    fn test_centred_slot() {
        assert_eq!(centred_slot(0, 1), 0.0);
        assert_eq!(centred_slot(0, 3), -1.0);
        assert_eq!(centred_slot(2, 3), 1.0);
        assert_eq!(centred_slot(1, 2), 0.5);
    }
}
