use crate::{NodeSizes, Point, Vec2};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::HashMap;
use std::hash::Hash;

/// Assign coordinates to nodes based on their layer structure and sizes
///
/// Layers are stacked top to bottom. Positions are the top-left corners of
/// the node boxes and start at (0, 0).
pub(crate) fn assign_coordinates<N, S>(
    layers: &[Vec<N>],
    graph: &DiGraphMap<N, ()>,
    sizes: &S,
    margin: Vec2,
    max_position_iterations: usize,
) -> HashMap<N, Point>
where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let mut positions = HashMap::new();

    // First pass: Vertical positioning
    assign_vertical_positions(layers, sizes, &mut positions, margin);

    // Second pass: Horizontal positioning
    assign_horizontal_positions(
        layers,
        graph,
        &mut positions,
        sizes,
        margin,
        max_position_iterations,
    );

    positions
}

/// Assign vertical positions based on layers, each node centred in the
/// height of its layer
fn assign_vertical_positions<N, S>(
    layers: &[Vec<N>],
    sizes: &S,
    positions: &mut HashMap<N, Point>,
    margin: Vec2,
) where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let mut y = 0.0;
    for layer in layers {
        let layer_height = layer
            .iter()
            .map(|&node| sizes.size(node).y)
            .fold(0.0, f32::max);

        for &node in layer {
            let node_height = sizes.size(node).y;
            positions.insert(node, Point::new(0.0, y + (layer_height - node_height) / 2.0));
        }
        y += layer_height + margin.y;
    }
}

/// Assign horizontal positions with optional barycenter optimization
fn assign_horizontal_positions<N, S>(
    layers: &[Vec<N>],
    graph: &DiGraphMap<N, ()>,
    positions: &mut HashMap<N, Point>,
    sizes: &S,
    margin: Vec2,
    max_iterations: usize,
) where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    // Initial positioning
    initial_horizontal_positioning(layers, positions, sizes, margin);

    // Iterative optimization, parents are pulled over their children
    for _ in 0..max_iterations {
        let mut changed = false;

        for layer_idx in (0..layers.len().saturating_sub(1)).rev() {
            let layer = &layers[layer_idx];
            for &node in layer {
                let Some(new_x) = calculate_barycenter(node, graph, positions, sizes) else {
                    continue;
                };

                let Some(pos) = positions.get_mut(&node) else {
                    continue;
                };

                if (new_x - pos.x).abs() > 0.1 {
                    pos.x = new_x;
                    changed = true;
                }
            }

            // Enforce minimum horizontal distance, keeping the layer order
            for pair in layer.windows(2) {
                let (prev_node, curr_node) = (pair[0], pair[1]);
                let prev_right = positions[&prev_node].x + sizes.size(prev_node).x;
                let Some(curr) = positions.get_mut(&curr_node) else {
                    continue;
                };

                if curr.x < prev_right + margin.x {
                    curr.x = prev_right + margin.x;
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    // Final adjustments
    normalize_horizontal_positions(positions);
}

/// Calculate the barycenter (average centre) of a node's successors, as the
/// left coordinate the node needs to sit centred above them
fn calculate_barycenter<N, S>(
    node: N,
    graph: &DiGraphMap<N, ()>,
    positions: &HashMap<N, Point>,
    sizes: &S,
) -> Option<f32>
where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let mut sum_x = 0.0;
    let mut count = 0;

    for next_node in graph.neighbors_directed(node, Direction::Outgoing) {
        if let Some(pos) = positions.get(&next_node) {
            sum_x += pos.x + sizes.size(next_node).x / 2.0;
            count += 1;
        }
    }

    let node_width = sizes.size(node).x;

    if count > 0 {
        Some((sum_x / count as f32) - node_width / 2.0)
    } else {
        None
    }
}

/// Initial horizontal positioning: sequential slots, every layer centred on
/// the widest one
fn initial_horizontal_positioning<N, S>(
    layers: &[Vec<N>],
    positions: &mut HashMap<N, Point>,
    sizes: &S,
    margin: Vec2,
) where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let layer_widths: Vec<f32> = layers
        .iter()
        .map(|layer| {
            let nodes_width: f32 = layer.iter().map(|&node| sizes.size(node).x).sum();
            nodes_width + margin.x * layer.len().saturating_sub(1) as f32
        })
        .collect();
    let max_width = layer_widths.iter().copied().fold(0.0, f32::max);

    for (layer, layer_width) in layers.iter().zip(layer_widths) {
        let mut x = (max_width - layer_width) / 2.0;
        for &node in layer {
            if let Some(pos) = positions.get_mut(&node) {
                pos.x = x;
                x += margin.x + sizes.size(node).x;
            }
        }
    }
}

/// Normalize horizontal positions to start from x=0
fn normalize_horizontal_positions<N>(positions: &mut HashMap<N, Point>)
where
    N: Copy + Ord + Hash,
{
    let min_x = positions
        .values()
        .map(|pos| pos.x)
        .min_by(f32::total_cmp)
        .unwrap_or(0.0);

    for pos in positions.values_mut() {
        pos.x -= min_x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const SIZE: Vec2 = Vec2 { x: 100.0, y: 50.0 };
    const MARGIN: Vec2 = Vec2 { x: 10.0, y: 20.0 };

    #[test]
    fn test_layers_stack_top_to_bottom() {
        let graph = DiGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]);
        let layers = vec![vec![1], vec![2], vec![3]];
        let positions = assign_coordinates(&layers, &graph, &SIZE, MARGIN, 0);

        assert_eq!(positions[&1], Point::new(0.0, 0.0));
        assert_eq!(positions[&2], Point::new(0.0, 70.0));
        assert_eq!(positions[&3], Point::new(0.0, 140.0));
    }

    #[test]
    fn test_narrow_layer_is_centred() {
        let graph = DiGraphMap::<u32, ()>::from_edges([(1, 3), (2, 3)]);
        let layers = vec![vec![1, 2], vec![3]];
        let positions = assign_coordinates(&layers, &graph, &SIZE, MARGIN, 0);

        assert_eq!(positions[&1].x, 0.0);
        assert_eq!(positions[&2].x, 110.0);
        // Layer 0 is 210 wide, the single node sits in the middle
        assert_eq!(positions[&3].x, 55.0);
    }

    #[test]
    fn test_parent_moves_over_children() {
        // 1 has both children on the right side of the lower layer
        let mut graph = DiGraphMap::<u32, ()>::from_edges([(1, 4), (1, 5)]);
        graph.add_node(2);
        graph.add_node(3);
        let layers = vec![vec![1], vec![2, 3, 4, 5]];

        let fixed = assign_coordinates(&layers, &graph, &SIZE, MARGIN, 0);
        let refined = assign_coordinates(&layers, &graph, &SIZE, MARGIN, 10);

        let children_centre = (refined[&4].x + refined[&5].x) / 2.0;
        assert_eq!(refined[&1].x, children_centre);
        assert_ne!(fixed[&1].x, refined[&1].x);
    }

    #[test]
    fn test_refinement_keeps_spacing() {
        // Both parents want to sit over the same child
        let graph = DiGraphMap::<u32, ()>::from_edges([(1, 3), (2, 3)]);
        let layers = vec![vec![1, 2], vec![3]];
        let positions = assign_coordinates(&layers, &graph, &SIZE, MARGIN, 50);

        assert!(positions[&2].x - positions[&1].x >= SIZE.x + MARGIN.x);
        assert!(positions.values().all(|p| p.x >= 0.0));
    }
}
