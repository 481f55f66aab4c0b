use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::HashMap;
use std::hash::Hash;

/// Minimize edge crossings by swapping adjacent nodes in layers
///
/// Greedy local search: a swap is kept only if it strictly lowers the number
/// of crossings around the swapped layer, so the barycenter order survives
/// wherever it is already as good.
pub(crate) fn minimize_crossings<N>(
    graph: &DiGraphMap<N, ()>,
    mut layers: Vec<Vec<N>>,
    max_iterations: usize,
) -> Vec<Vec<N>>
where
    N: Copy + Ord + Hash,
{
    for _ in 0..max_iterations {
        let mut improved = false;

        for layer_index in 0..layers.len() {
            let layer_len = layers[layer_index].len();
            for i in 0..layer_len.saturating_sub(1) {
                let crossings_before = count_crossings_around(graph, &layers, layer_index);
                layers[layer_index].swap(i, i + 1);
                let crossings_after = count_crossings_around(graph, &layers, layer_index);

                if crossings_after < crossings_before {
                    improved = true;
                } else {
                    // Swap back if no improvement
                    layers[layer_index].swap(i, i + 1);
                }
            }
        }

        if !improved {
            break;
        }
    }

    layers
}

/// Count the number of edge crossings between adjacent layers
///
/// Edges spanning more than one layer are not counted.
pub(crate) fn count_crossings<N>(graph: &DiGraphMap<N, ()>, layers: &[Vec<N>]) -> usize
where
    N: Copy + Ord + Hash,
{
    (0..layers.len().saturating_sub(1))
        .map(|i| count_between(graph, &layers[i], &layers[i + 1]))
        .sum()
}

/// Crossings between the given layer and both of its neighbours
fn count_crossings_around<N>(graph: &DiGraphMap<N, ()>, layers: &[Vec<N>], index: usize) -> usize
where
    N: Copy + Ord + Hash,
{
    let above = match index {
        0 => 0,
        _ => count_between(graph, &layers[index - 1], &layers[index]),
    };
    let below = match layers.get(index + 1) {
        Some(lower) => count_between(graph, &layers[index], lower),
        None => 0,
    };
    above + below
}

fn count_between<N>(graph: &DiGraphMap<N, ()>, upper_layer: &[N], lower_layer: &[N]) -> usize
where
    N: Copy + Ord + Hash,
{
    let lower_positions: HashMap<N, usize> = lower_layer
        .iter()
        .enumerate()
        .map(|(index, &node)| (node, index))
        .collect();

    // (upper position, lower position) of every edge between the two layers,
    // sorted by upper position since we iterate the upper layer in order
    let edges: Vec<(usize, usize)> = upper_layer
        .iter()
        .enumerate()
        .flat_map(|(upper, &node)| {
            graph
                .neighbors_directed(node, Direction::Outgoing)
                .filter_map(|target| lower_positions.get(&target).map(|&lower| (upper, lower)))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut crossings = 0;
    for (i, &(upper1, lower1)) in edges.iter().enumerate() {
        for &(upper2, lower2) in &edges[i + 1..] {
            if upper1 != upper2 && lower1 != lower2 && (upper1 < upper2) != (lower1 < lower2) {
                crossings += 1;
            }
        }
    }

    crossings
}
