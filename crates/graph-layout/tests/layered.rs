use graph_layout::{LayeredLayout, LayeredLayoutError, LayoutEngine, Ranking, Vec2};
use petgraph::graph::DiGraph;
use petgraph::graphmap::DiGraphMap;
use test_log::test;

fn engine() -> LayeredLayout {
    LayeredLayout::new(Vec2::new(50.0, 50.0))
}

const NODE: Vec2 = Vec2 { x: 220.0, y: 100.0 };

#[test]
fn test_forest_roots_share_layer_zero() {
    let mut graph = DiGraphMap::<u32, ()>::new();
    graph.add_node(1);
    graph.add_node(2);
    graph.add_node(3);

    let layers = engine().compute_layers(&graph).unwrap();
    assert_eq!(layers.nodes, vec![vec![1, 2, 3]]);

    let positions = engine().compute_positions(&layers, &NODE);
    assert_eq!(positions.len(), 3);
    assert!(positions.values().all(|p| p.y == 0.0));
    assert!(positions[&1].x < positions[&2].x);
    assert!(positions[&2].x < positions[&3].x);
}

#[test]
fn test_layout_is_deterministic() {
    let edges = [(1, 4), (2, 4), (2, 5), (3, 6), (4, 7), (5, 7), (6, 8), (1, 8)];
    let graph = DiGraphMap::<u32, ()>::from_edges(edges);

    let first = engine().layout(&graph, &NODE).unwrap();
    for _ in 0..5 {
        let rebuilt = DiGraphMap::<u32, ()>::from_edges(edges);
        assert_eq!(engine().layout(&rebuilt, &NODE).unwrap(), first);
    }
}

#[test]
fn test_works_with_index_graphs() {
    let mut graph = DiGraph::<&str, ()>::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let c = graph.add_node("c");
    graph.add_edge(a, b, ());
    graph.add_edge(b, c, ());
    graph.add_edge(a, c, ());

    let layers = engine().compute_layers(&graph).unwrap();
    assert_eq!(layers.rank(a), Some(0));
    assert_eq!(layers.rank(b), Some(1));
    assert_eq!(layers.rank(c), Some(2));
}

#[test]
fn test_cycle_is_reported() {
    let graph = DiGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3), (3, 1)]);
    let err = engine().layout(&graph, &NODE).unwrap_err();
    let LayeredLayoutError::GraphHasCycle(node) = err;
    assert!([1, 2, 3].contains(&node));
}

#[test]
fn test_compact_ranking_is_opt_in() {
    let graph = DiGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3), (4, 3)]);

    let longest = engine().compute_layers(&graph).unwrap();
    assert_eq!(longest.rank(4), Some(0));

    let compact = LayeredLayout {
        ranking: Ranking::Compact,
        ..engine()
    };
    assert_eq!(compact.compute_layers(&graph).unwrap().rank(4), Some(1));
}

#[test]
fn test_empty_graph() {
    let graph = DiGraphMap::<u32, ()>::new();
    let layers = engine().compute_layers(&graph).unwrap();
    assert!(layers.is_empty());
    assert!(engine().compute_positions(&layers, &NODE).is_empty());
}
