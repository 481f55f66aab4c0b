//! Generic graph layout algorithms
//!
//! This crate provides layout algorithms for directed graphs that work with
//! any graph data structure implementing petgraph's visitor traits. It knows
//! nothing about what the nodes represent.
//!
//! # Layout Engines
//!
//! - [`LayeredLayout`]: Sugiyama-style top-to-bottom layered layout for DAGs
//!
//! # Example
//!
//! ```
//! use graph_layout::{LayeredLayout, LayoutEngine, Vec2};
//! use petgraph::graphmap::DiGraphMap;
//!
//! // Create a graph
//! let mut graph = DiGraphMap::new();
//! graph.add_edge(1, 2, ());
//! graph.add_edge(2, 3, ());
//!
//! // Create a layout engine
//! let engine = LayeredLayout::new(Vec2::new(20.0, 20.0));
//!
//! // Provide node sizes
//! let sizes = |_node| Vec2::new(100.0, 50.0);
//!
//! // Use the LayoutEngine trait (simple, single-phase):
//! let positions = engine.layout(&graph, &sizes).unwrap();
//! assert!(positions[&1].y < positions[&2].y);
//!
//! // Or directly by calling each step for better control
//! let layers = engine.compute_layers(&graph).unwrap();
//! assert_eq!(layers.rank(3), Some(2));
//! let positions = engine.compute_positions(&layers, &sizes);
//! ```

mod engine;
mod geometry;
mod sizes;

pub mod layered;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use geometry::{Point, Vec2};
pub use sizes::NodeSizes;

// Re-export petgraph visitor traits for graph abstraction
pub use petgraph::visit::{GraphBase, IntoNeighborsDirected, IntoNodeIdentifiers};
pub use petgraph::Direction;

// Re-export layered layout types
pub use layered::{LayeredLayout, LayeredLayoutError, Layers, Ranking};
