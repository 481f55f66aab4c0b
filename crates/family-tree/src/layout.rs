use graph_layout::{LayeredLayout, Ranking, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PersonId, Snapshot, TreeError};

/// Layout settings, every field has a default so partial config files work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of every person box
    pub node_width: f32,
    /// Height of every person box
    pub node_height: f32,
    /// Horizontal gap between boxes of the same generation
    pub node_spacing: f32,
    /// Vertical gap between generations
    pub rank_spacing: f32,
    /// Empty border around the whole drawing
    pub margin: f32,
    /// Pull people down next to their children instead of keeping every
    /// root on the top generation
    pub compact_ranks: bool,
    pub ordering_sweeps: usize,
    pub max_crossing_iterations: usize,
    /// Zero keeps every box on its sequential slot
    pub max_position_iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 100.0,
            node_spacing: 50.0,
            rank_spacing: 50.0,
            margin: 50.0,
            compact_ranks: false,
            ordering_sweeps: 4,
            max_crossing_iterations: 10,
            max_position_iterations: 0,
        }
    }
}

impl LayoutConfig {
    pub fn node_size(&self) -> Vec2 {
        Vec2::new(self.node_width, self.node_height)
    }

    /// Build a fresh layout engine for one computation
    pub fn engine(&self) -> LayeredLayout {
        LayeredLayout {
            margin: Vec2::new(self.node_spacing, self.rank_spacing),
            ranking: if self.compact_ranks {
                Ranking::Compact
            } else {
                Ranking::LongestPath
            },
            ordering_sweeps: self.ordering_sweeps,
            max_crossing_iterations: self.max_crossing_iterations,
            max_position_iterations: self.max_position_iterations,
        }
    }
}

/// Where a person goes, `x` and `y` are the top-left corner of its box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: PersonId,
    /// Generation, 0 for the top row
    pub rank: usize,
    pub x: f32,
    pub y: f32,
}

/// A parent to child edge to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub source: PersonId,
    pub target: PersonId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    /// One placement per person, in snapshot order
    pub placements: Vec<Placement>,
    pub edges: Vec<LayoutEdge>,
    /// Size of the drawing, margins included
    pub width: f32,
    pub height: f32,
    /// Edge crossings left between adjacent generations
    pub crossings: usize,
}

impl TreeLayout {
    pub fn placement(&self, id: PersonId) -> Option<&Placement> {
        self.placements.iter().find(|placement| placement.id == id)
    }

    pub fn rank(&self, id: PersonId) -> Option<usize> {
        self.placement(id).map(|placement| placement.rank)
    }
}

/// Lay a snapshot out top to bottom, one row per generation
///
/// The snapshot is not validated, it is expected to come from the store.
/// Its order is the tie-break, so the same snapshot always gives the same
/// layout.
///
/// # Errors
/// `CyclicGraph` if somebody is their own ancestor
pub fn layout(snapshot: &Snapshot, config: &LayoutConfig) -> Result<TreeLayout, TreeError> {
    let graph = snapshot.graph();
    debug!(
        "Laying out {} people and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let engine = config.engine();
    let layers = engine.compute_layers(&graph)?;
    let ranks = layers.ranks();
    let positions = engine.compute_positions(&layers, &config.node_size());

    let offset = Vec2::new(config.margin, config.margin);
    let mut placements = Vec::with_capacity(snapshot.len());
    let mut width: f32 = 0.0;
    let mut height: f32 = 0.0;

    for person in &snapshot.people {
        let (Some(&rank), Some(&position)) = (ranks.get(&person.id), positions.get(&person.id))
        else {
            continue;
        };
        let position = position.offset(offset);
        width = width.max(position.x + config.node_width);
        height = height.max(position.y + config.node_height);
        placements.push(Placement {
            id: person.id,
            rank,
            x: position.x,
            y: position.y,
        });
    }

    let edges = snapshot
        .edges()
        .into_iter()
        .map(|(source, target)| LayoutEdge { source, target })
        .collect();

    debug!(
        "Layout done: {} generations, {} crossings",
        layers.len(),
        layers.crossings
    );

    Ok(TreeLayout {
        placements,
        edges,
        width: width + config.margin,
        height: height + config.margin,
        crossings: layers.crossings,
    })
}
