use graph_layout::LayeredLayoutError;
use thiserror::Error;

use crate::PersonId;

/// Errors surfaced by the store and the tree layout
///
/// A failed operation never leaves the store partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The operation references a person absent from the store
    #[error("person {0} not found")]
    NotFound(PersonId),

    /// The operation would break one of the graph invariants
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] InvalidOperation),

    /// The graph has a cycle and cannot be ranked
    #[error("family graph contains a cycle through person {0}")]
    CyclicGraph(PersonId),
}

/// Why an edit was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOperation {
    #[error("person {0} cannot be related to themself")]
    SelfLink(PersonId),

    #[error("person {child} already has {parent} as a parent")]
    DuplicateEdge { parent: PersonId, child: PersonId },

    #[error("person {child} is not a child of {parent}")]
    MissingEdge { parent: PersonId, child: PersonId },

    #[error("person {parent} descends from {child}, linking them would create a cycle")]
    WouldCreateCycle { parent: PersonId, child: PersonId },

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),

    #[error("no person ids left to allocate")]
    IdsExhausted,
}

impl From<LayeredLayoutError<PersonId>> for TreeError {
    fn from(err: LayeredLayoutError<PersonId>) -> Self {
        match err {
            LayeredLayoutError::GraphHasCycle(id) => TreeError::CyclicGraph(id),
        }
    }
}
