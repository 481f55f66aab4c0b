//! Genealogical relationship graph and its automatic layout
//!
//! [`FamilyTree`] owns people and their parent/child relationships and keeps
//! them consistent under edits. [`FamilyTree::snapshot`] hands out an owned
//! copy, which [`layout`] turns into one row per generation using the layered
//! layout of the `graph-layout` crate.
//!
//! ```
//! use family_tree::{FamilyTree, LayoutConfig, PersonFields};
//!
//! let mut tree = FamilyTree::new();
//! let anna = tree.create(PersonFields::new("Anna", "Ioannou", "1920").died("1999"), None)?;
//! let nikos = tree.create(PersonFields::new("Nikos", "Ioannou", "1948"), Some(anna))?;
//!
//! let layout = tree.layout(&LayoutConfig::default())?;
//! assert_eq!(layout.rank(anna), Some(0));
//! assert_eq!(layout.rank(nikos), Some(1));
//! # Ok::<(), family_tree::TreeError>(())
//! ```

mod error;
mod layout;
mod person;
mod snapshot;
mod store;

pub mod seed;

pub use error::{InvalidOperation, TreeError};
pub use layout::{layout, LayoutConfig, LayoutEdge, Placement, TreeLayout};
pub use person::{Person, PersonFields, PersonId, PersonPatch};
pub use snapshot::Snapshot;
pub use store::FamilyTree;
