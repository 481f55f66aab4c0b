use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::{InvalidOperation, Person, PersonId, TreeError};

/// Owned copy of every person, in creation order
///
/// This is the shape consumed by the layout and by whatever persists the
/// tree. Edges are derived from the adjacency lists, never stored apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub people: Vec<Person>,
}

impl Snapshot {
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Parent to child edges, listed parent by parent in snapshot order
    ///
    /// An edge is only reported when both sides agree on it.
    pub fn edges(&self) -> Vec<(PersonId, PersonId)> {
        let parents_of: HashMap<PersonId, &[PersonId]> = self
            .people
            .iter()
            .map(|person| (person.id, person.parents.as_slice()))
            .collect();

        let mut edges = Vec::new();
        for person in &self.people {
            for &child in &person.children {
                let agreed = parents_of
                    .get(&child)
                    .is_some_and(|parents| parents.contains(&person.id));
                if agreed {
                    edges.push((person.id, child));
                }
            }
        }
        edges
    }

    /// Fresh directed graph of the snapshot, nodes inserted in snapshot order
    pub fn graph(&self) -> DiGraphMap<PersonId, ()> {
        let mut graph = DiGraphMap::with_capacity(self.people.len(), self.people.len());
        for person in &self.people {
            graph.add_node(person.id);
        }
        for (parent, child) in self.edges() {
            graph.add_edge(parent, child, ());
        }
        graph
    }

    /// Check every invariant the store maintains
    ///
    /// # Errors
    /// - `NotFound` for a reference to a person missing from the snapshot
    /// - `InvalidOperation` for duplicate ids, self links, duplicate edges,
    ///   blank fields, living people with a death date, one-sided edges or
    ///   one-sided spouse links
    /// - `CyclicGraph` if somebody is their own ancestor
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut by_id: HashMap<PersonId, &Person> = HashMap::with_capacity(self.people.len());
        for person in &self.people {
            if by_id.insert(person.id, person).is_some() {
                return Err(inconsistent(format!("duplicate person id {}", person.id)));
            }
        }

        for person in &self.people {
            person.fields().validate()?;
            if person.is_living && person.death_date.is_some() {
                return Err(inconsistent(format!(
                    "{} is living but has a death date",
                    person.id
                )));
            }

            if person.parents.contains(&person.id)
                || person.children.contains(&person.id)
                || person.spouse == Some(person.id)
            {
                return Err(InvalidOperation::SelfLink(person.id).into());
            }

            let mut seen = HashSet::new();
            for &parent in &person.parents {
                if !seen.insert(parent) {
                    return Err(InvalidOperation::DuplicateEdge {
                        parent,
                        child: person.id,
                    }
                    .into());
                }
                let other = by_id.get(&parent).ok_or(TreeError::NotFound(parent))?;
                if !other.children.contains(&person.id) {
                    return Err(inconsistent(format!(
                        "{} lists {parent} as a parent, but {parent} does not list it as a child",
                        person.id
                    )));
                }
            }

            let mut seen = HashSet::new();
            for &child in &person.children {
                if !seen.insert(child) {
                    return Err(InvalidOperation::DuplicateEdge {
                        parent: person.id,
                        child,
                    }
                    .into());
                }
                let other = by_id.get(&child).ok_or(TreeError::NotFound(child))?;
                if !other.parents.contains(&person.id) {
                    return Err(inconsistent(format!(
                        "{} lists {child} as a child, but {child} does not list it as a parent",
                        person.id
                    )));
                }
            }

            if let Some(spouse) = person.spouse {
                let other = by_id.get(&spouse).ok_or(TreeError::NotFound(spouse))?;
                if other.spouse != Some(person.id) {
                    return Err(inconsistent(format!(
                        "{} is married to {spouse}, but not the other way around",
                        person.id
                    )));
                }
            }
        }

        toposort(&self.graph(), None).map_err(|cycle| TreeError::CyclicGraph(cycle.node_id()))?;

        Ok(())
    }
}

fn inconsistent(message: String) -> TreeError {
    InvalidOperation::Inconsistent(message).into()
}
