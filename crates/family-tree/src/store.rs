use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, warn};

use crate::{
    layout, InvalidOperation, LayoutConfig, Person, PersonFields, PersonId, PersonPatch, Snapshot,
    TreeError, TreeLayout,
};

/// Single source of truth for people and their relationships
///
/// Every structural edit goes through this type. Edits validate first and
/// mutate second, so a failed edit leaves the store untouched, and both sides
/// of an edge are always written together.
#[derive(Debug, Clone, Default)]
pub struct FamilyTree {
    people: BTreeMap<PersonId, Person>,
    next_id: u64,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot
    ///
    /// New ids are allocated after the largest id of the snapshot.
    ///
    /// # Errors
    /// - Any invariant violation reported by [`Snapshot::validate`]
    /// - `IdsExhausted` if the snapshot uses `u64::MAX` as an id
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, TreeError> {
        let next_id = snapshot
            .validate()
            .and_then(|()| {
                snapshot
                    .people
                    .iter()
                    .map(|person| u64::from(person.id))
                    .max()
                    .map_or(Some(0), |max| max.checked_add(1))
                    .ok_or(InvalidOperation::IdsExhausted.into())
            })
            .inspect_err(|err| warn!("Refusing snapshot: {err}"))?;
        let people = snapshot
            .people
            .into_iter()
            .map(|person| (person.id, person))
            .collect();

        let tree = Self { people, next_id };
        debug!("Loaded family tree with {} people", tree.len());
        Ok(tree)
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.people.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// People in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    /// Insert a new person, optionally as the child of an existing one
    ///
    /// # Errors
    /// - `NotFound` if `parent` is given but does not exist
    /// - `InvalidOperation` if a required field is blank or the id space is
    ///   used up
    pub fn create(
        &mut self,
        fields: PersonFields,
        parent: Option<PersonId>,
    ) -> Result<PersonId, TreeError> {
        let next_id = fields
            .validate()
            .and_then(|()| match parent {
                Some(parent) => self.require(parent),
                None => Ok(()),
            })
            .and_then(|()| {
                self.next_id
                    .checked_add(1)
                    .ok_or(InvalidOperation::IdsExhausted.into())
            })
            .inspect_err(|err| warn!("Rejected new person: {err}"))?;

        let id = PersonId::from(self.next_id);
        self.next_id = next_id;
        self.people.insert(id, Person::new(id, fields));

        if let Some(parent) = parent {
            self.link(parent, id);
        }

        debug!("Created person {id} (parent = {parent:?})");
        Ok(id)
    }

    /// Record `child` as a child of `parent`, both people already exist
    ///
    /// # Errors
    /// - `InvalidOperation` if `parent == child`, if the edge already exists,
    ///   or if `parent` descends from `child`
    /// - `NotFound` if either person does not exist
    pub fn connect_as_child(&mut self, parent: PersonId, child: PersonId) -> Result<(), TreeError> {
        self.check_connect(parent, child)
            .inspect_err(|err| warn!("Rejected link {parent} -> {child}: {err}"))?;

        self.link(parent, child);
        debug!("Linked {parent} -> {child}");
        Ok(())
    }

    /// Remove the `parent` to `child` edge
    ///
    /// # Errors
    /// - `NotFound` if either person does not exist
    /// - `InvalidOperation` if there is no such edge
    pub fn disconnect(&mut self, parent: PersonId, child: PersonId) -> Result<(), TreeError> {
        self.require(parent)
            .and_then(|()| self.require(child))
            .and_then(|()| {
                if self.has_edge(parent, child) {
                    Ok(())
                } else {
                    Err(InvalidOperation::MissingEdge { parent, child }.into())
                }
            })
            .inspect_err(|err| warn!("Rejected unlink {parent} -> {child}: {err}"))?;

        self.unlink(parent, child);
        debug!("Unlinked {parent} -> {child}");
        Ok(())
    }

    /// Replace the scalar fields present in `patch`
    ///
    /// A person that is living after the update has no death date.
    ///
    /// # Errors
    /// - `NotFound` if the person does not exist
    /// - `InvalidOperation` if a required field would become blank
    pub fn update(&mut self, id: PersonId, patch: PersonPatch) -> Result<&Person, TreeError> {
        let person = self.people.get_mut(&id).ok_or(TreeError::NotFound(id))?;

        let fields = patch.apply_to(person.fields());
        fields
            .validate()
            .inspect_err(|err| warn!("Rejected update of {id}: {err}"))?;

        person.first_name = fields.first_name;
        person.last_name = fields.last_name;
        person.birth_date = fields.birth_date;
        person.death_date = fields.death_date;
        person.is_living = fields.is_living;

        debug!("Updated person {id}");
        Ok(&*person)
    }

    /// Marry two people, divorcing them from any previous spouse first
    ///
    /// # Errors
    /// - `InvalidOperation` if `a == b`
    /// - `NotFound` if either person does not exist
    pub fn set_spouse(&mut self, a: PersonId, b: PersonId) -> Result<(), TreeError> {
        let check = if a == b {
            Err(InvalidOperation::SelfLink(a).into())
        } else {
            self.require(a).and_then(|()| self.require(b))
        };
        check.inspect_err(|err| warn!("Rejected marriage {a} <-> {b}: {err}"))?;

        if self.spouse_of(a) == Some(b) {
            return Ok(());
        }

        self.clear_spouse(a)?;
        self.clear_spouse(b)?;
        self.marry(a, b);

        debug!("Married {a} <-> {b}");
        Ok(())
    }

    /// Remove the spouse link of a person, returning the former spouse
    ///
    /// # Errors
    /// `NotFound` if the person does not exist
    pub fn clear_spouse(&mut self, id: PersonId) -> Result<Option<PersonId>, TreeError> {
        let person = self.people.get_mut(&id).ok_or(TreeError::NotFound(id))?;
        let former = person.spouse.take();

        if let Some(former) = former {
            if let Some(other) = self.people.get_mut(&former) {
                other.spouse = None;
            }
            debug!("Divorced {id} <-> {former}");
        }

        Ok(former)
    }

    /// Remove a person and every reference to them
    ///
    /// # Errors
    /// `NotFound` if the person does not exist
    pub fn delete(&mut self, id: PersonId) -> Result<Person, TreeError> {
        self.require(id)
            .inspect_err(|err| warn!("Rejected delete: {err}"))?;

        // Collect first, then prune, the map is not walked while mutated
        let referencing: Vec<PersonId> = self
            .people
            .values()
            .filter(|person| person.id != id)
            .filter(|person| {
                person.parents.contains(&id)
                    || person.children.contains(&id)
                    || person.spouse == Some(id)
            })
            .map(|person| person.id)
            .collect();

        for other in &referencing {
            if let Some(person) = self.people.get_mut(other) {
                person.parents.retain(|&parent| parent != id);
                person.children.retain(|&child| child != id);
                if person.spouse == Some(id) {
                    person.spouse = None;
                }
            }
        }

        let removed = self.people.remove(&id).ok_or(TreeError::NotFound(id))?;
        debug!(
            "Deleted person {id}, pruned {} references",
            referencing.len()
        );
        Ok(removed)
    }

    /// Every ancestor of a person, in creation order
    ///
    /// # Errors
    /// `NotFound` if the person does not exist
    pub fn ancestors(&self, id: PersonId) -> Result<Vec<PersonId>, TreeError> {
        self.require(id)?;
        Ok(self.reachable(id, |person| &person.parents).into_iter().collect())
    }

    /// Every descendant of a person, in creation order
    ///
    /// # Errors
    /// `NotFound` if the person does not exist
    pub fn descendants(&self, id: PersonId) -> Result<Vec<PersonId>, TreeError> {
        self.require(id)?;
        Ok(self.reachable(id, |person| &person.children).into_iter().collect())
    }

    /// Owned copy of the whole tree, in creation order
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.people.values().cloned().collect())
    }

    /// Lay the current tree out
    ///
    /// # Errors
    /// `CyclicGraph` if the tree has a cycle, which the store never creates
    pub fn layout(&self, config: &LayoutConfig) -> Result<TreeLayout, TreeError> {
        layout(&self.snapshot(), config)
    }

    fn require(&self, id: PersonId) -> Result<(), TreeError> {
        if self.people.contains_key(&id) {
            Ok(())
        } else {
            Err(TreeError::NotFound(id))
        }
    }

    fn check_connect(&self, parent: PersonId, child: PersonId) -> Result<(), TreeError> {
        if parent == child {
            return Err(InvalidOperation::SelfLink(parent).into());
        }
        self.require(parent)?;
        self.require(child)?;

        if self.has_edge(parent, child) {
            return Err(InvalidOperation::DuplicateEdge { parent, child }.into());
        }
        if self.reachable(child, |person| &person.children).contains(&parent) {
            return Err(InvalidOperation::WouldCreateCycle { parent, child }.into());
        }
        Ok(())
    }

    fn has_edge(&self, parent: PersonId, child: PersonId) -> bool {
        self.people
            .get(&child)
            .is_some_and(|person| person.parents.contains(&parent))
    }

    fn spouse_of(&self, id: PersonId) -> Option<PersonId> {
        self.people.get(&id).and_then(|person| person.spouse)
    }

    /// Write both sides of a parent to child edge
    fn link(&mut self, parent: PersonId, child: PersonId) {
        if let Some(person) = self.people.get_mut(&parent) {
            person.children.push(child);
        }
        if let Some(person) = self.people.get_mut(&child) {
            person.parents.push(parent);
        }
    }

    /// Remove both sides of a parent to child edge
    fn unlink(&mut self, parent: PersonId, child: PersonId) {
        if let Some(person) = self.people.get_mut(&parent) {
            person.children.retain(|&id| id != child);
        }
        if let Some(person) = self.people.get_mut(&child) {
            person.parents.retain(|&id| id != parent);
        }
    }

    fn marry(&mut self, a: PersonId, b: PersonId) {
        if let Some(person) = self.people.get_mut(&a) {
            person.spouse = Some(b);
        }
        if let Some(person) = self.people.get_mut(&b) {
            person.spouse = Some(a);
        }
    }

    /// Transitive closure along the given adjacency, `start` excluded
    fn reachable<F>(&self, start: PersonId, next: F) -> BTreeSet<PersonId>
    where
        F: Fn(&Person) -> &Vec<PersonId>,
    {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let Some(person) = self.people.get(&current) else {
                continue;
            };
            for &id in next(person) {
                if visited.insert(id) {
                    queue.push_back(id);
                }
            }
        }

        visited.remove(&start);
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn fields(name: &str) -> PersonFields {
        PersonFields::new(name, "Papadopoulos", "1900")
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut tree = FamilyTree::new();
        let a = tree.create(fields("A"), None).unwrap();
        let b = tree.create(fields("B"), None).unwrap();
        assert!(a < b);
        let order: Vec<_> = tree.iter().map(|p| p.id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_create_with_missing_parent_inserts_nothing() {
        let mut tree = FamilyTree::new();
        let err = tree.create(fields("A"), Some(PersonId::from(7))).unwrap_err();
        assert_eq!(err, TreeError::NotFound(PersonId::from(7)));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_reachable_excludes_start() {
        let mut tree = FamilyTree::new();
        let a = tree.create(fields("A"), None).unwrap();
        let b = tree.create(fields("B"), Some(a)).unwrap();
        let reached = tree.reachable(a, |person| &person.children);
        assert_eq!(reached.into_iter().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_next_id_resumes_after_snapshot() {
        let mut tree = FamilyTree::new();
        tree.create(fields("A"), None).unwrap();
        let b = tree.create(fields("B"), None).unwrap();

        let mut restored = FamilyTree::from_snapshot(tree.snapshot()).unwrap();
        let c = restored.create(fields("C"), None).unwrap();
        assert!(c > b);
    }
}
