use family_tree::{
    FamilyTree, InvalidOperation, Person, PersonFields, PersonId, PersonPatch, Snapshot, TreeError,
};
use test_log::test;

fn fields(name: &str) -> PersonFields {
    PersonFields::new(name, "Dimitriou", "1900")
}

/// Both sides of every edge agree, and nothing points at a missing person
fn assert_consistent(tree: &FamilyTree) {
    for person in tree.iter() {
        for &child in &person.children {
            let child = tree.get(child).expect("dangling child");
            assert!(child.parents.contains(&person.id));
        }
        for &parent in &person.parents {
            let parent = tree.get(parent).expect("dangling parent");
            assert!(parent.children.contains(&person.id));
        }
        if let Some(spouse) = person.spouse {
            assert_eq!(tree.get(spouse).expect("dangling spouse").spouse, Some(person.id));
        }
    }
    tree.snapshot().validate().unwrap();
}

#[test]
fn test_create_with_parent_links_both_sides() {
    let mut tree = FamilyTree::new();
    let parent = tree.create(fields("Georgios"), None).unwrap();
    let child = tree.create(fields("Maria"), Some(parent)).unwrap();

    assert_eq!(tree.get(parent).unwrap().children, vec![child]);
    assert_eq!(tree.get(child).unwrap().parents, vec![parent]);
    assert_consistent(&tree);
}

#[test]
fn test_connect_self_is_invalid() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();

    assert_eq!(
        tree.connect_as_child(a, a),
        Err(TreeError::InvalidOperation(InvalidOperation::SelfLink(a)))
    );
    // Even for unknown ids
    let ghost = PersonId::from(99);
    assert!(matches!(
        tree.connect_as_child(ghost, ghost),
        Err(TreeError::InvalidOperation(_))
    ));
    assert_consistent(&tree);
}

#[test]
fn test_connect_duplicate_is_invalid() {
    let mut tree = FamilyTree::new();
    let parent = tree.create(fields("A"), None).unwrap();
    let child = tree.create(fields("B"), Some(parent)).unwrap();

    assert_eq!(
        tree.connect_as_child(parent, child),
        Err(TreeError::InvalidOperation(InvalidOperation::DuplicateEdge {
            parent,
            child
        }))
    );
    assert_eq!(tree.get(parent).unwrap().children.len(), 1);
}

#[test]
fn test_connect_unknown_is_not_found() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let ghost = PersonId::from(99);

    assert_eq!(tree.connect_as_child(a, ghost), Err(TreeError::NotFound(ghost)));
    assert_eq!(tree.connect_as_child(ghost, a), Err(TreeError::NotFound(ghost)));
    assert!(tree.get(a).unwrap().children.is_empty());
}

#[test]
fn test_connect_rejects_cycles() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let b = tree.create(fields("B"), Some(a)).unwrap();
    let c = tree.create(fields("C"), Some(b)).unwrap();

    assert_eq!(
        tree.connect_as_child(c, a),
        Err(TreeError::InvalidOperation(InvalidOperation::WouldCreateCycle {
            parent: c,
            child: a
        }))
    );
    assert!(tree.connect_as_child(b, a).is_err());
    assert!(tree.get(a).unwrap().parents.is_empty());
    assert_consistent(&tree);
}

#[test]
fn test_second_parent_across_branches() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let b = tree.create(fields("B"), None).unwrap();
    let child = tree.create(fields("C"), Some(a)).unwrap();

    tree.connect_as_child(b, child).unwrap();
    assert_eq!(tree.get(child).unwrap().parents, vec![a, b]);
    assert_consistent(&tree);
}

#[test]
fn test_disconnect() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let b = tree.create(fields("B"), Some(a)).unwrap();

    tree.disconnect(a, b).unwrap();
    assert!(tree.get(a).unwrap().children.is_empty());
    assert!(tree.get(b).unwrap().parents.is_empty());

    assert_eq!(
        tree.disconnect(a, b),
        Err(TreeError::InvalidOperation(InvalidOperation::MissingEdge {
            parent: a,
            child: b
        }))
    );
    assert_consistent(&tree);
}

#[test]
fn test_update_fields() {
    let mut tree = FamilyTree::new();
    let id = tree.create(fields("Nikolaos"), None).unwrap();

    let person = tree
        .update(
            id,
            PersonPatch::default()
                .first_name("Nikos")
                .is_living(false)
                .death_date(Some("1970".into())),
        )
        .unwrap();
    assert_eq!(person.first_name, "Nikos");
    assert_eq!(person.death_date.as_deref(), Some("1970"));

    let person = tree.update(id, PersonPatch::default().is_living(true)).unwrap();
    assert!(person.is_living);
    assert_eq!(person.death_date, None);
}

#[test]
fn test_update_rejects_blank_and_keeps_person() {
    let mut tree = FamilyTree::new();
    let id = tree.create(fields("Eleni"), None).unwrap();

    let err = tree.update(id, PersonPatch::default().last_name(" ")).unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidOperation(InvalidOperation::BlankField("last name"))
    );
    assert_eq!(tree.get(id).unwrap().last_name, "Dimitriou");

    let ghost = PersonId::from(99);
    assert_eq!(
        tree.update(ghost, PersonPatch::default()).unwrap_err(),
        TreeError::NotFound(ghost)
    );
}

#[test]
fn test_delete_prunes_every_reference() {
    let mut tree = FamilyTree::new();
    let grandma = tree.create(fields("Grandma"), None).unwrap();
    let mother = tree.create(fields("Mother"), Some(grandma)).unwrap();
    let father = tree.create(fields("Father"), None).unwrap();
    let kid1 = tree.create(fields("Kid1"), Some(mother)).unwrap();
    let kid2 = tree.create(fields("Kid2"), Some(mother)).unwrap();
    tree.connect_as_child(father, kid1).unwrap();
    tree.set_spouse(mother, father).unwrap();

    let removed = tree.delete(mother).unwrap();
    assert_eq!(removed.id, mother);
    assert!(!tree.contains(mother));

    for person in tree.iter() {
        assert!(!person.parents.contains(&mother));
        assert!(!person.children.contains(&mother));
        assert_ne!(person.spouse, Some(mother));
    }
    assert_eq!(tree.get(kid1).unwrap().parents, vec![father]);
    assert!(tree.get(kid2).unwrap().is_root());
    assert!(tree.get(grandma).unwrap().children.is_empty());
    assert_consistent(&tree);

    assert_eq!(tree.delete(mother), Err(TreeError::NotFound(mother)));
}

#[test]
fn test_spouse_links_stay_symmetric() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let b = tree.create(fields("B"), None).unwrap();
    let c = tree.create(fields("C"), None).unwrap();

    tree.set_spouse(a, b).unwrap();
    assert_consistent(&tree);

    // Remarriage divorces the previous couple
    tree.set_spouse(c, a).unwrap();
    assert_eq!(tree.get(a).unwrap().spouse, Some(c));
    assert_eq!(tree.get(b).unwrap().spouse, None);
    assert_consistent(&tree);

    assert_eq!(tree.clear_spouse(c).unwrap(), Some(a));
    assert_eq!(tree.get(a).unwrap().spouse, None);

    assert!(matches!(
        tree.set_spouse(a, a),
        Err(TreeError::InvalidOperation(InvalidOperation::SelfLink(_)))
    ));
}

#[test]
fn test_ancestors_and_descendants() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let b = tree.create(fields("B"), Some(a)).unwrap();
    let c = tree.create(fields("C"), None).unwrap();
    let d = tree.create(fields("D"), Some(b)).unwrap();
    tree.connect_as_child(c, d).unwrap();

    assert_eq!(tree.ancestors(d).unwrap(), vec![a, b, c]);
    assert_eq!(tree.descendants(a).unwrap(), vec![b, d]);
    assert!(tree.ancestors(a).unwrap().is_empty());
}

#[test]
fn test_invariants_hold_over_edit_sequence() {
    let mut tree = FamilyTree::new();
    let mut ids = Vec::new();
    for i in 0..12 {
        let parent = (i % 3 == 1).then(|| ids[i - 1]);
        ids.push(tree.create(fields(&format!("P{i}")), parent).unwrap());
        assert_consistent(&tree);
    }

    // Some of these are rejected, the store must stay consistent either way
    for (parent, child) in [(0, 5), (5, 0), (2, 3), (3, 2), (7, 7), (1, 11), (11, 1)] {
        let _ = tree.connect_as_child(ids[parent], ids[child]);
        assert_consistent(&tree);
    }
    for (parent, child) in [(0, 5), (4, 9)] {
        let _ = tree.disconnect(ids[parent], ids[child]);
        assert_consistent(&tree);
    }
    for id in [ids[1], ids[5], ids[0]] {
        tree.delete(id).unwrap();
        assert_consistent(&tree);
    }
}

#[test]
fn test_snapshot_round_trip_through_store() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let b = tree.create(fields("B").died("1980"), Some(a)).unwrap();
    let c = tree.create(fields("C"), None).unwrap();
    tree.set_spouse(a, c).unwrap();

    let snapshot = tree.snapshot();
    let text = ron::to_string(&snapshot).unwrap();
    let parsed: Snapshot = ron::from_str(&text).unwrap();
    let restored = FamilyTree::from_snapshot(parsed).unwrap();

    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(restored.get(b).unwrap().death_date.as_deref(), Some("1980"));
}

#[test]
fn test_from_snapshot_rejects_one_sided_edges() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    tree.create(fields("B"), Some(a)).unwrap();

    let mut snapshot = tree.snapshot();
    snapshot.people[1].parents.clear();

    assert!(matches!(
        FamilyTree::from_snapshot(snapshot),
        Err(TreeError::InvalidOperation(InvalidOperation::Inconsistent(_)))
    ));
}

#[test]
fn test_snapshot_is_detached_from_store() {
    let mut tree = FamilyTree::new();
    let a = tree.create(fields("A"), None).unwrap();
    let before = tree.snapshot();

    tree.create(fields("B"), Some(a)).unwrap();
    assert_eq!(before.len(), 1);
    assert!(before.get(a).unwrap().children.is_empty());
}

#[test]
fn test_from_snapshot_rejects_living_person_with_death_date() {
    let mut person = Person::new(PersonId::from(0), fields("A"));
    person.death_date = Some("1999".into());

    assert!(matches!(
        FamilyTree::from_snapshot(Snapshot::new(vec![person])),
        Err(TreeError::InvalidOperation(InvalidOperation::Inconsistent(_)))
    ));
}

#[test]
fn test_from_snapshot_rejects_largest_id() {
    let person = Person::new(PersonId::from(u64::MAX), fields("A"));
    assert_eq!(
        FamilyTree::from_snapshot(Snapshot::new(vec![person])).unwrap_err(),
        TreeError::InvalidOperation(InvalidOperation::IdsExhausted)
    );
}

#[test]
fn test_create_stops_when_ids_run_out() {
    let last = PersonId::from(u64::MAX - 1);
    let mut tree =
        FamilyTree::from_snapshot(Snapshot::new(vec![Person::new(last, fields("A"))])).unwrap();

    assert_eq!(
        tree.create(fields("B"), Some(last)),
        Err(TreeError::InvalidOperation(InvalidOperation::IdsExhausted))
    );
    assert_eq!(tree.len(), 1);
    assert!(tree.get(last).unwrap().children.is_empty());
}
