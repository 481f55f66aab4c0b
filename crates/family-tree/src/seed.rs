use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{FamilyTree, PersonFields, PersonId, TreeError};

const SURNAMES: &[&str] = &[
    "Papadopoulos",
    "Georgiou",
    "Ioannou",
    "Dimitriou",
    "Nikolaou",
    "Konstantinou",
];
const MALE_NAMES: &[&str] = &[
    "Ioannis",
    "Georgios",
    "Nikolaos",
    "Dimitrios",
    "Konstantinos",
    "Andreas",
    "Vasileios",
];
const FEMALE_NAMES: &[&str] = &[
    "Eleni",
    "Maria",
    "Aikaterini",
    "Vasiliki",
    "Angeliki",
    "Georgia",
    "Dimitra",
];

/// Founders beyond this are ignored, their birth years would stop making sense
pub const MAX_ROOTS: usize = 1000;

/// Shape of a generated demo tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    /// Number of independent founders
    pub roots: usize,
    /// Number of people to aim for
    pub target: usize,
    pub max_children: usize,
    pub seed: u64,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            roots: 3,
            target: 100,
            max_children: 4,
            seed: 0,
        }
    }
}

/// Generate a plausible family tree for demos and benchmarks
///
/// Founders are born from 1870 on, twenty years apart, at most
/// [`MAX_ROOTS`] of them. Each descendant is born 25 to 34 years after its
/// parent, parents are drawn from the oldest 70% of the people so far. Only people born after 1950 may still be living. The
/// same options always produce the same tree.
///
/// # Errors
/// Only if the store refuses an edit, which valid generated data never
/// triggers
pub fn seed_tree(options: &SeedOptions) -> Result<FamilyTree, TreeError> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut tree = FamilyTree::new();
    // Insertion ordered, parallel to the birth years
    let mut people: Vec<(PersonId, i32)> = Vec::with_capacity(options.target);

    for i in 1..=options.roots.min(MAX_ROOTS) as i32 {
        let birth = 1850 + 20 * i;
        let fields = PersonFields::new(
            random_first_name(&mut rng),
            pick(&mut rng, SURNAMES),
            birth.to_string(),
        )
        .died((birth + 80).to_string());
        people.push((tree.create(fields, None)?, birth));
    }

    // Bounded, the oldest people can run out of free slots
    let max_attempts = options.target.saturating_mul(10);
    let mut attempts = 0;

    while people.len() < options.target && !people.is_empty() && attempts < max_attempts {
        attempts += 1;

        let pool = ((people.len() as f32 * 0.7) as usize).max(1);
        let (parent, parent_birth) = people[rng.gen_range(0..pool)];
        let has_room = tree
            .get(parent)
            .is_some_and(|person| person.children.len() < options.max_children);
        if !has_room {
            continue;
        }

        let birth = parent_birth + 25 + rng.gen_range(0..10);
        let is_living = birth > 1950 && rng.gen_bool(0.7);
        let last_name = tree
            .get(parent)
            .map(|person| person.last_name.clone())
            .unwrap_or_default();

        let mut fields = PersonFields::new(random_first_name(&mut rng), last_name, birth.to_string());
        if !is_living {
            fields = fields.died((birth + 70 + rng.gen_range(0..15)).to_string());
        }

        people.push((tree.create(fields, Some(parent))?, birth));
    }

    debug!(
        "Seeded {} people in {attempts} attempts (seed = {})",
        tree.len(),
        options.seed
    );
    Ok(tree)
}

fn random_first_name(rng: &mut StdRng) -> &'static str {
    if rng.gen_bool(0.5) {
        pick(rng, MALE_NAMES)
    } else {
        pick(rng, FEMALE_NAMES)
    }
}

fn pick(rng: &mut StdRng, names: &[&'static str]) -> &'static str {
    names[rng.gen_range(0..names.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_seed_is_reproducible() {
        let options = SeedOptions {
            seed: 42,
            ..Default::default()
        };
        let a = seed_tree(&options).unwrap();
        let b = seed_tree(&options).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.len(), 100);
    }

    #[test]
    fn test_seeded_tree_is_consistent() {
        let tree = seed_tree(&SeedOptions::default()).unwrap();
        let snapshot = tree.snapshot();
        snapshot.validate().unwrap();

        let roots = snapshot.people.iter().filter(|p| p.is_root()).count();
        assert_eq!(roots, 3);
        assert!(snapshot
            .people
            .iter()
            .all(|p| p.children.len() <= 4));
        assert!(snapshot
            .people
            .iter()
            .filter(|p| p.is_living)
            .all(|p| p.birth_date.parse::<i32>().unwrap() > 1950));
    }

    #[test]
    fn test_no_roots_gives_empty_tree() {
        let options = SeedOptions {
            roots: 0,
            ..Default::default()
        };
        assert!(seed_tree(&options).unwrap().is_empty());
    }

    #[test]
    fn test_roots_are_capped() {
        let options = SeedOptions {
            roots: usize::MAX,
            target: 10,
            ..Default::default()
        };
        let tree = seed_tree(&options).unwrap();
        assert_eq!(tree.len(), MAX_ROOTS);
        assert!(tree.iter().all(|person| person.is_root()));
    }
}
