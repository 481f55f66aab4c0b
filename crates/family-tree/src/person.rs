use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::{InvalidOperation, TreeError};

/// Identity of a person, allocated in creation order by the store
///
/// Ordering ids orders people by creation, which is the tie-break used by the
/// layout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct PersonId(u64);

/// A node of the family graph
///
/// `parents` and `children` mirror each other across the whole graph: `b` is
/// in `a.children` exactly when `a` is in `b.parents`. The store keeps both
/// sides in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    /// Year or free-form date
    pub birth_date: String,
    /// Always `None` while the person is living
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    pub is_living: bool,
    #[serde(default)]
    pub parents: Vec<PersonId>,
    #[serde(default)]
    pub children: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<PersonId>,
}

impl Person {
    /// A person without any relationship
    pub fn new(id: PersonId, fields: PersonFields) -> Self {
        let PersonFields {
            first_name,
            last_name,
            birth_date,
            death_date,
            is_living,
        } = fields;

        Self {
            id,
            first_name,
            last_name,
            birth_date,
            death_date: if is_living { None } else { death_date },
            is_living,
            parents: Vec::new(),
            children: Vec::new(),
            spouse: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Scalar fields, without relationships
    pub fn fields(&self) -> PersonFields {
        PersonFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date.clone(),
            death_date: self.death_date.clone(),
            is_living: self.is_living,
        }
    }
}

/// Scalar fields supplied when creating a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFields {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub death_date: Option<String>,
    pub is_living: bool,
}

impl PersonFields {
    /// A living person
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: birth_date.into(),
            death_date: None,
            is_living: true,
        }
    }

    /// Mark the person as deceased
    pub fn died(mut self, death_date: impl Into<String>) -> Self {
        self.death_date = Some(death_date.into());
        self.is_living = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        for (name, value) in [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("birth date", &self.birth_date),
        ] {
            if value.trim().is_empty() {
                return Err(InvalidOperation::BlankField(name).into());
            }
        }
        Ok(())
    }
}

/// Partial update of a person's scalar fields, `None` leaves a field as is
///
/// Whenever the updated person is living the death date is cleared, even if
/// the patch sets one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<Option<String>>,
    pub is_living: Option<bool>,
}

impl PersonPatch {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn birth_date(mut self, value: impl Into<String>) -> Self {
        self.birth_date = Some(value.into());
        self
    }

    pub fn death_date(mut self, value: Option<String>) -> Self {
        self.death_date = Some(value);
        self
    }

    pub fn is_living(mut self, value: bool) -> Self {
        self.is_living = Some(value);
        self
    }

    /// The fields that result from applying the patch
    pub(crate) fn apply_to(self, mut fields: PersonFields) -> PersonFields {
        if let Some(first_name) = self.first_name {
            fields.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            fields.last_name = last_name;
        }
        if let Some(birth_date) = self.birth_date {
            fields.birth_date = birth_date;
        }
        if let Some(death_date) = self.death_date {
            fields.death_date = death_date;
        }
        if let Some(is_living) = self.is_living {
            fields.is_living = is_living;
        }
        if fields.is_living {
            fields.death_date = None;
        }
        fields
    }
}
