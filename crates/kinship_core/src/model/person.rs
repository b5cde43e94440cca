//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical genealogical record shared by parser, merge,
//!   clan decomposition and layout.
//! - Provide small relation helpers that keep list-valued relations
//!   duplicate-free.
//!
//! # Invariants
//! - `id` is unique within one collection.
//! - `spouse_ids` is mutual across a collection: if A lists B, B lists A.
//! - A person listed in `children_ids` names this person as father or mother.
//! - `children_ids` keeps discovery order, not birth order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque person identifier.
///
/// Parser output uses the record cross-reference token; merge output uses
/// generated UUID strings for imported records.
pub type PersonId = String;

/// Placeholder first name used when a record carries no usable name.
pub const UNKNOWN_FIRST_NAME: &str = "Unknown";

/// Recorded sex of a person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Maps an interchange `SEX` value to a gender.
    ///
    /// Only the first character is inspected, case-insensitively.
    pub fn from_code(raw: &str) -> Self {
        match raw.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('M') => Self::Male,
            Some('F') => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// Canonical genealogical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Gender,
    /// True unless a death date was recorded.
    pub is_living: bool,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default)]
    pub death_place: Option<String>,
    /// Free text. Merge appends to it rather than replacing it.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub father_id: Option<PersonId>,
    #[serde(default)]
    pub mother_id: Option<PersonId>,
    /// Set semantics; order is not meaningful.
    #[serde(default)]
    pub spouse_ids: Vec<PersonId>,
    /// Discovery order.
    #[serde(default)]
    pub children_ids: Vec<PersonId>,
}

impl Person {
    /// Creates a person with a generated id and default fields.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let mut person = Self::with_id(Uuid::new_v4().to_string());
        let first_name = first_name.into();
        if !first_name.trim().is_empty() {
            person.first_name = first_name;
        }
        person.last_name = last_name.into();
        person
    }

    /// Creates a person with a caller-provided id and default fields.
    ///
    /// Used by the parser, where identity comes from the source record.
    pub fn with_id(id: impl Into<PersonId>) -> Self {
        Self {
            id: id.into(),
            first_name: UNKNOWN_FIRST_NAME.to_string(),
            last_name: String::new(),
            gender: Gender::Unknown,
            is_living: true,
            birth_date: None,
            birth_place: None,
            death_date: None,
            death_place: None,
            notes: None,
            father_id: None,
            mother_id: None,
            spouse_ids: Vec::new(),
            children_ids: Vec::new(),
        }
    }

    /// Returns `"first last"`, or just the first name when last is empty.
    pub fn display_name(&self) -> String {
        if self.last_name.trim().is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Returns whether this person has no recorded parent.
    pub fn is_root(&self) -> bool {
        self.father_id.is_none() && self.mother_id.is_none()
    }

    /// Adds `spouse_id` unless already present. Returns whether it was added.
    pub fn add_spouse(&mut self, spouse_id: &str) -> bool {
        push_unique(&mut self.spouse_ids, spouse_id)
    }

    /// Appends `child_id` unless already present. Returns whether it was added.
    pub fn add_child(&mut self, child_id: &str) -> bool {
        push_unique(&mut self.children_ids, child_id)
    }

    /// Returns every relation id this person holds, parents first.
    pub fn relation_ids(&self) -> impl Iterator<Item = &PersonId> {
        self.father_id
            .iter()
            .chain(self.mother_id.iter())
            .chain(self.spouse_ids.iter())
            .chain(self.children_ids.iter())
    }
}

fn push_unique(list: &mut Vec<PersonId>, id: &str) -> bool {
    if list.iter().any(|existing| existing == id) {
        return false;
    }
    list.push(id.to_string());
    true
}
