//! Versioned JSON snapshot of a person collection.
//!
//! # Responsibility
//! - Serialize the full collection for storage and publishing collaborators.
//! - Read a snapshot back with identical field values.
//!
//! # Invariants
//! - Snapshots carry `format_version`; unknown versions are rejected.
//! - A snapshot with duplicate person ids is rejected on read.

use crate::model::person::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot format version written by [`export_people`].
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Errors from snapshot export/import.
#[derive(Debug)]
pub enum ExportError {
    /// Snapshot text is not valid JSON or does not match the schema.
    Json(serde_json::Error),
    /// Snapshot was written by an unsupported format version.
    UnsupportedVersion(u32),
    /// Two records share one id.
    DuplicateId(PersonId),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid snapshot json: {err}"),
            Self::UnsupportedVersion(version) => write!(
                f,
                "snapshot format version {version} is not supported (expected {SNAPSHOT_FORMAT_VERSION})"
            ),
            Self::DuplicateId(id) => write!(f, "snapshot contains duplicate person id: {id}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnsupportedVersion(_) => None,
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    format_version: u32,
    people: &'a [Person],
}

#[derive(Deserialize)]
struct SnapshotIn {
    format_version: u32,
    #[serde(default)]
    people: Vec<Person>,
}

/// Serializes `people` to a pretty-printed snapshot.
pub fn export_people(people: &[Person]) -> Result<String, ExportError> {
    let snapshot = SnapshotOut {
        format_version: SNAPSHOT_FORMAT_VERSION,
        people,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Reads a snapshot written by [`export_people`].
pub fn import_people(text: &str) -> Result<Vec<Person>, ExportError> {
    let snapshot: SnapshotIn = serde_json::from_str(text)?;
    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(ExportError::UnsupportedVersion(snapshot.format_version));
    }

    ensure_unique_ids(&snapshot.people)?;
    Ok(snapshot.people)
}

fn ensure_unique_ids(people: &[Person]) -> Result<(), ExportError> {
    let mut ids = HashSet::with_capacity(people.len());
    for person in people {
        if !ids.insert(person.id.as_str()) {
            return Err(ExportError::DuplicateId(person.id.clone()));
        }
    }
    Ok(())
}
