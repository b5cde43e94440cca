//! Family graph repository contracts and snapshot-backed implementations.
//!
//! # Responsibility
//! - Define the load/save seam between the core and whatever storage
//!   collaborator holds the person collection.
//! - Provide an in-memory store and a JSON snapshot file store.
//!
//! # Invariants
//! - `save_people` replaces the whole collection; there are no partial writes.
//! - A missing snapshot file loads as an empty collection.

use crate::export::{export_people, import_people, ExportError};
use crate::model::person::Person;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result type used by family repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from family repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// File system failure.
    Io(std::io::Error),
    /// Snapshot could not be encoded or decoded.
    Snapshot(ExportError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "family store io error: {err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ExportError> for RepoError {
    fn from(value: ExportError) -> Self {
        Self::Snapshot(value)
    }
}

/// Repository interface for the whole person collection.
pub trait FamilyRepository {
    /// Loads the current collection.
    fn load_people(&self) -> RepoResult<Vec<Person>>;
    /// Replaces the stored collection.
    fn save_people(&mut self, people: &[Person]) -> RepoResult<()>;
}

/// Process-local repository, mainly for tests and interactive sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFamilyRepository {
    people: Vec<Person>,
}

impl InMemoryFamilyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `people`.
    pub fn with_people(people: Vec<Person>) -> Self {
        Self { people }
    }
}

impl FamilyRepository for InMemoryFamilyRepository {
    fn load_people(&self) -> RepoResult<Vec<Person>> {
        Ok(self.people.clone())
    }

    fn save_people(&mut self, people: &[Person]) -> RepoResult<()> {
        self.people = people.to_vec();
        Ok(())
    }
}

/// Repository persisting one JSON snapshot file.
#[derive(Debug, Clone)]
pub struct JsonFileFamilyRepository {
    path: PathBuf,
}

impl JsonFileFamilyRepository {
    /// Creates a repository bound to `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FamilyRepository for JsonFileFamilyRepository {
    fn load_people(&self) -> RepoResult<Vec<Person>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(import_people(&text)?)
    }

    fn save_people(&mut self, people: &[Person]) -> RepoResult<()> {
        let text = export_people(people)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename keeps the previous snapshot intact on failure.
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, text)?;
        std::fs::rename(&staging, &self.path)?;
        info!(
            "event=snapshot_saved module=repo status=ok people={}",
            people.len()
        );
        Ok(())
    }
}
