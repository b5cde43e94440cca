//! Family graph use-case service.
//!
//! # Responsibility
//! - Run the import pipeline: parse interchange text, merge into the stored
//!   collection, save.
//! - Derive the clan and layout views the drawing surface consumes.
//!
//! # Invariants
//! - Views are recomputed from the stored collection on every call; nothing
//!   derived is cached or persisted.
//! - Layout geometry is validated before any layout work.

use crate::clan::{decompose, Clan, ClanOptions};
use crate::gedcom::parse_with_report;
use crate::layout::{layout, Layout, LayoutParams, LayoutParamsError};
use crate::merge::{merge, MergeStats};
use crate::model::person::{Person, PersonId};
use crate::repo::family_repo::{FamilyRepository, RepoError};
use log::info;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from family service operations.
#[derive(Debug)]
pub enum FamilyServiceError {
    /// Layout geometry is invalid.
    InvalidLayoutParams(LayoutParamsError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for FamilyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLayoutParams(err) => write!(f, "invalid layout parameters: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FamilyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLayoutParams(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for FamilyServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<LayoutParamsError> for FamilyServiceError {
    fn from(value: LayoutParamsError) -> Self {
        Self::InvalidLayoutParams(value)
    }
}

/// Clans plus their layout, as handed to the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyView {
    pub clans: Vec<Clan>,
    pub layout: Layout,
}

/// Family graph service facade.
pub struct FamilyService<R: FamilyRepository> {
    repo: R,
}

impl<R: FamilyRepository> FamilyService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Parses `text` and merges the result into the stored collection.
    ///
    /// Text with no usable records leaves storage untouched and reports
    /// zero counts.
    pub fn import_gedcom(&mut self, text: &str) -> Result<MergeStats, FamilyServiceError> {
        let (incoming, report) = parse_with_report(text);
        info!(
            "event=gedcom_parse module=gedcom status=ok persons={} families={} skipped_lines={} unresolved_refs={} duplicate_persons={}",
            report.persons,
            report.families,
            report.skipped_lines,
            report.unresolved_refs,
            report.duplicate_persons
        );
        if incoming.is_empty() {
            return Ok(MergeStats::default());
        }
        self.merge_people(&incoming)
    }

    /// Merges already-built records into the stored collection.
    pub fn merge_people(&mut self, incoming: &[Person]) -> Result<MergeStats, FamilyServiceError> {
        let existing = self.repo.load_people()?;
        let outcome = merge(&existing, incoming);
        self.repo.save_people(&outcome.merged)?;
        Ok(outcome.stats)
    }

    /// Returns the stored collection.
    pub fn people(&self) -> Result<Vec<Person>, FamilyServiceError> {
        Ok(self.repo.load_people()?)
    }

    /// Decomposes the stored collection into clans.
    pub fn clans(&self, options: &ClanOptions) -> Result<Vec<Clan>, FamilyServiceError> {
        let people = self.repo.load_people()?;
        Ok(decompose(&people, options))
    }

    /// Computes clans and their layout, skipping clans rooted in `hidden`.
    pub fn view(
        &self,
        options: &ClanOptions,
        params: &LayoutParams,
        hidden: &HashSet<PersonId>,
    ) -> Result<FamilyView, FamilyServiceError> {
        params.validate()?;
        let clans = self.clans(options)?;
        let layout = layout(&clans, params, hidden);
        Ok(FamilyView { clans, layout })
    }
}
