//! Core genealogy logic for kinship.
//! Parses interchange text, merges batches into one family graph, decomposes
//! it into clans and lays the clans out on a shared canvas.

pub mod clan;
pub mod export;
pub mod gedcom;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod model;
pub mod repo;
pub mod service;

pub use clan::{color_for_index, decompose, Clan, ClanNode, ClanOptions, ViewMode, PALETTE};
pub use export::{export_people, import_people, ExportError, SNAPSHOT_FORMAT_VERSION};
pub use gedcom::{parse, parse_with_report, ParseReport};
pub use layout::{
    layout, ClanExtent, Layout, LayoutParams, LayoutParamsError, Link, LinkKind, Point,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use merge::{is_same_person, merge, MergeOutcome, MergeStats, MERGED_NOTES_MARKER};
pub use model::person::{Gender, Person, PersonId, UNKNOWN_FIRST_NAME};
pub use repo::family_repo::{
    FamilyRepository, InMemoryFamilyRepository, JsonFileFamilyRepository, RepoError, RepoResult,
};
pub use service::family_service::{FamilyService, FamilyServiceError, FamilyView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
