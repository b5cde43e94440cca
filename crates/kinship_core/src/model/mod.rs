//! Genealogical domain model.
//!
//! # Responsibility
//! - Define the `Person` record every pipeline stage reads and writes.
//!
//! # Invariants
//! - Every record is identified by a `PersonId` unique in its collection.
//! - Spouse links are symmetric; child links agree with parent links.

pub mod person;
