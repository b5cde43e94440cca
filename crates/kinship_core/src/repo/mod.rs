//! Repository layer abstractions and snapshot implementations.
//!
//! # Responsibility
//! - Define the load/save contract for the person collection.
//! - Keep file and encoding details away from service orchestration.
//!
//! # Invariants
//! - Repositories store and return collections verbatim; they never merge.

pub mod family_repo;
