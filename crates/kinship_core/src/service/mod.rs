//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parser, merge, clan and layout calls into use-case APIs.
//! - Keep CLI and drawing-surface callers decoupled from storage details.

pub mod family_service;
