//! GEDCOM-style interchange format reader.
//!
//! # Responsibility
//! - Turn line-oriented interchange text into linked `Person` records.
//!
//! # Invariants
//! - Reading is best-effort and infallible; an empty result means no usable
//!   records were found.
//!
//! # See also
//! - `parser` for record grouping and linking rules.

pub mod line;
pub mod parser;

pub use parser::{parse, parse_with_report, ParseReport};
