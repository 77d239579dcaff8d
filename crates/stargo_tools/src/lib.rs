//! # StarGO Development Tools
//!
//! Command-line tools for development:
//! - Catalog validation (research graph, ship gates, catalog values)
//! - Snapshot inspection

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod inspect;
pub mod validate;
