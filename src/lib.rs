//! coursecat: course records in an ordered tree, listed in order and queried
//! with their prerequisites resolved.
//!
//! Layers:
//! - `domain` - record parser, binary search tree, catalog (no I/O)
//! - `application` - loading a catalog from a source
//! - `infrastructure` - filesystem boundary and service wiring
//! - `cli` - commands and the interactive menu

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
