//! Domain layer: course records, the ordered tree and the catalog
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod catalog;
pub mod entities;
pub mod error;

pub use arena::{CourseNode, CourseTree, InOrderIterator};
pub use catalog::{Catalog, CourseDetail, Prerequisite};
pub use entities::{normalize_identifier, Course, FIELD_DELIMITER};
pub use error::{DomainError, DomainResult};
