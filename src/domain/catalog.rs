//! Course catalog: the ordered store queried by the presentation layer.

use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{CourseTree, InOrderIterator};
use crate::domain::entities::{normalize_identifier, Course};
use crate::domain::error::{DomainError, DomainResult};

/// A prerequisite as seen by a detail query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisite<'a> {
    /// Present in the catalog
    Resolved(&'a Course),
    /// Referenced, but not loaded
    Unresolved(String),
}

impl fmt::Display for Prerequisite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::Resolved(course) => write!(f, "{}", course),
            Prerequisite::Unresolved(number) => write!(f, "{}", number),
        }
    }
}

/// A course together with its prerequisites resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetail<'a> {
    pub course: &'a Course,
    /// Same order as `course.prerequisites()`
    pub prerequisites: Vec<Prerequisite<'a>>,
}

impl CourseDetail<'_> {
    /// Prerequisite numbers missing from the catalog.
    pub fn unresolved(&self) -> Vec<&str> {
        self.prerequisites
            .iter()
            .filter_map(|p| match p {
                Prerequisite::Unresolved(number) => Some(number.as_str()),
                Prerequisite::Resolved(_) => None,
            })
            .collect()
    }
}

/// Ordered course store keyed by normalized course number.
///
/// At most one record per number; the first insert wins.
#[derive(Debug, Default)]
pub struct Catalog {
    tree: CourseTree,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tree: CourseTree::new(),
        }
    }

    /// Add a course under its number.
    ///
    /// An already present number is left as is: no update, no error.
    pub fn insert(&mut self, course: Course) {
        self.tree.insert(course);
    }

    /// Remove all courses.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Height of the underlying tree.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Look up a course; `key` is normalized first, so case and padding don't matter.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_identifier(&self, key: &str) -> Option<&Course> {
        self.tree.find(&normalize_identifier(key))
    }

    /// Courses by ascending number. Calling again restarts the traversal.
    pub fn iter(&self) -> InOrderIterator<'_> {
        self.tree.iter()
    }

    /// All courses by ascending number.
    ///
    /// # Errors
    /// `DomainError::EmptyCatalog` when nothing is loaded.
    pub fn list_all_sorted(&self) -> DomainResult<Vec<&Course>> {
        if self.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }
        Ok(self.iter().collect())
    }

    /// Find a course and resolve each of its prerequisites.
    ///
    /// Read-only; missing prerequisites come back as `Prerequisite::Unresolved`.
    ///
    /// # Errors
    /// `DomainError::CourseNotFound` with the normalized key on a miss.
    #[instrument(level = "debug", skip(self))]
    pub fn lookup_detail(&self, key: &str) -> DomainResult<CourseDetail<'_>> {
        let number = normalize_identifier(key);
        let course = self
            .tree
            .find(&number)
            .ok_or(DomainError::CourseNotFound(number))?;

        let prerequisites = course
            .prerequisites()
            .iter()
            .map(|p| match self.tree.find(p) {
                Some(resolved) => Prerequisite::Resolved(resolved),
                None => Prerequisite::Unresolved(p.clone()),
            })
            .collect();

        Ok(CourseDetail {
            course,
            prerequisites,
        })
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        self.tree.to_tree_string()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Course;
    type IntoIter = InOrderIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
