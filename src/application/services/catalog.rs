//! Catalog loading service
//!
//! Reads a course source line by line, parses each line and fills the catalog.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Catalog, Course, DomainError};
use crate::infrastructure::traits::FileSystem;

/// A source line rejected by the record parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the source
    pub line_number: usize,
    /// Line content, stripped
    pub line: String,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: PathBuf,
    /// Lines read, blank ones included
    pub lines_read: usize,
    /// Lines that produced a course record
    pub records_parsed: usize,
    /// Courses in the catalog after the load
    pub courses: usize,
    pub malformed: Vec<MalformedLine>,
}

impl LoadReport {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            lines_read: 0,
            records_parsed: 0,
            courses: 0,
            malformed: Vec::new(),
        }
    }

    /// Records dropped because their number was already loaded.
    pub fn duplicates(&self) -> usize {
        self.records_parsed.saturating_sub(self.courses)
    }
}

/// Service that (re)builds a catalog from a course source.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Replace the catalog contents with the courses in `path`.
    ///
    /// The catalog is cleared first and never merged with earlier loads.
    /// Malformed lines are collected in the report and skipped.
    ///
    /// # Errors
    /// * `ApplicationError::SourceUnavailable` - the path cannot be opened as a file
    /// * `ApplicationError::OperationFailed` - reading failed mid-way
    ///
    /// The catalog is empty after any error.
    #[instrument(level = "debug", skip(self, catalog))]
    pub fn load(&self, catalog: &mut Catalog, path: &Path) -> ApplicationResult<LoadReport> {
        catalog.clear();
        if self.fs.exists(path) && !self.fs.is_file(path) {
            return Err(ApplicationError::SourceUnavailable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }
        let reader = self.fs.open_lines(path).or_unavailable(path)?;
        self.load_from_reader(catalog, path, reader)
    }

    /// Same as [`CatalogService::load`], with the lines coming from `reader`.
    /// `source` only labels the report and error messages.
    #[instrument(level = "debug", skip(self, catalog, reader))]
    pub fn load_from_reader<R: BufRead>(
        &self,
        catalog: &mut Catalog,
        source: &Path,
        reader: R,
    ) -> ApplicationResult<LoadReport> {
        catalog.clear();
        let mut report = LoadReport::new(source);

        for (idx, line) in reader.lines().enumerate() {
            let line_number = idx + 1;
            let line = match line.with_path_context(&format!("read line {}", line_number), source)
            {
                Ok(line) => line,
                Err(e) => {
                    catalog.clear();
                    return Err(e);
                }
            };
            report.lines_read += 1;

            match Course::parse_line(&line) {
                Ok(Some(course)) => {
                    report.records_parsed += 1;
                    catalog.insert(course);
                }
                Ok(None) => debug!("line {}: blank, skipped", line_number),
                Err(DomainError::MalformedRecord { line }) => {
                    warn!("line {}: malformed record: {}", line_number, line);
                    report.malformed.push(MalformedLine { line_number, line });
                }
                Err(e) => {
                    catalog.clear();
                    return Err(e.into());
                }
            }
        }

        report.courses = catalog.len();
        info!(
            "loaded {} courses from {} ({} malformed, {} duplicates)",
            report.courses,
            source.display(),
            report.malformed.len(),
            report.duplicates()
        );
        Ok(report)
    }
}
