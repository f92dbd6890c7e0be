//! Interactive menu loop
//!
//! State lives in `MenuSession` and the loop is generic over its input and
//! output, so a whole session can be driven from a string in tests.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::{CatalogService, LoadReport};
use crate::application::{ApplicationError, ApplicationResult};
use crate::cli::error::CliResult;
use crate::cli::output::{detail_lines, malformed_message};
use crate::config::Settings;
use crate::domain::{Catalog, DomainError};
use crate::infrastructure::InfraError;

/// Menu code for input that is not a number.
pub const INVALID_CHOICE: i32 = -1;

const LOAD: i32 = 1;
const PRINT_LIST: i32 = 2;
const PRINT_COURSE: i32 = 3;
const EXIT: i32 = 9;

/// Catalog plus the "data loaded" flag that gates queries.
#[derive(Debug, Default)]
pub struct MenuSession {
    pub catalog: Catalog,
    pub loaded: bool,
}

impl MenuSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the catalog from `path`. A failed load leaves nothing queryable.
    pub fn load(&mut self, service: &CatalogService, path: &Path) -> ApplicationResult<LoadReport> {
        let result = service.load(&mut self.catalog, path);
        self.loaded = result.is_ok();
        result
    }
}

/// Turn a line of user input into a menu code.
///
/// Anything but plain ASCII digits (after stripping) is `INVALID_CHOICE`,
/// as is a number too large for `i32`.
pub fn parse_menu_choice(input: &str) -> i32 {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return INVALID_CHOICE;
    }
    trimmed.parse().unwrap_or(INVALID_CHOICE)
}

/// Run the menu until the user exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    service: &CatalogService,
    settings: &Settings,
    session: &mut MenuSession,
    input: R,
    out: W,
) -> CliResult<()> {
    Menu {
        service,
        settings,
        session,
        input,
        out,
    }
    .run()
    .map_err(|e| InfraError::io("menu terminal I/O", e))?;
    Ok(())
}

/// Load `path` into the session and print the outcome the way the menu does.
pub fn load_and_report<W: Write>(
    service: &CatalogService,
    settings: &Settings,
    session: &mut MenuSession,
    path: &Path,
    out: &mut W,
) -> io::Result<()> {
    match session.load(service, path) {
        Ok(report) => {
            if settings.warn_malformed {
                for malformed in &report.malformed {
                    writeln!(out, "Warning: {}", malformed_message(malformed))?;
                }
            }
            writeln!(out, "Data loaded successfully from '{}'.", path.display())
        }
        Err(ApplicationError::SourceUnavailable { path, .. }) => {
            writeln!(out, "Error: Could not open file '{}'.", path.display())
        }
        Err(e) => writeln!(out, "Error: {}", e),
    }
}

struct Menu<'a, R, W> {
    service: &'a CatalogService,
    settings: &'a Settings,
    session: &'a mut MenuSession,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    #[instrument(level = "debug", skip(self))]
    fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Welcome to the course planner.")?;

        loop {
            writeln!(self.out, "1. Load Data Structure.")?;
            writeln!(self.out, "2. Print Course List.")?;
            writeln!(self.out, "3. Print Course.")?;
            writeln!(self.out, "9. Exit")?;

            let Some(line) = self.prompt("What would you like to do? ")? else {
                debug!("input closed, leaving menu");
                return Ok(());
            };
            let choice = parse_menu_choice(&line);
            debug!("menu choice: {}", choice);

            let keep_going = match choice {
                LOAD => self.load()?,
                PRINT_LIST => self.print_list()?,
                PRINT_COURSE => self.print_course()?,
                EXIT => {
                    writeln!(self.out, "Thank you for using the course planner!")?;
                    return Ok(());
                }
                other => {
                    writeln!(self.out, "{} is not a valid option.", other)?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }

            writeln!(self.out)?;
        }
    }

    /// Print `text`, then read one line. `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn load(&mut self) -> io::Result<bool> {
        let Some(file_name) =
            self.prompt("Enter the file name to load (e.g., ABCU_Advising_Program_Input.csv): ")?
        else {
            return Ok(false);
        };
        let file_name = file_name.trim();
        if file_name.is_empty() {
            writeln!(self.out, "File name cannot be empty.")?;
            return Ok(true);
        }

        load_and_report(
            self.service,
            self.settings,
            self.session,
            Path::new(file_name),
            &mut self.out,
        )?;
        Ok(true)
    }

    fn print_list(&mut self) -> io::Result<bool> {
        if !self.session.loaded {
            writeln!(self.out, "Please load the data structure first (option 1).")?;
            return Ok(true);
        }

        writeln!(self.out, "{}", self.settings.list_header)?;
        match self.session.catalog.list_all_sorted() {
            Ok(courses) => {
                for course in courses {
                    writeln!(self.out, "{}", course)?;
                }
            }
            Err(_) => writeln!(self.out, "No courses loaded.")?,
        }
        Ok(true)
    }

    fn print_course(&mut self) -> io::Result<bool> {
        if !self.session.loaded {
            writeln!(self.out, "Please load the data structure first (option 1).")?;
            return Ok(true);
        }

        let Some(key) = self.prompt("What course do you want to know about? ")? else {
            return Ok(false);
        };
        match self.session.catalog.lookup_detail(&key) {
            Ok(detail) => {
                for line in detail_lines(&detail) {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Err(DomainError::CourseNotFound(number)) => {
                writeln!(self.out, "Course {} not found.", number)?
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("  9 \n", 9)]
    #[case("", INVALID_CHOICE)]
    #[case("abc", INVALID_CHOICE)]
    #[case("2x", INVALID_CHOICE)]
    #[case("-3", INVALID_CHOICE)]
    #[case("99999999999", INVALID_CHOICE)]
    fn given_input_when_parsing_menu_choice_then_code(#[case] input: &str, #[case] expected: i32) {
        assert_eq!(parse_menu_choice(input), expected);
    }
}
