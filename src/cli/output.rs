//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;
use itertools::Itertools;

use crate::application::services::MalformedLine;
use crate::domain::CourseDetail;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Write warning (yellow "Warning:" prefix)
pub fn warning<W: Write>(w: &mut W, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}: {}", "Warning".yellow(), msg)
}

/// Write success status (green checkmark)
pub fn success<W: Write>(w: &mut W, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{} {}", "✓".green(), msg)
}

/// Write section header (cyan bold)
pub fn header<W: Write>(w: &mut W, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    writeln!(w, "{}", msg.to_string().cyan().bold())
}

/// Warning text for a rejected source line.
pub fn malformed_message(malformed: &MalformedLine) -> String {
    format!(
        "Invalid line {} (needs at least course number and title): {}",
        malformed.line_number, malformed.line
    )
}

/// The two lines of a course detail:
/// `CSCI300, Algorithms` and `Prerequisites: CSCI200, Data Structures | MATH201`.
pub fn detail_lines(detail: &CourseDetail<'_>) -> [String; 2] {
    let prerequisites = if detail.prerequisites.is_empty() {
        "None".to_string()
    } else {
        detail.prerequisites.iter().join(" | ")
    };
    [
        detail.course.to_string(),
        format!("Prerequisites: {}", prerequisites),
    ]
}
