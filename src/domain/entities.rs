//! Domain entities: course records and the line parser that produces them

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Characters stripped from both ends of lines, fields and lookup keys.
const STRIP_CHARS: [char; 4] = [' ', '\t', '\r', '\n'];

/// Field separator of the course source format.
pub const FIELD_DELIMITER: char = ',';

/// One course of the catalog.
///
/// Prerequisites are identifiers, resolved against the catalog at query time.
/// A record never points at another record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    number: String,
    title: String,
    prerequisites: Vec<String>,
}

impl Course {
    /// Build a course, normalizing the number and every prerequisite.
    /// Prerequisites that are empty after stripping are dropped.
    pub fn new<I, S>(number: &str, title: &str, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            number: normalize_identifier(number),
            title: strip(title).to_string(),
            prerequisites: prerequisites
                .into_iter()
                .map(|p| normalize_identifier(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Normalized course number, e.g. `CSCI200`.
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Prerequisite identifiers in source order.
    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    /// Parse one raw source line.
    ///
    /// Format: `NUMBER,TITLE[,PREREQ]*`, no quoting.
    ///
    /// # Returns
    /// * `Ok(None)` - blank line, nothing to add
    /// * `Ok(Some(course))` - a valid record
    ///
    /// # Errors
    /// `DomainError::MalformedRecord` when the line has fewer than two fields.
    pub fn parse_line(line: &str) -> DomainResult<Option<Self>> {
        let trimmed = strip(line);
        if trimmed.is_empty() {
            return Ok(None);
        }

        // A single trailing delimiter closes the last field, it does not open an empty one.
        let body = trimmed.strip_suffix(FIELD_DELIMITER).unwrap_or(trimmed);
        let mut fields = body.split(FIELD_DELIMITER);
        let (number, title) = match (fields.next(), fields.next()) {
            (Some(number), Some(title)) => (number, title),
            _ => {
                return Err(DomainError::MalformedRecord {
                    line: trimmed.to_string(),
                })
            }
        };

        Ok(Some(Self::new(number, title, fields)))
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.number, self.title)
    }
}

/// Strip surrounding whitespace and uppercase, so lookups are case-insensitive.
///
/// `"  csci200 "` → `"CSCI200"`
pub fn normalize_identifier(raw: &str) -> String {
    strip(raw).to_ascii_uppercase()
}

fn strip(s: &str) -> &str {
    s.trim_matches(&STRIP_CHARS[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_full_line_when_parsing_then_fields_are_normalized() {
        let course = Course::parse_line("  csci300 , Intro to Algorithms ,csci200, math201 \r\n")
            .unwrap()
            .unwrap();
        assert_eq!(course.number(), "CSCI300");
        assert_eq!(course.title(), "Intro to Algorithms");
        assert_eq!(course.prerequisites(), ["CSCI200", "MATH201"]);
    }

    #[test]
    fn given_blank_line_when_parsing_then_returns_none() {
        assert_eq!(Course::parse_line(" \t\r\n").unwrap(), None);
        assert_eq!(Course::parse_line("").unwrap(), None);
    }

    #[test]
    fn given_single_field_when_parsing_then_malformed() {
        let err = Course::parse_line("CSCI100").unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedRecord {
                line: "CSCI100".to_string()
            }
        );
    }

    #[test]
    fn given_number_with_trailing_delimiter_only_when_parsing_then_malformed() {
        assert!(Course::parse_line("CSCI100,").is_err());
        assert!(Course::parse_line(",").is_err());
        let course = Course::parse_line("CSCI100,,").unwrap().unwrap();
        assert_eq!(course.title(), "");
    }

    #[test]
    fn given_empty_prerequisite_fields_when_parsing_then_they_are_dropped() {
        let course = Course::parse_line("CSCI400,Large Software,, ,csci301,")
            .unwrap()
            .unwrap();
        assert_eq!(course.prerequisites(), ["CSCI301"]);
    }

    #[test]
    fn given_title_with_mixed_case_when_parsing_then_case_is_kept() {
        let course = Course::parse_line("math201,Discrete MATH").unwrap().unwrap();
        assert_eq!(course.title(), "Discrete MATH");
        assert_eq!(course.to_string(), "MATH201, Discrete MATH");
    }

    #[test]
    fn given_padded_key_when_normalizing_then_stripped_and_uppercased() {
        assert_eq!(normalize_identifier("  CsCi200  "), "CSCI200");
        assert_eq!(normalize_identifier("\tcsci200\n"), "CSCI200");
    }
}
