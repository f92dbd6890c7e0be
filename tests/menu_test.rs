//! Tests for the interactive menu, driven from in-memory input

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use coursecat::application::services::CatalogService;
use coursecat::cli::menu::{run_menu, MenuSession};
use coursecat::config::Settings;
use coursecat::infrastructure::traits::RealFileSystem;
use coursecat::util::testing;

const COURSES: &str = "\
CSCI300,Introduction to Algorithms,CSCI200,MATH201
CSCI200,Data Structures,CSCI101
CSCI101,Introduction to Programming in C++,CSCI100
CSCI100,Introduction to Computer Science
broken line
";

fn create_course_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("courses.csv");
    std::fs::write(&path, COURSES).expect("write course file");
    path
}

/// Run a whole menu session and return everything it printed.
fn run_session(session: &mut MenuSession, settings: &Settings, input: &str) -> String {
    testing::init_test_setup();
    let service = CatalogService::new(Arc::new(RealFileSystem));
    let mut out = Vec::new();
    run_menu(&service, settings, session, input.as_bytes(), &mut out).expect("menu run");
    String::from_utf8(out).expect("utf8 output")
}

#[test]
fn given_exit_choice_when_running_then_greets_and_says_goodbye() {
    let mut session = MenuSession::new();
    let output = run_session(&mut session, &Settings::default(), "9\n");

    assert!(output.starts_with("Welcome to the course planner.\n1. Load Data Structure.\n"));
    assert!(output.ends_with("Thank you for using the course planner!\n"));
}

#[test]
fn given_query_before_load_when_running_then_asks_to_load_first() {
    let mut session = MenuSession::new();
    let output = run_session(&mut session, &Settings::default(), "2\n3\n9\n");

    assert_eq!(
        output
            .matches("Please load the data structure first (option 1).")
            .count(),
        2
    );
}

#[test]
fn given_non_numeric_choice_when_running_then_invalid_code_reported() {
    let mut session = MenuSession::new();
    let output = run_session(&mut session, &Settings::default(), "abc\n\n7\n9\n");

    assert_eq!(output.matches("-1 is not a valid option.").count(), 2);
    assert!(output.contains("7 is not a valid option."));
}

#[test]
fn given_load_then_list_when_running_then_sorted_schedule_printed() {
    let temp = TempDir::new().unwrap();
    let path = create_course_file(&temp);
    let mut session = MenuSession::new();

    let input = format!("1\n{}\n2\n9\n", path.display());
    let output = run_session(&mut session, &Settings::default(), &input);

    assert!(output.contains("Warning: Invalid line 5 (needs at least course number and title): broken line"));
    assert!(output.contains(&format!("Data loaded successfully from '{}'.", path.display())));
    assert!(output.contains(
        "Here is a sample schedule:\n\
         CSCI100, Introduction to Computer Science\n\
         CSCI101, Introduction to Programming in C++\n\
         CSCI200, Data Structures\n\
         CSCI300, Introduction to Algorithms\n"
    ));
    assert!(session.loaded);
    assert_eq!(session.catalog.len(), 4);
}

#[test]
fn given_loaded_catalog_when_printing_course_then_detail_with_unresolved() {
    let temp = TempDir::new().unwrap();
    let path = create_course_file(&temp);
    let mut session = MenuSession::new();

    let input = format!("1\n{}\n3\n  csci300 \n3\ncsci999\n9\n", path.display());
    let output = run_session(&mut session, &Settings::default(), &input);

    assert!(output.contains(
        "CSCI300, Introduction to Algorithms\n\
         Prerequisites: CSCI200, Data Structures | MATH201\n"
    ));
    assert!(output.contains("Course CSCI999 not found."));
}

#[test]
fn given_missing_file_when_loading_then_error_and_queries_blocked() {
    let temp = TempDir::new().unwrap();
    let path = create_course_file(&temp);
    let missing = temp.path().join("missing.csv");
    let mut session = MenuSession::new();

    // Successful load first, then a failed one
    let input = format!("1\n{}\n1\n{}\n2\n9\n", path.display(), missing.display());
    let output = run_session(&mut session, &Settings::default(), &input);

    assert!(output.contains(&format!("Error: Could not open file '{}'.", missing.display())));
    assert!(output.contains("Please load the data structure first (option 1)."));
    assert!(!session.loaded);
    assert!(session.catalog.is_empty());
}

#[test]
fn given_empty_file_name_when_loading_then_rejected() {
    let mut session = MenuSession::new();
    let output = run_session(&mut session, &Settings::default(), "1\n   \n9\n");

    assert!(output.contains("File name cannot be empty."));
    assert!(!session.loaded);
}

#[test]
fn given_empty_source_when_listing_then_no_courses_message() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.csv");
    std::fs::write(&path, "\n\n").unwrap();
    let mut session = MenuSession::new();

    let input = format!("1\n{}\n2\n9\n", path.display());
    let output = run_session(&mut session, &Settings::default(), &input);

    assert!(output.contains("Here is a sample schedule:\nNo courses loaded.\n"));
}

#[test]
fn given_warnings_disabled_when_loading_then_malformed_lines_silent() {
    let temp = TempDir::new().unwrap();
    let path = create_course_file(&temp);
    let settings = Settings {
        warn_malformed: false,
        ..Settings::default()
    };
    let mut session = MenuSession::new();

    let input = format!("1\n{}\n9\n", path.display());
    let output = run_session(&mut session, &settings, &input);

    assert!(!output.contains("Warning:"));
    assert!(session.loaded);
}

#[test]
fn given_input_ends_without_exit_when_running_then_loop_stops() {
    let mut session = MenuSession::new();
    let output = run_session(&mut session, &Settings::default(), "2\n");

    assert!(output.contains("Please load the data structure first (option 1)."));
    assert!(!output.contains("Thank you for using the course planner!"));
}
