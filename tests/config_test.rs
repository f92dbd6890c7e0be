//! Integration tests for Settings loading from an explicit config file.
//!
//! Environment overrides are not set here: tests run in parallel and share
//! the process environment.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use coursecat::application::ApplicationError;
use coursecat::config::Settings;

#[test]
fn given_config_file_when_loading_then_values_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coursecat.toml");
    fs::write(
        &path,
        r#"
data_file = "/srv/catalog/courses.csv"
warn_malformed = false
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load_from(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(
        settings.data_file,
        Some(PathBuf::from("/srv/catalog/courses.csv"))
    );
    assert!(!settings.warn_malformed);
    // Not specified → default kept
    assert_eq!(settings.list_header, "Here is a sample schedule:");
}

#[test]
fn given_tilde_in_data_file_when_loading_then_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coursecat.toml");
    fs::write(&path, "data_file = \"~/courses.csv\"\n").unwrap();

    let settings = Settings::load_from(Some(&path)).expect("load settings");

    let data_file = settings.data_file.expect("data_file set");
    assert!(!data_file.to_string_lossy().starts_with('~'));
    assert!(data_file.ends_with("courses.csv"));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coursecat.toml");
    fs::write(&path, "warn_malformed = [not valid").unwrap();

    let result = Settings::load_from(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_serializing_then_round_trips_through_toml() {
    let settings = Settings {
        data_file: Some(PathBuf::from("courses.csv")),
        ..Settings::default()
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("data_file = \"courses.csv\""));
    assert!(rendered.contains("warn_malformed = true"));
}
