//! Command dispatch: one function per subcommand

use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::LoadReport;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::menu::{load_and_report, run_menu, MenuSession};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{Catalog, DomainError};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // Completions need no settings
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Menu) | None => _menu(&container, cli),
        Some(command) => run_command(
            &container,
            cli,
            command,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        ),
    }
}

/// Run a one-shot command: course data goes to `out`, warnings to `err`.
pub fn run_command<O: Write, E: Write>(
    container: &ServiceContainer,
    cli: &Cli,
    command: &Commands,
    out: &mut O,
    err: &mut E,
) -> CliResult<()> {
    match command {
        Commands::List => _list(container, cli, out, err),
        Commands::Show { course } => _show(container, cli, course, out, err),
        Commands::Tree => _tree(container, cli, out, err),
        Commands::Menu => _menu(container, cli),
        Commands::Config { command } => _config(container, command, out, err),
        Commands::Completion { .. } => Ok(()),
    }
}

fn terminal(e: io::Error) -> CliError {
    InfraError::io("terminal output", e).into()
}

/// `--file` wins over the configured `data_file`.
fn resolve_file(container: &ServiceContainer, cli: &Cli) -> CliResult<PathBuf> {
    cli.file
        .clone()
        .or_else(|| container.settings.data_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no course file: pass --file or set data_file in the config".into())
        })
}

fn load_catalog<E: Write>(
    container: &ServiceContainer,
    cli: &Cli,
    err: &mut E,
) -> CliResult<(Catalog, LoadReport)> {
    let path = resolve_file(container, cli)?;
    let mut catalog = Catalog::new();
    let report = container.catalog_service.load(&mut catalog, &path)?;

    if container.settings.warn_malformed {
        for malformed in &report.malformed {
            output::warning(err, &output::malformed_message(malformed)).map_err(terminal)?;
        }
    }
    debug!(
        "catalog ready: {} courses, height {}",
        catalog.len(),
        catalog.height()
    );
    Ok((catalog, report))
}

#[instrument(skip(container, out, err))]
fn _list<O: Write, E: Write>(
    container: &ServiceContainer,
    cli: &Cli,
    out: &mut O,
    err: &mut E,
) -> CliResult<()> {
    let (catalog, _) = load_catalog(container, cli, err)?;

    output::header(out, &container.settings.list_header).map_err(terminal)?;
    match catalog.list_all_sorted() {
        Ok(courses) => {
            for course in courses {
                writeln!(out, "{}", course).map_err(terminal)?;
            }
        }
        Err(DomainError::EmptyCatalog) => writeln!(out, "No courses loaded.").map_err(terminal)?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[instrument(skip(container, out, err))]
fn _show<O: Write, E: Write>(
    container: &ServiceContainer,
    cli: &Cli,
    course: &str,
    out: &mut O,
    err: &mut E,
) -> CliResult<()> {
    let (catalog, _) = load_catalog(container, cli, err)?;

    let detail = match catalog.lookup_detail(course) {
        Ok(detail) => detail,
        Err(DomainError::CourseNotFound(number)) => {
            writeln!(out, "Course {} not found.", number).map_err(terminal)?;
            return Err(CliError::Exit(exitcode::DATAERR));
        }
        Err(e) => return Err(e.into()),
    };
    for line in output::detail_lines(&detail) {
        writeln!(out, "{}", line).map_err(terminal)?;
    }
    let unresolved = detail.unresolved();
    if !unresolved.is_empty() {
        debug!("unresolved prerequisites: {:?}", unresolved);
    }
    Ok(())
}

#[instrument(skip(container, out, err))]
fn _tree<O: Write, E: Write>(
    container: &ServiceContainer,
    cli: &Cli,
    out: &mut O,
    err: &mut E,
) -> CliResult<()> {
    let (catalog, report) = load_catalog(container, cli, err)?;

    write!(out, "{}", catalog.to_tree_string()).map_err(terminal)?;
    output::success(
        out,
        &format!(
            "{} courses, height {} ({} duplicates dropped)",
            catalog.len(),
            catalog.height(),
            report.duplicates()
        ),
    )
    .map_err(terminal)
}

#[instrument(skip(container))]
fn _menu(container: &ServiceContainer, cli: &Cli) -> CliResult<()> {
    let mut session = MenuSession::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Preload when a file is known up front
    if let Some(path) = cli.file.as_ref().or(container.settings.data_file.as_ref()) {
        load_and_report(
            &container.catalog_service,
            &container.settings,
            &mut session,
            path,
            &mut out,
        )
        .map_err(|e| InfraError::io("menu terminal I/O", e))?;
    }

    run_menu(
        &container.catalog_service,
        &container.settings,
        &mut session,
        io::stdin().lock(),
        out,
    )
}

fn _config<O: Write, E: Write>(
    container: &ServiceContainer,
    command: &ConfigCommands,
    out: &mut O,
    err: &mut E,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            writeln!(out, "{}", container.settings.to_toml()?).map_err(terminal)?;
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => writeln!(out, "{}", path.display()).map_err(terminal)?,
            None => output::warning(err, "no config directory available on this platform")
                .map_err(terminal)?,
        },
    }
    Ok(())
}
