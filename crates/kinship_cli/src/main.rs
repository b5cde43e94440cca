//! Command-line entry point for kinship.
//!
//! # Responsibility
//! - Import interchange files into a JSON snapshot store.
//! - Print clan summaries and layout output for a stored family graph.
//!
//! # Invariants
//! - The snapshot store is only written by `import`.
//! - Logging is initialized before any core call.

use clap::{Args, Parser, Subcommand, ValueEnum};
use kinship_core::{
    core_version, default_log_level, init_logging, init_stderr_logging, ClanOptions,
    FamilyService, FamilyServiceError, JsonFileFamilyRepository, LayoutParams, ViewMode,
};
use log::error;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "kinship", version, about = "Genealogy import, merge and layout")]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, env = "KINSHIP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr otherwise.
    #[arg(long, env = "KINSHIP_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an interchange file and merge it into the store.
    Import {
        file: PathBuf,
        #[arg(long)]
        store: PathBuf,
    },
    /// Print one line per clan.
    Clans(ViewArgs),
    /// Print clans and layout as JSON.
    Layout {
        #[command(flatten)]
        view: ViewArgs,
        /// Root id of a clan to leave out. Repeatable.
        #[arg(long = "hide")]
        hidden: Vec<String>,
    },
    /// Print the core version.
    Version,
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[arg(long)]
    store: PathBuf,
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,
    /// Person whose children stay expanded in `units` mode.
    #[arg(long)]
    focus: Option<String>,
    /// Person whose clan is listed first.
    #[arg(long)]
    default_focus: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    All,
    Units,
}

impl ViewArgs {
    fn options(&self) -> ClanOptions {
        ClanOptions {
            mode: match self.mode {
                Mode::All => ViewMode::All,
                Mode::Units => ViewMode::Units,
            },
            focus_id: self.focus.clone(),
            default_focus_id: self.default_focus.clone(),
        }
    }
}

#[derive(Debug)]
enum CliError {
    Logging(String),
    Io(std::io::Error),
    Service(FamilyServiceError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Io(err) => write!(f, "failed to read input: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "failed to encode output: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FamilyServiceError> for CliError {
    fn from(value: FamilyServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_failed module=cli status=error");
            eprintln!("kinship: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let init = match cli.log_dir.as_deref() {
        Some(dir) => init_logging(&level, dir),
        None => init_stderr_logging(&level),
    };
    init.map_err(CliError::Logging)?;

    match cli.command {
        Command::Import { file, store } => {
            let text = std::fs::read_to_string(&file)?;
            let mut service = FamilyService::new(JsonFileFamilyRepository::new(store));
            let stats = service.import_gedcom(&text)?;
            println!("added={} updated={}", stats.added, stats.updated);
        }
        Command::Clans(view) => {
            let service = FamilyService::new(JsonFileFamilyRepository::new(&view.store));
            for clan in service.clans(&view.options())? {
                println!(
                    "{}\t{}\t{}\t{}",
                    clan.root_id,
                    clan.name,
                    clan.member_count,
                    clan.color()
                );
            }
        }
        Command::Layout { view, hidden } => {
            let service = FamilyService::new(JsonFileFamilyRepository::new(&view.store));
            let hidden: HashSet<String> = hidden.into_iter().collect();
            let result = service.view(&view.options(), &LayoutParams::default(), &hidden)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Version => println!("kinship_core version={}", core_version()),
    }
    Ok(())
}
