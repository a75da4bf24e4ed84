//! Command-line interface for cohistory.
//!
//! With no subcommand the interactive browser starts. The other commands
//! print the same data non-interactively:
//! - `dates`: List dates holding sessions
//! - `sessions`: List the sessions of a date
//! - `show`: Print a parsed conversation
//! - `completions`: Generate shell completions

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Browse Codex conversation history from the terminal.
#[derive(Debug, Parser)]
#[command(name = "cohistory")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run (default: browse).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the sessions directory (default: $CODEX_HOME/sessions or ~/.codex/sessions).
    #[arg(short = 'd', long, global = true, env = "COHISTORY_SESSIONS_DIR")]
    pub sessions_dir: Option<PathBuf>,

    /// Output format for the listing commands.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "COHISTORY_OUTPUT")]
    pub output: OutputFormat,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true)]
    pub json: bool,

    /// Color theme (dark, light, high-contrast).
    #[arg(long, global = true, env = "COHISTORY_THEME")]
    pub theme: Option<String>,

    /// Use ASCII glyphs only.
    #[arg(long, global = true, env = "COHISTORY_ASCII")]
    pub ascii: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "COHISTORY_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "COHISTORY_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Log output file (default: stderr; discarded while browsing).
    #[arg(long, global = true, env = "COHISTORY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "COHISTORY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Whether this invocation takes over the terminal.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Browse))
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse sessions interactively (the default).
    #[command(alias = "ui")]
    Browse,

    /// List dates holding sessions, most recent first.
    Dates(DatesArgs),

    /// List the sessions of a date, most recent first.
    #[command(alias = "ls")]
    Sessions(SessionsArgs),

    /// Print the conversation of a session file.
    #[command(alias = "cat")]
    Show(ShowArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the dates command.
#[derive(Debug, Clone, clap::Args)]
pub struct DatesArgs {
    /// Maximum number of dates to print.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for the sessions command.
#[derive(Debug, Clone, clap::Args)]
pub struct SessionsArgs {
    /// Date in YYYY-MM-DD form.
    pub date: String,
}

/// Arguments for the show command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Path to a session JSONL file.
    pub path: PathBuf,

    /// Fail on the first malformed line instead of skipping it.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, crate::NAME, &mut io::stdout());
}

/// Initialize logging based on CLI options.
///
/// `RUST_LOG` overrides `--log-level`. While the browser owns the terminal,
/// events go to `--log-file` or nowhere.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let log_file = cli.log_file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("Warning: Could not open log file {}: {e}", path.display()))
            .ok()
    });
    let ansi = log_file.is_none() && !cli.is_interactive();
    let writer = match log_file {
        Some(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
        None if cli.is_interactive() => BoxMakeWriter::new(io::sink),
        None => BoxMakeWriter::new(io::stderr),
    };

    // Build subscriber based on log format
    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_ansi(ansi)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_ansi(ansi).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Load the configuration named on the command line, or the default one.
fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    let config = load_config(&cli)?;

    match &cli.command {
        None | Some(Commands::Browse) => commands::browse::run(&cli, &config),
        Some(Commands::Dates(args)) => commands::list::dates(&cli, &config, args),
        Some(Commands::Sessions(args)) => commands::list::sessions(&cli, &config, args),
        Some(Commands::Show(args)) => commands::show::run(&cli, args),
        Some(Commands::Completions(args)) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
