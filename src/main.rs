//! cohistory: terminal browser for Codex conversation history.

use std::process::ExitCode;

use cohistory::{cli, CohistoryError};

fn main() -> ExitCode {
    // Logging is initialized by cli::run based on --log-level and --log-format
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            if let CohistoryError::NotFound { .. } = e {
                eprintln!("Hint: pass --sessions-dir or set CODEX_HOME to point at your Codex data");
            }

            // Print cause chain in debug mode
            if std::env::var("RUST_BACKTRACE").is_ok() {
                if let Some(source) = std::error::Error::source(&e) {
                    eprintln!("Caused by: {source}");
                }
            }

            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
