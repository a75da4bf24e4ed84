//! Show command implementation.
//!
//! Prints one session's conversation the way the browser lays it out,
//! without the terminal UI.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, OutputFormat, ShowArgs};
use crate::error::Result;
use crate::model::Turn;
use crate::parser::SessionParser;

/// Run the show command.
pub fn run(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let (turns, malformed) = parse(&args.path, args.strict)?;
    if malformed > 0 {
        info!(path = %args.path.display(), malformed, "Skipped malformed lines");
    }

    let mut out = std::io::stdout().lock();
    match cli.effective_output() {
        OutputFormat::Json => {
            let output: Vec<TurnInfo> = turns.iter().map(TurnInfo::from).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Text => write_text(&mut out, &turns)?,
    }
    Ok(())
}

fn parse(path: &Path, strict: bool) -> Result<(Vec<Turn>, usize)> {
    let mut parser = SessionParser::new().with_lenient(!strict);
    let turns = parser.parse_file(path)?;
    Ok((turns, parser.stats().lines_malformed))
}

/// Write turns as `role:` headers followed by their bodies.
pub fn write_text<W: Write>(out: &mut W, turns: &[Turn]) -> Result<()> {
    if turns.is_empty() {
        writeln!(out, "No messages found in this session")?;
        return Ok(());
    }
    for turn in turns {
        writeln!(out, "{}:", turn.role)?;
        writeln!(out, "{}", turn.text)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Turn information for JSON output.
#[derive(Debug, Serialize)]
struct TurnInfo {
    ordinal: usize,
    role: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

impl From<&Turn> for TurnInfo {
    fn from(turn: &Turn) -> Self {
        Self {
            ordinal: turn.ordinal,
            role: turn.role.label().to_string(),
            text: turn.text.clone(),
            timestamp: turn.timestamp,
        }
    }
}
