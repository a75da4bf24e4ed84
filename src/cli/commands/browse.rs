//! Interactive browser command.
//!
//! Resolves the sessions root, theme and page sizes, then hands the
//! terminal to the viewer until the user quits.

use tracing::info;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{CohistoryError, Result};
use crate::tui::{self, available_themes, KeyBindings, RenderOptions, Theme, ViewerOptions};

use super::open_store;

/// Run the browse command.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let store = open_store(cli, config)?;
    let options = viewer_options(cli, config)?;

    let exit = tui::run(store, &options)?;
    info!(?exit, "Browser finished");

    println!("Goodbye!");
    Ok(())
}

/// Merge CLI flags over the configuration.
pub fn viewer_options(cli: &Cli, config: &Config) -> Result<ViewerOptions> {
    let theme = match &cli.theme {
        Some(name) => Theme::from_name(name).ok_or_else(|| CohistoryError::InvalidArgument {
            name: "theme".to_string(),
            reason: unknown_theme(name),
        })?,
        None => Theme::from_name(&config.theme.name).ok_or_else(|| {
            CohistoryError::InvalidConfig {
                message: unknown_theme(&config.theme.name),
            }
        })?,
    };

    Ok(ViewerOptions {
        theme,
        render: RenderOptions {
            ascii: cli.ascii || config.theme.ascii,
        },
        page_sizes: config.pages.into(),
        bindings: KeyBindings::default(),
    })
}

fn unknown_theme(name: &str) -> String {
    format!(
        "unknown theme '{name}' (available: {})",
        available_themes().join(", ")
    )
}
