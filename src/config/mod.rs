//! Configuration management for cohistory.
//!
//! Handles:
//! - Sessions root override
//! - Theme settings
//! - Page sizes

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CohistoryError, Result};
use crate::tui::PageSizes;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Sessions root, overriding auto-discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_dir: Option<PathBuf>,
    /// TUI theme.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Rows per page.
    #[serde(default)]
    pub pages: PagesConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file, or a platform without a config directory, yields the
    /// defaults.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CohistoryError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| CohistoryError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the viewer cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("pages.dates", self.pages.dates),
            ("pages.sessions", self.pages.sessions),
            ("pages.conversation", self.pages.conversation),
        ] {
            if size == 0 {
                return Err(CohistoryError::InvalidConfig {
                    message: format!("{name} must be at least 1"),
                });
            }
        }
        Ok(())
    }
}

/// Theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Theme name.
    #[serde(default = "default_theme")]
    pub name: String,
    /// Use only ASCII glyphs.
    #[serde(default)]
    pub ascii: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme(),
            ascii: false,
        }
    }
}

/// Page size configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Dates per page.
    #[serde(default = "default_dates_page")]
    pub dates: usize,
    /// Session rows per page.
    #[serde(default = "default_sessions_page")]
    pub sessions: usize,
    /// Conversation rows per page.
    #[serde(default = "default_conversation_page")]
    pub conversation: usize,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dates: default_dates_page(),
            sessions: default_sessions_page(),
            conversation: default_conversation_page(),
        }
    }
}

impl From<PagesConfig> for PageSizes {
    fn from(pages: PagesConfig) -> Self {
        Self {
            dates: pages.dates,
            sessions: pages.sessions,
            conversation: pages.conversation,
        }
    }
}

// Default value functions for serde
fn default_theme() -> String {
    "dark".to_string()
}

fn default_dates_page() -> usize {
    15
}

fn default_sessions_page() -> usize {
    10
}

fn default_conversation_page() -> usize {
    10
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| CohistoryError::InvalidConfig {
        message: "cannot determine the user config directory".to_string(),
    })?;

    Ok(config_dir.join(crate::NAME).join("config.toml"))
}
