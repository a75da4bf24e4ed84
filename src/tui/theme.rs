//! TUI theming and colors.

use ratatui::style::{Color, Modifier, Style};

use crate::model::Role;

/// Application theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name of the theme.
    pub name: String,
    /// Foreground color.
    pub foreground: Color,
    /// Title and accent color.
    pub primary: Color,
    /// Secondary accent color.
    pub secondary: Color,
    /// Border color.
    pub border: Color,
    /// Selection highlight.
    pub selection: Color,
    /// User turn color.
    pub user: Color,
    /// Assistant turn color.
    pub assistant: Color,
    /// System turn color.
    pub system: Color,
    /// Color of any other role.
    pub other: Color,
    /// Error color.
    pub error: Color,
    /// Warning color.
    pub warning: Color,
    /// Hints and indicators.
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the default dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Color::White,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            border: Color::DarkGray,
            selection: Color::DarkGray,
            user: Color::Green,
            assistant: Color::Blue,
            system: Color::Yellow,
            other: Color::White,
            error: Color::Red,
            warning: Color::Yellow,
            muted: Color::Gray,
        }
    }

    /// Create a light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Color::Black,
            primary: Color::Blue,
            secondary: Color::Magenta,
            border: Color::Gray,
            selection: Color::LightBlue,
            user: Color::Green,
            assistant: Color::Blue,
            system: Color::Yellow,
            other: Color::Black,
            error: Color::Red,
            warning: Color::Yellow,
            muted: Color::DarkGray,
        }
    }

    /// Create a high contrast theme.
    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            foreground: Color::White,
            primary: Color::Yellow,
            secondary: Color::Cyan,
            border: Color::White,
            selection: Color::White,
            user: Color::Green,
            assistant: Color::Cyan,
            system: Color::Yellow,
            other: Color::White,
            error: Color::Red,
            warning: Color::Yellow,
            muted: Color::White,
        }
    }

    /// Get theme by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" | "highcontrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Get style for borders.
    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for titles.
    #[must_use]
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for plain rows.
    #[must_use]
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for selected items.
    #[must_use]
    pub fn selection_style(&self) -> Style {
        let style = Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD);
        // A white bar would hide white text.
        if self.selection == Color::White {
            style.fg(Color::Black)
        } else {
            style
        }
    }

    /// Get the header style for a turn's role.
    #[must_use]
    pub fn role_style(&self, role: &Role) -> Style {
        let color = match role {
            Role::User => self.user,
            Role::Assistant => self.assistant,
            Role::System => self.system,
            Role::Other(_) => self.other,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Get style for the synthetic back rows.
    #[must_use]
    pub fn back_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    /// Get style for hints and the page indicator.
    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for errors.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for warnings.
    #[must_use]
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }
}

/// Available themes list.
#[must_use]
pub fn available_themes() -> Vec<&'static str> {
    vec!["dark", "light", "high-contrast"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_theme_resolves() {
        for name in available_themes() {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("HighContrast").is_some());
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn test_role_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.role_style(&Role::User).fg, Some(Color::Green));
        assert_eq!(theme.role_style(&Role::Assistant).fg, Some(Color::Blue));
        assert_eq!(theme.role_style(&Role::System).fg, Some(Color::Yellow));
        assert_eq!(
            theme.role_style(&Role::Other("tool".into())).fg,
            Some(Color::White)
        );
    }

    #[test]
    fn test_high_contrast_selection_stays_readable() {
        let style = Theme::high_contrast().selection_style();
        assert_eq!(style.fg, Some(Color::Black));
        assert_eq!(style.bg, Some(Color::White));
    }
}
