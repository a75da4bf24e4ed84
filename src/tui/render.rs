//! Screen rendering.
//!
//! [`render`] turns the navigator into a [`Screen`] without touching the
//! terminal; [`draw`] paints a screen into a ratatui frame. Keeping the two
//! apart lets tests inspect exactly what would be shown.
//!
//! `draw` wraps every line to the body width itself, so row heights are
//! exact screen lines and the selected row can always be scrolled into view.

use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::model::Turn;

use super::pagination::PageWindow;
use super::state::{NavigationState, Navigator, Viewport, BACK_TO_DATES, BACK_TO_SESSIONS};
use super::theme::Theme;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Use only ASCII glyphs.
    pub ascii: bool,
}

impl RenderOptions {
    fn marker(self) -> &'static str {
        if self.ascii {
            "> "
        } else {
            "▶ "
        }
    }
}

/// One list row. Turns span several lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Display lines of the row.
    pub lines: Vec<Line<'static>>,
    /// Whether the row holds the cursor.
    pub selected: bool,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Heading of the active level.
    pub title: String,
    /// Second heading line.
    pub subtitle: Option<String>,
    /// Key help.
    pub hint: String,
    /// Visible rows of the active page.
    pub rows: Vec<Row>,
    /// `Page X/Y (Total: N items)` when the list spans pages.
    pub page_indicator: Option<String>,
    /// Transient error.
    pub error: Option<String>,
    /// Lines of the selected row scrolled out of view at the top.
    pub line_offset: usize,
}

impl Screen {
    /// All row text joined by newlines, styling dropped.
    #[must_use]
    pub fn plain_rows(&self) -> String {
        self.rows
            .iter()
            .flat_map(|row| row.lines.iter())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the screen for the navigator's active level.
#[must_use]
pub fn render(nav: &Navigator, theme: &Theme, options: &RenderOptions) -> Screen {
    let window = nav.window();

    let (title, subtitle, rows) = match nav.state() {
        NavigationState::AtDates => {
            let mut rows = list_rows(window, theme, options, |i| {
                nav.dates().get(i).map(|d| (d.label(), theme.text_style()))
            });
            if nav.dates().is_empty() {
                rows.push(notice_row(
                    format!("No sessions found in {}", nav.store().root().display()),
                    theme,
                ));
            }
            ("Select a Date".to_string(), None, rows)
        }
        NavigationState::AtSessions { date, sessions } => {
            let mut rows = list_rows(window, theme, options, |i| match i {
                0 => Some((BACK_TO_DATES.to_string(), theme.back_style())),
                _ => sessions
                    .get(i - 1)
                    .map(|s| (s.label(), theme.text_style())),
            });
            if sessions.is_empty() {
                rows.push(notice_row(format!("No sessions found for {}", date.label()), theme));
            }
            (format!("Select a Session from {}", date.label()), None, rows)
        }
        NavigationState::AtConversation {
            date,
            session,
            turns,
            malformed_lines,
            ..
        } => {
            let mut rows = Vec::new();
            for i in window.visible_range() {
                let selected = i == window.selected_index();
                let row = match i {
                    0 => single_line_row(BACK_TO_SESSIONS, theme.back_style(), selected, theme, options),
                    _ => match turns.get(i - 1) {
                        Some(turn) => turn_row(turn, selected, theme, options),
                        None => continue,
                    },
                };
                rows.push(row);
            }
            if turns.is_empty() {
                rows.push(notice_row("No messages found in this session".to_string(), theme));
            }

            let mut subtitle = format!("Session: {}", session.file_name());
            if *malformed_lines > 0 {
                let noun = if *malformed_lines == 1 { "line" } else { "lines" };
                subtitle.push_str(&format!(" ({malformed_lines} malformed {noun} skipped)"));
            }
            (format!("Date: {}", date.label()), Some(subtitle), rows)
        }
    };

    let page_indicator = window.needs_indicator().then(|| {
        format!(
            "Page {}/{} (Total: {} items)",
            window.current_page(),
            window.total_pages(),
            window.count()
        )
    });

    Screen {
        title,
        subtitle,
        hint: hint(options, window.needs_indicator()),
        rows,
        page_indicator,
        error: nav.error().map(str::to_string),
        line_offset: nav.line_offset(),
    }
}

fn hint(options: &RenderOptions, paged: bool) -> String {
    let arrows = if options.ascii { "Up/Down" } else { "↑/↓" };
    let pages = if paged { ", PgUp/PgDn for pages" } else { "" };
    format!("Use {arrows} to navigate{pages}, Enter to select, Esc to go back, 'q' to quit")
}

fn list_rows(
    window: &PageWindow,
    theme: &Theme,
    options: &RenderOptions,
    item: impl Fn(usize) -> Option<(String, ratatui::style::Style)>,
) -> Vec<Row> {
    window
        .visible_range()
        .filter_map(|i| {
            let (label, style) = item(i)?;
            Some(single_line_row(&label, style, i == window.selected_index(), theme, options))
        })
        .collect()
}

fn single_line_row(
    label: &str,
    style: ratatui::style::Style,
    selected: bool,
    theme: &Theme,
    options: &RenderOptions,
) -> Row {
    let line = Line::from(vec![
        Span::raw(prefix(selected, options)),
        Span::styled(label.to_string(), style),
    ]);
    Row {
        lines: vec![highlight(line, selected, theme)],
        selected,
    }
}

fn turn_row(turn: &Turn, selected: bool, theme: &Theme, options: &RenderOptions) -> Row {
    let mut header = vec![
        Span::raw(prefix(selected, options)),
        Span::styled(format!("{}:", turn.role.label()), theme.role_style(&turn.role)),
    ];
    if let Some(ts) = turn.timestamp {
        header.push(Span::styled(
            format!(" {}", ts.with_timezone(&chrono::Local).format("%H:%M:%S")),
            theme.muted_style(),
        ));
    }

    let mut lines = vec![highlight(Line::from(header), selected, theme)];
    lines.extend(
        turn.lines()
            .map(|l| Line::styled(format!("  {l}"), theme.text_style())),
    );
    lines.push(Line::default());

    Row { lines, selected }
}

fn notice_row(text: String, theme: &Theme) -> Row {
    Row {
        lines: vec![Line::styled(format!("  {text}"), theme.warning_style())],
        selected: false,
    }
}

fn prefix(selected: bool, options: &RenderOptions) -> &'static str {
    if selected {
        options.marker()
    } else {
        "  "
    }
}

fn highlight(line: Line<'static>, selected: bool, theme: &Theme) -> Line<'static> {
    if selected {
        line.patch_style(theme.selection_style())
    } else {
        line
    }
}

/// Paint a screen into the whole frame and report the body geometry.
pub fn draw(frame: &mut Frame, screen: &Screen, theme: &Theme) -> Viewport {
    let mut header = vec![Line::styled(screen.title.clone(), theme.title_style())];
    if let Some(subtitle) = &screen.subtitle {
        header.push(Line::styled(subtitle.clone(), theme.title_style()));
    }
    header.push(Line::styled(screen.hint.clone(), theme.muted_style()));
    if let Some(indicator) = &screen.page_indicator {
        header.push(Line::styled(indicator.clone(), theme.warning_style()));
    }

    let header_height = u16::try_from(header.len()).unwrap_or(u16::MAX).saturating_add(1);
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(header_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(header).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.border_style()),
        ),
        header_area,
    );

    let width = usize::from(body_area.width);
    let rows: Vec<WrappedRow> = screen
        .rows
        .iter()
        .map(|row| WrappedRow {
            lines: row.lines.iter().flat_map(|l| wrap_line(l, width)).collect(),
            selected: row.selected,
        })
        .collect();

    let height = usize::from(body_area.height);
    let (scroll, viewport) = body_scroll(&rows, height, screen.line_offset);
    let body: Vec<Line> = rows
        .into_iter()
        .flat_map(|row| row.lines)
        .skip(scroll)
        .take(height)
        .collect();
    frame.render_widget(Paragraph::new(body), body_area);

    if let Some(error) = &screen.error {
        frame.render_widget(
            Paragraph::new(Line::styled(error.clone(), theme.error_style())),
            footer_area,
        );
    }

    viewport
}

/// A row split into screen lines.
struct WrappedRow {
    lines: Vec<Line<'static>>,
    selected: bool,
}

/// Split a line into pieces no wider than `width` columns, keeping styles.
fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line.clone()];
    }

    let mut pieces = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for span in &line.spans {
        let mut chunk = String::new();
        for ch in span.content.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used > 0 && used + ch_width > width {
                if !chunk.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut chunk), span.style));
                }
                pieces.push(Line::from(std::mem::take(&mut spans)).style(line.style));
                used = 0;
            }
            chunk.push(ch);
            used += ch_width;
        }
        if !chunk.is_empty() {
            spans.push(Span::styled(chunk, span.style));
        }
    }
    if !spans.is_empty() {
        pieces.push(Line::from(spans).style(line.style));
    }
    pieces
}

/// Lines to skip so the selected row is in view, and the resulting geometry.
///
/// A row that fits is kept whole at the bottom edge at worst. A taller row
/// starts `line_offset` lines in, clamped so its tail can reach the bottom.
fn body_scroll(rows: &[WrappedRow], height: usize, line_offset: usize) -> (usize, Viewport) {
    let mut start = 0;
    for row in rows {
        let row_height = row.lines.len();
        if row.selected {
            if row_height <= height {
                let scroll = (start + row_height).saturating_sub(height);
                return (scroll, Viewport { height, ..Viewport::default() });
            }
            let max_offset = row_height - height;
            let offset = line_offset.min(max_offset);
            return (
                start + offset,
                Viewport {
                    height,
                    line_offset: offset,
                    hidden_below: max_offset - offset,
                },
            );
        }
        start += row_height;
    }
    (0, Viewport { height, ..Viewport::default() })
}
