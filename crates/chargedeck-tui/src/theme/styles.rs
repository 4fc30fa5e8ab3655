//! Semantic style builders.

use ratatui::style::{Modifier, Style};

use chargedeck_app::notifications::Level;

use super::Theme;

pub fn column_header(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.text_muted)
        .add_modifier(Modifier::BOLD)
}

pub fn row(theme: &Theme) -> Style {
    Style::default().fg(theme.text_primary)
}

pub fn row_selected(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.accent)
        .bg(theme.selection_bg)
        .add_modifier(Modifier::BOLD)
}

pub fn child_row(theme: &Theme) -> Style {
    Style::default().fg(theme.text_secondary)
}

pub fn child_row_selected(theme: &Theme) -> Style {
    Style::default().fg(theme.accent).bg(theme.selection_bg)
}

pub fn muted(theme: &Theme) -> Style {
    Style::default().fg(theme.text_muted)
}

pub fn label(theme: &Theme) -> Style {
    Style::default().fg(theme.text_secondary)
}

pub fn value(theme: &Theme) -> Style {
    Style::default().fg(theme.text_primary)
}

pub fn focused_value(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD)
}

pub fn error_text(theme: &Theme) -> Style {
    Style::default().fg(theme.error)
}

pub fn notification(theme: &Theme, level: Level) -> Style {
    let color = match level {
        Level::Info => theme.accent,
        Level::Success => theme.success,
        Level::Error => theme.error,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn tab(theme: &Theme) -> Style {
    Style::default().fg(theme.text_secondary)
}

pub fn tab_active(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD)
}
