//! Centralized theme for the console.
//!
//! - `palette` — raw color constants per variant
//! - `styles` — semantic style builder functions

pub mod palette;
pub mod styles;

use ratatui::style::Color;

use chargedeck_app::config::ThemeVariant;

/// Resolved theme colors for one variant.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    pub border_active: Color,
    pub popup_bg: Color,
    pub selection_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self {
                text_primary: palette::dark::TEXT_PRIMARY,
                text_secondary: palette::dark::TEXT_SECONDARY,
                text_muted: palette::dark::TEXT_MUTED,
                accent: palette::dark::ACCENT,
                border: palette::dark::BORDER_DIM,
                border_active: palette::dark::BORDER_ACTIVE,
                popup_bg: palette::dark::POPUP_BG,
                selection_bg: palette::dark::SELECTION_BG,
                success: palette::STATUS_GREEN,
                warning: palette::STATUS_YELLOW,
                error: palette::STATUS_RED,
            },
            ThemeVariant::Light => Self {
                text_primary: palette::light::TEXT_PRIMARY,
                text_secondary: palette::light::TEXT_SECONDARY,
                text_muted: palette::light::TEXT_MUTED,
                accent: palette::light::ACCENT,
                border: palette::light::BORDER_DIM,
                border_active: palette::light::BORDER_ACTIVE,
                popup_bg: palette::light::POPUP_BG,
                selection_bg: palette::light::SELECTION_BG,
                success: palette::STATUS_GREEN,
                warning: palette::STATUS_YELLOW,
                error: palette::STATUS_RED,
            },
        }
    }
}
