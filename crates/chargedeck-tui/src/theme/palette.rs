//! Color palette constants per theme variant.

use ratatui::style::Color;

// --- Status (shared across variants) ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;

pub mod dark {
    use ratatui::style::Color;

    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Gray;
    pub const TEXT_MUTED: Color = Color::DarkGray;

    pub const ACCENT: Color = Color::Cyan;

    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_ACTIVE: Color = Color::Cyan;

    pub const POPUP_BG: Color = Color::Black;
    pub const SELECTION_BG: Color = Color::DarkGray;
}

pub mod light {
    use ratatui::style::Color;

    pub const TEXT_PRIMARY: Color = Color::Black;
    pub const TEXT_SECONDARY: Color = Color::DarkGray;
    pub const TEXT_MUTED: Color = Color::Gray;

    pub const ACCENT: Color = Color::Blue;

    pub const BORDER_DIM: Color = Color::Gray;
    pub const BORDER_ACTIVE: Color = Color::Blue;

    pub const POPUP_BG: Color = Color::White;
    pub const SELECTION_BG: Color = Color::Gray;
}
