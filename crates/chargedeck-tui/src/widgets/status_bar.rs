//! Bottom status bar: paging position, session identity, key hints

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use chargedeck_app::{AppState, Overlay, Screen};
use chargedeck_core::Role;

use crate::theme::{styles, Theme};
use crate::widgets::truncate;

pub struct StatusBar<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn left_text(&self) -> String {
        match self.state.screen {
            Screen::Dashboard => {
                if self.state.dashboard.any_loading() {
                    "refreshing…".to_string()
                } else {
                    "r refresh · 1-8 screens · q quit".to_string()
                }
            }
            Screen::Browser => {
                let list = &self.state.browser.list;
                let loading = if list.loading { " · loading…" } else { "" };
                format!(
                    "page {}/{} · {} items{loading}",
                    list.page,
                    list.total_pages().max(1),
                    list.total_items,
                )
            }
        }
    }

    fn hint_text(&self) -> &'static str {
        if self.state.screen == Screen::Dashboard {
            return "";
        }
        match self.state.browser.overlay() {
            Overlay::None => {
                if self.state.browser.entity.child.is_some() {
                    "↵ menu · n new · f filter · space expand · ]/[ bay page"
                } else {
                    "↵ menu · n new · f filter · v/e/x row · s sort"
                }
            }
            Overlay::Menu => "↑↓ choose · ↵ run · esc close",
            _ => "",
        }
    }

    fn right_text(&self) -> String {
        let session = &self.state.session;
        let role = match session.role {
            Role::Admin => "admin",
            Role::Operator => "operator",
        };
        format!("{} ({role})", session.user.email)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let left = self.left_text();
        buf.set_string(
            area.x + 1,
            area.y,
            truncate(&left, area.width as usize / 3),
            styles::value(self.theme),
        );

        let hints = self.hint_text();
        if !hints.is_empty() {
            let x = area.x + area.width / 3;
            buf.set_string(
                x,
                area.y,
                truncate(hints, (area.width / 2) as usize),
                styles::muted(self.theme),
            );
        }

        let right = self.right_text();
        let right_len = right.chars().count() as u16;
        if right_len + 1 < area.width {
            buf.set_string(
                area.right().saturating_sub(right_len + 1),
                area.y,
                &right,
                styles::label(self.theme),
            );
        }
    }
}
