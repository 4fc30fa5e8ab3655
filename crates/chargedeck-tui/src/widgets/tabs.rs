//! Screen tab bar: dashboard plus one tab per admin resource

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use chargedeck_app::entities::EntityKind;
use chargedeck_app::Screen;

use crate::theme::{styles, Theme};

pub struct TabBar<'a> {
    screen: Screen,
    active: EntityKind,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(screen: Screen, active: EntityKind, theme: &'a Theme) -> Self {
        Self {
            screen,
            active,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let mut x = area.x + 1;

        let dash_style = if self.screen == Screen::Dashboard {
            styles::tab_active(self.theme)
        } else {
            styles::tab(self.theme)
        };
        let dash = "0 Dashboard";
        buf.set_string(x, area.y, dash, dash_style);
        x += dash.len() as u16 + 2;

        for (idx, kind) in EntityKind::ALL.iter().enumerate() {
            let label = format!("{} {}", idx + 1, kind.descriptor().title);
            if x + label.len() as u16 >= area.right() {
                break;
            }
            let style = if self.screen == Screen::Browser && *kind == self.active {
                styles::tab_active(self.theme)
            } else {
                styles::tab(self.theme)
            };
            buf.set_string(x, area.y, &label, style);
            x += label.len() as u16 + 2;
        }
    }
}
