//! Row action menu widget
//!
//! A small popup anchored at the selected row. Placement flips above the
//! anchor when the space below cannot hold every entry.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Widget};

use chargedeck_app::menu::ActionMenu;

use crate::theme::{styles, Theme};
use crate::widgets::modal_overlay::clear_under;
use crate::widgets::truncate;

pub struct ActionMenuWidget<'a> {
    menu: &'a ActionMenu,
    /// Screen row of the anchor (the selected table row).
    anchor_y: u16,
    theme: &'a Theme,
}

impl<'a> ActionMenuWidget<'a> {
    pub fn new(menu: &'a ActionMenu, anchor_y: u16, theme: &'a Theme) -> Self {
        Self {
            menu,
            anchor_y,
            theme,
        }
    }
}

impl Widget for ActionMenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.menu.is_open() || area.width < 20 {
            return;
        }
        let entries = self.menu.entries();
        let height = entries.len() as u16 + 2;
        let width = 20u16;

        // Flip above when there is not enough room below the anchor.
        let rows_below = area.bottom().saturating_sub(self.anchor_y + 1) as usize;
        let y = if self.menu.opens_upward(rows_below.saturating_sub(2)) {
            self.anchor_y.saturating_sub(height)
        } else {
            self.anchor_y + 1
        };
        let x = area.right().saturating_sub(width + 2);
        let menu_area = Rect::new(x, y.max(area.y), width, height.min(area.height));
        clear_under(menu_area, buf);

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(self.theme.border_active))
            .render(menu_area, buf);

        for (idx, action) in entries.iter().enumerate() {
            let y = menu_area.y + 1 + idx as u16;
            if y >= menu_area.bottom().saturating_sub(1) {
                break;
            }
            let style = if idx == self.menu.selected {
                styles::row_selected(self.theme)
            } else {
                styles::row(self.theme)
            };
            buf.set_string(
                menu_area.x + 2,
                y,
                truncate(action.title(), width as usize - 4),
                style,
            );
        }
    }
}
