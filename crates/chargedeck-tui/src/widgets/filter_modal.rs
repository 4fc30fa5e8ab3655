//! Filter modal widget

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Widget};

use chargedeck_app::form::FilterModal;

use crate::theme::{styles, Theme};
use crate::widgets::modal_overlay::{centered_rect, clear_under};
use crate::widgets::truncate;

pub struct FilterModalWidget<'a> {
    filter: &'a FilterModal,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> FilterModalWidget<'a> {
    pub fn new(filter: &'a FilterModal, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            filter,
            title,
            theme,
        }
    }
}

impl Widget for FilterModalWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (self.filter.fields.len() as u16) * 2 + 4;
        let modal = centered_rect(44, height.min(area.height), area);
        if modal.width < 10 || modal.height < 4 {
            return;
        }
        clear_under(modal, buf);

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(self.theme.border_active))
            .title(format!(" Filter · {} ", self.title))
            .render(modal, buf);

        let inner_x = modal.x + 2;
        let width = modal.width.saturating_sub(4);
        let mut y = modal.y + 1;
        for (idx, field) in self.filter.fields.iter().enumerate() {
            if y + 1 >= modal.bottom().saturating_sub(1) {
                break;
            }
            buf.set_string(
                inner_x,
                y,
                truncate(field.label, width as usize),
                styles::label(self.theme),
            );
            let focused = idx == self.filter.focus;
            let style = if focused {
                styles::focused_value(self.theme)
            } else {
                styles::value(self.theme)
            };
            let cursor = if focused { "▏" } else { "" };
            buf.set_string(
                inner_x + 1,
                y + 1,
                truncate(
                    &format!("{}{cursor}", self.filter.buffers[idx]),
                    width.saturating_sub(1) as usize,
                ),
                style,
            );
            y += 2;
        }

        buf.set_string(
            inner_x,
            modal.bottom().saturating_sub(2),
            truncate("Enter apply · ^R clear · Esc close", width as usize),
            styles::muted(self.theme),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_app::entities::EntityKind;

    #[test]
    fn test_renders_fields_and_hints() {
        let descriptor = EntityKind::Stations.descriptor();
        let filter = FilterModal::open(descriptor.filter_fields, &Default::default());
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let widget = FilterModalWidget::new(&filter, "Stations", &theme);

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 20));
        widget.render(Rect::new(0, 0, 80, 20), &mut buf);

        let mut text = String::new();
        for y in 0..20 {
            for x in 0..80 {
                if let Some(cell) = buf.cell((x, y)) {
                    text.push_str(cell.symbol());
                }
            }
        }
        assert!(text.contains("Filter · Stations"));
        assert!(text.contains("Name"));
        assert!(text.contains("apply"));
    }
}
