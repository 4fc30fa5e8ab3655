//! Delete confirmation and admin-response dialogs

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Widget};

use chargedeck_app::state::{ConfirmDeleteState, ResponseInputState};

use crate::theme::{styles, Theme};
use crate::widgets::modal_overlay::{centered_rect, clear_under};
use crate::widgets::truncate;

pub struct ConfirmDialog<'a> {
    confirm: &'a ConfirmDeleteState,
    in_flight: bool,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(confirm: &'a ConfirmDeleteState, in_flight: bool, theme: &'a Theme) -> Self {
        Self {
            confirm,
            in_flight,
            theme,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = centered_rect(46, 6, area);
        if modal.width < 12 || modal.height < 5 {
            return;
        }
        clear_under(modal, buf);

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(self.theme.error))
            .title(" Delete ")
            .render(modal, buf);

        let width = modal.width.saturating_sub(4) as usize;
        buf.set_string(
            modal.x + 2,
            modal.y + 1,
            truncate(&format!("Delete '{}'?", self.confirm.label), width),
            styles::value(self.theme),
        );
        buf.set_string(
            modal.x + 2,
            modal.y + 2,
            truncate("This action cannot be undone.", width),
            styles::muted(self.theme),
        );
        let hints = if self.in_flight {
            "deleting…"
        } else {
            "y / Enter delete · n / Esc cancel"
        };
        buf.set_string(
            modal.x + 2,
            modal.y + 4,
            truncate(hints, width),
            styles::muted(self.theme),
        );
    }
}

/// Admin response prompt shown before approving or rejecting an account
/// request.
pub struct ResponseDialog<'a> {
    input: &'a ResponseInputState,
    in_flight: bool,
    theme: &'a Theme,
}

impl<'a> ResponseDialog<'a> {
    pub fn new(input: &'a ResponseInputState, in_flight: bool, theme: &'a Theme) -> Self {
        Self {
            input,
            in_flight,
            theme,
        }
    }
}

impl Widget for ResponseDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = centered_rect(52, 6, area);
        if modal.width < 12 || modal.height < 5 {
            return;
        }
        clear_under(modal, buf);

        let title = if self.input.approve {
            " Approve request "
        } else {
            " Reject request "
        };
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(self.theme.border_active))
            .title(title)
            .render(modal, buf);

        let width = modal.width.saturating_sub(4) as usize;
        buf.set_string(
            modal.x + 2,
            modal.y + 1,
            truncate("Message to the requester:", width),
            styles::label(self.theme),
        );
        buf.set_string(
            modal.x + 2,
            modal.y + 2,
            truncate(&format!("{}▏", self.input.buffer), width),
            styles::focused_value(self.theme),
        );
        let hints = if self.in_flight {
            "sending…"
        } else {
            "Enter send · Esc cancel"
        };
        buf.set_string(
            modal.x + 2,
            modal.y + 4,
            truncate(hints, width),
            styles::muted(self.theme),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf_text(buf: &Buffer, w: u16, h: u16) -> String {
        let mut text = String::new();
        for y in 0..h {
            for x in 0..w {
                if let Some(cell) = buf.cell((x, y)) {
                    text.push_str(cell.symbol());
                }
            }
        }
        text
    }

    #[test]
    fn test_confirm_shows_label_and_hints() {
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let confirm = ConfirmDeleteState {
            id: "1".into(),
            label: "Riverside North".into(),
            parent_id: None,
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        ConfirmDialog::new(&confirm, false, &theme).render(Rect::new(0, 0, 80, 24), &mut buf);
        let text = buf_text(&buf, 80, 24);
        assert!(text.contains("Delete 'Riverside North'?"));
        assert!(text.contains("cannot be undone"));
    }

    #[test]
    fn test_confirm_in_flight_hides_confirm_hint() {
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let confirm = ConfirmDeleteState {
            id: "1".into(),
            label: "X".into(),
            parent_id: None,
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        ConfirmDialog::new(&confirm, true, &theme).render(Rect::new(0, 0, 80, 24), &mut buf);
        let text = buf_text(&buf, 80, 24);
        assert!(text.contains("deleting…"));
        assert!(!text.contains("Enter delete"));
    }

    #[test]
    fn test_response_dialog_titles() {
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let input = ResponseInputState {
            request_id: "9".into(),
            approve: true,
            buffer: "Welcome".into(),
        };
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        ResponseDialog::new(&input, false, &theme).render(Rect::new(0, 0, 80, 24), &mut buf);
        let text = buf_text(&buf, 80, 24);
        assert!(text.contains("Approve request"));
        assert!(text.contains("Welcome"));
    }
}
