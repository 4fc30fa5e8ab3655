//! Notification banner stack, top-right

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use chargedeck_app::notifications::{Level, Notifications};

use crate::theme::{styles, Theme};
use crate::widgets::truncate;

pub struct NotificationStack<'a> {
    notifications: &'a Notifications,
    theme: &'a Theme,
}

impl<'a> NotificationStack<'a> {
    pub fn new(notifications: &'a Notifications, theme: &'a Theme) -> Self {
        Self {
            notifications,
            theme,
        }
    }
}

impl Widget for NotificationStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_width = (area.width as usize).saturating_sub(4).min(60);
        if max_width < 8 {
            return;
        }
        for (idx, notification) in self.notifications.items().iter().enumerate() {
            let y = area.y + idx as u16;
            if y >= area.bottom() {
                break;
            }
            let icon = match notification.level {
                Level::Info => "·",
                Level::Success => "✓",
                Level::Error => "✗",
            };
            let text = format!(" {icon} {} ", truncate(&notification.text, max_width));
            let len = text.chars().count() as u16;
            let x = area.right().saturating_sub(len + 1);
            buf.set_string(x, y, &text, styles::notification(self.theme, notification.level));
        }
    }
}
