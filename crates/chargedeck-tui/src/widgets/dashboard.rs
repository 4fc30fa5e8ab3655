//! Dashboard chart cards
//!
//! Four aggregate cards in a 2x2 grid, each a titled block with horizontal
//! bars scaled to the largest group.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Widget};

use chargedeck_app::dashboard::{CardData, DashboardCard, DashboardState};

use crate::theme::{styles, Theme};
use crate::widgets::truncate;

pub struct DashboardGrid<'a> {
    dashboard: &'a DashboardState,
    theme: &'a Theme,
}

impl<'a> DashboardGrid<'a> {
    pub fn new(dashboard: &'a DashboardState, theme: &'a Theme) -> Self {
        Self { dashboard, theme }
    }
}

impl Widget for DashboardGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            return;
        }
        let half_w = area.width / 2;
        let half_h = area.height / 2;
        let quadrants = [
            Rect::new(area.x, area.y, half_w, half_h),
            Rect::new(area.x + half_w, area.y, area.width - half_w, half_h),
            Rect::new(area.x, area.y + half_h, half_w, area.height - half_h),
            Rect::new(
                area.x + half_w,
                area.y + half_h,
                area.width - half_w,
                area.height - half_h,
            ),
        ];

        for (card, quadrant) in DashboardCard::ALL.into_iter().zip(quadrants) {
            render_card(card, self.dashboard.card(card), quadrant, buf, self.theme);
        }
    }
}

fn render_card(card: DashboardCard, data: &CardData, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let title = if data.loading {
        format!(" {} · loading… ", card.title())
    } else {
        format!(" {} · {} ", card.title(), data.total)
    };
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme.border))
        .title(title)
        .render(area, buf);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };
    if inner.width < 10 || inner.height == 0 {
        return;
    }

    if data.groups.is_empty() {
        let text = if data.loading { "" } else { "no data" };
        buf.set_string(inner.x, inner.y, text, styles::muted(theme));
        return;
    }

    let max = data.groups.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
    let label_w = (inner.width / 3).clamp(8, 20) as usize;
    let bar_w = inner.width.saturating_sub(label_w as u16 + 7);

    for (idx, (label, count)) in data.groups.iter().enumerate() {
        let y = inner.y + idx as u16;
        if y >= inner.bottom() {
            break;
        }
        buf.set_string(
            inner.x,
            y,
            format!("{:<label_w$}", truncate(label, label_w)),
            styles::label(theme),
        );
        let filled = ((count * bar_w as u64) / max) as u16;
        let bar: String = "█".repeat(filled.max(1) as usize);
        buf.set_string(
            inner.x + label_w as u16,
            y,
            &bar,
            ratatui::style::Style::default().fg(theme.accent),
        );
        buf.set_string(
            inner.x + label_w as u16 + bar_w + 1,
            y,
            format!("{count:>4}"),
            styles::value(theme),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_core::Record;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    fn render_to_text(dashboard: &DashboardState, w: u16, h: u16) -> String {
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        DashboardGrid::new(dashboard, &theme).render(Rect::new(0, 0, w, h), &mut buf);
        let mut text = String::new();
        for y in 0..h {
            for x in 0..w {
                if let Some(cell) = buf.cell((x, y)) {
                    text.push_str(cell.symbol());
                }
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_card_titles() {
        let dashboard = DashboardState::new();
        let text = render_to_text(&dashboard, 120, 30);
        assert!(text.contains("Stations per operator"));
        assert!(text.contains("Bays by status"));
        assert!(text.contains("Connector standards"));
        assert!(text.contains("Account requests"));
    }

    #[test]
    fn test_loaded_card_shows_groups_and_bars() {
        let mut dashboard = DashboardState::new();
        dashboard.apply_success(
            DashboardCard::BaysByStatus,
            &records(vec![
                json!({"status": "Available"}),
                json!({"status": "Available"}),
                json!({"status": "Occupied"}),
            ]),
        );
        let text = render_to_text(&dashboard, 120, 30);
        assert!(text.contains("Available"));
        assert!(text.contains("Occupied"));
        assert!(text.contains('█'));
    }

    #[test]
    fn test_no_panic_on_small_area() {
        let dashboard = DashboardState::new();
        render_to_text(&dashboard, 10, 4);
    }
}
