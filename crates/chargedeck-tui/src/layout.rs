//! Screen layout splits

use ratatui::layout::{Constraint, Layout, Rect};

/// Top-level chrome: tab bar, body, status bar.
pub struct ScreenAreas {
    pub tabs: Rect,
    pub body: Rect,
    pub status: Rect,
}

pub fn screen_areas(area: Rect) -> ScreenAreas {
    let [tabs, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);
    ScreenAreas { tabs, body, status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_areas_partition_height() {
        let areas = screen_areas(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.tabs.height, 1);
        assert_eq!(areas.status.height, 1);
        assert_eq!(areas.body.height, 22);
        assert_eq!(areas.status.y, 23);
    }
}
