//! Shared modal overlay utilities.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Clear, Widget};

/// Center a fixed-size rect within an area, clamped to the area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Clear the cells under a modal so the screen beneath does not bleed
/// through.
pub fn clear_under(area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_centers() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(100, 50, area);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_centered_rect_respects_offset_area() {
        let area = Rect::new(10, 10, 40, 20);
        let rect = centered_rect(20, 10, area);
        assert_eq!(rect, Rect::new(20, 15, 20, 10));
    }
}
