//! # Entity Table Widget
//!
//! Renders the active entity's paged rows under a column header line, with
//! expanded parents revealing an indented child sub-table and its own pager
//! line. The widget is pure: the handler layer owns paging, expansion, and
//! cursor state; this only draws what it is given.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use chargedeck_app::BrowserState;
use chargedeck_core::ColumnSpec;

use crate::theme::{styles, Theme};
use crate::widgets::truncate;

/// One visual line of the table body.
enum BodyLine {
    Parent(usize),
    Child { parent_id: String, idx: usize },
    ChildPager { parent_id: String },
    ChildLoading,
}

pub struct EntityTable<'a> {
    browser: &'a BrowserState,
    theme: &'a Theme,
}

impl<'a> EntityTable<'a> {
    pub fn new(browser: &'a BrowserState, theme: &'a Theme) -> Self {
        Self { browser, theme }
    }

    /// Flatten parent rows and expanded child blocks into body lines.
    fn body_lines(&self) -> Vec<BodyLine> {
        let id_field = self.browser.entity.resource.id_field;
        let mut lines = Vec::new();
        for (idx, row) in self.browser.list.rows.iter().enumerate() {
            lines.push(BodyLine::Parent(idx));
            let Some(parent_id) = row.id(id_field) else {
                continue;
            };
            if !self.browser.related.is_expanded(&parent_id) {
                continue;
            }
            let Some(child_state) = self.browser.related.state(&parent_id) else {
                continue;
            };
            if child_state.loading && child_state.rows.is_empty() {
                lines.push(BodyLine::ChildLoading);
                continue;
            }
            for child_idx in 0..child_state.rows.len() {
                lines.push(BodyLine::Child {
                    parent_id: parent_id.clone(),
                    idx: child_idx,
                });
            }
            lines.push(BodyLine::ChildPager {
                parent_id: parent_id.clone(),
            });
        }
        lines
    }

    /// Flat index of the selected parent line (for scrolling).
    fn selected_line(&self, lines: &[BodyLine]) -> usize {
        lines
            .iter()
            .position(|l| matches!(l, BodyLine::Parent(i) if *i == self.browser.cursor))
            .unwrap_or(0)
    }
}

impl Widget for EntityTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Need at least the column header plus one body row.
        if area.height < 2 || area.width < 8 {
            return;
        }

        let columns = self.browser.entity.columns;
        let widths = column_widths(columns.len(), area.width);

        render_columns_header(columns, &widths, area, buf, self.theme);

        let body = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };

        if self.browser.list.rows.is_empty() {
            let text = if self.browser.list.loading {
                "Loading…"
            } else {
                "No data"
            };
            buf.set_string(
                body.x + 2,
                body.y + body.height / 2,
                text,
                styles::muted(self.theme),
            );
            return;
        }

        let lines = self.body_lines();
        let visible = body.height as usize;
        let selected = self.selected_line(&lines);
        // Keep the selected parent in view.
        let offset = selected.saturating_sub(visible.saturating_sub(1));

        for (row_idx, line) in lines.iter().skip(offset).take(visible).enumerate() {
            let y = body.y + row_idx as u16;
            match line {
                BodyLine::Parent(idx) => self.render_parent(*idx, &widths, body, y, buf),
                BodyLine::Child { parent_id, idx } => {
                    self.render_child(parent_id, *idx, body, y, buf)
                }
                BodyLine::ChildPager { parent_id } => {
                    self.render_child_pager(parent_id, body, y, buf)
                }
                BodyLine::ChildLoading => {
                    buf.set_string(
                        body.x + 4,
                        y,
                        "└ loading…",
                        styles::muted(self.theme),
                    );
                }
            }
        }
    }
}

impl EntityTable<'_> {
    fn render_parent(&self, idx: usize, widths: &[u16], area: Rect, y: u16, buf: &mut Buffer) {
        let row = &self.browser.list.rows[idx];
        let is_selected = idx == self.browser.cursor;
        let style = if is_selected {
            styles::row_selected(self.theme)
        } else {
            styles::row(self.theme)
        };

        if is_selected {
            for x in area.x..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_style(style).set_char(' ');
                }
            }
        }

        let marker = expansion_marker(self.browser, row);
        buf.set_string(area.x, y, marker, style);

        let mut x = area.x + 2;
        for (column, width) in self.browser.entity.columns.iter().zip(widths) {
            let text = column.display(row);
            buf.set_string(x, y, truncate(&text, *width as usize - 1), style);
            x += width;
        }
    }

    fn render_child(&self, parent_id: &str, idx: usize, area: Rect, y: u16, buf: &mut Buffer) {
        let Some(child) = self.browser.entity.child else {
            return;
        };
        let Some(child_state) = self.browser.related.state(parent_id) else {
            return;
        };
        let Some(row) = child_state.rows.get(idx) else {
            return;
        };

        let is_selected =
            idx == child_state.cursor && self.parent_is_selected(parent_id);
        let style = if is_selected {
            styles::child_row_selected(self.theme)
        } else {
            styles::child_row(self.theme)
        };

        buf.set_string(area.x + 2, y, "└ ", styles::muted(self.theme));

        let columns = child.entity.descriptor().columns;
        let indent = 4;
        let widths = column_widths(columns.len(), area.width.saturating_sub(indent));
        let mut x = area.x + indent;
        for (column, width) in columns.iter().zip(&widths) {
            let text = column.display(row);
            buf.set_string(x, y, truncate(&text, *width as usize - 1), style);
            x += width;
        }
    }

    fn render_child_pager(&self, parent_id: &str, area: Rect, y: u16, buf: &mut Buffer) {
        let Some(child_state) = self.browser.related.state(parent_id) else {
            return;
        };
        let loading = if child_state.loading { " · loading…" } else { "" };
        let text = format!(
            "└ page {}/{} · {} items{loading}",
            child_state.current_page,
            child_state.total_pages.max(1),
            child_state.total_items,
        );
        buf.set_string(area.x + 2, y, text, styles::muted(self.theme));
    }

    fn parent_is_selected(&self, parent_id: &str) -> bool {
        self.browser
            .selected_row_id()
            .as_deref()
            .map(|id| id == parent_id)
            .unwrap_or(false)
    }
}

/// Expansion marker in the gutter: `▸`/`▾` for expandable rows, blank
/// otherwise.
fn expansion_marker(browser: &BrowserState, row: &chargedeck_core::Record) -> &'static str {
    if browser.entity.child.is_none() {
        return " ";
    }
    match row.id(browser.entity.resource.id_field) {
        Some(id) if browser.related.is_expanded(&id) => "▾",
        Some(_) => "▸",
        None => " ",
    }
}

fn render_columns_header(
    columns: &[ColumnSpec],
    widths: &[u16],
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
) {
    let style = styles::column_header(theme);
    let mut x = area.x + 2;
    for (column, width) in columns.iter().zip(widths) {
        buf.set_string(x, area.y, truncate(column.label, *width as usize - 1), style);
        x += width;
    }
}

/// Distribute the width evenly across columns (remainder to the last), with
/// a floor so narrow terminals still show something per column.
fn column_widths(ncols: usize, total: u16) -> Vec<u16> {
    if ncols == 0 {
        return Vec::new();
    }
    let usable = total.saturating_sub(2);
    let each = (usable / ncols as u16).max(5);
    let mut widths = vec![each; ncols];
    let used = each * (ncols as u16 - 1);
    *widths.last_mut().unwrap() = usable.saturating_sub(used).max(5);
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_app::entities::EntityKind;
    use chargedeck_core::PageData;
    use serde_json::json;

    fn browser_with_rows(rows: Vec<serde_json::Value>) -> BrowserState {
        let mut browser = BrowserState::new(EntityKind::Stations.descriptor(), 10);
        let total = rows.len() as u64;
        let seq = browser.list.begin_fetch();
        browser.list.apply_success(
            seq,
            PageData {
                rows: rows
                    .into_iter()
                    .map(|v| serde_json::from_value(v).unwrap())
                    .collect(),
                total_items: total,
            },
        );
        browser
    }

    fn render_to_text(browser: &BrowserState, w: u16, h: u16) -> String {
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let widget = EntityTable::new(browser, &theme);
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        widget.render(Rect::new(0, 0, w, h), &mut buf);
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
    fn test_renders_without_panic_on_degenerate_sizes() {
        let browser = browser_with_rows(vec![]);
        render_to_text(&browser, 0, 0);
        render_to_text(&browser, 80, 1);
        render_to_text(&browser, 5, 24);
    }

    #[test]
    fn test_empty_state_shows_no_data() {
        let browser = browser_with_rows(vec![]);
        let text = render_to_text(&browser, 80, 10);
        assert!(text.contains("No data"), "got: {text}");
    }

    #[test]
    fn test_column_headers_and_rows_render() {
        let browser = browser_with_rows(vec![
            json!({"id": 1, "name": "Riverside North", "active": true}),
            json!({"id": 2, "name": "Dockside", "active": false}),
        ]);
        let text = render_to_text(&browser, 100, 10);
        assert!(text.contains("Name"), "header missing: {text}");
        assert!(text.contains("Riverside North"));
        assert!(text.contains("Dockside"));
        // rendered column, not the raw bool
        assert!(text.contains("yes"));
    }

    #[test]
    fn test_expandable_rows_show_marker() {
        let browser = browser_with_rows(vec![json!({"id": 1, "name": "Riverside"})]);
        let text = render_to_text(&browser, 80, 10);
        assert!(text.contains('▸'), "collapsed marker missing: {text}");
    }

    #[test]
    fn test_expanded_parent_renders_children_and_pager() {
        let mut browser = browser_with_rows(vec![json!({"id": 1, "name": "Riverside"})]);
        browser.related.toggle("1");
        browser.related.begin_load("1", 1);
        browser.related.apply_success(
            "1",
            PageData {
                rows: vec![
                    serde_json::from_value(json!({"id": 10, "code": "BAY-A", "status": "Available"}))
                        .unwrap(),
                ],
                total_items: 7,
            },
        );

        let text = render_to_text(&browser, 100, 10);
        assert!(text.contains('▾'), "expanded marker missing: {text}");
        assert!(text.contains("BAY-A"), "child row missing: {text}");
        assert!(text.contains("page 1/2 · 7 items"), "pager missing: {text}");
    }

    #[test]
    fn test_expanding_parent_shows_loading_line() {
        let mut browser = browser_with_rows(vec![json!({"id": 1, "name": "Riverside"})]);
        browser.related.toggle("1");
        browser.related.begin_load("1", 1);

        let text = render_to_text(&browser, 80, 10);
        assert!(text.contains("loading…"), "got: {text}");
    }

    #[test]
    fn test_column_widths_cover_area() {
        let widths = column_widths(4, 82);
        assert_eq!(widths.len(), 4);
        assert_eq!(widths.iter().sum::<u16>(), 80);
        assert!(widths.iter().all(|w| *w >= 5));
    }
}
