//! # Form Modal Widget
//!
//! Schema-driven create/edit/view modal. Fields sharing a `grid_group`
//! render side by side; everything else takes a full row. View mode shows
//! entity values verbatim with no input affordances.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Widget};

use chargedeck_app::form::{FormMode, FormModal};
use chargedeck_app::BrowserState;
use chargedeck_core::{FieldKind, FieldSpec};

use crate::theme::{styles, Theme};
use crate::widgets::modal_overlay::{centered_rect, clear_under};
use crate::widgets::truncate;

/// A laid-out line of the form: one field or a grouped pair.
enum FormLine<'a> {
    Single(usize, &'a FieldSpec),
    Pair((usize, &'a FieldSpec), (usize, &'a FieldSpec)),
}

pub struct FormModalWidget<'a> {
    form: &'a FormModal,
    browser: &'a BrowserState,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> FormModalWidget<'a> {
    pub fn new(
        form: &'a FormModal,
        browser: &'a BrowserState,
        title: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            form,
            browser,
            title,
            theme,
        }
    }

    /// Pair up consecutive fields that share a grid group.
    fn lines(&self) -> Vec<FormLine<'a>> {
        let mut lines = Vec::new();
        let fields: Vec<(usize, &FieldSpec)> = self.form.fields.iter().enumerate().collect();
        let mut i = 0;
        while i < fields.len() {
            let (idx, field) = fields[i];
            let paired = field.grid_group.is_some()
                && i + 1 < fields.len()
                && fields[i + 1].1.grid_group == field.grid_group;
            if paired {
                lines.push(FormLine::Pair(fields[i], fields[i + 1]));
                i += 2;
            } else {
                lines.push(FormLine::Single(idx, field));
                i += 1;
            }
        }
        lines
    }

    fn mode_title(&self) -> String {
        let verb = match self.form.mode {
            FormMode::Create => "New",
            FormMode::Edit => "Edit",
            FormMode::View => "View",
        };
        format!(" {verb} · {} ", self.title)
    }
}

impl Widget for FormModalWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let height = (lines.len() as u16) * 2 + 5;
        let modal = centered_rect(56, height.min(area.height), area);
        if modal.width < 10 || modal.height < 5 {
            return;
        }
        clear_under(modal, buf);

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(self.theme.border_active))
            .title(self.mode_title())
            .render(modal, buf);

        let inner = Rect {
            x: modal.x + 2,
            y: modal.y + 1,
            width: modal.width.saturating_sub(4),
            height: modal.height.saturating_sub(2),
        };

        let mut y = inner.y;
        for line in &lines {
            if y + 1 >= inner.bottom() {
                break;
            }
            match line {
                FormLine::Single(idx, field) => {
                    self.render_field(*idx, field, inner.x, y, inner.width, buf);
                }
                FormLine::Pair(left, right) => {
                    let half = inner.width / 2;
                    self.render_field(left.0, left.1, inner.x, y, half.saturating_sub(1), buf);
                    self.render_field(right.0, right.1, inner.x + half, y, half, buf);
                }
            }
            y += 2;
        }

        // Error line, then key hints on the bottom border row.
        if let Some(error) = &self.form.error {
            if y < inner.bottom() {
                buf.set_string(
                    inner.x,
                    inner.bottom().saturating_sub(2),
                    truncate(error, inner.width as usize),
                    styles::error_text(self.theme),
                );
            }
        }
        let hints = match self.form.mode {
            FormMode::View => "Esc close",
            _ if self.form.submitting => "saving…",
            _ => "Enter save · Tab next · Esc cancel",
        };
        buf.set_string(
            inner.x,
            modal.bottom().saturating_sub(2),
            truncate(hints, inner.width as usize),
            styles::muted(self.theme),
        );
    }
}

impl FormModalWidget<'_> {
    fn render_field(
        &self,
        idx: usize,
        field: &FieldSpec,
        x: u16,
        y: u16,
        width: u16,
        buf: &mut Buffer,
    ) {
        let focused = idx == self.form.focus && self.form.mode != FormMode::View;
        let required = if field.required { "*" } else { "" };
        buf.set_string(
            x,
            y,
            truncate(&format!("{}{required}", field.label), width as usize),
            styles::label(self.theme),
        );

        let value = self.field_display(idx, field);
        let style = if focused {
            styles::focused_value(self.theme)
        } else {
            styles::value(self.theme)
        };
        let cursor = if focused && editable_text(field) { "▏" } else { "" };
        buf.set_string(
            x + 1,
            y + 1,
            truncate(&format!("{value}{cursor}"), width.saturating_sub(1) as usize),
            style,
        );
    }

    /// Display text for a field's current draft value.
    fn field_display(&self, idx: usize, field: &FieldSpec) -> String {
        let buffer = &self.form.buffers[idx];
        match field.kind {
            FieldKind::Checkbox => {
                let checked = self
                    .form
                    .draft
                    .get(field.name)
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false);
                if checked { "[x]".into() } else { "[ ]".into() }
            }
            FieldKind::Select(_) => {
                if buffer.is_empty() {
                    "—".into()
                } else {
                    // Show the option label when the value resolves to one.
                    self.browser
                        .resolve_options(field.name)
                        .iter()
                        .find(|o| &o.value == buffer)
                        .map(|o| o.label.clone())
                        .unwrap_or_else(|| buffer.clone())
                }
            }
            FieldKind::QrCode => {
                if buffer.is_empty() {
                    "(not generated)".into()
                } else {
                    format!("(qr payload · {} chars)", buffer.chars().count())
                }
            }
            _ => buffer.clone(),
        }
    }
}

fn editable_text(field: &FieldSpec) -> bool {
    !field.read_only
        && !matches!(
            field.kind,
            FieldKind::Checkbox | FieldKind::Select(_) | FieldKind::QrCode
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_app::entities::EntityKind;
    use serde_json::json;

    fn render_to_text(form: &FormModal, browser: &BrowserState, w: u16, h: u16) -> String {
        let theme = Theme::new(chargedeck_app::config::ThemeVariant::Dark);
        let widget = FormModalWidget::new(form, browser, "Stations", &theme);
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

    fn station_browser() -> BrowserState {
        BrowserState::new(EntityKind::Stations.descriptor(), 10)
    }

    #[test]
    fn test_renders_labels_and_values() {
        let browser = station_browser();
        let entity = serde_json::from_value(json!({
            "id": 1, "name": "Riverside", "operatorId": 2, "active": true
        }))
        .unwrap();
        let form = FormModal::view(browser.entity.form_fields, &entity);
        let text = render_to_text(&form, &browser, 80, 30);

        assert!(text.contains("Name"), "got: {text}");
        assert!(text.contains("Riverside"));
        assert!(text.contains("View · Stations"));
        // view mode shows the checkbox state read-only
        assert!(text.contains("[x]"));
    }

    #[test]
    fn test_view_mode_shows_values_verbatim() {
        let browser = station_browser();
        // A numeric string stays exactly as supplied in view mode.
        let entity = serde_json::from_value(json!({"name": "007", "maxPowerKw": 22.5})).unwrap();
        let form = FormModal::view(browser.entity.form_fields, &entity);
        let text = render_to_text(&form, &browser, 80, 30);
        assert!(text.contains("007"), "got: {text}");
        assert!(text.contains("22.5"));
    }

    #[test]
    fn test_error_line_renders() {
        let browser = station_browser();
        let mut form = FormModal::create(browser.entity.form_fields, None);
        form.error = Some("Name is required".into());
        let text = render_to_text(&form, &browser, 80, 30);
        assert!(text.contains("Name is required"), "got: {text}");
    }

    #[test]
    fn test_submitting_hint_replaces_save_hint() {
        let browser = station_browser();
        let mut form = FormModal::create(browser.entity.form_fields, None);
        form.submitting = true;
        let text = render_to_text(&form, &browser, 80, 30);
        assert!(text.contains("saving…"), "got: {text}");
        assert!(!text.contains("Enter save"));
    }

    #[test]
    fn test_no_panic_on_tiny_area() {
        let browser = station_browser();
        let form = FormModal::create(browser.entity.form_fields, None);
        render_to_text(&form, &browser, 8, 3);
        render_to_text(&form, &browser, 0, 0);
    }
}
