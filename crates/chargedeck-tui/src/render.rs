//! Top-level frame rendering

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Widget};
use ratatui::Frame;

use chargedeck_app::{AppState, Screen};

use crate::layout::screen_areas;
use crate::theme::{styles, Theme};
use crate::widgets::action_menu::ActionMenuWidget;
use crate::widgets::confirm_dialog::{ConfirmDialog, ResponseDialog};
use crate::widgets::dashboard::DashboardGrid;
use crate::widgets::entity_table::EntityTable;
use crate::widgets::filter_modal::FilterModalWidget;
use crate::widgets::form_modal::FormModalWidget;
use crate::widgets::modal_overlay::{centered_rect, clear_under};
use crate::widgets::notifications::NotificationStack;
use crate::widgets::status_bar::StatusBar;
use crate::widgets::tabs::TabBar;
use crate::widgets::truncate;

/// Draw one frame of the whole UI.
pub fn draw(frame: &mut Frame, state: &AppState) {
    let theme = Theme::new(state.settings.ui.theme);
    let area = frame.area();
    let areas = screen_areas(area);
    let buf = frame.buffer_mut();

    TabBar::new(state.screen, state.browser.entity.kind, &theme).render(areas.tabs, buf);

    match state.screen {
        Screen::Dashboard => {
            DashboardGrid::new(&state.dashboard, &theme).render(areas.body, buf)
        }
        Screen::Browser => render_browser(state, areas.body, buf, &theme),
    }

    StatusBar::new(state, &theme).render(areas.status, buf);
    NotificationStack::new(&state.notifications, &theme).render(areas.body, buf);
}

fn render_browser(state: &AppState, body: Rect, buf: &mut Buffer, theme: &Theme) {
    let browser = &state.browser;
    EntityTable::new(browser, theme).render(body, buf);

    // Overlays, back to front.
    if browser.menu.is_open() {
        // Anchor the menu at the selected row's screen line (header is row 0).
        let anchor_y = body.y + 1 + browser.cursor.min(body.height as usize) as u16;
        ActionMenuWidget::new(&browser.menu, anchor_y, theme).render(body, buf);
    }
    if let Some(confirm) = &browser.confirm_delete {
        ConfirmDialog::new(confirm, browser.mutation_in_flight, theme).render(body, buf);
    }
    if let Some(input) = &browser.response_input {
        ResponseDialog::new(input, browser.mutation_in_flight, theme).render(body, buf);
    }
    if let Some(qr) = &browser.qr {
        render_qr(qr, body, buf, theme);
    }
    if let Some(filter) = &browser.filter {
        FilterModalWidget::new(filter, browser.entity.title, theme).render(body, buf);
    }
    if let Some(form) = &browser.form {
        FormModalWidget::new(form, browser, browser.entity.title, theme).render(body, buf);
    }
}

fn render_qr(
    qr: &chargedeck_app::state::QrCodeView,
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
) {
    let modal = centered_rect(48, 6, area);
    if modal.width < 12 || modal.height < 5 {
        return;
    }
    clear_under(modal, buf);
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme.border_active))
        .title(format!(" QR · station {} ", qr.station_id))
        .render(modal, buf);

    let width = modal.width.saturating_sub(4) as usize;
    let line = match &qr.payload {
        None => "generating…".to_string(),
        Some(payload) => format!("base64 PNG · {} chars", payload.chars().count()),
    };
    buf.set_string(modal.x + 2, modal.y + 2, truncate(&line, width), styles::value(theme));
    buf.set_string(
        modal.x + 2,
        modal.y + 4,
        truncate("Esc close", width),
        styles::muted(theme),
    );
}
