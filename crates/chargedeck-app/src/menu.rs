//! Row action menu
//!
//! One menu may be open across the whole table at a time, keyed by row
//! identity; opening another row's menu closes the first. Entries are
//! declarative, and a resource that does not support an action simply omits
//! the entry -- there is no disabled state to render.

/// The actions a row can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    View,
    Edit,
    Delete,
    ToggleActivate,
    Approve,
    Reject,
    QrCode,
}

impl ActionKind {
    pub fn title(self) -> &'static str {
        match self {
            ActionKind::View => "View",
            ActionKind::Edit => "Edit",
            ActionKind::Delete => "Delete",
            ActionKind::ToggleActivate => "Toggle active",
            ActionKind::Approve => "Approve",
            ActionKind::Reject => "Reject",
            ActionKind::QrCode => "QR code",
        }
    }
}

/// The single open-menu slot for a table.
#[derive(Debug, Clone, Default)]
pub struct ActionMenu {
    open_for: Option<String>,
    entries: Vec<ActionKind>,
    pub selected: usize,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open_for.is_some()
    }

    pub fn open_for(&self) -> Option<&str> {
        self.open_for.as_deref()
    }

    pub fn entries(&self) -> &[ActionKind] {
        &self.entries
    }

    /// Open the menu for a row. Any other row's menu closes implicitly --
    /// there is exactly one slot. Toggling the same row closes it.
    pub fn toggle(&mut self, row_id: &str, entries: &[ActionKind]) {
        if self.open_for.as_deref() == Some(row_id) {
            self.close();
            return;
        }
        self.open_for = Some(row_id.to_string());
        self.entries = entries.to_vec();
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.open_for = None;
        self.entries.clear();
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    pub fn selected_action(&self) -> Option<ActionKind> {
        self.entries.get(self.selected).copied()
    }

    /// Placement flips above the trigger row when fewer rows remain below
    /// it than the menu needs (one line per entry).
    pub fn opens_upward(&self, rows_below: usize) -> bool {
        rows_below < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW_ACTIONS: &[ActionKind] = &[ActionKind::View, ActionKind::Edit, ActionKind::Delete];

    #[test]
    fn test_exactly_one_menu_open_at_a_time() {
        let mut menu = ActionMenu::new();
        menu.toggle("row-a", ROW_ACTIONS);
        assert_eq!(menu.open_for(), Some("row-a"));

        // Opening B closes A.
        menu.toggle("row-b", ROW_ACTIONS);
        assert_eq!(menu.open_for(), Some("row-b"));
        assert!(menu.is_open());
    }

    #[test]
    fn test_toggle_same_row_closes() {
        let mut menu = ActionMenu::new();
        menu.toggle("row-a", ROW_ACTIONS);
        menu.toggle("row-a", ROW_ACTIONS);
        assert!(!menu.is_open());
        assert!(menu.entries().is_empty());
    }

    #[test]
    fn test_unsupported_actions_are_simply_absent() {
        // Connectors are read-only: the caller passes only View.
        let mut menu = ActionMenu::new();
        menu.toggle("conn-1", &[ActionKind::View]);
        assert_eq!(menu.entries(), &[ActionKind::View]);
        assert_eq!(menu.selected_action(), Some(ActionKind::View));
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = ActionMenu::new();
        menu.toggle("row-a", ROW_ACTIONS);
        menu.select_prev();
        assert_eq!(menu.selected_action(), Some(ActionKind::Delete));
        menu.select_next();
        assert_eq!(menu.selected_action(), Some(ActionKind::View));
    }

    #[test]
    fn test_opens_upward_when_short_on_space() {
        let mut menu = ActionMenu::new();
        menu.toggle("row-a", ROW_ACTIONS);
        assert!(menu.opens_upward(2)); // 3 entries, 2 rows below
        assert!(!menu.opens_upward(3));
        assert!(!menu.opens_upward(10));
    }
}
