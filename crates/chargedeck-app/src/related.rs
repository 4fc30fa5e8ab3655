//! Expandable related-rows controller
//!
//! A parent list row (a station) can reveal a nested paged sub-list of
//! related child records (its charging bays) in place. Each parent carries
//! its own pagination and loading flag, so any number of rows may be
//! expanding concurrently without interference.
//!
//! Lifecycle per parent id: `collapsed → expanding → expanded → collapsed`.
//! Collapse retains the cached rows -- re-expanding without an intervening
//! refresh issues no fetch. A failed load auto-collapses the parent and the
//! error propagates to the caller, which is the one place a controller here
//! re-throws: the page attaches a parent-specific message.

use std::collections::{HashMap, HashSet};

use chargedeck_core::paging::total_pages;
use chargedeck_core::{PageData, Record};

/// Cached child-list state for one parent row.
#[derive(Debug, Clone, Default)]
pub struct ExpandableState {
    pub rows: Vec<Record>,
    pub loading: bool,
    pub total_items: u64,
    pub total_pages: u32,
    /// 1-based page of the child list, independent of every other parent.
    pub current_page: u32,
    /// Child row cursor for keyboard navigation.
    pub cursor: usize,
}

/// What a toggle asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Row collapsed; cached data retained.
    Collapsed,
    /// Row expanded from cache; no fetch needed.
    ExpandedCached,
    /// Row expanded for the first time; load the given page.
    ExpandedNeedsLoad { page: u32 },
}

/// Per-parent expand/collapse and child paging state for one entity screen.
#[derive(Debug, Clone)]
pub struct RelatedRows {
    page_size: u32,
    expanded: HashSet<String>,
    states: HashMap<String, ExpandableState>,
}

impl RelatedRows {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            expanded: HashSet::new(),
            states: HashMap::new(),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_expanded(&self, parent_id: &str) -> bool {
        self.expanded.contains(parent_id)
    }

    pub fn state(&self, parent_id: &str) -> Option<&ExpandableState> {
        self.states.get(parent_id)
    }

    pub fn state_mut(&mut self, parent_id: &str) -> Option<&mut ExpandableState> {
        self.states.get_mut(parent_id)
    }

    /// Toggle a parent row. Expanding loads page 1 only when no cached data
    /// exists yet for this parent.
    pub fn toggle(&mut self, parent_id: &str) -> ToggleOutcome {
        if self.expanded.remove(parent_id) {
            return ToggleOutcome::Collapsed;
        }
        self.expanded.insert(parent_id.to_string());
        if self.states.contains_key(parent_id) {
            ToggleOutcome::ExpandedCached
        } else {
            ToggleOutcome::ExpandedNeedsLoad { page: 1 }
        }
    }

    /// Mark a child-page load as in flight for `parent_id`.
    pub fn begin_load(&mut self, parent_id: &str, page: u32) {
        let entry = self.states.entry(parent_id.to_string()).or_default();
        entry.loading = true;
        entry.current_page = page.max(1);
    }

    /// Store a loaded child page.
    pub fn apply_success(&mut self, parent_id: &str, data: PageData) {
        let page_size = self.page_size;
        let entry = self.states.entry(parent_id.to_string()).or_default();
        entry.loading = false;
        entry.total_items = data.total_items;
        entry.total_pages = total_pages(data.total_items, page_size);
        entry.cursor = entry.cursor.min(data.rows.len().saturating_sub(1));
        entry.rows = data.rows;
    }

    /// A failed load auto-collapses the parent and clears its loading flag.
    /// The caller owns surfacing the error with parent context.
    pub fn apply_failure(&mut self, parent_id: &str) {
        self.expanded.remove(parent_id);
        if let Some(entry) = self.states.get_mut(parent_id) {
            entry.loading = false;
        }
    }

    /// The page to re-load for `refresh(parent)` -- the parent's current
    /// page, so a child mutation does not reset pagination. `None` when the
    /// parent has never loaded.
    pub fn refresh_page(&self, parent_id: &str) -> Option<u32> {
        self.states.get(parent_id).map(|s| s.current_page.max(1))
    }

    /// Target page for `change_page(parent, next/prev)`, bounds-checked
    /// against the parent's own page count.
    pub fn neighbor_page(&self, parent_id: &str, forward: bool) -> Option<u32> {
        let state = self.states.get(parent_id)?;
        if forward {
            (state.current_page < state.total_pages).then(|| state.current_page + 1)
        } else {
            (state.current_page > 1).then(|| state.current_page - 1)
        }
    }

    /// Drop all cached child data (used when the parent list itself is
    /// replaced wholesale, e.g. on tab switch).
    pub fn clear(&mut self) {
        self.expanded.clear();
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bays(n: usize, total: u64) -> PageData {
        PageData {
            rows: (0..n)
                .map(|i| serde_json::from_value(json!({"id": i, "code": format!("BAY-{i}")})).unwrap())
                .collect(),
            total_items: total,
        }
    }

    #[test]
    fn test_first_expand_needs_exactly_one_load_at_page_one() {
        let mut related = RelatedRows::new(5);
        assert_eq!(
            related.toggle("st-1"),
            ToggleOutcome::ExpandedNeedsLoad { page: 1 }
        );
        related.begin_load("st-1", 1);
        assert!(related.state("st-1").unwrap().loading);
        related.apply_success("st-1", bays(5, 12));

        let state = related.state("st-1").unwrap();
        assert!(!state.loading);
        assert_eq!(state.rows.len(), 5);
        assert_eq!(state.total_items, 12);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_collapse_then_reexpand_uses_cache() {
        let mut related = RelatedRows::new(5);
        related.toggle("st-1");
        related.begin_load("st-1", 1);
        related.apply_success("st-1", bays(3, 3));

        assert_eq!(related.toggle("st-1"), ToggleOutcome::Collapsed);
        assert!(!related.is_expanded("st-1"));
        // cached rows retained across collapse
        assert_eq!(related.state("st-1").unwrap().rows.len(), 3);

        // re-expanding without an intervening refresh triggers zero fetches
        assert_eq!(related.toggle("st-1"), ToggleOutcome::ExpandedCached);
    }

    #[test]
    fn test_failed_load_auto_collapses() {
        let mut related = RelatedRows::new(5);
        related.toggle("st-1");
        related.begin_load("st-1", 1);
        related.apply_failure("st-1");

        assert!(!related.is_expanded("st-1"));
        assert!(!related.state("st-1").unwrap().loading);
    }

    #[test]
    fn test_per_parent_pagination_is_independent() {
        let mut related = RelatedRows::new(5);
        for parent in ["st-1", "st-2"] {
            related.toggle(parent);
            related.begin_load(parent, 1);
            related.apply_success(parent, bays(5, 20));
        }

        // change_page for st-2 only
        let next = related.neighbor_page("st-2", true).unwrap();
        related.begin_load("st-2", next);
        related.apply_success("st-2", bays(5, 20));

        assert_eq!(related.state("st-1").unwrap().current_page, 1);
        assert_eq!(related.state("st-2").unwrap().current_page, 2);
        assert_eq!(related.state("st-1").unwrap().rows.len(), 5);
    }

    #[test]
    fn test_concurrent_loads_do_not_interfere() {
        let mut related = RelatedRows::new(5);
        related.toggle("st-1");
        related.begin_load("st-1", 1);
        related.toggle("st-2");
        related.begin_load("st-2", 1);

        assert!(related.state("st-1").unwrap().loading);
        assert!(related.state("st-2").unwrap().loading);

        related.apply_success("st-2", bays(2, 2));
        assert!(related.state("st-1").unwrap().loading);
        assert!(!related.state("st-2").unwrap().loading);
    }

    #[test]
    fn test_refresh_keeps_current_page() {
        let mut related = RelatedRows::new(5);
        related.toggle("st-1");
        related.begin_load("st-1", 1);
        related.apply_success("st-1", bays(5, 20));
        related.begin_load("st-1", 3);
        related.apply_success("st-1", bays(5, 20));

        assert_eq!(related.refresh_page("st-1"), Some(3));
        assert_eq!(related.refresh_page("never-loaded"), None);
    }

    #[test]
    fn test_neighbor_page_bounds() {
        let mut related = RelatedRows::new(5);
        related.toggle("st-1");
        related.begin_load("st-1", 1);
        related.apply_success("st-1", bays(5, 8)); // 2 pages

        assert_eq!(related.neighbor_page("st-1", false), None);
        assert_eq!(related.neighbor_page("st-1", true), Some(2));

        related.begin_load("st-1", 2);
        related.apply_success("st-1", bays(3, 8));
        assert_eq!(related.neighbor_page("st-1", true), None);
        assert_eq!(related.neighbor_page("st-1", false), Some(1));
    }

    #[test]
    fn test_cursor_clamped_to_loaded_rows() {
        let mut related = RelatedRows::new(5);
        related.toggle("st-1");
        related.begin_load("st-1", 1);
        related.apply_success("st-1", bays(5, 8));
        related.state_mut("st-1").unwrap().cursor = 4;

        // Last page has fewer rows; cursor clamps instead of dangling.
        related.begin_load("st-1", 2);
        related.apply_success("st-1", bays(3, 8));
        assert_eq!(related.state("st-1").unwrap().cursor, 2);
    }
}
