//! Paged list controller
//!
//! Owns the paging/sort/filter inputs of one entity screen and the data the
//! table renders. The controller is sans-IO: the update handler asks it for
//! a [`PageRequest`] plus a sequence number, performs the fetch elsewhere,
//! and feeds the outcome back through [`PagedList::apply_success`] /
//! [`PagedList::apply_failure`].
//!
//! Two rules here are contracts, not conveniences:
//!
//! - **Tenant scoping.** A restricted operator session gets exactly one
//!   `operatorId=<id>` predicate appended (after all caller-supplied
//!   filters) whenever none is present. Operators must never see other
//!   operators' rows.
//! - **Stale-response discard.** Every issued fetch carries a sequence
//!   number; a response that is not from the latest issued request is
//!   dropped before it can overwrite newer data.

use std::collections::BTreeMap;

use chargedeck_core::paging::total_pages;
use chargedeck_core::{AuthSession, PageData, PageRequest, Record};

/// State of one paged entity list.
#[derive(Debug, Clone)]
pub struct PagedList {
    /// 1-based current page.
    pub page: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_ascending: bool,

    /// Screen-level predicates (field -> value), appended in key order
    /// after `base_filters`.
    pub filters: BTreeMap<String, String>,

    /// Caller-supplied predicates that always go first, verbatim.
    pub base_filters: Vec<String>,

    /// Bumped after every successful mutation to force a re-fetch without
    /// touching the other parameters.
    refresh_counter: u64,

    /// Sequence number of the most recently issued fetch.
    latest_seq: u64,

    pub loading: bool,
    pub rows: Vec<Record>,
    pub total_items: u64,
}

impl PagedList {
    pub fn new(page_size: u32, sort_field: impl Into<String>) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            sort_field: sort_field.into(),
            sort_ascending: true,
            filters: BTreeMap::new(),
            base_filters: Vec::new(),
            refresh_counter: 0,
            latest_seq: 0,
            loading: false,
            rows: Vec::new(),
            total_items: 0,
        }
    }

    pub fn with_base_filters(mut self, base: Vec<String>) -> Self {
        self.base_filters = base;
        self
    }

    // ─────────────────────────────────────────────────────────
    // Request building
    // ─────────────────────────────────────────────────────────

    /// The effective outgoing filter array: caller-supplied entries first,
    /// then the screen's derived predicates, then -- for restricted
    /// operator sessions only, and only when nothing set one already --
    /// exactly one `operatorId=` entry.
    pub fn effective_filters(&self, session: &AuthSession) -> Vec<String> {
        let mut out = self.base_filters.clone();
        for (field, value) in &self.filters {
            out.push(format!("{field}={value}"));
        }
        if let Some(op) = session.scoping_operator_id() {
            if !out.iter().any(|f| f.starts_with("operatorId=")) {
                out.push(format!("operatorId={op}"));
            }
        }
        out
    }

    /// Build the request for the current inputs.
    pub fn request(&self, session: &AuthSession) -> PageRequest {
        let mut req = PageRequest::new(self.page, self.page_size, self.sort_field.clone());
        req.sort_ascending = self.sort_ascending;
        req.filter = self.effective_filters(session);
        req
    }

    /// Mark a fetch as issued and return its sequence number.
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_seq += 1;
        self.loading = true;
        self.latest_seq
    }

    /// True when `seq` identifies the latest issued fetch.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }

    // ─────────────────────────────────────────────────────────
    // Response application
    // ─────────────────────────────────────────────────────────

    /// Commit a successful page. Returns `false` (and changes nothing) when
    /// the response is stale.
    pub fn apply_success(&mut self, seq: u64, data: PageData) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.loading = false;
        self.rows = data.rows;
        self.total_items = data.total_items;
        true
    }

    /// Degrade to an empty page after a failed fetch. The table never shows
    /// a raw error state -- the caller surfaces one notification and the
    /// view shows "no data". Returns `false` when the failure is stale.
    pub fn apply_failure(&mut self, seq: u64) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.loading = false;
        self.rows = Vec::new();
        self.total_items = 0;
        true
    }

    // ─────────────────────────────────────────────────────────
    // Input changes (each is followed by a re-fetch in the handler)
    // ─────────────────────────────────────────────────────────

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn set_sort_field(&mut self, field: impl Into<String>) {
        self.sort_field = field.into();
        self.page = 1;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Replace the screen-level filters and reset to page 1.
    pub fn set_filters(&mut self, filters: BTreeMap<String, String>) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    pub fn bump_refresh(&mut self) {
        self.refresh_counter += 1;
    }

    pub fn refresh_counter(&self) -> u64 {
        self.refresh_counter
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_core::{Role, UserProfile};
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn session(role: Role, operator_id: Option<&str>) -> AuthSession {
        AuthSession {
            token: "tok".into(),
            refresh_token: "ref".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: UserProfile {
                id: "u".into(),
                email: "u@example.com".into(),
                full_name: "U".into(),
            },
            role,
            operator_id: operator_id.map(String::from),
        }
    }

    fn page(rows: Vec<serde_json::Value>, total: u64) -> PageData {
        PageData {
            rows: rows
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap())
                .collect(),
            total_items: total,
        }
    }

    #[test]
    fn test_request_carries_current_inputs() {
        let mut list = PagedList::new(10, "id");
        list.base_filters = vec!["stationId=5".to_string()];
        let req = list.request(&session(Role::Admin, None));
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 10);
        assert_eq!(req.sort_field, "id");
        assert!(req.sort_ascending);
        assert_eq!(req.filter, vec!["stationId=5".to_string()]);
    }

    #[test]
    fn test_operator_scoping_appended_after_caller_filters() {
        let mut list = PagedList::new(10, "id");
        list.base_filters = vec!["active=true".to_string()];
        list.filters.insert("name".into(), "Riverside".into());

        let filters = list.effective_filters(&session(Role::Operator, Some("op-7")));
        assert_eq!(
            filters,
            vec![
                "active=true".to_string(),
                "name=Riverside".to_string(),
                "operatorId=op-7".to_string(),
            ]
        );
        // exactly one operatorId entry
        assert_eq!(
            filters.iter().filter(|f| f.starts_with("operatorId=")).count(),
            1
        );
    }

    #[test]
    fn test_operator_scoping_skipped_when_already_filtered() {
        let mut list = PagedList::new(10, "id");
        list.base_filters = vec!["operatorId=op-7".to_string()];
        let filters = list.effective_filters(&session(Role::Operator, Some("op-7")));
        assert_eq!(filters, vec!["operatorId=op-7".to_string()]);
    }

    #[test]
    fn test_no_scoping_for_admin_even_with_stray_operator_id() {
        let list = PagedList::new(10, "id");
        let filters = list.effective_filters(&session(Role::Admin, Some("op-7")));
        assert!(filters.iter().all(|f| !f.starts_with("operatorId=")));
    }

    #[test]
    fn test_success_round_trip_scenario() {
        // PageRequest {page:1, pageSize:10, sortField:'id', ascending, filter:['stationId=5']}
        // against a stub returning two rows and length 2.
        let mut list = PagedList::new(10, "id").with_base_filters(vec!["stationId=5".into()]);
        let seq = list.begin_fetch();
        assert!(list.loading);

        let applied = list.apply_success(
            seq,
            page(
                vec![json!({"id":1,"code":"A"}), json!({"id":2,"code":"B"})],
                2,
            ),
        );
        assert!(applied);
        assert!(!list.loading);
        assert_eq!(list.rows.len(), 2);
        assert_eq!(list.total_items, 2);
        assert_eq!(list.rows[0].display("code"), "A");
    }

    #[test]
    fn test_failure_degrades_to_empty_page() {
        let mut list = PagedList::new(10, "id");
        let seq = list.begin_fetch();
        list.apply_success(seq, page(vec![json!({"id":1})], 1));

        let seq = list.begin_fetch();
        assert!(list.apply_failure(seq));
        assert!(list.rows.is_empty());
        assert_eq!(list.total_items, 0);
        assert!(!list.loading);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut list = PagedList::new(10, "id");
        let old_seq = list.begin_fetch();
        let new_seq = list.begin_fetch();

        // Newer request resolves first.
        assert!(list.apply_success(new_seq, page(vec![json!({"id":2})], 1)));
        // The slow old response must not overwrite it.
        assert!(!list.apply_success(old_seq, page(vec![json!({"id":1})], 1)));
        assert_eq!(list.rows[0].id("id").as_deref(), Some("2"));

        // Stale failures are ignored too.
        assert!(!list.apply_failure(old_seq));
        assert_eq!(list.rows.len(), 1);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut list = PagedList::new(10, "id");
        list.total_items = 25; // 3 pages

        assert!(!list.prev_page());
        assert!(list.next_page());
        assert!(list.next_page());
        assert_eq!(list.page, 3);
        assert!(!list.next_page());
        assert!(list.prev_page());
        assert_eq!(list.page, 2);
    }

    #[test]
    fn test_filter_changes_reset_to_page_one() {
        let mut list = PagedList::new(10, "id");
        list.total_items = 100;
        list.set_page(5);

        let mut filters = BTreeMap::new();
        filters.insert("status".to_string(), "Available".to_string());
        list.set_filters(filters);
        assert_eq!(list.page, 1);

        list.set_page(4);
        list.clear_filters();
        assert_eq!(list.page, 1);
    }

    #[test]
    fn test_refresh_counter_bumps() {
        let mut list = PagedList::new(10, "id");
        assert_eq!(list.refresh_counter(), 0);
        list.bump_refresh();
        list.bump_refresh();
        assert_eq!(list.refresh_counter(), 2);
    }
}
