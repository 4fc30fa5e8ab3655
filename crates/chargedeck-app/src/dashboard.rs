//! Dashboard aggregation state
//!
//! Fire-and-forget parallel list fetches reduced into counts for the chart
//! cards. Shares no state with the entity screens; a failed card surfaces a
//! notification and renders empty.

use std::collections::BTreeMap;

use chargedeck_core::Record;

/// The four analytics cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCard {
    StationsByOperator,
    BaysByStatus,
    ConnectorsByType,
    RequestsByStatus,
}

impl DashboardCard {
    pub const ALL: [DashboardCard; 4] = [
        DashboardCard::StationsByOperator,
        DashboardCard::BaysByStatus,
        DashboardCard::ConnectorsByType,
        DashboardCard::RequestsByStatus,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DashboardCard::StationsByOperator => "Stations per operator",
            DashboardCard::BaysByStatus => "Bays by status",
            DashboardCard::ConnectorsByType => "Connector standards",
            DashboardCard::RequestsByStatus => "Account requests",
        }
    }

    /// Grouping field per card, with a fallback for denormalized labels.
    fn group_fields(self) -> (&'static str, Option<&'static str>) {
        match self {
            DashboardCard::StationsByOperator => ("operatorName", Some("operatorId")),
            DashboardCard::BaysByStatus => ("status", None),
            DashboardCard::ConnectorsByType => ("standard", None),
            DashboardCard::RequestsByStatus => ("status", None),
        }
    }

    /// Reduce a raw list into `(label, count)` groups, largest first.
    pub fn reduce(self, records: &[Record]) -> Vec<(String, u64)> {
        let (field, fallback) = self.group_fields();
        count_by(records, field, fallback)
    }
}

/// One card's chart data.
#[derive(Debug, Clone, Default)]
pub struct CardData {
    pub groups: Vec<(String, u64)>,
    pub total: u64,
    pub loading: bool,
    pub loaded: bool,
}

/// All dashboard state.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    stations: CardData,
    bays: CardData,
    connectors: CardData,
    requests: CardData,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card(&self, card: DashboardCard) -> &CardData {
        match card {
            DashboardCard::StationsByOperator => &self.stations,
            DashboardCard::BaysByStatus => &self.bays,
            DashboardCard::ConnectorsByType => &self.connectors,
            DashboardCard::RequestsByStatus => &self.requests,
        }
    }

    fn card_mut(&mut self, card: DashboardCard) -> &mut CardData {
        match card {
            DashboardCard::StationsByOperator => &mut self.stations,
            DashboardCard::BaysByStatus => &mut self.bays,
            DashboardCard::ConnectorsByType => &mut self.connectors,
            DashboardCard::RequestsByStatus => &mut self.requests,
        }
    }

    pub fn begin_fetch_all(&mut self) {
        for card in DashboardCard::ALL {
            self.card_mut(card).loading = true;
        }
    }

    pub fn apply_success(&mut self, card: DashboardCard, records: &[Record]) {
        let data = self.card_mut(card);
        data.groups = card.reduce(records);
        data.total = records.len() as u64;
        data.loading = false;
        data.loaded = true;
    }

    /// Failed card: renders empty, stays marked unloaded.
    pub fn apply_failure(&mut self, card: DashboardCard) {
        let data = self.card_mut(card);
        data.groups.clear();
        data.total = 0;
        data.loading = false;
        data.loaded = false;
    }

    pub fn any_loading(&self) -> bool {
        DashboardCard::ALL.iter().any(|c| self.card(*c).loading)
    }
}

/// Count records per value of `field` (stringified), sorted by count
/// descending then label. Records missing both `field` and the fallback
/// land in an `(unknown)` bucket.
pub fn count_by(records: &[Record], field: &str, fallback: Option<&str>) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        let mut label = record.display(field);
        if label.is_empty() {
            if let Some(fb) = fallback {
                label = record.display(fb);
            }
        }
        if label.is_empty() {
            label = "(unknown)".to_string();
        }
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut groups: Vec<(String, u64)> = counts.into_iter().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_count_by_sorts_largest_first() {
        let rows = records(vec![
            json!({"status": "Available"}),
            json!({"status": "Occupied"}),
            json!({"status": "Available"}),
            json!({"status": "Available"}),
        ]);
        let groups = count_by(&rows, "status", None);
        assert_eq!(
            groups,
            vec![("Available".to_string(), 3), ("Occupied".to_string(), 1)]
        );
    }

    #[test]
    fn test_count_by_fallback_and_unknown_bucket() {
        let rows = records(vec![
            json!({"operatorName": "Allego"}),
            json!({"operatorId": 7}),
            json!({}),
        ]);
        let groups = count_by(&rows, "operatorName", Some("operatorId"));
        assert!(groups.contains(&("Allego".to_string(), 1)));
        assert!(groups.contains(&("7".to_string(), 1)));
        assert!(groups.contains(&("(unknown)".to_string(), 1)));
    }

    #[test]
    fn test_ties_break_by_label() {
        let rows = records(vec![json!({"status": "B"}), json!({"status": "A"})]);
        let groups = count_by(&rows, "status", None);
        assert_eq!(groups[0].0, "A");
    }

    #[test]
    fn test_card_lifecycle() {
        let mut dash = DashboardState::new();
        dash.begin_fetch_all();
        assert!(dash.any_loading());

        let rows = records(vec![json!({"status": "Pending"}), json!({"status": "Pending"})]);
        dash.apply_success(DashboardCard::RequestsByStatus, &rows);

        let card = dash.card(DashboardCard::RequestsByStatus);
        assert!(card.loaded);
        assert_eq!(card.total, 2);
        assert_eq!(card.groups, vec![("Pending".to_string(), 2)]);

        dash.apply_failure(DashboardCard::BaysByStatus);
        let failed = dash.card(DashboardCard::BaysByStatus);
        assert!(!failed.loaded);
        assert!(failed.groups.is_empty());
    }
}
