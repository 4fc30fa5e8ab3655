//! Message types for the application (TEA pattern)

use chargedeck_core::{PageData, Record, SelectOption};

use crate::dashboard::DashboardCard;
use crate::entities::EntityKind;
use crate::input_key::InputKey;

/// Which mutation a result message reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    ToggleActivate,
    Approve,
    Reject,
}

impl MutationKind {
    /// Past-tense label for the success notification.
    pub fn done_label(self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
            MutationKind::ToggleActivate => "toggled",
            MutationKind::Approve => "approved",
            MutationKind::Reject => "rejected",
        }
    }
}

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates (notification expiry)
    Tick,

    /// Quit immediately
    Quit,

    /// Switch the browser to an entity screen
    SwitchEntity(EntityKind),

    /// Show the dashboard screen
    ShowDashboard,

    // ─────────────────────────────────────────────────────────
    // Data results
    // ─────────────────────────────────────────────────────────
    /// A paged list fetch resolved
    PageLoaded {
        entity: EntityKind,
        /// Sequence number of the issuing request; stale responses are
        /// discarded against the controller's latest.
        seq: u64,
        result: Result<PageData, String>,
    },

    /// A child-list fetch for an expanded parent row resolved
    RelatedLoaded {
        parent_id: String,
        result: Result<PageData, String>,
    },

    /// Select options for a form field resolved
    OptionsLoaded {
        field: &'static str,
        result: Result<Vec<SelectOption>, String>,
    },

    /// A mutation resolved
    MutationDone {
        entity: EntityKind,
        kind: MutationKind,
        /// Set for child mutations; triggers a child-list refresh at the
        /// parent's current page.
        parent_id: Option<String>,
        result: Result<(), String>,
    },

    /// Internal follow-up: refresh an expanded parent's child list at its
    /// current page (after a child create/update/delete)
    RefreshRelated { parent_id: String },

    /// A station QR payload resolved
    QrCodeLoaded {
        station_id: String,
        result: Result<String, String>,
    },

    /// One dashboard card's raw list resolved
    DashboardLoaded {
        card: DashboardCard,
        result: Result<Vec<Record>, String>,
    },

    /// The backend session is no longer usable (expired/revoked)
    SessionInvalid { message: String },
}
