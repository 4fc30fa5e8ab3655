//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event routing per screen/overlay
//! - `browser`: Entity-screen handlers (paging, expansion, mutations)
//! - `modal`: Form/filter/menu overlay key handlers
//! - `dashboard`: Dashboard handlers

pub(crate) mod browser;
pub(crate) mod dashboard;
pub(crate) mod keys;
pub(crate) mod modal;
pub(crate) mod update;


use chargedeck_core::{OptionsSource, PageRequest, Record};

use crate::entities::EntityKind;
use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Fetch one page of the active entity list
    FetchPage {
        entity: EntityKind,
        request: PageRequest,
        /// Tag echoed back in `Message::PageLoaded` for stale discard
        seq: u64,
    },

    /// Fetch one page of a parent-scoped child list
    FetchRelated {
        child: EntityKind,
        scope_segment: &'static str,
        parent_id: String,
        page: u32,
        page_size: u32,
        sort_field: &'static str,
    },

    /// Resolve remote select options for form fields
    FetchOptions {
        requests: Vec<(&'static str, OptionsSource)>,
    },

    /// Create a record
    Create {
        entity: EntityKind,
        record: Record,
        parent_id: Option<String>,
    },

    /// Update a record (id travels in the URL, not the body)
    UpdateRecord {
        entity: EntityKind,
        id: String,
        record: Record,
        parent_id: Option<String>,
    },

    /// Delete a record
    DeleteRecord {
        entity: EntityKind,
        id: String,
        parent_id: Option<String>,
    },

    /// Flip a record's active flag
    ToggleActivate { entity: EntityKind, id: String },

    /// Approve an account request with an admin response
    Approve { id: String, response: String },

    /// Reject an account request with an admin response
    Reject { id: String, response: String },

    /// Fetch a station's QR payload
    FetchQrCode { station_id: String },

    /// Fire the dashboard's parallel aggregate fetches
    FetchDashboard,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn both(msg: Message, action: UpdateAction) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }
}
