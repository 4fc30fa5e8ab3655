//! # chargedeck-app - Application State and Orchestration
//!
//! The Model/Update half of the TEA loop: application state, messages, the
//! update function, the screen controllers (paged lists, expandable related
//! rows, form/filter modals, the action menu), the entity catalog, settings,
//! and the background-task dispatch that talks to the gateway.
//!
//! The view half lives in `chargedeck-tui`; the binary wires the two
//! together around a tokio mpsc channel.

pub mod actions;
pub mod config;
pub mod dashboard;
pub mod entities;
pub mod form;
pub mod handler;
pub mod input_key;
pub mod list;
pub mod menu;
pub mod message;
pub mod notifications;
pub mod process;
pub mod related;
pub mod state;

pub use handler::{update, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::{Message, MutationKind};
pub use process::process_message;
pub use state::{AppPhase, AppState, BrowserState, Overlay, Screen};
