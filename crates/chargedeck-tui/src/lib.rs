//! # chargedeck-tui - Terminal UI
//!
//! The View half of the TEA loop: terminal setup, event polling, screen
//! rendering, and the widget set (entity tables with expandable rows,
//! schema-driven form modals, the action menu, dashboard charts).

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

// Re-export main entry point
pub use runner::run;
