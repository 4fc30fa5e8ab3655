//! # chargedeck-core - Core Domain Types
//!
//! Foundation crate for chargedeck. Provides the paging contract, opaque
//! entity records, field/column schemas, the authenticated session context,
//! error handling, and logging initialization.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Paging (`paging`)
//! - [`PageRequest`] - server-side paging parameters (page, size, sort, filters)
//! - [`PageResponse`] - one page of records plus the total matching count
//! - [`PageData`] - the `{rows, total_items}` pair controllers hand to views
//!
//! ### Records (`record`)
//! - [`Record`] - an opaque JSON entity passed through unchanged
//!
//! ### Schemas (`schema`)
//! - [`FieldKind`] - tagged variant per renderable form field kind
//! - [`FieldSpec`], [`ColumnSpec`] - declarative form/table metadata
//!
//! ### Session (`session`)
//! - [`AuthSession`] - bearer token, expiry, profile, and tenant scope
//! - [`Role`] - admin vs. tenant-restricted operator
//!
//! ### Error Handling (`error`)
//! - [`Error`] - custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use chargedeck_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod paging;
pub mod record;
pub mod schema;
pub mod session;

/// Prelude for common imports used throughout all chargedeck crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use paging::{PageData, PageRequest, PageResponse};
pub use record::Record;
pub use schema::{ColumnSpec, FieldKind, FieldSpec, OptionsSource, SelectOption};
pub use session::{AuthSession, Role, UserProfile};
