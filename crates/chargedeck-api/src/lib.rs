//! # chargedeck-api - Remote Data Gateway
//!
//! Thin HTTP wrappers over the charging platform's REST backend. Each
//! operation issues exactly one request: a bearer token is attached from the
//! explicit [`AuthSession`](chargedeck_core::AuthSession), JSON bodies are
//! serialized, and a non-2xx response becomes
//! [`Error::Api`](chargedeck_core::Error) carrying the server-provided
//! `message`. No retries, no caching, no request de-duplication -- callers
//! own those policies.
//!
//! ## Layout
//! - [`client`] - [`ApiClient`]: base URL + reqwest plumbing + error extraction
//! - [`resource`] - [`ResourceClient`]: one generic REST repository
//!   (`list`/`get`/`get_paged`/`create`/`update`/`delete` + scoped variants)
//! - [`auth`] - login, token refresh, OTP validate/resend

pub mod auth;
pub mod client;
pub mod resource;

pub use auth::{login, refresh_token, resend_otp, validate_otp, LoginRequest};
pub use client::ApiClient;
pub use resource::{
    approve_account_request, connector_types, reject_account_request, station_qr_code,
    ResourceClient,
};
