//! Async client for the openHAB REST API.
//!
//! Thin transport layer used by `habindex-core`: builds an authenticated
//! `reqwest::Client`, issues read-only GET requests against the server's
//! REST surface, and maps failures into the [`ApiError`] taxonomy.
//!
//! Retry policy is explicit by design — every [`RestClient`] method performs
//! exactly one HTTP request. Callers opt into bounded retries with
//! [`with_retry`], which backs off exponentially on transient failures.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{RestClient, with_retry};
pub use error::ApiError;
pub use transport::Transport;
pub use types::{RawItem, RootLink, RootResponse};
