//! Per-call configuration.
//!
//! - [`CallOptions`]: method, query, headers, body, credentials for one call
//! - [`Body`]: the accepted request-body forms
//! - [`Credentials`]: fetch-style credentials modes

mod options;

pub use options::{Body, CallOptions, Credentials};
