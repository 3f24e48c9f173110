//! A thin request-building layer over an injected HTTP transport.
//!
//! `solidfetch` builds URLs from path templates with lazily resolved slots,
//! merges global and per-call query parameters, headers, and bodies, runs
//! ordered request/response/error interceptor chains, and delegates the
//! actual I/O to a fetch-style [`Transport`] supplied by the embedding
//! application. It performs no network I/O, retries, or caching of its own.
//!
//! # Example
//!
//! ```ignore
//! use solidfetch::{CallOptions, Client, Dynamic, Injectable, PathTemplate, ReqwestTransport};
//!
//! let client = Client::builder()
//!     .transport(ReqwestTransport::default())
//!     .injectable("token", Injectable::from_fn(|| current_token().into()))
//!     .header("authorization", Dynamic::from_fn(|inj| inj["token"].clone()))
//!     .build()?;
//!
//! let user = client
//!     .request(PathTemplate::new("/users/").slot(42i64))
//!     .call(CallOptions::new().query("active", true))
//!     .await?;
//! ```

mod builder;
mod client;
pub mod config;
mod error;
mod inject;
mod interceptor;
mod path;
pub mod request;
pub mod response;
pub mod transport;
pub mod value;

pub use builder::{BuildError, ClientBuilder};
pub use client::{Client, Endpoint};
pub use config::{Body, CallOptions, Credentials};
pub use error::{FetchError, TransportError};
pub use inject::{Injectable, Injectables, ResolvedInjectables};
pub use interceptor::{Chain, Intercept, Interceptor};
pub use path::PathTemplate;
pub use request::{Payload, RequestParts};
pub use response::{Data, FetchResult};
pub use transport::{FnTransport, Transport, TransportRequest, TransportResponse};
pub use value::{Dynamic, Value};

pub use http::{Method, StatusCode};

#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
