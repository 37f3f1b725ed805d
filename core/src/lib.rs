//! Client for the Chimp Rewriter article-rewriting API.
//!
//! # Overview
//! Three remote operations: `ChimpRewrite` (spin or rewrite an article),
//! `CreateSpin` (resolve spintax into one plain version) and `Statistics`
//! (credit usage). Each is a single form-encoded POST answered with a flat
//! JSON object.
//!
//! ```no_run
//! use chimp_core::{ClientConfig, RewriteOptions, RewriteServiceClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RewriteServiceClient::new(ClientConfig::new("my-app")?)?;
//! let result = client
//!     .rewrite("me@example.com", "API_KEY", "Some article.", &RewriteOptions::default())
//!     .await;
//! if result.is_success() {
//!     println!("{}", result.output);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `ChimpClient` is I/O-free: `build_*` validates arguments and produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `RewriteServiceClient` pairs it with a `Transport` and reports every
//!   failure as data, the way the service reports its own.
//! - Configuration is an owned `ClientConfig`; there is no global state.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod options;
pub mod service;
pub mod transport;
pub mod types;

pub use client::ChimpClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, TransportError, ValidationError};
pub use form::FormBody;
pub use http::{HttpRequest, HttpResponse};
pub use options::{estimate_credits, CreateSpinOptions, RewriteOptions, TagProtect};
pub use service::RewriteServiceClient;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{PosMatch, Quality, RewriteResult, RewriteStatus, UsageStats};
