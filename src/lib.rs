#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Brigade
//!
//! Async client SDK for the Brigade restaurant-ops backend: recipe
//! catalog, point-of-sale orders, inventory, staff and expenses, and
//! session management over a REST API.
//!
//! ## Features
//!
//! - **Resilient requests** with per-attempt timeouts, capped
//!   exponential backoff, and a closed error taxonomy: callers always
//!   see one [`ApiError`], never a raw transport failure
//! - **Session monitoring**: a [`TokenMonitor`] that checks credential
//!   expiry locally, probes the backend, and signals expiry exactly once
//! - **Typed endpoints** for every backend route
//! - **Persistent sessions** through a pluggable key-value store
//! - **Deterministic tests** via injectable clocks and sleepers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brigade::model::LoginRequest;
//! use brigade::{ApiClient, ClientConfig, Credential};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:3002")?;
//!     let client = ApiClient::new(&config)?;
//!
//!     let auth = client
//!         .login(&LoginRequest {
//!             username_or_email: "chef_amara".into(),
//!             password: "Str0ng!pass".into(),
//!         })
//!         .await?;
//!     let credential = Credential::parse(auth.bearer_token().unwrap_or_default())?;
//!
//!     let recipes = client.fetch_recipes(&credential).await?;
//!     println!("{} recipes on the menu", recipes.len());
//!     Ok(())
//! }
//! ```

pub mod backoff;
pub mod client;
pub mod clock;
pub mod config;
mod endpoints;
pub mod error;
pub mod jitter;
pub mod model;
pub mod monitor;
pub mod retry;
pub mod session;
pub mod sleeper;
pub mod token;
pub mod transport;
pub mod validation;

// Re-exports
pub use backoff::{Backoff, BackoffError};
pub use client::{ApiClient, ApiResponse};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, ConfigError, MonitorSettings, RetrySettings};
pub use error::{ApiError, ErrorKind};
pub use jitter::Jitter;
pub use monitor::{MonitorState, OnExpired, Probe, TokenMonitor, TokenMonitorBuilder};
pub use retry::{RetryPolicy, RetryPolicyBuilder};
pub use session::{FileStore, MemoryStore, Session, SessionStore, StorageAdapter, StoreError};
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper};
pub use token::{Claims, Credential};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
