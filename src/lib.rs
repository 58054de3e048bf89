//! # Webview Bridge
//!
//! Core of an embeddable webview: lets native code expose named functions to
//! script running in a page and answer those calls, synchronously or later
//! from any thread.
//!
//! ## Architecture
//!
//! ```text
//! Page script
//!     │  window[name](...args)  →  {"id", "method", "params"}
//!     ▼
//! Engine (platform backend, or HeadlessEngine)
//!     │  Handle::deliver
//!     ▼
//! Dispatcher ──► owning thread ──► Webview::on_message
//!     ▲                                │  json scanner pulls id/method/params
//!     │                                ▼
//! Handle::resolve (any thread)     Binding registry ──► handler
//!     │
//!     ▼
//! window._rpc[id].resolve(result) / .reject(result)
//! ```
//!
//! ## Features
//!
//! - **Zero-copy value scanner**: locate a value by key or index without
//!   building a document
//! - **Thread-affine dispatch**: work posted from any thread runs in order on
//!   the UI thread
//! - **Version gate**: callers state the minimum behavior they need
//! - **Headless engine**: drive and inspect the bridge without a browser

#![deny(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod json;
pub mod logging;
pub mod script;
pub mod version;
pub mod webview;

// Re-export commonly used types
pub use config::{ConfigError, CreateOptions};
pub use dispatcher::{Dispatcher, EventQueue};
pub use engine::{Engine, HeadlessEngine, HeadlessProbe};
pub use envelope::{Envelope, RpcNamespace};
pub use error::{Error, ErrorCode, Result};
pub use version::{version_info, Version, VersionInfo};
pub use webview::{Binding, Handle, Webview};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
