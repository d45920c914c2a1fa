//! # Session Store
//!
//! An in-memory key-value store with a browser-style storage interface and
//! per-entry TTL (time-to-live) expiration.
//!
//! ## Features
//!
//! - Browser-style surface: `set_item`, `get_item`, `has`, `includes`,
//!   `key(i)`, `remove_item`, `clear`, `len`
//! - Insertion-ordered keys (indexed access via `key(i)`)
//! - Lazy expiration on read plus a periodic background sweep task
//! - Optional default TTL with per-call overrides
//! - Structural deep-equality value lookup (`includes`)
//! - Values are JSON (`serde_json::Value`), shared cheaply via `Arc`
//!
//! ## Example
//!
//! ```rust,no_run
//! use session_store::{SessionStore, StoreConfig};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Entries expire after 5 minutes; expired entries are also reclaimed
//!     // by a background sweep every 30 seconds.
//!     let config = StoreConfig::default()
//!         .with_default_ttl(Duration::from_secs(300))
//!         .with_sweep_interval(Duration::from_secs(30));
//!     let store = SessionStore::with_config(config);
//!
//!     // Store a value under the default TTL, or override it per call
//!     store.set_item("user:123", json!({ "name": "John Doe" }));
//!     store
//!         .set_item_with_ttl("otp:123", json!("491262"), Duration::from_secs(60))
//!         .unwrap();
//!
//!     if let Some(value) = store.get_item("user:123") {
//!         println!("user: {}", value["name"]);
//!     }
//!
//!     // Structural lookup by value rather than by key
//!     assert!(store.includes(&json!({ "name": "John Doe" })));
//!
//!     // Empties the store and cancels the background sweep task
//!     store.clear();
//! }
//! ```
//!
//! A store built without a default TTL never expires anything, spawns no
//! background task, and needs no async runtime:
//!
//! ```rust
//! use session_store::SessionStore;
//! use serde_json::json;
//!
//! let store = SessionStore::new();
//! store.set_item("item", json!(10));
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.key(0).as_deref(), Some("item"));
//! ```

mod config;
mod entry;
mod matcher;
mod store;

pub use config::StoreConfig;
pub use entry::Entry;
pub use matcher::deep_equal;
pub use store::{SessionStore, SetError};
