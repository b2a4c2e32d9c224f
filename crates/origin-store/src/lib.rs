//! Origin Storage Layer
//!
//! The content anchor registry and its durable SQLite journal.
//!
//! # Architecture
//!
//! - [`Registry`] holds the in-memory indexes (by fingerprint, by record id,
//!   by creator, parent to children) and the insertion order
//! - [`SqliteJournal`] is the append-only durability backend, replayed on open
//! - Insertion events fan out to indexers over a tokio broadcast channel
//!
//! # Examples
//!
//! ```no_run
//! use origin_store::{Registry, RegistryConfig};
//!
//! let registry = Registry::open("origin.db", RegistryConfig::default()).unwrap();
//! println!("{} records anchored", registry.count());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod journal;
pub mod registry;

pub use error::{RegistryError, Result};
pub use journal::SqliteJournal;
pub use registry::{Registry, RegistryConfig};
