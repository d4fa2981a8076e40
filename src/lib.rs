//! Matchpoint reconciliation core
//!
//! Library behind the matchpoint tennis data warehouse, covering:
//! - Batch ledger (audited run lifecycle with append-only log lines)
//! - Change-detection upsert of staged tournaments and players
//! - Ranking-points computation from match results and the points rulebook
//! - Atomic merge of duplicate player identities across all referencing tables
//!
//! Scraping, CSV export and modeling live outside this crate; they only read
//! and write the staging and dimension tables this core maintains.

pub mod config;
pub mod db;
pub mod digest;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod reconcile;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use config::AppConfig;
pub use digest::{Canonical, Fingerprint};
pub use errors::{ReconError, Result};
pub use store::{Store, WriteOp};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
