//! fungi-core
//!
//! Stock ledger rules, the owning repository and read-side queries for Fungistock.
//! Depends on fungi-domain. No CLI, no terminal I/O; persistence goes through
//! the [`InventoryStore`] trait.

pub mod error;
pub mod format;
pub mod ledger;
pub mod query;
pub mod record;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod summary;

pub use error::{CoreError, CoreResult};
pub use format::*;
pub use ledger::*;
pub use query::*;
pub use record::Record;
pub use repository::Repository;
pub use seed::demo_inventory;
pub use storage::*;
pub use summary::*;
