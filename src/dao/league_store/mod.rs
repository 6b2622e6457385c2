//! Storage adapters able to load the league and persist engine changesets.

#[cfg(feature = "json-file-store")]
pub mod json_file;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::{
    models::{LeagueSnapshot, StoreMutation},
    storage::StorageResult,
};

/// Abstraction over the persistence layer for the whole league.
///
/// `commit` receives every mutation produced by one engine command and must apply all of them
/// or none.
pub trait LeagueStore: Send + Sync {
    /// Short backend name used in logs and health reports.
    fn backend(&self) -> &'static str;
    /// Load every persisted collection.
    fn load(&self) -> BoxFuture<'static, StorageResult<LeagueSnapshot>>;
    /// Atomically apply a changeset.
    fn commit(&self, changes: Vec<StoreMutation>) -> BoxFuture<'static, StorageResult<()>>;
    /// Check the backend is usable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
