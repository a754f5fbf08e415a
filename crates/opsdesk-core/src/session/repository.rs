//! Store repository trait.
//!
//! Defines the interface for persisting the session store.

use super::store::StoreState;
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for persisting the session store.
///
/// The whole store state (session list plus active pointer) is written and
/// read as one unit; there is no partial or incremental persistence. This
/// trait decouples the application's core logic from the specific storage
/// mechanism (e.g., a JSON snapshot file, a database, a remote API).
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Schema versioning and migration of older snapshots
/// - Recovery from corrupt or missing data (an unreadable snapshot loads as
///   an empty state rather than an error)
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Loads the persisted store state.
    ///
    /// # Returns
    ///
    /// - `Ok(StoreState)`: The persisted state, or an empty state when
    ///   nothing has been persisted yet or the snapshot is unreadable
    /// - `Err(_)`: Error occurred during retrieval
    async fn load(&self) -> Result<StoreState>;

    /// Persists the store state, replacing any previous snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: State saved successfully
    /// - `Err(_)`: Error occurred during save
    async fn save(&self, state: &StoreState) -> Result<()>;
}
