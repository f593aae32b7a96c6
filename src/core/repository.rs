//! Persistence boundary for the template collection
//!
//! The store never knows where its snapshot lives. It talks to a [`SnapshotStore`],
//! which holds exactly one value: the whole ordered collection. Implementations
//! might write a JSON file, keep the snapshot in memory for tests, or use any other
//! key-value blob storage.
//!
//! # Design Notes
//!
//! - **Whole-collection snapshots**: there are no per-record writes, so a save either
//!   replaces the previous snapshot entirely or leaves it untouched.
//! - **Absence is normal**: a store that has never been written reports `None`, which
//!   the template store treats as an empty (or freshly seeded) collection.

use crate::core::error::Result;
use crate::core::template::Template;

/// Trait for loading and saving the full template collection.
///
/// # Examples
///
/// ```no_run
/// use promptdeck::core::repository::SnapshotStore;
///
/// fn count_saved(store: &impl SnapshotStore) -> promptdeck::core::error::Result<usize> {
///     Ok(store.load()?.map(|templates| templates.len()).unwrap_or(0))
/// }
/// ```
pub trait SnapshotStore {
    /// Load the last saved snapshot.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if nothing was ever saved, `Ok(Some(templates))` in stored order
    /// otherwise. A snapshot that exists but cannot be decoded is an error, never an
    /// empty collection.
    fn load(&self) -> Result<Option<Vec<Template>>>;

    /// Replace the saved snapshot with `templates`.
    ///
    /// Must be atomic: on error the previous snapshot is still the one `load`
    /// returns.
    fn save(&self, templates: &[Template]) -> Result<()>;

    /// Human-readable description of where snapshots go, for logs and messages.
    fn location(&self) -> String;
}
