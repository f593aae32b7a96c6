//! The template list as the user sees it: optionally filtered, reorderable only
//! when unfiltered.

use crate::core::error::{Error, Result};
use crate::core::repository::SnapshotStore;
use crate::core::store::TemplateStore;
use crate::core::template::Template;

/// Presentation state for the template list
#[derive(Debug, Clone, Default)]
pub struct ListView {
    filter: Option<String>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search filter. A blank query clears it.
    pub fn with_filter(mut self, query: Option<&str>) -> Self {
        self.set_filter(query);
        self
    }

    pub fn set_filter(&mut self, query: Option<&str>) {
        self.filter = query
            .filter(|q| !q.trim().is_empty())
            .map(str::to_string);
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Templates currently shown, in stored order.
    pub fn visible<'s, S: SnapshotStore>(&self, store: &'s TemplateStore<S>) -> Vec<&'s Template> {
        store.search(self.filter().unwrap_or(""))
    }

    /// Apply a drop-time reorder of the visible list.
    ///
    /// While a filter is active the visible list is only part of the collection, so
    /// its order cannot be authoritative and the reorder is refused.
    pub fn reorder<S: SnapshotStore, I: AsRef<str>>(
        &self,
        store: &mut TemplateStore<S>,
        ids: &[I],
    ) -> Result<()> {
        self.ensure_unfiltered()?;
        store.reorder(ids)
    }

    /// Move one template to a new position in the visible list.
    pub fn move_to<S: SnapshotStore>(
        &self,
        store: &mut TemplateStore<S>,
        id: &str,
        to: usize,
    ) -> Result<()> {
        self.ensure_unfiltered()?;
        store.move_to(id, to)
    }

    fn ensure_unfiltered(&self) -> Result<()> {
        match &self.filter {
            Some(query) => Err(Error::consistency(format!(
                "cannot reorder while the list is filtered by \"{query}\"; clear the filter first"
            ))),
            None => Ok(()),
        }
    }
}
