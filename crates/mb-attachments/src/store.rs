//! Identifier-keyed attachment store
//!
//! The sole creator of attachment identities. Reconciling a selection
//! reuses cached records, so a photo that was deselected and re-selected
//! comes back with its load state and description intact.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::model::Attachment;

/// Owns the mapping from selection identifiers to attachment records and
/// the active ordered selection derived from it.
///
/// Cache entries are retained for deselected identifiers and never
/// evicted; selections are bounded per session, so retention is cheaper
/// than reloading photo bytes on re-selection.
#[derive(Debug, Default)]
pub struct AttachmentStore {
    cache: HashMap<String, Arc<Attachment>>,
    active: Vec<Arc<Attachment>>,
}

impl AttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the active sequence for a new selection.
    ///
    /// Each identifier reuses its cached attachment when present and gets
    /// a fresh `NotLoaded` record otherwise. The returned order is the
    /// selection order. Synchronous, with no I/O side effects.
    pub fn reconcile(&mut self, selection: &[String]) -> Vec<Arc<Attachment>> {
        let active: Vec<Arc<Attachment>> = selection
            .iter()
            .map(|id| {
                Arc::clone(
                    self.cache
                        .entry(id.clone())
                        .or_insert_with(|| Arc::new(Attachment::new(id.clone()))),
                )
            })
            .collect();

        debug!(
            selected = active.len(),
            cached = self.cache.len(),
            "selection reconciled"
        );
        self.active = active.clone();
        active
    }

    /// The attachments for the current selection, in selection order.
    pub fn active(&self) -> &[Arc<Attachment>] {
        &self.active
    }

    /// Looks up a cached attachment, selected or not.
    pub fn cached(&self, id: &str) -> Option<Arc<Attachment>> {
        self.cache.get(id).map(Arc::clone)
    }

    /// Number of records retained in the cache.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
