//! Pack groups: the registrations made under one pack id.

use std::fmt;
use std::sync::Arc;

use crate::i18n::{LanguageTag, Priority, TextMap};

/// Callback returning a pack's texts for one language.
pub(crate) type PackCallback = Arc<dyn Fn(&LanguageTag) -> Option<TextMap> + Send + Sync>;

/// One registration: a callback and the languages it was registered for.
#[derive(Clone)]
pub(crate) struct PackEntry {
    pub(crate) priority: Priority,
    pub(crate) callback: PackCallback,
    pub(crate) supported: Vec<LanguageTag>,
}

impl PackEntry {
    pub(crate) fn new(
        priority: Priority,
        callback: PackCallback,
        supported: Vec<LanguageTag>,
    ) -> Self {
        Self {
            priority,
            callback,
            supported,
        }
    }

    pub(crate) fn supports(&self, tag: &LanguageTag) -> bool {
        self.supported.contains(tag)
    }

    pub(crate) fn load(&self, tag: &LanguageTag) -> Option<TextMap> {
        (self.callback)(tag)
    }
}

impl fmt::Debug for PackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackEntry")
            .field("priority", &self.priority)
            .field("supported", &self.supported)
            .finish_non_exhaustive()
    }
}

/// Entries for one pack id, sorted by priority on demand.
#[derive(Debug, Default)]
pub(crate) struct PackGroup {
    entries: Vec<PackEntry>,
    is_sorted: bool,
}

impl PackGroup {
    pub(crate) fn add_entry(&mut self, entry: PackEntry) {
        self.entries.push(entry);
        self.is_sorted = false;
    }

    /// Entries in ascending priority. The sort is stable, so entries of equal
    /// priority keep registration order and later ones win on merge.
    pub(crate) fn sorted_entries(&mut self) -> &[PackEntry] {
        if !self.is_sorted {
            self.entries.sort_by_key(|entry| entry.priority);
            self.is_sorted = true;
        }
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Distinct supported tags of `entries`, in first-seen order.
pub(crate) fn supported_tags(entries: &[PackEntry]) -> Vec<LanguageTag> {
    let mut tags: Vec<LanguageTag> = Vec::with_capacity(entries.len());
    for tag in entries.iter().flat_map(|entry| entry.supported.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
