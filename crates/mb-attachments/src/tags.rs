//! Person tagging
//!
//! Tags live outside the attachment records, keyed by the same stable
//! identifiers, so they survive attachment recreation when the cache
//! missed.

use std::collections::{BTreeMap, BTreeSet};

/// Mapping from attachment identifier to the set of tagged person names.
///
/// Sets are ordered so the names serialize deterministically on the wire.
#[derive(Debug, Clone, Default)]
pub struct PersonTags {
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl PersonTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// The people tagged in an attachment; empty when none were tagged.
    pub fn for_attachment(&self, id: &str) -> BTreeSet<String> {
        self.tags.get(id).cloned().unwrap_or_default()
    }

    pub fn is_tagged(&self, id: &str, person: &str) -> bool {
        self.tags.get(id).is_some_and(|set| set.contains(person))
    }

    /// Tap-to-select semantics: tags the person if untagged, untags
    /// otherwise. Returns whether the person is tagged afterwards.
    pub fn toggle(&mut self, id: &str, person: &str) -> bool {
        let set = self.tags.entry(id.to_string()).or_default();
        if set.remove(person) {
            false
        } else {
            set.insert(person.to_string());
            true
        }
    }

    pub fn tag(&mut self, id: &str, person: &str) {
        self.tags
            .entry(id.to_string())
            .or_default()
            .insert(person.to_string());
    }

    pub fn untag(&mut self, id: &str, person: &str) {
        if let Some(set) = self.tags.get_mut(id) {
            set.remove(person);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_attachment_yields_empty_set() {
        let tags = PersonTags::new();
        assert!(tags.for_attachment("photo-1").is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut tags = PersonTags::new();
        assert!(tags.toggle("photo-1", "Person A"));
        assert!(tags.is_tagged("photo-1", "Person A"));

        assert!(!tags.toggle("photo-1", "Person A"));
        assert!(!tags.is_tagged("photo-1", "Person A"));
    }

    #[test]
    fn tags_are_independent_per_attachment() {
        let mut tags = PersonTags::new();
        tags.tag("photo-1", "Person A");
        tags.tag("photo-2", "Person B");

        assert!(tags.is_tagged("photo-1", "Person A"));
        assert!(!tags.is_tagged("photo-2", "Person A"));
    }

    #[test]
    fn people_iterate_in_sorted_order() {
        let mut tags = PersonTags::new();
        tags.tag("photo-1", "Person B");
        tags.tag("photo-1", "Person A");

        let people: Vec<String> = tags.for_attachment("photo-1").into_iter().collect();
        assert_eq!(people, vec!["Person A", "Person B"]);
    }
}
