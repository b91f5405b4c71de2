use crate::storage::{entities::Classification, settings::SiteLists};

/// Maps a normalized domain to a [Classification] using the configured site
/// lists. Matching is substring containment, so a list entry of "google.com"
/// covers "docs.google.com" as well.
pub struct Classifier {
    lists: SiteLists,
}

impl Classifier {
    pub fn new(lists: SiteLists) -> Self {
        Self { lists }
    }

    /// The productive list is checked first and wins when both lists match.
    pub fn classify(&self, domain: &str) -> Classification {
        if domain.is_empty() {
            return Classification::Neutral;
        }
        if self
            .lists
            .productive_sites
            .iter()
            .any(|site| domain.contains(site.as_str()))
        {
            return Classification::Productive;
        }
        if self
            .lists
            .distracting_sites
            .iter()
            .any(|site| domain.contains(site.as_str()))
        {
            return Classification::Distracting;
        }
        Classification::Neutral
    }
}
