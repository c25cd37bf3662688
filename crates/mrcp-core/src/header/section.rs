use super::name::HeaderName;
use std::collections::HashMap;

/// Ordered header fields with a secondary index for O(1) lookup by known
/// header id. Insertion order is preserved (invariant #1 in SPEC_FULL.md
/// requires equality to hold field-wise after a generate∘parse round trip).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSection {
    fields: Vec<(HeaderName, String)>,
    index: HashMap<HeaderName, usize>,
}

impl HeaderSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping only the first index entry for a repeated
    /// known header (matches the source's "known fields... kept by id"
    /// first-wins semantics; repeats are still preserved in `fields`).
    pub fn push(&mut self, name: HeaderName, value: impl Into<String>) {
        let idx = self.fields.len();
        self.index.entry(name.clone()).or_insert(idx);
        self.fields.push((name, value.into()));
    }

    pub fn get(&self, name: &HeaderName) -> Option<&str> {
        self.index.get(name).map(|&idx| self.fields[idx].1.as_str())
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &str)> {
        self.fields.iter().map(|(n, v)| (n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn content_length(&self) -> Option<usize> {
        self.get(&HeaderName::ContentLength)?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut h = HeaderSection::new();
        h.push(HeaderName::ContentType, "application/synthesis+ssml");
        h.push(HeaderName::Other("Speech-Language".to_string()), "en-US");
        let names: Vec<_> = h.iter().map(|(n, _)| n.as_wire_str().to_string()).collect();
        assert_eq!(names, vec!["Content-Type", "Speech-Language"]);
    }

    #[test]
    fn content_length_parses_known_header() {
        let mut h = HeaderSection::new();
        h.push(HeaderName::ContentLength, "42");
        assert_eq!(h.content_length(), Some(42));
    }

    #[test]
    fn first_occurrence_wins_for_known_header_lookup() {
        let mut h = HeaderSection::new();
        h.push(HeaderName::ContentId, "first");
        h.push(HeaderName::ContentId, "second");
        assert_eq!(h.get(&HeaderName::ContentId), Some("first"));
        assert_eq!(h.len(), 2);
    }
}
