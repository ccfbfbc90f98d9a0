//! Ordered SGF-style property mapping.
//!
//! Each node owns one [`PropertyMap`]: short tags ("C", "SZ", "AB", ...) to
//! lists of string values. Insertion order is preserved so that file
//! round-trips regenerate the same output. SGF text syntax itself is out of
//! scope; this is only the tag -> values shape.

/// Insertion-ordered mapping from short tag to string values.
///
/// Property maps are small (a handful of tags per node), so linear scans over
/// a Vec beat hashing and keep ordering for free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(String, Vec<String>)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `tag`, or None if absent.
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|(t, _)| t == tag)
    }

    /// Set the values for `tag`, replacing any existing values. A new tag is
    /// appended at the end, keeping insertion order.
    pub fn set(&mut self, tag: impl Into<String>, values: Vec<String>) {
        let tag = tag.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, v)) => *v = values,
            None => self.entries.push((tag, values)),
        }
    }

    /// Append a single value to `tag`, creating the tag if needed.
    pub fn push_value(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, v)) => v.push(value.into()),
            None => self.entries.push((tag, vec![value.into()])),
        }
    }

    /// Iterate tags and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (tag, values) in iter {
            map.set(tag, values);
        }
        map
    }
}
