// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Completion candidates for a line editor.
//!
//! A bounded, ordered list of strings that an editor's tab-completion reads.
//! Pushes past the cap are dropped silently. Independent of `rth-rt`.

/// Cap used by [`Completion::default`].
pub const DEFAULT_LIMIT: usize = 4096;

/// Bounded ordered list of completion candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Completion {
    items: Vec<String>,
    limit: usize,
}

impl Completion {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit,
        }
    }

    /// Append a candidate. Returns `false` if the list is full and the
    /// candidate was dropped.
    pub fn push(&mut self, candidate: &str) -> bool {
        if self.items.len() >= self.limit {
            tracing::trace!(limit = self.limit, "completion list full; dropping candidate");
            return false;
        }
        self.items.push(candidate.to_string());
        true
    }

    /// Replace all candidates, keeping at most `limit` of them in order.
    pub fn set_all<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear();
        let iter = candidates.into_iter();
        self.items.reserve(iter.size_hint().0.min(self.limit));
        for candidate in iter.take(self.limit) {
            self.items.push(candidate.as_ref().to_string());
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the cap. Candidates beyond the new cap are discarded.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.items.truncate(limit);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Candidates that start with `prefix`, in list order.
    pub fn matching<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |c| c.starts_with(prefix))
    }

    /// Longest prefix shared by every candidate matching `prefix`.
    pub fn common_prefix(&self, prefix: &str) -> Option<String> {
        let mut matches = self.matching(prefix);
        let first = matches.next()?;
        let mut len = first.len();
        for m in matches {
            len = first
                .char_indices()
                .zip(m.chars())
                .take_while(|((_, a), b)| a == b)
                .last()
                .map(|((i, c), _)| i + c.len_utf8())
                .unwrap_or(0)
                .min(len);
        }
        Some(first[..len].to_string())
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl<'a> IntoIterator for &'a Completion {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_drops_past_limit() {
        let mut c = Completion::new(2);
        assert!(c.push("a"));
        assert!(c.push("b"));
        assert!(!c.push("c"));
        assert_eq!(c.iter().collect::<Vec<_>>(), ["a", "b"]);
        assert!(c.is_full());
    }

    #[test]
    fn set_all_keeps_order_and_cap() {
        let mut c = Completion::new(3);
        c.push("old");
        c.set_all(["x", "y", "z", "w"]);
        assert_eq!(c.iter().collect::<Vec<_>>(), ["x", "y", "z"]);
    }

    #[test]
    fn set_all_accepts_owned_strings() {
        let mut c = Completion::default();
        c.set_all(vec!["seek".to_string(), "search".to_string()]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(1), Some("search"));
        assert_eq!(c.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn clear_empties() {
        let mut c = Completion::new(4);
        c.push("a");
        c.clear();
        assert!(c.is_empty());
        assert!(c.push("b"));
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let mut c = Completion::new(0);
        assert!(!c.push("a"));
        c.set_all(["a"]);
        assert!(c.is_empty());
    }

    #[test]
    fn shrinking_limit_truncates() {
        let mut c = Completion::new(4);
        c.set_all(["a", "b", "c"]);
        c.set_limit(1);
        assert_eq!(c.iter().collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn matching_filters_by_prefix() {
        let mut c = Completion::default();
        c.set_all(["print", "pdf", "seek", "px"]);
        assert_eq!(c.matching("p").collect::<Vec<_>>(), ["print", "pdf", "px"]);
        assert_eq!(c.matching("q").count(), 0);
    }

    #[test]
    fn common_prefix_of_matches() {
        let mut c = Completion::default();
        c.set_all(["print", "prompt", "seek"]);
        assert_eq!(c.common_prefix("p").as_deref(), Some("pr"));
        assert_eq!(c.common_prefix("s").as_deref(), Some("seek"));
        assert_eq!(c.common_prefix("x"), None);
    }

    #[test]
    fn borrowed_iteration() {
        let mut c = Completion::default();
        c.set_all(["a", "b"]);
        let mut seen = vec![];
        for s in &c {
            seen.push(s);
        }
        assert_eq!(seen, ["a", "b"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_items_and_limit() {
        let mut c = Completion::new(8);
        c.push("seek");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"items":["seek"],"limit":8}"#);
        let back: Completion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
