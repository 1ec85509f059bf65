//! Search query construction from command arguments.

/// Tags a `key:value` token may switch to.
pub const QUERY_TAGS: &[&str] = &[
    "artist", "album", "title", "track", "name", "genre", "date", "composer", "performer",
    "comment", "disc", "filename", "any",
];

const DEFAULT_TAG: &str = "any";

/// Ordered `(tag, value)` filters for an MPD `search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    filters: Vec<(String, String)>,
}

impl SearchQuery {
    /// Build a query from whitespace-split arguments.
    ///
    /// Words accumulate under the current tag, which starts as `any`. A word
    /// of the form `tag:value` with a known tag switches the current tag
    /// before its value is added. Values for a tag are joined with single
    /// spaces, and tags keep the order they first appeared in.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut query = Self::default();
        let mut current = DEFAULT_TAG.to_string();

        for token in tokens {
            let token = token.as_ref();
            let word = match token.split_once(':') {
                Some((tag, value)) if is_tag(tag) => {
                    current = tag.to_ascii_lowercase();
                    value
                }
                _ => token,
            };
            if !word.is_empty() {
                query.push(&current, word);
            }
        }

        query
    }

    fn push(&mut self, tag: &str, word: &str) {
        match self.filters.iter_mut().find(|(t, _)| t == tag) {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(word);
            }
            None => self.filters.push((tag.to_string(), word.to_string())),
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

fn is_tag(word: &str) -> bool {
    QUERY_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(word))
}
