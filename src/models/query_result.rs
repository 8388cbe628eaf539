use serde::{Deserialize, Serialize};

/// A retrieved passage cited from within an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnippet {
    /// Citation index, referenced in the answer as `[position]`.
    pub position: i64,
    /// Passage text exactly as returned by the service (unescaped).
    pub content: String,
}

impl SourceSnippet {
    pub fn new(position: i64, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
        }
    }
}

/// Success body of `POST /query`.
///
/// `sources` may be absent or `null` on the wire; both read as no sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    answer: String,
    #[serde(default)]
    sources: Option<Vec<SourceSnippet>>,
}

impl QueryResult {
    pub fn new(answer: impl Into<String>, sources: Vec<SourceSnippet>) -> Self {
        Self {
            answer: answer.into(),
            sources: Some(sources),
        }
    }

    /// Returns the raw answer text.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the cited sources, empty when the service sent none.
    pub fn sources(&self) -> &[SourceSnippet] {
        self.sources.as_deref().unwrap_or_default()
    }

    pub fn has_sources(&self) -> bool {
        !self.sources().is_empty()
    }
}
