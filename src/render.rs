//! Result rendering.
//!
//! Answers and source snippets come from a model and a document store we do
//! not control, so everything is escaped before any markup is added. Citation
//! markers such as `[1]` are emphasized only after escaping.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{QueryResult, SourceSnippet};

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("valid citation pattern"));

/// Escapes `<` and `>` so the text cannot be reinterpreted as markup.
///
/// # Examples
///
/// ```
/// use minirag::render::escape_html;
///
/// assert_eq!(escape_html("<script>"), "&lt;script&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Wraps every `[digits]` marker in `<strong>`.
///
/// Must only be applied to already-escaped text.
pub fn highlight_citations(escaped: &str) -> String {
    CITATION
        .replace_all(escaped, "<strong>[$1]</strong>")
        .into_owned()
}

/// Renders an answer as an HTML fragment: escape first, then emphasize citations.
pub fn answer_html(answer: &str) -> String {
    highlight_citations(&escape_html(answer))
}

/// Renders sources as an HTML list, or `None` when there are none.
///
/// Each entry's content is escaped independently.
pub fn sources_html(sources: &[SourceSnippet]) -> Option<String> {
    if sources.is_empty() {
        return None;
    }

    let mut html = String::from("<ul>");
    for source in sources {
        html.push_str(&format!(
            "<li><strong>[{}]</strong>: {}</li>",
            source.position,
            escape_html(&source.content)
        ));
    }
    html.push_str("</ul>");
    Some(html)
}

/// Removes control characters (other than newline and tab) so text from the
/// service cannot inject terminal escape sequences.
pub fn sanitize_for_terminal(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_unsafe_control) {
        Cow::Owned(text.chars().filter(|c| !is_unsafe_control(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

fn is_unsafe_control(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}

/// A piece of answer text, either plain or a citation marker like `[2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Citation(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Self::Text(s) | Self::Citation(s) => s,
        }
    }
}

/// Answer text ready for display on any output surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedAnswer {
    text: String,
    citations: bool,
}

impl RenderedAnswer {
    /// An answer from the service; citation markers will be emphasized.
    pub fn from_answer(answer: impl Into<String>) -> Self {
        Self {
            text: answer.into(),
            citations: true,
        }
    }

    /// Plain text such as an error message; escaped but never highlighted.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: false,
        }
    }

    /// The empty answer, used to clear the answer area.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Raw (unescaped) text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn to_html(&self) -> String {
        if self.citations {
            answer_html(&self.text)
        } else {
            escape_html(&self.text)
        }
    }

    /// Splits the raw text into plain and citation segments for terminal surfaces.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        if !self.citations {
            return if self.text.is_empty() {
                Vec::new()
            } else {
                vec![Segment::Text(&self.text)]
            };
        }

        let mut segments = Vec::new();
        let mut last = 0;
        for marker in CITATION.find_iter(&self.text) {
            if marker.start() > last {
                segments.push(Segment::Text(&self.text[last..marker.start()]));
            }
            segments.push(Segment::Citation(marker.as_str()));
            last = marker.end();
        }
        if last < self.text.len() {
            segments.push(Segment::Text(&self.text[last..]));
        }
        segments
    }
}

/// A query result prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub answer: RenderedAnswer,
    pub sources: Vec<SourceSnippet>,
}

impl RenderedResult {
    pub fn answer_html(&self) -> String {
        self.answer.to_html()
    }

    pub fn sources_html(&self) -> Option<String> {
        sources_html(&self.sources)
    }
}

/// Prepares a successful query result for display.
pub fn render(result: &QueryResult) -> RenderedResult {
    RenderedResult {
        answer: RenderedAnswer::from_answer(result.answer()),
        sources: result.sources().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_replaces_angle_brackets() {
        assert_eq!(
            escape_html("a <b> c </b>"),
            "a &lt;b&gt; c &lt;/b&gt;"
        );
        assert_eq!(escape_html("no markup"), "no markup");
    }

    #[test]
    fn answer_html_bolds_citations() {
        assert_eq!(
            answer_html("The sky is blue [1]."),
            "The sky is blue <strong>[1]</strong>."
        );
        assert_eq!(
            answer_html("See [2][10] and [x]"),
            "See <strong>[2]</strong><strong>[10]</strong> and [x]"
        );
    }

    #[test]
    fn answer_html_never_emits_script_markup() {
        for answer in [
            "<script>alert(1)</script>",
            "ok [1]<script>",
            "<img src=x onerror=alert(1)>",
            "[<1>]",
        ] {
            let html = answer_html(answer);
            assert!(!html.contains("<script"), "{html}");
            assert!(!html.contains("<img"), "{html}");
            let stripped = html.replace("<strong>", "").replace("</strong>", "");
            assert!(!stripped.contains('<'), "{html}");
        }
        assert!(answer_html("<script>").contains("&lt;script&gt;"));
    }

    #[test]
    fn escaped_brackets_are_not_mistaken_for_citations() {
        assert_eq!(answer_html("[<3>]"), "[&lt;3&gt;]");
    }

    #[test]
    fn sources_html_escapes_each_entry() {
        let sources = vec![
            SourceSnippet::new(1, "<sky-doc>"),
            SourceSnippet::new(3, "plain"),
        ];
        assert_eq!(
            sources_html(&sources).unwrap(),
            "<ul><li><strong>[1]</strong>: &lt;sky-doc&gt;</li>\
             <li><strong>[3]</strong>: plain</li></ul>"
        );
    }

    #[test]
    fn sources_html_is_none_for_empty_list() {
        assert_eq!(sources_html(&[]), None);
    }

    #[test]
    fn segments_split_on_citations() {
        let answer = RenderedAnswer::from_answer("Blue [1], wet [2].");
        assert_eq!(
            answer.segments(),
            vec![
                Segment::Text("Blue "),
                Segment::Citation("[1]"),
                Segment::Text(", wet "),
                Segment::Citation("[2]"),
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn plain_answers_are_not_highlighted() {
        let answer = RenderedAnswer::plain("Error getting answer: HTTP error! Status: 500 [1]");
        assert_eq!(answer.segments().len(), 1);
        assert!(!answer.to_html().contains("<strong>"));
        assert!(RenderedAnswer::empty().segments().is_empty());
    }

    #[test]
    fn render_keeps_sources_in_order() {
        let result = QueryResult::new(
            "The sky is blue [1].",
            vec![SourceSnippet::new(1, "<sky-doc>")],
        );
        let rendered = render(&result);

        assert_eq!(rendered.answer_html(), "The sky is blue <strong>[1]</strong>.");
        assert!(rendered.sources_html().unwrap().contains("&lt;sky-doc&gt;"));
    }

    #[test]
    fn sanitize_for_terminal_strips_escape_sequences() {
        assert_eq!(sanitize_for_terminal("red\x1b[31m text"), "red[31m text");
        assert_eq!(sanitize_for_terminal("line\nnext\tcol"), "line\nnext\tcol");
        assert!(matches!(sanitize_for_terminal("clean"), Cow::Borrowed(_)));
    }
}
