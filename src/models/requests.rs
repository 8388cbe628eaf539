use serde::Serialize;
use thiserror::Error;

/// Input rejected before any network call is made.
///
/// The display text doubles as the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The context text was empty or whitespace-only.
    #[error("Please paste some text to upload.")]
    EmptyContext,
    /// The question was empty or whitespace-only.
    #[error("Please enter a question.")]
    EmptyQuestion,
}

/// Body of a `POST /upload` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    text: String,
}

impl UploadRequest {
    /// Builds a request from raw user input.
    ///
    /// The input is trimmed; an empty result is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use minirag::UploadRequest;
    ///
    /// let request = UploadRequest::new("  Rust is a language.\n").unwrap();
    /// assert_eq!(request.text(), "Rust is a language.");
    /// assert!(UploadRequest::new(" \t ").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyContext);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    /// Returns the trimmed text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Body of a `POST /query` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    question: String,
}

impl QueryRequest {
    /// Builds a request from raw user input, trimming it first.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let question = raw.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        Ok(Self {
            question: question.to_string(),
        })
    }

    /// Returns the trimmed question.
    pub fn question(&self) -> &str {
        &self.question
    }
}
