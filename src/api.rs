/// HTTP client for the RAG service.
///
/// This module provides a blocking client for the `/upload`, `/query` and
/// health endpoints, the error type shared by all of them, and the trait the
/// controller is written against so tests can substitute a mock.
mod client;

pub use client::{ApiError, RagClient, RagClientBuilder, RagClientTrait, interpret_response};
