//! Client controller binding the two user actions to the RAG service.
//!
//! Each action follows `idle -> busy -> (success | failure) -> idle`. Failures
//! never escape an action: they become a visible message on the sink.

mod guard;
mod sink;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::RagClientTrait;
use crate::models::{QueryRequest, UploadRequest};
use crate::render::{RenderedAnswer, render};

use guard::BusyGuard;
pub use sink::{Action, OutputSink, Tone};

/// Status shown while an upload is being indexed.
pub const UPLOAD_IN_PROGRESS: &str = "Embedding document... this may take a moment.";

/// How a triggered action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input failed validation; no request was sent.
    Rejected,
    /// The same action was already in flight; nothing happened.
    Skipped,
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Runs upload and query actions against a [`RagClientTrait`] and reports
/// progress to an [`OutputSink`].
///
/// The controller is `Send + Sync`; share it through an `Arc` to trigger
/// actions from worker threads.
pub struct ClientController {
    client: Arc<dyn RagClientTrait>,
    upload_in_flight: AtomicBool,
    query_in_flight: AtomicBool,
}

impl ClientController {
    pub fn new(client: Arc<dyn RagClientTrait>) -> Self {
        Self {
            client,
            upload_in_flight: AtomicBool::new(false),
            query_in_flight: AtomicBool::new(false),
        }
    }

    /// Returns whether a request for `action` is currently running.
    pub fn is_in_flight(&self, action: Action) -> bool {
        self.flag(action).load(Ordering::Acquire)
    }

    fn flag(&self, action: Action) -> &AtomicBool {
        match action {
            Action::Upload => &self.upload_in_flight,
            Action::Query => &self.query_in_flight,
        }
    }

    /// Submits context text for indexing.
    ///
    /// A trigger while an upload is in flight is ignored. Blank input shows a
    /// validation message and sends nothing. Otherwise
    /// the upload control is busy until the request finishes, the result
    /// panel is hidden, and the status line reports progress, then the
    /// service's message or the failure.
    pub fn submit_context<S: OutputSink + ?Sized>(&self, text: &str, sink: &mut S) -> Outcome {
        if self.is_in_flight(Action::Upload) {
            tracing::debug!(action = %Action::Upload, "already in flight, ignoring trigger");
            return Outcome::Skipped;
        }

        let request = match UploadRequest::new(text) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(action = %Action::Upload, "rejected blank input");
                sink.show_status(&e.to_string(), Tone::Error);
                return Outcome::Rejected;
            }
        };

        let Some(mut ui) = BusyGuard::acquire(self.flag(Action::Upload), Action::Upload, sink)
        else {
            tracing::debug!(action = %Action::Upload, "already in flight, ignoring trigger");
            return Outcome::Skipped;
        };

        ui.show_status(UPLOAD_IN_PROGRESS, Tone::Neutral);
        ui.set_results_visible(false);

        tracing::info!(action = %Action::Upload, bytes = request.text().len(), "submitting context");
        match self.client.upload(&request) {
            Ok(receipt) => {
                tracing::info!(action = %Action::Upload, message = %receipt.message, "upload succeeded");
                ui.show_status(&receipt.message, Tone::Success);
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::error!(action = %Action::Upload, error = %e, "upload failed");
                ui.show_status(&format!("Upload failed: {e}"), Tone::Error);
                Outcome::Failed
            }
        }
    }

    /// Asks a question and renders the answer with its sources.
    ///
    /// A trigger while a query is in flight is ignored. Blank input raises an
    /// alert and sends nothing. Otherwise any previous
    /// result is cleared before the request is sent; on failure the error is
    /// written into the answer area and the result panel is revealed.
    pub fn submit_query<S: OutputSink + ?Sized>(&self, question: &str, sink: &mut S) -> Outcome {
        if self.is_in_flight(Action::Query) {
            tracing::debug!(action = %Action::Query, "already in flight, ignoring trigger");
            return Outcome::Skipped;
        }

        let request = match QueryRequest::new(question) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(action = %Action::Query, "rejected blank input");
                sink.alert(&e.to_string());
                return Outcome::Rejected;
            }
        };

        let Some(mut ui) = BusyGuard::acquire(self.flag(Action::Query), Action::Query, sink)
        else {
            tracing::debug!(action = %Action::Query, "already in flight, ignoring trigger");
            return Outcome::Skipped;
        };

        ui.set_results_visible(false);
        ui.show_answer(&RenderedAnswer::empty());
        ui.show_sources(&[]);

        tracing::info!(action = %Action::Query, question = %request.question(), "submitting question");
        match self.client.query(&request) {
            Ok(result) => {
                tracing::info!(
                    action = %Action::Query,
                    sources = result.sources().len(),
                    "query succeeded"
                );
                let rendered = render(&result);
                ui.show_answer(&rendered.answer);
                ui.show_sources(&rendered.sources);
                ui.set_results_visible(true);
                Outcome::Succeeded
            }
            Err(e) => {
                tracing::error!(action = %Action::Query, error = %e, "query failed");
                ui.show_answer(&RenderedAnswer::plain(format!("Error getting answer: {e}")));
                ui.set_results_visible(true);
                Outcome::Failed
            }
        }
    }
}
