//! Library boundary tests.
//!
//! Everything here uses only types exported from the `minirag` crate root,
//! confirming the controller and sinks can be driven without the CLI or TUI.
//! CLI types (`Cli`, `Commands`, ...) stay in main.rs and must not be needed.

use std::sync::Arc;

use minirag::{
    Action, ApiError, ClientController, Outcome, OutputSink, Page, QueryRequest, QueryResult,
    RagClientTrait, RenderedAnswer, ServiceStatus, SourceSnippet, TerminalSink, Tone,
    UploadReceipt, UploadRequest,
};

/// Answers every question with the question itself and one source.
struct EchoClient;

impl RagClientTrait for EchoClient {
    fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        Ok(UploadReceipt {
            message: format!("Stored {} bytes", request.text().len()),
        })
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryResult, ApiError> {
        Ok(QueryResult::new(
            format!("{} [1]", request.question()),
            vec![SourceSnippet::new(1, "echo")],
        ))
    }

    fn health(&self) -> Result<ServiceStatus, ApiError> {
        Ok(ServiceStatus {
            status: "ok".to_string(),
        })
    }
}

/// Counts the updates it receives.
#[derive(Default)]
struct CountingSink {
    updates: usize,
}

impl OutputSink for CountingSink {
    fn set_busy(&mut self, _action: Action, _busy: bool) {
        self.updates += 1;
    }

    fn show_status(&mut self, _message: &str, _tone: Tone) {
        self.updates += 1;
    }

    fn show_answer(&mut self, _answer: &RenderedAnswer) {
        self.updates += 1;
    }

    fn show_sources(&mut self, _sources: &[SourceSnippet]) {
        self.updates += 1;
    }

    fn set_results_visible(&mut self, _visible: bool) {
        self.updates += 1;
    }

    fn alert(&mut self, _message: &str) {
        self.updates += 1;
    }
}

fn controller() -> ClientController {
    ClientController::new(Arc::new(EchoClient))
}

#[test]
fn custom_sink_receives_updates() {
    let mut sink = CountingSink::default();
    let outcome = controller().submit_query("ping", &mut sink);

    assert_eq!(outcome, Outcome::Succeeded);
    // busy on, hide, clear answer, clear sources, answer, sources, show, busy off
    assert_eq!(sink.updates, 8);
}

#[test]
fn page_renders_full_fragment() {
    let controller = controller();
    let mut page = Page::new();

    assert!(controller.submit_context("some notes", &mut page).is_success());
    assert!(controller.submit_query("<why>", &mut page).is_success());

    let html = page.to_html();
    assert!(html.contains("Stored 10 bytes"));
    assert!(html.contains("&lt;why&gt; <strong>[1]</strong>"));
    assert!(html.contains("<li><strong>[1]</strong>: echo</li>"));
    assert!(html.contains("<section id=\"results-container\">"));
}

#[test]
fn terminal_sink_writes_to_any_writer() {
    let mut sink = TerminalSink::new(Vec::new(), false);
    let outcome = controller().submit_query("ping", &mut sink);
    let output = String::from_utf8(sink.finish().unwrap()).unwrap();

    assert_eq!(outcome, Outcome::Succeeded);
    assert!(output.contains("ping [1]"));
    assert!(output.contains("  [1]: echo"));
}

#[test]
fn controller_is_shareable_across_threads() {
    let controller = Arc::new(controller());
    let handles: Vec<_> = ["one", "two"]
        .into_iter()
        .map(|text| {
            let controller = Arc::clone(&controller);
            std::thread::spawn(move || {
                let mut page = Page::new();
                controller.submit_context(text, &mut page)
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap();
        assert!(matches!(outcome, Outcome::Succeeded | Outcome::Skipped));
    }
    assert!(!controller.is_in_flight(Action::Upload));
}
