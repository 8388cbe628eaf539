/// Integration tests against a running RAG service.
///
/// Skipped unless `MINIRAG_LIVE_URL` points at a service, since CI has none.
///
/// To run locally:
/// ```bash
/// MINIRAG_LIVE_URL=http://localhost:8000 cargo test --test live_service_integration
/// ```
use std::sync::Arc;

use minirag::{
    ClientConfig, ClientController, Outcome, Page, RagClientBuilder, RagClientTrait, Tone,
};

const LIVE_URL_ENV: &str = "MINIRAG_LIVE_URL";

/// Returns the live service URL, or `None` to skip.
fn live_url() -> Option<String> {
    match std::env::var(LIVE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            println!("Skipping live test ({LIVE_URL_ENV} not set)");
            None
        }
    }
}

fn live_client(url: &str) -> minirag::RagClient {
    let config = ClientConfig::builder()
        .base_url(url)
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .expect("MINIRAG_LIVE_URL must be a valid URL");
    RagClientBuilder::new()
        .config(config)
        .build()
        .expect("Failed to create client")
}

#[test]
fn live_service_is_healthy() {
    let Some(url) = live_url() else {
        return;
    };

    let status = live_client(&url).health().expect("health check failed");
    assert!(!status.status.is_empty());
}

#[test]
fn live_upload_then_query() {
    let Some(url) = live_url() else {
        return;
    };

    let controller = ClientController::new(Arc::new(live_client(&url)));
    let mut page = Page::new();

    let outcome = controller.submit_context(
        "The Rust programming language was first released as version 1.0 in May 2015.",
        &mut page,
    );
    assert_eq!(outcome, Outcome::Succeeded, "status: {:?}", page.status());
    assert!(matches!(page.status(), Some((_, Tone::Success))));

    let outcome = controller.submit_query("When was Rust 1.0 released?", &mut page);
    assert_eq!(outcome, Outcome::Succeeded, "answer: {}", page.answer_html());
    assert!(page.results_visible());
    assert!(!page.answer_html().is_empty());
}
