pub mod api;
pub mod config;
pub mod controller;
pub mod doctor;
pub mod logging;
pub mod models;
pub mod page;
pub mod render;
pub mod terminal;
pub mod tui;
pub mod utils;

pub use api::{ApiError, RagClient, RagClientBuilder, RagClientTrait};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use controller::{Action, ClientController, Outcome, OutputSink, Tone};
pub use models::{
    QueryRequest, QueryResult, ServiceStatus, SourceSnippet, UploadReceipt, UploadRequest,
    ValidationError,
};
pub use page::Page;
pub use render::{RenderedAnswer, RenderedResult, render};
pub use terminal::TerminalSink;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let request = UploadRequest::new("  text  ").unwrap();
        assert_eq!(request.text(), "text");
        assert_eq!(QueryRequest::new(""), Err(ValidationError::EmptyQuestion));

        let result = QueryResult::new("Blue [1].", vec![SourceSnippet::new(1, "sky")]);
        let rendered = render(&result);
        assert_eq!(rendered.answer_html(), "Blue <strong>[1]</strong>.");

        let page = Page::new();
        assert!(!page.results_visible());
        assert!(Outcome::Succeeded.is_success());
    }

    #[test]
    fn client_builds_from_crate_root() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:8000/")
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let client = RagClientBuilder::new().config(config).build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
