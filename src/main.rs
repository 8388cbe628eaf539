use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use minirag::{
    ClientConfig, ClientController, ConfigError, Outcome, Page, RagClientBuilder, TerminalSink,
    ValidationError, doctor, logging, tui, utils,
};

/// minirag - client for a retrieval-augmented question answering service
#[derive(Parser)]
#[command(name = "minirag")]
#[command(about = "Upload context to a RAG service and ask questions about it")]
#[command(version)]
struct Cli {
    /// Base URL of the RAG service (overrides MINIRAG_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Upload context text for indexing
    Upload(UploadCommand),
    /// Ask a question about the uploaded context
    Query(QueryCommand),
    /// Check configuration and service reachability
    Doctor,
    /// Launch interactive terminal UI
    Tui,
}

/// Upload context text
#[derive(Parser)]
struct UploadCommand {
    /// The text to upload; read from stdin when neither TEXT nor --file is given
    #[arg(value_name = "TEXT", conflicts_with = "file")]
    text: Option<String>,

    /// Read the text from a file (`-` for stdin)
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,
}

/// Ask a question
#[derive(Parser)]
struct QueryCommand {
    /// The question to ask
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Print the result as an HTML fragment
    #[arg(long)]
    html: bool,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => {}
        // The action already reported its failure
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let exit_code = if is_user_error(&e) { 1 } else { 2 };
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code);
        }
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are invalid input and invalid configuration. Everything else
/// (I/O, terminal, HTTP client construction) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<ValidationError>().is_some()
        || error.downcast_ref::<ConfigError>().is_some()
}

/// Runs the selected command. Returns whether it succeeded.
fn run(cli: &Cli) -> Result<bool> {
    match cli.command {
        Commands::Tui => {
            let log_path = utils::get_log_path()?;
            logging::init_file(cli.verbose, &log_path)?;
        }
        _ => logging::init_stderr(cli.verbose),
    }

    let config = build_config(cli.api_url.as_deref())?;
    tracing::debug!(base_url = config.base_url(), "resolved configuration");

    let client = RagClientBuilder::new()
        .config(config.clone())
        .build()
        .context("Failed to create HTTP client")?;

    match &cli.command {
        Commands::Upload(cmd) => {
            let text = resolve_context(cmd)?;
            let controller = ClientController::new(Arc::new(client));
            handle_upload(&controller, &text)
        }
        Commands::Query(cmd) => {
            let controller = ClientController::new(Arc::new(client));
            handle_query(&controller, &cmd.question, cmd.html)
        }
        Commands::Doctor => {
            doctor::run_health_checks(&client, &config).context("Failed to write health report")
        }
        Commands::Tui => {
            let controller = Arc::new(ClientController::new(Arc::new(client)));
            tui::run(controller, config.base_url())?;
            Ok(true)
        }
    }
}

/// Resolves configuration, letting `--api-url` override the environment.
fn build_config(api_url: Option<&str>) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder();
    if let Some(url) = api_url {
        builder = builder.base_url(url);
    }
    builder.build().context("Invalid configuration")
}

/// Picks the context text from the argument, the file, or stdin.
fn resolve_context(cmd: &UploadCommand) -> Result<String> {
    match (&cmd.text, &cmd.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => utils::read_text_source(path),
        (None, None) => utils::read_text_source(Path::new("-")),
    }
}

fn handle_upload(controller: &ClientController, text: &str) -> Result<bool> {
    let mut sink = TerminalSink::stdout();
    let outcome = controller.submit_context(text, &mut sink);
    sink.finish().context("Failed to write output")?;
    Ok(outcome.is_success())
}

fn handle_query(controller: &ClientController, question: &str, html: bool) -> Result<bool> {
    if !html {
        let mut sink = TerminalSink::stdout();
        let outcome = controller.submit_query(question, &mut sink);
        sink.finish().context("Failed to write output")?;
        return Ok(outcome.is_success());
    }

    let mut page = Page::new();
    let outcome = controller.submit_query(question, &mut page);
    for alert in page.alerts() {
        eprintln!("{alert}");
    }
    if outcome != Outcome::Rejected {
        print!("{}", page.to_html());
    }
    Ok(outcome.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_accepts_text_argument() {
        let cli = Cli::try_parse_from(["minirag", "upload", "some context"]).unwrap();
        match cli.command {
            Commands::Upload(cmd) => {
                assert_eq!(cmd.text.as_deref(), Some("some context"));
                assert!(cmd.file.is_none());
            }
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn upload_rejects_text_and_file_together() {
        let result = Cli::try_parse_from(["minirag", "upload", "text", "--file", "notes.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "minirag",
            "query",
            "What is Rust?",
            "--html",
            "--api-url",
            "http://rag:9000",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://rag:9000"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Query(cmd) => {
                assert_eq!(cmd.question, "What is Rust?");
                assert!(cmd.html);
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn query_requires_question() {
        assert!(Cli::try_parse_from(["minirag", "query"]).is_err());
    }

    #[test]
    fn resolve_context_prefers_argument() {
        let cmd = UploadCommand {
            text: Some("inline".to_string()),
            file: None,
        };
        assert_eq!(resolve_context(&cmd).unwrap(), "inline");
    }

    #[test]
    fn resolve_context_reads_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("context.txt");
        std::fs::write(&path, "from file").unwrap();

        let cmd = UploadCommand {
            text: None,
            file: Some(path),
        };
        assert_eq!(resolve_context(&cmd).unwrap(), "from file");
    }

    #[test]
    fn invalid_api_url_is_user_error() {
        let err = build_config(Some("not a url")).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn io_errors_are_internal() {
        let err = anyhow::Error::new(std::io::Error::other("disk on fire"))
            .context("Failed to write output");
        assert!(!is_user_error(&err));
    }
}
