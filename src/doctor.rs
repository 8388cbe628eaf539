//! Health check utilities for minirag.
//!
//! Provides the `doctor` command: reports the resolved configuration and
//! whether the RAG service answers on its health endpoint.

use std::io::{self, Write};

use crate::api::RagClientTrait;
use crate::config::{API_URL_ENV, ClientConfig, TIMEOUT_ENV};
use crate::terminal::{BOLD, DIM, GREEN, RED, RESET, YELLOW};


/// Health status for a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is healthy
    Ok,
    /// Component answered but something looks off
    Warning(String),
    /// Component is not reachable or not functional
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }
}

/// Result of probing the service's health endpoint.
#[derive(Debug, Clone)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    pub base_url: String,
    /// Status string reported by the service, if it answered.
    pub reported: Option<String>,
}

/// Probes `GET /` and classifies the result.
pub fn check_service_health(client: &dyn RagClientTrait, config: &ClientConfig) -> ServiceHealth {
    let base_url = config.base_url().to_string();

    match client.health() {
        Ok(status) => ServiceHealth {
            status: if status.status.is_empty() {
                HealthStatus::Warning("Service answered without a status".to_string())
            } else {
                HealthStatus::Ok
            },
            base_url,
            reported: Some(status.status),
        },
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            ServiceHealth {
                status: HealthStatus::Error(format!("Connection failed: {}", e)),
                base_url,
                reported: None,
            }
        }
    }
}

/// Performs all health checks and prints the report to stdout.
///
/// Returns whether the service is healthy.
pub fn run_health_checks(client: &dyn RagClientTrait, config: &ClientConfig) -> io::Result<bool> {
    let health = check_service_health(client, config);
    let mut stdout = io::stdout().lock();
    write_health_report(&mut stdout, config, &health)?;
    Ok(health.status.is_ok())
}

// ============================================================================
// Pretty Printing
// ============================================================================

fn status_symbol(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => "\u{2713}",
        HealthStatus::Warning(_) => "!",
        HealthStatus::Error(_) => "\u{2717}",
    }
}

fn status_color(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => GREEN,
        HealthStatus::Warning(_) => YELLOW,
        HealthStatus::Error(_) => RED,
    }
}

/// Writes the doctor report.
pub fn write_health_report(
    out: &mut impl Write,
    config: &ClientConfig,
    service: &ServiceHealth,
) -> io::Result<()> {
    writeln!(out, "{}minirag doctor{}", BOLD, RESET)?;
    writeln!(out)?;

    // Configuration section
    writeln!(out, "{}Configuration{}", BOLD, RESET)?;
    writeln!(out, "  API URL:  {}", config.base_url())?;
    writeln!(out, "    {}Set with --api-url or {}{}", DIM, API_URL_ENV, RESET)?;
    match config.timeout() {
        Some(timeout) => writeln!(out, "  Timeout:  {}s", timeout.as_secs())?,
        None => writeln!(out, "  Timeout:  none")?,
    }
    writeln!(out, "    {}Set with {}{}", DIM, TIMEOUT_ENV, RESET)?;
    writeln!(out)?;

    // Service section
    writeln!(out, "{}Service{}", BOLD, RESET)?;
    let status_text = match &service.status {
        HealthStatus::Ok => "Reachable".to_string(),
        HealthStatus::Warning(w) => w.clone(),
        HealthStatus::Error(e) => e.clone(),
    };
    writeln!(
        out,
        "  {}{}{} Status: {}",
        status_color(&service.status),
        status_symbol(&service.status),
        RESET,
        status_text
    )?;
    writeln!(out, "    {}URL: {}/{}", DIM, service.base_url, RESET)?;
    if let Some(reported) = &service.reported {
        writeln!(out, "    {}Reported: {}{}", DIM, reported, RESET)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{QueryRequest, QueryResult, ServiceStatus, UploadReceipt, UploadRequest};

    struct HealthOnly(Result<&'static str, u16>);

    impl RagClientTrait for HealthOnly {
        fn upload(&self, _request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
            unimplemented!("doctor never uploads")
        }

        fn query(&self, _request: &QueryRequest) -> Result<QueryResult, ApiError> {
            unimplemented!("doctor never queries")
        }

        fn health(&self) -> Result<ServiceStatus, ApiError> {
            match self.0 {
                Ok(status) => Ok(ServiceStatus {
                    status: status.to_string(),
                }),
                Err(status) => Err(ApiError::Http { status }),
            }
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::builder()
            .base_url("http://rag.test:8000")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap()
    }

    #[test]
    fn test_health_status_is_ok() {
        assert!(HealthStatus::Ok.is_ok());
        assert!(!HealthStatus::Warning("w".to_string()).is_ok());
        assert!(!HealthStatus::Error("e".to_string()).is_ok());
    }

    #[test]
    fn reachable_service_is_ok() {
        let health = check_service_health(&HealthOnly(Ok("API is running")), &config());
        assert_eq!(health.status, HealthStatus::Ok);
        assert_eq!(health.reported.as_deref(), Some("API is running"));
        assert_eq!(health.base_url, "http://rag.test:8000");
    }

    #[test]
    fn empty_status_is_a_warning() {
        let health = check_service_health(&HealthOnly(Ok("")), &config());
        assert!(matches!(health.status, HealthStatus::Warning(_)));
    }

    #[test]
    fn failing_service_is_an_error() {
        let health = check_service_health(&HealthOnly(Err(503)), &config());
        assert_eq!(
            health.status,
            HealthStatus::Error("Connection failed: HTTP error! Status: 503".to_string())
        );
        assert!(health.reported.is_none());
    }

    #[test]
    fn report_lists_configuration_and_status() {
        let config = config();
        let health = check_service_health(&HealthOnly(Ok("API is running")), &config);

        let mut out = Vec::new();
        write_health_report(&mut out, &config, &health).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("API URL:  http://rag.test:8000"));
        assert!(report.contains("Timeout:  30s"));
        assert!(report.contains("Status: Reachable"));
        assert!(report.contains("Reported: API is running"));
    }

    #[test]
    fn report_colors_match_terminal_output() {
        let config = config();
        let down = check_service_health(&HealthOnly(Err(503)), &config);

        let mut out = Vec::new();
        write_health_report(&mut out, &config, &down).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.starts_with(&format!("{BOLD}minirag doctor{RESET}")));
        assert!(report.contains(&format!("{RED}\u{2717}{RESET} Status: Connection failed")));
    }
}
