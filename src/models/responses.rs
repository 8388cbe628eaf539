use serde::Deserialize;

/// Success body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// Human-readable confirmation, e.g. "Successfully uploaded 3 chunks."
    #[serde(default)]
    pub message: String,
}

/// Success body of the `GET /` health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
}
