mod query_result;
mod requests;
mod responses;

pub use query_result::{QueryResult, SourceSnippet};
pub use requests::{QueryRequest, UploadRequest, ValidationError};
pub use responses::{ServiceStatus, UploadReceipt};
