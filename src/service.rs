//! Documentation service client
//!
//! The collection engine never talks to the generation backend; this module
//! is the caller-side seam that ships a batch of [`FileRecord`]s and returns
//! the generated document.

use std::borrow::Cow;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FileRecord;

/// Default generation endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/document";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors reported by a documentation service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The service could not be reached or the request failed in transit
    #[error("Request error: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response
        message: String,
    },

    /// The response body was not the expected document
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        ServiceError::Request(error.to_string())
    }
}

/// Something that turns a file batch into a document
pub trait DocumentService {
    /// Generate documentation for the given files
    fn generate(&self, files: &[FileRecord]) -> Result<String, ServiceError>;
}

/// One file as sent over the wire
#[derive(Debug, Serialize)]
pub struct CodeFile<'a> {
    /// Path relative to the project root
    pub path: Cow<'a, str>,
    /// File content
    pub content: &'a str,
}

/// Request body accepted by the generation endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest<'a> {
    /// Files to document
    pub code_files: Vec<CodeFile<'a>>,
}

impl<'a> DocumentRequest<'a> {
    /// Borrow a batch of records as a request body
    pub fn from_records(records: &'a [FileRecord]) -> Self {
        Self {
            code_files: records
                .iter()
                .map(|record| CodeFile {
                    path: record.relative_path().to_string_lossy(),
                    content: record.content(),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct DocumentResponse {
    documentation: String,
}

/// Pick the most useful message out of an error response
///
/// Prefers a JSON `detail` field, then the raw body, then the status text.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(detail) if !detail.is_null() => return detail.to_string(),
            _ => {}
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Documentation generation failed")
        .to_string()
}

/// HTTP implementation posting JSON to a generation endpoint
pub struct HttpDocumentService {
    client: Client,
    endpoint: String,
}

impl HttpDocumentService {
    /// Create a client for `endpoint` with a request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a service around a preconfigured client
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DocumentService for HttpDocumentService {
    fn generate(&self, files: &[FileRecord]) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&DocumentRequest::from_records(files))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let document: DocumentResponse = response
            .json()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        Ok(document.documentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned HTTP response and hand back the request body
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/document", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
            }

            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            String::from_utf8(request_body).unwrap()
        });

        (endpoint, handle)
    }

    fn local_service(endpoint: String) -> HttpDocumentService {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        HttpDocumentService::with_client(endpoint, client)
    }

    #[test]
    fn test_request_shape() {
        let records = vec![
            FileRecord::new("src/main.ts", "console.log(1);"),
            FileRecord::new("package.json", "{}"),
        ];

        let value = serde_json::to_value(DocumentRequest::from_records(&records)).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "codeFiles": [
                    { "path": "src/main.ts", "content": "console.log(1);" },
                    { "path": "package.json", "content": "{}" }
                ]
            })
        );
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        assert_eq!(error_message(status, r#"{"detail":"model overloaded"}"#), "model overloaded");
        assert_eq!(
            error_message(status, r#"{"detail":[{"msg":"field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
        assert_eq!(error_message(status, "upstream timeout\n"), "upstream timeout");
        assert_eq!(error_message(status, ""), "Internal Server Error");
    }

    #[test]
    fn test_http_service_round_trip() {
        let (endpoint, server) = serve_once("200 OK", r#"{"documentation":"Generated docs"}"#);
        let service = local_service(endpoint);

        let records = vec![FileRecord::new("lib.rs", "pub fn a() {}")];
        let document = service.generate(&records).unwrap();

        assert_eq!(document, "Generated docs");

        let sent: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(sent["codeFiles"][0]["path"], "lib.rs");
        assert_eq!(sent["codeFiles"][0]["content"], "pub fn a() {}");
    }

    #[test]
    fn test_http_service_reports_api_error() {
        let (endpoint, server) = serve_once("503 Service Unavailable", r#"{"detail":"backend down"}"#);
        let service = local_service(endpoint);

        let err = service
            .generate(&[FileRecord::new("a.rs", "a")])
            .unwrap_err();
        server.join().unwrap();

        match err {
            ServiceError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "backend down");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_http_service_rejects_malformed_document() {
        let (endpoint, server) = serve_once("200 OK", r#"{"unexpected":true}"#);
        let service = local_service(endpoint);

        let err = service.generate(&[]).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, ServiceError::Decode(_)));
    }
}
