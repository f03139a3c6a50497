//! HTTP client for the Mathpix PDF OCR service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::OcrError;

/// Result of one poll for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Not finished yet (or the poll itself timed out)
    Pending,
    /// Finished; carries the zipped result
    Ready(Vec<u8>),
}

/// A remote OCR service that accepts a PDF and later serves a zipped result.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Submit a PDF and return the service's job identifier.
    async fn submit(&self, file_name: &str, pdf: &[u8]) -> Result<String, OcrError>;

    /// Check once whether the job's result archive is available.
    async fn poll(&self, job_id: &str) -> Result<PollStatus, OcrError>;
}

/// Service credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrCredentials {
    pub app_id: String,
    pub app_key: String,
}

#[derive(Deserialize)]
struct EnvFile {
    #[serde(default)]
    env_variables: EnvVariables,
}

#[derive(Deserialize, Default)]
struct EnvVariables {
    #[serde(rename = "MATHPIX_API_ID")]
    app_id: Option<String>,
    #[serde(rename = "MATHPIX_API_KEY")]
    app_key: Option<String>,
}

impl OcrCredentials {
    /// Read credentials from an app-engine style `.env.yaml`:
    ///
    /// ```yaml
    /// env_variables:
    ///   MATHPIX_API_ID: my-app
    ///   MATHPIX_API_KEY: secret
    /// ```
    pub fn from_yaml_file(path: &Path) -> Result<Self, OcrError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            OcrError::MissingCredentials(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse credentials from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, OcrError> {
        let env: EnvFile = serde_yaml::from_str(contents)?;
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let app_id = non_empty(env.env_variables.app_id)
            .ok_or_else(|| OcrError::MissingCredentials("MATHPIX_API_ID not set".to_string()))?;
        let app_key = non_empty(env.env_variables.app_key)
            .ok_or_else(|| OcrError::MissingCredentials("MATHPIX_API_KEY not set".to_string()))?;

        Ok(Self { app_id, app_key })
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    pdf_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the Mathpix `v3/pdf` endpoints.
pub struct MathpixClient {
    client: Client,
    api_url: String,
    credentials: OcrCredentials,
    request_timeout: Duration,
}

impl MathpixClient {
    /// Create a client for `api_url` (e.g. `https://api.mathpix.com/v3/pdf`).
    ///
    /// `request_timeout` bounds every individual request, submission included.
    pub fn new(
        api_url: &str,
        credentials: OcrCredentials,
        request_timeout: Duration,
    ) -> Result<Self, OcrError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            request_timeout,
        })
    }

    /// Conversion options sent with every submission.
    fn options() -> serde_json::Value {
        json!({
            "conversion_formats": {"docx": false, "tex.zip": true},
            "math_inline_delimiters": ["$", "$"],
            "rm_spaces": true
        })
    }

    fn result_url(&self, job_id: &str) -> String {
        format!("{}/{}.tex", self.api_url, job_id)
    }
}

#[async_trait]
impl OcrService for MathpixClient {
    async fn submit(&self, file_name: &str, pdf: &[u8]) -> Result<String, OcrError> {
        let form = Form::new()
            .text("options_json", Self::options().to_string())
            .part(
                "file",
                Part::bytes(pdf.to_vec())
                    .file_name(file_name.to_string())
                    .mime_str("application/pdf")?,
            );

        let response = self
            .client
            .post(&self.api_url)
            .header("app_id", &self.credentials.app_id)
            .header("app_key", &self.credentials.app_key)
            .multipart(form)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(OcrError::Submission(format!(
                "service returned {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        let parsed: SubmitResponse = serde_json::from_slice(&body)?;
        match parsed.pdf_id {
            Some(pdf_id) => {
                info!(file = %file_name, job_id = %pdf_id, "OCR submission accepted");
                Ok(pdf_id)
            }
            None => Err(OcrError::Submission(
                parsed.error.unwrap_or_else(|| "response has no pdf_id".to_string()),
            )),
        }
    }

    async fn poll(&self, job_id: &str) -> Result<PollStatus, OcrError> {
        let result = self
            .client
            .get(self.result_url(job_id))
            .header("app_id", &self.credentials.app_id)
            .header("app_key", &self.credentials.app_key)
            .timeout(self.request_timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                debug!(job_id, "OCR poll timed out");
                return Ok(PollStatus::Pending);
            }
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            debug!(job_id, status = %response.status(), "OCR result not ready");
            return Ok(PollStatus::Pending);
        }

        match response.bytes().await {
            Ok(bytes) => Ok(PollStatus::Ready(bytes.to_vec())),
            Err(e) if e.is_timeout() => Ok(PollStatus::Pending),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> OcrCredentials {
        OcrCredentials {
            app_id: "test-app".to_string(),
            app_key: "test-key".to_string(),
        }
    }

    fn client(server: &MockServer, timeout: Duration) -> MathpixClient {
        MathpixClient::new(&format!("{}/v3/pdf", server.uri()), credentials(), timeout).unwrap()
    }

    #[test]
    fn test_credentials_from_yaml() {
        let creds = OcrCredentials::from_yaml_str(
            "env_variables:\n  MATHPIX_API_ID: my-app\n  MATHPIX_API_KEY: secret\n",
        )
        .unwrap();
        assert_eq!(creds.app_id, "my-app");
        assert_eq!(creds.app_key, "secret");
    }

    #[test]
    fn test_missing_key_is_missing_credentials() {
        let err = OcrCredentials::from_yaml_str("env_variables:\n  MATHPIX_API_ID: my-app\n")
            .unwrap_err();
        assert!(matches!(err, OcrError::MissingCredentials(_)));

        let err = OcrCredentials::from_yaml_str("other: 1\n").unwrap_err();
        assert!(matches!(err, OcrError::MissingCredentials(_)));
    }

    #[test]
    fn test_credentials_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "env_variables:\n  MATHPIX_API_ID: a\n  MATHPIX_API_KEY: b").unwrap();
        let creds = OcrCredentials::from_yaml_file(file.path()).unwrap();
        assert_eq!(creds, OcrCredentials { app_id: "a".to_string(), app_key: "b".to_string() });

        let err = OcrCredentials::from_yaml_file(Path::new("/nonexistent/.env.yaml")).unwrap_err();
        assert!(matches!(err, OcrError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn test_submit_returns_job_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/pdf"))
            .and(header("app_id", "test-app"))
            .and(header("app_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pdf_id": "job-42"})))
            .mount(&server)
            .await;

        let job_id = client(&server, Duration::from_secs(5))
            .submit("paper.pdf", b"%PDF-1.4")
            .await
            .unwrap();
        assert_eq!(job_id, "job-42");
    }

    #[tokio::test]
    async fn test_submit_without_pdf_id_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "bad key"})))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .submit("paper.pdf", b"%PDF-1.4")
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Submission(ref msg) if msg == "bad key"));
    }

    #[tokio::test]
    async fn test_stalled_submission_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"pdf_id": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let err = client(&server, Duration::from_millis(100))
            .submit("paper.pdf", b"%PDF-1.4")
            .await
            .unwrap_err();

        assert!(matches!(err, OcrError::Http(ref e) if e.is_timeout()));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_poll_not_found_is_pending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/pdf/job-1.tex"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let status = client(&server, Duration::from_secs(5)).poll("job-1").await.unwrap();
        assert_eq!(status, PollStatus::Pending);
    }

    #[tokio::test]
    async fn test_poll_ready_returns_archive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/pdf/job-1.tex"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK-archive".to_vec()))
            .mount(&server)
            .await;

        let status = client(&server, Duration::from_secs(5)).poll("job-1").await.unwrap();
        assert_eq!(status, PollStatus::Ready(b"PK-archive".to_vec()));
    }

    #[tokio::test]
    async fn test_poll_timeout_is_pending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let status = client(&server, Duration::from_millis(50)).poll("slow").await.unwrap();
        assert_eq!(status, PollStatus::Pending);
    }
}
