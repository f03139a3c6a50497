//! Submit/poll/unpack round-trip against an [`OcrService`].

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tracing::{debug, info};
use zip::ZipArchive;

use super::client::{OcrService, PollStatus};
use crate::error::OcrError;

/// How long to wait for a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Polls before giving up
    pub max_attempts: u32,
    /// Sleep after each poll that is not ready
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            interval: Duration::from_secs(2),
        }
    }
}

/// Turns a PDF into recovered text through a remote OCR service.
pub struct OcrBridge {
    service: Arc<dyn OcrService>,
    policy: PollPolicy,
}

impl OcrBridge {
    pub fn new(service: Arc<dyn OcrService>, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Read a local PDF and run it through [`OcrBridge::recognize`].
    pub async fn recognize_file(&self, path: &Path) -> Result<String, OcrError> {
        let pdf = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        self.recognize(&file_name, &pdf).await
    }

    /// Submit `pdf`, wait for the result archive and return the recovered text.
    pub async fn recognize(&self, file_name: &str, pdf: &[u8]) -> Result<String, OcrError> {
        let job_id = self.service.submit(file_name, pdf).await?;
        let archive = self.wait_for(&job_id).await?;
        let text = {
            let job_id = job_id.clone();
            tokio::task::spawn_blocking(move || unpack_text(&job_id, archive))
                .await
                .map_err(std::io::Error::from)??
        };

        if text.trim().is_empty() {
            return Err(OcrError::EmptyResult);
        }

        info!(file = %file_name, job_id = %job_id, chars = text.chars().count(), "OCR completed");
        Ok(text)
    }

    async fn wait_for(&self, job_id: &str) -> Result<Vec<u8>, OcrError> {
        for attempt in 1..=self.policy.max_attempts {
            match self.service.poll(job_id).await? {
                PollStatus::Ready(bytes) => {
                    debug!(job_id, attempt, bytes = bytes.len(), "OCR result ready");
                    return Ok(bytes);
                }
                PollStatus::Pending => {
                    debug!(job_id, attempt, "OCR result pending");
                    tokio::time::sleep(self.policy.interval).await;
                }
            }
        }

        Err(OcrError::PollingExhausted {
            attempts: self.policy.max_attempts,
        })
    }
}

/// Expand the result archive into a scratch directory and read
/// `{job_id}/{job_id}.tex` from it. The directory is removed on return.
fn unpack_text(job_id: &str, archive: Vec<u8>) -> Result<String, OcrError> {
    let scratch = TempDir::new()?;
    ZipArchive::new(Cursor::new(archive))?.extract(scratch.path())?;

    let tex_path = scratch.path().join(job_id).join(format!("{job_id}.tex"));
    if !tex_path.is_file() {
        return Err(OcrError::MissingResult(
            Path::new(job_id).join(format!("{job_id}.tex")),
        ));
    }

    let bytes = std::fs::read(&tex_path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
