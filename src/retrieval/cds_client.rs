//! Thin client for the archive's retrieve/poll/download cycle.

use crate::retrieval::credentials::CdsCredentials;
use crate::retrieval::error::RetrievalError;
use crate::retrieval::request::DataRequest;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const AUTH_HEADER: &str = "PRIVATE-TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaskState {
    Queued,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct TaskError {
    message: Option<String>,
    reason: Option<String>,
}

/// Reply of the submit and poll endpoints.
#[derive(Debug, Deserialize)]
struct TaskReply {
    state: TaskState,
    request_id: Option<String>,
    location: Option<String>,
    error: Option<TaskError>,
}

pub struct CdsClient {
    http: Client,
    credentials: CdsCredentials,
}

impl CdsClient {
    pub fn new(credentials: CdsCredentials) -> CdsClient {
        CdsClient {
            http: Client::new(),
            credentials,
        }
    }

    /// Runs a full retrieve cycle: submit the request, wait for the
    /// archive to finish preparing the result, then download and
    /// decompress it. Returns the raw CSV bytes.
    pub async fn retrieve(&self, request: &DataRequest) -> Result<Vec<u8>, RetrievalError> {
        let mut reply = self.submit(request).await?;
        let request_id = reply.request_id.clone().unwrap_or_default();

        while !matches!(reply.state, TaskState::Completed | TaskState::Failed) {
            tokio::time::sleep(POLL_INTERVAL).await;
            reply = self.poll(&request_id).await?;
        }

        if reply.state == TaskState::Failed {
            let message = reply
                .error
                .and_then(|e| e.message.or(e.reason))
                .unwrap_or_default();
            warn!("Retrieval task {} failed: {}", request_id, message);
            return Err(RetrievalError::TaskFailed {
                request_id,
                message,
            });
        }

        let location = reply
            .location
            .ok_or(RetrievalError::MissingDownloadLocation { request_id })?;
        self.download(&location).await
    }

    async fn submit(&self, request: &DataRequest) -> Result<TaskReply, RetrievalError> {
        let url = format!("{}/resources/{}", self.credentials.url, request.dataset);
        info!("Submitting retrieval '{}' to {}", request.cache_slug(), url);

        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, &self.credentials.key)
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| RetrievalError::NetworkRequest(url.clone(), e))?;
        let response = Self::check_status(response, &url)?;
        response
            .json::<TaskReply>()
            .await
            .map_err(|e| RetrievalError::ReplyDecode(url, e))
    }

    async fn poll(&self, request_id: &str) -> Result<TaskReply, RetrievalError> {
        let url = format!("{}/tasks/{}", self.credentials.url, request_id);

        let response = self
            .http
            .get(&url)
            .header(AUTH_HEADER, &self.credentials.key)
            .send()
            .await
            .map_err(|e| RetrievalError::NetworkRequest(url.clone(), e))?;
        let response = Self::check_status(response, &url)?;
        response
            .json::<TaskReply>()
            .await
            .map_err(|e| RetrievalError::ReplyDecode(url, e))
    }

    fn check_status(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, RetrievalError> {
        match response.error_for_status() {
            Ok(resp) => Ok(resp),
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                Err(if let Some(status) = e.status() {
                    RetrievalError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    RetrievalError::NetworkRequest(url.to_string(), e)
                })
            }
        }
    }

    /// Streams the gzipped result file and decompresses it on the fly.
    async fn download(&self, location: &str) -> Result<Vec<u8>, RetrievalError> {
        info!("Downloading result from {}", location);

        let response = self
            .http
            .get(location)
            .send()
            .await
            .map_err(|e| RetrievalError::NetworkRequest(location.to_string(), e))?;
        let response = Self::check_status(response, location)?;

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let stream_reader = StreamReader::new(stream);
        let mut decoder = GzipDecoder::new(stream_reader);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .await
            .map_err(RetrievalError::DownloadIo)?;
        info!(
            "Downloaded and decompressed {} bytes from {}",
            decompressed.len(),
            location
        );
        Ok(decompressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_reply_decodes_queued_state() {
        let reply: TaskReply =
            serde_json::from_str(r#"{"state": "queued", "request_id": "abc"}"#).unwrap();
        assert_eq!(reply.state, TaskState::Queued);
        assert_eq!(reply.request_id.as_deref(), Some("abc"));
        assert!(reply.location.is_none());
    }

    #[test]
    fn task_reply_decodes_completed_state_with_location() {
        let reply: TaskReply = serde_json::from_str(
            r#"{"state": "completed", "request_id": "abc", "location": "https://download.example/result.csv.gz"}"#,
        )
        .unwrap();
        assert_eq!(reply.state, TaskState::Completed);
        assert_eq!(
            reply.location.as_deref(),
            Some("https://download.example/result.csv.gz")
        );
    }

    #[test]
    fn task_reply_decodes_failure_message() {
        let reply: TaskReply = serde_json::from_str(
            r#"{"state": "failed", "request_id": "abc", "error": {"message": "quota exceeded"}}"#,
        )
        .unwrap();
        assert_eq!(reply.state, TaskState::Failed);
        assert_eq!(
            reply.error.unwrap().message.as_deref(),
            Some("quota exceeded")
        );
    }
}
