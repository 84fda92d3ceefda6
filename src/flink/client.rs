use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::flink::models::{
    ClusterOverview, FlinkJob, GetJobsResponse, JobConfig, SavepointResponse,
    SavepointTriggerRequest, SavepointTriggerResponse, SubmitJobRequest, SubmitJobResponse,
};
use crate::flink::JobManagerClient;

/// `JobManagerClient` speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct FlinkJobManagerClient {
    pub http_client: HttpClient,
}

impl FlinkJobManagerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    /// Convenience constructor if you already have a configured client on hand.
    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

/// Decode a successful response body, or turn a non-success status into `Error::Http`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::Http { status, body });
    }
    serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
}

#[async_trait]
impl JobManagerClient for FlinkJobManagerClient {
    async fn get_cluster_overview(&self, url: &str) -> Result<ClusterOverview> {
        let endpoint = format!("{}/overview", url);
        debug!("[JobManager Client] GET {}", endpoint);

        let response = self.http_client.get(&endpoint).send().await?;
        decode(response).await
    }

    async fn get_job_config(&self, url: &str, job_id: &str) -> Result<JobConfig> {
        let endpoint = format!("{}/jobs/{}/config", url, job_id);
        debug!("[JobManager Client] GET {}", endpoint);

        let response = self.http_client.get(&endpoint).send().await?;
        decode(response).await
    }

    async fn get_jobs(&self, url: &str) -> Result<Vec<FlinkJob>> {
        let endpoint = format!("{}/jobs", url);
        debug!("[JobManager Client] GET {}", endpoint);

        let response = self.http_client.get(&endpoint).send().await?;
        let jobs: GetJobsResponse = decode(response).await?;
        Ok(jobs.jobs)
    }

    async fn submit_job(
        &self,
        url: &str,
        jar_id: &str,
        request: &SubmitJobRequest,
    ) -> Result<SubmitJobResponse> {
        let endpoint = format!("{}/jars/{}/run", url, jar_id);
        debug!("[JobManager Client] POST {}", endpoint);

        let response = self.http_client.post(&endpoint).json(request).send().await?;
        decode(response).await
    }

    async fn cancel_job_with_savepoint(&self, url: &str, job_id: &str) -> Result<String> {
        let endpoint = format!("{}/jobs/{}/savepoints", url, job_id);
        debug!("[JobManager Client] POST {}", endpoint);

        let request = SavepointTriggerRequest {
            target_directory: None,
            cancel_job: true,
        };
        let response = self.http_client.post(&endpoint).json(&request).send().await?;
        let trigger: SavepointTriggerResponse = decode(response).await?;
        Ok(trigger.trigger_id)
    }

    async fn check_savepoint_status(
        &self,
        url: &str,
        job_id: &str,
        trigger_id: &str,
    ) -> Result<SavepointResponse> {
        let endpoint = format!("{}/jobs/{}/savepoints/{}", url, job_id, trigger_id);
        debug!("[JobManager Client] GET {}", endpoint);

        let response = self.http_client.get(&endpoint).send().await?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flink::models::FlinkJobStatus;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and hand back the raw request line.
    async fn serve_once(status_line: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (url, handle)
    }

    fn client() -> FlinkJobManagerClient {
        let http_client = HttpClient::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        FlinkJobManagerClient::with_client(http_client)
    }

    #[tokio::test]
    async fn test_get_jobs() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"jobs":[{"id":"j1","status":"RUNNING"},{"id":"j0","status":"CANCELED"}]}"#,
        )
        .await;

        let jobs = client().get_jobs(&url).await.unwrap();

        assert_eq!(server.await.unwrap(), "GET /jobs HTTP/1.1");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_id, "j1");
        assert_eq!(jobs[0].status, FlinkJobStatus::Running);
        assert_eq!(jobs[1].status, FlinkJobStatus::Canceled);
    }

    #[tokio::test]
    async fn test_cancel_job_with_savepoint() {
        let (url, server) = serve_once("202 Accepted", r#"{"request-id":"t1"}"#).await;

        let trigger_id = client().cancel_job_with_savepoint(&url, "j1").await.unwrap();

        assert_eq!(server.await.unwrap(), "POST /jobs/j1/savepoints HTTP/1.1");
        assert_eq!(trigger_id, "t1");
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced() {
        let (url, _server) = serve_once("404 Not Found", r#"{"errors":["Job not found."]}"#).await;

        let err = client().get_job_config(&url, "missing").await.unwrap_err();

        match err {
            Error::Http { status, body } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("Job not found."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (url, _server) = serve_once("200 OK", "not json").await;

        let err = client().get_cluster_overview(&url).await.unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
        assert!(err.is_remote());
    }
}
