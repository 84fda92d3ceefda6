//! Client side of the Flink job manager REST API.

pub mod client;
pub mod models;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::errors::Result;
use crate::flink::models::{
    ClusterOverview, FlinkJob, JobConfig, SavepointResponse, SubmitJobRequest, SubmitJobResponse,
};

pub use self::client::FlinkJobManagerClient;

/// Calls against a job manager reachable at `url`.
///
/// Every method performs exactly one request; retrying is left to the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobManagerClient: Send + Sync {
    async fn get_cluster_overview(&self, url: &str) -> Result<ClusterOverview>;

    async fn get_job_config(&self, url: &str, job_id: &str) -> Result<JobConfig>;

    async fn get_jobs(&self, url: &str) -> Result<Vec<FlinkJob>>;

    async fn submit_job(
        &self,
        url: &str,
        jar_id: &str,
        request: &SubmitJobRequest,
    ) -> Result<SubmitJobResponse>;

    /// Trigger a savepoint that cancels the job once taken. Returns the trigger id.
    async fn cancel_job_with_savepoint(&self, url: &str, job_id: &str) -> Result<String>;

    async fn check_savepoint_status(
        &self,
        url: &str,
        job_id: &str,
        trigger_id: &str,
    ) -> Result<SavepointResponse>;
}
