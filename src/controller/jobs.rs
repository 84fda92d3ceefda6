use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::controller::{until_cancelled, FlinkController};
use crate::errors::{Error, Result};
use crate::flink::models::{FlinkJob, SavepointState, SubmitJobRequest};
use crate::models::FlinkApplication;

/// First job that is still active, in the order the job manager listed them.
pub fn get_active_flink_job(jobs: &[FlinkJob]) -> Option<&FlinkJob> {
    jobs.iter().find(|job| job.status.is_active())
}

impl FlinkController {
    pub async fn get_jobs_for_application(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<Vec<FlinkJob>> {
        let url = self.job_manager_url(app);
        let jobs = until_cancelled(cancel, || self.flink_client.get_jobs(&url)).await?;

        debug!("[Flink Controller] {} job(s) listed at {}", jobs.len(), url);
        Ok(jobs)
    }

    /// Submit the application's jar and return the id of the new job.
    ///
    /// The job restores from the savepoint recorded in status, or the one
    /// named on the spec when status has none.
    pub async fn start_flink_job(&self, cancel: &CancellationToken, app: &FlinkApplication) -> Result<String> {
        let job = &app.spec.flink_job;
        let request = SubmitJobRequest {
            entry_class: job.entry_class.clone(),
            program_args: job.program_args.clone(),
            parallelism: job.parallelism,
            savepoint_path: app.restore_savepoint_path().map(str::to_string),
            allow_non_restored_state: false,
        };

        let url = self.job_manager_url(app);
        let response = until_cancelled(cancel, || {
            self.flink_client.submit_job(&url, &job.jar_name, &request)
        })
        .await?;

        if response.job_id.is_empty() {
            error!("[Flink Controller] Job manager at {} accepted {} without a job id", url, job.jar_name);
            return Err(Error::InvalidJobId);
        }

        info!(
            "[Flink Controller] Started job {} for {} (savepoint: {})",
            response.job_id,
            app.app_name(),
            request.savepoint_path.as_deref().unwrap_or("none")
        );
        Ok(response.job_id)
    }

    /// Stop the recorded job behind a savepoint and return the trigger id to poll.
    pub async fn cancel_with_savepoint(&self, cancel: &CancellationToken, app: &FlinkApplication) -> Result<String> {
        let job_id = app
            .job_id()
            .ok_or_else(|| Error::MissingJobId(app.app_name()))?;

        let url = self.job_manager_url(app);
        let trigger_id = until_cancelled(cancel, || {
            self.flink_client.cancel_job_with_savepoint(&url, job_id)
        })
        .await?;

        info!("[Flink Controller] Savepoint {} triggered for job {}", trigger_id, job_id);
        Ok(trigger_id)
    }

    /// Poll the pending savepoint once.
    pub async fn get_savepoint_status(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<SavepointState> {
        let trigger_id = app
            .savepoint_trigger_id()
            .ok_or_else(|| Error::MissingTriggerId(app.app_name()))?;
        let job_id = app
            .job_id()
            .ok_or_else(|| Error::MissingJobId(app.app_name()))?;

        let url = self.job_manager_url(app);
        let response = until_cancelled(cancel, || {
            self.flink_client.check_savepoint_status(&url, job_id, trigger_id)
        })
        .await?;

        let state = SavepointState::from(response);
        debug!("[Flink Controller] Savepoint {} for job {}: {:?}", trigger_id, job_id, state);
        Ok(state)
    }
}
