use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::{until_cancelled, ApplicationChange, FlinkController};
use crate::errors::{Error, Result};
use crate::models::FlinkApplication;
use crate::naming::{task_manager_name, version_labels};

impl FlinkController {
    /// True when no task-manager deployment exists for the current image, or
    /// when its replica count differs from what the desired parallelism needs.
    ///
    /// The replica count is read from the deployment spec rather than its
    /// status, so a scale-up that is still converging is not reported as a change.
    pub async fn is_cluster_change_needed(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<bool> {
        let namespace = app.namespace_or_default();
        let labels = version_labels(app);
        let deployments = until_cancelled(cancel, || {
            self.k8s_cluster.list_deployments(&namespace, &labels)
        })
        .await?;

        let tm_name = task_manager_name(app);
        let task_managers: Vec<_> = deployments
            .iter()
            .filter(|deployment| deployment.metadata.name.as_deref() == Some(tm_name.as_str()))
            .collect();

        if task_managers.is_empty() {
            info!(
                "[Flink Controller] No task manager deployment {} in {}; cluster change needed",
                tm_name, namespace
            );
            return Ok(true);
        }

        // Kubernetes defaults an unset replica count to 1.
        let observed: i32 = task_managers
            .iter()
            .map(|deployment| {
                deployment
                    .spec
                    .as_ref()
                    .and_then(|spec| spec.replicas)
                    .unwrap_or(1)
            })
            .sum();
        let desired = app.desired_task_managers();

        debug!(
            "[Flink Controller] {} task managers: observed {}, desired {}",
            tm_name, observed, desired
        );
        Ok(observed != desired)
    }

    /// True when the running job's parallelism differs from the desired one.
    ///
    /// The desired value is the job parallelism from the spec, the same value
    /// [`FlinkController::start_flink_job`] submits. It is not rounded up to
    /// the slots of the task managers, so a job submitted with a parallelism
    /// that does not fill every slot still compares as unchanged.
    ///
    /// A failed query is returned as an error and never read as "unchanged".
    pub async fn has_application_job_changed(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<bool> {
        let job_id = app
            .job_id()
            .ok_or_else(|| Error::MissingJobId(app.app_name()))?;

        let url = self.job_manager_url(app);
        let config = until_cancelled(cancel, || self.flink_client.get_job_config(&url, job_id)).await?;

        let observed = config.execution_config.parallelism;
        let desired = app.spec.flink_job.parallelism;
        if observed != desired {
            info!(
                "[Flink Controller] Job {} parallelism changed: {} -> {}",
                job_id, observed, desired
            );
        }
        Ok(observed != desired)
    }

    /// Cluster-level check first, then the job-level one.
    ///
    /// The job-level check needs a recorded job id. On a new cluster that is
    /// correctly sized but has no job yet this returns `Error::MissingJobId`,
    /// so before the first job is started call
    /// [`FlinkController::is_cluster_change_needed`] alone.
    pub async fn has_application_changed(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<ApplicationChange> {
        if self.is_cluster_change_needed(cancel, app).await? {
            return Ok(ApplicationChange::Cluster);
        }
        if self.has_application_job_changed(cancel, app).await? {
            return Ok(ApplicationChange::Job);
        }
        Ok(ApplicationChange::Unchanged)
    }
}
