use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::controller::{until_cancelled, FlinkController, Readiness};
use crate::errors::Result;
use crate::models::FlinkApplication;
use crate::naming::version_labels;

impl FlinkController {
    /// Create the job manager, then the task managers, for the current image.
    ///
    /// Task managers locate the job manager through its service, so they are
    /// only created once the job manager resources exist. A task-manager
    /// failure leaves the job manager in place for the next pass to build on.
    pub async fn create_cluster(&self, cancel: &CancellationToken, app: &FlinkApplication) -> Result<()> {
        let provisioner = self.provisioner()?;
        let name = app.app_name();

        if let Err(e) =
            until_cancelled(cancel, || provisioner.create_job_manager_if_absent(app)).await
        {
            error!("[Flink Controller] Failed to create job manager for {}: {}", name, e);
            return Err(e);
        }

        if let Err(e) =
            until_cancelled(cancel, || provisioner.create_task_manager_if_absent(app)).await
        {
            error!("[Flink Controller] Failed to create task managers for {}: {}", name, e);
            return Err(e);
        }

        info!("[Flink Controller] Cluster for {} is created", name);
        Ok(())
    }

    /// Whether every pod of the current version is running.
    pub async fn is_cluster_ready(&self, cancel: &CancellationToken, app: &FlinkApplication) -> Result<Readiness> {
        let namespace = app.namespace_or_default();
        let labels = version_labels(app);
        let running = until_cancelled(cancel, || {
            self.k8s_cluster.are_all_pods_running(&namespace, &labels)
        })
        .await?;

        debug!("[Flink Controller] Pods for {} running: {}", app.app_name(), running);
        Ok(Readiness::from(running))
    }

    /// Whether the job manager answers on its REST endpoint.
    ///
    /// This is independent of pod status. An unreachable job manager is
    /// returned as an error, not as `NotReady`.
    pub async fn is_service_ready(&self, cancel: &CancellationToken, app: &FlinkApplication) -> Result<Readiness> {
        let url = self.job_manager_url(app);
        let overview = until_cancelled(cancel, || self.flink_client.get_cluster_overview(&url)).await?;

        debug!(
            "[Flink Controller] Job manager at {} reports {} task manager(s)",
            url, overview.task_manager_count
        );
        Ok(Readiness::from(overview.task_manager_count >= 0))
    }
}
