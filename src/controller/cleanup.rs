use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;
use std::collections::{BTreeMap, BTreeSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::controller::{until_cancelled, CleanupOutcome, FlinkController};
use crate::errors::Result;
use crate::models::FlinkApplication;
use crate::naming::{app_labels, image_key, IMAGE_KEY_LABEL};

impl FlinkController {
    /// True when deployments of more than one version of the application exist.
    pub async fn is_multiple_cluster_present(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<bool> {
        let deployments = self.list_application_deployments(cancel, app).await?;

        let versions: BTreeSet<BTreeMap<String, String>> = deployments
            .iter()
            .map(|deployment| deployment.labels().clone())
            .collect();

        debug!(
            "[Flink Controller] {} distinct label set(s) deployed for {}",
            versions.len(),
            app.app_name()
        );
        Ok(versions.len() > 1)
    }

    /// Delete every deployment of the application that does not belong to the
    /// current image. Deployments without an image key are treated as stale.
    pub async fn delete_old_cluster(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<CleanupOutcome> {
        let deployments = self.list_application_deployments(cancel, app).await?;
        let stale = stale_deployments(deployments, image_key(app).as_str());

        if stale.is_empty() {
            debug!("[Flink Controller] No stale cluster for {}", app.app_name());
            return Ok(CleanupOutcome::NothingStale);
        }

        let namespace = app.namespace_or_default();
        let names: Vec<String> = stale.iter().map(|deployment| deployment.name_any()).collect();
        if let Err(e) =
            until_cancelled(cancel, || self.k8s_cluster.delete_deployments(&namespace, &stale)).await
        {
            error!("[Flink Controller] Failed to delete {:?} in {}: {}", names, namespace, e);
            return Err(e);
        }

        info!("[Flink Controller] Deleted old cluster {:?} in {}", names, namespace);
        Ok(CleanupOutcome::Deleted(names))
    }

    async fn list_application_deployments(
        &self,
        cancel: &CancellationToken,
        app: &FlinkApplication,
    ) -> Result<Vec<Deployment>> {
        let namespace = app.namespace_or_default();
        let labels = app_labels(app);
        until_cancelled(cancel, || self.k8s_cluster.list_deployments(&namespace, &labels)).await
    }
}

fn stale_deployments(deployments: Vec<Deployment>, current_key: &str) -> Vec<Deployment> {
    deployments
        .into_iter()
        .filter(|deployment| {
            deployment.labels().get(IMAGE_KEY_LABEL).map(String::as_str) != Some(current_key)
        })
        .collect()
}
