//! Orchestration-side collaborators of the controller.

pub mod kube;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use std::collections::BTreeMap;

#[cfg(test)]
use mockall::automock;

use crate::errors::Result;
use crate::models::FlinkApplication;

pub use self::kube::KubeCluster;

/// Deployment and pod queries against the orchestration API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait K8sCluster: Send + Sync {
    /// List deployments in `namespace` carrying all of the given labels.
    async fn list_deployments(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Vec<Deployment>>;

    /// Delete the given deployments. An already deleted deployment is not an error.
    async fn delete_deployments(&self, namespace: &str, deployments: &[Deployment]) -> Result<()>;

    /// True when every pod carrying the given labels is in the `Running` phase.
    async fn are_all_pods_running(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<bool>;
}

/// Creates the job-manager and task-manager resources of an application version.
///
/// Both calls must be idempotent: they create whatever is missing and leave
/// existing objects alone.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterProvisioner: Send + Sync {
    async fn create_job_manager_if_absent(&self, app: &FlinkApplication) -> Result<()>;

    async fn create_task_manager_if_absent(&self, app: &FlinkApplication) -> Result<()>;
}
