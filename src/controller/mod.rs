//! Reconciliation core for Flink applications.
//!
//! `FlinkController` holds no state of its own between calls. Every operation
//! reads the orchestration API or the job manager, answers one question or
//! performs one idempotent action, and returns the result for the caller to
//! persist. Ordering the operations into a migration
//! (see [`migration::MigrationPhase`]) and retrying them is the caller's job.

pub mod cleanup;
pub mod comparator;
pub mod jobs;
pub mod lifecycle;
pub mod migration;

#[cfg(test)]
mod test_support;

use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::errors::{Error, Result};
use crate::flink::JobManagerClient;
use crate::k8s::{ClusterProvisioner, K8sCluster};
use crate::models::FlinkApplication;
use crate::naming::{self, DEFAULT_JOB_MANAGER_PORT};

pub use self::jobs::get_active_flink_job;
pub use self::migration::MigrationPhase;

/// Outcome of a readiness probe that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

impl From<bool> for Readiness {
    fn from(ready: bool) -> Self {
        if ready {
            Readiness::Ready
        } else {
            Readiness::NotReady
        }
    }
}

/// What differs between the desired application and what is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationChange {
    Unchanged,
    /// The cluster for the current image is missing or sized differently.
    Cluster,
    /// The cluster matches but the running job's parallelism does not.
    Job,
}

impl ApplicationChange {
    pub fn is_changed(&self) -> bool {
        !matches!(self, ApplicationChange::Unchanged)
    }
}

/// Result of retiring stale clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Only the current version is deployed.
    NothingStale,
    /// Names of the deployments that were deleted.
    Deleted(Vec<String>),
}

impl CleanupOutcome {
    /// Always true: both outcomes leave only the current cluster behind. For
    /// callers that want the plain "deleted" boolean instead of the variant.
    pub fn deleted(&self) -> bool {
        true
    }
}

pub struct FlinkController {
    k8s_cluster: Arc<dyn K8sCluster>,
    flink_client: Arc<dyn JobManagerClient>,
    provisioner: Option<Arc<dyn ClusterProvisioner>>,
    job_manager_port: u16,
}

impl FlinkController {
    pub fn new(k8s_cluster: Arc<dyn K8sCluster>, flink_client: Arc<dyn JobManagerClient>) -> Self {
        Self {
            k8s_cluster,
            flink_client,
            provisioner: None,
            job_manager_port: DEFAULT_JOB_MANAGER_PORT,
        }
    }

    /// Attach the collaborator used by [`FlinkController::create_cluster`].
    pub fn with_provisioner(mut self, provisioner: Arc<dyn ClusterProvisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    pub fn with_job_manager_port(mut self, port: u16) -> Self {
        self.job_manager_port = port;
        self
    }

    pub fn job_manager_url(&self, app: &FlinkApplication) -> String {
        naming::job_manager_url(app, self.job_manager_port)
    }

    fn provisioner(&self) -> Result<&Arc<dyn ClusterProvisioner>> {
        self.provisioner.as_ref().ok_or(Error::ProvisionerUnavailable)
    }
}

/// Run the call built by `call` unless `cancel` fires first. An already
/// cancelled token never issues the call.
pub(crate) async fn until_cancelled<T, F, Fut>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = call() => result,
    }
}
