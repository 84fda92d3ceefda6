// src/lib.rs

pub mod config;
pub mod controller;
pub mod errors;
pub mod flink;
pub mod k8s;
pub mod models;
pub mod naming;

pub use controller::{
    get_active_flink_job, ApplicationChange, CleanupOutcome, FlinkController, MigrationPhase,
    Readiness,
};
pub use errors::{Error, Result};
pub use flink::models::{FlinkJob, FlinkJobStatus, SavepointState};
pub use flink::{FlinkJobManagerClient, JobManagerClient};
pub use k8s::{ClusterProvisioner, K8sCluster, KubeCluster};
pub use models::{FlinkApplication, FlinkApplicationSpec, FlinkApplicationStatus};
