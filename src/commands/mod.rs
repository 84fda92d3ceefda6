pub mod check_cmd;
pub mod cleanup_cmd;
pub mod jobs_cmd;
pub mod savepoint_cmd;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use flink_reconciler::config::CONFIG;
use flink_reconciler::{FlinkApplication, FlinkController, FlinkJobManagerClient, KubeCluster};

/// Read a FlinkApplication manifest, applying the namespace from the command
/// line or the environment when the manifest leaves it out.
pub fn load_application(file: &str, namespace: Option<String>) -> Result<FlinkApplication> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read manifest {}", file))?;
    let mut app: FlinkApplication = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse FlinkApplication from {}", file))?;

    if namespace.is_some() {
        app.metadata.namespace = namespace;
    } else if app.metadata.namespace.is_none() {
        app.metadata.namespace = Some(CONFIG.namespace.clone());
    }
    Ok(app)
}

pub async fn build_controller() -> Result<FlinkController> {
    let cluster = KubeCluster::connect(&CONFIG).await?;
    let flink_client = FlinkJobManagerClient::new(CONFIG.http_timeout())?;

    Ok(FlinkController::new(Arc::new(cluster), Arc::new(flink_client))
        .with_job_manager_port(CONFIG.job_manager_port))
}

/// A token cancelled on Ctrl-C, so an interrupted command stops waiting on
/// remote calls.
pub fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}
