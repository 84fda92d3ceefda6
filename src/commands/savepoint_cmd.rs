use anyhow::Result;

use flink_reconciler::{FlinkApplicationStatus, MigrationPhase, SavepointState};

use crate::commands::{build_controller, interrupt_token, load_application};

/// Trigger a cancel-with-savepoint, or poll the pending one once. Prints the
/// status the caller should persist next as YAML.
pub async fn execute(file: String, namespace: Option<String>, trigger: bool) -> Result<()> {
    let app = load_application(&file, namespace)?;
    let controller = build_controller().await?;
    let cancel = interrupt_token();
    let status = app.status.clone().unwrap_or_default();

    let next_status = if trigger {
        let trigger_id = controller.cancel_with_savepoint(&cancel, &app).await?;
        println!("Savepoint triggered: {}", trigger_id);
        status.with_trigger(trigger_id)
    } else {
        match controller.get_savepoint_status(&cancel, &app).await? {
            SavepointState::InProgress => {
                println!("Savepoint in progress");
                status
            }
            SavepointState::Completed { location } => {
                println!("Savepoint completed: {}", location);
                status.with_savepoint(location)
            }
            SavepointState::Failed { cause } => {
                anyhow::bail!("savepoint failed: {}", cause);
            }
        }
    };

    print_status(&next_status)
}

fn print_status(status: &FlinkApplicationStatus) -> Result<()> {
    println!("Phase: {}", MigrationPhase::from_status(status));
    print!("{}", serde_yaml::to_string(status)?);
    Ok(())
}
