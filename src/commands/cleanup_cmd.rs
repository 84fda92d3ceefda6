use anyhow::Result;

use flink_reconciler::CleanupOutcome;

use crate::commands::{build_controller, interrupt_token, load_application};

pub async fn execute(file: String, namespace: Option<String>, dry_run: bool) -> Result<()> {
    let app = load_application(&file, namespace)?;
    let controller = build_controller().await?;
    let cancel = interrupt_token();

    let multiple = controller.is_multiple_cluster_present(&cancel, &app).await?;
    if dry_run {
        if multiple {
            println!("Stale clusters present for {}", app.app_name());
        } else {
            println!("Only the current cluster is deployed for {}", app.app_name());
        }
        return Ok(());
    }

    match controller.delete_old_cluster(&cancel, &app).await? {
        CleanupOutcome::NothingStale => println!("Nothing to delete for {}", app.app_name()),
        CleanupOutcome::Deleted(names) => {
            for name in names {
                println!("Deleted deployment {}", name);
            }
        }
    }
    Ok(())
}
