use anyhow::Result;
use prettytable::{format, Cell, Row, Table};

use flink_reconciler::{ApplicationChange, MigrationPhase};

use crate::commands::{build_controller, interrupt_token, load_application};

pub async fn check_application(file: String, namespace: Option<String>) -> Result<()> {
    let app = load_application(&file, namespace)?;
    let controller = build_controller().await?;
    let cancel = interrupt_token();

    let phase = MigrationPhase::from_optional_status(app.status.as_ref());
    let cluster_ready = controller.is_cluster_ready(&cancel, &app).await?;

    // The job manager is only worth probing once its pods run.
    let service = if cluster_ready.is_ready() {
        match controller.is_service_ready(&cancel, &app).await {
            Ok(readiness) => format!("{:?}", readiness),
            Err(e) => format!("unreachable ({})", e),
        }
    } else {
        "N/A".to_string()
    };

    let change = if app.job_id().is_some() {
        controller.has_application_changed(&cancel, &app).await?
    } else if controller.is_cluster_change_needed(&cancel, &app).await? {
        ApplicationChange::Cluster
    } else {
        ApplicationChange::Unchanged
    };

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("NAME"),
        Cell::new("NAMESPACE"),
        Cell::new("PHASE"),
        Cell::new("CLUSTER"),
        Cell::new("SERVICE"),
        Cell::new("CHANGE"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(&app.app_name()),
        Cell::new(&app.namespace_or_default()),
        Cell::new(&phase.to_string()),
        Cell::new(&format!("{:?}", cluster_ready)),
        Cell::new(&service),
        Cell::new(&format!("{:?}", change)),
    ]));

    table.set_format(*format::consts::FORMAT_CLEAN);
    table.printstd();

    Ok(())
}
