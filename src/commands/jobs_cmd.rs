use anyhow::Result;
use prettytable::{format, Cell, Row, Table};

use flink_reconciler::get_active_flink_job;

use crate::commands::{build_controller, interrupt_token, load_application};

pub async fn list_jobs(file: String, namespace: Option<String>) -> Result<()> {
    let app = load_application(&file, namespace)?;
    let controller = build_controller().await?;
    let cancel = interrupt_token();

    let jobs = controller.get_jobs_for_application(&cancel, &app).await?;
    let active_id = get_active_flink_job(&jobs).map(|job| job.job_id.clone());

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("STATUS"),
        Cell::new("ACTIVE"),
    ]));

    for job in &jobs {
        let active = if Some(&job.job_id) == active_id.as_ref() { "*" } else { "" };
        table.add_row(Row::new(vec![
            Cell::new(&job.job_id),
            Cell::new(&job.status.to_string()),
            Cell::new(active),
        ]));
    }

    table.set_format(*format::consts::FORMAT_CLEAN);
    table.printstd();

    if jobs.is_empty() {
        println!("No jobs found for {}", app.app_name());
    }
    Ok(())
}
