use std::fmt;

use crate::models::FlinkApplicationStatus;

/// Where an application sits in the savepoint-and-restore migration, as far
/// as its persisted status can tell.
///
/// ```text
/// Running --cancel_with_savepoint--> SavepointPending
/// SavepointPending --get_savepoint_status (completed)--> SavepointComplete
/// SavepointComplete --create_cluster, start_flink_job--> Running
/// ```
///
/// A restarted caller derives the phase again and resumes from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationPhase {
    /// No job, savepoint or trigger recorded yet.
    NotStarted,
    Running { job_id: String },
    SavepointPending { job_id: String, trigger_id: String },
    /// The old job is gone; the next job restores from `path`.
    SavepointComplete { path: String },
}

impl MigrationPhase {
    pub fn from_status(status: &FlinkApplicationStatus) -> Self {
        let present = |field: &Option<String>| field.clone().filter(|value| !value.is_empty());

        match (
            present(&status.job_id),
            present(&status.savepoint_trigger_id),
            present(&status.savepoint_path),
        ) {
            (Some(job_id), Some(trigger_id), _) => MigrationPhase::SavepointPending { job_id, trigger_id },
            (Some(job_id), None, _) => MigrationPhase::Running { job_id },
            (None, _, Some(path)) => MigrationPhase::SavepointComplete { path },
            (None, _, None) => MigrationPhase::NotStarted,
        }
    }

    pub fn from_optional_status(status: Option<&FlinkApplicationStatus>) -> Self {
        status.map(Self::from_status).unwrap_or(MigrationPhase::NotStarted)
    }

    pub fn is_savepoint_pending(&self) -> bool {
        matches!(self, MigrationPhase::SavepointPending { .. })
    }
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationPhase::NotStarted => write!(f, "NotStarted"),
            MigrationPhase::Running { job_id } => write!(f, "Running({})", job_id),
            MigrationPhase::SavepointPending { job_id, trigger_id } => {
                write!(f, "SavepointPending({}, {})", job_id, trigger_id)
            }
            MigrationPhase::SavepointComplete { path } => write!(f, "SavepointComplete({})", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_follows_status_transitions() {
        let status = FlinkApplicationStatus::default();
        assert_eq!(MigrationPhase::from_status(&status), MigrationPhase::NotStarted);

        let status = status.with_job("j1");
        assert_eq!(
            MigrationPhase::from_status(&status),
            MigrationPhase::Running {
                job_id: "j1".to_string()
            }
        );

        let status = status.with_trigger("t1");
        let phase = MigrationPhase::from_status(&status);
        assert!(phase.is_savepoint_pending());
        assert_eq!(phase.to_string(), "SavepointPending(j1, t1)");

        let status = status.with_savepoint("s3://savepoints/sp-1");
        assert_eq!(
            MigrationPhase::from_status(&status),
            MigrationPhase::SavepointComplete {
                path: "s3://savepoints/sp-1".to_string()
            }
        );

        let status = status.with_job("j2");
        assert_eq!(
            MigrationPhase::from_status(&status),
            MigrationPhase::Running {
                job_id: "j2".to_string()
            }
        );
    }

    #[test]
    fn test_empty_fields_are_ignored() {
        let status = FlinkApplicationStatus {
            job_id: Some(String::new()),
            savepoint_trigger_id: Some("t1".to_string()),
            savepoint_path: Some(String::new()),
        };
        assert_eq!(MigrationPhase::from_status(&status), MigrationPhase::NotStarted);
        assert_eq!(MigrationPhase::from_optional_status(None), MigrationPhase::NotStarted);
    }
}
