use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a Flink application: one job-manager/task-manager cluster
/// running a single streaming job.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "flink.k8s.io",
    version = "v1alpha1",
    kind = "FlinkApplication",
    namespaced
)]
#[kube(status = "FlinkApplicationStatus", shortname = "flinkapp")]
#[serde(rename_all = "camelCase")]
pub struct FlinkApplicationSpec {
    /// Container image reference for both the job manager and task managers.
    pub image: String,
    #[serde(default)]
    pub flink_job: FlinkJobSpec,
    #[serde(default)]
    pub task_manager_config: TaskManagerConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlinkJobSpec {
    /// Identifier of the uploaded jar on the job manager.
    pub jar_name: String,
    pub parallelism: i32,
    pub entry_class: Option<String>,
    pub program_args: Option<String>,
    #[serde(default)]
    pub savepoint_info: SavepointInfo,
}

/// Savepoint hand-off recorded on the spec, e.g. when restoring from a
/// savepoint taken outside the operator.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavepointInfo {
    pub savepoint_location: Option<String>,
    pub trigger_id: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskManagerConfig {
    pub task_slots: Option<i32>,
}

/// Observed state persisted by the caller between reconciliation passes.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlinkApplicationStatus {
    pub job_id: Option<String>,
    pub savepoint_trigger_id: Option<String>,
    pub savepoint_path: Option<String>,
}

impl FlinkApplicationStatus {
    /// Status after a cancel-with-savepoint request was accepted.
    pub fn with_trigger(&self, trigger_id: impl Into<String>) -> Self {
        Self {
            savepoint_trigger_id: Some(trigger_id.into()),
            savepoint_path: None,
            ..self.clone()
        }
    }

    /// Status after the savepoint completed. The old job is gone at this point,
    /// so its id is dropped and only the savepoint path carries over.
    pub fn with_savepoint(&self, path: impl Into<String>) -> Self {
        Self {
            job_id: None,
            savepoint_trigger_id: None,
            savepoint_path: Some(path.into()),
        }
    }

    /// Status after a job was submitted on the current cluster.
    pub fn with_job(&self, job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            savepoint_trigger_id: None,
            savepoint_path: None,
        }
    }
}

impl FlinkJobSpec {
    pub fn task_slots(&self, config: &TaskManagerConfig) -> i32 {
        config.task_slots.unwrap_or(1).max(1)
    }
}

impl FlinkApplication {
    pub fn app_name(&self) -> String {
        self.name_any()
    }

    pub fn namespace_or_default(&self) -> String {
        self.namespace().unwrap_or_else(|| "default".to_string())
    }

    pub fn task_slots(&self) -> i32 {
        self.spec.flink_job.task_slots(&self.spec.task_manager_config)
    }

    /// Number of task managers needed to provide `parallelism` slots.
    pub fn desired_task_managers(&self) -> i32 {
        let parallelism = self.spec.flink_job.parallelism.max(1);
        (parallelism - 1) / self.task_slots() + 1
    }

    pub fn job_id(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.job_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Trigger id of the pending savepoint, preferring the one recorded in status.
    pub fn savepoint_trigger_id(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.savepoint_trigger_id.as_deref())
            .or(self.spec.flink_job.savepoint_info.trigger_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Savepoint to restore from when starting a job, preferring the one recorded in status.
    pub fn restore_savepoint_path(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.savepoint_path.as_deref())
            .or(self.spec.flink_job.savepoint_info.savepoint_location.as_deref())
            .filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(parallelism: i32, task_slots: Option<i32>) -> FlinkApplication {
        let mut spec = FlinkApplicationSpec::default();
        spec.flink_job.parallelism = parallelism;
        spec.task_manager_config.task_slots = task_slots;
        FlinkApplication::new("app-name", spec)
    }

    #[test]
    fn test_desired_task_managers_rounds_up() {
        assert_eq!(app_with(4, Some(2)).desired_task_managers(), 2);
        assert_eq!(app_with(5, Some(2)).desired_task_managers(), 3);
        assert_eq!(app_with(3, None).desired_task_managers(), 3);
        assert_eq!(app_with(0, Some(4)).desired_task_managers(), 1);
    }

    #[test]
    fn test_desired_task_managers_with_extreme_values() {
        assert_eq!(app_with(4, Some(i32::MAX)).desired_task_managers(), 1);
        assert_eq!(app_with(i32::MAX, Some(2)).desired_task_managers(), 1 << 30);
        assert_eq!(app_with(i32::MAX, None).desired_task_managers(), i32::MAX);
        assert_eq!(app_with(i32::MIN, Some(-3)).desired_task_managers(), 1);
    }

    #[test]
    fn test_status_prefers_recorded_savepoint() {
        let mut app = app_with(1, None);
        app.spec.flink_job.savepoint_info.savepoint_location = Some("s3://spec".to_string());
        assert_eq!(app.restore_savepoint_path(), Some("s3://spec"));

        app.status = Some(FlinkApplicationStatus::default().with_savepoint("s3://status"));
        assert_eq!(app.restore_savepoint_path(), Some("s3://status"));
    }

    #[test]
    fn test_empty_job_id_is_treated_as_missing() {
        let mut app = app_with(1, None);
        app.status = Some(FlinkApplicationStatus {
            job_id: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(app.job_id(), None);
    }

    #[test]
    fn test_status_transitions() {
        let running = FlinkApplicationStatus::default().with_job("j1");
        let pending = running.with_trigger("t1");
        assert_eq!(pending.job_id.as_deref(), Some("j1"));
        assert_eq!(pending.savepoint_trigger_id.as_deref(), Some("t1"));

        let complete = pending.with_savepoint("s3://sp");
        assert_eq!(complete.job_id, None);
        assert_eq!(complete.savepoint_trigger_id, None);
        assert_eq!(complete.savepoint_path.as_deref(), Some("s3://sp"));
    }
}
