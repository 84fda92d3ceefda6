use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job status as reported by the job manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlinkJobStatus {
    Created,
    Initializing,
    Running,
    Failing,
    Failed,
    Cancelling,
    Canceled,
    Finished,
    Restarting,
    Suspended,
    Reconciling,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FlinkJobStatus {
    /// Statuses in which a job still owns the cluster's slots and is expected
    /// to keep processing.
    pub fn active() -> &'static [Self] {
        &[
            FlinkJobStatus::Created,
            FlinkJobStatus::Initializing,
            FlinkJobStatus::Running,
            FlinkJobStatus::Restarting,
            FlinkJobStatus::Reconciling,
        ]
    }

    pub fn is_active(&self) -> bool {
        Self::active().contains(self)
    }
}

impl fmt::Display for FlinkJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlinkJobStatus::Created => write!(f, "CREATED"),
            FlinkJobStatus::Initializing => write!(f, "INITIALIZING"),
            FlinkJobStatus::Running => write!(f, "RUNNING"),
            FlinkJobStatus::Failing => write!(f, "FAILING"),
            FlinkJobStatus::Failed => write!(f, "FAILED"),
            FlinkJobStatus::Cancelling => write!(f, "CANCELLING"),
            FlinkJobStatus::Canceled => write!(f, "CANCELED"),
            FlinkJobStatus::Finished => write!(f, "FINISHED"),
            FlinkJobStatus::Restarting => write!(f, "RESTARTING"),
            FlinkJobStatus::Suspended => write!(f, "SUSPENDED"),
            FlinkJobStatus::Reconciling => write!(f, "RECONCILING"),
            FlinkJobStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl FromStr for FlinkJobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATED" => Ok(FlinkJobStatus::Created),
            "INITIALIZING" => Ok(FlinkJobStatus::Initializing),
            "RUNNING" => Ok(FlinkJobStatus::Running),
            "FAILING" => Ok(FlinkJobStatus::Failing),
            "FAILED" => Ok(FlinkJobStatus::Failed),
            "CANCELLING" => Ok(FlinkJobStatus::Cancelling),
            "CANCELED" => Ok(FlinkJobStatus::Canceled),
            "FINISHED" => Ok(FlinkJobStatus::Finished),
            "RESTARTING" => Ok(FlinkJobStatus::Restarting),
            "SUSPENDED" => Ok(FlinkJobStatus::Suspended),
            "RECONCILING" => Ok(FlinkJobStatus::Reconciling),
            _ => Err(format!("Unknown job status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlinkJob {
    #[serde(rename = "id")]
    pub job_id: String,
    #[serde(default)]
    pub status: FlinkJobStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetJobsResponse {
    #[serde(default)]
    pub jobs: Vec<FlinkJob>,
}

/// `GET /overview`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterOverview {
    #[serde(rename = "taskmanagers")]
    pub task_manager_count: i64,
    #[serde(default)]
    pub slots_total: i64,
    #[serde(default)]
    pub slots_available: i64,
    #[serde(default)]
    pub jobs_running: i64,
    pub flink_version: Option<String>,
}

/// `GET /jobs/{jobId}/config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(rename = "jid", default)]
    pub job_id: String,
    #[serde(rename = "execution-config")]
    pub execution_config: JobExecutionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobExecutionConfig {
    #[serde(rename = "job-parallelism")]
    pub parallelism: i32,
}

/// Body of `POST /jars/{jarId}/run`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_args: Option<String>,
    pub parallelism: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savepoint_path: Option<String>,
    #[serde(default)]
    pub allow_non_restored_state: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    #[serde(rename = "jobid", default)]
    pub job_id: String,
}

/// Body of `POST /jobs/{jobId}/savepoints`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SavepointTriggerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_directory: Option<String>,
    pub cancel_job: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavepointTriggerResponse {
    #[serde(rename = "request-id")]
    pub trigger_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatusId {
    #[default]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub id: QueueStatusId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureCause {
    pub class: Option<String>,
    #[serde(rename = "stack-trace")]
    pub stack_trace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavepointOperation {
    pub location: Option<String>,
    #[serde(rename = "failure-cause")]
    pub failure_cause: Option<FailureCause>,
}

/// `GET /jobs/{jobId}/savepoints/{triggerId}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavepointResponse {
    pub status: QueueStatus,
    pub operation: Option<SavepointOperation>,
}

/// Point-in-time state of an asynchronous savepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavepointState {
    InProgress,
    Completed { location: String },
    Failed { cause: String },
}

impl SavepointState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SavepointState::InProgress)
    }
}

impl From<SavepointResponse> for SavepointState {
    fn from(response: SavepointResponse) -> Self {
        if response.status.id == QueueStatusId::InProgress {
            return SavepointState::InProgress;
        }

        let operation = response.operation.unwrap_or_default();
        match (operation.location, operation.failure_cause) {
            (Some(location), None) if !location.is_empty() => SavepointState::Completed { location },
            (_, Some(cause)) => SavepointState::Failed {
                cause: cause
                    .class
                    .or(cause.stack_trace)
                    .unwrap_or_else(|| "unknown failure".to_string()),
            },
            _ => SavepointState::Failed {
                cause: "savepoint completed without a location".to_string(),
            },
        }
    }
}
