use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::naming::DEFAULT_JOB_MANAGER_PORT;

pub struct Config {
    /// Namespace used when a manifest does not carry one.
    pub namespace: String,
    pub kubeconfig_path: Option<String>,
    pub kube_context: Option<String>,
    pub job_manager_port: u16,
    pub http_timeout_secs: u64,
}

impl Config {
    fn new() -> Self {
        dotenv().ok();

        Self {
            namespace: env::var("FLINK_NAMESPACE").unwrap_or_else(|_| "default".to_string()),
            kubeconfig_path: env::var("KUBECONFIG").ok(),
            kube_context: env::var("KUBE_CONTEXT").ok(),
            job_manager_port: env::var("FLINK_JOB_MANAGER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_JOB_MANAGER_PORT),
            http_timeout_secs: env::var("FLINK_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| secs.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// Global static CONFIG instance
pub static CONFIG: Lazy<Config> = Lazy::new(Config::new);
