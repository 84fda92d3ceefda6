//! Fixtures shared by the controller tests.

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use kube::core::ObjectMeta;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::controller::FlinkController;
use crate::flink::MockJobManagerClient;
use crate::k8s::{MockClusterProvisioner, MockK8sCluster};
use crate::models::{FlinkApplication, FlinkApplicationSpec, FlinkApplicationStatus};
use crate::naming::ImageKey;

pub const TEST_IMAGE: &str = "123.xyz.com/xx:11ae1218924428faabd9b64423fa0c332efba6b2";
pub const TEST_APP_NAME: &str = "app-name";
pub const TEST_NAMESPACE: &str = "ns";
pub const TEST_JOB_ID: &str = "j1";
pub const TEST_URL: &str = "http://app-name-jm.ns:8081";

pub fn test_image_key() -> String {
    ImageKey::from_image(TEST_IMAGE).to_string()
}

pub fn test_app() -> FlinkApplication {
    let mut app = FlinkApplication::new(
        TEST_APP_NAME,
        FlinkApplicationSpec {
            image: TEST_IMAGE.to_string(),
            ..Default::default()
        },
    );
    app.metadata.namespace = Some(TEST_NAMESPACE.to_string());
    app.status = Some(FlinkApplicationStatus {
        job_id: Some(TEST_JOB_ID.to_string()),
        ..Default::default()
    });
    app
}

pub fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub fn deployment(name: &str, pairs: &[(&str, &str)], replicas: Option<i32>) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(labels(pairs)),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn token() -> CancellationToken {
    CancellationToken::new()
}

/// One mock per collaborator; configure expectations, then build the controller.
pub struct TestMocks {
    pub k8s: MockK8sCluster,
    pub flink: MockJobManagerClient,
    pub provisioner: MockClusterProvisioner,
}

impl TestMocks {
    pub fn new() -> Self {
        Self {
            k8s: MockK8sCluster::new(),
            flink: MockJobManagerClient::new(),
            provisioner: MockClusterProvisioner::new(),
        }
    }

    pub fn into_controller(self) -> FlinkController {
        FlinkController::new(Arc::new(self.k8s), Arc::new(self.flink))
            .with_provisioner(Arc::new(self.provisioner))
    }
}
