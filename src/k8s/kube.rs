use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{DeleteParams, ListParams};
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::k8s::K8sCluster;
use crate::naming::label_selector;

/// A `K8sCluster` backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        KubeCluster { client }
    }

    /// Build a client from the kubeconfig and context named in `config`,
    /// falling back to the in-cluster or default configuration.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = match &config.kubeconfig_path {
            Some(kubeconfig_path) => {
                info!("[Kubernetes] Using kubeconfig from path: {}", kubeconfig_path);
                let kubeconfig = kube::config::Kubeconfig::read_from(kubeconfig_path)
                    .map_err(|e| Error::Config(format!("failed to load kubeconfig: {}", e)))?;

                if let Some(context) = &config.kube_context {
                    info!("[Kubernetes] Using context: {}", context);
                }
                let options = kube::config::KubeConfigOptions {
                    context: config.kube_context.clone(),
                    ..Default::default()
                };
                let kube_config = kube::config::Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| Error::Config(format!("failed to create kube config: {}", e)))?;

                Client::try_from(kube_config)?
            }
            None => Client::try_default().await?,
        };

        Ok(Self::new(client))
    }
}

#[async_trait]
impl K8sCluster for KubeCluster {
    async fn list_deployments(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Vec<Deployment>> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let selector = label_selector(labels);
        let list = deployments
            .list(&ListParams::default().labels(&selector))
            .await?;

        debug!(
            "[Kubernetes] Found {} deployment(s) in {} matching {}",
            list.items.len(),
            namespace,
            selector
        );
        Ok(list.items)
    }

    async fn delete_deployments(&self, namespace: &str, deployments: &[Deployment]) -> Result<()> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);

        for deployment in deployments {
            let name = deployment.name_any();
            match api.delete(&name, &DeleteParams::background()).await {
                Ok(_) => info!("[Kubernetes] Deleted deployment {}/{}", namespace, name),
                Err(kube::Error::Api(response)) if response.code == 404 => {
                    debug!("[Kubernetes] Deployment {}/{} already gone", namespace, name)
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    async fn are_all_pods_running(
        &self,
        namespace: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<bool> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods
            .list(&ListParams::default().labels(&label_selector(labels)))
            .await?;

        Ok(all_running(&list.items))
    }
}

/// An empty pod list counts as not running: nothing has been scheduled yet.
fn all_running(pods: &[Pod]) -> bool {
    !pods.is_empty()
        && pods.iter().all(|pod| {
            pod.status
                .as_ref()
                .and_then(|status| status.phase.as_deref())
                == Some("Running")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::PodStatus;

    fn pod(phase: &str) -> Pod {
        Pod {
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_running() {
        assert!(all_running(&[pod("Running"), pod("Running")]));
        assert!(!all_running(&[pod("Running"), pod("Pending")]));
        assert!(!all_running(&[Pod::default()]));
        assert!(!all_running(&[]));
    }
}
