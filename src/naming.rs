//! Deterministic names, labels and addresses derived from a [`FlinkApplication`].
//!
//! Every object the operator creates for an application version is named and
//! labeled from the application name and the [`ImageKey`] of its image, which
//! is what lets several versions coexist during a migration.

use ring::digest::{digest, SHA256};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::FlinkApplication;

pub const APP_LABEL: &str = "app";
pub const IMAGE_KEY_LABEL: &str = "imageKey";
pub const DEFAULT_JOB_MANAGER_PORT: u16 = 8081;

const IMAGE_KEY_LENGTH: usize = 5;

/// Short fingerprint of a container image reference.
///
/// The key is the start of the image tag (or digest). A reference without a
/// tag falls back to a SHA-256 of the whole reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn from_image(image: &str) -> Self {
        let key = image_tag(image)
            .map(|tag| {
                let prefix: String = tag.chars().take(IMAGE_KEY_LENGTH).collect();
                prefix
                    .trim_matches(|ch: char| !ch.is_ascii_alphanumeric())
                    .to_string()
            })
            .filter(|key| !key.is_empty());

        ImageKey(key.unwrap_or_else(|| hashed_key(image)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag or digest of an image reference. A `:` before the last `/` belongs to
/// a registry port, not a tag.
fn image_tag(image: &str) -> Option<&str> {
    let name = image.rsplit_once('/').map_or(image, |(_, name)| name);
    name.rsplit_once(':').map(|(_, tag)| tag).filter(|tag| !tag.is_empty())
}

fn hashed_key(image: &str) -> String {
    let hash = digest(&SHA256, image.as_bytes());
    let hex: String = hash
        .as_ref()
        .iter()
        .take(IMAGE_KEY_LENGTH.div_ceil(2))
        .map(|byte| format!("{:02x}", byte))
        .collect();
    hex[..IMAGE_KEY_LENGTH].to_string()
}

pub fn image_key(app: &FlinkApplication) -> ImageKey {
    ImageKey::from_image(&app.spec.image)
}

/// Labels shared by every version of the application.
pub fn app_labels(app: &FlinkApplication) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(APP_LABEL.to_string(), app.app_name());
    labels
}

/// Labels identifying the version of the application built from its current image.
pub fn version_labels(app: &FlinkApplication) -> BTreeMap<String, String> {
    let mut labels = app_labels(app);
    labels.insert(IMAGE_KEY_LABEL.to_string(), image_key(app).to_string());
    labels
}

pub fn job_manager_name(app: &FlinkApplication) -> String {
    format!("{}-{}-jm", app.app_name(), image_key(app))
}

pub fn task_manager_name(app: &FlinkApplication) -> String {
    format!("{}-{}-tm", app.app_name(), image_key(app))
}

/// Base URL of the job manager REST API, served by the application's `-jm` service.
pub fn job_manager_url(app: &FlinkApplication, port: u16) -> String {
    format!(
        "http://{}-jm.{}:{}",
        app.app_name(),
        app.namespace_or_default(),
        port
    )
}

/// Render labels as a Kubernetes label selector (`k1=v1,k2=v2`).
pub fn label_selector(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlinkApplicationSpec;

    fn test_app() -> FlinkApplication {
        let mut app = FlinkApplication::new(
            "app-name",
            FlinkApplicationSpec {
                image: "123.xyz.com/xx:11ae1218924428faabd9b64423fa0c332efba6b2".to_string(),
                ..Default::default()
            },
        );
        app.metadata.namespace = Some("ns".to_string());
        app
    }

    #[test]
    fn test_image_key_is_tag_prefix() {
        assert_eq!(image_key(&test_app()).as_str(), "11ae1");
        assert_eq!(ImageKey::from_image("flink:1.8").as_str(), "1.8");
        assert_ne!(ImageKey::from_image("flink:1.8"), ImageKey::from_image("flink:1.9"));
        assert_eq!(ImageKey::from_image("registry:5000/team/flink:v2-rc1").as_str(), "v2-rc");
        assert_eq!(
            ImageKey::from_image("flink@sha256:9f86d081884c7d659a2feaa0c55ad015").as_str(),
            "9f86d"
        );
    }

    #[test]
    fn test_image_key_trims_to_valid_label_value() {
        assert_eq!(ImageKey::from_image("flink:v1.2-").as_str(), "v1.2");
    }

    #[test]
    fn test_untagged_image_key_is_hashed() {
        let a = ImageKey::from_image("registry:5000/team/flink");
        let b = ImageKey::from_image("registry:5000/team/flink");
        let c = ImageKey::from_image("registry:5000/team/other");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), IMAGE_KEY_LENGTH);
        assert!(a.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_eq!(ImageKey::from_image("flink:").as_str().len(), IMAGE_KEY_LENGTH);
    }

    #[test]
    fn test_names_and_labels() {
        let app = test_app();
        let key = image_key(&app);

        assert_eq!(job_manager_name(&app), format!("app-name-{}-jm", key));
        assert_eq!(task_manager_name(&app), format!("app-name-{}-tm", key));

        let labels = version_labels(&app);
        assert_eq!(labels.get(APP_LABEL).map(String::as_str), Some("app-name"));
        assert_eq!(labels.get(IMAGE_KEY_LABEL), Some(&key.to_string()));
        assert_eq!(
            label_selector(&labels),
            format!("app=app-name,imageKey={}", key)
        );
    }

    #[test]
    fn test_job_manager_url() {
        let app = test_app();
        assert_eq!(
            job_manager_url(&app, DEFAULT_JOB_MANAGER_PORT),
            "http://app-name-jm.ns:8081"
        );
    }
}
