use k8s_openapi::api::core::v1::{
    Affinity, Container, EnvFromSource, EnvVar, LocalObjectReference, Probe, ResourceRequirements,
    Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube_derive::CustomResource;
use maplit::btreemap;
use std::collections::BTreeMap;

use super::paths;
use super::structs::{CodeVolumeSpec, MediaVolumeSpec, RouteSpec, WordpressBootstrapSpec};

/// A Wordpress site, serializable from the `Wordpress` custom resource.
///
/// Everything here is authored by the site owner. The compiler turns it into
/// pod templates; nothing in here is mutated on the way.
#[derive(CustomResource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[kube(
    group = "wordpress.presslabs.org",
    kind = "Wordpress",
    version = "v1alpha1",
    namespaced,
    shortname = "wp"
)]
#[kube(apiextensions = "v1beta1")] // kubernetes < 1.16
#[serde(rename_all = "camelCase")]
pub struct WordpressSpec {
    /// Runtime image
    ///
    /// ```yaml
    /// image: docker.io/bitpoke/wordpress-runtime:5.8.2
    /// ```
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    /// Prefix where wordpress core lives, relative to the home url
    #[serde(default = "wordpress_path_prefix_default")]
    pub wordpress_path_prefix: String,

    /// Domains and paths the site answers on
    ///
    /// The first route is the canonical one and is used for the home url.
    ///
    /// ```yaml
    /// routes:
    /// - domain: example.com
    /// - domain: www.example.com
    ///   path: /blog
    /// ```
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSpec>,

    /// Secret holding the tls certificate. Switches urls to https.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_secret_ref: Option<String>,

    /// Where the site code comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeVolumeSpec>,

    /// Where uploads are stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaVolumeSpec>,

    /// Run an install step on start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<WordpressBootstrapSpec>,

    /// Extra environment, appended after the built in variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_from: Vec<EnvFromSource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    /// Init containers, run after volume preparation and before code fetch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<Container>,

    /// Containers run next to the main container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<Container>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    /// Extra labels and annotations for generated pods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_metadata: Option<ObjectMeta>,
}

fn wordpress_path_prefix_default() -> String {
    "/wp".into()
}

impl Default for WordpressSpec {
    fn default() -> Self {
        WordpressSpec {
            image: String::new(),
            image_pull_policy: None,
            image_pull_secrets: vec![],
            wordpress_path_prefix: wordpress_path_prefix_default(),
            routes: vec![],
            tls_secret_ref: None,
            code: None,
            media: None,
            bootstrap: None,
            env: vec![],
            env_from: vec![],
            volume_mounts: vec![],
            volumes: vec![],
            init_containers: vec![],
            sidecars: vec![],
            resources: None,
            readiness_probe: None,
            liveness_probe: None,
            node_selector: BTreeMap::new(),
            tolerations: vec![],
            affinity: None,
            priority_class_name: None,
            service_account_name: None,
            pod_metadata: None,
        }
    }
}

/// Objects owned by a site that the compiler needs to reference by name
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Component {
    /// Secret with generated salts and keys, injected in bulk
    Secret,
    /// Claim backing the code volume
    CodePvc,
    /// Claim backing the media volume
    MediaPvc,
}

impl Component {
    fn suffix(self) -> &'static str {
        match self {
            Component::Secret => "wp",
            Component::CodePvc => "code",
            Component::MediaPvc => "media",
        }
    }
}

const LABEL_NAME: &str = "app.kubernetes.io/name";
const LABEL_PART_OF: &str = "app.kubernetes.io/part-of";
const LABEL_INSTANCE: &str = "app.kubernetes.io/instance";
const LABEL_COMPONENT: &str = "app.kubernetes.io/component";

/// Naming and url accessors
impl Wordpress {
    pub fn name(&self) -> &str {
        self.metadata.name.as_ref().map(String::as_str).unwrap_or("")
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_ref().map(String::as_str).unwrap_or("default")
    }

    /// Name of an object owned by this site
    pub fn component_name(&self, c: Component) -> String {
        format!("{}-{}", self.name(), c.suffix())
    }

    /// The canonical domain
    ///
    /// First route's domain, or the in-cluster service domain without routes.
    pub fn main_domain(&self) -> String {
        match self.spec.routes.first() {
            Some(r) => r.domain.clone(),
            None => format!("{}.{}.svc", self.name(), self.namespace()),
        }
    }

    /// Path of the canonical route
    pub fn main_path(&self) -> String {
        match self.spec.routes.first() {
            Some(r) => paths::clean(&format!("/{}", r.path)),
            None => "/".into(),
        }
    }

    /// Routes as `domain/path` strings, in order
    ///
    /// Without explicit routes this is just the canonical domain.
    pub fn routes(&self) -> Vec<String> {
        if self.spec.routes.is_empty() {
            return vec![self.main_domain()];
        }
        self.spec.routes.iter().map(|r| paths::join(&[&r.domain, &r.path])).collect()
    }

    fn scheme(&self) -> &'static str {
        match &self.spec.tls_secret_ref {
            Some(s) if !s.is_empty() => "https",
            _ => "http",
        }
    }

    fn url_with(&self, sub: &str) -> String {
        let pth = paths::join(&[self.main_path().as_str(), sub]);
        let pth = if pth == "/" { "" } else { pth.as_str() };
        format!("{}://{}{}", self.scheme(), self.main_domain(), pth)
    }

    /// Url of the site front end
    pub fn home_url(&self) -> String {
        self.url_with("")
    }

    /// Url of wordpress core (home url with the path prefix)
    pub fn site_url(&self) -> String {
        self.url_with(&self.spec.wordpress_path_prefix)
    }

    /// Labels shared by everything belonging to this site
    pub fn labels(&self) -> BTreeMap<String, String> {
        let part_of = self
            .metadata
            .labels
            .as_ref()
            .and_then(|l| l.get(LABEL_PART_OF))
            .filter(|p| !p.is_empty())
            .cloned()
            .unwrap_or_else(|| "wordpress".into());
        btreemap! {
            LABEL_NAME.to_string() => "wordpress".to_string(),
            LABEL_PART_OF.to_string() => part_of,
            LABEL_INSTANCE.to_string() => self.name().to_string(),
        }
    }

    fn labels_for_component(&self, component: &str) -> BTreeMap<String, String> {
        let mut l = self.labels();
        l.insert(LABEL_COMPONENT.into(), component.into());
        l
    }

    pub fn web_pod_labels(&self) -> BTreeMap<String, String> {
        self.labels_for_component("web")
    }

    pub fn job_pod_labels(&self) -> BTreeMap<String, String> {
        self.labels_for_component("wp-cli")
    }
}
