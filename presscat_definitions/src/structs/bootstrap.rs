use k8s_openapi::api::core::v1::{EnvFromSource, EnvVar};

/// Initial install parameters
///
/// The install step reads its title, user, password and email from
/// `WORDPRESS_BOOTSTRAP_TITLE`, `WORDPRESS_BOOTSTRAP_USER`,
/// `WORDPRESS_BOOTSTRAP_PASSWORD` and `WORDPRESS_BOOTSTRAP_EMAIL`,
/// so those should be provided through `env` or `envFrom` here.
///
/// ```yaml
/// bootstrap:
///   envFrom:
///   - secretRef:
///       name: mysite-bootstrap
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordpressBootstrapSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_from: Vec<EnvFromSource>,
}
