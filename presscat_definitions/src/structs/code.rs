use k8s_openapi::api::core::v1::{
    EmptyDirVolumeSource, EnvFromSource, EnvVar, HostPathVolumeSource, PersistentVolumeClaimSpec,
};

/// Where the site code comes from
///
/// At most one source is expected. When several are set the first one in
/// the order `git`, `persistentVolumeClaim`, `hostPath`, `emptyDir` wins.
/// When none are set there are no code mounts at all.
///
/// ```yaml
/// code:
///   readOnly: false
///   git:
///     repository: https://github.com/example/site.git
///     reference: master
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeVolumeSpec {
    /// Mount the code volume read only in the main container
    #[serde(default)]
    pub read_only: bool,

    /// Where the content sub path gets mounted in the runtime container
    #[serde(default = "code_mount_path_default")]
    pub mount_path: String,

    /// Sub path of the code volume holding the application content
    #[serde(default = "code_content_sub_path_default")]
    pub content_sub_path: String,

    /// Sub path of the code volume holding configuration
    #[serde(default = "code_config_sub_path_default")]
    pub config_sub_path: String,

    /// Clone code from a git repository into an ephemeral volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitVolumeSource>,

    /// Use a persistent volume claim created from this spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimSpec>,

    /// Use a directory on the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathVolumeSource>,

    /// Use an empty ephemeral volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,
}

fn code_mount_path_default() -> String {
    "/app/web/wp-content".into()
}
fn code_content_sub_path_default() -> String {
    "wp-content/".into()
}
fn code_config_sub_path_default() -> String {
    "config/".into()
}

impl Default for CodeVolumeSpec {
    fn default() -> Self {
        CodeVolumeSpec {
            read_only: false,
            mount_path: code_mount_path_default(),
            content_sub_path: code_content_sub_path_default(),
            config_sub_path: code_config_sub_path_default(),
            git: None,
            persistent_volume_claim: None,
            host_path: None,
            empty_dir: None,
        }
    }
}

/// A git repository to clone at pod start
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitVolumeSource {
    /// Clone url
    pub repository: String,

    /// Branch, tag or commit to check out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Extra environment for the clone step (e.g. `SSH_RSA_PRIVATE_KEY`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    /// Extra bulk environment for the clone step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_from: Vec<EnvFromSource>,

    /// Override for the ephemeral volume holding the clone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,
}

#[cfg(test)]
mod tests {
    use super::CodeVolumeSpec;

    #[test]
    fn path_defaults() {
        let code: CodeVolumeSpec = serde_yaml::from_str("git:\n  repository: https://example/repo.git\n").unwrap();
        assert_eq!(code.mount_path, "/app/web/wp-content");
        assert_eq!(code.content_sub_path, "wp-content/");
        assert_eq!(code.config_sub_path, "config/");
        assert!(!code.read_only);
        let git = code.git.unwrap();
        assert_eq!(git.repository, "https://example/repo.git");
        assert!(git.reference.is_none());
    }
}
