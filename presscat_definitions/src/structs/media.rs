use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, EnvVar, HostPathVolumeSource, PersistentVolumeClaimSpec};

/// Media storage for uploads
///
/// Two independent halves:
/// - a remote backend (`s3` or `gcs`) that only turns into environment
///   variables for the runtime to talk to the bucket directly
/// - a mount source (`persistentVolumeClaim`, `hostPath`, `emptyDir`)
///   that is attached as a volume
///
/// Setting a backend without a mount source gives an ephemeral volume.
///
/// ```yaml
/// media:
///   s3:
///     bucket: my-bucket
///     pathPrefix: sites/example
///     env:
///     - name: AWS_ACCESS_KEY_ID
///       valueFrom:
///         secretKeyRef: { name: media-creds, key: id }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaVolumeSpec {
    /// Mount the media volume read only
    #[serde(default)]
    pub read_only: bool,

    /// Where the media volume gets mounted in the runtime container
    #[serde(default = "media_mount_path_default")]
    pub mount_path: String,

    /// Optional sub path of the media volume to mount
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_sub_path: String,

    /// S3 compatible backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3VolumeSource>,

    /// Google Cloud Storage backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcs: Option<GCSVolumeSource>,

    /// Use a persistent volume claim created from this spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimSpec>,

    /// Use a directory on the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathVolumeSource>,

    /// Use an ephemeral volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,
}

fn media_mount_path_default() -> String {
    "/app/web/wp-content/uploads".into()
}

impl Default for MediaVolumeSpec {
    fn default() -> Self {
        MediaVolumeSpec {
            read_only: false,
            mount_path: media_mount_path_default(),
            content_sub_path: String::new(),
            s3: None,
            gcs: None,
            persistent_volume_claim: None,
            host_path: None,
            empty_dir: None,
        }
    }
}

/// S3 compatible bucket
///
/// Recognised credential names in `env`: `AWS_ACCESS_KEY_ID`,
/// `AWS_SECRET_ACCESS_KEY`, `AWS_CONFIG_FILE`, `ENDPOINT`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3VolumeSource {
    pub bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path_prefix: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

/// Google Cloud Storage bucket
///
/// Recognised credential names in `env`: `GOOGLE_CREDENTIALS`,
/// `GOOGLE_APPLICATION_CREDENTIALS`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GCSVolumeSource {
    pub bucket: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path_prefix: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}
