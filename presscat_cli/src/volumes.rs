use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, PersistentVolumeClaimVolumeSource, Volume, VolumeMount};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use presscat_definitions::{Component, Config, Wordpress};

use super::plan::{Stage, Staged};
use super::source::{CodeMount, CodeSource, MediaMount, MediaSource, Sources};

pub const CODE_VOLUME: &str = "code";
pub const MEDIA_VOLUME: &str = "media";

/// Scratch space shared with the platform's sidecars
pub const INTERNAL_VOLUME: &str = "knative-internal";
pub const INTERNAL_MOUNT_PATH: &str = "/var/knative-internal";
/// Size capped log directory
pub const VAR_LOG_VOLUME: &str = "knative-var-log";
pub const VAR_LOG_MOUNT_PATH: &str = "/var/log";
const VAR_LOG_SIZE_LIMIT: &str = "1Gi";

/// Mount with optional sub path; empty sub paths are left out
pub fn mount(name: &str, path: &str, sub_path: &str, read_only: bool) -> VolumeMount {
    VolumeMount {
        name: name.into(),
        mount_path: path.into(),
        sub_path: if sub_path.is_empty() { None } else { Some(sub_path.into()) },
        read_only: if read_only { Some(true) } else { None },
        ..Default::default()
    }
}

fn empty_dir(name: &str, source: EmptyDirVolumeSource) -> Volume {
    Volume {
        name: name.into(),
        empty_dir: Some(source),
        ..Default::default()
    }
}

fn claim(name: &str, claim_name: String) -> Volume {
    Volume {
        name: name.into(),
        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
            claim_name,
            read_only: None,
        }),
        ..Default::default()
    }
}

/// The two volumes every pod gets
pub fn auxiliary_volumes() -> Vec<Volume> {
    vec![
        empty_dir(INTERNAL_VOLUME, EmptyDirVolumeSource::default()),
        empty_dir(VAR_LOG_VOLUME, EmptyDirVolumeSource {
            size_limit: Some(Quantity(VAR_LOG_SIZE_LIMIT.into())),
            ..Default::default()
        }),
    ]
}

pub fn code_volume(wp: &Wordpress, code: &CodeMount) -> Volume {
    match code.source {
        CodeSource::Git(git) => empty_dir(CODE_VOLUME, git.empty_dir.clone().unwrap_or_default()),
        CodeSource::Claim(_) => claim(CODE_VOLUME, wp.component_name(Component::CodePvc)),
        CodeSource::HostPath(hp) => Volume {
            name: CODE_VOLUME.into(),
            host_path: Some(hp.clone()),
            ..Default::default()
        },
        CodeSource::Ephemeral(ed) => empty_dir(CODE_VOLUME, ed.clone()),
    }
}

pub fn media_volume(wp: &Wordpress, media: &MediaMount) -> Volume {
    match media.source {
        MediaSource::Claim(_) => claim(MEDIA_VOLUME, wp.component_name(Component::MediaPvc)),
        MediaSource::HostPath(hp) => Volume {
            name: MEDIA_VOLUME.into(),
            host_path: Some(hp.clone()),
            ..Default::default()
        },
        MediaSource::Ephemeral(ed) => empty_dir(MEDIA_VOLUME, ed.cloned().unwrap_or_default()),
    }
}

/// All pod volumes: auxiliary, the site's own, code, media
pub fn volumes(wp: &Wordpress, sources: &Sources) -> Staged<Volume> {
    let mut vols = Staged::new()
        .then(Stage::Auxiliary, auxiliary_volumes())
        .then(Stage::User, wp.spec.volumes.clone());
    if let Some(code) = &sources.code {
        vols.push(Stage::Code, vec![code_volume(wp, code)]);
    }
    if let Some(media) = &sources.media {
        vols.push(Stage::MediaMount, vec![media_volume(wp, media)]);
    }
    vols
}

/// Three views of the code volume
///
/// The clone destination, the content sub path where the runtime expects it,
/// and the config sub path which is always read only.
pub fn code_mounts(code: &CodeMount, conf: &Config) -> Vec<VolumeMount> {
    let spec = code.spec;
    vec![
        mount(CODE_VOLUME, &conf.code_src_mount_path, "", spec.read_only),
        mount(CODE_VOLUME, &spec.mount_path, &spec.content_sub_path, spec.read_only),
        mount(CODE_VOLUME, &conf.config_mount_path, &spec.config_sub_path, true),
    ]
}

pub fn media_mounts(media: &MediaMount) -> Vec<VolumeMount> {
    let spec = media.spec;
    vec![mount(MEDIA_VOLUME, &spec.mount_path, &spec.content_sub_path, spec.read_only)]
}

/// Mounts of the main container (and the install step)
pub fn volume_mounts(wp: &Wordpress, sources: &Sources, conf: &Config) -> Staged<VolumeMount> {
    let mut mounts = Staged::new()
        .then(Stage::Logs, vec![mount(VAR_LOG_VOLUME, VAR_LOG_MOUNT_PATH, "", false)])
        .then(Stage::User, wp.spec.volume_mounts.clone());
    if let Some(code) = &sources.code {
        mounts.push(Stage::Code, code_mounts(code, conf));
    }
    if let Some(media) = &sources.media {
        mounts.push(Stage::MediaMount, media_mounts(media));
    }
    mounts
}
