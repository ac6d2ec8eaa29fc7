use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, HostPathVolumeSource, PersistentVolumeClaimSpec};
use presscat_definitions::structs::{
    CodeVolumeSpec, GCSVolumeSource, GitVolumeSource, MediaVolumeSpec, S3VolumeSource,
};
use presscat_definitions::Wordpress;

/// The code source that gets materialized
#[derive(Clone, Debug, PartialEq)]
pub enum CodeSource<'a> {
    Git(&'a GitVolumeSource),
    Claim(&'a PersistentVolumeClaimSpec),
    HostPath(&'a HostPathVolumeSource),
    Ephemeral(&'a EmptyDirVolumeSource),
}

/// The media mount source that gets materialized
#[derive(Clone, Debug, PartialEq)]
pub enum MediaSource<'a> {
    Claim(&'a PersistentVolumeClaimSpec),
    HostPath(&'a HostPathVolumeSource),
    /// Explicit ephemeral volume, or `None` when defaulted because of a backend
    Ephemeral(Option<&'a EmptyDirVolumeSource>),
}

/// Remote bucket the runtime talks to directly
#[derive(Clone, Debug, PartialEq)]
pub enum MediaBackend<'a> {
    S3(&'a S3VolumeSource),
    Gcs(&'a GCSVolumeSource),
}

/// A resolved code source plus its mount settings
#[derive(Clone, Debug, PartialEq)]
pub struct CodeMount<'a> {
    pub spec: &'a CodeVolumeSpec,
    pub source: CodeSource<'a>,
}

/// A resolved media source plus its mount settings
#[derive(Clone, Debug, PartialEq)]
pub struct MediaMount<'a> {
    pub spec: &'a MediaVolumeSpec,
    pub source: MediaSource<'a>,
}

/// Everything the rest of the compiler needs to know about volume sources
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Sources<'a> {
    pub code: Option<CodeMount<'a>>,
    pub media: Option<MediaMount<'a>>,
    pub backend: Option<MediaBackend<'a>>,
}

impl<'a> Sources<'a> {
    pub fn has_code_mounts(&self) -> bool {
        self.code.is_some()
    }

    pub fn has_media_mounts(&self) -> bool {
        self.media.is_some()
    }

    /// The git source, if code comes from git
    pub fn git(&self) -> Option<&'a GitVolumeSource> {
        match self.code {
            Some(CodeMount { source: CodeSource::Git(g), .. }) => Some(g),
            _ => None,
        }
    }

    /// Whether the code volume is writable from the volume prep step
    pub fn code_writable(&self) -> bool {
        self.code.as_ref().map(|c| !c.spec.read_only).unwrap_or(false)
    }

    /// Whether the media volume is writable from the volume prep step
    pub fn media_writable(&self) -> bool {
        self.media.as_ref().map(|m| !m.spec.read_only).unwrap_or(false)
    }
}

/// Pick the code source by priority: git, claim, host path, ephemeral
pub fn resolve_code(spec: &CodeVolumeSpec) -> Option<CodeSource<'_>> {
    if let Some(g) = &spec.git {
        Some(CodeSource::Git(g))
    } else if let Some(c) = &spec.persistent_volume_claim {
        Some(CodeSource::Claim(c))
    } else if let Some(h) = &spec.host_path {
        Some(CodeSource::HostPath(h))
    } else if let Some(e) = &spec.empty_dir {
        Some(CodeSource::Ephemeral(e))
    } else {
        None
    }
}

/// Pick the media backend, s3 before gcs
pub fn resolve_backend(spec: &MediaVolumeSpec) -> Option<MediaBackend<'_>> {
    if let Some(s3) = &spec.s3 {
        Some(MediaBackend::S3(s3))
    } else if let Some(gcs) = &spec.gcs {
        Some(MediaBackend::Gcs(gcs))
    } else {
        None
    }
}

/// Pick the media mount source by priority: claim, host path, ephemeral
///
/// Falls back to a plain ephemeral volume when only a backend is configured.
pub fn resolve_media(spec: &MediaVolumeSpec) -> Option<MediaSource<'_>> {
    if let Some(c) = &spec.persistent_volume_claim {
        Some(MediaSource::Claim(c))
    } else if let Some(h) = &spec.host_path {
        Some(MediaSource::HostPath(h))
    } else if let Some(e) = &spec.empty_dir {
        Some(MediaSource::Ephemeral(Some(e)))
    } else if resolve_backend(spec).is_some() {
        Some(MediaSource::Ephemeral(None))
    } else {
        None
    }
}

/// Resolve all volume sources of a site
pub fn resolve(wp: &Wordpress) -> Sources<'_> {
    let code = wp.spec.code.as_ref().and_then(|spec| {
        resolve_code(spec).map(|source| CodeMount { spec, source })
    });
    let media = wp.spec.media.as_ref().and_then(|spec| {
        resolve_media(spec).map(|source| MediaMount { spec, source })
    });
    let backend = wp.spec.media.as_ref().and_then(resolve_backend);
    trace!(
        "{}: code={:?} media={:?} backend={}",
        wp.name(),
        code.as_ref().map(|c| c.source.kind()),
        media.as_ref().map(|m| m.source.kind()),
        backend.as_ref().map(|b| b.scheme()).unwrap_or("none")
    );
    Sources { code, media, backend }
}

impl<'a> CodeSource<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            CodeSource::Git(_) => "git",
            CodeSource::Claim(_) => "persistentVolumeClaim",
            CodeSource::HostPath(_) => "hostPath",
            CodeSource::Ephemeral(_) => "emptyDir",
        }
    }
}

impl<'a> MediaSource<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            MediaSource::Claim(_) => "persistentVolumeClaim",
            MediaSource::HostPath(_) => "hostPath",
            MediaSource::Ephemeral(_) => "emptyDir",
        }
    }
}

impl<'a> MediaBackend<'a> {
    /// Url scheme of the bucket
    pub fn scheme(&self) -> &'static str {
        match self {
            MediaBackend::S3(_) => "s3",
            MediaBackend::Gcs(_) => "gs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, HostPathVolumeSource, PersistentVolumeClaimSpec};
    use presscat_definitions::structs::{CodeVolumeSpec, GitVolumeSource, MediaVolumeSpec, S3VolumeSource};
    use presscat_definitions::{Wordpress, WordpressSpec};

    fn host_path() -> HostPathVolumeSource {
        HostPathVolumeSource {
            path: "/srv/site".into(),
            ..Default::default()
        }
    }

    #[test]
    fn code_priority_git_first() {
        let spec = CodeVolumeSpec {
            git: Some(GitVolumeSource {
                repository: "https://example/repo.git".into(),
                ..Default::default()
            }),
            persistent_volume_claim: Some(PersistentVolumeClaimSpec::default()),
            host_path: Some(host_path()),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        };
        assert_eq!(resolve_code(&spec).unwrap().kind(), "git");
    }

    #[test]
    fn code_priority_without_git() {
        let mut spec = CodeVolumeSpec {
            host_path: Some(host_path()),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        };
        assert_eq!(resolve_code(&spec), Some(CodeSource::HostPath(&host_path())));
        spec.persistent_volume_claim = Some(PersistentVolumeClaimSpec::default());
        assert_eq!(resolve_code(&spec).unwrap().kind(), "persistentVolumeClaim");
        spec.persistent_volume_claim = None;
        spec.host_path = None;
        assert_eq!(resolve_code(&spec).unwrap().kind(), "emptyDir");
    }

    #[test]
    fn code_absent_is_not_defaulted() {
        assert_eq!(resolve_code(&CodeVolumeSpec::default()), None);
        let wp = Wordpress::new("mysite", WordpressSpec {
            code: Some(CodeVolumeSpec::default()),
            ..Default::default()
        });
        let sources = resolve(&wp);
        assert!(!sources.has_code_mounts());
        assert!(sources.git().is_none());
    }

    #[test]
    fn media_defaults_to_ephemeral_with_backend() {
        let spec = MediaVolumeSpec {
            s3: Some(S3VolumeSource {
                bucket: "b".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(resolve_media(&spec), Some(MediaSource::Ephemeral(None)));
        assert_eq!(resolve_backend(&spec).unwrap().scheme(), "s3");
    }

    #[test]
    fn media_mount_independent_of_backend() {
        let spec = MediaVolumeSpec {
            host_path: Some(host_path()),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        };
        assert_eq!(resolve_media(&spec).unwrap().kind(), "hostPath");
        assert_eq!(resolve_backend(&spec), None);
        assert_eq!(resolve_media(&MediaVolumeSpec::default()), None);
    }

    #[test]
    fn read_only_predicates() {
        let wp = Wordpress::new("mysite", WordpressSpec {
            code: Some(CodeVolumeSpec {
                read_only: true,
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            }),
            media: Some(MediaVolumeSpec {
                empty_dir: Some(EmptyDirVolumeSource::default()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let sources = resolve(&wp);
        assert!(sources.has_code_mounts());
        assert!(sources.has_media_mounts());
        assert!(!sources.code_writable());
        assert!(sources.media_writable());
    }
}
