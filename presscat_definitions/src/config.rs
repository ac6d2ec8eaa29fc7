use regex::Regex;
use std::fs;
use std::path::Path;

use super::{ErrorKind, Result, ResultExt};

/// Compiler configuration
///
/// Everything here is owned by whoever runs the compiler rather than by the
/// site author. All fields have defaults, so an empty file is a valid config.
///
/// ```yaml
/// gitCloneImage: docker.io/library/buildpack-deps:stretch-scm
/// codeSrcMountPath: /var/run/presslabs.org/code/src
/// configMountPath: /app/config
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Image used by the code fetch init step
    #[serde(default = "git_clone_image_default")]
    pub git_clone_image: String,

    /// Image used by the volume preparation init step
    #[serde(default = "prepare_volumes_image_default")]
    pub prepare_volumes_image: String,

    /// Where the raw code volume is mounted (the git clone destination)
    #[serde(default = "code_src_mount_path_default")]
    pub code_src_mount_path: String,

    /// Where the config sub path of the code volume is mounted
    #[serde(default = "config_mount_path_default")]
    pub config_mount_path: String,
}

fn git_clone_image_default() -> String {
    "docker.io/library/buildpack-deps:stretch-scm".into()
}
// pinned by digest, only needs sh, chown and ln
fn prepare_volumes_image_default() -> String {
    "gcr.io/google-containers/busybox@sha256:545e6a6310a27636260920bc07b994a299b6708a1b26910cfefd335fdfb60d2b".into()
}
fn code_src_mount_path_default() -> String {
    "/var/run/presslabs.org/code/src".into()
}
fn config_mount_path_default() -> String {
    "/app/config".into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            git_clone_image: git_clone_image_default(),
            prepare_volumes_image: prepare_volumes_image_default(),
            code_src_mount_path: code_src_mount_path_default(),
            config_mount_path: config_mount_path_default(),
        }
    }
}

impl Config {
    /// Read and verify a config file
    pub fn read(pth: &Path) -> Result<Config> {
        if !pth.exists() {
            bail!(ErrorKind::MissingConfig(pth.display().to_string()));
        }
        debug!("Reading compiler config from {}", pth.display());
        let data = fs::read_to_string(pth)?;
        let conf = Config::from_yaml(&data)
            .chain_err(|| format!("failed to parse {}", pth.display()))?;
        Ok(conf)
    }

    /// Parse and verify a config from yaml
    pub fn from_yaml(data: &str) -> Result<Config> {
        // an empty document is an explicit "use the defaults"
        let conf: Config = if data.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(data)?
        };
        conf.verify()?;
        Ok(conf)
    }

    pub fn verify(&self) -> Result<()> {
        // registry/name[:tag][@digest] with lowercase repository components
        let re = Regex::new(r"^[a-z0-9]+([._\-/:][a-z0-9]+)*(:[\w][\w.\-]{0,127})?(@sha256:[a-f0-9]{64})?$")
            .chain_err(|| "image regex")?;
        for (field, img) in &[
            ("gitCloneImage", &self.git_clone_image),
            ("prepareVolumesImage", &self.prepare_volumes_image),
        ] {
            if img.is_empty() {
                bail!(ErrorKind::InvalidConfig(format!("{} cannot be empty", field)));
            }
            if !re.is_match(img) {
                bail!(ErrorKind::InvalidConfig(format!("{} '{}' is not an image reference", field, img)));
            }
        }
        for (field, pth) in &[
            ("codeSrcMountPath", &self.code_src_mount_path),
            ("configMountPath", &self.config_mount_path),
        ] {
            if !pth.starts_with('/') {
                bail!(ErrorKind::InvalidConfig(format!("{} '{}' must be absolute", field, pth)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn defaults_verify() {
        let conf = Config::default();
        assert!(conf.verify().is_ok());
        assert_eq!(conf.code_src_mount_path, "/var/run/presslabs.org/code/src");
        assert_eq!(conf.config_mount_path, "/app/config");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_override() {
        let conf = Config::from_yaml("gitCloneImage: alpine/git:v2.26.2\nconfigMountPath: /srv/config\n").unwrap();
        assert_eq!(conf.git_clone_image, "alpine/git:v2.26.2");
        assert_eq!(conf.config_mount_path, "/srv/config");
        assert_eq!(conf.code_src_mount_path, Config::default().code_src_mount_path);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_yaml("configMountPath: app/config").is_err());
        assert!(Config::from_yaml("gitCloneImage: ''").is_err());
        assert!(Config::from_yaml("gitCloneImage: 'Not An Image'").is_err());
        assert!(Config::from_yaml("unknownField: 1").is_err());
    }
}
