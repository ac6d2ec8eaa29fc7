#![recursion_limit = "1024"]
#![allow(renamed_and_removed_lints)]

extern crate serde;
extern crate serde_json;
extern crate serde_yaml;

#[macro_use]
extern crate log;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {}
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error) #[cfg(unix)];
        Mani(presscat_definitions::Error);
        SerdeY(serde_yaml::Error);
        SerdeJ(serde_json::Error);
    }
    errors {
        InvalidSite(reason: String) {
            description("site resource is not usable")
            display("site resource is not usable: {}", &reason)
        }
    }
}

extern crate presscat_definitions;
pub use presscat_definitions::config::{self, Config};
pub use presscat_definitions::structs;
pub use presscat_definitions::{Wordpress, WordpressSpec};

/// Ordered builder recording named contributions
pub mod plan;

/// Picks the single active code source, media source and media backend
pub mod source;

/// Environment and env-from composition
pub mod env;

/// Volumes and mounts for resolved sources
pub mod volumes;

/// Default readiness and liveness probes
pub mod probes;

/// Ordered init containers
pub mod init;

/// Web and job pod templates
pub mod template;
pub use template::{job_pod_template_spec, pod_template_spec, web_pod_template_spec, WorkloadKind};

use std::fs;
use std::path::Path;

/// Load a site resource from a yaml file
///
/// The file is a full `Wordpress` resource with metadata. A name is required
/// since every generated object is named after it.
pub fn load_site(pth: &Path) -> Result<Wordpress> {
    debug!("Reading site from {}", pth.display());
    let data = fs::read_to_string(pth).chain_err(|| format!("failed to read {}", pth.display()))?;
    let wp = parse_site(&data).chain_err(|| format!("failed to load {}", pth.display()))?;
    Ok(wp)
}

/// Parse a site resource from yaml
pub fn parse_site(data: &str) -> Result<Wordpress> {
    let wp: Wordpress = serde_yaml::from_str(data)?;
    if wp.name().is_empty() {
        bail!(ErrorKind::InvalidSite("metadata.name is required".into()));
    }
    if wp.spec.image.is_empty() {
        warn!("{}: no image set, pod templates will not be runnable", wp.name());
    }
    Ok(wp)
}

/// Load the compiler config, falling back to defaults without a file
pub fn load_config(pth: Option<&Path>) -> Result<Config> {
    match pth {
        Some(p) => Ok(Config::read(p)?),
        None => {
            debug!("No compiler config given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Output format for printed objects
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Serialize an object in the requested format
pub fn encode<T: serde::Serialize>(data: &T, fmt: OutputFormat) -> Result<String> {
    let out = match fmt {
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_requires_name() {
        let data = "apiVersion: wordpress.presslabs.org/v1alpha1\n\
                    kind: Wordpress\n\
                    metadata: {}\n\
                    spec:\n  image: wordpress-runtime:latest\n";
        let err = parse_site(data).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidSite(reason) => assert!(reason.contains("metadata.name")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn parse_minimal_site() {
        let data = "apiVersion: wordpress.presslabs.org/v1alpha1\n\
                    kind: Wordpress\n\
                    metadata:\n  name: mysite\n  namespace: sites\n\
                    spec:\n  image: wordpress-runtime:latest\n";
        let wp = parse_site(data).unwrap();
        assert_eq!(wp.name(), "mysite");
        assert_eq!(wp.namespace(), "sites");
        assert_eq!(wp.spec.wordpress_path_prefix, "/wp");
    }

    #[test]
    fn config_defaults_without_file() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn encode_json() {
        let out = encode(&Config::default(), OutputFormat::Json).unwrap();
        assert!(out.contains("\"gitCloneImage\""));
    }
}
