use k8s_openapi::api::core::v1::{EnvFromSource, EnvVar, SecretEnvSource};
use presscat_definitions::structs::GitVolumeSource;
use presscat_definitions::{paths, Component, Config, Wordpress};

use super::plan::{Stage, Staged};
use super::source::{MediaBackend, Sources};

// canonical credential name -> name the runtime expects
const S3_ENV_VARS: &[(&str, &str)] = &[
    ("AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"),
    ("AWS_SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"),
    ("AWS_CONFIG_FILE", "AWS_CONFIG_FILE"),
    ("ENDPOINT", "S3_ENDPOINT"),
];
const GCS_ENV_VARS: &[(&str, &str)] = &[
    ("GOOGLE_CREDENTIALS", "GOOGLE_CREDENTIALS"),
    ("GOOGLE_APPLICATION_CREDENTIALS", "GOOGLE_APPLICATION_CREDENTIALS"),
];

/// Plain `name=value` env var
pub fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: Some(value.into()),
        value_from: None,
    }
}

/// The six variables every site container starts with
pub fn builtin_env(wp: &Wordpress) -> Vec<EnvVar> {
    vec![
        env_var("WP_HOME", &wp.home_url()),
        env_var("WP_SITEURL", &wp.site_url()),
        env_var("WP_CORE_DIRECTORY", &wp.spec.wordpress_path_prefix),
        env_var("STACK_ROUTES", &wp.routes().join(",")),
        env_var("STACK_SITE_NAME", wp.name()),
        env_var("STACK_SITE_NAMESPACE", wp.namespace()),
    ]
}

/// Rename recognised credentials, drop everything else
///
/// Values and value sources are carried over untouched.
fn remap(table: &[(&str, &str)], env: &[EnvVar]) -> Vec<EnvVar> {
    env.iter()
        .filter_map(|e| {
            table.iter().find(|(from, _)| *from == e.name).map(|(_, to)| EnvVar {
                name: (*to).to_string(),
                ..e.clone()
            })
        })
        .collect()
}

/// Bucket url and credentials for a remote media backend
pub fn media_env(backend: Option<&MediaBackend>) -> Vec<EnvVar> {
    let backend = match backend {
        Some(b) => b,
        None => return vec![],
    };
    let (bucket, prefix, env, table) = match backend {
        MediaBackend::S3(s3) => (&s3.bucket, &s3.path_prefix, &s3.env, S3_ENV_VARS),
        MediaBackend::Gcs(gcs) => (&gcs.bucket, &gcs.path_prefix, &gcs.env, GCS_ENV_VARS),
    };
    let url = format!("{}://{}", backend.scheme(), paths::join(&[bucket, prefix]));
    let mut out = vec![env_var("STACK_MEDIA_BUCKET", &url)];
    out.extend(remap(table, env));
    out
}

/// Environment of the main container
///
/// Built-ins first, then the site's own env, then media. Duplicate names are
/// left in place; the last one wins when the container starts.
pub fn container_env(wp: &Wordpress, sources: &Sources) -> Staged<EnvVar> {
    let mut env = Staged::new()
        .then(Stage::Builtin, builtin_env(wp))
        .then(Stage::User, wp.spec.env.clone());
    if sources.backend.is_some() {
        env.push(Stage::Media, media_env(sources.backend.as_ref()));
    }
    env
}

/// Bulk environment of the main container
pub fn container_env_from(wp: &Wordpress) -> Staged<EnvFromSource> {
    let secret = EnvFromSource {
        secret_ref: Some(SecretEnvSource {
            name: Some(wp.component_name(Component::Secret)),
            optional: None,
        }),
        ..Default::default()
    };
    Staged::new()
        .then(Stage::GeneratedSecret, vec![secret])
        .then(Stage::User, wp.spec.env_from.clone())
}

/// Environment of the git clone step
pub fn git_clone_env(git: &GitVolumeSource, conf: &Config) -> Staged<EnvVar> {
    let mut clone = vec![
        env_var("GIT_CLONE_URL", &git.repository),
        env_var("SRC_DIR", &conf.code_src_mount_path),
    ];
    match &git.reference {
        Some(r) if !r.is_empty() => clone.push(env_var("GIT_CLONE_REF", r)),
        _ => {}
    }
    Staged::new()
        .then(Stage::GitClone, clone)
        .then(Stage::CodeSource, git.env.clone())
}

/// Bulk environment of the git clone step
pub fn git_clone_env_from(git: &GitVolumeSource) -> Staged<EnvFromSource> {
    Staged::new().then(Stage::CodeSource, git.env_from.clone())
}
