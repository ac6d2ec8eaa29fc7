use k8s_openapi::api::core::v1::{Container, EnvVar, EnvVarSource, ObjectFieldSelector, SecurityContext};
use presscat_definitions::structs::{GitVolumeSource, WordpressBootstrapSpec};
use presscat_definitions::{Config, Wordpress};

use super::env;
use super::plan::{Stage, Staged};
use super::source::Sources;
use super::volumes::{
    self, CODE_VOLUME, INTERNAL_MOUNT_PATH, INTERNAL_VOLUME, MEDIA_VOLUME, VAR_LOG_MOUNT_PATH, VAR_LOG_VOLUME,
};

/// Uid and gid every process and file is owned by (www-data)
pub const WWW_DATA_USER_ID: i64 = 33;

const PREPARE_CODE_PATH: &str = "/mnt/code";
const PREPARE_MEDIA_PATH: &str = "/mnt/media";

/// Clone `$GIT_CLONE_URL` into `$SRC_DIR`
///
/// Optional `$GIT_CLONE_REF` (default branch otherwise) and
/// `$SSH_RSA_PRIVATE_KEY` for private repositories.
pub const GIT_CLONE_SCRIPT: &str = r#"#!/bin/bash
set -e
set -o pipefail

export HOME="$(mktemp -d)"
export GIT_SSH_COMMAND="ssh -o UserKnownHostsFile=$HOME/.ssh/known_hosts -o StrictHostKeyChecking=no"

test -d "$HOME/.ssh" || mkdir "$HOME/.ssh"

if [ ! -z "$SSH_RSA_PRIVATE_KEY" ] ; then
    echo "$SSH_RSA_PRIVATE_KEY" > "$HOME/.ssh/id_rsa"
    chmod 0400 "$HOME/.ssh/id_rsa"
    export GIT_SSH_COMMAND="$GIT_SSH_COMMAND -o IdentityFile=$HOME/.ssh/id_rsa"
fi

if [ -z "$GIT_CLONE_URL" ] ; then
    echo "No \$GIT_CLONE_URL specified" >&2
    exit 1
fi

find "$SRC_DIR" -maxdepth 1 -mindepth 1 -print0 | xargs -0 /bin/rm -rf

set -x
git clone "$GIT_CLONE_URL" "$SRC_DIR"
cd "$SRC_DIR"
if [ ! -z "$GIT_CLONE_REF" ] ; then
    git checkout -B "$GIT_CLONE_REF" "origin/$GIT_CLONE_REF"
fi
"#;

/// Fix ownership of writable mounts and link the log directory
pub fn prepare_volumes_script() -> String {
    let uid = WWW_DATA_USER_ID;
    format!(
        "#!/bin/sh\n\
         test -d {code} && chown {uid}:{uid} {code}\n\
         test -d {media} && chown {uid}:{uid} {media}\n\
         test -d {log} && chown {uid}:{uid} {log}\n\
         ln -sf ../log {internal}/${{POD_NAMESPACE}}_${{POD_NAME}}_wordpress\n",
        uid = uid,
        code = PREPARE_CODE_PATH,
        media = PREPARE_MEDIA_PATH,
        log = VAR_LOG_MOUNT_PATH,
        internal = INTERNAL_MOUNT_PATH,
    )
}

/// Security context of every generated process
pub fn security_context() -> SecurityContext {
    SecurityContext {
        run_as_user: Some(WWW_DATA_USER_ID),
        proc_mount: Some("Default".into()),
        ..Default::default()
    }
}

fn field_env(name: &str, field_path: &str) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: None,
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                api_version: None,
                field_path: field_path.into(),
            }),
            ..Default::default()
        }),
    }
}

/// Step that chowns the code and media volumes before anything writes to them
pub fn prepare_volumes_container(sources: &Sources, conf: &Config) -> Container {
    let mut mounts = vec![
        volumes::mount(INTERNAL_VOLUME, INTERNAL_MOUNT_PATH, "", false),
        volumes::mount(VAR_LOG_VOLUME, VAR_LOG_MOUNT_PATH, "", false),
    ];
    if let Some(code) = sources.code.as_ref().filter(|_| sources.code_writable()) {
        mounts.push(volumes::mount(CODE_VOLUME, PREPARE_CODE_PATH, &code.spec.content_sub_path, false));
    }
    if let Some(media) = sources.media.as_ref().filter(|_| sources.media_writable()) {
        mounts.push(volumes::mount(MEDIA_VOLUME, PREPARE_MEDIA_PATH, &media.spec.content_sub_path, false));
    }
    Container {
        name: "prepare-volumes".into(),
        image: Some(conf.prepare_volumes_image.clone()),
        args: Some(vec!["/bin/sh".into(), "-c".into(), prepare_volumes_script()]),
        env: Some(vec![
            field_env("POD_NAMESPACE", "metadata.namespace"),
            field_env("POD_NAME", "metadata.name"),
        ]),
        volume_mounts: Some(mounts),
        ..Default::default()
    }
}

/// Step that clones the site code into the code volume
pub fn git_clone_container(git: &GitVolumeSource, conf: &Config) -> Container {
    Container {
        name: "git".into(),
        image: Some(conf.git_clone_image.clone()),
        args: Some(vec!["/bin/bash".into(), "-c".into(), GIT_CLONE_SCRIPT.into()]),
        env: Some(env::git_clone_env(git, conf).into_vec()),
        env_from: Some(env::git_clone_env_from(git).into_vec()),
        volume_mounts: Some(vec![volumes::mount(CODE_VOLUME, &conf.code_src_mount_path, "", false)]),
        security_context: Some(security_context()),
        ..Default::default()
    }
}

/// Step that runs the initial install with the main container's setup
pub fn install_container(
    wp: &Wordpress,
    bootstrap: &WordpressBootstrapSpec,
    sources: &Sources,
    conf: &Config,
) -> Container {
    let env = env::container_env(wp, sources).then(Stage::Bootstrap, bootstrap.env.clone());
    let env_from = env::container_env_from(wp).then(Stage::Bootstrap, bootstrap.env_from.clone());
    Container {
        name: "install-wp".into(),
        image: Some(wp.spec.image.clone()),
        command: Some(vec!["wp-install".into()]),
        args: Some(vec![
            "$(WORDPRESS_BOOTSTRAP_TITLE)".into(),
            wp.home_url(),
            "$(WORDPRESS_BOOTSTRAP_USER)".into(),
            "$(WORDPRESS_BOOTSTRAP_PASSWORD)".into(),
            "$(WORDPRESS_BOOTSTRAP_EMAIL)".into(),
        ]),
        env: Some(env.into_vec()),
        env_from: Some(env_from.into_vec()),
        volume_mounts: Some(volumes::volume_mounts(wp, sources, conf).into_vec()),
        security_context: Some(security_context()),
        ..Default::default()
    }
}

/// Init containers in order: volume prep, the site's own, git clone, install
///
/// Permissions have to be right before anything writes to the volumes,
/// and the code has to be there before the install reads it.
pub fn init_containers(wp: &Wordpress, sources: &Sources, conf: &Config) -> Staged<Container> {
    let mut steps = Staged::new();
    if sources.has_code_mounts() || sources.has_media_mounts() {
        steps.push(Stage::VolumePrep, vec![prepare_volumes_container(sources, conf)]);
    }
    steps.push(Stage::UserInit, wp.spec.init_containers.clone());
    if let Some(git) = sources.git() {
        steps.push(Stage::CodeFetch, vec![git_clone_container(git, conf)]);
    }
    if let Some(bootstrap) = &wp.spec.bootstrap {
        steps.push(Stage::Install, vec![install_container(wp, bootstrap, sources, conf)]);
    }
    debug!("{}: init steps {:?}", wp.name(), steps.stages());
    steps
}
