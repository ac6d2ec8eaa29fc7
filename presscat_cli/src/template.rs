use k8s_openapi::api::core::v1::{
    Container, ContainerPort, ExecAction, Handler, Lifecycle, PodSecurityContext, PodSpec, PodTemplateSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use presscat_definitions::{Config, Wordpress};
use std::collections::BTreeMap;

use super::init::{self, WWW_DATA_USER_ID};
use super::probes::{self, INTERNAL_HTTP_PORT, METRICS_EXPORTER_PORT};
use super::source::{self, Sources};
use super::{env, volumes};

/// Which of the two pod shapes to build
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorkloadKind<'a> {
    /// Long running site behind a service
    Web,
    /// One shot wp-cli invocation with the given args
    Job(&'a [String]),
}

impl<'a> WorkloadKind<'a> {
    fn container_name(&self) -> &'static str {
        match self {
            WorkloadKind::Web => "wordpress",
            WorkloadKind::Job(_) => "wp-cli",
        }
    }

    fn labels(&self, wp: &Wordpress) -> BTreeMap<String, String> {
        match self {
            WorkloadKind::Web => wp.web_pod_labels(),
            WorkloadKind::Job(_) => wp.job_pod_labels(),
        }
    }

    fn restart_policy(&self) -> Option<String> {
        match self {
            WorkloadKind::Web => None,
            WorkloadKind::Job(_) => Some("Never".into()),
        }
    }

    /// Jobs force the fs group so wp-cli can write to every mounted volume
    fn pod_security_context(&self) -> Option<PodSecurityContext> {
        match self {
            WorkloadKind::Web => None,
            WorkloadKind::Job(_) => Some(PodSecurityContext {
                fs_group: Some(WWW_DATA_USER_ID),
                ..Default::default()
            }),
        }
    }
}

fn run_parts(var: &str) -> Handler {
    let script = format!(
        "if test -n \"${var}\" && command -v run-parts >/dev/null 2>&1 && test -d \"${var}\"  ; \
         then run-parts --exit-on-error -v \"${var}\" ; fi",
        var = var
    );
    Handler {
        exec: Some(ExecAction {
            command: Some(vec!["/bin/sh".into(), "-c".into(), script]),
        }),
        ..Default::default()
    }
}

/// Hooks running the image's optional script directories
pub fn lifecycle() -> Lifecycle {
    Lifecycle {
        post_start: Some(run_parts("POST_START_SCRIPTS")),
        pre_stop: Some(run_parts("PRE_STOP_SCRIPTS")),
    }
}

fn port(name: &str, number: i32) -> ContainerPort {
    ContainerPort {
        name: Some(name.into()),
        container_port: number,
        ..Default::default()
    }
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn non_empty_vec<T: Clone>(xs: &[T]) -> Option<Vec<T>> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.to_vec())
    }
}

/// Pod metadata from the site's pod metadata, with the computed labels on top
fn metadata(wp: &Wordpress, kind: WorkloadKind) -> ObjectMeta {
    let mut meta = wp.spec.pod_metadata.clone().unwrap_or_default();
    let mut labels = meta.labels.take().unwrap_or_default();
    labels.extend(kind.labels(wp));
    meta.labels = Some(labels);
    meta
}

fn main_container(wp: &Wordpress, sources: &Sources, conf: &Config, kind: WorkloadKind) -> Container {
    let mut c = Container {
        name: kind.container_name().into(),
        image: Some(wp.spec.image.clone()),
        image_pull_policy: non_empty(&wp.spec.image_pull_policy),
        volume_mounts: Some(volumes::volume_mounts(wp, sources, conf).into_vec()),
        env: Some(env::container_env(wp, sources).into_vec()),
        env_from: Some(env::container_env_from(wp).into_vec()),
        security_context: Some(init::security_context()),
        ..Default::default()
    };
    match kind {
        WorkloadKind::Web => {
            c.resources = wp.spec.resources.clone();
            c.ports = Some(vec![
                port("http", INTERNAL_HTTP_PORT),
                port("prometheus", METRICS_EXPORTER_PORT),
            ]);
            c.lifecycle = Some(lifecycle());
            c.readiness_probe = Some(probes::readiness_probe(wp));
            c.liveness_probe = Some(probes::liveness_probe(wp));
        }
        WorkloadKind::Job(args) => {
            c.args = Some(args.to_vec());
        }
    }
    c
}

/// Build a pod template of the given shape
///
/// Placement fields are only set when the site sets them, so nothing
/// overrides what the cluster would default.
pub fn pod_template_spec(wp: &Wordpress, conf: &Config, kind: WorkloadKind) -> PodTemplateSpec {
    let sources = source::resolve(wp);
    let mut containers = vec![main_container(wp, &sources, conf, kind)];
    containers.extend(wp.spec.sidecars.iter().cloned());

    let spec = PodSpec {
        image_pull_secrets: non_empty_vec(&wp.spec.image_pull_secrets),
        service_account_name: non_empty(&wp.spec.service_account_name),
        restart_policy: kind.restart_policy(),
        init_containers: Some(init::init_containers(wp, &sources, conf).into_vec()),
        containers,
        volumes: Some(volumes::volumes(wp, &sources).into_vec()),
        node_selector: if wp.spec.node_selector.is_empty() {
            None
        } else {
            Some(wp.spec.node_selector.clone())
        },
        tolerations: non_empty_vec(&wp.spec.tolerations),
        affinity: wp.spec.affinity.clone(),
        priority_class_name: non_empty(&wp.spec.priority_class_name),
        security_context: kind.pod_security_context(),
        ..Default::default()
    };
    debug!("{}: built {} pod template", wp.name(), kind.container_name());
    PodTemplateSpec {
        metadata: Some(metadata(wp, kind)),
        spec: Some(spec),
    }
}

/// Pod template for the site deployment
pub fn web_pod_template_spec(wp: &Wordpress, conf: &Config) -> PodTemplateSpec {
    pod_template_spec(wp, conf, WorkloadKind::Web)
}

/// Pod template for a wp-cli job running `cmd`
pub fn job_pod_template_spec(wp: &Wordpress, conf: &Config, cmd: &[String]) -> PodTemplateSpec {
    pod_template_spec(wp, conf, WorkloadKind::Job(cmd))
}
