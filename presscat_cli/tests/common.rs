#![allow(dead_code)]

use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec, PodTemplateSpec};
use presscat::{parse_site, Wordpress};

pub const MINIMAL: &str = include_str!("fixtures/minimal.yml");
pub const GIT_S3_BOOTSTRAP: &str = include_str!("fixtures/git-s3-bootstrap.yml");
pub const CLAIMS_GCS: &str = include_str!("fixtures/claims-gcs.yml");

pub fn site(data: &str) -> Wordpress {
    parse_site(data).unwrap()
}

pub fn pod_spec(tpl: &PodTemplateSpec) -> &PodSpec {
    tpl.spec.as_ref().unwrap()
}

pub fn names(containers: &[Container]) -> Vec<&str> {
    containers.iter().map(|c| c.name.as_str()).collect()
}

pub fn init_names(spec: &PodSpec) -> Vec<&str> {
    names(spec.init_containers.as_ref().unwrap())
}

pub fn volume_names(spec: &PodSpec) -> Vec<&str> {
    spec.volumes.as_ref().unwrap().iter().map(|v| v.name.as_str()).collect()
}

pub fn env_value<'a>(env: &'a [EnvVar], name: &str) -> Option<&'a str> {
    env.iter()
        .rev()
        .find(|e| e.name == name)
        .and_then(|e| e.value.as_ref())
        .map(String::as_str)
}
