mod common;
use crate::common::*;

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use presscat::{job_pod_template_spec, web_pod_template_spec, Config};

#[test]
fn minimal_site_has_no_code_or_media() {
    let wp = site(MINIMAL);
    let tpl = web_pod_template_spec(&wp, &Config::default());
    let spec = pod_spec(&tpl);

    assert!(init_names(spec).is_empty());
    assert_eq!(volume_names(spec), vec!["knative-internal", "knative-var-log"]);
    let main = &spec.containers[0];
    let mounts = main.volume_mounts.as_ref().unwrap();
    assert_eq!(mounts.len(), 1);
    assert_eq!(mounts[0].mount_path, "/var/log");

    let env = main.env.as_ref().unwrap();
    assert_eq!(env.len(), 6);
    assert_eq!(env_value(env, "STACK_ROUTES"), Some("plain.sites.svc"));
    assert_eq!(env_value(env, "WP_HOME"), Some("http://plain.sites.svc"));
    assert_eq!(env_value(env, "WP_SITEURL"), Some("http://plain.sites.svc/wp"));
    assert!(env_value(env, "STACK_MEDIA_BUCKET").is_none());
}

#[test]
fn default_readiness_forces_canonical_host() {
    let wp = site(MINIMAL);
    let tpl = web_pod_template_spec(&wp, &Config::default());
    let main = &pod_spec(&tpl).containers[0];
    let probe = main.readiness_probe.as_ref().unwrap();
    let get = probe.http_get.as_ref().unwrap();
    let headers = get.http_headers.as_ref().unwrap();
    assert_eq!(headers[0].name, "Host");
    assert_eq!(headers[0].value, "plain.sites.svc");
    assert_eq!(get.port, IntOrString::Int(8080));
    assert_eq!(probe.failure_threshold, Some(3));
}

#[test]
fn git_s3_bootstrap_init_order() {
    let wp = site(GIT_S3_BOOTSTRAP);
    let tpl = web_pod_template_spec(&wp, &Config::default());
    let spec = pod_spec(&tpl);
    assert_eq!(init_names(spec), vec!["prepare-volumes", "warmup", "git", "install-wp"]);
    assert_eq!(names(&spec.containers), vec!["wordpress", "cron"]);
    assert_eq!(volume_names(spec), vec!["knative-internal", "knative-var-log", "code", "media"]);

    let media = &spec.volumes.as_ref().unwrap()[3];
    assert!(media.empty_dir.is_some());
    assert!(media.persistent_volume_claim.is_none());
}

#[test]
fn git_s3_bootstrap_env() {
    let wp = site(GIT_S3_BOOTSTRAP);
    let tpl = web_pod_template_spec(&wp, &Config::default());
    let main = &pod_spec(&tpl).containers[0];
    let env = main.env.as_ref().unwrap();
    let env_names: Vec<&str> = env.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(env_names, vec![
        "WP_HOME",
        "WP_SITEURL",
        "WP_CORE_DIRECTORY",
        "STACK_ROUTES",
        "STACK_SITE_NAME",
        "STACK_SITE_NAMESPACE",
        "STACK_MEDIA_BUCKET",
        "AWS_ACCESS_KEY_ID",
        "S3_ENDPOINT",
    ]);
    assert_eq!(env_value(env, "WP_HOME"), Some("https://example.com"));
    assert_eq!(env_value(env, "WP_SITEURL"), Some("https://example.com/wp"));
    assert_eq!(env_value(env, "STACK_ROUTES"), Some("example.com,www.example.com/blog"));
    assert_eq!(env_value(env, "STACK_MEDIA_BUCKET"), Some("s3://b/p"));
    assert_eq!(env_value(env, "S3_ENDPOINT"), Some("https://minio.example.com"));

    let env_from = main.env_from.as_ref().unwrap();
    assert_eq!(env_from.len(), 1);
    assert_eq!(env_from[0].secret_ref.as_ref().unwrap().name.as_ref().unwrap(), "mysite-wp");
}

#[test]
fn git_step_and_install_step() {
    let wp = site(GIT_S3_BOOTSTRAP);
    let conf = Config::default();
    let tpl = web_pod_template_spec(&wp, &conf);
    let inits = pod_spec(&tpl).init_containers.as_ref().unwrap();

    let git = &inits[2];
    assert_eq!(git.image.as_ref().unwrap(), &conf.git_clone_image);
    let git_env = git.env.as_ref().unwrap();
    assert_eq!(env_value(git_env, "GIT_CLONE_URL"), Some("https://example/repo.git"));
    assert_eq!(env_value(git_env, "GIT_CLONE_REF"), Some("main"));
    assert_eq!(git_env.last().unwrap().name, "SSH_RSA_PRIVATE_KEY");

    let install = &inits[3];
    assert_eq!(install.args.as_ref().unwrap()[1], "https://example.com");
    let install_env = install.env.as_ref().unwrap();
    assert_eq!(install_env.last().unwrap().name, "WORDPRESS_BOOTSTRAP_TITLE");
    let install_env_from = install.env_from.as_ref().unwrap();
    assert_eq!(install_env_from.len(), 2);
    assert_eq!(
        install_env_from[1].secret_ref.as_ref().unwrap().name.as_ref().unwrap(),
        "mysite-bootstrap"
    );
    // install sees the same mounts as the site
    assert_eq!(install.volume_mounts, pod_spec(&tpl).containers[0].volume_mounts);
}

#[test]
fn claims_and_gcs() {
    let wp = site(CLAIMS_GCS);
    let tpl = web_pod_template_spec(&wp, &Config::default());

    let meta = tpl.metadata.as_ref().unwrap();
    let labels = meta.labels.as_ref().unwrap();
    assert_eq!(labels["app.kubernetes.io/part-of"], "storefront");
    assert_eq!(labels["app.kubernetes.io/instance"], "shop");
    assert_eq!(labels["team"], "storefront");
    assert_eq!(meta.annotations.as_ref().unwrap()["prometheus.io/scrape"], "true");

    let spec = pod_spec(&tpl);
    assert_eq!(init_names(spec), vec!["prepare-volumes"]);
    let vols = spec.volumes.as_ref().unwrap();
    assert_eq!(vols[2].persistent_volume_claim.as_ref().unwrap().claim_name, "shop-code");
    assert_eq!(vols[3].host_path.as_ref().unwrap().path, "/srv/shop/media");

    // read only code is left alone by volume preparation
    let prep_mounts: Vec<&str> = spec.init_containers.as_ref().unwrap()[0]
        .volume_mounts
        .as_ref()
        .unwrap()
        .iter()
        .map(|m| m.mount_path.as_str())
        .collect();
    assert_eq!(prep_mounts, vec!["/var/knative-internal", "/var/log", "/mnt/media"]);

    let main = &spec.containers[0];
    let env = main.env.as_ref().unwrap();
    assert_eq!(env_value(env, "STACK_MEDIA_BUCKET"), Some("gs://shop-media/prod"));
    assert_eq!(env.last().unwrap().name, "GOOGLE_CREDENTIALS");
    assert_eq!(env_value(env, "STACK_SITE_NAMESPACE"), Some("default"));

    assert!(main.readiness_probe.as_ref().unwrap().exec.is_some());
    assert!(main.liveness_probe.as_ref().unwrap().http_get.is_some());
    assert_eq!(spec.node_selector.as_ref().unwrap()["pool"], "sites");
    assert_eq!(spec.priority_class_name.as_ref().unwrap(), "high");
    assert!(spec.tolerations.is_none());
}

#[test]
fn job_shares_everything_but_the_main_process() {
    let wp = site(GIT_S3_BOOTSTRAP);
    let conf = Config::default();
    let cmd = vec!["wp".to_string(), "plugin".into(), "list".into()];
    let web = web_pod_template_spec(&wp, &conf);
    let job = job_pod_template_spec(&wp, &conf, &cmd);
    let (web, job) = (pod_spec(&web), pod_spec(&job));

    assert_eq!(web.init_containers, job.init_containers);
    assert_eq!(web.volumes, job.volumes);
    assert_eq!(web.containers[0].env, job.containers[0].env);
    assert_eq!(web.containers[1], job.containers[1]);

    assert_eq!(job.containers[0].name, "wp-cli");
    assert_eq!(job.containers[0].args.as_ref().unwrap(), &cmd);
    assert_eq!(job.restart_policy.as_ref().unwrap(), "Never");
    assert_eq!(job.security_context.as_ref().unwrap().fs_group, Some(33));
}

#[test]
fn compilation_is_idempotent() {
    for data in &[MINIMAL, GIT_S3_BOOTSTRAP, CLAIMS_GCS] {
        let wp = site(data);
        let conf = Config::default();
        assert_eq!(web_pod_template_spec(&wp, &conf), web_pod_template_spec(&wp, &conf));
        let a = serde_json::to_string(&job_pod_template_spec(&wp, &conf, &[])).unwrap();
        let b = serde_json::to_string(&job_pod_template_spec(&wp, &conf, &[])).unwrap();
        assert_eq!(a, b);
    }
}
