use k8s_openapi::api::core::v1::{HTTPGetAction, HTTPHeader, Probe};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use presscat_definitions::Wordpress;

/// Port the runtime serves http on
pub const INTERNAL_HTTP_PORT: i32 = 8080;
/// Port the metrics exporter listens on
pub const METRICS_EXPORTER_PORT: i32 = 9145;

const LIVENESS_PATH: &str = "/-/php-ping";

// shared timing for both default probes
fn http_probe(path: &str, headers: Option<Vec<HTTPHeader>>) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            host: None,
            http_headers: headers,
            path: Some(path.into()),
            port: IntOrString::Int(INTERNAL_HTTP_PORT),
            scheme: None,
        }),
        failure_threshold: Some(3),
        initial_delay_seconds: Some(10),
        period_seconds: Some(5),
        success_threshold: Some(1),
        timeout_seconds: Some(30),
        ..Default::default()
    }
}

/// Readiness probe, the site's own or a GET on `/`
///
/// The default sets the Host header to the main domain. Without it the pod
/// ip is used as host, an uninstalled site redirects to its canonical url,
/// and the kubelet follows that redirect somewhere it cannot reach.
pub fn readiness_probe(wp: &Wordpress) -> Probe {
    if let Some(p) = &wp.spec.readiness_probe {
        return p.clone();
    }
    http_probe("/", Some(vec![HTTPHeader {
        name: "Host".into(),
        value: wp.main_domain(),
    }]))
}

/// Liveness probe, the site's own or a GET on the php health endpoint
pub fn liveness_probe(wp: &Wordpress) -> Probe {
    if let Some(p) = &wp.spec.liveness_probe {
        return p.clone();
    }
    http_probe(LIVENESS_PATH, None)
}
