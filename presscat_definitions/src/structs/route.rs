/// A domain and path the site answers on
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteSpec {
    pub domain: String,
    #[serde(default = "route_path_default")]
    pub path: String,
}
fn route_path_default() -> String {
    "/".into()
}

impl RouteSpec {
    pub fn new(domain: &str, path: &str) -> Self {
        RouteSpec {
            domain: domain.into(),
            path: path.into(),
        }
    }
}
