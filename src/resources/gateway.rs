//! REST gateway fronting a serverless function.

use crate::core::stack::{Ref, Stack};
use crate::core::types::ResourceKind;
use indexmap::IndexMap;
use serde_json::Value;

/// Preflight headers permitted when none are specified explicitly.
pub const DEFAULT_HEADERS: &[&str] = &[
    "Content-Type",
    "X-Amz-Date",
    "Authorization",
    "X-Api-Key",
    "X-Amz-Security-Token",
];

/// Cross-origin resource sharing configuration for the gateway.
#[derive(Debug, Clone)]
pub struct CorsOptions {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

impl CorsOptions {
    /// Any origin, any method, default headers.
    pub fn open() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: vec!["*".to_string()],
            allow_headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
}

/// Declare a REST gateway dispatching every route to one handler function.
pub fn add_rest_api(
    stack: &mut Stack,
    logical_id: &str,
    handler: &Ref,
    cors: &CorsOptions,
) -> Result<Ref, String> {
    let mut props = IndexMap::new();
    props.insert(
        "handler".to_string(),
        Value::String(handler.logical_id.clone()),
    );

    let mut cors_map = serde_json::Map::new();
    cors_map.insert("allow_origins".to_string(), string_array(&cors.allow_origins));
    cors_map.insert("allow_methods".to_string(), string_array(&cors.allow_methods));
    cors_map.insert("allow_headers".to_string(), string_array(&cors.allow_headers));
    props.insert("cors".to_string(), Value::Object(cors_map));

    stack.add_resource(logical_id, ResourceKind::RestApi, props)
}

/// Declare a route on a gateway. One method per route.
pub fn add_route(
    stack: &mut Stack,
    logical_id: &str,
    api: &Ref,
    path: &str,
    method: &str,
) -> Result<Ref, String> {
    let mut props = IndexMap::new();
    props.insert("api".to_string(), Value::String(api.logical_id.clone()));
    props.insert("path".to_string(), Value::String(path.to_string()));
    props.insert("method".to_string(), Value::String(method.to_string()));
    stack.add_resource(logical_id, ResourceKind::Route, props)
}

/// Token for the gateway's base URL.
pub fn api_url(api: &Ref) -> String {
    api.attr("url")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Environment;

    #[test]
    fn test_open_cors() {
        let cors = CorsOptions::open();
        assert_eq!(cors.allow_origins, vec!["*"]);
        assert_eq!(cors.allow_methods, vec!["*"]);
        assert_eq!(cors.allow_headers.len(), DEFAULT_HEADERS.len());
    }

    #[test]
    fn test_rest_api_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let handler = stack
            .add_resource("backend-fn", ResourceKind::Function, IndexMap::new())
            .unwrap();
        let api = add_rest_api(&mut stack, "api", &handler, &CorsOptions::open()).unwrap();

        let resource = &stack.resources()["api"];
        assert_eq!(resource.properties["handler"], "backend-fn");
        assert_eq!(resource.properties["cors"]["allow_origins"][0], "*");
        assert_eq!(api_url(&api), "${api.url}");
    }

    #[test]
    fn test_route_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let handler = stack
            .add_resource("backend-fn", ResourceKind::Function, IndexMap::new())
            .unwrap();
        let api = add_rest_api(&mut stack, "api", &handler, &CorsOptions::open()).unwrap();
        add_route(&mut stack, "post-url", &api, "/postURL", "POST").unwrap();

        let resource = &stack.resources()["post-url"];
        assert_eq!(resource.kind, ResourceKind::Route);
        assert_eq!(resource.properties["api"], "api");
        assert_eq!(resource.properties["path"], "/postURL");
        assert_eq!(resource.properties["method"], "POST");
    }
}
