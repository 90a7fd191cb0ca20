//! Structural validation of a declaration tree before synthesis.
//!
//! Checks the constraints the convergence engine would otherwise reject at
//! apply time:
//! - logical IDs are well-formed
//! - grant grantees are declared roles; grant targets exist (or are patterns)
//! - routes reference a declared gateway and carry exactly one valid method
//! - outputs have values and unique export names
//! - kind-specific required properties are present

use super::stack::Stack;
use super::types::*;
use std::collections::HashSet;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

fn push(errors: &mut Vec<ValidationError>, message: String) {
    errors.push(ValidationError { message });
}

fn str_prop<'a>(resource: &'a ManifestResource, key: &str) -> Option<&'a str> {
    resource.properties.get(key).and_then(|v| v.as_str())
}

/// Validate a stack. Returns a list of errors (empty = valid).
pub fn validate_stack(stack: &Stack) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if stack.name().is_empty() {
        push(&mut errors, "stack name must not be empty".to_string());
    }

    for (id, resource) in stack.resources() {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            push(&mut errors, format!("malformed logical id '{}'", id));
        }

        match resource.kind {
            ResourceKind::Grant => validate_grant(stack, id, resource, &mut errors),
            ResourceKind::Route => validate_route(stack, id, resource, &mut errors),
            ResourceKind::SearchDomain => {
                if str_prop(resource, "engine_version").is_none_or(str::is_empty) {
                    push(
                        &mut errors,
                        format!("search domain '{}' has no engine version", id),
                    );
                }
            }
            ResourceKind::Function => {
                if str_prop(resource, "entry").is_none_or(str::is_empty) {
                    push(&mut errors, format!("function '{}' has no entry", id));
                }
                if str_prop(resource, "runtime").is_none_or(str::is_empty) {
                    push(&mut errors, format!("function '{}' has no runtime", id));
                }
            }
            ResourceKind::BucketDeployment => {
                if str_prop(resource, "source_path").is_none_or(str::is_empty) {
                    push(
                        &mut errors,
                        format!("bucket deployment '{}' has no source path", id),
                    );
                }
                if str_prop(resource, "destination").is_none_or(str::is_empty) {
                    push(
                        &mut errors,
                        format!("bucket deployment '{}' has no destination", id),
                    );
                }
            }
            ResourceKind::NotebookDomain => {
                if str_prop(resource, "domain_name").is_none_or(str::is_empty) {
                    push(
                        &mut errors,
                        format!("notebook domain '{}' has no domain name", id),
                    );
                }
            }
            _ => {}
        }
    }

    let mut seen_exports = HashSet::new();
    for (id, output) in stack.outputs() {
        if output.value.is_empty() {
            push(&mut errors, format!("output '{}' has an empty value", id));
        }
        if output.export.is_empty() {
            push(&mut errors, format!("output '{}' has no export name", id));
        } else if !seen_exports.insert(output.export.as_str()) {
            push(
                &mut errors,
                format!(
                    "export name '{}' declared more than once in stack '{}'",
                    output.export,
                    stack.name()
                ),
            );
        }
    }

    errors
}

fn validate_grant(
    stack: &Stack,
    id: &str,
    resource: &ManifestResource,
    errors: &mut Vec<ValidationError>,
) {
    match str_prop(resource, "grantee") {
        Some(grantee) => match stack.resources().get(grantee) {
            Some(r) if r.kind == ResourceKind::Role => {}
            Some(_) => push(
                errors,
                format!("grant '{}' grantee '{}' is not a role", id, grantee),
            ),
            None => push(
                errors,
                format!("grant '{}' references unknown grantee '{}'", id, grantee),
            ),
        },
        None => push(errors, format!("grant '{}' has no grantee", id)),
    }

    match str_prop(resource, "target") {
        // Patterns and attribute tokens resolve provider-side
        Some("*") => {}
        Some(target) if target.starts_with("${") => {}
        Some(target) => {
            if !stack.resources().contains_key(target) {
                push(
                    errors,
                    format!("grant '{}' references unknown target '{}'", id, target),
                );
            }
        }
        None => push(errors, format!("grant '{}' has no target", id)),
    }
}

fn validate_route(
    stack: &Stack,
    id: &str,
    resource: &ManifestResource,
    errors: &mut Vec<ValidationError>,
) {
    match str_prop(resource, "api") {
        Some(api) => match stack.resources().get(api) {
            Some(r) if r.kind == ResourceKind::RestApi => {}
            _ => push(
                errors,
                format!("route '{}' references unknown gateway '{}'", id, api),
            ),
        },
        None => push(errors, format!("route '{}' has no gateway", id)),
    }

    if str_prop(resource, "path").is_none_or(str::is_empty) {
        push(errors, format!("route '{}' has no path", id));
    }

    match str_prop(resource, "method") {
        Some(method) if HTTP_METHODS.contains(&method) => {}
        Some(method) => push(
            errors,
            format!("route '{}' has invalid method '{}'", id, method),
        ),
        None => push(errors, format!("route '{}' has no method", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stack::Grant;
    use indexmap::IndexMap;

    fn props(pairs: &[(&str, &str)]) -> IndexMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_valid_stack_passes() {
        let mut stack = Stack::new("test", &Environment::default());
        let role = stack
            .add_resource("role", ResourceKind::Role, IndexMap::new())
            .unwrap();
        let domain = stack
            .add_resource(
                "search",
                ResourceKind::SearchDomain,
                props(&[("engine_version", "OpenSearch_1.2")]),
            )
            .unwrap();
        stack
            .apply_grants(&[Grant::read_write(&domain, &role)])
            .unwrap();
        stack
            .add_output("Host", &domain.attr("endpoint"), "endpoint", "SearchHost")
            .unwrap();

        let errors = validate_stack(&stack);
        assert!(
            errors.is_empty(),
            "unexpected: {:?}",
            errors.iter().map(|e| &e.message).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_grant_unknown_grantee() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource(
                "grant-00",
                ResourceKind::Grant,
                props(&[("grantee", "ghost"), ("target", "*"), ("access", "read")]),
            )
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("unknown grantee")));
    }

    #[test]
    fn test_grant_grantee_must_be_role() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource("bucket", ResourceKind::Bucket, IndexMap::new())
            .unwrap();
        stack
            .add_resource(
                "grant-00",
                ResourceKind::Grant,
                props(&[("grantee", "bucket"), ("target", "*"), ("access", "read")]),
            )
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("is not a role")));
    }

    #[test]
    fn test_grant_unknown_target() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource("role", ResourceKind::Role, IndexMap::new())
            .unwrap();
        stack
            .add_resource(
                "grant-00",
                ResourceKind::Grant,
                props(&[("grantee", "role"), ("target", "ghost"), ("access", "read")]),
            )
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("unknown target")));
    }

    #[test]
    fn test_grant_token_target_allowed() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource("role", ResourceKind::Role, IndexMap::new())
            .unwrap();
        stack
            .add_resource(
                "grant-00",
                ResourceKind::Grant,
                props(&[
                    ("grantee", "role"),
                    ("target", "${fn.arn}"),
                    ("access", "actions"),
                ]),
            )
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_route_invalid_method() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource("api", ResourceKind::RestApi, IndexMap::new())
            .unwrap();
        stack
            .add_resource(
                "r",
                ResourceKind::Route,
                props(&[("api", "api"), ("path", "/x"), ("method", "YEET")]),
            )
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("invalid method")));
    }

    #[test]
    fn test_route_unknown_gateway() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource(
                "r",
                ResourceKind::Route,
                props(&[("api", "ghost"), ("path", "/x"), ("method", "POST")]),
            )
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("unknown gateway")));
    }

    #[test]
    fn test_search_domain_requires_engine_version() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource("search", ResourceKind::SearchDomain, IndexMap::new())
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("engine version")));
    }

    #[test]
    fn test_duplicate_export_within_stack() {
        let mut stack = Stack::new("test", &Environment::default());
        stack.add_output("A", "v", "d", "SameName").unwrap();
        stack.add_output("B", "v", "d", "SameName").unwrap();
        let errors = validate_stack(&stack);
        assert!(errors
            .iter()
            .any(|e| e.message.contains("declared more than once")));
    }

    #[test]
    fn test_malformed_logical_id() {
        let mut stack = Stack::new("test", &Environment::default());
        stack
            .add_resource("bad id!", ResourceKind::Bucket, IndexMap::new())
            .unwrap();
        let errors = validate_stack(&stack);
        assert!(errors.iter().any(|e| e.message.contains("malformed")));
    }
}
