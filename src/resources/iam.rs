//! IAM service roles.
//!
//! Roles are declared with their managed policies up front; narrower
//! permissions arrive through the stack's assembled grant list, never by
//! mutating the role afterward.

use crate::core::stack::{Ref, Stack};
use crate::core::types::ResourceKind;
use indexmap::IndexMap;
use serde_json::Value;

/// Service role declaration.
#[derive(Debug, Clone)]
pub struct RoleProps {
    /// Service principal allowed to assume the role
    pub assumed_by: String,

    /// Fixed role name; None lets the provider generate one
    pub role_name: Option<String>,

    /// Managed policy ARNs attached at creation
    pub managed_policies: Vec<String>,
}

/// Declare a service role.
pub fn add_service_role(
    stack: &mut Stack,
    logical_id: &str,
    props: &RoleProps,
) -> Result<Ref, String> {
    let mut map = IndexMap::new();
    map.insert(
        "assumed_by".to_string(),
        Value::String(props.assumed_by.clone()),
    );
    if let Some(name) = &props.role_name {
        map.insert("role_name".to_string(), Value::String(name.clone()));
    }
    if !props.managed_policies.is_empty() {
        map.insert(
            "managed_policies".to_string(),
            Value::Array(
                props
                    .managed_policies
                    .iter()
                    .map(|p| Value::String(p.clone()))
                    .collect(),
            ),
        );
    }
    stack.add_resource(logical_id, ResourceKind::Role, map)
}

/// Token for the role's provider-assigned ARN.
pub fn role_arn(role: &Ref) -> String {
    role.attr("arn")
}
