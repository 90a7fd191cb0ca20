//! Serverless function packaged from a local source directory.

use crate::core::stack::{Ref, Stack};
use crate::core::types::ResourceKind;
use indexmap::IndexMap;
use serde_json::Value;

/// Function declaration.
#[derive(Debug, Clone)]
pub struct FunctionProps {
    /// Local source directory (opaque to this crate)
    pub entry: String,

    /// Runtime name, e.g. "python3.8"
    pub runtime: String,

    /// Environment variables, order-preserving
    pub environment: IndexMap<String, String>,

    /// Logical ID of the execution role
    pub role: String,
}

/// Declare a serverless function.
pub fn add_function(
    stack: &mut Stack,
    logical_id: &str,
    props: &FunctionProps,
) -> Result<Ref, String> {
    let mut map = IndexMap::new();
    map.insert("entry".to_string(), Value::String(props.entry.clone()));
    map.insert("runtime".to_string(), Value::String(props.runtime.clone()));
    map.insert(
        "environment".to_string(),
        Value::Object(
            props
                .environment
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        ),
    );
    map.insert("role".to_string(), Value::String(props.role.clone()));
    stack.add_resource(logical_id, ResourceKind::Function, map)
}

/// Token for the function's provider-assigned ARN.
pub fn function_arn(function: &Ref) -> String {
    function.attr("arn")
}
