//! Network boundary reference — an existing network partition.
//!
//! Looked up by explicit ID or by the account's default partition. Never
//! created or destroyed by this crate; the lookup only places resources.

use crate::core::stack::{Ref, Stack};
use crate::core::types::{DeployContext, ResourceKind};
use indexmap::IndexMap;
use serde_json::Value;

/// Declare a network lookup. With an explicit ID from context the lookup is
/// pinned; otherwise the default partition is resolved at deploy time.
pub fn add_network_lookup(
    stack: &mut Stack,
    logical_id: &str,
    ctx: &DeployContext,
) -> Result<Ref, String> {
    let mut props = IndexMap::new();
    match &ctx.existing_network_id {
        Some(id) => {
            props.insert("lookup".to_string(), Value::String("by_id".to_string()));
            props.insert("network_id".to_string(), Value::String(id.clone()));
        }
        None => {
            props.insert("lookup".to_string(), Value::String("default".to_string()));
        }
    }
    stack.add_resource(logical_id, ResourceKind::NetworkLookup, props)
}

/// Token for the resolved network ID.
pub fn network_id(network: &Ref) -> String {
    network.attr("network_id")
}

/// Token for the resolved public subnet IDs.
pub fn public_subnet_ids(network: &Ref) -> String {
    network.attr("public_subnet_ids")
}
