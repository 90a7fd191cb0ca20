//! Managed search cluster.

use crate::core::stack::{Ref, Stack};
use crate::core::types::ResourceKind;
use indexmap::IndexMap;
use serde_json::Value;

/// Search domain declaration.
#[derive(Debug, Clone)]
pub struct SearchDomainProps {
    /// Engine version string, e.g. "OpenSearch_1.2"
    pub engine_version: String,

    /// Allow in-place engine upgrades
    pub enable_version_upgrade: bool,
}

/// Declare a managed search domain.
pub fn add_search_domain(
    stack: &mut Stack,
    logical_id: &str,
    props: &SearchDomainProps,
) -> Result<Ref, String> {
    let mut map = IndexMap::new();
    map.insert(
        "engine_version".to_string(),
        Value::String(props.engine_version.clone()),
    );
    map.insert(
        "enable_version_upgrade".to_string(),
        Value::Bool(props.enable_version_upgrade),
    );
    stack.add_resource(logical_id, ResourceKind::SearchDomain, map)
}

/// Token for the cluster's HTTPS endpoint.
pub fn endpoint(domain: &Ref) -> String {
    domain.attr("endpoint")
}

/// Token for the cluster's provider-assigned name.
pub fn domain_name(domain: &Ref) -> String {
    domain.attr("domain_name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Environment;

    #[test]
    fn test_search_domain_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let domain = add_search_domain(
            &mut stack,
            "search",
            &SearchDomainProps {
                engine_version: "OpenSearch_1.2".to_string(),
                enable_version_upgrade: true,
            },
        )
        .unwrap();

        let resource = &stack.resources()["search"];
        assert_eq!(resource.kind, ResourceKind::SearchDomain);
        assert_eq!(resource.properties["engine_version"], "OpenSearch_1.2");
        assert_eq!(resource.properties["enable_version_upgrade"], true);
        assert_eq!(endpoint(&domain), "${search.endpoint}");
        assert_eq!(domain_name(&domain), "${search.domain_name}");
    }
}
