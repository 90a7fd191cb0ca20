//! Managed notebook domain and per-user profiles.

use crate::core::stack::{Ref, Stack};
use crate::core::types::ResourceKind;
use indexmap::IndexMap;
use serde_json::Value;

/// Notebook domain declaration.
#[derive(Debug, Clone)]
pub struct NotebookDomainProps {
    /// Domain name
    pub domain_name: String,

    /// Network ID token from a network lookup
    pub network_id: String,

    /// Subnet IDs token from a network lookup
    pub subnet_ids: String,

    /// Logical ID of the shared execution role
    pub execution_role: String,

    /// Default kernel instance type, e.g. "ml.m5.2xlarge"
    pub default_kernel_instance: String,
}

/// Declare the multi-tenant notebook domain.
pub fn add_notebook_domain(
    stack: &mut Stack,
    logical_id: &str,
    props: &NotebookDomainProps,
) -> Result<Ref, String> {
    let mut map = IndexMap::new();
    map.insert(
        "domain_name".to_string(),
        Value::String(props.domain_name.clone()),
    );
    map.insert(
        "network_id".to_string(),
        Value::String(props.network_id.clone()),
    );
    map.insert(
        "subnet_ids".to_string(),
        Value::String(props.subnet_ids.clone()),
    );
    map.insert(
        "execution_role".to_string(),
        Value::String(props.execution_role.clone()),
    );
    map.insert(
        "default_kernel_instance".to_string(),
        Value::String(props.default_kernel_instance.clone()),
    );
    stack.add_resource(logical_id, ResourceKind::NotebookDomain, map)
}

/// Declare one user profile inside a notebook domain.
pub fn add_user_profile(
    stack: &mut Stack,
    logical_id: &str,
    domain: &Ref,
    profile_name: &str,
) -> Result<Ref, String> {
    let mut props = IndexMap::new();
    props.insert(
        "domain".to_string(),
        Value::String(domain.logical_id.clone()),
    );
    props.insert(
        "profile_name".to_string(),
        Value::String(profile_name.to_string()),
    );
    stack.add_resource(logical_id, ResourceKind::UserProfile, props)
}

/// Token for the domain's provider-assigned ID.
pub fn domain_id(domain: &Ref) -> String {
    domain.attr("domain_id")
}

/// Token for a user profile's ARN.
pub fn profile_arn(profile: &Ref) -> String {
    profile.attr("arn")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Environment;

    fn domain_props() -> NotebookDomainProps {
        NotebookDomainProps {
            domain_name: "DomainForSagemakerStudio".to_string(),
            network_id: "${network.network_id}".to_string(),
            subnet_ids: "${network.public_subnet_ids}".to_string(),
            execution_role: "notebook-role".to_string(),
            default_kernel_instance: "ml.m5.2xlarge".to_string(),
        }
    }

    #[test]
    fn test_notebook_domain_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let domain = add_notebook_domain(&mut stack, "notebook", &domain_props()).unwrap();

        let resource = &stack.resources()["notebook"];
        assert_eq!(resource.kind, ResourceKind::NotebookDomain);
        assert_eq!(resource.properties["domain_name"], "DomainForSagemakerStudio");
        assert_eq!(resource.properties["default_kernel_instance"], "ml.m5.2xlarge");
        assert_eq!(domain_id(&domain), "${notebook.domain_id}");
    }

    #[test]
    fn test_user_profile_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let domain = add_notebook_domain(&mut stack, "notebook", &domain_props()).unwrap();
        let profile = add_user_profile(&mut stack, "user-ml-engineer-1", &domain, "ml-engineer-1")
            .unwrap();

        let resource = &stack.resources()["user-ml-engineer-1"];
        assert_eq!(resource.kind, ResourceKind::UserProfile);
        assert_eq!(resource.properties["domain"], "notebook");
        assert_eq!(resource.properties["profile_name"], "ml-engineer-1");
        assert_eq!(profile_arn(&profile), "${user-ml-engineer-1.arn}");
    }
}
