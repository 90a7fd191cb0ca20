//! Object-storage buckets and asset deployments into them.

use crate::core::stack::{Ref, Stack};
use crate::core::types::ResourceKind;
use indexmap::IndexMap;
use serde_json::Value;

/// Static-website hosting configuration.
#[derive(Debug, Clone)]
pub struct WebsiteConfig {
    pub index_document: String,
    pub error_document: String,
}

/// Declare a plain bucket.
pub fn add_bucket(stack: &mut Stack, logical_id: &str) -> Result<Ref, String> {
    stack.add_resource(logical_id, ResourceKind::Bucket, IndexMap::new())
}

/// Declare a bucket configured for public static-website hosting.
pub fn add_website_bucket(
    stack: &mut Stack,
    logical_id: &str,
    website: &WebsiteConfig,
    public_read: bool,
) -> Result<Ref, String> {
    let mut props = IndexMap::new();
    props.insert(
        "website_index_document".to_string(),
        Value::String(website.index_document.clone()),
    );
    props.insert(
        "website_error_document".to_string(),
        Value::String(website.error_document.clone()),
    );
    props.insert("public_read_access".to_string(), Value::Bool(public_read));
    stack.add_resource(logical_id, ResourceKind::Bucket, props)
}

/// Reference a bucket exported by an earlier stack. The destination is the
/// import token; the exporting stack must already be deployed.
pub fn add_imported_bucket(
    stack: &mut Stack,
    logical_id: &str,
    export_name: &str,
) -> Result<Ref, String> {
    let token = stack.import_value(export_name);
    let mut props = IndexMap::new();
    props.insert("import".to_string(), Value::String(token));
    stack.add_resource(logical_id, ResourceKind::Bucket, props)
}

/// Asset deployment into a bucket.
#[derive(Debug, Clone)]
pub struct DeploymentProps {
    /// Local directory uploaded at apply time (opaque to this crate)
    pub source_path: String,

    /// Destination bucket logical ID or import token
    pub destination: String,

    /// Memory limit for the provider-side copy job, in MiB
    pub memory_limit_mb: u32,
}

/// Declare an asset deployment.
pub fn add_bucket_deployment(
    stack: &mut Stack,
    logical_id: &str,
    props: &DeploymentProps,
) -> Result<Ref, String> {
    let mut map = IndexMap::new();
    map.insert(
        "source_path".to_string(),
        Value::String(props.source_path.clone()),
    );
    map.insert(
        "destination".to_string(),
        Value::String(props.destination.clone()),
    );
    map.insert(
        "memory_limit_mb".to_string(),
        Value::Number(props.memory_limit_mb.into()),
    );
    stack.add_resource(logical_id, ResourceKind::BucketDeployment, map)
}

/// Token for the bucket's provider-assigned name.
pub fn bucket_name(bucket: &Ref) -> String {
    bucket.attr("name")
}

/// Token for the bucket's website URL (website buckets only).
pub fn website_url(bucket: &Ref) -> String {
    bucket.attr("website_url")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Environment;

    #[test]
    fn test_plain_bucket_has_no_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let bucket = add_bucket(&mut stack, "data").unwrap();
        assert!(stack.resources()["data"].properties.is_empty());
        assert_eq!(bucket_name(&bucket), "${data.name}");
    }

    #[test]
    fn test_website_bucket_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        let bucket = add_website_bucket(
            &mut stack,
            "hosting",
            &WebsiteConfig {
                index_document: "index.html".to_string(),
                error_document: "error.html".to_string(),
            },
            true,
        )
        .unwrap();

        let resource = &stack.resources()["hosting"];
        assert_eq!(resource.properties["website_index_document"], "index.html");
        assert_eq!(resource.properties["website_error_document"], "error.html");
        assert_eq!(resource.properties["public_read_access"], true);
        assert_eq!(website_url(&bucket), "${hosting.website_url}");
    }

    #[test]
    fn test_imported_bucket_records_import() {
        let mut stack = Stack::new("test", &Environment::default());
        add_imported_bucket(&mut stack, "imported", "S3HostingBucket").unwrap();
        assert_eq!(stack.imports(), &["S3HostingBucket".to_string()]);
        assert_eq!(
            stack.resources()["imported"].properties["import"],
            "${import:S3HostingBucket}"
        );
    }

    #[test]
    fn test_bucket_deployment_properties() {
        let mut stack = Stack::new("test", &Environment::default());
        add_bucket_deployment(
            &mut stack,
            "deploy",
            &DeploymentProps {
                source_path: "./training_data".to_string(),
                destination: "data".to_string(),
                memory_limit_mb: 1024,
            },
        )
        .unwrap();

        let resource = &stack.resources()["deploy"];
        assert_eq!(resource.kind, ResourceKind::BucketDeployment);
        assert_eq!(resource.properties["source_path"], "./training_data");
        assert_eq!(resource.properties["memory_limit_mb"], 1024);
    }
}
