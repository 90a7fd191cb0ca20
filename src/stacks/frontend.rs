//! Frontend stack — deploys the built static site into the hosting bucket
//! exported by the backend stack.

use crate::core::stack::Stack;
use crate::core::types::Environment;
use crate::resources::bucket;
use crate::stacks::FRONTEND_STACK_NAME;

/// Built static-site bundle uploaded at apply time.
pub const FRONTEND_BUILD_DIR: &str = "./frontend/build";

/// Export name the hosting bucket is imported by.
pub const HOSTING_BUCKET_EXPORT: &str = "S3HostingBucket";

/// Build the frontend stack for the given target.
pub fn frontend_stack(env: &Environment) -> Result<Stack, String> {
    let mut stack = Stack::new(FRONTEND_STACK_NAME, env);

    let hosting =
        bucket::add_imported_bucket(&mut stack, "hosting-bucket-import", HOSTING_BUCKET_EXPORT)?;
    bucket::add_bucket_deployment(
        &mut stack,
        "deploy-frontend-site",
        &bucket::DeploymentProps {
            source_path: FRONTEND_BUILD_DIR.to_string(),
            destination: hosting.logical_id.clone(),
            memory_limit_mb: 1024,
        },
    )?;

    Ok(stack)
}
