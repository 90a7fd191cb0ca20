//! Backend data-platform stack.
//!
//! Declares the search cluster, the training and hosting buckets, the
//! similarity-search function behind a REST gateway, and the notebook
//! domain with one user profile per roster entry. All permissions are
//! assembled into a single grant list and applied in one pass.

use crate::core::stack::{Grant, Stack};
use crate::core::types::{DeployContext, Environment};
use crate::resources::{bucket, function, gateway, iam, network, notebook, search};
use crate::stacks::BACKEND_STACK_NAME;
use indexmap::IndexMap;

/// Notebook users provisioned by default.
pub const DEFAULT_ROSTER: &[&str] = &["ml-engineer-1"];

/// Search engine version pinned by this topology.
pub const SEARCH_ENGINE_VERSION: &str = "OpenSearch_1.2";

/// Notebook domain name.
pub const NOTEBOOK_DOMAIN_NAME: &str = "DomainForSagemakerStudio";

/// Asset directory with sample training data.
pub const TRAINING_DATA_DIR: &str = "./training_data";

/// Source directory of the similarity-search function.
pub const FUNCTION_SOURCE_DIR: &str = "./backend";

const SAGEMAKER_FULL_ACCESS: &str = "arn:aws:iam::aws:policy/AmazonSageMakerFullAccess";
const CLOUDFORMATION_READ_ONLY: &str = "arn:aws:iam::aws:policy/AWSCloudFormationReadOnlyAccess";

/// Build the backend stack for the given target, context, and user roster.
pub fn backend_stack(
    env: &Environment,
    ctx: &DeployContext,
    roster: &[&str],
) -> Result<Stack, String> {
    let mut stack = Stack::new(BACKEND_STACK_NAME, env);

    // Shared role assumed by the notebook service. Broad managed policies
    // here; everything narrower goes through the grant list below.
    let notebook_role = iam::add_service_role(
        &mut stack,
        "notebook-role",
        &iam::RoleProps {
            assumed_by: "sagemaker.amazonaws.com".to_string(),
            role_name: Some("RoleSagemakerStudioUsers".to_string()),
            managed_policies: vec![
                SAGEMAKER_FULL_ACCESS.to_string(),
                CLOUDFORMATION_READ_ONLY.to_string(),
            ],
        },
    )?;

    let net = network::add_network_lookup(&mut stack, "network", ctx)?;

    let search_domain = search::add_search_domain(
        &mut stack,
        "search-domain",
        &search::SearchDomainProps {
            engine_version: SEARCH_ENGINE_VERSION.to_string(),
            enable_version_upgrade: true,
        },
    )?;
    stack.add_output(
        "OpenSearchHostName",
        &search::endpoint(&search_domain),
        "OpenSearch hostname",
        "OpenSearchHostName",
    )?;
    stack.add_output(
        "OpenSearchDomainName",
        &search::domain_name(&search_domain),
        "OpenSearch domain name",
        "OpenSearchDomainName",
    )?;

    let training_bucket = bucket::add_bucket(&mut stack, "training-bucket")?;
    bucket::add_bucket_deployment(
        &mut stack,
        "deploy-training-data",
        &bucket::DeploymentProps {
            source_path: TRAINING_DATA_DIR.to_string(),
            destination: training_bucket.logical_id.clone(),
            memory_limit_mb: 1024,
        },
    )?;

    let hosting_bucket = bucket::add_website_bucket(
        &mut stack,
        "hosting-bucket",
        &bucket::WebsiteConfig {
            index_document: "index.html".to_string(),
            error_document: "error.html".to_string(),
        },
        true,
    )?;

    stack.add_output(
        "S3TrainingBucket",
        &bucket::bucket_name(&training_bucket),
        "S3 training bucket name",
        "S3TrainingBucket",
    )?;
    stack.add_output(
        "S3HostingBucket",
        &bucket::bucket_name(&hosting_bucket),
        "S3 hosting bucket name",
        "S3HostingBucket",
    )?;
    stack.add_output(
        "S3WebsiteURL",
        &bucket::website_url(&hosting_bucket),
        "S3 hosting bucket website url",
        "S3WebsiteURL",
    )?;

    let fn_role = iam::add_service_role(
        &mut stack,
        "backend-fn-role",
        &iam::RoleProps {
            assumed_by: "lambda.amazonaws.com".to_string(),
            role_name: None,
            managed_policies: Vec::new(),
        },
    )?;

    // SM_ENDPOINT stays empty until an inference endpoint is provisioned by
    // a separate process; the notebook role holds the update permission.
    let mut fn_env = IndexMap::new();
    fn_env.insert("OSS_ENDPOINT".to_string(), search::endpoint(&search_domain));
    fn_env.insert("SM_ENDPOINT".to_string(), String::new());

    let backend_fn = function::add_function(
        &mut stack,
        "backend-fn",
        &function::FunctionProps {
            entry: FUNCTION_SOURCE_DIR.to_string(),
            runtime: "python3.8".to_string(),
            environment: fn_env,
            role: fn_role.logical_id.clone(),
        },
    )?;
    stack.add_output(
        "PostFetchSimilarPhotosLambda",
        &function::function_arn(&backend_fn),
        "Lambda function to fetch similar photos",
        "PostFetchSimilarPhotosLambda",
    )?;
    stack.add_output(
        "PostFetchSimilarPhotosLambdaIamRole",
        &iam::role_arn(&fn_role),
        "IAM role assumed by PostFetchSimilarPhotosLambda",
        "PostFetchSimilarPhotosLambdaIamRole",
    )?;

    let api = gateway::add_rest_api(
        &mut stack,
        "similarity-api",
        &backend_fn,
        &gateway::CorsOptions::open(),
    )?;
    gateway::add_route(&mut stack, "post-url", &api, "/postURL", "POST")?;
    gateway::add_route(&mut stack, "post-image", &api, "/postImage", "POST")?;
    stack.add_output(
        "ImageSimilarityApi",
        &gateway::api_url(&api),
        "Gateway endpoint URL for the similarity function",
        "ImageSimilarityApi",
    )?;

    let notebook_domain = notebook::add_notebook_domain(
        &mut stack,
        "notebook-domain",
        &notebook::NotebookDomainProps {
            domain_name: NOTEBOOK_DOMAIN_NAME.to_string(),
            network_id: network::network_id(&net),
            subnet_ids: network::public_subnet_ids(&net),
            execution_role: notebook_role.logical_id.clone(),
            default_kernel_instance: "ml.m5.2xlarge".to_string(),
        },
    )?;
    stack.add_output(
        "DomainIdSagemaker",
        &notebook::domain_id(&notebook_domain),
        "The notebook domain ID",
        "DomainIdSagemaker",
    )?;

    for name in roster {
        let profile_id = format!("user-{}", name);
        let profile =
            notebook::add_user_profile(&mut stack, &profile_id, &notebook_domain, name)?;
        let export = format!("UserArn{}", name);
        stack.add_output(
            &export,
            &notebook::profile_arn(&profile),
            "The user profile ARN",
            &export,
        )?;
    }

    // The complete permission set, assembled once. Accumulation is
    // monotonic: nothing later removes an entry.
    let grants = vec![
        Grant::read_write(&search_domain, &notebook_role),
        Grant::read_write(&training_bucket, &notebook_role),
        Grant::read_write(&hosting_bucket, &notebook_role),
        Grant::actions(&fn_role, &["sagemaker:InvokeEndpoint"], "*"),
        Grant::read_write(&search_domain, &fn_role),
        Grant::read(&training_bucket, &fn_role),
        Grant::actions(
            &notebook_role,
            &["lambda:UpdateFunctionConfiguration"],
            &function::function_arn(&backend_fn),
        ),
    ];
    stack.apply_grants(&grants)?;

    Ok(stack)
}
