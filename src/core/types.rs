//! Manifest schema types.
//!
//! Defines the deployment environment, the resource kinds trazado can
//! declare, and the manifest emitted by synthesis. All types derive
//! Serialize/Deserialize for JSON/YAML roundtripping and JsonSchema for the
//! `schema` subcommand.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Manifest schema version emitted by this crate.
pub const MANIFEST_SCHEMA: &str = "1.0";

// ============================================================================
// Deployment target
// ============================================================================

/// Deployment target account/region. Both optional — an environment-agnostic
/// manifest can be synthesized and deployed anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Environment {
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

impl Environment {
    /// Read the target from `TRAZADO_DEPLOY_ACCOUNT` / `TRAZADO_DEPLOY_REGION`.
    pub fn from_env() -> Self {
        Self {
            account: std::env::var("TRAZADO_DEPLOY_ACCOUNT").ok(),
            region: std::env::var("TRAZADO_DEPLOY_REGION").ok(),
        }
    }
}

/// Context parameters supplied at synthesis time.
#[derive(Debug, Clone, Default)]
pub struct DeployContext {
    /// Existing network partition to place the notebook domain in.
    /// None means look up the account's default partition.
    pub existing_network_id: Option<String>,
}

// ============================================================================
// Resources
// ============================================================================

/// Resource kind enum — every kind of managed resource a stack can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    NetworkLookup,
    Role,
    Grant,
    SearchDomain,
    Bucket,
    BucketDeployment,
    Function,
    RestApi,
    Route,
    NotebookDomain,
    UserProfile,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkLookup => write!(f, "network_lookup"),
            Self::Role => write!(f, "role"),
            Self::Grant => write!(f, "grant"),
            Self::SearchDomain => write!(f, "search_domain"),
            Self::Bucket => write!(f, "bucket"),
            Self::BucketDeployment => write!(f, "bucket_deployment"),
            Self::Function => write!(f, "function"),
            Self::RestApi => write!(f, "rest_api"),
            Self::Route => write!(f, "route"),
            Self::NotebookDomain => write!(f, "notebook_domain"),
            Self::UserProfile => write!(f, "user_profile"),
        }
    }
}

/// A declared resource as it appears in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ManifestResource {
    /// Resource kind
    pub kind: ResourceKind,

    /// Kind-specific properties (order-preserving)
    #[serde(default)]
    pub properties: IndexMap<String, serde_json::Value>,
}

// ============================================================================
// Outputs
// ============================================================================

/// A stack output published under a cross-stack export name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutputEntry {
    /// Output value — usually an attribute token resolved at deploy time
    pub value: String,

    /// Human-readable description
    pub description: String,

    /// Export name other stacks import this value by.
    /// Must be unique across the whole deployment.
    pub export: String,
}

// ============================================================================
// Manifest
// ============================================================================

/// The synthesized manifest for one stack — the declared desired state
/// handed to the provider's convergence engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    /// Schema version (must be "1.0")
    pub schema: String,

    /// Stack name
    pub stack: String,

    /// Deployment target
    #[serde(default)]
    pub env: Environment,

    /// Declared resources, in declaration order
    pub resources: IndexMap<String, ManifestResource>,

    /// Published outputs, in declaration order
    #[serde(default)]
    pub outputs: IndexMap<String, OutputEntry>,
}

impl Manifest {
    /// Count resources of a given kind.
    pub fn count_kind(&self, kind: ResourceKind) -> usize {
        self.resources.values().filter(|r| r.kind == kind).count()
    }

    /// Iterate over resources of a given kind.
    pub fn of_kind(
        &self,
        kind: ResourceKind,
    ) -> impl Iterator<Item = (&String, &ManifestResource)> {
        self.resources.iter().filter(move |(_, r)| r.kind == kind)
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Deploy-time attribute placeholder: `${logical-id.attr}`.
pub fn attr_token(logical_id: &str, attr: &str) -> String {
    format!("${{{}.{}}}", logical_id, attr)
}

/// Cross-stack import placeholder: `${import:ExportName}`.
pub fn import_token(export_name: &str) -> String {
    format!("${{import:{}}}", export_name)
}

/// Extract the export name from an import token, if the string is one.
pub fn parse_import_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("${import:")
        .and_then(|rest| rest.strip_suffix('}'))
}

// ============================================================================
// Tests
// ============================================================================
