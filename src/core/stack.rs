//! Stack builder — the in-memory declaration tree.
//!
//! A `Stack` accumulates resource declarations, outputs, and cross-stack
//! imports in declaration order. Permission grants are assembled as one
//! explicit list and applied in a single pass (`apply_grants`) so the
//! permission set is auditable and reproducible; grants only accumulate,
//! there is no revocation path.

use super::types::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Handle to a declared resource, used to wire grants and attribute tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ref {
    pub logical_id: String,
    pub kind: ResourceKind,
}

impl Ref {
    /// Deploy-time attribute token for this resource.
    pub fn attr(&self, name: &str) -> String {
        attr_token(&self.logical_id, name)
    }
}

// ============================================================================
// Grants
// ============================================================================

/// Access level of a grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantAccess {
    /// Provider-expanded read actions on the target resource
    Read,
    /// Provider-expanded read and write actions on the target resource
    ReadWrite,
    /// Explicit action list against a target resource or pattern
    Actions,
}

impl GrantAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ReadWrite => "read_write",
            Self::Actions => "actions",
        }
    }
}

/// One permission edge: grantee role → target resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Logical ID of the role receiving the permission
    pub grantee: String,

    /// Logical ID of the target resource, or a pattern ("*" / attribute token)
    pub target: String,

    /// Access level
    pub access: GrantAccess,

    /// Explicit actions (only for `GrantAccess::Actions`)
    pub actions: Vec<String>,
}

impl Grant {
    /// Read access on a declared resource.
    pub fn read(target: &Ref, grantee: &Ref) -> Self {
        Self {
            grantee: grantee.logical_id.clone(),
            target: target.logical_id.clone(),
            access: GrantAccess::Read,
            actions: Vec::new(),
        }
    }

    /// Read/write access on a declared resource.
    pub fn read_write(target: &Ref, grantee: &Ref) -> Self {
        Self {
            grantee: grantee.logical_id.clone(),
            target: target.logical_id.clone(),
            access: GrantAccess::ReadWrite,
            actions: Vec::new(),
        }
    }

    /// Explicit named actions against a target pattern.
    pub fn actions(grantee: &Ref, actions: &[&str], target: &str) -> Self {
        Self {
            grantee: grantee.logical_id.clone(),
            target: target.to_string(),
            access: GrantAccess::Actions,
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

// ============================================================================
// Stack
// ============================================================================

/// A deployment unit under construction.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: Environment,
    resources: IndexMap<String, ManifestResource>,
    outputs: IndexMap<String, OutputEntry>,
    imports: Vec<String>,
}

impl Stack {
    pub fn new(name: &str, env: &Environment) -> Self {
        Self {
            name: name.to_string(),
            env: env.clone(),
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
            imports: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn resources(&self) -> &IndexMap<String, ManifestResource> {
        &self.resources
    }

    pub fn outputs(&self) -> &IndexMap<String, OutputEntry> {
        &self.outputs
    }

    /// Export names this stack imports from earlier stacks.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Declare a resource. Logical IDs are unique within a stack.
    pub fn add_resource(
        &mut self,
        logical_id: &str,
        kind: ResourceKind,
        properties: IndexMap<String, serde_json::Value>,
    ) -> Result<Ref, String> {
        if self.resources.contains_key(logical_id) {
            return Err(format!(
                "stack '{}': duplicate logical id '{}'",
                self.name, logical_id
            ));
        }
        self.resources
            .insert(logical_id.to_string(), ManifestResource { kind, properties });
        Ok(Ref {
            logical_id: logical_id.to_string(),
            kind,
        })
    }

    /// Publish an output under a cross-stack export name.
    pub fn add_output(
        &mut self,
        id: &str,
        value: &str,
        description: &str,
        export: &str,
    ) -> Result<(), String> {
        if self.outputs.contains_key(id) {
            return Err(format!("stack '{}': duplicate output '{}'", self.name, id));
        }
        self.outputs.insert(
            id.to_string(),
            OutputEntry {
                value: value.to_string(),
                description: description.to_string(),
                export: export.to_string(),
            },
        );
        Ok(())
    }

    /// Reference a value exported by an earlier stack. Records the
    /// dependency and returns the import token; resolution happens at
    /// synthesis against the export registry.
    pub fn import_value(&mut self, export_name: &str) -> String {
        let name = export_name.to_string();
        if !self.imports.contains(&name) {
            self.imports.push(name);
        }
        import_token(export_name)
    }

    /// Apply an assembled grant list in one pass. Each grant becomes a
    /// `grant` resource; the list order is preserved in the manifest.
    pub fn apply_grants(&mut self, grants: &[Grant]) -> Result<Vec<Ref>, String> {
        let mut refs = Vec::with_capacity(grants.len());
        for (i, grant) in grants.iter().enumerate() {
            let mut props = IndexMap::new();
            props.insert(
                "grantee".to_string(),
                serde_json::Value::String(grant.grantee.clone()),
            );
            props.insert(
                "target".to_string(),
                serde_json::Value::String(grant.target.clone()),
            );
            props.insert(
                "access".to_string(),
                serde_json::Value::String(grant.access.as_str().to_string()),
            );
            if !grant.actions.is_empty() {
                props.insert(
                    "actions".to_string(),
                    serde_json::Value::Array(
                        grant
                            .actions
                            .iter()
                            .map(|a| serde_json::Value::String(a.clone()))
                            .collect(),
                    ),
                );
            }
            let id = format!("grant-{:02}", i);
            refs.push(self.add_resource(&id, ResourceKind::Grant, props)?);
        }
        Ok(refs)
    }
}
