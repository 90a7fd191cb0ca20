//! Synthesis — turn a declaration tree into a deterministic manifest.
//!
//! The pass is pure: no timestamps, no random identifiers, no filesystem.
//! Identical inputs produce byte-identical manifests.

use super::stack::Stack;
use super::types::*;
use super::validate;
use indexmap::IndexMap;

/// Registry of export names published by already-synthesized stacks,
/// mapped to the exporting stack's name.
pub type ExportRegistry = IndexMap<String, String>;

/// Synthesize one stack against the exports published so far.
pub fn synthesize(stack: &Stack, registry: &ExportRegistry) -> Result<Manifest, String> {
    let errors = validate::validate_stack(stack);
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
        return Err(format!(
            "stack '{}' failed validation: {}",
            stack.name(),
            messages.join("; ")
        ));
    }

    for import in stack.imports() {
        if !registry.contains_key(import) {
            return Err(format!(
                "stack '{}' imports '{}' but no earlier stack exports it",
                stack.name(),
                import
            ));
        }
    }

    Ok(Manifest {
        schema: MANIFEST_SCHEMA.to_string(),
        stack: stack.name().to_string(),
        env: stack.env().clone(),
        resources: stack.resources().clone(),
        outputs: stack.outputs().clone(),
    })
}

/// Register a stack's exports. Export names are unique across the whole
/// deployment; a collision is a synthesis-time failure.
pub fn register_exports(stack: &Stack, registry: &mut ExportRegistry) -> Result<(), String> {
    for output in stack.outputs().values() {
        if let Some(owner) = registry.get(&output.export) {
            return Err(format!(
                "export name '{}' from stack '{}' collides with stack '{}'",
                output.export,
                stack.name(),
                owner
            ));
        }
        registry.insert(output.export.clone(), stack.name().to_string());
    }
    Ok(())
}

/// Render a manifest as pretty-printed JSON with a trailing newline.
pub fn render_json(manifest: &Manifest) -> Result<String, String> {
    serde_json::to_string_pretty(manifest)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| format!("manifest serialize error: {}", e))
}

/// Render a manifest as YAML.
pub fn render_yaml(manifest: &Manifest) -> Result<String, String> {
    serde_yaml_ng::to_string(manifest).map_err(|e| format!("manifest serialize error: {}", e))
}

/// BLAKE3 digest of the canonical (compact JSON) manifest encoding.
pub fn manifest_hash(manifest: &Manifest) -> Result<String, String> {
    let canonical =
        serde_json::to_string(manifest).map_err(|e| format!("manifest serialize error: {}", e))?;
    Ok(format!(
        "blake3:{}",
        blake3::hash(canonical.as_bytes()).to_hex()
    ))
}
