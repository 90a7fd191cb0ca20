//! App — an ordered collection of stacks sharing one export registry.
//!
//! Stacks synthesize in declaration order. A stack may import only what an
//! earlier stack exported, which is how the backend-before-frontend ordering
//! dependency is expressed: omit the backend and the frontend's import fails.

use super::stack::Stack;
use super::synth::{self, ExportRegistry};
use super::types::Manifest;

/// An ordered set of deployment units.
#[derive(Debug, Default)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack. Declaration order is deployment order.
    pub fn add_stack(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Synthesize every stack in order, threading the export registry
    /// through so later stacks can resolve imports.
    pub fn synth_all(&self) -> Result<Vec<Manifest>, String> {
        let mut registry = ExportRegistry::new();
        let mut manifests = Vec::with_capacity(self.stacks.len());

        for stack in &self.stacks {
            let manifest = synth::synthesize(stack, &registry)?;
            synth::register_exports(stack, &mut registry)?;
            manifests.push(manifest);
        }

        Ok(manifests)
    }

    /// The full export table after synthesizing every stack:
    /// (export name, value, exporting stack).
    pub fn export_table(&self) -> Result<Vec<(String, String, String)>, String> {
        let manifests = self.synth_all()?;
        let mut table = Vec::new();
        for manifest in &manifests {
            for output in manifest.outputs.values() {
                table.push((
                    output.export.clone(),
                    output.value.clone(),
                    manifest.stack.clone(),
                ));
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Environment, ResourceKind};
    use indexmap::IndexMap;

    fn producer() -> Stack {
        let mut stack = Stack::new("producer", &Environment::default());
        let bucket = stack
            .add_resource("bucket", ResourceKind::Bucket, IndexMap::new())
            .unwrap();
        stack
            .add_output("Bucket", &bucket.attr("name"), "bucket name", "SharedBucket")
            .unwrap();
        stack
    }

    fn consumer() -> Stack {
        let mut stack = Stack::new("consumer", &Environment::default());
        let token = stack.import_value("SharedBucket");
        let mut props = IndexMap::new();
        props.insert("import".to_string(), serde_json::Value::String(token));
        stack
            .add_resource("imported", ResourceKind::Bucket, props)
            .unwrap();
        stack
    }

    #[test]
    fn test_synth_all_in_order() {
        let mut app = App::new();
        app.add_stack(producer());
        app.add_stack(consumer());
        let manifests = app.synth_all().unwrap();
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].stack, "producer");
        assert_eq!(manifests[1].stack, "consumer");
    }

    #[test]
    fn test_consumer_without_producer_fails() {
        let mut app = App::new();
        app.add_stack(consumer());
        let err = app.synth_all().unwrap_err();
        assert!(err.contains("imports 'SharedBucket'"));
    }

    #[test]
    fn test_consumer_before_producer_fails() {
        let mut app = App::new();
        app.add_stack(consumer());
        app.add_stack(producer());
        let err = app.synth_all().unwrap_err();
        assert!(err.contains("no earlier stack exports it"));
    }

    #[test]
    fn test_export_table() {
        let mut app = App::new();
        app.add_stack(producer());
        let table = app.export_table().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].0, "SharedBucket");
        assert_eq!(table[0].2, "producer");
    }

    #[test]
    fn test_synth_all_deterministic() {
        let mut app = App::new();
        app.add_stack(producer());
        app.add_stack(consumer());
        let a = app.synth_all().unwrap();
        let b = app.synth_all().unwrap();
        assert_eq!(a, b);
    }
}
