//! Trazado — Rust-native cloud stack synthesis.
//!
//! Declarative resource graphs. Deterministic manifests. BLAKE3 asset
//! fingerprints. Declares a fixed topology of managed cloud resources and
//! hands the manifest to a provider's convergence engine.

pub mod assets;
pub mod cli;
pub mod core;
pub mod resources;
pub mod stacks;
