//! Core synthesis logic — types, stacks, validation, manifests, app ordering.

pub mod app;
pub mod stack;
pub mod synth;
pub mod types;
pub mod validate;
