//! Resource constructors — one module per resource family.
//!
//! Each constructor builds the kind-specific property map, declares the
//! resource on a stack, and returns a `Ref` for wiring grants and
//! attribute tokens.

pub mod bucket;
pub mod function;
pub mod gateway;
pub mod iam;
pub mod network;
pub mod notebook;
pub mod search;
