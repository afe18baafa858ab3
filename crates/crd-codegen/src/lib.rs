//! # Feature-gated Rust types from Kubernetes CustomResourceDefinitions
//!
//! Runs a base generator (`kopium`) over each configured CRD, then rewrites
//! its output so optional capabilities sit behind cargo features:
//!
//! - `TypedBuilder` derives and `#[builder(...)]` attributes behind `builder`
//! - `JsonSchema` derives behind `schemars`, with `kube(schema = "disabled")`
//!   on custom resources when it is off
//! - `PartialEq` always, `Default` for structs unless the type is listed in
//!   `not-defaulted`
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p crd-codegen -- -c crds.kdl
//! ```
//!
//! Configuration lives in `crds.kdl` at the workspace root.
//!
//! ## Modules
//!
//! - [`rewrite`] - Declaration block IR and the derive rewrite passes
//! - [`fetch`] - Retrieves CRDs over HTTP or from disk
//! - [`generator`] - Runs the base generator
//! - [`format`] - rustfmt / prettyplease formatting
//! - [`manifest`] - Builds the crate root re-exporting every module
//! - [`pipeline`] - Drives the whole run

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod generator;
pub mod manifest;
pub mod pipeline;
pub mod rewrite;
pub mod schema;

pub use error::{CodegenError, Result};
pub use pipeline::Pipeline;
pub use rewrite::{ExclusionSet, Rewriter, rewrite_unit};
