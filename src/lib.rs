//! decaf - output transform layer of a Java bytecode decompiler
//!
//! The surrounding decompiler decodes class files, reconstructs control flow,
//! and builds an output tree per compilation unit. Some bytecode constructs
//! have no direct Java source form; this crate rewrites those into
//! semantically equivalent synthesized code before the tree is printed.
//!
//! ## Architecture
//!
//! - **ast**: arena-based output tree with structural splice primitives and a
//!   Java source printer
//! - **symbols**: symbolic type/member references parsed from JVM descriptor
//!   strings, plus the method-handle constant model
//! - **transforms**: the per-session transform pipeline; currently the
//!   method-handle constant rewriter, which replaces placeholder nodes with
//!   references to synthesized helper classes
//!
//! ## Flow
//!
//! ```text
//! Decoded unit tree → TransformPipeline::transform_unit → AstPrinter → Java source
//! ```
//!
//! One [`TransformPipeline`] value spans a decompilation session: it owns the
//! generator that keeps synthesized names unique across every unit processed
//! together. Per-unit caches are created and discarded inside each
//! `transform_unit` call.

pub mod ast;
pub mod config;
pub mod consts;
pub mod error;
pub mod symbols;
pub mod transforms;

pub use config::Config;
pub use error::{Error, Result};
pub use transforms::TransformPipeline;
