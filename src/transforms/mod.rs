//! Output-tree transform pipeline
//!
//! After the decoder reconstructs a compilation unit's tree, transforms
//! rewrite constructs that exist in bytecode but have no direct Java source
//! form. Each transform runs over one unit at a time with exclusive access to
//! that unit's tree; per-unit state (dedup caches) is created fresh for every
//! run. The pipeline value itself carries the only cross-unit state: the
//! generator that keeps synthesized names unique for the whole session.

pub mod method_handles;

use crate::ast::{AstArena, NodeId};
use crate::config::Config;
use crate::error::Result;
use crate::symbols::MetadataParser;

use method_handles::MethodHandleRewriter;

/// Monotonic source of numeric suffixes for synthesized declarations
///
/// Never reset within a session: generated names must stay unique across
/// every unit emitted together, not just within one unit.
#[derive(Debug, Default)]
pub struct UniqueIdGenerator {
    next: u32,
}

impl UniqueIdGenerator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Transform pipeline for one decompilation session
pub struct TransformPipeline {
    config: Config,
    ids: UniqueIdGenerator,
}

impl TransformPipeline {
    pub fn new(config: Config) -> Self {
        Self { config, ids: UniqueIdGenerator::new() }
    }

    /// Run all transforms over one compilation unit.
    ///
    /// `parser` is the descriptor resolver for the unit; passing `None`
    /// leaves constructs that need symbol resolution untouched.
    pub fn transform_unit(
        &mut self,
        arena: &mut AstArena,
        unit: NodeId,
        parser: Option<&MetadataParser>,
    ) -> Result<()> {
        eprintln!("🔧 TRANSFORM: Starting output-tree transforms");

        let mut rewriter = MethodHandleRewriter::new(&self.config, &mut self.ids);
        rewriter.run(arena, unit, parser)?;

        eprintln!("✅ TRANSFORM: Output-tree transforms complete");
        Ok(())
    }
}
