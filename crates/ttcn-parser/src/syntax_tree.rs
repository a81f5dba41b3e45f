//! Parse entry point and the per-file parse result.

use crate::node::{NodeIndex, NodeKind};
use crate::node_arena::NodeArena;
use crate::state::{ParserState, SyntaxError};
use ttcn_common::{Diagnostic, LineMap};

/// Everything produced by parsing one file: the arena with its root, the
/// position index and the syntax errors. Replaced as a whole when the file
/// changes.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    pub file_name: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub line_map: LineMap,
    pub errors: Vec<SyntaxError>,
}

impl SyntaxTree {
    /// Top-level definitions in source order.
    pub fn top_level(&self) -> &[NodeIndex] {
        match self.arena.as_root(self.root) {
            Some(root) => &root.defs,
            None => &[],
        }
    }

    /// `module` declarations at the top level.
    pub fn modules(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.top_level()
            .iter()
            .copied()
            .filter(|&def| self.arena.kind(def) == Some(NodeKind::Module))
    }

    /// Deepest node containing `offset`.
    pub fn node_at(&self, offset: u32) -> NodeIndex {
        self.arena.node_at(self.root, offset)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(|e| e.to_diagnostic(&self.file_name))
            .collect()
    }
}

/// Parse `source` into a syntax tree. Never fails: syntax errors are
/// collected in the result.
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn parse(file_name: &str, source: &str) -> SyntaxTree {
    let mut state = ParserState::new(source);
    let root = state.parse_root();
    let (arena, line_map, errors) = state.finish();

    tracing::debug!(
        nodes = arena.len(),
        errors = errors.len(),
        lines = line_map.line_count(),
        "parsed"
    );

    SyntaxTree {
        file_name: file_name.to_string(),
        arena,
        root,
        line_map,
        errors,
    }
}
