//! Scope and symbol binder for the ttcn front end.
//!
//! This crate provides:
//! - `SymbolFlags` / `Symbol` / `SymbolTable` - Declared names and what they denote
//! - `ScopeTree` - Lexical scopes of one module and name resolution over them
//! - `BinderState` / `bind` - One walk per module producing a `ModuleBinding`
//! - Builtin types and predefined functions
//!
//! References that do not resolve inside their module are left in the
//! binding's externals for the program-level cross-module pass.

pub mod symbol_flags;
pub use symbol_flags::SymbolFlags;

pub mod symbols;
pub use symbols::{Symbol, SymbolOrigin, SymbolTable, TableId};

pub mod scopes;
pub use scopes::{
    NoImports, Resolved, Scope, ScopeId, ScopeKind, ScopeTree, SymbolOwner, TableRef,
    TableSource,
};

pub mod builtins;
pub use builtins::{BUILTINS_MODULE_NAME, resolve_builtin};

pub mod semantic_errors;
pub use semantic_errors::{SemanticError, SemanticErrorKind};

// Binder state and walk, split by concern
pub mod state;
mod state_binding;
mod state_hoisting;
pub use state::{
    AugmentationKind, AugmentationProvider, BindResult, BinderState, ExternalIdent,
    ExternalsGroup, ImportDescriptor, ModuleBinding,
};
pub use state_binding::CONTROL_PART_NAME;

use ttcn_parser::SyntaxTree;

/// Bind the module of a parsed file. `source` must be the text `tree` was
/// parsed from.
#[tracing::instrument(level = "debug", skip_all, fields(file = %tree.file_name))]
pub fn bind(tree: &SyntaxTree, source: &str) -> BindResult {
    let mut state = BinderState::new(tree, source);
    state.bind_tree();
    state.finish()
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;

#[cfg(test)]
#[path = "tests/symbols_tests.rs"]
mod symbols_tests;
