//! Incremental multi-file program model for the ttcn front end.
//!
//! This crate provides:
//! - `Program` - Loaded files, the module registry and `commit`
//! - `SourceFile` / `ModuleDescriptor` - Per-file and per-module state
//! - `ImportVisitor` - Which modules a module's imports make visible
//! - The cross-module pass that resolves references left external by the
//!   binder and injects provider tables into the importing module's scopes

pub mod module_descriptor;
pub use module_descriptor::{DependencyEntry, ModuleDescriptor};

pub mod source_file;
pub use source_file::SourceFile;

pub mod import_visitor;
pub use import_visitor::{ImportVisitor, ImportWalk, VisibleModule};

mod crossbind;

pub mod program;
pub use program::{Modifier, Program};

#[cfg(test)]
#[path = "tests/import_visitor_tests.rs"]
mod import_visitor_tests;
