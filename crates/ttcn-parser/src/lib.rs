//! TTCN-3 parser and syntax tree for the ttcn front end.
//!
//! This crate provides:
//! - `NodeArena` - Per-file arena of syntax nodes addressed by `NodeIndex`
//! - `NodeData` / `NodeKind` - The closed set of node kinds
//! - `ParserState` - Speculative recursive-descent parser with error recovery
//! - `parse` / `SyntaxTree` - Parse entry point and its result

pub mod node;
pub use node::{Node, NodeData, NodeIndex, NodeKind, NodeList};

pub mod node_access;

pub mod node_arena;
pub use node_arena::NodeArena;

pub mod parse_rules;

// Parser state and grammar, split by syntactic area
pub mod state;
mod state_declarations;
mod state_expressions;
mod state_statements;
mod state_types;
pub use state::{ParserState, SyntaxError};

pub mod syntax_tree;
pub use syntax_tree::{SyntaxTree, parse};

#[cfg(test)]
#[path = "tests/node_arena_tests.rs"]
mod node_arena_tests;
