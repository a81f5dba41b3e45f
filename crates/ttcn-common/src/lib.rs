//! Common types and utilities for the ttcn front end.
//!
//! This crate provides foundational types used across all ttcn crates:
//! - Byte ranges into source text (`TextRange`)
//! - Line/column positions and the per-file line index (`LineMap`, `Position`, `Location`)
//! - Diagnostics shared by the syntax, semantic and resolution channels
//! - Parser and binder limits

// Byte ranges
pub mod range;
pub use range::TextRange;

// Position index for line/column source locations
pub mod position;
pub use position::{LineMap, Location, Position};

// Diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, diagnostic_codes};

// Centralized limits and thresholds
pub mod limits;
