//! Centralized limits for the parser and the program engine.

/// Number of times error recovery may stop at the same token before it is
/// forced to consume it.
///
/// Recovery skips tokens until one from the current synchronization set is
/// found. If the caller keeps failing at that very token, the parser would spin
/// forever; after this many hits at one position the token is skipped anyway.
pub const MAX_SYNC_RETRIES: u32 = 10;

/// Maximum depth of nested expressions/statements before the parser stops
/// descending and reports an error.
pub const MAX_NESTING_DEPTH: u32 = 512;

/// Maximum depth of transitive (`import all` of imports) module walks.
pub const MAX_IMPORT_CHAIN_DEPTH: u32 = 64;
