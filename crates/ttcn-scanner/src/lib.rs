//! TTCN-3 scanner/tokenizer for the ttcn front end.
//!
//! This crate provides the lexical analysis phase:
//! - `TokenKind` - Token types, keyword lookup and display text
//! - `Token` - A kind plus its byte range
//! - `Scanner` - Byte-level tokenizer recording line starts as it goes

pub mod token;
pub use token::{KEYWORDS, Token, TokenKind, keyword_kind};

pub mod scanner;
pub use scanner::Scanner;

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
