//! Parser state: token queue, speculation markers, error recovery and node
//! construction helpers.
//!
//! The grammar itself lives in the `state_*` modules as further
//! `impl ParserState` blocks.

use crate::node::{NodeData, NodeIndex};
use crate::node_arena::NodeArena;
use crate::parse_rules::TokenSet;
use serde::Serialize;
use smallvec::SmallVec;
use ttcn_common::limits::{MAX_NESTING_DEPTH, MAX_SYNC_RETRIES};
use ttcn_common::{Diagnostic, LineMap, TextRange, diagnostic_codes};
use ttcn_scanner::{Scanner, Token, TokenKind};

/// A syntax error. Parsing never stops on one; they are collected and
/// handed out with the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub range: TextRange,
    pub description: String,
    pub code: u32,
}

impl SyntaxError {
    pub fn new(range: TextRange, description: impl Into<String>) -> Self {
        SyntaxError {
            range,
            description: description.into(),
            code: diagnostic_codes::SYNTAX_ERROR,
        }
    }

    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        Diagnostic::error(file, self.range, self.description.clone(), self.code)
    }
}

/// Saved parser position for speculative parsing.
#[derive(Clone, Copy, Debug)]
struct Marker {
    cursor: usize,
    nodes: usize,
    errors: usize,
    last_end: u32,
}

pub struct ParserState<'a> {
    scanner: Scanner<'a>,
    source: &'a str,
    /// Lookahead tokens; `queue[cursor]` is the current token.
    queue: Vec<Token>,
    cursor: usize,
    markers: SmallVec<[Marker; 4]>,
    /// End of the last consumed token; closes node ranges.
    last_end: u32,
    pub(crate) arena: NodeArena,
    errors: Vec<SyntaxError>,
    /// Errors for malformed tokens. Kept apart from `errors` so that a
    /// rolled back speculation does not lose them: the token stays queued
    /// and will not be scanned a second time.
    token_errors: Vec<SyntaxError>,
    sync_pos: Option<u32>,
    sync_cnt: u32,
    depth: u32,
}

impl<'a> ParserState<'a> {
    pub fn new(source: &'a str) -> ParserState<'a> {
        let mut state = ParserState {
            scanner: Scanner::new(source),
            source,
            queue: Vec::with_capacity(16),
            cursor: 0,
            markers: SmallVec::new(),
            last_end: 0,
            arena: NodeArena::with_capacity(source.len() / 4),
            errors: Vec::new(),
            token_errors: Vec::new(),
            sync_pos: None,
            sync_cnt: 0,
            depth: 0,
        };
        state.fill(1);
        state
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    // =========================================================================
    // Token queue
    // =========================================================================

    /// Scan until `n` more significant tokens are queued.
    fn fill(&mut self, mut n: usize) {
        while n > 0 {
            let tok = self.scanner.next_token();
            if tok.kind.is_trivia() {
                continue;
            }
            match tok.kind {
                TokenKind::Malformed => self.token_errors.push(SyntaxError {
                    range: tok.range,
                    description: "malformed token".to_string(),
                    code: diagnostic_codes::MALFORMED_TOKEN,
                }),
                TokenKind::Unterminated => self.token_errors.push(SyntaxError {
                    range: tok.range,
                    description: "unterminated token".to_string(),
                    code: diagnostic_codes::UNTERMINATED_TOKEN,
                }),
                _ => {}
            }
            self.queue.push(tok);
            n -= 1;
        }
    }

    /// Token `n` positions ahead; `peek(0)` is the current token.
    pub(crate) fn peek(&mut self, n: usize) -> Token {
        let idx = self.cursor + n;
        if idx >= self.queue.len() {
            self.fill(idx + 1 - self.queue.len());
        }
        self.queue[idx]
    }

    #[inline]
    pub(crate) fn token(&self) -> TokenKind {
        self.queue[self.cursor].kind
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: TokenKind) -> bool {
        self.token() == kind
    }

    /// Current token is neither `close` nor end of file.
    #[inline]
    pub(crate) fn is_list_open(&self, close: TokenKind) -> bool {
        let tok = self.token();
        tok != close && tok != TokenKind::Eof
    }

    /// Start offset of the current token.
    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.queue[self.cursor].range.begin
    }

    /// Source text of the current token.
    pub(crate) fn token_text(&self) -> &'a str {
        self.queue[self.cursor].range.text(self.source)
    }

    pub(crate) fn consume(&mut self) -> Token {
        let tok = self.queue[self.cursor];
        self.cursor += 1;

        if self.cursor == self.queue.len() && self.markers.is_empty() {
            self.cursor = 0;
            self.queue.clear();
        }
        self.peek(0);

        if tok.kind != TokenKind::Eof {
            self.last_end = tok.range.end;
        }
        tok
    }

    /// Consume a token whose kind the caller has already checked.
    #[inline]
    pub(crate) fn consume_invariant(&mut self, kind: TokenKind) -> Token {
        debug_assert_eq!(self.token(), kind);
        self.consume()
    }

    /// Consume the current token, recording an error if it is not `kind`.
    /// The token is consumed either way so the parser always makes
    /// progress.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Token {
        if !self.is_token(kind) {
            self.error_expected(kind.as_str());
        }
        self.consume()
    }

    /// Consume `;` if present. Semicolons after definitions and statements
    /// are optional.
    pub(crate) fn expect_semi(&mut self) {
        if self.is_token(TokenKind::Semicolon) {
            self.consume();
        }
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    pub(crate) fn error(&mut self, range: TextRange, description: impl Into<String>) {
        self.errors.push(SyntaxError::new(range, description));
    }

    /// `expected 'what'` at the current token.
    pub(crate) fn error_expected(&mut self, what: &str) {
        let range = self.queue[self.cursor].range;
        self.error(range, format!("expected '{what}'"));
    }

    /// Skip tokens until one in `sync` is found.
    ///
    /// Returns without consuming when the token in `sync` is further than
    /// any previous synchronization point, or when the same point has been
    /// reached fewer than `MAX_SYNC_RETRIES` times. Past that limit the
    /// token is skipped, so mutually recursive callers that all fail on the
    /// same token cannot loop forever.
    pub(crate) fn advance(&mut self, sync: &TokenSet) {
        while !self.is_token(TokenKind::Eof) {
            if sync.contains(self.token()) {
                let pos = self.token_pos();
                match self.sync_pos {
                    Some(last) if pos == last && self.sync_cnt < MAX_SYNC_RETRIES => {
                        self.sync_cnt += 1;
                        return;
                    }
                    Some(last) if pos <= last => {
                        tracing::trace!(pos, "recovery forced past synchronization token");
                    }
                    _ => {
                        self.sync_pos = Some(pos);
                        self.sync_cnt = 0;
                        return;
                    }
                }
            }
            self.consume();
        }
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    pub(crate) fn mark(&mut self) {
        self.markers.push(Marker {
            cursor: self.cursor,
            nodes: self.arena.len(),
            errors: self.errors.len(),
            last_end: self.last_end,
        });
    }

    /// Keep everything parsed since the innermost `mark`.
    pub(crate) fn commit(&mut self) {
        self.markers.pop();
    }

    /// Roll back to the innermost `mark`, discarding nodes and errors
    /// produced since.
    pub(crate) fn reset(&mut self) {
        if let Some(marker) = self.markers.pop() {
            self.cursor = marker.cursor;
            self.arena.truncate(marker.nodes);
            self.errors.truncate(marker.errors);
            self.last_end = marker.last_end;
        }
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    /// Range from `start` to the end of the last consumed token. A node that
    /// consumed nothing is empty at that end, so it never reaches past its
    /// parent.
    #[inline]
    pub(crate) fn range_from(&self, start: u32) -> TextRange {
        if start > self.last_end {
            TextRange::empty(self.last_end)
        } else {
            TextRange::new(start, self.last_end)
        }
    }

    /// Add a node spanning `start` up to the last consumed token.
    pub(crate) fn finish_node(&mut self, start: u32, data: NodeData) -> NodeIndex {
        let range = self.range_from(start);
        self.arena.add(range, data)
    }

    /// Add a node that absorbed an already built left operand: its range
    /// starts where that operand starts.
    pub(crate) fn finish_incorporating(&mut self, x: NodeIndex, data: NodeData) -> NodeIndex {
        let start = if x.is_some() {
            self.arena.range(x).begin
        } else {
            self.last_end
        };
        self.finish_node(start, data)
    }

    /// Placeholder for a construct that could not be parsed.
    pub(crate) fn error_node(&mut self) -> NodeIndex {
        self.arena.add(TextRange::empty(self.last_end), NodeData::Error)
    }

    /// Guard against unbounded recursion. Returns `false`, after consuming
    /// the current token, when nesting is too deep.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            let range = self.queue[self.cursor].range;
            self.error(range, "nesting too deep");
            self.consume();
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Hand out the arena, the position index and all errors, ordered by
    /// position.
    pub(crate) fn finish(mut self) -> (NodeArena, LineMap, Vec<SyntaxError>) {
        // the position index needs every line, even past an early stop
        let mut tok = self.queue.last().map(|t| t.kind);
        while tok != Some(TokenKind::Eof) {
            tok = Some(self.scanner.next_token().kind);
        }

        let mut errors = self.errors;
        errors.append(&mut self.token_errors);
        errors.sort_by_key(|e| e.range.begin);
        (self.arena, self.scanner.into_line_map(), errors)
    }
}
