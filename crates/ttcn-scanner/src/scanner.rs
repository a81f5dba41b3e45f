//! Byte-level scanner.
//!
//! The scanner never fails: bad input becomes `Illegal`, `Malformed` or
//! `Unterminated` tokens and the parser decides what to report. Line starts
//! are recorded whenever a line terminator is crossed, including terminators
//! inside comments and string literals, so the parser can build the position
//! index without a second pass over the text.

use crate::token::{Token, TokenKind, keyword_kind};
use ttcn_common::{LineMap, TextRange};

const LF: u8 = b'\n';
const VT: u8 = 0x0b;
const FF: u8 = 0x0c;

#[inline]
const fn is_line_terminator(ch: u8) -> bool {
    matches!(ch, LF | VT | FF)
}

#[inline]
const fn is_ident_part(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line_starts: Vec<u32>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            pos: 0,
            line_starts: vec![0],
        }
    }

    /// Current byte offset.
    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Line starts recorded so far.
    pub fn line_starts(&self) -> &[u32] {
        &self.line_starts
    }

    /// Finish scanning and hand over the position index.
    ///
    /// Only lines already crossed by `next_token` are known; callers that stop
    /// early get a partial index.
    pub fn into_line_map(self) -> LineMap {
        LineMap::from_line_starts(self.line_starts)
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let Some(ch) = self.peek(0) else {
            return Token::new(
                TokenKind::Eof,
                TextRange::new(start as u32, start as u32 + 1),
            );
        };
        self.pos += 1;
        let next = self.peek(0).unwrap_or(0);

        let kind = match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.scan_ident_part();
                keyword_kind(&self.source[start..self.pos]).unwrap_or(TokenKind::Ident)
            }
            b'0'..=b'9' => self.scan_number(ch),
            b',' => TokenKind::Comma,
            b'+' => self.pick(next == b'+', TokenKind::Inc, TokenKind::Add),
            b'*' => TokenKind::Mul,
            b'&' => TokenKind::Concat,
            b'?' => TokenKind::Question,
            b'(' => TokenKind::LParen,
            b'[' => TokenKind::LBrack,
            b'{' => TokenKind::LBrace,
            b')' => TokenKind::RParen,
            b']' => TokenKind::RBrack,
            b'}' => TokenKind::RBrace,
            b';' => TokenKind::Semicolon,
            b'/' => match next {
                b'/' => {
                    self.skip_to_line_end();
                    TokenKind::Comment
                }
                b'*' => self.scan_block_comment(),
                _ => TokenKind::Div,
            },
            b'@' => {
                if next.is_ascii_alphabetic() {
                    self.scan_ident_part();
                    TokenKind::Modif
                } else if next == b'>' {
                    self.pos += 1;
                    TokenKind::Ror
                } else {
                    TokenKind::Illegal
                }
            }
            b'%' => {
                if next.is_ascii_alphabetic() {
                    self.scan_ident_part();
                    TokenKind::Ident
                } else {
                    TokenKind::Illegal
                }
            }
            b'!' => self.pick(next == b'=', TokenKind::Ne, TokenKind::Excl),
            b'-' => match next {
                b'>' => self.bump(TokenKind::Redir),
                b'-' => self.bump(TokenKind::Dec),
                _ => TokenKind::Sub,
            },
            b'.' => {
                if next == b'.' {
                    self.pos += 1;
                    self.pick(self.peek(0) == Some(b'.'), TokenKind::Ellipsis, TokenKind::Range)
                } else {
                    TokenKind::Dot
                }
            }
            b':' => match next {
                b':' => self.bump(TokenKind::ColonColon),
                b'=' => self.bump(TokenKind::Assign),
                _ => TokenKind::Colon,
            },
            b'<' => match next {
                b'<' => self.bump(TokenKind::Shl),
                b'=' => self.bump(TokenKind::Le),
                b'@' => self.bump(TokenKind::Rol),
                _ => TokenKind::Lt,
            },
            b'=' => match next {
                b'=' => self.bump(TokenKind::Eq),
                b'>' => self.bump(TokenKind::Decode),
                _ => TokenKind::Illegal,
            },
            b'>' => match next {
                b'>' => self.bump(TokenKind::Shr),
                b'=' => self.bump(TokenKind::Ge),
                _ => TokenKind::Gt,
            },
            b'\'' => self.scan_quoted(),
            b'"' => self.scan_string(),
            b'#' => {
                self.skip_to_line_end();
                TokenKind::Preproc
            }
            0x80.. => {
                // keep ranges on char boundaries
                while self.peek(0).is_some_and(|b| b & 0xc0 == 0x80) {
                    self.pos += 1;
                }
                TokenKind::Illegal
            }
            _ => TokenKind::Illegal,
        };

        Token::new(kind, TextRange::new(start as u32, self.pos as u32))
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    /// Consume one more byte and yield `kind`.
    #[inline]
    fn bump(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    /// Two-byte token if `matched`, otherwise the one-byte fallback.
    #[inline]
    fn pick(&mut self, matched: bool, long: TokenKind, short: TokenKind) -> TokenKind {
        if matched { self.bump(long) } else { short }
    }

    fn push_line(&mut self, start: usize) {
        self.line_starts.push(start as u32);
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek(0) {
            match ch {
                b' ' | b'\t' | b'\r' => {}
                LF | VT | FF => self.push_line(self.pos + 1),
                _ => return,
            }
            self.pos += 1;
        }
    }

    /// Move to the next `\n` without consuming it.
    fn skip_to_line_end(&mut self) {
        let rest = &self.source.as_bytes()[self.pos..];
        self.pos += memchr::memchr(LF, rest).unwrap_or(rest.len());
    }

    fn scan_ident_part(&mut self) {
        while self.peek(0).is_some_and(is_ident_part) {
            self.pos += 1;
        }
    }

    fn scan_digits(&mut self) {
        while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn scan_number(&mut self, first: u8) -> TokenKind {
        let mut kind = TokenKind::Int;

        if first != b'0' {
            self.scan_digits();
        }

        // fraction; `1..5` is a range, `a[1].f` is a selector
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|b| b.is_ascii_digit()) {
            kind = TokenKind::Float;
            self.pos += 1;
            self.scan_digits();
        }

        if matches!(self.peek(0), Some(b'e' | b'E')) {
            kind = TokenKind::Float;
            self.pos += 1;
            if matches!(self.peek(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
                self.scan_digits();
            } else {
                kind = TokenKind::Malformed;
            }
        }

        // trailing garbage: `12abc`, `0x1F`
        if self.peek(0).is_some_and(is_ident_part) {
            kind = TokenKind::Malformed;
            self.scan_ident_part();
        }

        kind
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.pos += 1; // opening '*'
        while let Some(ch) = self.peek(0) {
            self.pos += 1;
            if is_line_terminator(ch) {
                self.push_line(self.pos);
            } else if ch == b'*' && self.peek(0) == Some(b'/') {
                self.pos += 1;
                return TokenKind::Comment;
            }
        }
        TokenKind::Unterminated
    }

    fn scan_string(&mut self) -> TokenKind {
        while let Some(ch) = self.peek(0) {
            self.pos += 1;
            match ch {
                b'\\' => {
                    if let Some(escaped) = self.peek(0) {
                        self.pos += 1;
                        if is_line_terminator(escaped) {
                            self.push_line(self.pos);
                        }
                    }
                }
                b'"' => {
                    if self.peek(0) == Some(b'"') {
                        self.pos += 1;
                    } else {
                        return TokenKind::String;
                    }
                }
                _ if is_line_terminator(ch) => self.push_line(self.pos),
                _ => {}
            }
        }
        TokenKind::Unterminated
    }

    /// `'0101'B`, `'DEAD'H`, `'00FF'O`.
    fn scan_quoted(&mut self) -> TokenKind {
        loop {
            let Some(ch) = self.peek(0) else {
                return TokenKind::Unterminated;
            };
            self.pos += 1;
            if ch == b'\'' {
                break;
            }
            if is_line_terminator(ch) {
                self.push_line(self.pos);
            }
        }

        let kind = match self.peek(0) {
            Some(b'B') => TokenKind::BitString,
            Some(b'H') => TokenKind::HexString,
            Some(b'O') => TokenKind::OctetString,
            _ => return TokenKind::Malformed,
        };
        self.pos += 1;
        kind
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    /// Yields every token up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let tok = self.next_token();
        (tok.kind != TokenKind::Eof).then_some(tok)
    }
}
