//! Tests for the scanner and token tables.

use crate::*;
use ttcn_common::TextRange;

fn kinds(source: &str) -> Vec<TokenKind> {
    Scanner::new(source).map(|t| t.kind).collect()
}

fn single(source: &str) -> Token {
    let mut scanner = Scanner::new(source);
    let tok = scanner.next_token();
    assert_eq!(scanner.next_token().kind, TokenKind::Eof, "{source:?} is more than one token");
    tok
}

#[test]
fn test_keyword_lookup() {
    assert_eq!(keyword_kind("module"), Some(TokenKind::Module));
    assert_eq!(keyword_kind("not_a_number"), Some(TokenKind::NotANumber));
    assert_eq!(keyword_kind("any"), Some(TokenKind::AnyKw));
    assert_eq!(keyword_kind("Module"), None);
    assert_eq!(keyword_kind("integer"), None);

    for &kw in KEYWORDS {
        assert!(kw.is_keyword());
        assert_eq!(keyword_kind(kw.as_str()), Some(kw));
    }
}

#[test]
fn test_token_classification() {
    assert!(TokenKind::Assign.is_punctuation());
    assert!(!TokenKind::Assign.is_keyword());
    assert!(TokenKind::BitString.is_literal());
    assert!(TokenKind::Comment.is_trivia());
    assert!(TokenKind::Unterminated.is_error());
    assert_eq!(TokenKind::ColonColon.to_string(), "::");
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(
        kinds("module M_1 var _x"),
        vec![
            TokenKind::Module,
            TokenKind::Ident,
            TokenKind::Var,
            TokenKind::Ident
        ]
    );
    assert_eq!(single("%definitionId").kind, TokenKind::Ident);
    assert_eq!(single("@lazy").kind, TokenKind::Modif);
    assert_eq!(single("@").kind, TokenKind::Illegal);
    assert_eq!(single("%").kind, TokenKind::Illegal);
}

#[test]
fn test_operators() {
    assert_eq!(
        kinds("++ + -- - -> => := :: : == != <= >= << >> <@ @> .. ... . & ? !"),
        vec![
            TokenKind::Inc,
            TokenKind::Add,
            TokenKind::Dec,
            TokenKind::Sub,
            TokenKind::Redir,
            TokenKind::Decode,
            TokenKind::Assign,
            TokenKind::ColonColon,
            TokenKind::Colon,
            TokenKind::Eq,
            TokenKind::Ne,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::Rol,
            TokenKind::Ror,
            TokenKind::Range,
            TokenKind::Ellipsis,
            TokenKind::Dot,
            TokenKind::Concat,
            TokenKind::Question,
            TokenKind::Excl,
        ]
    );
    assert_eq!(single("=").kind, TokenKind::Illegal);
}

#[test]
fn test_numbers() {
    assert_eq!(single("0").kind, TokenKind::Int);
    assert_eq!(single("1234").kind, TokenKind::Int);
    assert_eq!(single("1.5").kind, TokenKind::Float);
    assert_eq!(single("1e10").kind, TokenKind::Float);
    assert_eq!(single("2.5E-3").kind, TokenKind::Float);
    assert_eq!(single("1e").kind, TokenKind::Malformed);
    assert_eq!(single("1e+").kind, TokenKind::Malformed);
    assert_eq!(single("12abc").kind, TokenKind::Malformed);
    assert_eq!(single("0x1F").kind, TokenKind::Malformed);
}

#[test]
fn test_leading_zero_takes_no_more_digits() {
    // digits after a leading zero are trailing garbage
    assert_eq!(single("007").kind, TokenKind::Malformed);
    assert_eq!(single("0.5").kind, TokenKind::Float);
}

#[test]
fn test_number_ranges_and_selectors() {
    assert_eq!(
        kinds("1..10"),
        vec![TokenKind::Int, TokenKind::Range, TokenKind::Int]
    );
    assert_eq!(
        kinds("a[1].f"),
        vec![
            TokenKind::Ident,
            TokenKind::LBrack,
            TokenKind::Int,
            TokenKind::RBrack,
            TokenKind::Dot,
            TokenKind::Ident
        ]
    );
}

#[test]
fn test_strings() {
    let tok = single(r#""hello""#);
    assert_eq!(tok.kind, TokenKind::String);
    assert_eq!(tok.range, TextRange::new(0, 7));

    assert_eq!(single(r#""say ""hi""""#).kind, TokenKind::String);
    assert_eq!(single(r#""esc \" quote""#).kind, TokenKind::String);
    assert_eq!(single(r#""never closed"#).kind, TokenKind::Unterminated);
    assert_eq!(single(r#""trailing \"#).kind, TokenKind::Unterminated);
}

#[test]
fn test_exotic_strings() {
    assert_eq!(single("'0101'B").kind, TokenKind::BitString);
    assert_eq!(single("'DEADBEEF'H").kind, TokenKind::HexString);
    assert_eq!(single("'00FF'O").kind, TokenKind::OctetString);
    assert_eq!(single("'00FF'").kind, TokenKind::Malformed);
    assert_eq!(single("'00FF").kind, TokenKind::Unterminated);

    let mut scanner = Scanner::new("'01'X");
    assert_eq!(scanner.next_token().kind, TokenKind::Malformed);
    assert_eq!(scanner.next_token().kind, TokenKind::Ident);
}

#[test]
fn test_comments_and_preprocessor() {
    assert_eq!(
        kinds("// line\nx /* block */ y\n#include \"a\"\nz"),
        vec![
            TokenKind::Comment,
            TokenKind::Ident,
            TokenKind::Comment,
            TokenKind::Ident,
            TokenKind::Preproc,
            TokenKind::Ident,
        ]
    );
    assert_eq!(single("/* open").kind, TokenKind::Unterminated);
    assert_eq!(single("/*/").kind, TokenKind::Unterminated);
}

#[test]
fn test_non_ascii_is_one_illegal_token() {
    let tok = single("ü");
    assert_eq!(tok.kind, TokenKind::Illegal);
    assert_eq!(tok.range, TextRange::new(0, 2));
}

#[test]
fn test_eof_range() {
    let mut scanner = Scanner::new("x  ");
    scanner.next_token();
    let eof = scanner.next_token();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.range, TextRange::new(3, 4));
    // stays at eof
    assert_eq!(scanner.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_next_token_and_iterator_share_cursor() {
    let mut scanner = Scanner::new("module M { }");
    assert_eq!(scanner.next_token().kind, TokenKind::Module);
    let rest: Vec<TokenKind> = scanner.by_ref().map(|t| t.kind).collect();
    assert_eq!(rest, [TokenKind::Ident, TokenKind::LBrace, TokenKind::RBrace]);
    assert_eq!(scanner.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_token_ranges_cover_text() {
    let source = "var integer x := 42;";
    let texts: Vec<&str> = Scanner::new(source).map(|t| t.text(source)).collect();
    assert_eq!(texts, vec!["var", "integer", "x", ":=", "42", ";"]);
}

#[test]
fn test_line_starts_include_comments_and_strings() {
    let source = "a\n/* x\ny */\n\"s\nt\"\x0bb\x0cc";
    let mut scanner = Scanner::new(source);
    while scanner.next_token().kind != TokenKind::Eof {}
    let map = scanner.into_line_map();
    assert_eq!(map.line_starts(), ttcn_common::LineMap::build(source).line_starts());
    assert_eq!(map.line_count(), 7);
}

#[test]
fn test_line_starts_in_exotic_strings() {
    let source = "'01\n10'B x";
    let mut scanner = Scanner::new(source);
    assert_eq!(scanner.next_token().kind, TokenKind::BitString);
    assert_eq!(scanner.line_starts(), &[0, 4]);
}
