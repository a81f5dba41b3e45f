//! Token kinds and the keyword table.

use serde::Serialize;
use ttcn_common::TextRange;

macro_rules! define_tokens {
    (
        special { $($sk:ident => $st:literal,)* }
        literals { $($lk:ident => $lt:literal,)* }
        punctuation { $($pk:ident => $pt:literal,)* }
        keywords { $($kk:ident => $kt:literal,)* }
    ) => {
        /// Kind of a scanned token.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u8)]
        pub enum TokenKind {
            $($sk,)*
            $($lk,)*
            $($pk,)*
            $($kk,)*
        }

        impl TokenKind {
            /// Source spelling for punctuation and keywords, a descriptive
            /// name for everything else. Used in "expected ..." messages.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(TokenKind::$sk => $st,)*
                    $(TokenKind::$lk => $lt,)*
                    $(TokenKind::$pk => $pt,)*
                    $(TokenKind::$kk => $kt,)*
                }
            }

            pub const fn is_keyword(self) -> bool {
                matches!(self, $(TokenKind::$kk)|*)
            }

            pub const fn is_punctuation(self) -> bool {
                matches!(self, $(TokenKind::$pk)|*)
            }

            pub const fn is_literal(self) -> bool {
                matches!(self, $(TokenKind::$lk)|*)
            }
        }

        /// Map identifier text to its keyword kind.
        pub fn keyword_kind(text: &str) -> Option<TokenKind> {
            match text {
                $($kt => Some(TokenKind::$kk),)*
                _ => None,
            }
        }

        /// Every keyword, in table order.
        pub const KEYWORDS: &[TokenKind] = &[$(TokenKind::$kk,)*];
    };
}

define_tokens! {
    special {
        Illegal => "illegal token",
        Eof => "end of file",
        Unterminated => "unterminated token",
        Malformed => "malformed token",
        Comment => "comment",
        Preproc => "preprocessor directive",
    }
    literals {
        Ident => "identifier",
        Int => "integer",
        Float => "float",
        String => "string",
        BitString => "bitstring",
        HexString => "hexstring",
        OctetString => "octetstring",
        Modif => "modifier",
    }
    punctuation {
        Inc => "++",
        Add => "+",
        Sub => "-",
        Dec => "--",
        Mul => "*",
        Div => "/",
        Shl => "<<",
        Rol => "<@",
        Shr => ">>",
        Ror => "@>",
        Concat => "&",
        Redir => "->",
        Decode => "=>",
        Question => "?",
        Excl => "!",
        Range => "..",
        Ellipsis => "...",
        Assign => ":=",
        ColonColon => "::",
        Eq => "==",
        Ne => "!=",
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
        LParen => "(",
        LBrack => "[",
        LBrace => "{",
        Comma => ",",
        Dot => ".",
        RParen => ")",
        RBrack => "]",
        RBrace => "}",
        Semicolon => ";",
        Colon => ":",
    }
    keywords {
        Mod => "mod",
        Rem => "rem",
        And => "and",
        Or => "or",
        Xor => "xor",
        Not => "not",
        And4b => "and4b",
        Or4b => "or4b",
        Xor4b => "xor4b",
        Not4b => "not4b",
        Address => "address",
        Alive => "alive",
        All => "all",
        Alt => "alt",
        Altstep => "altstep",
        AnyKw => "any",
        Break => "break",
        Case => "case",
        Charstring => "charstring",
        Class => "class",
        Component => "component",
        Const => "const",
        Continue => "continue",
        Control => "control",
        Create => "create",
        Decmatch => "decmatch",
        Display => "display",
        Do => "do",
        Else => "else",
        Encode => "encode",
        Enumerated => "enumerated",
        ErrorKw => "error",
        Except => "except",
        Exception => "exception",
        Extends => "extends",
        Extension => "extension",
        External => "external",
        Fail => "fail",
        False => "false",
        For => "for",
        Friend => "friend",
        From => "from",
        Function => "function",
        Goto => "goto",
        Group => "group",
        If => "if",
        Ifpresent => "ifpresent",
        Import => "import",
        In => "in",
        Inconc => "inconc",
        Inout => "inout",
        Interleave => "interleave",
        Label => "label",
        Language => "language",
        Length => "length",
        Map => "map",
        Message => "message",
        Mixed => "mixed",
        Modifies => "modifies",
        Module => "module",
        Modulepar => "modulepar",
        Mtc => "mtc",
        NotANumber => "not_a_number",
        Noblock => "noblock",
        NoneKw => "none",
        Null => "null",
        Of => "of",
        Omit => "omit",
        On => "on",
        Optional => "optional",
        Out => "out",
        Override => "override",
        Param => "param",
        Pass => "pass",
        Pattern => "pattern",
        Port => "port",
        Present => "present",
        Private => "private",
        Procedure => "procedure",
        Public => "public",
        Realtime => "realtime",
        Record => "record",
        Regexp => "regexp",
        Repeat => "repeat",
        Return => "return",
        Runs => "runs",
        Select => "select",
        Sender => "sender",
        Set => "set",
        Signature => "signature",
        Stepsize => "stepsize",
        System => "system",
        Template => "template",
        Testcase => "testcase",
        Timer => "timer",
        Timestamp => "timestamp",
        To => "to",
        True => "true",
        Type => "type",
        Union => "union",
        Universal => "universal",
        Unmap => "unmap",
        Value => "value",
        Var => "var",
        Variant => "variant",
        While => "while",
        With => "with",
    }
}

impl TokenKind {
    /// Tokens the parser never sees: they are dropped while filling the
    /// lookahead queue.
    pub const fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Preproc)
    }

    /// Scanner-level error kinds.
    pub const fn is_error(self) -> bool {
        matches!(self, TokenKind::Malformed | TokenKind::Unterminated)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token: its kind plus the byte range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub const fn new(kind: TokenKind, range: TextRange) -> Self {
        Token { kind, range }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.range.text(source)
    }
}
