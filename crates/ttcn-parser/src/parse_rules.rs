//! Token classes and operator precedence used by the grammar.

use ttcn_scanner::TokenKind;

/// Fixed-size set of token kinds, usable in `const` context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    pub const fn new(kinds: &[TokenKind]) -> TokenSet {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < kinds.len() {
            let k = kinds[i] as usize;
            bits[k / 64] |= 1 << (k % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        let k = kind as usize;
        self.0[k / 64] & (1 << (k % 64)) != 0
    }
}

/// Restart points for statement and definition level recovery.
pub const STMT_START: TokenSet = TokenSet::new(&[
    TokenKind::Alt,
    TokenKind::Altstep,
    TokenKind::Break,
    TokenKind::Case,
    TokenKind::Const,
    TokenKind::Continue,
    TokenKind::Control,
    TokenKind::Display,
    TokenKind::Do,
    TokenKind::Else,
    TokenKind::Encode,
    TokenKind::Extension,
    TokenKind::For,
    TokenKind::Friend,
    TokenKind::Function,
    TokenKind::Goto,
    TokenKind::Group,
    TokenKind::If,
    TokenKind::Import,
    TokenKind::Interleave,
    TokenKind::Label,
    TokenKind::Map,
    TokenKind::Module,
    TokenKind::Modulepar,
    TokenKind::Port,
    TokenKind::Private,
    TokenKind::Public,
    TokenKind::RBrace,
    TokenKind::Repeat,
    TokenKind::Return,
    TokenKind::Select,
    TokenKind::Semicolon,
    TokenKind::Signature,
    TokenKind::Template,
    TokenKind::Testcase,
    TokenKind::Timer,
    TokenKind::Type,
    TokenKind::Unmap,
    TokenKind::Var,
    TokenKind::Variant,
    TokenKind::While,
]);

/// Tokens that can begin an operand. A speculative `<...>` after a
/// reference is only taken as type parameters when the following token is
/// *not* one of these (otherwise `a < b > c` stays a comparison).
pub const OPERAND_START: TokenSet = TokenSet::new(&[
    TokenKind::Address,
    TokenKind::All,
    TokenKind::AnyKw,
    TokenKind::BitString,
    TokenKind::Charstring,
    TokenKind::ErrorKw,
    TokenKind::Fail,
    TokenKind::False,
    TokenKind::Float,
    TokenKind::Inconc,
    TokenKind::Int,
    TokenKind::Map,
    TokenKind::Mtc,
    TokenKind::Mul,
    TokenKind::NotANumber,
    TokenKind::NoneKw,
    TokenKind::Null,
    TokenKind::Omit,
    TokenKind::Pass,
    TokenKind::Question,
    TokenKind::String,
    TokenKind::System,
    TokenKind::Testcase,
    TokenKind::Timer,
    TokenKind::True,
    TokenKind::Universal,
    TokenKind::Unmap,
]);

/// Tokens that may start or separate top-level constructs.
pub const TOP_LEVEL: TokenSet = TokenSet::new(&[
    TokenKind::Comma,
    TokenKind::Semicolon,
    TokenKind::Module,
    TokenKind::Control,
    TokenKind::External,
    TokenKind::Friend,
    TokenKind::Function,
    TokenKind::Group,
    TokenKind::Import,
    TokenKind::Modulepar,
    TokenKind::Signature,
    TokenKind::Template,
    TokenKind::Type,
    TokenKind::Var,
    TokenKind::Altstep,
    TokenKind::Const,
    TokenKind::Private,
    TokenKind::Public,
    TokenKind::Timer,
    TokenKind::Port,
    TokenKind::Repeat,
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Label,
    TokenKind::Goto,
    TokenKind::Return,
    TokenKind::Select,
    TokenKind::Alt,
    TokenKind::Interleave,
    TokenKind::LBrack,
    TokenKind::For,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::If,
    TokenKind::LBrace,
    TokenKind::Ident,
    TokenKind::AnyKw,
    TokenKind::All,
    TokenKind::Map,
    TokenKind::Unmap,
    TokenKind::Mtc,
    TokenKind::Testcase,
]);

/// Precedence used below every binary operator.
pub const LOWEST_PRECEDENCE: u8 = 0;

/// Binary operator precedence, `LOWEST_PRECEDENCE` for anything else.
pub const fn precedence_of(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Assign => 1,
        TokenKind::Colon => 2,
        TokenKind::Decode => 3,
        TokenKind::Range => 4,
        TokenKind::Excl => 5,
        TokenKind::Or => 6,
        TokenKind::Xor => 7,
        TokenKind::And => 8,
        TokenKind::Not => 9,
        TokenKind::Eq | TokenKind::Ne => 10,
        TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => 11,
        TokenKind::Shr | TokenKind::Shl | TokenKind::Ror | TokenKind::Rol => 12,
        TokenKind::Or4b => 13,
        TokenKind::Xor4b => 14,
        TokenKind::And4b => 15,
        TokenKind::Not4b => 16,
        TokenKind::Add | TokenKind::Sub | TokenKind::Concat => 17,
        TokenKind::Mul | TokenKind::Div | TokenKind::Rem | TokenKind::Mod => 18,
        TokenKind::ColonColon => 19,
        TokenKind::Of => 20,
        _ => LOWEST_PRECEDENCE,
    }
}
