//! Parser state - expression parsing methods

use crate::node::*;
use crate::parse_rules::{LOWEST_PRECEDENCE, OPERAND_START, precedence_of};
use crate::state::ParserState;
use ttcn_scanner::TokenKind;

impl ParserState<'_> {
    // =========================================================================
    // Names
    // =========================================================================

    /// Name being declared. Returns `NONE` after reporting an error when the
    /// current token cannot be a name.
    pub(crate) fn parse_name(&mut self) -> NodeIndex {
        match self.token() {
            TokenKind::Ident | TokenKind::Address | TokenKind::Control | TokenKind::Class => {
                let start = self.token_pos();
                self.consume();
                self.finish_node(start, NodeData::NameIdent)
            }
            _ => {
                self.expect(TokenKind::Ident);
                NodeIndex::NONE
            }
        }
    }

    /// Referencing identifier, also used for labels and selectors.
    pub(crate) fn parse_ident(&mut self) -> NodeIndex {
        match self.token() {
            TokenKind::Ident
            | TokenKind::Create
            | TokenKind::Address
            | TokenKind::Control
            | TokenKind::Class
            | TokenKind::Alive => self.parse_any_ident(),
            _ => {
                self.expect(TokenKind::Ident);
                NodeIndex::NONE
            }
        }
    }

    /// Consume the current token, whatever it is, as an identifier.
    pub(crate) fn parse_any_ident(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume();
        self.finish_node(start, NodeData::Ident)
    }

    /// Identifier node over a token of the given kind (`all` in
    /// `import all`).
    pub(crate) fn parse_expected_ident(&mut self, kind: TokenKind) -> NodeIndex {
        let start = self.token_pos();
        self.expect(kind);
        self.finish_node(start, NodeData::Ident)
    }

    /// Identifier optionally followed by actual type parameters.
    ///
    /// `<` after a reference is ambiguous: `R<integer>` is a parametrized
    /// type, `a < b` a comparison. The type parameter list is parsed
    /// speculatively and kept only if it is well formed and not followed by
    /// something that starts an operand.
    pub(crate) fn parse_ref(&mut self) -> NodeIndex {
        let ident = self.parse_ident();
        if ident.is_none() || !self.is_token(TokenKind::Lt) {
            return ident;
        }

        self.mark();
        let params = self.try_parse_type_parameters();
        if params.is_some() && !OPERAND_START.contains(self.token()) {
            self.commit();
            return self.finish_incorporating(
                ident,
                NodeData::ParametrizedIdent(ParametrizedIdentData { ident, params }),
            );
        }
        self.reset();
        ident
    }

    fn try_parse_type_parameters(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume(); // <
        let mut list = NodeList::new();
        while !self.is_token(TokenKind::Gt) {
            let y = self.try_parse_type_parameter();
            if y.is_none() {
                return NodeIndex::NONE;
            }
            list.push(y);
            if !self.is_token(TokenKind::Comma) {
                break;
            }
            self.consume();
        }
        if !self.is_token(TokenKind::Gt) {
            return NodeIndex::NONE;
        }
        self.consume();
        self.finish_node(start, NodeData::ParenExpr(ParenExprData { list }))
    }

    fn try_parse_type_parameter(&mut self) -> NodeIndex {
        let mut x = self.try_parse_type_ident();
        if x.is_none() {
            return NodeIndex::NONE;
        }
        loop {
            match self.token() {
                TokenKind::Dot => {
                    self.consume();
                    let sel = self.try_parse_type_ident();
                    if sel.is_none() {
                        return NodeIndex::NONE;
                    }
                    x = self
                        .finish_incorporating(x, NodeData::SelectorExpr(SelectorExprData { x, sel }));
                }
                TokenKind::LBrack => {
                    // only the `[-]` element type form
                    self.consume();
                    let dash = self.consume();
                    let rbrack = self.consume();
                    if dash.kind != TokenKind::Sub || rbrack.kind != TokenKind::RBrack {
                        return NodeIndex::NONE;
                    }
                    let index = self
                        .arena
                        .add(dash.range, NodeData::ValueLiteral(ValueLiteralData { tok: dash }));
                    x = self.finish_incorporating(x, NodeData::IndexExpr(IndexExprData { x, index }));
                }
                _ => return x,
            }
        }
    }

    fn try_parse_type_ident(&mut self) -> NodeIndex {
        let x = match self.token() {
            TokenKind::Ident | TokenKind::Address | TokenKind::Charstring => self.parse_any_ident(),
            TokenKind::Universal => self.parse_universal_charstring(),
            _ => return NodeIndex::NONE,
        };
        if self.is_token(TokenKind::Lt) {
            let params = self.try_parse_type_parameters();
            if params.is_none() {
                return NodeIndex::NONE;
            }
            return self.finish_incorporating(
                x,
                NodeData::ParametrizedIdent(ParametrizedIdentData { ident: x, params }),
            );
        }
        x
    }

    pub(crate) fn parse_universal_charstring(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let first = self.expect(TokenKind::Universal);
        let second = self.expect(TokenKind::Charstring);
        self.finish_node(
            start,
            NodeData::CompositeIdent(CompositeIdentData { first, second }),
        )
    }

    /// Comma separated list of type references.
    pub(crate) fn parse_ref_list(&mut self) -> NodeList {
        let mut list = NodeList::new();
        loop {
            list.push(self.parse_type_ref());
            if !self.is_token(TokenKind::Comma) {
                return list;
            }
            self.consume();
        }
    }

    #[inline]
    pub(crate) fn parse_type_ref(&mut self) -> NodeIndex {
        self.parse_primary_expr()
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn parse_expr(&mut self) -> NodeIndex {
        self.parse_binary_expr(LOWEST_PRECEDENCE + 1)
    }

    /// Precedence climbing. `:=` is right associative, everything else
    /// associates to the left.
    pub(crate) fn parse_binary_expr(&mut self, min_precedence: u8) -> NodeIndex {
        let mut x = self.parse_postfix_expr();
        loop {
            let kind = self.token();
            let precedence = precedence_of(kind);
            if precedence < min_precedence {
                return x;
            }

            if kind == TokenKind::Assign {
                self.consume();
                let value = self.parse_binary_expr(precedence);
                x = self.finish_incorporating(
                    x,
                    NodeData::AssignmentExpr(AssignmentExprData { property: x, value }),
                );
                continue;
            }

            let op = self.consume();
            let y = self.parse_binary_expr(precedence + 1);
            x = self.finish_incorporating(x, NodeData::BinaryExpr(BinaryExprData { x, op, y }));
        }
    }

    fn parse_postfix_expr(&mut self) -> NodeIndex {
        let mut x = self.parse_unary_expr();

        if matches!(self.token(), TokenKind::Inc | TokenKind::Dec) {
            let op = self.consume();
            x = self.finish_incorporating(x, NodeData::PostExpr(PostExprData { x, op }));
        }

        if self.is_token(TokenKind::Length) {
            x = self.parse_length_expr(x);
        }

        if self.is_token(TokenKind::Ifpresent) {
            let op = self.consume();
            x = self.finish_incorporating(x, NodeData::UnaryExpr(UnaryExprData { op, x }));
        }

        if matches!(self.token(), TokenKind::To | TokenKind::From) {
            let op = self.consume();
            let y = self.parse_expr();
            x = self.finish_incorporating(x, NodeData::BinaryExpr(BinaryExprData { x, op, y }));
        }

        if self.is_token(TokenKind::Redir) {
            x = self.parse_redirect(x);
        }

        if self.is_token(TokenKind::Value) {
            self.consume();
            let y = self.parse_expr();
            x = self.finish_incorporating(x, NodeData::ValueExpr(ValueExprData { x, y }));
        }

        if self.is_token(TokenKind::Param) {
            self.consume();
            let y = self.parse_paren_expr();
            x = self.finish_incorporating(x, NodeData::ParamExpr(ParamExprData { x, y }));
        }

        if self.is_token(TokenKind::Alive) {
            let op = self.consume();
            x = self.finish_incorporating(x, NodeData::UnaryExpr(UnaryExprData { op, x }));
        }

        x
    }

    fn parse_unary_expr(&mut self) -> NodeIndex {
        if !self.enter() {
            return self.error_node();
        }
        let start = self.token_pos();
        let x = match self.token() {
            TokenKind::Add
            | TokenKind::Excl
            | TokenKind::Not
            | TokenKind::Not4b
            | TokenKind::Sub
            | TokenKind::Inc
            | TokenKind::Dec => {
                let op = self.consume();
                // a lone `-` is the "not used" value
                if op.kind == TokenKind::Sub
                    && matches!(
                        self.token(),
                        TokenKind::Comma
                            | TokenKind::Semicolon
                            | TokenKind::RBrace
                            | TokenKind::RBrack
                            | TokenKind::RParen
                            | TokenKind::Eof
                    )
                {
                    self.finish_node(start, NodeData::ValueLiteral(ValueLiteralData { tok: op }))
                } else {
                    let x = self.parse_unary_expr();
                    self.finish_node(start, NodeData::UnaryExpr(UnaryExprData { op, x }))
                }
            }
            TokenKind::ColonColon => {
                let op = self.consume();
                let y = self.parse_expr();
                self.finish_node(
                    start,
                    NodeData::BinaryExpr(BinaryExprData {
                        x: NodeIndex::NONE,
                        op,
                        y,
                    }),
                )
            }
            _ => self.parse_primary_expr(),
        };
        self.leave();
        x
    }

    // =========================================================================
    // Primaries
    // =========================================================================

    /// Operand followed by any number of `.sel`, `[index]` and `(args)`.
    pub(crate) fn parse_primary_expr(&mut self) -> NodeIndex {
        let mut x = self.parse_operand();
        loop {
            x = match self.token() {
                TokenKind::Dot => self.parse_selector_expr(x),
                TokenKind::LBrack => self.parse_index_expr(x),
                TokenKind::LParen => self.parse_call_expr(x),
                _ => return x,
            };
        }
    }

    fn parse_operand(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            TokenKind::AnyKw | TokenKind::All => {
                let first = self.consume();
                match self.token() {
                    TokenKind::Component | TokenKind::Port | TokenKind::Timer => {
                        let second = self.consume();
                        self.finish_node(
                            start,
                            NodeData::CompositeIdent(CompositeIdentData { first, second }),
                        )
                    }
                    TokenKind::From => {
                        let from = self.consume();
                        let x = self.parse_primary_expr();
                        self.finish_node(
                            start,
                            NodeData::FromExpr(FromExprData {
                                kind: first,
                                from,
                                x,
                            }),
                        )
                    }
                    _ => self.arena.add(first.range, NodeData::Ident),
                }
            }

            TokenKind::Universal => self.parse_universal_charstring(),

            TokenKind::Address
            | TokenKind::Charstring
            | TokenKind::Class
            | TokenKind::Map
            | TokenKind::Mtc
            | TokenKind::System
            | TokenKind::Testcase
            | TokenKind::Timer
            | TokenKind::Unmap
            | TokenKind::Value => self.parse_any_ident(),

            TokenKind::Ident => self.parse_ref(),

            TokenKind::Int
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::BitString
            | TokenKind::HexString
            | TokenKind::OctetString
            | TokenKind::Question
            | TokenKind::Mul
            | TokenKind::ErrorKw
            | TokenKind::Null
            | TokenKind::Omit
            | TokenKind::Fail
            | TokenKind::False
            | TokenKind::Inconc
            | TokenKind::NotANumber
            | TokenKind::NoneKw
            | TokenKind::Pass
            | TokenKind::True => {
                let tok = self.consume();
                self.finish_node(start, NodeData::ValueLiteral(ValueLiteralData { tok }))
            }

            // `(1, 2, 3)` template list or `(1 + 2)` grouping
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::LBrack => self.parse_index_expr(NodeIndex::NONE),
            TokenKind::LBrace => self.parse_composite_literal(),

            TokenKind::Modifies => {
                self.consume();
                let x = self.parse_primary_expr();
                self.expect(TokenKind::Assign);
                let y = self.parse_expr();
                self.finish_node(start, NodeData::ModifiesExpr(ModifiesExprData { x, y }))
            }

            TokenKind::Regexp => {
                self.consume();
                let nocase = self.consume_nocase();
                let x = self.parse_paren_expr();
                self.finish_node(start, NodeData::RegexpExpr(RegexpExprData { nocase, x }))
            }

            TokenKind::Pattern => {
                self.consume();
                let nocase = self.consume_nocase();
                let x = self.parse_expr();
                self.finish_node(start, NodeData::PatternExpr(PatternExprData { nocase, x }))
            }

            TokenKind::Decmatch => {
                self.consume();
                let params = if self.is_token(TokenKind::LParen) {
                    self.parse_paren_expr()
                } else {
                    NodeIndex::NONE
                };
                let x = self.parse_expr();
                self.finish_node(start, NodeData::DecmatchExpr(DecmatchExprData { params, x }))
            }

            TokenKind::Modif => self.parse_modifier(),

            _ => {
                self.error_expected("operand");
                self.error_node()
            }
        }
    }

    fn consume_nocase(&mut self) -> bool {
        if self.is_token(TokenKind::Modif) {
            self.consume();
            return true;
        }
        false
    }

    /// `@dynamic { ... }` and `@decoded(params) x`.
    fn parse_modifier(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token_text() {
            "@dynamic" => {
                self.consume();
                let body = self.parse_block_stmt();
                self.finish_node(start, NodeData::DynamicExpr(DynamicExprData { body }))
            }
            "@decoded" => {
                self.consume();
                let params = if self.is_token(TokenKind::LParen) {
                    self.parse_paren_expr()
                } else {
                    NodeIndex::NONE
                };
                let x = self.parse_primary_expr();
                self.finish_node(start, NodeData::DecodedExpr(DecodedExprData { params, x }))
            }
            text => {
                let description = format!("unexpected modifier '{text}'");
                let tok = self.consume();
                self.error(tok.range, description);
                self.finish_node(start, NodeData::Error)
            }
        }
    }

    fn parse_selector_expr(&mut self, x: NodeIndex) -> NodeIndex {
        self.consume_invariant(TokenKind::Dot);
        let sel = self.parse_ref();
        self.finish_incorporating(x, NodeData::SelectorExpr(SelectorExprData { x, sel }))
    }

    /// `x[index]`, or a bare `[index]` when `x` is `NONE`.
    pub(crate) fn parse_index_expr(&mut self, x: NodeIndex) -> NodeIndex {
        let start = self.start_of(x);
        self.expect(TokenKind::LBrack);
        let index = self.parse_expr();
        self.expect(TokenKind::RBrack);
        self.finish_node(start, NodeData::IndexExpr(IndexExprData { x, index }))
    }

    fn parse_call_expr(&mut self, fun: NodeIndex) -> NodeIndex {
        let start = self.start_of(fun);
        let args_start = self.token_pos();
        self.expect(TokenKind::LParen);
        let mut list = NodeList::new();
        match self.token() {
            TokenKind::RParen => {}
            TokenKind::To | TokenKind::From => {
                let arg_start = self.token_pos();
                let op = self.consume();
                let y = self.parse_expr();
                list.push(self.finish_node(
                    arg_start,
                    NodeData::BinaryExpr(BinaryExprData {
                        x: NodeIndex::NONE,
                        op,
                        y,
                    }),
                ));
            }
            TokenKind::Redir => list.push(self.parse_redirect(NodeIndex::NONE)),
            _ => list = self.parse_expr_list(),
        }
        self.expect(TokenKind::RParen);
        let args = self.finish_node(args_start, NodeData::ParenExpr(ParenExprData { list }));
        self.finish_node(start, NodeData::CallExpr(CallExprData { fun, args }))
    }

    pub(crate) fn parse_length_expr(&mut self, x: NodeIndex) -> NodeIndex {
        let start = self.start_of(x);
        self.expect(TokenKind::Length);
        let size = self.parse_paren_expr();
        self.finish_node(start, NodeData::LengthExpr(LengthExprData { x, size }))
    }

    /// `-> value v param p sender s @index i timestamp t`, each part
    /// optional.
    fn parse_redirect(&mut self, x: NodeIndex) -> NodeIndex {
        let start = self.start_of(x);
        self.expect(TokenKind::Redir);

        let mut value = NodeList::new();
        if self.is_token(TokenKind::Value) {
            self.consume();
            value = self.parse_expr_list();
        }

        let mut param = NodeList::new();
        if self.is_token(TokenKind::Param) {
            self.consume();
            param = self.parse_expr_list();
        }

        let mut sender = NodeIndex::NONE;
        if self.is_token(TokenKind::Sender) {
            self.consume();
            sender = self.parse_primary_expr();
        }

        let mut index = NodeIndex::NONE;
        if self.is_token(TokenKind::Modif) {
            let text = self.token_text();
            if text != "@index" {
                let range = self.peek(0).range;
                self.error(range, format!("expected '@index', found {text}"));
            }
            let index_start = self.token_pos();
            self.consume();
            let by_value = if self.is_token(TokenKind::Value) {
                self.consume();
                true
            } else {
                false
            };
            let target = self.parse_primary_expr();
            index = self.finish_node(
                index_start,
                NodeData::RedirectToIndex(RedirectToIndexData {
                    value: by_value,
                    index: target,
                }),
            );
        }

        let mut timestamp = NodeIndex::NONE;
        if self.is_token(TokenKind::Timestamp) {
            self.consume();
            timestamp = self.parse_primary_expr();
        }

        self.finish_node(
            start,
            NodeData::RedirectExpr(RedirectExprData {
                x,
                value,
                param,
                sender,
                index,
                timestamp,
            }),
        )
    }

    pub(crate) fn parse_expr_list(&mut self) -> NodeList {
        let mut list = vec![self.parse_expr()];
        while self.is_token(TokenKind::Comma) {
            self.consume();
            list.push(self.parse_expr());
        }
        list
    }

    pub(crate) fn parse_paren_expr(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::LParen);
        let list = self.parse_expr_list();
        self.expect(TokenKind::RParen);
        self.finish_node(start, NodeData::ParenExpr(ParenExprData { list }))
    }

    fn parse_composite_literal(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::LBrace);
        let mut list = NodeList::new();
        if !self.is_token(TokenKind::RBrace) {
            list = self.parse_expr_list();
        }
        self.expect(TokenKind::RBrace);

        // field assignments need a field name or an index on the left
        for &elem in &list {
            let Some(assign) = self.arena.as_assignment_expr(elem) else {
                continue;
            };
            let property = assign.property;
            if !matches!(
                self.arena.kind(property),
                Some(NodeKind::Ident | NodeKind::IndexExpr)
            ) {
                let range = self.arena.range(property);
                self.error(range, "identifier expected");
            }
        }

        self.finish_node(start, NodeData::CompositeLiteral(CompositeLiteralData { list }))
    }

    /// Start of an absorbed left operand, or of the current token when
    /// there is none.
    #[inline]
    fn start_of(&self, x: NodeIndex) -> u32 {
        if x.is_some() {
            self.arena.range(x).begin
        } else {
            self.token_pos()
        }
    }
}
