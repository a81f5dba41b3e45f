//! Parser state - statement parsing methods

use crate::node::*;
use crate::parse_rules::STMT_START;
use crate::state::ParserState;
use ttcn_scanner::TokenKind;

impl ParserState<'_> {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_stmt(&mut self) -> NodeIndex {
        if !self.enter() {
            return self.error_node();
        }
        let stmt = self.parse_stmt_inner();
        self.leave();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            TokenKind::Template => {
                let decl = self.parse_template_decl();
                self.finish_node(start, NodeData::DeclStmt(DeclStmtData { decl }))
            }
            TokenKind::Var | TokenKind::Const | TokenKind::Timer | TokenKind::Port => {
                let decl = self.parse_value_decl();
                self.finish_node(start, NodeData::DeclStmt(DeclStmtData { decl }))
            }
            TokenKind::Repeat | TokenKind::Break | TokenKind::Continue => {
                let kind = self.consume();
                self.finish_node(
                    start,
                    NodeData::BranchStmt(BranchStmtData {
                        kind,
                        label: NodeIndex::NONE,
                    }),
                )
            }
            TokenKind::Label | TokenKind::Goto => {
                let kind = self.consume();
                let label = self.parse_ident();
                self.finish_node(start, NodeData::BranchStmt(BranchStmtData { kind, label }))
            }
            TokenKind::Return => {
                self.consume();
                let tok = self.token();
                let result = if STMT_START.contains(tok) || tok == TokenKind::Eof {
                    NodeIndex::NONE
                } else {
                    self.parse_expr()
                };
                self.finish_node(start, NodeData::ReturnStmt(ReturnStmtData { result }))
            }
            TokenKind::Select => self.parse_select_stmt(),
            TokenKind::Alt | TokenKind::Interleave => {
                let kind = self.consume();
                let no_default = self.consume_modif();
                let body = self.parse_block_stmt();
                self.finish_node(
                    start,
                    NodeData::AltStmt(AltStmtData {
                        kind,
                        no_default,
                        body,
                    }),
                )
            }
            TokenKind::LBrack => self.parse_alt_guard(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::LBrace => self.parse_block_stmt(),

            TokenKind::Ident
            | TokenKind::Testcase
            | TokenKind::AnyKw
            | TokenKind::All
            | TokenKind::Map
            | TokenKind::Unmap
            | TokenKind::Mtc => {
                let stmt = self.parse_simple_stmt();
                if self.is_token(TokenKind::LBrace) && self.is_call_of_signature(stmt) {
                    let body = self.parse_block_stmt();
                    return self.finish_node(start, NodeData::CallStmt(CallStmtData { stmt, body }));
                }
                stmt
            }

            TokenKind::Int
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::BitString
            | TokenKind::HexString
            | TokenKind::OctetString
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Pass
            | TokenKind::Fail
            | TokenKind::NoneKw
            | TokenKind::Inconc
            | TokenKind::ErrorKw => self.parse_simple_stmt(),

            _ => {
                self.error_expected("statement");
                self.advance(&STMT_START);
                self.error_node()
            }
        }
    }

    /// `p.call(...)` as an expression statement; such a call may be
    /// followed by a block of response guards.
    fn is_call_of_signature(&self, stmt: NodeIndex) -> bool {
        let Some(expr) = self.arena.as_expr_stmt(stmt) else {
            return false;
        };
        let Some(call) = self.arena.as_call_expr(expr.expr) else {
            return false;
        };
        let Some(selector) = self.arena.as_selector_expr(call.fun) else {
            return false;
        };
        self.arena.kind(selector.sel) == Some(NodeKind::Ident)
            && self.arena.text(self.source(), selector.sel) == "call"
    }

    pub(crate) fn parse_simple_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expr = self.parse_expr();
        self.finish_node(start, NodeData::ExprStmt(ExprStmtData { expr }))
    }

    pub(crate) fn parse_block_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::LBrace);
        let mut stmts = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            stmts.push(self.parse_stmt());
            self.expect_semi();
        }
        self.expect(TokenKind::RBrace);
        self.finish_node(start, NodeData::BlockStmt(BlockStmtData { stmts }))
    }

    // =========================================================================
    // Loops and conditionals
    // =========================================================================

    /// `for (init; cond; post) { ... }` or `for (var T x in list) { ... }`
    fn parse_for_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::For);
        self.expect(TokenKind::LParen);

        let init_start = self.token_pos();
        let init = if self.is_token(TokenKind::Var) {
            let decl = self.parse_value_decl();
            self.finish_node(init_start, NodeData::DeclStmt(DeclStmtData { decl }))
        } else {
            self.parse_simple_stmt()
        };

        if self.is_token(TokenKind::In) {
            self.consume();
            let range = self.parse_expr();
            self.expect(TokenKind::RParen);
            let body = self.parse_block_stmt();
            return self.finish_node(
                start,
                NodeData::ForRangeStmt(ForRangeStmtData { init, range, body }),
            );
        }

        self.expect(TokenKind::Semicolon);
        let cond = self.parse_expr();
        self.expect(TokenKind::Semicolon);
        let post = self.parse_simple_stmt();
        self.expect(TokenKind::RParen);
        let body = self.parse_block_stmt();
        self.finish_node(
            start,
            NodeData::ForStmt(ForStmtData {
                init,
                cond,
                post,
                body,
            }),
        )
    }

    fn parse_while_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::While);
        let cond = self.parse_paren_expr();
        let body = self.parse_block_stmt();
        self.finish_node(start, NodeData::WhileStmt(WhileStmtData { cond, body }))
    }

    fn parse_do_while_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Do);
        let body = self.parse_block_stmt();
        self.expect(TokenKind::While);
        let cond = self.parse_paren_expr();
        self.finish_node(start, NodeData::DoWhileStmt(DoWhileStmtData { body, cond }))
    }

    fn parse_if_stmt(&mut self) -> NodeIndex {
        if !self.enter() {
            return self.error_node();
        }
        let start = self.token_pos();
        self.consume_invariant(TokenKind::If);
        let cond = self.parse_paren_expr();
        let consequent = self.parse_block_stmt();
        let alternate = if self.is_token(TokenKind::Else) {
            self.consume();
            if self.is_token(TokenKind::If) {
                self.parse_if_stmt()
            } else {
                self.parse_block_stmt()
            }
        } else {
            NodeIndex::NONE
        };
        self.leave();
        self.finish_node(
            start,
            NodeData::IfStmt(IfStmtData {
                cond,
                consequent,
                alternate,
            }),
        )
    }

    // =========================================================================
    // Select and alternatives
    // =========================================================================

    /// `select [union] (tag) { case (...) { ... } case else { ... } }`
    fn parse_select_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Select);
        let is_union = if self.is_token(TokenKind::Union) {
            self.consume();
            true
        } else {
            false
        };
        let tag = self.parse_paren_expr();

        self.expect(TokenKind::LBrace);
        let mut clauses = NodeList::new();
        while self.is_token(TokenKind::Case) {
            clauses.push(self.parse_case_clause());
        }
        self.expect(TokenKind::RBrace);

        self.finish_node(
            start,
            NodeData::SelectStmt(SelectStmtData {
                is_union,
                tag,
                clauses,
            }),
        )
    }

    fn parse_case_clause(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Case);
        let cond = if self.is_token(TokenKind::Else) {
            self.consume();
            NodeIndex::NONE
        } else {
            self.parse_paren_expr()
        };
        let body = self.parse_block_stmt();
        self.expect_semi();
        self.finish_node(start, NodeData::CaseClause(CaseClauseData { cond, body }))
    }

    /// Alternative inside `alt`/`interleave`: `[guard] event { ... }` or
    /// `[else] { ... }`.
    fn parse_alt_guard(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::LBrack);

        if self.is_token(TokenKind::Else) {
            self.consume();
            self.expect(TokenKind::RBrack);
            let body = self.parse_block_stmt();
            return self.finish_node(
                start,
                NodeData::CommClause(CommClauseData {
                    x: NodeIndex::NONE,
                    is_else: true,
                    comm: NodeIndex::NONE,
                    body,
                }),
            );
        }

        let x = if self.is_token(TokenKind::RBrack) {
            NodeIndex::NONE
        } else {
            self.parse_expr()
        };
        self.expect(TokenKind::RBrack);
        let comm = self.parse_simple_stmt();
        let body = if self.is_token(TokenKind::LBrace) {
            self.parse_block_stmt()
        } else {
            NodeIndex::NONE
        };

        self.finish_node(
            start,
            NodeData::CommClause(CommClauseData {
                x,
                is_else: false,
                comm,
                body,
            }),
        )
    }
}
