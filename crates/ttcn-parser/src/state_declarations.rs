//! Parser state - module, definition and declaration parsing methods

use crate::node::*;
use crate::parse_rules::{STMT_START, TOP_LEVEL};
use crate::state::ParserState;
use ttcn_common::TextRange;
use ttcn_scanner::{Token, TokenKind};

impl ParserState<'_> {
    // =========================================================================
    // Root and modules
    // =========================================================================

    /// Parse the whole file. The root spans the entire source.
    ///
    /// Usually a file holds a single `module`; bare definitions, statements
    /// and expressions are accepted as well so that fragments still produce
    /// a tree. A token that cannot start any of these stops the loop.
    pub(crate) fn parse_root(&mut self) -> NodeIndex {
        let mut defs = NodeList::new();
        while !self.is_token(TokenKind::Eof) {
            defs.push(self.parse_top_level());

            let tok = self.peek(0);
            if tok.kind != TokenKind::Eof && !TOP_LEVEL.contains(tok.kind) {
                let description = format!("unexpected '{}' token", tok.text(self.source()));
                self.error(tok.range, description);
                break;
            }
            if matches!(tok.kind, TokenKind::Comma | TokenKind::Semicolon) {
                self.consume();
            }
        }
        let len = self.source().len() as u32;
        self.arena
            .add(TextRange::new(0, len), NodeData::Root(RootData { defs }))
    }

    fn parse_top_level(&mut self) -> NodeIndex {
        match self.token() {
            TokenKind::Module => self.parse_module(),

            TokenKind::Control
            | TokenKind::External
            | TokenKind::Friend
            | TokenKind::Function
            | TokenKind::Group
            | TokenKind::Import
            | TokenKind::Modulepar
            | TokenKind::Signature
            | TokenKind::Template
            | TokenKind::Type
            | TokenKind::Var
            | TokenKind::Altstep
            | TokenKind::Const
            | TokenKind::Private
            | TokenKind::Public => self.parse_module_def(),

            TokenKind::Timer
            | TokenKind::Port
            | TokenKind::Repeat
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Label
            | TokenKind::Goto
            | TokenKind::Return
            | TokenKind::Select
            | TokenKind::Alt
            | TokenKind::Interleave
            | TokenKind::LBrack
            | TokenKind::For
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::If
            | TokenKind::LBrace
            | TokenKind::Ident
            | TokenKind::AnyKw
            | TokenKind::All
            | TokenKind::Map
            | TokenKind::Unmap
            | TokenKind::Mtc => self.parse_stmt(),

            // `testcase.stop` is a statement, anything else a definition
            TokenKind::Testcase => {
                if self.peek(1).kind == TokenKind::Dot {
                    self.parse_stmt()
                } else {
                    self.parse_module_def()
                }
            }

            _ => self.parse_expr(),
        }
    }

    pub(crate) fn parse_module(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::Module);
        let name = self.parse_name();
        let language = if self.is_token(TokenKind::Language) {
            self.parse_language_spec()
        } else {
            NodeIndex::NONE
        };

        self.expect(TokenKind::LBrace);
        let defs = self.parse_module_defs();
        self.expect(TokenKind::RBrace);
        let with = self.parse_with();

        tracing::trace!(defs = defs.len(), "parsed module");
        self.finish_node(
            start,
            NodeData::Module(ModuleData {
                name,
                language,
                defs,
                with,
            }),
        )
    }

    /// Definitions up to the closing `}` of a module, group or class.
    fn parse_module_defs(&mut self) -> NodeList {
        let mut defs = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            defs.push(self.parse_module_def());
            self.expect_semi();
        }
        defs
    }

    fn parse_language_spec(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Language);
        let mut list = vec![self.expect(TokenKind::String)];
        while self.is_token(TokenKind::Comma) {
            self.consume();
            list.push(self.expect(TokenKind::String));
        }
        self.finish_node(start, NodeData::LanguageSpec(LanguageSpecData { list }))
    }

    // =========================================================================
    // Module definitions
    // =========================================================================

    pub(crate) fn parse_module_def(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let visibility = match self.token() {
            TokenKind::Private | TokenKind::Public => Some(self.consume()),
            // `friend module M` is a friend declaration, not a visibility
            TokenKind::Friend if self.peek(1).kind != TokenKind::Module => Some(self.consume()),
            _ => None,
        };

        let def = match self.token() {
            TokenKind::Import => self.parse_import(),
            TokenKind::Group => self.parse_group(),
            TokenKind::Friend => self.parse_friend(),
            TokenKind::Type => self.parse_type_decl(),
            TokenKind::Template => self.parse_template_decl(),
            TokenKind::Modulepar => self.parse_module_par(),
            TokenKind::Var | TokenKind::Const => self.parse_value_decl(),
            TokenKind::Signature => self.parse_signature(),
            TokenKind::Function | TokenKind::Testcase | TokenKind::Altstep => {
                self.parse_func_decl()
            }
            TokenKind::Create => self.parse_constructor_decl(),
            TokenKind::Control => self.parse_control_part(),
            TokenKind::External => match self.peek(1).kind {
                TokenKind::Function => self.parse_ext_func_decl(),
                TokenKind::Const => {
                    let range = self.peek(0).range;
                    self.error(range, "external constants are not supported anymore");
                    self.consume();
                    self.parse_value_decl()
                }
                _ => {
                    self.consume();
                    self.error_expected("function");
                    self.advance(&STMT_START);
                    self.error_node()
                }
            },
            _ => {
                self.error_expected("module definition");
                self.advance(&STMT_START);
                self.error_node()
            }
        };

        self.finish_node(start, NodeData::ModuleDef(ModuleDefData { visibility, def }))
    }

    fn parse_control_part(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Control);
        let body = self.parse_block_stmt();
        let with = self.parse_with();
        self.finish_node(start, NodeData::ControlPart(ControlPartData { body, with }))
    }

    fn parse_module_par(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.consume_invariant(TokenKind::Modulepar);

        if !self.is_token(TokenKind::LBrace) {
            let restriction = self.parse_restriction_spec();
            let ty = self.parse_type_ref();
            let decls = self.parse_declarator_list();
            let with = self.parse_with();
            return self.finish_node(
                start,
                NodeData::ValueDecl(ValueDeclData {
                    kind: Some(kind),
                    restriction,
                    modif: None,
                    ty,
                    decls,
                    with,
                }),
            );
        }

        // modulepar { integer a := 1; boolean b }
        self.consume_invariant(TokenKind::LBrace);
        let mut decls = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            let decl_start = self.token_pos();
            let restriction = self.parse_restriction_spec();
            let ty = self.parse_type_ref();
            let list = self.parse_declarator_list();
            self.expect_semi();
            decls.push(self.finish_node(
                decl_start,
                NodeData::ValueDecl(ValueDeclData {
                    kind: Some(kind),
                    restriction,
                    modif: None,
                    ty,
                    decls: list,
                    with: NodeIndex::NONE,
                }),
            ));
        }
        self.expect(TokenKind::RBrace);
        let with = self.parse_with();
        self.finish_node(
            start,
            NodeData::ModuleParameterGroup(ModuleParameterGroupData { decls, with }),
        )
    }

    // =========================================================================
    // Imports, groups and friends
    // =========================================================================

    fn parse_import(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Import);
        self.expect(TokenKind::From);
        let module = self.parse_name();
        let language = if self.is_token(TokenKind::Language) {
            self.parse_language_spec()
        } else {
            NodeIndex::NONE
        };

        let mut list = NodeList::new();
        match self.token() {
            TokenKind::All => {
                // import from M all [except { ... }]
                let kind_start = self.token_pos();
                let mut x = self.parse_any_ident();
                if self.is_token(TokenKind::Except) {
                    x = self.parse_except_block(x);
                }
                list.push(self.finish_node(
                    kind_start,
                    NodeData::DefKindExpr(DefKindExprData {
                        kind: None,
                        list: vec![x],
                    }),
                ));
            }
            TokenKind::LBrace => {
                self.consume();
                while self.is_list_open(TokenKind::RBrace) {
                    list.push(self.parse_import_stmt());
                    self.expect_semi();
                }
                self.expect(TokenKind::RBrace);
            }
            _ => {
                self.error_expected("'all' or import spec");
                self.advance(&STMT_START);
            }
        }

        let with = self.parse_with();
        self.finish_node(
            start,
            NodeData::ImportDecl(ImportDeclData {
                module,
                language,
                list,
                with,
            }),
        )
    }

    /// `x except { ... }`
    fn parse_except_block(&mut self, x: NodeIndex) -> NodeIndex {
        self.consume_invariant(TokenKind::Except);
        self.expect(TokenKind::LBrace);
        let mut list = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            list.push(self.parse_except_stmt());
            self.expect_semi();
        }
        self.expect(TokenKind::RBrace);
        self.finish_incorporating(x, NodeData::ExceptExpr(ExceptExprData { x, list }))
    }

    /// One entry inside `import from M { ... }`.
    fn parse_import_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            TokenKind::Altstep
            | TokenKind::Const
            | TokenKind::Function
            | TokenKind::Modulepar
            | TokenKind::Signature
            | TokenKind::Template
            | TokenKind::Testcase
            | TokenKind::Type => {
                let kind = self.consume();
                let list = if self.is_token(TokenKind::All) {
                    let mut x = self.parse_any_ident();
                    if self.is_token(TokenKind::Except) {
                        self.consume();
                        let list = self.parse_ref_list();
                        x = self.finish_incorporating(x, NodeData::ExceptExpr(ExceptExprData { x, list }));
                    }
                    vec![x]
                } else {
                    self.parse_ref_list()
                };
                self.finish_node(
                    start,
                    NodeData::DefKindExpr(DefKindExprData {
                        kind: Some(kind),
                        list,
                    }),
                )
            }
            TokenKind::Group => {
                let kind = self.consume();
                let mut list = NodeList::new();
                loop {
                    let mut x = self.parse_type_ref();
                    if self.is_token(TokenKind::Except) {
                        x = self.parse_except_block(x);
                    }
                    list.push(x);
                    if !self.is_token(TokenKind::Comma) {
                        break;
                    }
                    self.consume();
                }
                self.finish_node(
                    start,
                    NodeData::DefKindExpr(DefKindExprData {
                        kind: Some(kind),
                        list,
                    }),
                )
            }
            TokenKind::Import => {
                // transit import: { import all }
                let kind = self.consume();
                let x = self.parse_expected_ident(TokenKind::All);
                self.finish_node(
                    start,
                    NodeData::DefKindExpr(DefKindExprData {
                        kind: Some(kind),
                        list: vec![x],
                    }),
                )
            }
            _ => {
                self.error_expected("import definition qualifier");
                self.advance(&STMT_START);
                self.error_node()
            }
        }
    }

    fn parse_except_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = match self.token() {
            TokenKind::Altstep
            | TokenKind::Const
            | TokenKind::Function
            | TokenKind::Group
            | TokenKind::Import
            | TokenKind::Modulepar
            | TokenKind::Signature
            | TokenKind::Template
            | TokenKind::Testcase
            | TokenKind::Type => Some(self.consume()),
            _ => {
                self.error_expected("definition qualifier");
                None
            }
        };

        let list = if self.is_token(TokenKind::All) {
            vec![self.parse_any_ident()]
        } else {
            self.parse_ref_list()
        };
        self.finish_node(start, NodeData::DefKindExpr(DefKindExprData { kind, list }))
    }

    fn parse_group(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Group);
        let name = self.parse_name();
        self.expect(TokenKind::LBrace);
        let defs = self.parse_module_defs();
        self.expect(TokenKind::RBrace);
        let with = self.parse_with();
        self.finish_node(start, NodeData::GroupDecl(GroupDeclData { name, defs, with }))
    }

    fn parse_friend(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::Friend);
        self.expect(TokenKind::Module);
        let module = self.parse_name();
        let with = self.parse_with();
        self.finish_node(start, NodeData::FriendDecl(FriendDeclData { module, with }))
    }

    // =========================================================================
    // With attributes
    // =========================================================================

    /// Optional `with { ... }` attribute block.
    pub(crate) fn parse_with(&mut self) -> NodeIndex {
        if !self.is_token(TokenKind::With) {
            return NodeIndex::NONE;
        }
        let start = self.token_pos();
        self.consume();
        self.expect(TokenKind::LBrace);
        let mut list = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            list.push(self.parse_with_stmt());
            self.expect_semi();
        }
        self.expect(TokenKind::RBrace);
        self.finish_node(start, NodeData::WithSpec(WithSpecData { list }))
    }

    fn parse_with_stmt(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = match self.token() {
            TokenKind::Encode
            | TokenKind::Variant
            | TokenKind::Display
            | TokenKind::Extension
            | TokenKind::Optional
            | TokenKind::Stepsize
            | TokenKind::Override => Some(self.consume()),
            _ => {
                self.error_expected("with-attribute");
                self.advance(&STMT_START);
                None
            }
        };

        let mut override_ = false;
        match self.token() {
            TokenKind::Override => {
                self.consume();
                override_ = true;
            }
            TokenKind::Modif => {
                if self.token_text() != "@local" {
                    self.error_expected("@local");
                }
                self.consume();
                override_ = true;
            }
            _ => {}
        }

        let mut list = NodeList::new();
        if self.is_token(TokenKind::LParen) {
            self.consume();
            loop {
                list.push(self.parse_with_qualifier());
                if !self.is_token(TokenKind::Comma) {
                    break;
                }
                self.consume();
            }
            self.expect(TokenKind::RParen);
        }

        let value_start = self.token_pos();
        let tok = self.expect(TokenKind::String);
        let mut value = self.finish_node(value_start, NodeData::ValueLiteral(ValueLiteralData { tok }));
        if self.is_token(TokenKind::Dot) {
            self.consume();
            let sel_start = self.token_pos();
            self.expect(TokenKind::String);
            let sel = self.finish_node(sel_start, NodeData::Ident);
            value = self.finish_incorporating(
                value,
                NodeData::SelectorExpr(SelectorExprData { x: value, sel }),
            );
        }

        self.finish_node(
            start,
            NodeData::WithStmt(WithStmtData {
                kind,
                override_,
                list,
                value,
            }),
        )
    }

    fn parse_with_qualifier(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            TokenKind::Ident => self.parse_type_ref(),
            TokenKind::LBrack => self.parse_index_expr(NodeIndex::NONE),
            TokenKind::Type
            | TokenKind::Template
            | TokenKind::Const
            | TokenKind::Altstep
            | TokenKind::Testcase
            | TokenKind::Function
            | TokenKind::Signature
            | TokenKind::Modulepar
            | TokenKind::Group => {
                let kind = self.consume();
                let mut x = self.parse_expected_ident(TokenKind::All);
                if self.is_token(TokenKind::Except) {
                    self.consume();
                    self.expect(TokenKind::LBrace);
                    let list = self.parse_ref_list();
                    self.expect(TokenKind::RBrace);
                    x = self.finish_incorporating(x, NodeData::ExceptExpr(ExceptExprData { x, list }));
                }
                self.finish_node(
                    start,
                    NodeData::DefKindExpr(DefKindExprData {
                        kind: Some(kind),
                        list: vec![x],
                    }),
                )
            }
            _ => {
                self.error_expected("with-qualifier");
                self.advance(&STMT_START);
                self.error_node()
            }
        }
    }

    // =========================================================================
    // Values and templates
    // =========================================================================

    /// `var`, `const`, `timer` and `port` declarations.
    pub(crate) fn parse_value_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut kind = None;
        let mut restriction = NodeIndex::NONE;
        let mut modif = None;

        // for timers the keyword doubles as the type
        if !self.is_token(TokenKind::Timer) {
            kind = Some(self.consume());
            restriction = self.parse_restriction_spec();
            if self.is_token(TokenKind::Modif) {
                modif = Some(self.consume());
            }
        }

        let ty = self.parse_type_ref();
        let decls = self.parse_declarator_list();
        let with = self.parse_with();
        self.finish_node(
            start,
            NodeData::ValueDecl(ValueDeclData {
                kind,
                restriction,
                modif,
                ty,
                decls,
                with,
            }),
        )
    }

    /// `template`, `template(omit)`, `omit`, `value` or `present`; `NONE`
    /// when none is given.
    pub(crate) fn parse_restriction_spec(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            TokenKind::Template => {
                self.consume();
                let mut ty = None;
                if self.is_token(TokenKind::LParen) {
                    self.consume();
                    ty = Some(self.consume());
                    self.expect(TokenKind::RParen);
                }
                self.finish_node(
                    start,
                    NodeData::RestrictionSpec(RestrictionSpecData { template: true, ty }),
                )
            }
            TokenKind::Omit | TokenKind::Value | TokenKind::Present => {
                let ty = Some(self.consume());
                self.finish_node(
                    start,
                    NodeData::RestrictionSpec(RestrictionSpecData {
                        template: false,
                        ty,
                    }),
                )
            }
            _ => NodeIndex::NONE,
        }
    }

    fn parse_declarator_list(&mut self) -> NodeList {
        let mut list = vec![self.parse_declarator()];
        while self.is_token(TokenKind::Comma) {
            self.consume();
            list.push(self.parse_declarator());
        }
        list
    }

    fn parse_declarator(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let name = self.parse_name();
        let arraydef = if self.is_token(TokenKind::LBrack) {
            self.parse_array_defs()
        } else {
            NodeList::new()
        };
        let value = if self.is_token(TokenKind::Assign) {
            self.consume();
            self.parse_expr()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            start,
            NodeData::Declarator(DeclaratorData {
                name,
                arraydef,
                value,
            }),
        )
    }

    pub(crate) fn parse_template_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Template);

        let mut restriction = NodeIndex::NONE;
        if self.is_token(TokenKind::LParen) {
            let restriction_start = self.token_pos();
            self.consume();
            let ty = Some(self.consume());
            self.expect(TokenKind::RParen);
            restriction = self.finish_node(
                restriction_start,
                NodeData::RestrictionSpec(RestrictionSpecData { template: true, ty }),
            );
        }

        let modif = self.consume_modif();
        let ty = self.parse_type_ref();
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let params = if self.is_token(TokenKind::LParen) {
            self.parse_formal_pars()
        } else {
            NodeIndex::NONE
        };
        let base = if self.is_token(TokenKind::Modifies) {
            self.consume();
            self.parse_primary_expr()
        } else {
            NodeIndex::NONE
        };
        self.expect(TokenKind::Assign);
        let value = self.parse_expr();
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::TemplateDecl(TemplateDeclData {
                restriction,
                modif,
                ty,
                name,
                pars,
                params,
                base,
                value,
                with,
            }),
        )
    }

    // =========================================================================
    // Behaviours
    // =========================================================================

    /// `function`, `testcase` and `altstep` definitions.
    pub(crate) fn parse_func_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.consume();
        let modif = self.consume_modif();
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let params = self.parse_formal_pars();
        let runs_on = self.parse_optional_runs_on();
        let mtc = self.parse_optional_mtc();
        let system = self.parse_optional_system();
        let ret = self.parse_optional_return();
        let body = if self.is_token(TokenKind::LBrace) {
            self.parse_block_stmt()
        } else {
            NodeIndex::NONE
        };
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::FuncDecl(FuncDeclData {
                external: false,
                kind,
                modif,
                name,
                pars,
                params,
                runs_on,
                mtc,
                system,
                ret,
                body,
                with,
            }),
        )
    }

    fn parse_ext_func_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::External);
        let kind = self.expect(TokenKind::Function);
        let modif = self.consume_modif();
        let name = self.parse_name();
        let params = self.parse_formal_pars();
        let runs_on = self.parse_optional_runs_on();
        let mtc = self.parse_optional_mtc();
        let system = self.parse_optional_system();
        let ret = self.parse_optional_return();
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::FuncDecl(FuncDeclData {
                external: true,
                kind,
                modif,
                name,
                pars: NodeIndex::NONE,
                params,
                runs_on,
                mtc,
                system,
                ret,
                body: NodeIndex::NONE,
                with,
            }),
        )
    }

    /// Class constructor: `create(params) { ... }`
    fn parse_constructor_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Create);
        let params = self.parse_formal_pars();
        let body = self.parse_block_stmt();
        self.finish_node(
            start,
            NodeData::ConstructorDecl(ConstructorDeclData { params, body }),
        )
    }

    fn parse_signature(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Signature);
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let params = self.parse_formal_pars();

        let noblock = if self.is_token(TokenKind::Noblock) {
            self.consume();
            true
        } else {
            false
        };
        let ret = self.parse_optional_return();
        let exception = if self.is_token(TokenKind::Exception) {
            self.consume();
            self.parse_paren_expr()
        } else {
            NodeIndex::NONE
        };
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::SignatureDecl(SignatureDeclData {
                name,
                pars,
                params,
                noblock,
                ret,
                exception,
                with,
            }),
        )
    }

    /// Consume a `@modifier` token if present.
    pub(crate) fn consume_modif(&mut self) -> Option<Token> {
        if self.is_token(TokenKind::Modif) {
            Some(self.consume())
        } else {
            None
        }
    }
}
