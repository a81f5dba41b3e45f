//! Parser state - type declaration and type specification parsing methods

use crate::node::*;
use crate::parse_rules::STMT_START;
use crate::state::ParserState;
use ttcn_scanner::TokenKind;

impl ParserState<'_> {
    // =========================================================================
    // Type declarations
    // =========================================================================

    /// `type ...`; the token after `type` selects the form.
    pub(crate) fn parse_type_decl(&mut self) -> NodeIndex {
        match self.peek(1).kind {
            TokenKind::Ident
            | TokenKind::Address
            | TokenKind::Charstring
            | TokenKind::Null
            | TokenKind::Universal => self.parse_sub_type_decl(),
            TokenKind::Port => self.parse_port_type_decl(),
            TokenKind::Component => self.parse_component_type_decl(),
            TokenKind::Class => self.parse_class_type_decl(false),
            TokenKind::External if self.peek(2).kind == TokenKind::Class => {
                self.parse_class_type_decl(true)
            }
            TokenKind::Union => self.parse_struct_type_decl(),
            TokenKind::Map => self.parse_map_type_decl(),
            // `type record R {...}` declares a structure, `type record of T L`
            // is a list sub-type
            TokenKind::Set | TokenKind::Record => match self.peek(2).kind {
                TokenKind::Ident | TokenKind::Address => self.parse_struct_type_decl(),
                _ => self.parse_sub_type_decl(),
            },
            TokenKind::Enumerated => self.parse_enum_type_decl(),
            TokenKind::Function | TokenKind::Altstep | TokenKind::Testcase => {
                self.parse_behaviour_type_decl()
            }
            _ => {
                self.consume_invariant(TokenKind::Type);
                self.error_expected("type definition");
                self.advance(&STMT_START);
                self.error_node()
            }
        }
    }

    fn parse_sub_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        let field = self.parse_field();
        let with = self.parse_with();
        self.finish_node(start, NodeData::SubTypeDecl(SubTypeDeclData { field, with }))
    }

    fn parse_port_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        self.consume_invariant(TokenKind::Port);
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();

        let kind = match self.token() {
            TokenKind::Mixed | TokenKind::Message | TokenKind::Procedure => Some(self.consume()),
            _ => {
                self.error_expected("'message' or 'procedure'");
                None
            }
        };

        let realtime = if self.is_token(TokenKind::Realtime) {
            self.consume();
            true
        } else {
            false
        };

        self.expect(TokenKind::LBrace);
        let mut attrs = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            attrs.push(self.parse_port_attribute());
            self.expect_semi();
        }
        self.expect(TokenKind::RBrace);
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::PortTypeDecl(PortTypeDeclData {
                name,
                pars,
                kind,
                realtime,
                attrs,
                with,
            }),
        )
    }

    fn parse_port_attribute(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            TokenKind::In | TokenKind::Out | TokenKind::Inout | TokenKind::Address => {
                let kind = self.consume();
                let types = self.parse_ref_list();
                self.finish_node(start, NodeData::PortAttribute(PortAttributeData { kind, types }))
            }
            TokenKind::Map | TokenKind::Unmap => {
                self.consume();
                self.expect(TokenKind::Param);
                let params = self.parse_formal_pars();
                self.finish_node(start, NodeData::PortMapAttribute(PortMapAttributeData { params }))
            }
            _ => {
                self.error_expected("port attribute");
                self.advance(&STMT_START);
                self.error_node()
            }
        }
    }

    fn parse_component_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        self.consume_invariant(TokenKind::Component);
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let extends = if self.is_token(TokenKind::Extends) {
            self.consume();
            self.parse_ref_list()
        } else {
            NodeList::new()
        };
        let body = self.parse_block_stmt();
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::ComponentTypeDecl(ComponentTypeDeclData {
                name,
                pars,
                extends,
                body,
                with,
            }),
        )
    }

    /// `type [external] class [@modifier] C [extends B] [runs on ...] [mtc ...]
    /// [system ...] { ... } [finally { ... }]`
    fn parse_class_type_decl(&mut self, external: bool) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        if external {
            self.consume_invariant(TokenKind::External);
        }
        self.consume_invariant(TokenKind::Class);
        let modif = self.consume_modif();
        let name = self.parse_name();
        let extends = if self.is_token(TokenKind::Extends) {
            self.consume();
            self.parse_ref_list()
        } else {
            NodeList::new()
        };
        let runs_on = self.parse_optional_runs_on();
        let mtc = self.parse_optional_mtc();
        let system = self.parse_optional_system();

        self.expect(TokenKind::LBrace);
        let mut defs = NodeList::new();
        while self.is_list_open(TokenKind::RBrace) {
            defs.push(self.parse_module_def());
            self.expect_semi();
        }
        self.expect(TokenKind::RBrace);

        // `finally` is not reserved
        let finally = if self.is_token(TokenKind::Ident) && self.token_text() == "finally" {
            self.consume();
            self.parse_block_stmt()
        } else {
            NodeIndex::NONE
        };
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::ClassTypeDecl(ClassTypeDeclData {
                external,
                modif,
                name,
                extends,
                runs_on,
                mtc,
                system,
                defs,
                finally,
                with,
            }),
        )
    }

    /// `type record R { ... }`, `type set S { ... }`, `type union U { ... }`
    fn parse_struct_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        let kind = self.consume();
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let fields = self.parse_field_block();
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::StructTypeDecl(StructTypeDeclData {
                kind,
                name,
                pars,
                fields,
                with,
            }),
        )
    }

    fn parse_map_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        let spec = self.parse_map_spec();
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let with = self.parse_with();
        self.finish_node(
            start,
            NodeData::MapTypeDecl(MapTypeDeclData {
                spec,
                name,
                pars,
                with,
            }),
        )
    }

    fn parse_enum_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        self.consume_invariant(TokenKind::Enumerated);
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let enums = self.parse_enum_block();
        let with = self.parse_with();
        self.finish_node(
            start,
            NodeData::EnumTypeDecl(EnumTypeDeclData {
                name,
                pars,
                enums,
                with,
            }),
        )
    }

    /// `type function F(...) runs on C return T`
    fn parse_behaviour_type_decl(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.consume_invariant(TokenKind::Type);
        let kind = self.consume();
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let params = self.parse_formal_pars();
        let runs_on = self.parse_optional_runs_on();
        let system = self.parse_optional_system();
        let ret = self.parse_optional_return();
        let with = self.parse_with();

        self.finish_node(
            start,
            NodeData::BehaviourTypeDecl(BehaviourTypeDeclData {
                kind,
                name,
                pars,
                params,
                runs_on,
                system,
                ret,
                with,
            }),
        )
    }

    // =========================================================================
    // Fields and type specifications
    // =========================================================================

    /// `[@default] T name [<pars>] [arraydefs] [(constraint)] [optional]`
    pub(crate) fn parse_field(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let default = if self.is_token(TokenKind::Modif) {
            if self.token_text() != "@default" {
                self.error_expected("@default");
            }
            Some(self.consume())
        } else {
            None
        };

        let ty = self.parse_type_spec();
        let name = self.parse_name();
        let pars = self.parse_optional_type_formal_pars();
        let arraydef = if self.is_token(TokenKind::LBrack) {
            self.parse_array_defs()
        } else {
            NodeList::new()
        };
        let constraint = if self.is_token(TokenKind::LParen) {
            self.parse_paren_expr()
        } else {
            NodeIndex::NONE
        };
        let optional = if self.is_token(TokenKind::Optional) {
            self.consume();
            true
        } else {
            false
        };

        self.finish_node(
            start,
            NodeData::Field(FieldData {
                default,
                ty,
                name,
                pars,
                arraydef,
                constraint,
                optional,
            }),
        )
    }

    fn parse_type_spec(&mut self) -> NodeIndex {
        if !self.enter() {
            return self.error_node();
        }
        let start = self.token_pos();
        let spec = match self.token() {
            TokenKind::Address
            | TokenKind::Charstring
            | TokenKind::Ident
            | TokenKind::Null
            | TokenKind::Universal => {
                let x = self.parse_type_ref();
                self.finish_node(start, NodeData::RefSpec(RefSpecData { x }))
            }
            TokenKind::Union => self.parse_struct_spec(),
            TokenKind::Set | TokenKind::Record => {
                if self.peek(1).kind == TokenKind::LBrace {
                    self.parse_struct_spec()
                } else {
                    self.parse_list_spec()
                }
            }
            TokenKind::Map => self.parse_map_spec(),
            TokenKind::Enumerated => {
                self.consume();
                let enums = self.parse_enum_block();
                self.finish_node(start, NodeData::EnumSpec(EnumSpecData { enums }))
            }
            TokenKind::Function | TokenKind::Altstep | TokenKind::Testcase => {
                self.parse_behaviour_spec()
            }
            _ => {
                self.error_expected("type definition");
                self.error_node()
            }
        };
        self.leave();
        spec
    }

    fn parse_struct_spec(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.consume();
        let fields = self.parse_field_block();
        self.finish_node(start, NodeData::StructSpec(StructSpecData { kind, fields }))
    }

    /// `record [length(n)] of T`
    fn parse_list_spec(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.consume();
        let length = if self.is_token(TokenKind::Length) {
            self.parse_length_expr(NodeIndex::NONE)
        } else {
            NodeIndex::NONE
        };
        self.expect(TokenKind::Of);
        let elem = self.parse_type_spec();
        self.finish_node(start, NodeData::ListSpec(ListSpecData { kind, length, elem }))
    }

    /// `map from K to V`
    fn parse_map_spec(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::Map);
        self.expect(TokenKind::From);
        let from = self.parse_type_spec();
        self.expect(TokenKind::To);
        let to = self.parse_type_spec();
        self.finish_node(start, NodeData::MapSpec(MapSpecData { from, to }))
    }

    fn parse_behaviour_spec(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let kind = self.consume();
        let params = self.parse_formal_pars();
        let runs_on = self.parse_optional_runs_on();
        let system = self.parse_optional_system();
        let ret = self.parse_optional_return();
        self.finish_node(
            start,
            NodeData::BehaviourSpec(BehaviourSpecData {
                kind,
                params,
                runs_on,
                system,
                ret,
            }),
        )
    }

    /// `{ field, field, ... }`
    fn parse_field_block(&mut self) -> NodeList {
        self.expect(TokenKind::LBrace);
        let mut fields = NodeList::new();
        if self.is_list_open(TokenKind::RBrace) {
            fields.push(self.parse_field());
            while self.is_token(TokenKind::Comma) {
                self.consume();
                fields.push(self.parse_field());
            }
        }
        self.expect(TokenKind::RBrace);
        fields
    }

    /// `{ A, B(1), C(2..3) }`
    fn parse_enum_block(&mut self) -> NodeList {
        self.expect(TokenKind::LBrace);
        let mut enums = NodeList::new();
        if self.is_list_open(TokenKind::RBrace) {
            enums = self.parse_expr_list();
        }
        self.expect(TokenKind::RBrace);
        enums
    }

    // =========================================================================
    // Formal parameters
    // =========================================================================

    pub(crate) fn parse_formal_pars(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.expect(TokenKind::LParen);
        let mut list = NodeList::new();
        while self.is_list_open(TokenKind::RParen) {
            list.push(self.parse_formal_par());
            if !self.is_token(TokenKind::Comma) {
                break;
            }
            self.consume();
        }
        self.expect(TokenKind::RParen);
        self.finish_node(start, NodeData::FormalPars(FormalParsData { list }))
    }

    /// `[in|out|inout] [restriction] [@modifier] T name [arraydefs] [:= default]`
    fn parse_formal_par(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let direction = match self.token() {
            TokenKind::In | TokenKind::Out | TokenKind::Inout => Some(self.consume()),
            _ => None,
        };
        let restriction = self.parse_restriction_spec();
        let modif = self.consume_modif();
        let ty = self.parse_type_ref();
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
            NodeData::FormalPar(FormalParData {
                direction,
                restriction,
                modif,
                ty,
                name,
                arraydef,
                value,
            }),
        )
    }

    /// Formal type parameters `<in type T, integer N := 1>` if present.
    pub(crate) fn parse_optional_type_formal_pars(&mut self) -> NodeIndex {
        if !self.is_token(TokenKind::Lt) {
            return NodeIndex::NONE;
        }
        let start = self.token_pos();
        self.consume();
        let mut list = NodeList::new();
        while self.is_list_open(TokenKind::Gt) {
            list.push(self.parse_type_formal_par());
            if !self.is_token(TokenKind::Comma) {
                break;
            }
            self.consume();
        }
        self.expect(TokenKind::Gt);
        self.finish_node(start, NodeData::FormalPars(FormalParsData { list }))
    }

    fn parse_type_formal_par(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let direction = if self.is_token(TokenKind::In) {
            Some(self.consume())
        } else {
            None
        };
        let ty = match self.token() {
            TokenKind::Type | TokenKind::Signature => self.parse_any_ident(),
            _ => self.parse_type_ref(),
        };
        let name = self.parse_name();
        let value = if self.is_token(TokenKind::Assign) {
            self.consume();
            self.parse_type_ref()
        } else {
            NodeIndex::NONE
        };

        self.finish_node(
            start,
            NodeData::FormalPar(FormalParData {
                direction,
                restriction: NodeIndex::NONE,
                modif: None,
                ty,
                name,
                arraydef: NodeList::new(),
                value,
            }),
        )
    }

    /// `[n][m]...`, each dimension an index expression without operand.
    pub(crate) fn parse_array_defs(&mut self) -> NodeList {
        let mut list = NodeList::new();
        while self.is_token(TokenKind::LBrack) {
            list.push(self.parse_index_expr(NodeIndex::NONE));
        }
        list
    }

    // =========================================================================
    // Clauses
    // =========================================================================

    pub(crate) fn parse_optional_runs_on(&mut self) -> NodeIndex {
        if !self.is_token(TokenKind::Runs) {
            return NodeIndex::NONE;
        }
        let start = self.token_pos();
        self.consume();
        self.expect(TokenKind::On);
        let comp = self.parse_type_ref();
        self.finish_node(start, NodeData::RunsOnSpec(RunsOnSpecData { comp }))
    }

    pub(crate) fn parse_optional_system(&mut self) -> NodeIndex {
        if !self.is_token(TokenKind::System) {
            return NodeIndex::NONE;
        }
        let start = self.token_pos();
        self.consume();
        let comp = self.parse_type_ref();
        self.finish_node(start, NodeData::SystemSpec(SystemSpecData { comp }))
    }

    pub(crate) fn parse_optional_mtc(&mut self) -> NodeIndex {
        if !self.is_token(TokenKind::Mtc) {
            return NodeIndex::NONE;
        }
        let start = self.token_pos();
        self.consume();
        let comp = self.parse_type_ref();
        self.finish_node(start, NodeData::MtcSpec(MtcSpecData { comp }))
    }

    /// `return [restriction] [@modifier] T`
    pub(crate) fn parse_optional_return(&mut self) -> NodeIndex {
        if !self.is_token(TokenKind::Return) {
            return NodeIndex::NONE;
        }
        let start = self.token_pos();
        self.consume();
        let restriction = self.parse_restriction_spec();
        let modif = self.consume_modif();
        let ty = self.parse_type_ref();
        self.finish_node(
            start,
            NodeData::ReturnSpec(ReturnSpecData {
                restriction,
                modif,
                ty,
            }),
        )
    }
}
