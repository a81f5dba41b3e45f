//! Arena that owns every node of one file.
//!
//! Nodes are appended bottom-up: children are added before the node that
//! refers to them, and `add` stamps the new node's index into each child's
//! parent slot. There is no way to free a single node; the arena is dropped
//! as a whole when its syntax tree is replaced.

use crate::node::*;
use ttcn_common::TextRange;

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Append a node and adopt its children.
    pub fn add(&mut self, range: TextRange, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        data.for_each_child(|child| {
            if let Some(node) = self.nodes.get_mut(child.as_usize()) {
                node.parent = index;
            }
        });
        self.nodes.push(Node {
            range,
            parent: NodeIndex::NONE,
            data,
        });
        index
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.as_usize())
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.as_usize())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i as u32), node))
    }

    /// Drop every node allocated after `len`. Used when a speculative parse
    /// is rolled back.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(Node::kind)
    }

    /// Range of the node, or an empty range at 0 for `NONE`.
    pub fn range(&self, index: NodeIndex) -> TextRange {
        self.get(index).map(|n| n.range).unwrap_or_default()
    }

    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    /// Source text covered by the node.
    pub fn text<'a>(&self, source: &'a str, index: NodeIndex) -> &'a str {
        self.get(index).map_or("", |n| n.range.text(source))
    }

    /// True if `ancestor` is `node` itself or appears on its parent chain.
    pub fn is_in_hierarchy_of(&self, node: NodeIndex, ancestor: NodeIndex) -> bool {
        let mut current = node;
        while current.is_some() {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Closest ancestor (excluding `node`) of the given kind.
    pub fn find_ancestor(&self, node: NodeIndex, kind: NodeKind) -> NodeIndex {
        let mut current = self.parent(node);
        while current.is_some() {
            if self.kind(current) == Some(kind) {
                return current;
            }
            current = self.parent(current);
        }
        NodeIndex::NONE
    }
}

macro_rules! typed_accessors {
    ($($name:ident => $variant:ident($data:ty),)*) => {
        impl NodeArena {
            $(
                #[inline]
                pub fn $name(&self, index: NodeIndex) -> Option<&$data> {
                    match &self.get(index)?.data {
                        NodeData::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            )*
        }
    };
}

typed_accessors! {
    as_root => Root(RootData),
    as_composite_ident => CompositeIdent(CompositeIdentData),
    as_parametrized_ident => ParametrizedIdent(ParametrizedIdentData),
    as_value_literal => ValueLiteral(ValueLiteralData),
    as_composite_literal => CompositeLiteral(CompositeLiteralData),
    as_unary_expr => UnaryExpr(UnaryExprData),
    as_assignment_expr => AssignmentExpr(AssignmentExprData),
    as_binary_expr => BinaryExpr(BinaryExprData),
    as_paren_expr => ParenExpr(ParenExprData),
    as_selector_expr => SelectorExpr(SelectorExprData),
    as_index_expr => IndexExpr(IndexExprData),
    as_call_expr => CallExpr(CallExprData),
    as_def_kind_expr => DefKindExpr(DefKindExprData),
    as_except_expr => ExceptExpr(ExceptExprData),
    as_block_stmt => BlockStmt(BlockStmtData),
    as_decl_stmt => DeclStmt(DeclStmtData),
    as_expr_stmt => ExprStmt(ExprStmtData),
    as_call_stmt => CallStmt(CallStmtData),
    as_for_stmt => ForStmt(ForStmtData),
    as_for_range_stmt => ForRangeStmt(ForRangeStmtData),
    as_if_stmt => IfStmt(IfStmtData),
    as_select_stmt => SelectStmt(SelectStmtData),
    as_comm_clause => CommClause(CommClauseData),
    as_field => Field(FieldData),
    as_struct_spec => StructSpec(StructSpecData),
    as_enum_spec => EnumSpec(EnumSpecData),
    as_value_decl => ValueDecl(ValueDeclData),
    as_declarator => Declarator(DeclaratorData),
    as_template_decl => TemplateDecl(TemplateDeclData),
    as_module_parameter_group => ModuleParameterGroup(ModuleParameterGroupData),
    as_func_decl => FuncDecl(FuncDeclData),
    as_constructor_decl => ConstructorDecl(ConstructorDeclData),
    as_signature_decl => SignatureDecl(SignatureDeclData),
    as_sub_type_decl => SubTypeDecl(SubTypeDeclData),
    as_struct_type_decl => StructTypeDecl(StructTypeDeclData),
    as_class_type_decl => ClassTypeDecl(ClassTypeDeclData),
    as_map_type_decl => MapTypeDecl(MapTypeDeclData),
    as_enum_type_decl => EnumTypeDecl(EnumTypeDeclData),
    as_behaviour_type_decl => BehaviourTypeDecl(BehaviourTypeDeclData),
    as_port_type_decl => PortTypeDecl(PortTypeDeclData),
    as_component_type_decl => ComponentTypeDecl(ComponentTypeDeclData),
    as_module => Module(ModuleData),
    as_module_def => ModuleDef(ModuleDefData),
    as_control_part => ControlPart(ControlPartData),
    as_import_decl => ImportDecl(ImportDeclData),
    as_group_decl => GroupDecl(GroupDeclData),
    as_friend_decl => FriendDecl(FriendDeclData),
    as_restriction_spec => RestrictionSpec(RestrictionSpecData),
    as_runs_on_spec => RunsOnSpec(RunsOnSpecData),
    as_return_spec => ReturnSpec(ReturnSpecData),
    as_formal_pars => FormalPars(FormalParsData),
    as_formal_par => FormalPar(FormalParData),
    as_with_spec => WithSpec(WithSpecData),
}
