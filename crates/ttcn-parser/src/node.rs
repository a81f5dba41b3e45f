//! Syntax tree node types.
//!
//! Every node lives in a per-file `NodeArena` and is addressed by a
//! `NodeIndex`. A node carries its byte range, a non-owning parent index and a
//! `NodeData` payload. Child links are indices into the same arena; an absent
//! optional child is `NodeIndex::NONE`.

use serde::Serialize;
use ttcn_common::TextRange;
use ttcn_scanner::Token;

/// Index of a node in its file's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// Ordered child list.
pub type NodeList = Vec<NodeIndex>;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub range: TextRange,
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

macro_rules! define_nodes {
    (
        unit { $($unit:ident,)* }
        data { $($variant:ident($data:ident),)* }
    ) => {
        /// Node discriminant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum NodeKind {
            $($unit,)*
            $($variant,)*
        }

        /// Node payload, one variant per node kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum NodeData {
            $($unit,)*
            $($variant($data),)*
        }

        impl NodeData {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(NodeData::$unit => NodeKind::$unit,)*
                    $(NodeData::$variant(_) => NodeKind::$variant,)*
                }
            }
        }

        impl NodeKind {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$unit => stringify!($unit),)*
                    $(NodeKind::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

define_nodes! {
    unit {
        Error,
        Ident,
        NameIdent,
    }
    data {
        Root(RootData),
        CompositeIdent(CompositeIdentData),
        ParametrizedIdent(ParametrizedIdentData),

        ValueLiteral(ValueLiteralData),
        CompositeLiteral(CompositeLiteralData),
        UnaryExpr(UnaryExprData),
        PostExpr(PostExprData),
        AssignmentExpr(AssignmentExprData),
        BinaryExpr(BinaryExprData),
        ParenExpr(ParenExprData),
        SelectorExpr(SelectorExprData),
        IndexExpr(IndexExprData),
        CallExpr(CallExprData),
        LengthExpr(LengthExprData),
        RedirectExpr(RedirectExprData),
        ValueExpr(ValueExprData),
        ParamExpr(ParamExprData),
        FromExpr(FromExprData),
        ModifiesExpr(ModifiesExprData),
        RegexpExpr(RegexpExprData),
        PatternExpr(PatternExprData),
        DecmatchExpr(DecmatchExprData),
        DecodedExpr(DecodedExprData),
        DefKindExpr(DefKindExprData),
        ExceptExpr(ExceptExprData),
        DynamicExpr(DynamicExprData),
        RedirectToIndex(RedirectToIndexData),

        BlockStmt(BlockStmtData),
        DeclStmt(DeclStmtData),
        ExprStmt(ExprStmtData),
        BranchStmt(BranchStmtData),
        ReturnStmt(ReturnStmtData),
        AltStmt(AltStmtData),
        CallStmt(CallStmtData),
        ForStmt(ForStmtData),
        ForRangeStmt(ForRangeStmtData),
        WhileStmt(WhileStmtData),
        DoWhileStmt(DoWhileStmtData),
        IfStmt(IfStmtData),
        SelectStmt(SelectStmtData),
        CaseClause(CaseClauseData),
        CommClause(CommClauseData),

        Field(FieldData),
        RefSpec(RefSpecData),
        StructSpec(StructSpecData),
        ListSpec(ListSpecData),
        MapSpec(MapSpecData),
        EnumSpec(EnumSpecData),
        BehaviourSpec(BehaviourSpecData),

        ValueDecl(ValueDeclData),
        Declarator(DeclaratorData),
        TemplateDecl(TemplateDeclData),
        ModuleParameterGroup(ModuleParameterGroupData),
        FuncDecl(FuncDeclData),
        ConstructorDecl(ConstructorDeclData),
        SignatureDecl(SignatureDeclData),
        SubTypeDecl(SubTypeDeclData),
        StructTypeDecl(StructTypeDeclData),
        ClassTypeDecl(ClassTypeDeclData),
        MapTypeDecl(MapTypeDeclData),
        EnumTypeDecl(EnumTypeDeclData),
        BehaviourTypeDecl(BehaviourTypeDeclData),
        PortTypeDecl(PortTypeDeclData),
        PortAttribute(PortAttributeData),
        PortMapAttribute(PortMapAttributeData),
        ComponentTypeDecl(ComponentTypeDeclData),

        Module(ModuleData),
        ModuleDef(ModuleDefData),
        ControlPart(ControlPartData),
        ImportDecl(ImportDeclData),
        GroupDecl(GroupDeclData),
        FriendDecl(FriendDeclData),

        LanguageSpec(LanguageSpecData),
        RestrictionSpec(RestrictionSpecData),
        RunsOnSpec(RunsOnSpecData),
        SystemSpec(SystemSpecData),
        MtcSpec(MtcSpecData),
        ReturnSpec(ReturnSpecData),
        FormalPars(FormalParsData),
        FormalPar(FormalParData),
        WithSpec(WithSpecData),
        WithStmt(WithStmtData),
    }
}

impl NodeKind {
    /// Identifier-like kinds: plain references, declared names and the
    /// two-token forms such as `universal charstring`.
    pub const fn is_ident(self) -> bool {
        matches!(
            self,
            NodeKind::Ident
                | NodeKind::NameIdent
                | NodeKind::CompositeIdent
                | NodeKind::ParametrizedIdent
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Top-level definitions of one file, usually a single module.
#[derive(Clone, Debug, PartialEq)]
pub struct RootData {
    pub defs: NodeList,
}

/// Two keyword tokens acting as one name: `universal charstring`,
/// `any component`, `all timer`.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeIdentData {
    pub first: Token,
    pub second: Token,
}

/// `ident<actual type parameters>`
#[derive(Clone, Debug, PartialEq)]
pub struct ParametrizedIdentData {
    pub ident: NodeIndex,
    pub params: NodeIndex,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ValueLiteralData {
    pub tok: Token,
}

/// `{ a, b, c }` or `{ f := 1, g := 2 }`
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeLiteralData {
    pub list: NodeList,
}

/// Prefix operators, and the postfix `ifpresent`/`alive` forms.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExprData {
    pub op: Token,
    pub x: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostExprData {
    pub x: NodeIndex,
    pub op: Token,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentExprData {
    pub property: NodeIndex,
    pub value: NodeIndex,
}

/// `x` is `NONE` for the prefix `::` form and for `to`/`from` call arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExprData {
    pub x: NodeIndex,
    pub op: Token,
    pub y: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParenExprData {
    pub list: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorExprData {
    pub x: NodeIndex,
    pub sel: NodeIndex,
}

/// `x[index]`; `x` is `NONE` for a bare `[index]` (alt guards, array defs).
#[derive(Clone, Debug, PartialEq)]
pub struct IndexExprData {
    pub x: NodeIndex,
    pub index: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallExprData {
    pub fun: NodeIndex,
    pub args: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LengthExprData {
    pub x: NodeIndex,
    pub size: NodeIndex,
}

/// `x -> value v param p sender s @index i timestamp t`
#[derive(Clone, Debug, PartialEq)]
pub struct RedirectExprData {
    pub x: NodeIndex,
    pub value: NodeList,
    pub param: NodeList,
    pub sender: NodeIndex,
    pub index: NodeIndex,
    pub timestamp: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValueExprData {
    pub x: NodeIndex,
    pub y: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParamExprData {
    pub x: NodeIndex,
    pub y: NodeIndex,
}

/// `any from x`, `all from x`
#[derive(Clone, Debug, PartialEq)]
pub struct FromExprData {
    pub kind: Token,
    pub from: Token,
    pub x: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModifiesExprData {
    pub x: NodeIndex,
    pub y: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegexpExprData {
    pub nocase: bool,
    pub x: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternExprData {
    pub nocase: bool,
    pub x: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecmatchExprData {
    pub params: NodeIndex,
    pub x: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedExprData {
    pub params: NodeIndex,
    pub x: NodeIndex,
}

/// Definition-kind qualified list inside imports and `with` qualifiers:
/// `type all except { A }`, `template T1, T2`, `import all`.
#[derive(Clone, Debug, PartialEq)]
pub struct DefKindExprData {
    pub kind: Option<Token>,
    pub list: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExceptExprData {
    pub x: NodeIndex,
    pub list: NodeList,
}

/// `@dynamic { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicExprData {
    pub body: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RedirectToIndexData {
    pub value: bool,
    pub index: NodeIndex,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct BlockStmtData {
    pub stmts: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeclStmtData {
    pub decl: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprStmtData {
    pub expr: NodeIndex,
}

/// `repeat`, `break`, `continue`, `label L`, `goto L`
#[derive(Clone, Debug, PartialEq)]
pub struct BranchStmtData {
    pub kind: Token,
    pub label: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmtData {
    pub result: NodeIndex,
}

/// `alt` or `interleave`, optionally `@nodefault`.
#[derive(Clone, Debug, PartialEq)]
pub struct AltStmtData {
    pub kind: Token,
    pub no_default: Option<Token>,
    pub body: NodeIndex,
}

/// `p.call(...) { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct CallStmtData {
    pub stmt: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForStmtData {
    pub init: NodeIndex,
    pub cond: NodeIndex,
    pub post: NodeIndex,
    pub body: NodeIndex,
}

/// `for (var integer i in list) { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct ForRangeStmtData {
    pub init: NodeIndex,
    pub range: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmtData {
    pub cond: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoWhileStmtData {
    pub body: NodeIndex,
    pub cond: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmtData {
    pub cond: NodeIndex,
    pub consequent: NodeIndex,
    pub alternate: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectStmtData {
    pub is_union: bool,
    pub tag: NodeIndex,
    pub clauses: NodeList,
}

/// `case (x) { ... }`; `cond` is `NONE` for `case else`.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseClauseData {
    pub cond: NodeIndex,
    pub body: NodeIndex,
}

/// Alt guard: `[x] comm { body }` or `[else] { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct CommClauseData {
    pub x: NodeIndex,
    pub is_else: bool,
    pub comm: NodeIndex,
    pub body: NodeIndex,
}

// =============================================================================
// Types
// =============================================================================

/// Record/set/union field and sub-type body.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldData {
    pub default: Option<Token>,
    pub ty: NodeIndex,
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub arraydef: NodeList,
    pub constraint: NodeIndex,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RefSpecData {
    pub x: NodeIndex,
}

/// Nested `record { ... }`, `set { ... }`, `union { ... }`.
#[derive(Clone, Debug, PartialEq)]
pub struct StructSpecData {
    pub kind: Token,
    pub fields: NodeList,
}

/// `record length(n) of T`, `set of T`
#[derive(Clone, Debug, PartialEq)]
pub struct ListSpecData {
    pub kind: Token,
    pub length: NodeIndex,
    pub elem: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapSpecData {
    pub from: NodeIndex,
    pub to: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumSpecData {
    pub enums: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BehaviourSpecData {
    pub kind: Token,
    pub params: NodeIndex,
    pub runs_on: NodeIndex,
    pub system: NodeIndex,
    pub ret: NodeIndex,
}

// =============================================================================
// Declarations
// =============================================================================

/// `var`, `const`, `timer`, `port`, `modulepar` declarations. `kind` is
/// `None` for timers, whose keyword is parsed as the type.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueDeclData {
    pub kind: Option<Token>,
    pub restriction: NodeIndex,
    pub modif: Option<Token>,
    pub ty: NodeIndex,
    pub decls: NodeList,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeclaratorData {
    pub name: NodeIndex,
    pub arraydef: NodeList,
    pub value: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateDeclData {
    pub restriction: NodeIndex,
    pub modif: Option<Token>,
    pub ty: NodeIndex,
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub params: NodeIndex,
    pub base: NodeIndex,
    pub value: NodeIndex,
    pub with: NodeIndex,
}

/// `modulepar { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleParameterGroupData {
    pub decls: NodeList,
    pub with: NodeIndex,
}

/// Functions, altsteps and testcases, external or not.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDeclData {
    pub external: bool,
    pub kind: Token,
    pub modif: Option<Token>,
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub params: NodeIndex,
    pub runs_on: NodeIndex,
    pub mtc: NodeIndex,
    pub system: NodeIndex,
    pub ret: NodeIndex,
    pub body: NodeIndex,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorDeclData {
    pub params: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignatureDeclData {
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub params: NodeIndex,
    pub noblock: bool,
    pub ret: NodeIndex,
    pub exception: NodeIndex,
    pub with: NodeIndex,
}

/// `type <field>`: aliases, lists and constrained types.
#[derive(Clone, Debug, PartialEq)]
pub struct SubTypeDeclData {
    pub field: NodeIndex,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructTypeDeclData {
    pub kind: Token,
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub fields: NodeList,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassTypeDeclData {
    pub external: bool,
    pub modif: Option<Token>,
    pub name: NodeIndex,
    pub extends: NodeList,
    pub runs_on: NodeIndex,
    pub mtc: NodeIndex,
    pub system: NodeIndex,
    pub defs: NodeList,
    pub finally: NodeIndex,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapTypeDeclData {
    pub spec: NodeIndex,
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumTypeDeclData {
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub enums: NodeList,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BehaviourTypeDeclData {
    pub kind: Token,
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub params: NodeIndex,
    pub runs_on: NodeIndex,
    pub system: NodeIndex,
    pub ret: NodeIndex,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortTypeDeclData {
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub kind: Option<Token>,
    pub realtime: bool,
    pub attrs: NodeList,
    pub with: NodeIndex,
}

/// `in T1, T2`, `out T`, `inout T`, `address A`
#[derive(Clone, Debug, PartialEq)]
pub struct PortAttributeData {
    pub kind: Token,
    pub types: NodeList,
}

/// `map param (...)`, `unmap param (...)`
#[derive(Clone, Debug, PartialEq)]
pub struct PortMapAttributeData {
    pub params: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComponentTypeDeclData {
    pub name: NodeIndex,
    pub pars: NodeIndex,
    pub extends: NodeList,
    pub body: NodeIndex,
    pub with: NodeIndex,
}

// =============================================================================
// Module level
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ModuleData {
    pub name: NodeIndex,
    pub language: NodeIndex,
    pub defs: NodeList,
    pub with: NodeIndex,
}

/// A module definition with its optional `public`/`private`/`friend`
/// visibility.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleDefData {
    pub visibility: Option<Token>,
    pub def: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControlPartData {
    pub body: NodeIndex,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDeclData {
    pub module: NodeIndex,
    pub language: NodeIndex,
    pub list: NodeList,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupDeclData {
    pub name: NodeIndex,
    pub defs: NodeList,
    pub with: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FriendDeclData {
    pub module: NodeIndex,
    pub with: NodeIndex,
}

// =============================================================================
// Misc
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct LanguageSpecData {
    pub list: Vec<Token>,
}

/// `template(omit)`, `template`, `omit`, `value`, `present`
#[derive(Clone, Debug, PartialEq)]
pub struct RestrictionSpecData {
    pub template: bool,
    pub ty: Option<Token>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunsOnSpecData {
    pub comp: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SystemSpecData {
    pub comp: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MtcSpecData {
    pub comp: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnSpecData {
    pub restriction: NodeIndex,
    pub modif: Option<Token>,
    pub ty: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormalParsData {
    pub list: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormalParData {
    pub direction: Option<Token>,
    pub restriction: NodeIndex,
    pub modif: Option<Token>,
    pub ty: NodeIndex,
    pub name: NodeIndex,
    pub arraydef: NodeList,
    pub value: NodeIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithSpecData {
    pub list: NodeList,
}

/// `encode (T) "x"`, `variant override "y"`, `extension "z"` ...
#[derive(Clone, Debug, PartialEq)]
pub struct WithStmtData {
    pub kind: Option<Token>,
    pub override_: bool,
    pub list: NodeList,
    pub value: NodeIndex,
}
