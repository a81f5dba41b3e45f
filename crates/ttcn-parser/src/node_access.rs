//! Child enumeration and tree traversal.

use crate::node::*;
use crate::node_arena::NodeArena;
use smallvec::SmallVec;

/// Something that contributes child links: a single index or a list.
trait Children {
    fn visit<F: FnMut(NodeIndex)>(&self, f: &mut F);
}

impl Children for NodeIndex {
    #[inline]
    fn visit<F: FnMut(NodeIndex)>(&self, f: &mut F) {
        if self.is_some() {
            f(*self);
        }
    }
}

impl Children for NodeList {
    #[inline]
    fn visit<F: FnMut(NodeIndex)>(&self, f: &mut F) {
        for child in self {
            child.visit(f);
        }
    }
}

impl NodeData {
    /// Call `f` for every present child, in source order.
    pub fn for_each_child<F: FnMut(NodeIndex)>(&self, mut f: F) {
        macro_rules! visit {
            ($($e:expr),* $(,)?) => {{ $( Children::visit(&$e, &mut f); )* }};
        }

        match self {
            NodeData::Error | NodeData::Ident | NodeData::NameIdent => {}
            NodeData::CompositeIdent(_) | NodeData::ValueLiteral(_) => {}
            NodeData::LanguageSpec(_) | NodeData::RestrictionSpec(_) => {}

            NodeData::Root(d) => visit!(d.defs),
            NodeData::ParametrizedIdent(d) => visit!(d.ident, d.params),

            NodeData::CompositeLiteral(d) => visit!(d.list),
            NodeData::UnaryExpr(d) => visit!(d.x),
            NodeData::PostExpr(d) => visit!(d.x),
            NodeData::AssignmentExpr(d) => visit!(d.property, d.value),
            NodeData::BinaryExpr(d) => visit!(d.x, d.y),
            NodeData::ParenExpr(d) => visit!(d.list),
            NodeData::SelectorExpr(d) => visit!(d.x, d.sel),
            NodeData::IndexExpr(d) => visit!(d.x, d.index),
            NodeData::CallExpr(d) => visit!(d.fun, d.args),
            NodeData::LengthExpr(d) => visit!(d.x, d.size),
            NodeData::RedirectExpr(d) => {
                visit!(d.x, d.value, d.param, d.sender, d.index, d.timestamp)
            }
            NodeData::ValueExpr(d) => visit!(d.x, d.y),
            NodeData::ParamExpr(d) => visit!(d.x, d.y),
            NodeData::FromExpr(d) => visit!(d.x),
            NodeData::ModifiesExpr(d) => visit!(d.x, d.y),
            NodeData::RegexpExpr(d) => visit!(d.x),
            NodeData::PatternExpr(d) => visit!(d.x),
            NodeData::DecmatchExpr(d) => visit!(d.params, d.x),
            NodeData::DecodedExpr(d) => visit!(d.params, d.x),
            NodeData::DefKindExpr(d) => visit!(d.list),
            NodeData::ExceptExpr(d) => visit!(d.x, d.list),
            NodeData::DynamicExpr(d) => visit!(d.body),
            NodeData::RedirectToIndex(d) => visit!(d.index),

            NodeData::BlockStmt(d) => visit!(d.stmts),
            NodeData::DeclStmt(d) => visit!(d.decl),
            NodeData::ExprStmt(d) => visit!(d.expr),
            NodeData::BranchStmt(d) => visit!(d.label),
            NodeData::ReturnStmt(d) => visit!(d.result),
            NodeData::AltStmt(d) => visit!(d.body),
            NodeData::CallStmt(d) => visit!(d.stmt, d.body),
            NodeData::ForStmt(d) => visit!(d.init, d.cond, d.post, d.body),
            NodeData::ForRangeStmt(d) => visit!(d.init, d.range, d.body),
            NodeData::WhileStmt(d) => visit!(d.cond, d.body),
            NodeData::DoWhileStmt(d) => visit!(d.body, d.cond),
            NodeData::IfStmt(d) => visit!(d.cond, d.consequent, d.alternate),
            NodeData::SelectStmt(d) => visit!(d.tag, d.clauses),
            NodeData::CaseClause(d) => visit!(d.cond, d.body),
            NodeData::CommClause(d) => visit!(d.x, d.comm, d.body),

            NodeData::Field(d) => visit!(d.ty, d.name, d.pars, d.arraydef, d.constraint),
            NodeData::RefSpec(d) => visit!(d.x),
            NodeData::StructSpec(d) => visit!(d.fields),
            NodeData::ListSpec(d) => visit!(d.length, d.elem),
            NodeData::MapSpec(d) => visit!(d.from, d.to),
            NodeData::EnumSpec(d) => visit!(d.enums),
            NodeData::BehaviourSpec(d) => visit!(d.params, d.runs_on, d.system, d.ret),

            NodeData::ValueDecl(d) => visit!(d.restriction, d.ty, d.decls, d.with),
            NodeData::Declarator(d) => visit!(d.name, d.arraydef, d.value),
            NodeData::TemplateDecl(d) => visit!(
                d.restriction,
                d.ty,
                d.name,
                d.pars,
                d.params,
                d.base,
                d.value,
                d.with
            ),
            NodeData::ModuleParameterGroup(d) => visit!(d.decls, d.with),
            NodeData::FuncDecl(d) => visit!(
                d.name, d.pars, d.params, d.runs_on, d.mtc, d.system, d.ret, d.body, d.with
            ),
            NodeData::ConstructorDecl(d) => visit!(d.params, d.body),
            NodeData::SignatureDecl(d) => {
                visit!(d.name, d.pars, d.params, d.ret, d.exception, d.with)
            }
            NodeData::SubTypeDecl(d) => visit!(d.field, d.with),
            NodeData::StructTypeDecl(d) => visit!(d.name, d.pars, d.fields, d.with),
            NodeData::ClassTypeDecl(d) => visit!(
                d.name, d.extends, d.runs_on, d.mtc, d.system, d.defs, d.finally, d.with
            ),
            NodeData::MapTypeDecl(d) => visit!(d.spec, d.name, d.pars, d.with),
            NodeData::EnumTypeDecl(d) => visit!(d.name, d.pars, d.enums, d.with),
            NodeData::BehaviourTypeDecl(d) => visit!(
                d.name, d.pars, d.params, d.runs_on, d.system, d.ret, d.with
            ),
            NodeData::PortTypeDecl(d) => visit!(d.name, d.pars, d.attrs, d.with),
            NodeData::PortAttribute(d) => visit!(d.types),
            NodeData::PortMapAttribute(d) => visit!(d.params),
            NodeData::ComponentTypeDecl(d) => {
                visit!(d.name, d.pars, d.extends, d.body, d.with)
            }

            NodeData::Module(d) => visit!(d.name, d.language, d.defs, d.with),
            NodeData::ModuleDef(d) => visit!(d.def),
            NodeData::ControlPart(d) => visit!(d.body, d.with),
            NodeData::ImportDecl(d) => visit!(d.module, d.language, d.list, d.with),
            NodeData::GroupDecl(d) => visit!(d.name, d.defs, d.with),
            NodeData::FriendDecl(d) => visit!(d.module, d.with),

            NodeData::RunsOnSpec(d) => visit!(d.comp),
            NodeData::SystemSpec(d) => visit!(d.comp),
            NodeData::MtcSpec(d) => visit!(d.comp),
            NodeData::ReturnSpec(d) => visit!(d.restriction, d.ty),
            NodeData::FormalPars(d) => visit!(d.list),
            NodeData::FormalPar(d) => {
                visit!(d.restriction, d.ty, d.name, d.arraydef, d.value)
            }
            NodeData::WithSpec(d) => visit!(d.list),
            NodeData::WithStmt(d) => visit!(d.list, d.value),
        }
    }
}

impl NodeArena {
    /// Children of `index` in source order.
    pub fn children(&self, index: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        let mut out = SmallVec::new();
        if let Some(node) = self.get(index) {
            node.data.for_each_child(|child| out.push(child));
        }
        out
    }

    /// Pre-order walk starting at `root`.
    ///
    /// `visit` is called for every reached node; returning `false` skips that
    /// node's children. The walk uses an explicit work list, so arbitrarily
    /// deep trees do not grow the call stack.
    pub fn accept<F>(&self, root: NodeIndex, mut visit: F)
    where
        F: FnMut(NodeIndex, &Node) -> bool,
    {
        let mut stack: Vec<NodeIndex> = vec![root];
        let mut scratch: SmallVec<[NodeIndex; 8]> = SmallVec::new();
        while let Some(index) = stack.pop() {
            let Some(node) = self.get(index) else {
                continue;
            };
            if !visit(index, node) {
                continue;
            }
            scratch.clear();
            node.data.for_each_child(|child| scratch.push(child));
            stack.extend(scratch.iter().rev().copied());
        }
    }

    /// Deepest node under `root` whose range contains `offset`.
    ///
    /// One top-down descent; each level binary-searches the position-sorted
    /// child list. Returns `NONE` when `root` itself does not contain the
    /// offset.
    pub fn node_at(&self, root: NodeIndex, offset: u32) -> NodeIndex {
        let Some(node) = self.get(root) else {
            return NodeIndex::NONE;
        };
        if !node.range.contains(offset) {
            return NodeIndex::NONE;
        }

        let mut current = root;
        loop {
            let children = self.children(current);
            let at = children.partition_point(|&c| self.range(c).end < offset);
            match children.get(at) {
                Some(&child) if self.range(child).contains(offset) => current = child,
                _ => return current,
            }
        }
    }
}
