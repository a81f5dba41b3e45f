//! Name hoisting.
//!
//! TTCN-3 definitions at module level, and members of a class, are visible
//! throughout their container regardless of declaration order. Before the
//! walk of a container its declared names are collected, and references to
//! them never become externals.

use rustc_hash::FxHashSet;
use ttcn_parser::{NodeArena, NodeData, NodeIndex, NodeKind, SyntaxTree};

/// Name node of an enumeration item: `e` or `e(1)`.
pub(crate) fn enum_value_name(arena: &NodeArena, item: NodeIndex) -> NodeIndex {
    match arena.kind(item) {
        Some(NodeKind::Ident) => item,
        Some(NodeKind::CallExpr) => match arena.as_call_expr(item) {
            Some(call) if arena.kind(call.fun) == Some(NodeKind::Ident) => call.fun,
            _ => NodeIndex::NONE,
        },
        _ => NodeIndex::NONE,
    }
}

/// Collect the names declared by `defs` into `names`. Groups and module
/// parameter lists are transparent; behaviour bodies are not entered.
pub(crate) fn collect_hoisted<'a>(
    tree: &'a SyntaxTree,
    source: &'a str,
    defs: &[NodeIndex],
    names: &mut FxHashSet<&'a str>,
) {
    let arena = &tree.arena;
    let add = |names: &mut FxHashSet<&'a str>, node: NodeIndex| {
        let text = arena.text(source, node);
        if !text.is_empty() {
            names.insert(text);
        }
    };

    for &def in defs {
        arena.accept(def, |_, node| match &node.data {
            NodeData::ComponentTypeDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::StructTypeDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::FuncDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::TemplateDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::ClassTypeDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::SignatureDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::MapTypeDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::BehaviourTypeDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::PortTypeDecl(d) => {
                add(names, d.name);
                false
            }
            NodeData::SubTypeDecl(d) => {
                if let Some(field) = arena.as_field(d.field) {
                    add(names, field.name);
                }
                false
            }
            NodeData::EnumTypeDecl(d) => {
                add(names, d.name);
                for &item in &d.enums {
                    add(names, enum_value_name(arena, item));
                }
                false
            }
            NodeData::ValueDecl(d) => {
                for &declarator in &d.decls {
                    if let Some(decl) = arena.as_declarator(declarator) {
                        add(names, decl.name);
                    }
                }
                false
            }
            NodeData::ImportDecl(_)
            | NodeData::FriendDecl(_)
            | NodeData::ControlPart(_)
            | NodeData::ConstructorDecl(_)
            | NodeData::BlockStmt(_)
            | NodeData::WithSpec(_) => false,
            _ => true,
        });
    }
}
