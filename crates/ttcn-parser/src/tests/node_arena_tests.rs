//! Tests for the node arena, child enumeration and speculation rollback.

use crate::node::*;
use crate::node_arena::NodeArena;
use crate::parse;
use crate::state::ParserState;
use ttcn_common::TextRange;
use ttcn_scanner::TokenKind;

#[test]
fn test_add_adopts_children() {
    let mut arena = NodeArena::new();
    let a = arena.add(TextRange::new(1, 2), NodeData::Ident);
    let b = arena.add(TextRange::new(4, 5), NodeData::Ident);
    let paren = arena.add(
        TextRange::new(0, 6),
        NodeData::ParenExpr(ParenExprData { list: vec![a, b] }),
    );

    assert_eq!(arena.parent(a), paren);
    assert_eq!(arena.parent(b), paren);
    assert_eq!(arena.parent(paren), NodeIndex::NONE);
    assert_eq!(arena.children(paren).as_slice(), &[a, b]);
}

#[test]
fn test_absent_children_are_skipped() {
    let mut arena = NodeArena::new();
    let index = arena.add(TextRange::new(1, 2), NodeData::Ident);
    let expr = arena.add(
        TextRange::new(0, 3),
        NodeData::IndexExpr(IndexExprData {
            x: NodeIndex::NONE,
            index,
        }),
    );
    assert_eq!(arena.children(expr).as_slice(), &[index]);
}

#[test]
fn test_typed_accessor_checks_kind() {
    let mut arena = NodeArena::new();
    let ident = arena.add(TextRange::new(0, 1), NodeData::Ident);
    let block = arena.add(
        TextRange::new(0, 3),
        NodeData::BlockStmt(BlockStmtData { stmts: vec![ident] }),
    );

    assert!(arena.as_block_stmt(block).is_some());
    assert!(arena.as_block_stmt(ident).is_none());
    assert!(arena.as_module(block).is_none());
    assert!(arena.as_block_stmt(NodeIndex::NONE).is_none());
    assert_eq!(arena.kind(NodeIndex::NONE), None);
}

#[test]
fn test_hierarchy_queries() {
    let tree = parse("test.ttcn", "module M { function f() { var integer x := 1 } }");
    assert!(tree.errors.is_empty(), "unexpected errors: {:?}", tree.errors);

    let offset = tree.line_map.offset_of(ttcn_common::Position::new(0, 38)).unwrap();
    let decl = tree.arena.find_ancestor(tree.node_at(offset), NodeKind::ValueDecl);
    assert!(decl.is_some());

    let func = tree.arena.find_ancestor(decl, NodeKind::FuncDecl);
    let module = tree.arena.find_ancestor(decl, NodeKind::Module);
    assert!(tree.arena.is_in_hierarchy_of(decl, func));
    assert!(tree.arena.is_in_hierarchy_of(decl, module));
    assert!(tree.arena.is_in_hierarchy_of(decl, decl));
    assert!(!tree.arena.is_in_hierarchy_of(module, decl));
}

#[test]
fn test_accept_prunes_subtrees() {
    let tree = parse("test.ttcn", "module M { control { var integer a; a := a + 1 } }");

    let mut all = 0;
    tree.arena.accept(tree.root, |_, _| {
        all += 1;
        true
    });
    assert_eq!(all, tree.arena.len(), "every node is reachable from the root");

    let mut pruned = 0;
    let mut saw_decl = false;
    tree.arena.accept(tree.root, |_, node| {
        pruned += 1;
        saw_decl |= node.kind() == NodeKind::ValueDecl;
        node.kind() != NodeKind::BlockStmt
    });
    assert!(pruned < all);
    assert!(!saw_decl, "children of a pruned block must not be visited");
}

#[test]
fn test_node_at_outside_root() {
    let tree = parse("test.ttcn", "module M {}");
    assert_eq!(tree.node_at(100), NodeIndex::NONE);
    assert_eq!(tree.arena.kind(tree.node_at(0)), Some(NodeKind::Module));
}

#[test]
fn test_reset_discards_speculative_nodes() {
    let mut state = ParserState::new("a b");
    state.mark();
    state.parse_any_ident();
    state.parse_any_ident();
    assert_eq!(state.arena.len(), 2);
    assert_eq!(state.token(), TokenKind::Eof);

    state.reset();
    assert_eq!(state.arena.len(), 0);
    assert_eq!(state.token(), TokenKind::Ident);
    assert_eq!(state.token_pos(), 0);
}

#[test]
fn test_commit_keeps_speculative_nodes() {
    let mut state = ParserState::new("a b");
    state.mark();
    state.parse_any_ident();
    state.commit();
    assert_eq!(state.arena.len(), 1);
    assert_eq!(state.token_pos(), 2);
}

#[test]
fn test_nested_markers_roll_back_innermost() {
    let mut state = ParserState::new("a b c");
    state.mark();
    state.parse_any_ident();
    state.mark();
    state.parse_any_ident();
    state.reset();
    assert_eq!(state.token_pos(), 2);
    assert_eq!(state.arena.len(), 1);
    state.reset();
    assert_eq!(state.token_pos(), 0);
    assert_eq!(state.arena.len(), 0);
}
