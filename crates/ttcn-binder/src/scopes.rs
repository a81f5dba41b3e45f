//! Lexical scopes of one module.
//!
//! A `ScopeTree` owns every scope and symbol table built for a module.
//! Scopes point at their parent and keep their children in source order, so
//! a position can be mapped to its innermost scope by one descent with a
//! binary search per level.
//!
//! Besides its own table, a scope has an augmentation list: tables of other
//! declarations (a component's members for `runs on`, a base class scope,
//! another module's definitions) injected by the binder or by the program's
//! cross-module pass. Injected tables are referenced, never copied.

use crate::builtins;
use crate::symbols::{Symbol, SymbolTable, TableId};
use serde::Serialize;
use ttcn_common::TextRange;
use ttcn_parser::NodeIndex;

/// Index of a scope inside its `ScopeTree`. The module scope is `ROOT`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Syntactic construct that opened a scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    Module,
    Group,
    Behaviour,
    Template,
    Class,
    Constructor,
    Control,
    Block,
    For,
}

/// A table injected into a scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableRef {
    /// Table of the same module.
    Local(TableId),
    /// Table owned by another module, addressed by the module's name.
    Imported { module: String, table: TableId },
}

impl TableRef {
    #[inline]
    pub fn is_imported(&self) -> bool {
        matches!(self, TableRef::Imported { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Node that opened the scope.
    pub container: NodeIndex,
    pub range: TextRange,
    pub symbols: TableId,
    pub augmentation: Vec<TableRef>,
}

/// Lookup of tables that live in other modules.
pub trait TableSource {
    fn table(&self, module: &str, table: TableId) -> Option<&SymbolTable>;
}

/// A `TableSource` that knows no other module.
pub struct NoImports;

impl TableSource for NoImports {
    fn table(&self, _module: &str, _table: TableId) -> Option<&SymbolTable> {
        None
    }
}

/// Where a resolved symbol is declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SymbolOwner<'a> {
    Builtin,
    Local,
    Module(&'a str),
}

#[derive(Copy, Clone, Debug)]
pub struct Resolved<'a> {
    pub symbol: &'a Symbol,
    pub owner: SymbolOwner<'a>,
}

#[derive(Clone, Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    tables: Vec<SymbolTable>,
}

impl ScopeTree {
    pub fn new() -> ScopeTree {
        ScopeTree::default()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub fn add_table(&mut self) -> TableId {
        let id = TableId(self.tables.len() as u32);
        self.tables.push(SymbolTable::new());
        id
    }

    /// Create a scope with a fresh table. The scope is linked into its
    /// parent's children when it is closed.
    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        container: NodeIndex,
        range: TextRange,
    ) -> ScopeId {
        let symbols = self.add_table();
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            children: Vec::new(),
            container,
            range,
            symbols,
            augmentation: Vec::new(),
        });
        id
    }

    pub(crate) fn close_scope(&mut self, id: ScopeId) {
        if let Some(parent) = self.scope(id).and_then(|s| s.parent)
            && let Some(parent) = self.scopes.get_mut(parent.as_usize())
        {
            parent.children.push(id);
        }
    }

    /// Inject `table` into `scope` unless it is already there.
    pub fn augment(&mut self, scope: ScopeId, table: TableRef) {
        if let Some(scope) = self.scopes.get_mut(scope.as_usize())
            && !scope.augmentation.contains(&table)
        {
            scope.augmentation.push(table);
        }
    }

    /// Remove every table injected from other modules.
    pub fn strip_imported(&mut self) {
        for scope in &mut self.scopes {
            scope.augmentation.retain(|t| !t.is_imported());
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    #[inline]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.as_usize())
    }

    #[inline]
    pub fn table(&self, id: TableId) -> Option<&SymbolTable> {
        self.tables.get(id.as_usize())
    }

    #[inline]
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut SymbolTable> {
        self.tables.get_mut(id.as_usize())
    }

    /// Own table of `scope`.
    pub fn symbols(&self, scope: ScopeId) -> Option<&SymbolTable> {
        self.scope(scope).and_then(|s| self.table(s.symbols))
    }

    /// Definitions of the module.
    pub fn root_table(&self) -> Option<&SymbolTable> {
        self.symbols(ScopeId::ROOT)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, s)| (ScopeId(i as u32), s))
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Builtins first, then the scope chain starting at `scope`.
    pub fn resolve<'a>(
        &'a self,
        scope: ScopeId,
        name: &str,
        imports: &'a dyn TableSource,
    ) -> Option<Resolved<'a>> {
        if let Some(symbol) = builtins::resolve_builtin(name) {
            return Some(Resolved {
                symbol,
                owner: SymbolOwner::Builtin,
            });
        }
        self.resolve_own(scope, name, imports)
    }

    /// Scope chain without builtins.
    pub fn resolve_own<'a>(
        &'a self,
        scope: ScopeId,
        name: &str,
        imports: &'a dyn TableSource,
    ) -> Option<Resolved<'a>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.resolve_horizontally(id, name, imports) {
                return Some(found);
            }
            current = self.scope(id).and_then(|s| s.parent);
        }
        None
    }

    /// Own table of `scope`, then its augmentation tables in injection
    /// order. Parents are not consulted.
    pub fn resolve_horizontally<'a>(
        &'a self,
        scope: ScopeId,
        name: &str,
        imports: &'a dyn TableSource,
    ) -> Option<Resolved<'a>> {
        let scope = self.scope(scope)?;
        if let Some(symbol) = self.table(scope.symbols).and_then(|t| t.lookup(name)) {
            return Some(Resolved {
                symbol,
                owner: SymbolOwner::Local,
            });
        }

        for injected in &scope.augmentation {
            let found = match injected {
                TableRef::Local(table) => self
                    .table(*table)
                    .and_then(|t| t.lookup(name))
                    .map(|symbol| Resolved {
                        symbol,
                        owner: SymbolOwner::Local,
                    }),
                TableRef::Imported { module, table } => imports
                    .table(module, *table)
                    .and_then(|t| t.lookup(name))
                    .map(|symbol| Resolved {
                        symbol,
                        owner: SymbolOwner::Module(module.as_str()),
                    }),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// `scope` followed by its parents up to the module scope.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |&id| self.scope(id).and_then(|s| s.parent))
    }

    /// Whether a local table injected into `scope` or one of its parents
    /// declares `name`.
    pub fn augmentation_declares(&self, scope: ScopeId, name: &str) -> bool {
        self.ancestors(scope).any(|id| {
            self.scope(id).is_some_and(|s| {
                s.augmentation.iter().any(|injected| match injected {
                    TableRef::Local(table) => self.table(*table).is_some_and(|t| t.has(name)),
                    TableRef::Imported { .. } => false,
                })
            })
        })
    }

    /// Own table of `scope` only.
    pub fn resolve_direct(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.symbols(scope).and_then(|t| t.lookup(name))
    }

    // =========================================================================
    // Point queries
    // =========================================================================

    /// Innermost scope whose container covers `offset`; `None` when the
    /// module scope itself does not.
    pub fn scope_at(&self, offset: u32) -> Option<ScopeId> {
        let root = self.scope(ScopeId::ROOT)?;
        if !root.range.contains(offset) {
            return None;
        }

        let mut current = ScopeId::ROOT;
        loop {
            let children = &self.scopes[current.as_usize()].children;
            let at = children.partition_point(|&c| self.scopes[c.as_usize()].range.end < offset);
            match children.get(at) {
                Some(&child) if self.scopes[child.as_usize()].range.contains(offset) => {
                    current = child;
                }
                _ => return Some(current),
            }
        }
    }
}
