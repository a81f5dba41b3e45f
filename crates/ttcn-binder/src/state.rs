//! Binder state and the per-module binding result.
//!
//! The binding walk itself lives in `state_binding.rs` as further
//! `impl BinderState` blocks.

use crate::scopes::{ScopeId, ScopeKind, ScopeTree, TableRef};
use crate::semantic_errors::{SemanticError, SemanticErrorKind};
use crate::symbols::{Symbol, SymbolOrigin, TableId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;
use ttcn_common::TextRange;
use ttcn_parser::{NodeIndex, SyntaxTree};

/// One `import from M ...` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDescriptor {
    pub module: String,
    /// `import from M { import all }`: re-imports what `M` imports publicly.
    pub transit: bool,
    pub is_public: bool,
    pub declaration: NodeIndex,
    /// Range of the imported module's name.
    pub range: TextRange,
}

/// How a scope gets another declaration's table injected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AugmentationKind {
    /// `runs on C`: members of component `C`.
    RunsOn,
    /// `extends B`: the scope of base class `B`.
    Extends,
    /// `modifies T`: the scope of base template `T`.
    Modifies,
}

impl AugmentationKind {
    /// Table contributed by `symbol` for this kind of augmentation.
    /// `scopes` is the tree of the module that declares `symbol`.
    pub fn provided_table(
        self,
        symbol: &Symbol,
        scopes: &ScopeTree,
    ) -> Result<Option<TableId>, SemanticErrorKind> {
        match self {
            AugmentationKind::RunsOn if !symbol.flags.is_component() => {
                return Err(SemanticErrorKind::RunsOnRequiresComponent);
            }
            AugmentationKind::Extends if !symbol.flags.is_class() => {
                return Err(SemanticErrorKind::ClassCanBeExtendedByClassOnly);
            }
            _ => {}
        }
        Ok(match symbol.origin {
            SymbolOrigin::Members(table) => Some(table),
            SymbolOrigin::Scope(scope) => scopes.scope(scope).map(|s| s.symbols),
            SymbolOrigin::None => None,
        })
    }
}

/// Declaration whose table a group of scopes waits for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentationProvider {
    pub kind: AugmentationKind,
    pub name: String,
    pub range: TextRange,
}

/// A reference that did not resolve inside its own module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalIdent {
    pub node: NodeIndex,
    pub name: String,
    pub range: TextRange,
    /// Innermost scope around the reference.
    pub scope: ScopeId,
}

/// References left for the cross-module pass. Groups with a provider
/// collect the references made inside scopes whose `runs on`, `extends` or
/// `modifies` target is declared in another module.
#[derive(Clone, Debug, Default)]
pub struct ExternalsGroup {
    pub idents: Vec<ExternalIdent>,
    pub scopes: SmallVec<[ScopeId; 2]>,
    pub provider: Option<AugmentationProvider>,
}

/// Scopes, imports and unresolved references of one module.
#[derive(Clone, Debug)]
pub struct ModuleBinding {
    pub name: String,
    pub name_range: TextRange,
    pub declaration: NodeIndex,
    pub scopes: ScopeTree,
    pub imports: Vec<ImportDescriptor>,
    /// Imported modules referenced by name, e.g. as `M.x`.
    pub required_imports: FxHashSet<String>,
    pub externals: Vec<ExternalsGroup>,
}

impl ModuleBinding {
    pub fn imports_of<'b>(&'b self, module: &'b str) -> impl Iterator<Item = &'b ImportDescriptor> {
        self.imports.iter().filter(move |i| i.module == module)
    }

    pub fn imports_module(&self, module: &str) -> bool {
        self.imports.iter().any(|i| i.module == module)
    }
}

#[derive(Clone, Debug, Default)]
pub struct BindResult {
    pub module: Option<ModuleBinding>,
    pub errors: Vec<SemanticError>,
}

/// Collects external references, routing them to the group of the
/// innermost scope that waits for a provider.
#[derive(Default)]
pub(crate) struct ExternalsTracker {
    top_level: ExternalsGroup,
    augmented: IndexMap<(AugmentationKind, String), ExternalsGroup, FxBuildHasher>,
    active: Option<usize>,
}

impl ExternalsTracker {
    pub(crate) fn push(&mut self, ident: ExternalIdent) {
        let group = match self.active {
            Some(index) => match self.augmented.get_index_mut(index) {
                Some((_, group)) => group,
                None => &mut self.top_level,
            },
            None => &mut self.top_level,
        };
        group.idents.push(ident);
    }

    /// Route references to the group of `provider` until `leave`.
    pub(crate) fn enter(
        &mut self,
        provider: AugmentationProvider,
        scope: ScopeId,
    ) -> Option<usize> {
        let entry = self
            .augmented
            .entry((provider.kind, provider.name.clone()));
        let index = entry.index();
        let group = entry.or_insert_with(|| ExternalsGroup {
            provider: Some(provider),
            ..ExternalsGroup::default()
        });
        group.scopes.push(scope);
        self.active.replace(index)
    }

    pub(crate) fn leave(&mut self, saved: Option<usize>) {
        self.active = saved;
    }

    pub(crate) fn finish(self) -> (ExternalsGroup, Vec<ExternalsGroup>) {
        (self.top_level, self.augmented.into_values().collect())
    }
}

pub struct BinderState<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) source: &'a str,
    pub(crate) scopes: ScopeTree,
    pub(crate) current: Option<ScopeId>,
    pub(crate) module: Option<ModuleBinding>,
    pub(crate) imports: Vec<ImportDescriptor>,
    pub(crate) required_imports: FxHashSet<String>,
    pub(crate) externals: ExternalsTracker,
    /// Module-level names, declared before or after their use.
    pub(crate) hoisted_names: FxHashSet<&'a str>,
    /// Member names of the class being bound.
    pub(crate) hoisted_inner_names: FxHashSet<&'a str>,
    /// Enumeration values, added to the module scope once the walk is done.
    pub(crate) enum_values: IndexMap<&'a str, Symbol, FxBuildHasher>,
    pub(crate) errors: Vec<SemanticError>,
}

impl<'a> BinderState<'a> {
    pub fn new(tree: &'a SyntaxTree, source: &'a str) -> BinderState<'a> {
        BinderState {
            tree,
            source,
            scopes: ScopeTree::new(),
            current: None,
            module: None,
            imports: Vec::new(),
            required_imports: FxHashSet::default(),
            externals: ExternalsTracker::default(),
            hoisted_names: FxHashSet::default(),
            hoisted_inner_names: FxHashSet::default(),
            enum_values: IndexMap::default(),
            errors: Vec::new(),
        }
    }

    pub fn finish(self) -> BindResult {
        BindResult {
            module: self.module,
            errors: self.errors,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[inline]
    pub(crate) fn text(&self, index: NodeIndex) -> &'a str {
        self.tree.arena.text(self.source, index)
    }

    #[inline]
    pub(crate) fn range(&self, index: NodeIndex) -> TextRange {
        self.tree.arena.range(index)
    }

    pub(crate) fn error(&mut self, range: TextRange, kind: SemanticErrorKind) {
        self.errors.push(SemanticError::new(range, kind));
    }

    /// Run `f` inside a new scope opened by `container`.
    pub(crate) fn with_scope<F>(&mut self, kind: ScopeKind, container: NodeIndex, f: F) -> ScopeId
    where
        F: FnOnce(&mut Self),
    {
        let range = self.range(container);
        let scope = self.scopes.add_scope(kind, self.current, container, range);
        let parent = self.current.replace(scope);
        tracing::trace!(?kind, scope = scope.0, "enter scope");

        f(self);

        self.scopes.close_scope(scope);
        self.current = parent;
        scope
    }

    /// Scope that receives declarations: groups are transparent, their
    /// definitions belong to the enclosing module.
    pub(crate) fn declaration_scope(&self) -> Option<ScopeId> {
        let mut current = self.current;
        while let Some(id) = current {
            let scope = self.scopes.scope(id)?;
            if scope.kind != ScopeKind::Group {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Add `symbol` to `table`. An existing symbol of the same name is
    /// replaced and reported as a redefinition at `name_range`.
    pub(crate) fn add_symbol(&mut self, table: TableId, symbol: Symbol, name_range: TextRange) {
        let Some(target) = self.scopes.table_mut(table) else {
            return;
        };
        let redefined = target.has(&symbol.name);
        target.add(symbol);
        if redefined {
            self.error(name_range, SemanticErrorKind::Redefinition);
        }
    }

    /// Declare the name held by `name` in the current declaration scope.
    pub(crate) fn declare(
        &mut self,
        name: NodeIndex,
        declaration: NodeIndex,
        flags: crate::SymbolFlags,
        origin: SymbolOrigin,
    ) {
        let text = self.text(name);
        if text.is_empty() {
            return;
        }
        let Some(scope) = self.declaration_scope() else {
            return;
        };
        let Some(table) = self.scopes.scope(scope).map(|s| s.symbols) else {
            return;
        };
        let symbol = Symbol::new(text, flags, declaration).with_origin(origin);
        self.add_symbol(table, symbol, self.range(name));
    }

    /// Inject `table` into the current scope.
    pub(crate) fn augment_current(&mut self, table: TableId) {
        if let Some(scope) = self.current {
            self.scopes.augment(scope, TableRef::Local(table));
        }
    }
}
