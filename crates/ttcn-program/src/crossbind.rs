//! Cross-module binding.
//!
//! The references a module's binder could not resolve are looked up in the
//! root tables of the modules its imports make visible. The pass only reads
//! the program: it produces a `CrossbindPlan` that the program then applies
//! to the module being bound.

use crate::import_visitor::{ImportVisitor, VisibleModule};
use crate::module_descriptor::{DependencyEntry, ModuleDescriptor};
use crate::program::Program;
use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use ttcn_binder::{
    ExternalIdent, ScopeId, SemanticError, Symbol, SymbolFlags, TableId, TableRef,
};

/// Everything a cross-module pass decided for one module.
#[derive(Debug, Default)]
pub(crate) struct CrossbindPlan {
    pub injections: Vec<(ScopeId, TableRef)>,
    pub dependencies: IndexMap<String, Vec<DependencyEntry>, FxBuildHasher>,
    pub vias: FxHashSet<String>,
    pub unresolved: Vec<ExternalIdent>,
    pub errors: Vec<SemanticError>,
    pub watched: FxHashSet<String>,
}

pub(crate) struct Crossbinder<'p> {
    module: &'p ModuleDescriptor,
    visible: Vec<VisibleModule<'p>>,
    /// Visible modules whose root table is injected into the module scope.
    injected_roots: FixedBitSet,
    plan: CrossbindPlan,
}

impl<'p> Crossbinder<'p> {
    pub(crate) fn new(program: &'p Program, module: &'p ModuleDescriptor) -> Crossbinder<'p> {
        let walk = ImportVisitor::new(program).run(module);
        if !walk.complete {
            tracing::debug!(
                module = module.name(),
                missing = ?walk.missing,
                "import walk incomplete"
            );
        }
        let count = walk.visible.len();
        Crossbinder {
            module,
            visible: walk.visible,
            injected_roots: FixedBitSet::with_capacity(count),
            plan: CrossbindPlan {
                watched: walk.watched,
                ..CrossbindPlan::default()
            },
        }
    }

    pub(crate) fn run(mut self) -> CrossbindPlan {
        let module = self.module;
        let mut provided: Vec<(ScopeId, usize, TableId)> = Vec::new();
        for group in &module.binding.externals {
            let Some(provider) = &group.provider else {
                continue;
            };
            let Some((index, symbol)) = self.find(&provider.name) else {
                continue;
            };
            let owner = self.visible[index];
            match provider.kind.provided_table(symbol, &owner.module.binding.scopes) {
                Ok(Some(table)) => {
                    for &scope in &group.scopes {
                        self.inject(index, table, scope);
                        provided.push((scope, index, table));
                    }
                }
                Ok(None) => {}
                Err(kind) => self.plan.errors.push(SemanticError::new(provider.range, kind)),
            }
        }

        // Any table injected around a reference may declare it, whichever
        // group the reference was routed to.
        for group in &module.binding.externals {
            for ident in &group.idents {
                if !self.provides(&provided, ident) {
                    self.resolve(ident);
                }
            }
        }

        tracing::trace!(
            module = module.name(),
            visible = self.visible.len(),
            unresolved = self.plan.unresolved.len(),
            "crossbind plan"
        );
        self.plan
    }

    fn provides(&self, provided: &[(ScopeId, usize, TableId)], ident: &ExternalIdent) -> bool {
        let scopes = &self.module.binding.scopes;
        scopes.ancestors(ident.scope).any(|scope| {
            provided.iter().any(|&(target, index, table)| {
                target == scope
                    && self.visible[index]
                        .module
                        .binding
                        .scopes
                        .table(table)
                        .is_some_and(|members| members.has(&ident.name))
            })
        })
    }

    fn resolve(&mut self, ident: &ExternalIdent) {
        let Some((index, _)) = self.find(&ident.name) else {
            self.plan.unresolved.push(ident.clone());
            return;
        };
        if self.injected_roots.contains(index) {
            return;
        }
        self.injected_roots.insert(index);
        let owner = self.visible[index];
        if let Some(root) = owner.module.binding.scopes.scope(ScopeId::ROOT) {
            self.inject(index, root.symbols, ScopeId::ROOT);
        }
    }

    /// First visible module defining `name` at its top level.
    fn find(&self, name: &str) -> Option<(usize, &'p Symbol)> {
        self.visible.iter().enumerate().find_map(|(index, visible)| {
            visible
                .module
                .binding
                .scopes
                .resolve_direct(ScopeId::ROOT, name)
                .filter(|symbol| !symbol.flags.contains(SymbolFlags::IMPORTED_MODULE))
                .map(|symbol| (index, symbol))
        })
    }

    fn inject(&mut self, index: usize, table: TableId, scope: ScopeId) {
        let provider = self.visible[index];
        if provider.name() == self.module.name() {
            return;
        }
        self.plan.injections.push((
            scope,
            TableRef::Imported {
                module: provider.name().to_string(),
                table,
            },
        ));

        let entry = DependencyEntry {
            table,
            injected_to: scope,
        };
        let entries = self
            .plan
            .dependencies
            .entry(provider.name().to_string())
            .or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
        }
        if let Some(via) = provider.via {
            self.plan.vias.insert(via.to_string());
        }
    }
}
