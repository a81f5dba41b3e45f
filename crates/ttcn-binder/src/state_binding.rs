//! The binding walk.
//!
//! One depth-first pass over a module opens scopes, declares symbols and
//! classifies every reference: resolved locally, a use of an imported
//! module's name, or external. Externals made inside a scope waiting for a
//! `runs on`, `extends` or `modifies` provider are kept in that provider's
//! group so the cross-module pass can retry them once the provider is found.

use crate::scopes::{NoImports, ScopeId, ScopeKind, SymbolOwner, TableRef};
use crate::semantic_errors::SemanticErrorKind;
use crate::state::{
    AugmentationKind, AugmentationProvider, BinderState, ExternalIdent, ExternalsGroup,
    ImportDescriptor, ModuleBinding,
};
use crate::state_hoisting::{collect_hoisted, enum_value_name};
use crate::symbol_flags::SymbolFlags;
use crate::symbols::{Symbol, SymbolOrigin};
use rustc_hash::FxHashSet;
use ttcn_common::TextRange;
use ttcn_parser::node::{
    ClassTypeDeclData, ComponentTypeDeclData, EnumTypeDeclData, FuncDeclData, ModuleData,
    StructTypeDeclData, SubTypeDeclData, TemplateDeclData,
};
use ttcn_parser::{NodeData, NodeIndex, NodeKind};
use ttcn_scanner::{TokenKind, keyword_kind};

/// Name of the anonymous symbol standing for a module's control part.
pub const CONTROL_PART_NAME: &str = "__CONTROLPART__";

impl<'a> BinderState<'a> {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Bind the first module of the tree. Further modules are reported.
    pub fn bind_tree(&mut self) {
        let tree = self.tree;
        for module in tree.modules() {
            if let Some(data) = tree.arena.as_module(module) {
                self.bind_module(module, data);
            }
        }
    }

    fn bind_module(&mut self, index: NodeIndex, module: &'a ModuleData) {
        if self.module.is_some() {
            self.error(self.range(index), SemanticErrorKind::MultipleModulesInFile);
            return;
        }
        let name = self.text(module.name);
        if name.is_empty() {
            return;
        }

        let mut hoisted = FxHashSet::default();
        collect_hoisted(self.tree, self.source, &module.defs, &mut hoisted);
        self.hoisted_names = hoisted;

        self.with_scope(ScopeKind::Module, index, |this| this.bind_all(&module.defs));
        let externals = self.finish_module();

        tracing::debug!(
            module = name,
            scopes = self.scopes.len(),
            externals = externals.iter().map(|g| g.idents.len()).sum::<usize>(),
            errors = self.errors.len(),
            "bound module"
        );

        self.module = Some(ModuleBinding {
            name: name.to_string(),
            name_range: self.range(module.name),
            declaration: index,
            scopes: std::mem::take(&mut self.scopes),
            imports: std::mem::take(&mut self.imports),
            required_imports: std::mem::take(&mut self.required_imports),
            externals,
        });
        self.hoisted_names.clear();
    }

    /// Publish enumeration values and settle the augmentations whose
    /// provider turned out to be declared later in the same module.
    fn finish_module(&mut self) -> Vec<ExternalsGroup> {
        let enum_values = std::mem::take(&mut self.enum_values);
        if let Some(root) = self
            .scopes
            .scope(ScopeId::ROOT)
            .map(|s| s.symbols)
            .and_then(|t| self.scopes.table_mut(t))
        {
            for (name, symbol) in enum_values {
                if !root.has(name) {
                    root.add(symbol);
                }
            }
        }

        let (mut top_level, augmented) = std::mem::take(&mut self.externals).finish();
        let mut settled = Vec::new();
        let mut remaining = Vec::new();
        for group in augmented {
            let Some(provider) = group.provider.clone() else {
                settled.push(group);
                continue;
            };
            let provided = self
                .scopes
                .root_table()
                .and_then(|t| t.lookup(&provider.name))
                .map(|symbol| provider.kind.provided_table(symbol, &self.scopes));
            match provided {
                None => remaining.push(group),
                Some(Err(kind)) => {
                    self.error(provider.range, kind);
                    settled.push(group);
                }
                Some(Ok(Some(table))) => {
                    for &scope in &group.scopes {
                        self.scopes.augment(scope, TableRef::Local(table));
                    }
                    settled.push(group);
                }
                Some(Ok(None)) => settled.push(group),
            }
        }

        // A reference may be provided by any augmentation around it, not
        // only by the one of its own group.
        let scopes = &self.scopes;
        let unresolved =
            |ident: &ExternalIdent| !scopes.augmentation_declares(ident.scope, &ident.name);
        top_level.idents.retain(unresolved);
        for mut group in settled {
            group.idents.retain(unresolved);
            top_level.idents.append(&mut group.idents);
        }
        for group in &mut remaining {
            group.idents.retain(unresolved);
        }

        let mut externals = Vec::with_capacity(remaining.len() + 1);
        if !top_level.idents.is_empty() {
            externals.push(top_level);
        }
        externals.extend(remaining);
        externals
    }

    // =========================================================================
    // Walk
    // =========================================================================

    pub(crate) fn bind_all(&mut self, nodes: &[NodeIndex]) {
        for &node in nodes {
            self.bind_node(node);
        }
    }

    fn bind_children(&mut self, index: NodeIndex) {
        for child in self.tree.arena.children(index) {
            self.bind_node(child);
        }
    }

    pub(crate) fn bind_node(&mut self, index: NodeIndex) {
        let tree = self.tree;
        let Some(node) = tree.arena.get(index) else {
            return;
        };

        match &node.data {
            NodeData::Module(_) => {}
            NodeData::ModuleDef(def) => self.bind_node(def.def),
            NodeData::ImportDecl(import) => self.bind_import(index, import.module, &import.list),
            NodeData::GroupDecl(group) => {
                self.with_scope(ScopeKind::Group, index, |this| this.bind_all(&group.defs));
            }
            NodeData::FriendDecl(_)
            | NodeData::WithSpec(_)
            | NodeData::LanguageSpec(_)
            | NodeData::EnumSpec(_)
            | NodeData::NameIdent => {}

            NodeData::ComponentTypeDecl(decl) => self.bind_component(index, decl),
            NodeData::StructTypeDecl(decl) => self.bind_struct(index, decl),
            NodeData::EnumTypeDecl(decl) => self.bind_enum(index, decl),
            NodeData::SubTypeDecl(decl) => self.bind_sub_type(index, decl),
            NodeData::PortTypeDecl(decl) => {
                self.bind_all(&decl.attrs);
                self.declare(decl.name, index, SymbolFlags::PORT_TYPE, SymbolOrigin::None);
            }
            NodeData::SignatureDecl(decl) => {
                self.bind_parameter_types(decl.params);
                self.bind_node(decl.ret);
                self.bind_node(decl.exception);
                self.declare(decl.name, index, SymbolFlags::TYPE, SymbolOrigin::None);
            }
            NodeData::MapTypeDecl(decl) => {
                self.bind_node(decl.spec);
                self.declare(decl.name, index, SymbolFlags::TYPE, SymbolOrigin::None);
            }
            NodeData::BehaviourTypeDecl(decl) => {
                self.bind_parameter_types(decl.params);
                self.bind_node(decl.runs_on);
                self.bind_node(decl.system);
                self.bind_node(decl.ret);
                self.declare(decl.name, index, SymbolFlags::TYPE, SymbolOrigin::None);
            }
            NodeData::FuncDecl(decl) => self.bind_function(index, decl),
            NodeData::TemplateDecl(decl) => self.bind_template(index, decl),
            NodeData::ClassTypeDecl(decl) => self.bind_class(index, decl),
            NodeData::ConstructorDecl(decl) => {
                let scope = self.with_scope(ScopeKind::Constructor, index, |this| {
                    this.bind_node(decl.params);
                    this.bind_node(decl.body);
                });
                self.declare_keyword(
                    "create",
                    index,
                    SymbolFlags::CONSTRUCTOR_FUNCTION,
                    SymbolOrigin::Scope(scope),
                );
            }
            NodeData::ControlPart(control) => {
                let scope = self.with_scope(ScopeKind::Control, index, |this| {
                    match tree.arena.as_block_stmt(control.body) {
                        Some(block) => this.bind_all(&block.stmts),
                        None => this.bind_node(control.body),
                    }
                });
                self.declare_keyword(
                    CONTROL_PART_NAME,
                    index,
                    SymbolFlags::CONTROL | SymbolFlags::ANONYMOUS,
                    SymbolOrigin::Scope(scope),
                );
            }

            NodeData::BlockStmt(block) => {
                self.with_scope(ScopeKind::Block, index, |this| this.bind_all(&block.stmts));
            }
            NodeData::ForStmt(stmt) => {
                self.with_scope(ScopeKind::For, index, |this| {
                    this.bind_node(stmt.init);
                    this.bind_node(stmt.cond);
                    this.bind_node(stmt.post);
                    this.bind_node(stmt.body);
                });
            }
            NodeData::ForRangeStmt(stmt) => {
                self.with_scope(ScopeKind::For, index, |this| {
                    this.bind_node(stmt.init);
                    this.bind_node(stmt.range);
                    this.bind_node(stmt.body);
                });
            }

            NodeData::FormalPar(par) => {
                self.bind_node(par.ty);
                self.bind_all(&par.arraydef);
                self.bind_node(par.value);
                self.declare(par.name, index, SymbolFlags::ARGUMENT, SymbolOrigin::None);
            }
            NodeData::Declarator(decl) => {
                self.bind_all(&decl.arraydef);
                self.bind_node(decl.value);
                self.declare(decl.name, index, SymbolFlags::VARIABLE, SymbolOrigin::None);
            }

            // Field names on the left of `:=` are not references.
            NodeData::CompositeLiteral(lit) => self.bind_assigned_values(&lit.list),
            NodeData::ParenExpr(paren) => self.bind_assigned_values(&paren.list),
            // Only the head of `a.b.c` is looked up in scope.
            NodeData::SelectorExpr(_) => {
                let mut head = index;
                while let Some(selector) = tree.arena.as_selector_expr(head) {
                    head = selector.x;
                }
                self.bind_node(head);
            }
            NodeData::Ident => self.bind_reference(index),

            _ => self.bind_children(index),
        }
    }

    fn bind_assigned_values(&mut self, list: &[NodeIndex]) {
        for &item in list {
            match self.tree.arena.as_assignment_expr(item) {
                Some(assignment) => self.bind_node(assignment.value),
                None => self.bind_node(item),
            }
        }
    }

    /// Types of a parameter list, without declaring the parameter names.
    fn bind_parameter_types(&mut self, params: NodeIndex) {
        let tree = self.tree;
        let Some(pars) = tree.arena.as_formal_pars(params) else {
            return;
        };
        for &par in &pars.list {
            if let Some(par) = tree.arena.as_formal_par(par) {
                self.bind_node(par.ty);
            }
        }
    }

    // =========================================================================
    // References
    // =========================================================================

    fn bind_reference(&mut self, index: NodeIndex) {
        let name = self.text(index);
        if name.is_empty() || keyword_kind(name).is_some() {
            return;
        }
        if self.hoisted_names.contains(name) || self.hoisted_inner_names.contains(name) {
            return;
        }
        let Some(scope) = self.current else {
            return;
        };

        let found = self
            .scopes
            .resolve(scope, name, &NoImports)
            .map(|r| r.symbol.flags.contains(SymbolFlags::IMPORTED_MODULE));
        match found {
            Some(true) => {
                self.required_imports.insert(name.to_string());
            }
            Some(false) => {}
            None => {
                let range = self.range(index);
                self.externals.push(ExternalIdent {
                    node: index,
                    name: name.to_string(),
                    range,
                    scope,
                });
            }
        }
    }

    /// `runs on` target of a behaviour or class, with the clause's range.
    fn runs_on_provider(&self, runs_on: NodeIndex) -> Option<(NodeIndex, TextRange)> {
        self.tree
            .arena
            .as_runs_on_spec(runs_on)
            .map(|spec| (spec.comp, self.range(runs_on)))
    }

    /// Run `f` with the table provided by `provider` injected into the
    /// current scope. A provider that is not declared locally yet makes the
    /// references inside `f` wait in the provider's externals group.
    fn with_augmentation<F>(
        &mut self,
        kind: AugmentationKind,
        provider: Option<(NodeIndex, TextRange)>,
        f: F,
    ) where
        F: FnOnce(&mut Self),
    {
        let Some((provider, range)) = provider else {
            f(self);
            return;
        };
        let name = self.text(provider);
        let Some(scope) = self.current else {
            f(self);
            return;
        };
        if name.is_empty() || keyword_kind(name).is_some() {
            f(self);
            return;
        }

        let provided = self
            .scopes
            .resolve(scope, name, &NoImports)
            .map(|resolved| match resolved.owner {
                SymbolOwner::Builtin => Ok(None),
                _ => kind.provided_table(resolved.symbol, &self.scopes),
            });

        match provided {
            Some(Ok(Some(table))) => {
                self.augment_current(table);
                f(self);
            }
            Some(Ok(None)) => f(self),
            Some(Err(error)) => {
                self.error(range, error);
                f(self);
            }
            None => {
                let provider = AugmentationProvider {
                    kind,
                    name: name.to_string(),
                    range,
                };
                let saved = self.externals.enter(provider, scope);
                f(self);
                self.externals.leave(saved);
            }
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn bind_import(&mut self, index: NodeIndex, module: NodeIndex, list: &[NodeIndex]) {
        let tree = self.tree;
        let arena = &tree.arena;
        let name = self.text(module);
        if name.is_empty() {
            return;
        }
        let transit = list
            .first()
            .and_then(|&first| arena.as_def_kind_expr(first))
            .and_then(|def| def.kind)
            .is_some_and(|kind| kind.kind == TokenKind::Import);
        let is_public = arena
            .as_module_def(arena.parent(index))
            .and_then(|def| def.visibility)
            .is_some_and(|vis| vis.kind == TokenKind::Public);

        self.imports.push(ImportDescriptor {
            module: name.to_string(),
            transit,
            is_public,
            declaration: index,
            range: self.range(module),
        });

        // Several imports from one module name it once.
        if !transit
            && let Some(table) = self.scopes.scope(ScopeId::ROOT).map(|s| s.symbols)
            && self.scopes.table(table).is_some_and(|t| !t.has(name))
        {
            let symbol = Symbol::new(name, SymbolFlags::IMPORTED_MODULE, index);
            self.add_symbol(table, symbol, self.range(module));
        }
    }

    fn bind_component(&mut self, index: NodeIndex, decl: &'a ComponentTypeDeclData) {
        let tree = self.tree;
        self.bind_all(&decl.extends);

        let members = self.scopes.add_table();
        let body = tree.arena.as_block_stmt(decl.body);
        for &stmt in body.map(|b| b.stmts.as_slice()).unwrap_or_default() {
            let Some(value_decl) = tree
                .arena
                .as_decl_stmt(stmt)
                .and_then(|s| tree.arena.as_value_decl(s.decl))
            else {
                continue;
            };
            self.bind_node(value_decl.ty);
            for &declarator in &value_decl.decls {
                let Some(d) = tree.arena.as_declarator(declarator) else {
                    continue;
                };
                self.bind_all(&d.arraydef);
                self.bind_node(d.value);
                let name = self.text(d.name);
                if !name.is_empty() {
                    let symbol = Symbol::new(name, SymbolFlags::FIELD, declarator);
                    self.add_symbol(members, symbol, self.range(d.name));
                }
            }
        }

        self.declare(
            decl.name,
            index,
            SymbolFlags::COMPONENT_TYPE,
            SymbolOrigin::Members(members),
        );
    }

    fn bind_struct(&mut self, index: NodeIndex, decl: &'a StructTypeDeclData) {
        let tree = self.tree;
        let members = self.scopes.add_table();
        for &field in &decl.fields {
            let Some(f) = tree.arena.as_field(field) else {
                continue;
            };
            self.bind_node(f.ty);
            self.bind_all(&f.arraydef);
            self.bind_node(f.constraint);
            let name = self.text(f.name);
            if !name.is_empty() {
                let symbol = Symbol::new(name, SymbolFlags::FIELD, field);
                self.add_symbol(members, symbol, self.range(f.name));
            }
        }

        let flags = if decl.kind.kind == TokenKind::Union {
            SymbolFlags::UNION_TYPE
        } else {
            SymbolFlags::STRUCTURAL_TYPE
        };
        self.declare(decl.name, index, flags, SymbolOrigin::Members(members));
    }

    fn bind_enum(&mut self, index: NodeIndex, decl: &'a EnumTypeDeclData) {
        let tree = self.tree;
        let members = self.scopes.add_table();
        for &item in &decl.enums {
            let name_node = enum_value_name(&tree.arena, item);
            let name = self.text(name_node);
            if name.is_empty() {
                continue;
            }
            let symbol = Symbol::new(name, SymbolFlags::ENUM_MEMBER, name_node);
            self.enum_values
                .entry(name)
                .or_insert_with(|| symbol.clone());
            self.add_symbol(members, symbol, self.range(name_node));
        }
        self.declare(
            decl.name,
            index,
            SymbolFlags::ENUM_TYPE,
            SymbolOrigin::Members(members),
        );
    }

    fn bind_sub_type(&mut self, index: NodeIndex, decl: &'a SubTypeDeclData) {
        let Some(field) = self.tree.arena.as_field(decl.field) else {
            return;
        };
        self.bind_node(field.ty);
        self.bind_all(&field.arraydef);
        self.bind_node(field.constraint);
        self.declare(field.name, index, SymbolFlags::SUBTYPE_TYPE, SymbolOrigin::None);
    }

    fn bind_function(&mut self, index: NodeIndex, decl: &'a FuncDeclData) {
        let tree = self.tree;
        self.bind_node(decl.runs_on);
        self.bind_node(decl.mtc);
        self.bind_node(decl.system);
        self.bind_node(decl.ret);

        if let Some(modif) = decl.modif
            && modif.text(self.source) == "@abstract"
        {
            // FuncDecl -> ModuleDef -> ClassTypeDecl
            let owner = tree.arena.parent(tree.arena.parent(index));
            if let Some(class) = tree.arena.as_class_type_decl(owner)
                && !class
                    .modif
                    .is_some_and(|m| m.text(self.source) == "@abstract")
            {
                self.error(
                    modif.range,
                    SemanticErrorKind::CannotHaveAbstractFunctionInNonAbstractClass,
                );
            }
        }

        let scope = self.with_scope(ScopeKind::Behaviour, index, |this| {
            this.bind_node(decl.pars);
            this.bind_node(decl.params);
            let runs_on = this.runs_on_provider(decl.runs_on);
            this.with_augmentation(AugmentationKind::RunsOn, runs_on, |this| {
                this.bind_node(decl.body)
            });
        });
        self.declare(decl.name, index, SymbolFlags::FUNCTION, SymbolOrigin::Scope(scope));
    }

    fn bind_template(&mut self, index: NodeIndex, decl: &'a TemplateDeclData) {
        let tree = self.tree;
        self.bind_node(decl.ty);

        let scope = self.with_scope(ScopeKind::Template, index, |this| {
            this.bind_node(decl.pars);
            this.bind_node(decl.params);
            this.bind_node(decl.base);
            let base = (tree.arena.kind(decl.base) == Some(NodeKind::Ident))
                .then(|| (decl.base, this.range(decl.base)));
            this.with_augmentation(AugmentationKind::Modifies, base, |this| {
                this.bind_node(decl.value)
            });
        });
        self.declare(decl.name, index, SymbolFlags::TEMPLATE, SymbolOrigin::Scope(scope));
    }

    fn bind_class(&mut self, index: NodeIndex, decl: &'a ClassTypeDeclData) {
        let tree = self.tree;
        self.bind_node(decl.runs_on);
        self.bind_node(decl.mtc);
        self.bind_node(decl.system);
        self.bind_all(&decl.extends);

        let mut inner = FxHashSet::default();
        collect_hoisted(tree, self.source, &decl.defs, &mut inner);
        let outer = std::mem::replace(&mut self.hoisted_inner_names, inner);

        let scope = self.with_scope(ScopeKind::Class, index, |this| {
            this.declare_keyword("this", index, SymbolFlags::THIS, SymbolOrigin::None);
            let runs_on = this.runs_on_provider(decl.runs_on);
            let base = decl.extends.first().map(|&base| (base, this.range(base)));
            this.with_augmentation(AugmentationKind::RunsOn, runs_on, |this| {
                this.with_augmentation(AugmentationKind::Extends, base, |this| {
                    this.bind_class_body(decl)
                })
            });
        });

        self.hoisted_inner_names = outer;
        self.declare(decl.name, index, SymbolFlags::CLASS_TYPE, SymbolOrigin::Scope(scope));
    }

    fn bind_class_body(&mut self, decl: &'a ClassTypeDeclData) {
        self.bind_all(&decl.defs);
        self.bind_node(decl.finally);
    }

    /// Declare a name that has no name node of its own, such as `this` or a
    /// constructor's `create`. The name is placed at the declaration's start.
    fn declare_keyword(
        &mut self,
        name: &str,
        declaration: NodeIndex,
        flags: SymbolFlags,
        origin: SymbolOrigin,
    ) {
        let Some(table) = self
            .declaration_scope()
            .and_then(|s| self.scopes.scope(s))
            .map(|s| s.symbols)
        else {
            return;
        };
        let begin = self.range(declaration).begin;
        let range = TextRange::new(begin, begin);
        let symbol = Symbol::new(name, flags, declaration).with_origin(origin);
        self.add_symbol(table, symbol, range);
    }
}
