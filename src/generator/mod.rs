//! @dose
//! purpose: Generation run. Owns every piece of per-run state (default namespace set, namespace
//!     tree, name registry, root-type policy) and drives the two phases: build the complete tree
//!     and registry from the library, then emit declarations with the resolver.
//!
//! when-editing:
//!     - !Resolution must never start before `build` has inserted every selected type; forward
//!       references depend on a complete registry
//!     - !Nothing here is global; two runs never share state
//!
//! invariants:
//!     - Insertion order is the library's exported-type order
//!     - A type is in the tree if and only if the policy selects it
//!
//! flows:
//!     - build: default namespaces -> select exported types -> insert into tree + registry
//!     - generate: build -> DeclarationEmitter::emit -> declaration text

pub mod emitter;
pub mod namespace_tree;
pub mod policy;
pub mod resolver;

use crate::config::Config;
use crate::metadata::Library;
use indexmap::IndexSet;

pub use emitter::DeclarationEmitter;
pub use namespace_tree::{
    folds_into_module, insert_type, NameRegistry, NamespaceNode, NamespaceTree,
};
pub use policy::RootTypePolicy;
pub use resolver::ResolveContext;

/// Inputs of one generation run
pub struct Generator<'a> {
    library: &'a Library,
    config: &'a Config,
    module_name: String,
    root_namespace: String,
}

/// State built by phase one and consumed by the emitter
pub struct GenerationRun<'a> {
    pub library: &'a Library,
    pub config: &'a Config,
    pub module_name: String,
    pub default_namespaces: IndexSet<String>,
    pub policy: RootTypePolicy,
    pub tree: NamespaceTree,
    pub registry: NameRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(
        library: &'a Library,
        config: &'a Config,
        module_name: impl Into<String>,
        root_namespace: impl Into<String>,
    ) -> Self {
        Self {
            library,
            config,
            module_name: module_name.into(),
            root_namespace: root_namespace.into(),
        }
    }

    /// Source namespaces folded into the output module
    pub fn default_namespaces(&self) -> IndexSet<String> {
        let mut namespaces: IndexSet<String> =
            self.library.xmlns_clr_namespaces().iter().cloned().collect();

        if self.library.assembly_name() == self.config.framework.assembly {
            namespaces.extend(self.config.framework.extra_default_namespaces.iter().cloned());
        }

        if namespaces.is_empty() {
            namespaces.insert(self.root_namespace.clone());
            namespaces.insert(self.module_name.clone());
        }
        namespaces
    }

    /// Phase one: select types and build the namespace tree and name registry
    pub fn build(&self) -> GenerationRun<'a> {
        let default_namespaces = self.default_namespaces();
        let policy = RootTypePolicy::new(&self.config.selection, &self.config.framework);
        let mut tree = NamespaceTree::new();
        let mut registry = NameRegistry::new();

        for id in self.library.exported_types() {
            if !policy.is_selectable(self.library, id) {
                continue;
            }
            let namespace = &self.library.get(id).namespace;
            let target = if folds_into_module(namespace, &default_namespaces) {
                self.module_name.as_str()
            } else {
                namespace.as_str()
            };
            insert_type(
                &mut tree,
                &mut registry,
                self.library,
                id,
                target,
                &self.module_name,
            );
        }

        GenerationRun {
            library: self.library,
            config: self.config,
            module_name: self.module_name.clone(),
            default_namespaces,
            policy,
            tree,
            registry,
        }
    }

    /// Build, then emit the full declaration text
    pub fn generate(&self) -> String {
        let run = self.build();
        DeclarationEmitter::new(&run).emit()
    }
}

impl<'a> GenerationRun<'a> {
    pub fn resolver(&self) -> ResolveContext<'_> {
        ResolveContext {
            library: self.library,
            registry: &self.registry,
            default_namespaces: &self.default_namespaces,
            framework: &self.config.framework,
            module_name: &self.module_name,
        }
    }
}
