//! @dose
//! purpose: Namespace tree and name registry. Selected types are grouped into a tree keyed by
//!     dot-separated namespace segments, and every inserted type gets exactly one declared name.
//!
//! when-editing:
//!     - !Children keep insertion order; output order depends on it
//!     - !A node's full_name is its parent's full_name + "." + name; top-level nodes use name
//!
//! invariants:
//!     - Every inserted type appears in exactly one node's `types`
//!     - Every inserted type has exactly one registry entry
//!     - A source namespace folds into the module node when it is empty or a default namespace
//!
//! gotchas:
//!     - Registered names use the `$Generic` class name, so open generics and their
//!       instantiations share one symbol

use crate::formatter::class_name;
use crate::metadata::{Library, TypeId};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Placeholder declared symbol for types with no structural detail
pub const ROOT_PLACEHOLDER: &str = "RootObject";

/// One segment of a dotted namespace path
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceNode {
    pub name: String,
    pub full_name: String,
    pub types: Vec<TypeId>,
    pub children: IndexMap<String, NamespaceNode>,
}

impl NamespaceNode {
    fn new(name: &str, full_name: String) -> Self {
        Self {
            name: name.to_string(),
            full_name,
            types: Vec::new(),
            children: IndexMap::new(),
        }
    }

    /// This node and all descendants, parents before children
    pub fn pre_order(&self) -> Vec<&NamespaceNode> {
        let mut nodes = vec![self];
        for child in self.children.values() {
            nodes.extend(child.pre_order());
        }
        nodes
    }
}

/// Forest of top-level namespace nodes
#[derive(Debug, Clone, Default)]
pub struct NamespaceTree {
    roots: IndexMap<String, NamespaceNode>,
}

impl NamespaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` to the node for `target_namespace`, creating missing segments.
    /// Returns the leaf node.
    pub fn insert(&mut self, target_namespace: &str, id: TypeId) -> &NamespaceNode {
        let mut segments = target_namespace.split('.');
        let first = segments.next().unwrap_or_default();
        let mut node = self
            .roots
            .entry(first.to_string())
            .or_insert_with(|| NamespaceNode::new(first, first.to_string()));

        for segment in segments {
            let full_name = format!("{}.{}", node.full_name, segment);
            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| NamespaceNode::new(segment, full_name));
        }

        node.types.push(id);
        node
    }

    pub fn roots(&self) -> impl Iterator<Item = &NamespaceNode> {
        self.roots.values()
    }

    /// Every node in the tree, parents before children
    pub fn nodes(&self) -> Vec<&NamespaceNode> {
        self.roots().flat_map(|root| root.pre_order()).collect()
    }

    pub fn find(&self, full_name: &str) -> Option<&NamespaceNode> {
        let mut segments = full_name.split('.');
        let mut node = self.roots.get(segments.next()?)?;
        for segment in segments {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    pub fn type_count(&self) -> usize {
        self.nodes().iter().map(|n| n.types.len()).sum()
    }
}

/// Declared name of every type inserted into the tree
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: HashMap<TypeId, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TypeId) -> Option<&str> {
        self.names.get(&id).map(|s| s.as_str())
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn register(&mut self, id: TypeId, name: String) {
        self.names.entry(id).or_insert(name);
    }
}

/// Whether types of `namespace` are declared in the module node
pub fn folds_into_module(namespace: &str, default_namespaces: &IndexSet<String>) -> bool {
    namespace.is_empty() || default_namespaces.contains(namespace)
}

/// Insert a type into the tree and register its declared name: the bare class name inside
/// the module node, `<leaf full name>.<class name>` everywhere else
pub fn insert_type(
    tree: &mut NamespaceTree,
    registry: &mut NameRegistry,
    library: &Library,
    id: TypeId,
    target_namespace: &str,
    module_name: &str,
) {
    let leaf = tree.insert(target_namespace, id);
    let name = class_name(library.get(id));
    let declared = if leaf.full_name == module_name {
        name
    } else {
        format!("{}.{}", leaf.full_name, name)
    };
    registry.register(id, declared);
}
