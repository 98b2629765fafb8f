//! @dose
//! purpose: In-memory view of one reflected library. Interns every type descriptor from a
//!     metadata dump into an arena addressed by `TypeId` and answers the read-only queries the
//!     generator needs (assignability, subclassing, collection shape, scalar classification).
//!
//! when-editing:
//!     - !Every key referenced by a member must intern to some TypeId; unknown keys become opaque
//!     - !Declared order is the dump order and drives output order
//!     - Queries are pure; nothing here mutates after `from_dump` returns
//!
//! invariants:
//!     - A TypeId is only ever created by this module, so indexing the arena never panics
//!     - The first descriptor for a duplicated key wins; later duplicates are ignored
//!
//! gotchas:
//!     - Opaque descriptors have an empty assembly, so they never count as "same assembly"
//!     - Constructed generics keep the open definition's name (e.g., "IList`1")
//!     - Array keys ("Demo.Card[]", "System.Int32[,]") are arrays of their element type, never
//!       instantiations of it

use crate::metadata::model::{AssemblyInfo, LibraryDump, TypeDump, TypeKind};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Index of a type inside a `Library`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

/// Primitive classification of well-known runtime types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Boolean,
    Text,
    Number,
    DateTime,
}

static SCALARS: Lazy<HashMap<&'static str, ScalarKind>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("System.Boolean", ScalarKind::Boolean);
    map.insert("System.Char", ScalarKind::Text);
    map.insert("System.String", ScalarKind::Text);
    for key in [
        "System.SByte",
        "System.Byte",
        "System.Int16",
        "System.UInt16",
        "System.Int32",
        "System.UInt32",
        "System.Int64",
        "System.UInt64",
        "System.Single",
        "System.Double",
        "System.Decimal",
    ] {
        map.insert(key, ScalarKind::Number);
    }
    map.insert("System.DateTime", ScalarKind::DateTime);
    map
});

const COLLECTION_INTERFACES: &[&str] = &["System.Collections.ICollection", "System.Collections.IList"];

const GENERIC_COLLECTION_DEFINITIONS: &[&str] = &[
    "System.Collections.Generic.ICollection`1",
    "System.Collections.Generic.IList`1",
];

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
    pub is_static: bool,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub is_static: bool,
    pub parameters: Vec<TypeId>,
}

/// A reflected type with all references resolved to arena ids
#[derive(Debug, Clone)]
pub struct ReflectedType {
    /// Unique full name
    pub key: String,
    pub name: String,
    pub namespace: String,
    /// Declaring assembly name (empty when unknown)
    pub assembly: String,
    pub kind: TypeKind,
    pub exported: bool,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    /// Open definition when this is a constructed generic
    pub generic_definition: Option<TypeId>,
    /// Element type when this is an array
    pub element_type: Option<TypeId>,
    pub is_generic_definition: bool,
    pub enum_values: Vec<String>,
    pub attributes: Vec<String>,
    pub properties: Vec<Property>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl ReflectedType {
    pub fn full_name(&self) -> &str {
        &self.key
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_array(&self) -> bool {
        self.element_type.is_some()
    }

    pub fn is_constructed_generic(&self) -> bool {
        self.generic_definition.is_some()
    }

    pub fn is_generic(&self) -> bool {
        self.is_generic_definition || self.is_constructed_generic()
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    fn opaque(key: &str) -> Self {
        let parts = KeyParts::parse(key);
        Self {
            key: key.to_string(),
            name: parts.name.to_string(),
            namespace: parts.namespace.to_string(),
            assembly: String::new(),
            kind: TypeKind::Class,
            exported: false,
            base: None,
            interfaces: Vec::new(),
            generic_definition: None,
            element_type: None,
            is_generic_definition: false,
            enum_values: Vec::new(),
            attributes: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Pieces recovered from a type key such as `System.Collections.Generic.IList`1[Demo.View]`
#[derive(Debug, PartialEq)]
struct KeyParts<'a> {
    namespace: &'a str,
    name: &'a str,
    /// Open generic definition key
    definition: Option<&'a str>,
    /// Array element key
    element: Option<&'a str>,
}

impl<'a> KeyParts<'a> {
    fn parse(key: &'a str) -> Self {
        if let Some(element) = array_element(key) {
            // Namespace comes from the element; the name keeps the rank suffix
            let namespace = KeyParts::parse(element).namespace;
            let name = if namespace.is_empty() {
                key
            } else {
                &key[namespace.len() + 1..]
            };
            return Self {
                namespace,
                name,
                definition: None,
                element: Some(element),
            };
        }

        let (head, definition) = match key.find('[') {
            Some(open) if key.ends_with(']') => (&key[..open], Some(&key[..open])),
            _ => (key, None),
        };
        let (namespace, name) = head.rsplit_once('.').unwrap_or(("", head));
        Self {
            namespace,
            name,
            definition,
            element: None,
        }
    }
}

/// Element key of an array key: the last bracket group holds only rank commas
fn array_element(key: &str) -> Option<&str> {
    let open = key.rfind('[')?;
    let rank = key.strip_suffix(']')?.get(open + 1..)?;
    if open > 0 && rank.chars().all(|c| c == ',') {
        Some(&key[..open])
    } else {
        None
    }
}

/// Arena of reflected types for one library
#[derive(Debug, Clone, Default)]
pub struct Library {
    assembly: AssemblyInfo,
    clr_namespaces: Vec<String>,
    types: Vec<ReflectedType>,
    by_key: HashMap<String, TypeId>,
    declared: Vec<TypeId>,
}

impl Library {
    /// Intern a metadata dump. Dangling references become opaque descriptors.
    pub fn from_dump(dump: LibraryDump) -> Self {
        let mut library = Library {
            assembly: dump.assembly,
            clr_namespaces: dump
                .xmlns_definitions
                .into_iter()
                .map(|d| d.clr_namespace)
                .collect(),
            ..Default::default()
        };

        // Reserve ids first so forward references land on the declared descriptor
        let mut pending = Vec::with_capacity(dump.types.len());
        let mut seen = HashSet::new();
        for ty in dump.types {
            if !seen.insert(ty.key.clone()) {
                continue;
            }
            let id = library.intern(&ty.key);
            pending.push((id, ty));
        }

        for (id, ty) in pending {
            let resolved = library.resolve_dump(id, ty);
            library.types[id.0] = resolved;
            library.declared.push(id);
        }

        library
    }

    pub fn assembly_name(&self) -> &str {
        &self.assembly.name
    }

    pub fn assembly_full_name(&self) -> &str {
        if self.assembly.full_name.is_empty() {
            &self.assembly.name
        } else {
            &self.assembly.full_name
        }
    }

    /// CLR namespaces named by the library's XML namespace definitions, in declaration order
    pub fn xmlns_clr_namespaces(&self) -> &[String] {
        &self.clr_namespaces
    }

    pub fn get(&self, id: TypeId) -> &ReflectedType {
        &self.types[id.0]
    }

    pub fn lookup(&self, key: &str) -> Option<TypeId> {
        self.by_key.get(key).copied()
    }

    /// Types that had a descriptor in the dump, in dump order
    pub fn declared_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.declared.iter().copied()
    }

    /// Exported types declared by this library's own assembly, in dump order
    pub fn exported_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.declared_types().filter(move |&id| {
            let ty = self.get(id);
            ty.exported && self.is_local(id)
        })
    }

    /// Whether a type is declared by the library being processed
    pub fn is_local(&self, id: TypeId) -> bool {
        let assembly = self.assembly_of(id);
        !assembly.is_empty() && assembly == self.assembly.name
    }

    /// Declaring assembly; constructed generics without one inherit their definition's
    pub fn assembly_of(&self, id: TypeId) -> &str {
        let ty = self.get(id);
        match ty.generic_definition {
            Some(def) if ty.assembly.is_empty() => &self.get(def).assembly,
            _ => &ty.assembly,
        }
    }

    pub fn scalar_kind(&self, id: TypeId) -> Option<ScalarKind> {
        SCALARS.get(self.get(id).key.as_str()).copied()
    }

    /// Identity, base chain, or any transitively implemented interface matches `key`
    pub fn is_assignable_to(&self, id: TypeId, key: &str) -> bool {
        self.closure(id).any(|t| self.get(t).key == key)
    }

    /// Strict subclass test along the base chain
    pub fn is_subclass_of(&self, id: TypeId, ancestor: TypeId) -> bool {
        let mut current = self.base_of(id);
        let mut seen = HashSet::new();
        while let Some(base) = current {
            if base == ancestor {
                return true;
            }
            if !seen.insert(base) {
                break;
            }
            current = self.base_of(base);
        }
        false
    }

    /// Declared base; constructed generics without one use their definition's
    pub fn base_of(&self, id: TypeId) -> Option<TypeId> {
        let ty = self.get(id);
        match (ty.base, ty.generic_definition) {
            (None, Some(def)) => self.get(def).base,
            (base, _) => base,
        }
    }

    fn interfaces_of(&self, id: TypeId) -> &[TypeId] {
        let ty = self.get(id);
        match ty.generic_definition {
            Some(def) if ty.interfaces.is_empty() => &self.get(def).interfaces,
            _ => &ty.interfaces,
        }
    }

    /// Collection-shaped: an array, or implements the non-generic collection interfaces or a
    /// generic collection interface instantiation
    pub fn is_collection(&self, id: TypeId) -> bool {
        if self.get(id).is_array() {
            return true;
        }
        self.closure(id).any(|t| {
            let ty = self.get(t);
            if COLLECTION_INTERFACES.contains(&ty.key.as_str()) {
                return true;
            }
            ty.generic_definition
                .map(|def| GENERIC_COLLECTION_DEFINITIONS.contains(&self.get(def).key.as_str()))
                .unwrap_or(false)
        })
    }

    /// The type itself, its bases, and every interface reachable from them
    fn closure(&self, id: TypeId) -> impl Iterator<Item = TypeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            stack.extend(self.interfaces_of(current).iter().rev().copied());
            if let Some(base) = self.base_of(current) {
                stack.push(base);
            }
        }
        order.into_iter()
    }

    fn intern(&mut self, key: &str) -> TypeId {
        if let Some(id) = self.lookup(key) {
            return id;
        }
        let id = TypeId(self.types.len());
        self.types.push(ReflectedType::opaque(key));
        self.by_key.insert(key.to_string(), id);

        let parts = KeyParts::parse(key);
        if let Some(element) = parts.element {
            let element = element.to_string();
            let element_id = self.intern(&element);
            self.types[id.0].element_type = Some(element_id);
        } else if let Some(definition) = parts.definition {
            let definition = definition.to_string();
            let def_id = self.intern(&definition);
            self.types[id.0].generic_definition = Some(def_id);
        }
        id
    }

    fn resolve_dump(&mut self, id: TypeId, dump: TypeDump) -> ReflectedType {
        let mut ty = self.get(id).clone();

        if let Some(name) = dump.name {
            ty.name = name;
        }
        if let Some(namespace) = dump.namespace {
            ty.namespace = namespace;
        }
        ty.assembly = dump.assembly.unwrap_or_default();
        ty.kind = dump.kind;
        ty.exported = dump.exported;
        ty.base = dump.base.as_deref().map(|b| self.intern(b));
        ty.interfaces = dump.interfaces.iter().map(|i| self.intern(i)).collect();
        if let Some(definition) = dump.generic_definition.as_deref() {
            ty.generic_definition = Some(self.intern(definition));
        }
        ty.is_generic_definition = dump.is_generic_definition;
        ty.enum_values = dump.enum_values;
        ty.attributes = dump.attributes;

        ty.properties = dump
            .properties
            .into_iter()
            .map(|p| Property {
                ty: self.intern(&p.type_key),
                name: p.name,
                is_static: p.is_static,
                attributes: p.attributes,
            })
            .collect();
        ty.fields = dump
            .fields
            .into_iter()
            .map(|f| Field {
                ty: self.intern(&f.type_key),
                name: f.name,
                is_static: f.is_static,
            })
            .collect();
        ty.methods = dump
            .methods
            .into_iter()
            .map(|m| Method {
                parameters: m.parameters.iter().map(|p| self.intern(p)).collect(),
                name: m.name,
                is_static: m.is_static,
            })
            .collect();

        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library(value: serde_json::Value) -> Library {
        Library::from_dump(serde_json::from_value(value).unwrap())
    }

    fn sample() -> Library {
        library(json!({
            "assembly": { "name": "Demo", "full_name": "Demo, Version=1.0.0.0" },
            "types": [
                { "key": "Demo.Button", "name": "Button", "namespace": "Demo", "assembly": "Demo",
                  "base": "Demo.View" },
                { "key": "Demo.View", "name": "View", "namespace": "Demo", "assembly": "Demo",
                  "base": "System.Object", "interfaces": ["Demo.IVisual"] },
                { "key": "Demo.IVisual", "name": "IVisual", "namespace": "Demo", "assembly": "Demo",
                  "kind": "interface", "interfaces": ["Demo.IElement"] },
                { "key": "Demo.Items", "name": "Items", "namespace": "Demo", "assembly": "Demo",
                  "interfaces": ["System.Collections.Generic.IList`1[Demo.View]"] },
                { "key": "Other.Thing", "name": "Thing", "namespace": "Other", "assembly": "Other",
                  "exported": true }
            ]
        }))
    }

    #[test]
    fn test_key_parts() {
        let parts = KeyParts::parse("System.Collections.Generic.IList`1[Demo.View]");
        assert_eq!(parts.namespace, "System.Collections.Generic");
        assert_eq!(parts.name, "IList`1");
        assert_eq!(parts.definition, Some("System.Collections.Generic.IList`1"));
        assert!(parts.element.is_none());

        let parts = KeyParts::parse("Demo.Map`2[System.String,Demo.List`1[Demo.View[]]]");
        assert_eq!(parts.definition, Some("Demo.Map`2"));
        assert!(parts.element.is_none());

        let parts = KeyParts::parse("Plain");
        assert_eq!(parts.namespace, "");
        assert_eq!(parts.name, "Plain");
        assert!(parts.definition.is_none());
    }

    #[test]
    fn test_key_parts_arrays() {
        let parts = KeyParts::parse("Demo.Card[]");
        assert_eq!(parts.namespace, "Demo");
        assert_eq!(parts.name, "Card[]");
        assert_eq!(parts.element, Some("Demo.Card"));
        assert!(parts.definition.is_none());

        let parts = KeyParts::parse("System.Int32[,]");
        assert_eq!(parts.element, Some("System.Int32"));

        let parts = KeyParts::parse("Demo.Grid`1[System.String][]");
        assert_eq!(parts.namespace, "Demo");
        assert_eq!(parts.name, "Grid`1[System.String][]");
        assert_eq!(parts.element, Some("Demo.Grid`1[System.String]"));

        assert!(KeyParts::parse("Demo.Bag`1[Demo.Card[]]").element.is_none());
    }

    #[test]
    fn test_arrays_are_collections_not_instantiations() {
        let lib = library(json!({
            "assembly": { "name": "Demo" },
            "types": [
                { "key": "Demo.Deck", "assembly": "Demo", "properties": [
                    { "name": "Cards", "type": "Demo.Card[]" },
                    { "name": "Tags", "type": "System.String[]" }
                ]},
                { "key": "Demo.Card", "name": "Card", "namespace": "Demo", "assembly": "Demo" }
            ]
        }));
        let deck = lib.get(lib.lookup("Demo.Deck").unwrap());
        let cards = deck.properties[0].ty;
        let tags = deck.properties[1].ty;

        assert!(lib.get(cards).is_array());
        assert!(!lib.get(cards).is_constructed_generic());
        assert_eq!(lib.get(cards).element_type, lib.lookup("Demo.Card"));
        assert!(lib.is_collection(cards));
        assert!(lib.is_collection(tags));
        assert!(!lib.is_local(cards));
        assert!(!lib.is_collection(lib.lookup("Demo.Card").unwrap()));
    }

    #[test]
    fn test_forward_references_resolve_to_declared_descriptor() {
        let lib = sample();
        let button = lib.lookup("Demo.Button").unwrap();
        let base = lib.get(button).base.unwrap();
        assert_eq!(lib.get(base).name, "View");
        assert_eq!(lib.get(base).assembly, "Demo");
    }

    #[test]
    fn test_exported_types_only_local() {
        let lib = sample();
        let names: Vec<&str> = lib
            .exported_types()
            .map(|id| lib.get(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["Button", "View", "IVisual", "Items"]);
    }

    #[test]
    fn test_assignability_walks_bases_and_interfaces() {
        let lib = sample();
        let button = lib.lookup("Demo.Button").unwrap();
        assert!(lib.is_assignable_to(button, "Demo.Button"));
        assert!(lib.is_assignable_to(button, "Demo.View"));
        assert!(lib.is_assignable_to(button, "Demo.IElement"));
        assert!(!lib.is_assignable_to(button, "Demo.Items"));
    }

    #[test]
    fn test_subclass_is_strict() {
        let lib = sample();
        let button = lib.lookup("Demo.Button").unwrap();
        let view = lib.lookup("Demo.View").unwrap();
        assert!(lib.is_subclass_of(button, view));
        assert!(!lib.is_subclass_of(view, view));
    }

    #[test]
    fn test_collection_through_generic_interface() {
        let lib = sample();
        assert!(lib.is_collection(lib.lookup("Demo.Items").unwrap()));
        assert!(!lib.is_collection(lib.lookup("Demo.Button").unwrap()));

        let list = lib
            .lookup("System.Collections.Generic.IList`1[Demo.View]")
            .unwrap();
        let def = lib.get(list).generic_definition.unwrap();
        assert_eq!(lib.get(def).key, "System.Collections.Generic.IList`1");
        assert!(lib.get(list).is_constructed_generic());
    }

    #[test]
    fn test_constructed_generic_inherits_assembly() {
        let lib = library(json!({
            "assembly": { "name": "Demo" },
            "types": [
                { "key": "Demo.Holder", "assembly": "Demo",
                  "properties": [{ "name": "Items", "type": "Demo.Bag`1[System.String]" }] },
                { "key": "Demo.Bag`1", "name": "Bag`1", "namespace": "Demo", "assembly": "Demo",
                  "is_generic_definition": true }
            ]
        }));
        let holder = lib.get(lib.lookup("Demo.Holder").unwrap());
        let bag = holder.properties[0].ty;
        assert_eq!(lib.assembly_of(bag), "Demo");
        assert!(lib.is_local(bag));
        assert_eq!(lib.get(bag).namespace, "Demo");
    }

    #[test]
    fn test_constructed_generic_inherits_hierarchy() {
        let lib = library(json!({
            "types": [
                { "key": "Demo.Holder",
                  "properties": [{ "name": "Grid", "type": "Demo.Grid`1[System.String]" }] },
                { "key": "Demo.Grid`1", "base": "Demo.View", "interfaces": ["Demo.ILayout"],
                  "is_generic_definition": true },
                { "key": "Demo.View" }
            ]
        }));
        let holder = lib.get(lib.lookup("Demo.Holder").unwrap());
        let grid = holder.properties[0].ty;
        assert!(lib.is_assignable_to(grid, "Demo.View"));
        assert!(lib.is_assignable_to(grid, "Demo.ILayout"));
        assert!(lib.is_subclass_of(grid, lib.lookup("Demo.View").unwrap()));
    }

    #[test]
    fn test_scalar_kinds() {
        let lib = library(json!({
            "types": [{ "key": "Demo.A", "properties": [
                { "name": "B", "type": "System.Boolean" },
                { "name": "C", "type": "System.Char" },
                { "name": "D", "type": "System.Decimal" },
                { "name": "E", "type": "System.DateTime" },
                { "name": "F", "type": "System.Guid" }
            ]}]
        }));
        let a = lib.get(lib.lookup("Demo.A").unwrap());
        let kinds: Vec<Option<ScalarKind>> =
            a.properties.iter().map(|p| lib.scalar_kind(p.ty)).collect();
        assert_eq!(
            kinds,
            vec![
                Some(ScalarKind::Boolean),
                Some(ScalarKind::Text),
                Some(ScalarKind::Number),
                Some(ScalarKind::DateTime),
                None
            ]
        );
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let lib = library(json!({
            "types": [
                { "key": "Demo.A", "name": "First" },
                { "key": "Demo.A", "name": "Second" }
            ]
        }));
        assert_eq!(lib.declared_types().count(), 1);
        assert_eq!(lib.get(lib.lookup("Demo.A").unwrap()).name, "First");
    }

    #[test]
    fn test_base_cycle_terminates() {
        let lib = library(json!({
            "types": [
                { "key": "Demo.A", "base": "Demo.B" },
                { "key": "Demo.B", "base": "Demo.A" }
            ]
        }));
        let a = lib.lookup("Demo.A").unwrap();
        let b = lib.lookup("Demo.B").unwrap();
        assert!(lib.is_subclass_of(a, b));
        assert!(!lib.is_assignable_to(a, "Demo.C"));
    }
}
