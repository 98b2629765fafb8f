//! @dose
//! purpose: Type name resolver. Maps a reflected type, in the context of the namespace node
//!     being emitted, to a declaration-language type expression. Resolution is an ordered list of
//!     named rules; the first rule that answers wins and the last one always answers.
//!
//! when-editing:
//!     - !Rule order is the contract: enum, scalar, color, length, type-converter, registered,
//!       local placeholder, framework import, then the fallback
//!     - !Rules are pure functions of (context, request); none may panic or mutate
//!     - Bare usage (base classes, static members) never gets `| null` loosening
//!
//! invariants:
//!     - resolve() is total: the fallback annotates unknown types instead of failing
//!     - All instantiations of one open generic resolve to the same declared name
//!     - The context node only chooses bare versus module-qualified spelling
//!
//! gotchas:
//!     - Length and type-converter rules only apply to loose (instance) usage; a base class
//!       cannot be a literal union
//!     - "Local" means declared by the library being processed, compared by assembly name
//!     - Only local types folded into the module are referenced by name; other local types
//!       become the root placeholder

use crate::config::FrameworkConfig;
use crate::formatter::{class_name, quote};
use crate::generator::namespace_tree::{folds_into_module, NameRegistry, ROOT_PLACEHOLDER};
use crate::metadata::{Library, ScalarKind, TypeId};
use indexmap::IndexSet;

/// Literal helper type accepted wherever a color is
const COLOR_LITERAL: &str = "ColorItem";

/// Everything a rule may consult; owned by one generation run
pub struct ResolveContext<'a> {
    pub library: &'a Library,
    pub registry: &'a NameRegistry,
    pub default_namespaces: &'a IndexSet<String>,
    pub framework: &'a FrameworkConfig,
    pub module_name: &'a str,
}

/// One resolution question
#[derive(Debug, Clone, Copy)]
pub struct TypeRequest<'n> {
    pub ty: TypeId,
    /// Full name of the namespace node being emitted
    pub node: &'n str,
    /// Base class / static member usage: no loosening
    pub as_bare_type: bool,
}

pub type Rule = fn(&ResolveContext<'_>, &TypeRequest<'_>) -> Option<String>;

/// Resolution rules in priority order
pub const RULES: &[(&str, Rule)] = &[
    ("enum", enum_literals),
    ("scalar", scalar_keyword),
    ("color", framework_color),
    ("length", length_metric),
    ("type-converter", type_converter),
    ("registered", registered_name),
    ("local-placeholder", local_placeholder),
    ("framework-import", framework_import),
];

pub const FALLBACK_RULE: &str = "fallback";

impl<'a> ResolveContext<'a> {
    pub fn resolve(&self, ty: TypeId, node: &str, as_bare_type: bool) -> String {
        self.resolve_traced(ty, node, as_bare_type).1
    }

    /// Resolve and report which rule answered
    pub fn resolve_traced(
        &self,
        ty: TypeId,
        node: &str,
        as_bare_type: bool,
    ) -> (&'static str, String) {
        let request = TypeRequest {
            ty,
            node,
            as_bare_type,
        };
        RULES
            .iter()
            .find_map(|(name, rule)| rule(self, &request).map(|expr| (*name, expr)))
            .unwrap_or_else(|| (FALLBACK_RULE, fallback(self, &request)))
    }

    fn loosen(&self, expr: String, request: &TypeRequest<'_>) -> String {
        if request.as_bare_type {
            expr
        } else {
            format!("{} | null", expr)
        }
    }

    /// Registered name of a local type declared in the module node. Constructed generics use
    /// their definition's entry.
    fn module_member(&self, ty: TypeId) -> Option<&'a str> {
        let library = self.library;
        let registry: &'a NameRegistry = self.registry;
        let reflected = library.get(ty);
        let in_module = folds_into_module(&reflected.namespace, self.default_namespaces);
        if !library.is_local(ty) || !in_module {
            return None;
        }
        registry.get(ty).or_else(|| {
            reflected
                .generic_definition
                .and_then(|definition| registry.get(definition))
        })
    }

    /// `<module>.<Name>` for local module members, `<alias>.default.<Name>` for imported types
    fn qualified(&self, ty: TypeId) -> String {
        if !self.library.is_local(ty) {
            let name = class_name(self.library.get(ty));
            return format!("{}.default.{}", self.framework.module_alias, name);
        }
        match self.module_member(ty) {
            Some(name) => format!("{}.{}", self.module_name, name),
            None => ROOT_PLACEHOLDER.to_string(),
        }
    }
}

fn enum_literals(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    let ty = ctx.library.get(request.ty);
    if !ty.is_enum() {
        return None;
    }
    if ty.enum_values.is_empty() {
        return Some("never".to_string());
    }
    let literals: Vec<String> = ty.enum_values.iter().map(|v| quote(v)).collect();
    Some(literals.join(" | "))
}

fn scalar_keyword(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    let keyword = match ctx.library.scalar_kind(request.ty)? {
        ScalarKind::Boolean => "boolean",
        ScalarKind::Text => "string",
        ScalarKind::Number => "number",
        ScalarKind::DateTime => "Date",
    };
    Some(ctx.loosen(keyword.to_string(), request))
}

fn framework_color(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    if ctx.library.get(request.ty).key != ctx.framework.color {
        return None;
    }
    let alias = ctx.qualified(request.ty);
    if request.as_bare_type {
        return Some(alias);
    }
    Some(format!("{} | {} | string | null", alias, COLOR_LITERAL))
}

fn length_metric(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    if request.as_bare_type || ctx.library.get(request.ty).key != ctx.framework.length {
        return None;
    }
    Some("\"Auto\" | number | string".to_string())
}

fn type_converter(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    let library = ctx.library;
    let ty = library.get(request.ty);
    if request.as_bare_type || !ty.has_attribute(&ctx.framework.type_converter_attribute) {
        return None;
    }

    // Public static fields, inherited ones included, holding instances of the type
    let mut names: IndexSet<String> = IndexSet::new();
    let mut current = Some(request.ty);
    let mut visited = IndexSet::new();
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let declaring = library.get(id);
        for field in declaring.fields.iter().filter(|f| f.is_static) {
            if field.ty == request.ty || library.is_subclass_of(field.ty, request.ty) {
                names.insert(quote(&field.name));
            }
        }
        current = declaring.base;
    }

    if names.is_empty() {
        return Some(format!("/*{}*/ any", ty.name));
    }
    let mut parts: Vec<String> = names.into_iter().collect();
    parts.push(ctx.qualified(request.ty));
    Some(parts.join(" | "))
}

fn registered_name(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    let registered = ctx.module_member(request.ty)?;
    if request.node == ctx.module_name {
        Some(registered.to_string())
    } else {
        Some(format!("{}.{}", ctx.module_name, registered))
    }
}

fn local_placeholder(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    ctx.library
        .is_local(request.ty)
        .then(|| ROOT_PLACEHOLDER.to_string())
}

fn framework_import(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> Option<String> {
    let ty = ctx.library.get(request.ty);
    if ctx.library.is_local(request.ty) || !ctx.framework.namespaces.contains(&ty.namespace) {
        return None;
    }
    Some(format!(
        "{}.default.{}",
        ctx.framework.module_alias,
        class_name(ty)
    ))
}

fn fallback(ctx: &ResolveContext<'_>, request: &TypeRequest<'_>) -> String {
    let full_name = ctx.library.get(request.ty).full_name().replace("*/", "*\\/");
    format!("{} /*{}*/", ROOT_PLACEHOLDER, full_name)
}
