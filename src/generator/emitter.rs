//! @dose
//! purpose: Declaration emitter. Walks a finished namespace tree and writes the declaration file:
//!     import preamble, one declared class per selected type, the default export, and one lazy
//!     property bag per non-empty namespace node wiring names to runtime bridge lookups.
//!
//! when-editing:
//!     - !Member order is fixed: static properties, attached methods, static fields, instance
//!       properties
//!     - !Attachable markers are deduplicated per class; the first claimant of a name wins
//!     - Member types always come from ResolveContext; never spell a type here directly
//!
//! invariants:
//!     - Output depends only on the tree and the library, so identical input gives identical text
//!     - No class declares two attachable markers with the same name
//!
//! gotchas:
//!     - Attached method names drop a three-character accessor prefix ("Set") before camel-casing
//!     - Collection properties are typed `any` and always try to claim an attachable marker

use crate::formatter::{class_name, quote, to_camel_case, IndentedWriter};
use crate::generator::namespace_tree::{NamespaceNode, ROOT_PLACEHOLDER};
use crate::generator::policy::RootTypePolicy;
use crate::generator::resolver::ResolveContext;
use crate::generator::GenerationRun;
use crate::metadata::{Property, TypeId};
use std::collections::HashSet;

const ATTACHED_PREFIX_LEN: usize = 3;
const BINDABLE_FIELD_SUFFIX: &str = "Property";
const OBJECT_KEY: &str = "System.Object";

const BRIDGE_FACTORY: &str = r#"function create(name: string, typeName: string) {
    return {
        configurable: true,
        enumerable: true,
        get() {
            const t = bridge.getClass(`${typeName}, ${assemblyName}`);
            Object.defineProperty(this, name, {
                configurable: true,
                enumerable: true,
                writable: true,
                value: t
            });
            return t;
        }
    };
}"#;

/// Member name derived from an attached setter (`SetRow` -> `row`)
pub fn attached_method_name(method_name: &str) -> Option<String> {
    let stripped: String = method_name.chars().skip(ATTACHED_PREFIX_LEN).collect();
    if stripped.is_empty() {
        None
    } else {
        Some(to_camel_case(&stripped))
    }
}

/// Member name derived from a bindable-property field (`TitleProperty` -> `title`)
pub fn bindable_field_name(field_name: &str) -> String {
    let name = to_camel_case(field_name);
    match name.strip_suffix(BINDABLE_FIELD_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name,
    }
}

pub struct DeclarationEmitter<'r> {
    run: &'r GenerationRun<'r>,
    resolver: ResolveContext<'r>,
    writer: IndentedWriter,
}

impl<'r> DeclarationEmitter<'r> {
    pub fn new(run: &'r GenerationRun<'r>) -> Self {
        Self {
            run,
            resolver: run.resolver(),
            writer: IndentedWriter::new(),
        }
    }

    pub fn emit(mut self) -> String {
        self.write_imports();

        let run = self.run;
        for root in run.tree.roots() {
            self.write_namespace(root, true);
        }

        if run.tree.find(&run.module_name).is_some() {
            self.writer.blank();
            self.writer.line(format!("export default {};", run.module_name));
        }

        for node in run.tree.nodes() {
            self.write_property_bag(node);
        }

        self.writer.blank();
        self.writer.finish()
    }

    fn write_imports(&mut self) {
        let run = self.run;
        let output = &run.config.output;
        let framework = &run.config.framework;

        self.writer.line("//tslint:disable");
        self.writer.line(format!(
            "import XNode, {{ RootObject, NodeFactory, AttachedNode }} from {};",
            quote(&output.xnode_module)
        ));
        self.writer
            .line(format!("import Bind from {};", quote(&output.bind_module)));
        self.writer.line(format!(
            "import {{ ColorItem }} from {};",
            quote(&output.colors_module)
        ));
        self.writer.blank();

        if run.library.assembly_name() != framework.assembly {
            self.writer.line(format!(
                "import * as {} from {};",
                framework.module_alias,
                quote(&output.framework_import)
            ));
        }

        self.writer.line("declare var bridge: any;");
        self.writer.line(format!(
            "const assemblyName = `{}`;",
            run.library.assembly_full_name().replace('`', "\\`")
        ));
        self.writer.block(BRIDGE_FACTORY);
        self.writer.blank();
    }

    fn write_namespace(&mut self, node: &'r NamespaceNode, top_level: bool) {
        let is_module = top_level && node.full_name == self.run.module_name;
        if is_module {
            self.writer.line(format!("namespace {} {{", node.name));
        } else {
            self.writer.line(format!("export namespace {} {{", node.name));
        }
        self.writer.indent();

        for &id in &node.types {
            self.write_type(id, node);
        }

        for child in node.children.values() {
            self.write_namespace(child, false);
        }

        self.writer.outdent();
        self.writer.line("}");
    }

    fn write_type(&mut self, id: TypeId, node: &NamespaceNode) {
        let run = self.run;
        let library = run.library;
        let policy = &run.policy;
        let framework = &run.config.framework;
        let ty = library.get(id);
        let name = class_name(ty);

        let base = ty
            .base
            .filter(|&b| library.get(b).key != OBJECT_KEY)
            .map(|b| self.resolver.resolve(b, &node.full_name, true))
            .unwrap_or_else(|| ROOT_PLACEHOLDER.to_string());
        self.writer
            .line(format!("export declare class {} extends {} {{", name, base));
        self.writer.indent();

        for p in ty.properties.iter().filter(|p| p.is_static) {
            let expr = self.resolver.resolve(p.ty, &node.full_name, true);
            self.writer
                .line(format!("public static {}: {};", to_camel_case(&p.name), expr));
        }

        let mut attached = AttachedMembers::default();

        for m in &ty.methods {
            if !policy.is_attached_method(library, m) {
                continue;
            }
            if let Some(member) = attached_method_name(&m.name) {
                self.write_attached(&mut attached, member);
            }
        }

        for f in ty.fields.iter().filter(|f| f.is_static) {
            if library.get(f.ty).key == framework.bindable_property {
                self.write_attached(&mut attached, bindable_field_name(&f.name));
            } else {
                let expr = self.resolver.resolve(f.ty, &node.full_name, true);
                self.writer
                    .line(format!("public static {}: {};", to_camel_case(&f.name), expr));
            }
        }

        for p in ty.properties.iter().filter(|p| !p.is_static) {
            if p.attributes.contains(&framework.hidden_member_attribute) {
                continue;
            }
            self.write_instance_property(p, node, policy, &mut attached);
        }

        self.writer.outdent();
        self.writer.line("}");
    }

    fn write_instance_property(
        &mut self,
        p: &Property,
        node: &NamespaceNode,
        policy: &RootTypePolicy,
        attached: &mut AttachedMembers,
    ) {
        let library = self.run.library;
        let name = to_camel_case(&p.name);

        self.writer.line("/**");
        self.writer
            .line(format!("* {}", library.get(p.ty).full_name().replace("*/", "*\\/")));
        self.writer.line("*/");

        if library.is_collection(p.ty) {
            self.writer.line(format!("public {}: any;", name));
            self.write_attached(attached, name);
            return;
        }

        let expr = self.resolver.resolve(p.ty, &node.full_name, false);
        self.writer.line(format!("public {}: {} | Bind;", name, expr));

        if policy.is_root_capability(library, p.ty) {
            self.write_attached(attached, name);
        }
    }

    fn write_attached(&mut self, attached: &mut AttachedMembers, name: String) {
        if attached.claim(&name) {
            self.writer
                .line(format!("public static {}: AttachedNode;", name));
        }
    }

    fn write_property_bag(&mut self, node: &NamespaceNode) {
        if node.types.is_empty() {
            return;
        }
        let library = self.run.library;

        self.writer.line(format!(
            "Object.defineProperties({} as any, {{",
            node.full_name
        ));
        self.writer.indent();
        for &id in &node.types {
            let ty = library.get(id);
            self.writer.line(format!(
                "{}: create({}, {}),",
                class_name(ty),
                quote(&class_name(ty)),
                quote(ty.full_name())
            ));
        }
        self.writer.outdent();
        self.writer.line("});");
    }
}

/// Attachable member names already emitted for one class
#[derive(Debug, Default)]
pub struct AttachedMembers {
    names: HashSet<String>,
}

impl AttachedMembers {
    /// Record `name`; false when an earlier member already claimed it
    pub fn claim(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }
}
