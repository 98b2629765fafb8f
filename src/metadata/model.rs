//! @dose
//! purpose: Serialized shape of a reflected library as it appears in a metadata dump. These are
//!     the raw serde structs; `Library` interns them into an arena with resolved type ids.
//!
//! when-editing:
//!     - !Every type reference inside a member is a type key string, never a nested descriptor
//!     - All collections default to empty so sparse dumps stay valid
//!
//! gotchas:
//!     - `exported` defaults to true; referenced types from other assemblies should set it false
//!       or carry a different `assembly`, either keeps them out of selection

use serde::{Deserialize, Serialize};

/// Top-level metadata dump for one library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryDump {
    pub assembly: AssemblyInfo,
    /// Assembly-level XML namespace definition annotations
    pub xmlns_definitions: Vec<XmlnsDefinition>,
    /// Type descriptors in enumeration order
    pub types: Vec<TypeDump>,
}

/// Identity of the library being reflected
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyInfo {
    /// Simple assembly name (e.g., "Xamarin.Forms.Core")
    pub name: String,
    /// Full identity used for bridge lookups (e.g., "Xamarin.Forms.Core, Version=2.5.0.0, ...")
    pub full_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlnsDefinition {
    pub xml_namespace: String,
    pub clr_namespace: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
}

/// One reflected type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDump {
    /// Unique full name; generic instantiations are written `Ns.Name`1[Arg]`
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub assembly: Option<String>,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default = "default_exported")]
    pub exported: bool,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub generic_definition: Option<String>,
    #[serde(default)]
    pub is_generic_definition: bool,
    #[serde(default)]
    pub enum_values: Vec<String>,
    /// Full names of attributes applied to the type
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDump>,
    #[serde(default)]
    pub fields: Vec<FieldDump>,
    #[serde(default)]
    pub methods: Vec<MethodDump>,
}

fn default_exported() -> bool {
    true
}

/// Public property declared directly on a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDump {
    pub name: String,
    #[serde(rename = "type")]
    pub type_key: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Full names of attributes applied to the property
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Public field declared directly on a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDump {
    pub name: String,
    #[serde(rename = "type")]
    pub type_key: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

/// Public method declared directly on a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDump {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Parameter type keys in declaration order
    #[serde(default)]
    pub parameters: Vec<String>,
}
