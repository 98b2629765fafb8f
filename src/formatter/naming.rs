//! Identifier helpers shared by the resolver and the emitter.

use crate::metadata::ReflectedType;

/// Suffix that stands in for generic arity in declared class names
pub const GENERIC_SUFFIX: &str = "$Generic";

/// Lower-case the first character, leaving the rest untouched
pub fn to_camel_case(value: &str) -> String {
    if value.trim().is_empty() {
        return value.to_string();
    }
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Declared class name: generic types drop their arity marker and gain `$Generic`,
/// so every instantiation of one open generic maps to the same symbol
pub fn class_name(ty: &ReflectedType) -> String {
    if ty.is_generic() {
        let stem = ty.name.split('`').next().unwrap_or(&ty.name);
        format!("{}{}", stem, GENERIC_SUFFIX)
    } else {
        ty.name.clone()
    }
}

/// Quote a value as a string literal of the declaration language
pub fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
