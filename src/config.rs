//! @dose
//! purpose: Configuration file parsing for defgen.toml. Carries the widget framework's naming
//!     conventions (module alias, marker types, root capabilities), type exclusion patterns,
//!     import preamble paths, and metadata search paths. Defaults describe Xamarin.Forms.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - !Every field has a default so a missing or partial file still yields a working config
//!     - Type keys here must match the keys used in metadata dumps
//!
//! invariants:
//!     - Config::load returns default config if defgen.toml doesn't exist
//!     - A config that fails to parse is reported on stderr and replaced by defaults
//!
//! gotchas:
//!     - extra_default_namespaces only fold when the processed library is the framework itself
//!     - root_types replaces the default list wholesale; it is not merged

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "defgen.toml";

/// Main configuration structure matching defgen.toml
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub framework: FrameworkConfig,
    pub selection: SelectionConfig,
    pub output: OutputConfig,
    pub metadata: MetadataConfig,
}

/// Conventions of the widget framework the processed libraries build on
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Module alias the generated code imports the framework declarations under
    pub module_alias: String,
    /// Assembly name of the framework itself
    pub assembly: String,
    /// Framework namespaces that resolve into the imported framework module
    pub namespaces: Vec<String>,
    pub bindable_object: String,
    /// Marker type of static bindable-property fields
    pub bindable_property: String,
    pub color: String,
    /// Auto/absolute/proportional length unit
    pub length: String,
    pub type_converter_attribute: String,
    /// Attribute token marking a member as never browsable
    pub hidden_member_attribute: String,
    /// Namespaces folded into the module when processing the framework assembly
    pub extra_default_namespaces: Vec<String>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            module_alias: "XF".to_string(),
            assembly: "Xamarin.Forms.Core".to_string(),
            namespaces: vec![
                "Xamarin.Forms".to_string(),
                "Xamarin.Forms.Shapes".to_string(),
            ],
            bindable_object: "Xamarin.Forms.BindableObject".to_string(),
            bindable_property: "Xamarin.Forms.BindableProperty".to_string(),
            color: "Xamarin.Forms.Color".to_string(),
            length: "Xamarin.Forms.GridLength".to_string(),
            type_converter_attribute: "Xamarin.Forms.TypeConverterAttribute".to_string(),
            hidden_member_attribute: "System.ComponentModel.EditorBrowsableState.Never"
                .to_string(),
            extra_default_namespaces: vec!["Xamarin.Forms.StyleSheets".to_string()],
        }
    }
}

/// Which reflected types are worth declaring
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelectionConfig {
    /// Root capabilities; a type assignable to any of these is selected
    pub root_types: Vec<String>,
    /// Glob patterns over type full names that are never selected
    pub exclude: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let root_types = [
            "Xamarin.Forms.BindingBase",
            "Xamarin.Forms.BindingCondition",
            "Xamarin.Forms.Shapes.Geometry",
            "Xamarin.Forms.RelativeBindingSource",
            "Xamarin.Forms.RelativeBindingSourceMode",
            "Xamarin.Forms.BindableObject",
            "Xamarin.Forms.Element",
            "Xamarin.Forms.ElementTemplate",
            "Xamarin.Forms.Color",
            "Xamarin.Forms.Point",
            "Xamarin.Forms.Rect",
            "Xamarin.Forms.LayoutOptions",
            "Xamarin.Forms.Size",
            "Xamarin.Forms.Style",
            "Xamarin.Forms.StyleSheets.StyleSheet",
            "Xamarin.Forms.Easing",
            "Xamarin.Forms.Effect",
            "Xamarin.Forms.IValueConverter",
        ];
        Self {
            root_types: root_types.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

/// Module paths used in the generated import preamble
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub xnode_module: String,
    pub bind_module: String,
    pub colors_module: String,
    /// Path the framework declarations are imported from
    pub framework_import: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            xnode_module: "@web-atoms/core/dist/core/XNode".to_string(),
            bind_module: "@web-atoms/core/dist/core/Bind".to_string(),
            colors_module: "@web-atoms/core/dist/core/Colors".to_string(),
            framework_import: "./XF".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MetadataConfig {
    /// Directories searched for `<library>.json` when the locator is not a file
    pub search_paths: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from defgen.toml in the given directory
    pub fn load(root: &Path) -> Self {
        Self::load_file(&root.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from an explicit file
    pub fn load_file(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse {}: {}",
                        config_path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }
}
