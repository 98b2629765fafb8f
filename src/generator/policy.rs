//! @dose
//! purpose: Root-type policy. Decides which reflected types are worth declaring: anything
//!     assignable to one of the framework's root capabilities, or anything that declares a static
//!     attached-property setter.
//!
//! when-editing:
//!     - !is_selectable must stay a pure predicate; the same type always gets the same answer
//!     - !The attached-method shape is exactly two parameters with a bindable first parameter
//!
//! invariants:
//!     - Excluded types (config `exclude` / --exclude) are never selectable
//!
//! gotchas:
//!     - is_root_capability is also used by the emitter to decide attachable markers for
//!       instance properties, not only for selection

use crate::config::{FrameworkConfig, SelectionConfig};
use crate::exclusion::TypeExclusion;
use crate::metadata::{Library, Method, TypeId};

pub struct RootTypePolicy {
    root_types: Vec<String>,
    bindable_object: String,
    exclusion: TypeExclusion,
}

impl RootTypePolicy {
    pub fn new(selection: &SelectionConfig, framework: &FrameworkConfig) -> Self {
        Self {
            root_types: selection.root_types.clone(),
            bindable_object: framework.bindable_object.clone(),
            exclusion: TypeExclusion::new(&selection.exclude),
        }
    }

    pub fn is_selectable(&self, library: &Library, id: TypeId) -> bool {
        if self.exclusion.is_excluded(library.get(id).full_name()) {
            return false;
        }
        self.is_root_capability(library, id) || self.has_attached_method(library, id)
    }

    /// Assignable to any root capability
    pub fn is_root_capability(&self, library: &Library, id: TypeId) -> bool {
        self.root_types
            .iter()
            .any(|root| library.is_assignable_to(id, root))
    }

    /// Static method taking `(bindable, value)`
    pub fn is_attached_method(&self, library: &Library, method: &Method) -> bool {
        method.is_static
            && method.parameters.len() == 2
            && library.is_assignable_to(method.parameters[0], &self.bindable_object)
    }

    pub fn has_attached_method(&self, library: &Library, id: TypeId) -> bool {
        library
            .get(id)
            .methods
            .iter()
            .any(|m| self.is_attached_method(library, m))
    }
}
