//! @dose
//! purpose: Type exclusion by glob pattern over full type names, fed from the `exclude` list in
//!     defgen.toml and repeated --exclude flags.
//!
//! when-editing:
//!     - !Patterns are matched against the type key (e.g., "Xamarin.Forms.Internals.Foo")
//!     - Invalid patterns are reported on stderr and skipped, never fatal
//!
//! gotchas:
//!     - Dots carry no special meaning to globset; `*` spans across them

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled exclusion patterns
#[derive(Debug, Clone, Default)]
pub struct TypeExclusion {
    globset: Option<GlobSet>,
}

impl TypeExclusion {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            globset: build_exclude_globset(patterns),
        }
    }

    pub fn is_excluded(&self, full_name: &str) -> bool {
        self.globset
            .as_ref()
            .map(|set| set.is_match(full_name))
            .unwrap_or(false)
    }
}

/// Build a GlobSet from patterns
fn build_exclude_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                eprintln!("Warning: invalid exclude pattern '{}': {}", pattern, e);
            }
        }
    }

    builder.build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_patterns_excludes_nothing() {
        let exclusion = TypeExclusion::new(&[]);
        assert!(!exclusion.is_excluded("Xamarin.Forms.Label"));
    }

    #[test]
    fn test_patterns_match_full_names() {
        let exclusion = TypeExclusion::new(&[
            "Xamarin.Forms.Internals.*".to_string(),
            "*Renderer".to_string(),
        ]);
        assert!(exclusion.is_excluded("Xamarin.Forms.Internals.NavigationProxy"));
        assert!(exclusion.is_excluded("Demo.Controls.FancyRenderer"));
        assert!(!exclusion.is_excluded("Xamarin.Forms.Label"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let exclusion = TypeExclusion::new(&["[".to_string(), "Demo.*".to_string()]);
        assert!(exclusion.is_excluded("Demo.Widget"));
    }
}
