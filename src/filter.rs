use crate::config::BindingConfig;
use crate::overrides::{Override, OverrideMap};
use stubkit_mock::ClassDef;

/// Property accessor interceptors. They keep their real implementation when
/// every other method is replaced, so binding can still write through them.
pub const MAGIC_METHODS: [&str; 3] = ["__isset", "__get", "__set"];

/// Splits override keys into method overrides and computes the method sets
/// handed to the proxy generator.
#[derive(Clone, Debug)]
pub struct MethodFilter {
    magic_methods: Vec<String>,
}

impl Default for MethodFilter {
    fn default() -> Self {
        Self::new(MAGIC_METHODS.iter().map(|m| m.to_string()).collect())
    }
}

impl MethodFilter {
    pub fn new(magic_methods: Vec<String>) -> Self {
        Self { magic_methods }
    }

    pub fn from_config(config: &BindingConfig) -> Self {
        Self::new(config.magic_methods.clone())
    }

    pub fn is_magic(&self, method: &str) -> bool {
        self.magic_methods.iter().any(|m| m == method)
    }

    /// Overrides whose key names a method of `class`, in override order.
    pub fn methods_to_replace<'a>(
        &self,
        class: &ClassDef,
        overrides: &'a OverrideMap,
    ) -> Vec<(&'a str, &'a Override)> {
        overrides
            .iter()
            .filter(|(name, _)| class.has_method(name))
            .collect()
    }

    /// Every method of `class` except the magic accessors.
    pub fn all_methods(&self, class: &ClassDef) -> Vec<String> {
        class
            .method_names()
            .into_iter()
            .filter(|m| !self.is_magic(m))
            .collect()
    }

    /// Every method except the magic accessors and `keep`. `None` when
    /// nothing is left to replace, leaving the choice to the generator.
    pub fn all_methods_except(&self, class: &ClassDef, keep: &str) -> Option<Vec<String>> {
        let methods: Vec<String> = self
            .all_methods(class)
            .into_iter()
            .filter(|m| m != keep)
            .collect();
        (!methods.is_empty()).then_some(methods)
    }
}
