//! Infix operator normalization.
//!
//! The parser does not know what `+` means; it only rewrites the spelling to
//! the canonical builtin name (`plus`) when building operator expressions.
//! The mapping lives outside the core — [`InfixOperators`] is built from an
//! iterable of `(spelling, canonical name)` pairs, and
//! [`InfixOperators::default`] ships the standard table so the crate works
//! out of the box.
//!
//! Spellings with no entry normalize to themselves.

use std::collections::HashMap;

/// The standard spelling table.
const DEFAULT_TABLE: &[(&str, &str)] = &[
    ("=", "eq"),
    ("!=", "neq"),
    ("<=", "lte"),
    (">=", "gte"),
    ("<", "lt"),
    (">", "gt"),
    ("+", "plus"),
    ("-", "minus"),
    ("*", "mul"),
    ("/", "div"),
    ("&", "and"),
    ("|", "or"),
];

/// Read-only registry mapping infix spellings to canonical builtin names.
#[derive(Debug, Clone)]
pub struct InfixOperators {
    table: HashMap<String, String>,
}

impl InfixOperators {
    /// Builds a registry from `(spelling, canonical name)` pairs. Later
    /// pairs override earlier ones.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let table = pairs
            .into_iter()
            .map(|(spelling, name)| (spelling.into(), name.into()))
            .collect();
        InfixOperators { table }
    }

    /// An empty registry: every spelling normalizes to itself.
    pub fn empty() -> Self {
        InfixOperators { table: HashMap::new() }
    }

    /// The canonical name for `spelling`, if one is registered.
    pub fn canonical(&self, spelling: &str) -> Option<&str> {
        self.table.get(spelling).map(String::as_str)
    }
}

impl Default for InfixOperators {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_TABLE.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_maps_arithmetic() {
        let ops = InfixOperators::default();
        assert_eq!(ops.canonical("+"), Some("plus"));
        assert_eq!(ops.canonical("-"), Some("minus"));
        assert_eq!(ops.canonical("&"), Some("and"));
    }

    #[test]
    fn default_table_maps_comparisons() {
        let ops = InfixOperators::default();
        assert_eq!(ops.canonical("="), Some("eq"));
        assert_eq!(ops.canonical("<="), Some("lte"));
        assert_eq!(ops.canonical(">"), Some("gt"));
    }

    #[test]
    fn unknown_spelling_has_no_canonical_name() {
        let ops = InfixOperators::default();
        assert_eq!(ops.canonical("**"), None);
    }

    #[test]
    fn custom_pairs_override_defaults() {
        let ops = InfixOperators::from_pairs([("+", "concat")]);
        assert_eq!(ops.canonical("+"), Some("concat"));
        assert_eq!(ops.canonical("-"), None);
    }

    #[test]
    fn empty_registry_maps_nothing() {
        assert_eq!(InfixOperators::empty().canonical("+"), None);
    }
}
