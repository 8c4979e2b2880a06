//! Gemini API key pool
//!
//! The pool is loaded once at startup from `GEMINI_API_KEYS` (comma-delimited,
//! preferred) or the legacy single-value `GEMINI_API_KEY`, then passed into
//! the orchestrator explicitly. Keys are interchangeable; their order in the
//! configuration is their rank. Duplicates are kept as-is.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct ApiKeyPool {
    keys: Vec<String>,
}

impl ApiKeyPool {
    /// Build a pool from raw configuration values.
    ///
    /// The plural value wins when present and non-blank: it is split on `,`,
    /// each entry trimmed, empty entries dropped, order preserved. Otherwise
    /// the legacy single value is wrapped as a one-element list. Absence of
    /// both yields an empty pool, never an error.
    pub fn from_values(plural: Option<&str>, single: Option<&str>) -> Self {
        if let Some(list) = plural {
            if !list.trim().is_empty() {
                let keys = list
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
                return Self { keys };
            }
        }

        let keys = single
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| vec![k])
            .unwrap_or_default();

        Self { keys }
    }

    pub fn from_env() -> Self {
        let plural = env::var("GEMINI_API_KEYS").ok();
        let single = env::var("GEMINI_API_KEY").ok();
        Self::from_values(plural.as_deref(), single.as_deref())
    }

    /// All keys in configuration order.
    pub fn all_keys(&self) -> &[String] {
        &self.keys
    }

    /// Head of `all_keys()`.
    pub fn first_key(&self) -> Option<&str> {
        self.keys.first().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_list_with_whitespace_and_empties() {
        let pool = ApiKeyPool::from_values(Some("a, b ,,c"), None);
        assert_eq!(pool.all_keys(), &["a", "b", "c"]);
        assert_eq!(pool.first_key(), Some("a"));
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let pool = ApiKeyPool::from_values(Some("a,b,a"), None);
        assert_eq!(pool.all_keys(), &["a", "b", "a"]);
    }

    #[test]
    fn plural_takes_priority_over_legacy() {
        let pool = ApiKeyPool::from_values(Some("x,y"), Some("legacy"));
        assert_eq!(pool.all_keys(), &["x", "y"]);
    }

    #[test]
    fn falls_back_to_legacy_single_key() {
        let pool = ApiKeyPool::from_values(None, Some("  solo  "));
        assert_eq!(pool.all_keys(), &["solo"]);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn blank_plural_falls_back_to_legacy() {
        let pool = ApiKeyPool::from_values(Some("   "), Some("solo"));
        assert_eq!(pool.all_keys(), &["solo"]);
    }

    #[test]
    fn absent_everything_yields_empty_pool() {
        let pool = ApiKeyPool::from_values(None, None);
        assert!(pool.is_empty());
        assert_eq!(pool.first_key(), None);
    }
}
