//! Resolver configuration.
//!
//! Settings can be given explicitly through [`ResolverConfigBuilder`] or read
//! from the environment:
//! - `CIREF_MAX_NESTING` - Maximum number of nested reference targets
//! - `CIREF_STRICT` - Re-check the output for leftover markers (`true`/`false`)

use tracing::warn;

/// Nested `!reference` chains are capped at ten levels.
pub const DEFAULT_MAX_NESTING: usize = 10;

const MAX_NESTING_VAR: &str = "CIREF_MAX_NESTING";
const STRICT_VAR: &str = "CIREF_STRICT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// How many reference targets may be in progress at once.
    pub max_nesting: usize,
    /// Verify that the resolved document holds no markers before returning it.
    pub strict: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_nesting: DEFAULT_MAX_NESTING,
            strict: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whatever the process environment sets.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.populate_from(|name| std::env::var(name).ok());
        config
    }

    fn populate_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(MAX_NESTING_VAR) {
            match raw.trim().parse() {
                Ok(limit) => self.max_nesting = limit,
                Err(_) => warn!(var = MAX_NESTING_VAR, value = %raw, "Ignoring invalid nesting limit"),
            }
        }

        if let Some(raw) = lookup(STRICT_VAR) {
            match parse_flag(&raw) {
                Some(strict) => self.strict = strict,
                None => warn!(var = STRICT_VAR, value = %raw, "Ignoring invalid flag"),
            }
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for creating ResolverConfig.
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::new(),
        }
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.config.max_nesting = max_nesting;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

impl Default for ResolverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ResolverConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = ResolverConfig::default();
        config.populate_from(|name| vars.get(name).cloned());
        config
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_nesting, 10);
        assert!(config.strict);
    }

    #[test]
    fn test_builder() {
        let config = ResolverConfigBuilder::new()
            .with_max_nesting(3)
            .with_strict(false)
            .build();
        assert_eq!(config.max_nesting, 3);
        assert!(!config.strict);
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[("CIREF_MAX_NESTING", " 25 "), ("CIREF_STRICT", "off")]);
        assert_eq!(config.max_nesting, 25);
        assert!(!config.strict);
    }

    #[test]
    fn test_invalid_env_values_fall_back() {
        let config = config_from(&[("CIREF_MAX_NESTING", "lots"), ("CIREF_STRICT", "maybe")]);
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_missing_env_keeps_defaults() {
        assert_eq!(config_from(&[]), ResolverConfig::default());
    }
}
