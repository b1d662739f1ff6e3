//! Engine configuration.
//!
//! `EngineConfig` carries the operational knobs of the equipment engine: which
//! wealth rules apply, whether wealth rolls are announced, how the category
//! index is chunked and where content-source settings live.
//!
//! Values come from the environment (see [`EngineConfig::from_env`]); the
//! binary loads `.env` files first so local overrides work the usual way.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

// ============================================================================
// Ruleset
// ============================================================================

/// Which starting-wealth rules apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// Fixed wealth amounts; formulas use their average.
    Modern,
    /// Wealth formulas must be rolled.
    Legacy,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

impl Ruleset {
    pub fn requires_roll(&self) -> bool {
        matches!(self, Ruleset::Legacy)
    }
}

fn default_ruleset() -> Ruleset {
    Ruleset::Modern
}

impl std::fmt::Display for Ruleset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ruleset::Modern => write!(f, "modern"),
            Ruleset::Legacy => write!(f, "legacy"),
            Ruleset::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for Ruleset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" | "2024" => Ok(Ruleset::Modern),
            "legacy" | "2014" => Ok(Ruleset::Legacy),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Engine Config
// ============================================================================

pub const DEFAULT_SETTINGS_NAMESPACE: &str = "outfitter";

fn default_publish_wealth_rolls() -> bool {
    false
}

fn default_index_batch_size() -> usize {
    100
}

fn default_settings_namespace() -> String {
    DEFAULT_SETTINGS_NAMESPACE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_ruleset")]
    pub ruleset: Ruleset,

    /// Announce legacy wealth rolls in chat
    #[serde(default = "default_publish_wealth_rolls")]
    pub publish_wealth_rolls: bool,

    /// Items processed between cooperative yields while indexing
    #[serde(default = "default_index_batch_size")]
    pub index_batch_size: usize,

    #[serde(default = "default_settings_namespace")]
    pub settings_namespace: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ruleset: default_ruleset(),
            publish_wealth_rolls: default_publish_wealth_rolls(),
            index_batch_size: default_index_batch_size(),
            settings_namespace: default_settings_namespace(),
        }
    }
}

impl EngineConfig {
    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    pub fn with_publish_wealth_rolls(mut self, publish: bool) -> Self {
        self.publish_wealth_rolls = publish;
        self
    }

    pub fn with_index_batch_size(mut self, batch_size: usize) -> Self {
        self.index_batch_size = batch_size.max(1);
        self
    }

    /// Read `OUTFITTER_*` variables, keeping defaults for unset ones.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("OUTFITTER_RULESET") {
            config.ruleset = raw.parse().map_err(|_| {
                EngineError::config("OUTFITTER_RULESET", format!("unknown ruleset '{}'", raw))
            })?;
        }

        if let Some(raw) = lookup("OUTFITTER_PUBLISH_WEALTH_ROLLS") {
            config.publish_wealth_rolls = parse_flag(&raw).ok_or_else(|| {
                EngineError::config(
                    "OUTFITTER_PUBLISH_WEALTH_ROLLS",
                    format!("expected a boolean, got '{}'", raw),
                )
            })?;
        }

        if let Some(raw) = lookup("OUTFITTER_INDEX_BATCH_SIZE") {
            let batch_size: usize = raw.trim().parse().map_err(|_| {
                EngineError::config(
                    "OUTFITTER_INDEX_BATCH_SIZE",
                    format!("expected a positive integer, got '{}'", raw),
                )
            })?;
            if batch_size == 0 {
                return Err(EngineError::config(
                    "OUTFITTER_INDEX_BATCH_SIZE",
                    "batch size must be at least 1",
                ));
            }
            config.index_batch_size = batch_size;
        }

        if let Some(raw) = lookup("OUTFITTER_SETTINGS_NAMESPACE") {
            let namespace = raw.trim();
            if !namespace.is_empty() {
                config.settings_namespace = namespace.to_string();
            }
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.ruleset, Ruleset::Modern);
        assert_eq!(config.index_batch_size, 100);
        assert_eq!(config.settings_namespace, "outfitter");
        assert!(!config.publish_wealth_rolls);
    }

    #[test]
    fn reads_every_variable() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("OUTFITTER_RULESET", "legacy"),
            ("OUTFITTER_PUBLISH_WEALTH_ROLLS", "yes"),
            ("OUTFITTER_INDEX_BATCH_SIZE", "25"),
            ("OUTFITTER_SETTINGS_NAMESPACE", "wizard"),
        ]))
        .unwrap();
        assert_eq!(config.ruleset, Ruleset::Legacy);
        assert!(config.publish_wealth_rolls);
        assert_eq!(config.index_batch_size, 25);
        assert_eq!(config.settings_namespace, "wizard");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EngineConfig::from_lookup(lookup(&[("OUTFITTER_RULESET", "3.5e")])).is_err());
        assert!(
            EngineConfig::from_lookup(lookup(&[("OUTFITTER_INDEX_BATCH_SIZE", "0")])).is_err()
        );
        assert!(
            EngineConfig::from_lookup(lookup(&[("OUTFITTER_PUBLISH_WEALTH_ROLLS", "maybe")]))
                .is_err()
        );
    }

    #[test]
    fn unknown_ruleset_deserializes_to_fallback() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"ruleset":"homebrew"}"#).unwrap();
        assert_eq!(config.ruleset, Ruleset::Unknown);
        assert!(!config.ruleset.requires_roll());
        assert_eq!(config.index_batch_size, 100);
    }

    #[test]
    fn ruleset_display_round_trips_through_from_str() {
        for ruleset in [Ruleset::Modern, Ruleset::Legacy] {
            assert_eq!(ruleset.to_string().parse::<Ruleset>(), Ok(ruleset));
        }
    }
}
