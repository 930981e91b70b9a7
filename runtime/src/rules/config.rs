//! Condition-chain rule configuration.
//!
//! The document maps item ids to chain rules:
//!
//! ```json
//! { "version": 1,
//!   "items": { "N5_1_input_validation": {
//!       "base_score": 3.0,
//!       "conditions": [ { "field": "forms.validation_exists", "operator": "==", "value": true, "adjustment": 2.0 } ],
//!       "default_adjustment": -1.0 } } }
//! ```
//!
//! Entries that fail to parse are skipped with a warning so scoring falls
//! back to the taxonomy's declared rule for that item.

use crate::rules::chain::ChainRule;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{info, warn};

/// Highest config document version this build understands.
pub const SUPPORTED_VERSION: u32 = 1;

const BUILTIN_NIELSEN: &str = include_str!("nielsen.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading rule config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing rule config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported rule config version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    items: serde_json::Map<String, serde_json::Value>,
}

fn default_version() -> u32 {
    SUPPORTED_VERSION
}

/// Parsed chain rules keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub version: u32,
    items: HashMap<String, ChainRule>,
    /// Item ids whose entries were malformed and ignored.
    pub rejected: Vec<String>,
}

impl RuleConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        if raw.version > SUPPORTED_VERSION {
            return Err(ConfigError::UnsupportedVersion(raw.version));
        }

        let mut items = HashMap::new();
        let mut rejected = Vec::new();
        for (id, entry) in raw.items {
            match serde_json::from_value::<ChainRule>(entry) {
                Ok(rule) => {
                    items.insert(id, rule);
                }
                Err(e) => {
                    warn!(item = %id, "ignoring malformed rule entry: {e}");
                    rejected.push(id);
                }
            }
        }
        rejected.sort();

        Ok(Self {
            version: raw.version,
            items,
            rejected,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Chain rules equivalent to the built-in Nielsen heuristics.
    pub fn builtin_nielsen() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_NIELSEN)
    }

    pub fn get(&self, item_id: &str) -> Option<&ChainRule> {
        self.items.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids in sorted order.
    pub fn item_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.items.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// File-backed rule config that can be reloaded while in use.
///
/// Readers take a cheap `Arc` snapshot; a reload swaps the snapshot
/// atomically. A failed reload keeps the previous snapshot.
pub struct RuleStore {
    path: PathBuf,
    current: RwLock<Arc<RuleConfig>>,
}

impl RuleStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = RuleConfig::load(&path)?;
        info!(path = %path.display(), items = config.len(), "loaded rule config");
        Ok(Self {
            path,
            current: RwLock::new(Arc::new(config)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<RuleConfig> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Re-read the file. On error the previous config stays active.
    pub fn reload(&self) -> Result<Arc<RuleConfig>, ConfigError> {
        let config = match RuleConfig::load(&self.path) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!(path = %self.path.display(), "rule config reload failed: {e}");
                return Err(e);
            }
        };
        let mut guard = match self.current.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::clone(&config);
        info!(path = %self.path.display(), items = config.len(), "reloaded rule config");
        Ok(config)
    }
}
