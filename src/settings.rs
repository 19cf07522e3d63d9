use crate::dashboard::category::DEFAULT_CATEGORY_KEYS;
use crate::dashboard::disclosure::DEFAULT_TILE_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_enabled() -> bool {
    true
}

fn default_disclosure_cutoff() -> usize {
    DEFAULT_TILE_LIMIT
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORY_KEYS.iter().map(|k| k.to_string()).collect()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardSettings {
    /// Global switch. When disabled every category aggregates to nothing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Tiles shown per category before the "more" affordance.
    #[serde(default = "default_disclosure_cutoff")]
    pub disclosure_cutoff: usize,
    /// Additional intent-filter action accepted for dashboard tiles.
    #[serde(default)]
    pub extra_intent_action: Option<String>,
    /// Known category keys in screen order.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            disclosure_cutoff: default_disclosure_cutoff(),
            extra_intent_action: None,
            categories: default_categories(),
            debug_logging: false,
        }
    }
}

impl DashboardSettings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self = serde_json::from_str(&content)?;
        settings.normalize();
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Drop blank and duplicate category keys, keeping first occurrence.
    fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.categories = std::mem::take(&mut self.categories)
            .into_iter()
            .map(|key| key.trim().to_string())
            .filter(|key| {
                if key.is_empty() || !seen.insert(key.clone()) {
                    tracing::warn!(category = %key, "ignoring blank or duplicate category key");
                    return false;
                }
                true
            })
            .collect();
        if self
            .extra_intent_action
            .as_deref()
            .is_some_and(|a| a.trim().is_empty())
        {
            self.extra_intent_action = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings: DashboardSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, DashboardSettings::default());
        assert_eq!(settings.disclosure_cutoff, 5);
        assert!(settings.enabled);
    }

    #[test]
    fn normalize_removes_duplicates() {
        let mut settings = DashboardSettings {
            categories: vec!["a".into(), " ".into(), "a".into(), "b".into()],
            extra_intent_action: Some("  ".into()),
            ..Default::default()
        };
        settings.normalize();
        assert_eq!(settings.categories, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(settings.extra_intent_action, None);
    }
}
