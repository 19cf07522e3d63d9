use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Explicit preference key supplied by the feature owner.
pub const META_DATA_KEYHINT: &str = "com.android.settings.keyhint";
/// Static summary text overriding [`Tile::summary`].
pub const META_DATA_SUMMARY: &str = "com.android.settings.summary";
/// Marks the summary as dynamic. The value names the summary source.
pub const META_DATA_SUMMARY_URI: &str = "com.android.settings.summary_uri";
/// `#RRGGBB` or `#AARRGGBB` tint applied to the tile icon.
pub const META_DATA_ICON_TINT: &str = "com.android.settings.icon_tint";

/// Destination launched when a tile is activated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl IntentTarget {
    pub fn component(package: &str, class: &str) -> Self {
        Self {
            package: Some(package.to_string()),
            class: Some(class.to_string()),
            action: None,
        }
    }

    pub fn action(action: &str) -> Self {
        Self {
            package: None,
            class: None,
            action: Some(action.to_string()),
        }
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    /// `package/class` when both halves are present.
    pub fn component_name(&self) -> Option<String> {
        match (non_blank(&self.package), non_blank(&self.class)) {
            (Some(pkg), Some(cls)) => Some(format!("{pkg}/{cls}")),
            _ => None,
        }
    }

    pub fn action_name(&self) -> Option<&str> {
        non_blank(&self.action)
    }

    /// A target needs either a full component or an action to be launchable.
    pub fn is_well_formed(&self) -> bool {
        self.component_name().is_some() || self.action_name().is_some()
    }
}

impl fmt::Display for IntentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.component_name(), self.action_name()) {
            (Some(component), Some(action)) => write!(f, "{component} ({action})"),
            (Some(component), None) => write!(f, "{component}"),
            (None, Some(action)) => write!(f, "{action}"),
            (None, None) => write!(f, "<empty>"),
        }
    }
}

/// Icon reference plus an optional ARGB tint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub reference: String,
    pub tint: Option<u32>,
}

/// Where the summary line of a bound preference comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SummarySource {
    #[default]
    None,
    Static(String),
    /// Resolved later through a [`crate::dashboard::binder::SummaryLoader`].
    Dynamic(String),
}

impl SummarySource {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, SummarySource::Dynamic(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    #[error("tile has an empty category key")]
    MissingCategory,
    #[error("tile in category '{category}' has no title")]
    MissingTitle { category: String },
    #[error("tile '{title}' has no intent target")]
    NoTarget { title: String },
    #[error("intent target '{target}' cannot be resolved")]
    Unresolvable { target: String },
    #[error("intent action '{action}' is not a dashboard action")]
    IneligibleAction { action: String },
}

/// A feature-contributed dashboard entry.
///
/// Tiles are plain data. Once a registry snapshot containing a tile is
/// published the tile is never mutated; re-discovery publishes new tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub category: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentTarget>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Tile {
    pub fn new(category: &str, title: &str) -> Self {
        Self {
            category: category.to_string(),
            title: Some(title.to_string()),
            summary: None,
            icon: None,
            priority: 0,
            intent: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn with_intent(mut self, intent: IntentTarget) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Title with surrounding whitespace removed, `None` when blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(&self.title)
    }

    pub fn key_hint(&self) -> Option<&str> {
        self.metadata
            .get(META_DATA_KEYHINT)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Static summary text, metadata override first.
    pub fn static_summary(&self) -> Option<&str> {
        self.metadata
            .get(META_DATA_SUMMARY)
            .map(String::as_str)
            .or(self.summary.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn summary_source(&self) -> SummarySource {
        if let Some(uri) = self
            .metadata
            .get(META_DATA_SUMMARY_URI)
            .filter(|uri| !uri.trim().is_empty())
        {
            return SummarySource::Dynamic(uri.trim().to_string());
        }
        match self.static_summary() {
            Some(text) => SummarySource::Static(text.to_string()),
            None => SummarySource::None,
        }
    }

    pub fn icon(&self) -> Option<Icon> {
        let reference = non_blank(&self.icon)?;
        let tint = self.metadata.get(META_DATA_ICON_TINT).and_then(|raw| {
            let tint = parse_tint(raw);
            if tint.is_none() {
                tracing::warn!(tile = ?self.title, tint = %raw, "ignoring malformed icon tint");
            }
            tint
        });
        Some(Icon {
            reference: reference.to_string(),
            tint,
        })
    }

    /// Well-formed intent target, if any.
    pub fn target(&self) -> Option<&IntentTarget> {
        self.intent.as_ref().filter(|t| t.is_well_formed())
    }

    /// Checks the attributes a tile needs before it can be bound.
    pub fn validate(&self) -> Result<(), TileError> {
        if self.category.trim().is_empty() {
            return Err(TileError::MissingCategory);
        }
        if self.title().is_none() {
            return Err(TileError::MissingTitle {
                category: self.category.clone(),
            });
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse `#RRGGBB` (opaque) or `#AARRGGBB`.
pub fn parse_tint(raw: &str) -> Option<u32> {
    let hex = raw.trim().strip_prefix('#')?;
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(0xFF00_0000 | value),
        8 => Some(value),
        _ => None,
    }
}
