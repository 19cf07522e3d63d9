use crate::dashboard::category::DashboardCategory;
use crate::dashboard::keys::dashboard_key_for_tile;
use crate::dashboard::launcher::{activatable_target, start_target, TileHost};
use crate::dashboard::priority::{priority_group, HasPriority, PRIORITY_BAND};
use crate::dashboard::tile::{Icon, SummarySource, Tile};
use std::fmt;
use std::sync::Arc;

/// Callback fired when the user activates a bound preference.
pub type ActivationHandler = Arc<dyn Fn() + Send + Sync>;

/// Capability of a renderable preference that tile data can be projected onto.
///
/// Setters replace the previous value. In particular `set_on_activate`
/// swaps the handler instead of adding a listener.
pub trait Bindable {
    fn set_key(&mut self, key: &str);
    fn set_title(&mut self, title: &str);
    fn set_summary(&mut self, summary: Option<&str>);
    fn set_icon(&mut self, icon: Option<Icon>);
    fn set_order(&mut self, order: i32);
    fn set_on_activate(&mut self, handler: Option<ActivationHandler>);

    fn set_summary_source(&mut self, _source: SummarySource) {}

    fn set_priority(&mut self, _priority: i32) {}
}

/// Result of binding one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// Bound with a live activation handler.
    Bound,
    /// Bound, but activation is a no-op.
    Inert,
    /// Tile is malformed; the preference was left untouched.
    Skipped,
}

/// Default [`Bindable`] used for flat preference lists.
#[derive(Clone, Default)]
pub struct BoundPreference {
    pub key: String,
    pub order: i32,
    pub priority: i32,
    pub title: String,
    pub summary: Option<String>,
    pub summary_source: SummarySource,
    pub icon: Option<Icon>,
    on_activate: Option<ActivationHandler>,
}

impl fmt::Debug for BoundPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundPreference")
            .field("key", &self.key)
            .field("order", &self.order)
            .field("title", &self.title)
            .field("summary", &self.summary)
            .field("icon", &self.icon)
            .field("activatable", &self.is_activatable())
            .finish()
    }
}

impl BoundPreference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_activatable(&self) -> bool {
        self.on_activate.is_some()
    }

    /// Simulate a user click. Returns `false` when the preference is inert.
    pub fn activate(&self) -> bool {
        match &self.on_activate {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl Bindable for BoundPreference {
    fn set_key(&mut self, key: &str) {
        self.key = key.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_summary(&mut self, summary: Option<&str>) {
        self.summary = summary.map(str::to_string);
    }

    fn set_icon(&mut self, icon: Option<Icon>) {
        self.icon = icon;
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    fn set_on_activate(&mut self, handler: Option<ActivationHandler>) {
        self.on_activate = handler;
    }

    fn set_summary_source(&mut self, source: SummarySource) {
        self.summary_source = source;
    }

    fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }
}

impl HasPriority for BoundPreference {
    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Display order: base offset, then priority band, then rank inside the band.
pub fn display_order(base_order: i32, priority: i32, rank: usize) -> i32 {
    let rank = rank.min((PRIORITY_BAND - 1) as usize) as i32;
    base_order
        .saturating_add(priority_group(priority))
        .saturating_add(rank)
}

/// Project `tile` onto `pref`.
///
/// `rank` is the tile's position inside its priority band within the
/// category being bound. When `key` is `None` one is generated.
pub fn bind_preference_to_tile(
    host: &Arc<dyn TileHost>,
    pref: &mut dyn Bindable,
    tile: &Tile,
    key: Option<&str>,
    base_order: i32,
    rank: usize,
) -> BindOutcome {
    if let Err(e) = tile.validate() {
        tracing::warn!("skipping dashboard tile: {e}");
        return BindOutcome::Skipped;
    }
    let title = tile.title().unwrap_or_default();

    match key {
        Some(key) => pref.set_key(key),
        None => pref.set_key(&dashboard_key_for_tile(tile)),
    }
    pref.set_title(title);

    let source = tile.summary_source();
    match &source {
        SummarySource::Static(text) => pref.set_summary(Some(text.as_str())),
        // placeholder until the dynamic summary is loaded
        SummarySource::Dynamic(_) => pref.set_summary(tile.static_summary()),
        SummarySource::None => pref.set_summary(None),
    }
    pref.set_summary_source(source);
    pref.set_icon(tile.icon());
    pref.set_priority(tile.priority);
    pref.set_order(display_order(base_order, tile.priority, rank));

    match activatable_target(host.as_ref(), tile) {
        Ok(target) => {
            let host = Arc::clone(host);
            let target = target.clone();
            pref.set_on_activate(Some(Arc::new(move || {
                start_target(host.as_ref(), &target);
            })));
            BindOutcome::Bound
        }
        Err(e) => {
            tracing::info!(tile = title, "dashboard tile bound inert: {e}");
            pref.set_on_activate(None);
            BindOutcome::Inert
        }
    }
}

/// Bind every tile of `category` into fresh preferences.
///
/// Malformed tiles are skipped and key collisions resolve in favour of the
/// later tile. The result keeps category order.
pub fn bind_category(
    host: &Arc<dyn TileHost>,
    category: &DashboardCategory,
    base_order: i32,
) -> Vec<BoundPreference> {
    category
        .bindable()
        .into_iter()
        .map(|entry| {
            let mut pref = BoundPreference::new();
            bind_preference_to_tile(
                host,
                &mut pref,
                entry.tile,
                Some(&entry.key),
                base_order,
                entry.rank,
            );
            pref
        })
        .collect()
}

/// Source of summaries flagged dynamic at bind time.
pub trait SummaryLoader {
    fn load_summary(&self, uri: &str) -> Option<String>;
}

/// Refresh the summary of every preference bound with a dynamic source.
///
/// Returns how many summaries changed. Failed loads keep the placeholder.
pub fn refresh_dynamic_summaries(
    prefs: &mut [BoundPreference],
    loader: &dyn SummaryLoader,
) -> usize {
    let mut updated = 0;
    for pref in prefs.iter_mut() {
        let SummarySource::Dynamic(uri) = &pref.summary_source else {
            continue;
        };
        match loader.load_summary(uri) {
            Some(summary) if pref.summary.as_deref() != Some(summary.as_str()) => {
                pref.summary = Some(summary);
                updated += 1;
            }
            Some(_) => {}
            None => tracing::debug!(key = %pref.key, %uri, "dynamic summary unavailable"),
        }
    }
    updated
}
