use crate::dashboard::aggregator::CategoryAggregator;
use crate::dashboard::binder::{self, Bindable, BindOutcome, BoundPreference};
use crate::dashboard::category::DashboardCategory;
use crate::dashboard::disclosure::{DisclosureStates, ProgressiveDisclosureMixin};
use crate::dashboard::keys;
use crate::dashboard::launcher::{self, TileHost};
use crate::dashboard::priority::HasPriority;
use crate::dashboard::registry::{collect_tiles, RegistrySnapshot, TileRegistry, TileSource};
use crate::dashboard::tile::Tile;
use crate::settings::DashboardSettings;
use std::sync::Arc;

/// Feature provider for the dashboard (settings homepage).
pub trait DashboardFeatureProvider {
    /// Whether aggregation runs at all.
    fn is_enabled(&self) -> bool;

    /// Tiles for a category key, in display order.
    fn tiles_for_category(&self, key: &str) -> Arc<DashboardCategory>;

    /// Flat bound preferences for a category key.
    #[deprecated(
        note = "use tiles_for_category; this path skips progressive disclosure and summary refresh"
    )]
    fn preferences_for_category(&self, host: &Arc<dyn TileHost>, key: &str)
        -> Vec<BoundPreference>;

    /// All non-empty categories, in screen order.
    fn all_categories(&self) -> Vec<Arc<DashboardCategory>>;

    /// Priority band of a tile or preference: 100-199 → 100, 200-299 → 200, and so on.
    fn priority_group(&self, item: &dyn HasPriority) -> i32 {
        item.priority_group()
    }

    fn dashboard_key_for_tile(&self, tile: &Tile) -> String {
        keys::dashboard_key_for_tile(tile)
    }

    /// Bind `tile` onto `pref`. `key` is generated when `None`; the final
    /// order combines `base_order` with the tile's priority.
    fn bind_preference_to_tile(
        &self,
        host: &Arc<dyn TileHost>,
        pref: &mut dyn Bindable,
        tile: &Tile,
        key: Option<&str>,
        base_order: i32,
    ) -> BindOutcome;

    fn progressive_disclosure_mixin(
        &self,
        category: Arc<DashboardCategory>,
    ) -> ProgressiveDisclosureMixin;

    /// Additional intent-filter action for dashboard tiles.
    fn extra_intent_action(&self) -> Option<String> {
        None
    }

    fn open_tile_intent(&self, host: &dyn TileHost, tile: &Tile) {
        launcher::open_tile_intent(host, tile);
    }
}

/// Default provider. Receives its registry and settings explicitly.
pub struct DashboardFeatureProviderImpl {
    settings: DashboardSettings,
    registry: Arc<TileRegistry>,
}

impl DashboardFeatureProviderImpl {
    pub fn new(settings: DashboardSettings, registry: Arc<TileRegistry>) -> Self {
        Self { settings, registry }
    }

    /// Provider with a fresh registry over the configured categories.
    pub fn from_settings(settings: DashboardSettings) -> Self {
        let registry = Arc::new(TileRegistry::new(settings.categories.clone()));
        Self::new(settings, registry)
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<TileRegistry> {
        &self.registry
    }

    /// Filter ineligible tiles and publish the rest as a new snapshot.
    pub fn publish(&self, tiles: Vec<Tile>) -> Arc<RegistrySnapshot> {
        let accepted = launcher::accepted_intent_actions(self.extra_intent_action().as_deref());
        let eligible = tiles
            .into_iter()
            .filter(|tile| match launcher::check_eligible(tile, &accepted) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(tile = ?tile.title(), "ignoring contributed tile: {e}");
                    false
                }
            })
            .collect();
        self.registry.publish(eligible)
    }

    /// Rediscover tiles from every source and publish them.
    pub fn refresh(&self, sources: &[Arc<dyn TileSource>]) -> Arc<RegistrySnapshot> {
        self.publish(collect_tiles(sources))
    }

    fn aggregator(&self) -> CategoryAggregator {
        CategoryAggregator::new(self.registry.snapshot())
    }

    /// Bind a whole category, with collision resolution and malformed tiles skipped.
    pub fn bind_category(
        &self,
        host: &Arc<dyn TileHost>,
        category: &DashboardCategory,
        base_order: i32,
    ) -> Vec<BoundPreference> {
        binder::bind_category(host, category, base_order)
    }

    /// Fresh per-host disclosure state using the configured cutoff.
    pub fn new_disclosure_states(&self) -> DisclosureStates {
        DisclosureStates::new(self.settings.disclosure_cutoff)
    }
}

impl DashboardFeatureProvider for DashboardFeatureProviderImpl {
    fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    fn tiles_for_category(&self, key: &str) -> Arc<DashboardCategory> {
        if !self.is_enabled() {
            return Arc::new(DashboardCategory::empty(key));
        }
        Arc::new(self.aggregator().tiles_for_category(key))
    }

    fn preferences_for_category(
        &self,
        host: &Arc<dyn TileHost>,
        key: &str,
    ) -> Vec<BoundPreference> {
        let category = self.tiles_for_category(key);
        self.bind_category(host, &category, 0)
    }

    fn all_categories(&self) -> Vec<Arc<DashboardCategory>> {
        if !self.is_enabled() {
            return Vec::new();
        }
        self.aggregator()
            .all_categories()
            .into_iter()
            .map(Arc::new)
            .collect()
    }

    fn bind_preference_to_tile(
        &self,
        host: &Arc<dyn TileHost>,
        pref: &mut dyn Bindable,
        tile: &Tile,
        key: Option<&str>,
        base_order: i32,
    ) -> BindOutcome {
        let rank = self
            .tiles_for_category(&tile.category)
            .rank_in_group(tile)
            .unwrap_or(0);
        binder::bind_preference_to_tile(host, pref, tile, key, base_order, rank)
    }

    fn progressive_disclosure_mixin(
        &self,
        category: Arc<DashboardCategory>,
    ) -> ProgressiveDisclosureMixin {
        ProgressiveDisclosureMixin::new(category, self.settings.disclosure_cutoff)
    }

    fn extra_intent_action(&self) -> Option<String> {
        self.settings.extra_intent_action.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tile::IntentTarget;

    struct AlwaysHost;

    impl TileHost for AlwaysHost {
        fn resolve(&self, _target: &IntentTarget) -> bool {
            true
        }

        fn start(&self, _target: &IntentTarget) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn provider() -> DashboardFeatureProviderImpl {
        DashboardFeatureProviderImpl::from_settings(DashboardSettings {
            categories: vec!["cat".into()],
            ..Default::default()
        })
    }

    #[test]
    fn disabled_provider_is_empty() {
        let mut settings = DashboardSettings {
            categories: vec!["cat".into()],
            ..Default::default()
        };
        settings.enabled = false;
        let provider = DashboardFeatureProviderImpl::from_settings(settings);
        provider.publish(vec![Tile::new("cat", "x")]);
        assert!(provider.tiles_for_category("cat").is_empty());
        assert!(provider.all_categories().is_empty());
    }

    #[test]
    fn bind_uses_rank_within_band() {
        let provider = provider();
        let second = Tile::new("cat", "second").with_priority(150);
        provider.publish(vec![
            Tile::new("cat", "first").with_priority(110),
            second.clone(),
        ]);
        let host: Arc<dyn TileHost> = Arc::new(AlwaysHost);
        let mut pref = BoundPreference::new();
        provider.bind_preference_to_tile(&host, &mut pref, &second, None, 1000);
        assert_eq!(pref.order, 1101);
        assert_eq!(provider.priority_group(&pref), 100);
    }

    #[test]
    fn rank_ignores_tiles_dropped_at_bind() {
        let provider = provider();
        let mut untitled = Tile::new("cat", "gone").with_priority(105);
        untitled.title = None;
        let last = Tile::new("cat", "last").with_priority(150);
        provider.publish(vec![
            Tile::new("cat", "first").with_priority(110),
            untitled,
            Tile::new("cat", "first").with_priority(110),
            last.clone(),
        ]);
        let host: Arc<dyn TileHost> = Arc::new(AlwaysHost);
        let mut pref = BoundPreference::new();
        provider.bind_preference_to_tile(&host, &mut pref, &last, None, 0);
        assert_eq!(pref.order, 101);
    }

    #[test]
    fn publish_filters_ineligible_actions() {
        let provider = provider();
        let snap = provider.publish(vec![
            Tile::new("cat", "ok")
                .with_intent(IntentTarget::action(launcher::EXTRA_SETTINGS_ACTION)),
            Tile::new("cat", "bad").with_intent(IntentTarget::action("vendor.OTHER")),
        ]);
        assert_eq!(snap.tiles().len(), 1);
        assert_eq!(provider.extra_intent_action(), None);
    }
}
