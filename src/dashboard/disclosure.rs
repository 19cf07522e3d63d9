use crate::dashboard::category::DashboardCategory;
use crate::dashboard::tile::Tile;
use std::collections::HashMap;
use std::sync::Arc;

/// Number of tiles shown before the "more" affordance when nothing is configured.
pub const DEFAULT_TILE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureState {
    Collapsed,
    Expanded,
}

/// Progressive disclosure for one category on one host.
///
/// Starts collapsed, showing at most `tile_limit` tiles. `expand` is the only
/// transition and happens at most once; a rebuilt category gets a new mixin.
///
/// Indices refer to the preferences `bind_category` produces, so tiles
/// dropped at bind time never count against the limit.
#[derive(Debug, Clone)]
pub struct ProgressiveDisclosureMixin {
    category: Arc<DashboardCategory>,
    shown: Vec<Tile>,
    tile_limit: usize,
    state: DisclosureState,
}

impl ProgressiveDisclosureMixin {
    pub fn new(category: Arc<DashboardCategory>, tile_limit: usize) -> Self {
        let shown = category
            .bindable()
            .into_iter()
            .map(|entry| entry.tile.clone())
            .collect();
        Self {
            category,
            shown,
            tile_limit,
            state: DisclosureState::Collapsed,
        }
    }

    pub fn category(&self) -> &DashboardCategory {
        &self.category
    }

    pub fn state(&self) -> DisclosureState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == DisclosureState::Expanded
    }

    pub fn tile_limit(&self) -> usize {
        self.tile_limit
    }

    /// Number of preferences the category binds to.
    pub fn tile_count(&self) -> usize {
        self.shown.len()
    }

    pub fn visible_count(&self) -> usize {
        match self.state {
            DisclosureState::Expanded => self.shown.len(),
            DisclosureState::Collapsed => self.tile_limit.min(self.shown.len()),
        }
    }

    pub fn should_show(&self, tile_index: usize) -> bool {
        tile_index < self.visible_count()
    }

    /// Whether the "more" affordance should be displayed.
    pub fn has_hidden_tiles(&self) -> bool {
        self.visible_count() < self.shown.len()
    }

    pub fn hidden_tiles(&self) -> &[Tile] {
        &self.shown[self.visible_count()..]
    }

    /// Titles of the collapsed tiles, for the summary under the affordance.
    pub fn collapsed_summary(&self) -> Option<String> {
        let titles: Vec<&str> = self
            .hidden_tiles()
            .iter()
            .filter_map(Tile::title)
            .collect();
        (!titles.is_empty()).then(|| titles.join(", "))
    }

    /// Reveal every tile. Returns `true` only on the transition itself.
    pub fn expand(&mut self) -> bool {
        if self.state == DisclosureState::Expanded {
            return false;
        }
        tracing::debug!(
            category = self.category.key(),
            revealed = self.hidden_tiles().len(),
            "expanding dashboard category"
        );
        self.state = DisclosureState::Expanded;
        true
    }
}

/// Disclosure state owned by one host, keyed by category.
#[derive(Debug, Clone)]
pub struct DisclosureStates {
    tile_limit: usize,
    mixins: HashMap<String, ProgressiveDisclosureMixin>,
}

impl DisclosureStates {
    pub fn new(tile_limit: usize) -> Self {
        Self {
            tile_limit,
            mixins: HashMap::new(),
        }
    }

    /// Mixin for `category`, recreated collapsed when the tile set changed.
    pub fn mixin_for(
        &mut self,
        category: Arc<DashboardCategory>,
    ) -> &mut ProgressiveDisclosureMixin {
        let tile_limit = self.tile_limit;
        let mixin = self
            .mixins
            .entry(category.key().to_string())
            .or_insert_with(|| {
                ProgressiveDisclosureMixin::new(Arc::clone(&category), tile_limit)
            });
        if mixin.category.fingerprint() != category.fingerprint() {
            tracing::debug!(category = category.key(), "category rebuilt, resetting disclosure");
            *mixin = ProgressiveDisclosureMixin::new(category, tile_limit);
        }
        mixin
    }

    pub fn get(&self, key: &str) -> Option<&ProgressiveDisclosureMixin> {
        self.mixins.get(key)
    }

    /// Expand the mixin for `key`, if the host has displayed that category.
    pub fn expand(&mut self, key: &str) -> bool {
        self.mixins.get_mut(key).is_some_and(|m| m.expand())
    }

    pub fn clear(&mut self) {
        self.mixins.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(count: usize) -> Arc<DashboardCategory> {
        let tiles = (0..count)
            .map(|i| Tile::new("cat", &format!("Tile {i}")).with_priority(i as i32))
            .collect();
        Arc::new(DashboardCategory::new("cat", tiles))
    }

    #[test]
    fn cutoff_then_expand() {
        let mut mixin = ProgressiveDisclosureMixin::new(category(8), 5);
        assert!((0..5).all(|i| mixin.should_show(i)));
        assert!((5..8).all(|i| !mixin.should_show(i)));
        assert_eq!(mixin.hidden_tiles().len(), 3);
        assert_eq!(
            mixin.collapsed_summary().as_deref(),
            Some("Tile 5, Tile 6, Tile 7")
        );
        assert!(mixin.expand());
        assert!((0..8).all(|i| mixin.should_show(i)));
        assert!(!mixin.has_hidden_tiles());
        assert_eq!(mixin.collapsed_summary(), None);
    }

    #[test]
    fn dropped_tiles_do_not_count_against_limit() {
        let mut tiles: Vec<Tile> = category(8).tiles().to_vec();
        tiles[1].title = None;
        let category = Arc::new(DashboardCategory::new("cat", tiles));
        let mixin = ProgressiveDisclosureMixin::new(category, 5);
        assert_eq!(mixin.tile_count(), 7);
        assert_eq!(mixin.visible_count(), 5);
        assert_eq!(mixin.hidden_tiles().len(), 2);
        assert_eq!(mixin.collapsed_summary().as_deref(), Some("Tile 6, Tile 7"));
    }

    #[test]
    fn expand_fires_once() {
        let mut mixin = ProgressiveDisclosureMixin::new(category(8), 5);
        assert!(mixin.expand());
        assert!(!mixin.expand());
        assert_eq!(mixin.state(), DisclosureState::Expanded);
    }

    #[test]
    fn small_category_has_nothing_hidden() {
        let mixin = ProgressiveDisclosureMixin::new(category(3), 5);
        assert_eq!(mixin.visible_count(), 3);
        assert!(!mixin.has_hidden_tiles());
        assert!(!mixin.should_show(3));
    }

    #[test]
    fn rebuild_resets_state() {
        let mut states = DisclosureStates::new(5);
        states.mixin_for(category(8)).expand();
        assert!(states.mixin_for(category(8)).is_expanded());
        let rebuilt = states.mixin_for(category(9));
        assert!(!rebuilt.is_expanded());
        assert_eq!(rebuilt.category().len(), 9);
    }

    #[test]
    fn expand_by_key() {
        let mut states = DisclosureStates::new(2);
        assert!(!states.expand("cat"));
        states.mixin_for(category(4));
        assert!(states.expand("cat"));
        assert!(!states.expand("cat"));
        assert!(states.get("cat").is_some_and(|m| m.should_show(3)));
    }
}
