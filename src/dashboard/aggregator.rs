use crate::dashboard::category::DashboardCategory;
use crate::dashboard::priority::HasPriority;
use crate::dashboard::registry::RegistrySnapshot;
use crate::dashboard::tile::Tile;
use std::sync::Arc;

/// Groups the tiles of one registry snapshot into ordered categories.
///
/// An aggregator never outlives its snapshot's relevance: build a new one
/// after every publish.
pub struct CategoryAggregator {
    snapshot: Arc<RegistrySnapshot>,
}

impl CategoryAggregator {
    pub fn new(snapshot: Arc<RegistrySnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }

    /// Tiles of `key` in display order. Unknown keys yield an empty category.
    pub fn tiles_for_category(&self, key: &str) -> DashboardCategory {
        if !self.snapshot.is_known_category(key) {
            tracing::debug!(category = key, "unknown dashboard category");
            return DashboardCategory::empty(key);
        }
        let mut tiles: Vec<Tile> = self.snapshot.tiles_in(key).cloned().collect();
        sort_tiles(&mut tiles);
        DashboardCategory::new(key, tiles)
    }

    /// Every known category that holds at least one tile, in screen order.
    pub fn all_categories(&self) -> Vec<DashboardCategory> {
        self.snapshot
            .categories()
            .iter()
            .map(|key| self.tiles_for_category(key))
            .filter(|category| !category.is_empty())
            .collect()
    }
}

/// Sort by priority band, then priority, both ascending.
///
/// The sort is stable, so tiles with equal priority keep registration order.
pub fn sort_tiles(tiles: &mut [Tile]) {
    tiles.sort_by_key(|tile| (tile.priority_group(), tile.priority));
}
