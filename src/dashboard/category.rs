use crate::dashboard::keys::{dashboard_key_for_tile, dedupe_keys};
use crate::dashboard::priority::HasPriority;
use crate::dashboard::tile::Tile;
use siphasher::sip::SipHasher24;
use std::hash::Hasher;

pub const CATEGORY_HOMEPAGE: &str = "com.android.settings.category.ia.homepage";
pub const CATEGORY_NETWORK: &str = "com.android.settings.category.ia.wireless";
pub const CATEGORY_CONNECT: &str = "com.android.settings.category.ia.connect";
pub const CATEGORY_DEVICE: &str = "com.android.settings.category.ia.device";
pub const CATEGORY_APPS: &str = "com.android.settings.category.ia.apps";
pub const CATEGORY_BATTERY: &str = "com.android.settings.category.ia.battery";
pub const CATEGORY_DISPLAY: &str = "com.android.settings.category.ia.display";
pub const CATEGORY_SOUND: &str = "com.android.settings.category.ia.sound";
pub const CATEGORY_STORAGE: &str = "com.android.settings.category.ia.storage";
pub const CATEGORY_SECURITY: &str = "com.android.settings.category.ia.security";
pub const CATEGORY_SECURITY_LOCKSCREEN: &str = "com.android.settings.category.ia.lockscreen";
pub const CATEGORY_ACCOUNT: &str = "com.android.settings.category.ia.accounts";
pub const CATEGORY_SYSTEM: &str = "com.android.settings.category.ia.system";
pub const CATEGORY_SYSTEM_DEVELOPMENT: &str = "com.android.settings.category.ia.development";

/// Category keys known out of the box, in screen order.
pub const DEFAULT_CATEGORY_KEYS: &[&str] = &[
    CATEGORY_HOMEPAGE,
    CATEGORY_NETWORK,
    CATEGORY_CONNECT,
    CATEGORY_DEVICE,
    CATEGORY_APPS,
    CATEGORY_BATTERY,
    CATEGORY_DISPLAY,
    CATEGORY_SOUND,
    CATEGORY_STORAGE,
    CATEGORY_SECURITY,
    CATEGORY_SECURITY_LOCKSCREEN,
    CATEGORY_ACCOUNT,
    CATEGORY_SYSTEM,
    CATEGORY_SYSTEM_DEVELOPMENT,
];

/// Ordered, immutable set of tiles sharing a category key.
///
/// Categories are published behind an `Arc` and replaced wholesale on every
/// aggregation pass. The fingerprint identifies the exact tile set so hosts
/// can tell a rebuild from a re-read of the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCategory {
    key: String,
    tiles: Vec<Tile>,
    fingerprint: u64,
}

impl DashboardCategory {
    /// Build a category from tiles already in display order.
    pub fn new(key: &str, tiles: Vec<Tile>) -> Self {
        let fingerprint = fingerprint(key, &tiles);
        Self {
            key: key.to_string(),
            tiles,
            fingerprint,
        }
    }

    pub fn empty(key: &str) -> Self {
        Self::new(key, Vec::new())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Tiles that end up on screen: valid, de-duplicated by key, each with
    /// its rank inside its priority band. Dropped tiles are logged.
    pub fn bindable(&self) -> Vec<BindableTile<'_>> {
        self.collect_bindable(true)
    }

    /// Rank of `tile` inside its priority band among the bindable tiles.
    pub fn rank_in_group(&self, tile: &Tile) -> Option<usize> {
        let key = dashboard_key_for_tile(tile);
        self.collect_bindable(false)
            .into_iter()
            .find(|entry| entry.key == key && entry.tile == tile)
            .map(|entry| entry.rank)
    }

    fn collect_bindable(&self, report: bool) -> Vec<BindableTile<'_>> {
        let valid: Vec<(String, &Tile)> = self
            .tiles
            .iter()
            .filter(|tile| match tile.validate() {
                Ok(()) => true,
                Err(e) => {
                    if report {
                        tracing::warn!(category = %self.key, "dropping dashboard tile: {e}");
                    }
                    false
                }
            })
            .map(|tile| (dashboard_key_for_tile(tile), tile))
            .collect();
        let survivors = dedupe_keys(valid, report);
        let ranks = band_ranks(survivors.iter().map(|(_, tile)| *tile));
        survivors
            .into_iter()
            .zip(ranks)
            .map(|((key, tile), rank)| BindableTile { key, tile, rank })
            .collect()
    }
}

/// A tile cleared for binding, with its preference key and band rank.
#[derive(Debug, Clone, PartialEq)]
pub struct BindableTile<'a> {
    pub key: String,
    pub tile: &'a Tile,
    pub rank: usize,
}

/// Rank of every tile inside its run of equal priority bands.
fn band_ranks<'a>(tiles: impl Iterator<Item = &'a Tile>) -> Vec<usize> {
    let mut ranks = Vec::new();
    let mut current_group = None;
    let mut rank = 0;
    for tile in tiles {
        let group = tile.priority_group();
        if current_group == Some(group) {
            rank += 1;
        } else {
            current_group = Some(group);
            rank = 0;
        }
        ranks.push(rank);
    }
    ranks
}

fn fingerprint(key: &str, tiles: &[Tile]) -> u64 {
    let mut hasher = SipHasher24::new_with_keys(0, 0);
    hasher.write(key.as_bytes());
    hasher.write_u64(tiles.len() as u64);
    for tile in tiles {
        if let Ok(bytes) = serde_json::to_vec(tile) {
            hasher.write(&bytes);
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(title: &str, priority: i32) -> Tile {
        Tile::new(CATEGORY_SYSTEM, title).with_priority(priority)
    }

    #[test]
    fn ranks_restart_per_group() {
        let category = DashboardCategory::new(
            CATEGORY_SYSTEM,
            vec![tile("a", 10), tile("b", 20), tile("c", 110), tile("d", 150)],
        );
        let ranks: Vec<usize> = category.bindable().iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![0, 1, 0, 1]);
        assert_eq!(category.rank_in_group(&tile("d", 150)), Some(1));
        assert_eq!(category.rank_in_group(&tile("zzz", 150)), None);
    }

    #[test]
    fn bindable_skips_dropped_tiles_when_ranking() {
        let untitled = Tile::new(CATEGORY_SYSTEM, " ").with_priority(110);
        let category = DashboardCategory::new(
            CATEGORY_SYSTEM,
            vec![
                tile("a", 100),
                untitled,
                tile("dup", 120),
                tile("dup", 120),
                tile("b", 130),
            ],
        );
        let bindable = category.bindable();
        let titles: Vec<_> = bindable.iter().filter_map(|b| b.tile.title()).collect();
        assert_eq!(titles, vec!["a", "dup", "b"]);
        let ranks: Vec<usize> = bindable.iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        assert_eq!(category.rank_in_group(&tile("b", 130)), Some(2));
        assert_eq!(category.rank_in_group(&tile("dup", 120)), Some(1));
    }

    #[test]
    fn fingerprint_tracks_tile_set() {
        let a = DashboardCategory::new(CATEGORY_SYSTEM, vec![tile("a", 1)]);
        let b = DashboardCategory::new(CATEGORY_SYSTEM, vec![tile("a", 1)]);
        let c = DashboardCategory::new(CATEGORY_SYSTEM, vec![tile("a", 1), tile("b", 2)]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(
            DashboardCategory::empty(CATEGORY_SYSTEM).fingerprint(),
            DashboardCategory::empty(CATEGORY_SOUND).fingerprint()
        );
    }
}
