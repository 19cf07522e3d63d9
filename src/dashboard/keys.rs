use crate::dashboard::tile::Tile;
use siphasher::sip::SipHasher24;
use std::collections::HashMap;
use std::hash::Hasher;

pub const KEY_PREFIX: &str = "dashboard_tile_pref_";

/// Stable preference key for `tile`.
///
/// An explicit key hint wins. Otherwise the key is derived from the tile's
/// category, intent target and title, so the same tile yields the same key
/// on every rebuild.
pub fn dashboard_key_for_tile(tile: &Tile) -> String {
    if let Some(hint) = tile.key_hint() {
        return hint.to_string();
    }
    let title = tile.title().unwrap_or_default();
    let mut hasher = SipHasher24::new_with_keys(0, 0);
    hasher.write(tile.category.as_bytes());
    hasher.write_u8(0xff);
    if let Some(target) = &tile.intent {
        for part in [&target.package, &target.class, &target.action] {
            match part {
                Some(value) => {
                    hasher.write_u8(1);
                    hasher.write(value.as_bytes());
                }
                None => hasher.write_u8(0),
            }
            hasher.write_u8(0xfe);
        }
    }
    hasher.write_u8(0xff);
    hasher.write(title.as_bytes());

    let mut slug = slug::slugify(title);
    if slug.is_empty() {
        slug.push_str("tile");
    }
    format!("{KEY_PREFIX}{slug}_{:016x}", hasher.finish())
}

/// Drop earlier entries whose key is reused by a later entry.
///
/// The survivor keeps its own position. Each dropped entry is logged.
pub fn resolve_key_collisions<T>(entries: Vec<(String, T)>) -> Vec<(String, T)> {
    dedupe_keys(entries, true)
}

/// Collision resolution shared with read-only lookups, which pass
/// `report = false` to stay quiet.
pub(crate) fn dedupe_keys<T>(entries: Vec<(String, T)>, report: bool) -> Vec<(String, T)> {
    let keep: Vec<bool> = {
        let mut last_index: HashMap<&str, usize> = HashMap::new();
        for (idx, (key, _)) in entries.iter().enumerate() {
            last_index.insert(key.as_str(), idx);
        }
        entries
            .iter()
            .enumerate()
            .map(|(idx, (key, _))| last_index.get(key.as_str()) == Some(&idx))
            .collect()
    };

    entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, keep)| {
            if !keep && report {
                tracing::warn!(key = %entry.0, "duplicate dashboard key, dropping earlier tile");
            }
            keep.then_some(entry)
        })
        .collect()
}
