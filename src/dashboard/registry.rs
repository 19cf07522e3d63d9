use crate::dashboard::tile::Tile;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

/// A feature owner contributing dashboard tiles.
pub trait TileSource: Send + Sync {
    fn name(&self) -> &str;
    /// Return every tile this owner currently publishes.
    fn discover(&self) -> Vec<Tile>;
}

/// Immutable view of the registry at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrySnapshot {
    generation: u64,
    categories: Vec<String>,
    tiles: Vec<Tile>,
}

impl RegistrySnapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Known category keys in screen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Tiles in registration order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_known_category(&self, key: &str) -> bool {
        self.categories.iter().any(|c| c == key)
    }

    pub fn tiles_in<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles.iter().filter(move |t| t.category == key)
    }
}

/// Holds the tiles contributed by feature owners.
///
/// Readers always get a whole snapshot; `publish` swaps in a new one so a
/// reader iterating an old snapshot never sees a partial update.
pub struct TileRegistry {
    categories: Vec<String>,
    current: Mutex<Arc<RegistrySnapshot>>,
}

impl TileRegistry {
    pub fn new(categories: Vec<String>) -> Self {
        let initial = RegistrySnapshot {
            generation: 0,
            categories: categories.clone(),
            tiles: Vec::new(),
        };
        Self {
            categories,
            current: Mutex::new(Arc::new(initial)),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        match self.current.lock() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the registry contents with `tiles`.
    ///
    /// Tiles naming an unknown category are dropped with a warning.
    pub fn publish(&self, tiles: Vec<Tile>) -> Arc<RegistrySnapshot> {
        let total = tiles.len();
        let tiles: Vec<Tile> = tiles
            .into_iter()
            .filter(|tile| {
                let known = self.categories.iter().any(|c| *c == tile.category);
                if !known {
                    tracing::warn!(
                        category = %tile.category,
                        tile = ?tile.title(),
                        "dropping tile for unknown category"
                    );
                }
                known
            })
            .collect();

        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let snapshot = Arc::new(RegistrySnapshot {
            generation: guard.generation + 1,
            categories: self.categories.clone(),
            tiles,
        });
        tracing::info!(
            generation = snapshot.generation,
            tiles = snapshot.tiles.len(),
            dropped = total - snapshot.tiles.len(),
            "published tile registry"
        );
        *guard = Arc::clone(&snapshot);
        snapshot
    }
}

/// Query every source in order and concatenate their tiles.
pub fn collect_tiles(sources: &[Arc<dyn TileSource>]) -> Vec<Tile> {
    let mut tiles = Vec::new();
    for source in sources {
        let found = source.discover();
        tracing::debug!(source = source.name(), tiles = found.len(), "discovered tiles");
        tiles.extend(found);
    }
    tiles
}

/// Run discovery off the calling thread.
///
/// The receiver yields exactly one completed tile list, ready to publish.
pub fn spawn_discovery(sources: Vec<Arc<dyn TileSource>>) -> Receiver<Vec<Tile>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let tiles = collect_tiles(&sources);
        if tx.send(tiles).is_err() {
            tracing::debug!("tile discovery finished after receiver was dropped");
        }
    });
    rx
}

/// Load a tile feed from a JSON array on disk.
pub fn load_tiles(path: impl AsRef<Path>) -> anyhow::Result<Vec<Tile>> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tiles: Vec<Tile> = serde_json::from_str(&content)?;
    Ok(tiles)
}

pub fn save_tiles(path: impl AsRef<Path>, tiles: &[Tile]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(tiles)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Vec<Tile>);

    impl TileSource for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn discover(&self) -> Vec<Tile> {
            self.1.clone()
        }
    }

    #[test]
    fn publish_drops_unknown_categories() {
        let registry = TileRegistry::new(vec!["known".into()]);
        let snap = registry.publish(vec![Tile::new("known", "a"), Tile::new("other", "b")]);
        assert_eq!(snap.tiles().len(), 1);
        assert_eq!(snap.generation(), 1);
        assert!(snap.is_known_category("known"));
        assert!(!snap.is_known_category("other"));
    }

    #[test]
    fn old_snapshot_survives_publish() {
        let registry = TileRegistry::new(vec!["known".into()]);
        let first = registry.publish(vec![Tile::new("known", "a")]);
        registry.publish(vec![Tile::new("known", "b"), Tile::new("known", "c")]);
        assert_eq!(first.tiles().len(), 1);
        assert_eq!(registry.snapshot().tiles().len(), 2);
        assert_eq!(registry.snapshot().generation(), 2);
    }

    #[test]
    fn discovery_runs_off_thread() {
        let sources: Vec<Arc<dyn TileSource>> = vec![
            Arc::new(Fixed("wifi", vec![Tile::new("known", "Wi-Fi")])),
            Arc::new(Fixed("bt", vec![Tile::new("known", "Bluetooth")])),
        ];
        let tiles = spawn_discovery(sources).recv().unwrap();
        let titles: Vec<_> = tiles.iter().filter_map(Tile::title).collect();
        assert_eq!(titles, vec!["Wi-Fi", "Bluetooth"]);
    }
}
