use settings_dashboard::dashboard::category::CATEGORY_BATTERY;
use settings_dashboard::dashboard::registry::{load_tiles, save_tiles};
use settings_dashboard::dashboard::tile::{SummarySource, META_DATA_SUMMARY_URI};
use settings_dashboard::dashboard::{
    DashboardFeatureProvider, DashboardFeatureProviderImpl, IntentTarget, Tile,
};
use settings_dashboard::settings::DashboardSettings;
use tempfile::tempdir;

#[test]
fn feed_loads_from_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiles.json");
    std::fs::write(
        &path,
        r#"[
            {
                "category": "com.android.settings.category.ia.battery",
                "title": "Battery saver",
                "priority": 120,
                "intent": { "package": "com.android.settings", "class": "BatterySaver" },
                "metadata": { "com.android.settings.summary_uri": "content://battery/saver" }
            },
            { "category": "com.android.settings.category.ia.battery" }
        ]"#,
    )
    .unwrap();

    let tiles = load_tiles(&path).unwrap();
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0].priority, 120);
    assert_eq!(
        tiles[0].summary_source(),
        SummarySource::Dynamic("content://battery/saver".into())
    );
    assert_eq!(tiles[1].title(), None);
}

#[test]
fn save_then_load_tiles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiles.json");
    let tiles = vec![
        Tile::new(CATEGORY_BATTERY, "Usage")
            .with_priority(5)
            .with_icon("ic_battery")
            .with_intent(IntentTarget::component("com.android.settings", "Usage")),
        Tile::new(CATEGORY_BATTERY, "Saver")
            .with_metadata(META_DATA_SUMMARY_URI, "content://battery/saver"),
    ];
    save_tiles(&path, &tiles).unwrap();
    assert_eq!(load_tiles(&path).unwrap(), tiles);
}

#[test]
fn empty_and_corrupt_feeds() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, "  ").unwrap();
    assert!(load_tiles(&empty).unwrap().is_empty());

    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "not json").unwrap();
    assert!(load_tiles(&corrupt).is_err());
    assert!(load_tiles(dir.path().join("missing.json")).is_err());
}

#[test]
fn settings_round_trip_and_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard_settings.json");
    assert_eq!(
        DashboardSettings::load(&path).unwrap(),
        DashboardSettings::default()
    );

    let settings = DashboardSettings {
        disclosure_cutoff: 3,
        extra_intent_action: Some("com.vendor.action.DASHBOARD".into()),
        categories: vec![CATEGORY_BATTERY.to_string()],
        ..Default::default()
    };
    settings.save(&path).unwrap();
    assert_eq!(DashboardSettings::load(&path).unwrap(), settings);
}

#[test]
fn configured_cutoff_reaches_disclosure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard_settings.json");
    std::fs::write(&path, r#"{ "disclosure_cutoff": 2 }"#).unwrap();
    let settings = DashboardSettings::load(&path).unwrap();
    let provider = DashboardFeatureProviderImpl::from_settings(settings);
    provider.publish(
        (0..4)
            .map(|i| Tile::new(CATEGORY_BATTERY, &format!("Tile {i}")))
            .collect(),
    );
    let mixin = provider.progressive_disclosure_mixin(provider.tiles_for_category(CATEGORY_BATTERY));
    assert_eq!(mixin.visible_count(), 2);
    assert_eq!(mixin.collapsed_summary().as_deref(), Some("Tile 2, Tile 3"));
}

#[test]
fn corrupt_settings_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard_settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(DashboardSettings::load(&path).is_err());
}
