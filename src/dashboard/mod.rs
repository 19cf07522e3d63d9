pub mod aggregator;
pub mod binder;
pub mod category;
pub mod disclosure;
pub mod keys;
pub mod launcher;
pub mod priority;
pub mod provider;
pub mod registry;
pub mod tile;

pub use aggregator::CategoryAggregator;
pub use binder::{Bindable, BindOutcome, BoundPreference, SummaryLoader};
pub use category::{BindableTile, DashboardCategory};
pub use disclosure::{DisclosureStates, ProgressiveDisclosureMixin};
pub use launcher::TileHost;
pub use provider::{DashboardFeatureProvider, DashboardFeatureProviderImpl};
pub use registry::{RegistrySnapshot, TileRegistry, TileSource};
pub use tile::{IntentTarget, Tile, TileError};
