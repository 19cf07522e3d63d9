use crate::dashboard::tile::{IntentTarget, Tile, TileError};

/// Base intent-filter action every contributed dashboard component may use.
pub const EXTRA_SETTINGS_ACTION: &str = "com.android.settings.action.EXTRA_SETTINGS";

/// Activation context supplied by the hosting screen.
pub trait TileHost: Send + Sync {
    /// Whether `target` maps to a launchable component.
    fn resolve(&self, target: &IntentTarget) -> bool;

    /// Start `target`. Only called for targets that resolved.
    fn start(&self, target: &IntentTarget) -> anyhow::Result<()>;
}

/// Target of `tile` if the host can launch it.
pub fn activatable_target<'a>(
    host: &dyn TileHost,
    tile: &'a Tile,
) -> Result<&'a IntentTarget, TileError> {
    let Some(target) = tile.target() else {
        return Err(TileError::NoTarget {
            title: tile.title().unwrap_or_default().to_string(),
        });
    };
    if !host.resolve(target) {
        return Err(TileError::Unresolvable {
            target: target.to_string(),
        });
    }
    Ok(target)
}

/// Open the destination of `tile` from `host`.
///
/// Never fails to the caller: unresolvable targets and start failures are
/// logged and reported as `false`.
pub fn open_tile_intent(host: &dyn TileHost, tile: &Tile) -> bool {
    match activatable_target(host, tile) {
        Ok(target) => start_target(host, target),
        Err(e) => {
            tracing::warn!(tile = ?tile.title(), "cannot open dashboard tile: {e}");
            false
        }
    }
}

pub(crate) fn start_target(host: &dyn TileHost, target: &IntentTarget) -> bool {
    match host.start(target) {
        Ok(()) => {
            tracing::debug!(%target, "launched dashboard tile");
            true
        }
        Err(e) => {
            tracing::error!(%target, "failed to launch dashboard tile: {e:#}");
            false
        }
    }
}

/// Intent actions accepted for dashboard destinations.
pub fn accepted_intent_actions(extra_action: Option<&str>) -> Vec<String> {
    let mut actions = vec![EXTRA_SETTINGS_ACTION.to_string()];
    if let Some(extra) = extra_action.map(str::trim).filter(|a| !a.is_empty()) {
        if extra != EXTRA_SETTINGS_ACTION {
            actions.push(extra.to_string());
        }
    }
    actions
}

/// Whether a contributed component qualifies as a tile at all.
///
/// Explicit components are always eligible; bare actions must be one of
/// `accepted`. Tiles without a usable target stay eligible and bind inert.
pub fn check_eligible(tile: &Tile, accepted: &[String]) -> Result<(), TileError> {
    let Some(target) = tile.target() else {
        return Ok(());
    };
    if target.component_name().is_some() {
        return Ok(());
    }
    match target.action_name() {
        Some(action) if !accepted.iter().any(|a| a == action) => {
            Err(TileError::IneligibleAction {
                action: action.to_string(),
            })
        }
        _ => Ok(()),
    }
}
