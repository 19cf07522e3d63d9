use crate::dashboard::tile::Tile;

/// Width of one priority band.
pub const PRIORITY_BAND: i32 = 100;

/// Priority band of `priority`: `floor(priority / 100) * 100`.
///
/// Rounds toward negative infinity so bands stay monotonic across zero
/// (`-50` lands in `-100`). Saturates at `i32::MIN`.
pub fn priority_group(priority: i32) -> i32 {
    priority
        .div_euclid(PRIORITY_BAND)
        .saturating_mul(PRIORITY_BAND)
}

/// Anything that carries an owner-assigned priority.
pub trait HasPriority {
    fn priority(&self) -> i32;

    fn priority_group(&self) -> i32 {
        priority_group(self.priority())
    }
}

impl HasPriority for Tile {
    fn priority(&self) -> i32 {
        self.priority
    }
}
