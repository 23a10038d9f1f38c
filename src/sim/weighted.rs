//! Weighted random selection

use rand::Rng;

/// Pick a value from `(value, weight)` pairs, proportionally to weight
///
/// Weights need not sum to 1. Entries with a non-positive weight are never
/// picked. Returns `None` when nothing has positive weight.
pub fn pick_weighted<T: Copy, R: Rng + ?Sized>(table: &[(T, f32)], rng: &mut R) -> Option<T> {
    let total: f32 = table.iter().map(|&(_, w)| w.max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let mut remaining = rng.random_range(0.0..total);
    let mut last = None;
    for &(value, weight) in table {
        if weight <= 0.0 {
            continue;
        }
        last = Some(value);
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(value);
        }
    }

    // Float rounding walked off the end
    last
}
