//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Surface lookup and HUD validation
//! - Input events (held-direction intent)
//! - Frame scheduling
//! - Rendering items as absolutely positioned elements

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::config::Tuning;
use crate::sim::MoveIntent;

/// Keys that steer left
pub const LEFT_KEYS: [&str; 3] = ["ArrowLeft", "a", "A"];
/// Keys that steer right
pub const RIGHT_KEYS: [&str; 3] = ["ArrowRight", "d", "D"];

/// Apply a key press/release to the held intent. Returns whether the key mattered.
pub fn apply_key(intent: &mut MoveIntent, key: &str, pressed: bool) -> bool {
    if LEFT_KEYS.contains(&key) {
        intent.left = pressed;
        true
    } else if RIGHT_KEYS.contains(&key) {
        intent.right = pressed;
        true
    } else {
        false
    }
}

/// Convert a frame timestamp pair (ms) into a sim delta (s)
///
/// The first frame of a run has no previous timestamp and advances nothing.
pub fn frame_delta(last_ms: Option<f64>, now_ms: f64, max_dt: f32) -> f32 {
    match last_ms {
        Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, max_dt),
        None => 0.0,
    }
}

/// Prepare a new run and only then retire the current one
///
/// A failed `prepare` leaves the current run untouched.
pub fn replace_run<T, E>(
    prepare: impl FnOnce() -> Result<T, E>,
    retire_current: impl FnOnce(),
) -> Result<T, E> {
    let ready = prepare()?;
    retire_current();
    Ok(ready)
}

/// The play-field anchors absolutely positioned children
pub const PLAY_FIELD_POSITION: &str = "relative";

/// Inline styles the player gets at start
///
/// Positioning is always forced; `left`/`top` defaults only fill in what the
/// page has not set inline.
pub fn player_start_styles(
    left_set: bool,
    top_set: bool,
    tuning: &Tuning,
) -> Vec<(&'static str, String)> {
    let mut styles = vec![("position", "absolute".to_string())];
    if !left_set {
        styles.push(("left", format!("{}%", tuning.player_start_x)));
    }
    if !top_set {
        styles.push(("top", format!("{}%", tuning.player_y)));
    }
    styles
}

/// Problems found while checking the score/lives readouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudIssue {
    /// Zero or several elements share the id
    NotUnique { id: String, count: u32 },
    /// Score and lives resolved to the same element
    Aliased,
}

/// HUD checks
///
/// `score_count`/`lives_count` are how many elements carry each id.
pub fn check_hud(
    score_id: &str,
    score_count: u32,
    lives_id: &str,
    lives_count: u32,
    aliased: bool,
) -> Vec<HudIssue> {
    let mut issues = Vec::new();
    if score_count != 1 {
        issues.push(HudIssue::NotUnique {
            id: score_id.to_string(),
            count: score_count,
        });
    }
    if lives_count != 1 {
        issues.push(HudIssue::NotUnique {
            id: lives_id.to_string(),
            count: lives_count,
        });
    }
    if aliased {
        issues.push(HudIssue::Aliased);
    }
    issues
}
