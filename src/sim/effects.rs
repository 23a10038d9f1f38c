//! Timed power-up effects
//!
//! Each effect keeps an absolute expiry on the simulation clock instead of a
//! platform timer. Re-activating an effect moves its expiry to
//! `now + duration`; durations never stack.

use serde::{Deserialize, Serialize};

/// The three timed effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Absorbs the next common-negative hit
    Shield,
    /// Slows everything that falls
    SlowFall,
    /// Faster lateral movement
    SpeedBoost,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [
        EffectKind::Shield,
        EffectKind::SlowFall,
        EffectKind::SpeedBoost,
    ];
}

/// Active effect state; `None` means neutral
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    shield_expires_at: Option<f32>,
    slow_expires_at: Option<f32>,
    speed_expires_at: Option<f32>,
    slow_multiplier: f32,
    speed_multiplier: f32,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: EffectKind) -> &mut Option<f32> {
        match kind {
            EffectKind::Shield => &mut self.shield_expires_at,
            EffectKind::SlowFall => &mut self.slow_expires_at,
            EffectKind::SpeedBoost => &mut self.speed_expires_at,
        }
    }

    /// Expiry time of an active effect
    pub fn expires_at(&self, kind: EffectKind) -> Option<f32> {
        match kind {
            EffectKind::Shield => self.shield_expires_at,
            EffectKind::SlowFall => self.slow_expires_at,
            EffectKind::SpeedBoost => self.speed_expires_at,
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.expires_at(kind).is_some()
    }

    pub fn shield_on(&self) -> bool {
        self.is_active(EffectKind::Shield)
    }

    /// Multiplier applied to fall speed (1 when neutral)
    pub fn fall_multiplier(&self) -> f32 {
        if self.slow_expires_at.is_some() {
            self.slow_multiplier
        } else {
            1.0
        }
    }

    /// Multiplier applied to lateral speed (1 when neutral)
    pub fn speed_multiplier(&self) -> f32 {
        if self.speed_expires_at.is_some() {
            self.speed_multiplier
        } else {
            1.0
        }
    }

    pub fn activate_shield(&mut self, now: f32, duration: f32) {
        *self.slot(EffectKind::Shield) = Some(now + duration);
    }

    pub fn activate_slow(&mut self, now: f32, duration: f32, multiplier: f32) {
        self.slow_multiplier = multiplier;
        *self.slot(EffectKind::SlowFall) = Some(now + duration);
    }

    pub fn activate_speed(&mut self, now: f32, duration: f32, multiplier: f32) {
        self.speed_multiplier = multiplier;
        *self.slot(EffectKind::SpeedBoost) = Some(now + duration);
    }

    /// Drop the shield immediately (absorbed a hit). Returns whether it was up.
    pub fn consume_shield(&mut self) -> bool {
        self.shield_expires_at.take().is_some()
    }

    /// Revert every effect whose expiry has been reached
    ///
    /// Returns the kinds that just expired, in `EffectKind::ALL` order.
    pub fn expire(&mut self, now: f32) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in EffectKind::ALL {
            let slot = self.slot(kind);
            if (*slot).is_some_and(|at| now >= at) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    /// Back to neutral
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_defaults() {
        let effects = ActiveEffects::new();
        assert!(!effects.shield_on());
        assert_eq!(effects.fall_multiplier(), 1.0);
        assert_eq!(effects.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_effect_expires_after_duration() {
        let mut effects = ActiveEffects::new();
        effects.activate_slow(1.0, 5.0, 0.5);
        assert_eq!(effects.fall_multiplier(), 0.5);

        assert!(effects.expire(5.9).is_empty());
        assert_eq!(effects.fall_multiplier(), 0.5);

        assert_eq!(effects.expire(6.0), vec![EffectKind::SlowFall]);
        assert_eq!(effects.fall_multiplier(), 1.0);
    }

    #[test]
    fn test_reactivation_resets_expiry() {
        let mut effects = ActiveEffects::new();
        effects.activate_shield(0.0, 5.0);
        effects.activate_shield(3.0, 5.0);
        assert_eq!(effects.expires_at(EffectKind::Shield), Some(8.0));

        assert!(effects.expire(5.0).is_empty());
        assert!(effects.shield_on());
        assert_eq!(effects.expire(8.0), vec![EffectKind::Shield]);
        assert!(!effects.shield_on());
    }

    #[test]
    fn test_consume_shield() {
        let mut effects = ActiveEffects::new();
        assert!(!effects.consume_shield());
        effects.activate_shield(0.0, 5.0);
        assert!(effects.consume_shield());
        assert!(!effects.shield_on());
        // Nothing pending after consumption
        assert!(effects.expire(100.0).is_empty());
    }

    #[test]
    fn test_effects_are_independent() {
        let mut effects = ActiveEffects::new();
        effects.activate_speed(0.0, 5.0, 1.5);
        effects.activate_slow(2.0, 5.0, 0.5);
        assert_eq!(effects.expire(5.0), vec![EffectKind::SpeedBoost]);
        assert_eq!(effects.speed_multiplier(), 1.0);
        assert_eq!(effects.fall_multiplier(), 0.5);
    }
}
