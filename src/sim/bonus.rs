//! World pickups and the timed effects they leave on players

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::consts::MAX_LIVES;

/// Pickup / effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    Flame,
    Jacket,
    Life,
}

impl BonusKind {
    pub const ALL: [BonusKind; 3] = [BonusKind::Flame, BonusKind::Jacket, BonusKind::Life];

    pub fn as_str(&self) -> &'static str {
        match self {
            BonusKind::Flame => "Flame",
            BonusKind::Jacket => "Jacket",
            BonusKind::Life => "Life",
        }
    }
}

/// A timed effect currently applied to a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBonus {
    kind: BonusKind,
    /// Magnitude (extra range for Flame, unused otherwise)
    extra_value: i32,
    seconds_remaining: f32,
}

impl ActiveBonus {
    pub fn new(kind: BonusKind, extra_value: i32, duration_seconds: f32) -> Self {
        Self {
            kind,
            extra_value,
            seconds_remaining: duration_seconds,
        }
    }

    #[inline]
    pub fn kind(&self) -> BonusKind {
        self.kind
    }

    #[inline]
    pub fn extra_value(&self) -> i32 {
        self.extra_value
    }

    #[inline]
    pub fn seconds_remaining(&self) -> f32 {
        self.seconds_remaining
    }

    /// Consume `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.seconds_remaining -= dt;
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.seconds_remaining <= 0.0
    }
}

/// What a pickup does when collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BonusEffect {
    /// +`extra_range` bomb range for `duration` seconds
    Flame { extra_range: i32, duration: f32 },
    /// Blast immunity for `duration` seconds
    Jacket { duration: f32 },
    /// One life, up to the cap
    Life,
}

impl BonusEffect {
    pub fn kind(&self) -> BonusKind {
        match self {
            BonusEffect::Flame { .. } => BonusKind::Flame,
            BonusEffect::Jacket { .. } => BonusKind::Jacket,
            BonusEffect::Life => BonusKind::Life,
        }
    }
}

/// A pickup lying on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u32,
    pub pos: IVec2,
    pub effect: BonusEffect,
    collected: bool,
}

impl Bonus {
    pub fn new(id: u32, pos: IVec2, effect: BonusEffect) -> Self {
        Self {
            id,
            pos,
            effect,
            collected: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> BonusKind {
        self.effect.kind()
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Apply the pickup to `player`.
    ///
    /// Flame and Jacket only take effect once. Life is consumed on touch even
    /// when the player is already at the life cap.
    pub fn apply_to(&mut self, player: &mut Player) {
        match self.effect {
            BonusEffect::Flame {
                extra_range,
                duration,
            } => {
                if !self.collected {
                    player.add_flame_bonus(extra_range, duration);
                    self.collected = true;
                }
            }
            BonusEffect::Jacket { duration } => {
                if !self.collected {
                    player.add_jacket_bonus(duration);
                    self.collected = true;
                }
            }
            BonusEffect::Life => {
                if player.lives() < MAX_LIVES {
                    player.add_life();
                }
                self.collected = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(1, IVec2::new(1, 1))
    }

    #[test]
    fn test_active_bonus_expiry() {
        let mut ab = ActiveBonus::new(BonusKind::Flame, 1, 1.0);
        assert_eq!(ab.kind(), BonusKind::Flame);
        assert_eq!(ab.extra_value(), 1);
        assert!(!ab.is_expired());
        ab.tick(0.5);
        assert!(!ab.is_expired());
        ab.tick(0.5);
        assert!(ab.is_expired());
        // Keeps going below zero
        ab.tick(1.0);
        assert!(ab.is_expired());
    }

    #[test]
    fn test_zero_duration_is_expired() {
        let ab = ActiveBonus::new(BonusKind::Jacket, 0, 0.0);
        assert!(ab.is_expired());
    }

    #[test]
    fn test_flame_pickup_and_revert() {
        let mut p = player();
        let before = p.bomb_range();
        let mut bonus = Bonus::new(
            1,
            p.pos(),
            BonusEffect::Flame {
                extra_range: 2,
                duration: 1.0,
            },
        );
        bonus.apply_to(&mut p);
        assert!(bonus.is_collected());
        assert_eq!(p.bomb_range(), before + 2);

        // Second application is ignored
        bonus.apply_to(&mut p);
        assert_eq!(p.bomb_range(), before + 2);

        p.update_active_bonuses(0.5);
        assert_eq!(p.bomb_range(), before + 2);
        p.update_active_bonuses(0.5);
        assert_eq!(p.bomb_range(), before);
        assert!(p.active_bonuses().is_empty());
    }

    #[test]
    fn test_jacket_pickup() {
        let mut p = player();
        let mut bonus = Bonus::new(1, p.pos(), BonusEffect::Jacket { duration: 1.0 });
        assert!(!p.is_invincible_to_bombs());
        bonus.apply_to(&mut p);
        assert!(bonus.is_collected());
        assert!(p.is_invincible_to_bombs());

        p.update_active_bonuses(1.0);
        assert!(!p.is_invincible_to_bombs());
    }

    #[test]
    fn test_life_pickup_below_cap() {
        let mut p = player();
        p.take_damage();
        assert_eq!(p.lives(), 2);
        let mut bonus = Bonus::new(1, p.pos(), BonusEffect::Life);
        bonus.apply_to(&mut p);
        assert_eq!(p.lives(), 3);
        assert!(bonus.is_collected());
    }

    #[test]
    fn test_life_pickup_at_cap_is_consumed() {
        let mut p = player();
        assert_eq!(p.lives(), MAX_LIVES);
        let mut bonus = Bonus::new(1, p.pos(), BonusEffect::Life);
        bonus.apply_to(&mut p);
        assert_eq!(p.lives(), MAX_LIVES);
        assert!(bonus.is_collected());
    }

    #[test]
    fn test_effect_kind() {
        assert_eq!(BonusEffect::Life.kind(), BonusKind::Life);
        assert_eq!(BonusEffect::Jacket { duration: 1.0 }.kind(), BonusKind::Jacket);
        assert_eq!(BonusKind::Flame.as_str(), "Flame");
    }
}
