//! Player actors (human or AI-driven)

use glam::IVec2;

use super::ai::{AiPolicy, Difficulty};
use super::bomb::{Bomb, BombId};
use super::bonus::{ActiveBonus, BonusKind};
use super::grid::Grid;
use crate::consts::*;
use crate::is_unit_step;

/// Stable player identity, unique within a match
pub type PlayerId = u32;

/// A player. AI players carry a policy; humans do not.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    pos: IVec2,
    alive: bool,
    lives: u8,
    bomb_range: i32,
    max_bombs: usize,
    /// Timed effects in pickup order
    active_bonuses: Vec<ActiveBonus>,
    /// Decision policy, `None` for human players
    pub(crate) ai: Option<AiPolicy>,
    /// Cached so the flag survives while the policy is checked out
    human: bool,
}

impl Player {
    /// Human player with default stats
    pub fn new(id: PlayerId, pos: IVec2) -> Self {
        Self {
            id,
            pos,
            alive: true,
            lives: START_LIVES,
            bomb_range: START_BOMB_RANGE,
            max_bombs: START_MAX_BOMBS,
            active_bonuses: Vec::new(),
            ai: None,
            human: true,
        }
    }

    /// AI player driven by `policy`
    pub fn with_ai(id: PlayerId, pos: IVec2, policy: AiPolicy) -> Self {
        Self {
            ai: Some(policy),
            human: false,
            ..Self::new(id, pos)
        }
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn lives(&self) -> u8 {
        self.lives
    }

    #[inline]
    pub fn is_human(&self) -> bool {
        self.human
    }

    #[inline]
    pub fn is_ai(&self) -> bool {
        !self.human
    }

    /// Difficulty of the attached policy, if any
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.ai.as_ref().map(AiPolicy::difficulty)
    }

    /// Whether the AI is running from a bomb, `None` for humans
    pub fn is_fleeing(&self) -> Option<bool> {
        self.ai.as_ref().map(AiPolicy::is_fleeing)
    }

    #[inline]
    pub fn bomb_range(&self) -> i32 {
        self.bomb_range
    }

    pub fn set_bomb_range(&mut self, range: i32) {
        self.bomb_range = range.max(0);
    }

    #[inline]
    pub fn max_bombs(&self) -> usize {
        self.max_bombs
    }

    pub fn set_max_bombs(&mut self, max_bombs: usize) {
        self.max_bombs = max_bombs;
    }

    pub fn active_bonuses(&self) -> &[ActiveBonus] {
        &self.active_bonuses
    }

    /// Dies outright
    pub fn kill(&mut self) {
        self.lives = 0;
        self.alive = false;
    }

    /// Lose one life; the last one kills
    pub fn take_damage(&mut self) {
        if self.lives > 0 {
            self.lives -= 1;
            if self.lives == 0 {
                self.alive = false;
            }
        }
    }

    pub fn add_life(&mut self) {
        if self.alive {
            self.lives = self.lives.saturating_add(1);
        }
    }

    /// Step by (dx, dy) if it is a single axis step onto an empty in-bounds cell.
    /// Returns whether the player moved.
    pub fn try_move(&mut self, dx: i32, dy: i32, grid: &Grid) -> bool {
        let delta = IVec2::new(dx, dy);
        if !self.alive || !is_unit_step(delta) {
            return false;
        }
        let dest = self.pos + delta;
        if grid.get(dest).is_some_and(|c| c.is_walkable()) {
            self.pos = dest;
            true
        } else {
            false
        }
    }

    /// Create a bomb at the current cell unless `live_bombs` already reaches the cap
    pub fn drop_bomb(&self, id: BombId, timer: i32, live_bombs: usize) -> Option<Bomb> {
        if !self.alive || live_bombs >= self.max_bombs {
            return None;
        }
        Some(Bomb::new(id, self.pos, timer, self.bomb_range, Some(self.id)))
    }

    /// Advance every active bonus by `dt` seconds and drop the expired ones.
    /// An expiring Flame gives back exactly the range it granted.
    pub fn update_active_bonuses(&mut self, dt: f32) {
        let mut range = self.bomb_range;
        self.active_bonuses.retain_mut(|ab| {
            ab.tick(dt);
            if !ab.is_expired() {
                return true;
            }
            if ab.kind() == BonusKind::Flame {
                range = (range - ab.extra_value()).max(0);
            }
            false
        });
        self.bomb_range = range;
    }

    pub fn add_flame_bonus(&mut self, extra_range: i32, duration: f32) {
        self.bomb_range += extra_range;
        self.active_bonuses.push(ActiveBonus::new(BonusKind::Flame, extra_range, duration));
    }

    pub fn add_jacket_bonus(&mut self, duration: f32) {
        self.active_bonuses.push(ActiveBonus::new(BonusKind::Jacket, 0, duration));
    }

    /// True while any unexpired Jacket is active
    pub fn is_invincible_to_bombs(&self) -> bool {
        self.active_bonuses
            .iter()
            .any(|ab| ab.kind() == BonusKind::Jacket && !ab.is_expired())
    }
}
