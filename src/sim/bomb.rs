//! Bomb lifecycle
//!
//! Armed -> Exploding -> Removed. The orchestrator moves a bomb to Removed
//! after its blast has been resolved in the same tick.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Stable bomb identity, unique within a match
pub type BombId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombState {
    Armed,
    Exploding,
    Removed,
}

/// A placed bomb
#[derive(Debug, Clone, PartialEq)]
pub struct Bomb {
    pub id: BombId,
    pub pos: IVec2,
    /// Blast reach in cells along each axis
    pub range: i32,
    /// Placing player, `None` for neutral bombs
    pub owner: Option<PlayerId>,
    timer: i32,
    state: BombState,
}

impl Bomb {
    pub fn new(id: BombId, pos: IVec2, timer: i32, range: i32, owner: Option<PlayerId>) -> Self {
        let mut bomb = Self {
            id,
            pos,
            range,
            owner,
            timer,
            state: BombState::Armed,
        };
        bomb.sync_state();
        bomb
    }

    /// Ticks until detonation (may go negative)
    #[inline]
    pub fn timer(&self) -> i32 {
        self.timer
    }

    #[inline]
    pub fn state(&self) -> BombState {
        self.state
    }

    #[inline]
    pub fn is_exploded(&self) -> bool {
        self.timer <= 0
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.state == BombState::Armed
    }

    /// Count down one tick
    pub fn tick(&mut self) {
        if self.state == BombState::Removed {
            return;
        }
        self.timer -= 1;
        self.sync_state();
    }

    /// Detonate now (chain reaction). Never revives a removed bomb.
    pub fn force_explode(&mut self) {
        self.timer = 0;
        if self.state == BombState::Armed {
            self.state = BombState::Exploding;
        }
    }

    /// Blast resolved; the bomb leaves the world
    pub fn mark_removed(&mut self) {
        self.state = BombState::Removed;
    }

    fn sync_state(&mut self) {
        if self.state == BombState::Armed && self.timer <= 0 {
            self.state = BombState::Exploding;
        }
    }
}
