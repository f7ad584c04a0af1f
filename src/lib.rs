//! Bomber Sim - tick-driven Bomberman simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, bombs, blasts, players, bonuses, AI)
//! - `settings`: Match configuration loaded from JSON
//!
//! Rendering, input wiring and level files live outside this crate. Callers
//! push intents (`move_player`, `place_bomb`) and read state once per frame.

pub mod settings;
pub mod sim;

pub use settings::{MatchSettings, SettingsError};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks before a freshly placed bomb detonates
    pub const DEFAULT_TIMER: i32 = 6;
    /// Ticks an explosion cell stays visible before reverting to empty
    pub const EXPLOSION_TICKS: u32 = 2;
    /// Seconds of bonus time consumed per simulation tick
    pub const TICK_SECONDS: f32 = 0.5;

    /// Player defaults
    pub const MAX_LIVES: u8 = 3;
    pub const START_LIVES: u8 = 3;
    pub const START_BOMB_RANGE: i32 = 1;
    pub const START_MAX_BOMBS: usize = 1;

    /// Bonus tuning
    pub const BONUS_DROP_CHANCE: f32 = 0.3;
    pub const FLAME_EXTRA_RANGE: i32 = 1;
    pub const FLAME_DURATION: f32 = 10.0;
    pub const JACKET_DURATION: f32 = 20.0;

    /// Procedural grid: chance an open interior cell becomes a destructible wall
    pub const DESTRUCTIBLE_CHANCE: f32 = 0.2;
    pub const MIN_GRID_SIDE: i32 = 5;
    pub const MAX_GRID_SIDE: i32 = 255;
    pub const DEFAULT_GRID_WIDTH: i32 = 15;
    pub const DEFAULT_GRID_HEIGHT: i32 = 13;
    pub const MAX_PLAYERS: usize = 4;

    /// AI behaviour probabilities (per tick)
    pub const EASY_IDLE_CHANCE: f64 = 0.3;
    pub const EASY_BOMB_CHANCE: f64 = 0.2;
    pub const NORMAL_BOMB_CHANCE: f64 = 0.12;
    /// Chance HARD bombs even when no escape route was found
    pub const HARD_RECKLESS_CHANCE: f64 = 0.08;
    /// Manhattan distance at which HARD stops approaching and bombs
    pub const HARD_ENGAGE_DISTANCE: i32 = 2;

    /// Headless runner safety cap
    pub const MAX_MATCH_TICKS: u64 = 20_000;
}

/// The four axis-aligned unit steps, in the order the AI tries them
pub const STEPS: [IVec2; 4] = [
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
];

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// True for a single step along one axis
#[inline]
pub fn is_unit_step(delta: IVec2) -> bool {
    delta.x.abs() + delta.y.abs() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::new(1, 1), IVec2::new(4, 3)), 5);
        assert_eq!(manhattan(IVec2::new(4, 3), IVec2::new(1, 1)), 5);
        assert_eq!(manhattan(IVec2::ZERO, IVec2::ZERO), 0);
    }

    #[test]
    fn test_unit_step() {
        assert!(is_unit_step(IVec2::new(1, 0)));
        assert!(is_unit_step(IVec2::new(0, -1)));
        assert!(!is_unit_step(IVec2::new(1, 1)));
        assert!(!is_unit_step(IVec2::ZERO));
        assert!(!is_unit_step(IVec2::new(2, 0)));
    }
}
