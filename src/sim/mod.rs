//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick only, driven by the caller
//! - Seeded RNG only (world drops and one stream per AI)
//! - Stable iteration order (players in spawn order, bombs in placement order)
//! - No rendering, input or file dependencies

pub mod ai;
pub mod blast;
pub mod bomb;
pub mod bonus;
pub mod grid;
pub mod player;
pub mod state;
pub mod tick;

pub use ai::{AiPolicy, Arena, Difficulty, can_escape_after_bomb, find_safe_path, nearest_opponent};
pub use blast::{
    BlastCell, Direction, ExplosionCell, ExplosionPart, blast_covers, blast_shape, danger_level,
};
pub use bomb::{Bomb, BombId, BombState};
pub use bonus::{ActiveBonus, Bonus, BonusEffect, BonusKind};
pub use grid::{CellType, Grid, LayoutError};
pub use player::{Player, PlayerId};
pub use state::{GamePhase, GameState, MatchOutcome};
pub use tick::{Intent, TickInput, tick};
