//! Match configuration
//!
//! Loaded from JSON by the surrounding application. Every field has a
//! default, so partial documents are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Difficulty, Grid, LayoutError};

/// Reasons a configuration cannot start a match
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Layout(LayoutError),
    Invalid(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "cannot read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "malformed settings: {e}"),
            SettingsError::Layout(e) => write!(f, "invalid level layout: {e}"),
            SettingsError::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Layout(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl From<LayoutError> for SettingsError {
    fn from(e: LayoutError) -> Self {
        SettingsError::Layout(e)
    }
}

/// Everything needed to set up one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    // === Arena ===
    /// Grid size for procedural arenas (ignored when `layout` is set)
    pub width: i32,
    pub height: i32,
    /// Level matrix, `layout[y][x]` with 0 = empty, 1 = indestructible, 2 = destructible
    pub layout: Option<Vec<Vec<u8>>>,
    /// Run seed for reproducibility
    pub seed: u64,

    // === Players ===
    pub humans: usize,
    pub ais: usize,
    pub difficulty: Difficulty,

    // === Rules ===
    /// Ticks before a placed bomb detonates
    pub bomb_timer: i32,
    /// Ticks an explosion stays on the grid
    pub explosion_ticks: u32,
    /// Chance a destroyed wall drops a bonus
    pub bonus_drop_chance: f32,
    /// Chance an open procedural cell starts as a destructible wall
    pub destructible_chance: f32,
    pub flame_extra_range: i32,
    /// Seconds
    pub flame_duration: f32,
    /// Seconds
    pub jacket_duration: f32,
    /// Seconds of bonus time consumed per tick
    pub tick_seconds: f32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            layout: None,
            seed: 0,

            humans: 1,
            ais: 3,
            difficulty: Difficulty::Easy,

            bomb_timer: DEFAULT_TIMER,
            explosion_ticks: EXPLOSION_TICKS,
            bonus_drop_chance: BONUS_DROP_CHANCE,
            destructible_chance: DESTRUCTIBLE_CHANCE,
            flame_extra_range: FLAME_EXTRA_RANGE,
            flame_duration: FLAME_DURATION,
            jacket_duration: JACKET_DURATION,
            tick_seconds: TICK_SECONDS,
        }
    }
}

impl MatchSettings {
    /// AI-only match (demo / headless runs)
    pub fn ai_only(ais: usize, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            humans: 0,
            ais,
            difficulty,
            seed,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded match settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Total player count
    #[inline]
    pub fn player_count(&self) -> usize {
        self.humans + self.ais
    }

    /// Check every value a match relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let players = self.player_count();
        if players == 0 || players > MAX_PLAYERS {
            return Err(SettingsError::Invalid(format!(
                "need between 1 and {MAX_PLAYERS} players, got {players}"
            )));
        }

        let (width, height) = match &self.layout {
            Some(layout) => {
                let grid = Grid::from_layout(layout)?;
                (grid.width(), grid.height())
            }
            None => (self.width, self.height),
        };
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(SettingsError::Invalid(format!(
                "grid {width}x{height} is smaller than {MIN_GRID_SIDE}x{MIN_GRID_SIDE}"
            )));
        }
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
            return Err(SettingsError::Invalid(format!(
                "grid {width}x{height} is larger than {MAX_GRID_SIDE}x{MAX_GRID_SIDE}"
            )));
        }

        if self.bomb_timer < 1 {
            return Err(SettingsError::Invalid("bomb_timer must be at least 1".into()));
        }
        if self.explosion_ticks < 1 {
            return Err(SettingsError::Invalid("explosion_ticks must be at least 1".into()));
        }
        for (name, p) in [
            ("bonus_drop_chance", self.bonus_drop_chance),
            ("destructible_chance", self.destructible_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SettingsError::Invalid(format!("{name} must be within 0..=1, got {p}")));
            }
        }
        if self.flame_extra_range < 0 || self.flame_duration < 0.0 || self.jacket_duration < 0.0 {
            return Err(SettingsError::Invalid("bonus magnitudes must not be negative".into()));
        }
        if self.tick_seconds <= 0.0 {
            return Err(SettingsError::Invalid("tick_seconds must be positive".into()));
        }
        Ok(())
    }
}
