//! Game state and match setup
//!
//! `GameState` is the only writer of the grid and the entity lists. Players
//! and AI policies read it and go through the intent methods below.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::{AiPolicy, Arena, Difficulty};
use super::blast::{Direction, ExplosionCell};
use super::bomb::{Bomb, BombId, BombState};
use super::bonus::{Bonus, BonusEffect};
use super::grid::{CellType, Grid};
use super::player::{Player, PlayerId};
use crate::settings::{MatchSettings, SettingsError};

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// At most one player left
    GameOver,
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner { id: PlayerId, human: bool },
    /// Nobody survived
    Draw,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Winner { id, human: true } => write!(f, "Player {id} wins!"),
            MatchOutcome::Winner { id, human: false } => write!(f, "AI {id} wins!"),
            MatchOutcome::Draw => write!(f, "It's a tie!"),
        }
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub(crate) settings: MatchSettings,
    pub(crate) grid: Grid,
    /// Players in spawn order
    pub(crate) players: Vec<Player>,
    /// Live bombs in placement order
    pub(crate) bombs: Vec<Bomb>,
    /// Uncollected pickups
    pub(crate) bonuses: Vec<Bonus>,
    /// Explosion markers, indexed like the grid
    pub(crate) explosions: Vec<Option<ExplosionCell>>,
    /// World RNG (bonus drops)
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Set up a match: build the arena, then spawn humans and AIs in the corners
    pub fn new(settings: &MatchSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let grid = match &settings.layout {
            Some(layout) => Grid::from_layout(layout)?,
            None => Grid::generate(
                settings.width,
                settings.height,
                settings.destructible_chance,
                &mut rng,
            ),
        };

        let mut state = Self::with_grid(grid, settings.clone());
        state.rng = rng;

        let spawns = state.spawn_points();
        for (i, &pos) in spawns.iter().take(settings.player_count()).enumerate() {
            state.clear_spawn(pos);
            if i < settings.humans {
                state.add_human(pos);
            } else {
                state.add_ai(pos, settings.difficulty);
            }
        }

        log::info!(
            "Match start: {}x{} grid, {} human(s), {} AI(s) on {}, seed {}",
            state.grid.width(),
            state.grid.height(),
            settings.humans,
            settings.ais,
            settings.difficulty.as_str(),
            settings.seed
        );
        Ok(state)
    }

    /// Empty match on a prepared grid; add players with `add_human` / `add_ai`.
    /// Settings are taken as given.
    pub fn with_grid(grid: Grid, settings: MatchSettings) -> Self {
        Self {
            seed: settings.seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            rng: Pcg32::seed_from_u64(settings.seed),
            explosions: vec![None; grid.len()],
            settings,
            grid,
            players: Vec::new(),
            bombs: Vec::new(),
            bonuses: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (bombs and bonuses)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn next_player_id(&self) -> PlayerId {
        self.players.iter().map(Player::id).max().unwrap_or(0) + 1
    }

    /// Inner corners, in spawn order
    fn spawn_points(&self) -> [IVec2; 4] {
        let (w, h) = (self.grid.width(), self.grid.height());
        [
            IVec2::new(1, 1),
            IVec2::new(w - 2, h - 2),
            IVec2::new(w - 2, 1),
            IVec2::new(1, h - 2),
        ]
    }

    /// Open the spawn cell and knock out destructible walls on its two inward neighbours
    fn clear_spawn(&mut self, pos: IVec2) {
        let inward_x = if pos.x < self.grid.width() / 2 { 1 } else { -1 };
        let inward_y = if pos.y < self.grid.height() / 2 { 1 } else { -1 };

        self.grid.set(pos, CellType::Empty);
        for cell in [pos + IVec2::new(inward_x, 0), pos + IVec2::new(0, inward_y)] {
            if self.grid.get(cell) == Some(CellType::Destructible) {
                self.grid.set(cell, CellType::Empty);
            }
        }
    }

    pub fn add_human(&mut self, pos: IVec2) -> PlayerId {
        let id = self.next_player_id();
        self.players.push(Player::new(id, pos));
        id
    }

    pub fn add_ai(&mut self, pos: IVec2, difficulty: Difficulty) -> PlayerId {
        let id = self.next_player_id();
        // Each AI gets its own stream so adding players does not reshuffle the others
        let seed = self.seed.wrapping_add((id as u64).wrapping_mul(2654435761));
        self.players.push(Player::with_ai(id, pos, AiPolicy::new(difficulty, seed)));
        id
    }

    /// Put a pickup on the grid
    pub fn add_bonus(&mut self, pos: IVec2, effect: BonusEffect) -> u32 {
        let id = self.next_entity_id();
        self.bonuses.push(Bonus::new(id, pos, effect));
        id
    }

    // === Read accessors ===

    #[inline]
    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Direct access for scenario setup (stats, kills)
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    #[inline]
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    #[inline]
    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    /// Explosion marker at `pos`, if one is showing
    pub fn explosion_at(&self, pos: IVec2) -> Option<ExplosionCell> {
        self.grid.index(pos).and_then(|i| self.explosions[i])
    }

    /// Every explosion marker with its cell, row-major
    pub fn explosion_cells(&self) -> impl Iterator<Item = (IVec2, ExplosionCell)> + '_ {
        let width = self.grid.width();
        self.explosions.iter().enumerate().filter_map(move |(i, cell)| {
            let i = i as i32;
            cell.map(|c| (IVec2::new(i % width, i / width), c))
        })
    }

    /// Bombs `id` has on the grid that have not gone off yet
    pub fn live_bombs_of(&self, id: PlayerId) -> usize {
        self.bombs
            .iter()
            .filter(|b| b.owner == Some(id) && b.state() != BombState::Removed)
            .count()
    }

    // === Intents ===

    /// Move one cell. Rejected moves are a no-op returning false.
    pub fn move_player(&mut self, id: PlayerId, dx: i32, dy: i32) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id() == id) else {
            return false;
        };
        self.players[index].try_move(dx, dy, &self.grid)
    }

    pub fn move_in(&mut self, id: PlayerId, direction: Direction) -> bool {
        let step = direction.offset();
        self.move_player(id, step.x, step.y)
    }

    /// Drop a bomb under the player. `None` when dead, at the bomb cap, or
    /// already standing on a bomb.
    pub fn place_bomb(&mut self, id: PlayerId) -> Option<BombId> {
        let live = self.live_bombs_of(id);
        let player = self.player(id)?;
        if self.bombs.iter().any(|b| b.pos == player.pos()) {
            return None;
        }
        let bomb = player.drop_bomb(self.next_id, self.settings.bomb_timer, live)?;
        self.next_entity_id();

        log::debug!("Player {id} placed bomb {} at {}", bomb.id, bomb.pos);
        self.grid.set(bomb.pos, CellType::Bomb);
        let bomb_id = bomb.id;
        self.bombs.push(bomb);
        Some(bomb_id)
    }

    // === Outcome ===

    /// At most one player is still alive
    pub fn is_game_over(&self) -> bool {
        self.players.iter().filter(|p| p.is_alive()).count() <= 1
    }

    /// The sole survivor of a finished match
    pub fn winner(&self) -> Option<&Player> {
        if !self.is_game_over() {
            return None;
        }
        self.players.iter().find(|p| p.is_alive())
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.is_game_over() {
            return None;
        }
        Some(match self.winner() {
            Some(p) => MatchOutcome::Winner {
                id: p.id(),
                human: p.is_human(),
            },
            None => MatchOutcome::Draw,
        })
    }
}

impl Arena for GameState {
    fn grid(&self) -> &Grid {
        GameState::grid(self)
    }

    fn bombs(&self) -> &[Bomb] {
        GameState::bombs(self)
    }

    fn players(&self) -> &[Player] {
        GameState::players(self)
    }

    fn bomb_timer(&self) -> i32 {
        self.settings.bomb_timer
    }

    fn move_player(&mut self, id: PlayerId, dx: i32, dy: i32) -> bool {
        GameState::move_player(self, id, dx, dy)
    }

    fn place_bomb(&mut self, id: PlayerId) -> Option<BombId> {
        GameState::place_bomb(self, id)
    }
}
