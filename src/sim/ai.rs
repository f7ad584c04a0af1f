//! AI decision policies
//!
//! A policy is attached to an AI player and consulted once per tick. It reads
//! the grid and bombs and acts only through the same intents a human uses
//! (`move_player`, `place_bomb`). Every search failure degrades to the next
//! behaviour down the list, ending in a no-op.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blast::danger_level;
use super::bomb::{Bomb, BombId};
use super::grid::{CellType, Grid};
use super::player::{Player, PlayerId};
use crate::consts::*;
use crate::{STEPS, manhattan};

/// AI difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    #[serde(alias = "medium")]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Menu index (0 = Easy, 1 = Normal, 2 = Hard)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }
}

/// What a policy may see and do
pub trait Arena {
    fn grid(&self) -> &Grid;
    fn bombs(&self) -> &[Bomb];
    fn players(&self) -> &[Player];
    /// Timer given to newly placed bombs
    fn bomb_timer(&self) -> i32;
    fn move_player(&mut self, id: PlayerId, dx: i32, dy: i32) -> bool;
    fn place_bomb(&mut self, id: PlayerId) -> Option<BombId>;
}

/// Per-player decision state
#[derive(Debug, Clone)]
pub struct AiPolicy {
    difficulty: Difficulty,
    rng: Pcg32,
    /// Set after bombing until the AI stands on a safe cell
    fleeing: bool,
    /// Most recent bomb this AI placed
    last_bomb: Option<BombId>,
}

impl AiPolicy {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: Pcg32::seed_from_u64(seed),
            fleeing: false,
            last_bomb: None,
        }
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    pub fn is_fleeing(&self) -> bool {
        self.fleeing
    }

    /// Run one tick of decisions for player `me`
    pub fn think<A: Arena>(&mut self, arena: &mut A, me: PlayerId) {
        let Some(pos) = alive_position(arena, me) else {
            return;
        };
        match self.difficulty {
            Difficulty::Easy => self.think_easy(arena, me),
            Difficulty::Normal => self.think_normal(arena, me, pos),
            Difficulty::Hard => self.think_hard(arena, me, pos),
        }
    }

    fn think_easy<A: Arena>(&mut self, arena: &mut A, me: PlayerId) {
        // Reaction delay
        if self.rng.random_bool(EASY_IDLE_CHANCE) {
            return;
        }
        if self.rng.random_bool(EASY_BOMB_CHANCE) {
            self.try_bomb(arena, me);
        }
        if self.fleeing {
            self.flee_step(arena, me);
            return;
        }
        self.step_random_safe(arena, me);
    }

    fn think_normal<A: Arena>(&mut self, arena: &mut A, me: PlayerId, pos: IVec2) {
        if self.fleeing && self.flee_step(arena, me) {
            return;
        }
        if self.danger(arena, pos, false).is_some() {
            self.fleeing = true;
            self.flee_step(arena, me);
            return;
        }
        if self.rng.random_bool(NORMAL_BOMB_CHANCE) && self.try_bomb(arena, me) {
            self.flee_step(arena, me);
            return;
        }
        self.step_random_safe(arena, me);
    }

    fn think_hard<A: Arena>(&mut self, arena: &mut A, me: PlayerId, pos: IVec2) {
        if self.fleeing && self.flee_step(arena, me) {
            return;
        }
        if self.danger(arena, pos, false).is_some() {
            self.fleeing = true;
            self.flee_step(arena, me);
            return;
        }

        if let Some(target) = nearest_opponent(arena.players(), me, pos) {
            if manhattan(pos, target) <= HARD_ENGAGE_DISTANCE {
                if !has_bomb_at(arena.bombs(), pos)
                    && self.bomb_gate(arena, me, pos)
                    && self.try_bomb(arena, me)
                {
                    log::trace!("AI {me} bombs near target at {target}");
                    self.flee_step(arena, me);
                }
                return;
            }

            let next = find_safe_path(arena.grid(), arena.bombs(), pos, target)
                .and_then(|path| path.first().copied());
            if let Some(next) = next {
                let delta = next - pos;
                if arena.move_player(me, delta.x, delta.y) {
                    return;
                }
                // Blocked by a wall on the path: blow it up
                if arena.grid().get(next) == Some(CellType::Destructible)
                    && !has_bomb_at(arena.bombs(), pos)
                    && self.bomb_gate(arena, me, pos)
                    && self.try_bomb(arena, me)
                {
                    self.flee_step(arena, me);
                }
                return;
            }
        }

        if self.bomb_adjacent_wall(arena, me, pos) {
            self.flee_step(arena, me);
            return;
        }
        self.step_random_safe(arena, me);
    }

    fn danger<A: Arena>(&self, arena: &A, pos: IVec2, ignore_own: bool) -> Option<i32> {
        let ignore = if ignore_own { self.last_bomb } else { None };
        danger_level(arena.grid(), arena.bombs(), pos, ignore)
    }

    /// Walkable neighbour steps with no danger
    fn safe_steps<A: Arena>(&self, arena: &A, pos: IVec2, ignore_own: bool) -> Vec<IVec2> {
        STEPS
            .into_iter()
            .filter(|&step| {
                let next = pos + step;
                arena.grid().get(next).is_some_and(CellType::is_walkable)
                    && self.danger(arena, next, ignore_own).is_none()
            })
            .collect()
    }

    fn try_bomb<A: Arena>(&mut self, arena: &mut A, me: PlayerId) -> bool {
        match arena.place_bomb(me) {
            Some(id) => {
                self.last_bomb = Some(id);
                self.fleeing = true;
                true
            }
            None => false,
        }
    }

    /// Escape check with a small chance of bombing anyway
    fn bomb_gate<A: Arena>(&mut self, arena: &A, me: PlayerId, pos: IVec2) -> bool {
        let range = arena
            .players()
            .iter()
            .find(|p| p.id() == me)
            .map(Player::bomb_range)
            .unwrap_or(START_BOMB_RANGE);
        can_escape_after_bomb(arena.grid(), arena.bombs(), pos, range, arena.bomb_timer())
            || self.rng.random_bool(HARD_RECKLESS_CHANCE)
    }

    fn bomb_adjacent_wall<A: Arena>(&mut self, arena: &mut A, me: PlayerId, pos: IVec2) -> bool {
        let wall_adjacent = STEPS
            .iter()
            .any(|&step| arena.grid().get(pos + step) == Some(CellType::Destructible));
        wall_adjacent
            && !has_bomb_at(arena.bombs(), pos)
            && self.bomb_gate(arena, me, pos)
            && self.try_bomb(arena, me)
    }

    fn step_random_safe<A: Arena>(&mut self, arena: &mut A, me: PlayerId) -> bool {
        let Some(pos) = alive_position(arena, me) else {
            return false;
        };
        let choices = self.safe_steps(arena, pos, false);
        if choices.is_empty() {
            return false;
        }
        let step = choices[self.rng.random_range(0..choices.len())];
        arena.move_player(me, step.x, step.y)
    }

    /// One step away from danger. Returns false when the current cell was
    /// already safe, which also ends the flee state.
    fn flee_step<A: Arena>(&mut self, arena: &mut A, me: PlayerId) -> bool {
        let Some(pos) = alive_position(arena, me) else {
            self.fleeing = false;
            return false;
        };
        if self.danger(arena, pos, false).is_none() {
            self.fleeing = false;
            return false;
        }

        let mut choices = self.safe_steps(arena, pos, false);
        if choices.is_empty() {
            // Cells only our own fresh bomb threatens
            choices = self.safe_steps(arena, pos, true);
        }

        let step = if choices.is_empty() {
            // Least risky: the neighbour whose blast comes last
            STEPS
                .into_iter()
                .filter(|&step| arena.grid().get(pos + step).is_some_and(CellType::is_walkable))
                .max_by_key(|&step| self.danger(arena, pos + step, false).unwrap_or(i32::MAX))
        } else {
            Some(choices[self.rng.random_range(0..choices.len())])
        };

        if let Some(step) = step {
            arena.move_player(me, step.x, step.y);
        }

        let now_safe =
            alive_position(arena, me).is_some_and(|now| self.danger(arena, now, false).is_none());
        if now_safe {
            self.fleeing = false;
        }
        true
    }
}

fn alive_position<A: Arena>(arena: &A, me: PlayerId) -> Option<IVec2> {
    arena
        .players()
        .iter()
        .find(|p| p.id() == me && p.is_alive())
        .map(Player::pos)
}

fn has_bomb_at(bombs: &[Bomb], pos: IVec2) -> bool {
    bombs.iter().any(|b| b.pos == pos)
}

/// Position of the closest living opponent by Manhattan distance
pub fn nearest_opponent(players: &[Player], me: PlayerId, from: IVec2) -> Option<IVec2> {
    players
        .iter()
        .filter(|p| p.id() != me && p.is_alive())
        .min_by_key(|p| manhattan(p.pos(), from))
        .map(Player::pos)
}

/// Would a bomb of `range` dropped at `start` (detonating after `timer` ticks)
/// still leave a reachable safe cell?
///
/// Time-expanded BFS over (cell, tick). Moves go through empty cells only and
/// never back onto the bomb cell.
pub fn can_escape_after_bomb(
    grid: &Grid,
    bombs: &[Bomb],
    start: IVec2,
    range: i32,
    timer: i32,
) -> bool {
    let hypothetical = Bomb::new(BombId::MAX, start, timer.max(1), range, None);
    let with_hypothetical = || bombs.iter().chain(std::iter::once(&hypothetical));
    let safe = |pos: IVec2| danger_level(grid, with_hypothetical(), pos, None).is_none();

    let mut queue = VecDeque::from([(start, 0)]);
    let mut visited = HashSet::from([(start.x, start.y, 0)]);

    while let Some((pos, tick)) = queue.pop_front() {
        if tick < timer && safe(pos) {
            return true;
        }
        if tick + 1 >= timer {
            continue;
        }
        for step in STEPS {
            let next = pos + step;
            if next == start || !grid.get(next).is_some_and(CellType::is_walkable) {
                continue;
            }
            if visited.insert((next.x, next.y, tick + 1)) {
                queue.push_back((next, tick + 1));
            }
        }
    }
    false
}

/// A* from `start` to `goal` through empty or destructible cells that no bomb
/// currently threatens. Returns the steps after `start`, ending at `goal`.
pub fn find_safe_path(
    grid: &Grid,
    bombs: &[Bomb],
    start: IVec2,
    goal: IVec2,
) -> Option<Vec<IVec2>> {
    let start_idx = grid.index(start)?;
    grid.index(goal)?;

    let is_safe = |pos: IVec2| danger_level(grid, bombs, pos, None).is_none();
    let passable = |pos: IVec2| {
        matches!(grid.get(pos), Some(CellType::Empty | CellType::Destructible)) && is_safe(pos)
    };

    let mut came_from: Vec<Option<IVec2>> = vec![None; grid.len()];
    let mut best_g = vec![i32::MAX; grid.len()];
    let mut closed = vec![false; grid.len()];
    // (f, g, x, y) min-heap; coordinates make tie-breaks deterministic
    let mut open = BinaryHeap::new();
    best_g[start_idx] = 0;
    open.push(Reverse((manhattan(start, goal), 0, start.x, start.y)));

    while let Some(Reverse((_, g, x, y))) = open.pop() {
        let pos = IVec2::new(x, y);
        let idx = grid.index(pos)?;
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        if pos == goal {
            let mut path = Vec::new();
            let mut cur = pos;
            while cur != start {
                path.push(cur);
                cur = came_from[grid.index(cur)?]?;
            }
            path.reverse();
            return path.iter().all(|&p| is_safe(p)).then_some(path);
        }

        for step in STEPS {
            let next = pos + step;
            let Some(next_idx) = grid.index(next) else {
                continue;
            };
            if closed[next_idx] || !passable(next) {
                continue;
            }
            let next_g = g + 1;
            if next_g < best_g[next_idx] {
                best_g[next_idx] = next_g;
                came_from[next_idx] = Some(pos);
                open.push(Reverse((next_g + manhattan(next, goal), next_g, next.x, next.y)));
            }
        }
    }
    None
}
