//! Fixed timestep simulation tick
//!
//! Order within one tick: intents, AIs, bombs, win check.

use std::collections::{HashSet, VecDeque};

use glam::IVec2;
use rand::Rng;

use super::blast::{ExplosionCell, ExplosionPart, blast_shape};
use super::bomb::{BombId, BombState};
use super::bonus::{BonusEffect, BonusKind};
use super::grid::CellType;
use super::player::PlayerId;
use super::state::{GamePhase, GameState};

/// A single player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move { player: PlayerId, dx: i32, dy: i32 },
    PlaceBomb { player: PlayerId },
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Human commands, applied in order
    pub intents: Vec<Intent>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the match by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    for intent in &input.intents {
        match *intent {
            Intent::Move { player, dx, dy } => {
                state.move_player(player, dx, dy);
            }
            Intent::PlaceBomb { player } => {
                state.place_bomb(player);
            }
        }
    }

    state.update_ais();
    state.update_bombs();
    state.update_game_state();
    state.time_ticks += 1;
}

impl GameState {
    /// Let every living AI act once, in spawn order
    pub fn update_ais(&mut self) {
        for i in 0..self.players.len() {
            let Some(mut policy) = self.players[i].ai.take() else {
                continue;
            };
            let id = self.players[i].id();
            policy.think(self, id);
            self.players[i].ai = Some(policy);
        }
    }

    /// Count bombs down and resolve everything that follows from it:
    /// old explosions fade, expired bombs detonate (with chain reactions),
    /// players in the blast are hurt, pickups are collected and timed
    /// bonuses run down.
    pub fn update_bombs(&mut self) {
        self.decay_explosions();

        for bomb in &mut self.bombs {
            bomb.tick();
        }
        self.resolve_detonations();

        self.collect_bonuses();
        let dt = self.settings.tick_seconds;
        for player in &mut self.players {
            player.update_active_bonuses(dt);
        }
    }

    /// Latch the game-over phase once at most one player remains
    pub fn update_game_state(&mut self) {
        if self.phase == GamePhase::GameOver || !self.is_game_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        if let Some(outcome) = self.outcome() {
            log::info!("Match over after {} ticks: {outcome}", self.time_ticks);
        }
    }

    fn decay_explosions(&mut self) {
        for (i, slot) in self.explosions.iter_mut().enumerate() {
            let Some(cell) = slot else {
                continue;
            };
            cell.ticks_remaining = cell.ticks_remaining.saturating_sub(1);
            if cell.ticks_remaining == 0 {
                *slot = None;
                let i = i as i32;
                let pos = IVec2::new(i % self.grid.width(), i / self.grid.width());
                if self.grid.get(pos) == Some(CellType::Explosion) {
                    self.grid.set(pos, CellType::Empty);
                }
            }
        }
    }

    fn resolve_detonations(&mut self) {
        let mut queue: VecDeque<BombId> = self
            .bombs
            .iter()
            .filter(|b| b.state() == BombState::Exploding)
            .map(|b| b.id)
            .collect();
        if queue.is_empty() {
            return;
        }
        let mut resolved: HashSet<BombId> = HashSet::new();
        let mut hit = vec![false; self.grid.len()];
        // Rays of every bomb in the pass see the walls as they stood when it began
        let walls = self.grid.clone();

        while let Some(bomb_id) = queue.pop_front() {
            if !resolved.insert(bomb_id) {
                continue;
            }
            let Some(bomb) = self.bombs.iter().find(|b| b.id == bomb_id) else {
                continue;
            };
            let (origin, range) = (bomb.pos, bomb.range);
            log::debug!("Bomb {bomb_id} detonates at {origin} (range {range})");

            for cell in blast_shape(&walls, origin, range) {
                let Some(idx) = self.grid.index(cell.pos) else {
                    continue;
                };
                hit[idx] = true;

                if self.grid.get(cell.pos) == Some(CellType::Destructible) {
                    self.grid.set(cell.pos, CellType::Empty);
                    self.maybe_drop_bonus(cell.pos);
                }

                for other in &mut self.bombs {
                    if other.pos == cell.pos && other.is_armed() {
                        log::debug!("Chain reaction: bomb {} caught by bomb {bomb_id}", other.id);
                        other.force_explode();
                        queue.push_back(other.id);
                    }
                }

                // A fresh centre keeps its marker when a neighbour's ray crosses it
                let fresh_centre = self.explosions[idx].is_some_and(|e| {
                    e.part == ExplosionPart::Centre
                        && e.ticks_remaining == self.settings.explosion_ticks
                });
                if cell.part == ExplosionPart::Centre || !fresh_centre {
                    self.explosions[idx] = Some(ExplosionCell {
                        part: cell.part,
                        direction: cell.direction,
                        ticks_remaining: self.settings.explosion_ticks,
                    });
                }
                self.grid.set(cell.pos, CellType::Explosion);
            }
        }

        // One life per pass, however many blasts overlap
        for player in &mut self.players {
            let Some(idx) = self.grid.index(player.pos()) else {
                continue;
            };
            if !player.is_alive() || !hit[idx] || player.is_invincible_to_bombs() {
                continue;
            }
            player.take_damage();
            if player.is_alive() {
                log::debug!("Player {} hit, {} lives left", player.id(), player.lives());
            } else {
                log::debug!("Player {} died at {}", player.id(), player.pos());
            }
        }

        for bomb in &mut self.bombs {
            if resolved.contains(&bomb.id) {
                bomb.mark_removed();
            }
        }
        self.bombs.retain(|b| b.state() != BombState::Removed);
    }

    fn maybe_drop_bonus(&mut self, pos: IVec2) {
        if self.rng.random::<f32>() >= self.settings.bonus_drop_chance {
            return;
        }
        let kind = BonusKind::ALL[self.rng.random_range(0..BonusKind::ALL.len())];
        let effect = match kind {
            BonusKind::Flame => BonusEffect::Flame {
                extra_range: self.settings.flame_extra_range,
                duration: self.settings.flame_duration,
            },
            BonusKind::Jacket => BonusEffect::Jacket {
                duration: self.settings.jacket_duration,
            },
            BonusKind::Life => BonusEffect::Life,
        };
        let id = self.add_bonus(pos, effect);
        log::debug!("{} bonus {id} dropped at {pos}", kind.as_str());
    }

    fn collect_bonuses(&mut self) {
        for bonus in &mut self.bonuses {
            if bonus.is_collected() {
                continue;
            }
            let Some(player) =
                self.players.iter_mut().find(|p| p.is_alive() && p.pos() == bonus.pos)
            else {
                continue;
            };
            bonus.apply_to(player);
            log::debug!(
                "Player {} picked up {} bonus {}",
                player.id(),
                bonus.kind().as_str(),
                bonus.id
            );
        }
        self.bonuses.retain(|b| !b.is_collected());
    }
}
