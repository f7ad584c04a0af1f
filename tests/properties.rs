//! Property-based tests for the simulation core.
//!
//! Bomb timers, bonus expiry, blast geometry and whole AI matches.
//! Run with: cargo test --release --test properties

use glam::IVec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use bomber_sim::MatchSettings;
use bomber_sim::sim::{
    ActiveBonus, Bomb, BombState, BonusKind, CellType, Difficulty, GamePhase, GameState, Grid,
    Player, TickInput, blast_covers, blast_shape, tick,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Timers only go down and the exploded flag tracks them exactly.
    #[test]
    fn prop_bomb_timer_monotonic(timer in -3i32..20, ticks in 0usize..40) {
        let mut bomb = Bomb::new(1, IVec2::ZERO, timer, 1, None);
        let mut last = bomb.timer();
        for _ in 0..ticks {
            bomb.tick();
            prop_assert!(bomb.timer() <= last);
            prop_assert_eq!(bomb.is_exploded(), bomb.timer() <= 0);
            prop_assert_eq!(bomb.state() == BombState::Armed, bomb.timer() > 0);
            last = bomb.timer();
        }
    }

    /// Forcing a detonation always lands on zero.
    #[test]
    fn prop_force_explode(timer in -3i32..20, ticks in 0usize..10) {
        let mut bomb = Bomb::new(1, IVec2::ZERO, timer, 1, None);
        for _ in 0..ticks {
            bomb.tick();
        }
        bomb.force_explode();
        prop_assert_eq!(bomb.timer(), 0);
        prop_assert!(bomb.is_exploded());
        prop_assert!(!bomb.is_armed());
    }

    /// A bonus expires exactly once its full duration has been ticked away.
    #[test]
    fn prop_active_bonus_expiry(half_seconds in 0u32..60) {
        let duration = half_seconds as f32 * 0.5;
        let mut bonus = ActiveBonus::new(BonusKind::Jacket, 0, duration);
        for _ in 0..half_seconds {
            prop_assert!(!bonus.is_expired());
            bonus.tick(0.5);
        }
        prop_assert!(bonus.is_expired());
    }

    /// Overlapping flames stack and each gives back exactly what it added.
    #[test]
    fn prop_flames_revert_to_base(
        flames in prop::collection::vec((1i32..4, 1u32..20), 1..5),
        base in 0i32..4
    ) {
        let mut player = Player::new(1, IVec2::ONE);
        player.set_bomb_range(base);
        let total: i32 = flames.iter().map(|&(extra, _)| extra).sum();
        for &(extra, half_seconds) in &flames {
            player.add_flame_bonus(extra, half_seconds as f32 * 0.5);
        }
        prop_assert_eq!(player.bomb_range(), base + total);

        let longest = flames.iter().map(|&(_, h)| h).max().unwrap_or(0);
        for _ in 0..longest {
            prop_assert!(player.bomb_range() >= base);
            player.update_active_bonuses(0.5);
        }
        prop_assert_eq!(player.bomb_range(), base);
        prop_assert!(player.active_bonuses().is_empty());
    }

    /// Rays never mark walls they cannot break, nor anything behind a wall.
    #[test]
    fn prop_blast_respects_walls(
        seed in any::<u64>(),
        ox in 0i32..11,
        oy in 0i32..9,
        range in 0i32..8
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::generate(11, 9, 0.4, &mut rng);
        let origin = IVec2::new(ox, oy);
        let cells = blast_shape(&grid, origin, range);

        prop_assert_eq!(cells[0].pos, origin);
        for cell in &cells[1..] {
            prop_assert!(grid.in_bounds(cell.pos));
            prop_assert_ne!(grid.get(cell.pos), Some(CellType::Indestructible));

            let delta = cell.pos - origin;
            prop_assert!(delta.x == 0 || delta.y == 0);
            let dist = delta.x.abs() + delta.y.abs();
            prop_assert!(dist <= range);
            // Everything strictly between origin and the cell is open
            for step in 1..dist {
                let between = grid.get(origin + delta.signum() * step);
                prop_assert!(!matches!(
                    between,
                    Some(CellType::Indestructible | CellType::Destructible)
                ));
            }
            prop_assert!(blast_covers(&grid, origin, range, cell.pos));
        }
    }

    /// Anything `blast_covers` accepts is part of the shape.
    #[test]
    fn prop_covers_implies_shape(
        seed in any::<u64>(),
        origin in (0i32..11, 0i32..9),
        target in (0i32..11, 0i32..9),
        range in 0i32..8
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::generate(11, 9, 0.4, &mut rng);
        let origin = IVec2::new(origin.0, origin.1);
        let target = IVec2::new(target.0, target.1);
        let in_shape = blast_shape(&grid, origin, range).iter().any(|c| c.pos == target);
        prop_assert_eq!(blast_covers(&grid, origin, range, target), in_shape);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Long AI matches keep every structural invariant.
    #[test]
    fn prop_ai_matches_stay_consistent(
        seed in any::<u64>(),
        difficulty in 0usize..3,
        ais in 2usize..5
    ) {
        let difficulty = Difficulty::from_index(difficulty).unwrap();
        let settings = MatchSettings::ai_only(ais, difficulty, seed);
        let mut state = GameState::new(&settings).unwrap();
        let input = TickInput::default();
        let mut was_over = false;

        for _ in 0..400 {
            tick(&mut state, &input);

            for player in state.players() {
                prop_assert_eq!(player.lives() == 0, !player.is_alive());
                prop_assert!(player.lives() <= 3);
                prop_assert!(state.grid().in_bounds(player.pos()));
                prop_assert!(!matches!(
                    state.grid().get(player.pos()),
                    Some(CellType::Indestructible | CellType::Destructible)
                ));
                prop_assert!(state.live_bombs_of(player.id()) <= player.max_bombs());
                prop_assert!(player.bomb_range() >= 0);
            }
            for bomb in state.bombs() {
                prop_assert!(bomb.is_armed());
                prop_assert_eq!(state.grid().get(bomb.pos), Some(CellType::Bomb));
            }
            for bonus in state.bonuses() {
                prop_assert!(!bonus.is_collected());
            }
            for (pos, _) in state.explosion_cells() {
                prop_assert!(state.grid().in_bounds(pos));
            }

            if was_over {
                prop_assert_eq!(state.phase, GamePhase::GameOver);
            }
            was_over = state.phase == GamePhase::GameOver;
            prop_assert_eq!(was_over, state.is_game_over());
        }
    }

    /// Same settings, same match.
    #[test]
    fn prop_matches_are_reproducible(seed in any::<u64>()) {
        let settings = MatchSettings::ai_only(4, Difficulty::Hard, seed);
        let mut a = GameState::new(&settings).unwrap();
        let mut b = GameState::new(&settings).unwrap();
        for _ in 0..150 {
            tick(&mut a, &TickInput::default());
            tick(&mut b, &TickInput::default());
        }
        prop_assert_eq!(a.grid(), b.grid());
        prop_assert_eq!(a.bombs(), b.bombs());
        prop_assert_eq!(a.bonuses(), b.bonuses());
        let summary = |s: &GameState| {
            s.players().iter().map(|p| (p.pos(), p.lives())).collect::<Vec<_>>()
        };
        prop_assert_eq!(summary(&a), summary(&b));
    }
}
