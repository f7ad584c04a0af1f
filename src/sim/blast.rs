//! Blast propagation and danger estimation
//!
//! A blast is a centre cell plus four axis rays. A ray stops before an
//! indestructible wall, and stops on (and includes) a destructible wall.
//! The same rule decides which cells a pending bomb threatens.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::bomb::{Bomb, BombId};
use super::grid::{CellType, Grid};

/// Ray direction, also used to orient explosion sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step (y grows downward)
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
        }
    }
}

/// Shape classification of an explosion cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionPart {
    Centre,
    Branch,
    End,
}

/// One cell reached by a blast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlastCell {
    pub pos: IVec2,
    pub part: ExplosionPart,
    /// `None` for the centre
    pub direction: Option<Direction>,
}

/// Visual marker left on the grid after a blast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionCell {
    pub part: ExplosionPart,
    pub direction: Option<Direction>,
    pub ticks_remaining: u32,
}

/// Cells covered by a blast of `range` at `origin`, centre first.
///
/// Pure: the caller decides what happens to destructible walls.
pub fn blast_shape(grid: &Grid, origin: IVec2, range: i32) -> Vec<BlastCell> {
    let mut cells = vec![BlastCell {
        pos: origin,
        part: ExplosionPart::Centre,
        direction: None,
    }];

    for dir in Direction::ALL {
        for step in 1..=range {
            let pos = origin + dir.offset() * step;
            let Some(cell) = grid.get(pos) else {
                break;
            };
            match cell {
                CellType::Indestructible => break,
                CellType::Destructible => {
                    cells.push(BlastCell {
                        pos,
                        part: ExplosionPart::End,
                        direction: Some(dir),
                    });
                    break;
                }
                _ => {
                    let part = if step == range {
                        ExplosionPart::End
                    } else {
                        ExplosionPart::Branch
                    };
                    cells.push(BlastCell {
                        pos,
                        part,
                        direction: Some(dir),
                    });
                }
            }
        }
    }
    cells
}

/// Whether a blast of `range` at `origin` would reach `target`
pub fn blast_covers(grid: &Grid, origin: IVec2, range: i32, target: IVec2) -> bool {
    if target == origin {
        return true;
    }
    let delta = target - origin;
    if delta.x != 0 && delta.y != 0 {
        return false;
    }
    let dist = delta.x.abs() + delta.y.abs();
    if dist > range {
        return false;
    }

    let step_dir = delta.signum();
    for step in 1..=dist {
        match grid.get(origin + step_dir * step) {
            None | Some(CellType::Indestructible) => return false,
            Some(CellType::Destructible) if step < dist => return false,
            _ => {}
        }
    }
    true
}

/// Smallest remaining timer among bombs whose blast reaches `target`,
/// `None` when no bomb threatens it. `ignore` skips one bomb by id.
pub fn danger_level<'a, I>(
    grid: &Grid,
    bombs: I,
    target: IVec2,
    ignore: Option<BombId>,
) -> Option<i32>
where
    I: IntoIterator<Item = &'a Bomb>,
{
    bombs
        .into_iter()
        .filter(|b| b.is_armed() && Some(b.id) != ignore)
        .filter(|b| blast_covers(grid, b.pos, b.range, target))
        .map(Bomb::timer)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(cells: &[BlastCell], pos: IVec2) -> Option<BlastCell> {
        cells.iter().copied().find(|c| c.pos == pos)
    }

    #[test]
    fn test_open_cross() {
        let grid = Grid::new(7, 7);
        let cells = blast_shape(&grid, IVec2::new(3, 3), 2);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0].part, ExplosionPart::Centre);

        let branch = find(&cells, IVec2::new(4, 3)).unwrap();
        assert_eq!(branch.part, ExplosionPart::Branch);
        assert_eq!(branch.direction, Some(Direction::Right));

        let end = find(&cells, IVec2::new(3, 1)).unwrap();
        assert_eq!(end.part, ExplosionPart::End);
        assert_eq!(end.direction, Some(Direction::Up));
    }

    #[test]
    fn test_range_zero_is_centre_only() {
        let grid = Grid::new(5, 5);
        let cells = blast_shape(&grid, IVec2::new(2, 2), 0);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].part, ExplosionPart::Centre);
    }

    #[test]
    fn test_indestructible_stops_without_marking() {
        let mut grid = Grid::new(7, 7);
        grid.set(IVec2::new(4, 3), CellType::Indestructible);
        let cells = blast_shape(&grid, IVec2::new(3, 3), 3);
        assert!(find(&cells, IVec2::new(4, 3)).is_none());
        assert!(find(&cells, IVec2::new(5, 3)).is_none());
    }

    #[test]
    fn test_destructible_is_end_and_stops() {
        let mut grid = Grid::new(7, 7);
        grid.set(IVec2::new(3, 2), CellType::Destructible);
        let cells = blast_shape(&grid, IVec2::new(3, 3), 3);
        let wall = find(&cells, IVec2::new(3, 2)).unwrap();
        assert_eq!(wall.part, ExplosionPart::End);
        assert!(find(&cells, IVec2::new(3, 1)).is_none());
    }

    #[test]
    fn test_ray_passes_bombs() {
        let mut grid = Grid::new(7, 7);
        grid.set(IVec2::new(4, 3), CellType::Bomb);
        let cells = blast_shape(&grid, IVec2::new(3, 3), 2);
        assert_eq!(find(&cells, IVec2::new(4, 3)).unwrap().part, ExplosionPart::Branch);
        assert!(find(&cells, IVec2::new(5, 3)).is_some());
    }

    #[test]
    fn test_grid_edge_clips_ray() {
        let grid = Grid::new(3, 3);
        let cells = blast_shape(&grid, IVec2::new(0, 0), 5);
        assert!(cells.iter().all(|c| grid.in_bounds(c.pos)));
        assert_eq!(cells.len(), 5);
    }

    #[test]
    fn test_covers_matches_shape() {
        let mut grid = Grid::new(9, 9);
        grid.set(IVec2::new(6, 4), CellType::Indestructible);
        grid.set(IVec2::new(4, 2), CellType::Destructible);
        let origin = IVec2::new(4, 4);
        let shape = blast_shape(&grid, origin, 3);

        for y in 0..9 {
            for x in 0..9 {
                let pos = IVec2::new(x, y);
                assert_eq!(
                    blast_covers(&grid, origin, 3, pos),
                    find(&shape, pos).is_some(),
                    "({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_danger_level_minimum() {
        let grid = Grid::new(7, 7);
        let bombs = vec![
            Bomb::new(1, IVec2::new(1, 3), 5, 3, None),
            Bomb::new(2, IVec2::new(3, 1), 2, 3, None),
        ];
        assert_eq!(danger_level(&grid, &bombs, IVec2::new(3, 3), None), Some(2));
        assert_eq!(danger_level(&grid, &bombs, IVec2::new(3, 3), Some(2)), Some(5));
        assert_eq!(danger_level(&grid, &bombs, IVec2::new(6, 6), None), None);
    }

    #[test]
    fn test_danger_blocked_by_walls() {
        let mut grid = Grid::new(7, 7);
        grid.set(IVec2::new(2, 3), CellType::Indestructible);
        let bombs = vec![Bomb::new(1, IVec2::new(1, 3), 4, 3, None)];
        assert_eq!(danger_level(&grid, &bombs, IVec2::new(3, 3), None), None);
        assert_eq!(danger_level(&grid, &bombs, IVec2::new(1, 3), None), Some(4));
    }
}
