#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded path generation system that lays out goals and obstacles.
//!
//! Generation is a placement policy, not a pathfinder: the goal is biased
//! toward the far corner of the grid and obstacles are scattered uniformly,
//! so a generated path may leave the goal unreachable.

use rand::Rng;
use tiny_steps_core::{GridSize, Path, PathError, Position};

/// Lowest coordinate a goal is drawn from on grids large enough to honour it.
pub const GOAL_MIN_COORDINATE: u32 = 3;

/// Tuning knobs controlling how paths are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    goal_min_coordinate: u32,
    min_obstacles: usize,
    max_obstacles: usize,
}

impl Config {
    /// Creates a configuration drawing between `min_obstacles` and
    /// `max_obstacles` obstacles (inclusive). The bounds are swapped when
    /// provided in reverse order.
    #[must_use]
    pub const fn new(goal_min_coordinate: u32, min_obstacles: usize, max_obstacles: usize) -> Self {
        let (min_obstacles, max_obstacles) = if min_obstacles <= max_obstacles {
            (min_obstacles, max_obstacles)
        } else {
            (max_obstacles, min_obstacles)
        };
        Self {
            goal_min_coordinate,
            min_obstacles,
            max_obstacles,
        }
    }

    /// Lowest coordinate a goal is drawn from.
    #[must_use]
    pub const fn goal_min_coordinate(&self) -> u32 {
        self.goal_min_coordinate
    }

    /// Inclusive lower bound of the obstacle count draw.
    #[must_use]
    pub const fn min_obstacles(&self) -> usize {
        self.min_obstacles
    }

    /// Inclusive upper bound of the obstacle count draw.
    #[must_use]
    pub const fn max_obstacles(&self) -> usize {
        self.max_obstacles
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(GOAL_MIN_COORDINATE, 3, 5)
    }
}

/// Pure system that turns random draws into [`Path`] instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathGeneration {
    config: Config,
}

impl PathGeneration {
    /// Creates a new generation system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generates a single path on the provided grid.
    ///
    /// Each goal coordinate is drawn independently from
    /// `[goal_min_coordinate, size - 1]`; on grids too small for that range
    /// the lower bound drops to the last index. The obstacle count is drawn
    /// from the configured range and obstacles are sampled without
    /// replacement from every cell other than the start and the goal. When
    /// fewer candidates remain than were requested, all of them are used.
    ///
    /// The layout is checked by [`Path::new`] and any violation is returned.
    pub fn generate<R>(&self, grid: GridSize, rng: &mut R) -> Result<Path, PathError>
    where
        R: Rng + ?Sized,
    {
        let start = Path::START;
        let last = last_index(grid);
        let lower = coordinate(self.config.goal_min_coordinate).min(last);
        let goal = Position::new(rng.gen_range(lower..=last), rng.gen_range(lower..=last));

        let mut candidates: Vec<Position> = grid
            .cells()
            .filter(|cell| *cell != start && *cell != goal)
            .collect();

        let requested = rng.gen_range(self.config.min_obstacles..=self.config.max_obstacles);
        let mut obstacles = Vec::with_capacity(requested);
        for _ in 0..requested {
            if candidates.is_empty() {
                break;
            }
            let index = rng.gen_range(0..candidates.len());
            obstacles.push(candidates.remove(index));
        }

        tracing::debug!(
            grid = grid.get(),
            goal_x = goal.x(),
            goal_y = goal.y(),
            requested,
            placed = obstacles.len(),
            "generated path"
        );

        Path::new(grid, goal, obstacles)
    }

    /// Generates `count` independent paths, in draw order.
    pub fn generate_rotation<R>(
        &self,
        grid: GridSize,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Path>, PathError>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| self.generate(grid, rng)).collect()
    }
}

/// Generates a single path using the default configuration.
pub fn generate<R>(grid: GridSize, rng: &mut R) -> Result<Path, PathError>
where
    R: Rng + ?Sized,
{
    PathGeneration::default().generate(grid, rng)
}

fn last_index(grid: GridSize) -> i32 {
    coordinate(grid.get().saturating_sub(1))
}

fn coordinate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_orders_reversed_bounds() {
        let config = Config::new(3, 5, 2);
        assert_eq!(config.min_obstacles(), 2);
        assert_eq!(config.max_obstacles(), 5);
    }

    #[test]
    fn goal_floor_beyond_the_grid_collapses_to_far_corner() {
        use rand::SeedableRng;

        let grid = GridSize::new(4).expect("valid grid");
        let generation = PathGeneration::new(Config::new(u32::MAX, 0, 0));
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);

        let path = generation.generate(grid, &mut rng).expect("valid path");
        assert_eq!(path.goal(), Position::new(3, 3));
        assert!(path.obstacles().is_empty());
    }

    #[test]
    fn last_index_tracks_grid_edge() {
        let grid = GridSize::new(6).expect("valid grid");
        assert_eq!(last_index(grid), 5);
    }
}
