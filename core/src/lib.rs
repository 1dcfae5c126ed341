#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tiny Steps engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Action`] values
//! describing desired mutations, the session executes those actions via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! adapters to react to deterministically.
//!
//! The puzzle vocabulary lives here as well: a square grid measured by
//! [`GridSize`], cell [`Position`]s, the four [`Direction`]s a player can be
//! told to move in, the [`Command`] tokens queued by the player, and the
//! immutable [`Path`] describing one puzzle instance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tiny Steps.";

/// Actions that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Appends a command to the end of the queue. Ignored while playing.
    QueueCommand {
        /// Direction the queued command moves the player.
        direction: Direction,
        /// Display color attached to the command.
        color: CommandColor,
    },
    /// Reassigns the color of an already queued command. Ignored while playing.
    RecolorCommand {
        /// Zero-based queue index of the command to recolor.
        index: usize,
        /// Replacement display color.
        color: CommandColor,
    },
    /// Begins replaying the queue from its first command.
    StartPlayback,
    /// Advances playback by at most one command. Ignored unless playing.
    Tick,
    /// Returns the session to idle against the active path and clears the queue.
    Reset,
    /// Selects the next path in the rotation, wrapping after the last one, then resets.
    NextPath,
}

/// Events broadcast by the session after processing actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a command was appended to the queue.
    CommandQueued {
        /// Queue index assigned to the command.
        index: usize,
        /// The command that was appended.
        command: Command,
    },
    /// Confirms that a queued command received a new color.
    CommandRecolored {
        /// Queue index of the recolored command.
        index: usize,
        /// Color now attached to the command.
        color: CommandColor,
    },
    /// Announces that playback started from the first queued command.
    PlaybackStarted {
        /// Number of commands queued when playback started.
        queued: usize,
    },
    /// Confirms that the player moved one cell while executing a command.
    PlayerMoved {
        /// Cell the player occupied before the move.
        from: Position,
        /// Cell the player occupies after the move.
        to: Position,
        /// Queue index of the command that produced the move.
        command_index: usize,
    },
    /// Reports that the player reached the goal cell.
    PlaybackWon {
        /// Goal cell the player now occupies.
        at: Position,
    },
    /// Reports that a command attempted an invalid move.
    PlaybackLost {
        /// Cell the player remains on.
        at: Position,
        /// Cell the failed command tried to enter.
        attempted: Position,
        /// Why the move was invalid.
        cause: LossCause,
    },
    /// Reports that every queued command ran without reaching an outcome.
    PlaybackFinished,
    /// Confirms that the session returned to idle.
    SessionReset {
        /// Rotation index of the path the session was reset against.
        path_index: usize,
    },
    /// Announces that a different path became active.
    PathSelected {
        /// Rotation index of the newly active path.
        path_index: usize,
    },
}

/// Observable lifecycle state of command playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Not playing and no outcome reached. Initial state and the state after a reset.
    Idle,
    /// Commands are being replayed one per tick.
    Playing,
    /// Terminal: the player reached the goal.
    Won,
    /// Terminal: a command attempted an invalid move.
    Lost,
}

impl PlaybackStatus {
    /// Reports whether the status is one of the terminal outcomes.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Reason a move was rejected during playback.
///
/// Both causes resolve to [`PlaybackStatus::Lost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossCause {
    /// The move would have left the grid.
    OutOfBounds,
    /// The move would have entered an obstacle cell.
    Obstacle,
}

/// Side length of the square puzzle grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridSize(u32);

impl GridSize {
    /// Smallest grid able to hold a goal distinct from the start cell.
    pub const MIN: u32 = 2;

    /// Largest supported grid.
    pub const MAX: u32 = 64;

    /// Grid size used when no configuration is supplied.
    pub const DEFAULT: Self = Self(6);

    /// Creates a grid size, rejecting sizes below [`GridSize::MIN`] or above [`GridSize::MAX`].
    pub fn new(size: u32) -> Result<Self, GridSizeError> {
        if size < Self::MIN {
            return Err(GridSizeError::TooSmall { size });
        }
        if size > Self::MAX {
            return Err(GridSizeError::TooLarge { size });
        }
        Ok(Self(size))
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the position lies on the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        axis_in_bounds(position.x(), self.0) && axis_in_bounds(position.y(), self.0)
    }

    /// Iterates every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let size = i32::try_from(self.0).unwrap_or(i32::MAX);
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn axis_in_bounds(value: i32, size: u32) -> bool {
    u32::try_from(value).map_or(false, |value| value < size)
}

/// Errors reported when constructing a [`GridSize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridSizeError {
    /// The grid cannot fit a start and a distinct goal.
    #[error("grid size must be at least {} (received {size})", GridSize::MIN)]
    TooSmall {
        /// Size that failed validation.
        size: u32,
    },
    /// The grid exceeds the supported size.
    #[error("grid size must be at most {} (received {size})", GridSize::MAX)]
    TooLarge {
        /// Size that failed validation.
        size: u32,
    },
}

/// Location of a single grid cell.
///
/// Coordinates are signed so that a move off the top or left edge produces a
/// representable candidate that simply fails [`GridSize::contains`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// The top-left cell, where every path starts.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring position one step in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Cardinal directions a command can move the player in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in button order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit offset applied to a position, as `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Display color attached to a queued command. Has no effect on gameplay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl CommandColor {
    /// Palette red.
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    /// Palette blue, the initially selected color.
    pub const BLUE: Self = Self::from_rgb(0, 0, 255);
    /// Palette green.
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);
    /// Palette yellow.
    pub const YELLOW: Self = Self::from_rgb(255, 255, 0);
    /// Palette purple.
    pub const PURPLE: Self = Self::from_rgb(128, 0, 128);
    /// Palette orange.
    pub const ORANGE: Self = Self::from_rgb(255, 165, 0);

    /// Selectable colors paired with their display names, in button order.
    pub const PALETTE: [(&'static str, Self); 6] = [
        ("red", Self::RED),
        ("blue", Self::BLUE),
        ("green", Self::GREEN),
        ("yellow", Self::YELLOW),
        ("purple", Self::PURPLE),
        ("orange", Self::ORANGE),
    ];

    /// Creates a new command color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Looks up a palette color by its case-insensitive name.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        Self::PALETTE
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    /// Palette name of the color, if it belongs to the palette.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        Self::PALETTE
            .iter()
            .find(|(_, color)| color == self)
            .map(|(name, _)| *name)
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl Default for CommandColor {
    fn default() -> Self {
        Self::BLUE
    }
}

/// A queued, direction-tagged token representing one planned move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    direction: Direction,
    color: CommandColor,
}

impl Command {
    /// Creates a new command.
    #[must_use]
    pub const fn new(direction: Direction, color: CommandColor) -> Self {
        Self { direction, color }
    }

    /// Direction the command moves the player.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Display color attached to the command.
    #[must_use]
    pub const fn color(&self) -> CommandColor {
        self.color
    }

    /// Returns a copy of the command carrying a different color.
    #[must_use]
    pub const fn recolored(self, color: CommandColor) -> Self {
        Self {
            direction: self.direction,
            color,
        }
    }
}

/// One puzzle instance: a start cell, a goal cell and a set of obstacles.
///
/// Paths are immutable once constructed; regenerating a puzzle means building
/// a new `Path`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    start: Position,
    goal: Position,
    obstacles: Vec<Position>,
}

impl Path {
    /// Cell every path starts from.
    pub const START: Position = Position::ORIGIN;

    /// Creates a path on the provided grid, validating the goal and obstacles.
    ///
    /// The goal must lie on the grid and differ from [`Path::START`]. Obstacles
    /// must lie on the grid, be unique, and avoid both the start and the goal.
    /// Obstacle order is preserved.
    pub fn new(grid: GridSize, goal: Position, obstacles: Vec<Position>) -> Result<Self, PathError> {
        Self::validated(goal, obstacles, |cell| grid.contains(cell))
    }

    fn validated<F>(goal: Position, obstacles: Vec<Position>, in_bounds: F) -> Result<Self, PathError>
    where
        F: Fn(Position) -> bool,
    {
        if goal == Self::START {
            return Err(PathError::GoalIsStart);
        }
        if !in_bounds(goal) {
            return Err(PathError::GoalOutOfBounds { goal });
        }

        for (index, obstacle) in obstacles.iter().copied().enumerate() {
            if !in_bounds(obstacle) {
                return Err(PathError::ObstacleOutOfBounds { obstacle });
            }
            if obstacle == Self::START {
                return Err(PathError::ObstacleOnStart);
            }
            if obstacle == goal {
                return Err(PathError::ObstacleOnGoal { goal });
            }
            if obstacles[..index].contains(&obstacle) {
                return Err(PathError::DuplicateObstacle { obstacle });
            }
        }

        Ok(Self {
            start: Self::START,
            goal,
            obstacles,
        })
    }

    /// Cell the player occupies after every reset.
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Cell the player must reach to win.
    #[must_use]
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Cells the player must never enter.
    #[must_use]
    pub fn obstacles(&self) -> &[Position] {
        &self.obstacles
    }

    /// Reports whether the cell holds an obstacle.
    #[must_use]
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }

    /// Reports whether every cell of the path fits on the provided grid.
    #[must_use]
    pub fn fits(&self, grid: GridSize) -> bool {
        grid.contains(self.goal) && self.obstacles.iter().all(|cell| grid.contains(*cell))
    }
}

#[derive(Deserialize)]
struct RawPath {
    start: Position,
    goal: Position,
    obstacles: Vec<Position>,
}

impl TryFrom<RawPath> for Path {
    type Error = PathError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        if raw.start != Self::START {
            return Err(PathError::StartNotOrigin { start: raw.start });
        }
        Self::validated(raw.goal, raw.obstacles, |cell| cell.x() >= 0 && cell.y() >= 0)
    }
}

/// Reasons a hand-authored [`Path`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A deserialized path does not start at [`Path::START`].
    #[error("path must start at the origin (found {start:?})")]
    StartNotOrigin {
        /// Start cell found in the serialized path.
        start: Position,
    },
    /// The goal coincides with the start cell.
    #[error("goal must differ from the start cell")]
    GoalIsStart,
    /// The goal lies outside the grid.
    #[error("goal {goal:?} lies outside the grid")]
    GoalOutOfBounds {
        /// Offending goal cell.
        goal: Position,
    },
    /// An obstacle lies outside the grid.
    #[error("obstacle {obstacle:?} lies outside the grid")]
    ObstacleOutOfBounds {
        /// Offending obstacle cell.
        obstacle: Position,
    },
    /// An obstacle occupies the start cell.
    #[error("obstacle must not occupy the start cell")]
    ObstacleOnStart,
    /// An obstacle occupies the goal cell.
    #[error("obstacle must not occupy the goal cell {goal:?}")]
    ObstacleOnGoal {
        /// Goal cell covered by the obstacle.
        goal: Position,
    },
    /// The same obstacle cell was listed twice.
    #[error("obstacle {obstacle:?} listed more than once")]
    DuplicateObstacle {
        /// Repeated obstacle cell.
        obstacle: Position,
    },
}
