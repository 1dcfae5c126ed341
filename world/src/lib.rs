#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Tiny Steps.
//!
//! A [`Session`] owns a fixed rotation of paths, the index of the active path,
//! the command queue and the playback state. Adapters mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module.

mod playback;
mod queue;

use rand::Rng;
use thiserror::Error;
use tiny_steps_core::{Action, Command, Event, GridSize, Path, PathError, WELCOME_BANNER};
use tiny_steps_system_path_generation::PathGeneration;

use self::{playback::Playback, queue::CommandQueue};

const DEFAULT_PATH_COUNT: usize = 5;

/// Largest rotation a generated session accepts.
pub const MAX_PATH_COUNT: usize = 1000;

/// Construction parameters for a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    grid_size: GridSize,
    path_count: usize,
}

impl SessionConfig {
    /// Creates a configuration for a grid of the given size and a rotation of `path_count` paths.
    #[must_use]
    pub const fn new(grid_size: GridSize, path_count: usize) -> Self {
        Self {
            grid_size,
            path_count,
        }
    }

    /// Side length of the puzzle grid.
    #[must_use]
    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Number of paths in the rotation.
    #[must_use]
    pub const fn path_count(&self) -> usize {
        self.path_count
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(GridSize::DEFAULT, DEFAULT_PATH_COUNT)
    }
}

/// Errors reported while constructing a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The rotation must hold at least one path.
    #[error("a session needs at least one path")]
    NoPaths,
    /// The requested rotation exceeds [`MAX_PATH_COUNT`].
    #[error("a session holds at most {max} paths (requested {count})")]
    TooManyPaths {
        /// Requested number of paths.
        count: usize,
        /// Accepted maximum.
        max: usize,
    },
    /// Generation produced a path that violates the path invariants.
    #[error("generated path is invalid: {0}")]
    InvalidPath(#[from] PathError),
    /// A supplied path does not fit on the configured grid.
    #[error("path {index} does not fit on a {size}x{size} grid")]
    PathOutsideGrid {
        /// Rotation index of the offending path.
        index: usize,
        /// Configured grid size.
        size: u32,
    },
}

/// Represents the authoritative Tiny Steps session state.
#[derive(Clone, Debug)]
pub struct Session {
    banner: &'static str,
    grid: GridSize,
    paths: Vec<Path>,
    active_path: usize,
    queue: CommandQueue,
    playback: Playback,
}

impl Session {
    /// Creates a session whose path rotation is drawn from `rng`.
    pub fn new<R>(config: SessionConfig, rng: &mut R) -> Result<Self, SessionError>
    where
        R: Rng + ?Sized,
    {
        if config.path_count == 0 {
            return Err(SessionError::NoPaths);
        }
        if config.path_count > MAX_PATH_COUNT {
            return Err(SessionError::TooManyPaths {
                count: config.path_count,
                max: MAX_PATH_COUNT,
            });
        }
        let paths = PathGeneration::default().generate_rotation(
            config.grid_size,
            config.path_count,
            rng,
        )?;
        Self::from_paths(config.grid_size, paths)
    }

    /// Creates a session from an explicit path rotation.
    pub fn from_paths(grid: GridSize, paths: Vec<Path>) -> Result<Self, SessionError> {
        if paths.is_empty() {
            return Err(SessionError::NoPaths);
        }
        if let Some(index) = paths.iter().position(|path| !path.fits(grid)) {
            return Err(SessionError::PathOutsideGrid {
                index,
                size: grid.get(),
            });
        }

        let playback = Playback::new(paths[0].start());
        tracing::info!(
            grid = grid.get(),
            paths = paths.len(),
            "session created"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            paths,
            active_path: 0,
            queue: CommandQueue::default(),
            playback,
        })
    }

    fn current_path(&self) -> &Path {
        &self.paths[self.active_path]
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let start = self.current_path().start();
        self.playback.reset(start);
        self.queue.clear();
        out_events.push(Event::SessionReset {
            path_index: self.active_path,
        });
    }
}

/// Applies the provided action to the session, mutating state deterministically.
///
/// Actions that are not permitted in the current state leave the session
/// untouched and emit no events.
pub fn apply(session: &mut Session, action: Action, out_events: &mut Vec<Event>) {
    tracing::debug!(?action, status = ?session.playback.status(), "applying action");

    match action {
        Action::QueueCommand { direction, color } => {
            if session.playback.is_playing() {
                tracing::debug!("queue is locked while playing");
                return;
            }
            let command = Command::new(direction, color);
            let index = session.queue.push(command);
            out_events.push(Event::CommandQueued { index, command });
        }
        Action::RecolorCommand { index, color } => {
            if session.playback.is_playing() {
                tracing::debug!("queue is locked while playing");
                return;
            }
            if session.queue.recolor(index, color) {
                out_events.push(Event::CommandRecolored { index, color });
            } else {
                tracing::debug!(index, "no queued command to recolor");
            }
        }
        Action::StartPlayback => {
            if session.playback.start() {
                out_events.push(Event::PlaybackStarted {
                    queued: session.queue.len(),
                });
            } else {
                tracing::debug!("playback can only start from idle");
            }
        }
        Action::Tick => {
            if !session.playback.is_playing() {
                tracing::debug!("tick ignored outside playback");
                return;
            }
            let path = &session.paths[session.active_path];
            session
                .playback
                .step(session.grid, path, &session.queue, out_events);
            log_outcome(out_events);
        }
        Action::Reset => session.reset(out_events),
        Action::NextPath => {
            session.active_path = (session.active_path + 1) % session.paths.len();
            out_events.push(Event::PathSelected {
                path_index: session.active_path,
            });
            session.reset(out_events);
        }
    }
}

fn log_outcome(events: &[Event]) {
    match events.last() {
        Some(Event::PlaybackWon { at }) => tracing::info!(?at, "goal reached"),
        Some(Event::PlaybackLost { at, cause, .. }) => {
            tracing::info!(?at, ?cause, "invalid move");
        }
        Some(Event::PlaybackFinished) => tracing::debug!("queue exhausted"),
        _ => {}
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use tiny_steps_core::{Command, GridSize, Path, PlaybackStatus, Position};

    use super::Session;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(session: &Session) -> &'static str {
        session.banner
    }

    /// Side length of the puzzle grid.
    #[must_use]
    pub fn grid_size(session: &Session) -> GridSize {
        session.grid
    }

    /// The path the player is currently solving.
    #[must_use]
    pub fn active_path(session: &Session) -> &Path {
        session.current_path()
    }

    /// Rotation index of the active path.
    #[must_use]
    pub fn active_path_index(session: &Session) -> usize {
        session.active_path
    }

    /// Every path in the rotation, in rotation order.
    #[must_use]
    pub fn paths(session: &Session) -> &[Path] {
        &session.paths
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_position(session: &Session) -> Position {
        session.playback.player()
    }

    /// Queued commands in execution order.
    #[must_use]
    pub fn commands(session: &Session) -> &[Command] {
        session.queue.as_slice()
    }

    /// Queue index of the next command playback will execute.
    #[must_use]
    pub fn command_index(session: &Session) -> usize {
        session.playback.command_index()
    }

    /// Reports whether commands are currently being replayed.
    #[must_use]
    pub fn is_playing(session: &Session) -> bool {
        session.playback.is_playing()
    }

    /// Reports whether the player reached the goal.
    #[must_use]
    pub fn is_won(session: &Session) -> bool {
        session.playback.is_won()
    }

    /// Reports whether a command attempted an invalid move.
    #[must_use]
    pub fn is_lost(session: &Session) -> bool {
        session.playback.is_lost()
    }

    /// Lifecycle state derived from the playback flags.
    #[must_use]
    pub fn status(session: &Session) -> PlaybackStatus {
        session.playback.status()
    }
}
