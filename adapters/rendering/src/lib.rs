#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tiny Steps adapters.

use anyhow::Result as AnyResult;
use std::time::Duration;
use tiny_steps_core::{CommandColor, Direction, PlaybackStatus, Position};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB values of the color, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<CommandColor> for Color {
    fn from(color: CommandColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directions the player asked to queue this frame, in order.
    pub queued: Vec<Direction>,
    /// Palette color the player selected for subsequent commands.
    pub select_color: Option<CommandColor>,
    /// Color to apply to the most recently queued command.
    pub recolor_last: Option<CommandColor>,
    /// Whether the player pressed play.
    pub start_playback: bool,
    /// Whether the player asked to reset the current path.
    pub reset: bool,
    /// Whether the player asked to switch to the next path.
    pub next_path: bool,
    /// Whether the player asked to leave the game.
    pub quit: bool,
}

/// Progress of a queued command relative to playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenState {
    /// Not yet executed.
    Pending,
    /// Executes on the next tick.
    Current,
    /// Already executed.
    Executed,
}

/// A queued command as shown in the command strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CommandToken {
    /// Direction arrow drawn on the token.
    pub direction: Direction,
    /// Palette color the token was queued with.
    pub color: CommandColor,
    /// Playback progress of the token.
    pub state: TokenState,
}

impl CommandToken {
    /// Derives the command strip from the queue and the playback cursor.
    ///
    /// Commands before `command_index` have run. While playing, the command at
    /// the cursor is the current one; after a win it has run as well.
    #[must_use]
    pub fn strip<I>(commands: I, command_index: usize, status: PlaybackStatus) -> Vec<Self>
    where
        I: IntoIterator<Item = (Direction, CommandColor)>,
    {
        commands
            .into_iter()
            .enumerate()
            .map(|(index, (direction, color))| {
                let state = if index < command_index
                    || (index == command_index && status == PlaybackStatus::Won)
                {
                    TokenState::Executed
                } else if index == command_index && status == PlaybackStatus::Playing {
                    TokenState::Current
                } else {
                    TokenState::Pending
                };
                Self {
                    direction,
                    color,
                    state,
                }
            })
            .collect()
    }
}

/// Outcome message drawn over the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Banner {
    /// The player reached the goal.
    Win,
    /// A command attempted an invalid move.
    TryAgain,
}

impl Banner {
    /// Banner to show for the provided playback status, if any.
    #[must_use]
    pub const fn for_status(status: PlaybackStatus) -> Option<Self> {
        match status {
            PlaybackStatus::Won => Some(Self::Win),
            PlaybackStatus::Lost => Some(Self::TryAgain),
            PlaybackStatus::Idle | PlaybackStatus::Playing => None,
        }
    }

    /// Text displayed by the banner.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Win => "You Win!",
            Self::TryAgain => "Try Again!",
        }
    }
}

/// What occupies a single grid cell when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellContent {
    /// Nothing of interest.
    Empty,
    /// An obstacle cell.
    Obstacle,
    /// The goal cell.
    Goal,
    /// The player marker, drawn above the goal.
    Player,
}

/// Scene description combining the grid, path markers, player and queue.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cells along each grid edge.
    pub grid_size: u32,
    /// Goal cell of the active path.
    pub goal: Position,
    /// Obstacle cells of the active path.
    pub obstacles: Vec<Position>,
    /// Cell currently occupied by the player.
    pub player: Position,
    /// Queued commands in execution order.
    pub commands: Vec<CommandToken>,
    /// Playback lifecycle state.
    pub status: PlaybackStatus,
    /// Rotation index of the active path.
    pub active_path: usize,
    /// Number of paths in the rotation.
    pub path_count: usize,
    /// Color applied to newly queued commands.
    pub selected_color: CommandColor,
}

impl Scene {
    /// Content drawn at the provided cell.
    #[must_use]
    pub fn cell(&self, position: Position) -> CellContent {
        if position == self.player {
            CellContent::Player
        } else if position == self.goal {
            CellContent::Goal
        } else if self.obstacles.contains(&position) {
            CellContent::Obstacle
        } else {
            CellContent::Empty
        }
    }

    /// Banner to draw for the current status, if any.
    #[must_use]
    pub fn banner(&self) -> Option<Banner> {
        Banner::for_status(self.status)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Color of empty grid cells.
    pub background: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, background: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            background,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tiny Steps scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and the input captured by the adapter, and refreshes the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}
