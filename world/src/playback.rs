use tiny_steps_core::{Event, GridSize, LossCause, Path, PlaybackStatus, Position};

use crate::queue::CommandQueue;

/// Player position, command cursor and outcome flags for a single run.
///
/// `won` and `lost` are never both set, and neither is set while `playing`.
#[derive(Clone, Debug)]
pub(crate) struct Playback {
    player: Position,
    command_index: usize,
    playing: bool,
    won: bool,
    lost: bool,
}

impl Playback {
    pub(crate) fn new(start: Position) -> Self {
        Self {
            player: start,
            command_index: 0,
            playing: false,
            won: false,
            lost: false,
        }
    }

    pub(crate) fn reset(&mut self, start: Position) {
        *self = Self::new(start);
    }

    pub(crate) fn player(&self) -> Position {
        self.player
    }

    pub(crate) fn command_index(&self) -> usize {
        self.command_index
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.playing
    }

    pub(crate) fn is_won(&self) -> bool {
        self.won
    }

    pub(crate) fn is_lost(&self) -> bool {
        self.lost
    }

    pub(crate) fn status(&self) -> PlaybackStatus {
        if self.won {
            PlaybackStatus::Won
        } else if self.lost {
            PlaybackStatus::Lost
        } else if self.playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Idle
        }
    }

    /// Enters the playing state from idle. Returns `false` when not idle.
    pub(crate) fn start(&mut self) -> bool {
        if self.status() != PlaybackStatus::Idle {
            return false;
        }
        self.playing = true;
        self.command_index = 0;
        true
    }

    /// Executes the command under the cursor. Callers guarantee `playing`.
    pub(crate) fn step(
        &mut self,
        grid: GridSize,
        path: &Path,
        queue: &CommandQueue,
        out_events: &mut Vec<Event>,
    ) {
        debug_assert!(self.playing, "step requires an active playback");

        let Some(command) = queue.get(self.command_index) else {
            self.playing = false;
            out_events.push(Event::PlaybackFinished);
            return;
        };

        let from = self.player;
        let candidate = from.step(command.direction());

        let cause = if !grid.contains(candidate) {
            Some(LossCause::OutOfBounds)
        } else if path.is_obstacle(candidate) {
            Some(LossCause::Obstacle)
        } else {
            None
        };

        if let Some(cause) = cause {
            self.playing = false;
            self.lost = true;
            out_events.push(Event::PlaybackLost {
                at: from,
                attempted: candidate,
                cause,
            });
            return;
        }

        self.player = candidate;
        out_events.push(Event::PlayerMoved {
            from,
            to: candidate,
            command_index: self.command_index,
        });

        if candidate == path.goal() {
            self.playing = false;
            self.won = true;
            out_events.push(Event::PlaybackWon { at: candidate });
            return;
        }

        self.command_index += 1;
    }
}
