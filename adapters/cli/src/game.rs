//! Frame driver that turns adapter input into world actions.

use std::time::Duration;

use tiny_steps_core::{Action, CommandColor, Event, PlaybackStatus};
use tiny_steps_rendering::{CommandToken, FrameInput, Scene};
use tiny_steps_system_pacing::{Config as PacingConfig, Pacing};
use tiny_steps_world::{self as world, query, Session};

/// Owns the session and the pacing system for the lifetime of the adapter.
#[derive(Debug)]
pub(crate) struct Game {
    session: Session,
    pacing: Pacing,
    selected_color: CommandColor,
    events: Vec<Event>,
}

impl Game {
    pub(crate) fn new(session: Session, step_interval: Duration) -> Self {
        Self {
            session,
            pacing: Pacing::new(PacingConfig::new(step_interval)),
            selected_color: CommandColor::default(),
            events: Vec::new(),
        }
    }

    /// Applies one frame of input, advances pacing and refreshes the scene.
    pub(crate) fn update(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.events.clear();

        if let Some(color) = input.select_color {
            self.selected_color = color;
        }
        if let Some(color) = input.recolor_last {
            if let Some(index) = query::commands(&self.session).len().checked_sub(1) {
                self.apply(Action::RecolorCommand { index, color });
            }
        }
        for direction in input.queued {
            self.apply(Action::QueueCommand {
                direction,
                color: self.selected_color,
            });
        }
        if input.reset {
            self.apply(Action::Reset);
        }
        if input.next_path {
            self.apply(Action::NextPath);
        }
        if input.start_playback {
            self.apply(Action::StartPlayback);
        }

        let mut actions = Vec::new();
        self.pacing
            .handle(dt, query::status(&self.session), &mut actions);
        for action in actions {
            self.apply(action);
        }

        for event in &self.events {
            tracing::trace!(?event, "world event");
        }
        self.populate(scene);
    }

    /// Builds the scene describing the current session state.
    pub(crate) fn scene(&self) -> Scene {
        let path = query::active_path(&self.session);
        let mut scene = Scene {
            grid_size: query::grid_size(&self.session).get(),
            goal: path.goal(),
            obstacles: path.obstacles().to_vec(),
            player: path.start(),
            commands: Vec::new(),
            status: PlaybackStatus::Idle,
            active_path: 0,
            path_count: 0,
            selected_color: self.selected_color,
        };
        self.populate(&mut scene);
        scene
    }

    fn apply(&mut self, action: Action) {
        world::apply(&mut self.session, action, &mut self.events);
    }

    fn populate(&self, scene: &mut Scene) {
        let session = &self.session;
        let path = query::active_path(session);
        let status = query::status(session);

        scene.grid_size = query::grid_size(session).get();
        scene.goal = path.goal();
        scene.obstacles.clear();
        scene.obstacles.extend_from_slice(path.obstacles());
        scene.player = query::player_position(session);
        scene.commands = CommandToken::strip(
            query::commands(session)
                .iter()
                .map(|command| (command.direction(), command.color())),
            query::command_index(session),
            status,
        );
        scene.status = status;
        scene.active_path = query::active_path_index(session);
        scene.path_count = query::paths(session).len();
        scene.selected_color = self.selected_color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_steps_core::{Direction, GridSize, Path, Position};
    use tiny_steps_rendering::TokenState;

    const FRAME: Duration = Duration::from_millis(250);

    fn game(goal: Position, obstacles: Vec<Position>) -> Game {
        let grid = GridSize::new(4).expect("valid grid");
        let path = Path::new(grid, goal, obstacles).expect("valid path");
        let session = Session::from_paths(grid, vec![path]).expect("valid session");
        Game::new(session, Duration::from_millis(500))
    }

    fn input(queued: &[Direction]) -> FrameInput {
        FrameInput {
            queued: queued.to_vec(),
            ..FrameInput::default()
        }
    }

    #[test]
    fn queued_commands_use_selected_color() {
        let mut game = game(Position::new(3, 3), Vec::new());
        let mut scene = game.scene();

        let frame = FrameInput {
            select_color: Some(CommandColor::GREEN),
            ..input(&[Direction::Right])
        };
        game.update(FRAME, frame, &mut scene);

        assert_eq!(scene.selected_color, CommandColor::GREEN);
        assert_eq!(scene.commands.len(), 1);
        assert_eq!(scene.commands[0].color, CommandColor::GREEN);
        assert_eq!(scene.commands[0].state, TokenState::Pending);
    }

    #[test]
    fn recolor_targets_latest_command() {
        let mut game = game(Position::new(3, 3), Vec::new());
        let mut scene = game.scene();
        game.update(FRAME, input(&[Direction::Right, Direction::Down]), &mut scene);

        let frame = FrameInput {
            recolor_last: Some(CommandColor::PURPLE),
            ..FrameInput::default()
        };
        game.update(FRAME, frame, &mut scene);

        assert_eq!(scene.commands[0].color, CommandColor::BLUE);
        assert_eq!(scene.commands[1].color, CommandColor::PURPLE);
    }

    #[test]
    fn recolor_with_empty_queue_is_ignored() {
        let mut game = game(Position::new(3, 3), Vec::new());
        let mut scene = game.scene();
        let frame = FrameInput {
            recolor_last: Some(CommandColor::PURPLE),
            ..FrameInput::default()
        };
        game.update(FRAME, frame, &mut scene);
        assert!(scene.commands.is_empty());
    }

    #[test]
    fn playback_advances_with_frames() {
        let mut game = game(Position::new(2, 0), Vec::new());
        let mut scene = game.scene();
        let frame = FrameInput {
            start_playback: true,
            ..input(&[Direction::Right, Direction::Right])
        };
        game.update(FRAME, frame, &mut scene);
        assert_eq!(scene.status, PlaybackStatus::Playing);
        assert_eq!(scene.commands[0].state, TokenState::Current);

        game.update(FRAME, FrameInput::default(), &mut scene);
        assert_eq!(scene.player, Position::new(1, 0));

        game.update(FRAME, FrameInput::default(), &mut scene);
        game.update(FRAME, FrameInput::default(), &mut scene);
        assert_eq!(scene.player, Position::new(2, 0));
        assert_eq!(scene.status, PlaybackStatus::Won);
        assert_eq!(scene.banner().map(|banner| banner.text()), Some("You Win!"));
    }

    #[test]
    fn reset_clears_queue_and_banner() {
        let mut game = game(Position::new(3, 3), vec![Position::new(1, 0)]);
        let mut scene = game.scene();
        let frame = FrameInput {
            start_playback: true,
            ..input(&[Direction::Right])
        };
        game.update(FRAME, frame, &mut scene);
        game.update(FRAME, FrameInput::default(), &mut scene);
        assert_eq!(scene.status, PlaybackStatus::Lost);

        let frame = FrameInput {
            reset: true,
            ..FrameInput::default()
        };
        game.update(FRAME, frame, &mut scene);

        assert_eq!(scene.status, PlaybackStatus::Idle);
        assert!(scene.commands.is_empty());
        assert_eq!(scene.banner(), None);
    }

    #[test]
    fn reset_cancels_playback_in_progress() {
        let mut game = game(Position::new(3, 3), Vec::new());
        let mut scene = game.scene();
        let frame = FrameInput {
            start_playback: true,
            ..input(&[Direction::Right, Direction::Right, Direction::Right])
        };
        game.update(FRAME, frame, &mut scene);
        game.update(FRAME, FrameInput::default(), &mut scene);
        assert_eq!(scene.status, PlaybackStatus::Playing);
        assert_eq!(scene.player, Position::new(1, 0));

        let frame = FrameInput {
            reset: true,
            ..FrameInput::default()
        };
        game.update(FRAME, frame, &mut scene);

        assert_eq!(scene.status, PlaybackStatus::Idle);
        assert_eq!(scene.player, Position::ORIGIN);
        assert!(scene.commands.is_empty());
    }
}
