use tiny_steps_core::{
    Action, CommandColor, Direction, Event, GridSize, LossCause, Path, PlaybackStatus, Position,
};
use tiny_steps_world::{self as world, query, Session};

fn grid() -> GridSize {
    GridSize::new(6).expect("valid grid")
}

fn session_with(goal: Position, obstacles: Vec<Position>) -> Session {
    let path = Path::new(grid(), goal, obstacles).expect("valid path");
    Session::from_paths(grid(), vec![path]).expect("valid session")
}

fn queue(session: &mut Session, directions: &[Direction]) -> Vec<Event> {
    let mut events = Vec::new();
    for direction in directions {
        world::apply(
            session,
            Action::QueueCommand {
                direction: *direction,
                color: CommandColor::BLUE,
            },
            &mut events,
        );
    }
    events
}

fn apply(session: &mut Session, action: Action) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(session, action, &mut events);
    events
}

fn assert_flags_consistent(session: &Session) {
    assert!(
        !(query::is_won(session) && query::is_lost(session)),
        "won and lost must be exclusive"
    );
    if query::is_won(session) || query::is_lost(session) {
        assert!(!query::is_playing(session), "outcome must end playback");
    }
}

#[test]
fn two_steps_right_reach_adjacent_goal() {
    let mut session = session_with(Position::new(2, 0), Vec::new());
    let _ = queue(&mut session, &[Direction::Right, Direction::Right]);
    let _ = apply(&mut session, Action::StartPlayback);

    let first = apply(&mut session, Action::Tick);
    assert_eq!(query::player_position(&session), Position::new(1, 0));
    assert_eq!(query::status(&session), PlaybackStatus::Playing);
    assert_eq!(
        first,
        vec![Event::PlayerMoved {
            from: Position::new(0, 0),
            to: Position::new(1, 0),
            command_index: 0,
        }]
    );

    let second = apply(&mut session, Action::Tick);
    assert_eq!(query::player_position(&session), Position::new(2, 0));
    assert_eq!(query::status(&session), PlaybackStatus::Won);
    assert_eq!(
        second.last(),
        Some(&Event::PlaybackWon {
            at: Position::new(2, 0)
        })
    );
    assert_flags_consistent(&session);
}

#[test]
fn leaving_the_grid_loses_without_moving() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Up]);
    let _ = apply(&mut session, Action::StartPlayback);

    let events = apply(&mut session, Action::Tick);

    assert_eq!(query::status(&session), PlaybackStatus::Lost);
    assert_eq!(query::player_position(&session), Position::ORIGIN);
    assert_eq!(
        events,
        vec![Event::PlaybackLost {
            at: Position::ORIGIN,
            attempted: Position::new(0, -1),
            cause: LossCause::OutOfBounds,
        }]
    );
    assert_flags_consistent(&session);
}

#[test]
fn entering_an_obstacle_loses_without_moving() {
    let mut session = session_with(Position::new(4, 4), vec![Position::new(1, 0)]);
    let _ = queue(&mut session, &[Direction::Right]);
    let _ = apply(&mut session, Action::StartPlayback);

    let events = apply(&mut session, Action::Tick);

    assert_eq!(query::status(&session), PlaybackStatus::Lost);
    assert_eq!(query::player_position(&session), Position::ORIGIN);
    assert!(matches!(
        events.as_slice(),
        [Event::PlaybackLost {
            cause: LossCause::Obstacle,
            ..
        }]
    ));
    assert_flags_consistent(&session);
}

#[test]
fn reaching_goal_early_ignores_remaining_commands() {
    let mut session = session_with(Position::new(1, 0), Vec::new());
    let _ = queue(
        &mut session,
        &[Direction::Right, Direction::Right, Direction::Right],
    );
    let _ = apply(&mut session, Action::StartPlayback);

    let _ = apply(&mut session, Action::Tick);
    assert_eq!(query::status(&session), PlaybackStatus::Won);

    for _ in 0..2 {
        let events = apply(&mut session, Action::Tick);
        assert!(events.is_empty(), "terminal state must ignore ticks");
    }
    assert_eq!(query::player_position(&session), Position::new(1, 0));
    assert_eq!(query::command_index(&session), 0);
    assert_flags_consistent(&session);
}

#[test]
fn empty_queue_finishes_on_first_tick() {
    let mut session = session_with(Position::new(4, 4), Vec::new());

    let started = apply(&mut session, Action::StartPlayback);
    assert_eq!(started, vec![Event::PlaybackStarted { queued: 0 }]);
    assert!(query::is_playing(&session));

    let events = apply(&mut session, Action::Tick);

    assert_eq!(events, vec![Event::PlaybackFinished]);
    assert_eq!(query::status(&session), PlaybackStatus::Idle);
    assert!(!query::is_won(&session));
    assert!(!query::is_lost(&session));
    assert_eq!(query::player_position(&session), Position::ORIGIN);
}

#[test]
fn exhausted_queue_finishes_on_the_following_tick() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Down]);
    let _ = apply(&mut session, Action::StartPlayback);

    let _ = apply(&mut session, Action::Tick);
    assert_eq!(query::status(&session), PlaybackStatus::Playing);
    assert_eq!(query::command_index(&session), 1);

    let events = apply(&mut session, Action::Tick);
    assert_eq!(events, vec![Event::PlaybackFinished]);
    assert_eq!(query::status(&session), PlaybackStatus::Idle);
    assert_eq!(query::player_position(&session), Position::new(0, 1));
}

#[test]
fn queue_is_locked_while_playing() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Down, Direction::Down]);
    let _ = apply(&mut session, Action::StartPlayback);

    let queued = queue(&mut session, &[Direction::Right]);
    let recolored = apply(
        &mut session,
        Action::RecolorCommand {
            index: 0,
            color: CommandColor::GREEN,
        },
    );

    assert!(queued.is_empty());
    assert!(recolored.is_empty());
    assert_eq!(query::commands(&session).len(), 2);
    assert_eq!(query::commands(&session)[0].color(), CommandColor::BLUE);
}

#[test]
fn tick_outside_playback_is_ignored() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Right]);

    let events = apply(&mut session, Action::Tick);

    assert!(events.is_empty());
    assert_eq!(query::player_position(&session), Position::ORIGIN);
    assert_eq!(query::status(&session), PlaybackStatus::Idle);
}

#[test]
fn restarting_after_finish_rewinds_the_cursor_only() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Right]);
    let _ = apply(&mut session, Action::StartPlayback);
    let _ = apply(&mut session, Action::Tick);
    let _ = apply(&mut session, Action::Tick);
    assert_eq!(query::status(&session), PlaybackStatus::Idle);

    let _ = apply(&mut session, Action::StartPlayback);
    assert_eq!(query::command_index(&session), 0);
    let _ = apply(&mut session, Action::Tick);

    assert_eq!(query::player_position(&session), Position::new(2, 0));
}

#[test]
fn reset_is_idempotent_and_restores_idle() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Right, Direction::Up]);
    let _ = apply(&mut session, Action::StartPlayback);
    let _ = apply(&mut session, Action::Tick);
    let _ = apply(&mut session, Action::Tick);
    assert_eq!(query::status(&session), PlaybackStatus::Lost);

    let first = apply(&mut session, Action::Reset);
    let after_first = snapshot(&session);
    let second = apply(&mut session, Action::Reset);
    let after_second = snapshot(&session);

    assert_eq!(first, vec![Event::SessionReset { path_index: 0 }]);
    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
    assert_eq!(query::status(&session), PlaybackStatus::Idle);
    assert_eq!(query::player_position(&session), Position::ORIGIN);
    assert!(query::commands(&session).is_empty());
    assert_eq!(query::command_index(&session), 0);
}

#[test]
fn reset_cancels_active_playback() {
    let mut session = session_with(Position::new(4, 4), Vec::new());
    let _ = queue(&mut session, &[Direction::Right, Direction::Right]);
    let _ = apply(&mut session, Action::StartPlayback);
    let _ = apply(&mut session, Action::Tick);

    let _ = apply(&mut session, Action::Reset);

    assert!(!query::is_playing(&session));
    assert_eq!(query::player_position(&session), Position::ORIGIN);
    assert!(apply(&mut session, Action::Tick).is_empty());
}

#[test]
fn next_path_cycles_through_rotation() {
    let paths: Vec<Path> = (1..=3)
        .map(|offset| Path::new(grid(), Position::new(offset + 1, 3), Vec::new()).expect("path"))
        .collect();
    let mut session = Session::from_paths(grid(), paths).expect("valid session");
    let initial = query::active_path(&session).clone();

    let events = apply(&mut session, Action::NextPath);
    assert_eq!(
        events,
        vec![
            Event::PathSelected { path_index: 1 },
            Event::SessionReset { path_index: 1 },
        ]
    );
    assert_eq!(query::active_path(&session).goal(), Position::new(3, 3));

    let _ = apply(&mut session, Action::NextPath);
    let _ = apply(&mut session, Action::NextPath);

    assert_eq!(query::active_path_index(&session), 0);
    assert_eq!(query::active_path(&session), &initial);
}

#[test]
fn next_path_clears_queue_and_outcome() {
    let paths = vec![
        Path::new(grid(), Position::new(1, 0), Vec::new()).expect("path"),
        Path::new(grid(), Position::new(5, 5), Vec::new()).expect("path"),
    ];
    let mut session = Session::from_paths(grid(), paths).expect("valid session");
    let _ = queue(&mut session, &[Direction::Right]);
    let _ = apply(&mut session, Action::StartPlayback);
    let _ = apply(&mut session, Action::Tick);
    assert!(query::is_won(&session));

    let _ = apply(&mut session, Action::NextPath);

    assert_eq!(query::status(&session), PlaybackStatus::Idle);
    assert!(query::commands(&session).is_empty());
    assert_eq!(query::player_position(&session), Position::ORIGIN);
}

#[derive(Debug, PartialEq, Eq)]
struct Snapshot {
    path_index: usize,
    player: Position,
    commands: usize,
    command_index: usize,
    status: PlaybackStatus,
}

fn snapshot(session: &Session) -> Snapshot {
    Snapshot {
        path_index: query::active_path_index(session),
        player: query::player_position(session),
        commands: query::commands(session).len(),
        command_index: query::command_index(session),
        status: query::status(session),
    }
}
