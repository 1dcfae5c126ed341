//! Line-based terminal backend that draws scenes as text.

use std::{
    fmt::Write as _,
    io::{self, BufRead, Write},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use tiny_steps_core::{Direction, PlaybackStatus, Position};
use tiny_steps_rendering::{
    CellContent, Color, CommandToken, FrameInput, Presentation, RenderingBackend, Scene,
    TokenState,
};

use crate::input;

const RESET: &str = "\u{1b}[0m";

/// Rendering backend that reads input lines and writes text frames.
///
/// Lines are read on a separate thread. While the scene is idle the backend
/// waits for the next line; during playback it only takes lines that are
/// already available, so a `reset` typed mid-playback cancels it.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    reader: R,
    writer: W,
    frame_interval: Duration,
    interactive: bool,
    ansi: bool,
}

impl<R, W> TerminalBackend<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    pub(crate) fn new(reader: R, writer: W, frame_interval: Duration) -> Self {
        Self {
            reader,
            writer,
            frame_interval,
            interactive: false,
            ansi: false,
        }
    }

    /// Prompts before each blocking read and sleeps one frame interval per playing frame.
    #[must_use]
    pub(crate) fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Paints tokens in their command colors and cells in the presentation background.
    #[must_use]
    pub(crate) fn ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let Self {
            reader,
            mut writer,
            frame_interval,
            interactive,
            ansi,
        } = self;
        let Presentation {
            title,
            background,
            mut scene,
        } = presentation;
        let background = ansi.then_some(background);
        let lines = spawn_reader(reader);
        writeln!(writer, "{title}")?;

        let mut drawn: Option<Scene> = None;
        loop {
            if drawn.as_ref() != Some(&scene) {
                writer.write_all(draw(&scene, background).as_bytes())?;
                drawn = Some(scene.clone());
            }

            let playing = scene.status == PlaybackStatus::Playing;
            let frame_input = next_input(&lines, &mut writer, playing, interactive)?;
            let quit = frame_input.quit;

            update_scene(frame_interval, frame_input, &mut scene);
            if quit {
                break;
            }
            if playing && interactive {
                thread::sleep(frame_interval);
            }
        }

        writer.flush()?;
        Ok(())
    }
}

fn spawn_reader<R>(reader: R) -> Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let _ = thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if sender.send(line).is_err() || failed {
                break;
            }
        }
    });
    receiver
}

/// Input for the next frame.
///
/// Idle frames block until a line arrives and quit once input is exhausted.
/// Playing frames never block: without a pending line they get empty input.
fn next_input<W>(
    lines: &Receiver<io::Result<String>>,
    writer: &mut W,
    playing: bool,
    interactive: bool,
) -> Result<FrameInput>
where
    W: Write,
{
    loop {
        let line = if playing {
            match lines.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                    return Ok(FrameInput::default())
                }
            }
        } else {
            if interactive {
                write!(writer, "> ")?;
                writer.flush()?;
            }
            match lines.recv() {
                Ok(line) => line,
                Err(_) => {
                    return Ok(FrameInput {
                        quit: true,
                        ..FrameInput::default()
                    })
                }
            }
        };

        let line = line.context("failed to read input")?;
        match input::parse_line(&line) {
            Ok(input) => return Ok(input),
            Err(error) => writeln!(writer, "{error}")?,
        }
    }
}

/// Renders the scene as text: a status line, the grid, the queue and the banner.
///
/// With a `background`, cells and tokens are painted with ANSI truecolor escapes.
pub(crate) fn draw(scene: &Scene, background: Option<Color>) -> String {
    let mut text = String::new();
    let color = scene.selected_color.name().unwrap_or("custom");
    let _ = writeln!(
        text,
        "path {}/{}  color {}  [{}]",
        scene.active_path + 1,
        scene.path_count,
        color,
        status_label(scene.status),
    );

    let size = i32::try_from(scene.grid_size).unwrap_or(i32::MAX);
    for y in 0..size {
        let row: Vec<String> = (0..size)
            .map(|x| {
                let glyph = glyph(scene.cell(Position::new(x, y)));
                match background {
                    Some(background) => {
                        let (red, green, blue) = background.to_rgb_u8();
                        format!("\u{1b}[30;48;2;{red};{green};{blue}m{glyph}{RESET}")
                    }
                    None => glyph.to_owned(),
                }
            })
            .collect();
        let _ = writeln!(text, "{}", row.join(" "));
    }

    let tokens: Vec<String> = scene
        .commands
        .iter()
        .map(|command| token(command, background.is_some()))
        .collect();
    if tokens.is_empty() {
        text.push_str("queue: (empty)\n");
    } else {
        let _ = writeln!(text, "queue: {}", tokens.join(" "));
    }

    if let Some(banner) = scene.banner() {
        let _ = writeln!(text, "{}", banner.text());
    }
    text
}

fn glyph(content: CellContent) -> &'static str {
    match content {
        CellContent::Empty => ".",
        CellContent::Obstacle => "#",
        CellContent::Goal => "G",
        CellContent::Player => "P",
    }
}

fn arrow(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

fn token(token: &CommandToken, ansi: bool) -> String {
    let initial = token
        .color
        .name()
        .and_then(|name| name.chars().next())
        .unwrap_or('?');
    let mut label = format!("{}{}", arrow(token.direction), initial);
    if ansi {
        // Executed commands fade towards white.
        let color = match token.state {
            TokenState::Executed => Color::from(token.color).lighten(0.5),
            TokenState::Pending | TokenState::Current => Color::from(token.color),
        };
        let (red, green, blue) = color.to_rgb_u8();
        label = format!("\u{1b}[38;2;{red};{green};{blue}m{label}{RESET}");
    }
    match token.state {
        TokenState::Pending => label,
        TokenState::Current => format!("[{label}]"),
        TokenState::Executed => format!("({label})"),
    }
}

fn status_label(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Idle => "idle",
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Won => "won",
        PlaybackStatus::Lost => "lost",
    }
}
