//! Translation of typed words into frame input.

use thiserror::Error;
use tiny_steps_core::{CommandColor, Direction};
use tiny_steps_rendering::FrameInput;

/// Errors raised while interpreting a line of player input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    /// The word is neither a direction nor a known instruction.
    #[error("unrecognised input '{0}'")]
    UnknownWord(String),
    /// A color instruction was not followed by a color name.
    #[error("'{0}' expects a color name")]
    MissingColor(String),
    /// The color name is not part of the palette.
    #[error("unknown color '{}' (choose one of: {})", .0, palette_names())]
    UnknownColor(String),
    /// A program contains a character that is not a direction.
    #[error("program contains '{0}', expected only u, d, l or r")]
    InvalidProgramStep(char),
}

/// Parses a single input line into the input of one frame.
pub(crate) fn parse_line(line: &str) -> Result<FrameInput, InputError> {
    let mut input = FrameInput::default();
    let mut words = line.split_whitespace();

    while let Some(word) = words.next() {
        let lowered = word.to_ascii_lowercase();
        match lowered.as_str() {
            "go" | "play" => input.start_playback = true,
            "reset" => input.reset = true,
            "next" | "n" => input.next_path = true,
            "quit" | "q" | "exit" => input.quit = true,
            "c" | "color" => input.select_color = Some(color_after(&lowered, words.next())?),
            "k" | "recolor" => input.recolor_last = Some(color_after(&lowered, words.next())?),
            "up" => input.queued.push(Direction::Up),
            "down" => input.queued.push(Direction::Down),
            "left" => input.queued.push(Direction::Left),
            "right" => input.queued.push(Direction::Right),
            _ => match directions(&lowered) {
                Some(steps) => input.queued.extend(steps),
                None => return Err(InputError::UnknownWord(word.to_owned())),
            },
        }
    }

    Ok(input)
}

/// Parses a compact program such as `RRDD` or `r, r, d, d`.
pub(crate) fn parse_program(program: &str) -> Result<Vec<Direction>, InputError> {
    program
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .map(|ch| direction(ch).ok_or(InputError::InvalidProgramStep(ch)))
        .collect()
}

/// Resolves a palette color by name.
pub(crate) fn parse_color(name: &str) -> Result<CommandColor, InputError> {
    CommandColor::named(name).ok_or_else(|| InputError::UnknownColor(name.to_owned()))
}

/// Letter used to type the provided direction.
pub(crate) const fn letter(direction: Direction) -> char {
    match direction {
        Direction::Up => 'u',
        Direction::Down => 'd',
        Direction::Left => 'l',
        Direction::Right => 'r',
    }
}

fn color_after(instruction: &str, name: Option<&str>) -> Result<CommandColor, InputError> {
    let name = name.ok_or_else(|| InputError::MissingColor(instruction.to_owned()))?;
    parse_color(name)
}

fn directions(word: &str) -> Option<Vec<Direction>> {
    word.chars().map(direction).collect()
}

fn direction(ch: char) -> Option<Direction> {
    match ch.to_ascii_lowercase() {
        'u' => Some(Direction::Up),
        'd' => Some(Direction::Down),
        'l' => Some(Direction::Left),
        'r' => Some(Direction::Right),
        _ => None,
    }
}

fn palette_names() -> String {
    CommandColor::PALETTE
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
