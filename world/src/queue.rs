use tiny_steps_core::{Command, CommandColor};

/// Ordered commands awaiting playback. Insertion order is execution order.
#[derive(Clone, Debug, Default)]
pub(crate) struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub(crate) fn push(&mut self, command: Command) -> usize {
        self.commands.push(command);
        self.commands.len() - 1
    }

    pub(crate) fn recolor(&mut self, index: usize, color: CommandColor) -> bool {
        match self.commands.get_mut(index) {
            Some(slot) => {
                *slot = slot.recolored(color);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.commands.clear();
    }

    pub(crate) fn get(&self, index: usize) -> Option<Command> {
        self.commands.get(index).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn as_slice(&self) -> &[Command] {
        &self.commands
    }
}
