//! Keyboard shortcuts to editor commands.

use crate::input::{Key, KeyInput};
use crate::tools::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetTool(Tool),
    Undo,
    Redo,
    Duplicate,
    SelectAll,
    DeleteSelection,
    CancelDrag,
}

/// Resolve a key press outside of text editing. Text-field suppression is
/// the caller's job.
pub fn command_for(input: &KeyInput) -> Option<Command> {
    let mods = input.modifiers;
    match input.key {
        Key::Delete | Key::Backspace => Some(Command::DeleteSelection),
        Key::Escape => Some(Command::CancelDrag),
        Key::Enter => None,
        Key::Char(c) if mods.command() => match c.to_ascii_lowercase() {
            'z' if mods.shift => Some(Command::Redo),
            'z' => Some(Command::Undo),
            'y' => Some(Command::Redo),
            'd' => Some(Command::Duplicate),
            'a' => Some(Command::SelectAll),
            _ => None,
        },
        Key::Char(_) if mods.alt => None,
        Key::Char(c) => Tool::from_shortcut(c).map(Command::SetTool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn command_shortcuts() {
        assert_eq!(command_for(&KeyInput::command('z')), Some(Command::Undo));
        let redo = KeyInput::new(Key::Char('Z'), Modifiers { shift: true, ctrl: true, ..Modifiers::NONE });
        assert_eq!(command_for(&redo), Some(Command::Redo));
        let cmd_y = KeyInput::new(Key::Char('y'), Modifiers { meta: true, ..Modifiers::NONE });
        assert_eq!(command_for(&cmd_y), Some(Command::Redo));
        assert_eq!(command_for(&KeyInput::command('d')), Some(Command::Duplicate));
        assert_eq!(command_for(&KeyInput::command('a')), Some(Command::SelectAll));
    }

    #[test]
    fn plain_letters_switch_tools() {
        assert_eq!(command_for(&KeyInput::char('r')), Some(Command::SetTool(Tool::Rectangle)));
        assert_eq!(command_for(&KeyInput::char('x')), None);
    }

    #[test]
    fn delete_and_backspace_delete() {
        for key in [Key::Delete, Key::Backspace] {
            assert_eq!(
                command_for(&KeyInput::new(key, Modifiers::NONE)),
                Some(Command::DeleteSelection)
            );
        }
    }
}
