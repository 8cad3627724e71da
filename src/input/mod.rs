pub mod scripted;

use bracket_terminal::prelude::VirtualKeyCode;

pub use scripted::ScriptedInput;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Digit(u8),
    Text(char),
    Backspace,
    Confirm,
    Quit,
}

pub fn key_event(key: VirtualKeyCode, shift: bool) -> Option<GameEvent> {
    use VirtualKeyCode::*;

    let event = match key {
        Key0 | Numpad0 => GameEvent::Digit(0),
        Key1 | Numpad1 => GameEvent::Digit(1),
        Key2 | Numpad2 => GameEvent::Digit(2),
        Key3 | Numpad3 => GameEvent::Digit(3),
        Key4 | Numpad4 => GameEvent::Digit(4),
        Key5 | Numpad5 => GameEvent::Digit(5),
        Key6 | Numpad6 => GameEvent::Digit(6),
        Key7 | Numpad7 => GameEvent::Digit(7),
        Key8 | Numpad8 => GameEvent::Digit(8),
        Key9 | Numpad9 => GameEvent::Digit(9),
        Back | Delete => GameEvent::Backspace,
        Return | NumpadEnter => GameEvent::Confirm,
        Escape => GameEvent::Quit,
        Space => GameEvent::Text(' '),
        Minus if shift => GameEvent::Text('_'),
        Minus => GameEvent::Text('-'),
        other => {
            let letter = letter(other)?;
            GameEvent::Text(if shift {
                letter.to_ascii_uppercase()
            } else {
                letter
            })
        }
    };
    Some(event)
}

fn letter(key: VirtualKeyCode) -> Option<char> {
    use VirtualKeyCode::*;

    const LETTERS: [(VirtualKeyCode, char); 26] = [
        (A, 'a'),
        (B, 'b'),
        (C, 'c'),
        (D, 'd'),
        (E, 'e'),
        (F, 'f'),
        (G, 'g'),
        (H, 'h'),
        (I, 'i'),
        (J, 'j'),
        (K, 'k'),
        (L, 'l'),
        (M, 'm'),
        (N, 'n'),
        (O, 'o'),
        (P, 'p'),
        (Q, 'q'),
        (R, 'r'),
        (S, 's'),
        (T, 't'),
        (U, 'u'),
        (V, 'v'),
        (W, 'w'),
        (X, 'x'),
        (Y, 'y'),
        (Z, 'z'),
    ];
    LETTERS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, c)| *c)
}
