use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use super::GameEvent;

/// Key events replayed from a text file, one per frame.
pub struct ScriptedInput {
    script_events: Vec<GameEvent>,
    current_event_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script_events = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue; // Skip empty lines and comments
            }

            for char_code in trimmed_line.chars().filter(|c| !c.is_whitespace()) {
                if let Some(event) = char_to_event(char_code) {
                    script_events.push(event);
                } else {
                    log::warn!("Unknown key in script: {:?}", char_code);
                }
            }
        }

        Ok(Self {
            script_events,
            current_event_index: 0,
        })
    }

    pub fn next_event(&mut self) -> Option<GameEvent> {
        let event = self.script_events.get(self.current_event_index).copied()?;
        self.current_event_index += 1;
        Some(event)
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_event_index >= self.script_events.len()
    }
}

fn char_to_event(c: char) -> Option<GameEvent> {
    match c {
        '0'..='9' => c.to_digit(10).map(|d| GameEvent::Digit(d as u8)),
        'a'..='z' | 'A'..='Z' | '_' | '-' => Some(GameEvent::Text(c)),
        '!' => Some(GameEvent::Backspace),
        '.' => Some(GameEvent::Confirm),
        '~' | '\x1B' => Some(GameEvent::Quit),
        '^' => Some(GameEvent::Text(' ')), // Literal space; plain spaces are separators
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_events_in_order() {
        let script = "# start, name, guesses\n.\nann.\n12!3 4\n~\n";
        let mut input = ScriptedInput::from_reader(script.as_bytes()).unwrap();
        let mut events = Vec::new();
        while let Some(event) = input.next_event() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                GameEvent::Confirm,
                GameEvent::Text('a'),
                GameEvent::Text('n'),
                GameEvent::Text('n'),
                GameEvent::Confirm,
                GameEvent::Digit(1),
                GameEvent::Digit(2),
                GameEvent::Backspace,
                GameEvent::Digit(3),
                GameEvent::Digit(4),
                GameEvent::Quit,
            ]
        );
        assert!(input.is_exhausted());
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let mut input = ScriptedInput::from_reader("1?2".as_bytes()).unwrap();
        assert_eq!(input.next_event(), Some(GameEvent::Digit(1)));
        assert_eq!(input.next_event(), Some(GameEvent::Digit(2)));
        assert_eq!(input.next_event(), None);
    }
}
