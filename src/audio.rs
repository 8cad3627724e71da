use std::io::{self, Write};

use crossterm::{queue, style::Print};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    LevelCleared,
    RunCompleted,
}

/// Fire-and-forget sound output. Callers never query playback state.
pub trait AudioPlayer {
    fn loop_track(&mut self, track: &str);
    fn cue(&mut self, cue: Cue);
}

/// Terminal backend: no mixer, cues ring the terminal bell.
#[derive(Default)]
pub struct TerminalAudio {
    current_track: Option<String>,
}

impl TerminalAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioPlayer for TerminalAudio {
    fn loop_track(&mut self, track: &str) {
        if self.current_track.as_deref() == Some(track) {
            return;
        }
        log::info!("Background track '{track}' requested; terminal audio only rings the bell");
        self.current_track = Some(track.to_string());
    }

    fn cue(&mut self, cue: Cue) {
        let rings = match cue {
            Cue::LevelCleared => 1,
            Cue::RunCompleted => 2,
        };
        let mut out = io::stdout();
        for _ in 0..rings {
            if let Err(err) = queue!(out, Print('\u{7}')) {
                log::debug!("Bell unavailable: {err}");
                return;
            }
        }
        let _ = out.flush();
    }
}
