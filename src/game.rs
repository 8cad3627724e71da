use bracket_random::prelude::RandomNumberGenerator;
use chrono::{DateTime, Local};

use crate::{
    audio::{AudioPlayer, Cue},
    config::GameConfig,
    error::GameError,
    input::GameEvent,
    leaderboard::{LeaderboardStore, MergeOutcome, ScoreRecord},
    session::{Clock, LevelRules, Outcome, Phase, Session},
};

pub const LOG_MAX_ENTRIES: usize = 8;

/// Everything one running game owns: the session, the store and the
/// collaborators it talks to.
pub struct Game {
    config: GameConfig,
    session: Session,
    store: LeaderboardStore,
    rng: RandomNumberGenerator,
    audio: Box<dyn AudioPlayer>,
    message_log: Vec<String>,
    standings: Vec<ScoreRecord>,
    last_record: Option<ScoreRecord>,
    merge_outcome: Option<MergeOutcome>,
    run_started: Option<DateTime<Local>>,
}

impl Game {
    pub fn new(config: GameConfig, audio: Box<dyn AudioPlayer>) -> Self {
        let rng = match config.seed {
            Some(seed) => RandomNumberGenerator::seeded(seed),
            None => RandomNumberGenerator::new(),
        };
        let rules = LevelRules {
            levels: config.levels,
            first_level_digits: config.first_level_digits,
        };
        let store = LeaderboardStore::new(&config.leaderboard_path);
        Self {
            config,
            session: Session::new(rules),
            store,
            rng,
            audio,
            message_log: vec!["Press Enter to start, Esc to quit.".to_string()],
            standings: Vec::new(),
            last_record: None,
            merge_outcome: None,
            run_started: None,
        }
    }

    pub fn apply<C: Clock + ?Sized>(&mut self, event: GameEvent, clock: &C) {
        match self.session.handle(event, clock, &mut self.rng) {
            Ok(Some(outcome)) => self.on_outcome(outcome),
            Ok(None) => {}
            Err(err @ GameError::UsernameRejected(_)) => {
                log::info!("{err}");
                self.push_log_entry(err.to_string());
            }
            Err(err) => {
                log::error!("Session rejected {event:?}: {err}");
                self.push_log_entry(err.to_string());
            }
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Started => {
                self.push_log_entry("Enter a username (no spaces) and press Enter.");
            }
            Outcome::UsernameAccepted { level, digits } => {
                log::info!("Player {} starts a run", self.session.username());
                self.begin_run();
                self.announce_level(level, digits);
            }
            Outcome::Restarted { level, digits } => {
                log::info!("Player {} replays", self.session.username());
                self.standings.clear();
                self.last_record = None;
                self.merge_outcome = None;
                self.begin_run();
                self.announce_level(level, digits);
            }
            Outcome::LevelStarted { level, digits } => self.announce_level(level, digits),
            Outcome::Missed(evaluation) => {
                log::debug!(
                    "Miss: mask {} ({} hits)",
                    evaluation.mask,
                    evaluation.mask.hits()
                );
                self.push_log_entry(format!("Guess: {}", evaluation.mask));
                self.push_log_entry("Incorrect guess. Try again!");
            }
            Outcome::LevelCleared { level, evaluation } => {
                log::info!("Level {level} cleared with {}", evaluation.mask);
                self.audio.cue(Cue::LevelCleared);
                self.push_log_entry(format!(
                    "Correct guess! Press Enter for level {}.",
                    level + 1
                ));
            }
            Outcome::Completed(record) => {
                log::info!(
                    "Run completed by {} in {}s at {:.2}%",
                    record.username,
                    record.elapsed_secs,
                    record.success_ratio
                );
                self.audio.cue(Cue::RunCompleted);
                self.push_log_entry("Correct guess! All levels cleared.");
                self.store_result(record);
            }
            Outcome::Abandoned => {
                log::info!("Run abandoned; nothing recorded");
            }
        }
    }

    fn begin_run(&mut self) {
        self.run_started = Some(Local::now());
        if let Some(track) = self.config.background_track.as_deref() {
            self.audio.loop_track(track);
        }
    }

    fn announce_level(&mut self, level: u8, digits: usize) {
        if self.config.reveal_magic_number {
            if let Some(magic) = self.session.magic_number() {
                log::debug!("Magic number for level {level}: {magic}");
            }
        }
        self.push_log_entry(format!(
            "Level {level}/{}: guess the {digits}-digit number.",
            self.config.levels
        ));
    }

    fn store_result(&mut self, record: ScoreRecord) {
        let (board, outcome, saved) = self.store.record(record.clone());
        match saved {
            Ok(()) => log::info!("Leaderboard saved to {}", self.store.path().display()),
            Err(err) => {
                log::warn!("{err}; this score is lost");
                self.push_log_entry("Could not save the leaderboard; this score is lost.");
            }
        }
        self.push_log_entry(match &outcome {
            MergeOutcome::Inserted => "Score recorded.".to_string(),
            MergeOutcome::Improved { previous } => {
                format!("New personal best! Previous ratio {previous}%.")
            }
            MergeOutcome::Kept { best } => format!("Your best ratio of {best}% stands."),
        });
        self.standings = board.top(self.config.display_top).to_vec();
        self.last_record = Some(record);
        self.merge_outcome = Some(outcome);
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    pub fn is_finished(&self) -> bool {
        self.session.phase() == Phase::Abandoned
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn message_log(&self) -> &[String] {
        &self.message_log
    }

    pub fn standings(&self) -> &[ScoreRecord] {
        &self.standings
    }

    pub fn last_record(&self) -> Option<&ScoreRecord> {
        self.last_record.as_ref()
    }

    pub fn merge_outcome(&self) -> Option<&MergeOutcome> {
        self.merge_outcome.as_ref()
    }

    pub fn run_started(&self) -> Option<DateTime<Local>> {
        self.run_started
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs, path::PathBuf, rc::Rc};

    use super::*;
    use crate::session::clock::manual::ManualClock;

    #[derive(Clone, Default)]
    struct RecordingAudio {
        cues: Rc<RefCell<Vec<Cue>>>,
        tracks: Rc<RefCell<Vec<String>>>,
    }

    impl AudioPlayer for RecordingAudio {
        fn loop_track(&mut self, track: &str) {
            self.tracks.borrow_mut().push(track.to_string());
        }

        fn cue(&mut self, cue: Cue) {
            self.cues.borrow_mut().push(cue);
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "number-guess-game-{name}-{}.txt",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    fn game(path: &PathBuf, audio: RecordingAudio) -> Game {
        let config = GameConfig {
            leaderboard_path: path.clone(),
            seed: Some(99),
            background_track: Some("theme.ogg".to_string()),
            ..GameConfig::default()
        };
        Game::new(config, Box::new(audio))
    }

    fn send_text(game: &mut Game, clock: &ManualClock, text: &str) {
        for c in text.chars() {
            let event = match c.to_digit(10) {
                Some(d) => GameEvent::Digit(d as u8),
                None => GameEvent::Text(c),
            };
            game.apply(event, clock);
        }
    }

    fn solve(game: &mut Game, clock: &ManualClock) {
        let magic = game.session().magic_number().unwrap().to_string();
        send_text(game, clock, &magic);
    }

    fn login(game: &mut Game, clock: &ManualClock, name: &str) {
        game.apply(GameEvent::Confirm, clock);
        send_text(game, clock, name);
        game.apply(GameEvent::Confirm, clock);
    }

    #[test]
    fn completed_run_is_persisted_and_ranked() {
        let path = scratch("complete");
        fs::write(&path, "bob 120 60.00\n").unwrap();
        let audio = RecordingAudio::default();
        let mut game = game(&path, audio.clone());
        let clock = ManualClock::default();

        login(&mut game, &clock, "alice");
        clock.advance_secs(30);
        solve(&mut game, &clock);
        game.apply(GameEvent::Confirm, &clock);
        solve(&mut game, &clock);
        game.apply(GameEvent::Confirm, &clock);
        solve(&mut game, &clock);

        assert_eq!(game.session().phase(), Phase::Completed);
        assert_eq!(game.merge_outcome(), Some(&MergeOutcome::Inserted));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "alice 30 100.00\nbob 120 60.00\n"
        );
        let names: Vec<&str> = game.standings().iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
        assert_eq!(
            *audio.cues.borrow(),
            vec![Cue::LevelCleared, Cue::LevelCleared, Cue::RunCompleted]
        );
        assert_eq!(*audio.tracks.borrow(), vec!["theme.ogg".to_string()]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn abandoning_on_final_level_persists_nothing() {
        let path = scratch("abandon");
        let mut game = game(&path, RecordingAudio::default());
        let clock = ManualClock::default();

        login(&mut game, &clock, "eve");
        solve(&mut game, &clock);
        game.apply(GameEvent::Confirm, &clock);
        solve(&mut game, &clock);
        game.apply(GameEvent::Confirm, &clock);
        send_text(&mut game, &clock, "123");
        game.apply(GameEvent::Quit, &clock);

        assert!(game.is_finished());
        assert!(!path.exists());
        assert!(game.standings().is_empty());
    }

    #[test]
    fn rejected_username_is_reported_in_the_log() {
        let path = scratch("reject");
        let mut game = game(&path, RecordingAudio::default());
        let clock = ManualClock::default();

        login(&mut game, &clock, "a b");
        assert_eq!(game.session().phase(), Phase::AwaitingUsername);
        assert!(game.message_log()[0].contains("cannot contain spaces"));
    }

    #[test]
    fn miss_feedback_shows_mask() {
        let path = scratch("miss");
        let mut game = game(&path, RecordingAudio::default());
        let clock = ManualClock::default();

        login(&mut game, &clock, "fay");
        let magic = game.session().magic_number().unwrap().to_string();
        let wrong: String = magic
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if i == 0 {
                    c
                } else {
                    char::from(b'0' + (c.to_digit(10).unwrap() as u8 + 1) % 10)
                }
            })
            .collect();
        send_text(&mut game, &clock, &wrong);

        assert_eq!(game.message_log()[0], "Incorrect guess. Try again!");
        assert_eq!(
            game.message_log()[1],
            format!("Guess: {}---", &magic[..1])
        );
        assert_eq!(game.session().stats().attempts_with_hit, 1);
    }

    #[test]
    fn replay_after_completion_keeps_best_score() {
        let path = scratch("replay");
        let mut game = game(&path, RecordingAudio::default());
        let clock = ManualClock::default();

        login(&mut game, &clock, "gus");
        for _ in 0..3 {
            solve(&mut game, &clock);
            game.apply(GameEvent::Confirm, &clock);
        }
        assert!(game.standings().is_empty());
        assert_eq!(
            game.session().phase(),
            Phase::LevelInProgress { level: 1 }
        );

        // A weaker second run: one all-miss guess on level 1.
        let magic = game.session().magic_number().unwrap().to_string();
        let all_miss: String = magic
            .chars()
            .map(|c| char::from(b'0' + (c.to_digit(10).unwrap() as u8 + 1) % 10))
            .collect();
        send_text(&mut game, &clock, &all_miss);
        for level in 1..=3 {
            solve(&mut game, &clock);
            if level < 3 {
                game.apply(GameEvent::Confirm, &clock);
            }
        }

        assert_eq!(game.session().phase(), Phase::Completed);
        assert_eq!(
            game.merge_outcome(),
            Some(&MergeOutcome::Kept {
                best: "100.00".to_string()
            })
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "gus 0 100.00\n");
        let _ = fs::remove_file(&path);
    }
}
