pub mod clock;

use std::time::Duration;

use bracket_random::prelude::RandomNumberGenerator;

use crate::{
    error::{GameError, GameResult},
    guess::{Evaluation, Guess, MagicNumber, MatchMask, evaluate},
    input::GameEvent,
    leaderboard::ScoreRecord,
};

pub use clock::{Clock, MonotonicClock};

pub const MAX_USERNAME_LEN: usize = 49;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Title,
    AwaitingUsername,
    LevelInProgress { level: u8 },
    /// Exact match found; waiting for the player to advance.
    LevelCleared { level: u8 },
    Completed,
    Abandoned,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LevelRules {
    pub levels: u8,
    pub first_level_digits: usize,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            levels: 3,
            first_level_digits: 4,
        }
    }
}

impl LevelRules {
    pub fn digits_for(&self, level: u8) -> usize {
        self.first_level_digits + usize::from(level.saturating_sub(1))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub attempts_total: u32,
    pub attempts_with_hit: u32,
}

impl SessionStats {
    fn record(&mut self, evaluation: &Evaluation) {
        self.attempts_total += 1;
        if evaluation.has_any_correct_digit {
            self.attempts_with_hit += 1;
        }
    }

    pub fn success_ratio(&self) -> f64 {
        if self.attempts_total == 0 {
            return 0.0;
        }
        f64::from(self.attempts_with_hit) / f64::from(self.attempts_total) * 100.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Started,
    UsernameAccepted { level: u8, digits: usize },
    Missed(Evaluation),
    LevelCleared { level: u8, evaluation: Evaluation },
    LevelStarted { level: u8, digits: usize },
    Completed(ScoreRecord),
    Restarted { level: u8, digits: usize },
    Abandoned,
}

pub fn validate_username(name: &str) -> GameResult<()> {
    if name.is_empty() {
        return Err(GameError::UsernameRejected("a username is required"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(GameError::UsernameRejected("usernames cannot contain spaces"));
    }
    Ok(())
}

/// One playthrough, from username entry to the score screen.
///
/// The timer starts when the username is accepted, which is also when
/// level 1 begins, and keeps running while a cleared level waits for the
/// player to advance.
pub struct Session {
    rules: LevelRules,
    phase: Phase,
    username: String,
    magic: Option<MagicNumber>,
    attempt: Guess,
    last_mask: Option<MatchMask>,
    stats: SessionStats,
    started_at: Option<Duration>,
    time_taken: Option<Duration>,
}

impl Session {
    pub fn new(rules: LevelRules) -> Self {
        Self {
            rules,
            phase: Phase::Title,
            username: String::new(),
            magic: None,
            attempt: Guess::new(),
            last_mask: None,
            stats: SessionStats::default(),
            started_at: None,
            time_taken: None,
        }
    }

    pub fn handle<C: Clock + ?Sized>(
        &mut self,
        event: GameEvent,
        clock: &C,
        rng: &mut RandomNumberGenerator,
    ) -> GameResult<Option<Outcome>> {
        if event == GameEvent::Quit {
            if self.phase == Phase::Abandoned {
                return Ok(None);
            }
            self.abandon();
            return Ok(Some(Outcome::Abandoned));
        }

        match (self.phase, event) {
            (Phase::Title, GameEvent::Confirm) => {
                self.phase = Phase::AwaitingUsername;
                Ok(Some(Outcome::Started))
            }
            (Phase::AwaitingUsername, _) => self.edit_username(event, clock, rng),
            (Phase::LevelInProgress { level }, GameEvent::Digit(digit)) => {
                self.enter_digit(level, digit, clock)
            }
            (Phase::LevelInProgress { .. }, GameEvent::Backspace) => {
                self.attempt.pop();
                Ok(None)
            }
            (Phase::LevelCleared { level }, GameEvent::Confirm) => {
                let next = level + 1;
                self.start_level(next, rng);
                Ok(Some(Outcome::LevelStarted {
                    level: next,
                    digits: self.rules.digits_for(next),
                }))
            }
            (Phase::Completed, GameEvent::Confirm) => {
                self.begin_run(clock, rng);
                Ok(Some(Outcome::Restarted {
                    level: 1,
                    digits: self.rules.digits_for(1),
                }))
            }
            _ => Ok(None),
        }
    }

    fn edit_username<C: Clock + ?Sized>(
        &mut self,
        event: GameEvent,
        clock: &C,
        rng: &mut RandomNumberGenerator,
    ) -> GameResult<Option<Outcome>> {
        match event {
            GameEvent::Text(c) => self.push_name_char(c),
            GameEvent::Digit(d) => self.push_name_char(char::from(b'0' + d)),
            GameEvent::Backspace => {
                self.username.pop();
            }
            GameEvent::Confirm => {
                if let Err(err) = validate_username(&self.username) {
                    self.username.clear();
                    return Err(err);
                }
                self.begin_run(clock, rng);
                return Ok(Some(Outcome::UsernameAccepted {
                    level: 1,
                    digits: self.rules.digits_for(1),
                }));
            }
            GameEvent::Quit => {}
        }
        Ok(None)
    }

    fn push_name_char(&mut self, c: char) {
        if self.username.chars().count() < MAX_USERNAME_LEN {
            self.username.push(c);
        }
    }

    fn begin_run<C: Clock + ?Sized>(&mut self, clock: &C, rng: &mut RandomNumberGenerator) {
        self.stats = SessionStats::default();
        self.started_at = Some(clock.now());
        self.time_taken = None;
        self.start_level(1, rng);
    }

    fn start_level(&mut self, level: u8, rng: &mut RandomNumberGenerator) {
        self.magic = Some(MagicNumber::generate(rng, self.rules.digits_for(level)));
        self.attempt.clear();
        self.last_mask = None;
        self.phase = Phase::LevelInProgress { level };
    }

    fn enter_digit<C: Clock + ?Sized>(
        &mut self,
        level: u8,
        digit: u8,
        clock: &C,
    ) -> GameResult<Option<Outcome>> {
        let Some(magic) = self.magic.as_ref() else {
            return Ok(None);
        };
        if self.attempt.len() >= magic.len() {
            return Ok(None);
        }
        self.attempt.push(digit);
        if self.attempt.len() < magic.len() {
            return Ok(None);
        }

        let evaluation = evaluate(magic, &self.attempt)?;
        self.stats.record(&evaluation);
        self.attempt.clear();
        self.last_mask = Some(evaluation.mask.clone());
        if !evaluation.is_exact_match {
            return Ok(Some(Outcome::Missed(evaluation)));
        }

        self.magic = None;
        if level >= self.rules.levels {
            self.time_taken = Some(self.elapsed(clock));
            self.phase = Phase::Completed;
            Ok(Some(Outcome::Completed(self.score_record())))
        } else {
            self.phase = Phase::LevelCleared { level };
            Ok(Some(Outcome::LevelCleared { level, evaluation }))
        }
    }

    fn abandon(&mut self) {
        self.phase = Phase::Abandoned;
        self.magic = None;
        self.attempt.clear();
    }

    fn score_record(&self) -> ScoreRecord {
        let secs = self.time_taken.map(|d| d.as_secs()).unwrap_or_default();
        ScoreRecord::new(self.username.clone(), secs, self.stats.success_ratio())
    }

    /// Live elapsed time, frozen once the final level is matched.
    pub fn elapsed<C: Clock + ?Sized>(&self, clock: &C) -> Duration {
        if let Some(taken) = self.time_taken {
            return taken;
        }
        self.started_at
            .map(|start| clock.now().saturating_sub(start))
            .unwrap_or_default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> LevelRules {
        self.rules
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn attempt(&self) -> &Guess {
        &self.attempt
    }

    pub fn last_mask(&self) -> Option<&MatchMask> {
        self.last_mask.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn magic_number(&self) -> Option<&MagicNumber> {
        self.magic.as_ref()
    }

    pub fn level(&self) -> Option<u8> {
        match self.phase {
            Phase::LevelInProgress { level } | Phase::LevelCleared { level } => Some(level),
            Phase::Completed => Some(self.rules.levels),
            _ => None,
        }
    }

    pub fn digit_length(&self) -> Option<usize> {
        self.level().map(|level| self.rules.digits_for(level))
    }

    #[cfg(test)]
    pub fn set_magic_number(&mut self, magic: MagicNumber) {
        assert!(matches!(self.phase, Phase::LevelInProgress { .. }));
        self.magic = Some(magic);
    }
}
