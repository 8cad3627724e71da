use std::{fmt, str::FromStr};

use bracket_random::prelude::RandomNumberGenerator;
use smallvec::SmallVec;

use crate::error::{GameError, GameResult};

pub type Digits = SmallVec<[u8; 8]>;

pub const MISS_GLYPH: char = '-';

fn parse_digits(text: &str) -> GameResult<Digits> {
    text.chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| GameError::InvalidInput(format!("'{c}' is not a decimal digit")))
        })
        .collect()
}

fn write_digits(f: &mut fmt::Formatter<'_>, digits: &[u8]) -> fmt::Result {
    for digit in digits {
        write!(f, "{digit}")?;
    }
    Ok(())
}

/// The hidden target for one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicNumber {
    digits: Digits,
}

impl MagicNumber {
    pub fn generate(rng: &mut RandomNumberGenerator, length: usize) -> Self {
        let digits = (0..length).map(|_| rng.range(0u8, 10u8)).collect();
        Self { digits }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }
}

impl FromStr for MagicNumber {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            digits: parse_digits(s)?,
        })
    }
}

impl fmt::Display for MagicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_digits(f, &self.digits)
    }
}

/// Digits typed so far for the current attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Guess {
    digits: Digits,
}

impl Guess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, digit: u8) {
        debug_assert!(digit < 10);
        self.digits.push(digit);
    }

    pub fn pop(&mut self) -> Option<u8> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Typed digits followed by placeholders up to `width`.
    pub fn padded(&self, width: usize) -> String {
        let mut line: String = self
            .digits
            .iter()
            .map(|d| char::from(b'0' + d))
            .collect();
        for _ in self.digits.len()..width {
            line.push(MISS_GLYPH);
        }
        line
    }
}

impl FromStr for Guess {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            digits: parse_digits(s)?,
        })
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_digits(f, &self.digits)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Hit(u8),
    Miss,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchMask {
    cells: SmallVec<[Cell; 8]>,
}

impl MatchMask {
    pub fn hits(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Hit(_)))
            .count()
    }

    #[cfg(test)]
    pub fn is_all_miss(&self) -> bool {
        self.hits() == 0
    }
}

impl fmt::Display for MatchMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            match cell {
                Cell::Hit(digit) => write!(f, "{digit}")?,
                Cell::Miss => write!(f, "{MISS_GLYPH}")?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub is_exact_match: bool,
    pub has_any_correct_digit: bool,
    pub mask: MatchMask,
}

/// Compares a full-length guess against the magic number position by position.
pub fn evaluate(magic: &MagicNumber, guess: &Guess) -> GameResult<Evaluation> {
    if guess.len() != magic.len() {
        return Err(GameError::InvalidInput(format!(
            "guess has {} digits but the magic number has {}",
            guess.len(),
            magic.len()
        )));
    }

    let cells: SmallVec<[Cell; 8]> = magic
        .digits()
        .iter()
        .zip(guess.digits())
        .map(|(&want, &got)| if want == got { Cell::Hit(want) } else { Cell::Miss })
        .collect();
    let mask = MatchMask { cells };
    let hits = mask.hits();

    Ok(Evaluation {
        is_exact_match: hits == magic.len(),
        has_any_correct_digit: hits > 0,
        mask,
    })
}
