pub mod store;

use std::io::{self, Write};

pub use store::LeaderboardStore;

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRecord {
    pub username: String,
    pub elapsed_secs: u64,
    pub success_ratio: f64,
}

impl ScoreRecord {
    /// The ratio is kept at the two decimals the file stores, so a fresh
    /// record and its reloaded copy compare equal.
    pub fn new<S: Into<String>>(username: S, elapsed_secs: u64, success_ratio: f64) -> Self {
        Self {
            username: username.into(),
            elapsed_secs,
            success_ratio: (success_ratio * 100.0).round() / 100.0,
        }
    }

    /// Parses `username elapsed ratio`. Returns `None` for anything else.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let username = fields.next()?;
        let elapsed: f64 = fields.next()?.parse().ok()?;
        let ratio: f64 = fields.next()?.parse().ok()?;
        if fields.next().is_some() || !elapsed.is_finite() || elapsed < 0.0 || !ratio.is_finite()
        {
            return None;
        }
        Some(Self::new(username, elapsed.round() as u64, ratio))
    }

    pub fn to_line(&self) -> String {
        format!(
            "{} {} {:.2}",
            self.username, self.elapsed_secs, self.success_ratio
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Improved { previous: String },
    Kept { best: String },
}

/// One best record per username, in the order they were added or ranked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaderboard {
    records: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, username: &str) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    /// Replaces a same-name record only on a strictly higher ratio.
    pub fn upsert(&mut self, record: ScoreRecord) -> MergeOutcome {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.username == record.username)
        {
            Some(existing) if record.success_ratio > existing.success_ratio => {
                let previous = format!("{:.2}", existing.success_ratio);
                *existing = record;
                MergeOutcome::Improved { previous }
            }
            Some(existing) => MergeOutcome::Kept {
                best: format!("{:.2}", existing.success_ratio),
            },
            None => {
                self.records.push(record);
                MergeOutcome::Inserted
            }
        }
    }

    pub fn merge(mut self, record: ScoreRecord) -> Self {
        self.upsert(record);
        self
    }

    pub fn rank(mut self) -> Self {
        self.records
            .sort_by(|a, b| b.success_ratio.total_cmp(&a.success_ratio));
        self
    }

    pub fn top(&self, n: usize) -> &[ScoreRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Lines that do not hold a record are skipped; repeated usernames keep
    /// their best ratio.
    pub fn parse(text: &str) -> Self {
        let mut board = Self::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match ScoreRecord::parse_line(line) {
                Some(record) => board = board.merge(record),
                None => log::warn!("Skipping malformed leaderboard line {}", index + 1),
            }
        }
        board
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in &self.records {
            writeln!(writer, "{}", record.to_line())?;
        }
        writer.flush()
    }
}

impl FromIterator<ScoreRecord> for Leaderboard {
    fn from_iter<I: IntoIterator<Item = ScoreRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
