use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind},
    path::{Path, PathBuf},
};

use super::{Leaderboard, MergeOutcome, ScoreRecord};
use crate::error::{GameError, GameResult};

/// Sole reader and writer of the leaderboard file.
#[derive(Clone, Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Leaderboard {
        match fs::read_to_string(&self.path) {
            Ok(text) => Leaderboard::parse(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No leaderboard at {} yet", self.path.display());
                Leaderboard::new()
            }
            Err(err) => {
                log::warn!(
                    "Leaderboard at {} is unreadable ({err}); starting empty",
                    self.path.display()
                );
                Leaderboard::new()
            }
        }
    }

    /// Sibling file the board is written to before it replaces the store.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Rewrites the whole file in ranked order. The previous contents stay
    /// in place until the new board is fully written.
    pub fn save(&self, leaderboard: &Leaderboard) -> GameResult<()> {
        let unavailable = |source| GameError::PersistenceUnavailable {
            path: self.path.clone(),
            source,
        };
        let staging = self.staging_path();
        let ranked = leaderboard.clone().rank();
        let written = File::create(&staging).and_then(|file| {
            let mut writer = BufWriter::new(file);
            ranked.write_to(&mut writer)?;
            writer.into_inner().map_err(|err| err.into_error())?.sync_all()
        });
        if let Err(err) = written.and_then(|()| fs::rename(&staging, &self.path)) {
            let _ = fs::remove_file(&staging);
            return Err(unavailable(err));
        }
        Ok(())
    }

    /// Load, merge, save. The ranked board is returned even when the save
    /// fails so it can still be shown.
    pub fn record(
        &self,
        record: ScoreRecord,
    ) -> (Leaderboard, MergeOutcome, GameResult<()>) {
        let mut board = self.load();
        let outcome = board.upsert(record);
        let board = board.rank();
        let saved = self.save(&board);
        (board, outcome, saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "number-guess-{name}-{}.txt",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = LeaderboardStore::new(scratch("missing"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_writes_every_record_ranked() {
        let path = scratch("save");
        let store = LeaderboardStore::new(&path);
        let board: Leaderboard = (0..7)
            .map(|i| ScoreRecord::new(format!("p{i}"), 10 + i, (i * 10) as f64))
            .collect();
        store.save(&board).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "p6 16 60.00");
        assert_eq!(lines[6], "p0 10 0.00");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn worse_repeat_keeps_stored_best() {
        let path = scratch("bob");
        fs::write(&path, "bob 120 60.00\n").unwrap();
        let store = LeaderboardStore::new(&path);

        let (board, outcome, saved) = store.record(ScoreRecord::new("bob", 80, 50.0));
        assert!(saved.is_ok());
        assert_eq!(
            outcome,
            MergeOutcome::Kept {
                best: "60.00".to_string()
            }
        );
        assert_eq!(board.get("bob"), Some(&ScoreRecord::new("bob", 120, 60.0)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "bob 120 60.00\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn improvement_is_persisted() {
        let path = scratch("improve");
        fs::write(&path, "ann 30 20.00\nbob 120 60.00\n").unwrap();
        let store = LeaderboardStore::new(&path);

        let (_, outcome, saved) = store.record(ScoreRecord::new("ann", 44, 75.0));
        assert!(saved.is_ok());
        assert!(matches!(outcome, MergeOutcome::Improved { .. }));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "ann 44 75.00\nbob 120 60.00\n"
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rounded_ratio_repeat_keeps_stored_record() {
        let path = scratch("gus");
        fs::write(&path, "gus 10 33.33\n").unwrap();
        let store = LeaderboardStore::new(&path);

        let (_, outcome, saved) = store.record(ScoreRecord::new("gus", 99, 100.0 / 3.0));
        assert!(saved.is_ok());
        assert_eq!(
            outcome,
            MergeOutcome::Kept {
                best: "33.33".to_string()
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "gus 10 33.33\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_save_leaves_previous_board_intact() {
        let path = scratch("intact");
        fs::write(&path, "ann 30 20.00\nbob 120 60.00\n").unwrap();
        let store = LeaderboardStore::new(&path);
        // A directory squatting on the staging name makes the write fail.
        let staging = store.staging_path();
        let _ = fs::remove_file(&staging);
        fs::create_dir_all(&staging).unwrap();

        let (_, _, saved) = store.record(ScoreRecord::new("cy", 5, 90.0));
        assert!(matches!(
            saved,
            Err(GameError::PersistenceUnavailable { .. })
        ));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "ann 30 20.00\nbob 120 60.00\n"
        );
        assert!(staging.is_dir());
        let _ = fs::remove_dir(&staging);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_leaves_no_staging_file_behind() {
        let path = scratch("staging");
        let store = LeaderboardStore::new(&path);
        store.save(&Leaderboard::new().merge(ScoreRecord::new("dee", 1, 50.0))).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "dee 1 50.00\n");
        assert!(!store.staging_path().exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unwritable_location_reports_persistence_unavailable() {
        let dir = std::env::temp_dir().join(format!("number-guess-dir-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // A directory cannot be opened as a file for writing.
        let store = LeaderboardStore::new(&dir);

        let (board, outcome, saved) = store.record(ScoreRecord::new("zed", 5, 40.0));
        assert_eq!(outcome, MergeOutcome::Inserted);
        assert_eq!(board.len(), 1);
        assert!(matches!(
            saved,
            Err(GameError::PersistenceUnavailable { .. })
        ));
        let _ = fs::remove_dir(&dir);
    }
}
