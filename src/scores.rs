use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::score::Score;
use crate::session::{Mode, SessionConfig};
use crate::store::{self, Storage};

/// Storage key of the persisted score list
pub const SCORES_KEY: &str = "typing-game-scores";

/// One finished session as it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub wpm: u32,
    pub accuracy: u32,
    pub date: DateTime<Utc>,
    pub mode: Mode,
    pub goal: u32,
}

impl ScoreRecord {
    pub fn new(score: &Score, config: SessionConfig, date: DateTime<Utc>) -> Self {
        Self {
            wpm: score.standard_wpm,
            accuracy: score.accuracy_percent,
            date,
            mode: config.mode,
            goal: config.goal,
        }
    }
}

/// Append-only list of finished sessions
#[derive(Debug, Default, Clone)]
pub struct ScoreHistory {
    records: Vec<ScoreRecord>,
    /// Records whose write failed, retried with the next append
    unsaved: Vec<ScoreRecord>,
}

impl ScoreHistory {
    pub fn load(storage: &dyn Storage) -> Self {
        let records: Vec<ScoreRecord> = store::load_json(storage, SCORES_KEY).unwrap_or_default();
        debug!(count = records.len(), "loaded score history");
        Self {
            records,
            unsaved: Vec::new(),
        }
    }

    /// Append to the persisted list, re-reading it first so records written
    /// elsewhere are kept. When the write fails the record is kept in memory
    /// and written along with the next append.
    pub fn append(&mut self, storage: &dyn Storage, record: ScoreRecord) {
        let mut persisted: Vec<ScoreRecord> =
            store::load_json(storage, SCORES_KEY).unwrap_or_default();
        persisted.extend(self.unsaved.iter().cloned());
        persisted.push(record.clone());

        match store::save_json(storage, SCORES_KEY, &persisted) {
            Ok(()) => {
                self.records = persisted;
                self.unsaved.clear();
            }
            Err(e) => {
                warn!(error = %e, "could not persist score; keeping it in memory");
                self.records.push(record.clone());
                self.unsaved.push(record);
            }
        }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter().rev()
    }

    /// Highest wpm recorded for the same mode and goal
    pub fn best_wpm(&self, mode: Mode, goal: u32) -> Option<u32> {
        self.records
            .iter()
            .filter(|r| r.mode == mode && r.goal == goal)
            .map(|r| r.wpm)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStorage, StoreError};
    use chrono::TimeZone;

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
            })
        }
    }

    fn record(wpm: u32, mode: Mode, goal: u32) -> ScoreRecord {
        ScoreRecord {
            wpm,
            accuracy: 97,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            mode,
            goal,
        }
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(record(61, Mode::Time, 15)).unwrap();

        assert_eq!(json["wpm"], 61);
        assert_eq!(json["accuracy"], 97);
        assert_eq!(json["mode"], "time");
        assert_eq!(json["goal"], 15);
        assert_eq!(json["date"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_reads_browser_style_dates() {
        let raw = r#"[{"wpm":40,"accuracy":90,"date":"2024-01-02T03:04:05.678Z","mode":"words","goal":10}]"#;
        let storage = MemoryStorage::with_entry(SCORES_KEY, raw);

        let history = ScoreHistory::load(&storage);

        assert_eq!(history.records().len(), 1);
        assert_eq!(history.records()[0].mode, Mode::Words);
    }

    #[test]
    fn test_append_persists() {
        let storage = MemoryStorage::default();
        let mut history = ScoreHistory::load(&storage);

        history.append(&storage, record(50, Mode::Time, 15));
        history.append(&storage, record(55, Mode::Time, 15));

        let reloaded = ScoreHistory::load(&storage);
        assert_eq!(reloaded.records().len(), 2);
        assert_eq!(reloaded.records()[1].wpm, 55);
    }

    #[test]
    fn test_append_keeps_records_written_elsewhere() {
        let storage = MemoryStorage::default();
        let mut first = ScoreHistory::load(&storage);
        let mut second = ScoreHistory::load(&storage);

        first.append(&storage, record(10, Mode::Time, 15));
        second.append(&storage, record(20, Mode::Time, 15));

        assert_eq!(second.records().len(), 2);
        assert_eq!(ScoreHistory::load(&storage).records().len(), 2);
    }

    #[test]
    fn test_malformed_history_starts_empty() {
        let storage = MemoryStorage::with_entry(SCORES_KEY, "not json");
        let mut history = ScoreHistory::load(&storage);
        assert!(history.is_empty());

        history.append(&storage, record(30, Mode::Words, 25));
        assert_eq!(ScoreHistory::load(&storage).records().len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_record_in_memory() {
        let mut history = ScoreHistory::default();
        history.append(&ReadOnlyStorage, record(70, Mode::Time, 30));

        assert_eq!(history.records().len(), 1);
    }

    #[test]
    fn test_unsaved_records_are_written_with_the_next_append() {
        let mut history = ScoreHistory::default();
        history.append(&ReadOnlyStorage, record(70, Mode::Time, 30));

        let storage = MemoryStorage::default();
        history.append(&storage, record(75, Mode::Time, 30));

        assert_eq!(history.records().len(), 2);
        let reloaded = ScoreHistory::load(&storage);
        let wpms: Vec<u32> = reloaded.records().iter().map(|r| r.wpm).collect();
        assert_eq!(wpms, vec![70, 75]);

        // already flushed, so not written twice
        history.append(&storage, record(80, Mode::Time, 30));
        assert_eq!(ScoreHistory::load(&storage).records().len(), 3);
    }

    #[test]
    fn test_best_wpm_and_order() {
        let storage = MemoryStorage::default();
        let mut history = ScoreHistory::default();
        history.append(&storage, record(40, Mode::Time, 15));
        history.append(&storage, record(80, Mode::Time, 30));
        history.append(&storage, record(60, Mode::Time, 15));

        assert_eq!(history.best_wpm(Mode::Time, 15), Some(60));
        assert_eq!(history.best_wpm(Mode::Words, 10), None);
        assert_eq!(history.newest_first().next().map(|r| r.wpm), Some(60));
    }
}
