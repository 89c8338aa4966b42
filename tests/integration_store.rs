use chrono::{TimeZone, Utc};

use keybored::config::{Settings, ThemeMode, Toggle};
use keybored::scores::{ScoreHistory, ScoreRecord, SCORES_KEY};
use keybored::session::Mode;
use keybored::store::{FileStorage, Storage};

fn record(wpm: u32, mode: Mode, goal: u32) -> ScoreRecord {
    ScoreRecord {
        wpm,
        accuracy: 95,
        date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        mode,
        goal,
    }
}

#[test]
fn scores_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = FileStorage::new(dir.path());
        let mut history = ScoreHistory::load(&storage);
        history.append(&storage, record(40, Mode::Time, 15));
        history.append(&storage, record(55, Mode::Time, 15));
    }

    let storage = FileStorage::new(dir.path());
    let history = ScoreHistory::load(&storage);
    assert_eq!(history.records().len(), 2);
    assert_eq!(history.newest_first().next().map(|r| r.wpm), Some(55));
    assert_eq!(history.best_wpm(Mode::Time, 15), Some(55));
}

#[test]
fn append_keeps_records_written_by_another_instance() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    let mut first = ScoreHistory::load(&storage);
    let mut second = ScoreHistory::load(&storage);
    first.append(&storage, record(30, Mode::Words, 10));
    second.append(&storage, record(60, Mode::Words, 10));

    let reloaded = ScoreHistory::load(&storage);
    assert_eq!(reloaded.records().len(), 2);
}

#[test]
fn persisted_scores_use_the_documented_shape() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let mut history = ScoreHistory::default();
    history.append(&storage, record(42, Mode::Words, 25));

    let raw = storage.read(SCORES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value[0];
    assert_eq!(entry["wpm"], 42);
    assert_eq!(entry["accuracy"], 95);
    assert_eq!(entry["mode"], "words");
    assert_eq!(entry["goal"], 25);
    assert_eq!(entry["date"], "2024-03-01T12:00:00Z");
}

#[test]
fn settings_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    let mut settings = Settings::load(&storage);
    assert_eq!(settings, Settings::default());

    settings.toggle(Toggle::KeyboardVisible);
    settings.cycle_theme();
    settings.cycle_goal();
    settings.persist(&storage);

    let reloaded = Settings::load(&storage);
    assert!(!reloaded.keyboard.visible);
    assert_eq!(reloaded.theme.mode, ThemeMode::Light);
    assert_eq!(reloaded.game.time_goal, 30);
}

#[test]
fn corrupt_files_load_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    std::fs::write(storage.path_for(SCORES_KEY), "[{not json").unwrap();
    std::fs::write(storage.path_for("local-settings"), "42").unwrap();

    assert!(ScoreHistory::load(&storage).is_empty());
    assert_eq!(Settings::load(&storage), Settings::default());
}
