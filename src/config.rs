use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::session::{Mode, SessionConfig};
use crate::store::{self, Storage};

/// Storage key of the persisted settings object
pub const SETTINGS_KEY: &str = "local-settings";

pub const TIME_GOALS: [u32; 4] = [15, 30, 60, 120];
pub const WORD_GOALS: [u32; 4] = [10, 25, 50, 100];

/// Presentation and game preferences. Missing fields in the stored JSON fall
/// back to their defaults, so older or partial files still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "UI")]
    pub ui: UiSettings,
    pub keyboard: KeyboardSettings,
    pub text: TextSettings,
    pub theme: ThemeSettings,
    pub game: GameSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UiSettings {
    pub compact_mode: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { compact_mode: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyboardSettings {
    pub visible: bool,
    pub container: bool,
    pub highlight_keys: bool,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            visible: true,
            container: false,
            highlight_keys: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSettings {
    pub container: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    Auto,
}

impl ThemeMode {
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Auto,
            ThemeMode::Auto => ThemeMode::Dark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    #[serde(rename = "showWPM")]
    pub show_wpm: bool,
    pub show_accuracy: bool,
    pub mode: Mode,
    pub time_goal: u32,
    pub word_goal: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            show_wpm: true,
            show_accuracy: true,
            mode: Mode::Time,
            time_goal: 15,
            word_goal: 10,
        }
    }
}

/// On/off preferences that can be flipped from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    CompactMode,
    KeyboardVisible,
    KeyboardContainer,
    HighlightKeys,
    TextContainer,
    ShowWpm,
    ShowAccuracy,
}

impl Settings {
    /// Load persisted settings. A stored goal of zero is replaced with the
    /// default so a session can always be started.
    pub fn load(storage: &dyn Storage) -> Self {
        let mut settings: Settings = store::load_json(storage, SETTINGS_KEY).unwrap_or_default();
        let defaults = GameSettings::default();
        if settings.game.time_goal == 0 {
            warn!("stored time goal is zero; using the default");
            settings.game.time_goal = defaults.time_goal;
        }
        if settings.game.word_goal == 0 {
            warn!("stored word goal is zero; using the default");
            settings.game.word_goal = defaults.word_goal;
        }
        settings
    }

    /// Write the settings back; a failure only costs persistence
    pub fn persist(&self, storage: &dyn Storage) {
        if let Err(e) = store::save_json(storage, SETTINGS_KEY, self) {
            warn!(error = %e, "could not persist settings");
        }
    }

    pub fn toggle(&mut self, toggle: Toggle) {
        let flag = match toggle {
            Toggle::CompactMode => &mut self.ui.compact_mode,
            Toggle::KeyboardVisible => &mut self.keyboard.visible,
            Toggle::KeyboardContainer => &mut self.keyboard.container,
            Toggle::HighlightKeys => &mut self.keyboard.highlight_keys,
            Toggle::TextContainer => &mut self.text.container,
            Toggle::ShowWpm => &mut self.game.show_wpm,
            Toggle::ShowAccuracy => &mut self.game.show_accuracy,
        };
        *flag = !*flag;
    }

    pub fn cycle_theme(&mut self) {
        self.theme.mode = self.theme.mode.next();
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Settings::default();
    }

    /// Apply one-off overrides (e.g. from the command line) for the active mode
    pub fn with_overrides(mut self, mode: Option<Mode>, goal: Option<u32>) -> Self {
        if let Some(mode) = mode {
            self.game.mode = mode;
        }
        if let Some(goal) = goal.filter(|g| *g > 0) {
            match self.game.mode {
                Mode::Time => self.game.time_goal = goal,
                Mode::Words => self.game.word_goal = goal,
            }
        }
        self
    }

    pub fn switch_mode(&mut self) {
        self.game.mode = match self.game.mode {
            Mode::Time => Mode::Words,
            Mode::Words => Mode::Time,
        };
    }

    /// Step the active mode's goal through its presets
    pub fn cycle_goal(&mut self) {
        let (presets, goal) = match self.game.mode {
            Mode::Time => (&TIME_GOALS, &mut self.game.time_goal),
            Mode::Words => (&WORD_GOALS, &mut self.game.word_goal),
        };
        let current = *goal;
        *goal = presets
            .iter()
            .copied()
            .find(|&preset| preset > current)
            .unwrap_or(presets[0]);
    }

    pub fn session_config(&self) -> SessionConfig {
        let goal = match self.game.mode {
            Mode::Time => self.game.time_goal,
            Mode::Words => self.game.word_goal,
        };
        SessionConfig::new(self.game.mode, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::store::{FileStorage, MemoryStorage};
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_settings() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let settings = Settings::default();
        settings.persist(&storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn save_and_load_custom_settings() {
        let storage = MemoryStorage::default();
        let mut settings = Settings::default();
        settings.toggle(Toggle::KeyboardVisible);
        settings.cycle_theme();
        settings.game.mode = Mode::Words;
        settings.game.word_goal = 50;
        settings.persist(&storage);

        let loaded = Settings::load(&storage);
        assert_eq!(loaded, settings);
        assert!(!loaded.keyboard.visible);
        assert_eq!(loaded.theme.mode, ThemeMode::Light);
    }

    #[test]
    fn partial_settings_merge_over_defaults() {
        let storage = MemoryStorage::with_entry(
            SETTINGS_KEY,
            r#"{"keyboard": {"visible": false}, "theme": {"mode": "auto"}}"#,
        );

        let loaded = Settings::load(&storage);

        assert!(!loaded.keyboard.visible);
        assert!(loaded.keyboard.highlight_keys);
        assert_eq!(loaded.theme.mode, ThemeMode::Auto);
        assert_eq!(loaded.game, GameSettings::default());
        assert!(loaded.ui.compact_mode);
    }

    #[test]
    fn stored_keys_follow_browser_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["UI"]["compactMode"], true);
        assert_eq!(json["keyboard"]["highlightKeys"], true);
        assert_eq!(json["game"]["showWPM"], true);
        assert_eq!(json["game"]["timeGoal"], 15);
    }

    #[test]
    fn malformed_settings_use_defaults() {
        let storage = MemoryStorage::with_entry(SETTINGS_KEY, "{{{");
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn zero_goals_load_as_defaults() {
        let storage = MemoryStorage::with_entry(
            SETTINGS_KEY,
            r#"{"game":{"mode":"words","timeGoal":0,"wordGoal":0}}"#,
        );
        let settings = Settings::load(&storage);

        assert_eq!(settings.game.mode, Mode::Words);
        assert_eq!(settings.game.time_goal, GameSettings::default().time_goal);
        assert_eq!(settings.game.word_goal, GameSettings::default().word_goal);
        assert!(Session::start(vec!["cat".into()], settings.session_config()).is_ok());
    }

    #[test]
    fn theme_cycles_dark_light_auto() {
        let mut settings = Settings::default();
        assert_eq!(settings.theme.mode, ThemeMode::Dark);
        settings.cycle_theme();
        assert_eq!(settings.theme.mode, ThemeMode::Light);
        settings.cycle_theme();
        assert_eq!(settings.theme.mode, ThemeMode::Auto);
        settings.cycle_theme();
        assert_eq!(settings.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn toggle_flips_only_its_flag() {
        let mut settings = Settings::default();
        settings.toggle(Toggle::ShowAccuracy);
        assert!(!settings.game.show_accuracy);
        assert!(settings.game.show_wpm);
        settings.toggle(Toggle::ShowAccuracy);
        assert!(settings.game.show_accuracy);
    }

    #[test]
    fn reset_to_defaults_discards_changes() {
        let mut settings = Settings::default();
        settings.toggle(Toggle::TextContainer);
        settings.switch_mode();
        settings.reset_to_defaults();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn overrides_apply_to_active_mode() {
        let settings = Settings::default().with_overrides(Some(Mode::Words), Some(25));
        assert_eq!(settings.session_config(), SessionConfig::new(Mode::Words, 25));
        assert_eq!(settings.game.time_goal, 15);

        let ignored = Settings::default().with_overrides(None, Some(0));
        assert_eq!(ignored.session_config(), SessionConfig::new(Mode::Time, 15));
    }

    #[test]
    fn goal_cycles_through_presets() {
        let mut settings = Settings::default();
        settings.cycle_goal();
        assert_eq!(settings.game.time_goal, 30);
        settings.game.time_goal = 120;
        settings.cycle_goal();
        assert_eq!(settings.game.time_goal, 15);

        settings.switch_mode();
        settings.game.word_goal = 37;
        settings.cycle_goal();
        assert_eq!(settings.game.word_goal, 50);
    }
}
