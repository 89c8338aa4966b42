use std::collections::HashMap;

use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::score::{self, Score, TypedWord};
use crate::scores::ScoreRecord;

/// What ends a session: a countdown or a number of committed words
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Time,
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Seconds for [`Mode::Time`], words for [`Mode::Words`]
    pub goal: u32,
}

impl SessionConfig {
    pub fn new(mode: Mode, goal: u32) -> Self {
        Self { mode, goal }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Started,
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session needs at least one word")]
    NoWords,
    #[error("session goal must be a positive number")]
    ZeroGoal,
}

/// A single typing test over an ordered list of target words.
///
/// The session owns all game progress. It moves `NotStarted -> Started ->
/// Finished` and never back, except through [`Session::reset`]. While it is
/// active, `word_index` points into `words` and the typed history only holds
/// entries for earlier words.
#[derive(Debug, Clone)]
pub struct Session {
    words: Vec<String>,
    config: SessionConfig,
    word_index: usize,
    input: String,
    cursor_pos: usize,
    typed_history: HashMap<usize, TypedWord>,
    /// Seconds remaining in time mode, seconds elapsed in words mode
    timer: u32,
    phase: Phase,
    record: Option<ScoreRecord>,
}

impl Session {
    pub fn start(words: Vec<String>, config: SessionConfig) -> Result<Self, SessionError> {
        if words.is_empty() {
            return Err(SessionError::NoWords);
        }
        if config.goal == 0 {
            return Err(SessionError::ZeroGoal);
        }
        debug!(words = words.len(), mode = %config.mode, goal = config.goal, "new session");
        Ok(Self::fresh(words, config))
    }

    fn fresh(words: Vec<String>, config: SessionConfig) -> Self {
        let timer = match config.mode {
            Mode::Time => config.goal,
            Mode::Words => 0,
        };

        Self {
            words,
            config,
            word_index: 0,
            input: String::new(),
            cursor_pos: 0,
            typed_history: HashMap::new(),
            timer,
            phase: Phase::NotStarted,
            record: None,
        }
    }

    /// Back to `NotStarted` over the same words
    pub fn reset(&mut self) {
        let words = std::mem::take(&mut self.words);
        *self = Self::fresh(words, self.config);
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// True while the one-second clock should be running
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Started
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.word_index).map(String::as_str)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    pub fn typed(&self, idx: usize) -> Option<&TypedWord> {
        self.typed_history.get(&idx)
    }

    pub fn typed_history(&self) -> &HashMap<usize, TypedWord> {
        &self.typed_history
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn elapsed_secs(&self) -> u32 {
        match self.config.mode {
            Mode::Time => self.config.goal.saturating_sub(self.timer),
            Mode::Words => self.timer,
        }
    }

    /// Guarded `NotStarted -> Started` transition, taken on the first
    /// keystroke. Does nothing in any other phase.
    fn begin(&mut self) {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Started;
            debug!("session clock armed by first keystroke");
        }
    }

    /// Replace the in-progress text of the current word. The cursor always
    /// sits at the end of the input.
    pub fn submit_input(&mut self, text: &str) {
        if self.has_finished() {
            return;
        }
        self.begin();
        self.input = text.to_string();
        self.cursor_pos = self.input.chars().count();
    }

    /// Commit the current word and move to the next one.
    ///
    /// An empty (or whitespace) input is recorded as a skip of the target's
    /// length, which scores as entirely wrong.
    pub fn advance_word(&mut self) {
        if self.has_finished() {
            return;
        }
        self.begin();

        let Some(target) = self.words.get(self.word_index) else {
            debug!(index = self.word_index, "no target word at index; finishing");
            self.finish();
            return;
        };

        let trimmed = self.input.trim();
        let entry = if trimmed.is_empty() {
            TypedWord::Skipped {
                len: target.chars().count(),
            }
        } else {
            TypedWord::Typed(trimmed.to_string())
        };

        self.typed_history.insert(self.word_index, entry);
        self.word_index += 1;
        self.input.clear();
        self.cursor_pos = 0;

        let goal_reached =
            self.config.mode == Mode::Words && self.word_index >= self.config.goal as usize;
        if goal_reached || self.word_index >= self.words.len() {
            self.finish();
        }
    }

    /// Step back into the previous word with its typed text restored.
    /// Only valid with an empty input past the first word. A skipped word
    /// comes back as an empty input, not as its placeholder.
    pub fn retreat_word(&mut self) {
        if self.has_finished() || self.word_index == 0 || !self.input.is_empty() {
            return;
        }

        self.word_index -= 1;
        let restored = match self.typed_history.remove(&self.word_index) {
            Some(TypedWord::Typed(text)) => text,
            Some(TypedWord::Skipped { .. }) | None => String::new(),
        };
        self.cursor_pos = restored.chars().count();
        self.input = restored;
    }

    /// One second of wall time while the session is running
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        match self.config.mode {
            Mode::Time => {
                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    self.finish();
                }
            }
            Mode::Words => self.timer += 1,
        }
    }

    pub fn score(&self) -> Score {
        score::compute(
            &self.words,
            &self.typed_history,
            self.word_index,
            &self.input,
            self.elapsed_secs(),
        )
    }

    /// Stop the session and snapshot its score. Calling it again has no
    /// effect, so exactly one record is produced per session.
    pub fn finish(&mut self) {
        if self.has_finished() {
            return;
        }
        self.phase = Phase::Finished;

        let score = self.score();
        info!(
            wpm = score.standard_wpm,
            accuracy = score.accuracy_percent,
            mode = %self.config.mode,
            goal = self.config.goal,
            "session finished"
        );
        self.record = Some(ScoreRecord::new(&score, self.config, Utc::now()));
    }

    /// Hand out the finished session's record, once
    pub fn take_record(&mut self) -> Option<ScoreRecord> {
        self.record.take()
    }
}
