use crate::{
    language::{FallbackWordSource, LocalWordSource, RemoteWordSource, WordSource, WordSourceError},
    session::{Mode, SessionConfig},
};

/// Words requested for a timed session; more than anyone types in two minutes
pub const TIMED_WORD_COUNT: usize = 500;

/// Configuration for word generation
#[derive(Debug, Clone)]
pub struct WordGenConfig {
    pub count: usize,
    pub custom_prompt: Option<String>,
    pub offline: bool,
    pub url: String,
}

impl WordGenConfig {
    /// How many words a session of this shape needs
    pub fn word_count_for(session: SessionConfig) -> usize {
        match session.mode {
            Mode::Time => TIMED_WORD_COUNT,
            Mode::Words => session.goal as usize,
        }
    }
}

/// Produces the target words for a new session
#[derive(Debug, Clone)]
pub struct WordGenerator {
    config: WordGenConfig,
}

impl WordGenerator {
    pub fn new(config: WordGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WordGenConfig {
        &self.config
    }

    /// A custom prompt wins, then the bundled list when offline, otherwise a
    /// remote fetch that falls back to the bundled list.
    pub fn generate(&self) -> Result<Vec<String>, WordSourceError> {
        if let Some(ref prompt) = self.config.custom_prompt {
            let words: Vec<String> = prompt.split_whitespace().map(str::to_string).collect();
            if words.is_empty() {
                return Err(WordSourceError::Empty);
            }
            return Ok(words);
        }

        let local = LocalWordSource::bundled()?;
        if self.config.offline {
            return local.fetch_words(self.config.count);
        }

        FallbackWordSource::new(RemoteWordSource::new(self.config.url.clone()), local)
            .fetch_words(self.config.count)
    }
}
