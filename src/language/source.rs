use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::core::Language;

/// Public endpoint answering `?words=<n>` with a JSON array of words
pub const RANDOM_WORD_API: &str = "https://random-word-api.vercel.app/api";

const FETCH_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("word request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("word response was not a json list of words: {0}")]
    Body(#[from] std::io::Error),
    #[error("word source returned no usable words")]
    Empty,
    #[error("word list `{0}` is not bundled")]
    MissingList(String),
    #[error("bundled word list is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can hand out an ordered list of target words
pub trait WordSource {
    fn fetch_words(&self, count: usize) -> Result<Vec<String>, WordSourceError>;
}

/// One-shot HTTP fetch, no retries
#[derive(Debug, Clone)]
pub struct RemoteWordSource {
    url: String,
    agent: ureq::Agent,
}

impl RemoteWordSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build(),
        }
    }
}

impl WordSource for RemoteWordSource {
    fn fetch_words(&self, count: usize) -> Result<Vec<String>, WordSourceError> {
        let words: Vec<String> = self
            .agent
            .get(&self.url)
            .query("words", &count.to_string())
            .call()
            .map_err(Box::new)?
            .into_json()?;

        let words = usable_words(words, count);
        if words.is_empty() {
            return Err(WordSourceError::Empty);
        }
        debug!(count = words.len(), url = %self.url, "fetched remote words");
        Ok(words)
    }
}

/// Bundled list, reshuffled on every fetch
#[derive(Debug, Clone)]
pub struct LocalWordSource {
    language: Language,
}

impl LocalWordSource {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn bundled() -> Result<Self, WordSourceError> {
        Ok(Self::new(Language::local()?))
    }
}

impl WordSource for LocalWordSource {
    fn fetch_words(&self, count: usize) -> Result<Vec<String>, WordSourceError> {
        let words = usable_words(self.language.shuffled(), count);
        if words.is_empty() {
            return Err(WordSourceError::Empty);
        }
        Ok(words)
    }
}

/// Try `primary` once and quietly use `fallback` on any failure
#[derive(Debug, Clone)]
pub struct FallbackWordSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P: WordSource, F: WordSource> FallbackWordSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: WordSource, F: WordSource> WordSource for FallbackWordSource<P, F> {
    fn fetch_words(&self, count: usize) -> Result<Vec<String>, WordSourceError> {
        match self.primary.fetch_words(count) {
            Ok(words) => Ok(words),
            Err(e) => {
                warn!(error = %e, "word fetch failed; using the bundled list");
                self.fallback.fetch_words(count)
            }
        }
    }
}

/// Trim, drop blanks and anything containing whitespace, cap at `count`
fn usable_words(words: Vec<String>, count: usize) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty() && !w.chars().any(char::is_whitespace))
        .take(count)
        .collect()
}
