use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;

use super::source::WordSourceError;

static LANG_DIR: Dir = include_dir!("src/lang");

/// Name of the built-in list used when no remote words are available
pub const LOCAL_LIST: &str = "local";

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(file_name: &str) -> Result<Self, WordSourceError> {
        read_language_from_file(&format!("{file_name}.json"))
    }

    pub fn local() -> Result<Self, WordSourceError> {
        Self::load(LOCAL_LIST)
    }

    /// The whole list in random order
    pub fn shuffled(&self) -> Vec<String> {
        let mut words = self.words.clone();
        words.shuffle(&mut rand::thread_rng());
        words
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language, WordSourceError> {
    let contents = LANG_DIR
        .get_file(file_name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| WordSourceError::MissingList(file_name.to_string()))?;

    Ok(from_str(contents)?)
}
