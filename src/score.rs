//! Letter-level scoring for a typing session.
//!
//! Committed words are scored against their target with a retroactive
//! penalty for letters left untyped. The word currently being typed only
//! counts what has been typed so far, so a half-finished word never drags the
//! live score down.

use std::collections::HashMap;

use serde::Serialize;

/// Characters per "standard word" when converting letters to words per minute
pub const CHARS_PER_WORD: f64 = 5.0;

/// A word the player committed with a word boundary (space).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedWord {
    /// Trimmed text exactly as typed, including characters past the end of
    /// the target word.
    Typed(String),
    /// Committed with an empty input. Counts as `len` attempted letters, none
    /// of which can ever match.
    Skipped { len: usize },
}

impl TypedWord {
    /// Symbol used when a skipped word has to be shown as text
    pub const SKIP_SYMBOL: char = '_';

    pub fn len(&self) -> usize {
        match self {
            TypedWord::Typed(text) => text.chars().count(),
            TypedWord::Skipped { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TypedWord::Skipped { .. })
    }

    /// Text form of the entry, with skipped words rendered as placeholders
    pub fn display(&self) -> String {
        match self {
            TypedWord::Typed(text) => text.clone(),
            TypedWord::Skipped { len } => Self::SKIP_SYMBOL.to_string().repeat(*len),
        }
    }

    /// The typed character at `idx`. Skipped words have no characters, which
    /// makes every position compare unequal to the target.
    fn char_at(&self, idx: usize) -> Option<char> {
        match self {
            TypedWord::Typed(text) => text.chars().nth(idx),
            TypedWord::Skipped { .. } => None,
        }
    }
}

/// Derived statistics for a session. Never stored on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct_letters: usize,
    pub total_letters_typed: usize,
    pub standard_wpm: u32,
    pub accuracy_percent: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LetterTally {
    pub correct: usize,
    pub typed: usize,
}

impl std::ops::AddAssign for LetterTally {
    fn add_assign(&mut self, rhs: Self) {
        self.correct += rhs.correct;
        self.typed += rhs.typed;
    }
}

/// Tally a committed word. Letters missing from the end of the target count
/// as attempted and wrong.
pub fn tally_committed(typed: &TypedWord, target: &str) -> LetterTally {
    let target_len = target.chars().count();
    let correct = target
        .chars()
        .enumerate()
        .take(typed.len().min(target_len))
        .filter(|&(idx, expected)| typed.char_at(idx) == Some(expected))
        .count();

    LetterTally {
        correct,
        typed: typed.len() + target_len.saturating_sub(typed.len()),
    }
}

/// Tally the word still being typed: only the letters entered so far count.
pub fn tally_in_progress(input: &str, target: &str) -> LetterTally {
    let correct = input
        .chars()
        .zip(target.chars())
        .filter(|(typed, expected)| typed == expected)
        .count();

    LetterTally {
        correct,
        typed: input.chars().count(),
    }
}

/// `round(correct / 5 / minutes)`, or zero before any time has elapsed
pub fn standard_wpm(correct_letters: usize, elapsed_secs: u32) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    let minutes = f64::from(elapsed_secs) / 60.0;
    (correct_letters as f64 / CHARS_PER_WORD / minutes).round() as u32
}

/// Percentage of correct letters. Nothing typed yet reads as perfect.
pub fn accuracy_percent(correct_letters: usize, total_letters_typed: usize) -> u32 {
    if total_letters_typed == 0 {
        return 100;
    }
    (correct_letters as f64 / total_letters_typed as f64 * 100.0).round() as u32
}

/// Score a session from its committed history plus the in-progress input.
///
/// History entries whose index has no target word are skipped rather than
/// treated as an error.
pub fn compute(
    words: &[String],
    history: &HashMap<usize, TypedWord>,
    current_index: usize,
    input: &str,
    elapsed_secs: u32,
) -> Score {
    let mut tally = LetterTally::default();

    for (idx, typed) in history {
        if let Some(target) = words.get(*idx) {
            tally += tally_committed(typed, target);
        }
    }

    if let Some(target) = words.get(current_index) {
        tally += tally_in_progress(input, target);
    }

    Score {
        correct_letters: tally.correct,
        total_letters_typed: tally.typed,
        standard_wpm: standard_wpm(tally.correct, elapsed_secs),
        accuracy_percent: accuracy_percent(tally.correct, tally.typed),
    }
}

/// How a single rendered letter relates to its target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Letter {
    Correct,
    Incorrect,
    /// Typed past the end of the target word
    Excess,
    /// Part of a committed word the player never typed
    Missing,
    /// Not typed yet in the current or an upcoming word
    Pending,
}

/// Classify every letter of a committed word for display. Mismatches show the
/// target letter, excess letters show what was typed.
pub fn classify_committed(typed: &TypedWord, target: &str) -> Vec<(char, Letter)> {
    let mut letters: Vec<(char, Letter)> = target
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed.char_at(idx) {
            Some(c) if c == expected => (expected, Letter::Correct),
            Some(_) => (expected, Letter::Incorrect),
            None if typed.is_skipped() => (expected, Letter::Incorrect),
            None => (expected, Letter::Missing),
        })
        .collect();

    if let TypedWord::Typed(text) = typed {
        letters.extend(
            text.chars()
                .skip(target.chars().count())
                .map(|c| (c, Letter::Excess)),
        );
    }

    letters
}

/// Classify the word being typed; untyped target letters stay pending.
pub fn classify_in_progress(input: &str, target: &str) -> Vec<(char, Letter)> {
    let typed: Vec<char> = input.chars().collect();
    let mut letters: Vec<(char, Letter)> = target
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed.get(idx) {
            Some(&c) if c == expected => (expected, Letter::Correct),
            Some(_) => (expected, Letter::Incorrect),
            None => (expected, Letter::Pending),
        })
        .collect();

    letters.extend(
        typed
            .iter()
            .skip(target.chars().count())
            .map(|&c| (c, Letter::Excess)),
    );

    letters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tally_committed_exact_match() {
        let tally = tally_committed(&TypedWord::Typed("cat".into()), "cat");
        assert_eq!(tally, LetterTally { correct: 3, typed: 3 });
    }

    #[test]
    fn test_tally_committed_excess_counts_toward_total_only() {
        let tally = tally_committed(&TypedWord::Typed("catxx".into()), "cat");
        assert_eq!(tally.typed, 5);
        assert_eq!(tally.correct, 3);
    }

    #[test]
    fn test_tally_committed_shortfall_is_penalised() {
        let tally = tally_committed(&TypedWord::Typed("ca".into()), "cat");
        assert_eq!(tally, LetterTally { correct: 2, typed: 3 });
    }

    #[test]
    fn test_tally_committed_skip_never_matches() {
        let tally = tally_committed(&TypedWord::Skipped { len: 5 }, "apple");
        assert_eq!(tally, LetterTally { correct: 0, typed: 5 });
    }

    #[test]
    fn test_tally_committed_skip_of_underscore_word_still_misses() {
        // a target made of the display symbol must not match a skip
        let tally = tally_committed(&TypedWord::Skipped { len: 2 }, "__");
        assert_eq!(tally.correct, 0);
    }

    #[test]
    fn test_tally_in_progress_has_no_tail_penalty() {
        let tally = tally_in_progress("ap", "apple");
        assert_eq!(tally, LetterTally { correct: 2, typed: 2 });
    }

    #[test]
    fn test_standard_wpm() {
        assert_eq!(standard_wpm(50, 60), 10);
        assert_eq!(standard_wpm(25, 15), 20);
        assert_eq!(standard_wpm(7, 60), 1);
    }

    #[test]
    fn test_standard_wpm_zero_elapsed() {
        assert_eq!(standard_wpm(100, 0), 0);
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(3, 4), 75);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(0, 5), 0);
    }

    #[test]
    fn test_accuracy_percent_nothing_typed() {
        assert_eq!(accuracy_percent(0, 0), 100);
    }

    #[test]
    fn test_compute_mixes_history_and_current_word() {
        let targets = words(&["cat", "dog", "fox"]);
        let mut history = HashMap::new();
        history.insert(0, TypedWord::Typed("cat".into()));
        history.insert(1, TypedWord::Typed("dg".into()));

        let score = compute(&targets, &history, 2, "f", 6);

        // cat: 3/3, dg vs dog: d matches, g != o -> 1/3, f: 1/1
        assert_eq!(score.correct_letters, 5);
        assert_eq!(score.total_letters_typed, 7);
        assert_eq!(score.accuracy_percent, 71);
        assert_eq!(score.standard_wpm, 10);
    }

    #[test]
    fn test_compute_ignores_history_without_target() {
        let targets = words(&["cat"]);
        let mut history = HashMap::new();
        history.insert(7, TypedWord::Typed("zzz".into()));

        let score = compute(&targets, &history, 1, "", 10);

        assert_eq!(score, Score {
            correct_letters: 0,
            total_letters_typed: 0,
            standard_wpm: 0,
            accuracy_percent: 100,
        });
    }

    #[test]
    fn test_typed_word_display() {
        assert_eq!(TypedWord::Skipped { len: 3 }.display(), "___");
        assert_eq!(TypedWord::Typed("hey".into()).display(), "hey");
        assert!(TypedWord::Typed(String::new()).is_empty());
    }

    #[test]
    fn test_classify_committed() {
        let letters = classify_committed(&TypedWord::Typed("cxtzz".into()), "cat");
        assert_eq!(
            letters,
            vec![
                ('c', Letter::Correct),
                ('a', Letter::Incorrect),
                ('t', Letter::Correct),
                ('z', Letter::Excess),
                ('z', Letter::Excess),
            ]
        );

        let short = classify_committed(&TypedWord::Typed("c".into()), "cat");
        assert_eq!(short[1], ('a', Letter::Missing));

        let skipped = classify_committed(&TypedWord::Skipped { len: 3 }, "cat");
        assert!(skipped.iter().all(|&(_, l)| l == Letter::Incorrect));
    }

    #[test]
    fn test_classify_in_progress() {
        let letters = classify_in_progress("cb", "cat");
        assert_eq!(
            letters,
            vec![
                ('c', Letter::Correct),
                ('a', Letter::Incorrect),
                ('t', Letter::Pending),
            ]
        );

        let over = classify_in_progress("cats", "cat");
        assert_eq!(over.last(), Some(&('s', Letter::Excess)));
    }
}
