use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::{BTreeMap, HashSet};

use crate::error::BankError;

static BANK_DIR: Dir = include_dir!("src/bank/data");

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// Placeholder in a bank's prompt template that is replaced by the headword
pub const WORD_PLACEHOLDER: &str = "{word}";

/// A headword with its correct definition and the wrong answers shown next to it
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub correct: String,
    pub distractors: Vec<String>,
}

/// Immutable table of words keyed by difficulty level
#[derive(Deserialize, Clone, Debug)]
pub struct WordBank {
    pub name: String,
    pub prompt: String,
    pub levels: BTreeMap<u8, Vec<WordEntry>>,
}

impl WordBank {
    /// Load an embedded bank by name, e.g. `WordBank::new("swedish")`
    pub fn new(name: &str) -> Result<Self, BankError> {
        read_bank_from_file(&format!("{name}.json"))
    }

    /// Parse and validate a bank from JSON text
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let bank: WordBank = from_str(json)?;
        bank.validate()?;
        Ok(bank)
    }

    /// Names of all banks embedded in the binary
    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = BANK_DIR
            .files()
            .filter_map(|f| {
                let path = f.path();
                match path.extension().and_then(|e| e.to_str()) {
                    Some("json") => path.file_stem().and_then(|s| s.to_str()).map(String::from),
                    _ => None,
                }
            })
            .collect();
        names.sort();
        names
    }

    /// Every entry paired with its difficulty, levels in ascending order
    pub fn entries(&self) -> impl Iterator<Item = (u8, &WordEntry)> {
        self.levels
            .iter()
            .flat_map(|(level, words)| words.iter().map(move |w| (*level, w)))
    }

    pub fn len(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct headwords, which bounds the size of any quiz
    pub fn distinct_headwords(&self) -> usize {
        self.entries()
            .map(|(_, w)| w.word.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Render the prompt template for a headword
    pub fn prompt_for(&self, word: &str) -> String {
        self.prompt.replace(WORD_PLACEHOLDER, word)
    }

    fn validate(&self) -> Result<(), BankError> {
        if !self.prompt.contains(WORD_PLACEHOLDER) {
            return Err(BankError::Invalid(format!(
                "prompt template {:?} has no {WORD_PLACEHOLDER} placeholder",
                self.prompt
            )));
        }

        for (level, words) in &self.levels {
            if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(level) {
                return Err(BankError::Invalid(format!(
                    "difficulty {level} outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"
                )));
            }
            if let Some(entry) = words.iter().find(|w| w.word.trim().is_empty()) {
                return Err(BankError::Invalid(format!(
                    "empty headword at difficulty {level} (definition {:?})",
                    entry.correct
                )));
            }
            if let Some(entry) = words.iter().find(|w| w.distractors.contains(&w.correct)) {
                return Err(BankError::Invalid(format!(
                    "{:?} lists its definition {:?} as a distractor",
                    entry.word, entry.correct
                )));
            }
        }

        Ok(())
    }
}

fn read_bank_from_file(file_name: &str) -> Result<WordBank, BankError> {
    let file = BANK_DIR
        .get_file(file_name)
        .ok_or_else(|| BankError::NotFound(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| BankError::NotUtf8(file_name.to_string()))?;

    WordBank::from_json(file_as_str)
}
