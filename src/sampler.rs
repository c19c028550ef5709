use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::bank::WordBank;

/// Highest difficulty admitted by the easy mix
pub const EASY_MAX_DIFFICULTY: u8 = 2;
/// Lowest difficulty admitted by the hard mix
pub const HARD_MIN_DIFFICULTY: u8 = 4;

/// How a quiz distributes question difficulty
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mix {
    /// every level, easiest first, shuffled within a level
    #[default]
    Adaptive,
    /// levels 1 and 2 only
    Easy,
    /// levels 4 and 5 only
    Hard,
}

impl Mix {
    /// Whether a question of this difficulty belongs to the mix
    pub fn admits(self, difficulty: u8) -> bool {
        match self {
            Mix::Adaptive => true,
            Mix::Easy => difficulty <= EASY_MAX_DIFFICULTY,
            Mix::Hard => difficulty >= HARD_MIN_DIFFICULTY,
        }
    }

    /// Filter and order the candidate pool for this mix
    fn order<'a, R: Rng + ?Sized>(self, pool: &'a [Question], rng: &mut R) -> Vec<&'a Question> {
        match self {
            Mix::Easy | Mix::Hard => pool.iter().filter(|q| self.admits(q.difficulty)).collect(),
            Mix::Adaptive => {
                let mut ordered: Vec<&Question> = pool.iter().collect();
                // shuffle first so the stable sort randomizes order within a level
                ordered.shuffle(rng);
                ordered.sort_by_key(|q| q.difficulty);
                ordered
            }
        }
    }
}

/// One multiple-choice question generated from a bank entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub difficulty: u8,
    pub word: String,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

/// Sample a quiz using the thread-local random generator
pub fn sample(bank: &WordBank, count: usize, mix: Mix) -> Vec<Question> {
    sample_with(bank, count, mix, &mut rand::thread_rng())
}

/// Sample up to `count` questions with unique headwords.
///
/// The mix picks and orders candidates first. If that leaves the quiz short,
/// the whole bank is rescanned in random order regardless of mix, so an easy
/// or hard quiz on a small bank can contain questions from other levels.
/// The result is shorter than `count` only when the bank has fewer distinct
/// headwords than requested.
pub fn sample_with<R: Rng + ?Sized>(
    bank: &WordBank,
    count: usize,
    mix: Mix,
    rng: &mut R,
) -> Vec<Question> {
    if count == 0 {
        return Vec::new();
    }

    let pool = build_pool(bank, rng);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut picked: Vec<&Question> = Vec::with_capacity(count);

    take_unique(mix.order(&pool, rng), &mut seen, &mut picked, count);
    let from_mix = picked.len();

    if picked.len() < count {
        let mut rest: Vec<&Question> = pool.iter().collect();
        rest.shuffle(rng);
        take_unique(rest, &mut seen, &mut picked, count);
    }

    picked.truncate(count);
    debug!(
        mix = %mix,
        requested = count,
        from_mix,
        from_fallback = picked.len() - from_mix,
        "sampled questions"
    );

    if picked.len() < count {
        warn!(
            requested = count,
            produced = picked.len(),
            bank = %bank.name,
            "word bank has too few distinct words for the requested quiz"
        );
    }

    picked.into_iter().cloned().collect()
}

/// One candidate question per bank entry, options permuted
fn build_pool<R: Rng + ?Sized>(bank: &WordBank, rng: &mut R) -> Vec<Question> {
    bank.entries()
        .map(|(difficulty, entry)| {
            let mut options = Vec::with_capacity(entry.distractors.len() + 1);
            options.push(entry.correct.clone());
            options.extend(entry.distractors.iter().cloned());
            options.shuffle(rng);

            // validated banks never repeat the definition among the distractors
            let correct_index = options
                .iter()
                .position(|o| *o == entry.correct)
                .unwrap_or_default();

            Question {
                id: format!("{:016x}", rng.gen::<u64>()),
                prompt: bank.prompt_for(&entry.word),
                options,
                correct_index,
                difficulty,
                word: entry.word.clone(),
            }
        })
        .collect()
}

fn take_unique<'a, I>(
    candidates: I,
    seen: &mut HashSet<&'a str>,
    picked: &mut Vec<&'a Question>,
    count: usize,
) where
    I: IntoIterator<Item = &'a Question>,
{
    for question in candidates {
        if picked.len() >= count {
            break;
        }
        if seen.insert(question.word.as_str()) {
            picked.push(question);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::WordEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn swedish() -> WordBank {
        WordBank::new("swedish").unwrap()
    }

    fn entry(word: &str) -> WordEntry {
        WordEntry {
            word: word.to_string(),
            correct: format!("{word}-meaning"),
            distractors: vec!["a".into(), "b".into(), "c".into()],
        }
    }

    fn tiny_bank() -> WordBank {
        let mut levels = BTreeMap::new();
        levels.insert(1, vec![entry("one"), entry("two")]);
        // same headword listed at two levels
        levels.insert(3, vec![entry("two"), entry("three")]);
        levels.insert(5, vec![entry("five")]);
        WordBank {
            name: "tiny".to_string(),
            prompt: "{word}?".to_string(),
            levels,
        }
    }

    fn headwords(questions: &[Question]) -> HashSet<&str> {
        questions.iter().map(|q| q.word.as_str()).collect()
    }

    #[test]
    fn test_no_duplicate_headwords() {
        let bank = swedish();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for mix in [Mix::Adaptive, Mix::Easy, Mix::Hard] {
                for count in [1, 5, 20, 100] {
                    let qs = sample_with(&bank, count, mix, &mut rng);
                    assert_eq!(headwords(&qs).len(), qs.len(), "seed {seed} {mix} {count}");
                }
            }
        }
    }

    #[test]
    fn test_correct_index_points_at_definition() {
        let bank = swedish();
        let mut rng = StdRng::seed_from_u64(7);
        for q in sample_with(&bank, 20, Mix::Adaptive, &mut rng) {
            let entry = bank.entries().find(|(_, e)| e.word == q.word).unwrap().1;
            assert_eq!(q.correct_option(), entry.correct);
            assert_eq!(q.options.len(), entry.distractors.len() + 1);
            for d in &entry.distractors {
                assert!(q.options.contains(d));
            }
            assert_eq!(q.prompt, bank.prompt_for(&q.word));
        }
    }

    #[test]
    fn test_easy_mix_only_easy_levels() {
        let bank = swedish();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let qs = sample_with(&bank, 8, Mix::Easy, &mut rng);
            assert_eq!(qs.len(), 8);
            assert!(qs.iter().all(|q| q.difficulty <= 2));
        }
    }

    #[test]
    fn test_hard_mix_only_hard_levels() {
        let bank = swedish();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let qs = sample_with(&bank, 6, Mix::Hard, &mut rng);
            assert_eq!(qs.len(), 6);
            assert!(qs.iter().all(|q| q.difficulty >= 4));
        }
    }

    #[test]
    fn test_adaptive_rises_in_difficulty() {
        let bank = swedish();
        let mut rng = StdRng::seed_from_u64(3);
        let qs = sample_with(&bank, 20, Mix::Adaptive, &mut rng);
        assert_eq!(qs.len(), 20);
        assert!(qs.windows(2).all(|w| w[0].difficulty <= w[1].difficulty));
    }

    #[test]
    fn test_adaptive_varies_within_level() {
        let bank = swedish();
        let firsts: HashSet<String> = (0..40)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                sample_with(&bank, 1, Mix::Adaptive, &mut rng)[0].word.clone()
            })
            .collect();
        assert!(firsts.len() > 1);
        let level_one: HashSet<&str> = bank.levels[&1].iter().map(|e| e.word.as_str()).collect();
        assert!(firsts.iter().all(|w| level_one.contains(w.as_str())));
    }

    #[test]
    fn test_fallback_fills_from_whole_bank() {
        let bank = swedish();
        let mut rng = StdRng::seed_from_u64(11);
        let qs = sample_with(&bank, 12, Mix::Easy, &mut rng);
        assert_eq!(qs.len(), 12);
        assert!(qs[..8].iter().all(|q| q.difficulty <= 2));
        assert!(qs[8..].iter().all(|q| q.difficulty > 2));
    }

    #[test]
    fn test_never_more_than_bank() {
        let bank = swedish();
        let mut rng = StdRng::seed_from_u64(1);
        let qs = sample_with(&bank, 100, Mix::Hard, &mut rng);
        assert_eq!(qs.len(), bank.distinct_headwords());
    }

    #[test]
    fn test_zero_count_is_empty() {
        let bank = swedish();
        assert!(sample(&bank, 0, Mix::Adaptive).is_empty());
    }

    #[test]
    fn test_repeated_headword_counts_once() {
        let bank = tiny_bank();
        assert_eq!(bank.distinct_headwords(), 4);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let qs = sample_with(&bank, 10, Mix::Adaptive, &mut rng);
            assert_eq!(qs.len(), 4);
            assert_eq!(headwords(&qs).len(), 4);
        }
    }

    #[test]
    fn test_empty_bank_yields_nothing() {
        let bank = WordBank {
            name: "empty".to_string(),
            prompt: "{word}".to_string(),
            levels: BTreeMap::new(),
        };
        assert!(sample(&bank, 20, Mix::Adaptive).is_empty());
    }

    #[test]
    fn test_question_ids_distinct() {
        let bank = swedish();
        let qs = sample(&bank, 20, Mix::Adaptive);
        let ids: HashSet<&str> = qs.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), qs.len());
    }

    #[test]
    fn test_mix_display_and_admits() {
        assert_eq!(Mix::Adaptive.to_string(), "adaptive");
        assert_eq!(Mix::Easy.to_string(), "easy");
        assert_eq!(Mix::Hard.to_string(), "hard");
        assert!(Mix::Easy.admits(2) && !Mix::Easy.admits(3));
        assert!(Mix::Hard.admits(4) && !Mix::Hard.admits(3));
        assert!((1..=5).all(|d| Mix::Adaptive.admits(d)));
    }
}
