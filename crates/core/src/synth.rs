//! 合成文本生成
//!
//! 为每个被替换的实体生成一段词数相同的假短语。

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::Result;
use crate::language::Language;
use crate::profile::{LanguageProfile, LoremConfig};

/// 合成短语生成器
pub trait PhraseGenerator: Send + Sync {
    /// 生成恰好 `word_count` 个词的短语（至少 1 个词）
    fn phrase(&self, word_count: usize) -> String;
}

/// 基于词表的随机短语
pub struct LoremGenerator {
    words: Vec<String>,
    sentence_end: String,
    capitalize: bool,
    rng: Mutex<StdRng>,
}

impl LoremGenerator {
    /// `seed` 为空时使用系统熵
    pub fn new(config: &LoremConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            words: config.words.clone(),
            sentence_end: config.sentence_end.clone(),
            capitalize: config.capitalize,
            rng: Mutex::new(rng),
        }
    }

    pub fn builtin(language: Language, seed: Option<u64>) -> Result<Self> {
        let profile = LanguageProfile::builtin(language)?;
        Ok(Self::new(&profile.lorem, seed))
    }
}

impl PhraseGenerator for LoremGenerator {
    fn phrase(&self, word_count: usize) -> String {
        let count = word_count.max(1);
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let mut words: Vec<String> = (0..count)
            .map(|_| {
                self.words
                    .choose(&mut *rng)
                    .cloned()
                    .unwrap_or_else(|| "lorem".to_string())
            })
            .collect();

        if self.capitalize {
            if let Some(first) = words.first_mut() {
                *first = capitalize(first);
            }
        }

        let mut phrase = words.join(" ");
        phrase.push_str(&self.sentence_end);
        phrase
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_word_count() {
        let generator = LoremGenerator::builtin(Language::En, Some(7)).unwrap();
        for n in 1..6 {
            let phrase = generator.phrase(n);
            assert_eq!(phrase.split_whitespace().count(), n);
            assert!(phrase.ends_with('.'));
        }
    }

    #[test]
    fn test_phrase_zero_words_yields_one() {
        let generator = LoremGenerator::builtin(Language::En, Some(1)).unwrap();
        assert_eq!(generator.phrase(0).split_whitespace().count(), 1);
    }

    #[test]
    fn test_phrase_capitalized_en() {
        let generator = LoremGenerator::builtin(Language::En, Some(3)).unwrap();
        let phrase = generator.phrase(2);
        assert!(phrase.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_phrase_hi_uses_danda() {
        let generator = LoremGenerator::builtin(Language::Hi, Some(3)).unwrap();
        let phrase = generator.phrase(3);
        assert_eq!(phrase.split_whitespace().count(), 3);
        assert!(phrase.ends_with('।'));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = LoremGenerator::builtin(Language::En, Some(42)).unwrap();
        let b = LoremGenerator::builtin(Language::En, Some(42)).unwrap();
        assert_eq!(a.phrase(4), b.phrase(4));
    }
}
