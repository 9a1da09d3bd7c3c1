//! 语言模型注册表
//!
//! 启动时一次性构建：语言 -> (识别器, 生成器)。构建后只读，
//! 以引用方式传给脱敏器。

use std::collections::HashMap;

use crate::entity::EntityRecognizer;
use crate::error::{RedactError, Result};
use crate::language::Language;
use crate::ner::HeuristicRecognizer;
use crate::synth::{LoremGenerator, PhraseGenerator};

/// 某语言绑定的一对模型
pub struct LanguageModels {
    pub recognizer: Box<dyn EntityRecognizer>,
    pub generator: Box<dyn PhraseGenerator>,
}

pub struct ModelRegistry {
    models: HashMap<Language, LanguageModels>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder {
            models: HashMap::new(),
        }
    }

    /// 内置模型：启发式识别器 + 词表生成器（en / hi）
    pub fn builtin(seed: Option<u64>) -> Result<Self> {
        let mut builder = Self::builder();
        for (offset, language) in Language::all().into_iter().enumerate() {
            let seed = seed.map(|s| s.wrapping_add(offset as u64));
            builder = builder.register(
                language,
                HeuristicRecognizer::builtin(language)?,
                LoremGenerator::builtin(language, seed)?,
            );
        }
        Ok(builder.build())
    }

    pub fn get(&self, language: Language) -> Result<&LanguageModels> {
        self.models
            .get(&language)
            .ok_or(RedactError::MissingModels(language))
    }

    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.models.keys().copied().collect();
        languages.sort();
        languages
    }
}

pub struct ModelRegistryBuilder {
    models: HashMap<Language, LanguageModels>,
}

impl ModelRegistryBuilder {
    /// 同一语言重复注册时后者覆盖前者
    pub fn register(
        mut self,
        language: Language,
        recognizer: impl EntityRecognizer + 'static,
        generator: impl PhraseGenerator + 'static,
    ) -> Self {
        self.models.insert(
            language,
            LanguageModels {
                recognizer: Box::new(recognizer),
                generator: Box::new(generator),
            },
        );
        self
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry {
            models: self.models,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registers_both_languages() {
        let registry = ModelRegistry::builtin(Some(1)).unwrap();
        assert_eq!(registry.languages(), vec![Language::En, Language::Hi]);
    }

    #[test]
    fn test_missing_language() {
        let registry = ModelRegistry::builder()
            .register(
                Language::En,
                HeuristicRecognizer::builtin(Language::En).unwrap(),
                LoremGenerator::builtin(Language::En, None).unwrap(),
            )
            .build();
        assert!(registry.get(Language::En).is_ok());
        assert!(matches!(
            registry.get(Language::Hi),
            Err(RedactError::MissingModels(Language::Hi))
        ));
    }
}
