//! 语言检测
//!
//! 每次请求按文本检测主语言，只接受英语和印地语。

use crate::error::{RedactError, Result};
use serde::{Deserialize, Serialize};
use whatlang::{detect, Lang};

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn all() -> [Language; 2] {
        [Language::En, Language::Hi]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Ok(Language::En),
            "hi" | "hin" | "hindi" => Ok(Language::Hi),
            other => Err(RedactError::UnsupportedLanguage {
                detected: other.to_string(),
            }),
        }
    }
}

/// 语言检测器
pub trait LanguageDetector: Send + Sync {
    /// 检测文本主语言，不支持的语言返回 `UnsupportedLanguage`
    fn detect(&self, text: &str) -> Result<Language>;
}

/// 基于 whatlang 的检测器
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<Language> {
        let info = detect(text).ok_or_else(|| RedactError::UnsupportedLanguage {
            detected: "unknown".to_string(),
        })?;

        log::debug!(
            "[Lang] whatlang: {} (置信度 {:.2})",
            info.lang().code(),
            info.confidence()
        );

        match info.lang() {
            Lang::Eng => Ok(Language::En),
            Lang::Hin => Ok(Language::Hi),
            other => Err(RedactError::UnsupportedLanguage {
                detected: other.code().to_string(),
            }),
        }
    }
}

/// 固定语言，跳过检测（用户手动指定语言时使用）
#[derive(Debug, Clone, Copy)]
pub struct FixedDetector(pub Language);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<Language> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        let text = "The quarterly report was prepared by the finance team and \
                    shared with everyone in the office before the meeting on Monday.";
        assert_eq!(WhatlangDetector.detect(text).unwrap(), Language::En);
    }

    #[test]
    fn test_detect_hindi() {
        let text = "यह रिपोर्ट वित्त विभाग के द्वारा तैयार की गई है और इसे सभी \
                    कर्मचारियों के साथ साझा किया गया है क्योंकि बैठक सोमवार को होगी।";
        assert_eq!(WhatlangDetector.detect(text).unwrap(), Language::Hi);
    }

    #[test]
    fn test_detect_french_is_unsupported() {
        let text = "Le rapport trimestriel a été préparé par l'équipe financière et \
                    partagé avec tout le monde au bureau avant la réunion de lundi.";
        match WhatlangDetector.detect(text) {
            Err(RedactError::UnsupportedLanguage { detected }) => assert_eq!(detected, "fra"),
            other => panic!("expected unsupported language, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_empty_is_unsupported() {
        assert!(matches!(
            WhatlangDetector.detect(""),
            Err(RedactError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("hindi".parse::<Language>().unwrap(), Language::Hi);
        assert!("fr".parse::<Language>().is_err());
    }
}
