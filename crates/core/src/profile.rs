//! 语言配置
//!
//! 内置识别器与合成词生成器的数据全部来自 `data/` 下的 JSON：
//! - `en.json` / `hi.json`：语言相关（人名、组织、日期、地名、填充词）
//! - `common.json`：跨语言通用（金额、邮箱、电话）

use crate::error::{RedactError, Result};
use crate::language::Language;
use once_cell::sync::Lazy;
use serde::Deserialize;

const EN_JSON: &str = include_str!("../data/en.json");
const HI_JSON: &str = include_str!("../data/hi.json");
const COMMON_JSON: &str = include_str!("../data/common.json");

static COMMON: Lazy<std::result::Result<CommonConfig, String>> =
    Lazy::new(|| serde_json::from_str(COMMON_JSON).map_err(|e| e.to_string()));

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageProfile {
    pub version: String,
    pub language: Language,
    pub person: PersonConfig,
    pub organization: OrganizationConfig,
    pub date: PatternConfig,
    pub gpe: GazetteerConfig,
    /// 实体首尾需要剔除的虚词
    #[serde(default)]
    pub stopwords: Vec<String>,
    pub lorem: LoremConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonConfig {
    /// 称谓（Mr. / श्री 等），称谓本身不计入实体
    pub titles: Vec<String>,
    /// 称谓之后的名字词
    pub name_word: String,
    pub max_name_words: usize,
    pub given_names: Vec<String>,
    /// 为空时，名字之后的词按 `name_word` 匹配
    #[serde(default)]
    pub surnames: Vec<String>,
    pub max_trailing_words: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    pub suffixes: Vec<String>,
    pub prefix_word: String,
    pub max_prefix_words: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerConfig {
    pub places: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoremConfig {
    pub words: Vec<String>,
    pub sentence_end: String,
    /// 文字有大小写时首词大写
    pub capitalize: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    pub money: PatternConfig,
    pub email: PatternConfig,
    pub phone: PatternConfig,
}

impl LanguageProfile {
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: LanguageProfile =
            serde_json::from_str(json).map_err(|e| RedactError::Profile(e.to_string()))?;
        if profile.lorem.words.is_empty() {
            return Err(RedactError::Profile(format!(
                "{}: lorem.words 不能为空",
                profile.language
            )));
        }
        Ok(profile)
    }

    /// 内置语言配置
    pub fn builtin(language: Language) -> Result<Self> {
        let json = match language {
            Language::En => EN_JSON,
            Language::Hi => HI_JSON,
        };
        let profile = Self::from_json(json)?;
        if profile.language != language {
            return Err(RedactError::Profile(format!(
                "配置语言不一致: 期望 {}，实际 {}",
                language, profile.language
            )));
        }
        Ok(profile)
    }
}

/// 内置跨语言配置
pub fn common_config() -> Result<CommonConfig> {
    COMMON.clone().map_err(RedactError::Profile)
}
