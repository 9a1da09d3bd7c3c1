//! 文本脱敏
//!
//! 流程：检测语言 -> 取该语言的识别器与生成器 -> 识别实体 ->
//! 对选中标签的实体用等词数的合成短语替换（`<<...>>` 包裹）。
//!
//! 两种替换方式：
//! - [`ReplacementMode::Literal`]：按实体原文做全局子串替换。文档中其他位置
//!   出现的相同字面文本也会被替换；后面的实体在已替换的文本上继续匹配，
//!   因此合成短语有可能被后续实体再次命中。
//! - [`ReplacementMode::Span`]：只替换识别器给出的区间，从右向左应用，
//!   不影响其他位置。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityLabel};
use crate::error::Result;
use crate::language::{Language, LanguageDetector, WhatlangDetector};
use crate::registry::{LanguageModels, ModelRegistry};

pub const MARKER_OPEN: &str = "<<";
pub const MARKER_CLOSE: &str = ">>";

/// 脱敏级别
///
/// `Partial` 目前与 `Full` 行为一致：参数被接收并记录，但尚未定义差异化语义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionLevel {
    #[default]
    Full,
    Partial,
}

impl std::fmt::Display for RedactionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedactionLevel::Full => write!(f, "full"),
            RedactionLevel::Partial => write!(f, "partial"),
        }
    }
}

impl std::str::FromStr for RedactionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(RedactionLevel::Full),
            "partial" => Ok(RedactionLevel::Partial),
            other => Err(format!("未知脱敏级别: {}", other)),
        }
    }
}

/// 替换方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementMode {
    /// 全局子串替换
    #[default]
    Literal,
    /// 按识别区间替换
    Span,
}

impl std::fmt::Display for ReplacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplacementMode::Literal => write!(f, "literal"),
            ReplacementMode::Span => write!(f, "span"),
        }
    }
}

impl std::str::FromStr for ReplacementMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "literal" => Ok(ReplacementMode::Literal),
            "span" => Ok(ReplacementMode::Span),
            other => Err(format!("未知替换方式: {}", other)),
        }
    }
}

/// 一次脱敏请求
#[derive(Debug, Clone)]
pub struct RedactionRequest {
    pub text: String,
    pub wanted_labels: BTreeSet<EntityLabel>,
    pub level: RedactionLevel,
}

impl RedactionRequest {
    /// 默认只脱敏人名，级别 full
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            wanted_labels: BTreeSet::from([EntityLabel::Person]),
            level: RedactionLevel::Full,
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = EntityLabel>) -> Self {
        self.wanted_labels = labels.into_iter().collect();
        self
    }

    pub fn with_level(mut self, level: RedactionLevel) -> Self {
        self.level = level;
        self
    }
}

/// 单个实体的替换记录
#[derive(Debug, Clone, Serialize)]
pub struct Replacement {
    pub label: EntityLabel,
    /// 原文不进入任何输出
    #[serde(skip)]
    pub original: String,
    pub synthetic: String,
    /// 实际替换次数（字面模式下可能为 0 或大于 1）
    pub occurrences: usize,
}

/// 脱敏结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedText {
    pub text: String,
    pub language: Language,
    pub level: RedactionLevel,
    pub mode: ReplacementMode,
    pub replacements: Vec<Replacement>,
}

/// 脱敏器
pub struct Redactor {
    registry: ModelRegistry,
    detector: Box<dyn LanguageDetector>,
    mode: ReplacementMode,
}

impl Redactor {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            detector: Box::new(WhatlangDetector),
            mode: ReplacementMode::default(),
        }
    }

    pub fn with_detector(mut self, detector: impl LanguageDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    pub fn with_mode(mut self, mode: ReplacementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn detect_language(&self, text: &str) -> Result<Language> {
        self.detector.detect(text)
    }

    /// 只识别不替换
    pub fn recognize(&self, text: &str) -> Result<(Language, Vec<Entity>)> {
        let language = self.detect_language(text)?;
        let models = self.registry.get(language)?;
        Ok((language, models.recognizer.recognize(text)))
    }

    /// 执行脱敏；语言不受支持时直接失败，不做任何替换
    pub fn redact(&self, request: RedactionRequest) -> Result<RedactedText> {
        let RedactionRequest {
            text,
            wanted_labels,
            level,
        } = request;

        let language = self.detect_language(&text)?;
        let models = self.registry.get(language)?;

        if level == RedactionLevel::Partial {
            log::debug!("[Redact] partial 级别尚未区分，按 full 处理");
        }

        let entities = models.recognizer.recognize(&text);
        let wanted: Vec<&Entity> = entities
            .iter()
            .filter(|e| wanted_labels.contains(&e.label) && !e.text.trim().is_empty())
            .collect();

        let (redacted, replacements) = match self.mode {
            ReplacementMode::Literal => replace_literal(&text, &wanted, models),
            ReplacementMode::Span => replace_spans(&text, &wanted, models),
        };

        log::info!(
            "[Redact] 语言: {}，识别实体 {} 个，替换 {} 个（{}）",
            language,
            entities.len(),
            replacements.len(),
            self.mode
        );

        Ok(RedactedText {
            text: redacted,
            language,
            level,
            mode: self.mode,
            replacements,
        })
    }

    /// 只返回脱敏后的文本
    pub fn redact_text(
        &self,
        text: &str,
        wanted_labels: &BTreeSet<EntityLabel>,
        level: RedactionLevel,
    ) -> Result<String> {
        let request = RedactionRequest {
            text: text.to_string(),
            wanted_labels: wanted_labels.clone(),
            level,
        };
        Ok(self.redact(request)?.text)
    }
}

fn mark(synthetic: &str) -> String {
    format!("{}{}{}", MARKER_OPEN, synthetic, MARKER_CLOSE)
}

/// 按识别顺序逐个做全局子串替换
fn replace_literal(
    text: &str,
    entities: &[&Entity],
    models: &LanguageModels,
) -> (String, Vec<Replacement>) {
    let mut working = text.to_string();
    let mut replacements = Vec::with_capacity(entities.len());

    for entity in entities {
        let synthetic = models.generator.phrase(entity.word_count());
        let occurrences = working.matches(entity.text.as_str()).count();
        if occurrences > 0 {
            working = working.replace(entity.text.as_str(), &mark(&synthetic));
        }
        log::debug!(
            "[Redact] {} \"{}\" -> \"{}\" x{}",
            entity.label,
            entity.text,
            synthetic,
            occurrences
        );

        replacements.push(Replacement {
            label: entity.label,
            original: entity.text.clone(),
            synthetic,
            occurrences,
        });
    }

    (working, replacements)
}

/// 只替换识别区间，从右向左应用；重叠区间保留起始靠前（其次更长）的一个
fn replace_spans(
    text: &str,
    entities: &[&Entity],
    models: &LanguageModels,
) -> (String, Vec<Replacement>) {
    let mut valid: Vec<&Entity> = entities
        .iter()
        .copied()
        .filter(|e| {
            let ok = e.start < e.end
                && e.end <= text.len()
                && text.is_char_boundary(e.start)
                && text.is_char_boundary(e.end)
                && text[e.start..e.end] == e.text;
            if !ok {
                log::warn!("[Redact] 实体区间与原文不一致，跳过: {}", e.label);
            }
            ok
        })
        .collect();
    valid.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut kept: Vec<&Entity> = Vec::with_capacity(valid.len());
    for entity in valid {
        if kept.last().map_or(true, |last| entity.start >= last.end) {
            kept.push(entity);
        }
    }

    let replacements: Vec<Replacement> = kept
        .iter()
        .map(|entity| Replacement {
            label: entity.label,
            original: entity.text.clone(),
            synthetic: models.generator.phrase(entity.word_count()),
            occurrences: 1,
        })
        .collect();

    let mut working = text.to_string();
    for (entity, replacement) in kept.iter().zip(replacements.iter()).rev() {
        working.replace_range(entity.start..entity.end, &mark(&replacement.synthetic));
    }

    (working, replacements)
}
