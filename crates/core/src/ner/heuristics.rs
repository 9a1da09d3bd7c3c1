//! 启发式实体识别
//!
//! 基于语言配置的规则识别器，作为内置的实体识别模型：
//! - 人名：称谓 + 名字词；常见名 + 姓/名字词
//! - 组织：前缀词 + 组织后缀（Corp. / लिमिटेड 等）
//! - 日期：按语言配置的正则
//! - 地名：国家、州、城市词典
//! - 金额、邮箱、电话：跨语言通用正则
//!
//! 重叠的候选取最长者，结果按起始位置排序。

use std::collections::HashSet;

use regex::Regex;

use crate::entity::{Entity, EntityLabel, EntityRecognizer};
use crate::error::{RedactError, Result};
use crate::language::Language;
use crate::profile::{common_config, CommonConfig, LanguageProfile};

// ============================================================================
// 候选结果
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Candidate {
    label: EntityLabel,
    start: usize,
    end: usize,
}

impl Candidate {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &Candidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ============================================================================
// 识别器
// ============================================================================

/// 启发式识别器（每种语言一个实例）
pub struct HeuristicRecognizer {
    language: Language,
    titled_person: Option<Regex>,
    given_person: Option<Regex>,
    organization: Option<Regex>,
    dates: Vec<Regex>,
    places: Option<Regex>,
    money: Vec<Regex>,
    email: Vec<Regex>,
    phone: Vec<Regex>,
    stopwords: HashSet<String>,
}

impl HeuristicRecognizer {
    /// 从语言配置和通用配置构建
    pub fn new(profile: &LanguageProfile, common: &CommonConfig) -> Result<Self> {
        let person = &profile.person;

        let titled_person = match alternation(&person.titles) {
            Some(titles) => Some(build_regex(&format!(
                r"\b{titles}\s+(?P<name>{word}(?:\s+{word}){{0,{more}}})",
                titles = titles,
                word = person.name_word,
                more = person.max_name_words.saturating_sub(1),
            ))?),
            None => None,
        };

        let trailing = if person.surnames.is_empty() {
            Some(person.name_word.clone())
        } else {
            alternation(&person.surnames)
        };
        let given_person = match (alternation(&person.given_names), trailing) {
            (Some(given), Some(trailing)) => Some(build_regex(&format!(
                r"\b(?P<name>{given}(?:\s+{trailing}){{0,{max}}})",
                given = given,
                trailing = trailing,
                max = person.max_trailing_words,
            ))?),
            (Some(given), None) => Some(build_regex(&format!(r"\b(?P<name>{})", given))?),
            _ => None,
        };

        let org = &profile.organization;
        let organization = match alternation(&org.suffixes) {
            Some(suffixes) if org.max_prefix_words > 0 => Some(build_regex(&format!(
                r"\b(?P<prefix>(?:{word}\s+){{1,{max}}})(?P<suffix>{suffixes})",
                word = org.prefix_word,
                max = org.max_prefix_words,
                suffixes = suffixes,
            ))?),
            _ => None,
        };

        let places = match alternation(&profile.gpe.places) {
            Some(places) => Some(build_regex(&format!(r"\b{}", places))?),
            None => None,
        };

        Ok(Self {
            language: profile.language,
            titled_person,
            given_person,
            organization,
            dates: compile_patterns(&profile.date.patterns),
            places,
            money: compile_patterns(&common.money.patterns),
            email: compile_patterns(&common.email.patterns),
            phone: compile_patterns(&common.phone.patterns),
            stopwords: profile.stopwords.iter().cloned().collect(),
        })
    }

    /// 内置识别器
    pub fn builtin(language: Language) -> Result<Self> {
        let profile = LanguageProfile::builtin(language)?;
        let common = common_config()?;
        Self::new(&profile, &common)
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// 人名：从首词开始，遇到虚词即截断
    fn match_person(&self, text: &str, out: &mut Vec<Candidate>) {
        for regex in [&self.titled_person, &self.given_person].into_iter().flatten() {
            for caps in regex.captures_iter(text) {
                let Some(name) = caps.name("name") else {
                    continue;
                };
                let words = word_spans(name.as_str(), name.start());
                let kept: Vec<(usize, usize)> = words
                    .into_iter()
                    .take_while(|(s, e)| !self.is_stopword(&text[*s..*e]))
                    .collect();
                if let (Some(first), Some(last)) = (kept.first(), kept.last()) {
                    out.push(Candidate {
                        label: EntityLabel::Person,
                        start: first.0,
                        end: last.1,
                    });
                }
            }
        }
    }

    /// 组织：只保留后缀前连续的非虚词
    fn match_organization(&self, text: &str, out: &mut Vec<Candidate>) {
        let Some(regex) = &self.organization else {
            return;
        };

        for caps in regex.captures_iter(text) {
            let (Some(prefix), Some(suffix)) = (caps.name("prefix"), caps.name("suffix")) else {
                continue;
            };
            let words = word_spans(prefix.as_str(), prefix.start());
            let first_kept = words
                .iter()
                .rposition(|(s, e)| self.is_stopword(&text[*s..*e]))
                .map(|idx| idx + 1)
                .unwrap_or(0);
            if let Some((start, _)) = words.get(first_kept) {
                out.push(Candidate {
                    label: EntityLabel::Org,
                    start: *start,
                    end: suffix.end(),
                });
            }
        }
    }

    fn match_places(&self, text: &str, out: &mut Vec<Candidate>) {
        if let Some(regex) = &self.places {
            push_matches(text, std::slice::from_ref(regex), EntityLabel::Gpe, out);
        }
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut candidates = Vec::new();

        // 插入顺序决定完全重叠时的优先级
        push_matches(text, &self.email, EntityLabel::Email, &mut candidates);
        push_matches(text, &self.phone, EntityLabel::Phone, &mut candidates);
        push_matches(text, &self.money, EntityLabel::Money, &mut candidates);
        push_matches(text, &self.dates, EntityLabel::Date, &mut candidates);
        self.match_organization(text, &mut candidates);
        self.match_person(text, &mut candidates);
        self.match_places(text, &mut candidates);

        let entities: Vec<Entity> = resolve_overlaps(candidates)
            .into_iter()
            .map(|c| Entity {
                text: text[c.start..c.end].to_string(),
                label: c.label,
                start: c.start,
                end: c.end,
            })
            .collect();

        log::debug!(
            "[NER] {} 识别到 {} 个实体",
            self.language,
            entities.len()
        );
        entities
    }
}

// ============================================================================
// 辅助函数
// ============================================================================

/// 构造按长度降序的备选分组，字母数字结尾的项补 `\b`
fn alternation(items: &[String]) -> Option<String> {
    let mut items: Vec<&String> = items.iter().filter(|s| !s.trim().is_empty()).collect();
    if items.is_empty() {
        return None;
    }
    items.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let parts: Vec<String> = items
        .into_iter()
        .map(|item| {
            let escaped = regex::escape(item);
            match item.chars().last() {
                Some(c) if c.is_alphanumeric() => format!(r"{}\b", escaped),
                _ => escaped,
            }
        })
        .collect();

    Some(format!("(?:{})", parts.join("|")))
}

fn build_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| RedactError::Profile(format!("正则编译失败: {}", e)))
}

fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("[NER] 忽略无效正则 {}: {}", p, e);
                None
            }
        })
        .collect()
}

fn push_matches(text: &str, patterns: &[Regex], label: EntityLabel, out: &mut Vec<Candidate>) {
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            if m.start() < m.end() {
                out.push(Candidate {
                    label,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
    }
}

/// 切分单词并返回绝对字节区间
fn word_spans(s: &str, base: usize) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;

    for (idx, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(st) = start.take() {
                spans.push((base + st, base + idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(st) = start {
        spans.push((base + st, base + s.len()));
    }

    spans
}

/// 最长者优先；等长时起始位置靠前者优先
fn resolve_overlaps(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut ordered = candidates;
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    let mut kept: Vec<Candidate> = Vec::with_capacity(ordered.len());
    for candidate in ordered {
        if kept.iter().all(|k| !k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|c| c.start);
    kept
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> HeuristicRecognizer {
        HeuristicRecognizer::builtin(Language::En).unwrap()
    }

    fn hi() -> HeuristicRecognizer {
        HeuristicRecognizer::builtin(Language::Hi).unwrap()
    }

    fn texts(entities: &[Entity], label: EntityLabel) -> Vec<String> {
        entities
            .iter()
            .filter(|e| e.label == label)
            .map(|e| e.text.clone())
            .collect()
    }

    #[test]
    fn test_person_and_org_en() {
        let entities = en().recognize("John Smith works at Acme Corp.");
        assert_eq!(texts(&entities, EntityLabel::Person), vec!["John Smith"]);
        assert_eq!(texts(&entities, EntityLabel::Org), vec!["Acme Corp."]);
    }

    #[test]
    fn test_titled_person_excludes_title() {
        let entities = en().recognize("Please call Dr. Helen Carter tomorrow.");
        assert_eq!(texts(&entities, EntityLabel::Person), vec!["Helen Carter"]);
    }

    #[test]
    fn test_org_leading_stopword_trimmed() {
        let entities = en().recognize("At Globex Corporation the mood was good.");
        assert_eq!(texts(&entities, EntityLabel::Org), vec!["Globex Corporation"]);
    }

    #[test]
    fn test_date_and_gpe_en() {
        let entities = en().recognize("She moved to London on March 3, 2021 and then to India.");
        assert_eq!(texts(&entities, EntityLabel::Date), vec!["March 3, 2021"]);
        assert_eq!(texts(&entities, EntityLabel::Gpe), vec!["London", "India"]);
    }

    #[test]
    fn test_common_patterns() {
        let entities = en().recognize("Mail jane.doe@example.com or call (555) 123-4567 about $1,200.50.");
        assert_eq!(texts(&entities, EntityLabel::Email), vec!["jane.doe@example.com"]);
        assert_eq!(texts(&entities, EntityLabel::Phone), vec!["(555) 123-4567"]);
        assert_eq!(texts(&entities, EntityLabel::Money), vec!["$1,200.50"]);
    }

    #[test]
    fn test_entities_sorted_and_offsets_valid() {
        let text = "Mary Jones from Toronto joined Initech Inc. on 2023-05-01.";
        let entities = en().recognize(text);
        assert!(entities.windows(2).all(|w| w[0].end <= w[1].start));
        for entity in &entities {
            assert_eq!(&text[entity.start..entity.end], entity.text);
        }
    }

    #[test]
    fn test_longest_span_wins() {
        // "New Delhi" 覆盖 "Delhi"
        let entities = en().recognize("The office is in New Delhi.");
        assert_eq!(texts(&entities, EntityLabel::Gpe), vec!["New Delhi"]);
    }

    #[test]
    fn test_person_hi() {
        let entities = hi().recognize("राहुल शर्मा ने दिल्ली में काम किया।");
        assert_eq!(texts(&entities, EntityLabel::Person), vec!["राहुल शर्मा"]);
        assert_eq!(texts(&entities, EntityLabel::Gpe), vec!["दिल्ली"]);
    }

    #[test]
    fn test_titled_person_hi_stops_at_postposition() {
        let entities = hi().recognize("कल श्री मोहनलाल ने भाषण दिया।");
        assert_eq!(texts(&entities, EntityLabel::Person), vec!["मोहनलाल"]);
    }

    #[test]
    fn test_org_and_date_hi() {
        let entities = hi().recognize("रिलायंस इंडस्ट्रीज लिमिटेड की बैठक 15 अगस्त 2023 को हुई।");
        assert_eq!(
            texts(&entities, EntityLabel::Org),
            vec!["रिलायंस इंडस्ट्रीज लिमिटेड"]
        );
        assert_eq!(texts(&entities, EntityLabel::Date), vec!["15 अगस्त 2023"]);
    }

    #[test]
    fn test_alternation_orders_longest_first() {
        let alt = alternation(&["Mr".to_string(), "Mrs.".to_string()]).unwrap();
        assert_eq!(alt, r"(?:Mrs\.|Mr\b)");
    }

    #[test]
    fn test_word_spans() {
        assert_eq!(word_spans(" ab  c", 10), vec![(11, 13), (15, 16)]);
    }
}
