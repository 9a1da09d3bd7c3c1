//! 实体模型
//!
//! 识别器输出 (实体文本, 标签) 序列，脱敏流程只依赖这里的类型。

use serde::{Deserialize, Serialize};

/// 实体标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    /// 人名
    Person,
    /// 组织机构
    Org,
    /// 日期
    Date,
    /// 国家、城市、州等地缘政治实体
    Gpe,
    /// 金额
    Money,
    /// 邮箱地址
    Email,
    /// 电话号码
    Phone,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Org => "ORG",
            EntityLabel::Date => "DATE",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Money => "MONEY",
            EntityLabel::Email => "EMAIL",
            EntityLabel::Phone => "PHONE",
        }
    }

    pub fn all() -> [EntityLabel; 7] {
        [
            EntityLabel::Person,
            EntityLabel::Org,
            EntityLabel::Date,
            EntityLabel::Gpe,
            EntityLabel::Money,
            EntityLabel::Email,
            EntityLabel::Phone,
        ]
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        EntityLabel::all()
            .into_iter()
            .find(|label| label.as_str() == upper)
            .ok_or_else(|| format!("未知实体类型: {}", s))
    }
}

/// 识别出的实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// 实体原文
    pub text: String,
    pub label: EntityLabel,
    /// 起始位置（字节偏移）
    pub start: usize,
    /// 结束位置（字节偏移）
    pub end: usize,
}

impl Entity {
    /// 按空白切分的词数
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// 实体识别器
///
/// 每种语言绑定一个识别器。返回顺序即后续替换顺序。
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_case_insensitive() {
        assert_eq!("person".parse::<EntityLabel>().unwrap(), EntityLabel::Person);
        assert_eq!(" Gpe ".parse::<EntityLabel>().unwrap(), EntityLabel::Gpe);
        assert!("LOCATION".parse::<EntityLabel>().is_err());
    }

    #[test]
    fn test_label_serde_uppercase() {
        let json = serde_json::to_string(&EntityLabel::Org).unwrap();
        assert_eq!(json, "\"ORG\"");
    }

    #[test]
    fn test_word_count() {
        let entity = Entity {
            text: "John  Smith".to_string(),
            label: EntityLabel::Person,
            start: 0,
            end: 11,
        };
        assert_eq!(entity.word_count(), 2);
    }
}
