//! 脱敏错误类型

use crate::language::Language;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedactError {
    /// 检测到的语言不在支持范围内（仅支持 en / hi）
    #[error("不支持的语言: {detected}")]
    UnsupportedLanguage { detected: String },

    #[error("语言 {0} 未注册识别模型")]
    MissingModels(Language),

    #[error("语言配置无效: {0}")]
    Profile(String),
}

pub type Result<T> = std::result::Result<T, RedactError>;
