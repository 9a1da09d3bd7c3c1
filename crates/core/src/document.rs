//! 统一文档接口定义
//!
//! 所有文档加载器都实现 `Document` trait，脱敏流程只依赖这里的抽象。

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 页面数据结构
///
/// 每个页面包含页码和纯文本内容。对于无分页概念的文件（如 .txt、.docx），
/// 整个文件内容作为页码为 1 的唯一页面。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 页码，从 1 开始
    pub page_number: u32,
    /// 页面的纯文本内容
    pub content: String,
}

/// 统一文档接口
pub trait Document: Send + Sync {
    /// 加载文档
    ///
    /// 失败时返回明确的错误信息（文件不存在、格式损坏等）
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// 按页面提取可供脱敏的纯文本
    fn get_pages(&self) -> Result<Vec<Page>>;

    /// 声明支持的功能，例如 `text_extract`、`text_redact`
    fn get_supported_features(&self) -> Vec<String>;

    /// 拼接页面时使用的分隔符
    fn page_separator(&self) -> &str {
        ""
    }

    /// 全文，按页序拼接
    fn full_text(&self) -> Result<String> {
        let pages = self.get_pages()?;
        Ok(pages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join(self.page_separator()))
    }
}

/// 按扩展名划分的文件类型（不检查文件内容）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
    Image,
    Video,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "txt" | "md" => Some(FileKind::Text),
            "jpg" | "jpeg" | "png" => Some(FileKind::Image),
            "mp4" => Some(FileKind::Video),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Text => "text",
            FileKind::Image => "image",
            FileKind::Video => "video",
        };
        write!(f, "{}", name)
    }
}
