//! 纯文本文档处理器
//!
//! 实现 `Document` trait，支持 .txt 和 .md 文件的加载与文本提取。

use anyhow::{anyhow, Result};
use medact_core::document::{Document, Page};
use std::fs;
use std::path::{Path, PathBuf};

/// 纯文本文档处理器
///
/// 整个文件内容作为单页处理。
pub struct TextDocument {
    path: PathBuf,
    content: String,
}

impl Document for TextDocument {
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized,
    {
        if !path.exists() {
            return Err(anyhow!("文件不存在: {}", path.display()));
        }

        let bytes = fs::read(path).map_err(|e| anyhow!("无法读取文件: {}", e))?;
        // 去掉 UTF-8 BOM
        let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
        let content = String::from_utf8(bytes.to_vec())
            .map_err(|_| anyhow!("文件不是有效的 UTF-8 文本: {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    fn get_pages(&self) -> Result<Vec<Page>> {
        Ok(vec![Page {
            page_number: 1,
            content: self.content.clone(),
        }])
    }

    fn get_supported_features(&self) -> Vec<String> {
        vec!["text_extract".to_string(), "text_redact".to_string()]
    }
}

impl TextDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_single_page() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "John Smith works at Acme Corp.\nSecond line").unwrap();

        let doc = TextDocument::load(file.path()).unwrap();
        let pages = doc.get_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(
            doc.full_text().unwrap(),
            "John Smith works at Acme Corp.\nSecond line"
        );
    }

    #[test]
    fn test_bom_stripped() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        file.write_all("# नमस्ते".as_bytes()).unwrap();

        let doc = TextDocument::load(file.path()).unwrap();
        assert_eq!(doc.full_text().unwrap(), "# नमस्ते");
    }

    #[test]
    fn test_missing_file() {
        assert!(TextDocument::load(Path::new("/nonexistent/file.txt")).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        assert!(TextDocument::load(file.path()).is_err());
    }
}
