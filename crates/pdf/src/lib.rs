//! PDF 文档处理器
//!
//! 用 lopdf 逐页提取文本层。扫描件没有文本层时得到空页面，
//! 不会自动转入 OCR。

use anyhow::{anyhow, Result};
use lopdf::Document as PdfFile;
use medact_core::document::{Document, Page};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    path: PathBuf,
    pages: Vec<Page>,
}

impl PdfDocument {
    /// 从内存加载
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let file = PdfFile::load_mem(bytes).map_err(|e| anyhow!("无法加载 PDF: {}", e))?;
        Ok(Self {
            path: PathBuf::new(),
            pages: extract_pages(&file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl Document for PdfDocument {
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized,
    {
        if !path.exists() {
            return Err(anyhow!("文件不存在: {}", path.display()));
        }

        let file = PdfFile::load(path).map_err(|e| anyhow!("无法加载 PDF: {}", e))?;
        let pages = extract_pages(&file);
        log::info!(
            "[PDF] 已加载 {}，共 {} 页",
            path.display(),
            pages.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            pages,
        })
    }

    fn get_pages(&self) -> Result<Vec<Page>> {
        Ok(self.pages.clone())
    }

    fn get_supported_features(&self) -> Vec<String> {
        vec!["text_extract".to_string(), "text_redact".to_string()]
    }
}

/// 逐页提取；单页失败记为空文本，不影响其他页
fn extract_pages(file: &PdfFile) -> Vec<Page> {
    if file.is_encrypted() {
        log::warn!("[PDF] 文档已加密，文本提取可能为空");
    }

    file.get_pages()
        .keys()
        .map(|&page_number| {
            let content = file.extract_text(&[page_number]).unwrap_or_else(|e| {
                log::warn!("[PDF] 第 {} 页文本提取失败: {}", page_number, e);
                String::new()
            });
            Page {
                page_number,
                content,
            }
        })
        .collect()
}
