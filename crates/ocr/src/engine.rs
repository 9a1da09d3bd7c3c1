//! OCR 引擎 trait 定义

use crate::error::Result;
use crate::types::{OcrAuditInfo, OcrTextResult};
use image::DynamicImage;
use std::path::Path;

/// OCR 引擎统一 trait
pub trait OcrEngine: Send {
    /// 识别图片中的文字（单词级）
    fn recognize_image(&mut self, img: &DynamicImage) -> Result<Vec<OcrTextResult>>;

    /// 识别图片文件
    fn recognize_file(&mut self, image_path: &Path) -> Result<Vec<OcrTextResult>> {
        let img = image::open(image_path)?;
        self.recognize_image(&img)
    }

    /// 提取纯文本，单词之间以空格连接
    fn extract_text(&mut self, image_path: &Path) -> Result<String> {
        let results = self.recognize_file(image_path)?;
        Ok(join_words(&results))
    }

    /// 获取审计信息
    fn audit_info(&self) -> OcrAuditInfo;
}

pub fn join_words(results: &[OcrTextResult]) -> String {
    results
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
