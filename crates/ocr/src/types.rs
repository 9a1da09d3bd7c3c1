//! OCR 共享类型定义

use serde::{Deserialize, Serialize};

/// OCR 识别结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrTextResult {
    pub text: String,
    /// 0-1
    pub confidence: f32,
    pub bbox: BBox,
}

/// 边界框（相对坐标 0-1）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BBox {
    /// 换算回像素坐标 (x, y, w, h)，裁剪到图像范围内
    pub fn to_pixels(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let fw = width as f32;
        let fh = height as f32;
        let x0 = (self.x * fw).round().clamp(0.0, fw) as u32;
        let y0 = (self.y * fh).round().clamp(0.0, fh) as u32;
        let x1 = ((self.x + self.w) * fw).round().clamp(0.0, fw) as u32;
        let y1 = ((self.y + self.h) * fh).round().clamp(0.0, fh) as u32;
        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Tesseract 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TesseractConfig {
    /// Tesseract 可执行文件路径
    pub binary_path: Option<String>,
    /// tessdata 目录路径
    pub tessdata_path: Option<String>,
    /// 语言（如 "eng+hin"）
    pub lang: Option<String>,
    /// 页面分割模式 (0-13)
    pub psm: Option<u8>,
    /// OCR 引擎模式 (0-3)
    pub oem: Option<u8>,
}

pub const DEFAULT_LANG: &str = "eng+hin";
pub const BINARY_ENV: &str = "MEDACT_TESSERACT";
pub const TESSDATA_ENV: &str = "MEDACT_TESSDATA";

impl TesseractConfig {
    /// 配置优先，其次环境变量 `MEDACT_TESSERACT`，最后为 PATH 中的 `tesseract`
    pub fn binary_or_default(&self) -> String {
        self.binary_path
            .clone()
            .or_else(|| std::env::var(BINARY_ENV).ok())
            .unwrap_or_else(|| "tesseract".to_string())
    }

    pub fn tessdata_or_env(&self) -> Option<String> {
        self.tessdata_path
            .clone()
            .or_else(|| std::env::var(TESSDATA_ENV).ok())
    }

    pub fn lang_or_default(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    pub fn psm_or_default(&self) -> u8 {
        self.psm.unwrap_or(3)
    }

    pub fn oem_or_default(&self) -> u8 {
        self.oem.unwrap_or(1)
    }
}

/// Tesseract 安装状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TesseractStatus {
    pub installed: bool,
    pub version: Option<String>,
    pub binary_path: Option<String>,
    pub tessdata_path: Option<String>,
    pub available_langs: Vec<String>,
    /// 所需语言包中缺失的部分
    pub missing_langs: Vec<String>,
    pub error: Option<String>,
}

/// OCR 审计信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrAuditInfo {
    pub engine: String,
    pub engine_version: Option<String>,
    /// 引擎参数（JSON）
    pub engine_params: Option<String>,
    /// tessdata 指纹
    pub tessdata_hash: Option<String>,
}
