//! OCR 引擎
//!
//! 通过 Tesseract CLI 识别图片文字，输出单词级结果与相对坐标。

mod engine;
mod error;
mod tesseract;
mod types;

pub use engine::{join_words, OcrEngine};
pub use error::{OcrError, Result};
pub use tesseract::{
    compute_tessdata_hash, detect_tesseract_status, get_tesseract_langs, get_tesseract_version,
    parse_tesseract_tsv, TesseractEngine,
};
pub use types::{
    BBox, OcrAuditInfo, OcrTextResult, TesseractConfig, TesseractStatus, BINARY_ENV,
    DEFAULT_LANG, TESSDATA_ENV,
};
