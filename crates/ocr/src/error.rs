//! OCR 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("未找到 Tesseract: {0}")]
    NotInstalled(String),

    #[error("Tesseract 执行失败: {0}")]
    Engine(String),

    #[error("图像处理失败: {0}")]
    ImageProcess(#[from] image::ImageError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;
