//! 视觉处理错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("级联分类器无效: {0}")]
    Cascade(String),

    #[error("XML 解析失败: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("未找到 {0}，请确认已安装并在 PATH 中")]
    ToolMissing(String),

    #[error("视频处理失败: {0}")]
    Video(String),

    #[error("图像处理失败: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;
