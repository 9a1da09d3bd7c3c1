//! Medact 应用层：配置、处理流程与命令行

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod report;

pub use config::AppConfig;
pub use pipeline::{build_redactor, FrameTextMode, MediaPipeline, ProcessOptions};
pub use report::ProcessReport;
