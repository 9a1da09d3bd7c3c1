use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use medact_core::{EntityLabel, RedactionLevel, ReplacementMode};
use medact_ocr::TesseractConfig;
use medact_vision::DEFAULT_FPS;

use crate::pipeline::FrameTextMode;

pub const CASCADE_ENV: &str = "MEDACT_CASCADE";
pub const CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    // ============ OCR ============
    /// Tesseract 配置
    pub tesseract: Option<TesseractConfig>,
    /// 为 false 时图片与视频帧都不做 OCR
    pub ocr_enabled: Option<bool>,

    // ============ 人脸 / 视频 ============
    /// Haar 级联 XML 路径
    pub cascade_path: Option<String>,
    pub ffmpeg_path: Option<String>,
    pub ffprobe_path: Option<String>,
    /// 输出视频帧率
    pub video_fps: Option<u32>,
    /// 视频帧与图片中的文字是否脱敏
    pub frame_text: Option<FrameTextMode>,
    /// 人脸框向后保留的帧数，0 表示逐帧独立
    pub tracking_hold_frames: Option<usize>,

    // ============ 文本脱敏 ============
    pub default_entities: Option<Vec<EntityLabel>>,
    pub default_level: Option<RedactionLevel>,
    pub replacement_mode: Option<ReplacementMode>,
    /// 合成文本随机种子，便于复现
    pub seed: Option<u64>,
    /// 输出目录，默认与输入文件同目录
    pub output_dir: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("无法确定配置目录")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppConfig {
    /// 所有字段都填上默认值，用于 `config init`
    pub fn with_defaults() -> Self {
        Self {
            tesseract: Some(TesseractConfig {
                lang: Some(medact_ocr::DEFAULT_LANG.to_string()),
                ..Default::default()
            }),
            ocr_enabled: Some(true),
            cascade_path: None,
            ffmpeg_path: Some("ffmpeg".to_string()),
            ffprobe_path: Some("ffprobe".to_string()),
            video_fps: Some(DEFAULT_FPS),
            frame_text: Some(FrameTextMode::default()),
            tracking_hold_frames: Some(0),
            default_entities: Some(vec![EntityLabel::Person]),
            default_level: Some(RedactionLevel::default()),
            replacement_mode: Some(ReplacementMode::default()),
            seed: None,
            output_dir: None,
        }
    }

    pub fn tesseract_or_default(&self) -> TesseractConfig {
        self.tesseract.clone().unwrap_or_default()
    }

    pub fn ocr_enabled_or_default(&self) -> bool {
        self.ocr_enabled.unwrap_or(true)
    }

    pub fn video_fps_or_default(&self) -> u32 {
        self.video_fps.filter(|&f| f > 0).unwrap_or(DEFAULT_FPS)
    }

    pub fn frame_text_or_default(&self) -> FrameTextMode {
        self.frame_text.unwrap_or_default()
    }

    pub fn tracking_hold_frames_or_default(&self) -> usize {
        self.tracking_hold_frames.unwrap_or(0)
    }

    pub fn default_entities_or_default(&self) -> Vec<EntityLabel> {
        match &self.default_entities {
            Some(labels) if !labels.is_empty() => labels.clone(),
            _ => vec![EntityLabel::Person],
        }
    }

    pub fn default_level_or_default(&self) -> RedactionLevel {
        self.default_level.unwrap_or_default()
    }

    pub fn replacement_mode_or_default(&self) -> ReplacementMode {
        self.replacement_mode.unwrap_or_default()
    }

    /// 级联文件：配置 > 环境变量 `MEDACT_CASCADE` > 配置目录下的默认文件名
    pub fn cascade_path_or_default(&self) -> Option<PathBuf> {
        self.cascade_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| std::env::var(CASCADE_ENV).ok().map(PathBuf::from))
            .or_else(|| config_dir().ok().map(|d| d.join(CASCADE_FILE)))
    }
}

pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base = directories::BaseDirs::new().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.config_dir().join("medact"))
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json"))
}

/// 配置文件不存在时返回默认配置
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        log::debug!("[Config] {} 不存在，使用默认配置", path.display());
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.video_fps_or_default(), 10);
        assert_eq!(config.frame_text_or_default(), FrameTextMode::Skip);
        assert_eq!(config.default_entities_or_default(), vec![EntityLabel::Person]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig::with_defaults();
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_camel_case_fields() {
        let config: AppConfig = serde_json::from_str(
            r#"{"videoFps": 25, "frameText": "redact", "defaultEntities": ["PERSON", "ORG"],
                "replacementMode": "span", "trackingHoldFrames": 3,
                "tesseract": {"binaryPath": "/opt/tesseract", "lang": "hin"}}"#,
        )
        .unwrap();
        assert_eq!(config.video_fps_or_default(), 25);
        assert_eq!(config.frame_text_or_default(), FrameTextMode::Redact);
        assert_eq!(
            config.default_entities_or_default(),
            vec![EntityLabel::Person, EntityLabel::Org]
        );
        assert_eq!(config.replacement_mode_or_default(), ReplacementMode::Span);
        assert_eq!(config.tracking_hold_frames_or_default(), 3);
        assert_eq!(config.tesseract_or_default().lang_or_default(), "hin");
    }

    #[test]
    fn test_zero_fps_falls_back() {
        let config = AppConfig {
            video_fps: Some(0),
            ..Default::default()
        };
        assert_eq!(config.video_fps_or_default(), DEFAULT_FPS);
    }

    #[test]
    fn test_cascade_path_from_config() {
        let config = AppConfig {
            cascade_path: Some("/data/face.xml".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.cascade_path_or_default(),
            Some(PathBuf::from("/data/face.xml"))
        );
    }
}
