//! 媒体处理流程
//!
//! 一次处理一个文件，按扩展名分派：
//! - pdf / docx / txt / md：提取文本，按需脱敏
//! - jpg / png：人脸模糊，可选 OCR
//! - mp4：逐帧人脸模糊后重新编码

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use medact_core::{
    Document, EntityLabel, FileKind, FixedDetector, Language, ModelRegistry, RedactError,
    RedactionLevel, RedactionRequest, Redactor,
};
use medact_docx::DocxDocument;
use medact_ocr::{join_words, OcrEngine, OcrTextResult, TesseractEngine};
use medact_pdf::PdfDocument;
use medact_text::TextDocument;
use medact_vision::{
    blur_faces, blur_regions, redact_video, BlurParams, BoxTracker, CascadeFaceDetector, FaceBox,
    FaceDetector, FfmpegSink, FfmpegSource, FfmpegTools, FrameSource, DEFAULT_FPS,
};

use crate::config::AppConfig;
use crate::report::ProcessReport;

/// 图片与视频帧中文字的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameTextMode {
    /// 不做逐帧 OCR
    #[default]
    Skip,
    /// OCR 后模糊属于实体的单词
    Redact,
}

impl std::fmt::Display for FrameTextMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameTextMode::Skip => f.write_str("skip"),
            FrameTextMode::Redact => f.write_str("redact"),
        }
    }
}

impl std::str::FromStr for FrameTextMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(FrameTextMode::Skip),
            "redact" => Ok(FrameTextMode::Redact),
            other => Err(format!("未知的帧文字模式: {}", other)),
        }
    }
}

/// 单次处理参数
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// 是否对提取出的文本做脱敏
    pub redact: bool,
    pub entities: BTreeSet<EntityLabel>,
    pub level: RedactionLevel,
    /// 为空时输出到输入文件所在目录
    pub output_dir: Option<PathBuf>,
    pub frame_text: FrameTextMode,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            redact: false,
            entities: BTreeSet::from([EntityLabel::Person]),
            level: RedactionLevel::default(),
            output_dir: None,
            frame_text: FrameTextMode::default(),
        }
    }
}

impl ProcessOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            redact: false,
            entities: config.default_entities_or_default().into_iter().collect(),
            level: config.default_level_or_default(),
            output_dir: config.output_dir.as_ref().map(PathBuf::from),
            frame_text: config.frame_text_or_default(),
        }
    }
}

/// 按配置构建脱敏器；指定 `language` 时跳过语言检测
pub fn build_redactor(config: &AppConfig, language: Option<Language>) -> Result<Redactor> {
    let registry = ModelRegistry::builtin(config.seed).context("加载内置语言模型失败")?;
    let redactor = Redactor::new(registry).with_mode(config.replacement_mode_or_default());
    Ok(match language {
        Some(language) => redactor.with_detector(FixedDetector(language)),
        None => redactor,
    })
}

pub struct MediaPipeline {
    redactor: Redactor,
    face_detector: Option<Box<dyn FaceDetector>>,
    ocr: Option<Box<dyn OcrEngine>>,
    blur: BlurParams,
    tracking_hold_frames: usize,
    video_fps: u32,
    ffmpeg: FfmpegTools,
}

impl MediaPipeline {
    pub fn new(redactor: Redactor) -> Self {
        Self {
            redactor,
            face_detector: None,
            ocr: None,
            blur: BlurParams::default(),
            tracking_hold_frames: 0,
            video_fps: DEFAULT_FPS,
            ffmpeg: FfmpegTools::default(),
        }
    }

    pub fn with_face_detector(mut self, detector: impl FaceDetector + 'static) -> Self {
        self.face_detector = Some(Box::new(detector));
        self
    }

    pub fn with_ocr(mut self, engine: impl OcrEngine + 'static) -> Self {
        self.ocr = Some(Box::new(engine));
        self
    }

    pub fn with_tracking(mut self, hold_frames: usize) -> Self {
        self.tracking_hold_frames = hold_frames;
        self
    }

    pub fn with_video_fps(mut self, fps: u32) -> Self {
        self.video_fps = fps.max(1);
        self
    }

    pub fn with_ffmpeg(mut self, tools: FfmpegTools) -> Self {
        self.ffmpeg = tools;
        self
    }

    /// 按配置装配外部组件，缺失的组件只记录日志，等到真正需要时再报错
    pub fn from_config(config: &AppConfig, redactor: Redactor) -> Self {
        let mut pipeline = Self::new(redactor)
            .with_tracking(config.tracking_hold_frames_or_default())
            .with_video_fps(config.video_fps_or_default())
            .with_ffmpeg(FfmpegTools {
                ffmpeg: config
                    .ffmpeg_path
                    .clone()
                    .unwrap_or_else(|| "ffmpeg".to_string()),
                ffprobe: config
                    .ffprobe_path
                    .clone()
                    .unwrap_or_else(|| "ffprobe".to_string()),
            });

        match config.cascade_path_or_default() {
            Some(path) if path.exists() => match CascadeFaceDetector::load(&path) {
                Ok(detector) => {
                    log::info!("[Pipeline] 已加载人脸级联: {}", path.display());
                    pipeline = pipeline.with_face_detector(detector);
                }
                Err(e) => log::warn!("[Pipeline] 加载人脸级联失败 {}: {}", path.display(), e),
            },
            Some(path) => log::info!("[Pipeline] 未找到人脸级联文件: {}", path.display()),
            None => log::info!("[Pipeline] 未配置人脸级联文件"),
        }

        if config.ocr_enabled_or_default() {
            match TesseractEngine::new(config.tesseract_or_default()) {
                Ok(engine) => pipeline = pipeline.with_ocr(engine),
                Err(e) => log::info!("[Pipeline] OCR 不可用，跳过图片文字识别: {}", e),
            }
        } else {
            log::info!("[Pipeline] OCR 已在配置中关闭");
        }

        pipeline
    }

    /// 处理单个文件
    pub fn process(&mut self, path: &Path, options: &ProcessOptions) -> Result<ProcessReport> {
        let kind = FileKind::from_path(path).ok_or_else(|| {
            anyhow!(
                "不支持的文件类型: {}",
                path.extension()
                    .and_then(std::ffi::OsStr::to_str)
                    .unwrap_or("")
            )
        })?;
        log::info!("[Pipeline] 开始处理 {} ({})", path.display(), kind);

        let ext = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("")
            .to_lowercase();

        match kind {
            FileKind::Pdf => self.process_document::<PdfDocument>(path, kind, options),
            FileKind::Docx => self.process_document::<DocxDocument>(path, kind, options),
            FileKind::Text => self.process_document::<TextDocument>(path, kind, options),
            FileKind::Image => self.process_image(path, &ext, options),
            FileKind::Video => self.process_video(path, options),
        }
    }

    fn process_document<D: Document>(
        &self,
        path: &Path,
        kind: FileKind,
        options: &ProcessOptions,
    ) -> Result<ProcessReport> {
        let doc = D::load(path).with_context(|| format!("读取文件失败: {}", path.display()))?;
        let text = doc.full_text()?;
        log::debug!(
            "[Pipeline] 提取文本 {} 字符，功能: {:?}",
            text.chars().count(),
            doc.get_supported_features()
        );

        let mut report = ProcessReport::new(path, kind);
        if options.redact {
            if text.trim().is_empty() {
                log::info!("[Pipeline] 未提取到文本，跳过脱敏");
            } else {
                let request = RedactionRequest::new(text.clone())
                    .with_labels(options.entities.iter().copied())
                    .with_level(options.level);
                let redacted = self.redactor.redact(request)?;
                report.language = Some(redacted.language);
                report.redacted_text = Some(redacted.text);
                report.replacements = redacted.replacements;
            }
        }
        report.extracted_text = Some(text);
        Ok(report)
    }

    fn process_image(
        &mut self,
        path: &Path,
        ext: &str,
        options: &ProcessOptions,
    ) -> Result<ProcessReport> {
        let detector = self
            .face_detector
            .as_deref()
            .ok_or_else(|| anyhow!("未加载人脸级联文件，无法处理图片"))?;
        let original =
            image::open(path).with_context(|| format!("读取图片失败: {}", path.display()))?;
        let mut report = ProcessReport::new(path, FileKind::Image);

        // OCR 基于模糊前的原图
        let words = match self.ocr.as_mut() {
            Some(ocr) => {
                report.ocr = Some(ocr.audit_info());
                match ocr.recognize_image(&original) {
                    Ok(words) => words,
                    Err(e) => {
                        log::warn!("[Pipeline] 图片 OCR 失败: {}", e);
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        let mut rgb: RgbImage = original.to_rgb8();
        let (width, height) = rgb.dimensions();
        let faces = blur_faces(&mut rgb, detector, &self.blur);
        report.faces = Some(faces.len());

        if !words.is_empty() {
            let text = join_words(&words);
            if options.redact {
                let request = RedactionRequest::new(text.clone())
                    .with_labels(options.entities.iter().copied())
                    .with_level(options.level);
                match self.redactor.redact(request) {
                    Ok(redacted) => {
                        report.language = Some(redacted.language);
                        report.redacted_text = Some(redacted.text);
                        report.replacements = redacted.replacements;
                    }
                    Err(e) => log::warn!("[Pipeline] 图片文字脱敏跳过: {}", e),
                }
            }
            if options.frame_text == FrameTextMode::Redact {
                let regions =
                    entity_word_regions(&self.redactor, &words, &options.entities, width, height);
                blur_regions(&mut rgb, &regions, &self.blur);
                report.text_regions = regions.len();
            }
            report.extracted_text = Some(text);
        } else if options.frame_text == FrameTextMode::Redact && self.ocr.is_none() {
            log::warn!("[Pipeline] 未配置 OCR，图片文字不做处理");
        }

        let output = output_path(path, options.output_dir.as_deref(), ext)?;
        rgb.save(&output)
            .with_context(|| format!("写入图片失败: {}", output.display()))?;
        log::info!(
            "[Pipeline] 图片完成：{} 张人脸，输出 {}",
            faces.len(),
            output.display()
        );
        report.output_path = Some(output.to_string_lossy().to_string());
        Ok(report)
    }

    fn process_video(&mut self, path: &Path, options: &ProcessOptions) -> Result<ProcessReport> {
        let detector = self
            .face_detector
            .as_deref()
            .ok_or_else(|| anyhow!("未加载人脸级联文件，无法处理视频"))?;
        let output = output_path(path, options.output_dir.as_deref(), "mp4")?;

        let mut source = FfmpegSource::open(&self.ffmpeg, path)?;
        let (width, height) = source.dimensions();
        let mut sink = FfmpegSink::create(&self.ffmpeg, &output, width, height, self.video_fps)?;
        let mut tracker = BoxTracker::new(self.tracking_hold_frames);

        let redactor = &self.redactor;
        let mut ocr = match options.frame_text {
            FrameTextMode::Redact => {
                if self.ocr.is_none() {
                    log::warn!("[Pipeline] 未配置 OCR，视频帧文字不做处理");
                }
                self.ocr.as_mut()
            }
            FrameTextMode::Skip => None,
        };
        let wanted = &options.entities;

        let stats = redact_video(
            &mut source,
            &mut sink,
            detector,
            &self.blur,
            &mut tracker,
            |index, frame| {
                let Some(engine) = ocr.as_mut() else {
                    return Vec::new();
                };
                match engine.recognize_image(&DynamicImage::ImageRgb8(frame.clone())) {
                    Ok(words) => entity_word_regions(
                        redactor,
                        &words,
                        wanted,
                        frame.width(),
                        frame.height(),
                    ),
                    Err(e) => {
                        log::warn!("[Pipeline] 第 {} 帧 OCR 失败: {}", index, e);
                        Vec::new()
                    }
                }
            },
        )?;

        let mut report = ProcessReport::new(path, FileKind::Video);
        report.ocr = self.ocr.as_ref().map(|o| o.audit_info());
        report.faces = Some(stats.faces);
        report.text_regions = stats.text_regions;
        report.video = Some(stats);
        report.output_path = Some(output.to_string_lossy().to_string());
        Ok(report)
    }
}

/// `<stem>_redacted.<ext>`，放在输出目录或输入文件所在目录
fn output_path(input: &Path, output_dir: Option<&Path>, ext: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(|| anyhow!("无效的文件名: {}", input.display()))?;
    let dir = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("创建输出目录失败: {}", dir.display()))?;
            dir.to_path_buf()
        }
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(format!("{}_redacted.{}", stem, ext)))
}

/// OCR 单词中属于目标实体的区域
///
/// 单词按空格拼接后识别实体，实体文本在拼接串中的每一处出现都会
/// 映射回与之重叠的单词框。语言不受支持时不返回任何区域。
fn entity_word_regions(
    redactor: &Redactor,
    words: &[OcrTextResult],
    wanted: &BTreeSet<EntityLabel>,
    width: u32,
    height: u32,
) -> Vec<FaceBox> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::with_capacity(words.len());
    let mut offset = 0;
    for word in words {
        spans.push((offset, offset + word.text.len()));
        offset += word.text.len() + 1;
    }
    let text = join_words(words);

    let entities = match redactor.recognize(&text) {
        Ok((_, entities)) => entities,
        Err(RedactError::UnsupportedLanguage { detected }) => {
            log::debug!("[Pipeline] 帧文字语言不受支持: {}", detected);
            return Vec::new();
        }
        Err(e) => {
            log::warn!("[Pipeline] 帧文字识别失败: {}", e);
            return Vec::new();
        }
    };

    let mut hit = vec![false; words.len()];
    for entity in entities.iter().filter(|e| wanted.contains(&e.label)) {
        if entity.text.trim().is_empty() {
            continue;
        }
        for (start, matched) in text.match_indices(entity.text.as_str()) {
            let end = start + matched.len();
            for (i, &(ws, we)) in spans.iter().enumerate() {
                if ws < end && start < we {
                    hit[i] = true;
                }
            }
        }
    }

    words
        .iter()
        .zip(hit)
        .filter(|(_, hit)| *hit)
        .filter_map(|(word, _)| {
            let (x, y, w, h) = word.bbox.to_pixels(width, height);
            (w > 0 && h > 0).then(|| FaceBox::new(x, y, w, h))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use medact_ocr::{BBox, OcrAuditInfo};
    use std::io::Write;

    struct FixedBoxes(Vec<FaceBox>);

    impl FaceDetector for FixedBoxes {
        fn detect(&self, _image: &image::GrayImage) -> Vec<FaceBox> {
            self.0.clone()
        }
    }

    struct FakeOcr(Vec<OcrTextResult>);

    impl OcrEngine for FakeOcr {
        fn recognize_image(&mut self, _img: &DynamicImage) -> medact_ocr::Result<Vec<OcrTextResult>> {
            Ok(self.0.clone())
        }

        fn audit_info(&self) -> OcrAuditInfo {
            OcrAuditInfo {
                engine: "fake".to_string(),
                engine_version: None,
                engine_params: None,
                tessdata_hash: None,
            }
        }
    }

    fn english_pipeline() -> MediaPipeline {
        let config = AppConfig {
            seed: Some(3),
            ..Default::default()
        };
        MediaPipeline::new(build_redactor(&config, Some(Language::En)).unwrap())
    }

    fn redact_options() -> ProcessOptions {
        ProcessOptions {
            redact: true,
            ..Default::default()
        }
    }

    fn checkerboard(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_text_file_redacted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.txt");
        std::fs::write(&path, "John Smith works at Acme Corp.").unwrap();

        let report = english_pipeline().process(&path, &redact_options()).unwrap();
        assert_eq!(report.kind, FileKind::Text);
        assert_eq!(report.language, Some(Language::En));
        assert_eq!(
            report.extracted_text.as_deref(),
            Some("John Smith works at Acme Corp.")
        );
        let redacted = report.redacted_text.unwrap();
        assert!(!redacted.contains("John Smith"));
        assert!(redacted.contains("Acme Corp."));
        assert!(redacted.starts_with("<<"));
    }

    #[test]
    fn test_extract_only_without_redact_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "John Smith").unwrap();

        let report = english_pipeline()
            .process(&path, &ProcessOptions::default())
            .unwrap();
        assert_eq!(report.extracted_text.as_deref(), Some("John Smith"));
        assert!(report.redacted_text.is_none());
    }

    #[test]
    fn test_blank_text_skips_redaction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "  \n").unwrap();

        let report = english_pipeline().process(&path, &redact_options()).unwrap();
        assert!(report.redacted_text.is_none());
        assert!(report.language.is_none());
    }

    #[test]
    fn test_docx_redacted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body><w:p><w:r><w:t>John Smith works at Acme Corp.</w:t></w:r></w:p></w:body>
</w:document>"#,
        )
        .unwrap();
        zip.finish().unwrap();

        let report = english_pipeline().process(&path, &redact_options()).unwrap();
        assert_eq!(report.kind, FileKind::Docx);
        let redacted = report.redacted_text.unwrap();
        assert!(!redacted.contains("John Smith"));
        assert!(redacted.contains("Acme Corp."));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.xlsx");
        std::fs::write(&path, "x").unwrap();

        let err = english_pipeline()
            .process(&path, &redact_options())
            .unwrap_err();
        assert!(err.to_string().contains("不支持的文件类型"));
    }

    #[test]
    fn test_french_text_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lettre.txt");
        std::fs::write(
            &path,
            "Bonjour, je m'appelle Jean Dupont et j'habite à Paris depuis dix ans. \
             Nous travaillons ensemble dans une petite entreprise de la ville.",
        )
        .unwrap();

        let config = AppConfig::default();
        let mut pipeline = MediaPipeline::new(build_redactor(&config, None).unwrap());
        let err = pipeline.process(&path, &redact_options()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RedactError>(),
            Some(RedactError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_image_faces_blurred_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let original = checkerboard(64, 64);
        original.save(&path).unwrap();

        let face = FaceBox::new(8, 8, 16, 16);
        let mut pipeline = english_pipeline().with_face_detector(FixedBoxes(vec![face]));
        let out_dir = dir.path().join("out");
        let options = ProcessOptions {
            output_dir: Some(out_dir.clone()),
            ..Default::default()
        };
        let report = pipeline.process(&path, &options).unwrap();

        assert_eq!(report.faces, Some(1));
        let output = out_dir.join("photo_redacted.png");
        assert_eq!(report.output_path.as_deref(), output.to_str());
        let blurred = image::open(&output).unwrap().to_rgb8();
        assert_eq!(blurred.dimensions(), (64, 64));

        let mut changed = false;
        for (x, y, pixel) in blurred.enumerate_pixels() {
            if face.contains(x, y) {
                changed |= pixel != original.get_pixel(x, y);
            } else {
                assert_eq!(pixel, original.get_pixel(x, y));
            }
        }
        assert!(changed);
    }

    #[test]
    fn test_image_requires_detector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        checkerboard(16, 16).save(&path).unwrap();

        let err = english_pipeline()
            .process(&path, &ProcessOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("人脸级联"));
    }

    #[test]
    fn test_image_entity_words_blurred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        checkerboard(200, 40).save(&path).unwrap();

        let words: Vec<OcrTextResult> = ["John", "Smith", "works", "at", "Acme", "Corp."]
            .iter()
            .enumerate()
            .map(|(i, text)| OcrTextResult {
                text: text.to_string(),
                confidence: 0.9,
                bbox: BBox {
                    x: i as f32 * 0.15,
                    y: 0.25,
                    w: 0.1,
                    h: 0.5,
                },
            })
            .collect();

        let mut pipeline = english_pipeline()
            .with_face_detector(FixedBoxes(Vec::new()))
            .with_ocr(FakeOcr(words));
        let options = ProcessOptions {
            redact: true,
            frame_text: FrameTextMode::Redact,
            ..Default::default()
        };
        let report = pipeline.process(&path, &options).unwrap();

        assert_eq!(report.faces, Some(0));
        assert_eq!(report.text_regions, 2);
        assert_eq!(
            report.extracted_text.as_deref(),
            Some("John Smith works at Acme Corp.")
        );
        assert!(!report.redacted_text.unwrap().contains("John Smith"));
        assert_eq!(report.ocr.unwrap().engine, "fake");
    }

    #[test]
    fn test_entity_word_regions_every_occurrence() {
        let redactor = build_redactor(&AppConfig::default(), Some(Language::En)).unwrap();
        let words: Vec<OcrTextResult> = ["John", "Smith", "met", "John", "Smith"]
            .iter()
            .enumerate()
            .map(|(i, text)| OcrTextResult {
                text: text.to_string(),
                confidence: 1.0,
                bbox: BBox {
                    x: i as f32 * 0.2,
                    y: 0.0,
                    w: 0.1,
                    h: 1.0,
                },
            })
            .collect();
        let wanted = BTreeSet::from([EntityLabel::Person]);
        let regions = entity_word_regions(&redactor, &words, &wanted, 100, 10);
        assert_eq!(regions.len(), 4);
        assert!(regions.iter().all(|r| r.height == 10));
    }

    #[test]
    fn test_output_path_naming() {
        let path = output_path(Path::new("/data/in/clip.MP4"), None, "mp4").unwrap();
        assert_eq!(path, PathBuf::from("/data/in/clip_redacted.mp4"));
    }

    #[test]
    fn test_frame_text_mode_parse() {
        assert_eq!("Redact".parse::<FrameTextMode>().unwrap(), FrameTextMode::Redact);
        assert!("blur".parse::<FrameTextMode>().is_err());
        assert_eq!(FrameTextMode::default().to_string(), "skip");
    }
}
