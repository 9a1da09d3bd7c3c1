//! Tesseract OCR 引擎实现（CLI 包装）

use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use crate::engine::OcrEngine;
use crate::error::{OcrError, Result};
use crate::types::{BBox, OcrAuditInfo, OcrTextResult, TesseractConfig, TesseractStatus};

/// Tesseract OCR 引擎
pub struct TesseractEngine {
    config: TesseractConfig,
    binary: String,
    tessdata: Option<String>,
    version: Option<String>,
}

impl TesseractEngine {
    /// 创建引擎，先确认 binary 可执行
    pub fn new(config: TesseractConfig) -> Result<Self> {
        let binary = config.binary_or_default();
        let version = get_tesseract_version(&binary)?;
        let tessdata = config.tessdata_or_env();

        log::info!("[Tesseract] 初始化成功，版本: {}", version);

        Ok(Self {
            config,
            binary,
            tessdata,
            version: Some(version),
        })
    }

    /// 执行 tesseract 并返回 TSV 原文
    fn run_tsv(&self, image_path: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.binary);

        cmd.arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(self.config.lang_or_default())
            .arg("--psm")
            .arg(self.config.psm_or_default().to_string())
            .arg("--oem")
            .arg(self.config.oem_or_default().to_string())
            .arg("tsv");

        if let Some(tessdata_path) = &self.tessdata {
            cmd.env("TESSDATA_PREFIX", tessdata_path);
        }

        log::debug!(
            "[Tesseract] 执行: {} {} -l {} --psm {} --oem {} tsv",
            self.binary,
            image_path.display(),
            self.config.lang_or_default(),
            self.config.psm_or_default(),
            self.config.oem_or_default()
        );

        let output = cmd
            .output()
            .map_err(|e| OcrError::Engine(format!("无法启动 {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize_image(&mut self, img: &DynamicImage) -> Result<Vec<OcrTextResult>> {
        let start = Instant::now();

        // 临时文件在离开作用域时删除
        let temp = tempfile::Builder::new()
            .prefix("medact_ocr_")
            .suffix(".png")
            .tempfile()?;
        img.save_with_format(temp.path(), image::ImageFormat::Png)?;

        let tsv = self.run_tsv(temp.path())?;
        let results = parse_tesseract_tsv(&tsv, img.width() as f32, img.height() as f32);

        log::info!(
            "[Tesseract] 识别完成，耗时: {} ms，结果数: {}",
            start.elapsed().as_millis(),
            results.len()
        );

        Ok(results)
    }

    fn recognize_file(&mut self, image_path: &Path) -> Result<Vec<OcrTextResult>> {
        let start = Instant::now();

        // 获取图片尺寸用于归一化
        let (img_width, img_height) = image::image_dimensions(image_path)?;
        let tsv = self.run_tsv(image_path)?;
        let results = parse_tesseract_tsv(&tsv, img_width as f32, img_height as f32);

        log::info!(
            "[Tesseract] 识别完成，耗时: {} ms，结果数: {}",
            start.elapsed().as_millis(),
            results.len()
        );

        Ok(results)
    }

    fn audit_info(&self) -> OcrAuditInfo {
        let params = serde_json::json!({
            "lang": self.config.lang_or_default(),
            "psm": self.config.psm_or_default(),
            "oem": self.config.oem_or_default(),
        });

        OcrAuditInfo {
            engine: "tesseract".to_string(),
            engine_version: self.version.clone(),
            engine_params: Some(params.to_string()),
            tessdata_hash: self
                .tessdata
                .as_deref()
                .and_then(|p| compute_tessdata_hash(Path::new(p)).ok()),
        }
    }
}

/// 解析 Tesseract TSV 输出
///
/// TSV 格式：
/// level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
///
/// 只返回单词级（level=5）结果，每个词有独立的 bbox
pub fn parse_tesseract_tsv(tsv: &str, img_width: f32, img_height: f32) -> Vec<OcrTextResult> {
    if img_width <= 0.0 || img_height <= 0.0 {
        return Vec::new();
    }

    let mut results = Vec::new();

    // 跳过表头
    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }

        let level: i32 = cols[0].parse().unwrap_or(-1);
        let left: f32 = cols[6].parse().unwrap_or(0.0);
        let top: f32 = cols[7].parse().unwrap_or(0.0);
        let width: f32 = cols[8].parse().unwrap_or(0.0);
        let height: f32 = cols[9].parse().unwrap_or(0.0);
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();

        if level != 5 || text.is_empty() || conf < 0.0 {
            continue;
        }

        results.push(OcrTextResult {
            text: text.to_string(),
            confidence: conf / 100.0,
            bbox: BBox {
                x: left / img_width,
                y: top / img_height,
                w: width / img_width,
                h: height / img_height,
            },
        });
    }

    results
}

/// 获取 Tesseract 版本
pub fn get_tesseract_version(binary_path: &str) -> Result<String> {
    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .map_err(|e| OcrError::NotInstalled(format!("{}: {}", binary_path, e)))?;

    if !output.status.success() {
        return Err(OcrError::NotInstalled(format!(
            "{} --version 执行失败",
            binary_path
        )));
    }

    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(parse_version(&combined))
}

/// 格式通常是 "tesseract 5.3.0" 或 "tesseract v5.3.0"
fn parse_version(output: &str) -> String {
    output
        .lines()
        .filter(|line| line.contains("tesseract"))
        .find_map(|line| {
            line.split_whitespace()
                .nth(1)
                .map(|v| v.trim_start_matches('v').to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// 获取 Tesseract 可用语言列表
pub fn get_tesseract_langs(binary_path: &str, tessdata_path: Option<&str>) -> Result<Vec<String>> {
    let mut cmd = Command::new(binary_path);
    cmd.arg("--list-langs");

    if let Some(path) = tessdata_path {
        cmd.env("TESSDATA_PREFIX", path);
    }

    let output = cmd
        .output()
        .map_err(|e| OcrError::NotInstalled(format!("{}: {}", binary_path, e)))?;

    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(parse_langs(&combined))
}

fn parse_langs(output: &str) -> Vec<String> {
    let mut langs = Vec::new();
    let mut found_list = false;

    for line in output.lines() {
        let line = line.trim();
        if line.contains("List of available languages") || line.contains("traineddata") {
            found_list = true;
            continue;
        }
        if found_list && !line.is_empty() && !line.contains(':') {
            langs.push(line.to_string());
        }
    }

    langs
}

/// 检测 Tesseract 安装状态，并核对所需语言包
pub fn detect_tesseract_status(config: &TesseractConfig) -> TesseractStatus {
    let binary_path = config.binary_or_default();
    let tessdata = config.tessdata_or_env();

    match get_tesseract_version(&binary_path) {
        Ok(version) => {
            let langs = get_tesseract_langs(&binary_path, tessdata.as_deref()).unwrap_or_default();
            let missing_langs = config
                .lang_or_default()
                .split('+')
                .filter(|l| !langs.iter().any(|a| a == l))
                .map(str::to_string)
                .collect();

            TesseractStatus {
                installed: true,
                version: Some(version),
                binary_path: which_tesseract(&binary_path).or(Some(binary_path)),
                tessdata_path: tessdata,
                available_langs: langs,
                missing_langs,
                error: None,
            }
        }
        Err(e) => TesseractStatus {
            installed: false,
            version: None,
            binary_path: None,
            tessdata_path: None,
            available_langs: Vec::new(),
            missing_langs: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// 查找可执行文件的完整路径
fn which_tesseract(binary: &str) -> Option<String> {
    if Path::new(binary).is_absolute() {
        return Some(binary.to_string());
    }

    #[cfg(target_os = "windows")]
    let lookup = "where";
    #[cfg(not(target_os = "windows"))]
    let lookup = "which";

    Command::new(lookup)
        .arg(binary)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .next()
                .map(|l| l.trim().to_string())
        })
        .filter(|s| !s.is_empty())
}

/// tessdata 指纹：按文件名排序后对 .traineddata 的文件名与大小做 SHA-256
pub fn compute_tessdata_hash(tessdata_path: &Path) -> Result<String> {
    let mut entries: Vec<(String, u64)> = std::fs::read_dir(tessdata_path)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "traineddata")
                .unwrap_or(false)
        })
        .map(|e| {
            let size = e.metadata().map(|m| m.len()).unwrap_or(0);
            (e.file_name().to_string_lossy().into_owned(), size)
        })
        .collect();
    entries.sort();

    let mut hasher = Sha256::new();
    for (name, size) in &entries {
        hasher.update(name.as_bytes());
        hasher.update(size.to_le_bytes());
    }

    Ok(hex::encode(hasher.finalize()))
}
