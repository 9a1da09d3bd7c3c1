//! 处理结果报告

use chrono::Local;
use medact_core::{FileKind, Language, Replacement};
use medact_ocr::OcrAuditInfo;
use medact_vision::VideoStats;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub file_name: String,
    pub kind: FileKind,
    pub language: Option<Language>,
    pub extracted_text: Option<String>,
    pub redacted_text: Option<String>,
    pub replacements: Vec<Replacement>,
    /// 图片中检测到的人脸数
    pub faces: Option<usize>,
    /// 因包含实体而被模糊的文字区域数
    pub text_regions: usize,
    pub video: Option<VideoStats>,
    pub output_path: Option<String>,
    pub ocr: Option<OcrAuditInfo>,
    pub processed_at: String,
}

impl ProcessReport {
    pub fn new(path: &Path, kind: FileKind) -> Self {
        Self {
            file_name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            kind,
            language: None,
            extracted_text: None,
            redacted_text: None,
            replacements: Vec::new(),
            faces: None,
            text_regions: 0,
            video: None,
            output_path: None,
            ocr: None,
            processed_at: Local::now().to_rfc3339(),
        }
    }

    /// 终端输出
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "文件: {} ({})", self.file_name, self.kind);
        if let Some(language) = self.language {
            let _ = writeln!(out, "语言: {}", language);
        }
        if let Some(faces) = self.faces {
            let _ = writeln!(out, "人脸: {}", faces);
        }
        if let Some(video) = &self.video {
            let _ = writeln!(
                out,
                "视频: {} 帧，{} 帧含人脸，共 {} 个人脸框",
                video.frames, video.frames_with_faces, video.faces
            );
        }
        if self.text_regions > 0 {
            let _ = writeln!(out, "文字区域: {}", self.text_regions);
        }
        if !self.replacements.is_empty() {
            let _ = writeln!(out, "替换:");
            for r in &self.replacements {
                let _ = writeln!(out, "  {} -> {} (x{})", r.label, r.synthetic, r.occurrences);
            }
        }
        if let Some(path) = &self.output_path {
            let _ = writeln!(out, "输出: {}", path);
        }
        if let Some(text) = &self.extracted_text {
            let _ = writeln!(out, "\n----- 提取文本 -----\n{}", text);
        }
        if let Some(text) = &self.redacted_text {
            let _ = writeln!(out, "\n----- 脱敏文本 -----\n{}", text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medact_core::EntityLabel;

    #[test]
    fn test_render_and_serialize() {
        let mut report = ProcessReport::new(Path::new("/tmp/a/letter.txt"), FileKind::Text);
        report.language = Some(Language::En);
        report.redacted_text = Some("<<Lorem ipsum.>> works".to_string());
        report.replacements.push(Replacement {
            label: EntityLabel::Person,
            original: "John Smith".to_string(),
            synthetic: "Lorem ipsum.".to_string(),
            occurrences: 1,
        });

        assert_eq!(report.file_name, "letter.txt");
        let text = report.render_text();
        assert!(text.contains("PERSON -> Lorem ipsum. (x1)"));
        assert!(!text.contains("John Smith"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["language"], "en");
        assert!(json["processedAt"].is_string());
        assert!(!json.to_string().contains("John Smith"));
    }
}
