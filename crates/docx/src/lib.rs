//! DOCX 文档处理器
//!
//! 读取 `word/document.xml`，按段落（`w:p`）收集 `w:t` 文本，
//! 段落之间用换行连接。整篇文档作为单页。

use anyhow::{anyhow, Context, Result};
use medact_core::document::{Document, Page};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxDocument {
    path: PathBuf,
    paragraphs: Vec<String>,
}

impl DocxDocument {
    /// 从任意可读可定位的来源加载（文件或内存）
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader).context("不是有效的 DOCX 压缩包")?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| anyhow!("缺少 {}: {}", DOCUMENT_PART, e))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .with_context(|| format!("无法读取 {}", DOCUMENT_PART))?;

        Ok(Self {
            path: PathBuf::new(),
            paragraphs: parse_paragraphs(&xml)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}

impl Document for DocxDocument {
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized,
    {
        if !path.exists() {
            return Err(anyhow!("文件不存在: {}", path.display()));
        }

        let file = File::open(path).map_err(|e| anyhow!("无法读取文件: {}", e))?;
        let mut doc = Self::from_reader(file)?;
        doc.path = path.to_path_buf();
        log::info!(
            "[DOCX] 已加载 {}，共 {} 段",
            path.display(),
            doc.paragraphs.len()
        );
        Ok(doc)
    }

    fn get_pages(&self) -> Result<Vec<Page>> {
        Ok(vec![Page {
            page_number: 1,
            content: self.paragraphs.join("\n"),
        }])
    }

    fn get_supported_features(&self) -> Vec<String> {
        vec!["text_extract".to_string(), "text_redact".to_string()]
    }
}

/// 解析 WordprocessingML 正文
fn parse_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event().context("document.xml 解析失败")? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if in_paragraph => current.push('\t'),
                b"br" | b"cr" if in_paragraph => current.push('\n'),
                // 空段落
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => {
                current.push_str(&t.unescape().context("文本实体解码失败")?);
            }
            Event::CData(t) if in_text => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            paragraphs
        )
    }

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_joined_with_newline() {
        let xml = body(
            r#"<w:p><w:r><w:t>John Smith</w:t></w:r><w:r><w:t xml:space="preserve"> works at </w:t></w:r><w:r><w:t>Acme Corp.</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p>"#,
        );
        let doc = DocxDocument::from_reader(Cursor::new(build_docx(&xml))).unwrap();
        assert_eq!(
            doc.full_text().unwrap(),
            "John Smith works at Acme Corp.\nSecond"
        );
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let xml = body(
            r#"<w:p><w:r><w:t>A&amp;B</w:t><w:tab/><w:t>C</w:t><w:br/><w:t>D</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>E</w:t></w:r></w:p>"#,
        );
        let doc = DocxDocument::from_reader(Cursor::new(build_docx(&xml))).unwrap();
        assert_eq!(doc.paragraphs(), &["A&B\tC\nD", "", "E"]);
    }

    #[test]
    fn test_text_outside_runs_ignored() {
        let xml = body(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#);
        let doc = DocxDocument::from_reader(Cursor::new(build_docx(&xml))).unwrap();
        assert_eq!(doc.full_text().unwrap(), "Title");
    }

    #[test]
    fn test_load_from_disk() {
        let xml = body(r#"<w:p><w:r><w:t>राहुल शर्मा</w:t></w:r></w:p>"#);
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        std::fs::write(file.path(), build_docx(&xml)).unwrap();

        let doc = DocxDocument::load(file.path()).unwrap();
        assert_eq!(doc.get_pages().unwrap()[0].content, "राहुल शर्मा");
        assert_eq!(doc.path(), file.path());
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(DocxDocument::from_reader(Cursor::new(bytes)).is_err());
        assert!(DocxDocument::from_reader(Cursor::new(b"plain".to_vec())).is_err());
    }
}
