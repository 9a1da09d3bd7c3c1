//! 视频逐帧处理
//!
//! 解码与编码都通过 ffmpeg CLI 完成，帧以 rgb24 原始数据经管道传输。
//! 输出不含音轨；处理中断时不保留半成品。

use crate::blur::{blur_regions, BlurParams};
use crate::detect::{FaceBox, FaceDetector};
use crate::error::{Result, VisionError};
use crate::track::BoxTracker;
use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub const DEFAULT_FPS: u32 = 10;

/// 帧来源
pub trait FrameSource {
    fn dimensions(&self) -> (u32, u32);
    /// 没有更多帧时返回 None
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// 帧输出
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()>;
    /// 刷新并关闭输出
    fn finish(&mut self) -> Result<()>;
}

/// ffmpeg / ffprobe 路径
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl FfmpegTools {
    /// 返回 ffmpeg 版本行
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .map_err(|e| VisionError::ToolMissing(format!("{} ({})", self.ffmpeg, e)))?;
        if !output.status.success() {
            return Err(VisionError::ToolMissing(self.ffmpeg.clone()));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    /// 读取第一条视频流解码后的宽高
    ///
    /// ffmpeg 解码时默认按旋转元数据转正画面，旋转 ±90° 时宽高需要互换。
    pub fn probe_dimensions(&self, input: &Path) -> Result<(u32, u32)> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height:stream_tags=rotate:stream_side_data=rotation",
                "-of",
                "json",
            ])
            .arg(input)
            .output()
            .map_err(|e| VisionError::ToolMissing(format!("{} ({})", self.ffprobe, e)))?;

        if !output.status.success() {
            return Err(VisionError::Video(format!(
                "ffprobe 失败: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        parse_dimensions(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

impl ProbeStream {
    /// 旋转角度：优先取 display matrix，旧版本 ffmpeg 只写 `rotate` 标签
    fn rotation(&self) -> i64 {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .map(|r| r.round() as i64)
            .or_else(|| self.tags.get("rotate").and_then(|r| r.trim().parse().ok()))
            .unwrap_or(0)
    }
}

fn parse_dimensions(json: &str) -> Result<(u32, u32)> {
    let probe: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| VisionError::Video(format!("无法解析 ffprobe 输出: {}", e)))?;
    let stream = probe
        .streams
        .first()
        .ok_or_else(|| VisionError::Video("没有视频流".to_string()))?;
    let (w, h) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(VisionError::Video("视频尺寸无效".to_string())),
    };

    if stream.rotation().rem_euclid(180) == 90 {
        Ok((h, w))
    } else {
        Ok((w, h))
    }
}

/// 通过 ffmpeg 解码的帧来源
pub struct FfmpegSource {
    child: Child,
    stdout: BufReader<ChildStdout>,
    width: u32,
    height: u32,
}

impl FfmpegSource {
    pub fn open(tools: &FfmpegTools, input: &Path) -> Result<Self> {
        let (width, height) = tools.probe_dimensions(input)?;
        let mut child = Command::new(&tools.ffmpeg)
            .args(["-v", "error", "-i"])
            .arg(input)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| VisionError::ToolMissing(format!("{} ({})", tools.ffmpeg, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VisionError::Video("无法获取 ffmpeg 输出".to_string()))?;

        log::info!(
            "[Video] 解码 {}，尺寸 {}x{}",
            input.display(),
            width,
            height
        );

        Ok(Self {
            child,
            stdout: BufReader::new(stdout),
            width,
            height,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let frame_len = (self.width * self.height * 3) as usize;
        let mut buf = vec![0u8; frame_len];
        let mut filled = 0;

        while filled < frame_len {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled == 0 {
            let status = self.child.wait()?;
            if !status.success() {
                return Err(VisionError::Video(format!("ffmpeg 解码失败: {}", status)));
            }
            return Ok(None);
        }
        if filled < frame_len {
            return Err(VisionError::Video("视频帧数据不完整".to_string()));
        }

        RgbImage::from_raw(self.width, self.height, buf)
            .map(Some)
            .ok_or_else(|| VisionError::Video("帧缓冲区大小不匹配".to_string()))
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// 通过 ffmpeg 编码的帧输出（mpeg4，无音轨）
pub struct FfmpegSink {
    child: Child,
    stdin: Option<ChildStdin>,
    output: PathBuf,
    width: u32,
    height: u32,
}

impl FfmpegSink {
    pub fn create(
        tools: &FfmpegTools,
        output: &Path,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Result<Self> {
        let size = format!("{}x{}", width, height);
        let fps = fps.max(1).to_string();
        let mut child = Command::new(&tools.ffmpeg)
            .args(["-y", "-v", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", size.as_str(), "-r", fps.as_str(), "-i", "-"])
            .args(["-an", "-c:v", "mpeg4", "-q:v", "5"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| VisionError::ToolMissing(format!("{} ({})", tools.ffmpeg, e)))?;

        let stdin = child.stdin.take();

        Ok(Self {
            child,
            stdin,
            output: output.to_path_buf(),
            width,
            height,
        })
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(VisionError::Video(format!(
                "帧尺寸 {:?} 与输出 {}x{} 不一致",
                frame.dimensions(),
                self.width,
                self.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VisionError::Video("编码器已关闭".to_string()))?;
        stdin.write_all(frame.as_raw())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        // 关闭 stdin 让 ffmpeg 结束编码
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if !status.success() {
            return Err(VisionError::Video(format!(
                "ffmpeg 编码失败: {}",
                status
            )));
        }
        log::info!("[Video] 已写入 {}", self.output.display());
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            drop(self.stdin.take());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// 视频处理统计
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    pub frames: usize,
    pub frames_with_faces: usize,
    pub faces: usize,
    pub text_regions: usize,
    /// 每帧检测到的人脸数（不含跟踪补充的框）
    pub faces_per_frame: Vec<usize>,
}

/// 逐帧检测并模糊
///
/// `extra_regions` 在模糊前以原始帧调用，返回额外需要模糊的区域（例如文字）。
pub fn redact_video<F>(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    detector: &dyn FaceDetector,
    params: &BlurParams,
    tracker: &mut BoxTracker,
    mut extra_regions: F,
) -> Result<VideoStats>
where
    F: FnMut(usize, &RgbImage) -> Vec<FaceBox>,
{
    let mut stats = VideoStats::default();

    while let Some(mut frame) = source.next_frame()? {
        let index = stats.frames;
        let gray = imageops::grayscale(&frame);
        let faces = detector.detect(&gray);
        let text = extra_regions(index, &frame);

        let mut regions = tracker.update(faces.clone());
        regions.extend(text.iter().copied());
        if !regions.is_empty() {
            blur_regions(&mut frame, &regions, params);
        }
        sink.write_frame(&frame)?;

        stats.frames += 1;
        stats.faces += faces.len();
        stats.text_regions += text.len();
        if !faces.is_empty() {
            stats.frames_with_faces += 1;
        }
        stats.faces_per_frame.push(faces.len());

        if stats.frames % 100 == 0 {
            log::debug!("[Video] 已处理 {} 帧", stats.frames);
        }
    }

    sink.finish()?;
    log::info!(
        "[Video] 完成：{} 帧，{} 帧含人脸",
        stats.frames,
        stats.frames_with_faces
    );
    Ok(stats)
}
