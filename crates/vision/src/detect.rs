//! 多尺度 Haar 人脸检测
//!
//! 与 OpenCV `detectMultiScale` 行为对齐：逐级缩小图像、积分图求和、
//! 按窗口方差归一化特征值，最后用 `groupRectangles` 的规则合并候选框。

use crate::cascade::{HaarCascade, HaarFeature};
use crate::error::Result;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use std::path::Path;

type Integral = ImageBuffer<Luma<u64>, Vec<u64>>;

/// 人脸区域（像素坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.width && py < self.y + self.height
    }

    /// 裁剪到图像范围内；完全在图像外时返回 None
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<FaceBox> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);
        (w > 0 && h > 0).then(|| FaceBox::new(self.x, self.y, w, h))
    }

    fn from_rect(rect: &Rect, width: u32, height: u32) -> Option<FaceBox> {
        let x0 = rect.left().max(0);
        let y0 = rect.top().max(0);
        let x1 = (rect.left() + rect.width() as i32).min(width as i32);
        let y1 = (rect.top() + rect.height() as i32).min(height as i32);
        (x1 > x0 && y1 > y0)
            .then(|| FaceBox::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// 人脸检测器
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &GrayImage) -> Vec<FaceBox>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectParams {
    pub scale_factor: f64,
    pub min_neighbors: usize,
    /// 最小检测窗口 (宽, 高)
    pub min_size: (u32, u32),
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 4,
            min_size: (0, 0),
        }
    }
}

/// 候选框合并时的相似度阈值
const GROUP_EPS: f64 = 0.2;

pub struct CascadeFaceDetector {
    cascade: HaarCascade,
    params: DetectParams,
}

enum Verdict {
    Face,
    Rejected(usize),
}

impl CascadeFaceDetector {
    pub fn new(cascade: HaarCascade) -> Self {
        Self {
            cascade,
            params: DetectParams::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(HaarCascade::load(path)?))
    }

    pub fn with_params(mut self, params: DetectParams) -> Self {
        self.params = params;
        self
    }

    /// 未合并的候选框（原图坐标）
    pub fn detect_raw(&self, image: &GrayImage) -> Vec<Rect> {
        let (img_w, img_h) = image.dimensions();
        let (win_w, win_h) = (self.cascade.window_width, self.cascade.window_height);
        let scale_factor = if self.params.scale_factor > 1.0 {
            self.params.scale_factor
        } else {
            DetectParams::default().scale_factor
        };

        let mut candidates = Vec::new();
        let mut factor = 1.0f64;
        loop {
            let window_w = (win_w as f64 * factor).round() as u32;
            let window_h = (win_h as f64 * factor).round() as u32;
            if window_w > img_w || window_h > img_h {
                break;
            }

            let scaled_w = (img_w as f64 / factor).round() as u32;
            let scaled_h = (img_h as f64 / factor).round() as u32;
            if scaled_w < win_w || scaled_h < win_h {
                break;
            }

            if window_w >= self.params.min_size.0 && window_h >= self.params.min_size.1 {
                self.scan_scale(image, factor, scaled_w, scaled_h, &mut candidates);
            }
            factor *= scale_factor;
        }

        candidates
    }

    fn scan_scale(
        &self,
        image: &GrayImage,
        factor: f64,
        scaled_w: u32,
        scaled_h: u32,
        candidates: &mut Vec<Rect>,
    ) {
        let resized;
        let scaled = if scaled_w == image.width() && scaled_h == image.height() {
            image
        } else {
            resized = imageops::resize(image, scaled_w, scaled_h, FilterType::Triangle);
            &resized
        };

        let sum: Integral = integral_image::<_, u64>(scaled);
        let sqsum: Integral = integral_squared_image::<_, u64>(scaled);

        let (win_w, win_h) = (self.cascade.window_width, self.cascade.window_height);
        let step = if factor > 2.0 { 1 } else { 2 };
        let out_w = (win_w as f64 * factor).round() as u32;
        let out_h = (win_h as f64 * factor).round() as u32;

        let mut y = 0;
        while y + win_h <= scaled_h {
            let mut x = 0;
            while x + win_w <= scaled_w {
                match self.run_at(&sum, &sqsum, x, y) {
                    Verdict::Face => candidates.push(
                        Rect::at(
                            (x as f64 * factor).round() as i32,
                            (y as f64 * factor).round() as i32,
                        )
                        .of_size(out_w, out_h),
                    ),
                    // 第一级就被拒绝时，下一个位置大概率也会被拒绝
                    Verdict::Rejected(0) => x += step,
                    Verdict::Rejected(_) => {}
                }
                x += step;
            }
            y += step;
        }
    }

    /// 在缩放后图像的 (x, y) 处评估整条级联；结构在 `from_xml` 中已校验
    fn run_at(&self, sum: &Integral, sqsum: &Integral, x: u32, y: u32) -> Verdict {
        let cascade = &self.cascade;
        let (w, h) = (cascade.window_width, cascade.window_height);

        // 归一化区域为窗口内缩 1 像素
        let area = ((w - 2) * (h - 2)) as f64;
        let mean_sum = area_sum(sum, x + 1, y + 1, w - 2, h - 2);
        let sq_sum = area_sum(sqsum, x + 1, y + 1, w - 2, h - 2);
        let nf = area * sq_sum - mean_sum * mean_sum;
        let nf = if nf > 0.0 { nf.sqrt() } else { 1.0 };

        for (index, stage) in cascade.stages.iter().enumerate() {
            let mut total = 0.0f64;
            for weak in &stage.classifiers {
                let mut idx = 0i32;
                loop {
                    let node = &weak.nodes[idx as usize];
                    let value = feature_value(&cascade.features[node.feature], sum, x, y) / nf;
                    idx = if value < node.threshold as f64 {
                        node.left
                    } else {
                        node.right
                    };
                    if idx <= 0 {
                        break;
                    }
                }
                total += weak.leaves[(-idx) as usize] as f64;
            }
            if total < stage.threshold as f64 {
                return Verdict::Rejected(index);
            }
        }

        Verdict::Face
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&self, image: &GrayImage) -> Vec<FaceBox> {
        let raw = self.detect_raw(image);
        let grouped = group_rectangles(&raw, self.params.min_neighbors, GROUP_EPS);
        log::debug!(
            "[Face] 候选框 {} 个，合并后 {} 个",
            raw.len(),
            grouped.len()
        );

        let (w, h) = image.dimensions();
        grouped
            .iter()
            .filter_map(|r| FaceBox::from_rect(r, w, h))
            .collect()
    }
}

fn area_sum(integral: &Integral, x: u32, y: u32, w: u32, h: u32) -> f64 {
    let a = integral.get_pixel(x, y)[0];
    let b = integral.get_pixel(x + w, y)[0];
    let c = integral.get_pixel(x, y + h)[0];
    let d = integral.get_pixel(x + w, y + h)[0];
    ((d + a) - (b + c)) as f64
}

fn feature_value(feature: &HaarFeature, sum: &Integral, x: u32, y: u32) -> f64 {
    feature
        .rects
        .iter()
        .map(|r| r.weight as f64 * area_sum(sum, x + r.x, y + r.y, r.width, r.height))
        .sum()
}

/// 合并候选框：相似框归为一类并取平均，丢弃成员数不超过 `threshold` 的类，
/// 再去掉被更可信的大框包含的小框
pub fn group_rectangles(rects: &[Rect], threshold: usize, eps: f64) -> Vec<Rect> {
    if threshold == 0 || rects.is_empty() {
        return rects.to_vec();
    }

    let labels = partition(rects, eps);
    let classes = labels.iter().max().map_or(0, |m| m + 1);

    let mut sums = vec![[0i64; 4]; classes];
    let mut counts = vec![0usize; classes];
    for (rect, &label) in rects.iter().zip(&labels) {
        let s = &mut sums[label];
        s[0] += rect.left() as i64;
        s[1] += rect.top() as i64;
        s[2] += rect.width() as i64;
        s[3] += rect.height() as i64;
        counts[label] += 1;
    }

    let averaged: Vec<Rect> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &n)| {
            let avg = |v: i64| (v as f64 / n as f64).round();
            Rect::at(avg(s[0]) as i32, avg(s[1]) as i32)
                .of_size((avg(s[2]) as u32).max(1), (avg(s[3]) as u32).max(1))
        })
        .collect();

    let mut result = Vec::new();
    for i in 0..classes {
        let n1 = counts[i];
        if n1 <= threshold {
            continue;
        }
        let r1 = &averaged[i];
        let nested = (0..classes).any(|j| {
            let n2 = counts[j];
            if j == i || n2 <= threshold {
                return false;
            }
            let r2 = &averaged[j];
            let dx = (r2.width() as f64 * eps).round() as i32;
            let dy = (r2.height() as f64 * eps).round() as i32;
            r1.left() >= r2.left() - dx
                && r1.top() >= r2.top() - dy
                && r1.left() + r1.width() as i32 <= r2.left() + r2.width() as i32 + dx
                && r1.top() + r1.height() as i32 <= r2.top() + r2.height() as i32 + dy
                && (n2 > n1.max(3) || n1 < 3)
        });
        if !nested {
            result.push(*r1);
        }
    }

    result
}

fn similar(a: &Rect, b: &Rect, eps: f64) -> bool {
    let delta = eps
        * (a.width().min(b.width()) as f64 + a.height().min(b.height()) as f64)
        * 0.5;
    let a_right = a.left() + a.width() as i32;
    let b_right = b.left() + b.width() as i32;
    let a_bottom = a.top() + a.height() as i32;
    let b_bottom = b.top() + b.height() as i32;

    ((a.left() - b.left()).abs() as f64) <= delta
        && ((a.top() - b.top()).abs() as f64) <= delta
        && ((a_right - b_right).abs() as f64) <= delta
        && ((a_bottom - b_bottom).abs() as f64) <= delta
}

/// 按相似关系的传递闭包划分等价类，类号按首次出现顺序分配
fn partition(rects: &[Rect], eps: f64) -> Vec<usize> {
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let n = rects.len();
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if similar(&rects[i], &rects[j], eps) {
                let a = find(&mut parent, i);
                let b = find(&mut parent, j);
                if a != b {
                    parent[b] = a;
                }
            }
        }
    }

    let mut root_label = vec![usize::MAX; n];
    let mut next = 0;
    (0..n)
        .map(|i| {
            let root = find(&mut parent, i);
            if root_label[root] == usize::MAX {
                root_label[root] = next;
                next += 1;
            }
            root_label[root]
        })
        .collect()
}
