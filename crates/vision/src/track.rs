//! 帧间平滑：把检测到的框在后续若干帧中继续保留，弥补个别帧漏检

use crate::detect::FaceBox;

#[derive(Debug, Clone, Default)]
pub struct BoxTracker {
    hold_frames: usize,
    held: Vec<(FaceBox, usize)>,
}

impl BoxTracker {
    /// `hold_frames` 为 0 时每帧独立，输出即输入
    pub fn new(hold_frames: usize) -> Self {
        Self {
            hold_frames,
            held: Vec::new(),
        }
    }

    /// 输入当前帧的检测结果，返回本帧需要处理的全部区域
    pub fn update(&mut self, detected: Vec<FaceBox>) -> Vec<FaceBox> {
        let mut boxes = detected.clone();
        for (held, _) in &self.held {
            if !boxes.contains(held) {
                boxes.push(*held);
            }
        }

        self.held.retain_mut(|(_, remaining)| {
            *remaining -= 1;
            *remaining > 0
        });
        if self.hold_frames > 0 {
            self.held.retain(|(b, _)| !detected.contains(b));
            self.held
                .extend(detected.into_iter().map(|b| (b, self.hold_frames)));
        }

        boxes
    }
}
