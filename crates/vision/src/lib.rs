//! 人脸检测与模糊、视频逐帧处理

pub mod blur;
pub mod cascade;
pub mod detect;
pub mod error;
pub mod track;
pub mod video;

pub use blur::{blur_faces, blur_regions, gaussian_kernel, BlurParams};
pub use cascade::HaarCascade;
pub use detect::{group_rectangles, CascadeFaceDetector, DetectParams, FaceBox, FaceDetector};
pub use error::{Result, VisionError};
pub use track::BoxTracker;
pub use video::{
    redact_video, FfmpegSink, FfmpegSource, FfmpegTools, FrameSink, FrameSource, VideoStats,
    DEFAULT_FPS,
};
