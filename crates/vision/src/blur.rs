//! 人脸区域高斯模糊

use crate::detect::{FaceBox, FaceDetector};
use image::{imageops, RgbImage};
use imageproc::filter::separable_filter_equal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurParams {
    /// 核大小，必须为奇数
    pub kernel_size: u32,
    pub sigma: f32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            kernel_size: 99,
            sigma: 30.0,
        }
    }
}

/// 归一化的一维高斯核
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let size = if size % 2 == 0 { size + 1 } else { size.max(1) };
    let center = (size / 2) as f32;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        // 与 OpenCV 在 sigma<=0 时的推导一致
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= total);
    kernel
}

/// 对每个区域原地模糊，区域外的像素保持不变；重叠区域会被模糊多次
pub fn blur_regions(image: &mut RgbImage, boxes: &[FaceBox], params: &BlurParams) -> usize {
    let kernel = gaussian_kernel(params.kernel_size, params.sigma);
    let (width, height) = image.dimensions();
    let mut blurred = 0;

    for face in boxes.iter().filter_map(|b| b.clamp_to(width, height)) {
        let region = imageops::crop_imm(&*image, face.x, face.y, face.width, face.height).to_image();
        let smoothed = separable_filter_equal(&region, &kernel);
        imageops::replace(image, &smoothed, face.x as i64, face.y as i64);
        blurred += 1;
    }

    blurred
}

/// 检测并模糊，返回检测到的人脸
pub fn blur_faces(
    image: &mut RgbImage,
    detector: &dyn FaceDetector,
    params: &BlurParams,
) -> Vec<FaceBox> {
    let gray = imageops::grayscale(&*image);
    let faces = detector.detect(&gray);
    if !faces.is_empty() {
        blur_regions(image, &faces, params);
    }
    log::debug!("[Face] 检测到 {} 张人脸", faces.len());
    faces
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb};

    struct FixedDetector(Vec<FaceBox>);

    impl FaceDetector for FixedDetector {
        fn detect(&self, _image: &GrayImage) -> Vec<FaceBox> {
            self.0.clone()
        }
    }

    fn checkerboard(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel(99, 30.0);
        assert_eq!(kernel.len(), 99);
        let total: f32 = kernel.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!((kernel[0] - kernel[98]).abs() < 1e-7);
        assert!(kernel[49] > kernel[48]);
        assert!(kernel[49] > kernel[0]);
    }

    #[test]
    fn test_even_kernel_size_rounded_up() {
        assert_eq!(gaussian_kernel(4, 1.0).len(), 5);
    }

    #[test]
    fn test_two_faces_blurred_rest_untouched() {
        let original = checkerboard(120, 80);
        let faces = vec![FaceBox::new(10, 10, 30, 30), FaceBox::new(70, 30, 40, 40)];
        let mut image = original.clone();

        let found = blur_faces(&mut image, &FixedDetector(faces.clone()), &BlurParams::default());
        assert_eq!(found, faces);

        for (x, y, pixel) in image.enumerate_pixels() {
            let inside = faces.iter().any(|f| f.contains(x, y));
            if !inside {
                assert_eq!(pixel, original.get_pixel(x, y), "pixel ({}, {}) changed", x, y);
            }
        }

        // 棋盘格模糊后趋近灰色
        for face in &faces {
            let cx = face.x + face.width / 2;
            let cy = face.y + face.height / 2;
            let value = image.get_pixel(cx, cy)[0];
            assert!((64..=192).contains(&value), "center value {}", value);
            assert_ne!(image.get_pixel(cx, cy), original.get_pixel(cx, cy));
        }
    }

    #[test]
    fn test_box_outside_image_ignored() {
        let original = checkerboard(20, 20);
        let mut image = original.clone();
        let n = blur_regions(&mut image, &[FaceBox::new(30, 30, 5, 5)], &BlurParams::default());
        assert_eq!(n, 0);
        assert_eq!(image, original);
    }

    #[test]
    fn test_no_faces_no_change() {
        let original = checkerboard(16, 16);
        let mut image = original.clone();
        assert!(blur_faces(&mut image, &FixedDetector(vec![]), &BlurParams::default()).is_empty());
        assert_eq!(image, original);
    }
}
