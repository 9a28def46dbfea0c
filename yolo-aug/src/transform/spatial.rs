//! Spatial transforms. Every one of these reshapes geometry, so boxes
//! go through the survival filter in [`crate::sanitize`].

use super::{check_probability, fires, Augmentation};
use crate::{common::*, sanitize::BoxRulesInit, BoxRules, Sample};
use imageproc::geometric_transformations::{rotate_about_center, warp, Interpolation, Projection};

/// Crop a random window of a fixed size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomCropInit {
    pub width: u32,
    /// Derived from `width` at a 16:9 ratio when absent.
    pub height: Option<u32>,
    pub p: R64,
    pub rules: BoxRulesInit,
}

impl RandomCropInit {
    pub fn build(self) -> Result<RandomCrop> {
        let Self {
            width,
            height,
            p,
            rules,
        } = self;

        let (width, height) = match height {
            Some(height) => {
                ensure!(width > 0 && height > 0, "crop size must be positive");
                (width, height)
            }
            None => {
                // Detector-friendly sizing: 640 floor, near-16:9, both
                // dimensions divisible by 32.
                let width = width.max(640);
                let height = width * 9 / 16;
                (width - width % 32, height - height % 32)
            }
        };

        Ok(RandomCrop {
            width,
            height,
            p: check_probability(p)?,
            rules: rules.build()?,
        })
    }
}

#[derive(Debug)]
pub struct RandomCrop {
    width: u32,
    height: u32,
    p: f64,
    rules: BoxRules,
}

impl Augmentation for RandomCrop {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let (img_w, img_h) = sample.image.dimensions();
        ensure!(
            img_w >= self.width && img_h >= self.height,
            "crop size {}x{} exceeds image size {}x{}",
            self.width,
            self.height,
            img_w,
            img_h
        );

        let x0 = rng.gen_range(0..=img_w - self.width);
        let y0 = rng.gen_range(0..=img_h - self.height);
        let image = sample
            .image
            .crop_imm(x0, y0, self.width, self.height);

        let src = sample.size();
        let dst = HW::from_hw([self.height as f64, self.width as f64]);
        let boxes = self.rules.co_transform(&sample.boxes, src, dst, |[x, y]| {
            [x - x0 as f64, y - y0 as f64]
        });

        Ok(Sample::new(image, boxes))
    }
}

/// Rotate by a random angle within a symmetric bound, keeping the frame
/// size and filling exposed corners with black.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RotateInit {
    /// Maximum absolute rotation, in degrees.
    pub degrees: R64,
    pub p: R64,
    pub rules: BoxRulesInit,
}

impl RotateInit {
    pub fn build(self) -> Result<Rotate> {
        let Self { degrees, p, rules } = self;
        ensure!(degrees > 0.0, "rotation bound must be positive");

        Ok(Rotate {
            max_degrees: degrees.raw(),
            p: check_probability(p)?,
            rules: rules.build()?,
        })
    }
}

#[derive(Debug)]
pub struct Rotate {
    max_degrees: f64,
    p: f64,
    rules: BoxRules,
}

impl Augmentation for Rotate {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let theta = rng
            .gen_range(-self.max_degrees..self.max_degrees)
            .to_radians();
        let rgb = sample.image.to_rgb8();
        let rotated = rotate_about_center(&rgb, theta as f32, Interpolation::Bilinear, Rgb([0, 0, 0]));

        let size = sample.size();
        let (cx, cy) = (size.w() / 2.0, size.h() / 2.0);
        let (sin, cos) = theta.sin_cos();
        let boxes = self.rules.co_transform(&sample.boxes, size, size, |[x, y]| {
            let (dx, dy) = (x - cx, y - cy);
            [cx + dx * cos - dy * sin, cy + dx * sin + dy * cos]
        });

        Ok(Sample::new(DynamicImage::ImageRgb8(rotated), boxes))
    }
}

/// Mirror left-right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HorizontalFlipInit {
    pub p: R64,
    pub rules: BoxRulesInit,
}

impl HorizontalFlipInit {
    pub fn build(self) -> Result<HorizontalFlip> {
        Ok(HorizontalFlip {
            p: check_probability(self.p)?,
            rules: self.rules.build()?,
        })
    }
}

#[derive(Debug)]
pub struct HorizontalFlip {
    p: f64,
    rules: BoxRules,
}

impl Augmentation for HorizontalFlip {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let size = sample.size();
        let image = sample.image.fliph();
        let boxes = self
            .rules
            .co_transform(&sample.boxes, size, size, |[x, y]| [size.w() - x, y]);
        Ok(Sample::new(image, boxes))
    }
}

/// Mirror top-bottom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerticalFlipInit {
    pub p: R64,
    pub rules: BoxRulesInit,
}

impl VerticalFlipInit {
    pub fn build(self) -> Result<VerticalFlip> {
        Ok(VerticalFlip {
            p: check_probability(self.p)?,
            rules: self.rules.build()?,
        })
    }
}

#[derive(Debug)]
pub struct VerticalFlip {
    p: f64,
    rules: BoxRules,
}

impl Augmentation for VerticalFlip {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let size = sample.size();
        let image = sample.image.flipv();
        let boxes = self
            .rules
            .co_transform(&sample.boxes, size, size, |[x, y]| [x, size.h() - y]);
        Ok(Sample::new(image, boxes))
    }
}

/// Random translate + scale + rotate about the image center.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftScaleRotateInit {
    /// Maximum translation as a fraction of each dimension.
    pub shift_limit: R64,
    /// Maximum relative scale deviation from 1.
    pub scale_limit: R64,
    /// Maximum absolute rotation, in degrees.
    pub rotate_limit: R64,
    pub p: R64,
    pub rules: BoxRulesInit,
}

impl ShiftScaleRotateInit {
    pub fn build(self) -> Result<ShiftScaleRotate> {
        let Self {
            shift_limit,
            scale_limit,
            rotate_limit,
            p,
            rules,
        } = self;

        ensure!(shift_limit >= 0.0, "shift_limit must be non-negative");
        ensure!(
            (0.0..1.0).contains(&scale_limit.raw()),
            "scale_limit must lie in [0, 1)"
        );
        ensure!(rotate_limit >= 0.0, "rotate_limit must be non-negative");

        Ok(ShiftScaleRotate {
            shift_limit: shift_limit.raw(),
            scale_limit: scale_limit.raw(),
            rotate_limit: rotate_limit.raw(),
            p: check_probability(p)?,
            rules: rules.build()?,
        })
    }
}

#[derive(Debug)]
pub struct ShiftScaleRotate {
    shift_limit: f64,
    scale_limit: f64,
    rotate_limit: f64,
    p: f64,
    rules: BoxRules,
}

impl Augmentation for ShiftScaleRotate {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let size = sample.size();
        let (cx, cy) = (size.w() / 2.0, size.h() / 2.0);

        let dx = symmetric(rng, self.shift_limit) * size.w();
        let dy = symmetric(rng, self.shift_limit) * size.h();
        let scale = 1.0 + symmetric(rng, self.scale_limit);
        let theta = symmetric(rng, self.rotate_limit).to_radians();
        let (sin, cos) = theta.sin_cos();

        // p' = c + s * R(theta) * (p - c) + t, row-major affine
        let (a, b) = (scale * cos, -scale * sin);
        let (c, d) = (scale * sin, scale * cos);
        let tx = cx + dx - a * cx - b * cy;
        let ty = cy + dy - c * cx - d * cy;

        let projection = Projection::from_matrix([
            a as f32, b as f32, tx as f32, // row 1
            c as f32, d as f32, ty as f32, // row 2
            0.0, 0.0, 1.0, // row 3
        ])
        .ok_or_else(|| format_err!("degenerate affine transform"))?;

        let rgb = sample.image.to_rgb8();
        let warped = warp(&rgb, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]));

        let boxes = self.rules.co_transform(&sample.boxes, size, size, |[x, y]| {
            [a * x + b * y + tx, c * x + d * y + ty]
        });

        Ok(Sample::new(DynamicImage::ImageRgb8(warped), boxes))
    }
}

fn symmetric(rng: &mut StdRng, limit: f64) -> f64 {
    if limit > 0.0 {
        rng.gen_range(-limit..limit)
    } else {
        0.0
    }
}

/// Paint random black squares over the image. Occlusion does not move
/// the underlying objects, so boxes pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlackboxInit {
    /// Square side length in pixels.
    pub size: u32,
    pub p: R64,
}

impl BlackboxInit {
    pub fn build(self) -> Result<Blackbox> {
        let Self { size, p } = self;
        ensure!(size > 0, "blackbox size must be positive");
        Ok(Blackbox {
            size,
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct Blackbox {
    size: u32,
    p: f64,
}

impl Augmentation for Blackbox {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let (img_w, img_h) = sample.image.dimensions();
        let side_w = self.size.min(img_w);
        let side_h = self.size.min(img_h);
        let mut rgb = sample.image.to_rgb8();

        let count = rng.gen_range(1..=6);
        for _ in 0..count {
            let x0 = rng.gen_range(0..=img_w - side_w);
            let y0 = rng.gen_range(0..=img_h - side_h);
            imageproc::drawing::draw_filled_rect_mut(
                &mut rgb,
                imageproc::rect::Rect::at(x0 as i32, y0 as i32).of_size(side_w, side_h),
                Rgb([0, 0, 0]),
            );
        }

        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_with_box(w: u32, h: u32, cycxhw: [f64; 4]) -> Sample {
        Sample::new(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([64, 64, 64]))),
            vec![RatioLabel {
                rect: CyCxHW::try_from_cycxhw(cycxhw).unwrap(),
                class: 0,
            }],
        )
    }

    fn loose_rules() -> BoxRulesInit {
        BoxRulesInit {
            min_area: r64(0.0),
            min_visibility: r64(0.0),
        }
    }

    #[test]
    fn horizontal_flip_mirrors_boxes() -> Result<()> {
        let flip = HorizontalFlipInit {
            p: r64(1.0),
            rules: loose_rules(),
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(0);
        let out = flip.forward(sample_with_box(100, 100, [0.5, 0.2, 0.2, 0.2]), &mut rng)?;
        assert_eq!(out.boxes.len(), 1);
        assert_abs_diff_eq!(out.boxes[0].rect.cx(), 0.8, epsilon = 1e-9);
        assert_abs_diff_eq!(out.boxes[0].rect.cy(), 0.5, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn crop_reframes_boxes() -> Result<()> {
        let crop = RandomCropInit {
            width: 50,
            height: Some(50),
            p: r64(1.0),
            rules: loose_rules(),
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(5);
        let out = crop.forward(sample_with_box(100, 100, [0.5, 0.5, 0.4, 0.4]), &mut rng)?;
        assert_eq!(out.image.dimensions(), (50, 50));
        for label in &out.boxes {
            let rect = &label.rect;
            assert!(rect.cx() + rect.w() / 2.0 <= 1.0 + 1e-9);
            assert!(rect.cy() + rect.h() / 2.0 <= 1.0 + 1e-9);
            assert!(rect.l() >= -1e-9 && rect.t() >= -1e-9);
        }
        Ok(())
    }

    #[test]
    fn oversized_crop_fails_at_run_time() -> Result<()> {
        let crop = RandomCropInit {
            width: 640,
            height: None,
            p: r64(1.0),
            rules: loose_rules(),
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(0);
        let result = crop.forward(sample_with_box(100, 100, [0.5, 0.5, 0.4, 0.4]), &mut rng);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn derived_crop_dimensions_follow_the_sizing_rule() -> Result<()> {
        let crop = RandomCropInit {
            width: 100,
            height: None,
            p: r64(1.0),
            rules: loose_rules(),
        }
        .build()?;
        // 640 floor, 360 -> 352 after rounding down to a multiple of 32.
        let debug = format!("{:?}", crop);
        assert!(debug.contains("width: 640"));
        assert!(debug.contains("height: 352"));
        Ok(())
    }

    #[test]
    fn rotation_keeps_boxes_clipped() -> Result<()> {
        let rotate = RotateInit {
            degrees: r64(30.0),
            p: r64(1.0),
            rules: loose_rules(),
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let out = rotate.forward(sample_with_box(120, 80, [0.3, 0.7, 0.3, 0.3]), &mut rng)?;
            for label in &out.boxes {
                let rect = &label.rect;
                assert!(rect.cx() + rect.w() / 2.0 <= 1.0 + 1e-9);
                assert!(rect.cy() + rect.h() / 2.0 <= 1.0 + 1e-9);
                assert!(rect.l() >= -1e-9 && rect.t() >= -1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn blackbox_leaves_boxes_alone() -> Result<()> {
        let blackbox = BlackboxInit {
            size: 10,
            p: r64(1.0),
        }
        .build()?;

        let input = sample_with_box(100, 100, [0.5, 0.5, 0.4, 0.4]);
        let expected = input.boxes.clone();
        let mut rng = StdRng::seed_from_u64(2);
        let out = blackbox.forward(input, &mut rng)?;
        assert_eq!(out.boxes, expected);
        Ok(())
    }
}
