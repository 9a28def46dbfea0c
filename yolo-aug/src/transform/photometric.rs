//! Color and quality transforms. None of these move geometry, so boxes
//! pass through untouched and unfiltered.

use super::{check_probability, fires, Augmentation};
use crate::{common::*, Sample};
use image::codecs::jpeg::JpegEncoder;

/// Random brightness lift with a mild contrast jitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrightenInit {
    pub p: R64,
}

impl BrightenInit {
    pub fn build(self) -> Result<Brighten> {
        Ok(Brighten {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct Brighten {
    p: f64,
}

impl Augmentation for Brighten {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let delta = rng.gen_range(20..=70);
        let contrast = rng.gen_range(-10.0..10.0);
        let image = sample.image.brighten(delta).adjust_contrast(contrast);
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Random brightness drop with a mild contrast jitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DarkenInit {
    pub p: R64,
}

impl DarkenInit {
    pub fn build(self) -> Result<Darken> {
        Ok(Darken {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct Darken {
    p: f64,
}

impl Augmentation for Darken {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let delta = rng.gen_range(20..=70);
        let contrast = rng.gen_range(-10.0..10.0);
        let image = sample.image.brighten(-delta).adjust_contrast(contrast);
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Symmetric brightness/contrast jitter, used inside the color preset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrightnessContrastInit {
    pub p: R64,
}

impl BrightnessContrastInit {
    pub fn build(self) -> Result<BrightnessContrast> {
        Ok(BrightnessContrast {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct BrightnessContrast {
    p: f64,
}

impl Augmentation for BrightnessContrast {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let delta = rng.gen_range(-40..=40);
        let contrast = rng.gen_range(-20.0..20.0);
        let image = sample.image.brighten(delta).adjust_contrast(contrast);
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Gaussian blur with a random sigma.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlurInit {
    /// Upper sigma bound.
    pub limit: R64,
    pub p: R64,
}

impl BlurInit {
    pub fn build(self) -> Result<Blur> {
        let Self { limit, p } = self;
        ensure!(limit > 0.0, "blur limit must be positive");
        Ok(Blur {
            limit: limit.raw(),
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct Blur {
    limit: f64,
    p: f64,
}

impl Augmentation for Blur {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let sigma = rng.gen_range(0.3..self.limit.max(0.31));
        let image = sample.image.blur(sigma as f32);
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Median filter with a random radius.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MedianBlurInit {
    /// Upper kernel size bound; the radius is drawn up to `limit / 2`.
    pub limit: u32,
    pub p: R64,
}

impl MedianBlurInit {
    pub fn build(self) -> Result<MedianBlur> {
        let Self { limit, p } = self;
        ensure!(limit >= 3, "median blur kernel bound must be at least 3");
        Ok(MedianBlur {
            max_radius: limit / 2,
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct MedianBlur {
    max_radius: u32,
    p: f64,
}

impl Augmentation for MedianBlur {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let radius = rng.gen_range(1..=self.max_radius);
        let rgb = sample.image.to_rgb8();
        let filtered = imageproc::filter::median_filter(&rgb, radius, radius);
        Ok(Sample::new(DynamicImage::ImageRgb8(filtered), sample.boxes))
    }
}

/// Re-encode as low-quality JPEG to bake in compression artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JpegCompressionInit {
    pub quality_lower: u8,
    pub quality_upper: u8,
    pub p: R64,
}

impl JpegCompressionInit {
    pub fn build(self) -> Result<JpegCompression> {
        let Self {
            quality_lower,
            quality_upper,
            p,
        } = self;

        ensure!(
            (1..=100).contains(&quality_lower) && (1..=100).contains(&quality_upper),
            "jpeg quality must lie in 1..=100"
        );
        ensure!(
            quality_lower <= quality_upper,
            "quality_lower must not exceed quality_upper"
        );

        Ok(JpegCompression {
            quality_lower,
            quality_upper,
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct JpegCompression {
    quality_lower: u8,
    quality_upper: u8,
    p: f64,
}

impl Augmentation for JpegCompression {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let quality = rng.gen_range(self.quality_lower..=self.quality_upper);
        let rgb = sample.image.to_rgb8();
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, quality).encode_image(&rgb)?;
        let image = image::load_from_memory(&encoded)?;
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Downscale then upscale with a blocky filter to degrade detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownscaleInit {
    pub scale_lower: R64,
    pub scale_upper: R64,
    pub p: R64,
}

impl DownscaleInit {
    pub fn build(self) -> Result<Downscale> {
        let Self {
            scale_lower,
            scale_upper,
            p,
        } = self;

        ensure!(
            scale_lower > 0.0 && scale_upper < 1.0 && scale_lower <= scale_upper,
            "downscale range must satisfy 0 < lower <= upper < 1"
        );

        Ok(Downscale {
            scale_lower: scale_lower.raw(),
            scale_upper: scale_upper.raw(),
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct Downscale {
    scale_lower: f64,
    scale_upper: f64,
    p: f64,
}

impl Augmentation for Downscale {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let scale = rng.gen_range(self.scale_lower..=self.scale_upper);
        let (w, h) = sample.image.dimensions();
        let small_w = ((w as f64 * scale) as u32).max(1);
        let small_h = ((h as f64 * scale) as u32).max(1);

        use image::imageops::FilterType;
        let image = sample
            .image
            .resize_exact(small_w, small_h, FilterType::Nearest)
            .resize_exact(w, h, FilterType::Nearest);
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Sensor-style noise: gaussian grain plus a slight hue drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsoNoiseInit {
    /// Hue drift bound as a fraction of the full hue circle.
    pub color_shift: (R64, R64),
    /// Noise strength range; 1.0 maps to a standard deviation of 30.
    pub intensity: (R64, R64),
    pub p: R64,
}

impl IsoNoiseInit {
    pub fn build(self) -> Result<IsoNoise> {
        let Self {
            color_shift,
            intensity,
            p,
        } = self;

        ensure!(
            color_shift.0 >= 0.0 && color_shift.0 <= color_shift.1,
            "color_shift range must be non-negative and ordered"
        );
        ensure!(
            intensity.0 >= 0.0 && intensity.0 <= intensity.1,
            "intensity range must be non-negative and ordered"
        );

        Ok(IsoNoise {
            color_shift: (color_shift.0.raw(), color_shift.1.raw()),
            intensity: (intensity.0.raw(), intensity.1.raw()),
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct IsoNoise {
    color_shift: (f64, f64),
    intensity: (f64, f64),
    p: f64,
}

impl Augmentation for IsoNoise {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let stddev = rng.gen_range(self.intensity.0..=self.intensity.1) * 30.0;
        let hue = rng.gen_range(self.color_shift.0..=self.color_shift.1) * 360.0;
        let hue = if rng.gen::<bool>() { hue } else { -hue };

        let rgb = sample.image.to_rgb8();
        let noisy = imageproc::noise::gaussian_noise(&rgb, 0.0, stddev, rng.gen());
        let image = DynamicImage::ImageRgb8(noisy).huerotate(hue as i32);
        Ok(Sample::new(image, sample.boxes))
    }
}

/// Random hue rotation and saturation scaling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HueSaturationInit {
    /// Hue bound in degrees.
    pub hue_shift: R64,
    /// Saturation deviation bound around 1.
    pub saturation_shift: R64,
    pub p: R64,
}

impl HueSaturationInit {
    pub fn build(self) -> Result<HueSaturation> {
        let Self {
            hue_shift,
            saturation_shift,
            p,
        } = self;

        ensure!(hue_shift >= 0.0, "hue_shift must be non-negative");
        ensure!(
            (0.0..1.0).contains(&saturation_shift.raw()),
            "saturation_shift must lie in [0, 1)"
        );

        Ok(HueSaturation {
            hue_shift: hue_shift.raw(),
            saturation_shift: saturation_shift.raw(),
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct HueSaturation {
    hue_shift: f64,
    saturation_shift: f64,
    p: f64,
}

impl Augmentation for HueSaturation {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let hue = symmetric(rng, self.hue_shift);
        let saturation = 1.0 + symmetric(rng, self.saturation_shift);

        let rotated = sample.image.huerotate(hue as i32);
        let mut rgb = rotated.to_rgb8();
        for pixel in rgb.pixels_mut() {
            let [r, g, b] = pixel.0;
            let gray = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            pixel.0 = [
                lerp(gray, r as f64, saturation),
                lerp(gray, g as f64, saturation),
                lerp(gray, b as f64, saturation),
            ];
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

/// Stretch each channel toward the full [0, 255] range, blended with
/// the original by a random amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToneStretchInit {
    pub p: R64,
}

impl ToneStretchInit {
    pub fn build(self) -> Result<ToneStretch> {
        Ok(ToneStretch {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct ToneStretch {
    p: f64,
}

impl Augmentation for ToneStretch {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let strength = rng.gen_range(0.5..1.0);
        let mut rgb = sample.image.to_rgb8();

        for channel in 0..3 {
            let (lo, hi) = rgb.pixels().fold((255u8, 0u8), |(lo, hi), pixel| {
                (lo.min(pixel.0[channel]), hi.max(pixel.0[channel]))
            });
            if hi <= lo {
                continue;
            }
            let scale = 255.0 / (hi - lo) as f64;
            for pixel in rgb.pixels_mut() {
                let value = pixel.0[channel];
                let stretched = (value - lo) as f64 * scale;
                pixel.0[channel] = lerp(value as f64, stretched, strength);
            }
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

/// Sepia tone remap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SepiaInit {
    pub p: R64,
}

impl SepiaInit {
    pub fn build(self) -> Result<Sepia> {
        Ok(Sepia {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct Sepia {
    p: f64,
}

impl Augmentation for Sepia {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let mut rgb = sample.image.to_rgb8();
        for pixel in rgb.pixels_mut() {
            let [r, g, b] = pixel.0.map(|v| v as f64);
            pixel.0 = [
                clamp_u8(0.393 * r + 0.769 * g + 0.189 * b),
                clamp_u8(0.349 * r + 0.686 * g + 0.168 * b),
                clamp_u8(0.272 * r + 0.534 * g + 0.131 * b),
            ];
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

fn symmetric(rng: &mut StdRng, limit: f64) -> f64 {
    if limit > 0.0 {
        rng.gen_range(-limit..limit)
    } else {
        0.0
    }
}

fn lerp(from: f64, to: f64, t: f64) -> u8 {
    clamp_u8(from + (to - from) * t)
}

fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_sample() -> Sample {
        let image = RgbImage::from_fn(32, 32, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, ((x + y) * 4) as u8])
        });
        Sample::new(
            DynamicImage::ImageRgb8(image),
            vec![RatioLabel {
                rect: CyCxHW::try_from_cycxhw([0.5, 0.5, 0.5, 0.5]).unwrap(),
                class: 1,
            }],
        )
    }

    #[test]
    fn zero_probability_is_byte_identical() -> Result<()> {
        let blur = BlurInit {
            limit: r64(7.0),
            p: r64(0.0),
        }
        .build()?;

        let input = gradient_sample();
        let reference = input.image.to_rgb8().into_raw();
        let mut rng = StdRng::seed_from_u64(123);

        for _ in 0..1000 {
            let out = blur.forward(input.clone(), &mut rng)?;
            assert_eq!(out.image.to_rgb8().into_raw(), reference);
            assert_eq!(out.boxes, input.boxes);
        }
        Ok(())
    }

    #[test]
    fn photometric_transforms_pass_boxes_through() -> Result<()> {
        let input = gradient_sample();
        let expected = input.boxes.clone();
        let mut rng = StdRng::seed_from_u64(99);

        let transforms: Vec<Box<dyn Augmentation>> = vec![
            Box::new(
                BrightenInit { p: r64(1.0) }.build()?,
            ),
            Box::new(
                DarkenInit { p: r64(1.0) }.build()?,
            ),
            Box::new(
                BlurInit {
                    limit: r64(3.0),
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(
                MedianBlurInit {
                    limit: 7,
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(
                JpegCompressionInit {
                    quality_lower: 10,
                    quality_upper: 15,
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(
                DownscaleInit {
                    scale_lower: r64(0.25),
                    scale_upper: r64(0.45),
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(
                IsoNoiseInit {
                    color_shift: (r64(0.01), r64(0.08)),
                    intensity: (r64(0.2), r64(0.8)),
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(SepiaInit { p: r64(1.0) }.build()?),
            Box::new(ToneStretchInit { p: r64(1.0) }.build()?),
            Box::new(
                HueSaturationInit {
                    hue_shift: r64(20.0),
                    saturation_shift: r64(0.3),
                    p: r64(1.0),
                }
                .build()?,
            ),
        ];

        for transform in &transforms {
            let out = transform.forward(input.clone(), &mut rng)?;
            assert_eq!(out.boxes, expected, "{:?} must not touch boxes", transform);
            assert_eq!(out.image.dimensions(), input.image.dimensions());
        }
        Ok(())
    }

    #[test]
    fn downscale_range_is_validated() {
        let bad = DownscaleInit {
            scale_lower: r64(0.6),
            scale_upper: r64(0.4),
            p: r64(1.0),
        }
        .build();
        assert!(bad.is_err());
    }
}
