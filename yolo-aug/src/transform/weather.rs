//! Weather and scene effects. Purely photometric: boxes pass through.

use super::{check_probability, fires, Augmentation};
use crate::{common::*, Sample};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

/// Uniform haze blended toward white.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FogInit {
    pub coef_lower: R64,
    pub coef_upper: R64,
    /// Haze opacity multiplier.
    pub alpha: R64,
    pub p: R64,
}

impl FogInit {
    pub fn build(self) -> Result<Fog> {
        let Self {
            coef_lower,
            coef_upper,
            alpha,
            p,
        } = self;

        ensure!(
            coef_lower >= 0.0 && coef_upper <= 1.0 && coef_lower <= coef_upper,
            "fog coefficient range must lie in [0, 1] and be ordered"
        );
        ensure!(
            (0.0..=1.0).contains(&alpha.raw()),
            "fog alpha must lie in [0, 1]"
        );

        Ok(Fog {
            coef_lower: coef_lower.raw(),
            coef_upper: coef_upper.raw(),
            alpha: alpha.raw(),
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct Fog {
    coef_lower: f64,
    coef_upper: f64,
    alpha: f64,
    p: f64,
}

impl Augmentation for Fog {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let strength = rng.gen_range(self.coef_lower..=self.coef_upper) * self.alpha;
        let mut rgb = sample.image.to_rgb8();
        for pixel in rgb.pixels_mut() {
            pixel.0 = pixel.0.map(|v| blend(v, 255, strength));
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

/// Slanted rain streaks followed by a light blur.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RainInit {
    /// Streak length in pixels.
    pub drop_length: u32,
    /// Post-streak blur sigma, scaled down.
    pub blur_value: R64,
    pub p: R64,
}

impl RainInit {
    pub fn build(self) -> Result<Rain> {
        let Self {
            drop_length,
            blur_value,
            p,
        } = self;

        ensure!(drop_length > 0, "drop_length must be positive");
        ensure!(blur_value >= 0.0, "blur_value must be non-negative");

        Ok(Rain {
            drop_length,
            blur_sigma: blur_value.raw() as f32 * 0.25,
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct Rain {
    drop_length: u32,
    blur_sigma: f32,
    p: f64,
}

impl Augmentation for Rain {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let (w, h) = sample.image.dimensions();
        let mut rgb = sample.image.to_rgb8();

        let drops = (w * h / 1200).max(1);
        let slant: f32 = rng.gen_range(-0.3..0.3);
        for _ in 0..drops {
            let x = rng.gen_range(0.0..w as f32);
            let y = rng.gen_range(0.0..h as f32);
            let end = (
                x + slant * self.drop_length as f32,
                y + self.drop_length as f32,
            );
            draw_line_segment_mut(&mut rgb, (x, y), end, Rgb([200, 200, 210]));
        }

        let image = if self.blur_sigma > 0.0 {
            DynamicImage::ImageRgb8(rgb).blur(self.blur_sigma)
        } else {
            DynamicImage::ImageRgb8(rgb)
        };
        Ok(Sample::new(image, sample.boxes))
    }
}

/// White flecks plus a slight brightness lift.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnowInit {
    pub p: R64,
}

impl SnowInit {
    pub fn build(self) -> Result<Snow> {
        Ok(Snow {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct Snow {
    p: f64,
}

impl Augmentation for Snow {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let (w, h) = sample.image.dimensions();
        let mut rgb = sample.image.brighten(15).to_rgb8();

        let flakes = (w * h / 600).max(1);
        for _ in 0..flakes {
            let x = rng.gen_range(0..w) as i32;
            let y = rng.gen_range(0..h) as i32;
            let radius = rng.gen_range(1..=2);
            draw_filled_circle_mut(&mut rgb, (x, y), radius, Rgb([245, 245, 250]));
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

/// A bright radial flare with satellite circles along its axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SunFlareInit {
    /// Radius of the main flare in pixels.
    pub src_radius: u32,
    pub circles_lower: u32,
    pub circles_upper: u32,
    pub p: R64,
}

impl SunFlareInit {
    pub fn build(self) -> Result<SunFlare> {
        let Self {
            src_radius,
            circles_lower,
            circles_upper,
            p,
        } = self;

        ensure!(src_radius > 0, "flare radius must be positive");
        ensure!(
            circles_lower <= circles_upper,
            "flare circle range must be ordered"
        );

        Ok(SunFlare {
            src_radius,
            circles_lower,
            circles_upper,
            p: check_probability(p)?,
        })
    }
}

#[derive(Debug)]
pub struct SunFlare {
    src_radius: u32,
    circles_lower: u32,
    circles_upper: u32,
    p: f64,
}

impl Augmentation for SunFlare {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let (w, h) = sample.image.dimensions();
        let mut rgb = sample.image.to_rgb8();

        // Flare source somewhere in the top half. Degenerate frames
        // still leave a non-empty sampling range.
        let fx = rng.gen_range(0..w.max(1)) as f64;
        let fy = rng.gen_range(0..(h / 2).max(1)) as f64;
        let radius = self.src_radius as f64;

        for (x, y, pixel) in rgb.enumerate_pixels_mut() {
            let distance = ((x as f64 - fx).powi(2) + (y as f64 - fy).powi(2)).sqrt();
            if distance < radius {
                let strength = (1.0 - distance / radius) * 0.8;
                pixel.0 = pixel.0.map(|v| blend(v, 255, strength));
            }
        }

        let circles = rng.gen_range(self.circles_lower..=self.circles_upper);
        for _ in 0..circles {
            let t: f64 = rng.gen_range(0.2..1.0);
            let cx = (fx + (w as f64 / 2.0 - fx) * t) as i32;
            let cy = (fy + (h as f64 / 2.0 - fy) * t) as i32;
            let r = rng.gen_range(3..=12);
            draw_filled_circle_mut(&mut rgb, (cx, cy), r, Rgb([255, 250, 220]));
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

/// Dark mud-like blobs splattered over the frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpatterInit {
    pub p: R64,
}

impl SpatterInit {
    pub fn build(self) -> Result<Spatter> {
        Ok(Spatter {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct Spatter {
    p: f64,
}

impl Augmentation for Spatter {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let (w, h) = sample.image.dimensions();
        let mut rgb = sample.image.to_rgb8();

        let blobs = (w * h / 4000).max(3);
        for _ in 0..blobs {
            let x = rng.gen_range(0..w) as i32;
            let y = rng.gen_range(0..h) as i32;
            let radius = rng.gen_range(2..=6);
            let shade = rng.gen_range(30..70);
            draw_filled_circle_mut(&mut rgb, (x, y), radius, Rgb([shade, shade / 2 + 10, shade / 3]));
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

/// Night-vision look: desaturate, tint green, darken.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NightVisionInit {
    pub p: R64,
}

impl NightVisionInit {
    pub fn build(self) -> Result<NightVision> {
        Ok(NightVision {
            p: check_probability(self.p)?,
        })
    }
}

#[derive(Debug)]
pub struct NightVision {
    p: f64,
}

impl Augmentation for NightVision {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }

        let mut rgb = sample.image.to_rgb8();
        for pixel in rgb.pixels_mut() {
            let [r, g, b] = pixel.0;
            let gray = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            let lit = gray * 0.7;
            pixel.0 = [
                (lit * 0.25).round() as u8,
                lit.min(255.0).round() as u8,
                (lit * 0.25).round() as u8,
            ];
        }
        Ok(Sample::new(DynamicImage::ImageRgb8(rgb), sample.boxes))
    }
}

fn blend(value: u8, target: u8, t: f64) -> u8 {
    (value as f64 + (target as f64 - value as f64) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> Sample {
        let image = RgbImage::from_fn(48, 48, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([220, 220, 220])
            } else {
                Rgb([40, 40, 40])
            }
        });
        Sample::new(
            DynamicImage::ImageRgb8(image),
            vec![RatioLabel {
                rect: CyCxHW::try_from_cycxhw([0.5, 0.5, 0.4, 0.4]).unwrap(),
                class: 2,
            }],
        )
    }

    #[test]
    fn weather_effects_pass_boxes_through() -> Result<()> {
        let input = checkerboard();
        let expected = input.boxes.clone();
        let mut rng = StdRng::seed_from_u64(17);

        let effects: Vec<Box<dyn Augmentation>> = vec![
            Box::new(
                FogInit {
                    coef_lower: r64(0.1),
                    coef_upper: r64(0.5),
                    alpha: r64(0.5),
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(
                RainInit {
                    drop_length: 10,
                    blur_value: r64(4.0),
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(SnowInit { p: r64(1.0) }.build()?),
            Box::new(
                SunFlareInit {
                    src_radius: 20,
                    circles_lower: 2,
                    circles_upper: 6,
                    p: r64(1.0),
                }
                .build()?,
            ),
            Box::new(SpatterInit { p: r64(1.0) }.build()?),
            Box::new(NightVisionInit { p: r64(1.0) }.build()?),
        ];

        for effect in &effects {
            let out = effect.forward(input.clone(), &mut rng)?;
            assert_eq!(out.boxes, expected, "{:?} must not touch boxes", effect);
            assert_eq!(out.image.dimensions(), input.image.dimensions());
        }
        Ok(())
    }

    #[test]
    fn sun_flare_handles_single_row_images() -> Result<()> {
        let flare = SunFlareInit {
            src_radius: 20,
            circles_lower: 2,
            circles_upper: 6,
            p: r64(1.0),
        }
        .build()?;

        let input = Sample::new(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 1, Rgb([80, 80, 80]))),
            Vec::new(),
        );
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            let out = flare.forward(input.clone(), &mut rng)?;
            assert_eq!(out.image.dimensions(), (64, 1));
        }
        Ok(())
    }

    #[test]
    fn fog_brightens_dark_regions() -> Result<()> {
        let fog = FogInit {
            coef_lower: r64(0.5),
            coef_upper: r64(0.5),
            alpha: r64(1.0),
            p: r64(1.0),
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(4);
        let input = checkerboard();
        let before = input.image.to_rgb8();
        let out = fog.forward(input.clone(), &mut rng)?;
        let after = out.image.to_rgb8();

        let mean_before: f64 =
            before.pixels().map(|p| p.0[0] as f64).sum::<f64>() / before.pixels().len() as f64;
        let mean_after: f64 =
            after.pixels().map(|p| p.0[0] as f64).sum::<f64>() / after.pixels().len() as f64;
        assert!(mean_after > mean_before);
        Ok(())
    }
}
