//! Ready-made single-effect recipes, one per CLI switch.
//!
//! Most effects fire near-certainly here; callers that want a milder
//! mix should reach for the preset recipes instead.

use super::{
    compose::SequentialInit,
    photometric::{
        BlurInit, BrightenInit, DarkenInit, DownscaleInit, IsoNoiseInit, JpegCompressionInit,
        MedianBlurInit,
    },
    preset,
    spatial::{
        BlackboxInit, HorizontalFlipInit, RandomCropInit, RotateInit, VerticalFlipInit,
    },
    weather::{FogInit, NightVisionInit, RainInit, SnowInit, SpatterInit, SunFlareInit},
    Recipe,
};
use crate::{common::*, sanitize::BoxRulesInit};

fn default_rules() -> BoxRulesInit {
    BoxRulesInit::default()
}

/// Random fixed-size crop; `height` is derived from `width` when the
/// caller gives only one dimension.
pub fn crop(width: u32) -> Result<Recipe> {
    let root = RandomCropInit {
        width,
        height: None,
        p: r64(0.99),
        rules: default_rules(),
    }
    .build()?;
    Ok(Recipe::new("crop", Box::new(root)))
}

pub fn rotate(degrees: R64) -> Result<Recipe> {
    let root = RotateInit {
        degrees,
        p: r64(0.99),
        rules: default_rules(),
    }
    .build()?;
    Ok(Recipe::new("rotate", Box::new(root)))
}

pub fn random_rotate(degrees: R64) -> Result<Recipe> {
    let root = RotateInit {
        degrees,
        p: r64(0.99),
        rules: default_rules(),
    }
    .build()?;
    Ok(Recipe::new("randrotate", Box::new(root)))
}

/// Independent coin flips for each mirror axis.
pub fn flip() -> Result<Recipe> {
    let root = SequentialInit {
        p: r64(1.0),
        steps: vec![
            Box::new(
                HorizontalFlipInit {
                    p: r64(0.5),
                    rules: default_rules(),
                }
                .build()?,
            ),
            Box::new(
                VerticalFlipInit {
                    p: r64(0.5),
                    rules: default_rules(),
                }
                .build()?,
            ),
        ],
    }
    .build()?;
    Ok(Recipe::new("flip", Box::new(root)))
}

pub fn brighten() -> Result<Recipe> {
    let root = BrightenInit { p: r64(0.99) }.build()?;
    Ok(Recipe::new("brighten", Box::new(root)))
}

pub fn darken() -> Result<Recipe> {
    let root = DarkenInit { p: r64(0.99) }.build()?;
    Ok(Recipe::new("darken", Box::new(root)))
}

pub fn isonoise() -> Result<Recipe> {
    let root = IsoNoiseInit {
        color_shift: (r64(0.01), r64(0.08)),
        intensity: (r64(0.3), r64(0.9)),
        p: r64(0.99),
    }
    .build()?;
    Ok(Recipe::new("isonoise", Box::new(root)))
}

pub fn compression() -> Result<Recipe> {
    let root = JpegCompressionInit {
        quality_lower: 10,
        quality_upper: 15,
        p: r64(0.99),
    }
    .build()?;
    Ok(Recipe::new("compression", Box::new(root)))
}

pub fn degrade() -> Result<Recipe> {
    let root = DownscaleInit {
        scale_lower: r64(0.25),
        scale_upper: r64(0.45),
        p: r64(0.999),
    }
    .build()?;
    Ok(Recipe::new("degrade", Box::new(root)))
}

pub fn blur() -> Result<Recipe> {
    let root = BlurInit {
        limit: r64(7.0),
        p: r64(0.99),
    }
    .build()?;
    Ok(Recipe::new("blur", Box::new(root)))
}

pub fn median_blur() -> Result<Recipe> {
    let root = MedianBlurInit {
        limit: 7,
        p: r64(0.99),
    }
    .build()?;
    Ok(Recipe::new("medianblur", Box::new(root)))
}

pub fn snow() -> Result<Recipe> {
    let root = SnowInit { p: r64(0.999) }.build()?;
    Ok(Recipe::new("snow", Box::new(root)))
}

pub fn rain() -> Result<Recipe> {
    let root = RainInit {
        drop_length: 10,
        blur_value: r64(4.0),
        p: r64(0.999),
    }
    .build()?;
    Ok(Recipe::new("rain", Box::new(root)))
}

pub fn fog() -> Result<Recipe> {
    let root = FogInit {
        coef_lower: r64(0.1),
        coef_upper: r64(0.5),
        alpha: r64(0.5),
        p: r64(0.999),
    }
    .build()?;
    Ok(Recipe::new("fog", Box::new(root)))
}

pub fn spatter() -> Result<Recipe> {
    let root = SpatterInit { p: r64(0.999) }.build()?;
    Ok(Recipe::new("spatter", Box::new(root)))
}

pub fn sunflare() -> Result<Recipe> {
    let root = SunFlareInit {
        src_radius: 260,
        circles_lower: 2,
        circles_upper: 6,
        p: r64(0.999),
    }
    .build()?;
    Ok(Recipe::new("sunflare", Box::new(root)))
}

pub fn blackboxing(size: u32) -> Result<Recipe> {
    let root = BlackboxInit { size, p: r64(0.99) }.build()?;
    Ok(Recipe::new("blackboxing", Box::new(root)))
}

pub fn night() -> Result<Recipe> {
    let root = NightVisionInit { p: r64(0.99) }.build()?;
    Ok(Recipe::new("night", Box::new(root)))
}

pub fn shape() -> Result<Recipe> {
    Ok(Recipe::new("shape", preset::shape_root(r64(1.0))?))
}

pub fn color() -> Result<Recipe> {
    Ok(Recipe::new("color", preset::color_root(r64(1.0))?))
}

pub fn all() -> Result<Recipe> {
    Ok(Recipe::new("all", preset::all_root()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;

    #[test]
    fn every_factory_recipe_builds() -> Result<()> {
        let recipes = vec![
            crop(640)?,
            rotate(r64(12.0))?,
            random_rotate(r64(25.0))?,
            flip()?,
            brighten()?,
            darken()?,
            isonoise()?,
            compression()?,
            degrade()?,
            blur()?,
            median_blur()?,
            snow()?,
            rain()?,
            fog()?,
            spatter()?,
            sunflare()?,
            blackboxing(50)?,
            night()?,
            shape()?,
            color()?,
            all()?,
        ];
        let names: Vec<_> = recipes.iter().map(|recipe| recipe.name()).collect();
        assert!(names.contains(&"crop") && names.contains(&"all"));
        Ok(())
    }

    #[test]
    fn photometric_recipes_run_on_a_small_frame() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(17);
        let sample = || {
            Sample::new(
                DynamicImage::ImageRgb8(RgbImage::from_pixel(48, 48, Rgb([90, 120, 60]))),
                Vec::new(),
            )
        };
        for recipe in [brighten()?, darken()?, fog()?, night()?, spatter()?] {
            let out = recipe.run(sample(), &mut rng)?;
            assert_eq!(out.image.dimensions(), (48, 48));
        }
        Ok(())
    }
}
