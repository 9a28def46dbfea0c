//! Pre-built recipe trees for the shape, color and combined presets.

use super::{
    compose::{PickNInit, PickOneInit, SequentialInit},
    photometric::{
        BlurInit, BrightenInit, BrightnessContrastInit, DarkenInit, DownscaleInit,
        HueSaturationInit, IsoNoiseInit, JpegCompressionInit, MedianBlurInit, SepiaInit,
        ToneStretchInit,
    },
    spatial::{RandomCropInit, RotateInit, ShiftScaleRotateInit},
    weather::{FogInit, RainInit, SnowInit, SpatterInit, SunFlareInit},
    BoxedAugmentation,
};
use crate::{common::*, sanitize::BoxRulesInit};

fn shape_rules() -> BoxRulesInit {
    BoxRulesInit {
        min_area: r64(100.0),
        min_visibility: r64(0.3),
    }
}

fn mixture_rules() -> BoxRulesInit {
    BoxRulesInit {
        min_area: r64(100.0),
        min_visibility: r64(0.2),
    }
}

/// The geometric mixture: quality degradation, then exactly one
/// structural edit, then exactly one disturbance.
pub fn shape_root(p: R64) -> Result<BoxedAugmentation> {
    shape_root_with(p, shape_rules())
}

fn shape_root_with(p: R64, rules: BoxRulesInit) -> Result<BoxedAugmentation> {
    let chain = SequentialInit {
        p,
        steps: vec![
            Box::new(
                PickNInit {
                    p: r64(1.0),
                    n: 2,
                    choices: vec![
                        Box::new(
                            JpegCompressionInit {
                                quality_lower: 30,
                                quality_upper: 55,
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                        Box::new(
                            BlurInit {
                                limit: r64(3.0),
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                    ],
                }
                .build()?,
            ),
            Box::new(
                PickOneInit {
                    p: r64(1.0),
                    choices: vec![
                        Box::new(
                            RandomCropInit {
                                width: 480,
                                height: Some(320),
                                p: r64(0.60),
                                rules: rules.clone(),
                            }
                            .build()?,
                        ),
                        Box::new(
                            ShiftScaleRotateInit {
                                shift_limit: r64(0.1),
                                scale_limit: r64(0.2),
                                rotate_limit: r64(15.0),
                                p: r64(0.25),
                                rules: rules.clone(),
                            }
                            .build()?,
                        ),
                        Box::new(
                            RotateInit {
                                degrees: r64(8.0),
                                p: r64(0.2),
                                rules,
                            }
                            .build()?,
                        ),
                    ],
                    weights: None,
                }
                .build()?,
            ),
            Box::new(
                PickOneInit {
                    p: r64(1.0),
                    choices: vec![
                        Box::new(
                            IsoNoiseInit {
                                color_shift: (r64(0.01), r64(0.05)),
                                intensity: (r64(0.2), r64(0.6)),
                                p: r64(0.2),
                            }
                            .build()?,
                        ),
                        Box::new(
                            BlurInit {
                                limit: r64(2.0),
                                p: r64(0.2),
                            }
                            .build()?,
                        ),
                        Box::new(SpatterInit { p: r64(0.1) }.build()?),
                    ],
                    weights: None,
                }
                .build()?,
            ),
        ],
    }
    .build()?;

    Ok(Box::new(chain))
}

/// The photometric mixture: two tone edits, one quality edit, one
/// weather effect.
pub fn color_root(p: R64) -> Result<BoxedAugmentation> {
    let chain = SequentialInit {
        p,
        steps: vec![
            Box::new(
                PickNInit {
                    p: r64(1.0),
                    n: 2,
                    choices: vec![
                        Box::new(BrightnessContrastInit { p: r64(0.3) }.build()?),
                        Box::new(
                            HueSaturationInit {
                                hue_shift: r64(20.0),
                                saturation_shift: r64(0.3),
                                p: r64(0.3),
                            }
                            .build()?,
                        ),
                        Box::new(BrightenInit { p: r64(0.3) }.build()?),
                        Box::new(DarkenInit { p: r64(0.2) }.build()?),
                        Box::new(ToneStretchInit { p: r64(0.2) }.build()?),
                        Box::new(SepiaInit { p: r64(0.1) }.build()?),
                    ],
                }
                .build()?,
            ),
            Box::new(
                PickOneInit {
                    p: r64(1.0),
                    choices: vec![
                        Box::new(
                            JpegCompressionInit {
                                quality_lower: 30,
                                quality_upper: 55,
                                p: r64(0.3),
                            }
                            .build()?,
                        ),
                        Box::new(
                            DownscaleInit {
                                scale_lower: r64(0.4),
                                scale_upper: r64(0.6),
                                p: r64(0.2),
                            }
                            .build()?,
                        ),
                        Box::new(
                            MedianBlurInit {
                                limit: 3,
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                        Box::new(
                            IsoNoiseInit {
                                color_shift: (r64(0.01), r64(0.08)),
                                intensity: (r64(0.2), r64(0.8)),
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                        Box::new(SpatterInit { p: r64(0.1) }.build()?),
                    ],
                    weights: None,
                }
                .build()?,
            ),
            Box::new(
                PickOneInit {
                    p: r64(1.0),
                    choices: vec![
                        Box::new(
                            RainInit {
                                drop_length: 10,
                                blur_value: r64(4.0),
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                        Box::new(SnowInit { p: r64(0.1) }.build()?),
                        Box::new(
                            SunFlareInit {
                                src_radius: 260,
                                circles_lower: 2,
                                circles_upper: 6,
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                        Box::new(
                            FogInit {
                                coef_lower: r64(0.1),
                                coef_upper: r64(0.5),
                                alpha: r64(0.5),
                                p: r64(0.1),
                            }
                            .build()?,
                        ),
                    ],
                    weights: None,
                }
                .build()?,
            ),
        ],
    }
    .build()?;

    Ok(Box::new(chain))
}

/// Color pass then shape pass, each firing half the time. Uses the
/// looser mixture visibility threshold.
pub fn all_root() -> Result<BoxedAugmentation> {
    let chain = SequentialInit {
        p: r64(1.0),
        steps: vec![
            color_root(r64(0.5))?,
            shape_root_with(r64(0.5), mixture_rules())?,
        ],
    }
    .build()?;
    Ok(Box::new(chain))
}
