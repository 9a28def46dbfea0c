//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use bbox::{CyCxHW, Rect as _, RectExt as _, Transform, HW, TLBR};
pub use image::{DynamicImage, GenericImageView as _, Rgb, RgbImage};
pub use itertools::Itertools as _;
pub use label::RatioLabel;
pub use log::{error, info, warn};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
