//! The YOLO text annotation line, `class cx cy w h` in normalized floats.

use crate::RatioLabel;
use anyhow::{ensure, Context, Result};
use bbox::{CyCxHW, Rect as _};

/// Parse one annotation line.
pub fn parse_line(line: &str) -> Result<RatioLabel> {
    let tokens: Vec<_> = line.split_whitespace().collect();
    ensure!(
        tokens.len() == 5,
        "expected 5 fields in annotation line, found {}: '{}'",
        tokens.len(),
        line
    );

    let class: usize = tokens[0]
        .parse()
        .with_context(|| format!("bad class id '{}'", tokens[0]))?;
    let fields: Vec<f64> = tokens[1..]
        .iter()
        .map(|token| {
            token
                .parse()
                .with_context(|| format!("bad coordinate '{}'", token))
        })
        .collect::<Result<_>>()?;
    let [cx, cy, w, h] = match fields.as_slice() {
        &[cx, cy, w, h] => [cx, cy, w, h],
        _ => unreachable!(),
    };

    ensure!(
        (0.0..=1.0).contains(&cx)
            && (0.0..=1.0).contains(&cy)
            && (0.0..=1.0).contains(&w)
            && (0.0..=1.0).contains(&h),
        "coordinates must lie in [0, 1]: '{}'",
        line
    );
    ensure!(w > 0.0 && h > 0.0, "box size must be positive: '{}'", line);

    Ok(RatioLabel {
        rect: CyCxHW::try_from_cycxhw([cy, cx, h, w])?,
        class,
    })
}

/// Serialize one annotation line without the trailing newline.
pub fn format_line(label: &RatioLabel) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        label.class,
        label.rect.cx(),
        label.rect.cy(),
        label.rect.w(),
        label.rect.h()
    )
}
