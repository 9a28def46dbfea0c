//! The box survival policy applied after every spatial edit.
//!
//! A spatial transform re-expresses each box in the destination pixel
//! frame, clamps it to the frame, and drops boxes that end up too small
//! or mostly out of view. Photometric transforms bypass this module
//! entirely.

use crate::common::*;

/// Survival thresholds for transformed boxes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoxRulesInit {
    /// Minimum surviving box area, in squared pixels of the output frame.
    pub min_area: R64,
    /// Minimum visible area divided by the pre-clip area.
    pub min_visibility: R64,
}

impl BoxRulesInit {
    pub fn build(self) -> Result<BoxRules> {
        let Self {
            min_area,
            min_visibility,
        } = self;

        ensure!(min_area >= 0.0, "min_area must be non-negative");
        ensure!(
            (0.0..=1.0).contains(&min_visibility.raw()),
            "min_visibility must lie in [0, 1]"
        );

        Ok(BoxRules {
            min_area: min_area.raw(),
            min_visibility: min_visibility.raw(),
        })
    }
}

impl Default for BoxRulesInit {
    fn default() -> Self {
        Self {
            min_area: r64(100.0),
            min_visibility: r64(0.3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoxRules {
    min_area: f64,
    min_visibility: f64,
}

impl BoxRules {
    /// Map every box through a pixel-space point transform and filter
    /// the survivors.
    ///
    /// `map` takes an `[x, y]` pixel point in the source frame to the
    /// destination frame. Each box is mapped corner-wise, replaced by
    /// the axis-aligned hull of its mapped corners, clamped to the
    /// destination frame, and dropped if its area falls below
    /// `min_area` or its visible fraction below `min_visibility`.
    pub fn co_transform<F>(
        &self,
        boxes: &[RatioLabel],
        src: HW<f64>,
        dst: HW<f64>,
        map: F,
    ) -> Vec<RatioLabel>
    where
        F: Fn([f64; 2]) -> [f64; 2],
    {
        let frame = TLBR::from_tlbr([0.0, 0.0, dst.h(), dst.w()]);
        let unit = HW::from_hw([1.0, 1.0]);
        let to_src_pixel = Transform::from_sizes(&unit, &src);
        let to_dst_ratio = Transform::from_sizes(&dst, &unit);

        boxes
            .iter()
            .filter_map(|label| {
                let pixel: TLBR<f64> = label.transform(&to_src_pixel).rect.into();
                let [t, l, b, r] = pixel.tlbr();

                let corners = [[l, t], [r, t], [l, b], [r, b]].map(&map);
                let xs = corners.iter().map(|&[x, _]| x);
                let ys = corners.iter().map(|&[_, y]| y);
                let mapped = TLBR::try_from_tlbr([
                    ys.clone().fold(f64::INFINITY, f64::min),
                    xs.clone().fold(f64::INFINITY, f64::min),
                    ys.fold(f64::NEG_INFINITY, f64::max),
                    xs.fold(f64::NEG_INFINITY, f64::max),
                ])
                .ok()?;

                let mapped_area = mapped.area();
                if mapped_area <= 0.0 {
                    return None;
                }

                let clipped = mapped.clip_to(&frame)?;
                if clipped.area() < self.min_area {
                    return None;
                }
                if clipped.area() / mapped_area < self.min_visibility {
                    return None;
                }

                let rect = CyCxHW::from(clipped).transform(&to_dst_ratio);
                Some(RatioLabel {
                    rect,
                    class: label.class,
                })
            })
            .collect()
    }
}
