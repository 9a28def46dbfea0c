use super::{Rect, RectExt, TLBR};
use crate::{common::*, HW};
use std::ops::Neg;

/// An axis-aligned scale-translate transform on rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sy: T,
    pub sx: T,
    pub ty: T,
    pub tx: T,
}

impl<T> Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    /// The transform that maps `src` onto `tgt`.
    pub fn from_rects<R>(src: &R, tgt: &R) -> Self
    where
        R: Rect<Type = T>,
    {
        let sy = tgt.h() / src.h();
        let sx = tgt.w() / src.w();
        let ty = tgt.t() - src.t() * sy;
        let tx = tgt.l() - src.l() * sx;

        Self { sy, sx, ty, tx }
    }

    /// The transform between two image frames anchored at the origin.
    pub fn from_sizes(src_size: &HW<T>, tgt_size: &HW<T>) -> Self {
        let zero = T::zero();
        let src = TLBR::from_tlbr([zero, zero, src_size.h(), src_size.w()]);
        let tgt = TLBR::from_tlbr([zero, zero, tgt_size.h(), tgt_size.w()]);
        Self::from_rects(&src, &tgt)
    }
}

impl<T> Transform<T>
where
    T: Copy + Num + Neg<Output = T>,
{
    pub fn inverse(&self) -> Self {
        let sy = T::one() / self.sy;
        let sx = T::one() / self.sx;
        let ty = -self.ty * sy;
        let tx = -self.tx * sx;
        Self { sy, sx, ty, tx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CyCxHW, RectExt as _};
    use approx::assert_abs_diff_eq;

    #[test]
    fn ratio_to_pixel_frame() -> Result<()> {
        let ratio_frame = HW::try_from_hw([1.0, 1.0])?;
        let pixel_frame = HW::try_from_hw([480.0, 640.0])?;
        let to_pixel = Transform::from_sizes(&ratio_frame, &pixel_frame);

        let ratio_box = CyCxHW::try_from_cycxhw([0.5, 0.5, 0.5, 0.25])?;
        let pixel_box = ratio_box.transform(&to_pixel);
        assert_abs_diff_eq!(pixel_box.cy(), 240.0);
        assert_abs_diff_eq!(pixel_box.cx(), 320.0);
        assert_abs_diff_eq!(pixel_box.h(), 240.0);
        assert_abs_diff_eq!(pixel_box.w(), 160.0);

        let back = pixel_box.transform(&to_pixel.inverse());
        assert_abs_diff_eq!(back.cy(), ratio_box.cy());
        assert_abs_diff_eq!(back.w(), ratio_box.w());
        Ok(())
    }
}
