use super::{Rect, TLBR};
use crate::{common::*, Transform};

/// Bounding box in CyCxHW format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CyCxHW<T> {
    pub(crate) cy: T,
    pub(crate) cx: T,
    pub(crate) h: T,
    pub(crate) w: T,
}

impl<T> CyCxHW<T> {
    pub fn try_cast<V>(self) -> Option<CyCxHW<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(CyCxHW {
            cy: V::from(self.cy)?,
            cx: V::from(self.cx)?,
            h: V::from(self.h)?,
            w: V::from(self.w)?,
        })
    }
}

impl<T> CyCxHW<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        CyCxHW {
            cy: self.cy * transform.sy + transform.ty,
            cx: self.cx * transform.sx + transform.tx,
            h: self.h * transform.sy,
            w: self.w * transform.sx,
        }
    }
}

impl<T> Rect for CyCxHW<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy - self.h / two
    }

    fn l(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx - self.w / two
    }

    fn b(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy + self.h / two
    }

    fn r(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx + self.w / two
    }

    fn cy(&self) -> Self::Type {
        self.cy
    }

    fn cx(&self) -> Self::Type {
        self.cx
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn try_from_tlbr(tlbr: [T; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        let zero = T::zero();
        let two = T::one() + T::one();
        let h = b - t;
        let w = r - l;
        let cy = t + h / two;
        let cx = l + w / two;
        ensure!(
            h >= zero && w >= zero,
            "box height and width must be non-negative"
        );

        Ok(Self { cy, cx, h, w })
    }

    fn try_from_cycxhw(cycxhw: [T; 4]) -> Result<Self> {
        let [cy, cx, h, w] = cycxhw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "box height and width must be non-negative"
        );

        Ok(Self { cy, cx, h, w })
    }
}

impl<T> From<TLBR<T>> for CyCxHW<T>
where
    T: Copy + Num,
{
    fn from(from: TLBR<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&TLBR<T>> for CyCxHW<T>
where
    T: Copy + Num,
{
    fn from(from: &TLBR<T>) -> Self {
        let two = T::one() + T::one();
        let TLBR { t, l, b, r, .. } = *from;
        let h = b - t;
        let w = r - l;
        let cy = t + h / two;
        let cx = l + w / two;
        Self { cy, cx, h, w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tlbr_round_trip() -> Result<()> {
        let orig = CyCxHW::try_from_cycxhw([0.5, 0.5, 0.2, 0.4])?;
        let back: CyCxHW<f64> = CyCxHW::from(TLBR::from(&orig));
        assert_abs_diff_eq!(orig.cy(), back.cy());
        assert_abs_diff_eq!(orig.cx(), back.cx());
        assert_abs_diff_eq!(orig.h(), back.h());
        assert_abs_diff_eq!(orig.w(), back.w());
        Ok(())
    }

    #[test]
    fn negative_size_is_rejected() {
        assert!(CyCxHW::try_from_cycxhw([0.5, 0.5, -0.1, 0.4]).is_err());
    }
}
