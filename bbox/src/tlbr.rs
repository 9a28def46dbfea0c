use super::{CyCxHW, Rect};
use crate::{common::*, Transform};

/// Bounding box in TLBR format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T> {
    pub fn try_cast<V>(self) -> Option<TLBR<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(TLBR {
            t: V::from(self.t)?,
            l: V::from(self.l)?,
            b: V::from(self.b)?,
            r: V::from(self.r)?,
        })
    }
}

impl<T> TLBR<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        TLBR {
            t: self.t * transform.sy + transform.ty,
            l: self.l * transform.sx + transform.tx,
            b: self.b * transform.sy + transform.ty,
            r: self.r * transform.sx + transform.tx,
        }
    }
}

impl<T> TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Clamp the box to the given frame. Returns `None` if nothing remains.
    pub fn clip_to(&self, frame: &TLBR<T>) -> Option<TLBR<T>> {
        use crate::rect::RectExt as _;
        self.intersect_with(frame)
    }
}

impl<T> Rect for TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn cy(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.t + self.h() / two
    }

    fn cx(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.l + self.w() / two
    }

    fn h(&self) -> Self::Type {
        self.b - self.t
    }

    fn w(&self) -> Self::Type {
        self.r - self.l
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self { t, l, b, r })
    }

    fn try_from_cycxhw(cycxhw: [Self::Type; 4]) -> Result<Self> {
        let [cy, cx, h, w] = cycxhw;
        let zero = T::zero();
        ensure!(h >= zero && w >= zero, "h and w must be non-negative");

        let two = T::one() + T::one();
        let t = cy - h / two;
        let b = cy + h / two;
        let l = cx - w / two;
        let r = cx + w / two;

        Ok(Self { t, l, b, r })
    }
}

impl<T> From<CyCxHW<T>> for TLBR<T>
where
    T: Copy + Num,
{
    fn from(from: CyCxHW<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&CyCxHW<T>> for TLBR<T>
where
    T: Copy + Num,
{
    fn from(from: &CyCxHW<T>) -> Self {
        let two = T::one() + T::one();
        let CyCxHW { cy, cx, h, w, .. } = *from;
        let t = cy - h / two;
        let l = cx - w / two;
        let b = cy + h / two;
        let r = cx + w / two;
        Self { t, l, b, r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clip_to_frame() -> Result<()> {
        let frame = TLBR::try_from_tlbr([0.0, 0.0, 100.0, 100.0])?;
        let inside = TLBR::try_from_tlbr([10.0, 10.0, 20.0, 20.0])?;
        let sticking_out = TLBR::try_from_tlbr([-10.0, 90.0, 10.0, 110.0])?;
        let outside = TLBR::try_from_tlbr([-30.0, -30.0, -10.0, -10.0])?;

        assert_eq!(inside.clip_to(&frame), Some(inside));

        let clipped = sticking_out.clip_to(&frame).unwrap();
        assert_abs_diff_eq!(clipped.t(), 0.0);
        assert_abs_diff_eq!(clipped.l(), 90.0);
        assert_abs_diff_eq!(clipped.b(), 10.0);
        assert_abs_diff_eq!(clipped.r(), 100.0);

        assert!(outside.clip_to(&frame).is_none());
        Ok(())
    }
}
