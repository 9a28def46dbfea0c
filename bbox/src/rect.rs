use super::{CyCxHW, TLBR};
use crate::common::*;

/// The generic rectangle.
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_cycxhw(cycxhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

/// Derived rectangle operations.
pub trait RectExt: Rect
where
    Self::Type: Num + PartialOrd + Copy,
{
    fn from_tlbr(tlbr: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_tlbr(tlbr).unwrap()
    }

    fn from_cycxhw(cycxhw: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_cycxhw(cycxhw).unwrap()
    }

    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    fn cycxhw(&self) -> [Self::Type; 4] {
        [self.cy(), self.cx(), self.h(), self.w()]
    }

    fn to_tlbr(&self) -> TLBR<Self::Type> {
        TLBR::from_tlbr(self.tlbr())
    }

    fn to_cycxhw(&self) -> CyCxHW<Self::Type> {
        CyCxHW::from_cycxhw(self.cycxhw())
    }

    fn area(&self) -> Self::Type {
        self.h() * self.w()
    }

    /// Compute the intersection with another rectangle, if it is non-empty.
    fn intersect_with<R>(&self, other: &R) -> Option<TLBR<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let t = partial_max(self.t(), other.t());
        let l = partial_max(self.l(), other.l());
        let b = partial_min(self.b(), other.b());
        let r = partial_min(self.r(), other.r());
        (b > t && r > l).then(|| TLBR::from_tlbr([t, l, b, r]))
    }

    fn intersection_area_with<R>(&self, other: &R) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        self.intersect_with(other)
            .map(|rect| rect.area())
            .unwrap_or_else(Self::Type::zero)
    }
}

impl<T> RectExt for T
where
    T: Rect,
    T::Type: Num + PartialOrd + Copy,
{
}

fn partial_max<T>(lhs: T, rhs: T) -> T
where
    T: PartialOrd,
{
    if rhs > lhs {
        rhs
    } else {
        lhs
    }
}

fn partial_min<T>(lhs: T, rhs: T) -> T
where
    T: PartialOrd,
{
    if rhs < lhs {
        rhs
    } else {
        lhs
    }
}
