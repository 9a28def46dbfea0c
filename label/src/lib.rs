//! Labeled bounding boxes and the YOLO annotation line format.

use bbox::{CyCxHW, Rect, Transform};
use num_traits::Num;

pub use yolo::*;
mod yolo;

/// A bounding box with an attached class.
#[derive(Debug, Clone, PartialEq)]
pub struct Label<R, C>
where
    R: Rect,
{
    pub rect: R,
    pub class: C,
}

/// A box in normalized image coordinates, each field in `[0, 1]`.
pub type RatioLabel = Label<CyCxHW<f64>, usize>;

impl<T, C> Label<CyCxHW<T>, C>
where
    T: Copy + Num + PartialOrd,
    C: Copy,
{
    /// Re-express the box through a scale-translate transform, keeping
    /// the class.
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        Self {
            rect: self.rect.transform(transform),
            class: self.class,
        }
    }
}
