use crate::common::*;

/// One in-flight (image, box set) pair.
///
/// Boxes are always kept in the normalized frame of the image they
/// accompany. Transforms consume a sample and produce a new one.
#[derive(Debug, Clone)]
pub struct Sample {
    pub image: DynamicImage,
    pub boxes: Vec<RatioLabel>,
}

impl Sample {
    pub fn new(image: DynamicImage, boxes: Vec<RatioLabel>) -> Self {
        Self { image, boxes }
    }

    /// Image size in pixels as floats.
    pub fn size(&self) -> HW<f64> {
        let (w, h) = self.image.dimensions();
        HW::from_hw([h as f64, w as f64])
    }
}
