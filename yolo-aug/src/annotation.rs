//! Per-image annotation sets in the YOLO sibling-file layout.

use crate::common::*;

/// Supported on-disk annotation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationFormat {
    Yolo,
}

/// The label set attached to one source image.
///
/// `exists == false` means no label file accompanies the image. That is
/// a legitimate state, not an error: the image is merely unlabeled, and
/// persistence must skip the annotation artifact while still writing
/// the augmented image.
#[derive(Debug, Clone)]
pub struct AnnotationSet {
    image_path: PathBuf,
    format: AnnotationFormat,
    boxes: Vec<RatioLabel>,
    exists: bool,
}

impl AnnotationSet {
    /// Read the sibling `.txt` label file of an image, if any.
    pub fn load_for_image(image_path: impl AsRef<Path>) -> Result<Self> {
        let image_path = image_path.as_ref().to_owned();
        let label_path = image_path.with_extension("txt");

        if !label_path.is_file() {
            return Ok(Self {
                image_path,
                format: AnnotationFormat::Yolo,
                boxes: Vec::new(),
                exists: false,
            });
        }

        let text = fs::read_to_string(&label_path)
            .with_context(|| format!("failed to read '{}'", label_path.display()))?;
        let boxes: Vec<_> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(label::parse_line)
            .try_collect()
            .with_context(|| format!("malformed annotation file '{}'", label_path.display()))?;

        Ok(Self {
            image_path,
            format: AnnotationFormat::Yolo,
            boxes,
            exists: true,
        })
    }

    /// Derive the post-transform annotation set, inheriting format and
    /// the `exists` flag.
    pub fn derive(&self, boxes: Vec<RatioLabel>) -> Self {
        Self {
            image_path: self.image_path.clone(),
            format: self.format,
            boxes,
            exists: self.exists,
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn format(&self) -> AnnotationFormat {
        self.format
    }

    pub fn boxes(&self) -> &[RatioLabel] {
        &self.boxes
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Write the label file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text: String = self
            .boxes
            .iter()
            .map(|label| format!("{}\n", label::format_line(label)))
            .collect();
        fs::write(path, text).with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }
}
