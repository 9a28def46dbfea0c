//! Runs one recipe against one image and persists the artifact pair.

use crate::{annotation::AnnotationSet, common::*, transform::Recipe, Sample};

/// Apply `recipe` to the image at `image_path` and write the augmented
/// image (plus its label file, when the source is labeled) under
/// `output_dir`. Returns the path of the written image.
///
/// The artifact name is a fresh 160-bit random hex token, so repeated
/// applications to the same source never collide in practice.
pub fn augment_image(
    image_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    annotations: &AnnotationSet,
    recipe: &Recipe,
    rng: &mut StdRng,
) -> Result<PathBuf> {
    let image_path = image_path.as_ref();
    let output_dir = output_dir.as_ref();

    let image = image::open(image_path)
        .with_context(|| format!("failed to load image '{}'", image_path.display()))?;
    let sample = Sample::new(image, annotations.boxes().to_vec());
    let output = recipe.run(sample, rng)?;

    let stem = random_artifact_id(rng);
    let image_out = output_dir.join(format!("{}.jpeg", stem));
    output
        .image
        .to_rgb8()
        .save(&image_out)
        .with_context(|| format!("failed to write '{}'", image_out.display()))?;

    if annotations.exists() {
        let label_out = output_dir.join(format!("{}.txt", stem));
        annotations.derive(output.boxes).save(&label_out)?;
    }

    Ok(image_out)
}

/// 40 lowercase hex digits drawn from the caller's RNG stream.
fn random_artifact_id(rng: &mut StdRng) -> String {
    let bytes: [u8; 20] = rng.gen();
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
