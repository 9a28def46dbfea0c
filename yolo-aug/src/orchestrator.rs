//! Corpus-level augmentation loop.

use crate::{annotation::AnnotationSet, applier, common::*, transform::Recipe};

/// Artifact budget used when the caller does not give one.
pub const DEFAULT_ITERATIONS: usize = 300;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

#[derive(Debug)]
pub struct OrchestratorInit {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/generated`.
    pub output_dir: Option<PathBuf>,
    /// Maximum number of augmented images to produce.
    pub iterations: usize,
    /// Process images that have no label file instead of skipping them.
    pub include_unlabeled: bool,
    pub recipes: Vec<Recipe>,
}

impl OrchestratorInit {
    pub fn build(self) -> Result<Orchestrator> {
        let Self {
            input_dir,
            output_dir,
            iterations,
            include_unlabeled,
            recipes,
        } = self;

        ensure!(iterations > 0, "iteration budget must be positive");
        ensure!(!recipes.is_empty(), "at least one recipe is required");
        let output_dir = output_dir.unwrap_or_else(|| input_dir.join("generated"));

        Ok(Orchestrator {
            input_dir,
            output_dir,
            iterations,
            include_unlabeled,
            recipes,
        })
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    input_dir: PathBuf,
    output_dir: PathBuf,
    iterations: usize,
    include_unlabeled: bool,
    recipes: Vec<Recipe>,
}

/// Tally of one [`Orchestrator::run`] pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub requested: usize,
    pub produced: usize,
    pub visited: usize,
    pub skipped_unlabeled: usize,
    pub failed_applications: usize,
}

impl Orchestrator {
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// One pass over the corpus: visit shuffled images, apply every
    /// recipe to each, stop once the budget is met.
    ///
    /// An unreadable corpus or a recipe failing on one image never
    /// fails the pass; such items are logged, counted and skipped.
    pub fn run(&self, rng: &mut StdRng) -> Result<RunSummary> {
        let mut summary = RunSummary {
            requested: self.iterations,
            ..RunSummary::default()
        };

        let mut images = match self.discover_images() {
            Ok(images) => images,
            Err(err) => {
                error!(
                    "cannot scan input directory '{}': {:#}",
                    self.input_dir.display(),
                    err
                );
                return Ok(summary);
            }
        };
        if images.is_empty() {
            error!("no images found under '{}'", self.input_dir.display());
            return Ok(summary);
        }

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "failed to create output directory '{}'",
                self.output_dir.display()
            )
        })?;

        images.shuffle(rng);
        info!(
            "producing up to {} artifacts from {} images into '{}'",
            self.iterations,
            images.len(),
            self.output_dir.display()
        );

        for image_path in &images {
            if summary.produced >= self.iterations {
                break;
            }
            summary.visited += 1;

            let annotations = match AnnotationSet::load_for_image(image_path) {
                Ok(annotations) => annotations,
                Err(err) => {
                    summary.failed_applications += 1;
                    error!("skipping '{}': {:#}", image_path.display(), err);
                    continue;
                }
            };

            if !annotations.exists() && !self.include_unlabeled {
                summary.skipped_unlabeled += 1;
                warn!("skipping unlabeled image '{}'", image_path.display());
                continue;
            }

            for recipe in &self.recipes {
                if summary.produced >= self.iterations {
                    break;
                }
                match applier::augment_image(
                    image_path,
                    &self.output_dir,
                    &annotations,
                    recipe,
                    rng,
                ) {
                    Ok(artifact) => {
                        summary.produced += 1;
                        info!(
                            "[{}/{}] {}: {} -> {}",
                            summary.produced,
                            self.iterations,
                            recipe.name(),
                            image_path.display(),
                            artifact.display()
                        );
                    }
                    Err(err) => {
                        summary.failed_applications += 1;
                        error!(
                            "recipe '{}' failed on '{}': {:#}",
                            recipe.name(),
                            image_path.display(),
                            err
                        );
                    }
                }
            }
        }

        if summary.produced < summary.requested {
            warn!(
                "produced {} of {} requested artifacts",
                summary.produced, summary.requested
            );
        }
        Ok(summary)
    }

    /// Non-recursive scan of the input directory for image files,
    /// ignoring dotfiles. Sorted so shuffling is the only source of
    /// ordering randomness.
    fn discover_images(&self) -> Result<Vec<PathBuf>> {
        let mut images = Vec::new();
        let entries = fs::read_dir(&self.input_dir)
            .with_context(|| format!("failed to read '{}'", self.input_dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(true, |name| name.starts_with('.'));
            if hidden {
                continue;
            }
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| {
                    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                });
            if is_image {
                images.push(path);
            }
        }

        images.sort();
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::compose::SequentialInit;

    fn identity_recipes() -> Result<Vec<Recipe>> {
        let root = SequentialInit {
            p: r64(1.0),
            steps: Vec::new(),
        }
        .build()?;
        Ok(vec![Recipe::new("identity", Box::new(root))])
    }

    #[test]
    fn missing_input_directory_yields_an_empty_summary() -> Result<()> {
        let orchestrator = OrchestratorInit {
            input_dir: PathBuf::from("/nonexistent/corpus"),
            output_dir: None,
            iterations: 5,
            include_unlabeled: false,
            recipes: identity_recipes()?,
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(0);
        let summary = orchestrator.run(&mut rng)?;
        assert_eq!(summary.produced, 0);
        assert_eq!(summary.visited, 0);
        Ok(())
    }

    #[test]
    fn empty_input_directory_yields_an_empty_summary() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let orchestrator = OrchestratorInit {
            input_dir: dir.path().to_owned(),
            output_dir: None,
            iterations: 5,
            include_unlabeled: false,
            recipes: identity_recipes()?,
        }
        .build()?;

        let mut rng = StdRng::seed_from_u64(0);
        let summary = orchestrator.run(&mut rng)?;
        assert_eq!(summary, RunSummary {
            requested: 5,
            ..RunSummary::default()
        });
        Ok(())
    }

    #[test]
    fn zero_budget_fails_at_construction() -> Result<()> {
        let result = OrchestratorInit {
            input_dir: PathBuf::from("."),
            output_dir: None,
            iterations: 0,
            include_unlabeled: false,
            recipes: identity_recipes()?,
        }
        .build();
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn dotfiles_and_non_images_are_not_discovered() -> Result<()> {
        let dir = tempfile::tempdir()?;
        RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])).save(dir.path().join("keep.jpg"))?;
        fs::write(dir.path().join(".hidden.jpg"), b"x")?;
        fs::write(dir.path().join("notes.txt"), b"x")?;

        let orchestrator = OrchestratorInit {
            input_dir: dir.path().to_owned(),
            output_dir: None,
            iterations: 1,
            include_unlabeled: true,
            recipes: identity_recipes()?,
        }
        .build()?;

        let images = orchestrator.discover_images()?;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_name().unwrap(), "keep.jpg");
        Ok(())
    }
}
