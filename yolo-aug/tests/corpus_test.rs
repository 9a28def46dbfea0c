use anyhow::{bail, Result};
use image::{Rgb, RgbImage};
use noisy_float::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::{fs, path::Path};
use yolo_aug::{
    transform::SequentialInit, Augmentation, OrchestratorInit, Recipe, Sample,
};

fn identity_recipe() -> Result<Recipe> {
    let root = SequentialInit {
        p: r64(1.0),
        steps: Vec::new(),
    }
    .build()?;
    Ok(Recipe::new("identity", Box::new(root)))
}

#[derive(Debug)]
struct AlwaysFails;

impl Augmentation for AlwaysFails {
    fn forward(&self, _sample: Sample, _rng: &mut StdRng) -> Result<Sample> {
        bail!("synthetic failure")
    }
}

fn write_corpus(dir: &Path, count: usize, labeled: bool) -> Result<()> {
    for index in 0..count {
        let image_path = dir.join(format!("img-{:02}.jpg", index));
        RgbImage::from_pixel(32, 32, Rgb([index as u8, 100, 200])).save(&image_path)?;
        if labeled {
            fs::write(
                image_path.with_extension("txt"),
                "0 0.500000 0.500000 0.250000 0.250000\n",
            )?;
        }
    }
    Ok(())
}

fn artifact_counts(dir: &Path) -> Result<(usize, usize)> {
    let mut images = 0;
    let mut labels = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpeg") => images += 1,
            Some("txt") => labels += 1,
            _ => {}
        }
    }
    Ok((images, labels))
}

#[test]
fn run_stops_exactly_at_the_budget() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_corpus(dir.path(), 10, true)?;

    let orchestrator = OrchestratorInit {
        input_dir: dir.path().to_owned(),
        output_dir: None,
        iterations: 3,
        include_unlabeled: false,
        recipes: vec![identity_recipe()?],
    }
    .build()?;

    let mut rng = StdRng::seed_from_u64(42);
    let summary = orchestrator.run(&mut rng)?;

    assert_eq!(summary.produced, 3);
    assert!(summary.visited <= 3);
    assert_eq!(summary.failed_applications, 0);

    let (images, labels) = artifact_counts(&dir.path().join("generated"))?;
    assert_eq!(images, 3);
    assert_eq!(labels, 3);
    Ok(())
}

#[test]
fn failing_recipe_never_aborts_the_pass() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_corpus(dir.path(), 4, true)?;

    let orchestrator = OrchestratorInit {
        input_dir: dir.path().to_owned(),
        output_dir: None,
        iterations: 10,
        include_unlabeled: false,
        recipes: vec![Recipe::new("broken", Box::new(AlwaysFails))],
    }
    .build()?;

    let mut rng = StdRng::seed_from_u64(7);
    let summary = orchestrator.run(&mut rng)?;

    assert_eq!(summary.produced, 0);
    assert_eq!(summary.visited, 4);
    assert_eq!(summary.failed_applications, 4);
    Ok(())
}

#[test]
fn unlabeled_images_are_gated_by_the_flag() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_corpus(dir.path(), 2, false)?;

    // Default: unlabeled inputs are skipped.
    let skipping = OrchestratorInit {
        input_dir: dir.path().to_owned(),
        output_dir: Some(dir.path().join("skipped")),
        iterations: 5,
        include_unlabeled: false,
        recipes: vec![identity_recipe()?],
    }
    .build()?;
    let summary = skipping.run(&mut StdRng::seed_from_u64(1))?;
    assert_eq!(summary.produced, 0);
    assert_eq!(summary.skipped_unlabeled, 2);

    // Opted in: images are written, label files are not.
    let including = OrchestratorInit {
        input_dir: dir.path().to_owned(),
        output_dir: Some(dir.path().join("included")),
        iterations: 5,
        include_unlabeled: true,
        recipes: vec![identity_recipe()?],
    }
    .build()?;
    let summary = including.run(&mut StdRng::seed_from_u64(1))?;
    assert_eq!(summary.produced, 2);
    assert_eq!(summary.skipped_unlabeled, 0);

    let (images, labels) = artifact_counts(&dir.path().join("included"))?;
    assert_eq!(images, 2);
    assert_eq!(labels, 0);
    Ok(())
}

#[test]
fn identical_seeds_reproduce_the_artifact_names() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_corpus(dir.path(), 5, true)?;

    let run_once = |output: &Path| -> Result<Vec<String>> {
        let orchestrator = OrchestratorInit {
            input_dir: dir.path().to_owned(),
            output_dir: Some(output.to_owned()),
            iterations: 4,
            include_unlabeled: false,
            recipes: vec![identity_recipe()?],
        }
        .build()?;
        orchestrator.run(&mut StdRng::seed_from_u64(99))?;

        let mut names: Vec<String> = fs::read_dir(output)?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect::<Result<_>>()?;
        names.sort();
        Ok(names)
    };

    let first = run_once(&dir.path().join("run-a"))?;
    let second = run_once(&dir.path().join("run-b"))?;
    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
    Ok(())
}
