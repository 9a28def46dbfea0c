use anyhow::{bail, Result};
use log::info;
use noisy_float::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use structopt::StructOpt;
use yolo_aug::{transform::factory, OrchestratorInit, Recipe, DEFAULT_ITERATIONS};

#[derive(Debug, Clone, StructOpt)]
/// Produce augmented copies of a YOLO-labeled image corpus.
struct Args {
    /// corpus directory containing images and sibling label files
    #[structopt(short = "i", long)]
    input: PathBuf,
    /// output directory, defaults to <input>/generated
    #[structopt(short = "o", long)]
    output: Option<PathBuf>,
    /// number of augmented images to produce
    #[structopt(short = "n", long)]
    iterations: Option<usize>,
    /// also augment images that have no label file
    #[structopt(long)]
    include_unlabeled: bool,
    /// RNG seed for reproducible runs
    #[structopt(long)]
    seed: Option<u64>,

    /// combined shape and color mixture
    #[structopt(short = "a", long)]
    all: bool,
    /// geometric mixture only
    #[structopt(long = "augment-shape")]
    augment_shape: bool,
    /// photometric mixture only
    #[structopt(long = "augment-color")]
    augment_color: bool,
    /// random crop of the given width, height derived at 16:9
    #[structopt(long)]
    crop: Option<u32>,
    /// rotate by a random angle within the given bound, in degrees
    #[structopt(long)]
    rotate: Option<f64>,
    /// same as --rotate, kept as a separate switch
    #[structopt(long)]
    randrotate: Option<f64>,
    /// random horizontal and vertical mirroring
    #[structopt(long)]
    flip: bool,
    /// random brightness lift
    #[structopt(long)]
    brighten: bool,
    /// random brightness drop
    #[structopt(long)]
    darken: bool,
    /// camera sensor noise
    #[structopt(long)]
    isonoise: bool,
    /// harsh JPEG re-encoding
    #[structopt(long)]
    compression: bool,
    /// downscale-upscale detail loss
    #[structopt(long)]
    degrade: bool,
    /// gaussian blur
    #[structopt(long)]
    blur: bool,
    /// median blur
    #[structopt(short = "m", long = "medianblur")]
    median_blur: bool,
    /// snow flecks
    #[structopt(long)]
    snow: bool,
    /// rain streaks
    #[structopt(long)]
    rain: bool,
    /// haze overlay
    #[structopt(long)]
    fog: bool,
    /// mud spatter
    #[structopt(long)]
    spatter: bool,
    /// black occlusion squares of the given side length
    #[structopt(long)]
    blackboxing: Option<u32>,
    /// lens flare
    #[structopt(long)]
    sunflare: bool,
    /// night-vision tint
    #[structopt(long)]
    night: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = Args::from_args();
    let recipes = build_recipes(&args)?;
    if recipes.is_empty() {
        bail!("no augmentation selected; pass --all or at least one effect switch");
    }

    let iterations = args.iterations.unwrap_or(DEFAULT_ITERATIONS);
    let orchestrator = OrchestratorInit {
        input_dir: args.input,
        output_dir: args.output,
        iterations,
        include_unlabeled: args.include_unlabeled,
        recipes,
    }
    .build()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let summary = orchestrator.run(&mut rng)?;
    info!(
        "done: {} artifacts produced ({} requested, {} images visited, {} unlabeled skipped, {} failed applications)",
        summary.produced,
        summary.requested,
        summary.visited,
        summary.skipped_unlabeled,
        summary.failed_applications
    );

    Ok(())
}

fn build_recipes(args: &Args) -> Result<Vec<Recipe>> {
    let mut recipes = Vec::new();

    if args.all {
        recipes.push(factory::all()?);
    }
    if args.augment_shape {
        recipes.push(factory::shape()?);
    }
    if args.augment_color {
        recipes.push(factory::color()?);
    }
    if let Some(width) = args.crop {
        recipes.push(factory::crop(width)?);
    }
    if let Some(degrees) = args.rotate {
        recipes.push(factory::rotate(r64(degrees))?);
    }
    if let Some(degrees) = args.randrotate {
        recipes.push(factory::random_rotate(r64(degrees))?);
    }
    if args.flip {
        recipes.push(factory::flip()?);
    }
    if args.brighten {
        recipes.push(factory::brighten()?);
    }
    if args.darken {
        recipes.push(factory::darken()?);
    }
    if args.isonoise {
        recipes.push(factory::isonoise()?);
    }
    if args.compression {
        recipes.push(factory::compression()?);
    }
    if args.degrade {
        recipes.push(factory::degrade()?);
    }
    if args.blur {
        recipes.push(factory::blur()?);
    }
    if args.median_blur {
        recipes.push(factory::median_blur()?);
    }
    if args.snow {
        recipes.push(factory::snow()?);
    }
    if args.rain {
        recipes.push(factory::rain()?);
    }
    if args.fog {
        recipes.push(factory::fog()?);
    }
    if args.spatter {
        recipes.push(factory::spatter()?);
    }
    if let Some(size) = args.blackboxing {
        recipes.push(factory::blackboxing(size)?);
    }
    if args.sunflare {
        recipes.push(factory::sunflare()?);
    }
    if args.night {
        recipes.push(factory::night()?);
    }

    Ok(recipes)
}
