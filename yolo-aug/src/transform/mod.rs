//! Probability-gated image+box transforms and their composition.

use crate::{common::*, Sample};

pub mod compose;
pub mod factory;
pub mod photometric;
pub mod preset;
pub mod spatial;
pub mod weather;

pub use compose::*;
pub use factory::*;
pub use photometric::*;
pub use preset::*;
pub use spatial::*;
pub use weather::*;

/// One atomic image+box transform.
///
/// Implementations consult their application probability once per
/// invocation: the whole primitive either fires or passes the sample
/// through unchanged. Spatial implementations must route surviving
/// boxes through [`BoxRules`](crate::BoxRules); photometric ones must
/// leave boxes untouched.
pub trait Augmentation: Debug + Send + Sync {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample>;
}

pub type BoxedAugmentation = Box<dyn Augmentation>;

/// Draw the per-invocation application gate.
pub(crate) fn fires(p: f64, rng: &mut StdRng) -> bool {
    p > 0.0 && rng.gen::<f64>() < p
}

/// Validate an application probability at construction time.
pub(crate) fn check_probability(p: R64) -> Result<f64> {
    ensure!(
        (0.0..=1.0).contains(&p.raw()),
        "probability must lie in [0, 1], got {}",
        p
    );
    Ok(p.raw())
}

/// A named, reusable transform pipeline.
///
/// Immutable once built; the only state shared between invocations is
/// the caller's RNG stream.
#[derive(Debug)]
pub struct Recipe {
    name: String,
    root: BoxedAugmentation,
}

impl Recipe {
    pub fn new(name: impl Into<String>, root: BoxedAugmentation) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        self.root.forward(sample, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_probability_never_fires() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(!fires(0.0, &mut rng));
        }
    }

    #[test]
    fn unit_probability_always_fires() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(fires(1.0, &mut rng));
        }
    }

    #[test]
    fn out_of_range_probability_is_a_config_error() {
        assert!(check_probability(r64(1.5)).is_err());
        assert!(check_probability(r64(-0.1)).is_err());
        assert!(check_probability(r64(0.5)).is_ok());
    }
}
