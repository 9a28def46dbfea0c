//! Recipe combinators.
//!
//! Each combinator satisfies the [`Augmentation`] contract itself, so
//! composition nests arbitrarily. A combinator's own probability gates
//! the whole subtree; members keep their individual gates.

use super::{check_probability, fires, Augmentation, BoxedAugmentation};
use crate::{common::*, Sample};
use rand::distributions::WeightedIndex;
use rand::seq::index;

/// Applies every member in listed order.
#[derive(Debug)]
pub struct SequentialInit {
    pub p: R64,
    pub steps: Vec<BoxedAugmentation>,
}

impl SequentialInit {
    pub fn build(self) -> Result<Sequential> {
        let Self { p, steps } = self;
        Ok(Sequential {
            p: check_probability(p)?,
            steps,
        })
    }
}

#[derive(Debug)]
pub struct Sequential {
    p: f64,
    steps: Vec<BoxedAugmentation>,
}

impl Augmentation for Sequential {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        self.steps
            .iter()
            .try_fold(sample, |sample, step| step.forward(sample, rng))
    }
}

/// Applies exactly one member, chosen uniformly or by weight.
#[derive(Debug)]
pub struct PickOneInit {
    pub p: R64,
    pub choices: Vec<BoxedAugmentation>,
    pub weights: Option<Vec<R64>>,
}

impl PickOneInit {
    pub fn build(self) -> Result<PickOne> {
        let Self {
            p,
            choices,
            weights,
        } = self;

        ensure!(!choices.is_empty(), "PickOne requires at least one member");
        let weights = weights
            .map(|weights| -> Result<_> {
                ensure!(
                    weights.len() == choices.len(),
                    "expected {} weights, got {}",
                    choices.len(),
                    weights.len()
                );
                let weights: Vec<f64> = weights.iter().map(|w| w.raw()).collect();
                Ok(WeightedIndex::new(weights)?)
            })
            .transpose()?;

        Ok(PickOne {
            p: check_probability(p)?,
            choices,
            weights,
        })
    }
}

#[derive(Debug)]
pub struct PickOne {
    p: f64,
    choices: Vec<BoxedAugmentation>,
    weights: Option<WeightedIndex<f64>>,
}

impl Augmentation for PickOne {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let index = match &self.weights {
            Some(weights) => weights.sample(rng),
            None => rng.gen_range(0..self.choices.len()),
        };
        self.choices[index].forward(sample, rng)
    }
}

/// Applies exactly `n` distinct members, in their original relative order.
#[derive(Debug)]
pub struct PickNInit {
    pub p: R64,
    pub n: usize,
    pub choices: Vec<BoxedAugmentation>,
}

impl PickNInit {
    pub fn build(self) -> Result<PickN> {
        let Self { p, n, choices } = self;

        ensure!(
            n <= choices.len(),
            "cannot pick {} out of {} members",
            n,
            choices.len()
        );

        Ok(PickN {
            p: check_probability(p)?,
            n,
            choices,
        })
    }
}

#[derive(Debug)]
pub struct PickN {
    p: f64,
    n: usize,
    choices: Vec<BoxedAugmentation>,
}

impl Augmentation for PickN {
    fn forward(&self, sample: Sample, rng: &mut StdRng) -> Result<Sample> {
        if !fires(self.p, rng) {
            return Ok(sample);
        }
        let mut chosen = index::sample(rng, self.choices.len(), self.n).into_vec();
        chosen.sort_unstable();
        chosen
            .into_iter()
            .try_fold(sample, |sample, index| self.choices[index].forward(sample, rng))
    }
}
