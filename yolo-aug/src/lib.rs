//! The building blocks of the detection corpus augmenter.

mod common;

pub mod annotation;
pub mod applier;
pub mod orchestrator;
pub mod sample;
pub mod sanitize;
pub mod transform;

pub use annotation::{AnnotationFormat, AnnotationSet};
pub use applier::augment_image;
pub use orchestrator::{Orchestrator, OrchestratorInit, RunSummary, DEFAULT_ITERATIONS};
pub use sample::Sample;
pub use sanitize::{BoxRules, BoxRulesInit};
pub use transform::{Augmentation, BoxedAugmentation, Recipe};
