//! Staged generation pipeline.
//!
//! Every task moves through up to three stages, each producing one artifact
//! per unit:
//!
//! - **ideate**: text-conditioned generation of the base image
//! - **style**: per color scheme, recolor the base image onto the palette and
//!   regenerate it image-conditioned into the scheme's final image
//! - **variant** (optional): per scheme, regenerate the final image with a
//!   style adapter into a stylized variant
//!
//! A unit runs only when its own artifact is missing and its prerequisite
//! artifact exists. Failures stay local to their unit; the run always
//! continues with the next one.

mod orchestrator;
mod report;


pub use orchestrator::StageOrchestrator;
pub use report::{RunReport, UnitOutcome, UnitReport};

use std::fmt;

/// One step of a task's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Ideate,
    Style,
    Variant,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Ideate => "ideate",
            Stage::Style => "style",
            Stage::Variant => "variant",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which parts of the pipeline a run covers. Empty lists mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub stages: Vec<Stage>,
    pub schemes: Vec<String>,
}

impl RunOptions {
    pub fn includes_stage(&self, stage: Stage) -> bool {
        self.stages.is_empty() || self.stages.contains(&stage)
    }

    pub fn includes_scheme(&self, scheme: &str) -> bool {
        self.schemes.is_empty() || self.schemes.iter().any(|s| s == scheme)
    }
}
