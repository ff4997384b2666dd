//! Per-unit outcomes and run summaries.

use super::Stage;
use std::fmt;
use std::path::PathBuf;

/// What happened to one (task, stage, scheme) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The artifact was generated and persisted.
    Completed { path: PathBuf },
    /// The artifact already existed; nothing was done.
    AlreadyDone,
    /// Not attempted: prerequisite missing, or claimed by another process.
    Skipped(String),
    /// Attempted and abandoned for this run.
    Failed(String),
}

impl UnitOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            UnitOutcome::Completed { .. } => "completed",
            UnitOutcome::AlreadyDone => "exists",
            UnitOutcome::Skipped(_) => "skipped",
            UnitOutcome::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitOutcome::Completed { path } => write!(f, "wrote {}", path.display()),
            UnitOutcome::AlreadyDone => f.write_str("already exists"),
            UnitOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            UnitOutcome::Failed(error) => write!(f, "FAILED: {}", error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub task: String,
    pub stage: Stage,
    pub scheme: Option<String>,
    pub outcome: UnitOutcome,
}

impl fmt::Display for UnitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:<7}] {}", self.stage.as_str(), self.task)?;
        if let Some(scheme) = &self.scheme {
            write!(f, " ({})", scheme)?;
        }
        write!(f, ": {}", self.outcome)
    }
}

/// Everything a run did, in execution order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub tasks: usize,
    pub units: Vec<UnitReport>,
    /// Tasks skipped because their descriptor could not be used.
    pub malformed: Vec<(String, String)>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units.iter().filter(|u| pred(&u.outcome)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Completed { .. }))
    }

    pub fn already_done(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::AlreadyDone))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Skipped(_)))
    }

    /// Failed units plus malformed descriptors.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UnitOutcome::Failed(_))) + self.malformed.len()
    }

    #[cfg(test)]
    pub fn outcomes_for(&self, task: &str) -> Vec<&UnitReport> {
        self.units.iter().filter(|u| u.task == task).collect()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} task(s): {} generated, {} already present, {} skipped, {} failed",
            self.tasks,
            self.completed(),
            self.already_done(),
            self.skipped(),
            self.failed()
        )
    }
}
