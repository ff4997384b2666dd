//! Project context resolution for tintforge.
//!
//! This module finds the project root (the nearest directory at or above the
//! working directory holding `tintforge.yaml`) and resolves every path the
//! pipeline reads or writes. All commands go through here so the task tree,
//! artifact directories and tool state always agree with the configuration.

use crate::config::Config;
use crate::error::{ForgeError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Config file name at the project root.
pub const CONFIG_FILE_NAME: &str = "tintforge.yaml";

/// Tool state directory name at the project root.
pub const STATE_DIR_NAME: &str = ".tintforge";

/// Resolved paths for a tintforge project. All paths are absolute when the
/// root was resolved from the working directory.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project root (holds `tintforge.yaml`).
    pub root: PathBuf,

    /// Root of the task tree; fragments never resolve above it.
    pub tasks_dir: PathBuf,

    /// Recolored intermediates, one subtree per color scheme.
    pub recolored_dir: PathBuf,

    /// Final and variant images, one subtree per color scheme.
    pub output_dir: PathBuf,

    /// Tool state (`.tintforge/`).
    pub state_dir: PathBuf,

    /// Artifact claim files.
    pub locks_dir: PathBuf,
}

impl ProjectContext {
    /// Build a context for `root` using the layout from `config`.
    pub fn new<P: AsRef<Path>>(root: P, config: &Config) -> Self {
        let root = root.as_ref().to_path_buf();
        let state_dir = root.join(STATE_DIR_NAME);

        Self {
            tasks_dir: root.join(&config.tasks_dir),
            recolored_dir: root.join(&config.recolored_dir),
            output_dir: root.join(&config.output_dir),
            locks_dir: state_dir.join("locks"),
            state_dir,
            root,
        }
    }

    /// Find the project root starting from `start`.
    ///
    /// Walks upward looking for `tintforge.yaml`; when none is found the
    /// starting directory itself is the root (all defaults apply).
    pub fn find_root<P: AsRef<Path>>(start: P) -> PathBuf {
        let start = start.as_ref();
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
            .unwrap_or(start)
            .to_path_buf()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Get the path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.state_dir.join("events")
    }

    /// Get the path to the main events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }

    /// Get the path to a lock file by lock name.
    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.locks_dir.join(format!("{}.lock", name))
    }

    /// Ensure the task tree root exists.
    ///
    /// A missing task tree is the one input problem that aborts a whole run.
    pub fn ensure_tasks_dir(&self) -> Result<()> {
        if !self.tasks_dir.is_dir() {
            return Err(ForgeError::UserError(format!(
                "task directory not found.\n\
                 Expected: {}\n\n\
                 Run `tintforge init` or set `tasks_dir` in {}.",
                self.tasks_dir.display(),
                CONFIG_FILE_NAME
            )));
        }
        Ok(())
    }
}

/// Resolve the project root from `--root` or the current directory, then
/// load its configuration (defaults when no config file exists).
pub fn load_project(root: Option<&Path>) -> Result<(ProjectContext, Config)> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => {
            let cwd = env::current_dir().map_err(|e| {
                ForgeError::UserError(format!("failed to get current working directory: {}", e))
            })?;
            ProjectContext::find_root(cwd)
        }
    };

    let config = Config::load_or_default(root.join(CONFIG_FILE_NAME))?;
    let ctx = ProjectContext::new(&root, &config);
    Ok((ctx, config))
}
