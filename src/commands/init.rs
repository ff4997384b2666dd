//! Implementation of the `tintforge init` command.
//!
//! # What `tintforge init` does
//!
//! 1. Writes a default `tintforge.yaml` at the project root (if missing)
//! 2. Creates the task tree root (default: `ImgIdeas/`)
//! 3. Creates the tool state directories `.tintforge/locks/` and `.tintforge/events/`
//! 4. Records an `init` event

use crate::config::Config;
use crate::context::{CONFIG_FILE_NAME, ProjectContext};
use crate::error::{ForgeError, Result};
use crate::events::{Event, EventAction, record_event};
use crate::fs::atomic_write_file;
use serde_json::json;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Execute the `tintforge init` command.
///
/// This command is **idempotent**: an existing configuration is loaded and
/// validated, never overwritten.
pub fn cmd_init(root: Option<&Path>) -> Result<()> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => env::current_dir().map_err(|e| {
            ForgeError::UserError(format!("failed to get current working directory: {}", e))
        })?,
    };

    let config_path = root.join(CONFIG_FILE_NAME);
    let config_created = !config_path.exists();
    let config = if config_created {
        let config = Config::default();
        atomic_write_file(&config_path, &config.to_yaml()?)?;
        config
    } else {
        Config::load(&config_path)?
    };

    let ctx = ProjectContext::new(&root, &config);
    let created = create_project_dirs(&ctx)?;

    record_event(
        &ctx,
        &Event::new(EventAction::Init).with_details(json!({
            "config_created": config_created,
            "created_dirs": created.iter().map(|p| p.display().to_string()).collect::<Vec<_>>()
        })),
    );

    println!("Initialized tintforge project.");
    println!();
    println!("Project root: {}", ctx.root.display());
    if config_created {
        println!("Config:       {} (created)", config_path.display());
    } else {
        println!("Config:       {} (existing, kept)", config_path.display());
    }
    println!("Tasks:        {}", ctx.tasks_dir.display());
    println!(
        "Schemes:      {}",
        config.color_schemes.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    println!();
    println!("Next steps:");
    println!("  1. Add idea descriptors (*.{}) under the task tree", config.descriptor_extension);
    println!("  2. Start the generation backend at {}", config.api_url);
    println!("  3. Run `tintforge run`");

    Ok(())
}

/// Create every directory the pipeline expects, returning the ones that
/// did not exist yet.
fn create_project_dirs(ctx: &ProjectContext) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in [&ctx.tasks_dir, &ctx.locks_dir, &ctx.events_dir()] {
        if dir.is_dir() {
            continue;
        }
        fs::create_dir_all(dir).map_err(|e| {
            ForgeError::UserError(format!(
                "failed to create directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        created.push(dir.to_path_buf());
    }
    Ok(created)
}
