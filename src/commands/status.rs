//! Implementation of the `tintforge status` command.
//!
//! Shows, for every task, which of its artifacts already exist, plus
//! per-scheme totals and any outstanding claims. Nothing is generated.

use crate::artifacts::{ArtifactKey, ArtifactStore, FsArtifactStore};
use crate::config::Config;
use crate::context::{ProjectContext, load_project};
use crate::discovery::TaskDiscovery;
use crate::error::Result;
use crate::locks;
use std::collections::BTreeMap;
use std::path::Path;

/// Artifact presence for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TaskStatus {
    id: String,
    has_base: bool,
    /// Scheme name to (final present, variant present).
    schemes: BTreeMap<String, (bool, bool)>,
}

impl TaskStatus {
    fn is_complete(&self, variant_enabled: bool) -> bool {
        self.has_base
            && self
                .schemes
                .values()
                .all(|&(has_final, has_variant)| has_final && (!variant_enabled || has_variant))
    }
}

/// Execute the `tintforge status` command.
pub fn cmd_status(root: Option<&Path>) -> Result<()> {
    let (ctx, config) = load_project(root)?;
    let statuses = collect_status(&ctx, &config)?;
    let variant_enabled = config.variant.enabled;

    println!("Project Status");
    println!("==============");
    println!();
    println!("Tasks:   {}", ctx.tasks_dir.display());
    println!("Output:  {}", ctx.output_dir.display());
    println!();

    if statuses.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let width = statuses.iter().map(|s| s.id.len()).max().unwrap_or(0).max(4);
    for status in &statuses {
        let mut line = format!(
            "  {:width$}  base {}",
            status.id,
            mark(status.has_base),
            width = width
        );
        for (scheme, &(has_final, has_variant)) in &status.schemes {
            line.push_str(&format!("  {} {}", scheme, mark(has_final)));
            if variant_enabled {
                line.push_str(&format!("/{}", mark(has_variant)));
            }
        }
        println!("{}", line);
    }
    println!();

    let total = statuses.len();
    println!("Summary:");
    println!(
        "  {:16} {:>4}/{}",
        "base",
        statuses.iter().filter(|s| s.has_base).count(),
        total
    );
    for scheme in config.color_schemes.keys() {
        let finals = statuses
            .iter()
            .filter(|s| s.schemes.get(scheme).is_some_and(|&(f, _)| f))
            .count();
        println!("  {:16} {:>4}/{}", scheme, finals, total);
        if variant_enabled {
            let variants = statuses
                .iter()
                .filter(|s| s.schemes.get(scheme).is_some_and(|&(_, v)| v))
                .count();
            println!(
                "  {:16} {:>4}/{}",
                format!("{} {}", scheme, config.variant.suffix),
                variants,
                total
            );
        }
    }
    let complete = statuses
        .iter()
        .filter(|s| s.is_complete(variant_enabled))
        .count();
    println!("  {:16} {:>4}/{}", "complete", complete, total);

    let claims = locks::list_locks(&ctx, &config)?;
    if !claims.is_empty() {
        println!();
        println!("{} artifact(s) currently claimed:", claims.len());
        for claim in &claims {
            let stale_marker = if claim.is_stale { " [STALE]" } else { "" };
            println!(
                "  - {} (by {}, {} ago, stage: {}){}",
                claim.metadata.artifact,
                claim.metadata.owner,
                claim.metadata.age_string(),
                claim.metadata.action,
                stale_marker
            );
        }
    }

    Ok(())
}

fn mark(present: bool) -> &'static str {
    if present { "yes" } else { "-" }
}

fn collect_status(ctx: &ProjectContext, config: &Config) -> Result<Vec<TaskStatus>> {
    ctx.ensure_tasks_dir()?;

    let store = FsArtifactStore::new(ctx, config);
    let discovery = TaskDiscovery::new(&ctx.tasks_dir, config);

    Ok(discovery
        .tasks()
        .map(|task| TaskStatus {
            has_base: store.exists(&ArtifactKey::base(&task.id)),
            schemes: config
                .color_schemes
                .keys()
                .map(|scheme| {
                    let has_final = store.exists(&ArtifactKey::final_image(&task.id, scheme));
                    let has_variant = store.exists(&ArtifactKey::variant(&task.id, scheme));
                    (scheme.clone(), (has_final, has_variant))
                })
                .collect(),
            id: task.id,
        })
        .collect())
}
