//! Implementation of the `tintforge tasks` command.

use crate::context::load_project;
use crate::discovery::TaskDiscovery;
use crate::error::Result;
use std::path::Path;

/// Print every discovered task identifier in processing order.
pub fn cmd_tasks(root: Option<&Path>) -> Result<()> {
    let (ctx, config) = load_project(root)?;
    ctx.ensure_tasks_dir()?;

    let discovery = TaskDiscovery::new(&ctx.tasks_dir, &config);
    let ids: Vec<String> = discovery.tasks().map(|task| task.id).collect();

    if ids.is_empty() {
        println!("No tasks found under {}", discovery.root().display());
        return Ok(());
    }

    for id in &ids {
        println!("{}", id);
    }
    println!();
    println!("{} task(s)", ids.len());
    Ok(())
}
