//! Command implementations for tintforge.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command resolves the project from `--root` or the
//! working directory before doing anything else.

mod init;
mod prompt;
mod recolor;
mod run;
mod status;
mod tasks;

use crate::cli::{Command, LockAction, LockClearArgs, LockCommand};
use crate::context::load_project;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event};
use crate::locks;
use serde_json::json;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(root: Option<&Path>, command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(root),
        Command::Run(args) => run::cmd_run(root, args),
        Command::Tasks => tasks::cmd_tasks(root),
        Command::Status => status::cmd_status(root),
        Command::Recolor(args) => recolor::cmd_recolor(root, args),
        Command::Prompt(args) => prompt::cmd_prompt(root, args),
        Command::Lock(lock_cmd) => dispatch_lock(root, lock_cmd),
    }
}

/// Dispatch lock subcommands.
fn dispatch_lock(root: Option<&Path>, lock_cmd: LockCommand) -> Result<()> {
    match lock_cmd.action {
        LockAction::List => cmd_lock_list(root),
        LockAction::Clear(args) => cmd_lock_clear(root, args),
    }
}

fn cmd_lock_list(root: Option<&Path>) -> Result<()> {
    let (ctx, config) = load_project(root)?;

    let locks = locks::list_locks(&ctx, &config)?;

    if locks.is_empty() {
        println!("No active claims.");
        return Ok(());
    }

    println!("Active claims ({}):", locks.len());
    println!();

    for lock in &locks {
        println!("  {}:", lock.name);
        if !lock.metadata.artifact.is_empty() {
            println!("    Artifact:   {}", lock.metadata.artifact);
        }
        println!("    Owner:      {}", lock.metadata.owner);
        if let Some(pid) = lock.metadata.pid {
            println!("    PID:        {}", pid);
        }
        println!(
            "    Created:    {}",
            lock.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("    Age:        {}", lock.metadata.age_string());
        println!("    Stage:      {}", lock.metadata.action);
        if lock.is_stale {
            println!(
                "    Status:     STALE (exceeds {} min threshold)",
                config.lock_stale_minutes
            );
        }
        println!("    Path:       {}", lock.path.display());
        println!();
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        println!(
            "Note: {} claim(s) are stale. Use `tintforge lock clear <name>` to clear.",
            stale_count
        );
    }

    Ok(())
}

fn cmd_lock_clear(root: Option<&Path>, args: LockClearArgs) -> Result<()> {
    let (ctx, config) = load_project(root)?;

    let cleared = locks::clear_lock(&ctx, &args.name, args.force, &config)?;

    let event = Event::new(EventAction::LockClear).with_details(json!({
        "claim": cleared.name,
        "artifact": cleared.metadata.artifact,
        "age_minutes": cleared.metadata.age().num_minutes(),
        "was_stale": cleared.is_stale,
        "force": args.force,
        "owner": cleared.metadata.owner,
        "stage": cleared.metadata.action
    }));

    // The claim is already gone; a logging failure must not turn that into an error.
    if let Err(e) = append_event(&ctx, &event) {
        eprintln!("Warning: failed to log lock_clear event: {}", e);
    }

    println!("Cleared claim: {}", cleared.name);
    println!();
    println!("Claim details:");
    println!("  Owner:      {}", cleared.metadata.owner);
    if let Some(pid) = cleared.metadata.pid {
        println!("  PID:        {}", pid);
    }
    println!(
        "  Created:    {}",
        cleared.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Age:        {}", cleared.metadata.age_string());
    println!("  Stage:      {}", cleared.metadata.action);
    if cleared.is_stale {
        println!("  Status:     was STALE");
    }
    println!("  Path:       {}", cleared.path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactKey;
    use crate::context::ProjectContext;
    use crate::config::Config;
    use crate::events::read_events;
    use crate::exit_codes;
    use crate::test_support::{TEST_CONFIG, create_test_project};

    fn project_context(root: &Path) -> ProjectContext {
        ProjectContext::new(root, &Config::from_yaml(TEST_CONFIG).unwrap())
    }

    #[test]
    fn lock_list_with_no_claims_succeeds() {
        let project = create_test_project(TEST_CONFIG);
        let result = dispatch(
            Some(project.path()),
            Command::Lock(LockCommand {
                action: LockAction::List,
            }),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn lock_clear_requires_force_for_fresh_claim() {
        let project = create_test_project(TEST_CONFIG);
        let ctx = project_context(project.path());
        let key = ArtifactKey::base("forest/owl");
        let claim = locks::acquire_artifact_claim(&ctx, &key, "ideate").unwrap();
        std::mem::forget(claim);

        let result = cmd_lock_clear(
            Some(project.path()),
            LockClearArgs {
                name: key.claim_name(),
                force: false,
            },
        );
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.to_string().contains("--force"));
        assert!(ctx.lock_path(&key.claim_name()).exists());
    }

    #[test]
    fn lock_clear_with_force_removes_claim_and_logs() {
        let project = create_test_project(TEST_CONFIG);
        let ctx = project_context(project.path());
        let key = ArtifactKey::final_image("forest/owl", "Dusk");
        let claim = locks::acquire_artifact_claim(&ctx, &key, "style").unwrap();
        std::mem::forget(claim);

        cmd_lock_clear(
            Some(project.path()),
            LockClearArgs {
                name: key.claim_name(),
                force: true,
            },
        )
        .unwrap();

        assert!(!ctx.lock_path(&key.claim_name()).exists());
        let events = read_events(&ctx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, EventAction::LockClear);
        assert_eq!(events[0].details["stage"], "style");
        assert_eq!(events[0].details["force"], true);
    }

    #[test]
    fn lock_clear_missing_claim_is_user_error() {
        let project = create_test_project(TEST_CONFIG);
        let result = cmd_lock_clear(
            Some(project.path()),
            LockClearArgs {
                name: "nope.base".to_string(),
                force: true,
            },
        );
        assert_eq!(result.unwrap_err().exit_code(), exit_codes::USER_ERROR);
    }
}
