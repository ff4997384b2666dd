//! Implementation of the `tintforge run` command.

use crate::artifacts::FsArtifactStore;
use crate::backend::{GenerationBackend, HttpBackend};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::context::{ProjectContext, load_project};
use crate::error::{ForgeError, Result};
use crate::pipeline::{RunOptions, RunReport, StageOrchestrator};
use std::path::Path;
use std::time::Duration;

/// Execute the `tintforge run` command against the configured HTTP backend.
pub fn cmd_run(root: Option<&Path>, args: RunArgs) -> Result<()> {
    let (ctx, config) = load_project(root)?;
    let backend = HttpBackend::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_seconds),
    )?;

    run_with_backend(&ctx, &config, &backend, args).map(|_| ())
}

/// Run the pipeline and print the summary.
///
/// Failed units only fail the command under `--strict`.
fn run_with_backend(
    ctx: &ProjectContext,
    config: &Config,
    backend: &dyn GenerationBackend,
    args: RunArgs,
) -> Result<RunReport> {
    let options = RunOptions {
        stages: args.stages.into_iter().map(Into::into).collect(),
        schemes: args.schemes,
    };

    let store = FsArtifactStore::new(ctx, config);
    let orchestrator = StageOrchestrator::new(ctx, config, backend, &store)?;

    println!("Processing tasks under {}", ctx.tasks_dir.display());
    let report = orchestrator.run(&options)?;

    println!();
    println!("Done: {}", report);
    for (task, error) in &report.malformed {
        println!("  malformed: {} ({})", task, error);
    }

    let failed = report.failed();
    if args.strict && failed > 0 {
        return Err(ForgeError::UnitsFailed(failed));
    }
    Ok(report)
}
