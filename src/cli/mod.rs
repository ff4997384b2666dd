//! CLI argument parsing for tintforge.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::pipeline::Stage;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Tintforge: staged, resumable generation of palette-styled images.
///
/// Ideas live as descriptor files in a directory tree:
/// - Each descriptor becomes a base image (ideation)
/// - Each base image is recolored onto every color scheme and restyled
/// - Existing images are never regenerated, so runs can be repeated freely
#[derive(Parser, Debug)]
#[command(name = "tintforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the nearest directory holding tintforge.yaml).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for tintforge.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a tintforge project in the current directory.
    ///
    /// Writes a default tintforge.yaml (never overwriting an existing one)
    /// and creates the task tree and state directories.
    Init,

    /// Run the generation pipeline over every task.
    ///
    /// Prints one line per unit and a summary. Units whose image already
    /// exists are not regenerated.
    Run(RunArgs),

    /// List discovered task identifiers.
    Tasks,

    /// Show which images exist for each task and color scheme.
    Status,

    /// Recolor a single image onto a color scheme.
    Recolor(RecolorArgs),

    /// Print the composed prompts for a task.
    Prompt(PromptArgs),

    /// Manage artifact claims.
    Lock(LockCommand),
}

/// Pipeline stage selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageArg {
    Ideate,
    Style,
    Variant,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Ideate => Stage::Ideate,
            StageArg::Style => Stage::Style,
            StageArg::Variant => Stage::Variant,
        }
    }
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only run these stages (repeatable; default: all).
    #[arg(long = "stage", value_enum)]
    pub stages: Vec<StageArg>,

    /// Only process these color schemes (repeatable; default: all).
    #[arg(long = "scheme")]
    pub schemes: Vec<String>,

    /// Exit with a failure code when any unit failed.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `recolor` command.
#[derive(Parser, Debug)]
pub struct RecolorArgs {
    /// Image to recolor.
    pub input: PathBuf,

    /// Where to write the recolored PNG.
    pub output: PathBuf,

    /// Color scheme name from tintforge.yaml.
    #[arg(long)]
    pub scheme: String,

    /// Map every pixel straight to its nearest palette color.
    #[arg(long)]
    pub direct: bool,

    /// Smooth the result with the configured blur radius.
    #[arg(long)]
    pub blur: bool,
}

/// Arguments for the `prompt` command.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Task identifier (e.g., forest/owl).
    pub task: String,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// List all artifact claims.
    ///
    /// Shows each claim's artifact, owner and age.
    List,

    /// Clear a specific claim.
    ///
    /// Claims that are not stale need --force.
    Clear(LockClearArgs),
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Claim name as shown by `tintforge lock list`.
    pub name: String,

    /// Clear the claim even if it is not stale.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["tintforge", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));
        assert!(cli.root.is_none());
    }

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::try_parse_from(["tintforge", "run"]).unwrap();
        if let Command::Run(args) = cli.command {
            assert!(args.stages.is_empty());
            assert!(args.schemes.is_empty());
            assert!(!args.strict);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_filters() {
        let cli = Cli::try_parse_from([
            "tintforge",
            "run",
            "--stage",
            "ideate",
            "--stage",
            "style",
            "--scheme",
            "Dusk",
            "--strict",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.stages, vec![StageArg::Ideate, StageArg::Style]);
            assert_eq!(args.schemes, vec!["Dusk"]);
            assert!(args.strict);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_rejects_unknown_stage() {
        let result = Cli::try_parse_from(["tintforge", "run", "--stage", "upscale"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["tintforge", "status", "--root", "/srv/art"]).unwrap();
        assert!(matches!(cli.command, Command::Status));
        assert_eq!(cli.root, Some(PathBuf::from("/srv/art")));
    }

    #[test]
    fn parse_tasks() {
        let cli = Cli::try_parse_from(["tintforge", "tasks"]).unwrap();
        assert!(matches!(cli.command, Command::Tasks));
    }

    #[test]
    fn parse_recolor() {
        let cli = Cli::try_parse_from([
            "tintforge",
            "recolor",
            "in.png",
            "out.png",
            "--scheme",
            "Dusk",
            "--direct",
        ])
        .unwrap();
        if let Command::Recolor(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("in.png"));
            assert_eq!(args.output, PathBuf::from("out.png"));
            assert_eq!(args.scheme, "Dusk");
            assert!(args.direct);
            assert!(!args.blur);
        } else {
            panic!("Expected Recolor command");
        }
    }

    #[test]
    fn parse_recolor_requires_scheme() {
        let result = Cli::try_parse_from(["tintforge", "recolor", "in.png", "out.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_prompt() {
        let cli = Cli::try_parse_from(["tintforge", "prompt", "forest/owl"]).unwrap();
        if let Command::Prompt(args) = cli.command {
            assert_eq!(args.task, "forest/owl");
        } else {
            panic!("Expected Prompt command");
        }
    }

    #[test]
    fn parse_lock_list() {
        let cli = Cli::try_parse_from(["tintforge", "lock", "list"]).unwrap();
        if let Command::Lock(lock_cmd) = cli.command {
            assert!(matches!(lock_cmd.action, LockAction::List));
        } else {
            panic!("Expected Lock command");
        }
    }

    #[test]
    fn parse_lock_clear() {
        let cli = Cli::try_parse_from(["tintforge", "lock", "clear", "forest~owl.base", "--force"])
            .unwrap();
        if let Command::Lock(lock_cmd) = cli.command {
            if let LockAction::Clear(args) = lock_cmd.action {
                assert_eq!(args.name, "forest~owl.base");
                assert!(args.force);
            } else {
                panic!("Expected Clear action");
            }
        } else {
            panic!("Expected Lock command");
        }
    }

    #[test]
    fn stage_arg_maps_to_pipeline_stage() {
        assert_eq!(Stage::from(StageArg::Ideate), Stage::Ideate);
        assert_eq!(Stage::from(StageArg::Variant), Stage::Variant);
    }
}
