//! Implementation of the `tintforge prompt` command.
//!
//! Shows exactly what the pipeline would send to the backend for one task,
//! without generating anything.

use crate::cli::PromptArgs;
use crate::config::Config;
use crate::context::{ProjectContext, load_project};
use crate::discovery::TaskDiscovery;
use crate::error::{ForgeError, Result};
use crate::prompt::{PromptComposer, TaskPrompts};
use crate::task::{TaskDescriptor, TaskRef};
use std::path::Path;

pub fn cmd_prompt(root: Option<&Path>, args: PromptArgs) -> Result<()> {
    let (ctx, config) = load_project(root)?;
    let (task, prompts) = task_prompts(&ctx, &config, &args.task)?;

    println!("Task:       {}", task.id);
    println!("Descriptor: {}", task.descriptor_path.display());
    println!();
    println!("Ideation prompt:");
    println!("  {}", prompts.ideation);
    println!();
    println!("Styling prompt:");
    println!("  {}", prompts.styling);
    if config.variant.enabled {
        println!();
        println!("Variant prompt:");
        println!("  {}", prompts.variant);
    }

    Ok(())
}

/// Locate `task_id` in the task tree and compose its prompts.
fn task_prompts(
    ctx: &ProjectContext,
    config: &Config,
    task_id: &str,
) -> Result<(TaskRef, TaskPrompts)> {
    ctx.ensure_tasks_dir()?;

    let wanted = task_id.trim_matches('/').replace('\\', "/");
    let task = TaskDiscovery::new(&ctx.tasks_dir, config)
        .tasks()
        .find(|task| task.id == wanted)
        .ok_or_else(|| {
            ForgeError::UserError(format!(
                "task '{}' not found under {}.\n\n\
                 Run `tintforge tasks` to list task identifiers.",
                task_id,
                ctx.tasks_dir.display()
            ))
        })?;

    let descriptor = TaskDescriptor::load(&task.descriptor_path)?;
    let prompts = PromptComposer::new(&ctx.tasks_dir, config).prompts(&task, &descriptor);
    Ok((task, prompts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use crate::test_support::{TEST_CONFIG, create_test_project, write_task};
    use std::fs;

    #[test]
    fn test_prompts_include_fragments() {
        let project = create_test_project(TEST_CONFIG);
        let tasks = project.path().join("ImgIdeas");
        fs::write(tasks.join("prefix.txt"), "masterpiece").unwrap();
        fs::create_dir_all(tasks.join("forest")).unwrap();
        fs::write(tasks.join("forest/suffix.txt"), "soft light").unwrap();
        write_task(
            project.path(),
            "forest/owl",
            r#"{"prompt": "an owl", "prompt-img2img": "an owl, ink"}"#,
        );

        let (ctx, config) = load_project(Some(project.path())).unwrap();
        let (task, prompts) = task_prompts(&ctx, &config, "forest/owl").unwrap();

        assert_eq!(task.id, "forest/owl");
        assert_eq!(prompts.ideation, "masterpiece, an owl, soft light");
        assert_eq!(prompts.styling, "an owl, ink");
    }

    #[test]
    fn test_unknown_task_is_user_error() {
        let project = create_test_project(TEST_CONFIG);
        write_task(project.path(), "owl", r#"{"prompt": "an owl"}"#);

        let (ctx, config) = load_project(Some(project.path())).unwrap();
        let err = task_prompts(&ctx, &config, "cat").unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.to_string().contains("task 'cat' not found"));
    }

    #[test]
    fn test_malformed_descriptor_is_reported() {
        let project = create_test_project(TEST_CONFIG);
        write_task(project.path(), "owl", r#"{"negative_prompt": "blurry"}"#);

        let (ctx, config) = load_project(Some(project.path())).unwrap();
        let err = task_prompts(&ctx, &config, "owl").unwrap_err();
        assert!(matches!(err, ForgeError::DescriptorMalformed { .. }));
    }

    #[test]
    fn test_cmd_prompt_prints_for_known_task() {
        let project = create_test_project(TEST_CONFIG);
        write_task(project.path(), "owl", r#"{"prompt": "an owl"}"#);

        let args = PromptArgs {
            task: "owl".to_string(),
        };
        assert!(cmd_prompt(Some(project.path()), args).is_ok());
    }
}
