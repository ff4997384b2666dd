//! Prompt composition.
//!
//! The ideation prompt is the task's own prompt framed by the inherited
//! `prefix`/`suffix` fragments. The image-conditioned stages reuse it unless
//! the descriptor supplies an override, which is taken verbatim.

use crate::config::Config;
use crate::fragments::FragmentResolver;
use crate::task::{TaskDescriptor, TaskRef};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A comma together with any whitespace and further commas around it.
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,[\s,]*").expect("Invalid separator regex"));

const SEPARATOR: &str = ", ";

/// Join prompt parts with `", "`, dropping empty parts and collapsing
/// doubled, leading and trailing separators.
pub fn compose(prefix: &str, core: &str, suffix: &str) -> String {
    let joined = [prefix, core, suffix]
        .iter()
        .map(|part| trim_part(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    trim_part(&SEPARATOR_RUN.replace_all(&joined, SEPARATOR)).to_string()
}

fn trim_part(part: &str) -> &str {
    part.trim_matches(|c: char| c == ',' || c.is_whitespace())
}

/// The prompts a task sends to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrompts {
    /// Text-conditioned stage.
    pub ideation: String,
    /// Image-conditioned styling stage.
    pub styling: String,
    /// Image-conditioned variant stage.
    pub variant: String,
}

/// Builds per-task prompts from fragments and descriptors.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    fragments: FragmentResolver,
    prefix_name: String,
    suffix_name: String,
    adapter_prefix: Option<String>,
}

impl PromptComposer {
    pub fn new<P: AsRef<Path>>(tasks_root: P, config: &Config) -> Self {
        Self {
            fragments: FragmentResolver::new(tasks_root, &config.fragment_extension),
            prefix_name: config.prefix_fragment.clone(),
            suffix_name: config.suffix_fragment.clone(),
            adapter_prefix: config.variant.adapter_prefix.clone(),
        }
    }

    /// Fragment-framed prompt for the task.
    pub fn ideation_prompt(&self, task: &TaskRef, descriptor: &TaskDescriptor) -> String {
        let prefix = self.fragments.resolve(task.dir(), &self.prefix_name);
        let suffix = self.fragments.resolve(task.dir(), &self.suffix_name);
        compose(&prefix, &descriptor.prompt, &suffix)
    }

    /// All prompts for the task. Fragments are resolved once.
    pub fn prompts(&self, task: &TaskRef, descriptor: &TaskDescriptor) -> TaskPrompts {
        let ideation = self.ideation_prompt(task, descriptor);
        let styling = match descriptor.style_override() {
            Some(custom) => custom.to_string(),
            None => ideation.clone(),
        };
        let variant = self.variant_prompt(&styling);

        TaskPrompts {
            ideation,
            styling,
            variant,
        }
    }

    /// The styling prompt with the style adapter selector in front.
    pub fn variant_prompt(&self, styling: &str) -> String {
        match self.adapter_prefix.as_deref().map(trim_part) {
            Some(adapter) if !adapter.is_empty() => format!("{}{}{}", adapter, SEPARATOR, styling),
            _ => styling.to_string(),
        }
    }
}
