//! The stage orchestrator.

use super::report::{RunReport, UnitOutcome, UnitReport};
use super::{RunOptions, Stage};
use crate::artifacts::{ArtifactKey, ArtifactStore};
use crate::backend::{GenerationBackend, Img2ImgRequest, Txt2ImgRequest, first_image};
use crate::codec::{decode_rgba, encode_png};
use crate::config::Config;
use crate::context::ProjectContext;
use crate::discovery::TaskDiscovery;
use crate::error::{ForgeError, Result};
use crate::events::{Event, EventAction, record_event};
use crate::locks::acquire_artifact_claim;
use crate::palette::{PaletteRecolorer, smooth};
use crate::prompt::{PromptComposer, TaskPrompts};
use crate::task::{TaskDescriptor, TaskRef};
use serde_json::json;

/// Everything a stage needs to know about the task being processed.
struct TaskUnit<'t> {
    task: &'t TaskRef,
    descriptor: TaskDescriptor,
    prompts: TaskPrompts,
}

/// Drives every discovered task through the stages.
///
/// Palettes are indexed once at construction, so an unusable color scheme
/// fails before any task is touched.
pub struct StageOrchestrator<'a> {
    ctx: &'a ProjectContext,
    config: &'a Config,
    backend: &'a dyn GenerationBackend,
    store: &'a dyn ArtifactStore,
    discovery: TaskDiscovery,
    composer: PromptComposer,
    recolorers: Vec<PaletteRecolorer>,
}

impl<'a> StageOrchestrator<'a> {
    pub fn new(
        ctx: &'a ProjectContext,
        config: &'a Config,
        backend: &'a dyn GenerationBackend,
        store: &'a dyn ArtifactStore,
    ) -> Result<Self> {
        let recolorers = config
            .palettes()?
            .iter()
            .map(PaletteRecolorer::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ctx,
            config,
            backend,
            store,
            discovery: TaskDiscovery::new(&ctx.tasks_dir, config),
            composer: PromptComposer::new(&ctx.tasks_dir, config),
            recolorers,
        })
    }

    /// Run the pipeline over every discovered task.
    ///
    /// Only a missing task tree or an unknown scheme in `options` fails the
    /// run; everything else is recorded in the report.
    pub fn run(&self, options: &RunOptions) -> Result<RunReport> {
        self.ctx.ensure_tasks_dir()?;

        for scheme in &options.schemes {
            if !self.recolorers.iter().any(|r| &r.scheme().name == scheme) {
                return Err(ForgeError::UserError(format!(
                    "unknown color scheme '{}' (configured: {})",
                    scheme,
                    self.scheme_names().join(", ")
                )));
            }
        }

        let mut report = RunReport::default();
        for task in self.discovery.tasks() {
            report.tasks += 1;
            self.run_task(&task, options, &mut report);
        }
        Ok(report)
    }

    fn scheme_names(&self) -> Vec<&str> {
        self.recolorers
            .iter()
            .map(|r| r.scheme().name.as_str())
            .collect()
    }

    fn run_task(&self, task: &TaskRef, options: &RunOptions, report: &mut RunReport) {
        let descriptor = match TaskDescriptor::load(&task.descriptor_path) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                println!("[skip   ] {}: {}", task.id, e);
                record_event(
                    self.ctx,
                    &Event::new(EventAction::Ideate)
                        .with_task(&task.id)
                        .with_details(json!({ "outcome": "malformed", "error": e.to_string() })),
                );
                report.malformed.push((task.id.clone(), e.to_string()));
                return;
            }
        };

        let unit = TaskUnit {
            prompts: self.composer.prompts(task, &descriptor),
            task,
            descriptor,
        };

        if options.includes_stage(Stage::Ideate) {
            let outcome = self.ideate(&unit);
            self.finish(report, &unit, Stage::Ideate, None, outcome);
        }

        for recolorer in &self.recolorers {
            let scheme = recolorer.scheme().name.as_str();
            if !options.includes_scheme(scheme) {
                continue;
            }

            if options.includes_stage(Stage::Style) {
                let outcome = self.style(&unit, recolorer);
                self.finish(report, &unit, Stage::Style, Some(scheme), outcome);
            }

            if self.config.variant.enabled && options.includes_stage(Stage::Variant) {
                let outcome = self.variant(&unit, scheme);
                self.finish(report, &unit, Stage::Variant, Some(scheme), outcome);
            }
        }
    }

    /// Stage 0: text-conditioned base image.
    fn ideate(&self, unit: &TaskUnit<'_>) -> UnitOutcome {
        let key = ArtifactKey::base(&unit.task.id);
        self.produce(&key, Stage::Ideate, || {
            let request = Txt2ImgRequest::from_descriptor(&unit.descriptor, &unit.prompts.ideation);
            first_image(self.backend.txt2img(&request)?)
        })
    }

    /// Stage 1: recolor the base image onto the scheme and restyle it.
    fn style(&self, unit: &TaskUnit<'_>, recolorer: &PaletteRecolorer) -> UnitOutcome {
        let scheme = recolorer.scheme().name.as_str();
        let key = ArtifactKey::final_image(&unit.task.id, scheme);
        if self.store.exists(&key) {
            return UnitOutcome::AlreadyDone;
        }
        let base = ArtifactKey::base(&unit.task.id);
        if !self.store.exists(&base) {
            return UnitOutcome::Skipped("base image missing".to_string());
        }

        self.produce(&key, Stage::Style, || {
            let recolored = self.recolored_image(&unit.task.id, recolorer)?;
            let source = match self.config.recolor.smoothing_radius() {
                Some(radius) => encode_png(&smooth(&decode_rgba(&recolored)?, radius))?,
                None => recolored,
            };

            let styling = &self.config.styling;
            let request = Img2ImgRequest {
                params: Txt2ImgRequest {
                    prompt: unit.prompts.styling.clone(),
                    width: styling.width,
                    height: styling.height,
                    steps: styling.steps,
                    cfg_scale: styling.cfg_scale,
                    ..Txt2ImgRequest::from_descriptor(&unit.descriptor, "")
                },
                init_image: source,
                denoising_strength: styling.denoising_strength,
                resize_mode: styling.resize_mode,
                checkpoint: None,
            };
            first_image(self.backend.img2img(&request)?)
        })
    }

    /// Stage 2: stylized variant of the scheme's final image.
    fn variant(&self, unit: &TaskUnit<'_>, scheme: &str) -> UnitOutcome {
        let key = ArtifactKey::variant(&unit.task.id, scheme);
        if self.store.exists(&key) {
            return UnitOutcome::AlreadyDone;
        }
        let final_key = ArtifactKey::final_image(&unit.task.id, scheme);
        if !self.store.exists(&final_key) {
            return UnitOutcome::Skipped("final image missing".to_string());
        }

        self.produce(&key, Stage::Variant, || {
            let styling = &self.config.styling;
            let variant = &self.config.variant;
            let request = Img2ImgRequest {
                params: Txt2ImgRequest {
                    prompt: unit.prompts.variant.clone(),
                    width: styling.width,
                    height: styling.height,
                    steps: variant.steps,
                    cfg_scale: styling.cfg_scale,
                    ..Txt2ImgRequest::from_descriptor(&unit.descriptor, "")
                },
                init_image: self.store.read(&final_key)?,
                denoising_strength: variant.denoising_strength,
                resize_mode: styling.resize_mode,
                checkpoint: variant.checkpoint.clone(),
            };
            first_image(self.backend.img2img(&request)?)
        })
    }

    /// The palette-reduced base image, computed and persisted on first use.
    fn recolored_image(&self, task_id: &str, recolorer: &PaletteRecolorer) -> Result<Vec<u8>> {
        let key = ArtifactKey::recolored(task_id, &recolorer.scheme().name);
        if self.store.exists(&key) {
            return self.store.read(&key);
        }

        let base = decode_rgba(&self.store.read(&ArtifactKey::base(task_id))?)?;
        let recolored = recolorer.recolor(&base, self.config.recolor.recolor_mode());
        let bytes = encode_png(&recolored)?;
        self.store.write(&key, &bytes)?;
        Ok(bytes)
    }

    /// Compute and persist one artifact under an exclusive claim.
    ///
    /// The artifact is checked again once the claim is held; another process
    /// may have finished it in the meantime.
    fn produce<F>(&self, key: &ArtifactKey, stage: Stage, compute: F) -> UnitOutcome
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        if self.store.exists(key) {
            return UnitOutcome::AlreadyDone;
        }

        let _claim = match acquire_artifact_claim(self.ctx, key, stage.as_str()) {
            Ok(claim) => claim,
            Err(ForgeError::LockError(reason)) => return UnitOutcome::Skipped(reason),
            Err(e) => return UnitOutcome::Failed(e.to_string()),
        };

        if self.store.exists(key) {
            return UnitOutcome::AlreadyDone;
        }

        match compute().and_then(|bytes| self.store.write(key, &bytes)) {
            Ok(()) => UnitOutcome::Completed {
                path: self.store.location(key),
            },
            Err(e) => UnitOutcome::Failed(e.to_string()),
        }
    }

    /// Print, log and record a unit outcome.
    fn finish(
        &self,
        report: &mut RunReport,
        unit: &TaskUnit<'_>,
        stage: Stage,
        scheme: Option<&str>,
        outcome: UnitOutcome,
    ) {
        let entry = UnitReport {
            task: unit.task.id.clone(),
            stage,
            scheme: scheme.map(str::to_string),
            outcome,
        };
        println!("{}", entry);

        if entry.outcome != UnitOutcome::AlreadyDone {
            let mut details = json!({ "outcome": entry.outcome.label() });
            match &entry.outcome {
                UnitOutcome::Completed { path } => {
                    details["path"] = json!(path.display().to_string());
                }
                UnitOutcome::Skipped(reason) => details["reason"] = json!(reason),
                UnitOutcome::Failed(error) => details["error"] = json!(error),
                UnitOutcome::AlreadyDone => {}
            }

            let mut event = Event::new(event_action(stage))
                .with_task(&entry.task)
                .with_details(details);
            if let Some(scheme) = &entry.scheme {
                event = event.with_scheme(scheme);
            }
            record_event(self.ctx, &event);
        }

        report.units.push(entry);
    }
}

fn event_action(stage: Stage) -> EventAction {
    match stage {
        Stage::Ideate => EventAction::Ideate,
        Stage::Style => EventAction::Style,
        Stage::Variant => EventAction::Variant,
    }
}
