//! Drives a [`WorkflowSession`] through its stages with a completion driver.

use crate::{ChapterDraft, ChapterPlan, Outline, Stage, WorkflowSession, prompts};
use derive_getters::Getters;
use futures::future::join_all;
use tracing::{info, instrument, warn};
use whodunit_core::{GenerateRequest, GenerateResponse};
use whodunit_error::{WhodunitError, WhodunitResult, WorkflowError, WorkflowErrorKind};
use whodunit_interface::CompletionDriver;

/// Sampling parameters applied to every completion call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct GenerationSettings {
    /// Sampling temperature; endpoint default when absent
    temperature: Option<f32>,
    /// Completion length cap; endpoint default when absent
    max_tokens: Option<u32>,
}

impl GenerationSettings {
    /// Returns a builder for GenerationSettings.
    pub fn builder() -> GenerationSettingsBuilder {
        GenerationSettingsBuilder::default()
    }
}

/// Writes a mystery stage by stage.
///
/// Each stage issues completion calls through `D`. Wrap the driver in a
/// queued driver to keep calls strictly sequential.
#[derive(Debug, Clone)]
pub struct MysteryWorkflow<D> {
    driver: D,
    settings: GenerationSettings,
}

impl<D: CompletionDriver> MysteryWorkflow<D> {
    /// Creates a workflow with default sampling.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            settings: GenerationSettings::default(),
        }
    }

    /// Replace the sampling settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The driver completion calls go through.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn request(&self, prompt: String) -> GenerateRequest {
        GenerateRequest::prompt(prompts::SYSTEM_PROMPT, prompt)
            .with_sampling(self.settings.temperature, self.settings.max_tokens)
    }

    async fn complete(&self, stage: &str, prompt: String) -> WhodunitResult<GenerateResponse> {
        let response = self.driver.generate(&self.request(prompt)).await?;
        ensure_text(stage, response)
    }

    /// Stage 1: develop the premise into a concept.
    #[instrument(skip_all, fields(provider = self.driver.provider_name()))]
    pub async fn generate_idea(&self, session: &mut WorkflowSession) -> WhodunitResult<()> {
        let response = self
            .complete("idea", prompts::idea_prompt(session.brief()))
            .await?;

        session.record_usage(response.usage().as_ref());
        session.set_idea(response.into_text().trim().to_string());
        info!(title = %session.title(), "Idea generated");
        Ok(())
    }

    /// Stage 2: plan the chapters.
    ///
    /// Replaces any existing outline and discards chapter drafts written
    /// against it.
    #[instrument(skip_all, fields(provider = self.driver.provider_name()))]
    pub async fn generate_outline(&self, session: &mut WorkflowSession) -> WhodunitResult<()> {
        let idea = require(session.idea().as_deref(), Stage::Idea)?;
        let prompt = prompts::outline_prompt(session.brief(), idea);

        let response = self.complete("outline", prompt).await?;
        session.record_usage(response.usage().as_ref());

        let outline = Outline::parse(response.text())?;
        let expected = *session.brief().chapter_count();
        if outline.len() != expected {
            warn!(
                expected,
                parsed = outline.len(),
                "Outline chapter count differs from brief"
            );
        }

        info!(chapters = outline.len(), "Outline generated");
        session.set_outline(outline);
        Ok(())
    }

    /// Stage 3: draft every chapter that has no draft yet.
    ///
    /// All missing chapters are submitted at once. Successful drafts are kept
    /// even when another chapter fails; the first failure in chapter order is
    /// returned after every call has settled.
    #[instrument(skip_all, fields(provider = self.driver.provider_name()))]
    pub async fn draft_chapters(&self, session: &mut WorkflowSession) -> WhodunitResult<()> {
        let idea = require(session.idea().as_deref(), Stage::Idea)?;
        let outline = require(session.outline().as_ref(), Stage::Outline)?;

        let missing = session.missing_chapters();
        let plans: Vec<ChapterPlan> = missing
            .iter()
            .filter_map(|number| outline.chapter(*number).cloned())
            .collect();
        if plans.is_empty() {
            return Ok(());
        }

        info!(chapters = plans.len(), "Drafting chapters");

        let calls = plans.into_iter().map(|plan| {
            let prompt = prompts::chapter_prompt(session.brief(), idea, outline, &plan);
            let stage = format!("chapter {}", plan.number());
            async move {
                let result = self.complete(&stage, prompt).await;
                (plan, result)
            }
        });
        let settled = join_all(calls).await;

        let mut first_error: Option<WhodunitError> = None;
        for (plan, result) in settled {
            match result {
                Ok(response) => {
                    session.record_usage(response.usage().as_ref());
                    let draft = ChapterDraft::new(&plan, response.into_text().trim());
                    info!(
                        chapter = plan.number(),
                        words = draft.word_count(),
                        "Chapter drafted"
                    );
                    session.insert_chapter(draft);
                }
                Err(e) => {
                    warn!(chapter = plan.number(), error = %e, "Chapter draft failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stage 4: editorial critique of the finished draft.
    #[instrument(skip_all, fields(provider = self.driver.provider_name()))]
    pub async fn critique(&self, session: &mut WorkflowSession) -> WhodunitResult<()> {
        let idea = require(session.idea().as_deref(), Stage::Idea)?;
        require(session.outline().as_ref(), Stage::Outline)?;

        let missing = session.missing_chapters();
        if !missing.is_empty() {
            return Err(WorkflowError::new(WorkflowErrorKind::IncompleteDraft(missing)).into());
        }

        let prompt = prompts::critique_prompt(session.brief(), idea, &session.drafts());
        let response = self.complete("critique", prompt).await?;

        session.record_usage(response.usage().as_ref());
        session.set_critique(response.into_text().trim().to_string());
        info!("Critique generated");
        Ok(())
    }

    /// Run whichever stage is next and return the stage after it.
    pub async fn advance(&self, session: &mut WorkflowSession) -> WhodunitResult<Stage> {
        match session.next_stage() {
            Stage::Idea => self.generate_idea(session).await?,
            Stage::Outline => self.generate_outline(session).await?,
            Stage::Chapters => self.draft_chapters(session).await?,
            Stage::Critique => self.critique(session).await?,
            Stage::Complete => {}
        }
        Ok(session.next_stage())
    }

    /// Advance until complete, calling `after_stage` with each finished stage.
    ///
    /// The session keeps whatever was produced before an error, so a failed
    /// run can be saved and resumed.
    pub async fn run<F>(&self, session: &mut WorkflowSession, mut after_stage: F) -> WhodunitResult<()>
    where
        F: FnMut(Stage, &WorkflowSession) -> WhodunitResult<()>,
    {
        loop {
            let stage = session.next_stage();
            if stage == Stage::Complete {
                return Ok(());
            }
            self.advance(session).await?;
            after_stage(stage, session)?;
        }
    }
}

fn require<T>(value: Option<T>, stage: Stage) -> Result<T, WorkflowError> {
    value.ok_or_else(|| WorkflowError::new(WorkflowErrorKind::MissingStage(stage.to_string())))
}

fn ensure_text(stage: &str, response: GenerateResponse) -> WhodunitResult<GenerateResponse> {
    if response.text().trim().is_empty() {
        return Err(
            WorkflowError::new(WorkflowErrorKind::EmptyGeneration(stage.to_string())).into(),
        );
    }
    Ok(response)
}
