//! The assessment pipeline as an explicit forward-only state machine.
//!
//! `Loaded → DeIdentified → Summarized → RecommendationsGathered →
//! Consolidated → Assessed → Scored → Done`. The first unrecoverable
//! failure halts the run with the state that was being produced; no partial
//! report or score is returned.

use std::path::Path;

use careguide_bedrock::client::ModelClient;
use careguide_bedrock::context::{RecordFile, build_record_text};
use careguide_core::models::assessment::ActivityStatus;
use careguide_core::models::record::PatientRecord;
use careguide_core::models::report::{ClarifyingQuestion, HealthReport};
use careguide_core::scoring::score;
use careguide_guidelines::GuidelineTable;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CareGuideConfig;
use crate::error::{PipelineError, StepError};
use crate::loader::load_record_files;
use crate::state::PipelineState;
use crate::steps::{assess, consolidate, deidentify, recommend, summarize};

pub struct Pipeline<'a, M: ModelClient + ?Sized> {
    model: &'a M,
    config: &'a CareGuideConfig,
    guidelines: &'a GuidelineTable,
}

impl<'a, M: ModelClient + ?Sized> Pipeline<'a, M> {
    pub fn new(model: &'a M, config: &'a CareGuideConfig, guidelines: &'a GuidelineTable) -> Self {
        Self {
            model,
            config,
            guidelines,
        }
    }

    /// Load the record files at `paths` and run the pipeline over them.
    pub async fn run_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<HealthReport, PipelineError> {
        let files = load_record_files(paths).map_err(at(PipelineState::Loaded))?;
        self.run(&files).await
    }

    pub async fn run(&self, files: &[RecordFile]) -> Result<HealthReport, PipelineError> {
        let policy = &self.config.call_policy;

        // Checked per file: the multi-file wrapper is never blank itself.
        if files.iter().all(|f| f.text.trim().is_empty()) {
            warn!(files = files.len(), "patient record is empty");
            return Err(PipelineError::new(
                PipelineState::Loaded,
                StepError::Data("patient record is empty".to_string()),
            ));
        }
        let raw_text = build_record_text(files);
        let sources: Vec<String> = files.iter().map(|f| f.filename.clone()).collect();
        let mut progress = Progress::start(files.len());
        let mut transactions = Vec::new();

        let deidentified = deidentify::deidentify(self.model, &raw_text, self.config.deid_mode, policy)
            .await
            .map_err(at(PipelineState::DeIdentified))?;
        transactions.extend(deidentified.transactions);
        let record = PatientRecord::new(sources, raw_text, deidentified.output);
        progress.advance(PipelineState::DeIdentified);

        let summarized = summarize::summarize(self.model, &record.deidentified_text, policy)
            .await
            .map_err(at(PipelineState::Summarized))?;
        transactions.extend(summarized.transactions);
        let summary = summarized.output;
        progress.advance(PipelineState::Summarized);

        let gathered = recommend::gather(
            self.model,
            &summary,
            self.guidelines,
            policy,
            self.config.parallel_sources,
        )
        .await
        .map_err(at(PipelineState::RecommendationsGathered))?;
        transactions.extend(gathered.transactions);
        progress.advance(PipelineState::RecommendationsGathered);

        let consolidated = consolidate::consolidate(self.model, gathered.output, policy)
            .await
            .map_err(at(PipelineState::Consolidated))?;
        transactions.extend(consolidated.transactions);
        let recommendations = consolidated.output;
        progress.advance(PipelineState::Consolidated);

        let assessed = assess::assess_all(
            self.model,
            &recommendations,
            &record,
            policy,
            self.config.review_assessments,
        )
        .await
        .map_err(at(PipelineState::Assessed))?;
        transactions.extend(assessed.transactions);
        let assessments = assessed.output;
        let aligned = assessments.len() == recommendations.len()
            && assessments
                .iter()
                .zip(&recommendations)
                .all(|(a, r)| a.recommendation_id == r.id);
        if !aligned {
            return Err(PipelineError::new(
                PipelineState::Assessed,
                StepError::Data("assessments are not aligned with recommendations".to_string()),
            ));
        }
        progress.advance(PipelineState::Assessed);

        let engagement = score(&assessments, &self.config.weights);
        progress.advance(PipelineState::Scored);

        let clarifying_questions: Vec<ClarifyingQuestion> = assessments
            .iter()
            .filter(|a| a.status == ActivityStatus::Unclear)
            .flat_map(|a| {
                a.questions.iter().map(|q| ClarifyingQuestion {
                    recommendation_id: a.recommendation_id.clone(),
                    question: q.clone(),
                })
            })
            .collect();

        let total_cost_usd = transactions.iter().map(|t| t.usage.cost_usd).sum::<f64>();
        let report = HealthReport {
            id: Uuid::new_v4(),
            generated_at: jiff::Timestamp::now(),
            model_id: self.model.model_id().to_string(),
            sources: record.sources,
            summary,
            recommendations,
            assessments,
            score: engagement,
            clarifying_questions,
            transactions,
            total_cost_usd,
        };
        progress.advance(PipelineState::Done);

        info!(
            report_id = %report.id,
            score = report.score.score,
            done = report.score.done,
            total = report.score.total,
            questions = report.clarifying_questions.len(),
            model_calls = report.transactions.len(),
            "assessment complete"
        );
        Ok(report)
    }
}

/// Tracks the current state and logs each transition.
struct Progress {
    state: PipelineState,
}

impl Progress {
    fn start(files: usize) -> Self {
        info!(state = %PipelineState::Loaded, files, "record loaded");
        Self {
            state: PipelineState::Loaded,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert_eq!(self.state.next(), Some(next), "pipeline states only move forward");
        info!(from = %self.state, state = %next, "pipeline state transition");
        self.state = next;
    }
}

fn at<E: Into<StepError>>(state: PipelineState) -> impl FnOnce(E) -> PipelineError {
    move |e| PipelineError::new(state, e)
}
