use serde::Serialize;

/// Pipeline progress. Transitions only move forward, one state at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Loaded,
    DeIdentified,
    Summarized,
    RecommendationsGathered,
    Consolidated,
    Assessed,
    Scored,
    Done,
}

impl PipelineState {
    pub const ORDER: [PipelineState; 8] = [
        PipelineState::Loaded,
        PipelineState::DeIdentified,
        PipelineState::Summarized,
        PipelineState::RecommendationsGathered,
        PipelineState::Consolidated,
        PipelineState::Assessed,
        PipelineState::Scored,
        PipelineState::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Loaded => "loaded",
            PipelineState::DeIdentified => "de_identified",
            PipelineState::Summarized => "summarized",
            PipelineState::RecommendationsGathered => "recommendations_gathered",
            PipelineState::Consolidated => "consolidated",
            PipelineState::Assessed => "assessed",
            PipelineState::Scored => "scored",
            PipelineState::Done => "done",
        }
    }

    /// The state that follows this one, or `None` after `Done`.
    pub fn next(self) -> Option<PipelineState> {
        let idx = Self::ORDER.iter().position(|s| *s == self)?;
        Self::ORDER.get(idx + 1).copied()
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
