//! Health Engagement Score: the one locally computed figure in a report.
//!
//! `score = round(100 × Σ weight(done) / Σ weight(all))`, rounded half away
//! from zero. Weights depend only on the evidence grade each assessment
//! carries and are supplied as explicit configuration.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::assessment::{ActivityStatus, Assessment};
use crate::models::recommendation::EvidenceGrade;

/// Scoring weight per evidence grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringWeights {
    pub grade_a: f64,
    pub grade_b: f64,
    pub grade_c: f64,
    pub grade_d: f64,
    pub ungraded: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            grade_a: 3.0,
            grade_b: 2.0,
            grade_c: 1.0,
            grade_d: 1.0,
            ungraded: 1.0,
        }
    }
}

impl ScoringWeights {
    pub fn weight_for(&self, grade: Option<EvidenceGrade>) -> f64 {
        match grade {
            Some(EvidenceGrade::A) => self.grade_a,
            Some(EvidenceGrade::B) => self.grade_b,
            Some(EvidenceGrade::C) => self.grade_c,
            Some(EvidenceGrade::D) => self.grade_d,
            None => self.ungraded,
        }
    }

    /// Every weight must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        let entries = [
            ("grade_a", self.grade_a),
            ("grade_b", self.grade_b),
            ("grade_c", self.grade_c),
            ("grade_d", self.grade_d),
            ("ungraded", self.ungraded),
        ];
        for (label, value) in entries {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidWeight {
                    label: label.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EngagementScore {
    /// 0..=100.
    pub score: u8,
    pub earned_points: f64,
    pub total_possible: f64,
    pub done: usize,
    pub not_done: usize,
    pub unclear: usize,
    pub total: usize,
}

/// Compute the engagement score for a list of assessments.
pub fn score(assessments: &[Assessment], weights: &ScoringWeights) -> EngagementScore {
    score_with(assessments, weights, |a| a.status)
}

/// Re-score as if the activity for `recommendation_id` had been completed.
pub fn simulate_completion(
    assessments: &[Assessment],
    recommendation_id: &str,
    weights: &ScoringWeights,
) -> Result<EngagementScore, CoreError> {
    if !assessments
        .iter()
        .any(|a| a.recommendation_id == recommendation_id)
    {
        return Err(CoreError::UnknownRecommendation(
            recommendation_id.to_string(),
        ));
    }

    Ok(score_with(assessments, weights, |a| {
        if a.recommendation_id == recommendation_id {
            ActivityStatus::Done
        } else {
            a.status
        }
    }))
}

fn score_with<F>(assessments: &[Assessment], weights: &ScoringWeights, status_of: F) -> EngagementScore
where
    F: Fn(&Assessment) -> ActivityStatus,
{
    let mut result = EngagementScore {
        score: 0,
        earned_points: 0.0,
        total_possible: 0.0,
        done: 0,
        not_done: 0,
        unclear: 0,
        total: assessments.len(),
    };

    for assessment in assessments {
        let weight = weights.weight_for(assessment.evidence_grade);
        result.total_possible += weight;
        match status_of(assessment) {
            ActivityStatus::Done => {
                result.done += 1;
                result.earned_points += weight;
            }
            ActivityStatus::NotDone => result.not_done += 1,
            ActivityStatus::Unclear => result.unclear += 1,
        }
    }

    if result.total_possible > 0.0 {
        let raw = (100.0 * result.earned_points / result.total_possible).round();
        result.score = raw.clamp(0.0, 100.0) as u8;
    }

    result
}
