//! Shared fixtures: a scripted model that plays a complete, well-behaved
//! run over a short record.

#![allow(dead_code)]

use careguide_bedrock::context::RecordFile;
use careguide_bedrock::replay::ReplayClient;
use careguide_core::models::recommendation::EvidenceGrade;
use careguide_core::models::transaction::TransactionType;
use careguide_guidelines::{Guideline, GuidelineTable};
use careguide_pipeline::CareGuideConfig;
use serde_json::json;

pub const CRC: &str = "Colorectal cancer screening";
pub const COLON: &str = "Colon cancer screening";
pub const FLU: &str = "Annual influenza vaccine";
pub const A1C: &str = "HbA1c testing every 3-6 months";

pub const DONE_QUOTE: &str = "colonoscopy completed August 2023";

pub const RAW_RECORD: &str = "\
PATIENT: Margaret Thompson   DOB: 03/14/1962
62-year-old female with hypertension and type 2 diabetes.
Patient had colonoscopy completed August 2023, no polyps found.
No record of influenza vaccination this season.
Last HbA1c drawn, result pending.";

pub const DEID_RECORD: &str = "\
PATIENT: [PATIENT_NAME]   DOB: [DATE]
62-year-old female with hypertension and type 2 diabetes.
Patient had colonoscopy completed August 2023, no polyps found.
No record of influenza vaccination this season.
Last HbA1c drawn, result pending.";

pub fn record_files() -> Vec<RecordFile> {
    vec![RecordFile {
        filename: "visit_notes.txt".to_string(),
        text: RAW_RECORD.to_string(),
    }]
}

pub fn config() -> CareGuideConfig {
    CareGuideConfig {
        review_assessments: false,
        ..CareGuideConfig::default()
    }
}

pub fn guidelines() -> GuidelineTable {
    GuidelineTable::new(vec![Guideline {
        title: "Colorectal Cancer Screening".to_string(),
        description: "Screen for colorectal cancer in adults aged 45 to 75 years.".to_string(),
        population: "Adults aged 45 to 75 years".to_string(),
        grade: EvidenceGrade::A,
        category: "Cancer Screening".to_string(),
        keywords: vec!["colonoscopy".to_string()],
    }])
}

pub fn rec(description: &str, category: &str, source: &str, grade: Option<&str>) -> serde_json::Value {
    json!({
        "description": description,
        "details": "",
        "frequency": "As directed",
        "category": category,
        "source": source,
        "rationale": "",
        "evidence_grade": grade,
    })
}

pub fn list(recs: Vec<serde_json::Value>) -> String {
    json!({ "recommendations": recs }).to_string()
}

pub fn draft(status: &str, quote: &str) -> String {
    json!({
        "status": status,
        "supporting_quote": quote,
        "confidence_note": "",
        "confidence_score": 90,
        "urgency": "medium",
        "questions": [],
    })
    .to_string()
}

pub fn activity(description: &str) -> String {
    format!("Activity: {description}")
}

/// A model that answers every step of a normal run.
///
/// Sources yield four candidates (general: colon screening and flu;
/// condition: HbA1c; guideline: colorectal screening). Consolidation merges
/// the two colorectal candidates. Assessment marks colorectal done, flu not
/// done and HbA1c unclear.
pub fn scripted() -> ReplayClient {
    with_assessments(base())
}

pub fn with_assessments(model: ReplayClient) -> ReplayClient {
    model
        .on_matching(TransactionType::Assessment, activity(CRC), draft("done", DONE_QUOTE))
        .on_matching(TransactionType::Assessment, activity(FLU), draft("not_done", ""))
        .on_matching(TransactionType::Assessment, activity(A1C), draft("unclear", ""))
}

/// Every step up to and including consolidation.
pub fn base() -> ReplayClient {
    ReplayClient::new()
        .on(
            TransactionType::Deidentification,
            json!({ "deidentified_text": DEID_RECORD }).to_string(),
        )
        .on(
            TransactionType::BasicSummary,
            json!({ "age": 62, "sex": "female", "basic_summary": "62-year-old female" }).to_string(),
        )
        .on(
            TransactionType::AdvancedSummary,
            json!({
                "age": 62,
                "sex": "female",
                "advanced_summary": "62-year-old female with hypertension and type 2 diabetes",
                "conditions": ["Hypertension", "Type 2 diabetes"],
                "medications": [],
                "known_activities": ["colonoscopy"],
                "risk_factors": [],
            })
            .to_string(),
        )
        .on(
            TransactionType::GeneralRecommendations,
            list(vec![
                rec(COLON, "Preventive Screening", "ACS", None),
                rec(FLU, "Vaccination", "CDC", None),
            ]),
        )
        .on(
            TransactionType::ConditionRecommendations,
            list(vec![rec(A1C, "Chronic Disease Management", "ADA", None)]),
        )
        .on(
            TransactionType::GuidelineRecommendations,
            list(vec![rec(CRC, "Preventive Screening", "USPSTF Grade A", None)]),
        )
        .on(
            TransactionType::Consolidation,
            list(vec![
                rec(CRC, "Preventive Screening", "ACS, USPSTF Grade A", Some("A")),
                rec(FLU, "Vaccination", "CDC", None),
                rec(A1C, "Chronic Disease Management", "ADA", None),
            ]),
        )
}
