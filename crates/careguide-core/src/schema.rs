//! JSON Schema documents for every structured model response.
//!
//! The model is an untrusted producer: each reply is checked against one of
//! these documents before it is deserialized into a domain type. The same
//! document is shown to the model in the prompt.

use serde_json::{Value, json};

use crate::models::assessment::{ActivityStatus, Urgency};
use crate::models::recommendation::{Category, EvidenceGrade};

/// Maximum length of a recommendation's short description.
pub const DESCRIPTION_MAX_CHARS: u64 = 150;

/// Maximum length of a recommendation's frequency text.
pub const FREQUENCY_MAX_CHARS: u64 = 120;

pub fn deidentified_text() -> Value {
    json!({
        "type": "object",
        "required": ["deidentified_text"],
        "properties": {
            "deidentified_text": { "type": "string", "minLength": 1 }
        }
    })
}

pub fn basic_summary() -> Value {
    json!({
        "type": "object",
        "required": ["basic_summary"],
        "properties": {
            "age": { "type": ["integer", "null"], "minimum": 0, "maximum": 130 },
            "sex": { "type": ["string", "null"] },
            "basic_summary": { "type": "string", "minLength": 1 }
        }
    })
}

pub fn advanced_summary() -> Value {
    let string_list = json!({ "type": "array", "items": { "type": "string" } });
    json!({
        "type": "object",
        "required": ["advanced_summary", "conditions"],
        "properties": {
            "age": { "type": ["integer", "null"], "minimum": 0, "maximum": 130 },
            "sex": { "type": ["string", "null"] },
            "advanced_summary": { "type": "string", "minLength": 1 },
            "conditions": string_list,
            "medications": string_list,
            "known_activities": string_list,
            "risk_factors": string_list
        }
    })
}

pub fn recommendation_list() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    let mut grades: Vec<Value> = EvidenceGrade::ALL
        .iter()
        .map(|g| Value::from(g.as_str()))
        .collect();
    grades.push(Value::Null);

    json!({
        "type": "object",
        "required": ["recommendations"],
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["description", "category", "source"],
                    "properties": {
                        "id": { "type": "string" },
                        "description": {
                            "type": "string",
                            "minLength": 1,
                            "maxLength": DESCRIPTION_MAX_CHARS
                        },
                        "details": { "type": "string" },
                        "frequency": { "type": "string", "maxLength": FREQUENCY_MAX_CHARS },
                        "category": { "enum": categories },
                        "source": { "type": "string", "minLength": 1 },
                        "rationale": { "type": "string" },
                        "evidence_grade": { "enum": grades }
                    }
                }
            }
        }
    })
}

pub fn assessment_draft() -> Value {
    let statuses: Vec<&str> = ActivityStatus::ALL.iter().map(ActivityStatus::as_str).collect();
    let urgencies: Vec<&str> = Urgency::ALL.iter().map(Urgency::as_str).collect();

    json!({
        "type": "object",
        "required": ["status", "supporting_quote"],
        "properties": {
            "status": { "enum": statuses },
            "supporting_quote": { "type": "string" },
            "confidence_note": { "type": "string" },
            "confidence_score": { "type": ["integer", "null"], "minimum": 0, "maximum": 100 },
            "urgency": { "enum": urgencies },
            "completion_date": { "type": ["string", "null"] },
            "questions": { "type": "array", "items": { "type": "string" } }
        }
    })
}
