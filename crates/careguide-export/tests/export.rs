use careguide_core::models::assessment::{ActivityStatus, Assessment, Urgency};
use careguide_core::models::recommendation::{Category, EvidenceGrade, Recommendation};
use careguide_core::models::report::{ClarifyingQuestion, HealthReport};
use careguide_core::models::summary::Summary;
use careguide_core::scoring::{ScoringWeights, score};
use careguide_export::error::ExportError;
use careguide_export::json::{read_report, report_file_name, write_report};
use careguide_export::render::{render_markdown, render_template};

fn recommendation(id: &str, description: &str, grade: Option<EvidenceGrade>) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        description: description.to_string(),
        details: String::new(),
        frequency: "Every 10 years".to_string(),
        category: Category::PreventiveScreening,
        source: "USPSTF Grade A".to_string(),
        rationale: String::new(),
        evidence_grade: grade,
    }
}

fn assessment(rec: &Recommendation, status: ActivityStatus, quote: &str) -> Assessment {
    Assessment {
        recommendation_id: rec.id.clone(),
        description: rec.description.clone(),
        evidence_grade: rec.evidence_grade,
        status,
        supporting_quote: quote.to_string(),
        confidence_note: String::new(),
        confidence_score: Some(90),
        urgency: Urgency::Medium,
        completion_date: None,
        questions: vec![],
    }
}

fn sample_report() -> HealthReport {
    let crc = recommendation("rec-1", "Colorectal cancer screening", Some(EvidenceGrade::A));
    let flu = recommendation("rec-2", "Annual influenza vaccine", None);
    let assessments = vec![
        assessment(&crc, ActivityStatus::Done, "colonoscopy completed August 2023"),
        assessment(&flu, ActivityStatus::Unclear, ""),
    ];

    HealthReport {
        id: uuid::Uuid::new_v4(),
        generated_at: "2025-02-06T14:30:05Z".parse().unwrap(),
        model_id: "replay".to_string(),
        sources: vec!["visit_notes.txt".to_string()],
        summary: Summary {
            age: Some(62),
            age_band: Some("50-64".to_string()),
            sex: Some("female".to_string()),
            basic_summary: "62-year-old female".to_string(),
            advanced_summary: "62-year-old female with hypertension".to_string(),
            conditions: vec!["Hypertension".to_string()],
            ..Summary::default()
        },
        score: score(&assessments, &ScoringWeights::default()),
        recommendations: vec![crc, flu],
        assessments,
        clarifying_questions: vec![ClarifyingQuestion {
            recommendation_id: "rec-2".to_string(),
            question: "Did you get a flu shot this season?".to_string(),
        }],
        transactions: vec![],
        total_cost_usd: 0.0123,
    }
}

#[test]
fn file_name_uses_the_generation_time_in_utc() {
    assert_eq!(report_file_name(&sample_report()), "assessment_20250206_143005.json");
}

#[test]
fn written_report_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let report = sample_report();

    let path = write_report(&report, &dir.path().join("nested/output")).unwrap();
    assert!(path.ends_with("assessment_20250206_143005.json"));

    let back = read_report(&path).unwrap();
    assert_eq!(back.id, report.id);
    assert_eq!(back.score, report.score);
    assert_eq!(back.assessments.len(), 2);
}

#[test]
fn reading_garbage_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(matches!(read_report(&path), Err(ExportError::Serialization(_))));
    assert!(matches!(
        read_report(&dir.path().join("absent.json")),
        Err(ExportError::Io { .. })
    ));
}

#[test]
fn markdown_shows_score_evidence_and_questions() {
    let markdown = render_markdown(&sample_report()).unwrap();

    assert!(markdown.contains("## Health Engagement Score: 75/100"));
    assert!(markdown.contains("| rec-1 | Colorectal cancer screening | A | Done | medium |"));
    assert!(markdown.contains("| rec-2 | Annual influenza vaccine | - | Needs confirmation | medium |"));
    assert!(markdown.contains("\"colonoscopy completed August 2023\""));
    assert!(markdown.contains("[rec-2] Did you get a flu shot this season?"));
    assert!(markdown.contains("**Conditions:** Hypertension"));
}

#[test]
fn bad_template_is_a_parse_error() {
    let err = render_template("broken.md", "{% if %}", &sample_report()).unwrap_err();
    assert!(matches!(err, ExportError::TemplateParse(_)));
}
