use careguide_bedrock::context::{RecordFile, build_record_text};

#[test]
fn empty_files_returns_empty_string() {
    assert_eq!(build_record_text(&[]), "");
}

#[test]
fn single_file_is_passed_through() {
    let files = vec![RecordFile {
        filename: "notes.txt".to_string(),
        text: "Patient reports annual flu shot in October.".to_string(),
    }];

    assert_eq!(
        build_record_text(&files),
        "Patient reports annual flu shot in October."
    );
}

#[test]
fn multiple_files_all_included_without_names() {
    let files = vec![
        RecordFile {
            filename: "jane_doe_pcp.txt".to_string(),
            text: "PCP visit notes.\n".to_string(),
        },
        RecordFile {
            filename: "jane_doe_cardiology.txt".to_string(),
            text: "Cardiology follow-up.".to_string(),
        },
    ];

    let block = build_record_text(&files);
    assert!(block.starts_with("<record_context>"));
    assert!(block.ends_with("</record_context>"));
    assert!(block.contains("<file index=\"1\">"));
    assert!(block.contains("<file index=\"2\">"));
    assert!(block.contains("PCP visit notes."));
    assert!(block.contains("Cardiology follow-up."));
    assert!(!block.contains("jane_doe"));
}
