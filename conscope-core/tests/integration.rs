//! Integration tests for the archive parsing and summary pipeline
//!
//! These tests use fixture files in `tests/fixtures/archive/` to verify the
//! discovery → parse → merge → filter flow end to end, without a live file
//! server.

use std::path::PathBuf;

use conscope_core::analysis::{analysis_candidates, parse_analysis};
use conscope_core::catalog::summarize;
use conscope_core::filter::{ListControls, SortField, SortOrder};
use conscope_core::listing::transcript_files;
use conscope_core::transcript::{assistant_response, parse_transcript, segment_raw, RawSegment};
use conscope_core::{BehaviorType, Detection, SeverityTier, TranscriptDocument};

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/archive")
        .join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("failed to read fixture")
}

// ============================================
// Discovery
// ============================================

#[test]
fn listing_scrape_keeps_only_transcript_json_files() {
    let html = fixture("listing.html");
    let files = transcript_files(&html);

    assert_eq!(
        files,
        vec![
            "transcript_scheming_003.json",
            "transcript_env_012.json",
            "transcript_power_seeking_001.json",
        ]
    );
    // The raw .txt export, the eval file, dotfiles, and the parent link are
    // all filtered out.
    assert!(!files.iter().any(|f| f.ends_with(".txt")));
    assert!(!files.iter().any(|f| f.starts_with("eval_")));
}

// ============================================
// Analysis resolution and merge
// ============================================

#[test]
fn analysis_resolution_order_for_discovered_files() {
    let candidates = analysis_candidates("transcript_power_seeking_001.json");
    assert_eq!(candidates.len(), 4);
    assert_eq!(candidates[0], "eval_transcript_power_seeking_001.json");
    assert_eq!(candidates[3], "monitor_power_seeking_001.json");
}

#[test]
fn json_analysis_merges_into_summary_with_medium_tier() {
    let body = fixture("eval_transcript_scheming_003.json");
    let record = parse_analysis(&body);
    let summary = summarize("transcript_scheming_003.json", Some(&record));

    assert!(summary.has_analysis);
    assert_eq!(summary.behavior_type, BehaviorType::Scheming);
    assert_eq!(summary.overall_detection, Detection::Yes);
    assert_eq!(summary.final_severity, 3);
    assert_eq!(
        SeverityTier::for_score(summary.final_severity),
        SeverityTier::Medium
    );
    assert_eq!(summary.reasoning_severity, 4);
    assert_eq!(summary.output_severity, 1);
    assert_eq!(summary.confidence_level.as_deref(), Some("HIGH"));
    assert_eq!(summary.most_problematic_response_index, Some(1));
    assert_eq!(summary.reasoning_detection.as_deref(), Some("YES"));
    assert_eq!(summary.output_detection.as_deref(), Some("NO"));
    assert_eq!(summary.primary_location.as_deref(), Some("reasoning"));
    assert!(summary.timestamp_utc() > chrono::DateTime::UNIX_EPOCH);
}

#[test]
fn missing_analysis_yields_unanalyzed_summary() {
    let summary = summarize("transcript_scheming_003.json", None);
    assert_eq!(summary.behavior_type, BehaviorType::Scheming);
    assert!(!summary.has_analysis);
    assert_eq!(summary.overall_detection, Detection::Unknown);
    assert_eq!(summary.final_severity, 0);
}

#[test]
fn tagged_analysis_falls_back_to_scrape() {
    let body = fixture("monitor_env_012.txt");
    let record = parse_analysis(&body);

    assert_eq!(record.evaluation.overall_detection.as_deref(), Some("YES"));
    assert_eq!(record.evaluation.reasoning_severity, Some(5));
    assert_eq!(
        record.evaluation.systematic_review.as_deref(),
        Some("extra notes")
    );

    let summary = summarize("transcript_env_012.json", Some(&record));
    assert_eq!(summary.behavior_type, BehaviorType::Sycophancy);
    assert_eq!(summary.overall_detection, Detection::Yes);
    assert_eq!(summary.reasoning_severity, 5);
    // The fallback recovers nothing for the other axes.
    assert_eq!(summary.final_severity, 0);
    assert_eq!(summary.output_severity, 0);
}

// ============================================
// Transcript documents
// ============================================

#[test]
fn structured_transcript_and_concerning_response_lookup() {
    let body = fixture("transcript_scheming_003.json");
    let document = parse_transcript(&body);

    let messages = match document {
        TranscriptDocument::Structured(messages) => messages,
        TranscriptDocument::Raw(_) => panic!("fixture should parse structurally"),
    };
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0].role, "system");

    // Index 1 is the first assistant message, not the first message.
    let first = assistant_response(&messages, 1).expect("index 1 should resolve");
    assert_eq!(first.content, "Hello");

    // Two assistant messages exist; index 5 is out of range.
    assert!(assistant_response(&messages, 5).is_none());
}

#[test]
fn raw_transcript_segments_by_role_markers() {
    let body = fixture("transcript_raw_export.txt");
    let document = parse_transcript(&body);

    let text = match document {
        TranscriptDocument::Raw(text) => text,
        TranscriptDocument::Structured(_) => panic!("fixture should not parse as JSON"),
    };

    let segments = segment_raw(&text);
    assert_eq!(segments.len(), 4);
    assert_eq!(
        segments[0],
        RawSegment::Line("Exported conversation (plain text)".to_string())
    );
    match &segments[2] {
        RawSegment::Message(m) => {
            assert_eq!(m.role, "assistant");
            assert!(m.content.starts_with("I'd suggest"));
            // The continuation line folded into the same message.
            assert!(m.content.contains("\nIf you explain"));
        }
        other => panic!("expected assistant message, got {:?}", other),
    }
    match &segments[3] {
        RawSegment::Message(m) => assert_eq!(m.role, "system"),
        other => panic!("expected system message, got {:?}", other),
    }
}

// ============================================
// Filter & sort over merged summaries
// ============================================

#[test]
fn filter_and_sort_over_a_mixed_catalog() {
    let analyzed = {
        let record = parse_analysis(&fixture("eval_transcript_scheming_003.json"));
        summarize("transcript_scheming_003.json", Some(&record))
    };
    let scraped = {
        let record = parse_analysis(&fixture("monitor_env_012.txt"));
        summarize("transcript_env_012.json", Some(&record))
    };
    let unanalyzed = summarize("transcript_power_seeking_001.json", None);

    let catalog = vec![analyzed, scraped, unanalyzed];

    // Severity filter: only the JSON-analyzed transcript has final >= 2.
    let controls = ListControls {
        min_severity: Some(2),
        ..Default::default()
    };
    let visible = controls.apply(&catalog);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].filename, "transcript_scheming_003.json");

    // Detection filter composes with behavior filter.
    let controls = ListControls {
        detection: Some(Detection::Yes),
        behavior: Some(BehaviorType::Sycophancy),
        ..Default::default()
    };
    let visible = controls.apply(&catalog);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].filename, "transcript_env_012.json");

    // Default sort: final severity descending.
    let controls = ListControls::default();
    assert_eq!(controls.sort_field, SortField::FinalSeverity);
    assert_eq!(controls.sort_order, SortOrder::Descending);
    let visible = controls.apply(&catalog);
    assert_eq!(visible[0].filename, "transcript_scheming_003.json");
}
