//! Analysis resolution and parsing.
//!
//! Analysis files were written by several generations of evaluation tooling
//! under different naming conventions, so resolution tries a fixed list of
//! candidate names. Bodies are strict JSON when the tooling saved them
//! properly, or raw tagged model output otherwise; the tag-scrape fallback
//! recovers only the detection outcome and reasoning severity and is
//! intentionally lossy.

use regex::Regex;

use crate::types::AnalysisRecord;

/// Candidate analysis filenames for a transcript, in resolution order.
///
/// The first name that fetches successfully wins. Resolution restarts from
/// the first candidate on every call; nothing is memoized.
pub fn analysis_candidates(filename: &str) -> Vec<String> {
    let base = filename.strip_suffix(".json").unwrap_or(filename);
    vec![
        format!("eval_{base}.json"),
        format!("eval_{filename}"),
        format!("{}.json", base.replacen("transcript_", "eval_transcript_", 1)),
        format!("{}.json", base.replacen("transcript_", "monitor_", 1)),
    ]
}

/// Parse an analysis body: strict JSON first, tag scrape on failure.
///
/// The fallback never errors; an unparseable body simply yields a mostly
/// empty record.
pub fn parse_analysis(body: &str) -> AnalysisRecord {
    match serde_json::from_str::<AnalysisRecord>(body) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "analysis body is not JSON, scraping tags");
            scrape_tagged(body)
        }
    }
}

/// Tags the fallback recognizes. Anything else is plain text.
const SCRAPED_TAGS: &[&str] = &["overall_detection", "reasoning_severity"];

/// Best-effort extraction from tag-delimited model output.
///
/// Only `<overall_detection>` and `<reasoning_severity>` are recognized
/// (case-insensitive, non-greedy, first occurrence); everything outside the
/// recognized tag pairs becomes the systematic review text.
fn scrape_tagged(body: &str) -> AnalysisRecord {
    let mut record = AnalysisRecord::default();

    if let Some(value) = extract_tag(body, "overall_detection") {
        record.evaluation.overall_detection = Some(value);
    }
    if let Some(value) = extract_tag(body, "reasoning_severity") {
        record.evaluation.reasoning_severity = value.trim().parse::<i64>().ok();
    }

    // Remove the recognized tag pairs with their contents, then any stray
    // angle-bracket markers; what remains is the review text.
    let mut leftover = body.to_string();
    for tag in SCRAPED_TAGS {
        if let Ok(pair) = Regex::new(&format!(r"(?is)<{tag}>.*?</{tag}>")) {
            leftover = pair.replace_all(&leftover, "").into_owned();
        }
    }
    if let Ok(markers) = Regex::new(r"<[^>]+>") {
        leftover = markers.replace_all(&leftover, "").into_owned();
    }
    let leftover = leftover.trim();
    if !leftover.is_empty() {
        record.evaluation.systematic_review = Some(leftover.to_string());
    }

    record
}

fn extract_tag(body: &str, tag: &str) -> Option<String> {
    let pattern = format!(r"(?is)<{tag}>(.*?)</{tag}>");
    let re = Regex::new(&pattern).ok()?;
    re.captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}
