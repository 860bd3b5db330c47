//! Summary catalog assembly.
//!
//! Builds the in-memory summary list the reviewer browses: one entry per
//! discovered transcript, with the matched analysis record's fields merged
//! in explicitly, field by field. The catalog is rebuilt wholesale on every
//! load; there is no incremental update.

use tokio::task::JoinSet;

use crate::archive::ArchiveClient;
use crate::classify;
use crate::error::Result;
use crate::types::{AnalysisRecord, Detection, TranscriptSummary};

/// Build a summary for one transcript from its (optional) analysis record.
///
/// With no record, the summary carries placeholder fields and
/// `has_analysis: false`. Missing fields within a record default; they
/// never error.
pub fn summarize(filename: &str, analysis: Option<&AnalysisRecord>) -> TranscriptSummary {
    let behavior_type = classify::behavior_type(filename);

    match analysis {
        Some(record) => {
            let meta = &record.metadata;
            let eval = &record.evaluation;
            TranscriptSummary {
                filename: filename.to_string(),
                behavior_type,
                behavior_description: meta.behavior_description.clone(),
                timestamp: meta.timestamp.clone(),
                overall_detection: eval
                    .overall_detection
                    .as_deref()
                    .map(Detection::parse)
                    .unwrap_or_default(),
                final_severity: eval.final_severity.unwrap_or(0),
                reasoning_severity: eval.reasoning_severity.unwrap_or(0),
                output_severity: eval.output_severity.unwrap_or(0),
                confidence_level: eval.confidence_level.clone(),
                most_concerning_instance: eval.most_concerning_instance.clone(),
                most_problematic_response_index: eval.most_problematic_response_index,
                systematic_review: eval.systematic_review.clone(),
                reasoning_detection: eval.reasoning_detection.clone(),
                output_detection: eval.output_detection.clone(),
                primary_location: eval.primary_location.clone(),
                has_analysis: true,
            }
        }
        None => TranscriptSummary {
            filename: filename.to_string(),
            behavior_type,
            behavior_description: Some("No analysis available".to_string()),
            timestamp: None,
            overall_detection: Detection::Unknown,
            final_severity: 0,
            reasoning_severity: 0,
            output_severity: 0,
            confidence_level: None,
            most_concerning_instance: None,
            most_problematic_response_index: None,
            systematic_review: None,
            reasoning_detection: None,
            output_detection: None,
            primary_location: None,
            has_analysis: false,
        },
    }
}

/// Discover transcripts and assemble their summaries.
///
/// One analysis resolution runs per file, all launched together and awaited
/// as a group; a failed resolution marks that summary unanalyzed without
/// affecting the rest. Listing order is preserved.
pub async fn load_catalog(client: &ArchiveClient) -> Result<Vec<TranscriptSummary>> {
    let files = client.discover().await?;

    let mut tasks = JoinSet::new();
    for (idx, filename) in files.iter().enumerate() {
        let client = client.clone();
        let filename = filename.clone();
        tasks.spawn(async move {
            let summary = match client.fetch_analysis(&filename).await {
                Ok(body) => {
                    let record = crate::analysis::parse_analysis(&body);
                    summarize(&filename, Some(&record))
                }
                Err(e) => {
                    tracing::debug!(file = %filename, error = %e, "no analysis resolved");
                    summarize(&filename, None)
                }
            };
            (idx, summary)
        });
    }

    let mut slots: Vec<Option<TranscriptSummary>> = vec![None; files.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, summary)) => slots[idx] = Some(summary),
            Err(e) => tracing::warn!(error = %e, "catalog task panicked"),
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
