//! Core domain types for conscope
//!
//! These types model a static transcript archive: conversation transcripts
//! stored one per file, and separately stored analysis records judging each
//! transcript for a target behavior.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Transcript** | A recorded multi-turn conversation (user/assistant/system), one file |
//! | **Analysis record** | A stored judgment about a transcript: detection outcome + severity scores |
//! | **Detection** | Whether the target behavior was found (YES/NO/UNKNOWN) |
//! | **Severity** | Integer score, 0 = no concern; three axes: final, reasoning, output |
//! | **Behavior type** | Category of concerning behavior, derived from the transcript filename |
//! | **Summary** | One table row: a transcript filename plus its flattened analysis fields |

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

// ============================================
// Behavior categories
// ============================================

/// The closed set of behavior categories a transcript can be labeled with.
///
/// Classification is purely filename-driven; see [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorType {
    EconomicExploitation,
    PowerSeeking,
    ProAiBias,
    ShutdownResistance,
    Disempowerment,
    Scheming,
    Sycophancy,
    Unknown,
}

impl BehaviorType {
    /// All categories, in display order. Used for cycling the behavior filter.
    pub const ALL: [BehaviorType; 8] = [
        BehaviorType::EconomicExploitation,
        BehaviorType::PowerSeeking,
        BehaviorType::ProAiBias,
        BehaviorType::ShutdownResistance,
        BehaviorType::Disempowerment,
        BehaviorType::Scheming,
        BehaviorType::Sycophancy,
        BehaviorType::Unknown,
    ];

    /// Returns the display label for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            BehaviorType::EconomicExploitation => "Economic Exploitation",
            BehaviorType::PowerSeeking => "Power Seeking",
            BehaviorType::ProAiBias => "Pro-AI Bias",
            BehaviorType::ShutdownResistance => "Shutdown Resistance",
            BehaviorType::Disempowerment => "Disempowerment",
            BehaviorType::Scheming => "Scheming",
            BehaviorType::Sycophancy => "Sycophancy",
            BehaviorType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================
// Detection outcome
// ============================================

/// Whether the target behavior was detected in a transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Detection {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Detection {
    /// Parse a detection value leniently: case-insensitive, anything
    /// unrecognized collapses to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "YES" => Detection::Yes,
            "NO" => Detection::No,
            _ => Detection::Unknown,
        }
    }

    /// Returns the canonical wire/display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Detection::Yes => "YES",
            Detection::No => "NO",
            Detection::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Severity tiers
// ============================================

/// Visual classification tier for a severity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTier {
    /// Score >= 4
    High,
    /// Score >= 2
    Medium,
    /// Score > 0
    Low,
    /// Score 0 or absent
    None,
}

impl SeverityTier {
    /// Classify a severity score into its display tier.
    pub fn for_score(score: i64) -> Self {
        if score >= 4 {
            SeverityTier::High
        } else if score >= 2 {
            SeverityTier::Medium
        } else if score > 0 {
            SeverityTier::Low
        } else {
            SeverityTier::None
        }
    }
}

// ============================================
// Transcript content
// ============================================

/// One message of a loaded conversation.
///
/// The role is kept as free text (expected values: user/assistant/system)
/// since transcript files are not validated against an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

/// A loaded transcript body, discriminated by a parse attempt.
///
/// Structured transcripts carry an ordered message sequence; anything that
/// fails the JSON parse is kept verbatim for heuristic line rendering.
#[derive(Debug, Clone)]
pub enum TranscriptDocument {
    Structured(Vec<ConversationMessage>),
    Raw(String),
}

// ============================================
// Analysis records
// ============================================

/// A parsed analysis file: metadata about the evaluated transcript plus the
/// evaluation results themselves.
///
/// Every field is optional; missing or oddly typed fields default rather
/// than fail the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisRecord {
    pub metadata: AnalysisMetadata,
    pub evaluation: Evaluation,
}

/// Metadata block of an analysis record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    pub behavior_description: Option<String>,
    /// ISO-8601 timestamp of when the evaluation ran.
    pub timestamp: Option<String>,
}

/// Evaluation block of an analysis record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Evaluation {
    pub overall_detection: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub final_severity: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub reasoning_severity: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub output_severity: Option<i64>,
    pub confidence_level: Option<String>,
    pub most_concerning_instance: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub most_problematic_response_index: Option<i64>,
    pub systematic_review: Option<String>,
    pub reasoning_detection: Option<String>,
    pub output_detection: Option<String>,
    pub primary_location: Option<String>,
}

/// Accept an integer, a float, a numeric string, or null, defaulting to
/// `None` for anything else. Analysis files come from multiple generations
/// of tooling and are not strictly typed.
fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

// ============================================
// Transcript summaries
// ============================================

/// One row of the reviewer's table: a transcript filename plus the flattened
/// fields of its matched analysis record.
///
/// `filename` is the unique key within a catalog. When no analysis file was
/// resolved, `has_analysis` is false and every analysis field holds its
/// placeholder default.
#[derive(Debug, Clone)]
pub struct TranscriptSummary {
    pub filename: String,
    pub behavior_type: BehaviorType,
    pub behavior_description: Option<String>,
    pub timestamp: Option<String>,
    pub overall_detection: Detection,
    pub final_severity: i64,
    pub reasoning_severity: i64,
    pub output_severity: i64,
    pub confidence_level: Option<String>,
    pub most_concerning_instance: Option<String>,
    pub most_problematic_response_index: Option<i64>,
    pub systematic_review: Option<String>,
    pub reasoning_detection: Option<String>,
    pub output_detection: Option<String>,
    pub primary_location: Option<String>,
    pub has_analysis: bool,
}

impl TranscriptSummary {
    /// Timestamp as a date value for sorting; missing or unparseable
    /// timestamps sort as the Unix epoch.
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        self.timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Parse an archive timestamp: RFC 3339 first, then the timezone-less
/// ISO form the evaluation tooling writes.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}
