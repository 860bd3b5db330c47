//! Filter & sort engine for the summary list.
//!
//! Filtering and sorting always recompute from the full list; the three
//! filters compose with logical AND. Sorting uses the standard library's
//! stable sort, so equal keys keep their prior relative order.

use std::cmp::Ordering;

use crate::types::{BehaviorType, Detection, TranscriptSummary};

/// A sortable column of the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    BehaviorType,
    Detection,
    FinalSeverity,
    ReasoningSeverity,
    OutputSeverity,
    Timestamp,
    Filename,
}

impl SortField {
    /// Columns in table display order.
    pub const COLUMNS: [SortField; 7] = [
        SortField::BehaviorType,
        SortField::Detection,
        SortField::FinalSeverity,
        SortField::ReasoningSeverity,
        SortField::OutputSeverity,
        SortField::Timestamp,
        SortField::Filename,
    ];

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::BehaviorType => "Behavior",
            SortField::Detection => "Detection",
            SortField::FinalSeverity => "Final",
            SortField::ReasoningSeverity => "Reason",
            SortField::OutputSeverity => "Output",
            SortField::Timestamp => "Timestamp",
            SortField::Filename => "Filename",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// The reviewer's current list controls: up to three filters plus the sort.
#[derive(Debug, Clone)]
pub struct ListControls {
    /// Behavior-type equality filter
    pub behavior: Option<BehaviorType>,
    /// Detection-outcome equality filter
    pub detection: Option<Detection>,
    /// Minimum final severity (inclusive)
    pub min_severity: Option<i64>,
    /// Active sort column
    pub sort_field: SortField,
    /// Active sort direction
    pub sort_order: SortOrder,
}

impl Default for ListControls {
    fn default() -> Self {
        Self {
            behavior: None,
            detection: None,
            min_severity: None,
            sort_field: SortField::FinalSeverity,
            sort_order: SortOrder::Descending,
        }
    }
}

impl ListControls {
    /// True when the summary passes all active filters (AND-composed).
    pub fn matches(&self, summary: &TranscriptSummary) -> bool {
        if let Some(behavior) = self.behavior {
            if summary.behavior_type != behavior {
                return false;
            }
        }
        if let Some(detection) = self.detection {
            if summary.overall_detection != detection {
                return false;
            }
        }
        if let Some(min) = self.min_severity {
            if summary.final_severity < min {
                return false;
            }
        }
        true
    }

    /// Recompute the visible list from the full catalog.
    pub fn apply(&self, summaries: &[TranscriptSummary]) -> Vec<TranscriptSummary> {
        let mut visible: Vec<TranscriptSummary> = summaries
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect();
        visible.sort_by(|a, b| self.compare(a, b));
        visible
    }

    /// Column-header selection: toggle direction on the active column,
    /// otherwise switch to the column with descending as the default.
    pub fn select_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Descending;
        }
    }

    /// Clear all three filters, leaving the sort untouched.
    pub fn clear_filters(&mut self) {
        self.behavior = None;
        self.detection = None;
        self.min_severity = None;
    }

    fn compare(&self, a: &TranscriptSummary, b: &TranscriptSummary) -> Ordering {
        let ordering = match self.sort_field {
            SortField::Timestamp => a.timestamp_utc().cmp(&b.timestamp_utc()),
            SortField::BehaviorType => cmp_str(
                a.behavior_type.display_name(),
                b.behavior_type.display_name(),
            ),
            SortField::Detection => cmp_str(
                a.overall_detection.as_str(),
                b.overall_detection.as_str(),
            ),
            SortField::Filename => cmp_str(&a.filename, &b.filename),
            SortField::FinalSeverity => a.final_severity.cmp(&b.final_severity),
            SortField::ReasoningSeverity => a.reasoning_severity.cmp(&b.reasoning_severity),
            SortField::OutputSeverity => a.output_severity.cmp(&b.output_severity),
        };

        match self.sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Case-insensitive string comparison for sort keys.
fn cmp_str(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::summarize;
    use crate::types::{AnalysisRecord, Evaluation};

    fn summary(filename: &str, detection: &str, severity: i64, timestamp: &str) -> TranscriptSummary {
        let record = AnalysisRecord {
            evaluation: Evaluation {
                overall_detection: Some(detection.to_string()),
                final_severity: Some(severity),
                ..Default::default()
            },
            metadata: crate::types::AnalysisMetadata {
                behavior_description: None,
                timestamp: Some(timestamp.to_string()),
            },
        };
        summarize(filename, Some(&record))
    }

    fn sample() -> Vec<TranscriptSummary> {
        vec![
            summary("transcript_scheming_001.json", "YES", 4, "2025-03-01T08:00:00"),
            summary("transcript_sycophancy_002.json", "NO", 0, "2025-03-02T08:00:00"),
            summary("transcript_scheming_003.json", "YES", 2, "2025-03-03T08:00:00"),
            summary("transcript_power_seeking_004.json", "UNKNOWN", 1, "2025-03-04T08:00:00"),
        ]
    }

    #[test]
    fn filters_compose_as_intersection() {
        let list = sample();
        let mut controls = ListControls::default();
        controls.behavior = Some(BehaviorType::Scheming);
        controls.detection = Some(Detection::Yes);
        controls.min_severity = Some(3);

        let combined = controls.apply(&list);

        // Independently applied filters intersect to the same set.
        let by_behavior: Vec<_> = list
            .iter()
            .filter(|s| s.behavior_type == BehaviorType::Scheming)
            .map(|s| s.filename.clone())
            .collect();
        let by_detection: Vec<_> = list
            .iter()
            .filter(|s| s.overall_detection == Detection::Yes)
            .map(|s| s.filename.clone())
            .collect();
        let by_severity: Vec<_> = list
            .iter()
            .filter(|s| s.final_severity >= 3)
            .map(|s| s.filename.clone())
            .collect();

        for s in &combined {
            assert!(by_behavior.contains(&s.filename));
            assert!(by_detection.contains(&s.filename));
            assert!(by_severity.contains(&s.filename));
        }
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].filename, "transcript_scheming_001.json");
    }

    #[test]
    fn sort_is_idempotent_and_reverses_cleanly() {
        let list = sample();
        let mut controls = ListControls::default();
        controls.sort_field = SortField::FinalSeverity;
        controls.sort_order = SortOrder::Descending;

        let once = controls.apply(&list);
        let twice = controls.apply(&once);
        let names =
            |v: &[TranscriptSummary]| v.iter().map(|s| s.filename.clone()).collect::<Vec<_>>();
        assert_eq!(names(&once), names(&twice));

        controls.sort_order = SortOrder::Ascending;
        let reversed = controls.apply(&list);
        // All keys are distinct here, so the order fully reverses.
        let mut expected = names(&once);
        expected.reverse();
        assert_eq!(names(&reversed), expected);
    }

    #[test]
    fn ties_keep_prior_relative_order() {
        let mut list = sample();
        list.push(summary(
            "transcript_scheming_005.json",
            "YES",
            2,
            "2025-03-05T08:00:00",
        ));
        let mut controls = ListControls::default();
        controls.sort_field = SortField::FinalSeverity;
        controls.sort_order = SortOrder::Descending;

        let sorted = controls.apply(&list);
        // Both severity-2 rows tie; input order (003 before 005) survives.
        let pos_003 = sorted
            .iter()
            .position(|s| s.filename == "transcript_scheming_003.json")
            .unwrap();
        let pos_005 = sorted
            .iter()
            .position(|s| s.filename == "transcript_scheming_005.json")
            .unwrap();
        assert!(pos_003 < pos_005);
    }

    #[test]
    fn timestamp_sort_treats_missing_as_epoch() {
        let mut list = sample();
        list.push(summarize("transcript_env_006.json", None)); // no timestamp
        let mut controls = ListControls::default();
        controls.sort_field = SortField::Timestamp;
        controls.sort_order = SortOrder::Ascending;

        let sorted = controls.apply(&list);
        assert_eq!(sorted[0].filename, "transcript_env_006.json");
    }

    #[test]
    fn header_selection_toggles_active_column_only() {
        let mut controls = ListControls::default();
        assert_eq!(controls.sort_field, SortField::FinalSeverity);
        assert_eq!(controls.sort_order, SortOrder::Descending);

        controls.select_sort(SortField::FinalSeverity);
        assert_eq!(controls.sort_order, SortOrder::Ascending);

        controls.select_sort(SortField::Filename);
        assert_eq!(controls.sort_field, SortField::Filename);
        assert_eq!(controls.sort_order, SortOrder::Descending);
    }
}
