//! Shared formatting helpers for TUI rendering.

use chrono::Local;
use conscope_core::{parse_timestamp, Detection, SeverityTier};
use ratatui::style::{Color, Style};

/// Role label and style for conversation message headers.
///
/// Roles come from transcript files unvalidated, so anything unrecognized
/// gets a neutral style with the role text as its own label.
pub fn role_style(role: &str) -> (String, Style) {
    match role.to_lowercase().as_str() {
        "user" | "human" => ("user".to_string(), Style::default().fg(Color::Cyan)),
        "assistant" => ("assistant".to_string(), Style::default().fg(Color::Green)),
        "system" => ("system".to_string(), Style::default().fg(Color::DarkGray)),
        _ => (role.to_string(), Style::default().fg(Color::White)),
    }
}

/// Style for a detection outcome value.
pub fn detection_style(detection: Detection) -> Style {
    match detection {
        Detection::Yes => Style::default().fg(Color::Red),
        Detection::No => Style::default().fg(Color::Green),
        Detection::Unknown => Style::default().fg(Color::DarkGray),
    }
}

/// Style for a severity score, by its display tier.
pub fn severity_style(score: i64) -> Style {
    match SeverityTier::for_score(score) {
        SeverityTier::High => Style::default().fg(Color::Red),
        SeverityTier::Medium => Style::default().fg(Color::Yellow),
        SeverityTier::Low => Style::default().fg(Color::Green),
        SeverityTier::None => Style::default().fg(Color::DarkGray),
    }
}

/// Local-time display form of an archive timestamp; "Unknown" when absent
/// or unparseable.
pub fn format_timestamp(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(parse_timestamp)
        .map(|ts| {
            ts.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Truncate to a maximum character count with an ellipsis.
pub fn truncate(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let kept: String = input.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_fall_back_to_unknown() {
        assert_eq!(format_timestamp(None), "Unknown");
        assert_eq!(format_timestamp(Some("garbage")), "Unknown");
        assert_ne!(
            format_timestamp(Some("2025-04-02T09:16:41.283711")),
            "Unknown"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let long = "héllo wörld wide";
        let cut = truncate(long, 8);
        assert!(cut.chars().count() <= 8);
        assert!(cut.ends_with('…'));
    }
}
