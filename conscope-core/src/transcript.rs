//! Transcript body parsing.
//!
//! Transcript files are ideally JSON with a top-level `transcript` message
//! sequence, but the archive also holds plain-text exports. A parse attempt
//! discriminates the two shapes; the raw path segments text heuristically by
//! role-prefix markers. Neither path errors: a transcript always renders as
//! something.

use serde::Deserialize;

use crate::types::{ConversationMessage, TranscriptDocument};

/// Role-prefix markers recognized in raw-text transcripts, with the role
/// each maps to. Matching is case-insensitive against the trimmed line.
const RAW_MARKERS: &[(&str, &str)] = &[
    ("user:", "user"),
    ("human:", "user"),
    ("assistant:", "assistant"),
    ("ai:", "assistant"),
    ("claude:", "assistant"),
    ("system:", "system"),
];

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawTranscriptFile {
    transcript: Vec<RawEntry>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawEntry {
    role: Option<String>,
    content: Option<String>,
}

/// Parse a transcript body into its document form.
///
/// Entries missing either role or content are skipped; order is preserved.
/// A body that fails the JSON parse is kept verbatim as `Raw`.
pub fn parse_transcript(body: &str) -> TranscriptDocument {
    match serde_json::from_str::<RawTranscriptFile>(body) {
        Ok(file) => TranscriptDocument::Structured(
            file.transcript
                .into_iter()
                .filter_map(|entry| match (entry.role, entry.content) {
                    (Some(role), Some(content)) => Some(ConversationMessage { role, content }),
                    _ => None,
                })
                .collect(),
        ),
        Err(_) => TranscriptDocument::Raw(body.to_string()),
    }
}

/// One segment of a heuristically parsed raw transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSegment {
    /// A role-prefixed message block.
    Message(ConversationMessage),
    /// A line encountered before any role marker, kept verbatim.
    Line(String),
}

/// Segment a raw-text transcript by role-prefix markers.
///
/// Text between markers (embedded newlines included) accumulates into the
/// current message. Blank lines are dropped. Non-blank text before the
/// first marker becomes verbatim `Line` segments.
pub fn segment_raw(content: &str) -> Vec<RawSegment> {
    let mut segments = Vec::new();
    let mut current: Option<ConversationMessage> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if let Some((_, role)) = RAW_MARKERS.iter().find(|(marker, _)| lower.starts_with(marker)) {
            if let Some(message) = current.take() {
                segments.push(RawSegment::Message(message));
            }
            let body = trimmed
                .split_once(':')
                .map(|(_, rest)| rest.trim())
                .unwrap_or("");
            current = Some(ConversationMessage {
                role: role.to_string(),
                content: body.to_string(),
            });
        } else if trimmed.is_empty() {
            // Blank lines neither extend a message nor emit a segment.
        } else if let Some(message) = current.as_mut() {
            message.content.push('\n');
            message.content.push_str(line);
        } else {
            segments.push(RawSegment::Line(line.to_string()));
        }
    }

    if let Some(message) = current {
        segments.push(RawSegment::Message(message));
    }

    segments
}

/// Look up the Nth assistant-authored message (1-based).
///
/// The index counts assistant messages only; anything outside
/// `[1, assistant_count]` yields `None`.
pub fn assistant_response(
    messages: &[ConversationMessage],
    index: i64,
) -> Option<&ConversationMessage> {
    if index < 1 {
        return None;
    }
    messages
        .iter()
        .filter(|m| m.role == "assistant")
        .nth(index as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_transcript_parses_in_order() {
        let body = r#"{"transcript":[
            {"role":"user","content":"Hi"},
            {"role":"assistant","content":"Hello"},
            {"role":"user","content":"How are you?"}
        ]}"#;
        match parse_transcript(body) {
            TranscriptDocument::Structured(messages) => {
                assert_eq!(messages.len(), 3);
                assert_eq!(messages[0].role, "user");
                assert_eq!(messages[0].content, "Hi");
                assert_eq!(messages[1].role, "assistant");
                assert_eq!(messages[1].content, "Hello");
            }
            TranscriptDocument::Raw(_) => panic!("expected structured document"),
        }
    }

    #[test]
    fn entries_missing_role_or_content_are_skipped() {
        let body = r#"{"transcript":[
            {"role":"user"},
            {"content":"orphan"},
            {"role":"assistant","content":"kept"}
        ]}"#;
        match parse_transcript(body) {
            TranscriptDocument::Structured(messages) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].content, "kept");
            }
            TranscriptDocument::Raw(_) => panic!("expected structured document"),
        }
    }

    #[test]
    fn invalid_json_falls_back_to_raw() {
        let body = "User: hello\nAssistant: hi";
        match parse_transcript(body) {
            TranscriptDocument::Raw(text) => assert_eq!(text, body),
            TranscriptDocument::Structured(_) => panic!("expected raw document"),
        }
    }

    #[test]
    fn raw_segmentation_recognizes_markers_case_insensitively() {
        let text = "USER: hello\nAssistant: hi there\nclaude: still me\nSystem: note";
        let segments = segment_raw(text);
        assert_eq!(segments.len(), 4);
        assert_eq!(
            segments[0],
            RawSegment::Message(ConversationMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            })
        );
        assert_eq!(
            segments[2],
            RawSegment::Message(ConversationMessage {
                role: "assistant".to_string(),
                content: "still me".to_string(),
            })
        );
        assert_eq!(
            segments[3],
            RawSegment::Message(ConversationMessage {
                role: "system".to_string(),
                content: "note".to_string(),
            })
        );
    }

    #[test]
    fn continuation_lines_accumulate_with_newlines() {
        let text = "user: first line\n  second line\n\nthird line\nassistant: reply";
        let segments = segment_raw(text);
        assert_eq!(segments.len(), 2);
        match &segments[0] {
            RawSegment::Message(m) => {
                assert_eq!(m.role, "user");
                // Continuations keep their original indentation; the blank
                // line is dropped.
                assert_eq!(m.content, "first line\n  second line\nthird line");
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn text_before_first_marker_is_verbatim_lines() {
        let text = "preamble text\nuser: hello";
        let segments = segment_raw(text);
        assert_eq!(segments[0], RawSegment::Line("preamble text".to_string()));
        assert!(matches!(segments[1], RawSegment::Message(_)));
    }

    #[test]
    fn assistant_response_counts_assistant_messages_only() {
        let messages = vec![
            ConversationMessage {
                role: "user".to_string(),
                content: "Hi".to_string(),
            },
            ConversationMessage {
                role: "assistant".to_string(),
                content: "Hello".to_string(),
            },
            ConversationMessage {
                role: "user".to_string(),
                content: "Again".to_string(),
            },
            ConversationMessage {
                role: "assistant".to_string(),
                content: "Second".to_string(),
            },
        ];

        assert_eq!(assistant_response(&messages, 1).map(|m| m.content.as_str()), Some("Hello"));
        assert_eq!(assistant_response(&messages, 2).map(|m| m.content.as_str()), Some("Second"));
        assert!(assistant_response(&messages, 0).is_none());
        assert!(assistant_response(&messages, 3).is_none());
        assert!(assistant_response(&messages, 5).is_none());
    }
}
