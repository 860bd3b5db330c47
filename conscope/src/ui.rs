//! UI rendering for the TUI.

use conscope_core::filter::{SortField, SortOrder};
use conscope_core::transcript::{segment_raw, RawSegment};
use conscope_core::{ConversationMessage, TranscriptDocument, TranscriptSummary};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Wrap,
    },
    Frame,
};

use crate::app::{App, ViewMode};
use crate::message_format::{
    detection_style, format_timestamp, role_style, severity_style, truncate,
};

// ========== View Colors ==========

/// Separator line color
const SEPARATOR_COLOR: Color = Color::Rgb(60, 60, 60);
/// Border color for the conversation pane
const BORDER_CONVERSATION: Color = Color::Rgb(80, 160, 80);
/// Border color for the analysis pane
const BORDER_ANALYSIS: Color = Color::Rgb(0, 150, 150);
/// Label color for analysis attributes
const LABEL_COLOR: Color = Color::Rgb(100, 180, 180);

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    match &app.view_mode {
        ViewMode::List => render_list_view(frame, app),
        ViewMode::Detail { filename } => {
            let title = format!("Transcript: {}", filename);
            render_document_view(frame, app, title, false)
        }
        ViewMode::Manual { source } => {
            let title = format!("Manual upload: {}", source);
            render_document_view(frame, app, title, true)
        }
        ViewMode::ManualPrompt => render_prompt_view(frame, app),
    }
}

// ========== List View ==========

/// Render the list view (summary table).
fn render_list_view(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Layout: title bar, filter bar, table, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Title bar
        Constraint::Length(1), // Filter bar
        Constraint::Min(5),    // Table
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_title_bar(frame, chunks[0]);
    render_filter_bar(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
    render_list_footer(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(" conscope", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "  transcript archive review",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let controls = &app.controls;
    let active = Style::default().fg(Color::Yellow);
    let inactive = Style::default().fg(Color::DarkGray);

    let behavior = match controls.behavior {
        Some(b) => Span::styled(b.display_name(), active),
        None => Span::styled("all", inactive),
    };
    let detection = match controls.detection {
        Some(d) => Span::styled(d.as_str(), active),
        None => Span::styled("all", inactive),
    };
    let severity = match controls.min_severity {
        Some(n) => Span::styled(format!(">={}", n), active),
        None => Span::styled("off", inactive),
    };

    let bar = Line::from(vec![
        Span::styled(" behavior ", Style::default().fg(LABEL_COLOR)),
        behavior,
        Span::styled("  detection ", Style::default().fg(LABEL_COLOR)),
        detection,
        Span::styled("  min severity ", Style::default().fg(LABEL_COLOR)),
        severity,
        Span::styled("  │ sort ", Style::default().fg(LABEL_COLOR)),
        Span::styled(controls.sort_field.label(), active),
        Span::styled(
            match controls.sort_order {
                SortOrder::Ascending => " ↑",
                SortOrder::Descending => " ↓",
            },
            active,
        ),
    ]);
    frame.render_widget(Paragraph::new(bar), area);
}

/// Render the summary table.
fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let header_cells = SortField::COLUMNS.into_iter().map(|column| {
        let icon = if column == app.controls.sort_field {
            match app.controls.sort_order {
                SortOrder::Ascending => "↑",
                SortOrder::Descending => "↓",
            }
        } else {
            "↕"
        };
        Cell::from(format!("{} {}", column.label(), icon))
            .style(Style::default().fg(Color::Yellow).bold())
    });
    let header = Row::new(header_cells).height(1);

    let rows = app.visible.iter().map(|summary| summary_row(summary));

    let widths = [
        Constraint::Length(22), // Behavior
        Constraint::Length(11), // Detection
        Constraint::Length(8),  // Final
        Constraint::Length(8),  // Reason
        Constraint::Length(8),  // Output
        Constraint::Length(21), // Timestamp
        Constraint::Fill(1),    // Filename (flexible)
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Transcripts "),
        )
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(Color::Cyan),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn summary_row(summary: &TranscriptSummary) -> Row<'static> {
    // Whole-row tone mirrors the triage urgency: confirmed high-severity
    // detections stand out, clean transcripts recede.
    let row_style = match (summary.overall_detection, summary.final_severity) {
        (conscope_core::Detection::Yes, s) if s >= 4 => Style::default().fg(Color::Red),
        (conscope_core::Detection::Yes, _) => Style::default().fg(Color::Yellow),
        (conscope_core::Detection::No, _) => Style::default().fg(Color::Green),
        _ => Style::default(),
    };

    let filename_style = if summary.has_analysis {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Row::new([
        Cell::from(summary.behavior_type.display_name()),
        Cell::from(summary.overall_detection.as_str())
            .style(detection_style(summary.overall_detection)),
        Cell::from(summary.final_severity.to_string())
            .style(severity_style(summary.final_severity)),
        Cell::from(summary.reasoning_severity.to_string())
            .style(severity_style(summary.reasoning_severity)),
        Cell::from(summary.output_severity.to_string())
            .style(severity_style(summary.output_severity)),
        Cell::from(format_timestamp(summary.timestamp.as_deref())),
        Cell::from(truncate(&summary.filename, 48)).style(filename_style),
    ])
    .style(row_style)
}

/// Render the footer for list view.
fn render_list_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut footer_spans = vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" open  "),
        Span::styled("1-7", Style::default().fg(Color::Yellow)),
        Span::raw(" sort  "),
        Span::styled("b/d/v", Style::default().fg(Color::Yellow)),
        Span::raw(" filter  "),
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::raw(" clear  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" reload  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::raw("│ "),
        Span::styled(
            format!("{} of {} transcripts", app.visible.len(), app.summaries.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Some(status) = &app.status {
        footer_spans.push(Span::raw(" │ "));
        footer_spans.push(Span::styled(
            status.clone(),
            Style::default().fg(Color::Magenta),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(footer_spans)), area);
}

// ========== Detail / Manual Views ==========

/// Render a loaded document with its analysis panel.
fn render_document_view(frame: &mut Frame, app: &mut App, title: String, manual: bool) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(5),    // Panes
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, &title, chunks[0]);

    let panes = Layout::horizontal([
        Constraint::Percentage(58), // Conversation
        Constraint::Percentage(42), // Analysis
    ])
    .split(chunks[1]);

    render_conversation(frame, app, panes[0]);
    render_analysis_panel(frame, app, panes[1], manual);
    render_document_footer(frame, chunks[2]);
}

/// Render the header with title.
fn render_header(frame: &mut Frame, title: &str, area: Rect) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

/// Render the conversation pane.
fn render_conversation(frame: &mut Frame, app: &mut App, area: Rect) {
    // A failed body load replaces the content panel with an inline error;
    // selecting another row recovers.
    if let Some(error) = &app.detail_error {
        let message = Paragraph::new(error.clone())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Conversation "),
            );
        frame.render_widget(message, area);
        return;
    }

    let lines = match &app.document {
        Some(document) => conversation_lines(document),
        None => vec![Line::from(Span::styled(
            "No transcript loaded",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    // Clamp scroll offset
    let max_scroll = lines.len().saturating_sub(area.height as usize);
    if app.scroll_offset > max_scroll {
        app.scroll_offset = max_scroll;
    }

    let line_count = lines.len();
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_CONVERSATION))
                .title(" Conversation ")
                .title_style(Style::default().fg(BORDER_CONVERSATION).bold()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(line_count).position(app.scroll_offset);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(ratatui::layout::Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Build display lines for a loaded document, one pass over its messages.
fn conversation_lines(document: &TranscriptDocument) -> Vec<Line<'static>> {
    match document {
        TranscriptDocument::Structured(messages) => {
            if messages.is_empty() {
                return vec![Line::from(Span::styled(
                    "No conversation data available",
                    Style::default().fg(Color::DarkGray),
                ))];
            }
            let mut lines = Vec::new();
            for (idx, message) in messages.iter().enumerate() {
                if idx > 0 {
                    push_separator(&mut lines);
                }
                push_message(&mut lines, message);
            }
            lines
        }
        TranscriptDocument::Raw(text) => {
            let segments = segment_raw(text);
            if segments.is_empty() {
                return vec![Line::from(Span::styled(
                    "(empty transcript)",
                    Style::default().fg(Color::DarkGray),
                ))];
            }
            let mut lines = Vec::new();
            let mut first = true;
            for segment in segments {
                match segment {
                    RawSegment::Message(message) => {
                        if !first {
                            push_separator(&mut lines);
                        }
                        push_message(&mut lines, &message);
                        first = false;
                    }
                    RawSegment::Line(text) => {
                        lines.push(Line::from(Span::styled(
                            text,
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
            }
            lines
        }
    }
}

fn push_separator(lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(Span::styled(
        "─".repeat(40),
        Style::default().fg(SEPARATOR_COLOR),
    )));
}

/// Format one message block: role header plus indented content.
fn push_message(lines: &mut Vec<Line<'static>>, message: &ConversationMessage) {
    let (label, style) = role_style(&message.role);
    lines.push(Line::from(Span::styled(
        format!("[{}]", label),
        style.bold(),
    )));
    for line in message.content.lines() {
        lines.push(Line::from(Span::raw(format!("  {}", line))));
    }
    lines.push(Line::raw(""));
}

/// Render the analysis pane.
fn render_analysis_panel(frame: &mut Frame, app: &mut App, area: Rect, manual: bool) {
    let lines = if manual {
        manual_analysis_lines()
    } else {
        match &app.detail_summary {
            Some(summary) => analysis_lines(summary, app.concerning_response()),
            None => vec![Line::from(Span::styled(
                "No analysis available",
                Style::default().fg(Color::DarkGray),
            ))],
        }
    };

    let max_scroll = lines.len().saturating_sub(area.height as usize);
    if app.analysis_scroll_offset > max_scroll {
        app.analysis_scroll_offset = max_scroll;
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_ANALYSIS))
                .title(" Analysis ")
                .title_style(Style::default().fg(BORDER_ANALYSIS).bold()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.analysis_scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}

fn label_span(label: &str) -> Span<'static> {
    Span::styled(format!("{}: ", label), Style::default().fg(LABEL_COLOR))
}

fn text_or(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Build the analysis panel lines for a summary.
fn analysis_lines(
    summary: &TranscriptSummary,
    concerning: Option<(i64, &ConversationMessage)>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        label_span("Behavior"),
        Span::raw(text_or(summary.behavior_description.as_deref(), "Unknown")),
    ]));
    lines.push(Line::from(vec![
        label_span("Evaluated"),
        Span::raw(format_timestamp(summary.timestamp.as_deref())),
    ]));
    lines.push(Line::from(vec![
        label_span("Detection"),
        Span::styled(
            summary.overall_detection.as_str(),
            detection_style(summary.overall_detection),
        ),
    ]));

    // Supplemental axes, present only in newer analysis files.
    if summary.reasoning_detection.is_some() || summary.output_detection.is_some() {
        lines.push(Line::from(vec![
            label_span("Reasoning/output"),
            Span::raw(format!(
                "{} / {}",
                text_or(summary.reasoning_detection.as_deref(), "-"),
                text_or(summary.output_detection.as_deref(), "-"),
            )),
        ]));
    }
    if let Some(location) = &summary.primary_location {
        lines.push(Line::from(vec![
            label_span("Primary location"),
            Span::raw(location.clone()),
        ]));
    }

    for (label, score) in [
        ("Final severity", summary.final_severity),
        ("Reasoning severity", summary.reasoning_severity),
        ("Output severity", summary.output_severity),
    ] {
        lines.push(Line::from(vec![
            label_span(label),
            Span::styled(score.to_string(), severity_style(score)),
        ]));
    }

    lines.push(Line::from(vec![
        label_span("Confidence"),
        Span::raw(text_or(summary.confidence_level.as_deref(), "Unknown")),
    ]));

    if !summary.has_analysis {
        lines.push(Line::from(Span::styled(
            "(no analysis file found)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(label_span("Most concerning instance")));
    push_text_block(
        &mut lines,
        &text_or(
            summary.most_concerning_instance.as_deref(),
            "No specific instance identified",
        ),
    );

    if let Some((index, message)) = concerning {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("Most problematic response (#{})", index),
            Style::default().fg(Color::Red).bold(),
        )));
        push_text_block(&mut lines, &message.content);
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(label_span("Systematic review")));
    push_text_block(
        &mut lines,
        &text_or(
            summary.systematic_review.as_deref(),
            "No systematic review available",
        ),
    );

    lines
}

/// Analysis panel for manually uploaded files: everything is N/A.
fn manual_analysis_lines() -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        label_span("Behavior"),
        Span::raw("Manual upload"),
    ])];
    for label in [
        "Evaluated",
        "Detection",
        "Final severity",
        "Reasoning severity",
        "Output severity",
        "Confidence",
    ] {
        lines.push(Line::from(vec![label_span(label), Span::raw("N/A")]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(label_span("Most concerning instance")));
    push_text_block(&mut lines, "No analysis file provided");
    lines.push(Line::raw(""));
    lines.push(Line::from(label_span("Systematic review")));
    push_text_block(&mut lines, "No analysis file provided");
    lines
}

fn push_text_block(lines: &mut Vec<Line<'static>>, text: &str) {
    for line in text.lines() {
        lines.push(Line::from(Span::raw(format!("  {}", line))));
    }
}

/// Render the footer for detail/manual views.
fn render_document_footer(frame: &mut Frame, area: Rect) {
    let footer = Line::from(vec![
        Span::styled(" Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" back  "),
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("u/d", Style::default().fg(Color::Yellow)),
        Span::raw(" page  "),
        Span::styled("[/]", Style::default().fg(Color::Yellow)),
        Span::raw(" analysis  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" close"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(footer), area);
}

// ========== Manual Prompt ==========

/// Render the manual-path prompt shown when discovery is unavailable.
fn render_prompt_view(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(2), // Title bar
        Constraint::Min(3),    // Prompt
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_title_bar(frame, chunks[0]);

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::raw(
            "Enter the path of a local transcript file (.txt or .json):",
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.prompt_input.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
    ];
    if let Some(status) = &app.status {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let prompt = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Manual upload "),
    );
    frame.render_widget(prompt, chunks[1]);

    let footer = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" open file  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" back/quit"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}
