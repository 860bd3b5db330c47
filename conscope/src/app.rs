//! Application state for the TUI.

use std::path::Path;

use anyhow::{Context, Result};
use conscope_core::catalog;
use conscope_core::filter::{ListControls, SortField};
use conscope_core::transcript::{self, parse_transcript};
use conscope_core::{
    ArchiveClient, BehaviorType, ConversationMessage, Detection, TranscriptDocument,
    TranscriptSummary,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;
use tokio::runtime::Runtime;

/// Current view mode
#[derive(Debug, Clone, Default)]
pub enum ViewMode {
    /// Summary table (default)
    #[default]
    List,
    /// Transcript + analysis detail view
    Detail { filename: String },
    /// Path prompt shown when discovery failed or on demand
    ManualPrompt,
    /// Single local file view, no analysis counterpart
    Manual { source: String },
}

/// Main application state.
///
/// One instance owns everything: the catalog, the visible (filtered/sorted)
/// list, the selection, and the currently loaded document. All mutation
/// happens on the control thread; fetches run on the owned runtime via
/// `block_on`, so selection loads are serialized and cannot apply stale.
pub struct App {
    /// Runtime driving archive fetches
    runtime: Runtime,
    /// Archive client
    client: ArchiveClient,
    /// Full catalog (rebuilt wholesale on reload)
    pub summaries: Vec<TranscriptSummary>,
    /// Filtered and sorted view of the catalog
    pub visible: Vec<TranscriptSummary>,
    /// Filter and sort state
    pub controls: ListControls,
    /// Table selection state
    pub table_state: TableState,
    /// Current view mode
    pub view_mode: ViewMode,
    /// Document for the detail/manual views
    pub document: Option<TranscriptDocument>,
    /// Summary backing the detail view (None in manual mode)
    pub detail_summary: Option<TranscriptSummary>,
    /// Inline error replacing the content panel, if the body load failed
    pub detail_error: Option<String>,
    /// Scroll offset for the conversation pane
    pub scroll_offset: usize,
    /// Scroll offset for the analysis pane
    pub analysis_scroll_offset: usize,
    /// Path being typed in the manual prompt
    pub prompt_input: String,
    /// One-line status notice for the footer
    pub status: Option<String>,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App with the given runtime and archive client.
    pub fn new(runtime: Runtime, client: ArchiveClient) -> Self {
        Self {
            runtime,
            client,
            summaries: Vec::new(),
            visible: Vec::new(),
            controls: ListControls::default(),
            table_state: TableState::default(),
            view_mode: ViewMode::default(),
            document: None,
            detail_summary: None,
            detail_error: None,
            scroll_offset: 0,
            analysis_scroll_offset: 0,
            prompt_input: String::new(),
            status: None,
            should_quit: false,
        }
    }

    /// Load the catalog at startup. Discovery failure switches to the
    /// manual-path prompt instead of aborting.
    pub fn start_catalog(&mut self) {
        match self.runtime.block_on(catalog::load_catalog(&self.client)) {
            Ok(summaries) => {
                tracing::info!(count = summaries.len(), "catalog loaded");
                self.summaries = summaries;
                self.apply_controls();
                self.view_mode = ViewMode::List;
            }
            Err(e) => {
                tracing::warn!(error = %e, "archive listing not available, switching to manual mode");
                self.status =
                    Some("Archive listing unavailable - enter a local transcript path".to_string());
                self.view_mode = ViewMode::ManualPrompt;
            }
        }
    }

    /// Open a local file directly (the `--file` flag). Errors here are
    /// startup errors, unlike prompt-driven loads.
    pub fn start_manual(&mut self, path: &Path) -> Result<()> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.show_manual_document(&body, &path.display().to_string());
        Ok(())
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match &self.view_mode {
            ViewMode::List => self.handle_list_key(key),
            ViewMode::Detail { .. } => self.handle_detail_key(key),
            ViewMode::ManualPrompt => self.handle_prompt_key(key),
            ViewMode::Manual { .. } => self.handle_manual_key(key),
        }
    }

    // ========== List View ==========

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Enter => {
                self.open_selected();
            }
            KeyCode::Char('r') => {
                self.reload();
            }
            KeyCode::Char('m') => {
                self.prompt_input.clear();
                self.view_mode = ViewMode::ManualPrompt;
            }
            KeyCode::Char('b') => {
                self.cycle_behavior_filter();
            }
            KeyCode::Char('d') => {
                self.cycle_detection_filter();
            }
            KeyCode::Char('v') => {
                self.cycle_severity_filter();
            }
            KeyCode::Char('x') => {
                self.controls.clear_filters();
                self.apply_controls();
            }
            KeyCode::Char(c @ '1'..='7') => {
                let column = SortField::COLUMNS[c as usize - '1' as usize];
                self.controls.select_sort(column);
                self.apply_controls();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.select_first();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.select_last();
            }
            _ => {}
        }
    }

    /// Recompute the visible list from the catalog and clamp the selection.
    pub fn apply_controls(&mut self) {
        self.visible = self.controls.apply(&self.summaries);

        if self.visible.is_empty() {
            self.table_state.select(None);
        } else {
            let idx = self
                .table_state
                .selected()
                .unwrap_or(0)
                .min(self.visible.len() - 1);
            self.table_state.select(Some(idx));
        }
    }

    /// Replace the catalog wholesale from the archive.
    fn reload(&mut self) {
        match self.runtime.block_on(catalog::load_catalog(&self.client)) {
            Ok(summaries) => {
                self.status = Some(format!("Reloaded {} transcripts", summaries.len()));
                self.summaries = summaries;
                self.apply_controls();
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.status = Some("Reload failed - keeping previous list".to_string());
            }
        }
    }

    /// Load and open the selected transcript. The fetch blocks the control
    /// thread, so a second selection cannot overtake this one.
    fn open_selected(&mut self) {
        let Some(idx) = self.table_state.selected() else {
            return;
        };
        let Some(summary) = self.visible.get(idx).cloned() else {
            return;
        };
        let filename = summary.filename.clone();

        self.scroll_offset = 0;
        self.analysis_scroll_offset = 0;

        match self
            .runtime
            .block_on(self.client.fetch_transcript(&filename))
        {
            Ok(body) => {
                self.document = Some(parse_transcript(&body));
                self.detail_error = None;
            }
            Err(e) => {
                tracing::error!(file = %filename, error = %e, "failed to load transcript");
                self.document = None;
                self.detail_error = Some(format!("Failed to load transcript: {}", filename));
            }
        }

        self.detail_summary = Some(summary);
        self.view_mode = ViewMode::Detail { filename };
    }

    fn cycle_behavior_filter(&mut self) {
        self.controls.behavior = match self.controls.behavior {
            None => Some(BehaviorType::ALL[0]),
            Some(current) => BehaviorType::ALL
                .iter()
                .position(|b| *b == current)
                .and_then(|idx| BehaviorType::ALL.get(idx + 1))
                .copied(),
        };
        self.apply_controls();
    }

    fn cycle_detection_filter(&mut self) {
        self.controls.detection = match self.controls.detection {
            None => Some(Detection::Yes),
            Some(Detection::Yes) => Some(Detection::No),
            Some(Detection::No) => Some(Detection::Unknown),
            Some(Detection::Unknown) => None,
        };
        self.apply_controls();
    }

    fn cycle_severity_filter(&mut self) {
        self.controls.min_severity = match self.controls.min_severity {
            None => Some(1),
            Some(n) if n < 5 => Some(n + 1),
            Some(_) => None,
        };
        self.apply_controls();
    }

    /// Select the next row in the table.
    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Select the previous row in the table.
    fn select_previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Select the first row.
    fn select_first(&mut self) {
        if !self.visible.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    /// Select the last row.
    fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.table_state.select(Some(self.visible.len() - 1));
        }
    }

    // ========== Detail View ==========

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.close_detail();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::PageDown | KeyCode::Char('d') | KeyCode::Char(' ') => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
            }
            KeyCode::PageUp | KeyCode::Char('u') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_offset = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                // Clamped during rendering
                self.scroll_offset = usize::MAX / 2;
            }
            KeyCode::Char(']') => {
                self.analysis_scroll_offset = self.analysis_scroll_offset.saturating_add(1);
            }
            KeyCode::Char('[') => {
                self.analysis_scroll_offset = self.analysis_scroll_offset.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Close the detail view and return to the list.
    fn close_detail(&mut self) {
        self.view_mode = ViewMode::List;
        self.document = None;
        self.detail_summary = None;
        self.detail_error = None;
        self.scroll_offset = 0;
        self.analysis_scroll_offset = 0;
    }

    /// The Nth assistant message flagged as most problematic, when the
    /// index is present and resolves against the structured document.
    pub fn concerning_response(&self) -> Option<(i64, &ConversationMessage)> {
        let summary = self.detail_summary.as_ref()?;
        let index = summary.most_problematic_response_index?;
        match self.document.as_ref()? {
            TranscriptDocument::Structured(messages) => {
                transcript::assistant_response(messages, index).map(|m| (index, m))
            }
            TranscriptDocument::Raw(_) => None,
        }
    }

    // ========== Manual Mode ==========

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.summaries.is_empty() {
                    self.should_quit = true;
                } else {
                    self.view_mode = ViewMode::List;
                }
            }
            KeyCode::Enter => {
                let path = self.prompt_input.trim().to_string();
                if !path.is_empty() {
                    self.load_manual_path(&path);
                }
            }
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(c) => {
                self.prompt_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_manual_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.document = None;
                if self.summaries.is_empty() {
                    self.view_mode = ViewMode::ManualPrompt;
                } else {
                    self.view_mode = ViewMode::List;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::PageDown | KeyCode::Char('d') | KeyCode::Char(' ') => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
            }
            KeyCode::PageUp | KeyCode::Char('u') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_offset = 0;
            }
            _ => {}
        }
    }

    /// Load a local file typed into the prompt. Failure keeps the prompt
    /// open with a status notice.
    fn load_manual_path(&mut self, path: &str) {
        match std::fs::read_to_string(path) {
            Ok(body) => {
                self.show_manual_document(&body, path);
            }
            Err(e) => {
                tracing::error!(path, error = %e, "failed to read manual file");
                self.status = Some(format!("Failed to read {}: {}", path, e));
            }
        }
    }

    fn show_manual_document(&mut self, body: &str, source: &str) {
        self.document = Some(parse_transcript(body));
        self.detail_summary = None;
        self.detail_error = None;
        self.scroll_offset = 0;
        self.analysis_scroll_offset = 0;
        self.status = None;
        self.view_mode = ViewMode::Manual {
            source: source.to_string(),
        };
    }
}
