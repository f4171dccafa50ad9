//! Text rendering of application state and the event printer task.

use std::sync::Arc;

use client_core::{AppEvent, NoticeKind, Orchestrator, ViewerState};
use shared::domain::Turn;
use tokio::sync::broadcast::error::RecvError;

pub fn format_turn(index: usize, turn: &Turn) -> String {
    match turn {
        Turn::User { content } => format!("[{index}] you: {content}"),
        Turn::Assistant { content, sources } => {
            let mut out = format!("[{index}] assistant: {content}");
            if let Some(first) = sources.first() {
                out.push_str(&format!(
                    "\n      source: {} (page {}) \"{}\"\n      `open {index}` to check the document",
                    first.filename,
                    first.start_page(),
                    first.text.trim()
                ));
            }
            out
        }
    }
}

pub fn format_viewer(viewer: &ViewerState) -> String {
    let Some(source) = viewer.active_source() else {
        return "viewer: no source yet".to_string();
    };
    if !viewer.is_open() {
        return format!("viewer: closed (last source {}; `open` to reopen)", source.filename);
    }
    if let Some(error) = viewer.load_error() {
        return format!("viewer: {} failed to load: {error}", source.filename);
    }
    format!(
        "viewer: {}  {}  {}%",
        source.filename,
        viewer.page_label(),
        viewer.zoom_percent()
    )
}

pub fn format_documents(documents: &[String]) -> String {
    let mut out = format!("{} documents indexed", documents.len());
    for name in documents {
        out.push_str("\n  - ");
        out.push_str(name);
    }
    out
}

/// Remembers what has already been printed so each event only adds the
/// lines that changed.
#[derive(Debug, Default)]
pub struct EventPrinter {
    printed_turns: usize,
    documents: Option<Vec<String>>,
    uploading: bool,
    deleting: bool,
}

impl EventPrinter {
    /// Lines for turns not printed yet. User turns were typed at the prompt
    /// and are skipped.
    pub fn transcript_lines(&mut self, transcript: &[Turn], querying: bool) -> Vec<String> {
        let mut lines: Vec<String> = transcript
            .iter()
            .enumerate()
            .skip(self.printed_turns)
            .filter(|(_, turn)| !turn.is_user())
            .map(|(index, turn)| format_turn(index, turn))
            .collect();
        self.printed_turns = self.printed_turns.max(transcript.len());
        if querying {
            lines.push("... thinking".to_string());
        }
        lines
    }

    pub fn registry_lines(
        &mut self,
        documents: &[String],
        uploading: bool,
        deleting: bool,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        if uploading && !self.uploading {
            lines.push("indexing...".to_string());
        }
        if deleting && !self.deleting {
            lines.push("deleting...".to_string());
        }
        if self.documents.as_deref() != Some(documents) {
            lines.push(format_documents(documents));
            self.documents = Some(documents.to_vec());
        }
        self.uploading = uploading;
        self.deleting = deleting;
        lines
    }
}

/// Prints events until the orchestrator goes away. New turns are printed as
/// they land, which keeps the newest turn on screen.
pub async fn print_events(orchestrator: Arc<Orchestrator>) {
    let mut events = orchestrator.subscribe_events();
    let mut printer = EventPrinter::default();
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event printer lagged");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let lines = match event {
            AppEvent::TranscriptChanged { .. } => {
                // The snapshot may already be ahead of the event.
                let snapshot = orchestrator.snapshot().await;
                printer.transcript_lines(&snapshot.transcript, snapshot.querying)
            }
            AppEvent::ViewerChanged(viewer) => vec![format_viewer(&viewer)],
            AppEvent::RegistryChanged {
                documents,
                uploading,
                deleting,
            } => printer.registry_lines(&documents, uploading, deleting),
            AppEvent::Notice(notice) => {
                match notice.kind {
                    NoticeKind::NotIndexed => println!("note: {}", notice.message),
                    _ => eprintln!("error: {}", notice.message),
                }
                Vec::new()
            }
        };
        for line in lines {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::SourceCitation;

    #[test]
    fn assistant_turn_shows_first_citation() {
        let turn = Turn::assistant(
            "X is a letter.",
            vec![
                SourceCitation::new("a.pdf", 3, " X appears here "),
                SourceCitation::new("b.pdf", 1, "ignored"),
            ],
        );
        let rendered = format_turn(1, &turn);
        assert!(rendered.starts_with("[1] assistant: X is a letter."));
        assert!(rendered.contains("a.pdf (page 3) \"X appears here\""));
        assert!(!rendered.contains("b.pdf"));
    }

    #[test]
    fn viewer_states_render() {
        let mut viewer = ViewerState::default();
        assert_eq!(format_viewer(&viewer), "viewer: no source yet");

        let generation = viewer.open_at(SourceCitation::new("a.pdf", 2, ""));
        assert_eq!(format_viewer(&viewer), "viewer: a.pdf  Page 2 / -  100%");

        viewer.document_loaded(4, generation).expect("current");
        assert_eq!(format_viewer(&viewer), "viewer: a.pdf  Page 2 / 4  100%");

        viewer.close();
        assert!(format_viewer(&viewer).starts_with("viewer: closed"));
    }

    #[test]
    fn document_list_has_count_header() {
        assert_eq!(
            format_documents(&["a.pdf".to_string()]),
            "1 documents indexed\n  - a.pdf"
        );
    }

    #[test]
    fn turns_already_in_the_snapshot_print_once() {
        let mut printer = EventPrinter::default();
        let transcript = vec![Turn::user("q"), Turn::assistant("a", Vec::new())];

        // The begin event arrives after the answer already landed.
        let first = printer.transcript_lines(&transcript, false);
        assert_eq!(first, vec!["[1] assistant: a".to_string()]);

        let second = printer.transcript_lines(&transcript, false);
        assert!(second.is_empty());
    }

    #[test]
    fn thinking_marker_follows_snapshot_flag() {
        let mut printer = EventPrinter::default();
        let lines = printer.transcript_lines(&[Turn::user("q")], true);
        assert_eq!(lines, vec!["... thinking".to_string()]);
    }

    #[test]
    fn refresh_during_upload_prints_list_not_marker() {
        let mut printer = EventPrinter::default();
        let before = vec!["a.pdf".to_string()];
        let after = vec!["a.pdf".to_string(), "b.pdf".to_string()];

        assert_eq!(printer.registry_lines(&before, false, false).len(), 1);
        assert_eq!(
            printer.registry_lines(&before, true, false),
            vec!["indexing...".to_string()]
        );
        assert_eq!(
            printer.registry_lines(&after, true, false),
            vec![format_documents(&after)]
        );
        assert!(printer.registry_lines(&after, false, false).is_empty());
    }
}
