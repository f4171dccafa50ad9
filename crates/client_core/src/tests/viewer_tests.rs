use super::*;

fn citation(filename: &str, page_number: u32) -> SourceCitation {
    SourceCitation::new(filename, page_number, "excerpt")
}

fn open_loaded(page: u32, total: u32) -> ViewerState {
    let mut viewer = ViewerState::default();
    let generation = viewer.open_at(citation("a.pdf", page));
    viewer
        .document_loaded(total, generation)
        .expect("current generation");
    viewer
}

#[test]
fn starts_closed_without_source() {
    let viewer = ViewerState::default();
    assert!(!viewer.is_open());
    assert!(viewer.active_source().is_none());
    assert_eq!(viewer.page_number(), 1);
    assert_eq!(viewer.zoom(), DEFAULT_ZOOM);
    assert!(viewer.pending_load().is_none());
}

#[test]
fn open_at_lands_on_cited_page_with_unknown_total() {
    let mut viewer = ViewerState::default();
    let generation = viewer.open_at(citation("a.pdf", 3));

    assert!(viewer.is_open());
    assert_eq!(viewer.page_number(), 3);
    assert_eq!(viewer.total_pages(), None);
    assert_eq!(viewer.page_label(), "Page 3 / -");
    assert_eq!(
        viewer.pending_load(),
        Some(PendingLoad {
            filename: "a.pdf".to_string(),
            generation,
        })
    );
}

#[test]
fn open_at_page_zero_falls_back_to_first_page() {
    let mut viewer = ViewerState::default();
    viewer.open_at(citation("a.pdf", 0));
    assert_eq!(viewer.page_number(), 1);
}

#[test]
fn every_open_stamps_a_newer_generation() {
    let mut viewer = ViewerState::default();
    let first = viewer.open_at(citation("a.pdf", 1));
    let second = viewer.open_at(citation("a.pdf", 1));
    assert!(second > first);
}

#[test]
fn open_at_preserves_zoom() {
    let mut viewer = ViewerState::default();
    viewer.open_at(citation("a.pdf", 1));
    viewer.zoom_in();
    viewer.zoom_in();
    viewer.open_at(citation("b.pdf", 2));
    assert_eq!(viewer.zoom_percent(), 140);
}

#[test]
fn document_loaded_clamps_optimistic_page() {
    let viewer = open_loaded(9, 4);
    assert_eq!(viewer.total_pages(), Some(4));
    assert_eq!(viewer.page_number(), 4);
    assert_eq!(viewer.page_label(), "Page 4 / 4");
    assert!(viewer.pending_load().is_none());
}

#[test]
fn stale_document_load_is_refused() {
    let mut viewer = ViewerState::default();
    let stale = viewer.open_at(citation("a.pdf", 2));
    let current = viewer.open_at(citation("b.pdf", 1));

    let err = viewer
        .document_loaded(50, stale)
        .expect_err("stale generation must be refused");
    assert!(matches!(
        err,
        ClientError::StaleResponse { received, current: now } if received == stale.0 && now == current.0
    ));
    assert_eq!(viewer.total_pages(), None);

    viewer.document_loaded(7, current).expect("current");
    assert_eq!(viewer.total_pages(), Some(7));
}

#[test]
fn stale_load_failure_does_not_mark_current_document() {
    let mut viewer = ViewerState::default();
    let stale = viewer.open_at(citation("a.pdf", 1));
    viewer.open_at(citation("b.pdf", 1));

    assert!(viewer.load_failed("404", stale).is_err());
    assert!(viewer.load_error().is_none());
}

#[test]
fn zero_page_document_is_a_load_error() {
    let mut viewer = ViewerState::default();
    let generation = viewer.open_at(citation("a.pdf", 1));
    viewer.document_loaded(0, generation).expect("current");
    assert_eq!(viewer.total_pages(), None);
    assert!(viewer.load_error().is_some());
    assert!(viewer.pending_load().is_none());
}

#[test]
fn prev_page_saturates_at_first_page() {
    let mut viewer = open_loaded(1, 5);
    for _ in 0..3 {
        assert!(!viewer.prev_page());
    }
    assert_eq!(viewer.page_number(), 1);
}

#[test]
fn next_page_saturates_at_last_page() {
    let mut viewer = open_loaded(3, 5);
    assert!(viewer.next_page());
    assert!(viewer.next_page());
    assert!(!viewer.next_page());
    assert_eq!(viewer.page_number(), 5);
    assert!(!viewer.has_next_page());
}

#[test]
fn next_page_stops_at_largest_page_before_total_is_known() {
    let mut viewer = ViewerState::default();
    viewer.open_at(citation("a.pdf", u32::MAX));
    assert!(!viewer.has_next_page());
    assert!(!viewer.next_page());
    assert_eq!(viewer.page_number(), u32::MAX);

    assert!(viewer.prev_page());
    assert!(viewer.next_page());
    assert_eq!(viewer.page_number(), u32::MAX);
}

#[test]
fn paging_stays_within_bounds_for_mixed_sequences() {
    let mut viewer = open_loaded(2, 3);
    let moves = [true, true, true, false, false, false, false, true, false, true, true];
    for forward in moves {
        if forward {
            viewer.next_page();
        } else {
            viewer.prev_page();
        }
        assert!((1..=3).contains(&viewer.page_number()));
    }
}

#[test]
fn next_page_is_unbounded_before_total_is_known() {
    let mut viewer = ViewerState::default();
    viewer.open_at(citation("a.pdf", 1));
    for _ in 0..10 {
        assert!(viewer.next_page());
    }
    assert_eq!(viewer.page_number(), 11);
}

#[test]
fn zoom_in_saturates_at_maximum() {
    let mut viewer = open_loaded(1, 1);
    for _ in 0..20 {
        viewer.zoom_in();
    }
    assert_eq!(viewer.zoom(), MAX_ZOOM);
    assert_eq!(viewer.zoom_percent(), 250);
    assert!(!viewer.zoom_in());
}

#[test]
fn zoom_out_saturates_at_minimum() {
    let mut viewer = open_loaded(1, 1);
    for _ in 0..20 {
        viewer.zoom_out();
    }
    assert_eq!(viewer.zoom(), MIN_ZOOM);
    assert_eq!(viewer.zoom_percent(), 60);
    assert!(!viewer.zoom_out());
}

#[test]
fn close_keeps_active_source_for_reopen() {
    let mut viewer = open_loaded(2, 5);
    viewer.close();
    assert!(!viewer.is_open());
    assert_eq!(viewer.active_source().map(|s| s.page_number), Some(2));
    assert!(!viewer.next_page());

    let before = viewer.generation();
    let reopened = viewer.reopen().expect("reopen");
    assert!(reopened > before);
    assert!(viewer.is_open());
    assert_eq!(viewer.page_number(), 2);
    assert_eq!(viewer.total_pages(), None);
}

#[test]
fn reopen_is_a_no_op_without_source_or_while_open() {
    let mut viewer = ViewerState::default();
    assert!(viewer.reopen().is_none());

    viewer.open_at(citation("a.pdf", 1));
    assert!(viewer.reopen().is_none());
}
