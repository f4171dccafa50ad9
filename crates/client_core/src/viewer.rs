//! Document viewer state: which citation is shown, at which page and zoom.
//!
//! The viewer never fetches bytes itself. Every `open_at` stamps a fresh
//! [`GenerationToken`]; whoever loads the document reports back with the
//! token it started with, and reports for an older token are refused.

use shared::domain::SourceCitation;

use crate::error::ClientError;

pub const MIN_ZOOM: f32 = 0.6;
pub const MAX_ZOOM: f32 = 2.5;
pub const ZOOM_STEP: f32 = 0.2;
pub const DEFAULT_ZOOM: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GenerationToken(pub u64);

impl GenerationToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

// Rounded to hundredths so repeated steps do not drift.
fn clamp_zoom(zoom: f32) -> f32 {
    ((zoom * 100.0).round() / 100.0).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// A load the viewer is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub filename: String,
    pub generation: GenerationToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    active_source: Option<SourceCitation>,
    is_open: bool,
    page_number: u32,
    total_pages: Option<u32>,
    zoom: f32,
    generation: GenerationToken,
    load_error: Option<String>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            active_source: None,
            is_open: false,
            page_number: 1,
            total_pages: None,
            zoom: DEFAULT_ZOOM,
            generation: GenerationToken::default(),
            load_error: None,
        }
    }
}

impl ViewerState {
    pub fn active_source(&self) -> Option<&SourceCitation> {
        self.active_source.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn generation(&self) -> GenerationToken {
        self.generation
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Opens the viewer on `source`. Zoom is kept from the previous document.
    pub fn open_at(&mut self, source: SourceCitation) -> GenerationToken {
        self.page_number = source.start_page();
        self.active_source = Some(source);
        self.total_pages = None;
        self.load_error = None;
        self.is_open = true;
        self.generation = self.generation.next();
        self.generation
    }

    /// Re-opens the last active source after `close`.
    pub fn reopen(&mut self) -> Option<GenerationToken> {
        if self.is_open {
            return None;
        }
        let source = self.active_source.clone()?;
        Some(self.open_at(source))
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// The document that still needs a page count, if any.
    pub fn pending_load(&self) -> Option<PendingLoad> {
        if !self.is_open || self.total_pages.is_some() || self.load_error.is_some() {
            return None;
        }
        self.active_source.as_ref().map(|source| PendingLoad {
            filename: source.filename.clone(),
            generation: self.generation,
        })
    }

    fn check_generation(&self, generation: GenerationToken) -> Result<(), ClientError> {
        if generation != self.generation {
            return Err(ClientError::StaleResponse {
                received: generation.0,
                current: self.generation.0,
            });
        }
        Ok(())
    }

    pub fn document_loaded(
        &mut self,
        page_count: u32,
        generation: GenerationToken,
    ) -> Result<(), ClientError> {
        self.check_generation(generation)?;
        if page_count == 0 {
            self.load_error = Some("document has no pages".to_string());
            return Ok(());
        }
        self.total_pages = Some(page_count);
        self.page_number = self.page_number.clamp(1, page_count);
        Ok(())
    }

    pub fn load_failed(
        &mut self,
        reason: impl Into<String>,
        generation: GenerationToken,
    ) -> Result<(), ClientError> {
        self.check_generation(generation)?;
        self.load_error = Some(reason.into());
        Ok(())
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next_page(&self) -> bool {
        match self.total_pages {
            Some(total) => self.page_number < total,
            None => self.page_number < u32::MAX,
        }
    }

    /// Returns whether the page changed. Safe to call at the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.is_open || !self.has_next_page() {
            return false;
        }
        match self.page_number.checked_add(1) {
            Some(next) => {
                self.page_number = next;
                true
            }
            None => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.is_open || !self.has_previous_page() {
            return false;
        }
        self.page_number -= 1;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    fn set_zoom(&mut self, zoom: f32) -> bool {
        if !self.is_open {
            return false;
        }
        let zoom = clamp_zoom(zoom);
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn page_label(&self) -> String {
        match self.total_pages {
            Some(total) => format!("Page {} / {total}", self.page_number),
            None => format!("Page {} / -", self.page_number),
        }
    }
}

#[cfg(test)]
#[path = "tests/viewer_tests.rs"]
mod tests;
