//! Frames and the page that hosts them.

use std::sync::Arc;

use formpilot_protocols::PageError;
use parking_lot::Mutex;

use crate::document::{PageDocument, SharedDocument};

/// A subdocument embedded in a page. Its content is reachable only
/// when its origin matches the host page's origin.
pub struct Frame {
    origin: String,
    document: SharedDocument,
}

impl Frame {
    pub fn new(origin: impl Into<String>, document: SharedDocument) -> Self {
        Self { origin: origin.into(), document }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn accessible_from(&self, page_origin: &str) -> bool {
        self.origin == page_origin
    }

    /// The frame's document, if `page_origin` may touch it.
    pub fn document(&self, page_origin: &str) -> Result<SharedDocument, PageError> {
        if self.accessible_from(page_origin) {
            Ok(self.document.clone())
        } else {
            Err(PageError::FrameInaccessible(self.origin.clone()))
        }
    }
}

/// The top-level page: its own document plus any embedded frames.
pub struct Page {
    origin: String,
    document: SharedDocument,
    frames: Vec<Frame>,
}

impl Page {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            document: Arc::new(Mutex::new(PageDocument::new())),
            frames: Vec::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn document(&self) -> SharedDocument {
        self.document.clone()
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Documents of the frames this page is allowed to reach.
    pub fn accessible_frame_documents(&self) -> Vec<SharedDocument> {
        self.frames
            .iter()
            .filter(|f| f.accessible_from(&self.origin))
            .map(|f| f.document.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_doc() -> SharedDocument {
        Arc::new(Mutex::new(PageDocument::new()))
    }

    #[test]
    fn same_origin_frame_is_accessible() {
        let frame = Frame::new("https://app.example", empty_doc());
        assert!(frame.accessible_from("https://app.example"));
        assert!(frame.document("https://app.example").is_ok());
    }

    #[test]
    fn cross_origin_frame_is_denied() {
        let frame = Frame::new("https://ads.example", empty_doc());
        assert!(!frame.accessible_from("https://app.example"));
        assert!(matches!(
            frame.document("https://app.example"),
            Err(PageError::FrameInaccessible(_))
        ));
    }

    #[test]
    fn page_filters_frames_by_origin() {
        let mut page = Page::new("https://app.example");
        page.add_frame(Frame::new("https://app.example", empty_doc()));
        page.add_frame(Frame::new("https://ads.example", empty_doc()));
        assert_eq!(page.frames().len(), 2);
        assert_eq!(page.accessible_frame_documents().len(), 1);
    }
}
