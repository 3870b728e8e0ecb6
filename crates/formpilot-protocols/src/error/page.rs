//! Page and DOM errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("No such node: {0}")]
    NoSuchNode(String),

    #[error("Node is not a form control: {0}")]
    NotAControl(String),

    /// Cross-origin frame. A boundary limitation, not a failure of the
    /// pick operation - callers skip the frame.
    #[error("Frame not accessible: {0}")]
    FrameInaccessible(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_node_display() {
        let err = PageError::NoSuchNode("42".to_string());
        assert!(err.to_string().contains("No such node"));
    }

    #[test]
    fn test_not_a_control_display() {
        let err = PageError::NotAControl("div#header".to_string());
        assert!(err.to_string().contains("not a form control"));
    }

    #[test]
    fn test_frame_inaccessible_display() {
        let err = PageError::FrameInaccessible("https://ads.example".to_string());
        assert!(err.to_string().contains("not accessible"));
    }
}
