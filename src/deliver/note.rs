//! Text insertion into the active note.

use super::DeliveryError;
use async_trait::async_trait;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Line marking the cursor position in a Markdown note.
pub const CURSOR_MARKER: &str = "<!-- vidnote:cursor -->";

/// Text-editor surface of the host.
#[async_trait]
pub trait NoteSurface: Send {
    /// Replace the current selection, or insert at the cursor when nothing is selected.
    async fn replace_selection(&mut self, text: &str) -> Result<(), DeliveryError>;

    async fn insert_at_cursor(&mut self, text: &str) -> Result<(), DeliveryError>;
}

/// A Markdown file acting as the open note.
///
/// The selection is the first occurrence of a chosen text. The cursor sits at the
/// start of the [`CURSOR_MARKER`] line when one exists, otherwise at end of file.
/// Every edit is written back immediately.
#[derive(Debug)]
pub struct MarkdownNote {
    path: PathBuf,
    content: String,
    selection: Option<Range<usize>>,
    cursor: usize,
}

impl MarkdownNote {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DeliveryError> {
        let path = path.into();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| DeliveryError::Note {
                path: path.clone(),
                source,
            })?;
        let cursor = content.find(CURSOR_MARKER).unwrap_or(content.len());
        Ok(Self {
            path,
            content,
            selection: None,
            cursor,
        })
    }

    /// Select the first occurrence of `text`.
    pub fn select(&mut self, text: &str) -> Result<(), DeliveryError> {
        let start = self
            .content
            .find(text)
            .filter(|_| !text.is_empty())
            .ok_or_else(|| DeliveryError::SelectionNotFound(self.path.clone()))?;
        self.selection = Some(start..start + text.len());
        self.cursor = start + text.len();
        Ok(())
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection.clone().map(|range| &self.content[range])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    async fn splice(&mut self, range: Range<usize>, text: &str) -> Result<(), DeliveryError> {
        let start = range.start;
        self.content.replace_range(range, text);
        self.cursor = start + text.len();
        self.selection = None;
        tokio::fs::write(&self.path, &self.content)
            .await
            .map_err(|source| DeliveryError::Note {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl NoteSurface for MarkdownNote {
    async fn replace_selection(&mut self, text: &str) -> Result<(), DeliveryError> {
        let range = self
            .selection
            .clone()
            .unwrap_or(self.cursor..self.cursor);
        tracing::debug!(path = %self.path.display(), at = range.start, "Replacing selection");
        self.splice(range, text).await
    }

    async fn insert_at_cursor(&mut self, text: &str) -> Result<(), DeliveryError> {
        let at = self.cursor;
        tracing::debug!(path = %self.path.display(), at, "Inserting at cursor");
        self.splice(at..at, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn note_with(content: &str) -> (tempfile::TempDir, MarkdownNote) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, content).unwrap();
        let note = MarkdownNote::open(&path).await.unwrap();
        (dir, note)
    }

    #[tokio::test]
    async fn test_replace_selection() {
        let (_dir, mut note) = note_with("intro\na cat surfing\noutro\n").await;
        note.select("a cat surfing").unwrap();
        assert_eq!(note.selected_text(), Some("a cat surfing"));

        note.replace_selection("![[v.mp4]]").await.unwrap();

        assert_eq!(note.content(), "intro\n![[v.mp4]]\noutro\n");
        assert_eq!(std::fs::read_to_string(note.path()).unwrap(), note.content());
        assert_eq!(note.selected_text(), None);
    }

    #[tokio::test]
    async fn test_replace_without_selection_inserts_at_cursor() {
        let (_dir, mut note) = note_with("body").await;
        note.replace_selection("!").await.unwrap();
        assert_eq!(note.content(), "body!");
    }

    #[tokio::test]
    async fn test_cursor_marker() {
        let (_dir, mut note) =
            note_with("top\n<!-- vidnote:cursor -->\nbottom\n").await;
        note.insert_at_cursor("![Generated Video](https://x/v.mp4)\n")
            .await
            .unwrap();
        assert_eq!(
            note.content(),
            "top\n![Generated Video](https://x/v.mp4)\n<!-- vidnote:cursor -->\nbottom\n"
        );
    }

    #[tokio::test]
    async fn test_consecutive_inserts_follow_cursor() {
        let (_dir, mut note) = note_with("x").await;
        note.insert_at_cursor("a").await.unwrap();
        note.insert_at_cursor("b").await.unwrap();
        assert_eq!(note.content(), "xab");
    }

    #[tokio::test]
    async fn test_select_missing_text() {
        let (_dir, mut note) = note_with("nothing here").await;
        assert!(matches!(
            note.select("absent"),
            Err(DeliveryError::SelectionNotFound(_))
        ));
        assert!(note.select("").is_err());
    }

    #[tokio::test]
    async fn test_open_missing_note() {
        let err = MarkdownNote::open("/definitely/not/here.md")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Note { .. }));
    }
}
