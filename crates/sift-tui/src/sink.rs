//! Destination for committed edits.

use std::path::PathBuf;

use anyhow::Result;
use sift_core::transcript;

/// Receives each submitted edit exactly once, unmodified.
pub trait EditSink {
    fn on_edit(&mut self, index: usize, text: &str) -> Result<()>;
}

impl<F> EditSink for F
where
    F: FnMut(usize, &str) -> Result<()>,
{
    fn on_edit(&mut self, index: usize, text: &str) -> Result<()> {
        self(index, text)
    }
}

/// Writes edits back into the transcript file.
#[derive(Debug, Clone)]
pub struct TranscriptSink {
    path: PathBuf,
}

impl TranscriptSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EditSink for TranscriptSink {
    fn on_edit(&mut self, index: usize, text: &str) -> Result<()> {
        transcript::apply_edit(&self.path, index, text)
    }
}

/// Discards edits (read-only viewing).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EditSink for NoopSink {
    fn on_edit(&mut self, index: usize, _text: &str) -> Result<()> {
        tracing::debug!(index, "edit discarded (read-only)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sift_core::Message;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_closure_sink_receives_edit() {
        let mut seen = Vec::new();
        let mut sink = |index: usize, text: &str| -> Result<()> {
            seen.push((index, text.to_string()));
            Ok(())
        };
        sink.on_edit(2, "find bar").unwrap();
        assert_eq!(seen, vec![(2, "find bar".to_string())]);
    }

    #[test]
    fn test_transcript_sink_rewrites_message() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.json");
        transcript::save(&path, &[Message::user("find foo"), Message::assistant("ok")]).unwrap();

        TranscriptSink::new(&path).on_edit(0, "find bar").unwrap();

        let messages = transcript::load(&path).unwrap();
        assert_eq!(messages[0].text, "find bar");
        assert_eq!(messages[1].text, "ok");
    }

    #[test]
    fn test_transcript_sink_rejects_missing_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.json");
        transcript::save(&path, &[Message::user("only")]).unwrap();

        let err = TranscriptSink::new(&path).on_edit(3, "x").unwrap_err();
        assert!(err.to_string().contains("no longer exists"));
    }
}
