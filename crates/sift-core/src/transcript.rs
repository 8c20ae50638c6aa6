//! Transcript files.
//!
//! A transcript is a JSON array of messages written by an external producer
//! (the search/chat backend). The viewer only reads it, except for committed
//! edits which are written back in place.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::message::Message;

/// Reads and parses a transcript file.
pub fn load(path: &Path) -> Result<Vec<Message>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    parse(&contents).with_context(|| format!("Failed to parse transcript {}", path.display()))
}

/// Parses transcript JSON. Empty input is an empty conversation.
pub fn parse(contents: &str) -> Result<Vec<Message>> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(contents)?)
}

/// Writes a transcript atomically (temp file + rename in the same directory).
pub fn save(path: &Path, messages: &[Message]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let json = serde_json::to_string_pretty(messages).context("Failed to serialize transcript")?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .context("Failed to write transcript")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace transcript {}", path.display()))?;
    Ok(())
}

/// Replaces the text of the message at `index` and saves the file.
///
/// The file is re-read first so that appends made by the producer since the
/// viewer last loaded it are preserved.
pub fn apply_edit(path: &Path, index: usize, text: &str) -> Result<()> {
    let mut messages = load(path)?;
    let Some(message) = messages.get_mut(index) else {
        anyhow::bail!(
            "Message {index} no longer exists in {} ({} messages)",
            path.display(),
            messages.len()
        );
    };
    message.text = text.to_string();
    save(path, &messages)?;
    tracing::info!(index, path = %path.display(), "transcript edit saved");
    Ok(())
}

/// Cheap change detector for a transcript file (modification time + size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    /// Reads the current fingerprint. Returns `None` if the file is missing.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::message::Role;

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn test_empty_file_is_empty_conversation() {
        assert!(parse("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_messages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.json");
        let messages = vec![
            Message::user("find my thesis drafts"),
            Message::assistant("Found <b>3</b> files.").without_animation(),
        ];

        save(&path, &messages).unwrap();

        assert_eq!(load(&path).unwrap(), messages);
    }

    #[test]
    fn test_apply_edit_replaces_only_target_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.json");
        save(
            &path,
            &[Message::user("Hi"), Message::assistant("Hello").with_key("a")],
        )
        .unwrap();

        apply_edit(&path, 0, "Hi there").unwrap();

        let messages = load(&path).unwrap();
        assert_eq!(messages[0].text, "Hi there");
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1], Message::assistant("Hello").with_key("a"));
    }

    #[test]
    fn test_apply_edit_out_of_range_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.json");
        save(&path, &[Message::user("Hi")]).unwrap();

        let err = apply_edit(&path, 5, "x").unwrap_err();
        assert!(err.to_string().contains("no longer exists"));
    }

    #[test]
    fn test_fingerprint_changes_when_file_grows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.json");
        assert!(Fingerprint::of(&path).is_none());

        save(&path, &[Message::user("Hi")]).unwrap();
        let before = Fingerprint::of(&path).unwrap();
        save(&path, &[Message::user("Hi"), Message::assistant("Hello")]).unwrap();
        let after = Fingerprint::of(&path).unwrap();

        assert_ne!(before, after);
    }
}
