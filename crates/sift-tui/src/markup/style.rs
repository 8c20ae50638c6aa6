/// A styled span of text (UI-agnostic).
///
/// Converted to ratatui `Span`s at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A line of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn empty() -> Self {
        StyledLine { spans: vec![] }
    }

    pub fn from_spans(spans: Vec<StyledSpan>) -> Self {
        StyledLine { spans }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Whose words a body span belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    User,
    Assistant,
}

/// Inline marks accumulated from markdown and HTML tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Inline {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub mark: bool,
    pub strike: bool,
    pub underline: bool,
    pub link: bool,
}

impl Inline {
    #[must_use]
    pub fn union(self, other: Inline) -> Inline {
        Inline {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            code: self.code || other.code,
            mark: self.mark || other.mark,
            strike: self.strike || other.strike,
            underline: self.underline || other.underline,
            link: self.link || other.link,
        }
    }
}

/// Semantic style identifiers (UI-agnostic).
///
/// Translated to terminal styles by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Message body text.
    Body { tone: Tone, inline: Inline },
    /// Gutter of a user message ("│ ").
    UserPrefix,
    /// Gutter of an assistant message.
    AssistantPrefix,
    /// Gutter of the selected message.
    SelectedPrefix,
    /// List bullet or rule produced by markup.
    Bullet,
    /// Trailing cursor shown while a reveal is in progress.
    RevealCursor,
    /// Gutter of a draft being edited.
    EditPrefix,
    /// Draft text.
    EditDraft,
    /// Cursor cell inside the draft.
    EditCursor,
    /// Key hints under the draft.
    EditHint,
}
