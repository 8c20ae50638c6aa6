//! Text utilities for TUI rendering.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with a trailing ellipsis if it exceeds `max_width`
/// terminal columns (unicode-aware).
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Truncates from the front, keeping the end of `text` (useful for paths).
pub fn truncate_start(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut kept: Vec<char> = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        kept.push(ch);
    }
    std::iter::once('…').chain(kept.into_iter().rev()).collect()
}

/// Sanitizes message text for display.
///
/// Removes escape and other control characters (newlines are kept) and
/// expands tabs to four spaces, since `unicode_width` treats tabs as zero
/// columns while terminals do not.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    let needs_work = s.chars().any(|c| c == '\t' || (c.is_control() && c != '\n'));
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' => out.push_str("    "),
            '\n' => out.push('\n'),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_short() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_with_ellipsis_truncated() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello w…");
    }

    #[test]
    fn test_truncate_with_ellipsis_wide_cjk() {
        // "中文" = 4 columns, fits with "t" and the ellipsis in 6.
        assert_eq!(truncate_with_ellipsis("中文test", 6), "中文t…");
    }

    #[test]
    fn test_truncate_start_keeps_file_name() {
        assert_eq!(
            truncate_start("/home/me/notes/chat.json", 12),
            "…s/chat.json"
        );
        assert_eq!(truncate_start("chat.json", 12), "chat.json");
    }

    #[test]
    fn test_sanitize_strips_escapes_and_expands_tabs() {
        let result = sanitize_for_display("\x1b[31mred\x1b[0m\ttext\nnext");
        assert_eq!(result, "[31mred[0m    text\nnext");
    }

    #[test]
    fn test_sanitize_clean_text_is_borrowed() {
        let result = sanitize_for_display("clean\ntext");
        assert!(matches!(result, Cow::Borrowed(_)));
    }
}
