use unicode_segmentation::UnicodeSegmentation;

/// Tokens longer than this (in graphemes) are revealed grapheme by grapheme
/// so that long URLs and unspaced scripts still grow smoothly.
const LONG_TOKEN_GRAPHEMES: usize = 12;

/// Returns the byte offsets at which `text` may be cut for a partial reveal.
///
/// Offsets are strictly increasing, always land on grapheme boundaries and
/// never fall inside an HTML tag (`<...>`) or an entity (`&...;`). The last
/// offset is always `text.len()`. Empty text has no checkpoints.
pub fn reveal_checkpoints(text: &str) -> Vec<usize> {
    let graphemes: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
    let mut points = Vec::new();
    let mut in_tag = false;
    // Open quote inside a tag; `>` does not close the tag while set.
    let mut tag_quote: Option<&str> = None;
    let mut in_entity = false;
    let mut token_len = 0usize;

    for (pos, &(start, g)) in graphemes.iter().enumerate() {
        let end = start + g.len();
        let next = graphemes.get(pos + 1).map(|&(_, n)| n);

        if in_tag {
            match tag_quote {
                Some(quote) if g == quote => tag_quote = None,
                Some(_) => {}
                None if g == "\"" || g == "'" => tag_quote = Some(g),
                None if g == ">" => in_tag = false,
                None => {}
            }
            continue;
        }
        if in_entity {
            if g == ";" {
                in_entity = false;
                token_len += 1;
                continue;
            }
            if !is_space(g) {
                continue;
            }
            // Not an entity after all; the whitespace ends it.
            in_entity = false;
        }

        if g == "<" && next.is_some_and(starts_tag) {
            in_tag = true;
            continue;
        }
        if g == "&" && next.is_some_and(starts_entity) {
            in_entity = true;
            continue;
        }

        if is_space(g) {
            token_len = 0;
            if !next.is_some_and(is_space) {
                points.push(end);
            }
            continue;
        }

        token_len += 1;
        if token_len > LONG_TOKEN_GRAPHEMES {
            points.push(end);
        }
    }

    if !text.is_empty() && points.last() != Some(&text.len()) {
        points.push(text.len());
    }
    points
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

fn starts_tag(g: &str) -> bool {
    g.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

fn starts_entity(g: &str) -> bool {
    g.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(text: &str) -> Vec<&str> {
        reveal_checkpoints(text)
            .into_iter()
            .map(|end| &text[..end])
            .collect()
    }

    #[test]
    fn test_words_are_revealed_whole() {
        assert_eq!(prefixes("hello big world"), vec![
            "hello ",
            "hello big ",
            "hello big world"
        ]);
    }

    #[test]
    fn test_whitespace_runs_collapse_to_one_checkpoint() {
        assert_eq!(reveal_checkpoints("a  \n b"), vec![5, 6]);
    }

    #[test]
    fn test_empty_text_has_no_checkpoints() {
        assert!(reveal_checkpoints("").is_empty());
    }

    #[test]
    fn test_never_cuts_inside_tags() {
        let text = r#"see <a href="x y">the link</a> and <b>bold text</b> end"#;
        for prefix in prefixes(text) {
            let opens = prefix.matches('<').count();
            let closes = prefix.matches('>').count();
            assert_eq!(opens, closes, "cut inside a tag: {prefix:?}");
        }
    }

    #[test]
    fn test_quoted_angle_bracket_does_not_end_tag() {
        let text = r#"see <a title="x > y">the link</a> and <i data-v='1>0'>it</i> end"#;
        assert_eq!(prefixes(text), vec![
            "see ",
            r#"see <a title="x > y">the "#,
            r#"see <a title="x > y">the link</a> "#,
            r#"see <a title="x > y">the link</a> and "#,
            r#"see <a title="x > y">the link</a> and <i data-v='1>0'>it</i> "#,
            text,
        ]);
    }

    #[test]
    fn test_never_cuts_inside_entities() {
        let text = "Tom &amp; Jerry &#8212; again";
        for prefix in prefixes(text) {
            let amps = prefix.matches('&').count();
            let semis = prefix.matches(';').count();
            assert_eq!(amps, semis, "cut inside an entity: {prefix:?}");
        }
    }

    #[test]
    fn test_lone_angle_bracket_is_plain_text() {
        assert_eq!(prefixes("a < b"), vec!["a ", "a < ", "a < b"]);
    }

    #[test]
    fn test_long_tokens_get_grapheme_checkpoints() {
        let text = "https://example.com/a/long/path";
        let points = reveal_checkpoints(text);
        assert!(points.len() > 10);
        assert_eq!(points.first(), Some(&(LONG_TOKEN_GRAPHEMES + 1)));
        assert_eq!(points.last(), Some(&text.len()));
    }

    #[test]
    fn test_checkpoints_respect_grapheme_boundaries() {
        let text = "naïve café 🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉";
        let points = reveal_checkpoints(text);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
        for end in points {
            assert!(text.is_char_boundary(end));
        }
    }
}
