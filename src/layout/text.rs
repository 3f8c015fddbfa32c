use crate::units::Px;

/// Stands in for a line that has no visible content, so every entry still
/// advances one line height when drawn
pub const BLANK_LINE: &str = " ";

/// Something that can tell how wide a piece of text renders. Implementations must
/// measure with exactly the font, size, and weight that will be used to draw.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> Px;
}

impl<F: Fn(&str) -> Px> TextMeasure for F {
    fn measure(&self, text: &str) -> Px {
        self(text)
    }
}

/// Splits text into alternating runs of whitespace and non-whitespace, keeping
/// every character. Word boundaries are the transitions between runs.
fn tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Greedily pack whitespace-delimited tokens onto lines no wider than `max_width`.
/// A token that is too wide on its own still gets a line to itself.
fn wrap_words<M: TextMeasure + ?Sized>(measurer: &M, paragraph: &str, max_width: Px) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for token in tokens(paragraph) {
        let candidate = format!("{current}{token}");
        if current.is_empty() || measurer.measure(&candidate) <= max_width {
            current = candidate;
        } else if current.trim_end().is_empty() {
            // nothing but leading whitespace so far; don't commit a blank line
            current = token.trim_start().to_string();
        } else {
            lines.push(current.trim_end().to_string());
            current = token.trim_start().to_string();
        }
    }

    let last = current.trim_end();
    if !last.is_empty() || lines.is_empty() {
        lines.push(last.to_string());
    }
    lines
}

/// Split a line character by character, for text without usable word breaks
/// (e.g. CJK scripts). A character wider than `max_width` sits alone on its line.
fn wrap_chars<M: TextMeasure + ?Sized>(measurer: &M, line: &str, max_width: Px) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if current.is_empty() || measurer.measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Break `text` into display lines no wider than `max_width` as reported by
/// `measurer`.
///
/// # Wrapping Behavior
///
/// 1. Line endings are normalised and the text is split into paragraphs on `\n`.
///    An empty paragraph becomes a single [BLANK_LINE] so blank lines keep their
///    vertical space.
/// 2. Each paragraph is packed word by word: a token is appended while the line
///    including it still fits, or while the line is empty. When a token doesn't fit
///    the line is committed without trailing whitespace and the next line starts
///    from the token without leading whitespace.
/// 3. Any line still too wide (a single long token, or text in a script without
///    spaces) is split again character by character.
/// 4. Empty lines are replaced with [BLANK_LINE].
///
/// The only lines that may exceed `max_width` are single characters that are
/// wider than it on their own.
///
/// # Example
///
/// ```
/// use quote_card::layout::wrap_lines;
/// use quote_card::Px;
///
/// // every character is 10px wide
/// let measure = |s: &str| Px(s.chars().count() as f32 * 10.0);
///
/// let lines = wrap_lines(&measure, "the quick brown fox\n\n一二三四五六七八九十壱弐", Px(100.0));
/// assert_eq!(lines, vec!["the quick", "brown fox", " ", "一二三四五六七八九十", "壱弐"]);
/// ```
pub fn wrap_lines<M: TextMeasure + ?Sized>(measurer: &M, text: &str, max_width: Px) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(BLANK_LINE.to_string());
            continue;
        }

        for line in wrap_words(measurer, paragraph, max_width) {
            if measurer.measure(&line) > max_width {
                lines.extend(wrap_chars(measurer, &line, max_width));
            } else {
                lines.push(line);
            }
        }
    }

    for line in lines.iter_mut().filter(|line| line.is_empty()) {
        *line = BLANK_LINE.to_string();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(width: f32) -> impl Fn(&str) -> Px {
        move |s: &str| Px(s.chars().count() as f32 * width)
    }

    #[test]
    fn tokens_alternate_between_space_and_words() {
        assert_eq!(tokens("  ab cd\t e "), vec!["  ", "ab", " ", "cd", "\t ", "e", " "]);
        assert!(tokens("").is_empty());
    }

    #[test]
    fn empty_text_is_a_single_blank_line() {
        assert_eq!(wrap_lines(&fixed(10.0), "", Px(100.0)), vec![" "]);
    }

    #[test]
    fn blank_paragraphs_are_preserved() {
        let lines = wrap_lines(&fixed(10.0), "a\n\n\nb", Px(100.0));
        assert_eq!(lines, vec!["a", " ", " ", "b"]);
    }

    #[test]
    fn line_endings_are_normalised() {
        let lines = wrap_lines(&fixed(10.0), "a\r\nb\rc", Px(100.0));
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn whitespace_only_paragraph_is_blank() {
        assert_eq!(wrap_lines(&fixed(10.0), "    ", Px(100.0)), vec![" "]);
    }

    #[test]
    fn breaks_at_word_boundaries() {
        let lines = wrap_lines(&fixed(10.0), "aaa bbb ccc ddd", Px(70.0));
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn trims_whitespace_at_breaks() {
        let lines = wrap_lines(&fixed(10.0), "aaa    bbb", Px(50.0));
        assert_eq!(lines, vec!["aaa", "bbb"]);
    }

    #[test]
    fn leading_whitespace_does_not_produce_a_blank_line() {
        let lines = wrap_lines(&fixed(10.0), "   abcd", Px(50.0));
        assert_eq!(lines, vec!["abcd"]);
    }

    #[test]
    fn long_token_falls_back_to_characters() {
        let lines = wrap_lines(&fixed(10.0), "ab abcdefghij", Px(40.0));
        assert_eq!(lines, vec!["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn text_without_spaces_is_split_by_character() {
        let lines = wrap_lines(&fixed(10.0), "吾輩は猫である名前はまだ無い", Px(50.0));
        assert_eq!(lines, vec!["吾輩は猫で", "ある名前は", "まだ無い"]);
    }

    #[test]
    fn oversized_character_sits_alone() {
        let lines = wrap_lines(&fixed(30.0), "abc", Px(20.0));
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn measures_with_the_supplied_measurer() {
        // a measurer where `w` is very wide and everything else is narrow
        let measure = |s: &str| Px(s.chars().map(|c| if c == 'w' { 50.0 } else { 5.0 }).sum());
        let lines = wrap_lines(&measure, "ii ww ii", Px(60.0));
        assert_eq!(lines, vec!["ii", "w", "w", "ii"]);
    }

    #[test]
    fn lines_fit_or_are_single_characters() {
        let text = lipsum::lipsum(200);
        let measure = fixed(9.0);
        for max in [40.0, 95.0, 300.0] {
            for line in wrap_lines(&measure, &text, Px(max)) {
                assert!(
                    measure(&line) <= Px(max) || line.chars().count() == 1,
                    "{line:?} overflows {max}"
                );
            }
        }
    }

    #[test]
    fn wrapping_keeps_all_visible_content() {
        let text = "Somewhere over\nthe rainbow\n\nway  up   high\nsupercalifragilistic";
        let lines = wrap_lines(&fixed(10.0), text, Px(60.0));

        let squash = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        let wrapped: String = lines.iter().map(|l| squash(l)).collect();
        assert_eq!(wrapped, squash(text));

        // one blank sentinel line for the one empty paragraph
        assert_eq!(lines.iter().filter(|l| l.as_str() == BLANK_LINE).count(), 1);
    }
}
