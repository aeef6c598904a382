//! Display width for mixed full-width and half-width text.

use unicode_width::UnicodeWidthChar;

/// Columns a string occupies on a terminal. Full-width, wide and
/// ambiguous-width characters count 2, everything else 1.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| match c.width_cjk() {
            Some(2) => 2,
            _ => 1,
        })
        .sum()
}

/// Which side of the text the padding goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Pads `text` with `fill` up to `width` display columns. Text already at or
/// over `width` is returned unchanged.
pub fn text_align(text: &str, width: usize, align: Align, fill: char) -> String {
    let current = display_width(text);
    if current >= width {
        return text.to_string();
    }
    let padding: String = std::iter::repeat(fill).take(width - current).collect();
    match align {
        Align::Left => format!("{}{}", text, padding),
        Align::Right => format!("{}{}", padding, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_mixed() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("ＡＢ"), 4);
        assert_eq!(display_width("株価3%上昇"), 10);
        // Ambiguous width counts as wide
        assert_eq!(display_width("○"), 2);
    }

    #[test]
    fn test_text_align() {
        assert_eq!(text_align("abc", 6, Align::Left, ' '), "abc   ");
        assert_eq!(text_align("abc", 6, Align::Right, '.'), "...abc");
        assert_eq!(text_align("日本", 6, Align::Left, ' '), "日本  ");
        assert_eq!(text_align("日本語です", 6, Align::Left, ' '), "日本語です");
        assert_eq!(text_align("abcdef", 6, Align::Left, ' '), "abcdef");
    }
}
