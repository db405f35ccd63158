use super::*;

pub(super) const CAPTION_BYTES: usize = 32;

/// Wrapped line spans as byte ranges into the source text.
pub(super) type LineSpans = Vec<(usize, usize), MAX_BLOCK_LINES>;

pub(super) fn next_word_at(text: &str, mut cursor: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let len = bytes.len();

    while cursor < len && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if cursor >= len {
        return None;
    }

    let start = cursor;
    while cursor < len && !bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }

    Some((start, cursor))
}

pub(super) fn line_pixel_width(text: &str, scale: usize) -> usize {
    let mut total_cols = 0usize;
    let mut trailing_gap = 0usize;

    for c in text.chars() {
        let c = normalize_char(c);
        let glyph = glyph_5x7(c);
        let metrics = glyph_metrics(c, &glyph);

        total_cols += metrics.advance;
        trailing_gap = metrics.advance.saturating_sub(metrics.width);
    }

    if total_cols == 0 {
        0
    } else {
        (total_cols - trailing_gap) * scale
    }
}

/// Greedily wraps `text` into lines no wider than `max_width` pixels.
///
/// A single word wider than `max_width` gets a line of its own and is
/// clipped by the signed draw path instead of failing the layout.
pub(super) fn wrap_text(
    text: &str,
    scale: usize,
    max_width: usize,
) -> Result<LineSpans, RenderError> {
    let mut lines = LineSpans::new();
    let mut line: Option<(usize, usize)> = None;
    let mut cursor = 0usize;

    while let Some((start, end)) = next_word_at(text, cursor) {
        cursor = end;

        match line {
            None => line = Some((start, end)),
            Some((line_start, line_end)) => {
                if line_pixel_width(&text[line_start..end], scale) <= max_width {
                    line = Some((line_start, end));
                } else {
                    lines
                        .push((line_start, line_end))
                        .map_err(|_| RenderError::LayoutOverflow)?;
                    line = Some((start, end));
                }
            }
        }
    }

    if let Some(span) = line {
        lines.push(span).map_err(|_| RenderError::LayoutOverflow)?;
    }

    Ok(lines)
}

pub(super) fn draw_line(
    frame: &mut FrameBuffer,
    x: isize,
    y: isize,
    text: &str,
    scale: usize,
    color: Rgb565,
) {
    let scale_i = scale as isize;
    let mut cursor_cols = 0usize;

    for c in text.chars() {
        let c = normalize_char(c);
        let glyph = glyph_5x7(c);
        let metrics = glyph_metrics(c, &glyph);

        draw_glyph(frame, x + cursor_cols as isize * scale_i, y, c, scale, color);
        cursor_cols += metrics.advance;
    }
}

pub(super) fn draw_line_centered(
    frame: &mut FrameBuffer,
    y: isize,
    text: &str,
    scale: usize,
    color: Rgb565,
) {
    let width = line_pixel_width(text, scale) as isize;
    let x = (WIDTH as isize - width) / 2;
    draw_line(frame, x, y, text, scale, color);
}

pub(super) fn write_u16_ascii(mut value: u16, out: &mut [u8]) -> usize {
    if out.is_empty() {
        return 0;
    }

    if value == 0 {
        out[0] = b'0';
        return 1;
    }

    let mut tmp = [0u8; 5];
    let mut n = 0usize;
    while value > 0 && n < tmp.len() {
        tmp[n] = b'0' + (value % 10) as u8;
        value /= 10;
        n += 1;
    }

    let len = n.min(out.len());
    for i in 0..len {
        out[i] = tmp[n - 1 - i];
    }
    len
}

fn copy_str(out: &mut [u8], at: usize, s: &str) -> usize {
    let bytes = s.as_bytes();
    let len = bytes.len().min(out.len().saturating_sub(at));
    out[at..at + len].copy_from_slice(&bytes[..len]);
    len
}

/// Builds the reference caption in the language of the chosen translation.
pub(super) fn caption_label<'a>(
    chapter: u16,
    verse: u16,
    translation: Translation,
    out: &'a mut [u8; CAPTION_BYTES],
) -> &'a str {
    let (chapter_word, verse_word) = match translation {
        Translation::English => ("Chapter ", ", Verse "),
        Translation::Spanish => ("Capítulo ", ", Verso "),
    };

    let mut len = 0usize;
    len += copy_str(out, len, chapter_word);
    len += write_u16_ascii(chapter, &mut out[len..]);
    len += copy_str(out, len, verse_word);
    len += write_u16_ascii(verse, &mut out[len..]);

    core::str::from_utf8(&out[..len]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_never_split_and_order_is_kept() {
        let text = "mā karma-phala-hetur bhūr mā te saṅgo";
        let lines = wrap_text(text, 2, 90).unwrap();

        let mut rejoined: std::string::String = std::string::String::new();
        for &(start, end) in &lines {
            if !rejoined.is_empty() {
                rejoined.push(' ');
            }
            rejoined.push_str(&text[start..end]);
        }
        assert_eq!(rejoined, text);
    }

    #[test]
    fn wrapped_lines_stay_inside_the_max_width() {
        let text = "even a little of this practice protects from great fear";
        let max_width = 100;
        let lines = wrap_text(text, 1, max_width).unwrap();

        assert!(lines.len() > 1);
        for &(start, end) in &lines {
            assert!(line_pixel_width(&text[start..end], 1) <= max_width);
        }
    }

    #[test]
    fn oversized_single_word_gets_its_own_line() {
        let text = "ab nityābhiyuktānāṁ cd";
        let lines = wrap_text(text, 1, 20).unwrap();

        assert_eq!(lines.len(), 3);
        let (start, end) = lines[1];
        assert_eq!(&text[start..end], "nityābhiyuktānāṁ");
    }

    #[test]
    fn empty_text_wraps_to_no_lines() {
        assert!(wrap_text("", 1, 100).unwrap().is_empty());
        assert!(wrap_text("   ", 1, 100).unwrap().is_empty());
    }

    #[test]
    fn too_many_lines_overflow() {
        let text = "a b c d e f g h i j k l m n o p q r s t u v w x y z";
        assert_eq!(wrap_text(text, 1, 1).unwrap_err(), RenderError::LayoutOverflow);
    }

    #[test]
    fn caption_follows_translation_language() {
        let mut buf = [0u8; CAPTION_BYTES];
        assert_eq!(
            caption_label(2, 47, Translation::English, &mut buf),
            "Chapter 2, Verse 47"
        );

        let mut buf = [0u8; CAPTION_BYTES];
        assert_eq!(
            caption_label(18, 66, Translation::Spanish, &mut buf),
            "Capítulo 18, Verso 66"
        );
    }

    #[test]
    fn u16_formatting_matches_decimal() {
        let mut buf = [0u8; 5];
        let len = write_u16_ascii(0, &mut buf);
        assert_eq!(&buf[..len], b"0");

        let len = write_u16_ascii(47, &mut buf);
        assert_eq!(&buf[..len], b"47");

        let len = write_u16_ascii(65_535, &mut buf);
        assert_eq!(&buf[..len], b"65535");
    }
}
