use super::*;

/// Glyph cell height in font rows.
pub(super) const GLYPH_HEIGHT: usize = 7;

/// Picks the integer glyph scale whose pixel height is closest to `target_px`.
pub(super) fn scale_for_target(target_px: usize) -> usize {
    ((target_px + GLYPH_HEIGHT / 2) / GLYPH_HEIGHT).max(1)
}

pub(super) struct GlyphMetrics {
    pub(super) left: usize,
    pub(super) width: usize,
    pub(super) advance: usize,
}

pub(super) fn glyph_metrics(c: char, glyph: &[u8; 5]) -> GlyphMetrics {
    if c == ' ' {
        return GlyphMetrics {
            left: 0,
            width: 0,
            advance: 3,
        };
    }

    let mut left = 5usize;
    let mut right = 0usize;

    for (col, bits) in glyph.iter().enumerate() {
        if *bits != 0 {
            left = left.min(col);
            right = right.max(col);
        }
    }

    if left > right {
        return GlyphMetrics {
            left: 0,
            width: 1,
            advance: 2,
        };
    }

    let width = right - left + 1;

    GlyphMetrics {
        left,
        width,
        advance: width + 1,
    }
}

/// Draws one glyph with its leftmost ink column at `x`.
pub(super) fn draw_glyph(
    frame: &mut FrameBuffer,
    x: isize,
    y: isize,
    c: char,
    scale: usize,
    color: Rgb565,
) {
    let glyph = glyph_5x7(c);
    let metrics = glyph_metrics(c, &glyph);
    let scale_i = scale as isize;

    for (col, bits) in glyph.iter().enumerate() {
        for row in 0..GLYPH_HEIGHT {
            if (bits & (1 << row)) != 0 {
                let base_x = x + (col as isize - metrics.left as isize) * scale_i;
                let base_y = y + row as isize * scale_i;

                for dy in 0..scale_i {
                    for dx in 0..scale_i {
                        set_pixel_signed(frame, base_x + dx, base_y + dy, color);
                    }
                }
            }
        }
    }
}

/// Folds characters without a glyph of their own onto their base form.
///
/// Covers the IAST diacritics used by the romanized verses, Spanish accents
/// and the usual typographic punctuation variants.
pub(super) fn normalize_char(c: char) -> char {
    match c {
        'ā' | 'á' | 'à' | 'ä' | 'â' => 'a',
        'Ā' | 'Á' => 'A',
        'ē' | 'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' => 'E',
        'ī' | 'í' | 'ì' | 'ï' | 'î' => 'i',
        'Ī' | 'Í' => 'I',
        'ō' | 'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'Ó' => 'O',
        'ū' | 'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ū' | 'Ú' => 'U',
        'ṛ' | 'ṝ' => 'r',
        'ḷ' | 'ḹ' => 'l',
        'ṁ' | 'ṃ' => 'm',
        'ḥ' => 'h',
        'ṅ' | 'ṇ' | 'ñ' => 'n',
        'Ñ' => 'N',
        'ṭ' => 't',
        'ḍ' => 'd',
        'ś' | 'ṣ' => 's',
        'Ś' | 'Ṣ' => 'S',
        'ç' => 'c',
        'Ç' => 'C',
        '\u{2018}' | '\u{2019}' | '´' | '`' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
        '\u{2010}' | '\u{2013}' | '\u{2014}' => '-',
        '\u{2026}' => '.',
        '¿' => '?',
        '¡' => '!',
        _ => c,
    }
}

/// 5x7 column-major glyph bitmaps, least significant bit at the top row.
pub(super) fn glyph_5x7(c: char) -> [u8; 5] {
    match c {
        '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
        '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
        '2' => [0x42, 0x61, 0x51, 0x49, 0x46],
        '3' => [0x21, 0x41, 0x45, 0x4B, 0x31],
        '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
        '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => [0x3C, 0x4A, 0x49, 0x49, 0x30],
        '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => [0x06, 0x49, 0x49, 0x29, 0x1E],
        'A' => [0x7E, 0x11, 0x11, 0x11, 0x7E],
        'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
        'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
        'D' => [0x7F, 0x41, 0x41, 0x22, 0x1C],
        'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
        'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
        'G' => [0x3E, 0x41, 0x49, 0x49, 0x7A],
        'H' => [0x7F, 0x08, 0x08, 0x08, 0x7F],
        'I' => [0x00, 0x41, 0x7F, 0x41, 0x00],
        'J' => [0x20, 0x40, 0x41, 0x3F, 0x01],
        'K' => [0x7F, 0x08, 0x14, 0x22, 0x41],
        'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
        'M' => [0x7F, 0x02, 0x0C, 0x02, 0x7F],
        'N' => [0x7F, 0x04, 0x08, 0x10, 0x7F],
        'O' => [0x3E, 0x41, 0x41, 0x41, 0x3E],
        'P' => [0x7F, 0x09, 0x09, 0x09, 0x06],
        'Q' => [0x3E, 0x41, 0x51, 0x21, 0x5E],
        'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
        'S' => [0x46, 0x49, 0x49, 0x49, 0x31],
        'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
        'U' => [0x3F, 0x40, 0x40, 0x40, 0x3F],
        'V' => [0x1F, 0x20, 0x40, 0x20, 0x1F],
        'W' => [0x7F, 0x20, 0x18, 0x20, 0x7F],
        'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
        'Y' => [0x03, 0x04, 0x78, 0x04, 0x03],
        'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],
        'a' => [0x20, 0x54, 0x54, 0x54, 0x78],
        'b' => [0x7F, 0x48, 0x44, 0x44, 0x38],
        'c' => [0x38, 0x44, 0x44, 0x44, 0x20],
        'd' => [0x38, 0x44, 0x44, 0x48, 0x7F],
        'e' => [0x38, 0x54, 0x54, 0x54, 0x18],
        'f' => [0x08, 0x7E, 0x09, 0x01, 0x02],
        'g' => [0x08, 0x14, 0x54, 0x54, 0x3C],
        'h' => [0x7F, 0x08, 0x04, 0x04, 0x78],
        'i' => [0x00, 0x44, 0x7D, 0x40, 0x00],
        'j' => [0x20, 0x40, 0x44, 0x3D, 0x00],
        'k' => [0x7F, 0x10, 0x28, 0x44, 0x00],
        'l' => [0x00, 0x41, 0x7F, 0x40, 0x00],
        'm' => [0x7C, 0x04, 0x18, 0x04, 0x78],
        'n' => [0x7C, 0x08, 0x04, 0x04, 0x78],
        'o' => [0x38, 0x44, 0x44, 0x44, 0x38],
        'p' => [0x7C, 0x14, 0x14, 0x14, 0x08],
        'q' => [0x08, 0x14, 0x14, 0x18, 0x7C],
        'r' => [0x7C, 0x08, 0x04, 0x04, 0x08],
        's' => [0x48, 0x54, 0x54, 0x54, 0x20],
        't' => [0x04, 0x3F, 0x44, 0x40, 0x20],
        'u' => [0x3C, 0x40, 0x40, 0x20, 0x7C],
        'v' => [0x1C, 0x20, 0x40, 0x20, 0x1C],
        'w' => [0x3C, 0x40, 0x30, 0x40, 0x3C],
        'x' => [0x44, 0x28, 0x10, 0x28, 0x44],
        'y' => [0x0C, 0x50, 0x50, 0x50, 0x3C],
        'z' => [0x44, 0x64, 0x54, 0x4C, 0x44],
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x60, 0x60, 0x00, 0x00],
        ',' => [0x00, 0x80, 0x60, 0x00, 0x00],
        ';' => [0x00, 0x80, 0x66, 0x00, 0x00],
        ':' => [0x00, 0x36, 0x36, 0x00, 0x00],
        '!' => [0x00, 0x00, 0x5F, 0x00, 0x00],
        '?' => [0x02, 0x01, 0x51, 0x09, 0x06],
        '\'' => [0x00, 0x05, 0x03, 0x00, 0x00],
        '"' => [0x00, 0x07, 0x00, 0x07, 0x00],
        '(' => [0x00, 0x1C, 0x22, 0x41, 0x00],
        ')' => [0x00, 0x41, 0x22, 0x1C, 0x00],
        '-' => [0x08, 0x08, 0x08, 0x08, 0x08],
        '/' => [0x20, 0x10, 0x08, 0x04, 0x02],
        _ => [0x00, 0x00, 0x5F, 0x00, 0x00],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_to_nearest_glyph_multiple() {
        assert_eq!(scale_for_target(0), 1);
        assert_eq!(scale_for_target(7), 1);
        assert_eq!(scale_for_target(8), 1);
        assert_eq!(scale_for_target(12), 2);
        assert_eq!(scale_for_target(21), 3);
    }

    #[test]
    fn iast_diacritics_fold_to_base_letters() {
        assert_eq!(normalize_char('ā'), 'a');
        assert_eq!(normalize_char('ṁ'), 'm');
        assert_eq!(normalize_char('ṣ'), 's');
        assert_eq!(normalize_char('ḥ'), 'h');
        assert_eq!(normalize_char('í'), 'i');
        assert_eq!(normalize_char('ñ'), 'n');
        assert_eq!(normalize_char('k'), 'k');
    }

    #[test]
    fn space_has_fixed_advance_and_no_ink() {
        let metrics = glyph_metrics(' ', &glyph_5x7(' '));
        assert_eq!(metrics.width, 0);
        assert_eq!(metrics.advance, 3);
    }

    #[test]
    fn narrow_glyphs_report_trimmed_metrics() {
        let metrics = glyph_metrics('i', &glyph_5x7('i'));
        assert_eq!(metrics.left, 1);
        assert_eq!(metrics.width, 3);
        assert_eq!(metrics.advance, 4);
    }
}
