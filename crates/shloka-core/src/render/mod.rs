//! Verse wallpaper rendering.
//!
//! The whole pipeline is deterministic integer math: identical verse,
//! translation and layout parameters produce a pixel-identical frame.

mod background;
mod glyph;
mod ornament;
mod text;

use heapless::Vec;
use st7789v::{
    FrameBuffer, Rgb565,
    protocol::{HEIGHT, WIDTH},
};

use crate::{catalog::Verse, settings::Translation};

use background::draw_background;
use glyph::{GLYPH_HEIGHT, draw_glyph, glyph_5x7, glyph_metrics, normalize_char, scale_for_target};
use ornament::draw_ornament;
use text::{caption_label, draw_line_centered, wrap_text};

// Layout, as fractions of the frame dimensions.
const PRIMARY_TEXT_PER_MILLE: usize = 50;
const SECONDARY_TEXT_PER_MILLE: usize = 36;
const WRAP_WIDTH_PERCENT: usize = 70;
const PRIMARY_TOP_PERCENT: usize = 18;
const BLOCK_GAP_PERCENT: usize = 6;
const CAPTION_Y_PERCENT: usize = 88;
const ORNAMENT_TOP_PERCENT: usize = 12;
const ORNAMENT_BOTTOM_PERCENT: usize = 92;

/// Extra leading between lines, in font rows (pre-scale).
const LINE_LEADING: usize = 2;

/// Upper bound on wrapped lines per text block.
const MAX_BLOCK_LINES: usize = 12;

const PRIMARY_COLOR: Rgb565 = Rgb565::from_rgb888(244, 238, 220);
const SECONDARY_COLOR: Rgb565 = Rgb565::from_rgb888(208, 198, 176);
const ACCENT_COLOR: Rgb565 = Rgb565::from_rgb888(222, 184, 120);

/// Rendering errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderError {
    /// A text block wrapped to more lines than the layout allows.
    LayoutOverflow,
}

/// Draws complete verse wallpapers into a framebuffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerseRenderer;

impl VerseRenderer {
    pub const fn new() -> Self {
        Self
    }

    /// Renders `verse` with the chosen translation into `frame`.
    ///
    /// Every pixel of the frame is written; on error the frame contents are
    /// unspecified and must not be applied.
    pub fn render(
        &self,
        frame: &mut FrameBuffer,
        verse: &Verse,
        translation: Translation,
    ) -> Result<(), RenderError> {
        draw_background(frame);
        draw_ornament(frame, HEIGHT * ORNAMENT_TOP_PERCENT / 100, ACCENT_COLOR);
        draw_ornament(frame, HEIGHT * ORNAMENT_BOTTOM_PERCENT / 100, ACCENT_COLOR);

        let primary_scale = scale_for_target(WIDTH * PRIMARY_TEXT_PER_MILLE / 1000);
        let secondary_scale = scale_for_target(WIDTH * SECONDARY_TEXT_PER_MILLE / 1000);
        let wrap_width = WIDTH * WRAP_WIDTH_PERCENT / 100;

        let secondary_text = verse.translation(translation);
        let primary_lines = wrap_text(verse.primary, primary_scale, wrap_width)?;
        let secondary_lines = wrap_text(secondary_text, secondary_scale, wrap_width)?;

        let mut y = HEIGHT * PRIMARY_TOP_PERCENT / 100;
        for &(start, end) in &primary_lines {
            draw_line_centered(
                frame,
                y as isize,
                &verse.primary[start..end],
                primary_scale,
                PRIMARY_COLOR,
            );
            y += line_advance(primary_scale);
        }

        y += HEIGHT * BLOCK_GAP_PERCENT / 100;
        for &(start, end) in &secondary_lines {
            draw_line_centered(
                frame,
                y as isize,
                &secondary_text[start..end],
                secondary_scale,
                SECONDARY_COLOR,
            );
            y += line_advance(secondary_scale);
        }

        let mut caption_buf = [0u8; text::CAPTION_BYTES];
        let caption = caption_label(verse.chapter, verse.verse, translation, &mut caption_buf);
        draw_line_centered(
            frame,
            (HEIGHT * CAPTION_Y_PERCENT / 100) as isize,
            caption,
            secondary_scale,
            ACCENT_COLOR,
        );

        Ok(())
    }
}

const fn line_advance(scale: usize) -> usize {
    (GLYPH_HEIGHT + LINE_LEADING) * scale
}

fn set_pixel_signed(frame: &mut FrameBuffer, x: isize, y: isize, color: Rgb565) {
    if x < 0 || y < 0 {
        return;
    }

    let _ = frame.set_pixel(x as usize, y as usize, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BUNDLED_VERSES;

    #[test]
    fn identical_inputs_render_pixel_identical_frames() {
        let renderer = VerseRenderer::new();
        let mut a = FrameBuffer::new();
        let mut b = FrameBuffer::new();

        renderer
            .render(&mut a, &BUNDLED_VERSES[0], Translation::English)
            .unwrap();
        renderer
            .render(&mut b, &BUNDLED_VERSES[0], Translation::English)
            .unwrap();

        assert!(a.bytes().as_slice() == b.bytes().as_slice());
    }

    #[test]
    fn every_pixel_of_the_frame_is_written() {
        let renderer = VerseRenderer::new();
        let mut frame = FrameBuffer::new();
        // Sentinel the renderer never emits (the palette is never pure white).
        frame.fill(Rgb565::WHITE);

        renderer
            .render(&mut frame, &BUNDLED_VERSES[1], Translation::Spanish)
            .unwrap();

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                assert_ne!(frame.pixel(x, y), Some(Rgb565::WHITE), "pixel {x},{y}");
            }
        }
    }

    #[test]
    fn translations_change_the_frame() {
        let renderer = VerseRenderer::new();
        let mut english = FrameBuffer::new();
        let mut spanish = FrameBuffer::new();

        renderer
            .render(&mut english, &BUNDLED_VERSES[0], Translation::English)
            .unwrap();
        renderer
            .render(&mut spanish, &BUNDLED_VERSES[0], Translation::Spanish)
            .unwrap();

        assert!(english.bytes().as_slice() != spanish.bytes().as_slice());
    }

    #[test]
    fn primary_text_lands_in_its_band() {
        let renderer = VerseRenderer::new();
        let mut frame = FrameBuffer::new();
        renderer
            .render(&mut frame, &BUNDLED_VERSES[0], Translation::English)
            .unwrap();

        let band_top = HEIGHT * PRIMARY_TOP_PERCENT / 100;
        let band_bottom = band_top + line_advance(scale_for_target(WIDTH * PRIMARY_TEXT_PER_MILLE / 1000));

        let mut found = false;
        for y in band_top..band_bottom {
            for x in 0..WIDTH {
                if frame.pixel(x, y) == Some(PRIMARY_COLOR) {
                    found = true;
                }
            }
        }
        assert!(found, "no primary text pixels in the primary band");

        // Nothing above the top ornament except background.
        for y in 0..HEIGHT * ORNAMENT_TOP_PERCENT / 100 - WIDTH / 60 - 1 {
            for x in 0..WIDTH {
                assert_ne!(frame.pixel(x, y), Some(PRIMARY_COLOR));
            }
        }
    }

    #[test]
    fn caption_band_carries_accent_pixels() {
        let renderer = VerseRenderer::new();
        let mut frame = FrameBuffer::new();
        renderer
            .render(&mut frame, &BUNDLED_VERSES[5], Translation::English)
            .unwrap();

        // Caption glyphs only; stops short of the bottom ornament rows.
        let caption_top = HEIGHT * CAPTION_Y_PERCENT / 100;
        let caption_bottom = caption_top + GLYPH_HEIGHT;

        let mut found = false;
        for y in caption_top..caption_bottom.min(HEIGHT) {
            for x in 0..WIDTH {
                if frame.pixel(x, y) == Some(ACCENT_COLOR) {
                    found = true;
                }
            }
        }
        assert!(found, "no caption pixels near the bottom of the frame");
    }
}
