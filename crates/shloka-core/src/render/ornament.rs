use super::*;

/// Draws the dot-and-line divider centered horizontally at `center_y`.
pub(super) fn draw_ornament(frame: &mut FrameBuffer, center_y: usize, color: Rgb565) {
    let cx = (WIDTH / 2) as isize;
    let cy = center_y as isize;
    let radius = (WIDTH / 60) as isize;
    let gap = radius + 6;
    let line_len = (WIDTH / 6) as isize;

    draw_filled_circle(frame, cx, cy, radius, color);
    draw_hline(frame, cx - gap - line_len, cy, line_len, color);
    draw_hline(frame, cx + gap, cy, line_len, color);
}

fn draw_filled_circle(frame: &mut FrameBuffer, cx: isize, cy: isize, r: isize, color: Rgb565) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                set_pixel_signed(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_hline(frame: &mut FrameBuffer, x: isize, y: isize, len: isize, color: Rgb565) {
    for dx in 0..len {
        set_pixel_signed(frame, x + dx, y, color);
        set_pixel_signed(frame, x + dx, y + 1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ornament_marks_the_center_dot_and_side_lines() {
        let mut frame = FrameBuffer::new();
        let accent = Rgb565::from_rgb888(222, 184, 120);
        draw_ornament(&mut frame, 40, accent);

        assert_eq!(frame.pixel(WIDTH / 2, 40), Some(accent));

        let gap = WIDTH / 60 + 6;
        assert_eq!(frame.pixel(WIDTH / 2 + gap + 1, 40), Some(accent));
        assert_eq!(frame.pixel(WIDTH / 2 - gap - 2, 40), Some(accent));

        // The gap itself stays untouched.
        assert_eq!(frame.pixel(WIDTH / 2 + gap - 1, 40), Some(Rgb565::BLACK));
    }
}
