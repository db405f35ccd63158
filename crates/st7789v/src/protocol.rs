//! Command-level protocol helpers for ST7789V.

/// Panel width in pixels (portrait orientation).
pub const WIDTH: usize = 240;
/// Panel height in pixels (portrait orientation).
pub const HEIGHT: usize = 320;
/// Bytes per RGB565 pixel.
pub const BYTES_PER_PIXEL: usize = 2;
/// Number of bytes in one framebuffer row.
pub const ROW_BYTES: usize = WIDTH * BYTES_PER_PIXEL;
/// Total framebuffer size in bytes.
pub const BUFFER_SIZE: usize = ROW_BYTES * HEIGHT;

/// Software reset.
pub const CMD_SWRESET: u8 = 0x01;
/// Exit sleep mode.
pub const CMD_SLPOUT: u8 = 0x11;
/// Enter sleep mode.
pub const CMD_SLPIN: u8 = 0x10;
/// Normal display mode on.
pub const CMD_NORON: u8 = 0x13;
/// Display inversion on (required for correct colors on most modules).
pub const CMD_INVON: u8 = 0x21;
/// Display off.
pub const CMD_DISPOFF: u8 = 0x28;
/// Display on.
pub const CMD_DISPON: u8 = 0x29;
/// Column address window.
pub const CMD_CASET: u8 = 0x2A;
/// Row address window.
pub const CMD_RASET: u8 = 0x2B;
/// Memory write.
pub const CMD_RAMWR: u8 = 0x2C;
/// Memory data access control.
pub const CMD_MADCTL: u8 = 0x36;
/// Interface pixel format.
pub const CMD_COLMOD: u8 = 0x3A;

/// COLMOD parameter selecting 16-bit/pixel over the serial interface.
pub const COLMOD_RGB565: u8 = 0x55;
/// MADCTL parameter for portrait, top-to-bottom, RGB order.
pub const MADCTL_PORTRAIT_RGB: u8 = 0x00;

#[inline]
const fn window_params(start: u16, end: u16) -> [u8; 4] {
    let s = start.to_be_bytes();
    let e = end.to_be_bytes();
    [s[0], s[1], e[0], e[1]]
}

/// Builds the CASET parameter payload for an inclusive column range.
///
/// Returns `None` when the range is empty or exceeds the panel width.
#[inline]
pub fn encode_column_window(start: u16, end: u16) -> Option<[u8; 4]> {
    if start > end || end as usize >= WIDTH {
        return None;
    }

    Some(window_params(start, end))
}

/// Builds the RASET parameter payload for an inclusive row range.
///
/// Returns `None` when the range is empty or exceeds the panel height.
#[inline]
pub fn encode_row_window(start: u16, end: u16) -> Option<[u8; 4]> {
    if start > end || end as usize >= HEIGHT {
        return None;
    }

    Some(window_params(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_params_are_big_endian_inclusive() {
        assert_eq!(
            encode_column_window(0, (WIDTH - 1) as u16),
            Some([0x00, 0x00, 0x00, 0xEF])
        );
        assert_eq!(
            encode_row_window(0, (HEIGHT - 1) as u16),
            Some([0x00, 0x00, 0x01, 0x3F])
        );
        assert_eq!(encode_row_window(256, 300), Some([0x01, 0x00, 0x01, 0x2C]));
    }

    #[test]
    fn invalid_windows_are_rejected() {
        assert_eq!(encode_column_window(10, 9), None);
        assert_eq!(encode_column_window(0, WIDTH as u16), None);
        assert_eq!(encode_row_window(0, HEIGHT as u16), None);
    }
}
