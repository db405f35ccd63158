#![cfg_attr(not(test), no_std)]

//! ST7789V (240x320 RGB565 TFT) driver primitives.

mod framebuffer;
pub mod protocol;

pub use framebuffer::{FrameBuffer, Rgb565};

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

/// Driver configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Expected SPI clock in Hz (documented for board glue).
    pub spi_hz: u32,
    /// Whether the panel needs display inversion for correct colors.
    pub invert_colors: bool,
    /// MADCTL value selecting orientation and color order.
    pub madctl: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spi_hz: 40_000_000,
            invert_colors: true,
            madctl: protocol::MADCTL_PORTRAIT_RGB,
        }
    }
}

/// Driver errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error<SpiErr, DcErr, RstErr> {
    /// SPI transaction failed.
    Spi(SpiErr),
    /// D/C pin operation failed.
    Dc(DcErr),
    /// Reset pin operation failed.
    Rst(RstErr),
    /// Input parameters are outside supported bounds.
    InvalidInput,
}

pub type DriverResult<SpiErr, DcErr, RstErr> = Result<(), Error<SpiErr, DcErr, RstErr>>;

/// ST7789V driver.
#[derive(Debug)]
pub struct St7789<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    config: Config,
}

impl<SPI, DC, RST> St7789<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates a new driver instance.
    pub fn new(spi: SPI, dc: DC, rst: RST, config: Config) -> Self {
        Self {
            spi,
            dc,
            rst,
            config,
        }
    }

    /// Returns current configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Releases owned bus and pins.
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }

    fn write_command(
        &mut self,
        command: u8,
        params: &[u8],
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error> {
        self.dc.set_low().map_err(Error::Dc)?;
        self.spi.write(&[command]).map_err(Error::Spi)?;

        if !params.is_empty() {
            self.dc.set_high().map_err(Error::Dc)?;
            self.spi.write(params).map_err(Error::Spi)?;
        }

        Ok(())
    }

    /// Hardware-resets and initializes the panel, leaving the display on.
    pub fn init<D>(&mut self, delay: &mut D) -> DriverResult<SPI::Error, DC::Error, RST::Error>
    where
        D: DelayNs,
    {
        self.rst.set_low().map_err(Error::Rst)?;
        delay.delay_us(20);
        self.rst.set_high().map_err(Error::Rst)?;
        delay.delay_ms(120);

        self.write_command(protocol::CMD_SWRESET, &[])?;
        delay.delay_ms(120);
        self.write_command(protocol::CMD_SLPOUT, &[])?;
        delay.delay_ms(120);

        self.write_command(protocol::CMD_COLMOD, &[protocol::COLMOD_RGB565])?;
        self.write_command(protocol::CMD_MADCTL, &[self.config.madctl])?;
        if self.config.invert_colors {
            self.write_command(protocol::CMD_INVON, &[])?;
        }
        self.write_command(protocol::CMD_NORON, &[])?;
        self.write_command(protocol::CMD_DISPON, &[])?;
        delay.delay_ms(20);

        Ok(())
    }

    /// Restricts the drawing window to an inclusive pixel rectangle.
    pub fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error> {
        let columns = protocol::encode_column_window(x0, x1).ok_or(Error::InvalidInput)?;
        let rows = protocol::encode_row_window(y0, y1).ok_or(Error::InvalidInput)?;

        self.write_command(protocol::CMD_CASET, &columns)?;
        self.write_command(protocol::CMD_RASET, &rows)?;
        Ok(())
    }

    /// Flushes a full framebuffer, row by row.
    pub fn flush_full(
        &mut self,
        frame: &FrameBuffer,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error> {
        self.set_window(
            0,
            0,
            (protocol::WIDTH - 1) as u16,
            (protocol::HEIGHT - 1) as u16,
        )?;
        self.write_command(protocol::CMD_RAMWR, &[])?;

        self.dc.set_high().map_err(Error::Dc)?;
        for y in 0..protocol::HEIGHT {
            let row = frame.row(y).ok_or(Error::InvalidInput)?;
            self.spi.write(row).map_err(Error::Spi)?;
        }

        Ok(())
    }

    /// Puts the panel in sleep mode with the display off.
    pub fn enter_sleep<D>(
        &mut self,
        delay: &mut D,
    ) -> DriverResult<SPI::Error, DC::Error, RST::Error>
    where
        D: DelayNs,
    {
        self.write_command(protocol::CMD_DISPOFF, &[])?;
        self.write_command(protocol::CMD_SLPIN, &[])?;
        delay.delay_ms(5);
        Ok(())
    }
}
