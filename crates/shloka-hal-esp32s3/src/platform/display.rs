use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use st7789v::{Config, Error, FrameBuffer, St7789};

use shloka_core::engine::WallpaperTarget;

/// Board-level panel adapter.
///
/// Owns the ST7789V driver and exposes the core's wallpaper surface: one
/// `apply` pushes the finished frame to the only display surface this
/// appliance has.
#[derive(Debug)]
pub struct PanelDisplay<SPI, DC, RST> {
    driver: St7789<SPI, DC, RST>,
}

impl<SPI, DC, RST> PanelDisplay<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, config: Config) -> Self {
        Self {
            driver: St7789::new(spi, dc, rst, config),
        }
    }

    /// Resets and configures the panel.
    pub fn initialize<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Error<SPI::Error, DC::Error, RST::Error>>
    where
        D: DelayNs,
    {
        self.driver.init(delay)
    }

    /// Quiesces the panel before deep sleep.
    pub fn enter_sleep<D>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Error<SPI::Error, DC::Error, RST::Error>>
    where
        D: DelayNs,
    {
        self.driver.enter_sleep(delay)
    }
}

impl<SPI, DC, RST> WallpaperTarget for PanelDisplay<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
{
    type Error = Error<SPI::Error, DC::Error, RST::Error>;

    fn apply(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error> {
        self.driver.flush_full(frame)
    }
}
