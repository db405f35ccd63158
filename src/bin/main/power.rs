use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use esp_hal::{
    gpio::RtcPin,
    peripherals::{GPIO0, LPWR},
    rtc_cntl::{
        Rtc,
        sleep::{RtcioWakeupSource, WakeupLevel},
    },
};
use shloka_hal_esp32s3::platform::display::PanelDisplay;

pub(super) fn enter_deep_sleep<SPI, DC, RST, BL, D>(
    display: &mut PanelDisplay<SPI, DC, RST>,
    backlight: &mut BL,
    delay: &mut D,
) -> !
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    // Put the panel in a deterministic off state before entering deep sleep.
    let _ = display.enter_sleep(delay);
    let _ = backlight.set_low();

    let mut rtc = Rtc::new(unsafe { LPWR::steal() });
    let mut wake_sw = unsafe { GPIO0::steal() };
    let mut wake_pins: [(&mut dyn RtcPin, WakeupLevel); 1] = [(&mut wake_sw, WakeupLevel::Low)];
    let wake_source = RtcioWakeupSource::new(&mut wake_pins);

    rtc.sleep_deep(&[&wake_source]);
}
