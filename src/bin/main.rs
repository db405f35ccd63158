#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::Timer;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    rng::Rng,
    rtc_cntl::{SocResetReason, reset_reason, wakeup_cause},
    spi::master::Spi,
    system::Cpu,
    time::{Instant, Rate},
    timer::timg::TimerGroup,
};
use log::{LevelFilter, info, warn};
use shloka_core::{
    catalog::bundled_catalog,
    engine::{UpdateEngine, UpdateOutcome, WallpaperTarget},
    entropy::EntropySource,
    settings::SettingsStore,
    throttle::UPDATE_INTERVAL_MS,
    trigger::UnlockSource,
};
use shloka_hal_esp32s3::{
    entropy::HardwareEntropy,
    input::wake_button::{WakeButton, WakeButtonConfig},
    platform::display::PanelDisplay,
    storage::flash_settings::BoardSettingsStore,
};
use st7789v::{Config as PanelConfig, FrameBuffer};
use static_cell::ConstStaticCell;

#[path = "main/power.rs"]
mod power;

const TITLE: &str = "Shloka";
const DISPLAY_SPI_HZ: u32 = 40_000_000;
const BUTTON_DEBOUNCE_POLLS: u8 = 4;
const INPUT_POLL_INTERVAL_MS: u64 = 20;
const SLEEP_INACTIVITY_TIMEOUT_MS: u64 = 120_000;
const SLEEP_NOTICE_MS: u64 = 120;

// The RGB565 frame is far too large for a stack slot; give it a static home.
static FRAME: ConstStaticCell<FrameBuffer> = ConstStaticCell::new(FrameBuffer::new());

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

fn handle_unlock<S, E, W>(
    engine: &mut UpdateEngine<'_, S, E>,
    now_ms: u64,
    frame: &mut FrameBuffer,
    display: &mut W,
) where
    S: SettingsStore,
    S::Error: core::fmt::Debug,
    E: EntropySource,
    W: WallpaperTarget,
    W::Error: core::fmt::Debug,
{
    match engine.on_unlock(now_ms, frame, display) {
        Ok(UpdateOutcome::Applied) => {}
        Ok(UpdateOutcome::Throttled) => {
            info!("unlock at {}ms inside throttle window; keeping current verse", now_ms);
        }
        Ok(UpdateOutcome::Debounced) => {}
        Err(err) => warn!("wallpaper update failed: {:?}", err),
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: shloka starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    let boot_reset_reason = reset_reason(Cpu::ProCpu);
    let boot_wakeup_cause = wakeup_cause();
    let woke_from_deep_sleep = boot_reset_reason == Some(SocResetReason::CoreDeepSleep);
    info!(
        "boot reset_reason={:?} wakeup_cause={:?}",
        boot_reset_reason, boot_wakeup_cause
    );
    if woke_from_deep_sleep {
        info!("woke from deep sleep; treating wake as unlock");
    }

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Wiring used by this board:
    // CLK=GPIO12, MOSI=GPIO11, CS=GPIO10, DC=GPIO9, RST=GPIO8, BL=GPIO13, BTN=GPIO0
    let mut backlight = Output::new(peripherals.GPIO13, Level::Low, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO9, Level::Low, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO8, Level::High, OutputConfig::default());
    let cs = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());

    let spi_config = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(DISPLAY_SPI_HZ))
        // ST7789V uses CPOL=0, CPHA=0.
        .with_mode(esp_hal::spi::Mode::_0);

    let spi = Spi::new(peripherals.SPI2, spi_config)
        .unwrap()
        .with_sck(peripherals.GPIO12)
        .with_mosi(peripherals.GPIO11);

    let spi_device = ExclusiveDevice::new(spi, cs, NoDelay).unwrap();

    let mut delay = Delay::new();
    let mut display = PanelDisplay::new(spi_device, dc, rst, PanelConfig::default());

    esp_println::println!("display: init begin (CLK=12 MOSI=11 CS=10 DC=9 RST=8)");
    if let Err(err) = display.initialize(&mut delay) {
        esp_println::println!("display: initialize failed");
        warn!("display initialize failed: {:?}", err);
    } else {
        esp_println::println!("display: initialize ok");
    }
    backlight.set_high();

    let input_cfg = InputConfig::default().with_pull(Pull::Up);
    let button_pin = Input::new(peripherals.GPIO0, input_cfg);
    let mut button = WakeButton::new(
        button_pin,
        WakeButtonConfig::default().with_debounce_polls(BUTTON_DEBOUNCE_POLLS),
    )
    .unwrap();

    let settings_store = BoardSettingsStore::new();
    if settings_store.is_persistent() {
        info!("settings partition found; preferences survive reboot");
    }

    let entropy = HardwareEntropy::new(Rng::new());
    let catalog = bundled_catalog();
    let frame = FRAME.take();

    let loop_start = Instant::now();
    let mut engine = UpdateEngine::new(catalog, settings_store, entropy, 0);

    info!(
        "{} started: verses={} interval_ms={} spi_hz={}",
        TITLE,
        catalog.len(),
        UPDATE_INTERVAL_MS,
        DISPLAY_SPI_HZ
    );
    info!("Display pins: CLK=GPIO12 MOSI=GPIO11 CS=GPIO10 DC=GPIO9 RST=GPIO8 BL=GPIO13");
    info!("Wake button: GPIO0 (active low, RTC wake source)");

    // Boot, including deep-sleep wake, counts as the first unlock.
    handle_unlock(
        &mut engine,
        loop_start.elapsed().as_millis(),
        frame,
        &mut display,
    );

    let mut last_activity_ms = loop_start.elapsed().as_millis();

    loop {
        let now_ms = loop_start.elapsed().as_millis();

        match button.poll_unlock() {
            Ok(true) => {
                last_activity_ms = now_ms;
                handle_unlock(&mut engine, now_ms, frame, &mut display);
            }
            Ok(false) => {}
            Err(_) => {}
        }

        if now_ms.saturating_sub(last_activity_ms) >= SLEEP_INACTIVITY_TIMEOUT_MS {
            info!(
                "sleep: entering deep sleep after {}ms inactivity",
                SLEEP_INACTIVITY_TIMEOUT_MS
            );
            Timer::after_millis(SLEEP_NOTICE_MS).await;
            power::enter_deep_sleep(&mut display, &mut backlight, &mut delay);
        }

        Timer::after_millis(INPUT_POLL_INTERVAL_MS).await;
    }
}
