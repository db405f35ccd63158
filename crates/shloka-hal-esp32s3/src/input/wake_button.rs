use embedded_hal::digital::InputPin;

use shloka_core::trigger::UnlockSource;

#[derive(Debug, Clone, Copy)]
pub struct WakeButtonConfig {
    active_low: bool,
    debounce_polls: u8,
}

impl Default for WakeButtonConfig {
    fn default() -> Self {
        Self {
            active_low: true,
            debounce_polls: 3,
        }
    }
}

impl WakeButtonConfig {
    pub const fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    pub const fn with_debounce_polls(mut self, debounce_polls: u8) -> Self {
        self.debounce_polls = debounce_polls;
        self
    }
}

/// Debounced momentary button; each press is one unlock event.
#[derive(Debug)]
pub struct WakeButton<SW> {
    sw: SW,
    config: WakeButtonConfig,
    raw: bool,
    stable: bool,
    stable_count: u8,
}

impl<SW> WakeButton<SW>
where
    SW: InputPin,
{
    pub fn new(mut sw: SW, config: WakeButtonConfig) -> Result<Self, SW::Error> {
        let sw_high = sw.is_high()?;
        let pressed = pressed_from_level(sw_high, config.active_low);

        Ok(Self {
            sw,
            config,
            raw: pressed,
            stable: pressed,
            stable_count: 0,
        })
    }
}

impl<SW> UnlockSource for WakeButton<SW>
where
    SW: InputPin,
{
    type Error = SW::Error;

    fn poll_unlock(&mut self) -> Result<bool, Self::Error> {
        let sw_high = self.sw.is_high()?;
        let pressed = pressed_from_level(sw_high, self.config.active_low);

        if pressed == self.raw {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.raw = pressed;
            self.stable_count = 0;
        }

        let debounce_threshold = self.config.debounce_polls.max(1);
        if self.stable_count >= debounce_threshold && self.stable != self.raw {
            self.stable = self.raw;
            // Only the press edge counts; release is ignored.
            return Ok(self.stable);
        }

        Ok(false)
    }
}

fn pressed_from_level(level_high: bool, active_low: bool) -> bool {
    if active_low { !level_high } else { level_high }
}
