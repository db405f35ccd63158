//! Unlock-triggered wallpaper update orchestration.

use log::{debug, info, warn};
use st7789v::FrameBuffer;

use crate::{
    catalog::{CatalogError, VerseCatalog},
    entropy::EntropySource,
    render::{RenderError, VerseRenderer},
    settings::{PersistedSettings, SettingsStore, Translation},
    throttle::{self, UPDATE_INTERVAL_MS},
};

/// Window inside which a second trigger is treated as a duplicate of the
/// first (unlock and screen-on firing back to back).
pub const TRIGGER_DEBOUNCE_MS: u64 = 800;

/// Platform surface able to present a finished frame on every display
/// surface the device exposes.
pub trait WallpaperTarget {
    type Error;

    fn apply(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpdateOutcome {
    /// A fresh verse wallpaper is on screen and the timestamp advanced.
    Applied,
    /// The minimum update interval has not elapsed yet.
    Throttled,
    /// A duplicate trigger arrived within the debounce window.
    Debounced,
}

/// Causes of a failed update, one per stage of the sequence.
#[derive(Debug)]
pub enum UpdateError<SE, AE> {
    Catalog(CatalogError),
    Render(RenderError),
    Apply(AE),
    Settings(SE),
}

/// Owns one update pipeline: catalog, renderer, entropy and settings.
///
/// Constructed once at boot and handed to whatever schedules unlock work;
/// there is no ambient global state.
pub struct UpdateEngine<'a, S, E> {
    catalog: VerseCatalog<'a>,
    renderer: VerseRenderer,
    settings_store: S,
    entropy: E,
    settings: PersistedSettings,
    interval_ms: u64,
    last_attempt_ms: Option<u64>,
}

impl<'a, S, E> UpdateEngine<'a, S, E>
where
    S: SettingsStore,
    E: EntropySource,
{
    /// Loads persisted settings and builds the engine.
    ///
    /// A stored timestamp ahead of `now_ms` means the monotonic clock
    /// restarted since the last update; it is treated as never-updated.
    pub fn new(catalog: VerseCatalog<'a>, mut settings_store: S, entropy: E, now_ms: u64) -> Self {
        let mut settings = match settings_store.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                info!("no saved settings; using defaults");
                PersistedSettings::default()
            }
            Err(_) => {
                warn!("failed to read saved settings; using defaults");
                PersistedSettings::default()
            }
        };

        if settings.last_update_ms > now_ms {
            settings.last_update_ms = 0;
        }

        Self {
            catalog,
            renderer: VerseRenderer::new(),
            settings_store,
            entropy,
            settings,
            interval_ms: UPDATE_INTERVAL_MS,
            last_attempt_ms: None,
        }
    }

    /// Currently persisted settings snapshot.
    pub fn persisted_settings(&self) -> PersistedSettings {
        self.settings
    }

    pub fn translation(&self) -> Translation {
        self.settings.translation
    }

    /// Changes the preferred translation and persists it.
    pub fn set_translation(&mut self, translation: Translation) -> Result<(), S::Error> {
        self.settings.translation = translation;
        self.settings_store.save(&self.settings)
    }

    /// Runs one unlock-triggered update attempt.
    ///
    /// Failures leave the persisted timestamp untouched so the next trigger
    /// retries, except a settings-save failure after a successful apply:
    /// the wallpaper is already on screen, so the in-memory timestamp
    /// advances and only the persistence error is reported.
    pub fn on_unlock<W>(
        &mut self,
        now_ms: u64,
        frame: &mut FrameBuffer,
        wallpaper: &mut W,
    ) -> Result<UpdateOutcome, UpdateError<S::Error, W::Error>>
    where
        W: WallpaperTarget,
    {
        if let Some(last) = self.last_attempt_ms
            && now_ms.saturating_sub(last) < TRIGGER_DEBOUNCE_MS
        {
            debug!("unlock at {}ms debounced", now_ms);
            return Ok(UpdateOutcome::Debounced);
        }
        self.last_attempt_ms = Some(now_ms);

        if !throttle::can_proceed(now_ms, self.settings.last_update_ms, self.interval_ms) {
            debug!(
                "update throttled: last={}ms now={}ms",
                self.settings.last_update_ms, now_ms
            );
            return Ok(UpdateOutcome::Throttled);
        }

        let verse = self
            .catalog
            .pick(&mut self.entropy)
            .map_err(UpdateError::Catalog)?;
        self.renderer
            .render(frame, verse, self.settings.translation)
            .map_err(UpdateError::Render)?;
        wallpaper.apply(frame).map_err(UpdateError::Apply)?;

        // `0` is the never-updated sentinel, so a boot-time update at 0ms
        // still has to record progress.
        self.settings.last_update_ms = now_ms.max(1);
        info!(
            "wallpaper updated: chapter {} verse {} at {}ms",
            verse.chapter, verse.verse, now_ms
        );

        self.settings_store
            .save(&self.settings)
            .map_err(UpdateError::Settings)?;

        Ok(UpdateOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::bundled_catalog;

    #[derive(Default)]
    struct MemorySettings {
        saved: Option<PersistedSettings>,
        fail_save: bool,
    }

    impl SettingsStore for MemorySettings {
        type Error = ();

        fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
            Ok(self.saved)
        }

        fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
            if self.fail_save {
                return Err(());
            }
            self.saved = Some(*settings);
            Ok(())
        }
    }

    struct StepEntropy(u32);

    impl EntropySource for StepEntropy {
        fn next_u32(&mut self) -> u32 {
            self.0 = self.0.wrapping_add(0x9E37_79B9);
            self.0
        }
    }

    struct RecordingTarget {
        applies: usize,
        fail: bool,
    }

    impl RecordingTarget {
        fn new() -> Self {
            Self {
                applies: 0,
                fail: false,
            }
        }
    }

    impl WallpaperTarget for RecordingTarget {
        type Error = &'static str;

        fn apply(&mut self, _frame: &FrameBuffer) -> Result<(), Self::Error> {
            if self.fail {
                return Err("panel offline");
            }
            self.applies += 1;
            Ok(())
        }
    }

    fn make_engine() -> UpdateEngine<'static, MemorySettings, StepEntropy> {
        UpdateEngine::new(bundled_catalog(), MemorySettings::default(), StepEntropy(7), 0)
    }

    #[test]
    fn full_cycle_applies_then_throttles_then_applies_again() {
        let mut engine = make_engine();
        let mut frame = FrameBuffer::new();
        let mut target = RecordingTarget::new();

        assert_eq!(
            engine.on_unlock(1_000, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Applied
        );
        assert_eq!(
            engine.on_unlock(20_000, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Throttled
        );
        assert_eq!(
            engine.on_unlock(31_001, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Applied
        );
        assert_eq!(target.applies, 2);
    }

    #[test]
    fn duplicate_trigger_inside_the_debounce_window_is_dropped() {
        let mut engine = make_engine();
        let mut frame = FrameBuffer::new();
        let mut target = RecordingTarget::new();

        assert_eq!(
            engine.on_unlock(1_000, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Applied
        );
        assert_eq!(
            engine.on_unlock(1_500, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Debounced
        );
        assert_eq!(target.applies, 1);
    }

    #[test]
    fn apply_failure_leaves_the_timestamp_unset_so_the_next_trigger_retries() {
        let mut engine = make_engine();
        let mut frame = FrameBuffer::new();
        let mut target = RecordingTarget::new();
        target.fail = true;

        assert!(matches!(
            engine.on_unlock(1_000, &mut frame, &mut target),
            Err(UpdateError::Apply("panel offline"))
        ));
        assert_eq!(engine.persisted_settings().last_update_ms, 0);

        target.fail = false;
        assert_eq!(
            engine.on_unlock(2_000, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Applied
        );
        assert_eq!(target.applies, 1);
    }

    #[test]
    fn empty_catalog_surfaces_the_catalog_error() {
        let mut engine = UpdateEngine::new(
            VerseCatalog::new(&[]),
            MemorySettings::default(),
            StepEntropy(1),
            0,
        );
        let mut frame = FrameBuffer::new();
        let mut target = RecordingTarget::new();

        assert!(matches!(
            engine.on_unlock(1_000, &mut frame, &mut target),
            Err(UpdateError::Catalog(CatalogError::Empty))
        ));
        assert_eq!(target.applies, 0);
    }

    #[test]
    fn save_failure_still_counts_as_an_update_for_this_power_cycle() {
        let mut engine = UpdateEngine::new(
            bundled_catalog(),
            MemorySettings {
                saved: None,
                fail_save: true,
            },
            StepEntropy(3),
            0,
        );
        let mut frame = FrameBuffer::new();
        let mut target = RecordingTarget::new();

        assert!(matches!(
            engine.on_unlock(1_000, &mut frame, &mut target),
            Err(UpdateError::Settings(()))
        ));
        assert_eq!(target.applies, 1);
        assert_eq!(engine.persisted_settings().last_update_ms, 1_000);

        assert_eq!(
            engine.on_unlock(2_000, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Throttled
        );
    }

    #[test]
    fn stored_timestamp_from_before_a_clock_restart_is_discarded() {
        let store = MemorySettings {
            saved: Some(PersistedSettings {
                translation: Translation::Spanish,
                last_update_ms: 50_000,
            }),
            fail_save: false,
        };
        let mut engine = UpdateEngine::new(bundled_catalog(), store, StepEntropy(9), 0);
        let mut frame = FrameBuffer::new();
        let mut target = RecordingTarget::new();

        assert_eq!(engine.translation(), Translation::Spanish);
        assert_eq!(
            engine.on_unlock(0, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Applied
        );

        // A boot-time update at 0ms must still arm the throttle.
        assert_eq!(
            engine.on_unlock(1_000, &mut frame, &mut target).unwrap(),
            UpdateOutcome::Throttled
        );
    }

    #[test]
    fn translation_changes_are_persisted() {
        let mut engine = make_engine();

        engine.set_translation(Translation::Spanish).unwrap();
        assert_eq!(engine.translation(), Translation::Spanish);
        assert_eq!(
            engine.persisted_settings().translation,
            Translation::Spanish
        );
    }
}
