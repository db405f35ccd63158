//! Persisted user settings abstraction.

/// Translation shown below the primary text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Translation {
    #[default]
    English,
    Spanish,
}

/// User-tunable state that should survive reboot.
///
/// `last_update_ms == 0` means no wallpaper update has been recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PersistedSettings {
    pub translation: Translation,
    pub last_update_ms: u64,
}

impl PersistedSettings {
    pub const fn new(translation: Translation) -> Self {
        Self {
            translation,
            last_update_ms: 0,
        }
    }
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self::new(Translation::English)
    }
}

/// Abstract settings persistence backend.
///
/// Each `save` writes the whole record, so the two logical keys (translation
/// and last-update timestamp) are updated atomically with respect to each
/// other.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}
