use embedded_storage::{ReadStorage, Storage};
use esp_bootloader_esp_idf::partitions::{
    DataPartitionSubType, PARTITION_TABLE_MAX_LEN, PartitionType, read_partition_table,
};
use esp_rom_sys::rom::spiflash::{
    ESP_ROM_SPIFLASH_RESULT_OK, esp_rom_spiflash_erase_sector, esp_rom_spiflash_read,
    esp_rom_spiflash_unlock, esp_rom_spiflash_write,
};
use log::warn;
use shloka_core::settings::{PersistedSettings, SettingsStore, Translation};

const FLASH_SECTOR_SIZE: u32 = 4096;
const DEFAULT_FLASH_CAPACITY_BYTES: usize = 16 * 1024 * 1024;

const SETTINGS_MAGIC: u32 = 0x314B_4C53; // "SLK1"
const SETTINGS_VERSION: u8 = 1;
/// magic + version/translation word + last-update u64 + checksum.
const SETTINGS_RECORD_LEN: usize = 20;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashSettingsError {
    PartitionTable,
    SettingsPartitionMissing,
    PartitionTooSmall,
    FlashOpFailed(i32),
    Corrupted,
    Unsupported,
}

#[derive(Debug)]
struct RawFlash;

impl RawFlash {
    fn new() -> Result<Self, FlashSettingsError> {
        let rc = unsafe { esp_rom_spiflash_unlock() };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(Self)
    }

    fn erase_sector(&mut self, sector_addr: u32) -> Result<(), FlashSettingsError> {
        if !sector_addr.is_multiple_of(FLASH_SECTOR_SIZE) {
            return Err(FlashSettingsError::Unsupported);
        }

        let sector = sector_addr / FLASH_SECTOR_SIZE;
        let rc = unsafe { esp_rom_spiflash_erase_sector(sector) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(())
    }

    fn read_word(&mut self, addr: u32) -> Result<u32, FlashSettingsError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        let mut word = 0u32;
        let rc = unsafe { esp_rom_spiflash_read(addr, &mut word as *mut u32 as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(word)
    }

    fn write_word(&mut self, addr: u32, word: u32) -> Result<(), FlashSettingsError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        let rc = unsafe { esp_rom_spiflash_write(addr, &word as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(())
    }

    /// Reads word-aligned, word-sized byte runs (all this store needs).
    fn read_bytes(&mut self, addr: u32, out: &mut [u8]) -> Result<(), FlashSettingsError> {
        if !addr.is_multiple_of(4) || !out.len().is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
            let word = self.read_word(addr + (i * 4) as u32)?;
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        Ok(())
    }

    fn write_erased_bytes(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashSettingsError> {
        if !addr.is_multiple_of(4) || !data.len().is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        for (i, chunk) in data.chunks_exact(4).enumerate() {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            self.write_word(addr + (i * 4) as u32, word)?;
        }

        Ok(())
    }
}

impl ReadStorage for RawFlash {
    type Error = FlashSettingsError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        // The partition-table reader asks for arbitrary runs; go through a
        // word-sized window.
        let mut cursor = 0usize;
        while cursor < bytes.len() {
            let addr = offset + cursor as u32;
            let word_addr = addr & !0b11;
            let word = self.read_word(word_addr)?.to_le_bytes();

            let skip = (addr - word_addr) as usize;
            let take = (4 - skip).min(bytes.len() - cursor);
            bytes[cursor..cursor + take].copy_from_slice(&word[skip..skip + take]);
            cursor += take;
        }

        Ok(())
    }

    fn capacity(&self) -> usize {
        DEFAULT_FLASH_CAPACITY_BYTES
    }
}

impl Storage for RawFlash {
    fn write(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), Self::Error> {
        Err(FlashSettingsError::Unsupported)
    }
}

/// Settings store backed by the last sector of a writable data partition.
#[derive(Debug)]
pub struct FlashSettingsStore {
    flash: RawFlash,
    settings_sector_addr: u32,
}

impl FlashSettingsStore {
    pub fn new() -> Result<Self, FlashSettingsError> {
        let mut flash = RawFlash::new()?;

        let mut table_buf = [0u8; PARTITION_TABLE_MAX_LEN];
        let table = read_partition_table(&mut flash, &mut table_buf)
            .map_err(|_| FlashSettingsError::PartitionTable)?;

        let mut best_data_undefined: Option<(u32, u32)> = None;
        let mut fallback_nvs: Option<(u32, u32)> = None;

        for entry in table.iter() {
            if entry.is_read_only() {
                continue;
            }

            if entry.len() < FLASH_SECTOR_SIZE {
                continue;
            }

            match entry.partition_type() {
                PartitionType::Data(DataPartitionSubType::Undefined) => {
                    best_data_undefined = Some((entry.offset(), entry.len()));
                    break;
                }
                PartitionType::Data(DataPartitionSubType::Nvs) => {
                    if fallback_nvs.is_none() {
                        fallback_nvs = Some((entry.offset(), entry.len()));
                    }
                }
                _ => {}
            }
        }

        let (offset, len) = best_data_undefined
            .or(fallback_nvs)
            .ok_or(FlashSettingsError::SettingsPartitionMissing)?;

        if len < FLASH_SECTOR_SIZE {
            return Err(FlashSettingsError::PartitionTooSmall);
        }

        let settings_sector_addr = offset + len - FLASH_SECTOR_SIZE;
        Ok(Self {
            flash,
            settings_sector_addr,
        })
    }
}

impl SettingsStore for FlashSettingsStore {
    type Error = FlashSettingsError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        let mut buf = [0u8; SETTINGS_RECORD_LEN];
        self.flash.read_bytes(self.settings_sector_addr, &mut buf)?;

        if buf.iter().all(|b| *b == 0xFF) {
            return Ok(None);
        }

        let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != SETTINGS_MAGIC {
            return Ok(None);
        }

        if buf[4] != SETTINGS_VERSION {
            return Ok(None);
        }

        let expected_checksum = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);
        if checksum32(&buf[..16]) != expected_checksum {
            return Err(FlashSettingsError::Corrupted);
        }

        let translation = match buf[5] {
            0 => Translation::English,
            1 => Translation::Spanish,
            _ => return Err(FlashSettingsError::Corrupted),
        };

        let last_update_ms = u64::from_le_bytes([
            buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
        ]);

        Ok(Some(PersistedSettings {
            translation,
            last_update_ms,
        }))
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        let mut buf = [0u8; SETTINGS_RECORD_LEN];
        buf[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
        buf[4] = SETTINGS_VERSION;
        buf[5] = match settings.translation {
            Translation::English => 0,
            Translation::Spanish => 1,
        };
        buf[8..16].copy_from_slice(&settings.last_update_ms.to_le_bytes());
        let checksum = checksum32(&buf[..16]);
        buf[16..20].copy_from_slice(&checksum.to_le_bytes());

        self.flash.erase_sector(self.settings_sector_addr)?;
        self.flash
            .write_erased_bytes(self.settings_sector_addr, &buf)?;
        Ok(())
    }
}

fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C_9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

/// Flash-backed store that degrades to volatile defaults when the settings
/// partition is unavailable, so the frame keeps working without persistence.
#[derive(Debug)]
pub struct BoardSettingsStore {
    flash: Option<FlashSettingsStore>,
}

impl BoardSettingsStore {
    pub fn new() -> Self {
        let flash = match FlashSettingsStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                warn!("settings storage unavailable ({:?}); defaults will be volatile", err);
                None
            }
        };

        Self { flash }
    }

    pub fn is_persistent(&self) -> bool {
        self.flash.is_some()
    }
}

impl Default for BoardSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for BoardSettingsStore {
    type Error = FlashSettingsError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        match self.flash.as_mut() {
            Some(store) => store.load(),
            None => Ok(None),
        }
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        match self.flash.as_mut() {
            Some(store) => store.save(settings),
            None => Ok(()),
        }
    }
}
