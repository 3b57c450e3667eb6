use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    errors::BookingError,
    utils::paths::{ensure_dir, PathResolver},
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_WHATSAPP_NUMBER: &str = "5511945164043";
pub const DEFAULT_STORAGE_KEY: &str = "seooBookingFormData";
pub const DEFAULT_PRICING_DELAY_MS: u64 = 1500;
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 5;

/// Runtime settings for the booking wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Dispatcher number receiving submitted bookings.
    pub whatsapp_number: String,
    /// Slot name in the snapshot store.
    pub storage_key: String,
    /// Minimum time the "calculating" indicator stays up before the estimate shows.
    pub pricing_delay_ms: u64,
    pub notification_ttl_secs: u64,
    /// Enforce CPF/CNPJ check digits on top of the format check.
    pub strict_documents: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            pricing_delay_ms: DEFAULT_PRICING_DELAY_MS,
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
            strict_documents: false,
        }
    }
}

impl BookingConfig {
    pub fn pricing_delay(&self) -> Duration {
        Duration::from_millis(self.pricing_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    /// Rejects settings the wizard cannot operate with.
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.storage_key.trim().is_empty() {
            return Err(BookingError::Config("storage_key cannot be empty".into()));
        }
        if !self.whatsapp_number.chars().any(|c| c.is_ascii_digit()) {
            return Err(BookingError::Config(format!(
                "whatsapp_number `{}` contains no digits",
                self.whatsapp_number
            )));
        }
        Ok(())
    }
}

/// Loads and saves [`BookingConfig`] as JSON under the application directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BookingError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BookingError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, BookingError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<BookingConfig, BookingError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            BookingConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &BookingConfig) -> Result<(), BookingError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), BookingError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
