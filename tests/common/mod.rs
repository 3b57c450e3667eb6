#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use seoo_booking::{
    config::{BookingConfig, ConfigManager},
    core::{BookingWizard, LinkOpener, ManualClock},
    errors::BookingError,
    storage::JsonSnapshotStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

/// Creates a unique application directory for one test.
pub fn test_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Mounts a wizard on the file-backed store under `base`.
pub fn mount_in(base: &PathBuf, clock: Arc<ManualClock>) -> BookingWizard {
    let config = ConfigManager::with_base_dir(base.clone())
        .expect("create config manager for temp dir")
        .load()
        .expect("load config");
    let store = JsonSnapshotStore::new(Some(base.clone())).expect("create json store");
    BookingWizard::mount(Box::new(store), clock, config)
}

pub fn setup_test_env() -> (BookingWizard, PathBuf, Arc<ManualClock>) {
    let base = test_base_dir();
    let clock = Arc::new(ManualClock::at_date(today()));
    let wizard = mount_in(&base, clock.clone());
    (wizard, base, clock)
}

pub fn snapshot_path(base: &PathBuf) -> PathBuf {
    let key = BookingConfig::default().storage_key;
    base.join("drafts").join(format!("{key}.json"))
}

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: RefCell<Vec<String>>,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), BookingError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}
