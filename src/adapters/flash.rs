//! Flash filesystem adapter.
//!
//! Implements [`StoragePort`] on top of `std::fs`.  Storage paths such as
//! `/settings/sen/probe.json` are resolved below a mount root, so the same
//! adapter serves the on-device FAT partition and a scratch directory on
//! the host.
//!
//! On ESP-IDF, [`mount`] registers the wear-levelled FAT partition with the
//! VFS.  Long config file names need `CONFIG_FATFS_LFN_HEAP=y` in sdkconfig.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
#[cfg(target_os = "espidf")]
use log::info;

use crate::ports::{StorageError, StoragePort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Mount point of the settings partition on the device.
pub const MOUNT_POINT: &str = "/flash";
#[cfg(target_os = "espidf")]
const PARTITION_LABEL: &[u8] = b"storage\0";
#[cfg(target_os = "espidf")]
const MOUNT_POINT_C: &[u8] = b"/flash\0";

/// Mount the `storage` FAT partition at [`MOUNT_POINT`], formatting it on
/// first boot.
#[cfg(target_os = "espidf")]
pub fn mount() -> Result<(), StorageError> {
    let cfg = esp_vfs_fat_mount_config_t {
        format_if_mount_failed: true,
        max_files: 4,
        allocation_unit_size: 4096,
        ..Default::default()
    };
    let mut wl_handle: wl_handle_t = 0;
    // SAFETY: called once from main before any file access; both strings
    // are NUL-terminated statics.
    let ret = unsafe {
        esp_vfs_fat_spiflash_mount_rw_wl(
            MOUNT_POINT_C.as_ptr() as *const _,
            PARTITION_LABEL.as_ptr() as *const _,
            &cfg,
            &mut wl_handle,
        )
    };
    if ret != ESP_OK as i32 {
        warn!("FlashStorage: FAT mount failed (rc={})", ret);
        return Err(StorageError::IoError);
    }
    info!("FlashStorage: FAT partition mounted at {}", MOUNT_POINT);
    Ok(())
}

/// [`StoragePort`] rooted at a directory.
pub struct FlashStorage {
    root: PathBuf,
}

impl FlashStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

fn map_io_error(e: &std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        ErrorKind::StorageFull => StorageError::Full,
        _ => StorageError::IoError,
    }
}

impl StoragePort for FlashStorage {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        std::fs::read(self.resolve(path)).map_err(|e| map_io_error(&e))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path);
        if let Some(dir) = full.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                warn!("FlashStorage: mkdir {} failed: {}", dir.display(), e);
                map_io_error(&e)
            })?;
        }
        std::fs::write(&full, data).map_err(|e| {
            warn!("FlashStorage: write {} failed: {}", full.display(), e);
            map_io_error(&e)
        })
    }
}
