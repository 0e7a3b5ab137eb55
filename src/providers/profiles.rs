//! Known-profile store backed by a defensively-opened file
//!
//! The profile table lives in a root-owned JSON file. The file is read at
//! most once per process and cached immutably; it is never written back.
//! Any failed access check silently yields an empty table.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::models::ProfileRecord;
use crate::providers::KnownProfileStore;

/// Owner uid required for the production profile table.
const REQUIRED_OWNER_UID: u32 = 0;

/// Lazily-loaded, read-only view of the persisted profile table.
pub struct KnownProfileFile {
    path: PathBuf,
    required_owner: u32,
    cache: OnceCell<Vec<ProfileRecord>>,
}

impl KnownProfileFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            required_owner: REQUIRED_OWNER_UID,
            cache: OnceCell::new(),
        }
    }

    /// Overrides the required owner uid. Intended for deployments where the
    /// table is owned by a dedicated service account rather than root.
    pub fn with_required_owner(mut self, uid: u32) -> Self {
        self.required_owner = uid;
        self
    }

    /// Default location of the profile table.
    pub fn default_path() -> PathBuf {
        PathBuf::from("/var/lib/wlanstat/profiles.json")
    }
}

impl KnownProfileStore for KnownProfileFile {
    fn profiles(&self) -> &[ProfileRecord] {
        self.cache
            .get_or_init(|| load_profile_table(&self.path, self.required_owner).unwrap_or_default())
    }
}

/// Reads and parses the profile table behind the access gate.
///
/// Returns `None` (source skipped, no error surfaced) unless the path is a
/// regular non-symlink file owned by `required_owner`. Transiently elevated
/// privilege is dropped right after the raw read, before parsing.
fn load_profile_table(path: &Path, required_owner: u32) -> Option<Vec<ProfileRecord>> {
    let meta = std::fs::symlink_metadata(path).ok()?;
    if meta.file_type().is_symlink() {
        tracing::debug!("profile store {} is a symlink; skipping", path.display());
        return None;
    }
    if !meta.is_file() {
        tracing::debug!("profile store {} is not a regular file; skipping", path.display());
        return None;
    }
    if !owner_matches(&meta, required_owner) {
        tracing::debug!("profile store {} has wrong owner; skipping", path.display());
        return None;
    }

    let raw = std::fs::read(path);
    drop_elevated_privileges();
    let raw = raw.ok()?;

    match serde_json::from_slice::<Vec<ProfileRecord>>(&raw) {
        Ok(records) => {
            tracing::debug!(
                "loaded {} known-network profile(s) from {}",
                records.len(),
                path.display()
            );
            Some(records)
        }
        Err(e) => {
            tracing::debug!("profile store {} failed to parse: {}", path.display(), e);
            None
        }
    }
}

#[cfg(unix)]
fn owner_matches(meta: &std::fs::Metadata, required_owner: u32) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.uid() == required_owner
}

#[cfg(not(unix))]
fn owner_matches(_meta: &std::fs::Metadata, _required_owner: u32) -> bool {
    false
}

/// Drops a transiently elevated effective uid back to the real uid. No-op
/// when the process was not elevated.
#[cfg(unix)]
fn drop_elevated_privileges() {
    let real_uid = unsafe { libc::getuid() };
    let effective_uid = unsafe { libc::geteuid() };
    if effective_uid != real_uid {
        let rc = unsafe { libc::seteuid(real_uid) };
        if rc != 0 {
            tracing::warn!("failed to drop effective uid back to {}", real_uid);
        }
    }
}

#[cfg(not(unix))]
fn drop_elevated_privileges() {}
