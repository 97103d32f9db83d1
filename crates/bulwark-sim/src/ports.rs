//! Persistence port for the player profile.
//!
//! The engine only ever reads or writes the whole profile blob. Concrete
//! stores live outside the core; `MemoryProfileStore` backs tests and
//! headless runs.

use std::sync::{Arc, Mutex};

use bulwark_core::profile::Profile;

/// Storage collaborator for the persisted profile blob.
pub trait ProfileStore: Send {
    /// Raw blob, or `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>, String>;

    fn save(&mut self, blob: &str) -> Result<(), String>;
}

/// Load the profile, substituting a default when it is missing or malformed.
pub fn load_profile_or_default(store: &dyn ProfileStore) -> Profile {
    match store.load() {
        Ok(Some(blob)) => Profile::from_json(&blob).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored profile is malformed, using defaults");
            Profile::default()
        }),
        Ok(None) => Profile::default(),
        Err(e) => {
            tracing::warn!(error = %e, "profile store unreadable, using defaults");
            Profile::default()
        }
    }
}

pub fn save_profile(store: &mut dyn ProfileStore, profile: &Profile) -> Result<(), String> {
    let blob = profile.to_json()?;
    store.save(&blob)
}

/// In-memory store. Clones share the same slot, so a test can keep a
/// handle after moving one into the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    pub fn with_profile(profile: &Profile) -> Result<Self, String> {
        Ok(Self::with_blob(profile.to_json()?))
    }

    /// Current stored blob.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Current stored blob parsed as a profile.
    pub fn profile(&self) -> Option<Profile> {
        self.contents().and_then(|blob| Profile::from_json(&blob).ok())
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<String>, String> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| "profile slot poisoned".to_string())
    }

    fn save(&mut self, blob: &str) -> Result<(), String> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| "profile slot poisoned".to_string())?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}
