//! Persisted user preferences. Only the onboarding flag exists today.

use crate::CatalogError;

pub const ONBOARDED_KEY: &str = "hasOnboarded";

pub trait PreferenceStore {
    fn has_onboarded(&self) -> Result<bool, CatalogError>;
    fn set_onboarded(&mut self, value: bool) -> Result<(), CatalogError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    onboarded: bool,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn has_onboarded(&self) -> Result<bool, CatalogError> {
        Ok(self.onboarded)
    }

    fn set_onboarded(&mut self, value: bool) -> Result<(), CatalogError> {
        self.onboarded = value;
        Ok(())
    }
}

/// Stored values are the strings `"true"`/`"false"`; anything else reads as
/// not onboarded.
fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim) == Some("true")
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{ONBOARDED_KEY, PreferenceStore, parse_flag};
    use crate::CatalogError;

    #[derive(Debug)]
    pub struct LocalStoragePreferenceStore {
        storage: web_sys::Storage,
    }

    impl LocalStoragePreferenceStore {
        pub fn new() -> Result<Self, CatalogError> {
            Ok(Self {
                storage: window_local_storage()?,
            })
        }
    }

    impl PreferenceStore for LocalStoragePreferenceStore {
        fn has_onboarded(&self) -> Result<bool, CatalogError> {
            let raw = self
                .storage
                .get_item(ONBOARDED_KEY)
                .map_err(|e| CatalogError::Io(format!("get_item({ONBOARDED_KEY}) failed: {:?}", e)))?;
            Ok(parse_flag(raw.as_deref()))
        }

        fn set_onboarded(&mut self, value: bool) -> Result<(), CatalogError> {
            self.storage
                .set_item(ONBOARDED_KEY, if value { "true" } else { "false" })
                .map_err(|e| CatalogError::Io(format!("set_item({ONBOARDED_KEY}) failed: {:?}", e)))
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, CatalogError> {
        let win = web_sys::window().ok_or(CatalogError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| CatalogError::Io(format!("localStorage error: {:?}", e)))?
            .ok_or(CatalogError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePreferenceStore {
    pub fn new() -> Result<Self, CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for LocalStoragePreferenceStore {
    fn has_onboarded(&self) -> Result<bool, CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }

    fn set_onboarded(&mut self, _value: bool) -> Result<(), CatalogError> {
        Err(CatalogError::StorageUnavailable)
    }
}
