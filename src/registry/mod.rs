use std::collections::HashMap;

use thiserror::Error;

pub mod memory;
#[cfg(windows)]
pub mod windows;

/// Handle to one key in the configuration store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHandle {
    /// Full path of the key, hive prefix included.
    pub path: String,
    /// Leaf name of the key.
    pub name: String,
}

impl KeyHandle {
    pub fn from_path(path: &str) -> Self {
        KeyHandle {
            path: path.to_string(),
            name: leaf_name(path).to_string(),
        }
    }
}

/// String-typed values of one key. Values of other types play no part in
/// this workflow and are omitted by implementations.
pub type PropertyBag = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("store error at '{path}': {message}")]
    Other { path: String, message: String },
}

/// Read and delete access to a hierarchical key-value store, addressed by
/// backslash-separated paths carrying a hive prefix (`HKLM\...`).
///
/// The live implementation is the Windows registry; tests run against
/// [`memory::InMemoryStore`].
pub trait RegistryStore {
    /// Enumerate the direct child keys of `path`.
    fn list_children(&self, path: &str) -> Result<Vec<KeyHandle>, StoreError>;
    /// Read the string-typed values of the key behind `handle`.
    fn read_properties(&self, handle: &KeyHandle) -> Result<PropertyBag, StoreError>;
    /// Delete the key at `path` and everything beneath it.
    fn delete_recursive(&self, path: &str) -> Result<(), StoreError>;
    fn exists(&self, path: &str) -> Result<bool, StoreError>;
}

pub fn join_key(base: &str, child: &str) -> String {
    format!("{}\\{}", base.trim_end_matches('\\'), child)
}

pub fn leaf_name(path: &str) -> &str {
    path.trim_end_matches('\\')
        .rsplit('\\')
        .next()
        .unwrap_or(path)
}
