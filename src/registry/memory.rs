use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{leaf_name, KeyHandle, PropertyBag, RegistryStore, StoreError};

/// In-memory store backend.
///
/// Paths compare case-insensitively like the live registry, and children
/// enumerate in case-folded lexicographic order, stable across runs. Every
/// `delete_recursive` call is logged, attempts included, so tests can assert
/// exactly which deletions were tried.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Case-folded path → entry.
    keys: BTreeMap<String, Entry>,
    fail_deletes: Vec<String>,
    delete_log: Vec<String>,
}

struct Entry {
    /// Path in its inserted casing.
    path: String,
    values: PropertyBag,
}

fn fold(path: &str) -> String {
    path.to_ascii_lowercase()
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key with the given string values, replacing any entry
    /// already at that path.
    pub fn add_key(&self, path: &str, values: &[(&str, &str)]) {
        let mut inner = self.inner.lock().unwrap();
        let values = values
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        inner.keys.insert(
            fold(path),
            Entry {
                path: path.to_string(),
                values,
            },
        );
    }

    /// Make every later `delete_recursive` of `path` fail with
    /// `AccessDenied`, leaving the key in place.
    pub fn fail_delete_on(&self, path: &str) {
        self.inner.lock().unwrap().fail_deletes.push(fold(path));
    }

    /// Paths passed to `delete_recursive` so far, in call order.
    pub fn delete_log(&self) -> Vec<String> {
        self.inner.lock().unwrap().delete_log.clone()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.lock().unwrap().keys.contains_key(&fold(path))
    }

    pub fn key_count(&self) -> usize {
        self.inner.lock().unwrap().keys.len()
    }
}

impl RegistryStore for InMemoryStore {
    fn list_children(&self, path: &str) -> Result<Vec<KeyHandle>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let base = fold(path);
        if !inner.keys.contains_key(&base) {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let prefix = format!("{}\\", base);
        let children = inner
            .keys
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('\\'))
            .map(|(_, entry)| KeyHandle {
                path: entry.path.clone(),
                name: leaf_name(&entry.path).to_string(),
            })
            .collect();
        Ok(children)
    }

    fn read_properties(&self, handle: &KeyHandle) -> Result<PropertyBag, StoreError> {
        let inner = self.inner.lock().unwrap();
        match inner.keys.get(&fold(&handle.path)) {
            Some(entry) => Ok(entry.values.clone()),
            None => Err(StoreError::NotFound(handle.path.clone())),
        }
    }

    fn delete_recursive(&self, path: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let target = fold(path);
        inner.delete_log.push(path.to_string());

        if inner.fail_deletes.contains(&target) {
            return Err(StoreError::AccessDenied(path.to_string()));
        }

        let prefix = format!("{}\\", target);
        let doomed: Vec<String> = inner
            .keys
            .keys()
            .filter(|key| **key == target || key.starts_with(&prefix))
            .cloned()
            .collect();
        if doomed.is_empty() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        for key in doomed {
            inner.keys.remove(&key);
        }
        Ok(())
    }

    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().keys.contains_key(&fold(path)))
    }
}
