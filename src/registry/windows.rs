use std::io;

use winreg::enums::{
    HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS,
};
use winreg::{RegKey, HKEY};

use super::{join_key, KeyHandle, PropertyBag, RegistryStore, StoreError};

/// Live registry backend over the Windows API.
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        WindowsRegistry
    }
}

impl Default for WindowsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `HKLM\Sub\Key` into the hive handle and the subkey path.
fn split_hive(path: &str) -> Result<(HKEY, &str), StoreError> {
    let (hive, rest) = match path.split_once('\\') {
        Some((hive, rest)) => (hive, rest),
        None => (path, ""),
    };
    let hkey = match hive.to_ascii_uppercase().as_str() {
        "HKLM" | "HKEY_LOCAL_MACHINE" => HKEY_LOCAL_MACHINE,
        "HKCU" | "HKEY_CURRENT_USER" => HKEY_CURRENT_USER,
        "HKU" | "HKEY_USERS" => HKEY_USERS,
        "HKCR" | "HKEY_CLASSES_ROOT" => HKEY_CLASSES_ROOT,
        "HKCC" | "HKEY_CURRENT_CONFIG" => HKEY_CURRENT_CONFIG,
        other => {
            return Err(StoreError::Other {
                path: path.to_string(),
                message: format!("unknown hive '{}'", other),
            })
        }
    };
    Ok((hkey, rest))
}

fn map_io(path: &str, err: io::Error) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => StoreError::AccessDenied(path.to_string()),
        _ => StoreError::Other {
            path: path.to_string(),
            message: err.to_string(),
        },
    }
}

fn open(path: &str) -> Result<RegKey, StoreError> {
    let (hive, subkey) = split_hive(path)?;
    RegKey::predef(hive)
        .open_subkey(subkey)
        .map_err(|e| map_io(path, e))
}

impl RegistryStore for WindowsRegistry {
    fn list_children(&self, path: &str) -> Result<Vec<KeyHandle>, StoreError> {
        let key = open(path)?;
        let mut children = Vec::new();
        for name in key.enum_keys() {
            let name = name.map_err(|e| map_io(path, e))?;
            children.push(KeyHandle {
                path: join_key(path, &name),
                name,
            });
        }
        Ok(children)
    }

    fn read_properties(&self, handle: &KeyHandle) -> Result<PropertyBag, StoreError> {
        let key = open(&handle.path)?;
        let mut bag = PropertyBag::new();
        for value in key.enum_values() {
            let (name, _) = value.map_err(|e| map_io(&handle.path, e))?;
            // Only string-typed values matter here; skip the rest.
            if let Ok(text) = key.get_value::<String, _>(&name) {
                bag.insert(name, text);
            }
        }
        Ok(bag)
    }

    fn delete_recursive(&self, path: &str) -> Result<(), StoreError> {
        let (hive, subkey) = split_hive(path)?;
        RegKey::predef(hive)
            .delete_subkey_all(subkey)
            .map_err(|e| map_io(path, e))
    }

    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        match open(path) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
