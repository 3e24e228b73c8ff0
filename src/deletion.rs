use tracing::{debug, error, info};

use crate::profiles::ProfileEntry;
use crate::registry::{join_key, RegistryStore, StoreError};

#[derive(Debug)]
pub enum DeletionOutcome {
    Removed {
        entry: ProfileEntry,
        secondary_removed: bool,
    },
    Failed {
        entry: ProfileEntry,
        cause: StoreError,
    },
}

/// Delete each entry's ProfileList key, then its correlated ProfileGuid key
/// when one exists. An error on either step turns into a `Failed` outcome
/// for that entry and the batch moves on; nothing is retried or rolled
/// back.
pub fn remove_all(
    store: &dyn RegistryStore,
    entries: Vec<ProfileEntry>,
    guid_root: &str,
) -> Vec<DeletionOutcome> {
    let mut outcomes = Vec::with_capacity(entries.len());
    for entry in entries {
        match remove_one(store, &entry, guid_root) {
            Ok(secondary_removed) => {
                info!(
                    "removed '{}' (secondary removed: {})",
                    entry.location.path, secondary_removed
                );
                outcomes.push(DeletionOutcome::Removed {
                    entry,
                    secondary_removed,
                });
            }
            Err(cause) => {
                error!(
                    "failed to remove '{}' (guid {:?}): {}",
                    entry.location.path, entry.correlation_id, cause
                );
                outcomes.push(DeletionOutcome::Failed { entry, cause });
            }
        }
    }
    outcomes
}

fn remove_one(
    store: &dyn RegistryStore,
    entry: &ProfileEntry,
    guid_root: &str,
) -> Result<bool, StoreError> {
    store.delete_recursive(&entry.location.path)?;
    let correlation_id = match entry.correlation_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(false),
    };
    let secondary = join_key(guid_root, correlation_id);
    // Existence is re-checked here, not trusted from detection time
    if store.exists(&secondary)? {
        store.delete_recursive(&secondary)?;
        debug!("removed secondary '{}'", secondary);
        Ok(true)
    } else {
        debug!("no secondary key at '{}'", secondary);
        Ok(false)
    }
}
