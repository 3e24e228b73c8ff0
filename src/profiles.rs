use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::registry::{KeyHandle, PropertyBag, RegistryStore, StoreError};

/// Registry value naming the on-disk profile directory.
pub const IMAGE_PATH_VALUE: &str = "ProfileImagePath";
/// Registry value correlating a profile to its ProfileGuid key.
pub const GUID_VALUE: &str = "Guid";

lazy_static! {
    // Standard domain-user SID: S-1-5-21 plus one or more numeric segments.
    static ref STANDARD_USER_SID: Regex = Regex::new(r"(?i)^S-1-5-21(-\d+)+$").unwrap();
}

/// True when `name` has the shape of a standard domain-user SID. Service
/// accounts (S-1-5-18 and friends), `.DEFAULT`, and `.bak` leftovers do
/// not match.
pub fn is_standard_user_identity(name: &str) -> bool {
    STANDARD_USER_SID.is_match(name)
}

/// One profile registration read from the ProfileList subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    /// Key name, e.g. `S-1-5-21-…-1001`.
    pub identity: String,
    pub image_path: String,
    /// `Guid` value; an empty string reads as `None`.
    pub correlation_id: Option<String>,
    pub location: KeyHandle,
}

/// Read every standard-user profile registration under `list_path`.
///
/// Keys whose name is not a standard-user SID are ignored entirely. Keys
/// without a `ProfileImagePath` value cannot be grouped by path and are
/// skipped with a warning.
pub fn load_entries(
    store: &dyn RegistryStore,
    list_path: &str,
) -> Result<Vec<ProfileEntry>, StoreError> {
    let children = store.list_children(list_path)?;
    let mut entries = Vec::with_capacity(children.len());
    for child in children {
        if !is_standard_user_identity(&child.name) {
            debug!("ignoring non-user key '{}'", child.name);
            continue;
        }
        let props = store.read_properties(&child)?;
        let image_path = match non_empty(&props, IMAGE_PATH_VALUE) {
            Some(path) => path,
            None => {
                warn!("skipping '{}': no {} value", child.path, IMAGE_PATH_VALUE);
                continue;
            }
        };
        let correlation_id = non_empty(&props, GUID_VALUE);
        entries.push(ProfileEntry {
            identity: child.name.clone(),
            image_path,
            correlation_id,
            location: child,
        });
    }
    Ok(entries)
}

fn non_empty(props: &PropertyBag, name: &str) -> Option<String> {
    props.get(name).filter(|value| !value.is_empty()).cloned()
}
