use indexmap::IndexMap;

use crate::profiles::ProfileEntry;

/// Entries sharing one `ProfileImagePath` value. Built and discarded within
/// a single run.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// First-seen casing of the shared path.
    pub image_path: String,
    pub entries: Vec<ProfileEntry>,
}

/// Group entries by `ProfileImagePath`, compared case-insensitively, and
/// keep only paths registered two or more times. Group order and member
/// order follow the input order.
pub fn group_by_image_path(entries: &[ProfileEntry]) -> Vec<DuplicateGroup> {
    let mut groups: IndexMap<String, DuplicateGroup> = IndexMap::new();
    for entry in entries {
        groups
            .entry(entry.image_path.to_lowercase())
            .or_insert_with(|| DuplicateGroup {
                image_path: entry.image_path.clone(),
                entries: Vec::new(),
            })
            .entries
            .push(entry.clone());
    }
    groups
        .into_values()
        .filter(|group| group.entries.len() >= 2)
        .collect()
}
