use regex::{Regex, RegexBuilder};

use super::duplicates::DuplicateGroup;
use crate::profiles::ProfileEntry;

/// Decides which duplicate-group members survive a sweep.
///
/// An identity is protected when it reads `<prefix>-<digits>` with one or
/// more numeric segments after the desired prefix. The prefix matches
/// literally, so regex metacharacters in it carry no special meaning.
pub struct EligibilityPolicy {
    protected: Regex,
}

impl EligibilityPolicy {
    pub fn new(desired_prefix: &str) -> Result<Self, regex::Error> {
        let pattern = format!(r"^{}(-\d+)+$", regex::escape(desired_prefix));
        let protected = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self { protected })
    }

    /// An identity exactly equal to the prefix, with no `-<digits>` suffix,
    /// is NOT protected.
    pub fn protects(&self, identity: &str) -> bool {
        self.protected.is_match(identity)
    }
}

/// Flatten the groups and keep every member the policy does not protect.
/// The result only ever contains entries that already shared their path
/// with another entry.
pub fn select_removable(
    groups: &[DuplicateGroup],
    policy: &EligibilityPolicy,
) -> Vec<ProfileEntry> {
    groups
        .iter()
        .flat_map(|group| group.entries.iter())
        .filter(|entry| !policy.protects(&entry.identity))
        .cloned()
        .collect()
}
