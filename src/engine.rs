use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::analysis::{group_by_image_path, select_removable, EligibilityPolicy};
use crate::backup::{self, BackupManifest, RegistryExporter};
use crate::config::AppConfig;
use crate::deletion::{self, DeletionOutcome};
use crate::error::Error;
use crate::profiles;
use crate::registry::RegistryStore;

pub struct SweepEngine<'a> {
    config: AppConfig,
    store: &'a dyn RegistryStore,
    exporter: &'a dyn RegistryExporter,
}

#[derive(Debug, Default)]
pub struct SweepResult {
    pub read_duration: Duration,
    pub analyze_duration: Duration,
    pub backup_duration: Duration,
    pub delete_duration: Duration,
    pub entries_seen: usize,
    pub duplicate_groups: usize,
    pub removal_candidates: usize,
    pub removed: usize,
    pub secondary_removed: usize,
    pub failed: usize,
    pub backup: Option<BackupManifest>,
    pub outcomes: Vec<DeletionOutcome>,
}

impl<'a> SweepEngine<'a> {
    pub fn new(
        config: AppConfig,
        store: &'a dyn RegistryStore,
        exporter: &'a dyn RegistryExporter,
    ) -> Self {
        Self {
            config,
            store,
            exporter,
        }
    }

    /// Run the full sweep pipeline:
    /// 1. Read standard-user profile registrations
    /// 2. Group by profile path, select entries outside the desired prefix
    /// 3. Export both subtrees (all-or-nothing gate)
    /// 4. Delete each selected entry plus its correlated Guid key
    pub fn run(&self, desired_prefix: &str) -> Result<SweepResult, Error> {
        if desired_prefix.is_empty() {
            return Err(Error::Other(
                "desired identity prefix must not be empty".to_string(),
            ));
        }
        let policy = EligibilityPolicy::new(desired_prefix)?;

        // Phase 1: Read
        info!(
            "Reading profile registrations from '{}'...",
            self.config.profile_list_path
        );
        let read_start = Instant::now();
        let entries = profiles::load_entries(self.store, &self.config.profile_list_path)?;
        let read_duration = read_start.elapsed();
        debug!(
            "Read completed in {:.2}s, {} entries",
            read_duration.as_secs_f64(),
            entries.len(),
        );

        // Phase 2: Group and filter
        let analyze_start = Instant::now();
        let groups = group_by_image_path(&entries);
        let removable = select_removable(&groups, &policy);
        let analyze_duration = analyze_start.elapsed();
        info!(
            "{} duplicate path groups, {} entries outside prefix '{}'",
            groups.len(),
            removable.len(),
            desired_prefix,
        );

        if removable.is_empty() {
            info!("Nothing to remove; no backup taken");
            return Ok(SweepResult {
                read_duration,
                analyze_duration,
                entries_seen: entries.len(),
                duplicate_groups: groups.len(),
                ..SweepResult::default()
            });
        }

        // Phase 3: Backup gate
        info!("Backing up both subtrees before deletion...");
        let backup_start = Instant::now();
        let manifest = backup::ensure_backup(
            self.exporter,
            &self.config.profile_guid_path,
            &self.config.profile_list_path,
            &self.config.backup_destination(),
        )?;
        let backup_duration = backup_start.elapsed();
        debug!(
            "Backup completed in {:.2}s: '{}', '{}'",
            backup_duration.as_secs_f64(),
            manifest.secondary_file.display(),
            manifest.primary_file.display(),
        );

        // Phase 4: Delete
        let removal_candidates = removable.len();
        info!("Removing {} duplicate registrations...", removal_candidates);
        let delete_start = Instant::now();
        let outcomes =
            deletion::remove_all(self.store, removable, &self.config.profile_guid_path);
        let delete_duration = delete_start.elapsed();

        let mut removed = 0usize;
        let mut secondary_removed = 0usize;
        let mut failed = 0usize;
        for outcome in &outcomes {
            match outcome {
                DeletionOutcome::Removed {
                    secondary_removed: with_secondary,
                    ..
                } => {
                    removed += 1;
                    if *with_secondary {
                        secondary_removed += 1;
                    }
                }
                DeletionOutcome::Failed { .. } => failed += 1,
            }
        }
        debug!(
            "Deletion completed in {:.2}s, {} removed, {} failed",
            delete_duration.as_secs_f64(),
            removed,
            failed,
        );

        Ok(SweepResult {
            read_duration,
            analyze_duration,
            backup_duration,
            delete_duration,
            entries_seen: entries.len(),
            duplicate_groups: groups.len(),
            removal_candidates,
            removed,
            secondary_removed,
            failed,
            backup: Some(manifest),
            outcomes,
        })
    }
}
