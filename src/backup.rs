use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info};

use crate::registry::leaf_name;

/// Which subtree an export covered. Secondary (ProfileGuid) is always
/// exported before primary (ProfileList).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtreeKind {
    Secondary,
    Primary,
}

impl fmt::Display for SubtreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubtreeKind::Secondary => write!(f, "secondary"),
            SubtreeKind::Primary => write!(f, "primary"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("backup tool not found")]
    ToolNotFound,

    #[error("{which} backup of '{subtree}' failed: {detail}")]
    ExportFailed {
        which: SubtreeKind,
        subtree: String,
        detail: String,
    },

    #[error("backup IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result of one exporter invocation. Success is the tool's reported
/// status; the written file is never inspected.
#[derive(Debug, Clone)]
pub struct ExportRun {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub trait RegistryExporter {
    fn tool_available(&self) -> bool;
    fn export(&self, subtree: &str, dest: &Path) -> io::Result<ExportRun>;
}

/// Files written by a successful backup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupManifest {
    pub secondary_file: PathBuf,
    pub primary_file: PathBuf,
}

/// Export both subtrees before any deletion. Secondary first; a failed
/// secondary export means the primary export never runs, and any failure
/// aborts the run before mutation.
pub fn ensure_backup(
    exporter: &dyn RegistryExporter,
    guid_path: &str,
    list_path: &str,
    dest_dir: &Path,
) -> Result<BackupManifest, BackupError> {
    if !exporter.tool_available() {
        return Err(BackupError::ToolNotFound);
    }
    fs::create_dir_all(dest_dir)?;
    let stamp = Local::now().format("%Y%m%d-%H%M").to_string();
    let secondary_file = run_export(exporter, SubtreeKind::Secondary, guid_path, dest_dir, &stamp)?;
    let primary_file = run_export(exporter, SubtreeKind::Primary, list_path, dest_dir, &stamp)?;
    Ok(BackupManifest {
        secondary_file,
        primary_file,
    })
}

fn run_export(
    exporter: &dyn RegistryExporter,
    which: SubtreeKind,
    subtree: &str,
    dest_dir: &Path,
    stamp: &str,
) -> Result<PathBuf, BackupError> {
    let file = dest_dir.join(format!(
        "profile-sweep-{}-BEFORE-{}.reg",
        leaf_name(subtree),
        stamp
    ));
    info!("Exporting {} subtree '{}' to {}", which, subtree, file.display());
    let run = exporter.export(subtree, &file)?;
    if !run.success {
        let detail = if run.stderr.trim().is_empty() {
            run.stdout.trim().to_string()
        } else {
            run.stderr.trim().to_string()
        };
        return Err(BackupError::ExportFailed {
            which,
            subtree: subtree.to_string(),
            detail,
        });
    }
    debug!("{} export completed", which);
    Ok(file)
}

/// Exports with `reg.exe export <subtree> <file> /y`.
pub struct RegExeExporter {
    tool: PathBuf,
}

impl RegExeExporter {
    pub fn new() -> Self {
        let system_root = std::env::var_os("SystemRoot")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
        Self {
            tool: system_root.join("System32").join("reg.exe"),
        }
    }
}

impl Default for RegExeExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExporter for RegExeExporter {
    fn tool_available(&self) -> bool {
        self.tool.is_file()
    }

    fn export(&self, subtree: &str, dest: &Path) -> io::Result<ExportRun> {
        let mut command = Command::new(&self.tool);
        command.arg("export").arg(subtree).arg(dest).arg("/y");
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            // no console window flash
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }
        let output = command.output()?;
        Ok(ExportRun {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
