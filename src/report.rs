use std::path::{Path, PathBuf};

/// Progress of a copy run, in the order the copier produces it.
#[derive(Clone, Debug, PartialEq)]
pub enum CopyEvent {
    Started { folder_count: usize },
    FolderStarted { source: String, destination: String },
    FolderMissing { path: PathBuf },
    FolderCreated { path: PathBuf, already_existed: bool },
    FileCopied { source: String, destination: String },
    FileUnmapped { name: String },
    FolderDone { destination: String, copied: usize },
    AllDone { copied: usize },
}

pub trait CopyReporter {
    fn report(&mut self, event: CopyEvent);
}

/// Renders events as console log lines.
pub struct LogReporter;

impl CopyReporter for LogReporter {
    fn report(&mut self, event: CopyEvent) {
        match event {
            CopyEvent::Started { folder_count } => {
                info!("Starting copy of {} folder(s)", folder_count)
            }
            CopyEvent::FolderStarted { source, destination } => {
                info!("");
                info!("Processing: {} -> {}", source, destination)
            }
            CopyEvent::FolderMissing { path } => {
                warn!("  Warning: source folder not found: {}", path.to_string_lossy())
            }
            CopyEvent::FolderCreated { path, already_existed } => {
                info!("  {}", destination_folder_line(&path, already_existed))
            }
            CopyEvent::FileCopied { source, destination } => {
                info!("  [OK] {} -> {}", source, destination)
            }
            CopyEvent::FileUnmapped { name } => {
                warn!("  Warning: no mapping found for: {}", name)
            }
            CopyEvent::FolderDone { destination, copied } => {
                info!("  Done: copied {} file(s) into {}", copied, destination)
            }
            CopyEvent::AllDone { copied } => {
                info!("");
                info!("All folders processed, {} file(s) copied", copied)
            }
        }
    }
}

// Dry runs report new folders without creating them, so the wording only
// says whether the folder was there before.
fn destination_folder_line(path: &Path, already_existed: bool) -> String {
    let state = if already_existed { "existing" } else { "new" };
    format!("Destination folder: {} ({})", path.to_string_lossy(), state)
}
