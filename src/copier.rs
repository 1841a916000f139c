use filetime::{self, FileTime};
use std::fs;
use std::path::{Path, PathBuf};

use context::CopyContext;
use error::*;
use mapping::{FolderMapping, MappingTables};
use report::{CopyEvent, CopyReporter};

/// Outcome of one folder pair whose source folder existed.
#[derive(Clone, Debug, PartialEq)]
pub struct CopyResult {
    pub source_folder: String,
    pub dest_folder: String,
    pub copied: usize,
    pub unmapped: Vec<String>,
}

pub struct Copier<'a> {
    tables: &'a MappingTables,
}

impl<'a> Copier<'a> {
    pub fn new(tables: &'a MappingTables) -> Copier<'a> {
        Copier { tables }
    }

    /// Processes every folder pair in order. Missing folders and unmapped
    /// files are reported and skipped; any I/O failure stops the run.
    pub fn copy_all(&self, file_context: &CopyContext, reporter: &mut dyn CopyReporter) -> Result<Vec<CopyResult>> {
        reporter.report(CopyEvent::Started { folder_count: self.tables.folders().len() });

        let mut results = Vec::new();
        for folder in self.tables.folders() {
            if let Some(result) = self.copy_folder(folder, file_context, reporter)? {
                results.push(result);
            }
        }

        let copied = results.iter().map(|result| result.copied).sum();
        reporter.report(CopyEvent::AllDone { copied });
        Ok(results)
    }

    fn copy_folder(
        &self,
        folder: &FolderMapping,
        file_context: &CopyContext,
        reporter: &mut dyn CopyReporter,
    ) -> Result<Option<CopyResult>> {
        reporter.report(CopyEvent::FolderStarted {
            source: folder.source.clone(),
            destination: folder.destination.clone(),
        });

        let source_folder = file_context.source_dir.join(&folder.source);
        if !source_folder.is_dir() {
            reporter.report(CopyEvent::FolderMissing { path: source_folder });
            return Ok(None);
        }

        let dest_folder = file_context.dest_dir.join(&folder.destination);
        let already_existed = create_output_directory(&dest_folder, file_context.dry_run)?;
        reporter.report(CopyEvent::FolderCreated { path: dest_folder.clone(), already_existed });

        let mut result = CopyResult {
            source_folder: folder.source.clone(),
            dest_folder: folder.destination.clone(),
            copied: 0,
            unmapped: Vec::new(),
        };
        for file_path in get_file_paths(&source_folder)? {
            let file_name = match file_path.file_name() {
                Some(name) => name,
                None => bail!("Internal failure: File {} does not have a file name. This is a bug.",
                              file_path.to_string_lossy())
            };
            let mapped_name = file_name.to_str().and_then(|name| self.tables.destination_file_name(name));
            match mapped_name {
                Some(mapped_name) => {
                    copy_file(&file_path, &dest_folder.join(mapped_name), file_context.dry_run)?;
                    result.copied += 1;
                    reporter.report(CopyEvent::FileCopied {
                        source: file_name.to_string_lossy().into_owned(),
                        destination: mapped_name.to_string(),
                    });
                }
                None => {
                    let name = file_name.to_string_lossy().into_owned();
                    result.unmapped.push(name.clone());
                    reporter.report(CopyEvent::FileUnmapped { name });
                }
            }
        }

        reporter.report(CopyEvent::FolderDone {
            destination: folder.destination.clone(),
            copied: result.copied,
        });
        Ok(Some(result))
    }
}

/// Returns whether the directory was already present.
fn create_output_directory(destination_directory: &Path, dry_run: bool) -> Result<bool> {
    if destination_directory.is_dir() {
        return Ok(true);
    }
    debug!("Creating destination directory: {}", destination_directory.to_string_lossy());
    if !dry_run {
        fs::create_dir_all(destination_directory)
            .chain_err(|| format!("Unable to create destination directory: {}",
                                  destination_directory.to_string_lossy()))?
    }

    Ok(false)
}

/// Copies content and permissions, then carries the access and modification
/// times over to the copy. Existing files are overwritten.
fn copy_file(file: &Path, destination: &Path, dry_run: bool) -> Result<()> {
    debug!("Copying {} -> {}", file.to_string_lossy(), destination.to_string_lossy());
    if dry_run {
        return Ok(());
    }

    // Read before copying, since the copy itself may bump the access time
    let metadata = fs::metadata(file)
        .chain_err(|| format!("Unable to read metadata of {}", file.to_string_lossy()))?;
    fs::copy(file, destination)
        .chain_err(|| format!("Unable to copy file {} to destination {}", file.to_string_lossy(),
                              destination.to_string_lossy()))?;
    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .chain_err(|| format!("Unable to set file times of {}", destination.to_string_lossy()))?;

    Ok(())
}

fn get_file_paths(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(directory).chain_err(|| {
        format!(
            "Unable to read entries of directory {}",
            directory.to_string_lossy()
        )
    })? {
        let dir_entry = entry.chain_err(|| {
            format!(
                "Unable to read entry of directory {}",
                directory.to_string_lossy()
            )
        })?;
        let file_path = dir_entry.path();
        if file_path.is_file() {
            trace!("Regular file: {}", file_path.to_string_lossy());
            file_paths.push(file_path);
        } else {
            trace!("Not a file: {}", file_path.to_string_lossy());
        }
    }

    Ok(file_paths)
}
