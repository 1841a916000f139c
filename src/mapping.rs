use std::collections::HashMap;
use std::path::{Component, Path};

use error::*;

const BUILTIN_FOLDERS: &[(&str, &str)] = &[
    ("コン太", "konta"),
    ("たぬねぇ", "tanu-nee"),
    ("りんく", "rinku"),
];

const BUILTIN_FILES: &[(&str, &str)] = &[
    ("きつねー口ー閉じ.png", "kitsune-mouth-closed.png"),
    ("きつねー口ー開き.png", "kitsune-mouth-open.png"),
    ("きつねー目ーまばたき.png", "kitsune-eyes-blink.png"),
    ("きつねー目ーニコニコ.png", "kitsune-eyes-smile.png"),
    ("きつねー目ー半目.png", "kitsune-eyes-half.png"),
    ("きつねー目ー通常.png", "kitsune-eyes-normal.png"),
    ("きつねー顔.png", "kitsune-face.png"),
    ("たぬきー口ー閉じ.png", "tanuki-mouth-closed.png"),
    ("たぬきー口ー開き.png", "tanuki-mouth-open.png"),
    ("たぬきー目ーまばたき.png", "tanuki-eyes-blink.png"),
    ("たぬきー目ーニコニコ.png", "tanuki-eyes-smile.png"),
    ("たぬきー目ー半目.png", "tanuki-eyes-half.png"),
    ("たぬきー目ー通常.png", "tanuki-eyes-normal.png"),
    ("たぬきー顔.png", "tanuki-face.png"),
    ("りんくー口ー閉じ.png", "rinku-mouth-closed.png"),
    ("りんくー口ー開き.png", "rinku-mouth-open.png"),
    ("りんくー目ーまばたき.png", "rinku-eyes-blink.png"),
    ("りんくー目ーニコニコ.png", "rinku-eyes-smile.png"),
    ("りんくー目ー半目.png", "rinku-eyes-half.png"),
    ("りんくー目ー通常.png", "rinku-eyes-normal.png"),
    ("りんくー顔.png", "rinku-face.png"),
];

/// A source folder name and the destination folder it is copied into.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderMapping {
    pub source: String,
    pub destination: String,
}

impl FolderMapping {
    pub fn new<S: Into<String>, D: Into<String>>(source: S, destination: D) -> FolderMapping {
        FolderMapping { source: source.into(), destination: destination.into() }
    }
}

/// Folder pairs in processing order, plus the file name table that doubles
/// as the allow-list of files eligible for copying.
#[derive(Clone, Debug, Default)]
pub struct MappingTables {
    folders: Vec<FolderMapping>,
    files: HashMap<String, String>,
}

impl MappingTables {
    pub fn new() -> MappingTables {
        MappingTables::default()
    }

    pub fn builtin() -> MappingTables {
        MappingTables {
            folders: BUILTIN_FOLDERS
                .iter()
                .map(|&(source, destination)| FolderMapping::new(source, destination))
                .collect(),
            files: BUILTIN_FILES
                .iter()
                .map(|&(source, destination)| (source.to_string(), destination.to_string()))
                .collect(),
        }
    }

    pub fn add_folder(&mut self, folder: FolderMapping) {
        debug!("Folder mapping: {} -> {}", folder.source, folder.destination);
        self.folders.push(folder);
    }

    pub fn add_file<S: Into<String>, D: Into<String>>(&mut self, source: S, destination: D) -> Result<()> {
        let source = source.into();
        let destination = destination.into();
        if self.files.contains_key(&source) {
            bail!(ErrorKind::DuplicateFileMapping(source));
        }
        debug!("File mapping: {} -> {}", source, destination);
        self.files.insert(source, destination);
        Ok(())
    }

    pub fn folders(&self) -> &[FolderMapping] {
        &self.folders
    }

    pub fn destination_file_name(&self, source: &str) -> Option<&str> {
        self.files.get(source).map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// A name is plain when it is exactly one normal path component, so joining
/// it onto a root can neither leave the root nor replace it.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) => component == name,
        _ => false,
    }
}
