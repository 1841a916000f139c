use regex::{Captures, Regex};
use std::fmt;
use std::fs;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use error::*;
use mapping::{is_plain_name, FolderMapping, MappingTables};

#[derive(Debug, PartialEq)]
pub enum MappingEntry {
    Folder(FolderMapping),
    File { source: String, destination: String },
}

pub trait MappingDirective: fmt::Display {
    fn create_entry(&self, definition: &str) -> Option<Result<MappingEntry>>;
}

pub struct RegexDirective {
    directive_name: String,
    format: Regex,
    entry_factory: Box<dyn Fn(Captures) -> Result<MappingEntry>>,
}

impl fmt::Display for RegexDirective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.directive_name)
    }
}

impl MappingDirective for RegexDirective {
    fn create_entry(&self, definition: &str) -> Option<Result<MappingEntry>> {
        self.format
            .captures(definition)
            .map(|captures| (self.entry_factory)(captures))
    }
}

pub fn create_directives() -> Vec<Box<dyn MappingDirective>> {
    vec![folder_directive(), file_directive()]
}

fn source_and_destination(captures: &Captures, kind: &str) -> Result<(String, String)> {
    let source = captures
        .name("source")
        .chain_err(|| format!("No source found for {} directive. This is a bug.", kind))?;
    let destination = captures
        .name("destination")
        .chain_err(|| format!("No destination found for {} directive. This is a bug.", kind))?;
    Ok((source.as_str().to_string(), destination.as_str().to_string()))
}

fn folder_directive() -> Box<dyn MappingDirective> {
    let directive = RegexDirective {
        directive_name: "Folder".to_string(),
        format: Regex::new(r"^\s*d\s*/(?P<source>[^/]+)/\s*(?P<destination>\S.*?)\s*$").unwrap(),
        entry_factory: Box::new(|captures: Captures| {
            let (source, destination) = source_and_destination(&captures, "folder")?;
            Ok(MappingEntry::Folder(FolderMapping::new(source, destination)))
        }),
    };

    Box::new(directive)
}

fn file_directive() -> Box<dyn MappingDirective> {
    let directive = RegexDirective {
        directive_name: "File".to_string(),
        format: Regex::new(r"^\s*f\s*/(?P<source>[^/]+)/\s*(?P<destination>\S.*?)\s*$").unwrap(),
        entry_factory: Box::new(|captures: Captures| {
            let (source, destination) = source_and_destination(&captures, "file")?;
            Ok(MappingEntry::File { source, destination })
        }),
    };

    Box::new(directive)
}

/// Rejects a line claimed by more than one directive; the built-in folder and
/// file formats never overlap, so this only guards directives added later.
pub fn entry_from_string(
    all_directives: &[Box<dyn MappingDirective>],
    directive_definition: &str,
) -> Option<Result<MappingEntry>> {
    let mut matched_directives: Vec<&Box<dyn MappingDirective>> = vec![];
    let mut found_entry: Option<Result<MappingEntry>> = None;
    for directive in all_directives {
        if let Some(entry_result) = directive.create_entry(directive_definition) {
            matched_directives.push(directive);
            found_entry = Some(entry_result);
        }
    }

    if matched_directives.len() > 1 {
        let directive_list = matched_directives
            .iter()
            .fold(String::new(), |accum, next| format!("{}, {}", accum, next));
        Some(Err(Error::from(format!(
            "Ambiguous directive '{}', which matched {}",
            directive_definition, directive_list
        ))))
    } else {
        found_entry
    }
}

pub fn tables_from_file(all_directives: &[Box<dyn MappingDirective>], file: &Path) -> Result<MappingTables> {
    let f = fs::File::open(file)
        .chain_err(|| format!("Unable to open mapping file {}", file.to_string_lossy()))?;
    tables_from_reader(all_directives, BufReader::new(f))
        .chain_err(|| format!("Invalid mapping file {}", file.to_string_lossy()))
}

pub fn tables_from_reader<R: BufRead>(all_directives: &[Box<dyn MappingDirective>], reader: R) -> Result<MappingTables> {
    let mut tables = MappingTables::new();
    for (index, line_result) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line_result.chain_err(|| format!("Error reading line {}", line_number))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = match entry_from_string(all_directives, &line) {
            Some(result) => result.chain_err(|| format!("Invalid directive on line {}", line_number))?,
            None => bail!(ErrorKind::UnknownDirective(line_number, line.clone())),
        };
        let names: Vec<&str> = match entry {
            MappingEntry::Folder(ref folder) => vec![folder.source.as_str(), folder.destination.as_str()],
            MappingEntry::File { ref source, ref destination } => vec![source.as_str(), destination.as_str()],
        };
        if let Some(name) = names.into_iter().find(|name| !is_plain_name(name)) {
            bail!(ErrorKind::InvalidName(line_number, name.to_string()));
        }
        match entry {
            MappingEntry::Folder(folder) => tables.add_folder(folder),
            MappingEntry::File { source, destination } => tables
                .add_file(source, destination)
                .chain_err(|| format!("Invalid directive on line {}", line_number))?,
        }
    }

    Ok(tables)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn entry_from_string_passes_directive() {
        match entry_from_string(&create_test_directives(), "directive").unwrap() {
            Err(Error(ErrorKind::Msg(message), _)) => assert_eq!(message, "matches"),
            _ => assert!(false),
        }
    }

    #[test]
    fn entry_from_string_overlapping_directives() {
        let mut directives = create_test_directives();
        directives.append(&mut create_test_directives());
        match entry_from_string(&directives, "directive").unwrap() {
            Err(Error(ErrorKind::Msg(message), _)) => {
                assert_eq!(message.contains("Ambiguous"), true)
            }
            _ => assert!(false),
        }
    }

    fn create_test_directives() -> Vec<Box<dyn MappingDirective>> {
        vec![Box::new(RecordingTestDirective {
            expected_definition: "directive".to_string(),
        })]
    }

    struct RecordingTestDirective {
        expected_definition: String,
    }

    impl fmt::Display for RecordingTestDirective {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}", "Test directive")
        }
    }

    impl MappingDirective for RecordingTestDirective {
        fn create_entry(&self, definition: &str) -> Option<Result<MappingEntry>> {
            if definition == &self.expected_definition {
                Some(Err(Error::from("matches")))
            } else {
                Some(Err(Error::from("Does not match")))
            }
        }
    }

    #[test]
    fn folder_directive_no_match() {
        assert_eq!(folder_directive().create_entry("").is_none(), true);
        assert_eq!(folder_directive().create_entry("f/face.jpg/ konta-face.jpg").is_none(), true);
    }

    #[test]
    fn folder_directive_valid() {
        let entry = folder_directive().create_entry("  d /コン太/  konta  ").unwrap().unwrap();
        assert_eq!(entry, MappingEntry::Folder(FolderMapping::new("コン太", "konta")));
    }

    #[test]
    fn file_directive_keeps_spaces_inside_names() {
        let entry = file_directive().create_entry("f/my face.jpg/ konta face.jpg").unwrap().unwrap();
        assert_eq!(
            entry,
            MappingEntry::File {
                source: "my face.jpg".to_string(),
                destination: "konta face.jpg".to_string()
            }
        );
    }

    #[test]
    fn file_directive_requires_destination() {
        assert_eq!(file_directive().create_entry("f/face.jpg/   ").is_none(), true);
    }

    #[test]
    fn tables_from_reader_skips_comments_and_blank_lines() {
        let definitions = "# characters\n\nd/konta/ konta\nd/りんく/ rinku\n\n# files\nf/face.jpg/ konta-face.jpg\n";
        let tables = tables_from_reader(&create_directives(), Cursor::new(definitions)).unwrap();
        assert_eq!(tables.folders().len(), 2);
        assert_eq!(tables.folders()[1], FolderMapping::new("りんく", "rinku"));
        assert_eq!(tables.destination_file_name("face.jpg"), Some("konta-face.jpg"));
    }

    #[test]
    fn tables_from_reader_unknown_directive() {
        let definitions = "d/konta/ konta\nc/face/ konta\n";
        match tables_from_reader(&create_directives(), Cursor::new(definitions)) {
            Err(Error(ErrorKind::UnknownDirective(line_number, _), _)) => assert_eq!(line_number, 2),
            _ => panic!("Unknown directive was accepted"),
        }
    }

    #[test]
    fn tables_from_reader_duplicate_file() {
        let definitions = "f/face.jpg/ konta-face.jpg\nf/face.jpg/ rinku-face.jpg\n";
        let result = tables_from_reader(&create_directives(), Cursor::new(definitions));
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn tables_from_reader_rejects_path_names() {
        let invalid_definitions = vec![
            ("d/konta/ konta\nf/a.png/ ../../escaped.png\n", 2, "../../escaped.png"),
            ("f/b.png/ sub/b.png\n", 1, "sub/b.png"),
            ("d/x/ /tmp/y\n", 1, "/tmp/y"),
            ("d/../ konta\n", 1, ".."),
        ];
        for (definitions, expected_line, expected_name) in invalid_definitions {
            match tables_from_reader(&create_directives(), Cursor::new(definitions)) {
                Err(Error(ErrorKind::InvalidName(line_number, name), _)) => {
                    assert_eq!(line_number, expected_line);
                    assert_eq!(name, expected_name);
                }
                _ => panic!("Path name was accepted: {}", definitions),
            }
        }
    }

    #[test]
    fn tables_from_file_does_not_exist() {
        let result = tables_from_file(&create_directives(), Path::new("does-not-exist.map"));
        assert_eq!(result.is_err(), true);
    }
}
