use super::*;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use context::CopyContext;
use report::{CopyEvent, CopyReporter};

/// Keeps every event for later inspection.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<CopyEvent>,
}

impl CopyReporter for RecordingReporter {
    fn report(&mut self, event: CopyEvent) {
        self.events.push(event);
    }
}

pub fn with_default_test_file<F>(test_dir: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    let test_file_name = random_string() + "test_file.test";
    let test_file: &PathBuf = &test_dir.join(test_file_name);
    with_test_file(test_file, test_method);
}

pub fn with_test_file<F>(test_file: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    // Make sure file test file exists
    if !test_file.is_file() {
        File::create(test_file).unwrap();
    }
    assert_eq!(test_file.is_file(), true);

    test_method(test_file);

    // Clean up if the test file wasn't deleted
    if test_file.is_file() {
        fs::remove_file(test_file).unwrap();
    }
}

/// Creates `directory` if needed and writes `contents` to `name` inside it.
pub fn write_test_file(directory: &Path, name: &str, contents: &[u8]) -> PathBuf {
    fs::create_dir_all(directory).unwrap();
    let path = directory.join(name);
    File::create(&path).unwrap().write_all(contents).unwrap();
    path
}

pub fn with_default_test_directory<F>(test_method: F)
where
    F: Fn(&PathBuf),
{
    let test_dir_name = "./test_output/output".to_owned() + &random_string();
    with_test_directory(&PathBuf::from(test_dir_name), test_method);
}

pub fn with_test_directory<F>(test_dir: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    // Make sure test directory exists and is empty
    if test_dir.is_dir() {
        fs::remove_dir_all(test_dir).unwrap();
    }
    fs::create_dir_all(test_dir).unwrap();
    assert_eq!(test_dir.is_dir(), true);

    test_method(test_dir);

    // Clean up
    fs::remove_dir_all(test_dir).unwrap();
}

/// Runs `test_method` with empty source and destination roots under a fresh
/// test directory.
pub fn with_source_and_dest<F>(test_method: F)
where
    F: Fn(&CopyContext),
{
    with_default_test_directory(|test_directory| {
        let file_context = CopyContext {
            source_dir: test_directory.join("source"),
            dest_dir: test_directory.join("dest"),
            dry_run: false
        };
        fs::create_dir_all(&file_context.source_dir).unwrap();
        fs::create_dir_all(&file_context.dest_dir).unwrap();
        test_method(&file_context);
    });
}

pub fn random_string() -> String {
    let random_number = rand::random::<u32>();
    println!("Using random number: {:?}", random_number);
    random_number.to_string()
}
