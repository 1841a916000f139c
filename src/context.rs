use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CopyContext {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub dry_run: bool
}
