mod count;
mod process;

use crate::models::FileInfo;

pub struct ProcessResult {
    pub files: Vec<FileInfo>,
    pub excluded_count: usize,
}

impl ProcessResult {
    /// Total entities found across all files.
    pub fn entities_count(&self) -> usize {
        self.files.iter().map(|file| file.entities.len()).sum()
    }
}

pub use self::count::{ScanCounts, count};
pub use self::process::process;
