use crate::utils::file::is_path_excluded;
use glob::Pattern;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Totals gathered before a scan, used to size the progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub files: usize,
    pub directories: usize,
    pub excluded: usize,
}

/// Count files, directories and excluded entries under `path`.
///
/// A plain file counts as one file and zero directories. Directories recurse
/// while `max_depth` allows; the root directory is included in the count.
pub fn count<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    exclude_patterns: &[Pattern],
) -> std::io::Result<ScanCounts> {
    let path = path.as_ref();

    if is_path_excluded(path, exclude_patterns) {
        return Ok(ScanCounts {
            excluded: 1,
            ..ScanCounts::default()
        });
    }

    if fs::metadata(path)?.is_file() {
        return Ok(ScanCounts {
            files: 1,
            ..ScanCounts::default()
        });
    }

    let mut counts = ScanCounts {
        directories: 1,
        ..ScanCounts::default()
    };

    for entry in fs::read_dir(path)?.filter_map(Result::ok) {
        let entry_path = entry.path();

        if is_path_excluded(&entry_path, exclude_patterns) {
            counts.excluded += 1;
            continue;
        }

        // Unreadable entries (dangling links, permissions) are skipped, as in `process`.
        let metadata = match fs::metadata(&entry_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", entry_path.display(), e);
                continue;
            }
        };

        if metadata.is_file() {
            counts.files += 1;
        } else if metadata.is_dir() {
            if max_depth == 0 {
                counts.directories += 1;
                continue;
            }
            match count(&entry_path, max_depth - 1, exclude_patterns) {
                Ok(sub) => {
                    counts.files += sub.files;
                    counts.directories += sub.directories;
                    counts.excluded += sub.excluded;
                }
                Err(e) => {
                    warn!("Error counting directory {}: {}", entry_path.display(), e);
                    counts.directories += 1;
                }
            }
        }
    }

    Ok(counts)
}
