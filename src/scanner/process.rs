use crate::models::{FileInfo, FileInfoBuilder, FileType};
use crate::ruler::EntityRuler;
use crate::scanner::ProcessResult;
use crate::utils::file::is_path_excluded;
use anyhow::{Context, Error};
use content_inspector::{ContentType, inspect};
use glob::Pattern;
use indicatif::ProgressBar;
use log::{debug, warn};
use mime_guess::from_path;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Annotate every text file under `path`.
///
/// `path` may be a single file. Files within one directory are annotated in
/// parallel; subdirectories are visited while `max_depth` allows. Per-file
/// failures are recorded in that file's `scan_errors` and never abort the
/// scan.
pub fn process<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    progress_bar: Arc<ProgressBar>,
    exclude_patterns: &[Pattern],
    ruler: &EntityRuler,
    include_text: bool,
) -> Result<ProcessResult, Error> {
    let path = path.as_ref();

    if is_path_excluded(path, exclude_patterns) {
        return Ok(ProcessResult {
            files: Vec::new(),
            excluded_count: 1,
        });
    }

    let root_metadata = fs::metadata(path)
        .with_context(|| format!("Cannot access input path: {}", path.display()))?;
    if root_metadata.is_file() {
        let file_info = process_file(path, &root_metadata, ruler, include_text);
        progress_bar.inc(1);
        return Ok(ProcessResult {
            files: vec![file_info],
            excluded_count: 0,
        });
    }

    let mut all_files = Vec::new();
    let mut total_excluded = 0;

    let entries: Vec<_> = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {}", path.display()))?
        .filter_map(Result::ok)
        .collect();

    let mut file_entries = Vec::new();
    let mut dir_entries = Vec::new();

    for entry in entries {
        let path = entry.path();

        if is_path_excluded(&path, exclude_patterns) {
            total_excluded += 1;
            continue;
        }

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => file_entries.push((path, metadata)),
            Ok(metadata) if metadata.is_dir() => dir_entries.push((path, metadata)),
            _ => continue,
        }
    }

    // Stable output order regardless of directory iteration order.
    file_entries.sort_by(|a, b| a.0.cmp(&b.0));
    dir_entries.sort_by(|a, b| a.0.cmp(&b.0));

    all_files.append(
        &mut file_entries
            .par_iter()
            .map(|(path, metadata)| {
                let file_info = process_file(path, metadata, ruler, include_text);
                progress_bar.inc(1);
                file_info
            })
            .collect(),
    );

    for (path, metadata) in dir_entries {
        all_files.push(process_directory(&path, &metadata));

        if max_depth > 0 {
            match process(
                &path,
                max_depth - 1,
                progress_bar.clone(),
                exclude_patterns,
                ruler,
                include_text,
            ) {
                Ok(mut result) => {
                    all_files.append(&mut result.files);
                    total_excluded += result.excluded_count;
                }
                Err(e) => warn!("Error processing directory {}: {:#}", path.display(), e),
            }
        }
    }

    Ok(ProcessResult {
        files: all_files,
        excluded_count: total_excluded,
    })
}

fn process_file(
    path: &Path,
    metadata: &fs::Metadata,
    ruler: &EntityRuler,
    include_text: bool,
) -> FileInfo {
    let mut scan_errors: Vec<String> = vec![];
    let mut file_info_builder = FileInfoBuilder::default();

    if let Err(e) = extract_entities(&mut file_info_builder, path, ruler, include_text) {
        scan_errors.push(format!("{:#}", e));
    }

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    file_info_builder
        .name(name)
        .base_name(
            path.file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        )
        .extension(
            path.extension()
                .map_or(String::new(), |ext| format!(".{}", ext.to_string_lossy())),
        )
        .path(path.to_string_lossy().to_string())
        .file_type(FileType::File)
        .mime_type(Some(
            from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        ))
        .size(metadata.len())
        .scan_errors(scan_errors)
        .build()
        .expect("FileInfo builder not completely initialized")
}

fn extract_entities(
    file_info_builder: &mut FileInfoBuilder,
    path: &Path,
    ruler: &EntityRuler,
    include_text: bool,
) -> Result<(), Error> {
    let buffer = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if inspect(&buffer) != ContentType::UTF_8 {
        debug!("Skipping binary file {}", path.display());
        return Ok(());
    }

    // `inspect` only looks at BOMs and NUL bytes; Latin-1 text gets this far.
    let Ok(text) = std::str::from_utf8(&buffer) else {
        debug!("Skipping non-UTF-8 file {}", path.display());
        return Ok(());
    };

    let mut entities = ruler.annotate(text);
    if !include_text {
        for entity in &mut entities {
            entity.text = None;
        }
    }

    file_info_builder.is_text(true).entities(entities);
    Ok(())
}

fn process_directory(path: &Path, metadata: &fs::Metadata) -> FileInfo {
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let base_name = name.clone(); // For directories, base_name is the same as name

    FileInfo::new(
        name,
        base_name,
        String::new(),
        path.to_string_lossy().to_string(),
        FileType::Directory,
        None,
        metadata.len(),
        false,
        Vec::new(),
        Vec::new(),
    )
}
