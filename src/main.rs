use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::to_string_pretty;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use entity_ruler::cli::Cli;
use entity_ruler::models::{
    ExtraData, Header, OUTPUT_FORMAT_VERSION, Output, RulesSummary, SystemEnvironment,
};
use entity_ruler::ruler::EntityRuler;
use entity_ruler::scanner::{self, ScanCounts, count, process};
use entity_ruler::utils::file::compile_exclude_patterns;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let start_time = Utc::now();

    let ruler = EntityRuler::from_path(Path::new(&cli.rules_path))
        .map_err(|e| format!("{:#}", e))?;
    println!(
        "Loaded {} patterns ({} labels) from {}",
        ruler.patterns().len(),
        ruler.patterns().labels().len(),
        cli.rules_path
    );

    let exclude_patterns = compile_exclude_patterns(&cli.exclude);
    println!("Exclusion patterns: {:?}", cli.exclude);

    let counts = count(&cli.input_path, cli.max_depth, &exclude_patterns)?;
    println!(
        "Found {} files in {} directories ({} items excluded)",
        counts.files, counts.directories, counts.excluded
    );

    let progress_bar = create_progress_bar(counts.files, cli.quiet);
    let scan_result = process(
        &cli.input_path,
        cli.max_depth,
        Arc::clone(&progress_bar),
        &exclude_patterns,
        &ruler,
        cli.include_text,
    )?;
    progress_bar.finish_with_message("Annotation complete!");

    let end_time = Utc::now();
    let output = create_output(
        start_time,
        end_time,
        scan_result,
        counts,
        &cli.rules_path,
        &ruler,
    );
    write_output(&cli.output_file, &output)?;

    println!(
        "{} entities written to {}",
        output.headers[0].extra_data.entities_count, cli.output_file
    );
    Ok(())
}

fn create_progress_bar(total_files: usize, quiet: bool) -> Arc<ProgressBar> {
    if quiet {
        return Arc::new(ProgressBar::hidden());
    }

    let progress_bar = ProgressBar::new(total_files as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files annotated ({eta})")
            .expect("Failed to create progress bar style")
            .progress_chars("#>-"),
    );
    Arc::new(progress_bar)
}

fn create_output(
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
    scan_result: scanner::ProcessResult,
    counts: ScanCounts,
    rules_path: &str,
    ruler: &EntityRuler,
) -> Output {
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0;

    let extra_data = ExtraData {
        files_count: scan_result
            .files
            .iter()
            .filter(|file| file.file_type == entity_ruler::FileType::File)
            .count(),
        directories_count: counts.directories,
        excluded_count: scan_result.excluded_count,
        entities_count: scan_result.entities_count(),
        rules: RulesSummary {
            path: rules_path.to_string(),
            patterns_count: ruler.patterns().len(),
            labels: ruler.patterns().labels(),
        },
        system_environment: SystemEnvironment {
            operating_system: sys_info::os_type().ok(),
            cpu_architecture: env::consts::ARCH.to_string(),
            platform: format!(
                "{}-{}-{}",
                sys_info::os_type().unwrap_or_else(|_| "unknown".to_string()),
                sys_info::os_release().unwrap_or_else(|_| "unknown".to_string()),
                env::consts::ARCH
            ),
            rust_version: rustc_version_runtime::version().to_string(),
        },
    };

    // Collect all scan errors from individual files
    let errors: Vec<String> = scan_result
        .files
        .iter()
        .flat_map(|file| {
            file.scan_errors
                .iter()
                .map(move |error| format!("{}: {}", file.path, error))
        })
        .collect();

    Output {
        headers: vec![Header {
            start_timestamp: start_time.to_rfc3339(),
            end_timestamp: end_time.to_rfc3339(),
            duration,
            extra_data,
            errors,
            output_format_version: OUTPUT_FORMAT_VERSION.to_string(),
        }],
        files: scan_result.files,
    }
}

fn write_output(output_file: &str, output: &Output) -> std::io::Result<()> {
    let json_output = match to_string_pretty(output) {
        Ok(json) => json,
        Err(err) => return Err(std::io::Error::other(err)),
    };
    let mut file = File::create(output_file)?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}
