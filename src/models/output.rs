use super::FileInfo;
use serde::Serialize;

pub const OUTPUT_FORMAT_VERSION: &str = "1.0.0";

#[derive(Serialize, Debug)]
pub struct Output {
    pub headers: Vec<Header>,
    pub files: Vec<FileInfo>,
}

#[derive(Serialize, Debug)]
pub struct Header {
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub duration: f64,
    pub extra_data: ExtraData,
    pub errors: Vec<String>,
    pub output_format_version: String,
}

#[derive(Serialize, Debug)]
pub struct ExtraData {
    pub files_count: usize,
    pub directories_count: usize,
    pub excluded_count: usize,
    pub entities_count: usize,
    pub rules: RulesSummary,
    pub system_environment: SystemEnvironment,
}

/// What the scan matched against.
#[derive(Serialize, Debug)]
pub struct RulesSummary {
    pub path: String,
    pub patterns_count: usize,
    pub labels: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct SystemEnvironment {
    pub operating_system: Option<String>,
    pub cpu_architecture: String,
    pub platform: String,
    pub rust_version: String,
}
