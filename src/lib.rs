pub mod cli;
pub mod models;
pub mod ruler;
pub mod scanner;
pub mod utils;

pub use models::{FileInfo, FileType, Header, Output};
pub use ruler::{EntityRuler, InvalidPatternError, PatternSet, Span, find_matches};
pub use scanner::{ProcessResult, ScanCounts, count, process};
