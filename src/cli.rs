use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Rule file (.jsonl, .json, .yml) or directory of rule files
    pub rules_path: String,

    /// File or directory to annotate
    pub input_path: String,

    /// Output file path
    #[arg(default_value = "entities.json", short)]
    pub output_file: String,

    /// Maximum recursion depth (0 means no recursion)
    #[arg(short, long, default_value = "50")]
    pub max_depth: usize,

    /// Exclude patterns (glob patterns like "*.tmp" or "node_modules")
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Include the matched text of each entity in the output
    #[arg(long)]
    pub include_text: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
