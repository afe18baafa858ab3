use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate feature-gated Rust types from Kubernetes CRDs"
)]
pub struct CrdCodegenArgs {
    /// Path to KDL config file
    #[arg(short = 'c', long, default_value = "crds.kdl")]
    pub config: PathBuf,

    /// Output directory, overriding `output.dir` from the config
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Formatter to run on each generated file
    #[arg(long, value_parser = ["rustfmt", "prettyplease", "skip"])]
    pub formatter: Option<String>,

    /// Generator program, overriding `generator.command` from the config
    #[arg(long)]
    pub generator: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
