use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "flavor-migrate",
    about = "Convert legacy flavor parts into template-driven PCR log flavors",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a legacy flavor part JSON file
    Convert {
        /// Path to the legacy flavor part (.json)
        input: PathBuf,

        /// Directory holding the flavor template library
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Where to write the converted flavor collection
        #[arg(long)]
        output: Option<PathBuf>,

        /// TOML config file with `template_dir` and `output_path`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Do not write the output file
        #[arg(long)]
        no_write: bool,

        /// Do not print the converted collection to stdout
        #[arg(long)]
        quiet: bool,
    },

    /// List the template conditions this tool can evaluate
    Conditions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
