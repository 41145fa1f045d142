use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "foldview",
    version,
    about = "Predict a protein structure with ESMFold and render it as an interactive 3D viewer."
)]
pub struct Cli {
    /// Write the viewer to this HTML file [default: protein.html]
    #[arg(short, long, value_name = "PATH", conflicts_with = "display")]
    pub output: Option<PathBuf>,

    /// Open the viewer in the default browser instead of exporting it
    #[arg(long)]
    pub display: bool,

    /// Program used to open the viewer with --display [default: platform opener]
    #[arg(long, value_name = "PROGRAM", requires = "display")]
    pub opener: Option<PathBuf>,

    /// Amino-acid sequence to fold, replacing the built-in one
    #[arg(long, value_name = "AA")]
    pub sequence: Option<String>,

    /// Prediction endpoint. Falls back to $ESMFOLD_URL, then the NVIDIA-hosted ESMFold API
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Viewer width in pixels
    #[arg(long, value_name = "PX", default_value_t = 600)]
    pub width: u32,

    /// Viewer height in pixels
    #[arg(long, value_name = "PX", default_value_t = 400)]
    pub height: u32,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
