use clap::Parser;
use nextmap_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nextmap")]
#[command(
    version,
    about = "Take a timestamped screenshot of the Dresden nextbike map",
    long_about = "Take a timestamped screenshot of the Dresden nextbike map.\n\nDrives a headless browser to the map page, zooms in, overlays the current\ndate/time via ImageMagick, and atomically replaces the output file. Meant\nto be run periodically from a scheduler."
)]
pub struct Cli {
    /// Write the screenshot to this path
    #[arg(long, short, value_name = "PATH")]
    pub out: PathBuf,

    /// Number of times to zoom in (default: 3)
    #[arg(short = 'z', long = "zoom", value_name = "N")]
    pub zoom: Option<u32>,

    /// Map page to capture (default: the Dresden nextbike map)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Browser window dimensions (default: 4108x4693)
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub viewport: Option<Viewport>,

    /// Page-load timeout in seconds (browser default when omitted)
    #[arg(long, value_name = "SECS")]
    pub nav_timeout: Option<u64>,

    /// How long to wait for the map element to appear, in seconds (default: 30)
    #[arg(long, value_name = "SECS")]
    pub wait_timeout: Option<u64>,

    /// Kill the capture if it runs longer than this, in seconds (default: 120)
    #[arg(long, value_name = "SECS")]
    pub process_timeout: Option<u64>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub no_headless: bool,

    /// Minimize the browser window (only with --no-headless)
    #[arg(long)]
    pub minimize: bool,

    /// Keep the browser profile directory on disk for inspection
    #[arg(long)]
    pub keep_profile: bool,

    /// Optional config file (TOML) to set defaults; CLI flags override it
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable progress output on stderr
    #[arg(long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
