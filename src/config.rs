use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Terminal client for the notes REST API.
#[derive(Parser, Clone, Debug, Eq, PartialEq)]
#[command(name = "notedeck", version)]
pub struct Cli {
    /// Base URL of the notes backend; endpoints live under `<url>/api`
    #[arg(long, env = "NOTEDECK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// One of trace, debug, info, warn, error
    #[arg(long, env = "NOTEDECK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Directory for log files [default: $HOME/.notedeck/logs]
    #[arg(long, env = "NOTEDECK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Where `E` writes the HTML export of the note list
    #[arg(long, env = "NOTEDECK_EXPORT_PATH", default_value = "notes.html")]
    pub export_path: PathBuf,
}

impl Cli {
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".notedeck").join("logs")
        })
    }
}
