use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// How target records are read and how matches are reported.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One domain per line; matches reported as "<name> found at <domain>"
    #[default]
    Simple,
    /// One `domain,ip,port` record per line; bad path and `/` are both probed
    Extended,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "badprint", version)]
#[command(about = "Fingerprint web hosts by the response to a deliberately bad path")]
pub struct Cli {
    /// JSON file containing fingerprints to search for
    #[arg(short = 'f', long = "fingerprints", value_name = "FILE")]
    pub fingerprints: PathBuf,

    /// Target file with hosts to fingerprint (reads stdin when omitted)
    #[arg(short = 't', long = "target", value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// The intentional 404 path to hit each target with (random when omitted)
    #[arg(short = 'p', long = "badpath", visible_alias = "path", value_name = "PATH")]
    pub badpath: Option<String>,

    /// Target record format
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Simple)]
    pub mode: Mode,

    /// Also probe the root path `/` for every target (always on in extended mode)
    #[arg(long = "probe-root", action = ArgAction::SetTrue)]
    pub probe_root: bool,

    /// Number of workers processing targets
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Timeout in seconds for connecting to and reading from servers
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Queue size used to pool jobs (extended mode)
    #[arg(short = 'q', long = "queue", value_name = "N")]
    pub queue: Option<usize>,

    /// HTTP method to make the request with
    #[arg(short = 'X', long = "method", value_name = "METHOD")]
    pub method: Option<String>,

    /// Data to send in the request body
    #[arg(short = 'd', long = "body", value_name = "DATA")]
    pub body: Option<String>,

    /// Directory to write fingerprint result files into
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Disable TCP keep-alive on probe connections
    #[arg(long = "no-keepalive", action = ArgAction::SetTrue)]
    pub no_keepalive: bool,

    /// TOML file with default settings
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose human output
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Show fetch errors and unmatched targets
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}
