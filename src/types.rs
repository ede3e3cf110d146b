// src/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub domain: String,
    pub wordlist_path: PathBuf,
    pub numeric_variants: bool,
    pub reverse_lookup: bool,
    pub run_timeout: Option<Duration>,
    pub resolver: ResolverConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: String::new(),
            wordlist_path: PathBuf::new(),
            numeric_variants: true,
            reverse_lookup: true,
            run_timeout: None,
            resolver: ResolverConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file: Option<String>,
    pub silent: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            file: None,
            silent: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = SubprobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(SubprobeError::ConfigError(format!("Unknown output format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Size of the worker pool draining the candidate list.
    pub threads: usize,
    /// Per-attempt lookup timeout.
    pub timeout: Duration,
    /// Attempts handed to the resolver library's own retry policy.
    pub attempts: usize,
    /// Upstream nameservers; empty means the system configuration.
    pub nameservers: Vec<String>,
    /// Optional ceiling on DNS queries per second.
    pub rate_limit: Option<u32>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threads: 50,
            timeout: Duration::from_secs(5),
            attempts: 2,
            nameservers: Vec::new(),
            rate_limit: None,
        }
    }
}

impl ResolverConfig {
    pub fn use_system_resolver(&self) -> bool {
        self.nameservers.is_empty()
    }
}

/// One discovered (name, address) pair with its reverse names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fqdn: String,
    pub ip: String,
    pub ptrs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumerationStats {
    pub candidates: usize,
    pub resolved: usize,
    pub absent: usize,
    pub failed: usize,
    pub unfinished: usize,
    pub records: usize,
    pub duration: Duration,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumerationReport {
    pub domain: String,
    pub records: Vec<Record>,
    pub stats: EnumerationStats,
    pub timestamp: String,
}

#[derive(Debug, Error)]
pub enum SubprobeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read wordlist {path}: {source}")]
    Wordlist {
        path: String,
        source: std::io::Error,
    },

    #[error("Resolver setup error: {0}")]
    ResolverSetup(String),

    #[error("Resolution error for {name}: {message}")]
    Resolution {
        name: String,
        message: String,
    },

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}
