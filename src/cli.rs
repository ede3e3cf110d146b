use clap::Parser;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subprobe",
    version,
    long_version = LONG_VERSION,
    about = "Wordlist-driven subdomain discovery over DNS",
    long_about = "subprobe expands a wordlist into candidate hostnames under a target domain,\nresolves each to IPv4 addresses and optionally looks up PTR names for every address."
)]
pub struct Args {
    /// Target domain
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN")]
    pub domain: String,

    /// Wordlist file, one label per line ("-" reads stdin)
    #[arg(short = 'w', long = "wordlist", value_name = "FILE")]
    pub wordlist: PathBuf,

    /// Disable word+digit variants (www0 .. www9)
    #[arg(long = "no-nums")]
    pub no_nums: bool,

    /// Disable reverse DNS lookups
    #[arg(long = "no-reverse")]
    pub no_reverse: bool,

    /// Concurrent lookups
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Per-lookup timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Attempts per lookup
    #[arg(long = "attempts")]
    pub attempts: Option<usize>,

    /// Stop waiting for lookups after this many seconds
    #[arg(long = "run-timeout", value_name = "SECS")]
    pub run_timeout: Option<u64>,

    /// Nameservers to query instead of the system configuration (comma-separated)
    #[arg(short = 'r', long = "resolvers", value_delimiter = ',', value_name = "IP[:PORT]")]
    pub resolvers: Vec<String>,

    /// Maximum DNS queries per second
    #[arg(long = "rate-limit", value_name = "QPS")]
    pub rate_limit: Option<u32>,

    /// Output file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<String>,

    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "csv")]
    pub json: bool,

    /// Output in CSV format
    #[arg(long = "csv")]
    pub csv: bool,

    /// Silent mode (only output records)
    #[arg(long = "silent", conflicts_with = "verbose")]
    pub silent: bool,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["subprobe", "-d", "example.com", "-w", "words.txt"]).unwrap();
        assert_eq!(args.domain, "example.com");
        assert!(!args.no_nums);
        assert!(!args.no_reverse);
        assert!(args.resolvers.is_empty());
    }

    #[test]
    fn test_parse_resolver_list() {
        let args = Args::try_parse_from([
            "subprobe", "-d", "example.com", "-w", "-", "-r", "1.1.1.1,8.8.8.8:53", "--no-nums",
        ])
        .unwrap();
        assert_eq!(args.resolvers, vec!["1.1.1.1", "8.8.8.8:53"]);
        assert!(args.no_nums);
    }

    #[test]
    fn test_domain_and_wordlist_are_required() {
        assert!(Args::try_parse_from(["subprobe", "-d", "example.com"]).is_err());
        assert!(Args::try_parse_from(["subprobe", "-w", "words.txt"]).is_err());
    }
}
