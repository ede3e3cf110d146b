use crate::cli::Args;
use crate::error::{ErrorContext, Result};
use crate::types::{Config, OutputFormat, SubprobeError};
use crate::utils::{normalize_domain, parse_nameserver};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use toml::value::Table;

pub const NAMESERVERS_ENV: &str = "SUBPROBE_NAMESERVERS";

/// Defaults, then the config file, then the environment, then CLI flags.
pub fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config);
    apply_args(&mut config, args);
    validate_config(&config)?;

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let mut config = Config::default();
    let root: Table = toml::from_str(contents).with_context(|| "Failed to parse config file".to_string())?;

    if let Some(section) = table(&root, "enumeration")? {
        if let Some(value) = boolean(section, "numeric_variants")? {
            config.numeric_variants = value;
        }
        if let Some(value) = boolean(section, "reverse_lookup")? {
            config.reverse_lookup = value;
        }
        if let Some(secs) = integer(section, "run_timeout")? {
            config.run_timeout = Some(Duration::from_secs(secs));
        }
    }

    if let Some(section) = table(&root, "resolver")? {
        if let Some(threads) = integer(section, "threads")? {
            config.resolver.threads = usize::try_from(threads).with_context(|| "resolver.threads".to_string())?;
        }
        if let Some(secs) = integer(section, "timeout")? {
            config.resolver.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = integer(section, "attempts")? {
            config.resolver.attempts = usize::try_from(attempts).with_context(|| "resolver.attempts".to_string())?;
        }
        if let Some(limit) = integer(section, "rate_limit")? {
            config.resolver.rate_limit = Some(u32::try_from(limit).with_context(|| "resolver.rate_limit".to_string())?);
        }
        if let Some(value) = section.get("nameservers") {
            let servers = value
                .as_array()
                .ok_or_else(|| SubprobeError::ConfigError("resolver.nameservers must be an array".to_string()))?;
            config.resolver.nameservers = servers
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
                .collect();
        }
    }

    if let Some(section) = table(&root, "output")? {
        if let Some(value) = section.get("format").and_then(|v| v.as_str()) {
            config.output.format = value.parse()?;
        }
        if let Some(value) = section.get("file").and_then(|v| v.as_str()) {
            config.output.file = Some(value.to_string());
        }
    }

    Ok(config)
}

fn table<'a>(root: &'a Table, key: &str) -> Result<Option<&'a Table>> {
    match root.get(key) {
        Some(value) => value
            .as_table()
            .map(Some)
            .ok_or_else(|| SubprobeError::ConfigError(format!("[{}] must be a table", key))),
        None => Ok(None),
    }
}

fn boolean(section: &Table, key: &str) -> Result<Option<bool>> {
    match section.get(key) {
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| SubprobeError::ConfigError(format!("{} must be a boolean", key))),
        None => Ok(None),
    }
}

fn integer(section: &Table, key: &str) -> Result<Option<u64>> {
    match section.get(key) {
        Some(value) => {
            let raw = value
                .as_integer()
                .ok_or_else(|| SubprobeError::ConfigError(format!("{} must be an integer", key)))?;
            u64::try_from(raw).map(Some).with_context(|| key.to_string())
        }
        None => Ok(None),
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(servers) = env::var(NAMESERVERS_ENV) {
        config.resolver.nameservers = split_list(&servers);
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn apply_args(config: &mut Config, args: &Args) {
    config.domain = normalize_domain(&args.domain);
    config.wordlist_path = args.wordlist.clone();

    if args.no_nums {
        config.numeric_variants = false;
    }
    if args.no_reverse {
        config.reverse_lookup = false;
    }
    if let Some(threads) = args.threads {
        config.resolver.threads = threads;
    }
    if let Some(secs) = args.timeout {
        config.resolver.timeout = Duration::from_secs(secs);
    }
    if let Some(attempts) = args.attempts {
        config.resolver.attempts = attempts;
    }
    if let Some(secs) = args.run_timeout {
        config.run_timeout = Some(Duration::from_secs(secs));
    }
    if !args.resolvers.is_empty() {
        config.resolver.nameservers = args.resolvers.clone();
    }
    if let Some(limit) = args.rate_limit {
        config.resolver.rate_limit = Some(limit);
    }
    if let Some(file) = &args.output_file {
        config.output.file = Some(file.clone());
    }
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    if args.csv {
        config.output.format = OutputFormat::Csv;
    }
    config.output.silent = args.silent;
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.domain.is_empty() {
        return Err(SubprobeError::ConfigError("A target domain is required".to_string()));
    }
    if config.resolver.timeout.is_zero() {
        return Err(SubprobeError::ConfigError("Timeout must be greater than 0".to_string()));
    }
    if config.resolver.threads == 0 {
        return Err(SubprobeError::ConfigError("Threads must be greater than 0".to_string()));
    }
    if config.resolver.attempts == 0 {
        return Err(SubprobeError::ConfigError("Attempts must be greater than 0".to_string()));
    }
    if config.run_timeout.is_some_and(|d| d.is_zero()) {
        return Err(SubprobeError::ConfigError("Run timeout must be greater than 0".to_string()));
    }
    if config.resolver.rate_limit == Some(0) {
        return Err(SubprobeError::ConfigError("Rate limit must be greater than 0".to_string()));
    }
    for ns in &config.resolver.nameservers {
        parse_nameserver(ns)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["subprobe", "-d", "example.com.", "-w", "words.txt"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_enable_variants_and_reverse() {
        let config = Config::default();
        assert!(config.numeric_variants);
        assert!(config.reverse_lookup);
        assert!(config.resolver.use_system_resolver());
        assert!(config.run_timeout.is_none());
    }

    #[test]
    fn test_parse_config_sections() {
        let config = parse_config(
            r#"
            [enumeration]
            numeric_variants = false
            run_timeout = 120

            [resolver]
            threads = 8
            timeout = 3
            attempts = 1
            nameservers = ["1.1.1.1", "8.8.8.8:53"]
            rate_limit = 200

            [output]
            format = "csv"
            "#,
        )
        .unwrap();

        assert!(!config.numeric_variants);
        assert!(config.reverse_lookup);
        assert_eq!(config.run_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.resolver.threads, 8);
        assert_eq!(config.resolver.timeout, Duration::from_secs(3));
        assert_eq!(config.resolver.attempts, 1);
        assert_eq!(config.resolver.nameservers, vec!["1.1.1.1", "8.8.8.8:53"]);
        assert_eq!(config.resolver.rate_limit, Some(200));
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_parse_config_rejects_wrong_types() {
        assert!(parse_config("[resolver]\nthreads = \"many\"\n").is_err());
        assert!(parse_config("[resolver]\ntimeout = -1\n").is_err());
        assert!(parse_config("enumeration = 3\n").is_err());
        assert!(parse_config("[output]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[resolver]\nthreads = 8\n[enumeration]\nreverse_lookup = true").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = build_config(&args(&["-c", path.as_str(), "-t", "16", "--no-reverse", "--json"])).unwrap();

        assert_eq!(config.domain, "example.com");
        assert_eq!(config.resolver.threads, 16);
        assert!(!config.reverse_lookup);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(build_config(&args(&["-c", "/nonexistent/subprobe.toml"])).is_err());
    }

    #[test]
    fn test_validation() {
        let valid = build_config(&args(&[])).unwrap();
        assert!(validate_config(&valid).is_ok());

        assert!(build_config(&args(&["-t", "0"])).is_err());
        assert!(build_config(&args(&["--timeout", "0"])).is_err());
        assert!(build_config(&args(&["--run-timeout", "0"])).is_err());
        assert!(build_config(&args(&["--rate-limit", "0"])).is_err());
        assert!(build_config(&args(&["-r", "resolver.local"])).is_err());

        let mut empty_domain = valid.clone();
        empty_domain.domain = String::new();
        assert!(validate_config(&empty_domain).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" 1.1.1.1, ,9.9.9.9 "), vec!["1.1.1.1", "9.9.9.9"]);
    }
}
