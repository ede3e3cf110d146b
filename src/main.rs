use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use std::process;
use std::sync::Arc;
use subprobe::engine::{EnumerationSettings, Enumerator};
use subprobe::output::OutputManager;
use subprobe::resolver::DnsResolver;
use subprobe::{config, utils, wordlist, Args};

const BANNER: &str = r#"
           _                     _
 ___ _   _| |__  _ __  _ __ ___ | |__   ___
/ __| | | | '_ \| '_ \| '__/ _ \| '_ \ / _ \
\__ \ |_| | |_) | |_) | | | (_) | |_) |  __/
|___/\__,_|_.__/| .__/|_|  \___/|_.__/ \___|
                |_|
        Wordlist Subdomain Discovery
"#;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.silent {
        log::LevelFilter::Error
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if !args.silent {
        eprintln!("{}", BANNER);
    }

    let config = match config::build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if !utils::is_valid_domain(&config.domain) {
        warn!("{} does not look like a domain name, continuing anyway", config.domain);
    }

    let labels = match wordlist::load_wordlist(&config.wordlist_path) {
        Ok(labels) => labels,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let resolver = Arc::new(DnsResolver::new(&config.resolver)?);
    if config.resolver.use_system_resolver() {
        info!("Using system resolver configuration");
    } else {
        info!("Using nameservers: {}", config.resolver.nameservers.join(", "));
    }

    let mut enumerator = Enumerator::new(
        EnumerationSettings::from_config(&config),
        resolver.clone(),
        resolver,
    );
    let report = enumerator.run(&labels).await;

    OutputManager::new(config.output.clone())
        .write_report(&report)
        .map_err(|e| anyhow::anyhow!("Failed to write results: {}", e))?;

    let stats = &report.stats;
    info!(
        "Enumeration completed: {} records from {}/{} candidates in {:.2}s ({} absent, {} failed, {} unfinished)",
        stats.records,
        stats.resolved,
        stats.candidates,
        stats.duration.as_secs_f64(),
        stats.absent,
        stats.failed,
        stats.unfinished
    );

    Ok(())
}
