// src/lib.rs
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod output;
pub mod resolver;
pub mod types;
pub mod utils;
pub mod wordlist;

pub use cli::Args;
pub use engine::{EnumerationSettings, Enumerator, RunPhase};
pub use generator::{generate_candidates, Candidate};
pub use resolver::{DnsResolver, ForwardResolve, ReverseResolve};
pub use types::{Config, EnumerationReport, Record, SubprobeError};
pub use wordlist::load_wordlist;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
