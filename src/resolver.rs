// src/resolver.rs
use crate::error::Result;
use crate::types::{ResolverConfig, SubprobeError};
use crate::utils::{parse_nameserver, strip_root_dot};
use async_trait::async_trait;
use dashmap::DashMap;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use log::{debug, warn};
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_resolver::config::{NameServerConfig, Protocol, ResolverConfig as DnsResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::error::ProtoErrorKind;
use trust_dns_resolver::proto::rr::Name;
use trust_dns_resolver::TokioAsyncResolver;

/// Hostname to IPv4 lookups.
///
/// `Ok(vec![])` means the name does not exist (or could not be answered in
/// time). `Err` is reserved for resolver malfunctions.
#[async_trait]
pub trait ForwardResolve: Send + Sync {
    async fn resolve_ipv4(&self, fqdn: &str) -> Result<Vec<String>>;
}

/// IPv4 address to hostnames, primary name first. Never fails.
#[async_trait]
pub trait ReverseResolve: Send + Sync {
    async fn reverse_lookup(&self, ip: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// NXDOMAIN, empty answer, no reachable nameserver or timeout.
    Absent,
    Malfunction,
}

pub fn classify_error(err: &ResolveError) -> LookupFailure {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. }
        | ResolveErrorKind::NoConnections
        | ResolveErrorKind::Timeout => LookupFailure::Absent,
        ResolveErrorKind::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => LookupFailure::Absent,
        ResolveErrorKind::Proto(e) => match e.kind() {
            ProtoErrorKind::Timeout => LookupFailure::Absent,
            ProtoErrorKind::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => LookupFailure::Absent,
            _ => LookupFailure::Malfunction,
        },
        _ => LookupFailure::Malfunction,
    }
}

/// Makes `name` absolute so search domains are never appended.
fn absolute_name(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Unicode form of a resolver name, without the root dot.
fn display_name(name: &Name) -> String {
    strip_root_dot(&name.to_utf8())
}

pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    lookup_timeout: Duration,
    ptr_cache: DashMap<String, Vec<String>>,
}

impl DnsResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let (dns_config, mut opts) = if config.use_system_resolver() {
            trust_dns_resolver::system_conf::read_system_conf()
                .map_err(|e| SubprobeError::ResolverSetup(format!("Failed to read system resolver configuration: {}", e)))?
        } else {
            let mut dns_config = DnsResolverConfig::new();
            for ns in &config.nameservers {
                dns_config.add_name_server(NameServerConfig {
                    socket_addr: parse_nameserver(ns)?,
                    protocol: Protocol::Udp,
                    tls_dns_name: None,
                    trust_negative_responses: false,
                    bind_addr: None,
                });
            }
            (dns_config, ResolverOpts::default())
        };

        opts.timeout = config.timeout;
        opts.attempts = config.attempts;

        let limiter = match config.rate_limit {
            Some(limit) => {
                let per_second = NonZeroU32::new(limit)
                    .ok_or_else(|| SubprobeError::ConfigError("Rate limit must be greater than 0".to_string()))?;
                Some(Arc::new(RateLimiter::direct(Quota::per_second(per_second))))
            }
            None => None,
        };

        // The library retries internally; this is the ceiling for all attempts.
        let attempts = u32::try_from(config.attempts).unwrap_or(u32::MAX);
        let lookup_timeout = config.timeout.saturating_mul(attempts.saturating_add(1));

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(dns_config, opts),
            limiter,
            lookup_timeout,
            ptr_cache: DashMap::new(),
        })
    }

    async fn throttle(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    async fn query_ptr(&self, addr: Ipv4Addr) -> Vec<String> {
        self.throttle().await;

        match tokio::time::timeout(self.lookup_timeout, self.resolver.reverse_lookup(IpAddr::V4(addr))).await {
            Ok(Ok(lookup)) => lookup.iter().map(|ptr| display_name(ptr)).collect(),
            Ok(Err(e)) => {
                debug!("No reverse entry for {}: {}", addr, e);
                Vec::new()
            }
            Err(_) => {
                debug!("Reverse lookup for {} timed out", addr);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ForwardResolve for DnsResolver {
    async fn resolve_ipv4(&self, fqdn: &str) -> Result<Vec<String>> {
        self.throttle().await;

        let query = absolute_name(fqdn);
        match tokio::time::timeout(self.lookup_timeout, self.resolver.ipv4_lookup(query.as_str())).await {
            Ok(Ok(lookup)) => Ok(lookup.iter().map(|a| a.to_string()).collect()),
            Ok(Err(e)) => match classify_error(&e) {
                LookupFailure::Absent => {
                    debug!("{}: {}", fqdn, e);
                    Ok(Vec::new())
                }
                LookupFailure::Malfunction => Err(SubprobeError::Resolution {
                    name: fqdn.to_string(),
                    message: e.to_string(),
                }),
            },
            Err(_) => {
                debug!("{}: lookup exceeded {:?}", fqdn, self.lookup_timeout);
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl ReverseResolve for DnsResolver {
    async fn reverse_lookup(&self, ip: &str) -> Vec<String> {
        if let Some(cached) = self.ptr_cache.get(ip) {
            return cached.clone();
        }

        let addr = match ip.parse::<Ipv4Addr>() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("Skipping reverse lookup for {}: {}", ip, e);
                return Vec::new();
            }
        };

        let names = self.query_ptr(addr).await;
        self.ptr_cache.insert(ip.to_string(), names.clone());
        names
    }
}
