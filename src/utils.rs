// src/utils.rs
use crate::types::SubprobeError;
use std::net::{IpAddr, SocketAddr};

pub const DNS_PORT: u16 = 53;

/// Strips surrounding whitespace and trailing dots from a target domain.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_string()
}

/// Check if a string looks like a valid domain
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    parts.iter().all(|part| {
        !part.is_empty()
            && part.len() <= 63
            && part.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
            && !part.starts_with('-')
            && !part.ends_with('-')
    })
}

/// Parses `ip` or `ip:port` (`[v6]:port` for IPv6), defaulting to port 53.
pub fn parse_nameserver(value: &str) -> Result<SocketAddr, SubprobeError> {
    let value = value.trim();
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr);
    }

    value
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|e| SubprobeError::ConfigError(format!("Invalid nameserver address {}: {}", value, e)))
}

/// Drops the root label dot from a name returned by the resolver.
pub fn strip_root_dot(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_domain() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example.com"));
        assert!(!is_valid_domain("example"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("-example.com"));
        assert!(!is_valid_domain("example-.com"));
        assert!(!is_valid_domain("exa mple.com"));
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("  example.com. "), "example.com");
        assert_eq!(normalize_domain("Example.com"), "Example.com");
    }

    #[test]
    fn test_parse_nameserver() {
        assert_eq!(parse_nameserver("1.1.1.1").unwrap(), "1.1.1.1:53".parse::<SocketAddr>().unwrap());
        assert_eq!(parse_nameserver("9.9.9.9:5353").unwrap(), "9.9.9.9:5353".parse::<SocketAddr>().unwrap());
        assert_eq!(parse_nameserver("[::1]:53").unwrap(), "[::1]:53".parse::<SocketAddr>().unwrap());
        assert!(parse_nameserver("dns.google").is_err());
    }

    #[test]
    fn test_strip_root_dot() {
        assert_eq!(strip_root_dot("www.example.com."), "www.example.com");
        assert_eq!(strip_root_dot("www.example.com"), "www.example.com");
    }
}
