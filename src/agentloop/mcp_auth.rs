//! Access control for the MCP tool server: bearer-token validation and an
//! IP allow-list.

use sha2::{Digest, Sha256};
use std::net::IpAddr;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// IP filter for restricting server access. Empty means allow all.
#[derive(Debug, Clone, Default)]
pub struct IpFilter {
    allowed: Vec<IpAddr>,
}

impl IpFilter {
    /// Create a new empty IP filter (allows all).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allowed IP address (e.g. `"127.0.0.1"` or `"::1"`).
    pub fn allow(&mut self, ip: &str) -> Result<(), String> {
        let parsed = IpAddr::from_str(ip).map_err(|err| format!("Invalid IP address: {}", err))?;
        self.allowed.push(parsed);
        Ok(())
    }

    /// Check if an IP address is allowed.
    pub fn is_allowed(&self, ip: IpAddr) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&ip)
    }
}

/// Authentication configuration for the MCP server.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// No authentication required.
    None,
    /// Bearer token authentication (`Authorization: Bearer <token>`).
    Bearer(String),
}

impl AuthConfig {
    /// Create bearer token authentication.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Validate an `Authorization` header value against the configured
    /// authentication. A missing header validates only under
    /// [`AuthConfig::None`].
    pub fn validate(&self, header: Option<&str>) -> bool {
        match self {
            AuthConfig::None => true,
            AuthConfig::Bearer(token) => {
                let Some(provided) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
                    return false;
                };
                // Compare SHA-256 digests in constant time; the optimizer
                // cannot short-circuit ct_eq() the way it can with `==`.
                let expected_hash = Sha256::digest(token.as_bytes());
                let provided_hash = Sha256::digest(provided.as_bytes());
                expected_hash.ct_eq(&provided_hash).into()
            }
        }
    }
}
