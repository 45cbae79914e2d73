//! Shared HTTP plumbing for client wrappers.
//!
//! All wrappers reuse one process-wide `reqwest::Client` so connections are
//! pooled across sessions and repeated requests avoid DNS/TLS churn.
//! Per-request timeouts are applied at the request builder, so clients with
//! different [`SessionConfig`](crate::SessionConfig) timeouts can share the
//! pool.

use lazy_static::lazy_static;
use std::time::Duration;

lazy_static! {
    static ref SHARED_HTTP_CLIENT: reqwest::Client = reqwest::ClientBuilder::new()
        .pool_max_idle_per_host(16)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client");
}

/// The process-wide pooled HTTP client.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &SHARED_HTTP_CLIENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_client_is_a_singleton() {
        let a = get_shared_http_client() as *const reqwest::Client;
        let b = get_shared_http_client() as *const reqwest::Client;
        assert_eq!(a, b);
    }
}
