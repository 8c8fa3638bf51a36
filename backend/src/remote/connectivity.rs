//! Connectivity Probe
//!
//! Reachability is a short TCP connect to the catalog host, run on the
//! tokio reactor so callers never block a worker thread.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use url::{Host, Url};

use super::ConnectivityOracle;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1500);

pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe the host of an `http(s)` URL, on its explicit or default port
    pub fn for_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        // IPv6 literals without brackets, so socket address lookup accepts them
        let host = match parsed.host()? {
            Host::Domain(domain) => domain.to_string(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
        };
        Some(Self::new(host, parsed.port_or_known_default()?))
    }
}

#[async_trait]
impl ConnectivityOracle for TcpProbe {
    async fn is_connected(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                log::debug!("Cannot reach {}:{}: {}", self.host, self.port, e);
                false
            }
            Err(_) => {
                log::debug!("Timed out reaching {}:{}", self.host, self.port);
                false
            }
        }
    }
}
