//! HTTP transport for provider queries.
//!
//! [`HttpFetcher`] performs a blocking GET with a caller-supplied deadline
//! and converts every transport failure into a [`LookupError`]. Nothing from
//! `ureq` or `std::io` escapes this module.
//!
//! # Classification order
//!
//! 1. Timeout-class errors (a `ureq` timeout at any stage, `TimedOut`).
//! 2. Unreachable-host errors (DNS failure, unreachable network).
//! 3. Operation-in-progress / would-block conditions, reported as timeouts.
//! 4. Everything else is [`LookupError::Unexpected`].
//!
//! The host name is resolved before the request is sent, so a resolver
//! failure is known by the stage it happened in; the resolver's own
//! error kinds are uncategorized. Classification only looks at that stage,
//! error variants and [`io::ErrorKind`]s.

use std::io;
use std::net::ToSocketAddrs;
use std::time::Duration;

use ureq::Agent;
use url::{Host, Url};

use crate::error::LookupError;

/// Something that can retrieve a provider response body.
///
/// The production implementation is [`HttpFetcher`]; tests substitute
/// in-memory fakes.
pub trait Fetch {
    /// GET `url`, failing with a classified [`LookupError`].
    ///
    /// `word` is only used to label [`LookupError::Query`].
    fn fetch(&self, word: &str, url: &str, timeout: Duration) -> Result<String, LookupError>;
}

/// Blocking HTTP fetcher backed by `ureq`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    user_agent: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher with the default `ureq` user agent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a custom `User-Agent` header with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn agent(timeout: Duration) -> Agent {
        Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, word: &str, url: &str, timeout: Duration) -> Result<String, LookupError> {
        log::debug!("GET {} (timeout {:?})", url, timeout);

        resolve(url)?;

        let agent = Self::agent(timeout);
        let mut request = agent.get(url);
        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent);
        }

        let mut response = request.call().map_err(|e| classify(&e))?;

        let status = response.status().as_u16();
        if status != 200 {
            log::debug!("{} answered HTTP {}", url, status);
            return Err(LookupError::Query {
                word: word.to_string(),
                status,
            });
        }

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| classify(&e))
    }
}

/// Check that the host of `url` resolves to at least one address.
///
/// Any resolver failure is [`LookupError::NoNetwork`]. IP literals are
/// not looked up.
pub fn resolve(url: &str) -> Result<(), LookupError> {
    let parsed = Url::parse(url)
        .map_err(|e| LookupError::Unexpected(format!("invalid URL {url}: {e}")))?;
    let port = parsed.port_or_known_default().unwrap_or(80);

    let domain = match parsed.host() {
        Some(Host::Domain(domain)) => domain,
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => return Ok(()),
        None => return Err(LookupError::Unexpected(format!("no host in URL {url}"))),
    };

    match (domain, port).to_socket_addrs() {
        Ok(addrs) if addrs.len() > 0 => Ok(()),
        Ok(_) => {
            log::debug!("{} resolved to no addresses", domain);
            Err(LookupError::NoNetwork)
        }
        Err(e) => {
            log::debug!("Cannot resolve {}: {}", domain, e);
            Err(LookupError::NoNetwork)
        }
    }
}

/// Map a `ureq` error onto the lookup taxonomy.
#[must_use]
pub fn classify(err: &ureq::Error) -> LookupError {
    let kind = match err {
        ureq::Error::Timeout(_) => return LookupError::Timeout,
        ureq::Error::HostNotFound => return LookupError::NoNetwork,
        ureq::Error::Io(io_err) => io_err.kind(),
        other => return LookupError::Unexpected(other.to_string()),
    };

    classify_io(kind).unwrap_or_else(|| LookupError::Unexpected(err.to_string()))
}

/// Classify an I/O failure kind, or `None` when it has no specific meaning.
#[must_use]
pub fn classify_io(kind: io::ErrorKind) -> Option<LookupError> {
    use io::ErrorKind;

    match kind {
        ErrorKind::TimedOut => Some(LookupError::Timeout),
        ErrorKind::HostUnreachable
        | ErrorKind::NetworkUnreachable
        | ErrorKind::NetworkDown
        | ErrorKind::AddrNotAvailable => Some(LookupError::NoNetwork),
        ErrorKind::WouldBlock | ErrorKind::InProgress => Some(LookupError::Timeout),
        _ => None,
    }
}
